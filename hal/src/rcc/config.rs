use super::cfgr::{hpre_shift, ppre_shift};
use super::{AhbPre, ApbPre, Cfgr, HSE_FREQ, HSI_FREQ, Mco1, Mco2, McoPre, PllP, PllSrc, Pllcfgr};

/// Lowest VCO input frequency the PLL will lock with.
pub const VCO_IN_MIN: u32 = 1_000_000;
/// Highest VCO input frequency the PLL will lock with.
pub const VCO_IN_MAX: u32 = 2_000_000;
/// Lowest VCO output frequency the PLL will lock with.
pub const VCO_MIN: u32 = 100_000_000;
/// Highest VCO output frequency the PLL will lock with.
pub const VCO_MAX: u32 = 432_000_000;
/// Maximum rated system clock frequency.
pub const SYSCLK_MAX: u32 = 180_000_000;
/// Maximum rated APB1 (low-speed bus) frequency.
pub const PCLK1_MAX: u32 = 45_000_000;
/// Maximum rated APB2 (high-speed bus) frequency.
pub const PCLK2_MAX: u32 = 90_000_000;

/// Clock tree configuration.
///
/// All values are fixed at build time; there is no runtime configuration
/// surface. [`Config::new`] is the 160 MHz NUCLEO-F767ZI profile. Field
/// ranges are not checked on construction, use [`is_valid`](Self::is_valid)
/// in a `const` assertion:
///
/// ```
/// use stm32f7xx_clk::rcc::Config;
///
/// const CFG: Config = Config::new();
/// const _: () = assert!(CFG.is_valid());
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// PLL input clock source.
    pub pllsrc: PllSrc,
    /// PLL input divider, 2-63.
    pub pllm: u8,
    /// PLL multiplier, 50-432.
    pub plln: u16,
    /// System clock output divider.
    pub pllp: PllP,
    /// USB OTG FS / SDMMC / RNG output divider, 2-15.
    pub pllq: u8,
    /// DSI output divider, 2-7.
    pub pllr: u8,
    /// Drive the HSE pin from an external clock signal instead of a
    /// crystal.
    pub hse_bypass: bool,
    /// AHB prescaler.
    pub ahb: AhbPre,
    /// APB1 prescaler.
    pub apb1: ApbPre,
    /// APB2 prescaler.
    pub apb2: ApbPre,
    /// HSE division factor for the RTC clock.
    pub rtc_pre: u8,
    /// Microcontroller clock output 1 source.
    pub mco1: Mco1,
    /// Microcontroller clock output 1 prescaler.
    pub mco1_pre: McoPre,
    /// Microcontroller clock output 2 source.
    pub mco2: Mco2,
    /// Microcontroller clock output 2 prescaler.
    pub mco2_pre: McoPre,
}

impl Config {
    /// 160 MHz system clock for the NUCLEO-F767ZI.
    ///
    /// The on-board ST-LINK feeds an 8 MHz clock into the HSE pin, so the
    /// HSE runs in bypass mode. VCO = 8 MHz / 4 × 160 = 320 MHz,
    /// SYSCLK = 320 MHz / 2, APB1 at 40 MHz, APB2 at 80 MHz. Both MCO pins
    /// output their clock divided by 5.
    ///
    /// # Example
    ///
    /// ```
    /// use stm32f7xx_clk::rcc::Config;
    ///
    /// const CFG: Config = Config::new();
    /// assert_eq!(CFG.vco_hz(), 320_000_000);
    /// assert_eq!(CFG.sysclk_hz(), 160_000_000);
    /// assert_eq!(CFG.hclk_hz(), 160_000_000);
    /// ```
    pub const fn new() -> Config {
        Config {
            pllsrc: PllSrc::Hse,
            pllm: 4,
            plln: 160,
            pllp: PllP::Div2,
            pllq: 10,
            pllr: 5,
            hse_bypass: true,
            ahb: AhbPre::Div1,
            apb1: ApbPre::Div4,
            apb2: ApbPre::Div2,
            rtc_pre: 8,
            mco1: Mco1::Pll,
            mco1_pre: McoPre::Div5,
            mco2: Mco2::Sysclk,
            mco2_pre: McoPre::Div5,
        }
    }

    /// Nominal frequency of the configured PLL source.
    pub const fn src_hz(&self) -> u32 {
        match self.pllsrc {
            PllSrc::Hsi => HSI_FREQ,
            PllSrc::Hse => HSE_FREQ,
        }
    }

    /// VCO input frequency, source divided by M.
    pub const fn pll_in_hz(&self) -> u32 {
        self.src_hz() / self.pllm as u32
    }

    /// VCO output frequency, VCO input multiplied by N.
    pub const fn vco_hz(&self) -> u32 {
        self.pll_in_hz() * self.plln as u32
    }

    /// System clock frequency, VCO divided by P.
    pub const fn sysclk_hz(&self) -> u32 {
        self.vco_hz() / self.pllp.div()
    }

    /// Core clock (HCLK) frequency, SYSCLK through the AHB prescaler.
    pub const fn hclk_hz(&self) -> u32 {
        self.sysclk_hz() >> hpre_shift(self.ahb as u8)
    }

    /// APB1 clock frequency.
    pub const fn pclk1_hz(&self) -> u32 {
        self.hclk_hz() >> ppre_shift(self.apb1 as u8)
    }

    /// APB2 clock frequency.
    pub const fn pclk2_hz(&self) -> u32 {
        self.hclk_hz() >> ppre_shift(self.apb2 as u8)
    }

    /// USB OTG FS / SDMMC / RNG clock frequency, VCO divided by Q.
    pub const fn pllq_hz(&self) -> u32 {
        self.vco_hz() / self.pllq as u32
    }

    /// Check the configuration against the hardware limits.
    ///
    /// Divider field ranges, the VCO input and output lock windows, and the
    /// maximum rated bus frequencies. Intended for build-constant
    /// validation, there is no runtime check anywhere in the bring-up path.
    ///
    /// # Example
    ///
    /// ```
    /// use stm32f7xx_clk::rcc::Config;
    ///
    /// // M = 2 leaves an 8 MHz source at 4 MHz, above the VCO input window
    /// const CFG: Config = Config { pllm: 2, ..Config::new() };
    /// assert!(!CFG.is_valid());
    /// ```
    pub const fn is_valid(&self) -> bool {
        if self.pllm < 2 || self.pllm > 63 {
            return false;
        }
        if self.plln < 50 || self.plln > 432 {
            return false;
        }
        if self.pllq < 2 || self.pllq > 15 {
            return false;
        }
        if self.pllr < 2 || self.pllr > 7 {
            return false;
        }
        let pll_in = self.pll_in_hz();
        if pll_in < VCO_IN_MIN || pll_in > VCO_IN_MAX {
            return false;
        }
        let vco = self.vco_hz();
        if vco < VCO_MIN || vco > VCO_MAX {
            return false;
        }
        self.sysclk_hz() <= SYSCLK_MAX
            && self.pclk1_hz() <= PCLK1_MAX
            && self.pclk2_hz() <= PCLK2_MAX
    }

    /// PLL configuration register value: the reset baseline overlaid with
    /// the configured fields, so no residual bits from a prior
    /// configuration leak through.
    pub const fn pllcfgr(&self) -> Pllcfgr {
        Pllcfgr::RESET
            .set_pllm(self.pllm)
            .set_plln(self.plln)
            .set_pllp(self.pllp)
            .set_pllq(self.pllq)
            .set_pllr(self.pllr)
            .set_pllsrc(self.pllsrc)
    }

    /// Clock configuration register value: prescalers and clock outputs,
    /// with the source selection left at the reset-state HSI.
    pub const fn cfgr(&self) -> Cfgr {
        Cfgr::RESET
            .set_hpre(self.ahb)
            .set_ppre1(self.apb1)
            .set_ppre2(self.apb2)
            .set_rtcpre(self.rtc_pre)
            .set_mco1(self.mco1)
            .set_mco1pre(self.mco1_pre)
            .set_mco2(self.mco2)
            .set_mco2pre(self.mco2_pre)
    }
}

impl Default for Config {
    fn default() -> Config {
        Config::new()
    }
}

// The shipped profile must satisfy every hardware limit.
const _: () = assert!(Config::new().is_valid());
