/// System clock sources.
///
/// Encoded value for both the SW (requested) and SWS (active) fields. The
/// two fields are not instantaneously consistent: a write to SW starts a
/// hardware transition, and only SWS reports which source is really driving
/// the core.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum SysClkSrc {
    /// 16 MHz internal oscillator.
    Hsi = 0b00,
    /// External oscillator.
    Hse = 0b01,
    /// Main PLL.
    Pll = 0b10,
}

impl SysClkSrc {
    const fn from_bits(bits: u32) -> Option<SysClkSrc> {
        match bits {
            0b00 => Some(SysClkSrc::Hsi),
            0b01 => Some(SysClkSrc::Hse),
            0b10 => Some(SysClkSrc::Pll),
            _ => None,
        }
    }
}

/// AHB prescaler (HPRE).
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AhbPre {
    /// SYSCLK not divided.
    Div1 = 0b0000,
    /// SYSCLK divided by 2.
    Div2 = 0b1000,
    /// SYSCLK divided by 4.
    Div4 = 0b1001,
    /// SYSCLK divided by 8.
    Div8 = 0b1010,
    /// SYSCLK divided by 16.
    Div16 = 0b1011,
    /// SYSCLK divided by 64.
    Div64 = 0b1100,
    /// SYSCLK divided by 128.
    Div128 = 0b1101,
    /// SYSCLK divided by 256.
    Div256 = 0b1110,
    /// SYSCLK divided by 512.
    Div512 = 0b1111,
}

/// APB prescaler (PPRE1, PPRE2).
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ApbPre {
    /// HCLK not divided.
    Div1 = 0b000,
    /// HCLK divided by 2.
    Div2 = 0b100,
    /// HCLK divided by 4.
    Div4 = 0b101,
    /// HCLK divided by 8.
    Div8 = 0b110,
    /// HCLK divided by 16.
    Div16 = 0b111,
}

/// Microcontroller clock output 1 sources.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum Mco1 {
    /// Internal oscillator.
    Hsi = 0b00,
    /// 32.768 kHz external oscillator.
    Lse = 0b01,
    /// External oscillator.
    Hse = 0b10,
    /// Main PLL.
    Pll = 0b11,
}

/// Microcontroller clock output 2 sources.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum Mco2 {
    /// System clock.
    Sysclk = 0b00,
    /// PLLI2S.
    Plli2s = 0b01,
    /// External oscillator.
    Hse = 0b10,
    /// Main PLL.
    Pll = 0b11,
}

/// Microcontroller clock output prescaler (MCO1PRE, MCO2PRE).
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum McoPre {
    /// No division.
    Div1 = 0b000,
    /// Divided by 2.
    Div2 = 0b100,
    /// Divided by 3.
    Div3 = 0b101,
    /// Divided by 4.
    Div4 = 0b110,
    /// Divided by 5.
    Div5 = 0b111,
}

/// AHB prescaler shift amount.
///
/// HPRE encodings 0b0000-0b0111 leave SYSCLK undivided; 0b1000 and up shift
/// by {1, 2, 3, 4, 6, 7, 8, 9} (divisions by 32 are skipped by the
/// hardware).
pub(crate) const fn hpre_shift(pre: u8) -> u8 {
    match pre & 0xF {
        0b1000 => 1,
        0b1001 => 2,
        0b1010 => 3,
        0b1011 => 4,
        0b1100 => 6,
        0b1101 => 7,
        0b1110 => 8,
        0b1111 => 9,
        _ => 0,
    }
}

/// APB prescaler shift amount.
/// Works for PPRE1, PPRE2.
pub(crate) const fn ppre_shift(pre: u8) -> u8 {
    match pre & 0x7 {
        0b100 => 1,
        0b101 => 2,
        0b110 => 3,
        0b111 => 4,
        _ => 0,
    }
}

/// Clock configuration register.
///
/// System clock source selection, bus prescalers, the RTC prescaler, and
/// both microcontroller clock outputs share this one register.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Cfgr {
    val: u32,
}

impl Cfgr {
    /// Reset value of the register.
    ///
    /// # Example
    ///
    /// ```
    /// use stm32f7xx_clk::rcc::{Cfgr, SysClkSrc};
    /// assert_eq!(Cfgr::RESET.sw(), Some(SysClkSrc::Hsi));
    /// assert_eq!(Cfgr::RESET.hpre(), 0);
    /// ```
    pub const RESET: Cfgr = Cfgr::new(0);

    /// Create a new Cfgr register from a raw value.
    pub const fn new(val: u32) -> Cfgr {
        Cfgr { val }
    }

    /// Get the raw value of the register.
    pub const fn raw(self) -> u32 {
        self.val
    }

    /// Request a system clock source switch.
    ///
    /// The switch is not instantaneous; poll [`sws`](Self::sws) to learn
    /// which source is actually active.
    ///
    /// # Example
    ///
    /// ```
    /// use stm32f7xx_clk::rcc::{Cfgr, SysClkSrc};
    ///
    /// let cfgr = Cfgr::RESET.set_sw(SysClkSrc::Pll);
    /// assert_eq!(cfgr.sw(), Some(SysClkSrc::Pll));
    /// ```
    #[must_use = "set_sw returns a modified Cfgr"]
    pub const fn set_sw(mut self, src: SysClkSrc) -> Cfgr {
        self.val &= !0b11;
        self.val |= src as u32;
        self
    }

    /// Get the requested system clock source.
    ///
    /// Returns `None` for the reserved 0b11 encoding.
    pub const fn sw(&self) -> Option<SysClkSrc> {
        SysClkSrc::from_bits(self.val & 0b11)
    }

    /// Set the active system clock source status field.
    ///
    /// Read-only on hardware; settable here for simulation.
    #[must_use = "set_sws returns a modified Cfgr"]
    pub const fn set_sws(mut self, src: SysClkSrc) -> Cfgr {
        self.val &= !(0b11 << 2);
        self.val |= (src as u32) << 2;
        self
    }

    /// Get the active system clock source.
    ///
    /// Returns `None` for the reserved 0b11 encoding.
    pub const fn sws(&self) -> Option<SysClkSrc> {
        SysClkSrc::from_bits((self.val >> 2) & 0b11)
    }

    /// Set the AHB prescaler.
    ///
    /// # Example
    ///
    /// ```
    /// use stm32f7xx_clk::rcc::{AhbPre, Cfgr};
    ///
    /// let cfgr = Cfgr::RESET.set_hpre(AhbPre::Div4);
    /// assert_eq!(cfgr.hpre(), 0b1001);
    /// ```
    #[must_use = "set_hpre returns a modified Cfgr"]
    pub const fn set_hpre(mut self, pre: AhbPre) -> Cfgr {
        self.val &= !(0xF << 4);
        self.val |= (pre as u32) << 4;
        self
    }

    /// Get the raw AHB prescaler field.
    pub const fn hpre(&self) -> u8 {
        ((self.val >> 4) & 0xF) as u8
    }

    /// Set the APB1 (low-speed bus) prescaler.
    #[must_use = "set_ppre1 returns a modified Cfgr"]
    pub const fn set_ppre1(mut self, pre: ApbPre) -> Cfgr {
        self.val &= !(0x7 << 10);
        self.val |= (pre as u32) << 10;
        self
    }

    /// Get the raw APB1 prescaler field.
    pub const fn ppre1(&self) -> u8 {
        ((self.val >> 10) & 0x7) as u8
    }

    /// Set the APB2 (high-speed bus) prescaler.
    #[must_use = "set_ppre2 returns a modified Cfgr"]
    pub const fn set_ppre2(mut self, pre: ApbPre) -> Cfgr {
        self.val &= !(0x7 << 13);
        self.val |= (pre as u32) << 13;
        self
    }

    /// Get the raw APB2 prescaler field.
    pub const fn ppre2(&self) -> u8 {
        ((self.val >> 13) & 0x7) as u8
    }

    /// Set the HSE division factor for the RTC clock, 5 bits.
    ///
    /// Values of 2 and up divide the HSE by that factor; 0 and 1 disable
    /// the RTC clock output.
    ///
    /// # Example
    ///
    /// ```
    /// use stm32f7xx_clk::rcc::Cfgr;
    ///
    /// // 8 MHz HSE / 8 = 1 MHz RTC clock
    /// let cfgr = Cfgr::RESET.set_rtcpre(8);
    /// assert_eq!(cfgr.rtcpre(), 8);
    /// ```
    #[must_use = "set_rtcpre returns a modified Cfgr"]
    pub const fn set_rtcpre(mut self, pre: u8) -> Cfgr {
        self.val &= !(0x1F << 16);
        self.val |= ((pre as u32) & 0x1F) << 16;
        self
    }

    /// Get the RTC prescaler field.
    pub const fn rtcpre(&self) -> u8 {
        ((self.val >> 16) & 0x1F) as u8
    }

    /// Set the MCO1 source.
    #[must_use = "set_mco1 returns a modified Cfgr"]
    pub const fn set_mco1(mut self, src: Mco1) -> Cfgr {
        self.val &= !(0b11 << 21);
        self.val |= (src as u32) << 21;
        self
    }

    /// Get the MCO1 source.
    pub const fn mco1(&self) -> Mco1 {
        match (self.val >> 21) & 0b11 {
            0b00 => Mco1::Hsi,
            0b01 => Mco1::Lse,
            0b10 => Mco1::Hse,
            _ => Mco1::Pll,
        }
    }

    /// Set the MCO1 prescaler.
    #[must_use = "set_mco1pre returns a modified Cfgr"]
    pub const fn set_mco1pre(mut self, pre: McoPre) -> Cfgr {
        self.val &= !(0x7 << 24);
        self.val |= (pre as u32) << 24;
        self
    }

    /// Get the raw MCO1 prescaler field.
    pub const fn mco1pre(&self) -> u8 {
        ((self.val >> 24) & 0x7) as u8
    }

    /// Set the MCO2 prescaler.
    #[must_use = "set_mco2pre returns a modified Cfgr"]
    pub const fn set_mco2pre(mut self, pre: McoPre) -> Cfgr {
        self.val &= !(0x7 << 27);
        self.val |= (pre as u32) << 27;
        self
    }

    /// Get the raw MCO2 prescaler field.
    pub const fn mco2pre(&self) -> u8 {
        ((self.val >> 27) & 0x7) as u8
    }

    /// Set the MCO2 source.
    #[must_use = "set_mco2 returns a modified Cfgr"]
    pub const fn set_mco2(mut self, src: Mco2) -> Cfgr {
        self.val &= !(0b11 << 30);
        self.val |= (src as u32) << 30;
        self
    }

    /// Get the MCO2 source.
    pub const fn mco2(&self) -> Mco2 {
        match (self.val >> 30) & 0b11 {
            0b00 => Mco2::Sysclk,
            0b01 => Mco2::Plli2s,
            0b10 => Mco2::Hse,
            _ => Mco2::Pll,
        }
    }
}

impl Default for Cfgr {
    fn default() -> Cfgr {
        Cfgr::RESET
    }
}

impl From<u32> for Cfgr {
    fn from(raw: u32) -> Cfgr {
        Cfgr::new(raw)
    }
}

impl From<Cfgr> for u32 {
    fn from(reg: Cfgr) -> u32 {
        reg.raw()
    }
}
