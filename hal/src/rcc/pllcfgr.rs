/// PLL input clock sources.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum PllSrc {
    /// 16 MHz internal oscillator.
    Hsi = 0b0,
    /// External oscillator.
    Hse = 0b1,
}

/// Main PLL output divider (PLLP).
///
/// The hardware stores the divider pre-encoded in a 2-bit field; the real
/// divisor is `(encoded + 1) * 2`.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum PllP {
    /// VCO divided by 2.
    Div2 = 0b00,
    /// VCO divided by 4.
    Div4 = 0b01,
    /// VCO divided by 6.
    Div6 = 0b10,
    /// VCO divided by 8.
    Div8 = 0b11,
}

impl PllP {
    const fn from_bits(bits: u32) -> PllP {
        match bits & 0b11 {
            0b00 => PllP::Div2,
            0b01 => PllP::Div4,
            0b10 => PllP::Div6,
            _ => PllP::Div8,
        }
    }

    /// Real division factor for the encoded field value.
    ///
    /// # Example
    ///
    /// ```
    /// use stm32f7xx_clk::rcc::PllP;
    ///
    /// assert_eq!(PllP::Div2.div(), 2);
    /// assert_eq!(PllP::Div4.div(), 4);
    /// assert_eq!(PllP::Div6.div(), 6);
    /// assert_eq!(PllP::Div8.div(), 8);
    /// ```
    pub const fn div(self) -> u32 {
        (self as u32 + 1) * 2
    }
}

/// PLL configuration register.
///
/// Holds the input divider (M), multiplier (N), and the three output
/// dividers: P for the system clock, Q for the 48 MHz-class peripherals
/// (USB OTG FS, SDMMC, RNG), and R for the DSI.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Pllcfgr {
    val: u32,
}

impl Pllcfgr {
    /// Reset value of the register.
    ///
    /// # Example
    ///
    /// ```
    /// use stm32f7xx_clk::rcc::{PllP, PllSrc, Pllcfgr};
    ///
    /// assert_eq!(Pllcfgr::RESET.pllm(), 16);
    /// assert_eq!(Pllcfgr::RESET.plln(), 192);
    /// assert_eq!(Pllcfgr::RESET.pllp(), PllP::Div2);
    /// assert_eq!(Pllcfgr::RESET.pllq(), 4);
    /// assert_eq!(Pllcfgr::RESET.pllr(), 2);
    /// assert_eq!(Pllcfgr::RESET.pllsrc(), PllSrc::Hsi);
    /// ```
    pub const RESET: Pllcfgr = Pllcfgr::new(0x2400_3010);

    /// Create a new Pllcfgr register from a raw value.
    pub const fn new(val: u32) -> Pllcfgr {
        Pllcfgr { val }
    }

    /// Get the raw value of the register.
    pub const fn raw(self) -> u32 {
        self.val
    }

    /// Set the PLL input divider (M), 6 bits.
    ///
    /// The VCO input is the PLL source divided by M. Valid values are 2-63;
    /// out-of-range bits are truncated to the field width, not checked.
    ///
    /// # Example
    ///
    /// ```
    /// use stm32f7xx_clk::rcc::Pllcfgr;
    ///
    /// let pllcfgr = Pllcfgr::RESET.set_pllm(4);
    /// assert_eq!(pllcfgr.pllm(), 4);
    /// ```
    #[must_use = "set_pllm returns a modified Pllcfgr"]
    pub const fn set_pllm(mut self, m: u8) -> Pllcfgr {
        self.val &= !0x3F;
        self.val |= (m as u32) & 0x3F;
        self
    }

    /// Get the PLL input divider (M).
    pub const fn pllm(&self) -> u8 {
        (self.val & 0x3F) as u8
    }

    /// Set the PLL multiplier (N), 9 bits.
    ///
    /// The VCO output is the VCO input multiplied by N. Valid values are
    /// 50-432; out-of-range bits are truncated to the field width, not
    /// checked.
    ///
    /// # Example
    ///
    /// ```
    /// use stm32f7xx_clk::rcc::Pllcfgr;
    ///
    /// let pllcfgr = Pllcfgr::RESET.set_plln(160);
    /// assert_eq!(pllcfgr.plln(), 160);
    /// ```
    #[must_use = "set_plln returns a modified Pllcfgr"]
    pub const fn set_plln(mut self, n: u16) -> Pllcfgr {
        self.val &= !(0x1FF << 6);
        self.val |= ((n as u32) & 0x1FF) << 6;
        self
    }

    /// Get the PLL multiplier (N).
    pub const fn plln(&self) -> u16 {
        ((self.val >> 6) & 0x1FF) as u16
    }

    /// Set the system clock output divider (P).
    ///
    /// # Example
    ///
    /// ```
    /// use stm32f7xx_clk::rcc::{PllP, Pllcfgr};
    ///
    /// let pllcfgr = Pllcfgr::RESET.set_pllp(PllP::Div8);
    /// assert_eq!(pllcfgr.pllp(), PllP::Div8);
    /// ```
    #[must_use = "set_pllp returns a modified Pllcfgr"]
    pub const fn set_pllp(mut self, p: PllP) -> Pllcfgr {
        self.val &= !(0b11 << 16);
        self.val |= (p as u32) << 16;
        self
    }

    /// Get the system clock output divider (P).
    pub const fn pllp(&self) -> PllP {
        PllP::from_bits(self.val >> 16)
    }

    /// Set the PLL input clock source.
    ///
    /// # Example
    ///
    /// ```
    /// use stm32f7xx_clk::rcc::{PllSrc, Pllcfgr};
    ///
    /// let pllcfgr = Pllcfgr::RESET.set_pllsrc(PllSrc::Hse);
    /// assert_eq!(pllcfgr.pllsrc(), PllSrc::Hse);
    /// ```
    #[must_use = "set_pllsrc returns a modified Pllcfgr"]
    pub const fn set_pllsrc(mut self, src: PllSrc) -> Pllcfgr {
        match src {
            PllSrc::Hsi => self.val &= !(1 << 22),
            PllSrc::Hse => self.val |= 1 << 22,
        }
        self
    }

    /// Get the PLL input clock source.
    pub const fn pllsrc(&self) -> PllSrc {
        if (self.val >> 22) & 0b1 != 0 {
            PllSrc::Hse
        } else {
            PllSrc::Hsi
        }
    }

    /// Set the USB OTG FS / SDMMC / RNG output divider (Q), 4 bits.
    ///
    /// Valid values are 2-15.
    #[must_use = "set_pllq returns a modified Pllcfgr"]
    pub const fn set_pllq(mut self, q: u8) -> Pllcfgr {
        self.val &= !(0xF << 24);
        self.val |= ((q as u32) & 0xF) << 24;
        self
    }

    /// Get the USB OTG FS / SDMMC / RNG output divider (Q).
    pub const fn pllq(&self) -> u8 {
        ((self.val >> 24) & 0xF) as u8
    }

    /// Set the DSI output divider (R), 3 bits.
    ///
    /// Valid values are 2-7.
    #[must_use = "set_pllr returns a modified Pllcfgr"]
    pub const fn set_pllr(mut self, r: u8) -> Pllcfgr {
        self.val &= !(0x7 << 28);
        self.val |= ((r as u32) & 0x7) << 28;
        self
    }

    /// Get the DSI output divider (R).
    pub const fn pllr(&self) -> u8 {
        ((self.val >> 28) & 0x7) as u8
    }
}

impl Default for Pllcfgr {
    fn default() -> Pllcfgr {
        Pllcfgr::RESET
    }
}

impl From<u32> for Pllcfgr {
    fn from(raw: u32) -> Pllcfgr {
        Pllcfgr::new(raw)
    }
}

impl From<Pllcfgr> for u32 {
    fn from(reg: Pllcfgr) -> u32 {
        reg.raw()
    }
}
