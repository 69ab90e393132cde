//! Reset and clock control.
//!
//! [`set_sysclk_pll`] is the boot path: one call takes the device from the
//! reset-state HSI to a PLL-derived system clock, or reports which step of
//! the sequence timed out. The `*_hz` functions recompute frequencies from
//! whatever the registers currently hold, so they stay correct no matter
//! how the clocks were last changed.
//!
//! Register access goes through the [`RccRegs`] trait. The memory-mapped
//! implementation for the PAC's `RCC` peripheral is enabled by the device
//! features; anything else implementing the trait (an in-memory register
//! file, for instance) can drive the same sequence.

mod cfgr;
mod config;
mod cr;
mod pllcfgr;

pub use cfgr::{AhbPre, ApbPre, Cfgr, Mco1, Mco2, McoPre, SysClkSrc};
pub use config::{
    Config, PCLK1_MAX, PCLK2_MAX, SYSCLK_MAX, VCO_IN_MAX, VCO_IN_MIN, VCO_MAX, VCO_MIN,
};
pub use cr::Cr;
pub use pllcfgr::{PllP, PllSrc, Pllcfgr};

use cfgr::{hpre_shift, ppre_shift};
use cortex_m::interrupt::CriticalSection;

/// HSI frequency.
pub const HSI_FREQ: u32 = 16_000_000;

/// HSE frequency.
///
/// On NUCLEO-144 boards the HSE pin is driven by an 8 MHz clock from the
/// on-board ST-LINK.
pub const HSE_FREQ: u32 = 8_000_000;

/// Status polls per hardware-ready condition before giving up.
///
/// HSE crystal startup is the slowest condition and completes within a few
/// milliseconds at the boot-time HSI core clock.
const READY_RETRIES: u32 = 0x8_0000;

/// Clock control register file.
///
/// Read and write access to the three RCC registers the bring-up sequence
/// touches. Implemented for the PAC's `RCC` peripheral when a device
/// feature is enabled; test code substitutes an in-memory register file.
pub trait RccRegs {
    /// Read the clock control register.
    fn cr(&self) -> Cr;

    /// Write the clock control register.
    fn set_cr(&mut self, cr: Cr);

    /// Read the PLL configuration register.
    fn pllcfgr(&self) -> Pllcfgr;

    /// Write the PLL configuration register.
    fn set_pllcfgr(&mut self, pllcfgr: Pllcfgr);

    /// Read the clock configuration register.
    fn cfgr(&self) -> Cfgr;

    /// Write the clock configuration register.
    fn set_cfgr(&mut self, cfgr: Cfgr);

    /// Read-modify-write the clock control register.
    fn modify_cr<F: FnOnce(Cr) -> Cr>(&mut self, f: F) {
        self.set_cr(f(self.cr()))
    }

    /// Read-modify-write the clock configuration register.
    fn modify_cfgr<F: FnOnce(Cfgr) -> Cfgr>(&mut self, f: F) {
        self.set_cfgr(f(self.cfgr()))
    }
}

#[cfg(any(feature = "stm32f765", feature = "stm32f7x7"))]
#[cfg_attr(docsrs, doc(cfg(any(feature = "stm32f765", feature = "stm32f7x7"))))]
impl RccRegs for crate::pac::RCC {
    fn cr(&self) -> Cr {
        Cr::new(self.cr.read().bits())
    }

    fn set_cr(&mut self, cr: Cr) {
        self.cr.write(|w| unsafe { w.bits(cr.raw()) })
    }

    fn pllcfgr(&self) -> Pllcfgr {
        Pllcfgr::new(self.pllcfgr.read().bits())
    }

    fn set_pllcfgr(&mut self, pllcfgr: Pllcfgr) {
        self.pllcfgr.write(|w| unsafe { w.bits(pllcfgr.raw()) })
    }

    fn cfgr(&self) -> Cfgr {
        Cfgr::new(self.cfgr.read().bits())
    }

    fn set_cfgr(&mut self, cfgr: Cfgr) {
        self.cfgr.write(|w| unsafe { w.bits(cfgr.raw()) })
    }
}

/// Bring-up failures.
///
/// Each variant names the hardware condition that was still unmet when its
/// poll limit ran out. The caller decides what to do; there is no safe
/// automatic fallback this early in boot.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The previously enabled PLLs or HSE did not report shutdown.
    Shutdown,
    /// The HSE oscillator failed to stabilize.
    HseTimeout,
    /// The PLL failed to lock.
    ///
    /// Usually a VCO frequency outside the lock window; see
    /// [`Config::is_valid`].
    PllTimeout,
    /// The system clock switch to the PLL was never confirmed by the
    /// status field.
    SwitchTimeout,
}

/// Cached core clock (HCLK) frequency.
///
/// Starts at the reset-state 16 MHz HSI and is only ever changed by
/// [`update`](Self::update). The value is correct immediately after an
/// update that follows a clock register change, and stale the moment the
/// registers change again. Readers in interrupt context need their own
/// synchronization; this is plain data.
///
/// # Example
///
/// ```
/// use stm32f7xx_clk::rcc::CoreClock;
///
/// let clk = CoreClock::new();
/// assert_eq!(clk.hz(), 16_000_000);
/// ```
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CoreClock {
    hz: u32,
}

impl CoreClock {
    /// Cached frequency matching the reset-state clock tree.
    pub const fn new() -> CoreClock {
        CoreClock { hz: HSI_FREQ }
    }

    /// Get the cached frequency in hertz.
    pub const fn hz(&self) -> u32 {
        self.hz
    }

    /// Recompute the core clock from the current register values and cache
    /// it.
    ///
    /// Call this after any code path changes the clock registers. Returns
    /// the new value.
    pub fn update<R: RccRegs>(&mut self, rcc: &R) -> u32 {
        self.hz = hclk_hz(rcc);
        self.hz
    }
}

impl Default for CoreClock {
    fn default() -> CoreClock {
        CoreClock::new()
    }
}

/// Spin on `ready` until it reports `true`, up to `retries` reads.
fn poll_ready<R, F>(rcc: &R, retries: u32, ready: F, err: Error) -> Result<(), Error>
where
    R: RccRegs,
    F: Fn(&R) -> bool,
{
    for _ in 0..retries {
        if ready(rcc) {
            return Ok(());
        }
    }
    Err(err)
}

/// Switch the system clock to the PLL fed from the HSE.
///
/// The one-time transition from the reset-default HSI clocking to the
/// PLL-derived configuration in `cfg`, in hardware order:
///
/// 1. Disable the PLLs and the HSE, leaving every other control bit (the
///    running HSI included) untouched, and wait for their ready flags to
///    clear.
/// 2. Write the PLL dividers and the bus, RTC and MCO prescalers. The
///    prescalers must be in place before the source switch so no bus ever
///    overshoots its rated frequency.
/// 3. Start the HSE (bypass first when configured), wait for it, start the
///    PLL, wait for lock.
/// 4. Request the switch and wait until the status field confirms the PLL
///    is the active source.
/// 5. Refresh `clk` so the cached core clock matches the new tree.
///
/// On an `Err` the sequence stops where it failed and the clock tree is
/// left partially configured; the device keeps running on the HSI. The
/// caller chooses whether to retry, continue on the HSI, or halt.
///
/// Flash wait states are not touched here; program the flash ACR for the
/// target frequency before calling.
///
/// Call once from startup code before interrupts are enabled; the
/// [`CriticalSection`] witnesses that context.
pub fn set_sysclk_pll<R: RccRegs>(
    rcc: &mut R,
    cfg: &Config,
    clk: &mut CoreClock,
    _cs: &CriticalSection,
) -> Result<(), Error> {
    rcc.modify_cr(|cr| {
        cr.set_pllon(false)
            .set_plli2son(false)
            .set_pllsaion(false)
            .set_hseon(false)
    });
    poll_ready(
        rcc,
        READY_RETRIES,
        |r| {
            let cr = r.cr();
            !(cr.pllrdy() || cr.plli2srdy() || cr.pllsairdy() || cr.hserdy())
        },
        Error::Shutdown,
    )?;

    rcc.set_pllcfgr(cfg.pllcfgr());
    rcc.set_cfgr(cfg.cfgr());

    // HSEBYP may only change while the HSE is off
    if cfg.hse_bypass {
        rcc.modify_cr(|cr| cr.set_hsebyp(true));
    }
    rcc.modify_cr(|cr| cr.set_hseon(true));
    poll_ready(rcc, READY_RETRIES, |r| r.cr().hserdy(), Error::HseTimeout)?;

    rcc.modify_cr(|cr| cr.set_pllon(true));
    poll_ready(rcc, READY_RETRIES, |r| r.cr().pllrdy(), Error::PllTimeout)?;

    rcc.modify_cfgr(|cfgr| cfgr.set_sw(SysClkSrc::Pll));
    poll_ready(
        rcc,
        READY_RETRIES,
        |r| r.cfgr().sws() == Some(SysClkSrc::Pll),
        Error::SwitchTimeout,
    )?;

    clk.update(rcc);
    Ok(())
}

const fn pll_vco_hz(pll: Pllcfgr) -> u32 {
    let src: u32 = match pll.pllsrc() {
        PllSrc::Hsi => HSI_FREQ,
        PllSrc::Hse => HSE_FREQ,
    };
    (src / pll.pllm() as u32) * pll.plln() as u32
}

/// Calculate the current system clock frequency in hertz.
///
/// Derived entirely from the present register values: the confirmed-active
/// source field selects the branch, and the PLL branch decodes the divider
/// chain from the PLL configuration register. Fractional frequencies are
/// rounded down.
pub fn sysclk_hz<R: RccRegs>(rcc: &R) -> u32 {
    match rcc.cfgr().sws() {
        Some(SysClkSrc::Hsi) => HSI_FREQ,
        Some(SysClkSrc::Hse) => HSE_FREQ,
        Some(SysClkSrc::Pll) => {
            let pll = rcc.pllcfgr();
            pll_vco_hz(pll) / pll.pllp().div()
        }
        // reserved encoding, treat as the reset-state oscillator
        None => HSI_FREQ,
    }
}

/// Calculate the current core clock (HCLK) frequency in hertz.
pub fn hclk_hz<R: RccRegs>(rcc: &R) -> u32 {
    sysclk_hz(rcc) >> hpre_shift(rcc.cfgr().hpre())
}

/// Calculate the current APB1 clock frequency in hertz.
pub fn pclk1_hz<R: RccRegs>(rcc: &R) -> u32 {
    hclk_hz(rcc) >> ppre_shift(rcc.cfgr().ppre1())
}

/// Calculate the current APB2 clock frequency in hertz.
pub fn pclk2_hz<R: RccRegs>(rcc: &R) -> u32 {
    hclk_hz(rcc) >> ppre_shift(rcc.cfgr().ppre2())
}

/// Calculate the USB OTG FS / SDMMC / RNG clock frequency in hertz.
///
/// The PLLQ output, computed from the PLL configuration register whether or
/// not the PLL is currently the system clock source.
pub fn pllq_hz<R: RccRegs>(rcc: &R) -> u32 {
    let pll = rcc.pllcfgr();
    pll_vco_hz(pll) / pll.pllq() as u32
}
