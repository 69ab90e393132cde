use stm32f7xx_clk::cortex_m::interrupt::CriticalSection;
use stm32f7xx_clk::rcc::{
    self, Cfgr, Config, CoreClock, Cr, Error, PllP, PllSrc, Pllcfgr, RccRegs, SysClkSrc,
};

/// In-memory RCC register file.
///
/// Models the enable-to-ready propagation of the real hardware: writing an
/// enable bit raises the matching ready flag, clearing it drops the flag.
/// Each propagation can be suppressed to simulate an oscillator that never
/// stabilizes, a PLL that never locks, a switch that is never confirmed, or
/// ready flags that never release.
struct FakeRcc {
    cr: Cr,
    pllcfgr: Pllcfgr,
    cfgr: Cfgr,
    hse_starts: bool,
    pll_locks: bool,
    switch_settles: bool,
    ready_clears: bool,
    // write-ordering violations, latched at write time
    pll_on_before_hse_rdy: bool,
    pll_on_before_cfg: bool,
    cfg_written: bool,
}

impl FakeRcc {
    fn reset() -> FakeRcc {
        FakeRcc {
            cr: Cr::RESET,
            pllcfgr: Pllcfgr::RESET,
            cfgr: Cfgr::RESET,
            hse_starts: true,
            pll_locks: true,
            switch_settles: true,
            ready_clears: true,
            pll_on_before_hse_rdy: false,
            pll_on_before_cfg: false,
            cfg_written: false,
        }
    }
}

/// Next state of a ready flag after its enable bit is written.
fn track(on: bool, settles: bool, clears: bool, was: bool) -> bool {
    if on {
        if settles { true } else { was }
    } else if clears {
        false
    } else {
        was
    }
}

impl RccRegs for FakeRcc {
    fn cr(&self) -> Cr {
        self.cr
    }

    fn set_cr(&mut self, cr: Cr) {
        if cr.pllon() && !self.cr.pllon() {
            if !self.cr.hserdy() {
                self.pll_on_before_hse_rdy = true;
            }
            if !self.cfg_written {
                self.pll_on_before_cfg = true;
            }
        }
        let was = self.cr;
        self.cr = cr
            .set_hsirdy(cr.hsion())
            .set_hserdy(track(
                cr.hseon(),
                self.hse_starts,
                self.ready_clears,
                was.hserdy(),
            ))
            .set_pllrdy(track(
                cr.pllon(),
                self.pll_locks,
                self.ready_clears,
                was.pllrdy(),
            ))
            .set_plli2srdy(track(
                cr.plli2son(),
                true,
                self.ready_clears,
                was.plli2srdy(),
            ))
            .set_pllsairdy(track(
                cr.pllsaion(),
                true,
                self.ready_clears,
                was.pllsairdy(),
            ));
    }

    fn pllcfgr(&self) -> Pllcfgr {
        self.pllcfgr
    }

    fn set_pllcfgr(&mut self, pllcfgr: Pllcfgr) {
        self.cfg_written = true;
        self.pllcfgr = pllcfgr;
    }

    fn cfgr(&self) -> Cfgr {
        self.cfgr
    }

    fn set_cfgr(&mut self, cfgr: Cfgr) {
        let sws = if self.switch_settles {
            cfgr.sw()
        } else {
            self.cfgr.sws()
        };
        self.cfgr = match sws {
            Some(src) => cfgr.set_sws(src),
            None => cfgr,
        };
    }
}

fn bring_up(rcc: &mut FakeRcc, clk: &mut CoreClock) -> Result<(), Error> {
    let cs = unsafe { CriticalSection::new() };
    rcc::set_sysclk_pll(rcc, &Config::new(), clk, &cs)
}

#[test]
fn sysclk_source_dispatch() {
    let mut rcc = FakeRcc::reset();
    assert_eq!(rcc::sysclk_hz(&rcc), 16_000_000);

    rcc.cfgr = Cfgr::RESET.set_sws(SysClkSrc::Hse);
    assert_eq!(rcc::sysclk_hz(&rcc), 8_000_000);

    rcc.pllcfgr = Pllcfgr::RESET
        .set_pllsrc(PllSrc::Hse)
        .set_pllm(4)
        .set_plln(160)
        .set_pllp(PllP::Div2);
    rcc.cfgr = Cfgr::RESET.set_sws(SysClkSrc::Pll);
    assert_eq!(rcc::sysclk_hz(&rcc), 160_000_000);

    // reserved SWS encoding falls back to the HSI constant
    rcc.cfgr = Cfgr::new(0b11 << 2);
    assert_eq!(rcc::sysclk_hz(&rcc), 16_000_000);
}

#[test]
fn pll_decode() {
    // (m, n, p, src, expected sysclk)
    let cases: [(u8, u16, PllP, PllSrc, u32); 5] = [
        (4, 160, PllP::Div2, PllSrc::Hse, 160_000_000),
        (4, 50, PllP::Div2, PllSrc::Hse, 50_000_000),
        (8, 432, PllP::Div4, PllSrc::Hse, 108_000_000),
        (16, 160, PllP::Div2, PllSrc::Hsi, 80_000_000),
        // input division truncates before the multiply: (8 MHz / 3) * 160 / 2
        (3, 160, PllP::Div2, PllSrc::Hse, 213_333_280),
    ];

    for (m, n, p, src, hz) in cases {
        let mut rcc = FakeRcc::reset();
        rcc.pllcfgr = Pllcfgr::RESET
            .set_pllsrc(src)
            .set_pllm(m)
            .set_plln(n)
            .set_pllp(p);
        rcc.cfgr = Cfgr::RESET.set_sws(SysClkSrc::Pll);
        assert_eq!(rcc::sysclk_hz(&rcc), hz, "M={m} N={n} P={p:?} {src:?}");
    }
}

#[test]
fn ahb_prescaler_table() {
    const SHIFTS: [u8; 16] = [0, 0, 0, 0, 0, 0, 0, 0, 1, 2, 3, 4, 6, 7, 8, 9];

    let mut rcc = FakeRcc::reset();
    for (hpre, shift) in SHIFTS.iter().enumerate() {
        rcc.cfgr = Cfgr::new((hpre as u32) << 4);
        assert_eq!(
            rcc::hclk_hz(&rcc),
            16_000_000 >> shift,
            "HPRE {hpre:#06b}"
        );
    }
}

#[test]
fn apb_prescaler_table() {
    const SHIFTS: [u8; 8] = [0, 0, 0, 0, 1, 2, 3, 4];

    let mut rcc = FakeRcc::reset();
    for (ppre, shift) in SHIFTS.iter().enumerate() {
        rcc.cfgr = Cfgr::new((ppre as u32) << 10);
        assert_eq!(rcc::pclk1_hz(&rcc), 16_000_000 >> shift, "PPRE1 {ppre:#05b}");

        rcc.cfgr = Cfgr::new((ppre as u32) << 13);
        assert_eq!(rcc::pclk2_hz(&rcc), 16_000_000 >> shift, "PPRE2 {ppre:#05b}");
    }
}

#[test]
fn bring_up_160mhz() {
    let mut rcc = FakeRcc::reset();
    let mut clk = CoreClock::new();
    assert_eq!(clk.hz(), 16_000_000);

    assert_eq!(bring_up(&mut rcc, &mut clk), Ok(()));

    assert_eq!(clk.hz(), 160_000_000);
    assert_eq!(rcc::sysclk_hz(&rcc), 160_000_000);
    assert_eq!(rcc::hclk_hz(&rcc), 160_000_000);
    assert_eq!(rcc::pclk1_hz(&rcc), 40_000_000);
    assert_eq!(rcc::pclk2_hz(&rcc), 80_000_000);
    assert_eq!(rcc::pllq_hz(&rcc), 32_000_000);

    // end state: HSE running in bypass, PLL locked and active
    assert!(rcc.cr.hseon());
    assert!(rcc.cr.hsebyp());
    assert!(rcc.cr.pllon());
    assert!(!rcc.cr.plli2son());
    assert!(!rcc.cr.pllsaion());
    assert_eq!(rcc.cfgr.sws(), Some(SysClkSrc::Pll));
    assert_eq!(rcc.pllcfgr.raw(), 0x5A40_2804);
    assert_eq!(rcc.cfgr.rtcpre(), 8);
}

#[test]
fn bring_up_write_ordering() {
    let mut rcc = FakeRcc::reset();
    let mut clk = CoreClock::new();
    assert_eq!(bring_up(&mut rcc, &mut clk), Ok(()));

    assert!(!rcc.pll_on_before_hse_rdy, "PLL enabled before HSE ready");
    assert!(!rcc.pll_on_before_cfg, "PLL enabled before configuration");
}

#[test]
fn bring_up_hse_timeout() {
    let mut rcc = FakeRcc::reset();
    rcc.hse_starts = false;
    let mut clk = CoreClock::new();

    assert_eq!(bring_up(&mut rcc, &mut clk), Err(Error::HseTimeout));

    // sequence stopped before the PLL, cache untouched
    assert!(!rcc.cr.pllon());
    assert_eq!(rcc.cfgr.sws(), Some(SysClkSrc::Hsi));
    assert_eq!(clk.hz(), 16_000_000);
}

#[test]
fn bring_up_pll_timeout() {
    let mut rcc = FakeRcc::reset();
    rcc.pll_locks = false;
    let mut clk = CoreClock::new();

    assert_eq!(bring_up(&mut rcc, &mut clk), Err(Error::PllTimeout));
    assert_eq!(rcc.cfgr.sws(), Some(SysClkSrc::Hsi));
    assert_eq!(clk.hz(), 16_000_000);
}

#[test]
fn bring_up_switch_timeout() {
    let mut rcc = FakeRcc::reset();
    rcc.switch_settles = false;
    let mut clk = CoreClock::new();

    assert_eq!(bring_up(&mut rcc, &mut clk), Err(Error::SwitchTimeout));
    assert_eq!(clk.hz(), 16_000_000);
}

#[test]
fn bring_up_shutdown_timeout() {
    let mut rcc = FakeRcc::reset();
    // a previous configuration left the PLL running and its lock flag stuck
    rcc.cr = Cr::RESET.set_pllon(true).set_pllrdy(true);
    rcc.ready_clears = false;
    let mut clk = CoreClock::new();

    assert_eq!(bring_up(&mut rcc, &mut clk), Err(Error::Shutdown));
    assert_eq!(clk.hz(), 16_000_000);
}

#[test]
fn update_is_idempotent() {
    let mut rcc = FakeRcc::reset();
    let mut clk = CoreClock::new();
    assert_eq!(bring_up(&mut rcc, &mut clk), Ok(()));

    let first = clk.update(&rcc);
    let second = clk.update(&rcc);
    assert_eq!(first, 160_000_000);
    assert_eq!(first, second);
    assert_eq!(clk.hz(), second);
}

#[test]
fn update_tracks_register_edits() {
    // the oracle has no memory of how the registers got their values
    let mut rcc = FakeRcc::reset();
    let mut clk = CoreClock::new();
    assert_eq!(bring_up(&mut rcc, &mut clk), Ok(()));

    // a debugger-style edit behind the oracle's back: AHB divide by 4
    rcc.cfgr = Cfgr::new(rcc.cfgr.raw() | (0b1001 << 4));
    assert_eq!(clk.update(&rcc), 40_000_000);
    assert_eq!(clk.hz(), 40_000_000);
}
