// Runs the real bring-up on a NUCLEO-F767ZI.

#![no_std]
#![no_main]

use defmt::unwrap;
use defmt_rtt as _; // global logger
use panic_probe as _;
use stm32f7xx_clk::{
    cortex_m::interrupt,
    pac,
    rcc::{self, Config, CoreClock},
};

#[defmt_test::tests]
mod tests {
    use super::*;

    struct TestArgs {
        rcc: pac::RCC,
        clk: CoreClock,
    }

    #[init]
    fn init() -> TestArgs {
        let dp: pac::Peripherals = unwrap!(pac::Peripherals::take());

        TestArgs {
            rcc: dp.RCC,
            clk: CoreClock::new(),
        }
    }

    #[test]
    fn reset_state(ta: &mut TestArgs) {
        defmt::assert_eq!(rcc::sysclk_hz(&ta.rcc), 16_000_000);
        defmt::assert_eq!(ta.clk.hz(), 16_000_000);
    }

    #[test]
    fn bring_up_160mhz(ta: &mut TestArgs) {
        let cfg: Config = Config::new();
        let res =
            interrupt::free(|cs| rcc::set_sysclk_pll(&mut ta.rcc, &cfg, &mut ta.clk, cs));
        defmt::assert!(res.is_ok());

        defmt::assert_eq!(ta.clk.hz(), 160_000_000);
        defmt::assert_eq!(rcc::sysclk_hz(&ta.rcc), 160_000_000);
        defmt::assert_eq!(rcc::hclk_hz(&ta.rcc), 160_000_000);
        defmt::assert_eq!(rcc::pclk1_hz(&ta.rcc), 40_000_000);
        defmt::assert_eq!(rcc::pclk2_hz(&ta.rcc), 80_000_000);
    }

    #[test]
    fn update_is_stable(ta: &mut TestArgs) {
        let first = ta.clk.update(&ta.rcc);
        let second = ta.clk.update(&ta.rcc);
        defmt::assert_eq!(first, second);
    }
}
