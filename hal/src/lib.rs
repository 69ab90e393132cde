//! STM32F7 system clock bring-up.
//!
//! This crate takes an STM32F7 from its reset-state 16 MHz internal
//! oscillator to a PLL-derived system clock, and recomputes the effective
//! core clock from whatever the RCC registers currently hold.
#![cfg_attr(not(test), no_std)]

pub use cortex_m;

cfg_if::cfg_if! {
    if #[cfg(feature = "stm32f7x7")] {
        pub use stm32f7::stm32f7x7 as pac;
    } else if #[cfg(feature = "stm32f765")] {
        pub use stm32f7::stm32f765 as pac;
    }
}

pub mod rcc;
