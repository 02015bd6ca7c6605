
mod inverter;
mod lut;
mod flipflop;
mod counter;
mod power;

pub use inverter::Inverter;
pub use lut::{Lut, LutMask, MAX_LUT_INPUTS};
pub use flipflop::{Flipflop, FlipflopTrigger};
pub use counter::{ClockSource, Counter, TERMINAL_COUNT_BITS};
pub use power::{PowerRail, RailLevel};
