pub mod adx;
pub mod ema;

pub use adx::{adx, detect_di_crossover, AdxSeries, DiCrossover};
pub use ema::{ema, sma};
