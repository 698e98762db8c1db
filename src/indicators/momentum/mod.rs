pub mod cci;
pub mod macd;
pub mod mfi;
pub mod rsi;
pub mod stochastic;
pub mod williams;

pub use cci::cci;
pub use macd::{macd, MacdSeries};
pub use mfi::mfi;
pub use rsi::rsi;
pub use stochastic::{stochastic, StochasticSeries};
pub use williams::williams_r;
