pub mod bu;
pub mod driver;
pub mod error;
pub mod kmeans;
pub mod medoid;
pub mod strategy_a;
pub mod td;

pub use bu::StrategyBConfig;
pub use driver::{Driver, DriverState, Strategy};
pub use error::Error;
pub use strategy_a::StrategyAConfig;
