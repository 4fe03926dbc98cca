pub mod asset;
pub mod config;
pub mod enums;
pub mod epoch;
pub mod stake;

pub use asset::*;
pub use config::*;
pub use enums::*;
pub use epoch::*;
pub use stake::*;
