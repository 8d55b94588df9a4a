pub mod config;
pub mod error;
pub mod observation;

pub use config::{Config, RulesConfig};
pub use error::*;
pub use observation::*;
