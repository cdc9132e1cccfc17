//! CLI commands module.

mod config;
mod generate;
mod util;
mod voices;

pub use config::ConfigCommand;
pub use generate::GenerateCommand;
pub use voices::VoicesCommand;

pub(crate) use util::*;
