pub mod app_config;
pub mod driver;
pub mod error;

pub use app_config::Config;
pub use driver::{evaluate_line, run, RunSummary, Verdict};
pub use error::CliError;
