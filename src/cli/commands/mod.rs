//! CLI command implementations.

mod config;
mod doctor;
mod run;
mod search;
mod serve;

pub use config::run_config;
pub use doctor::run_doctor;
pub use run::run_pipeline;
pub use search::run_search;
pub use serve::{router, run_serve};
