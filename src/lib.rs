//! vidsum - YouTube research summaries
//!
//! Searches YouTube for a query, summarizes every result independently with a
//! language model, and merges those summaries into one final summary while
//! reporting progress as a stream of events.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management and prompt templates
//! - `discovery` - Video search backends (YouTube Data API, yt-dlp)
//! - `transcript` - Caption retrieval (transcript service, yt-dlp)
//! - `summarize` - Per-video summarization
//! - `aggregate` - Merging summaries into one
//! - `pipeline` - Run orchestration and the progress event model
//! - `cli` - Command-line interface and HTTP server
//!
//! # Example
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use vidsum::config::Settings;
//! use vidsum::pipeline::{Orchestrator, ProgressView, RunRequest};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(&settings)?;
//!
//!     let mut view = ProgressView::new();
//!     let mut events = Box::pin(orchestrator.run(RunRequest::new("chess tutorial", 3)?));
//!     while let Some(event) = events.next().await {
//!         view.apply(&event);
//!         println!("{} {}%", view.stage_label(), view.percent());
//!     }
//!
//!     if let Some(summary) = view.final_summary() {
//!         println!("{}", summary);
//!     }
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod openai;
pub mod pipeline;
pub mod summarize;
pub mod transcript;

pub use error::{Result, VidsumError};
