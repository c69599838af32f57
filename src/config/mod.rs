//! Configuration module for vidsum.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{ItemPrompts, MergePrompts, Prompts};
pub use settings::{
    DepthRow, DepthSettings, DiscoveryProvider, DiscoverySettings, GeneralSettings, LlmSettings,
    PromptSettings, Settings, SummarySettings, TranscriptProvider, TranscriptSettings,
    DEFAULT_STYLE,
};
