//! Pre-flight checks before expensive operations.
//!
//! Validates that required tools and configuration are available
//! before starting operations that would otherwise fail midway.

use crate::config::{DiscoveryProvider, Settings, TranscriptProvider};
use crate::error::{Result, VidsumError};
use std::process::Command;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// A full run needs discovery, transcripts and the model.
    Run,
    /// Search only needs discovery.
    Search,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    check_discovery(settings)?;
    if let Operation::Run = operation {
        check_openai_key()?;
        if settings.transcript.provider == TranscriptProvider::Ytdlp {
            check_tool("yt-dlp")?;
        }
    }
    Ok(())
}

fn check_discovery(settings: &Settings) -> Result<()> {
    match settings.discovery.provider {
        DiscoveryProvider::Api => settings
            .discovery
            .resolved_api_key()
            .map(|_| ())
            .ok_or_else(|| {
                VidsumError::Config(
                    "YOUTUBE_API_KEY not set. Set it with: export YOUTUBE_API_KEY='...' \
                     (or set discovery.provider = \"ytdlp\")"
                        .to_string(),
                )
            }),
        DiscoveryProvider::Ytdlp => check_tool("yt-dlp"),
    }
}

/// Check if OpenAI API key is configured.
fn check_openai_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(VidsumError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(VidsumError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

/// Check if an external tool is available.
fn check_tool(name: &str) -> Result<()> {
    match Command::new(name).arg("--version").output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(VidsumError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(VidsumError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(VidsumError::ToolNotFound(format!("{}: {}", name, e))),
    }
}
