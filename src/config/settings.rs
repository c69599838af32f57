//! Configuration settings for vidsum.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Built-in summarization style used when the caller supplies none.
pub const DEFAULT_STYLE: &str = "I prefer a summary that is brief yet informative, focusing on the main \
arguments and essential details without unnecessary fluff. Aim for clarity and simplicity.";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub discovery: DiscoverySettings,
    pub transcript: TranscriptSettings,
    pub llm: LlmSettings,
    pub summary: SummarySettings,
    pub depth: DepthSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Where candidate videos come from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryProvider {
    /// YouTube Data API v3 search endpoint (needs an API key).
    #[default]
    Api,
    /// `yt-dlp ytsearchN:` (no key needed).
    Ytdlp,
}

impl std::str::FromStr for DiscoveryProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "api" | "youtube" => Ok(DiscoveryProvider::Api),
            "ytdlp" | "yt-dlp" => Ok(DiscoveryProvider::Ytdlp),
            _ => Err(format!("Unknown discovery provider: {}", s)),
        }
    }
}

impl std::fmt::Display for DiscoveryProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscoveryProvider::Api => write!(f, "api"),
            DiscoveryProvider::Ytdlp => write!(f, "ytdlp"),
        }
    }
}

/// Video discovery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoverySettings {
    /// Discovery provider (api, ytdlp).
    pub provider: DiscoveryProvider,
    /// YouTube Data API key. Falls back to `YOUTUBE_API_KEY`.
    pub api_key: Option<String>,
    /// Base URL of the YouTube Data API.
    pub api_base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            provider: DiscoveryProvider::Api,
            api_key: None,
            api_base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            timeout_secs: 30,
        }
    }
}

impl DiscoverySettings {
    /// The configured API key, or `YOUTUBE_API_KEY` from the environment.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("YOUTUBE_API_KEY").ok().filter(|k| !k.is_empty()))
    }
}

/// Where transcripts come from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptProvider {
    /// HTTP transcript service (`GET /transcript?video_id=`).
    #[default]
    Service,
    /// Auto-generated subtitles fetched with yt-dlp.
    Ytdlp,
}

impl std::str::FromStr for TranscriptProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "service" | "http" => Ok(TranscriptProvider::Service),
            "ytdlp" | "yt-dlp" => Ok(TranscriptProvider::Ytdlp),
            _ => Err(format!("Unknown transcript provider: {}", s)),
        }
    }
}

impl std::fmt::Display for TranscriptProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranscriptProvider::Service => write!(f, "service"),
            TranscriptProvider::Ytdlp => write!(f, "ytdlp"),
        }
    }
}

/// Transcript retrieval settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptSettings {
    /// Transcript provider (service, ytdlp).
    pub provider: TranscriptProvider,
    /// Base URL of the transcript service.
    pub service_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Preferred subtitle languages for yt-dlp, in order.
    pub languages: Vec<String>,
}

impl Default for TranscriptSettings {
    fn default() -> Self {
        Self {
            provider: TranscriptProvider::Service,
            service_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 60,
            languages: vec!["en".to_string()],
        }
    }
}

/// Language model settings shared by item summarization and merging.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Chat model.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.4,
            timeout_secs: 120,
        }
    }
}

/// Defaults applied to a run request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarySettings {
    /// Style directive used when the request has none.
    pub default_style: String,
    /// Depth used when the caller does not pass one.
    pub default_depth: i64,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            default_style: DEFAULT_STYLE.to_string(),
            default_depth: 5,
        }
    }
}

/// One row of the depth label table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DepthRow {
    /// Smallest depth (inclusive) that maps to `label`.
    pub min: i64,
    /// Label passed to the merge prompt.
    pub label: String,
}

/// Depth-to-label mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthSettings {
    /// Rows in ascending `min` order. Depths below the first row use its label.
    pub labels: Vec<DepthRow>,
}

impl Default for DepthSettings {
    fn default() -> Self {
        Self {
            labels: vec![
                DepthRow {
                    min: 1,
                    label: "low".to_string(),
                },
                DepthRow {
                    min: 5,
                    label: "high".to_string(),
                },
            ],
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::VidsumError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vidsum")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [discovery]
            provider = "ytdlp"

            [llm]
            model = "gpt-4.1"
            "#,
        )
        .unwrap();

        assert_eq!(settings.discovery.provider, DiscoveryProvider::Ytdlp);
        assert_eq!(settings.llm.model, "gpt-4.1");
        assert_eq!(settings.transcript.provider, TranscriptProvider::Service);
        assert_eq!(settings.summary.default_depth, 5);
        assert_eq!(settings.depth.labels.len(), 2);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.depth.labels.push(DepthRow {
            min: 20,
            label: "exhaustive".to_string(),
        });
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.depth.labels, settings.depth.labels);
        assert_eq!(loaded.summary.default_style, DEFAULT_STYLE);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.llm.model, LlmSettings::default().model);
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!("yt-dlp".parse::<DiscoveryProvider>(), Ok(DiscoveryProvider::Ytdlp));
        assert_eq!("HTTP".parse::<TranscriptProvider>(), Ok(TranscriptProvider::Service));
        assert!("bing".parse::<DiscoveryProvider>().is_err());
    }

    #[test]
    fn test_default_depth_table() {
        let depth = DepthSettings::default();
        let rows: Vec<(i64, &str)> = depth
            .labels
            .iter()
            .map(|r| (r.min, r.label.as_str()))
            .collect();
        assert_eq!(rows, vec![(1, "low"), (5, "high")]);
    }
}
