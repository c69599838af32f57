//! Auto-generated subtitles via yt-dlp.

use super::{Transcript, TranscriptEntry, TranscriptFetcher};
use crate::error::{Result, VidsumError};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, instrument};

/// Fetches json3 subtitle tracks with yt-dlp into a temporary directory.
pub struct YtdlpTranscripts {
    languages: Vec<String>,
}

impl YtdlpTranscripts {
    pub fn with_languages(languages: Vec<String>) -> Self {
        let languages = if languages.is_empty() {
            vec!["en".to_string()]
        } else {
            languages
        };
        Self { languages }
    }
}

impl Default for YtdlpTranscripts {
    fn default() -> Self {
        Self::with_languages(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
struct Json3 {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
struct Json3Event {
    #[serde(rename = "tStartMs", default)]
    start_ms: u64,
    #[serde(rename = "dDurationMs", default)]
    duration_ms: u64,
    #[serde(default)]
    segs: Vec<Json3Seg>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    #[serde(default)]
    utf8: String,
}

/// Convert json3 caption events into transcript entries, dropping blank events.
fn parse_json3(content: &str) -> Result<Vec<TranscriptEntry>> {
    let parsed: Json3 = serde_json::from_str(content)?;

    Ok(parsed
        .events
        .into_iter()
        .filter_map(|event| {
            let text: String = event.segs.iter().map(|s| s.utf8.as_str()).collect();
            let text = text.replace('\n', " ").trim().to_string();
            if text.is_empty() {
                return None;
            }
            Some(TranscriptEntry {
                text,
                start: event.start_ms as f64 / 1000.0,
                duration: event.duration_ms as f64 / 1000.0,
            })
        })
        .collect())
}

/// Find the first downloaded `.json3` file.
fn find_subtitle_file(dir: &Path) -> Result<Option<std::path::PathBuf>> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) == Some("json3") {
            return Ok(Some(path));
        }
    }
    Ok(None)
}

#[async_trait]
impl TranscriptFetcher for YtdlpTranscripts {
    #[instrument(skip(self))]
    async fn fetch(&self, video_id: &str) -> Result<Transcript> {
        let temp_dir = tempfile::tempdir()?;
        let url = format!("https://www.youtube.com/watch?v={}", video_id);
        let output_template = temp_dir
            .path()
            .join("%(id)s.%(ext)s")
            .to_string_lossy()
            .into_owned();
        let languages = self.languages.join(",");

        let output = tokio::process::Command::new("yt-dlp")
            .args([
                "--skip-download",
                "--write-subs",
                "--write-auto-subs",
                "--sub-format",
                "json3",
                "--sub-langs",
                &languages,
                "--no-warnings",
                "-o",
                &output_template,
                &url,
            ])
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    VidsumError::ToolNotFound("yt-dlp".to_string())
                } else {
                    VidsumError::Transcript(format!("Failed to run yt-dlp: {}", e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VidsumError::ToolFailed(format!(
                "yt-dlp subtitles for {}: {}",
                video_id,
                stderr.trim()
            )));
        }

        let path = find_subtitle_file(temp_dir.path())?.ok_or_else(|| {
            VidsumError::Transcript(format!(
                "no subtitles in [{}] for {}",
                languages, video_id
            ))
        })?;

        let content = tokio::fs::read_to_string(&path).await?;
        let entries = parse_json3(&content)?;
        debug!("Parsed {} caption events", entries.len());

        Ok(Transcript::new(video_id.to_string(), entries))
    }
}
