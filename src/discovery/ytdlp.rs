//! yt-dlp search discovery.

use super::{extract_video_id, Discovery, Locator};
use crate::error::{Result, VidsumError};
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

/// Discovery through `yt-dlp "ytsearchN:query"`.
#[derive(Debug, Default)]
pub struct YtdlpDiscovery;

impl YtdlpDiscovery {
    pub fn new() -> Self {
        Self
    }
}

/// Parse `--dump-json --flat-playlist` output (one JSON object per line).
fn parse_search_output(stdout: &str) -> Vec<Locator> {
    let mut locators = Vec::new();

    for line in stdout.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let json: serde_json::Value = match serde_json::from_str(line) {
            Ok(json) => json,
            Err(e) => {
                warn!("Skipping unparseable yt-dlp line: {}", e);
                continue;
            }
        };

        let video_id = json["id"]
            .as_str()
            .and_then(extract_video_id)
            .or_else(|| json["url"].as_str().and_then(extract_video_id));

        if let Some(video_id) = video_id {
            let locator = Locator::from_video_id(&video_id);
            locators.push(match json["title"].as_str() {
                Some(title) => locator.with_title(title),
                None => locator,
            });
        }
    }

    locators
}

#[async_trait]
impl Discovery for YtdlpDiscovery {
    fn name(&self) -> &str {
        "yt-dlp"
    }

    #[instrument(skip(self), fields(backend = "yt-dlp"))]
    async fn search(&self, query: &str, count: u32) -> Result<Vec<Locator>> {
        let target = format!("ytsearch{}:{}", count, query);

        let output = tokio::process::Command::new("yt-dlp")
            .args([
                "--dump-json",
                "--flat-playlist",
                "--no-download",
                "--no-warnings",
                &target,
            ])
            .output()
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    VidsumError::ToolNotFound("yt-dlp".to_string())
                } else {
                    VidsumError::Discovery(format!("Failed to run yt-dlp: {}", e))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VidsumError::Discovery(format!(
                "yt-dlp search failed: {}",
                stderr.trim()
            )));
        }

        let mut locators = parse_search_output(&String::from_utf8_lossy(&output.stdout));
        locators.truncate(count as usize);
        debug!("yt-dlp returned {} videos", locators.len());
        Ok(locators)
    }
}
