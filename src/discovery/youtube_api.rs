//! YouTube Data API v3 discovery.

use super::{Discovery, Locator};
use crate::error::{Result, VidsumError};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

/// Discovery through the `search` endpoint of the YouTube Data API.
pub struct YoutubeApiDiscovery {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl YoutubeApiDiscovery {
    pub fn with_config(base_url: &str, api_key: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn search_url(&self, query: &str, count: u32) -> Result<Url> {
        let url = Url::parse_with_params(
            &format!("{}/search", self.base_url),
            &[
                ("part", "snippet"),
                ("q", query),
                ("maxResults", &count.to_string()),
                ("type", "video"),
                ("key", &self.api_key),
            ],
        )?;
        Ok(url)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: ItemId,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
struct ItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Convert a search response into locators, keeping API order.
fn locators_from_response(response: SearchResponse) -> Vec<Locator> {
    response
        .items
        .into_iter()
        .filter_map(|item| {
            let video_id = item.id.video_id?;
            let locator = Locator::from_video_id(&video_id);
            Some(match item.snippet.and_then(|s| s.title) {
                Some(title) => locator.with_title(title),
                None => locator,
            })
        })
        .collect()
}

#[async_trait]
impl Discovery for YoutubeApiDiscovery {
    fn name(&self) -> &str {
        "youtube-api"
    }

    #[instrument(skip(self), fields(backend = "youtube-api"))]
    async fn search(&self, query: &str, count: u32) -> Result<Vec<Locator>> {
        let url = self.search_url(query, count)?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(VidsumError::Discovery(format!(
                "YouTube API returned {}: {}",
                status, message
            )));
        }

        let parsed: SearchResponse = response.json().await.map_err(|e| {
            VidsumError::Discovery(format!("Malformed YouTube API response: {}", e))
        })?;

        let mut locators = locators_from_response(parsed);
        locators.truncate(count as usize);
        debug!("YouTube API returned {} videos", locators.len());
        Ok(locators)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url_encodes_query() {
        let discovery =
            YoutubeApiDiscovery::with_config("https://api.example.com/v3/", "k3y", 5).unwrap();
        let url = discovery.search_url("chess tutorial & more", 3).unwrap();

        assert_eq!(url.path(), "/v3/search");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("q".to_string(), "chess tutorial & more".to_string())));
        assert!(pairs.contains(&("maxResults".to_string(), "3".to_string())));
        assert!(pairs.contains(&("type".to_string(), "video".to_string())));
        assert!(pairs.contains(&("key".to_string(), "k3y".to_string())));
    }

    #[test]
    fn test_locators_skip_non_video_items() {
        let response: SearchResponse = serde_json::from_str(
            r#"{
                "items": [
                    {"id": {"kind": "youtube#video", "videoId": "aaaaaaaaaaa"}, "snippet": {"title": "First"}},
                    {"id": {"kind": "youtube#channel", "channelId": "UC123"}},
                    {"id": {"kind": "youtube#video", "videoId": "bbbbbbbbbbb"}}
                ]
            }"#,
        )
        .unwrap();

        let locators = locators_from_response(response);
        assert_eq!(locators.len(), 2);
        assert_eq!(locators[0].url, "https://www.youtube.com/watch?v=aaaaaaaaaaa");
        assert_eq!(locators[0].title.as_deref(), Some("First"));
        assert_eq!(locators[1].title, None);
    }

    #[test]
    fn test_empty_response() {
        let response: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(locators_from_response(response).is_empty());
    }
}
