//! Prompt templates for vidsum.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    /// Prompts for summarizing a single video transcript.
    pub item: ItemPrompts,
    /// Prompts for merging per-video summaries.
    pub merge: MergePrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompts for per-video summarization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemPrompts {
    pub system: String,
    pub user: String,
}

impl Default for ItemPrompts {
    fn default() -> Self {
        Self {
            system: r#"You summarize video transcripts. Answer with the summary only; never restate the transcript or these instructions."#
                .to_string(),

            user: r#"Turn the transcript below into bullet points. Summarize each point and tag it with its timestamp as hours, minutes and seconds.

Follow this style preference from the viewer:
{{style}}

Transcript (one line per caption):
{{transcript}}"#
                .to_string(),
        }
    }
}

/// Prompts for merging many video summaries into one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MergePrompts {
    pub system: String,
    pub user: String,
}

impl Default for MergePrompts {
    fn default() -> Self {
        Self {
            system: r#"You combine summaries of several videos about the same topic into one coherent explanation. Do not produce a list of timestamps; extract the knowledge itself."#
                .to_string(),

            user: r#"Search term: "{{query}}"

Merge the summaries below into a single concise summary. Emphasize the key takeaways and explain each one.
Level of detail: {{depth}}
Style: {{style}}

Summaries (one JSON object per line):
{{summaries}}"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let item_path = custom_path.join("item.toml");
            if item_path.exists() {
                let content = std::fs::read_to_string(&item_path)?;
                prompts.item = toml::from_str(&content)?;
            }

            let merge_path = custom_path.join("merge.toml");
            if merge_path.exists() {
                let content = std::fs::read_to_string(&merge_path)?;
                prompts.merge = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}
