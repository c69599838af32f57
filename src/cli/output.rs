//! CLI output formatting utilities.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a numbered video line.
    pub fn video(index: usize, title: Option<&str>, url: &str) {
        match title {
            Some(t) => println!(
                "  {} {} {}",
                style(format!("{:>2}.", index + 1)).cyan(),
                style(t).bold(),
                style(url).dim()
            ),
            None => println!("  {} {}", style(format!("{:>2}.", index + 1)).cyan(), url),
        }
    }

    /// Print one per-video summary, shortened.
    pub fn item_summary(index: usize, url: &str, text: &str) {
        println!(
            "\n{} {} {}",
            style(">>").green(),
            style(format!("Result for video #{}", index + 1)).bold(),
            style(url).dim()
        );
        println!("   {}", content_preview(text, 1000));
    }

    /// Print a failed video.
    pub fn item_failure(index: usize, url: &str, reason: &str) {
        eprintln!(
            "{} {} {} {}",
            style(">>").yellow(),
            style(format!("Video #{} skipped", index + 1)).bold(),
            style(url).dim(),
            reason
        );
    }

    /// Create the run progress bar (position/length in percent).
    pub fn progress_bar(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new(100);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Truncate content with ellipsis, on a character boundary.
fn content_preview(content: &str, max_chars: usize) -> String {
    let content = content.replace('\n', "\n   ");
    if content.chars().count() <= max_chars {
        content
    } else {
        let cut: String = content.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_preview() {
        assert_eq!(content_preview("short", 10), "short");
        assert_eq!(content_preview("ééééé", 3), "ééé...");
        assert_eq!(content_preview("a\nb", 10), "a\n   b");
    }
}
