//! Run command: search, summarize each video and merge.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::pipeline::{
    ItemOutcome, Orchestrator, ProgressEvent, ProgressView, ReportFormat, RunReport, RunRequest,
    Terminal,
};
use anyhow::Result;
use console::style;
use futures::StreamExt;
use indicatif::ProgressBar;

/// Run the full pipeline for one query and print the result.
pub async fn run_pipeline(
    query: &str,
    depth: Option<i64>,
    style_directive: Option<String>,
    show_items: bool,
    output: Option<String>,
    format: &str,
    settings: Settings,
) -> Result<()> {
    let format: ReportFormat = format.parse()?;
    preflight::check(Operation::Run, &settings)?;

    let depth = depth.unwrap_or(settings.summary.default_depth);
    let orchestrator = Orchestrator::new(&settings)?;

    let mut request = RunRequest::new(query, depth)?;
    if let Some(s) = &style_directive {
        request = request.with_style(s.clone());
    }
    let depth_label = orchestrator.depth_label(depth);
    let resolved_style = orchestrator.resolve_style(style_directive.as_deref());

    Output::header(&format!("Researching \"{}\"", query));
    Output::kv("Depth", &format!("{} ({})", depth, depth_label));
    Output::kv("Style", &resolved_style);
    println!();

    let pb = Output::progress_bar("Starting");
    let mut view = ProgressView::new();
    let mut events = Box::pin(orchestrator.run(request));

    while let Some(event) = events.next().await {
        if !view.apply(&event) {
            continue;
        }
        render_event(&pb, &view, &event);
    }

    pb.finish_and_clear();

    if show_items {
        for (index, locator, outcome) in view.items() {
            match outcome {
                ItemOutcome::Succeeded(text) => Output::item_summary(index, &locator.url, text),
                ItemOutcome::Failed(reason) => Output::item_failure(index, &locator.url, reason),
                ItemOutcome::Pending => {}
            }
        }
    }

    let succeeded = view.summaries().len();
    let terminal = view.terminal().cloned();
    match &terminal {
        Some(Terminal::FinalSummary { text }) => {
            Output::success(&format!(
                "Merged {} of {} video summaries",
                succeeded,
                view.total()
            ));
            Output::header("Final Summary");
            println!("\n{}\n", text.trim());
        }
        Some(Terminal::NoResults) => {
            Output::warning("No usable videos were found for this query.");
        }
        Some(Terminal::Error { reason }) => {
            Output::error(&format!("Run failed: {}", reason));
        }
        None => {
            Output::error("Run ended without a result.");
        }
    }

    if let Some(path) = output {
        let report = RunReport::from_view(query, depth, depth_label, &resolved_style, &view)?;
        let path = Settings::expand_path(&path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, report.render(format)?)?;
        Output::info(&format!("Report written to {}", path.display()));
    }

    // Already reported above; exit without a second error line from main.
    let code = exit_code(terminal.as_ref());
    if code != 0 {
        std::process::exit(code);
    }

    Ok(())
}

/// Process exit code for how a run ended. "No results" is not a failure.
fn exit_code(terminal: Option<&Terminal>) -> i32 {
    match terminal {
        Some(Terminal::FinalSummary { .. }) | Some(Terminal::NoResults) => 0,
        Some(Terminal::Error { .. }) | None => 1,
    }
}

fn render_event(pb: &ProgressBar, view: &ProgressView, event: &ProgressEvent) {
    match event {
        ProgressEvent::StageChanged { .. } => {
            pb.set_message(view.stage_label().to_string());
        }
        ProgressEvent::Counts { .. } => {
            pb.set_position(view.percent() as u64);
            pb.set_message(format!(
                "{} ({}/{})",
                view.stage_label(),
                view.completed(),
                view.total()
            ));
        }
        ProgressEvent::ItemSettled {
            index,
            locator,
            outcome,
        } => {
            let name = locator.title.as_deref().unwrap_or(&locator.url);
            let mark = match outcome {
                ItemOutcome::Succeeded(_) => style("✓").green(),
                ItemOutcome::Failed(_) => style("✗").red(),
                ItemOutcome::Pending => style("·").dim(),
            };
            pb.println(format!("  {} {:>2}. {}", mark, index + 1, name));
        }
        ProgressEvent::Terminal { .. } => {
            pb.set_position(100);
            pb.set_message(view.stage_label().to_string());
        }
    }
}
