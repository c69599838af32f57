//! Pipeline orchestrator.
//!
//! Sequences discovery, the per-video fan-out and the merge step for one run,
//! emitting [`ProgressEvent`]s as it goes.

use super::depth::{DepthLabel, DepthPolicy, ThresholdTable};
use super::events::{ItemOutcome, ProgressEvent, RunOutcome, Stage};
use super::slots::OutcomeSlots;
use crate::aggregate::{Aggregator, LabeledSummary, LlmAggregator};
use crate::config::{Prompts, Settings, DEFAULT_STYLE};
use crate::discovery::{clamp_count, create_discovery, Discovery, Locator};
use crate::error::{Result, VidsumError};
use crate::summarize::{ItemSummarizer, TranscriptSummarizer};
use crate::transcript::create_fetcher;
use futures::future::{BoxFuture, FutureExt};
use futures::stream::{self, Stream, StreamExt};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// What the caller asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub query: String,
    pub depth: i64,
    pub style: Option<String>,
}

impl RunRequest {
    /// Build a request. The query must contain something other than whitespace.
    pub fn new(query: impl Into<String>, depth: i64) -> Result<Self> {
        let query = query.into();
        if query.trim().is_empty() {
            return Err(VidsumError::InvalidInput("query must not be empty".to_string()));
        }
        Ok(Self {
            query,
            depth,
            style: None,
        })
    }

    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }
}

/// Pushes events into the run's channel. A dropped receiver is not an error:
/// the run still proceeds to its terminal outcome.
struct Emitter<'a> {
    tx: &'a mpsc::UnboundedSender<ProgressEvent>,
}

impl Emitter<'_> {
    fn emit(&self, event: ProgressEvent) {
        debug!(?event, "progress");
        let _ = self.tx.send(event);
    }

    fn stage(&self, stage: Stage) {
        self.emit(ProgressEvent::StageChanged { stage });
    }
}

/// The pipeline. Cheap to clone; holds no per-run state.
#[derive(Clone)]
pub struct Orchestrator {
    discovery: Arc<dyn Discovery>,
    summarizer: Arc<dyn ItemSummarizer>,
    aggregator: Arc<dyn Aggregator>,
    depth_policy: Arc<dyn DepthPolicy>,
    default_style: String,
}

impl Orchestrator {
    /// Create an orchestrator with the clients selected in settings.
    pub fn new(settings: &Settings) -> Result<Self> {
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let discovery = create_discovery(settings)?;
        let fetcher = create_fetcher(settings)?;
        let summarizer =
            TranscriptSummarizer::new(fetcher, &settings.llm)?.with_prompts(prompts.clone());
        let aggregator = LlmAggregator::new(&settings.llm)?.with_prompts(prompts);

        info!(
            "Using {} discovery, {} transcripts, model {}",
            discovery.name(),
            settings.transcript.provider,
            settings.llm.model
        );

        Ok(Self::with_components(discovery, Arc::new(summarizer), Arc::new(aggregator))
            .with_depth_policy(ThresholdTable::from_settings(&settings.depth))
            .with_default_style(settings.summary.default_style.clone()))
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        discovery: Arc<dyn Discovery>,
        summarizer: Arc<dyn ItemSummarizer>,
        aggregator: Arc<dyn Aggregator>,
    ) -> Self {
        Self {
            discovery,
            summarizer,
            aggregator,
            depth_policy: Arc::new(ThresholdTable::default()),
            default_style: DEFAULT_STYLE.to_string(),
        }
    }

    /// Replace the depth-to-label mapping.
    pub fn with_depth_policy(mut self, policy: impl DepthPolicy + 'static) -> Self {
        self.depth_policy = Arc::new(policy);
        self
    }

    /// Replace the style used when a request has none.
    pub fn with_default_style(mut self, style: impl Into<String>) -> Self {
        self.default_style = style.into();
        self
    }

    pub fn discovery(&self) -> Arc<dyn Discovery> {
        self.discovery.clone()
    }

    pub fn summarizer(&self) -> Arc<dyn ItemSummarizer> {
        self.summarizer.clone()
    }

    pub fn aggregator(&self) -> Arc<dyn Aggregator> {
        self.aggregator.clone()
    }

    /// Label the merge step will see for `depth`.
    pub fn depth_label(&self, depth: i64) -> DepthLabel {
        self.depth_policy.label(depth)
    }

    /// Style for a request: the request's own unless blank, else the default.
    pub fn resolve_style(&self, style: Option<&str>) -> String {
        match style {
            Some(s) if !s.trim().is_empty() => s.to_string(),
            _ => self.default_style.clone(),
        }
    }

    /// Start a run and return its events as a lazy stream.
    ///
    /// Nothing happens until the stream is polled. The stream ends right after
    /// the terminal event.
    pub fn run(&self, request: RunRequest) -> impl Stream<Item = ProgressEvent> + Send + 'static {
        let (tx, rx) = mpsc::unbounded_channel();
        let this = self.clone();
        let driver: BoxFuture<'static, ()> = async move {
            this.execute(request, &tx).await;
        }
        .boxed();

        stream::unfold((Some(driver), rx), |(mut driver, mut rx)| async move {
            loop {
                match driver.as_mut() {
                    Some(running) => {
                        tokio::select! {
                            biased;
                            event = rx.recv() => {
                                return event.map(|e| (e, (driver, rx)));
                            }
                            _ = running => {
                                driver = None;
                            }
                        }
                    }
                    None => {
                        return rx.recv().await.map(|e| (e, (driver, rx)));
                    }
                }
            }
        })
    }

    /// Drive one run to completion, sending every event (terminal included) to `events`.
    #[instrument(
        skip(self, request, events),
        fields(run_id = %uuid::Uuid::new_v4(), query = %request.query, depth = request.depth)
    )]
    pub async fn execute(
        &self,
        request: RunRequest,
        events: &mpsc::UnboundedSender<ProgressEvent>,
    ) -> RunOutcome {
        let emitter = Emitter { tx: events };
        let outcome = self.drive(&request, &emitter).await;

        let items = outcome.items();
        match &outcome {
            RunOutcome::Completed { .. } => {
                info!("Run completed with {} of {} videos", count_succeeded(items), items.len())
            }
            RunOutcome::NoResults { .. } => info!("Run found no usable videos ({} tried)", items.len()),
            RunOutcome::Aborted { reason, .. } => warn!("Run aborted: {}", reason),
        }

        emitter.emit(ProgressEvent::Terminal {
            outcome: outcome.terminal(),
        });
        outcome
    }

    async fn drive(&self, request: &RunRequest, emitter: &Emitter<'_>) -> RunOutcome {
        let style = self.resolve_style(request.style.as_deref());

        emitter.stage(Stage::Discovering);
        let count = clamp_count(request.depth);
        let mut locators = match self.discovery.search(&request.query, count).await {
            Ok(locators) => locators,
            Err(e) => {
                return RunOutcome::Aborted {
                    reason: e.to_string(),
                    items: Vec::new(),
                }
            }
        };
        locators.truncate(count as usize);

        if locators.is_empty() {
            return RunOutcome::NoResults { items: Vec::new() };
        }
        info!("Discovered {} videos", locators.len());

        emitter.stage(Stage::Summarizing);
        let slots = self.fan_out(&locators, &style, emitter).await;
        let successes = slots.successes();
        let items = slots.into_outcomes();

        if successes.is_empty() {
            return RunOutcome::NoResults { items };
        }

        emitter.stage(Stage::Aggregating);
        let label = self.depth_policy.label(request.depth);
        let summaries = LabeledSummary::number(successes);

        match self
            .aggregator
            .merge(&request.query, &label, &style, &summaries)
            .await
        {
            Ok(summary) => RunOutcome::Completed { summary, items },
            Err(e) => RunOutcome::Aborted {
                reason: e.to_string(),
                items,
            },
        }
    }

    /// Summarize every locator concurrently; failures stay in their own slot.
    async fn fan_out(&self, locators: &[Locator], style: &str, emitter: &Emitter<'_>) -> OutcomeSlots {
        let total = locators.len();
        let mut slots = OutcomeSlots::new(total);
        emitter.emit(ProgressEvent::Counts { completed: 0, total });

        let summarizer = self.summarizer.clone();
        let style = style.to_string();
        let mut settled = stream::iter(locators.to_vec().into_iter().enumerate())
            .map(move |(index, locator)| {
                let summarizer = summarizer.clone();
                let style = style.clone();
                async move {
                    let outcome = match summarizer.summarize(&locator, &style).await {
                        Ok(text) => ItemOutcome::Succeeded(text),
                        Err(e) => ItemOutcome::Failed(e.to_string()),
                    };
                    (index, outcome)
                }
            })
            .buffer_unordered(total.max(1));

        while let Some((index, outcome)) = settled.next().await {
            if let ItemOutcome::Failed(reason) = &outcome {
                warn!("Video {} failed: {}", locators[index].url, reason);
            }

            if !slots.settle(index, outcome.clone()) {
                warn!("Ignoring duplicate outcome for video {}", index);
                continue;
            }

            emitter.emit(ProgressEvent::ItemSettled {
                index,
                locator: locators[index].clone(),
                outcome,
            });
            emitter.emit(ProgressEvent::Counts {
                completed: slots.completed(),
                total: slots.total(),
            });
        }

        debug_assert!(slots.is_complete(), "every video settles exactly once");
        slots
    }
}

fn count_succeeded(items: &[ItemOutcome]) -> usize {
    items.iter().filter(|o| o.text().is_some()).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::events::Terminal;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    struct FakeDiscovery {
        result: std::result::Result<Vec<Locator>, String>,
        calls: Mutex<Vec<(String, u32)>>,
    }

    impl FakeDiscovery {
        fn returning(urls: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                result: Ok(urls.iter().map(|u| Locator::new(*u)).collect()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn failing(reason: &str) -> Arc<Self> {
            Arc::new(Self {
                result: Err(reason.to_string()),
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Discovery for FakeDiscovery {
        fn name(&self) -> &str {
            "fake"
        }

        async fn search(&self, query: &str, count: u32) -> Result<Vec<Locator>> {
            self.calls.lock().unwrap().push((query.to_string(), count));
            self.result.clone().map_err(VidsumError::Discovery)
        }
    }

    /// Per-URL scripted result and delay.
    struct FakeSummarizer {
        script: HashMap<String, (u64, std::result::Result<String, String>)>,
        calls: AtomicUsize,
        styles: Mutex<Vec<String>>,
    }

    impl FakeSummarizer {
        fn new(script: &[(&str, u64, std::result::Result<&str, &str>)]) -> Arc<Self> {
            Arc::new(Self {
                script: script
                    .iter()
                    .map(|(url, delay, result)| {
                        (
                            url.to_string(),
                            (*delay, result.map(str::to_string).map_err(str::to_string)),
                        )
                    })
                    .collect(),
                calls: AtomicUsize::new(0),
                styles: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl ItemSummarizer for FakeSummarizer {
        async fn summarize(&self, locator: &Locator, style: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.styles.lock().unwrap().push(style.to_string());
            let (delay, result) = self
                .script
                .get(&locator.url)
                .cloned()
                .unwrap_or((0, Err("unscripted".to_string())));
            tokio::time::sleep(Duration::from_millis(delay)).await;
            result.map_err(VidsumError::Summarization)
        }
    }

    #[derive(Default)]
    struct FakeAggregator {
        fail_with: Option<String>,
        calls: Mutex<Vec<(String, String, String, Vec<String>)>>,
    }

    #[async_trait]
    impl Aggregator for FakeAggregator {
        async fn merge(
            &self,
            query: &str,
            depth: &DepthLabel,
            style: &str,
            summaries: &[LabeledSummary],
        ) -> Result<String> {
            self.calls.lock().unwrap().push((
                query.to_string(),
                depth.to_string(),
                style.to_string(),
                summaries.iter().map(|s| s.text.clone()).collect(),
            ));
            match &self.fail_with {
                Some(reason) => Err(VidsumError::Aggregation(reason.clone())),
                None => Ok(format!("merged {}", summaries.len())),
            }
        }
    }

    async fn collect(orchestrator: &Orchestrator, request: RunRequest) -> Vec<ProgressEvent> {
        orchestrator.run(request).collect().await
    }

    fn terminal_of(events: &[ProgressEvent]) -> &Terminal {
        match events.last() {
            Some(ProgressEvent::Terminal { outcome }) => outcome,
            other => panic!("last event is not terminal: {:?}", other),
        }
    }

    fn assert_stream_invariants(events: &[ProgressEvent]) {
        let terminals = events.iter().filter(|e| e.is_terminal()).count();
        assert_eq!(terminals, 1, "exactly one terminal event");
        assert!(events.last().unwrap().is_terminal(), "terminal is last");

        let counts: Vec<(usize, usize)> = events
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::Counts { completed, total } => Some((*completed, *total)),
                _ => None,
            })
            .collect();
        for pair in counts.windows(2) {
            assert!(pair[0].0 <= pair[1].0, "completed never decreases");
            assert_eq!(pair[0].1, pair[1].1, "total is fixed");
        }
        for (completed, total) in &counts {
            assert!(completed <= total);
        }
        if let Some((completed, total)) = counts.last() {
            assert_eq!(completed, total);
        }

        let stages: Vec<Stage> = events
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::StageChanged { stage } => Some(*stage),
                _ => None,
            })
            .collect();
        for pair in stages.windows(2) {
            assert!(pair[0] < pair[1], "stages only move forward");
        }
    }

    #[tokio::test]
    async fn test_all_items_succeed() {
        let discovery = FakeDiscovery::returning(&["a", "b", "c"]);
        let summarizer = FakeSummarizer::new(&[
            ("a", 5, Ok("A")),
            ("b", 1, Ok("B")),
            ("c", 3, Ok("C")),
        ]);
        let aggregator = Arc::new(FakeAggregator::default());
        let orchestrator =
            Orchestrator::with_components(discovery.clone(), summarizer.clone(), aggregator.clone());

        let events = collect(&orchestrator, RunRequest::new("chess tutorial", 3).unwrap()).await;

        assert_stream_invariants(&events);
        assert_eq!(
            terminal_of(&events),
            &Terminal::FinalSummary {
                text: "merged 3".to_string()
            }
        );
        assert_eq!(
            *discovery.calls.lock().unwrap(),
            vec![("chess tutorial".to_string(), 3u32)]
        );
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 3);

        let calls = aggregator.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "chess tutorial");
        assert_eq!(calls[0].1, "low");
        assert_eq!(calls[0].3, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_discovery_over_return_is_truncated_to_count() {
        let urls: Vec<String> = (0..10).map(|i| format!("u{}", i)).collect();
        let url_refs: Vec<&str> = urls.iter().map(String::as_str).collect();
        let discovery = FakeDiscovery::returning(&url_refs);
        let script: Vec<(&str, u64, std::result::Result<&str, &str>)> =
            url_refs.iter().map(|u| (*u, 0, Ok(*u))).collect();
        let summarizer = FakeSummarizer::new(&script);
        let aggregator = Arc::new(FakeAggregator::default());
        let orchestrator =
            Orchestrator::with_components(discovery, summarizer.clone(), aggregator.clone());

        let events = collect(&orchestrator, RunRequest::new("rust", 3).unwrap()).await;

        assert_stream_invariants(&events);
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 3);
        let totals: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                ProgressEvent::Counts { total, .. } => Some(*total),
                _ => None,
            })
            .collect();
        assert!(!totals.is_empty());
        assert!(totals.iter().all(|t| *t == 3));
        assert_eq!(aggregator.calls.lock().unwrap()[0].3, vec!["u0", "u1", "u2"]);
    }

    #[tokio::test]
    async fn test_execute_finishes_when_receiver_dropped() {
        let discovery = FakeDiscovery::returning(&["a", "b"]);
        let summarizer = FakeSummarizer::new(&[("a", 1, Ok("A")), ("b", 1, Err("no captions"))]);
        let orchestrator = Orchestrator::with_components(
            discovery,
            summarizer,
            Arc::new(FakeAggregator::default()),
        );

        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let outcome = orchestrator
            .execute(RunRequest::new("rust", 2).unwrap(), &tx)
            .await;

        assert_eq!(
            outcome.terminal(),
            Terminal::FinalSummary {
                text: "merged 1".to_string()
            }
        );
        assert_eq!(outcome.items().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_discovery_is_no_results() {
        let discovery = FakeDiscovery::returning(&[]);
        let summarizer = FakeSummarizer::new(&[]);
        let aggregator = Arc::new(FakeAggregator::default());
        let orchestrator =
            Orchestrator::with_components(discovery, summarizer.clone(), aggregator.clone());

        let events = collect(&orchestrator, RunRequest::new("zzqqxx12345", 5).unwrap()).await;

        assert_eq!(
            events,
            vec![
                ProgressEvent::StageChanged {
                    stage: Stage::Discovering
                },
                ProgressEvent::Terminal {
                    outcome: Terminal::NoResults
                },
            ]
        );
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 0);
        assert!(aggregator.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_partial_failure_passes_successes_in_index_order() {
        let discovery = FakeDiscovery::returning(&["v0", "v1", "v2", "v3", "v4"]);
        // v4 settles first and v0 last; reassembly must still follow discovery order.
        let summarizer = FakeSummarizer::new(&[
            ("v0", 40, Ok("first")),
            ("v1", 10, Err("no captions")),
            ("v2", 20, Err("model error")),
            ("v3", 30, Err("invalid locator")),
            ("v4", 1, Ok("fifth")),
        ]);
        let aggregator = Arc::new(FakeAggregator::default());
        let orchestrator =
            Orchestrator::with_components(discovery, summarizer, aggregator.clone());

        let events = collect(&orchestrator, RunRequest::new("rust async", 5).unwrap()).await;

        assert_stream_invariants(&events);
        assert_eq!(
            terminal_of(&events),
            &Terminal::FinalSummary {
                text: "merged 2".to_string()
            }
        );
        let calls = aggregator.calls.lock().unwrap();
        assert_eq!(calls[0].1, "high");
        assert_eq!(calls[0].3, vec!["first", "fifth"]);

        let failed = events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    ProgressEvent::ItemSettled {
                        outcome: ItemOutcome::Failed(_),
                        ..
                    }
                )
            })
            .count();
        assert_eq!(failed, 3);
    }

    #[tokio::test]
    async fn test_index_stable_regardless_of_completion_order() {
        for delays in [[1u64, 10, 20], [20, 10, 1], [10, 1, 20]] {
            let discovery = FakeDiscovery::returning(&["a", "b", "c"]);
            let summarizer = FakeSummarizer::new(&[
                ("a", delays[0], Ok("X")),
                ("b", delays[1], Err("boom")),
                ("c", delays[2], Ok("Z")),
            ]);
            let aggregator = Arc::new(FakeAggregator::default());
            let orchestrator =
                Orchestrator::with_components(discovery, summarizer, aggregator.clone());

            let events = collect(&orchestrator, RunRequest::new("q", 3).unwrap()).await;
            assert_stream_invariants(&events);
            assert_eq!(aggregator.calls.lock().unwrap()[0].3, vec!["X", "Z"]);
        }
    }

    #[tokio::test]
    async fn test_all_items_fail_is_no_results_without_merge() {
        let discovery = FakeDiscovery::returning(&["a", "b"]);
        let summarizer = FakeSummarizer::new(&[("a", 1, Err("x")), ("b", 2, Err("y"))]);
        let aggregator = Arc::new(FakeAggregator::default());
        let orchestrator =
            Orchestrator::with_components(discovery, summarizer, aggregator.clone());

        let events = collect(&orchestrator, RunRequest::new("obscure", 2).unwrap()).await;

        assert_stream_invariants(&events);
        assert_eq!(terminal_of(&events), &Terminal::NoResults);
        assert!(aggregator.calls.lock().unwrap().is_empty());
        assert!(!events.iter().any(|e| matches!(
            e,
            ProgressEvent::StageChanged {
                stage: Stage::Aggregating
            }
        )));
    }

    #[tokio::test]
    async fn test_discovery_error_aborts_before_fan_out() {
        let discovery = FakeDiscovery::failing("upstream 500");
        let summarizer = FakeSummarizer::new(&[]);
        let aggregator = Arc::new(FakeAggregator::default());
        let orchestrator =
            Orchestrator::with_components(discovery, summarizer.clone(), aggregator.clone());

        let events = collect(&orchestrator, RunRequest::new("chess", 3).unwrap()).await;

        assert_stream_invariants(&events);
        match terminal_of(&events) {
            Terminal::Error { reason } => assert!(reason.contains("upstream 500")),
            other => panic!("expected error, got {:?}", other),
        }
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 0);
        assert!(aggregator.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_aggregation_error_is_terminal_error() {
        let discovery = FakeDiscovery::returning(&["a"]);
        let summarizer = FakeSummarizer::new(&[("a", 0, Ok("A"))]);
        let aggregator = Arc::new(FakeAggregator {
            fail_with: Some("model overloaded".to_string()),
            ..Default::default()
        });
        let orchestrator = Orchestrator::with_components(discovery, summarizer, aggregator);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let outcome = orchestrator
            .execute(RunRequest::new("q", 1).unwrap(), &tx)
            .await;

        match &outcome {
            RunOutcome::Aborted { reason, items } => {
                assert!(reason.contains("model overloaded"));
                assert_eq!(items, &vec![ItemOutcome::Succeeded("A".to_string())]);
            }
            other => panic!("expected aborted, got {:?}", other),
        }

        drop(tx);
        let mut last = None;
        while let Some(event) = rx.recv().await {
            last = Some(event);
        }
        assert_eq!(
            last,
            Some(ProgressEvent::Terminal {
                outcome: outcome.terminal()
            })
        );
    }

    #[tokio::test]
    async fn test_depth_is_clamped_and_labelled_independently() {
        let discovery = FakeDiscovery::returning(&["a"]);
        let summarizer = FakeSummarizer::new(&[("a", 0, Ok("A"))]);
        let aggregator = Arc::new(FakeAggregator::default());
        let orchestrator =
            Orchestrator::with_components(discovery.clone(), summarizer, aggregator.clone())
                .with_depth_policy(|depth: i64| DepthLabel::new(format!("depth-{}", depth)));

        collect(&orchestrator, RunRequest::new("q", 400).unwrap()).await;
        collect(&orchestrator, RunRequest::new("q", -4).unwrap()).await;

        let searches = discovery.calls.lock().unwrap();
        assert_eq!(searches[0].1, 50);
        assert_eq!(searches[1].1, 1);

        let merges = aggregator.calls.lock().unwrap();
        assert_eq!(merges[0].1, "depth-400");
        assert_eq!(merges[1].1, "depth--4");
    }

    #[tokio::test]
    async fn test_blank_style_uses_default() {
        let discovery = FakeDiscovery::returning(&["a"]);
        let summarizer = FakeSummarizer::new(&[("a", 0, Ok("A"))]);
        let aggregator = Arc::new(FakeAggregator::default());
        let orchestrator =
            Orchestrator::with_components(discovery, summarizer.clone(), aggregator.clone())
                .with_default_style("house style");

        collect(&orchestrator, RunRequest::new("q", 1).unwrap().with_style("   ")).await;
        collect(&orchestrator, RunRequest::new("q", 1).unwrap().with_style("bullet points")).await;

        let styles = summarizer.styles.lock().unwrap();
        assert_eq!(styles.as_slice(), &["house style", "bullet points"]);
        let merges = aggregator.calls.lock().unwrap();
        assert_eq!(merges[0].2, "house style");
    }

    #[tokio::test]
    async fn test_run_is_lazy() {
        let discovery = FakeDiscovery::returning(&["a"]);
        let summarizer = FakeSummarizer::new(&[("a", 0, Ok("A"))]);
        let aggregator = Arc::new(FakeAggregator::default());
        let orchestrator =
            Orchestrator::with_components(discovery.clone(), summarizer, aggregator);

        let stream = orchestrator.run(RunRequest::new("q", 1).unwrap());
        tokio::task::yield_now().await;
        assert!(discovery.calls.lock().unwrap().is_empty());

        let events: Vec<_> = stream.collect().await;
        assert_eq!(discovery.calls.lock().unwrap().len(), 1);
        assert_stream_invariants(&events);
    }

    #[test]
    fn test_empty_query_rejected() {
        tokio_test::assert_err!(RunRequest::new("   ", 5));
        tokio_test::assert_ok!(RunRequest::new("chess", 5));
    }
}
