//! Phase timing and item counts
//!
//! Every phase of a run appends a [`MetricEvent`]. Events are always recorded;
//! they are only logged when verbose logging is enabled.

use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// One phase-labelled measurement
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricEvent {
    pub phase: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Milliseconds since the collector was created
    pub relative_ms: f64,
}

/// External sink for metric events
pub trait MetricsListener: Send {
    fn on_event(&mut self, event: &MetricEvent);
}

impl<F> MetricsListener for F
where
    F: FnMut(&MetricEvent) + Send,
{
    fn on_event(&mut self, event: &MetricEvent) {
        self(event)
    }
}

/// Append-only event stream of a run
pub struct MetricsCollector {
    started: Instant,
    verbose: bool,
    events: Vec<MetricEvent>,
    listener: Option<Box<dyn MetricsListener>>,
}

impl MetricsCollector {
    pub fn new(verbose: bool) -> Self {
        Self {
            started: Instant::now(),
            verbose,
            events: Vec::new(),
            listener: None,
        }
    }

    /// Forward every subsequent event to `listener`
    pub fn with_listener(mut self, listener: impl MetricsListener + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    /// Record a timed phase
    pub fn record(&mut self, phase: &str, elapsed: Duration, item_count: Option<usize>) {
        self.push(MetricEvent {
            phase: phase.to_string(),
            elapsed_ms: Some(elapsed.as_secs_f64() * 1000.0),
            item_count,
            detail: None,
            relative_ms: self.relative_ms(),
        });
    }

    /// Record an untimed note
    pub fn note(&mut self, phase: &str, detail: impl Into<String>) {
        self.push(MetricEvent {
            phase: phase.to_string(),
            elapsed_ms: None,
            item_count: None,
            detail: Some(detail.into()),
            relative_ms: self.relative_ms(),
        });
    }

    pub fn events(&self) -> &[MetricEvent] {
        &self.events
    }

    fn relative_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    fn push(&mut self, event: MetricEvent) {
        if self.verbose {
            tracing::info!(
                phase = %event.phase,
                elapsed_ms = ?event.elapsed_ms,
                items = ?event.item_count,
                detail = ?event.detail,
                "metric"
            );
        }
        if let Some(listener) = self.listener.as_mut() {
            listener.on_event(&event);
        }
        self.events.push(event);
    }
}

impl std::fmt::Debug for MetricsCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsCollector")
            .field("verbose", &self.verbose)
            .field("events", &self.events)
            .field("listener", &self.listener.is_some())
            .finish()
    }
}

/// Summary of a finished run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationReport {
    pub output_dir: PathBuf,
    pub files: Vec<PathBuf>,
    pub events: Vec<MetricEvent>,
    /// Non-fatal formatter diagnostics
    pub warnings: Vec<String>,
    pub total_ms: f64,
}

impl GenerationReport {
    /// Item count reported for a phase, if any
    pub fn items(&self, phase: &str) -> Option<usize> {
        self.events
            .iter()
            .find(|e| e.phase == phase)
            .and_then(|e| e.item_count)
    }
}
