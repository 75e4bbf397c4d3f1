use std::time::Instant;

/// Cross-cutting logger for pipeline progress.
///
/// Keeps the use cases free of output concerns: stdout belongs to the final
/// report, so progress goes wherever the caller's logger sends it.
pub trait PipelineLogger {
    /// Record how long a named pipeline stage took.
    fn timing(&mut self, stage: &str, duration_ms: f64);

    /// Log a human-readable status message.
    fn info(&mut self, message: &str);

    /// Emit an end-of-pipeline summary. Default: no-op.
    fn summary(&self) {}
}

/// Silent logger that discards all events.
pub struct NullPipelineLogger;

impl PipelineLogger for NullPipelineLogger {
    fn timing(&mut self, _stage: &str, _duration_ms: f64) {}
    fn info(&mut self, _message: &str) {}
}

/// Logger that forwards messages to the `log` facade and keeps stage
/// timings, in execution order, for a closing summary.
pub struct LogPipelineLogger {
    timings: Vec<(String, f64)>,
    start_time: Instant,
}

impl LogPipelineLogger {
    pub fn new() -> Self {
        Self {
            timings: Vec::new(),
            start_time: Instant::now(),
        }
    }

    /// Returns the formatted summary string, or `None` if no stage ran.
    pub fn summary_string(&self) -> Option<String> {
        if self.timings.is_empty() {
            return None;
        }

        let elapsed_ms = self.start_time.elapsed().as_secs_f64() * 1000.0;
        let mut lines = vec![format!("Analysis summary ({elapsed_ms:.1}ms total):")];
        for (stage, ms) in &self.timings {
            let pct = if elapsed_ms > 0.0 {
                ms / elapsed_ms * 100.0
            } else {
                0.0
            };
            lines.push(format!("  {stage:12}: {ms:8.1}ms  ({pct:4.1}%)"));
        }
        Some(lines.join("\n"))
    }

    pub fn timings(&self) -> &[(String, f64)] {
        &self.timings
    }
}

impl Default for LogPipelineLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineLogger for LogPipelineLogger {
    fn timing(&mut self, stage: &str, duration_ms: f64) {
        log::debug!("{stage} took {duration_ms:.1}ms");
        self.timings.push((stage.to_string(), duration_ms));
    }

    fn info(&mut self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::debug!("\n{text}");
        }
    }
}
