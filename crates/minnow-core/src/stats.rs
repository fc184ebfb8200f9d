use serde::Serialize;
use std::time::Duration;
use tracing::info;

/// Counters and timings for one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub identifier_count: usize,
    pub renamed_count: usize,
    #[serde(serialize_with = "as_millis")]
    pub mangle_time: Duration,
    pub whitespace_before: usize,
    pub whitespace_after: usize,
    #[serde(serialize_with = "as_millis")]
    pub whitespace_time: Duration,
}

fn as_millis<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64() * 1000.0)
}

impl Statistics {
    /// Share of the input removed by compaction, in percent.
    pub fn whitespace_reduction(&self) -> f64 {
        if self.whitespace_before == 0 {
            return 0.0;
        }
        let removed = self.whitespace_before.saturating_sub(self.whitespace_after);
        removed as f64 * 100.0 / self.whitespace_before as f64
    }

    /// Emit the statistics as `info` events.
    pub fn report(&self, file: &str) {
        info!("minify statistics for {file}");
        info!("  Minify time:           {:>10.2?}", self.mangle_time);
        info!("  Total identifiers:     {:>10}", self.identifier_count);
        info!("  Identifiers shortened: {:>10}", self.renamed_count);
        if self.whitespace_before > 0 {
            info!("  Whitespace time:       {:>10.2?}", self.whitespace_time);
            info!(
                "  Bytes:                 {:>10} -> {} ({:.1}% smaller)",
                self.whitespace_before,
                self.whitespace_after,
                self.whitespace_reduction()
            );
        }
    }
}
