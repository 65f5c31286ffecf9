//! `tracing` subscriber installation.

use std::time::Instant;

use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor an explicit directive is given.
const DEFAULT_FILTER: &str = "fieldmap=info";

/// Installs a global fmt subscriber filtered by `filter`.
///
/// `RUST_LOG` takes precedence over `filter`; without either the default is
/// `fieldmap=info`. Returns false if a global subscriber was already set, in
/// which case nothing changes.
pub fn init_logging(filter: Option<&str>) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter.unwrap_or(DEFAULT_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

/// Measures how long a mapper took to synthesize.
#[derive(Debug)]
pub struct SynthesisTimer {
    start: Instant,
    record: &'static str,
}

impl SynthesisTimer {
    /// Starts timing the synthesis of `record`.
    #[must_use]
    pub fn start(record: &'static str) -> Self {
        Self {
            start: Instant::now(),
            record,
        }
    }

    /// Returns the record being synthesized.
    #[must_use]
    pub const fn record(&self) -> &'static str {
        self.record
    }

    /// Returns the elapsed time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging(Some("fieldmap=debug"));
        assert!(!init_logging(Some("fieldmap=trace")));
    }

    #[test]
    fn test_timer() {
        let timer = SynthesisTimer::start("Poco");
        assert_eq!(timer.record(), "Poco");
        assert!(timer.elapsed_ms() >= 0.0);
    }
}
