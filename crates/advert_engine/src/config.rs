use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use advert_core::{CheckpointPolicy, RowWindow};

use crate::fetch::FetchSettings;

pub const DEFAULT_OUTPUT_DIR: &str = "scraped_jobs";
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(1500);
pub const ATTACHMENT_DELAY: Duration = Duration::from_millis(500);

/// Produces the timestamp written into the run summary.
pub type Clock = Arc<dyn Fn() -> String + Send + Sync>;

pub fn local_clock() -> Clock {
    Arc::new(|| chrono::Local::now().to_rfc3339())
}

/// Settings that stay fixed for the lifetime of a scraper.
#[derive(Clone)]
pub struct ScraperConfig {
    pub output_dir: PathBuf,
    pub fetch: FetchSettings,
    pub attachment_delay: Duration,
    pub checkpoint: CheckpointPolicy,
    pub clock: Clock,
}

impl ScraperConfig {
    pub fn default_with_output(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            fetch: FetchSettings::default(),
            attachment_delay: ATTACHMENT_DELAY,
            checkpoint: CheckpointPolicy::default(),
            clock: local_clock(),
        }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self::default_with_output(DEFAULT_OUTPUT_DIR)
    }
}

impl fmt::Debug for ScraperConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScraperConfig")
            .field("output_dir", &self.output_dir)
            .field("fetch", &self.fetch)
            .field("attachment_delay", &self.attachment_delay)
            .field("checkpoint", &self.checkpoint)
            .finish_non_exhaustive()
    }
}

/// Per-run selection and pacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    pub window: RowWindow,
    /// Pause after every job, whatever its outcome.
    pub request_delay: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            window: RowWindow::default(),
            request_delay: DEFAULT_REQUEST_DELAY,
        }
    }
}
