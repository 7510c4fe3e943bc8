use std::sync::Arc;

use advert_core::{CheckpointPolicy, InputRow, JobRecord, Summary};

use crate::config::{BatchOptions, Clock, ScraperConfig};
use crate::engine::JobScraper;
use crate::persist::PersistError;
use crate::progress::{ProgressSink, ScrapeEvent};
use crate::store::ProgressStore;
use crate::FetchError;

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("failed to set up http session: {0}")]
    Session(#[from] FetchError),
    #[error("failed to persist results: {0}")]
    Persist(#[from] PersistError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub records: Vec<JobRecord>,
    pub summary: Summary,
}

/// Walks the selected input rows one at a time, checkpointing as it goes.
pub struct BatchDriver {
    scraper: JobScraper,
    store: ProgressStore,
    checkpoint: CheckpointPolicy,
    clock: Clock,
    sink: Arc<dyn ProgressSink>,
}

impl BatchDriver {
    /// Prepare the output tree and the HTTP session.
    pub fn new(config: &ScraperConfig, sink: Arc<dyn ProgressSink>) -> Result<Self, ScrapeError> {
        let scraper = JobScraper::new(config, sink.clone())?;
        scraper.layout().prepare()?;
        Ok(Self::from_scraper(scraper, config, sink))
    }

    pub fn from_scraper(
        scraper: JobScraper,
        config: &ScraperConfig,
        sink: Arc<dyn ProgressSink>,
    ) -> Self {
        let store = ProgressStore::new(scraper.layout());
        Self {
            scraper,
            store,
            checkpoint: config.checkpoint,
            clock: config.clock.clone(),
            sink,
        }
    }

    /// Process the rows selected by `options.window`. Per-job failures end up
    /// in the records; only the final checkpoint or summary write can fail the run.
    pub async fn run(
        &self,
        rows: &[InputRow],
        options: &BatchOptions,
    ) -> Result<BatchReport, ScrapeError> {
        let selected = options.window.apply(rows);
        self.sink.emit(ScrapeEvent::RunStarted {
            selected: selected.len(),
            start: options.window.start,
            total_rows: rows.len(),
        });

        let mut records: Vec<JobRecord> = Vec::new();
        for row in selected {
            let Some(url) = row.usable_url() else {
                self.sink.emit(ScrapeEvent::RowSkipped {
                    row_index: row.row_index,
                });
                continue;
            };

            let record = self
                .scraper
                .scrape_job(row.row_index, url, row.title_or_empty())
                .await;
            records.push(record);

            if self.checkpoint.is_due(records.len()) {
                if let Err(err) = self.save(&records) {
                    self.sink.emit(ScrapeEvent::CheckpointFailed {
                        message: err.to_string(),
                    });
                }
            }

            tokio::time::sleep(options.request_delay).await;
        }

        self.save(&records)?;
        let summary = self.store.write_summary(&records, (self.clock)())?;
        self.sink.emit(ScrapeEvent::Completed {
            summary: summary.clone(),
            output_dir: self.scraper.layout().root().to_path_buf(),
        });

        Ok(BatchReport { records, summary })
    }

    fn save(&self, records: &[JobRecord]) -> Result<(), PersistError> {
        let path = self.store.checkpoint(records)?;
        self.sink.emit(ScrapeEvent::Checkpointed {
            path,
            jobs: records.len(),
        });
        Ok(())
    }
}
