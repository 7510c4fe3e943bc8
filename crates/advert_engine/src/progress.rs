use std::fmt;
use std::path::PathBuf;

use advert_core::Summary;
use advert_logging::{scrape_debug, scrape_error, scrape_info, scrape_warn};
use log::Level;

use crate::{FetchError, Stage};

const RULE: &str = "==================================================";

/// Everything the scraper reports while it runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeEvent {
    RunStarted {
        selected: usize,
        start: usize,
        total_rows: usize,
    },
    RowSkipped {
        row_index: usize,
    },
    JobStarted {
        row_index: usize,
        label: String,
    },
    StageChanged {
        row_index: usize,
        stage: Stage,
    },
    FetchFailed {
        row_index: usize,
        url: String,
        error: FetchError,
    },
    PageSaved {
        row_index: usize,
        path: PathBuf,
    },
    PageSaveFailed {
        row_index: usize,
        path: PathBuf,
        message: String,
    },
    AttachmentsFound {
        row_index: usize,
        count: usize,
    },
    AttachmentDownloaded {
        row_index: usize,
        filename: String,
        size_bytes: u64,
    },
    AttachmentFailed {
        row_index: usize,
        url: String,
        message: String,
    },
    JobFinished {
        row_index: usize,
        success: bool,
        attachments: usize,
    },
    Checkpointed {
        path: PathBuf,
        jobs: usize,
    },
    CheckpointFailed {
        message: String,
    },
    Completed {
        summary: Summary,
        output_dir: PathBuf,
    },
}

impl ScrapeEvent {
    pub fn level(&self) -> Level {
        match self {
            ScrapeEvent::RowSkipped { .. } => Level::Warn,
            ScrapeEvent::FetchFailed { .. }
            | ScrapeEvent::PageSaveFailed { .. }
            | ScrapeEvent::AttachmentFailed { .. }
            | ScrapeEvent::CheckpointFailed { .. } => Level::Error,
            ScrapeEvent::StageChanged { .. } | ScrapeEvent::AttachmentsFound { .. } => {
                Level::Debug
            }
            _ => Level::Info,
        }
    }
}

impl fmt::Display for ScrapeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrapeEvent::RunStarted {
                selected,
                start,
                total_rows,
            } => write!(
                f,
                "Scraping {selected} jobs (starting from {start}, total: {total_rows})"
            ),
            ScrapeEvent::RowSkipped { row_index } => {
                write!(f, "[{row_index}] Skipping row with no URL")
            }
            ScrapeEvent::JobStarted { row_index, label } => {
                write!(f, "[{row_index}] Scraping: {label}")
            }
            ScrapeEvent::StageChanged { row_index, stage } => {
                write!(f, "[{row_index}] stage: {stage}")
            }
            ScrapeEvent::FetchFailed {
                row_index,
                url,
                error,
            } => write!(
                f,
                "[{row_index}] Failed to fetch {url} ({}): {error}",
                error.kind.tag()
            ),
            ScrapeEvent::PageSaved { row_index, path } => {
                write!(f, "[{row_index}] Saved page to {}", path.display())
            }
            ScrapeEvent::PageSaveFailed {
                row_index,
                path,
                message,
            } => write!(
                f,
                "[{row_index}] Failed to save page to {}: {message}",
                path.display()
            ),
            ScrapeEvent::AttachmentsFound { row_index, count } => {
                write!(f, "[{row_index}] Found {count} attachment link(s)")
            }
            ScrapeEvent::AttachmentDownloaded {
                row_index,
                filename,
                size_bytes,
            } => write!(f, "[{row_index}] Downloaded: {filename} ({size_bytes} bytes)"),
            ScrapeEvent::AttachmentFailed {
                row_index,
                url,
                message,
            } => write!(f, "[{row_index}] Failed to download {url}: {message}"),
            ScrapeEvent::JobFinished {
                row_index,
                success,
                attachments,
            } => {
                let outcome = if *success { "done" } else { "failed" };
                write!(f, "[{row_index}] Job {outcome} ({attachments} attachment(s))")
            }
            ScrapeEvent::Checkpointed { path, jobs } => {
                write!(f, "Saved {jobs} results to {}", path.display())
            }
            ScrapeEvent::CheckpointFailed { message } => {
                write!(f, "Failed to save results: {message}")
            }
            ScrapeEvent::Completed {
                summary,
                output_dir,
            } => {
                writeln!(f, "{RULE}")?;
                writeln!(f, "SCRAPING COMPLETE")?;
                writeln!(f, "{RULE}")?;
                writeln!(f, "Total jobs processed: {}", summary.total_jobs)?;
                writeln!(f, "Successful: {}", summary.successful)?;
                writeln!(f, "Failed: {}", summary.failed)?;
                writeln!(f, "Attachments downloaded: {}", summary.total_attachments)?;
                for url in &summary.failed_urls {
                    writeln!(f, "Failed URL: {url}")?;
                }
                write!(f, "Results saved to: {}", output_dir.display())
            }
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ScrapeEvent);
}

/// Renders every event as log lines through the shared logging macros.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn emit(&self, event: ScrapeEvent) {
        let text = event.to_string();
        for line in text.lines() {
            match event.level() {
                Level::Error => scrape_error!("{}", line),
                Level::Warn => scrape_warn!("{}", line),
                Level::Info => scrape_info!("{}", line),
                Level::Debug | Level::Trace => scrape_debug!("{}", line),
            }
        }
    }
}
