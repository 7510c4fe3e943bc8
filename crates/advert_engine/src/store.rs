use std::path::{Path, PathBuf};

use advert_core::{JobRecord, Summary};

use crate::persist::{ensure_dir, replace_file, write_json, PersistError};

pub const PAGES_DIR: &str = "pages";
pub const ATTACHMENTS_DIR: &str = "attachments";
pub const RESULTS_FILENAME: &str = "scrape_results.json";
pub const SUMMARY_FILENAME: &str = "summary.json";

/// Where every artifact of a run lives, relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the root, `pages/` and `attachments/` directories.
    pub fn prepare(&self) -> Result<(), PersistError> {
        for dir in [self.root.clone(), self.pages_dir(), self.attachments_dir()] {
            ensure_dir(&dir)?;
        }
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn pages_dir(&self) -> PathBuf {
        self.root.join(PAGES_DIR)
    }

    pub fn attachments_dir(&self) -> PathBuf {
        self.root.join(ATTACHMENTS_DIR)
    }

    /// `pages/<advertId>_<safeTitle>.html`
    pub fn page_filename(advert_id: &str, safe_title: &str) -> String {
        format!("{advert_id}_{safe_title}.html")
    }

    /// Write the raw page, replacing the copy from any earlier run.
    pub fn save_page(
        &self,
        advert_id: &str,
        safe_title: &str,
        html: &str,
    ) -> Result<PathBuf, PersistError> {
        let dir = self.pages_dir();
        ensure_dir(&dir)?;
        let path = dir.join(Self::page_filename(advert_id, safe_title));
        replace_file(&path, html.as_bytes())?;
        Ok(path)
    }

    /// `attachments/<advertId>_<safeTitle>/`
    pub fn job_attachment_dir(&self, advert_id: &str, safe_title: &str) -> PathBuf {
        self.attachments_dir()
            .join(format!("{advert_id}_{safe_title}"))
    }

    pub fn results_path(&self) -> PathBuf {
        self.root.join(RESULTS_FILENAME)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.root.join(SUMMARY_FILENAME)
    }
}

/// Persists accumulated job records and the end-of-run summary.
#[derive(Debug, Clone)]
pub struct ProgressStore {
    results_path: PathBuf,
    summary_path: PathBuf,
}

impl ProgressStore {
    pub fn new(layout: &OutputLayout) -> Self {
        Self {
            results_path: layout.results_path(),
            summary_path: layout.summary_path(),
        }
    }

    /// Rewrite `scrape_results.json` with every record so far.
    pub fn checkpoint(&self, records: &[JobRecord]) -> Result<PathBuf, PersistError> {
        write_json(&self.results_path, records)?;
        Ok(self.results_path.clone())
    }

    /// Derive the summary from `records` and write `summary.json`.
    pub fn write_summary(
        &self,
        records: &[JobRecord],
        timestamp: impl Into<String>,
    ) -> Result<Summary, PersistError> {
        let summary = Summary::from_records(records, timestamp);
        write_json(&self.summary_path, &summary)?;
        Ok(summary)
    }
}
