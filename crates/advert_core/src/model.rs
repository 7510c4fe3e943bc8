use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One row of the tabular input, as produced by the row source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InputRow {
    /// 0-based position of the data row in the source.
    pub row_index: usize,
    pub url: Option<String>,
    pub title: Option<String>,
}

impl InputRow {
    pub fn new(row_index: usize, url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            row_index,
            url: Some(url.into()),
            title: Some(title.into()),
        }
    }

    /// Trimmed URL, or `None` when the cell is missing or blank.
    pub fn usable_url(&self) -> Option<&str> {
        self.url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Trimmed title, empty when missing.
    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().map(str::trim).unwrap_or("")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Content {
    pub title: String,
    pub full_text: String,
    /// Labelled `Label: Value` pairs; later duplicate labels overwrite earlier ones.
    pub sections: BTreeMap<String, String>,
}

/// A successfully downloaded attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRecord {
    /// Page the link was discovered on.
    pub source_url: String,
    pub link_text: String,
    pub resolved_filename: String,
    pub storage_path: String,
    pub size_bytes: u64,
    /// Absolute URL that was downloaded.
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub url: String,
    pub job_title: String,
    pub row_index: usize,
    pub success: bool,
    pub error: Option<String>,
    pub content: Content,
    pub attachments: Vec<AttachmentRecord>,
    pub page_artifact_path: Option<String>,
}

impl JobRecord {
    pub fn new(row_index: usize, url: impl Into<String>, job_title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            job_title: job_title.into(),
            row_index,
            success: false,
            error: None,
            content: Content::default(),
            attachments: Vec::new(),
            page_artifact_path: None,
        }
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.success = false;
        self.error = Some(error.into());
    }
}
