use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use advert_core::{advert_id, sanitize_filename, AttachmentRecord, Content, JobRecord};
use scraper::Html;

use crate::attachments::{detect_attachments, AttachmentLink};
use crate::decode::decode_html;
use crate::download::AttachmentDownloader;
use crate::extract::{Extractor, JobPageExtractor};
use crate::fetch::{build_http_client, Fetcher, ReqwestFetcher};
use crate::progress::{ProgressSink, ScrapeEvent};
use crate::store::OutputLayout;
use crate::{FetchError, ScraperConfig, Stage};

/// Runs the per-job pipeline: fetch, save page, extract, detect and download
/// attachments. Only a failed fetch marks a job as failed.
pub struct JobScraper {
    fetcher: Arc<dyn Fetcher>,
    extractor: Box<dyn Extractor>,
    downloader: AttachmentDownloader,
    layout: OutputLayout,
    attachment_delay: Duration,
    sink: Arc<dyn ProgressSink>,
}

impl JobScraper {
    /// Scraper with one shared HTTP session for pages and attachments.
    pub fn new(config: &ScraperConfig, sink: Arc<dyn ProgressSink>) -> Result<Self, FetchError> {
        let client = build_http_client(&config.fetch)?;
        Ok(Self {
            fetcher: Arc::new(ReqwestFetcher::new(client.clone())),
            extractor: Box::new(JobPageExtractor),
            downloader: AttachmentDownloader::new(client),
            layout: OutputLayout::new(config.output_dir.clone()),
            attachment_delay: config.attachment_delay,
            sink,
        })
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn layout(&self) -> &OutputLayout {
        &self.layout
    }

    pub async fn scrape_job(&self, row_index: usize, url: &str, job_title: &str) -> JobRecord {
        let mut record = JobRecord::new(row_index, url, job_title);
        let advert = advert_id(url);
        let safe_title = if job_title.trim().is_empty() {
            format!("job_{advert}")
        } else {
            sanitize_filename(job_title)
        };

        let label = if job_title.trim().is_empty() {
            url
        } else {
            job_title
        };
        self.emit(ScrapeEvent::JobStarted {
            row_index,
            label: label.to_string(),
        });

        self.stage(row_index, Stage::Fetching);
        let output = match self.fetcher.fetch(url).await {
            Ok(output) => output,
            Err(error) => {
                record.fail(format!("Failed to fetch page: {error}"));
                self.emit(ScrapeEvent::FetchFailed {
                    row_index,
                    url: url.to_string(),
                    error,
                });
                self.finish(&record);
                return record;
            }
        };
        let decoded = decode_html(&output.bytes, output.metadata.content_type.as_deref());

        record.page_artifact_path = self.save_page(row_index, &advert, &safe_title, &decoded.html);

        self.stage(row_index, Stage::Extracting);
        let (content, links) = self.extract(&decoded.html, &output.metadata.final_url);
        record.content = content;

        if !links.is_empty() {
            self.emit(ScrapeEvent::AttachmentsFound {
                row_index,
                count: links.len(),
            });
            self.stage(row_index, Stage::Downloading);
            let dir = self.layout.job_attachment_dir(&advert, &safe_title);
            record.attachments = self
                .download_all(row_index, url, &links, &dir, &advert)
                .await;
        }

        record.success = true;
        self.stage(row_index, Stage::Done);
        self.finish(&record);
        record
    }

    /// Parsing stays synchronous; the document tree never lives across an await.
    fn extract(&self, html: &str, base_url: &str) -> (Content, Vec<AttachmentLink>) {
        let doc = Html::parse_document(html);
        let content = self.extractor.extract(&doc);
        let links = detect_attachments(&doc, base_url);
        (content, links)
    }

    fn save_page(
        &self,
        row_index: usize,
        advert: &str,
        safe_title: &str,
        html: &str,
    ) -> Option<String> {
        match self.layout.save_page(advert, safe_title, html) {
            Ok(path) => {
                self.emit(ScrapeEvent::PageSaved {
                    row_index,
                    path: path.clone(),
                });
                Some(path.display().to_string())
            }
            Err(err) => {
                self.emit(ScrapeEvent::PageSaveFailed {
                    row_index,
                    path: self
                        .layout
                        .pages_dir()
                        .join(OutputLayout::page_filename(advert, safe_title)),
                    message: err.to_string(),
                });
                None
            }
        }
    }

    async fn download_all(
        &self,
        row_index: usize,
        page_url: &str,
        links: &[AttachmentLink],
        dir: &Path,
        advert: &str,
    ) -> Vec<AttachmentRecord> {
        if let Err(err) = tokio::fs::create_dir_all(dir).await {
            for link in links {
                self.emit(ScrapeEvent::AttachmentFailed {
                    row_index,
                    url: link.url.clone(),
                    message: format!("cannot create {}: {err}", dir.display()),
                });
            }
            return Vec::new();
        }

        let mut records = Vec::with_capacity(links.len());
        for link in links {
            tokio::time::sleep(self.attachment_delay).await;
            match self.downloader.download(&link.url, dir, advert).await {
                Ok(file) => {
                    self.emit(ScrapeEvent::AttachmentDownloaded {
                        row_index,
                        filename: file.filename.clone(),
                        size_bytes: file.size_bytes,
                    });
                    records.push(AttachmentRecord {
                        source_url: page_url.to_string(),
                        link_text: link.link_text.clone(),
                        resolved_filename: file.filename,
                        storage_path: file.path.display().to_string(),
                        size_bytes: file.size_bytes,
                        url: file.url,
                    });
                }
                Err(err) => self.emit(ScrapeEvent::AttachmentFailed {
                    row_index,
                    url: link.url.clone(),
                    message: err.to_string(),
                }),
            }
        }
        records
    }

    fn stage(&self, row_index: usize, stage: Stage) {
        self.emit(ScrapeEvent::StageChanged { row_index, stage });
    }

    fn finish(&self, record: &JobRecord) {
        self.emit(ScrapeEvent::JobFinished {
            row_index: record.row_index,
            success: record.success,
            attachments: record.attachments.len(),
        });
    }

    fn emit(&self, event: ScrapeEvent) {
        self.sink.emit(event);
    }
}
