//! Advert engine: fetching, extraction, downloads and run persistence.
mod attachments;
mod batch;
mod config;
mod decode;
mod download;
mod engine;
mod extract;
mod fetch;
mod persist;
mod progress;
mod store;
mod types;

pub use attachments::{
    detect_attachments, has_document_extension, is_attachment_link, mentions_download,
    references_document_file, AttachmentLink, ATTACHMENT_EXTENSIONS,
};
pub use batch::{BatchDriver, BatchReport, ScrapeError};
pub use config::{
    local_clock, BatchOptions, Clock, ScraperConfig, ATTACHMENT_DELAY, DEFAULT_OUTPUT_DIR,
    DEFAULT_REQUEST_DELAY,
};
pub use decode::{decode_html, DecodedHtml};
pub use download::{
    extension_for_content_type, filename_from_content_disposition, filename_from_url,
    prefixed_filename, resolve_filename, AttachmentDownloader, DownloadError, DownloadedFile,
};
pub use engine::JobScraper;
pub use extract::{parse_section, Extractor, JobPageExtractor};
pub use fetch::{build_http_client, FetchSettings, Fetcher, ReqwestFetcher};
pub use persist::{ensure_dir, replace_file, write_json, PersistError};
pub use progress::{LogProgressSink, ProgressSink, ScrapeEvent};
pub use store::{
    OutputLayout, ProgressStore, ATTACHMENTS_DIR, PAGES_DIR, RESULTS_FILENAME, SUMMARY_FILENAME,
};
pub use types::{FailureKind, FetchError, FetchMetadata, FetchOutput, Stage};
