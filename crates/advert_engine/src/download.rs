use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use advert_core::sanitize_filename;
use futures_util::StreamExt;
use percent_encoding::percent_decode_str;
use regex::Regex;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use url::Url;

use crate::fetch::{map_reqwest_error, send_get};
use crate::FetchError;

// Quoted values run to the closing quote; bare and `filename*` values stop at `;`.
static DISPOSITION_FILENAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)filename\*?\s*=\s*(?:"([^"]*)"|(?:[\w-]+'[\w-]*')?([^";\r\n]+))"#)
        .unwrap()
});

const FALLBACK_STEM: &str = "attachment";

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("{0}")]
    Fetch(#[from] FetchError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// A file written to disk by [`AttachmentDownloader::download`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    pub filename: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct AttachmentDownloader {
    client: reqwest::Client,
}

impl AttachmentDownloader {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Stream `url` into `dest_dir` as `<prefix>_<name>`, never replacing an
    /// existing file. A failed transfer leaves nothing behind.
    pub async fn download(
        &self,
        url: &str,
        dest_dir: &Path,
        prefix: &str,
    ) -> Result<DownloadedFile, DownloadError> {
        let response = send_get(&self.client, url).await?;

        let disposition = header_str(&response, CONTENT_DISPOSITION);
        let content_type = header_str(&response, CONTENT_TYPE);
        let raw_name = resolve_filename(disposition.as_deref(), url, content_type.as_deref());
        let target_name = prefixed_filename(&raw_name, prefix);

        let (mut file, path) = create_unique_file(dest_dir, &target_name).await?;

        let size_bytes = match stream_to_file(response, &mut file).await {
            Ok(size) => size,
            Err(err) => {
                drop(file);
                let _ = fs::remove_file(&path).await;
                return Err(err);
            }
        };

        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or(target_name);
        Ok(DownloadedFile {
            filename,
            path,
            size_bytes,
            url: url.to_string(),
        })
    }
}

async fn stream_to_file(response: reqwest::Response, file: &mut File) -> Result<u64, DownloadError> {
    let mut size_bytes: u64 = 0;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(map_reqwest_error)?;
        file.write_all(&chunk).await?;
        size_bytes += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(size_bytes)
}

fn header_str(response: &reqwest::Response, name: reqwest::header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Unsanitized name for a download, in priority order: Content-Disposition,
/// URL path basename, then `attachment<ext>` from the content type.
pub fn resolve_filename(
    content_disposition: Option<&str>,
    url: &str,
    content_type: Option<&str>,
) -> String {
    content_disposition
        .and_then(filename_from_content_disposition)
        .or_else(|| filename_from_url(url))
        .unwrap_or_else(|| {
            let ext = extension_for_content_type(content_type.unwrap_or(""));
            format!("{FALLBACK_STEM}{ext}")
        })
}

/// First `filename` / `filename*` parameter, percent-decoded.
pub fn filename_from_content_disposition(header: &str) -> Option<String> {
    let caps = DISPOSITION_FILENAME_REGEX.captures(header)?;
    let raw = caps.get(1).or_else(|| caps.get(2))?.as_str().trim();
    let decoded = percent_decode_str(raw).decode_utf8_lossy().trim().to_string();
    (!decoded.is_empty()).then_some(decoded)
}

/// Last segment of the URL path, percent-decoded.
pub fn filename_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let last = parsed.path_segments()?.next_back()?;
    let decoded = percent_decode_str(last).decode_utf8_lossy().trim().to_string();
    (!decoded.is_empty()).then_some(decoded)
}

pub fn extension_for_content_type(content_type: &str) -> &'static str {
    let ct = content_type.to_ascii_lowercase();
    if ct.contains("pdf") {
        ".pdf"
    } else if ct.contains("openxmlformats") && ct.contains("word") {
        ".docx"
    } else if ct.contains("word") {
        ".doc"
    } else {
        ".bin"
    }
}

/// Sanitized name with the `<prefix>_` namespace applied.
pub fn prefixed_filename(raw_name: &str, prefix: &str) -> String {
    let safe = sanitize_filename(raw_name);
    if prefix.is_empty() {
        safe
    } else {
        format!("{prefix}_{safe}")
    }
}

/// Create the first free file among `name`, `stem_1.ext`, `stem_2.ext`, ...
async fn create_unique_file(dir: &Path, filename: &str) -> io::Result<(File, PathBuf)> {
    let mut n = 0;
    loop {
        let candidate = dir.join(numbered_name(filename, n));
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
            .await
        {
            Ok(file) => return Ok((file, candidate)),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => n += 1,
            Err(err) => return Err(err),
        }
    }
}

fn numbered_name(filename: &str, n: usize) -> String {
    if n == 0 {
        return filename.to_string();
    }
    let path = Path::new(filename);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| filename.to_string());
    match path.extension() {
        Some(ext) => format!("{stem}_{n}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{n}"),
    }
}
