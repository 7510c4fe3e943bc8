use scraper::{Html, Selector};
use url::Url;

use crate::extract::visible_text_nodes;

pub const ATTACHMENT_EXTENSIONS: &[&str] =
    &[".pdf", ".doc", ".docx", ".xls", ".xlsx", ".rtf", ".odt", ".txt"];

const DEFAULT_LINK_TEXT: &str = "attachment";

/// A hyperlink classified as a downloadable document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentLink {
    pub url: String,
    pub link_text: String,
    pub original_href: String,
}

/// Every attachment link in document order. Repeated links are kept.
pub fn detect_attachments(doc: &Html, base_url: &str) -> Vec<AttachmentLink> {
    let Ok(anchor_sel) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    let base = Url::parse(base_url).ok();

    let mut links = Vec::new();
    for anchor in doc.select(&anchor_sel) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(url) = resolve_url(href, base.as_ref()) else {
            continue;
        };
        if !is_attachment_link(&url, href) {
            continue;
        }
        let text = visible_text_nodes(anchor).join(" ");
        let link_text = if text.is_empty() {
            DEFAULT_LINK_TEXT.to_string()
        } else {
            text
        };
        links.push(AttachmentLink {
            url: url.into(),
            link_text,
            original_href: href.to_string(),
        });
    }
    links
}

fn resolve_url(href: &str, base: Option<&Url>) -> Option<Url> {
    match base {
        Some(base) => base.join(href.trim()).ok(),
        None => Url::parse(href.trim()).ok(),
    }
}

pub fn is_attachment_link(url: &Url, href: &str) -> bool {
    has_document_extension(url) || mentions_download(href) || references_document_file(href)
}

/// The URL path ends with a known document extension, ignoring case.
pub fn has_document_extension(url: &Url) -> bool {
    let path = url.path().to_ascii_lowercase();
    ATTACHMENT_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}

/// The raw href mentions `download` or `attachment`, ignoring case.
pub fn mentions_download(href: &str) -> bool {
    let lower = href.to_lowercase();
    lower.contains("download") || lower.contains("attachment")
}

/// The raw href mentions `document` together with `id=` or `file`, ignoring case.
pub fn references_document_file(href: &str) -> bool {
    let lower = href.to_lowercase();
    lower.contains("document") && (lower.contains("id=") || lower.contains("file"))
}
