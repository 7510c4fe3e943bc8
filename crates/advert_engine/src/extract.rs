use std::sync::LazyLock;

use advert_core::Content;
use ego_tree::NodeRef;
use regex::Regex;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

static MAIN_CLASS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)content|main|job").unwrap());

const MAX_SECTION_NODE_CHARS: usize = 200;
const MAX_SECTION_LABEL_CHARS: usize = 50;

pub trait Extractor: Send + Sync {
    fn extract(&self, doc: &Html) -> Content;
}

/// Job-page extractor:
/// - title from the first `<h1>`, else `<title>`
/// - main area from the first element whose class mentions content/main/job,
///   else `<main>`, else `<article>`, else `<body>`
/// - full text is the main area's visible text nodes, one per line
/// - short `Label: Value` text nodes become sections.
#[derive(Debug, Default, Clone, Copy)]
pub struct JobPageExtractor;

impl Extractor for JobPageExtractor {
    fn extract(&self, doc: &Html) -> Content {
        let title = first_match(doc, "h1")
            .or_else(|| first_match(doc, "title"))
            .map(|el| visible_text_nodes(el).join(" "))
            .unwrap_or_default();

        let main = main_content(doc);
        let nodes = visible_text_nodes(main);

        let mut content = Content {
            title,
            full_text: nodes.join("\n"),
            ..Content::default()
        };
        for node in &nodes {
            if let Some((label, value)) = parse_section(node) {
                content.sections.insert(label, value);
            }
        }
        content
    }
}

fn first_match<'a>(doc: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    Selector::parse(css)
        .ok()
        .and_then(|sel| doc.select(&sel).next())
}

fn main_content(doc: &Html) -> ElementRef<'_> {
    doc.root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| {
            el.value()
                .attr("class")
                .is_some_and(|class| MAIN_CLASS_REGEX.is_match(class))
        })
        .or_else(|| first_match(doc, "main"))
        .or_else(|| first_match(doc, "article"))
        .or_else(|| first_match(doc, "body"))
        .unwrap_or_else(|| doc.root_element())
}

/// `Label: Value` from a single text node, or `None` for anything that looks
/// like running prose rather than a labelled field.
pub fn parse_section(text: &str) -> Option<(String, String)> {
    if text.chars().count() >= MAX_SECTION_NODE_CHARS {
        return None;
    }
    let (label, value) = text.split_once(':')?;
    if label.chars().count() >= MAX_SECTION_LABEL_CHARS {
        return None;
    }
    let (label, value) = (label.trim(), value.trim());
    if label.is_empty() || value.is_empty() {
        return None;
    }
    Some((label.to_string(), value.to_string()))
}

/// Whitespace-collapsed, non-empty text nodes under `element`, in document
/// order. Script and style content is not visible and is skipped.
pub(crate) fn visible_text_nodes(element: ElementRef<'_>) -> Vec<String> {
    let mut out = Vec::new();
    for child in element.children() {
        collect_text(child, &mut out);
    }
    out
}

fn collect_text(node: NodeRef<'_, Node>, out: &mut Vec<String>) {
    match node.value() {
        Node::Text(text) => {
            let collapsed = collapse_whitespace(text);
            if !collapsed.is_empty() {
                out.push(collapsed);
            }
        }
        Node::Element(element) => {
            if matches!(
                element.name(),
                "script" | "style" | "noscript" | "template"
            ) {
                return;
            }
            for child in node.children() {
                collect_text(child, out);
            }
        }
        _ => {}
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
