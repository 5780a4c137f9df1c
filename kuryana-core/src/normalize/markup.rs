//! Helpers shared by the markup normalizers

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::error::ParseError;
use crate::record::Details;
use crate::transport::RawResponse;

/// Parse a constant CSS selector. Only used for literals, which cannot fail.
pub(crate) fn selector(css: &'static str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector '{css}': {e}"))
}

static RE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("invalid number regex"));
static RE_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d[\d,]*").expect("invalid integer regex"));

static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("title"));
// A film title is content even when it reads "404 ...".
static HEADING: LazyLock<Selector> = LazyLock::new(|| selector("h1:not(.film-title)"));
static ERROR_BOX: LazyLock<Selector> = LazyLock::new(|| selector(".error-page, .page-404, .box-404"));
static LABEL: LazyLock<Selector> = LazyLock::new(|| selector("b.inline"));

const NOT_FOUND_MARKERS: [&str; 6] = [
    "404",
    "404 page not found",
    "not found",
    "page not found",
    "404 not found",
    "this page does not exist",
];

/// Parse a markup response, turning a recognizable "missing" page into
/// [`ParseError::NotFound`].
pub(crate) fn document(raw: &RawResponse) -> Result<Html, ParseError> {
    let text = raw.text();
    if text.trim().is_empty() {
        return Err(ParseError::changed("empty response body"));
    }
    let html = Html::parse_document(&text);
    if is_not_found_page(&html) {
        return Err(ParseError::not_found(format!("upstream has no page at {}", raw.final_url)));
    }
    Ok(html)
}

/// Title or main heading reads as a not-found page, or an error box is present.
pub(crate) fn is_not_found_page(html: &Html) -> bool {
    let root = html.root_element();
    if root.select(&ERROR_BOX).next().is_some() {
        return true;
    }
    // "404 Not Found | Site" -> "404 not found"
    let reads_missing = |s: String| {
        let lower = s.to_lowercase();
        let head = lower
            .split(" | ")
            .next()
            .and_then(|h| h.split(" - ").next())
            .unwrap_or_default()
            .trim();
        NOT_FOUND_MARKERS.contains(&head)
    };
    first_text(root, &TITLE).is_some_and(reads_missing) || first_text(root, &HEADING).is_some_and(reads_missing)
}

/// Element text with whitespace collapsed.
pub(crate) fn text(element: ElementRef<'_>) -> String {
    element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}

/// Own text only, skipping children such as labels.
pub(crate) fn own_text(element: ElementRef<'_>) -> String {
    element
        .children()
        .filter_map(|node| node.value().as_text())
        .flat_map(|t| t.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Text of the first match, if non-empty.
pub(crate) fn first_text(scope: ElementRef<'_>, sel: &Selector) -> Option<String> {
    scope.select(sel).map(text).find(|s| !s.is_empty())
}

/// Attribute of the first match.
pub(crate) fn first_attr(scope: ElementRef<'_>, sel: &Selector, name: &str) -> Option<String> {
    scope
        .select(sel)
        .find_map(|el| el.value().attr(name))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Image URL, preferring lazy-load attributes over placeholders.
pub(crate) fn image(scope: ElementRef<'_>, sel: &Selector) -> Option<String> {
    let img = scope.select(sel).next()?;
    ["data-src", "data-cfsrc", "src"]
        .iter()
        .find_map(|name| img.value().attr(name))
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.starts_with("data:"))
        .map(str::to_string)
}

/// Last path segment of a link, e.g. `/people/1234-some-name` -> `1234-some-name`.
pub(crate) fn slug_from_href(href: &str) -> Option<String> {
    let path = href
        .split_once("://")
        .map_or(href, |(_, rest)| rest.split_once('/').map_or("", |(_, p)| p));
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Slug of the first link in scope.
pub(crate) fn link_slug(scope: ElementRef<'_>, sel: &Selector) -> Option<String> {
    first_attr(scope, sel, "href").and_then(|href| slug_from_href(&href))
}

/// First decimal number in the text, e.g. `"8.9 (12,345 users)"` -> `8.9`.
pub(crate) fn parse_f64(s: &str) -> Option<f64> {
    RE_NUMBER.find(s).and_then(|m| m.as_str().parse().ok())
}

/// First integer in the text, thousands separators allowed.
pub(crate) fn parse_u32(s: &str) -> Option<u32> {
    RE_INTEGER
        .find(s)
        .and_then(|m| m.as_str().replace(',', "").parse().ok())
}

/// Label/value pairs from `<li><b>Label:</b> value</li>` style lists.
pub(crate) fn details(scope: ElementRef<'_>, item_sel: &Selector) -> Details {
    let mut details = Details::new();
    for item in scope.select(item_sel) {
        let Some(label_el) = item.select(&LABEL).next() else {
            continue;
        };
        let label = text(label_el).trim_end_matches(':').trim().to_string();
        if label.is_empty() {
            continue;
        }
        let full = text(item);
        let value = full
            .strip_prefix(&text(label_el))
            .unwrap_or(&full)
            .trim()
            .to_string();
        if !value.is_empty() {
            details.entry(label).or_insert(value);
        }
    }
    details
}

/// Comma separated values of a details entry.
pub(crate) fn split_list(value: Option<&String>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(|s| s.trim().trim_end_matches("(Vote or add tags)").trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}
