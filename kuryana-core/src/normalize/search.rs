//! Search results page

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::curated_list::kind_and_year;
use super::markup::{first_attr, first_text, image, link_slug, parse_f64, parse_u32, selector};
use crate::error::ParseError;
use crate::record::{SearchResult, SearchResults};

static CONTAINER: LazyLock<Selector> =
    LazyLock::new(|| selector("div.search-results, div.col-lg-8.col-md-8, #content"));
static RESULT: LazyLock<Selector> = LazyLock::new(|| selector("div.box[id^=\"mdl-\"]"));
static TITLE_LINK: LazyLock<Selector> = LazyLock::new(|| selector("h6.title a, .title a"));
static META: LazyLock<Selector> = LazyLock::new(|| selector("span.text-muted, div.text-muted"));
static SCORE: LazyLock<Selector> = LazyLock::new(|| selector("span.score"));
static IMG: LazyLock<Selector> = LazyLock::new(|| selector("img"));

pub(crate) fn parse(query: &str, base_url: &str, html: &Html) -> Result<SearchResults, ParseError> {
    let root = html.root_element();

    let results: Vec<_> = root.select(&RESULT).filter_map(|el| result(base_url, el)).collect();
    if results.is_empty() && root.select(&CONTAINER).next().is_none() {
        return Err(ParseError::changed("search page has no results container"));
    }

    Ok(SearchResults {
        query: query.to_string(),
        results,
    })
}

fn result(base_url: &str, element: ElementRef<'_>) -> Option<SearchResult> {
    let title = first_text(element, &TITLE_LINK)?;
    let meta = first_text(element, &META);
    let (kind, year) = meta.as_deref().map_or((None, None), kind_and_year);
    let episodes = meta
        .as_deref()
        .and_then(|m| m.split_once(','))
        .filter(|(_, rest)| rest.contains("episode"))
        .and_then(|(_, rest)| parse_u32(rest));
    let url = first_attr(element, &TITLE_LINK, "href").map(|href| absolute(base_url, &href));

    Some(SearchResult {
        slug: link_slug(element, &TITLE_LINK),
        title,
        kind,
        year,
        episodes,
        rating: first_text(element, &SCORE).and_then(|s| parse_f64(&s)),
        thumbnail: image(element, &IMG),
        url,
    })
}

fn absolute(base_url: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{}/{}", base_url.trim_end_matches('/'), href.trim_start_matches('/'))
    }
}
