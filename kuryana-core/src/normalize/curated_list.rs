//! Curated list page (`/list/{id}`)

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::markup::{first_text, image, link_slug, parse_u32, selector, text};
use crate::error::ParseError;
use crate::record::{CuratedItem, CuratedList};

static HEADING: LazyLock<Selector> = LazyLock::new(|| selector("div.box-header h1, h1"));
static DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| selector("div.box-header .description, div.list-description"));
static ITEM: LazyLock<Selector> = LazyLock::new(|| selector("ul.list-unstyled li[id^=\"list_\"], li.list-item.mdl-list-item"));
static RANK: LazyLock<Selector> = LazyLock::new(|| selector(".ranking, .rank"));
static TITLE_LINK: LazyLock<Selector> = LazyLock::new(|| selector("h2 a, .title a"));
static META: LazyLock<Selector> = LazyLock::new(|| selector("div.text-muted, span.text-muted"));
static IMG: LazyLock<Selector> = LazyLock::new(|| selector("img"));
static NOTES: LazyLock<Selector> = LazyLock::new(|| selector("div.list-notes, .notes"));

pub(crate) fn parse(slug: &str, html: &Html) -> Result<CuratedList, ParseError> {
    let root = html.root_element();

    let title = first_text(root, &HEADING)
        .ok_or_else(|| ParseError::changed("list page has no heading"))?;

    let items = root.select(&ITEM).filter_map(item).collect();

    Ok(CuratedList {
        slug: slug.to_string(),
        title,
        description: first_text(root, &DESCRIPTION),
        items,
    })
}

fn item(element: ElementRef<'_>) -> Option<CuratedItem> {
    let title = first_text(element, &TITLE_LINK)?;
    let (kind, year) = first_text(element, &META).map_or((None, None), |meta| kind_and_year(&meta));
    Some(CuratedItem {
        rank: first_text(element, &RANK).and_then(|s| parse_u32(&s)),
        slug: link_slug(element, &TITLE_LINK),
        title,
        kind,
        year,
        image: image(element, &IMG),
        notes: element.select(&NOTES).map(text).find(|s| !s.is_empty()),
    })
}

/// `"Korean Drama - 2016, 16 episodes"` -> `("Korean Drama", "2016")`
pub(crate) fn kind_and_year(meta: &str) -> (Option<String>, Option<String>) {
    let (kind, rest) = match meta.split_once(" - ") {
        Some((kind, rest)) => (kind.trim(), rest),
        None => (meta.trim(), ""),
    };
    let year = rest
        .split(',')
        .next()
        .map(str::trim)
        .filter(|y| y.len() == 4 && y.chars().all(|c| c.is_ascii_digit()))
        .map(str::to_string);
    let kind = (!kind.is_empty()).then(|| kind.to_string());
    (kind, year)
}
