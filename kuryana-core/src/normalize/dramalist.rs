//! User drama list page

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::markup::{first_text, link_slug, parse_f64, selector, text};
use crate::error::ParseError;
use crate::record::{ListedTitle, StatusList, UserDramalist};

static SECTION: LazyLock<Selector> = LazyLock::new(|| selector("div.mdl-style-list"));
static LABEL: LazyLock<Selector> = LazyLock::new(|| selector("h3.mdl-style-list-label, h3"));
static ROW: LazyLock<Selector> = LazyLock::new(|| selector("tbody tr"));
static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("td.mdl-style-col-title a.title, td.mdl-style-col-title a"));
static COUNTRY: LazyLock<Selector> = LazyLock::new(|| selector("td.mdl-style-col-country"));
static YEAR: LazyLock<Selector> = LazyLock::new(|| selector("td.mdl-style-col-year"));
static KIND: LazyLock<Selector> = LazyLock::new(|| selector("td.mdl-style-col-type"));
static SCORE: LazyLock<Selector> = LazyLock::new(|| selector("span.score, td.mdl-style-col-score"));
static PROGRESS: LazyLock<Selector> = LazyLock::new(|| selector("td.mdl-style-col-progress"));
static PRIVATE: LazyLock<Selector> = LazyLock::new(|| selector(".private-list, .list-private"));

const PRIVATE_MARKER: &str = "this list is private";

pub(crate) fn parse(user: &str, html: &Html) -> Result<UserDramalist, ParseError> {
    let root = html.root_element();

    let sections: Vec<_> = root.select(&SECTION).collect();
    if sections.is_empty() {
        if is_private(root) {
            return Err(ParseError::not_found(format!("drama list of '{user}' is private")));
        }
        return Err(ParseError::changed("drama list page has no list sections"));
    }

    let lists = sections
        .into_iter()
        .map(|section| StatusList {
            status: first_text(section, &LABEL).unwrap_or_else(|| "Unknown".to_string()),
            items: section.select(&ROW).filter_map(listed_title).collect(),
        })
        .collect();

    Ok(UserDramalist {
        user: user.to_string(),
        lists,
    })
}

fn is_private(root: ElementRef<'_>) -> bool {
    root.select(&PRIVATE).next().is_some() || text(root).to_lowercase().contains(PRIVATE_MARKER)
}

fn listed_title(row: ElementRef<'_>) -> Option<ListedTitle> {
    let title = first_text(row, &TITLE)?;
    Some(ListedTitle {
        slug: link_slug(row, &TITLE),
        title,
        country: first_text(row, &COUNTRY),
        year: first_text(row, &YEAR),
        kind: first_text(row, &KIND),
        score: first_text(row, &SCORE).and_then(|s| parse_f64(&s)),
        progress: first_text(row, &PROGRESS).map(|s| s.replace(' ', "")),
    })
}
