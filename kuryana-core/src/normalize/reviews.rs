//! Reviews page

use std::collections::BTreeMap;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::drama::FILM_TITLE;
use super::markup::{first_text, own_text, parse_f64, parse_u32, selector, text};
use crate::error::ParseError;
use crate::record::{Review, ReviewPage};

static REVIEW: LazyLock<Selector> = LazyLock::new(|| selector("div.review"));
static REVIEWER: LazyLock<Selector> = LazyLock::new(|| selector("a.text-primary b, a.text-primary"));
static OVERALL: LazyLock<Selector> =
    LazyLock::new(|| selector("div.rating-overall .score, div.rating-overall"));
static RATING_ROW: LazyLock<Selector> = LazyLock::new(|| selector("div.review-rating > div"));
static RATING_VALUE: LazyLock<Selector> = LazyLock::new(|| selector("span"));
static BODY: LazyLock<Selector> = LazyLock::new(|| selector("div.review-body"));
static HELPFUL: LazyLock<Selector> = LazyLock::new(|| selector("div.review-helpful, .user-stats"));
static ACTIVE_PAGE: LazyLock<Selector> = LazyLock::new(|| selector("ul.pagination li.active"));

pub(crate) fn parse(slug: &str, html: &Html) -> Result<ReviewPage, ParseError> {
    let root = html.root_element();

    let title = first_text(root, &FILM_TITLE)
        .ok_or_else(|| ParseError::changed("reviews page has no title"))?;

    let reviews = root.select(&REVIEW).map(review).collect();

    Ok(ReviewPage {
        slug: slug.to_string(),
        title,
        page: first_text(root, &ACTIVE_PAGE).and_then(|s| parse_u32(&s)),
        reviews,
    })
}

fn review(item: ElementRef<'_>) -> Review {
    let mut ratings = BTreeMap::new();
    for row in item.select(&RATING_ROW) {
        let label = own_text(row);
        let value = first_text(row, &RATING_VALUE).and_then(|s| parse_f64(&s));
        if let (false, Some(value)) = (label.is_empty(), value) {
            ratings.insert(label, value);
        }
    }

    Review {
        reviewer: first_text(item, &REVIEWER),
        overall_rating: first_text(item, &OVERALL).and_then(|s| parse_f64(&s)),
        ratings,
        body: item.select(&BODY).map(text).find(|s| !s.is_empty()),
        helpful: first_text(item, &HELPFUL).and_then(|s| parse_u32(&s)),
    }
}
