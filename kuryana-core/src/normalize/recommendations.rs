//! Recommendations page

use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::drama::FILM_TITLE;
use super::markup::{first_text, image, link_slug, parse_u32, selector};
use crate::error::ParseError;
use crate::record::{Recommendation, RecommendationPage};

static ITEM: LazyLock<Selector> = LazyLock::new(|| selector("div.box-body.b-t, div.rec-item"));
static TITLE_LINK: LazyLock<Selector> = LazyLock::new(|| selector("b a, a.text-primary"));
static IMG: LazyLock<Selector> = LazyLock::new(|| selector("img"));
static REASON: LazyLock<Selector> = LazyLock::new(|| selector("div.recs-body, .rec-reason"));
static AUTHOR: LazyLock<Selector> = LazyLock::new(|| selector("div.recs-author a, .rec-author a"));
static VOTES: LazyLock<Selector> = LazyLock::new(|| selector(".like-cnt, .rec-votes"));

pub(crate) fn parse(slug: &str, html: &Html) -> Result<RecommendationPage, ParseError> {
    let root = html.root_element();

    let title = first_text(root, &FILM_TITLE)
        .ok_or_else(|| ParseError::changed("recommendations page has no title"))?;

    let recommendations = root
        .select(&ITEM)
        .filter_map(|item| {
            let rec_title = first_text(item, &TITLE_LINK)?;
            Some(Recommendation {
                slug: link_slug(item, &TITLE_LINK),
                title: rec_title,
                image: image(item, &IMG),
                recommended_by: first_text(item, &AUTHOR),
                reason: first_text(item, &REASON),
                votes: first_text(item, &VOTES).and_then(|s| parse_u32(&s)),
            })
        })
        .collect();

    Ok(RecommendationPage {
        slug: slug.to_string(),
        title,
        recommendations,
    })
}
