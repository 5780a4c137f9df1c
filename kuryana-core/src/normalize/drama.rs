//! Drama page

use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::markup::{
    details, first_text, image, link_slug, non_empty, own_text, parse_f64, parse_u32, selector,
    split_list, text,
};
use crate::error::ParseError;
use crate::record::{CastRef, Drama, TitleRef};

pub(crate) static FILM_TITLE: LazyLock<Selector> = LazyLock::new(|| selector("h1.film-title"));
pub(crate) static COVER: LazyLock<Selector> =
    LazyLock::new(|| selector("div.film-cover img, .cover img"));
static RATING: LazyLock<Selector> =
    LazyLock::new(|| selector("div.col-film-rating div, .film-rating-vote"));
static SYNOPSIS: LazyLock<Selector> =
    LazyLock::new(|| selector("div.show-synopsis span, div.show-synopsis p"));
static DETAIL_ITEM: LazyLock<Selector> = LazyLock::new(|| selector("ul.list li.list-item"));
static CREDIT: LazyLock<Selector> = LazyLock::new(|| selector("ul.credits li.list-item"));
static CREDIT_NAME: LazyLock<Selector> = LazyLock::new(|| selector("a.text-primary"));
static CREDIT_ROLE: LazyLock<Selector> = LazyLock::new(|| selector("small"));
static IMG: LazyLock<Selector> = LazyLock::new(|| selector("img"));
static REC_ITEM: LazyLock<Selector> = LazyLock::new(|| selector("div.rec-item"));
static REC_LINK: LazyLock<Selector> = LazyLock::new(|| selector("a.title, a"));

pub(crate) fn parse(slug: &str, html: &Html) -> Result<Drama, ParseError> {
    let root = html.root_element();

    let title = first_text(root, &FILM_TITLE)
        .ok_or_else(|| ParseError::changed("drama page has no title"))?;

    let details = details(root, &DETAIL_ITEM);

    let rating = first_text(root, &RATING)
        .and_then(|s| parse_f64(&s))
        .or_else(|| details.get("Score").and_then(|s| parse_f64(s)));

    let synopsis = root
        .select(&SYNOPSIS)
        .map(own_text)
        .find(|s| !s.is_empty())
        .or_else(|| first_text(root, &SYNOPSIS));

    let cast = root
        .select(&CREDIT)
        .filter_map(|item| {
            let name = first_text(item, &CREDIT_NAME)?;
            Some(CastRef {
                slug: link_slug(item, &CREDIT_NAME),
                name,
                role: first_text(item, &CREDIT_ROLE),
                image: image(item, &IMG),
            })
        })
        .collect();

    let recommendations = root
        .select(&REC_ITEM)
        .filter_map(|item| {
            let link = item.select(&REC_LINK).map(text).find(|s| !s.is_empty())?;
            Some(TitleRef {
                slug: link_slug(item, &REC_LINK),
                title: link,
                image: image(item, &IMG),
            })
        })
        .collect();

    Ok(Drama {
        slug: slug.to_string(),
        title,
        native_title: details.get("Native Title").cloned().and_then(non_empty),
        poster: image(root, &COVER),
        synopsis,
        rating,
        episodes: details.get("Episodes").and_then(|s| parse_u32(s)),
        country: details.get("Country").cloned(),
        aired: details.get("Aired").cloned(),
        genres: split_list(details.get("Genres")),
        tags: split_list(details.get("Tags")),
        also_known_as: split_list(details.get("Also Known As")),
        details,
        cast,
        recommendations,
    })
}
