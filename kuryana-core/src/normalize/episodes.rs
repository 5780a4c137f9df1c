//! Episode list and single episode pages

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use super::drama::FILM_TITLE;
use super::markup::{first_attr, first_text, image, parse_f64, parse_u32, selector, text};
use crate::error::ParseError;
use crate::record::{Episode, EpisodeList, EpisodeSummary};

static RE_EPISODE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/episode/(\d+)").expect("invalid episode path regex"));

static EPISODE: LazyLock<Selector> = LazyLock::new(|| selector("div.episode"));
static EPISODE_LINK: LazyLock<Selector> = LazyLock::new(|| selector("h2.title a, .title a"));
static COVER: LazyLock<Selector> = LazyLock::new(|| selector("div.cover img, img"));
static AIR_DATE: LazyLock<Selector> = LazyLock::new(|| selector("div.air-date, .air-date"));
static RATING: LazyLock<Selector> = LazyLock::new(|| selector("div.rating-panel b, .rating-panel"));
static EPISODE_TITLE: LazyLock<Selector> =
    LazyLock::new(|| selector("h2.episode-title, .episode-title, div.box-header h2"));
static SYNOPSIS: LazyLock<Selector> =
    LazyLock::new(|| selector("div.episode-synopsis, div.synopsis, .box-body .episode-description"));

fn episode_number(href: &str) -> Option<u32> {
    RE_EPISODE_PATH
        .captures(href)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

pub(crate) fn parse_list(slug: &str, html: &Html) -> Result<EpisodeList, ParseError> {
    let root = html.root_element();

    let title = first_text(root, &FILM_TITLE)
        .ok_or_else(|| ParseError::changed("episode list page has no title"))?;

    let episodes = root
        .select(&EPISODE)
        .filter_map(|item| {
            let link = item.select(&EPISODE_LINK).next()?;
            let url = link.value().attr("href").map(str::to_string);
            let episode_title = text(link);
            if episode_title.is_empty() {
                return None;
            }
            Some(EpisodeSummary {
                number: url
                    .as_deref()
                    .and_then(episode_number)
                    .or_else(|| parse_u32(&episode_title)),
                title: episode_title,
                image: image(item, &COVER),
                air_date: first_text(item, &AIR_DATE),
                rating: first_text(item, &RATING).and_then(|s| parse_f64(&s)),
                url,
            })
        })
        .collect();

    Ok(EpisodeList {
        slug: slug.to_string(),
        title,
        episodes,
    })
}

pub(crate) fn parse_single(slug: &str, final_url: &str, html: &Html) -> Result<Episode, ParseError> {
    let root = html.root_element();

    let title = first_text(root, &FILM_TITLE)
        .ok_or_else(|| ParseError::changed("episode page has no title"))?;
    let episode_title = first_text(root, &EPISODE_TITLE);

    let number = episode_number(final_url)
        .or_else(|| first_attr(root, &EPISODE_LINK, "href").as_deref().and_then(episode_number))
        .or_else(|| episode_title.as_deref().and_then(parse_u32));

    Ok(Episode {
        slug: slug.to_string(),
        title,
        episode_title,
        number,
        image: image(root, &COVER),
        air_date: first_text(root, &AIR_DATE),
        rating: first_text(root, &RATING).and_then(|s| parse_f64(&s)),
        synopsis: first_text(root, &SYNOPSIS),
    })
}
