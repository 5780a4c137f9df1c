//! Person page

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::drama::FILM_TITLE;
use super::markup::{details, first_text, image, link_slug, own_text, parse_f64, selector, text};
use crate::error::ParseError;
use crate::record::{Person, Work};

static IMAGE: LazyLock<Selector> = LazyLock::new(|| selector("div.film-cover img, img.img-responsive"));
static DETAIL_ITEM: LazyLock<Selector> = LazyLock::new(|| selector("ul.list li.list-item"));
static ABOUT: LazyLock<Selector> =
    LazyLock::new(|| selector("div.biography, div.col-sm-8.col-lg-12.col-md-12"));
/// Headings and work tables, matched in document order
static SECTION_OR_TABLE: LazyLock<Selector> =
    LazyLock::new(|| selector("h5.header, h5, table.film-list"));
static ROW: LazyLock<Selector> = LazyLock::new(|| selector("tbody tr"));
static YEAR: LazyLock<Selector> = LazyLock::new(|| selector("td.year"));
static TITLE_LINK: LazyLock<Selector> = LazyLock::new(|| selector("td.title a"));
static ROLE_ID: LazyLock<Selector> = LazyLock::new(|| selector("td.role .roleid"));
static ROLE: LazyLock<Selector> = LazyLock::new(|| selector("td.role"));
static RATING: LazyLock<Selector> = LazyLock::new(|| selector("td.text-center, td.score"));

pub(crate) fn parse(slug: &str, html: &Html) -> Result<Person, ParseError> {
    let root = html.root_element();

    let name = first_text(root, &FILM_TITLE)
        .ok_or_else(|| ParseError::changed("person page has no name"))?;

    let mut works = Vec::new();
    let mut section = String::from("Works");
    for element in root.select(&SECTION_OR_TABLE) {
        if element.value().name() == "table" {
            works.extend(element.select(&ROW).filter_map(|row| work(&section, row)));
        } else {
            let heading = text(element);
            if !heading.is_empty() {
                section = heading;
            }
        }
    }

    let about = root
        .select(&ABOUT)
        .map(own_text)
        .find(|s| !s.is_empty())
        .or_else(|| first_text(root, &ABOUT));

    Ok(Person {
        slug: slug.to_string(),
        name,
        image: image(root, &IMAGE),
        about,
        details: details(root, &DETAIL_ITEM),
        works,
    })
}

fn work(section: &str, row: ElementRef<'_>) -> Option<Work> {
    let title = first_text(row, &TITLE_LINK)?;
    Some(Work {
        section: section.to_string(),
        year: first_text(row, &YEAR),
        slug: link_slug(row, &TITLE_LINK),
        title,
        role: first_text(row, &ROLE_ID).or_else(|| first_text(row, &ROLE)),
        rating: first_text(row, &RATING).and_then(|s| parse_f64(&s)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <h1 class="film-title">Gong Yoo</h1>
        <div class="film-cover"><img src="https://i.mdl/gong.jpg"></div>
        <ul class="list">
          <li class="list-item"><b class="inline">Nationality:</b> South Korean</li>
          <li class="list-item"><b class="inline">Born:</b> July 10, 1979</li>
        </ul>
        <div class="biography">Gong Yoo is a South Korean actor.</div>
        <h5 class="header">Drama</h5>
        <table class="film-list"><tbody>
          <tr><td class="year">2016</td><td class="title"><a href="/18452-goblin">Goblin</a></td>
              <td class="role"><div class="name">Kim Shin</div><div class="roleid">Main Role</div></td>
              <td class="text-center">8.8</td></tr>
          <tr><td class="year">TBA</td><td class="title">untitled</td></tr>
        </tbody></table>
        <h5 class="header">Movie</h5>
        <table class="film-list"><tbody>
          <tr><td class="year">2016</td><td class="title"><a href="/12345-train-to-busan">Train to Busan</a></td>
              <td class="role"><div class="roleid">Main Role</div></td><td class="text-center"></td></tr>
        </tbody></table>
        </body></html>"#;

    #[test]
    fn test_parse_person() {
        let person = parse("301-gong-yoo", &Html::parse_document(PAGE)).unwrap();

        assert_eq!(person.name, "Gong Yoo");
        assert_eq!(person.image.as_deref(), Some("https://i.mdl/gong.jpg"));
        assert_eq!(person.about.as_deref(), Some("Gong Yoo is a South Korean actor."));
        assert_eq!(person.details.get("Nationality").map(String::as_str), Some("South Korean"));

        assert_eq!(person.works.len(), 2);
        assert_eq!(person.works[0].section, "Drama");
        assert_eq!(person.works[0].slug.as_deref(), Some("18452-goblin"));
        assert_eq!(person.works[0].role.as_deref(), Some("Main Role"));
        assert_eq!(person.works[0].rating, Some(8.8));
        assert_eq!(person.works[1].section, "Movie");
        assert_eq!(person.works[1].rating, None);
    }

    #[test]
    fn test_missing_name_is_upstream_changed() {
        let err = parse("1", &Html::parse_document("<table class='film-list'></table>")).unwrap_err();
        assert!(matches!(err, ParseError::UpstreamChanged(_)));
    }
}
