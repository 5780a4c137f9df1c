//! Cast & crew page

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::drama::{COVER, FILM_TITLE};
use super::markup::{first_text, image, link_slug, selector, text};
use crate::error::ParseError;
use crate::record::{CastGroup, CastMember, CastPage};

static BOX_BODY: LazyLock<Selector> = LazyLock::new(|| selector("div.box-body"));
static MEMBER: LazyLock<Selector> = LazyLock::new(|| selector("li.list-item"));
static NAME: LazyLock<Selector> = LazyLock::new(|| selector("a.text-primary"));
static ROLE: LazyLock<Selector> = LazyLock::new(|| selector("small.text-muted"));
static CHARACTER: LazyLock<Selector> = LazyLock::new(|| selector("div.text-ellipsis small, small.character"));
static IMG: LazyLock<Selector> = LazyLock::new(|| selector("img"));

pub(crate) fn parse(slug: &str, html: &Html) -> Result<CastPage, ParseError> {
    let root = html.root_element();

    let title = first_text(root, &FILM_TITLE)
        .ok_or_else(|| ParseError::changed("cast page has no title"))?;

    let mut groups = Vec::new();
    for body in root.select(&BOX_BODY) {
        collect_groups(body, &mut groups);
    }

    Ok(CastPage {
        slug: slug.to_string(),
        title,
        poster: image(root, &COVER),
        groups,
    })
}

/// Cast pages alternate `<h3 class="header">Role</h3>` with a `<ul>` of people.
fn collect_groups(body: ElementRef<'_>, groups: &mut Vec<CastGroup>) {
    let mut current: Option<String> = None;

    for child in body.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "h3" | "h4" => {
                let heading = text(child);
                current = (!heading.is_empty()).then_some(heading);
            }
            "ul" => {
                let Some(role) = current.take() else {
                    continue;
                };
                let people: Vec<_> = child.select(&MEMBER).filter_map(member).collect();
                groups.push(CastGroup { role, people });
            }
            _ => {}
        }
    }
}

fn member(item: ElementRef<'_>) -> Option<CastMember> {
    let name = first_text(item, &NAME)?;
    let role = first_text(item, &ROLE);
    let character = item
        .select(&CHARACTER)
        .map(text)
        .find(|s| !s.is_empty() && Some(s) != role.as_ref());

    Some(CastMember {
        slug: link_slug(item, &NAME),
        name,
        role,
        character,
        image: image(item, &IMG),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <h1 class="film-title"><a href="/18452-goblin">Goblin (2016)</a></h1>
        <div class="box-body">
          <h3 class="header">Director</h3>
          <ul class="list">
            <li class="list-item"><img src="https://i.mdl/lee.jpg">
              <a class="text-primary" href="/people/1101-lee-eung-bok"><b>Lee Eung Bok</b></a></li>
          </ul>
          <h3 class="header">Main Role</h3>
          <ul class="list">
            <li class="list-item"><img data-src="https://i.mdl/gong.jpg" src="data:image/gif;base64,AA">
              <a class="text-primary" href="/people/301-gong-yoo"><b>Gong Yoo</b></a>
              <div class="text-ellipsis"><small class="character">Kim Shin</small></div>
              <small class="text-muted">Main Role</small></li>
          </ul>
          <h3 class="header">Guest Role</h3>
          <ul class="list"></ul>
        </div>
        </body></html>"#;

    #[test]
    fn test_parse_cast_groups() {
        let cast = parse("18452-goblin", &Html::parse_document(PAGE)).unwrap();

        assert_eq!(cast.title, "Goblin (2016)");
        assert_eq!(cast.groups.len(), 3);
        assert_eq!(cast.groups[0].role, "Director");
        assert_eq!(cast.groups[0].people[0].name, "Lee Eung Bok");
        assert_eq!(cast.groups[0].people[0].role, None);

        let gong = &cast.groups[1].people[0];
        assert_eq!(gong.slug.as_deref(), Some("301-gong-yoo"));
        assert_eq!(gong.character.as_deref(), Some("Kim Shin"));
        assert_eq!(gong.image.as_deref(), Some("https://i.mdl/gong.jpg"));

        assert!(cast.groups[2].people.is_empty());
    }

    #[test]
    fn test_missing_title_is_upstream_changed() {
        let err = parse("1", &Html::parse_document("<div class='box-body'></div>")).unwrap_err();
        assert!(matches!(err, ParseError::UpstreamChanged(_)));
    }
}
