//! Per-Kind Normalizers
//!
//! Each kind has its own extractor; [`normalize`] selects it with one
//! exhaustive match. Markup kinds share the not-found recognition in
//! [`markup::document`], JSON API kinds only validate shape.

mod api;
mod cast;
mod curated_list;
mod drama;
mod dramalist;
mod episodes;
mod markup;
mod person;
mod recommendations;
mod reviews;
mod search;

use url::Url;

use crate::error::ParseError;
use crate::kind::ResourceKind;
use crate::record::CanonicalRecord;
use crate::transport::RawResponse;

/// Turn an upstream response into the canonical record for `kind`.
///
/// `identifier` is the caller's identifier (slug, user name or search query)
/// and is echoed back in the record.
pub fn normalize(
    kind: ResourceKind,
    identifier: &str,
    raw: &RawResponse,
) -> Result<CanonicalRecord, ParseError> {
    // Html is !Send; it never leaves this synchronous call.
    let html = || markup::document(raw);
    let record = match kind {
        ResourceKind::Drama => CanonicalRecord::Drama(drama::parse(identifier, &html()?)?),
        ResourceKind::Cast => CanonicalRecord::Cast(cast::parse(identifier, &html()?)?),
        ResourceKind::Episodes => {
            CanonicalRecord::Episodes(episodes::parse_list(identifier, &html()?)?)
        }
        ResourceKind::Episode => CanonicalRecord::Episode(episodes::parse_single(
            identifier,
            &raw.final_url,
            &html()?,
        )?),
        ResourceKind::Recommendations => {
            CanonicalRecord::Recommendations(recommendations::parse(identifier, &html()?)?)
        }
        ResourceKind::Reviews => CanonicalRecord::Reviews(reviews::parse(identifier, &html()?)?),
        ResourceKind::Person => CanonicalRecord::Person(person::parse(identifier, &html()?)?),
        ResourceKind::UserDramalist => {
            CanonicalRecord::UserDramalist(dramalist::parse(identifier, &html()?)?)
        }
        ResourceKind::CuratedList => {
            CanonicalRecord::CuratedList(curated_list::parse(identifier, &html()?)?)
        }
        ResourceKind::Search => CanonicalRecord::Search(search::parse(
            identifier,
            &origin(&raw.final_url),
            &html()?,
        )?),
        ResourceKind::Threads => CanonicalRecord::Api(api::threads(raw)?),
        ResourceKind::SeasonalCalendar => CanonicalRecord::Api(api::seasonal(raw)?),
    };
    Ok(record)
}

/// `https://host/search?q=x` -> `https://host`
fn origin(final_url: &str) -> String {
    Url::parse(final_url)
        .map(|url| url.origin().ascii_serialization())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::transport::ContentType;

    fn markup(body: &str, url: &str) -> RawResponse {
        RawResponse {
            http_status: 200,
            content_type: ContentType::Markup,
            body: Bytes::from(body.to_string()),
            final_url: url.to_string(),
        }
    }

    #[test]
    fn test_not_found_page_for_every_markup_kind() {
        let page = markup(
            "<html><head><title>404 Not Found | MyDramaList</title></head><body></body></html>",
            "https://mydramalist.com/x",
        );
        for kind in ResourceKind::ALL.into_iter().filter(|k| !k.is_json_api()) {
            let err = normalize(kind, "x", &page).unwrap_err();
            assert!(matches!(err, ParseError::NotFound(_)), "{kind}: {err:?}");
        }
    }

    #[test]
    fn test_drama_titled_404_is_not_missing() {
        let page = markup(
            r#"<html><head><title>404 Forbidden (2024) - MyDramaList</title></head>
               <body><h1 class="film-title">404 Forbidden (2024)</h1></body></html>"#,
            "https://mydramalist.com/1-404-forbidden",
        );
        let CanonicalRecord::Drama(drama) = normalize(ResourceKind::Drama, "1-404-forbidden", &page).unwrap() else {
            panic!("expected drama record");
        };
        assert_eq!(drama.title, "404 Forbidden (2024)");
    }

    #[test]
    fn test_empty_body_is_upstream_changed() {
        let err = normalize(ResourceKind::Drama, "1-a", &markup("  ", "https://mydramalist.com/1-a")).unwrap_err();
        assert!(matches!(err, ParseError::UpstreamChanged(_)));
    }

    #[test]
    fn test_json_kind_rejects_markup() {
        let page = markup("<html><body>hi</body></html>", "https://mydramalist.com/v1/threads");
        let err = normalize(ResourceKind::Threads, "1", &page).unwrap_err();
        assert!(matches!(err, ParseError::UpstreamChanged(_)));
    }

    #[test]
    fn test_search_urls_use_response_origin() {
        let page = markup(
            r#"<div class="search-results"><div class="box" id="mdl-1"><h6 class="title"><a href="/1-a">A</a></h6></div></div>"#,
            "http://127.0.0.1:9000/search?q=a",
        );
        let CanonicalRecord::Search(found) = normalize(ResourceKind::Search, "a", &page).unwrap() else {
            panic!("expected search record");
        };
        assert_eq!(found.results[0].url.as_deref(), Some("http://127.0.0.1:9000/1-a"));
    }

    #[test]
    fn test_origin() {
        assert_eq!(origin("https://mydramalist.com/search?q=x"), "https://mydramalist.com");
        assert_eq!(origin("not a url"), "");
    }
}
