//! Resource Resolver
//!
//! Pure mapping from `(kind, identifier, options)` to the upstream request
//! that serves it. No I/O, no state: the same input always yields the same
//! [`UpstreamRequest`].

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ResolveError;
use crate::kind::ResourceKind;
use crate::request::{QueryOptions, ResourceRequest};
use crate::transport::ContentType;

// Compile-time constant pattern; Regex::new cannot fail on it.
static RE_PATH_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._~-]+$").expect("invalid path segment regex"));

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_THREAD_LIMIT: i64 = 50;
pub const MAX_THREAD_LIMIT: i64 = 100;
pub const DEFAULT_THREAD_SORT: &str = "recent";
pub const THREAD_LANG: &str = "en-US";
pub const MIN_YEAR: i64 = 1900;
pub const MAX_YEAR: i64 = 2100;

/// Upper bound for page-like options.
const MAX_PAGE: i64 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    /// Parameters are sent as an urlencoded form body
    PostForm,
}

/// A fully resolved upstream request, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRequest {
    pub method: HttpMethod,
    pub path: String,
    /// Query parameters for GET, form fields for POST. Sorted, so two
    /// resolutions of the same input compare equal.
    pub params: BTreeMap<String, String>,
    pub expects: ContentType,
}

impl UpstreamRequest {
    fn page(path: String) -> Self {
        Self {
            method: HttpMethod::Get,
            path,
            params: BTreeMap::new(),
            expects: ContentType::Markup,
        }
    }

    fn with_param(mut self, key: &str, value: impl ToString) -> Self {
        self.params.insert(key.to_string(), value.to_string());
        self
    }
}

/// Resolve a request into its upstream path and parameters.
pub fn resolve(
    kind: ResourceKind,
    identifier: &str,
    options: &QueryOptions,
) -> Result<UpstreamRequest, ResolveError> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(ResolveError::Invalid("identifier must not be empty".to_string()));
    }

    let request = match kind {
        ResourceKind::Drama => UpstreamRequest::page(format!("/{}", path_segment(identifier)?)),
        ResourceKind::Cast => UpstreamRequest::page(format!("/{}/cast", path_segment(identifier)?)),
        ResourceKind::Episodes => {
            UpstreamRequest::page(format!("/{}/episodes", path_segment(identifier)?))
        }
        ResourceKind::Episode => {
            let number = options
                .int("number")?
                .ok_or_else(|| ResolveError::Invalid("episode number is required".to_string()))?;
            if number < 1 {
                return Err(ResolveError::Invalid(format!(
                    "episode number must be at least 1, got {number}"
                )));
            }
            UpstreamRequest::page(format!("/{}/episode/{number}", path_segment(identifier)?))
        }
        ResourceKind::Recommendations => {
            UpstreamRequest::page(format!("/{}/recs", path_segment(identifier)?))
        }
        ResourceKind::Reviews => {
            let page = options.int_in_range("page", 1, MAX_PAGE, DEFAULT_PAGE)?;
            UpstreamRequest::page(format!("/{}/reviews", path_segment(identifier)?))
                .with_param("page", page)
        }
        ResourceKind::Person => {
            UpstreamRequest::page(format!("/people/{}", path_segment(identifier)?))
        }
        ResourceKind::UserDramalist => {
            UpstreamRequest::page(format!("/dramalist/{}", path_segment(identifier)?))
        }
        ResourceKind::CuratedList => {
            UpstreamRequest::page(format!("/list/{}", path_segment(identifier)?))
        }
        ResourceKind::Threads => resolve_threads(identifier, options)?,
        ResourceKind::SeasonalCalendar => resolve_seasonal(options)?,
        ResourceKind::Search => UpstreamRequest::page("/search".to_string()).with_param("q", identifier),
    };

    Ok(request)
}

/// Resolve a [`ResourceRequest`].
pub fn resolve_request(request: &ResourceRequest) -> Result<UpstreamRequest, ResolveError> {
    resolve(request.kind, &request.identifier, &request.options)
}

/// Keep the leading numeric id of a slug such as `687393-the-prisoner-of-beauty`.
///
/// Splits on the first `-`; without one the whole identifier is the id.
pub fn numeric_id(identifier: &str) -> Result<&str, ResolveError> {
    let id = identifier.split_once('-').map_or(identifier, |(head, _)| head);
    if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
        Ok(id)
    } else {
        Err(ResolveError::Invalid(format!(
            "identifier '{identifier}' does not start with a numeric id"
        )))
    }
}

fn path_segment(identifier: &str) -> Result<&str, ResolveError> {
    if identifier == "." || identifier == ".." || !RE_PATH_SEGMENT.is_match(identifier) {
        return Err(ResolveError::Invalid(format!(
            "identifier '{identifier}' contains characters not allowed in a path"
        )));
    }
    Ok(identifier)
}

fn resolve_threads(
    identifier: &str,
    options: &QueryOptions,
) -> Result<UpstreamRequest, ResolveError> {
    let id = numeric_id(identifier)?;
    let page = options.int_in_range("page", 1, MAX_PAGE, DEFAULT_PAGE)?;
    let limit = options.int_in_range("limit", 1, MAX_THREAD_LIMIT, DEFAULT_THREAD_LIMIT)?;

    let sort = options
        .string("sort")
        .unwrap_or_else(|| DEFAULT_THREAD_SORT.to_string());
    if sort.is_empty() || !sort.bytes().all(|b| b.is_ascii_lowercase() || b == b'_') {
        return Err(ResolveError::Invalid(format!(
            "option 'sort' must be a lowercase word, got '{sort}'"
        )));
    }

    let mut request = UpstreamRequest {
        method: HttpMethod::Get,
        path: "/v1/threads".to_string(),
        params: BTreeMap::new(),
        expects: ContentType::JsonApi,
    }
    .with_param("t", id)
    .with_param("c", "title")
    .with_param("page", page)
    .with_param("limit", limit)
    .with_param("sort", sort)
    .with_param("lang", THREAD_LANG);

    if let Some(after) = options.int("after")? {
        if after < 0 {
            return Err(ResolveError::Invalid(format!(
                "option 'after' must not be negative, got {after}"
            )));
        }
        request = request.with_param("after", after);
    }

    Ok(request)
}

fn resolve_seasonal(options: &QueryOptions) -> Result<UpstreamRequest, ResolveError> {
    let year = options
        .int("year")?
        .ok_or_else(|| ResolveError::Invalid("option 'year' is required".to_string()))?;
    let quarter = options
        .int("quarter")?
        .ok_or_else(|| ResolveError::Invalid("option 'quarter' is required".to_string()))?;

    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(ResolveError::Invalid(format!(
            "year must be between {MIN_YEAR} and {MAX_YEAR}, got {year}"
        )));
    }
    if !(1..=4).contains(&quarter) {
        return Err(ResolveError::Invalid(format!(
            "quarter must be between 1 and 4, got {quarter}"
        )));
    }

    Ok(UpstreamRequest {
        method: HttpMethod::PostForm,
        path: "/v1/quarter_calendar".to_string(),
        params: BTreeMap::new(),
        expects: ContentType::JsonApi,
    }
    .with_param("quarter", quarter)
    .with_param("year", year))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seasonal(year: i64, quarter: i64) -> QueryOptions {
        QueryOptions::new().with("year", year).with("quarter", quarter)
    }

    #[test]
    fn test_resolve_is_deterministic() {
        for kind in ResourceKind::ALL {
            let options = match kind {
                ResourceKind::Episode => QueryOptions::new().with("number", 3),
                ResourceKind::SeasonalCalendar => seasonal(2021, 2),
                _ => QueryOptions::new(),
            };
            let first = resolve(kind, "687393-the-prisoner-of-beauty", &options).unwrap();
            let second = resolve(kind, "687393-the-prisoner-of-beauty", &options).unwrap();
            assert_eq!(first, second, "{kind} resolved differently");
        }
    }

    #[test]
    fn test_thread_slug_is_stripped() {
        let slugged = resolve(ResourceKind::Threads, "687393-the-prisoner-of-beauty", &QueryOptions::new())
            .unwrap();
        let bare = resolve(ResourceKind::Threads, "687393", &QueryOptions::new()).unwrap();

        assert_eq!(slugged.params["t"], "687393");
        assert_eq!(slugged, bare);
    }

    #[test]
    fn test_thread_defaults_match_explicit_values() {
        let implicit = resolve(ResourceKind::Threads, "687393", &QueryOptions::new()).unwrap();
        let explicit = resolve(
            ResourceKind::Threads,
            "687393",
            &QueryOptions::new().with("page", 1).with("sort", "recent"),
        )
        .unwrap();

        assert_eq!(implicit.params, explicit.params);
        assert_eq!(implicit.params["limit"], "50");
        assert_eq!(implicit.params["c"], "title");
        assert_eq!(implicit.params["lang"], "en-US");
        assert!(!implicit.params.contains_key("after"));
    }

    #[test]
    fn test_thread_options_are_bounded() {
        let too_many = QueryOptions::new().with("limit", 500);
        assert!(resolve(ResourceKind::Threads, "1", &too_many).is_err());

        let negative_cursor = QueryOptions::new().with("after", -1);
        assert!(resolve(ResourceKind::Threads, "1", &negative_cursor).is_err());

        let cursor = QueryOptions::new().with("after", "12345");
        let request = resolve(ResourceKind::Threads, "1", &cursor).unwrap();
        assert_eq!(request.params["after"], "12345");
    }

    #[test]
    fn test_thread_requires_numeric_prefix() {
        let err = resolve(ResourceKind::Threads, "the-prisoner", &QueryOptions::new()).unwrap_err();
        assert!(matches!(err, ResolveError::Invalid(_)));
    }

    #[test]
    fn test_seasonal_quarter_validation() {
        assert!(resolve(ResourceKind::SeasonalCalendar, "_", &seasonal(2021, 5)).is_err());

        let ok = resolve(ResourceKind::SeasonalCalendar, "_", &seasonal(2021, 4)).unwrap();
        assert_eq!(ok.method, HttpMethod::PostForm);
        assert_eq!(ok.params["quarter"], "4");
        assert_eq!(ok.params["year"], "2021");
    }

    #[test]
    fn test_seasonal_year_validation() {
        assert!(resolve(ResourceKind::SeasonalCalendar, "_", &seasonal(1200, 1)).is_err());
        assert!(resolve(ResourceKind::SeasonalCalendar, "_", &QueryOptions::new()).is_err());
    }

    #[test]
    fn test_page_paths() {
        let opts = QueryOptions::new();
        assert_eq!(resolve(ResourceKind::Drama, "1-a", &opts).unwrap().path, "/1-a");
        assert_eq!(resolve(ResourceKind::Cast, "1-a", &opts).unwrap().path, "/1-a/cast");
        assert_eq!(resolve(ResourceKind::Recommendations, "1-a", &opts).unwrap().path, "/1-a/recs");
        assert_eq!(resolve(ResourceKind::Person, "5-b", &opts).unwrap().path, "/people/5-b");
        assert_eq!(resolve(ResourceKind::UserDramalist, "me", &opts).unwrap().path, "/dramalist/me");
        assert_eq!(resolve(ResourceKind::CuratedList, "9", &opts).unwrap().path, "/list/9");

        let episode = resolve(ResourceKind::Episode, "1-a", &QueryOptions::new().with("number", "7")).unwrap();
        assert_eq!(episode.path, "/1-a/episode/7");

        let reviews = resolve(ResourceKind::Reviews, "1-a", &opts).unwrap();
        assert_eq!(reviews.path, "/1-a/reviews");
        assert_eq!(reviews.params["page"], "1");
    }

    #[test]
    fn test_episode_number_required() {
        assert!(resolve(ResourceKind::Episode, "1-a", &QueryOptions::new()).is_err());
        assert!(resolve(ResourceKind::Episode, "1-a", &QueryOptions::new().with("number", 0)).is_err());
        assert!(resolve(ResourceKind::Episode, "1-a", &QueryOptions::new().with("number", "x")).is_err());
    }

    #[test]
    fn test_path_identifier_rejects_traversal() {
        let opts = QueryOptions::new();
        assert!(resolve(ResourceKind::Drama, "..", &opts).is_err());
        assert!(resolve(ResourceKind::Drama, "a/b", &opts).is_err());
        assert!(resolve(ResourceKind::Drama, "a?b=c", &opts).is_err());
        assert!(resolve(ResourceKind::Drama, "", &opts).is_err());
    }

    #[test]
    fn test_search_query_goes_to_params() {
        let request = resolve(ResourceKind::Search, "goblin / 2016", &QueryOptions::new()).unwrap();
        assert_eq!(request.path, "/search");
        assert_eq!(request.params["q"], "goblin / 2016");
    }
}
