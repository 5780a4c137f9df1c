//! Canonical records
//!
//! Every field is always serialized. Values the upstream did not provide are
//! `null`, lists it did not provide are `[]`, so clients can tell "absent"
//! from "not fetched".

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Label/value pairs from a details box, e.g. `"Country" -> "China"`.
pub type Details = BTreeMap<String, String>;

/// Normalized output for one kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CanonicalRecord {
    Drama(Drama),
    Cast(CastPage),
    Episodes(EpisodeList),
    Episode(Episode),
    Recommendations(RecommendationPage),
    Reviews(ReviewPage),
    Person(Person),
    UserDramalist(UserDramalist),
    CuratedList(CuratedList),
    Search(SearchResults),
    /// Upstream JSON API payload, validated but not reshaped
    Api(Value),
}

/// Reference to another title
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TitleRef {
    pub slug: Option<String>,
    pub title: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CastRef {
    pub slug: Option<String>,
    pub name: String,
    pub role: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Drama {
    pub slug: String,
    pub title: String,
    pub native_title: Option<String>,
    pub poster: Option<String>,
    pub synopsis: Option<String>,
    pub rating: Option<f64>,
    pub episodes: Option<u32>,
    pub country: Option<String>,
    pub aired: Option<String>,
    pub genres: Vec<String>,
    pub tags: Vec<String>,
    pub details: Details,
    pub also_known_as: Vec<String>,
    pub cast: Vec<CastRef>,
    pub recommendations: Vec<TitleRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CastMember {
    pub slug: Option<String>,
    pub name: String,
    pub role: Option<String>,
    pub character: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CastGroup {
    pub role: String,
    pub people: Vec<CastMember>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CastPage {
    pub slug: String,
    pub title: String,
    pub poster: Option<String>,
    pub groups: Vec<CastGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeSummary {
    pub number: Option<u32>,
    pub title: String,
    pub image: Option<String>,
    pub air_date: Option<String>,
    pub rating: Option<f64>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeList {
    pub slug: String,
    pub title: String,
    pub episodes: Vec<EpisodeSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Episode {
    pub slug: String,
    pub title: String,
    pub episode_title: Option<String>,
    pub number: Option<u32>,
    pub image: Option<String>,
    pub air_date: Option<String>,
    pub rating: Option<f64>,
    pub synopsis: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub slug: Option<String>,
    pub title: String,
    pub image: Option<String>,
    pub recommended_by: Option<String>,
    pub reason: Option<String>,
    pub votes: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationPage {
    pub slug: String,
    pub title: String,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
    pub reviewer: Option<String>,
    pub overall_rating: Option<f64>,
    pub ratings: BTreeMap<String, f64>,
    pub body: Option<String>,
    pub helpful: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewPage {
    pub slug: String,
    pub title: String,
    pub page: Option<u32>,
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Work {
    pub section: String,
    pub year: Option<String>,
    pub title: String,
    pub slug: Option<String>,
    pub role: Option<String>,
    pub rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Person {
    pub slug: String,
    pub name: String,
    pub image: Option<String>,
    pub about: Option<String>,
    pub details: Details,
    pub works: Vec<Work>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListedTitle {
    pub slug: Option<String>,
    pub title: String,
    pub country: Option<String>,
    pub year: Option<String>,
    pub kind: Option<String>,
    pub score: Option<f64>,
    pub progress: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusList {
    pub status: String,
    pub items: Vec<ListedTitle>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserDramalist {
    pub user: String,
    pub lists: Vec<StatusList>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CuratedItem {
    pub rank: Option<u32>,
    pub slug: Option<String>,
    pub title: String,
    pub kind: Option<String>,
    pub year: Option<String>,
    pub image: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CuratedList {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub items: Vec<CuratedItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub slug: Option<String>,
    pub title: String,
    pub kind: Option<String>,
    pub year: Option<String>,
    pub episodes: Option<u32>,
    pub rating: Option<f64>,
    pub thumbnail: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub results: Vec<SearchResult>,
}
