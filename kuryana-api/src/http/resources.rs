//! Catalog resource endpoints
//!
//! Every handler forwards path and query values to the dispatcher as
//! strings; validation happens in the resolver so bad input gets the
//! standard error body.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Router,
};
use kuryana_core::{QueryOptions, ResourceKind};

use crate::http::{ApiResponse, AppState};

pub fn create_resource_router() -> Router<AppState> {
    Router::new()
        .route("/search/q/{query}", get(search))
        .route("/id/{id}", get(drama))
        .route("/id/{id}/cast", get(cast))
        .route("/id/{id}/episodes", get(episodes))
        .route("/id/{id}/episode/{number}", get(episode))
        .route("/id/{id}/recs", get(recommendations))
        .route("/id/{id}/reviews", get(reviews))
        .route("/id/{id}/threads", get(threads))
        .route("/people/{id}", get(person))
        .route("/dramalist/{id}", get(dramalist))
        .route("/list/{id}", get(curated_list))
        .route("/seasonal/{year}/{quarter}", get(seasonal))
}

/// Query string keys each list-like route understands
const REVIEW_OPTIONS: &[&str] = &["page"];
const THREAD_OPTIONS: &[&str] = &["page", "limit", "sort", "after"];

fn options_from(query: &HashMap<String, String>, keys: &[&str]) -> QueryOptions {
    keys.iter()
        .filter_map(|key| query.get(*key).map(|value| (*key, value.clone())))
        .collect()
}

async fn dispatch(
    state: &AppState,
    kind: ResourceKind,
    identifier: &str,
    options: QueryOptions,
) -> ApiResponse {
    state.dispatcher.dispatch(kind, identifier, options).await.into()
}

pub async fn search(State(state): State<AppState>, Path(query): Path<String>) -> ApiResponse {
    dispatch(&state, ResourceKind::Search, &query, QueryOptions::new()).await
}

pub async fn drama(State(state): State<AppState>, Path(id): Path<String>) -> ApiResponse {
    dispatch(&state, ResourceKind::Drama, &id, QueryOptions::new()).await
}

pub async fn cast(State(state): State<AppState>, Path(id): Path<String>) -> ApiResponse {
    dispatch(&state, ResourceKind::Cast, &id, QueryOptions::new()).await
}

pub async fn episodes(State(state): State<AppState>, Path(id): Path<String>) -> ApiResponse {
    dispatch(&state, ResourceKind::Episodes, &id, QueryOptions::new()).await
}

pub async fn episode(
    State(state): State<AppState>,
    Path((id, number)): Path<(String, String)>,
) -> ApiResponse {
    let options = QueryOptions::new().with("number", number);
    dispatch(&state, ResourceKind::Episode, &id, options).await
}

pub async fn recommendations(State(state): State<AppState>, Path(id): Path<String>) -> ApiResponse {
    dispatch(&state, ResourceKind::Recommendations, &id, QueryOptions::new()).await
}

pub async fn reviews(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResponse {
    let options = options_from(&query, REVIEW_OPTIONS);
    dispatch(&state, ResourceKind::Reviews, &id, options).await
}

pub async fn threads(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> ApiResponse {
    let options = options_from(&query, THREAD_OPTIONS);
    dispatch(&state, ResourceKind::Threads, &id, options).await
}

pub async fn person(State(state): State<AppState>, Path(id): Path<String>) -> ApiResponse {
    dispatch(&state, ResourceKind::Person, &id, QueryOptions::new()).await
}

pub async fn dramalist(State(state): State<AppState>, Path(id): Path<String>) -> ApiResponse {
    dispatch(&state, ResourceKind::UserDramalist, &id, QueryOptions::new()).await
}

pub async fn curated_list(State(state): State<AppState>, Path(id): Path<String>) -> ApiResponse {
    dispatch(&state, ResourceKind::CuratedList, &id, QueryOptions::new()).await
}

pub async fn seasonal(
    State(state): State<AppState>,
    Path((year, quarter)): Path<(String, String)>,
) -> ApiResponse {
    let identifier = format!("{year}-{quarter}");
    let options = QueryOptions::new().with("year", year).with("quarter", quarter);
    dispatch(&state, ResourceKind::SeasonalCalendar, &identifier, options).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_keeps_known_keys() {
        let query: HashMap<String, String> = [("page", "2"), ("sort", "top"), ("evil", "1")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let options = options_from(&query, THREAD_OPTIONS);
        assert_eq!(options.string("page").as_deref(), Some("2"));
        assert_eq!(options.string("sort").as_deref(), Some("top"));
        assert_eq!(options.get("evil"), None);
        assert_eq!(options.get("limit"), None);
    }
}
