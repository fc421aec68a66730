//! Fetching one page of the lecture listing.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use futures::future::{AbortHandle, Abortable};
use lecture_observability::{RequestId, StructuredLogger};
use lecture_search::{FilterCriteria, PaginationInfo};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{ApiConfig, FetchClient, FetchError};

/// One lecture as returned by the listing API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lecture {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub lecturer: String,
    #[serde(default)]
    pub faculty: String,
    /// Mean review rating, absent until the first review.
    #[serde(default)]
    pub avg_rating: Option<f64>,
    #[serde(default)]
    pub review_count: u32,
}

/// A page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingPage<T> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

#[derive(Deserialize)]
struct ListingBody<T> {
    lectures: Vec<T>,
    pagination: PaginationInfo,
}

impl<T> ListingBody<T> {
    fn into_page(self) -> ListingPage<T> {
        ListingPage {
            items: self.lectures,
            pagination: self.pagination,
        }
    }
}

/// Query parameters sent to the API: every active field, then `page`.
///
/// Unlike the URL encoding, `page` is always present.
pub fn listing_params(criteria: &FilterCriteria) -> Vec<(&'static str, String)> {
    let mut params = criteria.active_params();
    params.push(("page", criteria.page.to_string()));
    params
}

/// Fetches listing pages with last-request-wins semantics.
///
/// Starting a fetch aborts the one in flight. A response that completes
/// after a newer fetch has started resolves to [`FetchError::Cancelled`]
/// and must not be applied.
pub struct ListingDataSource<T = Lecture> {
    client: FetchClient,
    path: String,
    generation: AtomicU64,
    in_flight: Mutex<Option<AbortHandle>>,
    _item: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> ListingDataSource<T> {
    pub fn new(client: FetchClient, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
            generation: AtomicU64::new(0),
            in_flight: Mutex::new(None),
            _item: PhantomData,
        }
    }

    /// Build a reqwest-backed data source from configuration.
    pub fn from_config(config: &ApiConfig) -> Result<Self, FetchError> {
        Ok(Self::new(
            FetchClient::from_config(config)?,
            config.listing_path.clone(),
        ))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Number of fetches started or cancelled so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Fetch the page described by `criteria`.
    pub async fn fetch(&self, criteria: &FilterCriteria) -> Result<ListingPage<T>, FetchError> {
        let (handle, registration) = AbortHandle::new_pair();
        let generation = {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(previous) = in_flight.replace(handle) {
                previous.abort();
            }
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        };

        let request_id = RequestId::generate();
        let logger = StructuredLogger::new(request_id.clone()).with_route(self.path.clone());
        let params = listing_params(criteria);
        logger
            .debug_builder("listing fetch started")
            .field_u64("generation", generation)
            .field_u64("page", criteria.page as u64)
            .field_u64("params", params.len() as u64)
            .emit();

        let request = self
            .client
            .get(self.path.clone())
            .query_pairs(params)
            .header("X-Request-Id", request_id.to_string());

        let outcome = Abortable::new(
            async move {
                let response = request.send().await?.error_for_status()?;
                response.json::<ListingBody<T>>()
            },
            registration,
        )
        .await;

        let superseded = {
            let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            let current = self.generation.load(Ordering::SeqCst);
            if current == generation {
                *in_flight = None;
            }
            current != generation
        };

        let result = match outcome {
            Err(_aborted) => Err(FetchError::Cancelled),
            Ok(_) if superseded => Err(FetchError::Cancelled),
            Ok(body) => body.map(ListingBody::into_page),
        };

        match &result {
            Ok(page) => logger
                .info_builder("listing fetch completed")
                .field_u64("items", page.items.len() as u64)
                .field_u64("total_count", page.pagination.total_count)
                .emit(),
            Err(FetchError::Cancelled) => logger
                .debug_builder("listing fetch superseded")
                .field_u64("generation", generation)
                .emit(),
            Err(err) => logger
                .warn_builder("listing fetch failed")
                .field("error", err.to_string())
                .field_bool("server_error", err.status().is_some_and(|s| s >= 500))
                .emit(),
        }

        result
    }

    /// Abort the in-flight fetch, if any.
    pub fn cancel(&self) {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = in_flight.take() {
            handle.abort();
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::{FetchError, RequestBuilder, Response, Transport};

    /// Canned reply for requests whose `search` param matches `keyword`.
    pub struct Route {
        pub keyword: &'static str,
        pub delay: Duration,
        pub status: u16,
        pub body: String,
    }

    /// In-memory API keyed on the `search` query parameter.
    #[derive(Default)]
    pub struct ScriptedApi {
        routes: Vec<Route>,
        pub requests: Mutex<Vec<RequestBuilder>>,
    }

    impl ScriptedApi {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn route(mut self, keyword: &'static str, delay_ms: u64, status: u16, body: String) -> Self {
            self.routes.push(Route {
                keyword,
                delay: Duration::from_millis(delay_ms),
                status,
                body,
            });
            self
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Transport for ScriptedApi {
        async fn send(&self, request: RequestBuilder) -> Result<Response, FetchError> {
            let keyword = request
                .query_params()
                .iter()
                .find(|(k, _)| k == "search")
                .map(|(_, v)| v.clone())
                .unwrap_or_default();
            self.requests.lock().unwrap().push(request);

            let Some(route) = self.routes.iter().find(|r| r.keyword == keyword) else {
                return Err(FetchError::Transport(format!("no route for {:?}", keyword)));
            };
            tokio::time::sleep(route.delay).await;
            Ok(Response::new(
                route.status,
                HashMap::new(),
                route.body.clone().into_bytes(),
            ))
        }
    }

    /// Listing body with `count` lectures titled after `tag`.
    pub fn listing_json(tag: &str, count: u64, current_page: u32, total_count: u64) -> String {
        let lectures: Vec<_> = (1..=count)
            .map(|id| {
                serde_json::json!({
                    "id": id,
                    "title": format!("{} {}", tag, id),
                    "lecturer": "Prof. Tanaka",
                    "faculty": "science",
                    "avg_rating": 4.5,
                    "review_count": 12,
                })
            })
            .collect();
        serde_json::json!({
            "lectures": lectures,
            "pagination": {
                "current_page": current_page,
                "total_pages": total_count.div_ceil(20),
                "total_count": total_count,
                "per_page": 20,
            }
        })
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use lecture_search::Field;

    use super::testing::{listing_json, ScriptedApi};
    use super::*;
    use crate::auth::{BearerAuth, StaticToken};

    fn source(api: Arc<ScriptedApi>) -> ListingDataSource {
        ListingDataSource::new(
            FetchClient::new(api).with_base_url("http://api.test"),
            "/lectures",
        )
    }

    fn keyword(k: &str) -> FilterCriteria {
        let mut c = FilterCriteria::new();
        c.set(Field::Keyword, k).unwrap();
        c
    }

    // === Query Tests ===

    #[test]
    fn test_listing_params_always_include_page() {
        assert_eq!(listing_params(&FilterCriteria::new()), vec![("page", "1".to_string())]);

        let mut c = keyword("calculus");
        c.set(Field::PeriodTerm, "fall").unwrap();
        c.page = 3;
        assert_eq!(
            listing_params(&c),
            vec![
                ("search", "calculus".to_string()),
                ("period_term", "fall".to_string()),
                ("page", "3".to_string()),
            ]
        );
    }

    // === Fetch Tests ===

    #[tokio::test]
    async fn test_fetch_success() {
        let api = Arc::new(ScriptedApi::new().route("calculus", 0, 200, listing_json("Calculus", 3, 1, 3)));
        let ds = source(api.clone());

        let page = ds.fetch(&keyword("calculus")).await.unwrap();
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.items[0].title, "Calculus 1");
        assert_eq!(page.pagination.total_count, 3);

        let requests = api.requests.lock().unwrap();
        assert_eq!(
            requests[0].full_url(),
            "http://api.test/lectures?search=calculus&page=1"
        );
        assert!(requests[0].has_header("X-Request-Id"));
    }

    #[tokio::test]
    async fn test_fetch_http_500() {
        let api = Arc::new(ScriptedApi::new().route("", 0, 500, "oops".into()));
        let err = source(api).fetch(&FilterCriteria::new()).await.unwrap_err();
        assert_eq!(
            err,
            FetchError::Http {
                status: 500,
                message: "oops".into()
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_malformed_bodies() {
        let api = Arc::new(
            ScriptedApi::new()
                .route("", 0, 200, "<html>".into())
                .route("nolist", 0, 200, r#"{"pagination": {"current_page":1,"total_pages":1,"total_count":0,"per_page":20}}"#.into())
                .route("typed", 0, 200, r#"{"lectures": "many", "pagination": null}"#.into()),
        );
        let ds = source(api);

        for criteria in [FilterCriteria::new(), keyword("nolist"), keyword("typed")] {
            let err = ds.fetch(&criteria).await.unwrap_err();
            assert!(matches!(err, FetchError::MalformedResponse(_)), "{:?}", err);
        }
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let api = Arc::new(ScriptedApi::new());
        let err = source(api).fetch(&keyword("unrouted")).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_request_wins() {
        let api = Arc::new(
            ScriptedApi::new()
                .route("slow", 500, 200, listing_json("Slow", 2, 1, 2))
                .route("fast", 10, 200, listing_json("Fast", 1, 1, 1)),
        );
        let ds = source(api.clone());

        let (slow, fast) = (keyword("slow"), keyword("fast"));
        let (first, second) = tokio::join!(ds.fetch(&slow), ds.fetch(&fast));

        assert_eq!(first.unwrap_err(), FetchError::Cancelled);
        let page = second.unwrap();
        assert_eq!(page.items[0].title, "Fast 1");
        assert_eq!(api.request_count(), 2);
        assert_eq!(ds.generation(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_aborts_in_flight() {
        let api = Arc::new(ScriptedApi::new().route("slow", 500, 200, listing_json("Slow", 1, 1, 1)));
        let ds = source(api);

        let slow = keyword("slow");
        let (result, ()) = tokio::join!(ds.fetch(&slow), async {
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            ds.cancel();
        });
        assert!(result.unwrap_err().is_cancelled());
    }

    #[tokio::test]
    async fn test_bearer_token_injected() {
        let api = Arc::new(ScriptedApi::new().route("", 0, 200, listing_json("L", 1, 1, 1)));
        let client = FetchClient::new(api.clone())
            .with_base_url("http://api.test")
            .with_interceptor(BearerAuth::new(StaticToken::new("secret")));
        let ds: ListingDataSource = ListingDataSource::new(client, "/lectures");

        ds.fetch(&FilterCriteria::new()).await.unwrap();
        let requests = api.requests.lock().unwrap();
        assert_eq!(
            requests[0].headers().get("Authorization").unwrap(),
            "Bearer secret"
        );
    }

    #[test]
    fn test_lecture_optional_fields_default() {
        let lecture: Lecture =
            serde_json::from_str(r#"{"id": 7, "title": "Ethics", "extra": true}"#).unwrap();
        assert_eq!(lecture.avg_rating, None);
        assert_eq!(lecture.review_count, 0);
        assert!(lecture.lecturer.is_empty());
    }
}
