//! View state for the listing: idle, loading, success or error.

use lecture_search::PaginationInfo;

use crate::{FetchError, ListingPage};

/// Where the listing is in its fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Success,
    /// Failed; carries the message shown to the user.
    Error(String),
}

/// What the listing currently displays.
///
/// Results and pagination survive a failed fetch so the page keeps showing
/// the last good data next to the error. A malformed body is the exception:
/// its items are dropped because they cannot be trusted.
#[derive(Debug, Clone)]
pub struct ListingView<T> {
    status: LoadStatus,
    items: Vec<T>,
    pagination: Option<PaginationInfo>,
    error: Option<FetchError>,
}

impl<T> Default for ListingView<T> {
    fn default() -> Self {
        Self {
            status: LoadStatus::Idle,
            items: Vec::new(),
            pagination: None,
            error: None,
        }
    }
}

impl<T> ListingView<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `Loading`. Current items and pagination stay visible.
    pub fn begin_loading(&mut self) {
        self.status = LoadStatus::Loading;
    }

    /// Apply the outcome of a fetch.
    ///
    /// Returns `false` if the outcome was a cancellation and was ignored.
    pub fn apply(&mut self, result: Result<ListingPage<T>, FetchError>) -> bool {
        match result {
            Ok(page) => {
                self.items = page.items;
                self.pagination = Some(page.pagination);
                self.error = None;
                self.status = LoadStatus::Success;
            }
            Err(FetchError::Cancelled) => return false,
            Err(err) => {
                if matches!(err, FetchError::MalformedResponse(_)) {
                    self.items.clear();
                }
                self.status = LoadStatus::Error(err.user_message());
                self.error = Some(err);
            }
        }
        true
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn pagination(&self) -> Option<&PaginationInfo> {
        self.pagination.as_ref()
    }

    /// The last error, cleared by the next success.
    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(titles: &[&str], total_count: u64) -> ListingPage<String> {
        ListingPage {
            items: titles.iter().map(|t| t.to_string()).collect(),
            pagination: PaginationInfo::new(1, 20, total_count),
        }
    }

    // === Transitions ===

    #[test]
    fn test_idle_loading_success() {
        let mut view = ListingView::new();
        assert_eq!(view.status(), &LoadStatus::Idle);

        view.begin_loading();
        assert!(view.is_loading());

        assert!(view.apply(Ok(page(&["a", "b"], 2))));
        assert_eq!(view.status(), &LoadStatus::Success);
        assert_eq!(view.items(), ["a", "b"]);
        assert_eq!(view.pagination().unwrap().total_count, 2);
    }

    #[test]
    fn test_server_error_keeps_stale_data() {
        let mut view = ListingView::new();
        view.apply(Ok(page(&["a"], 41)));

        view.begin_loading();
        view.apply(Err(FetchError::Http {
            status: 500,
            message: "boom".into(),
        }));

        assert!(!view.is_loading());
        assert!(matches!(view.status(), LoadStatus::Error(msg) if msg.contains("HTTP 500")));
        assert_eq!(view.items(), ["a"]);
        assert_eq!(view.pagination().unwrap().total_pages, 3);
        assert_eq!(view.error().and_then(FetchError::status), Some(500));
    }

    #[test]
    fn test_malformed_clears_items_keeps_pagination() {
        let mut view = ListingView::new();
        view.apply(Ok(page(&["a"], 1)));

        view.apply(Err(FetchError::MalformedResponse("missing lectures".into())));
        assert!(view.items().is_empty());
        assert!(view.pagination().is_some());
    }

    #[test]
    fn test_cancelled_is_ignored() {
        let mut view: ListingView<String> = ListingView::new();
        view.begin_loading();

        assert!(!view.apply(Err(FetchError::Cancelled)));
        assert!(view.is_loading());
        assert!(view.error().is_none());
    }

    #[test]
    fn test_success_clears_error() {
        let mut view = ListingView::new();
        view.apply(Err(FetchError::Timeout));
        assert!(view.error().is_some());

        view.apply(Ok(page(&[], 0)));
        assert!(view.error().is_none());
        assert_eq!(view.status(), &LoadStatus::Success);
    }
}
