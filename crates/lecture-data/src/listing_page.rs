//! The lecture listing page: controller, data source and view wired together.

use lecture_search::{
    Field, FetchSignal, History, PersistedQuery, SearchError, SearchStateController,
    SessionStorage,
};
use serde::de::DeserializeOwned;

use crate::{Lecture, ListingDataSource, ListingView};

/// Drives one listing page.
///
/// Every fetch runs against the committed criteria carried by a
/// [`FetchSignal`]; successful pagination is fed back to the controller so
/// page changes can be bounds-checked.
pub struct LectureListing<H, T = Lecture> {
    controller: SearchStateController<H>,
    source: ListingDataSource<T>,
    view: ListingView<T>,
}

impl<H: History, T: DeserializeOwned> LectureListing<H, T> {
    /// Mount the page and run the initial fetch.
    pub async fn mount(
        url_query: &PersistedQuery,
        storage: &mut dyn SessionStorage,
        history: H,
        source: ListingDataSource<T>,
    ) -> Self {
        let controller = SearchStateController::initialize(url_query, storage, history);
        let mut listing = Self::new(controller, source);
        listing.refresh().await;
        listing
    }

    /// Wrap an initialized controller without fetching anything yet.
    pub fn new(controller: SearchStateController<H>, source: ListingDataSource<T>) -> Self {
        Self {
            controller,
            source,
            view: ListingView::new(),
        }
    }

    /// Fetch the committed criteria again.
    pub async fn refresh(&mut self) -> &ListingView<T> {
        let signal = self.controller.initial_fetch();
        self.run(signal).await;
        &self.view
    }

    /// Edit one draft field. Never fetches.
    pub fn edit(&mut self, field: Field, value: impl Into<String>) -> Result<(), SearchError> {
        self.controller.update_draft_field(field, value)?;
        Ok(())
    }

    /// Commit the draft and fetch page 1.
    pub async fn search(&mut self) -> &ListingView<T> {
        let signal = self.controller.commit();
        self.run(signal).await;
        &self.view
    }

    /// Fetch another page of the committed search.
    ///
    /// Returns `false` if the page was out of range and nothing happened.
    pub async fn goto_page(&mut self, page: u32) -> bool {
        match self.controller.change_page(page) {
            Some(signal) => {
                self.run(signal).await;
                true
            }
            None => false,
        }
    }

    /// Reset the detailed filters of the draft. Never fetches.
    pub fn clear_filters(&mut self) {
        self.controller.clear_draft_filters();
    }

    /// Follow an external URL change; fetches only if the criteria changed.
    pub async fn navigate(&mut self, url_query: &PersistedQuery) -> bool {
        match self.controller.sync_from_url(url_query) {
            Some(signal) => {
                self.run(signal).await;
                true
            }
            None => false,
        }
    }

    pub fn controller(&self) -> &SearchStateController<H> {
        &self.controller
    }

    pub fn view(&self) -> &ListingView<T> {
        &self.view
    }

    pub fn source(&self) -> &ListingDataSource<T> {
        &self.source
    }

    async fn run(&mut self, signal: FetchSignal) {
        tracing::debug!(query = %signal.query, "running listing fetch");
        self.view.begin_loading();

        let result = self.source.fetch(&signal.criteria).await;
        if let Ok(page) = &result {
            self.controller.observe_pagination(&page.pagination);
        }
        self.view.apply(result);
    }
}
