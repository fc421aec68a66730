//! Draft/committed search state and its synchronisation with the URL.

use crate::codec::PersistedQuery;
use crate::criteria::{Field, FilterCriteria};
use crate::history::History;
use crate::pagination::PaginationInfo;
use crate::storage::{SessionFallback, SessionStorage};
use crate::SearchError;

/// The two live copies of the listing's criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    /// What the user is editing. Never fetched.
    pub draft: FilterCriteria,
    /// The last criteria that produced a fetch. Mirrors the URL.
    pub committed: FilterCriteria,
}

/// Instruction to run a listing fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchSignal {
    /// Snapshot of the committed criteria to fetch with.
    pub criteria: FilterCriteria,
    /// The URL query written for `criteria`.
    pub query: PersistedQuery,
}

impl FetchSignal {
    fn for_criteria(criteria: &FilterCriteria) -> Self {
        Self {
            criteria: criteria.clone(),
            query: PersistedQuery::encode(criteria),
        }
    }
}

/// Mediates between user edits, the URL and the data source.
///
/// `committed` only changes through [`commit`](Self::commit),
/// [`change_page`](Self::change_page) and [`sync_from_url`](Self::sync_from_url),
/// each of which replaces it whole and writes its encoding to history.
pub struct SearchStateController<H> {
    state: SearchState,
    history: H,
    pagination: Option<PaginationInfo>,
}

impl<H: History> SearchStateController<H> {
    /// Build the initial state for a freshly mounted listing.
    ///
    /// Each of keyword and faculty resolves from the URL first, then the
    /// session fallback, then its default. The fallback keys are consumed.
    /// If a fallback value was used the URL is rewritten in place so that a
    /// refresh or a shared link keeps it.
    pub fn initialize(
        url_query: &PersistedQuery,
        storage: &mut dyn SessionStorage,
        mut history: H,
    ) -> Self {
        let fallback = SessionFallback::take(storage);
        let mut committed = url_query.decode();
        let mut used_fallback = false;

        if !committed.is_active(Field::Keyword) {
            if let Some(word) = fallback.search_word {
                committed.keyword = word;
                used_fallback = true;
            }
        }

        if !committed.is_active(Field::Faculty) {
            if let Some(faculty) = fallback.selected_faculty {
                committed.faculty = faculty;
                used_fallback = true;
            }
        }

        if used_fallback {
            let query = PersistedQuery::encode(&committed);
            tracing::info!(query = %query, "restored search from session fallback");
            history.replace(&query);
        }

        Self {
            state: SearchState {
                draft: committed.clone(),
                committed,
            },
            history,
            pagination: None,
        }
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn draft(&self) -> &FilterCriteria {
        &self.state.draft
    }

    pub fn committed(&self) -> &FilterCriteria {
        &self.state.committed
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    /// Pagination from the last successful fetch.
    pub fn pagination(&self) -> Option<&PaginationInfo> {
        self.pagination.as_ref()
    }

    /// Last known total page count, if any fetch has succeeded.
    pub fn total_pages(&self) -> Option<u32> {
        self.pagination.map(|p| p.total_pages)
    }

    /// Canonical URL query for the committed criteria.
    pub fn persisted_query(&self) -> PersistedQuery {
        PersistedQuery::encode(&self.state.committed)
    }

    /// Signal for the fetch that runs right after mount.
    pub fn initial_fetch(&self) -> FetchSignal {
        FetchSignal::for_criteria(&self.state.committed)
    }

    /// Set one field of the draft.
    ///
    /// Touches neither the committed criteria nor the URL.
    pub fn update_draft_field(
        &mut self,
        field: Field,
        value: impl Into<String>,
    ) -> Result<&SearchState, SearchError> {
        self.state.draft.set(field, value)?;
        Ok(&self.state)
    }

    /// Promote the whole draft to committed, back on page 1.
    pub fn commit(&mut self) -> FetchSignal {
        self.state.draft.page = 1;
        self.state.committed = self.state.draft.clone();

        let signal = FetchSignal::for_criteria(&self.state.committed);
        tracing::debug!(query = %signal.query, "committed search");
        self.history.push(&signal.query);
        signal
    }

    /// Move the committed criteria to another page.
    ///
    /// Returns `None` without touching anything if `page` is 0 or beyond the
    /// last known page count.
    pub fn change_page(&mut self, page: u32) -> Option<FetchSignal> {
        if page < 1 {
            return None;
        }
        if let Some(pagination) = &self.pagination {
            if !pagination.contains(page) {
                tracing::debug!(page, last = pagination.last_page(), "rejected out-of-range page");
                return None;
            }
        }

        self.state.committed = self.state.committed.with_page(page);
        self.state.draft.page = page;

        let signal = FetchSignal::for_criteria(&self.state.committed);
        self.history.push(&signal.query);
        Some(signal)
    }

    /// Reset the detailed filters of the draft.
    pub fn clear_draft_filters(&mut self) -> &SearchState {
        self.state.draft.clear_detailed();
        &self.state
    }

    /// Throw away uncommitted edits.
    pub fn discard_draft(&mut self) -> &SearchState {
        self.state.draft = self.state.committed.clone();
        &self.state
    }

    /// Whether the draft has edits not yet committed.
    pub fn is_draft_dirty(&self) -> bool {
        !self.state.draft.same_filters(&self.state.committed)
    }

    /// Record pagination from a successful fetch.
    pub fn observe_pagination(&mut self, pagination: &PaginationInfo) {
        self.pagination = Some(*pagination);
    }

    /// Follow a URL change made outside the controller (back/forward).
    ///
    /// Both copies are rebuilt from the URL alone. Nothing is written to
    /// history. Returns a signal only if the committed criteria changed.
    pub fn sync_from_url(&mut self, url_query: &PersistedQuery) -> Option<FetchSignal> {
        let criteria = url_query.decode();
        if criteria == self.state.committed {
            return None;
        }

        self.state = SearchState {
            draft: criteria.clone(),
            committed: criteria,
        };
        Some(FetchSignal::for_criteria(&self.state.committed))
    }
}
