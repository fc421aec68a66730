//! Search-state reconciliation for the lecture listing.
//!
//! This crate owns the listing's filter state and keeps it in step with the
//! URL:
//!
//! - **Criteria**: [`FilterCriteria`], [`Field`], [`SortOrder`] and the option
//!   set of every detailed filter
//! - **Codec**: [`PersistedQuery`], the minimal canonical query string
//! - **Controller**: [`SearchStateController`], draft vs. committed state
//! - **Storage**: one-shot session fallback read at mount
//!
//! # Example
//!
//! ```rust,ignore
//! use lecture_search::prelude::*;
//!
//! let url = PersistedQuery::parse(location_search);
//! let mut controller =
//!     SearchStateController::initialize(&url, &mut session_storage, browser_history);
//!
//! // Keystrokes only touch the draft
//! controller.update_draft_field(Field::Keyword, "calculus")?;
//!
//! // The search button promotes it and tells the page to fetch
//! let signal = controller.commit();
//! assert_eq!(signal.query.to_string(), "search=calculus");
//! ```

pub mod codec;
pub mod controller;
pub mod criteria;
pub mod error;
pub mod history;
pub mod pagination;
pub mod storage;

pub use codec::PersistedQuery;
pub use controller::{FetchSignal, SearchState, SearchStateController};
pub use criteria::{Field, FilterCriteria, SortOrder};
pub use error::SearchError;
pub use history::{History, MemoryHistory};
pub use pagination::PaginationInfo;
pub use storage::{FileSessionStorage, MemorySessionStorage, SessionFallback, SessionStorage};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::codec::PersistedQuery;
    pub use crate::controller::{FetchSignal, SearchState, SearchStateController};
    pub use crate::criteria::{Field, FilterCriteria, SortOrder};
    pub use crate::error::SearchError;
    pub use crate::history::{History, MemoryHistory};
    pub use crate::pagination::PaginationInfo;
    pub use crate::storage::{MemorySessionStorage, SessionStorage};
}
