//! Data access for the lecture listing.
//!
//! Fetches listing pages for committed search criteria and tracks what the
//! page shows while they load.
//!
//! # Example
//!
//! ```rust,ignore
//! use lecture_data::prelude::*;
//! use lecture_search::prelude::*;
//!
//! let source = ListingDataSource::from_config(&ApiConfig::default())?;
//! let mut listing = LectureListing::mount(&url, &mut session, history, source).await;
//!
//! listing.edit(Field::Keyword, "calculus")?;
//! let view = listing.search().await;
//! for lecture in view.items() {
//!     println!("{} ({})", lecture.title, lecture.lecturer);
//! }
//! ```

mod auth;
mod client;
mod config;
mod error;
mod listing;
mod listing_page;
mod request;
mod response;
mod transport;
mod view;

pub use auth::{BearerAuth, RequestInterceptor, StaticToken, TokenProvider};
pub use client::{ClientRequestBuilder, FetchClient};
pub use config::ApiConfig;
pub use error::FetchError;
pub use listing::{listing_params, Lecture, ListingDataSource, ListingPage};
pub use listing_page::LectureListing;
pub use request::RequestBuilder;
pub use response::Response;
pub use transport::{HttpTransport, Transport};
pub use view::{ListingView, LoadStatus};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        ApiConfig, FetchClient, FetchError, Lecture, LectureListing, ListingDataSource,
        ListingPage, ListingView, LoadStatus,
    };
}
