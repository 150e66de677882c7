//! Core contracts for tickwatch.
//!
//! This crate contains:
//! - Canonical domain models and validation
//! - The watchlist store and its flat-file persistence
//! - The price-data provider trait and the Yahoo adapter
//! - Response envelope and structured errors

pub mod adapters;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod http_client;
pub mod provider;
pub mod view;
pub mod watchlist;

pub use adapters::YahooAdapter;
pub use domain::{Bar, BarSeries, CalendarDate, CompanyProfile, FetchRange, Symbol};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};
pub use error::ValidationError;
pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient,
};
pub use provider::{HistoryRequest, PriceSource, ProviderId, SourceError, SourceErrorKind};
pub use view::{format_market_cap, recent_bars, PriceSummary};
pub use watchlist::{AddOutcome, RemoveOutcome, WatchlistEntry, WatchlistError, WatchlistStore};
