//! Price-data provider trait and request/error types.
//!
//! The dashboard consumes two endpoints: historical daily bars and a
//! best-effort company profile. Provider failures are classified so the
//! caller can distinguish "no data", "unknown symbol", and transport
//! trouble when messaging the user.

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::{BarSeries, CompanyProfile, FetchRange, Symbol};

/// Canonical provider identifiers used in envelope metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Yahoo,
}

impl ProviderId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yahoo => "yahoo",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    InvalidRequest,
    SymbolNotFound,
    NoData,
    Throttled,
    Unavailable,
    Internal,
}

/// Structured provider error surfaced at the fetch boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
    retryable: bool,
}

impl SourceError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn symbol_not_found(symbol: &Symbol) -> Self {
        Self {
            kind: SourceErrorKind::SymbolNotFound,
            message: format!("provider has no instrument matching '{symbol}'"),
            retryable: false,
        }
    }

    pub fn no_data(symbol: &Symbol) -> Self {
        Self {
            kind: SourceErrorKind::NoData,
            message: format!("provider returned no bars for '{symbol}' in the requested range"),
            retryable: false,
        }
    }

    pub fn throttled(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Throttled,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
            retryable: true,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
            retryable: false,
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn retryable(&self) -> bool {
        self.retryable
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::SymbolNotFound => "source.symbol_not_found",
            SourceErrorKind::NoData => "source.no_data",
            SourceErrorKind::Throttled => "source.throttled",
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Request payload for the history endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbol: Symbol,
    pub range: FetchRange,
}

impl HistoryRequest {
    pub fn new(symbol: Symbol, range: FetchRange) -> Self {
        Self { symbol, range }
    }
}

/// Provider adapter contract.
///
/// Implementations must be `Send + Sync`; the trait uses boxed futures so
/// adapters stay object-safe.
pub trait PriceSource: Send + Sync {
    /// Unique provider identifier for metadata.
    fn id(&self) -> ProviderId;

    /// Fetch historical daily bars, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] with the kind distinguishing unknown symbols,
    /// empty ranges, throttling, and transport failures. No retries are
    /// attempted at this layer.
    fn history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<BarSeries, SourceError>> + Send + 'a>>;

    /// Fetch descriptive metadata (long name, market capitalization),
    /// best-effort. Callers treat failure as a warning, not a fault.
    fn profile<'a>(
        &'a self,
        symbol: Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<CompanyProfile, SourceError>> + Send + 'a>>;
}
