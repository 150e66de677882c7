//! Yahoo Finance adapter.
//!
//! Talks to the public chart endpoint for daily bars and the quoteSummary
//! endpoint for the company profile. When the injected transport is a mock
//! the adapter serves deterministic synthetic data instead of building any
//! request, so offline runs never race the network.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde::Deserialize;
use time::OffsetDateTime;

use crate::http_client::{HttpClient, HttpError, HttpRequest, NoopHttpClient};
use crate::provider::{HistoryRequest, PriceSource, ProviderId, SourceError};
use crate::{Bar, BarSeries, CalendarDate, CompanyProfile, FetchRange, Symbol};

const CHART_BASE: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const SUMMARY_BASE: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";

pub struct YahooAdapter {
    http: Arc<dyn HttpClient>,
}

impl YahooAdapter {
    pub fn new(http: Arc<dyn HttpClient>) -> Self {
        Self { http }
    }

    /// Adapter wired to a refusing transport; every call is served from the
    /// deterministic offline generator.
    pub fn mock() -> Self {
        Self::new(Arc::new(NoopHttpClient))
    }

    fn chart_url(symbol: &Symbol, range: FetchRange) -> String {
        let encoded = urlencoding::encode(symbol.as_str());
        match range {
            FetchRange::Window { start, end } => format!(
                "{CHART_BASE}/{encoded}?interval=1d&period1={}&period2={}",
                start.unix_range_start(),
                end.unix_range_end()
            ),
            FetchRange::TrailingYear => {
                format!("{CHART_BASE}/{encoded}?interval=1d&range=1y")
            }
        }
    }

    fn summary_url(symbol: &Symbol) -> String {
        let encoded = urlencoding::encode(symbol.as_str());
        format!("{SUMMARY_BASE}/{encoded}?modules=price")
    }

    async fn fetch_history(&self, req: HistoryRequest) -> Result<BarSeries, SourceError> {
        if self.http.is_mock() {
            return Ok(mock_history(&req));
        }

        let request = HttpRequest::get(Self::chart_url(&req.symbol, req.range));
        let response = self
            .http
            .execute(request)
            .await
            .map_err(|error| map_http_error(&req.symbol, error))?;

        if response.status == 404 {
            return Err(SourceError::symbol_not_found(&req.symbol));
        }

        let decoded: ChartResponse = response
            .ok_json()
            .map_err(|error| map_http_error(&req.symbol, error))?;
        decode_chart(&req.symbol, decoded)
    }

    async fn fetch_profile(&self, symbol: Symbol) -> Result<CompanyProfile, SourceError> {
        if self.http.is_mock() {
            return Ok(mock_profile(&symbol));
        }

        let request = HttpRequest::get(Self::summary_url(&symbol));
        let response = self
            .http
            .execute(request)
            .await
            .map_err(|error| map_http_error(&symbol, error))?;

        if response.status == 404 {
            return Err(SourceError::symbol_not_found(&symbol));
        }

        let decoded: SummaryResponse = response
            .ok_json()
            .map_err(|error| map_http_error(&symbol, error))?;
        decode_summary(&symbol, decoded)
    }
}

impl PriceSource for YahooAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Yahoo
    }

    fn history<'a>(
        &'a self,
        req: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<BarSeries, SourceError>> + Send + 'a>> {
        Box::pin(self.fetch_history(req))
    }

    fn profile<'a>(
        &'a self,
        symbol: Symbol,
    ) -> Pin<Box<dyn Future<Output = Result<CompanyProfile, SourceError>> + Send + 'a>> {
        Box::pin(self.fetch_profile(symbol))
    }
}

fn map_http_error(symbol: &Symbol, error: HttpError) -> SourceError {
    match error.status {
        Some(404) => SourceError::symbol_not_found(symbol),
        Some(429) => SourceError::throttled(format!(
            "yahoo throttled the request for '{symbol}'; retry later"
        )),
        Some(status) if status >= 500 => {
            SourceError::unavailable(format!("yahoo returned status {status}: {error}"))
        }
        // Remaining 4xx statuses mean yahoo rejected the request itself.
        Some(status) if (400..500).contains(&status) => SourceError::invalid_request(format!(
            "yahoo rejected the request with status {status}: {error}"
        )),
        Some(_) => SourceError::internal(error.message),
        None if error.retryable => SourceError::unavailable(error.message),
        None => SourceError::internal(error.message),
    }
}

fn decode_chart(symbol: &Symbol, response: ChartResponse) -> Result<BarSeries, SourceError> {
    if let Some(error) = response.chart.error {
        return Err(map_provider_error(symbol, &error));
    }

    let result = response
        .chart
        .result
        .and_then(|mut results| (!results.is_empty()).then(|| results.remove(0)))
        .ok_or_else(|| SourceError::no_data(symbol))?;

    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .unwrap_or_default();

    let mut bars = Vec::with_capacity(timestamps.len());
    for (index, ts) in timestamps.iter().enumerate() {
        let (Some(open), Some(high), Some(low), Some(close)) = (
            slot(&quote.open, index),
            slot(&quote.high, index),
            slot(&quote.low, index),
            slot(&quote.close, index),
        ) else {
            // Yahoo pads holidays and halts with null rows; skip them.
            continue;
        };

        let Ok(moment) = OffsetDateTime::from_unix_timestamp(*ts) else {
            continue;
        };
        let date = CalendarDate::from_date(moment.date());
        let volume = slot(&quote.volume, index).and_then(|v| u64::try_from(v).ok());

        match Bar::new(date, open, high, low, close, volume) {
            Ok(bar) => bars.push(bar),
            // Malformed provider rows are dropped rather than failing the
            // whole series.
            Err(_) => continue,
        }
    }

    if bars.is_empty() {
        return Err(SourceError::no_data(symbol));
    }

    Ok(BarSeries::new(symbol.clone(), bars))
}

fn decode_summary(symbol: &Symbol, response: SummaryResponse) -> Result<CompanyProfile, SourceError> {
    if let Some(error) = response.quote_summary.error {
        return Err(map_provider_error(symbol, &error));
    }

    let price = response
        .quote_summary
        .result
        .and_then(|mut results| (!results.is_empty()).then(|| results.remove(0)))
        .and_then(|result| result.price)
        .ok_or_else(|| SourceError::no_data(symbol))?;

    Ok(CompanyProfile {
        symbol: symbol.clone(),
        long_name: price.long_name,
        market_cap: price.market_cap.and_then(|value| value.raw),
    })
}

fn map_provider_error(symbol: &Symbol, error: &YahooErrorNode) -> SourceError {
    if error.code.eq_ignore_ascii_case("not found") {
        return SourceError::symbol_not_found(symbol);
    }
    let detail = error.description.as_deref().unwrap_or(error.code.as_str());
    SourceError::unavailable(format!("yahoo rejected the request: {detail}"))
}

fn slot<T: Copy>(values: &[Option<T>], index: usize) -> Option<T> {
    values.get(index).copied().flatten()
}

// Deterministic offline data. The seed folds the symbol bytes so distinct
// symbols chart differently while repeated runs stay identical.

fn symbol_seed(symbol: &Symbol) -> u64 {
    symbol
        .as_str()
        .bytes()
        .fold(0_u64, |acc, byte| acc.wrapping_mul(33).wrapping_add(u64::from(byte)))
}

fn mock_history(req: &HistoryRequest) -> BarSeries {
    let (start, end) = match req.range {
        FetchRange::Window { start, end } => (start, end),
        FetchRange::TrailingYear => {
            let today = CalendarDate::today_utc();
            (today.one_year_earlier(), today)
        }
    };

    let seed = symbol_seed(&req.symbol);
    let mut bars = Vec::new();
    let mut date = start;
    let mut index: u64 = 0;
    while date <= end {
        let base = 90.0 + ((seed + index) % 350) as f64 / 10.0;
        let bar = Bar {
            date,
            open: base,
            high: base + 1.20,
            low: base - 0.80,
            close: base + 0.30,
            volume: Some(20_000 + index * 25),
        };
        bars.push(bar);
        date = date.next_day();
        index += 1;
    }

    BarSeries::new(req.symbol.clone(), bars)
}

fn mock_profile(symbol: &Symbol) -> CompanyProfile {
    let seed = symbol_seed(symbol);
    CompanyProfile {
        symbol: symbol.clone(),
        long_name: Some(format!("{symbol} Holdings (simulated)")),
        market_cap: Some((10 + seed % 90) as f64 * 1.0e9),
    }
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartNode,
}

#[derive(Debug, Deserialize)]
struct ChartNode {
    result: Option<Vec<ChartResult>>,
    error: Option<YahooErrorNode>,
}

#[derive(Debug, Deserialize)]
struct YahooErrorNode {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    #[serde(default)]
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteBlock>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteBlock {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: SummaryNode,
}

#[derive(Debug, Deserialize)]
struct SummaryNode {
    result: Option<Vec<SummaryResult>>,
    error: Option<YahooErrorNode>,
}

#[derive(Debug, Deserialize)]
struct SummaryResult {
    price: Option<PriceModule>,
}

#[derive(Debug, Deserialize)]
struct PriceModule {
    #[serde(rename = "longName")]
    long_name: Option<String>,
    #[serde(rename = "marketCap")]
    market_cap: Option<YahooRawValue>,
}

#[derive(Debug, Deserialize)]
struct YahooRawValue {
    raw: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use crate::http_client::HttpResponse;
    use crate::provider::SourceErrorKind;

    struct RecordingHttpClient {
        urls: Mutex<Vec<String>>,
        response: HttpResponse,
    }

    impl RecordingHttpClient {
        fn returning(status: u16, body: &str) -> Self {
            Self {
                urls: Mutex::new(Vec::new()),
                response: HttpResponse {
                    status,
                    body: body.to_owned(),
                },
            }
        }

        fn recorded_url(&self) -> String {
            self.urls.lock().expect("lock").join(" ")
        }
    }

    impl HttpClient for RecordingHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.urls.lock().expect("lock").push(request.url);
            let response = self.response.clone();
            Box::pin(async move { Ok(response) })
        }
    }

    fn symbol(raw: &str) -> Symbol {
        Symbol::parse(raw).expect("test symbol")
    }

    fn day(raw: &str) -> CalendarDate {
        CalendarDate::parse(raw).expect("test date")
    }

    const CHART_BODY: &str = r#"{
        "chart": {
            "result": [{
                "timestamp": [1704326400, 1704412800, 1704499200],
                "indicators": {
                    "quote": [{
                        "open": [100.0, null, 103.0],
                        "high": [105.0, null, 108.0],
                        "low": [99.0, null, 101.0],
                        "close": [104.0, null, 102.5],
                        "volume": [12000, null, 15000]
                    }]
                }
            }],
            "error": null
        }
    }"#;

    #[tokio::test]
    async fn window_request_uses_period_bounds() {
        let client = Arc::new(RecordingHttpClient::returning(200, CHART_BODY));
        let adapter = YahooAdapter::new(client.clone());

        let range = FetchRange::Window {
            start: day("2024-01-01"),
            end: day("2024-01-05"),
        };
        adapter
            .history(HistoryRequest::new(symbol("AAPL"), range))
            .await
            .expect("history");

        let url = client.recorded_url();
        assert!(url.contains("/v8/finance/chart/AAPL?"));
        assert!(url.contains("interval=1d"));
        assert!(url.contains("period1=1704067200"));
        assert!(url.contains("period2=1704499200"));
    }

    #[tokio::test]
    async fn trailing_year_request_uses_range_parameter() {
        let client = Arc::new(RecordingHttpClient::returning(200, CHART_BODY));
        let adapter = YahooAdapter::new(client.clone());

        adapter
            .history(HistoryRequest::new(symbol("MSFT"), FetchRange::TrailingYear))
            .await
            .expect("history");

        assert!(client.recorded_url().contains("range=1y"));
    }

    #[tokio::test]
    async fn null_rows_are_skipped() {
        let client = Arc::new(RecordingHttpClient::returning(200, CHART_BODY));
        let adapter = YahooAdapter::new(client);

        let series = adapter
            .history(HistoryRequest::new(symbol("AAPL"), FetchRange::TrailingYear))
            .await
            .expect("history");

        assert_eq!(series.bars.len(), 2);
        assert_eq!(series.bars[0].close, 104.0);
        assert_eq!(series.bars[1].close, 102.5);
        assert_eq!(series.bars[1].volume, Some(15_000));
    }

    #[tokio::test]
    async fn not_found_error_code_maps_to_symbol_not_found() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let client = Arc::new(RecordingHttpClient::returning(200, body));
        let adapter = YahooAdapter::new(client);

        let error = adapter
            .history(HistoryRequest::new(symbol("ZZZZX"), FetchRange::TrailingYear))
            .await
            .expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::SymbolNotFound);
    }

    #[tokio::test]
    async fn throttling_status_maps_to_throttled() {
        let client = Arc::new(RecordingHttpClient::returning(429, ""));
        let adapter = YahooAdapter::new(client);

        let error = adapter
            .history(HistoryRequest::new(symbol("AAPL"), FetchRange::TrailingYear))
            .await
            .expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::Throttled);
        assert!(error.retryable());
    }

    #[tokio::test]
    async fn client_error_status_maps_to_invalid_request() {
        let client = Arc::new(RecordingHttpClient::returning(400, ""));
        let adapter = YahooAdapter::new(client);

        let error = adapter
            .history(HistoryRequest::new(symbol("AAPL"), FetchRange::TrailingYear))
            .await
            .expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::InvalidRequest);
        assert!(!error.retryable());
    }

    #[tokio::test]
    async fn empty_series_maps_to_no_data() {
        let body = r#"{"chart":{"result":[{"timestamp":[],"indicators":{"quote":[{}]}}],"error":null}}"#;
        let client = Arc::new(RecordingHttpClient::returning(200, body));
        let adapter = YahooAdapter::new(client);

        let error = adapter
            .history(HistoryRequest::new(symbol("AAPL"), FetchRange::TrailingYear))
            .await
            .expect_err("must fail");
        assert_eq!(error.kind(), SourceErrorKind::NoData);
    }

    #[tokio::test]
    async fn profile_parses_long_name_and_market_cap() {
        let body = r#"{
            "quoteSummary": {
                "result": [{
                    "price": {
                        "longName": "Apple Inc.",
                        "marketCap": {"raw": 2950000000000.0}
                    }
                }],
                "error": null
            }
        }"#;
        let client = Arc::new(RecordingHttpClient::returning(200, body));
        let adapter = YahooAdapter::new(client.clone());

        let profile = adapter.profile(symbol("AAPL")).await.expect("profile");
        assert_eq!(profile.long_name.as_deref(), Some("Apple Inc."));
        assert_eq!(profile.market_cap, Some(2_950_000_000_000.0));
        assert!(client.recorded_url().contains("modules=price"));
    }

    #[tokio::test]
    async fn mock_mode_is_deterministic_and_offline() {
        let adapter = YahooAdapter::mock();
        let range = FetchRange::Window {
            start: day("2024-01-01"),
            end: day("2024-01-10"),
        };

        let first = adapter
            .history(HistoryRequest::new(symbol("AAPL"), range))
            .await
            .expect("mock history");
        let second = adapter
            .history(HistoryRequest::new(symbol("AAPL"), range))
            .await
            .expect("mock history");

        assert_eq!(first, second);
        assert_eq!(first.bars.len(), 10);
        for bar in &first.bars {
            assert!(bar.high >= bar.low);
            assert!(bar.open <= bar.high && bar.close <= bar.high);
        }

        let profile = adapter.profile(symbol("AAPL")).await.expect("mock profile");
        assert!(profile.long_name.is_some());
        assert!(profile.market_cap.is_some());
    }
}
