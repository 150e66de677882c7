use serde::Serialize;

use tickwatch_core::{
    format_market_cap, recent_bars, Bar, CalendarDate, CompanyProfile, EnvelopeError, FetchRange,
    HistoryRequest, PriceSource, PriceSummary, Symbol, WatchlistStore,
};

use crate::chart;
use crate::cli::ShowArgs;
use crate::error::CliError;

use super::CommandResult;

const RECENT_LIMIT: usize = 10;

#[derive(Debug, Serialize)]
struct ShowResponseData {
    symbol: Symbol,
    range: FetchRange,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile: Option<ProfileView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<PriceSummary>,
    bar_count: usize,
    bars: Vec<Bar>,
    /// Most recent bars, newest first.
    recent: Vec<Bar>,
    chart: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ProfileView {
    #[serde(skip_serializing_if = "Option::is_none")]
    long_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    market_cap: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    market_cap_display: Option<String>,
}

impl From<CompanyProfile> for ProfileView {
    fn from(profile: CompanyProfile) -> Self {
        let market_cap_display = profile.market_cap.map(format_market_cap);
        Self {
            long_name: profile.long_name,
            market_cap: profile.market_cap,
            market_cap_display,
        }
    }
}

pub async fn run(
    args: &ShowArgs,
    store: &WatchlistStore,
    source: &dyn PriceSource,
) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;

    let today = CalendarDate::today_utc();
    let start = match &args.start {
        Some(raw) => CalendarDate::parse(raw)?,
        None => today.one_year_earlier(),
    };
    let end = match &args.end {
        Some(raw) => CalendarDate::parse(raw)?,
        None => today,
    };

    let mut warnings = Vec::new();
    let (range, range_warning) = FetchRange::resolve(start, end);
    if let Some(warning) = range_warning {
        warnings.push(warning);
    }

    if !store.contains(&symbol) {
        warnings.push(format!(
            "'{symbol}' is not on the watchlist; showing it anyway"
        ));
    }

    let profile = match source.profile(symbol.clone()).await {
        Ok(profile) => Some(ProfileView::from(profile)),
        Err(error) => {
            warnings.push(format!("company profile unavailable: {error}"));
            None
        }
    };

    match source
        .history(HistoryRequest::new(symbol.clone(), range))
        .await
    {
        Ok(series) => {
            let summary = PriceSummary::from_bars(&series.bars);
            let recent: Vec<Bar> = recent_bars(&series.bars, RECENT_LIMIT)
                .into_iter()
                .cloned()
                .collect();
            let rendered = chart::render_candles(&series.bars, chart::DEFAULT_HEIGHT);

            let data = ShowResponseData {
                symbol,
                range,
                profile,
                summary,
                bar_count: series.bars.len(),
                bars: series.bars,
                recent,
                chart: rendered,
            };

            Ok(CommandResult::ok(serde_json::to_value(data)?)
                .with_warnings(warnings)
                .with_provider(source.id()))
        }
        Err(error) => {
            let data = ShowResponseData {
                symbol,
                range,
                profile,
                summary: None,
                bar_count: 0,
                bars: Vec::new(),
                recent: Vec::new(),
                chart: Vec::new(),
            };
            let envelope_error = EnvelopeError::new(error.code(), error.message())?
                .with_retryable(error.retryable());

            Ok(CommandResult::ok(serde_json::to_value(data)?)
                .with_warnings(warnings)
                .with_error(envelope_error)
                .with_provider(source.id()))
        }
    }
}
