use serde::{Deserialize, Serialize};

use crate::{CalendarDate, Symbol, ValidationError};

/// Daily OHLCV bar record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub date: CalendarDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<u64>,
}

impl Bar {
    pub fn new(
        date: CalendarDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: Option<u64>,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("open", open)?;
        validate_non_negative("high", high)?;
        validate_non_negative("low", low)?;
        validate_non_negative("close", close)?;

        if high < low {
            return Err(ValidationError::InvalidBarRange);
        }

        if open < low || open > high || close < low || close > high {
            return Err(ValidationError::InvalidBarBounds);
        }

        Ok(Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

/// Time-ordered (oldest first) series wrapper returned by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub symbol: Symbol,
    pub bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new(symbol: Symbol, bars: Vec<Bar>) -> Self {
        Self { symbol, bars }
    }
}

/// Best-effort descriptive metadata for a symbol.
///
/// Both fields are optional; the provider omits what it cannot supply and
/// callers render around the gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub symbol: Symbol,
    pub long_name: Option<String>,
    pub market_cap: Option<f64>,
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(input: &str) -> CalendarDate {
        CalendarDate::parse(input).expect("test date")
    }

    #[test]
    fn accepts_well_formed_bar() {
        let bar = Bar::new(day("2024-01-02"), 100.0, 105.0, 95.0, 102.0, Some(1_000))
            .expect("must build");
        assert_eq!(bar.close, 102.0);
    }

    #[test]
    fn rejects_inverted_range() {
        let err = Bar::new(day("2024-01-02"), 100.0, 95.0, 105.0, 102.0, None)
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidBarRange));
    }

    #[test]
    fn rejects_close_outside_bounds() {
        let err = Bar::new(day("2024-01-02"), 10.0, 12.0, 9.0, 12.5, Some(10))
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidBarBounds));
    }
}
