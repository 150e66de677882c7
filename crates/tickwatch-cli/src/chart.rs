//! ASCII candlestick rendering.
//!
//! Each bar becomes one column. A column is split per row into a top and a
//! bottom half; each half is classified as body, wick, or empty and the pair
//! picks the glyph. Heavy strokes draw the open/close body, light strokes
//! draw the high/low wick.

use tickwatch_core::Bar;

pub const DEFAULT_HEIGHT: usize = 16;

const LABEL_EVERY: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HalfFill {
    Body,
    Wick,
    Empty,
}

/// Render a chronological series as chart lines, top row first.
///
/// Returns an empty vec for an empty series or a flat price range; the
/// caller decides what to print instead.
pub fn render_candles(bars: &[Bar], height: usize) -> Vec<String> {
    if bars.is_empty() || height == 0 {
        return Vec::new();
    }

    let min = bars.iter().map(|bar| bar.low).fold(f64::INFINITY, f64::min);
    let max = bars
        .iter()
        .map(|bar| bar.high)
        .fold(f64::NEG_INFINITY, f64::max);
    if !(max > min) {
        return Vec::new();
    }

    let unit = (max - min) / height as f64;
    let mut lines = Vec::with_capacity(height);
    for row in 0..height {
        let cell_top = max - row as f64 * unit;
        let cell_bottom = cell_top - unit;

        let mut line = axis_prefix(row, cell_top);
        for bar in bars {
            line.push(cell_char(bar, cell_top, cell_bottom));
        }
        lines.push(line);
    }

    lines
}

fn axis_prefix(row: usize, cell_top: f64) -> String {
    if row % LABEL_EVERY == 0 {
        format!("{cell_top:>10.2} ┤ ")
    } else {
        format!("{:>10} │ ", "")
    }
}

fn cell_char(bar: &Bar, cell_top: f64, cell_bottom: f64) -> char {
    let mid = (cell_top + cell_bottom) / 2.0;
    let body_top = bar.open.max(bar.close);
    let body_bottom = bar.open.min(bar.close);

    let top = half_fill(bar, body_bottom, body_top, mid, cell_top);
    let bottom = half_fill(bar, body_bottom, body_top, cell_bottom, mid);

    match (top, bottom) {
        (HalfFill::Body, HalfFill::Body) => '┃',
        (HalfFill::Body, HalfFill::Wick) => '╿',
        (HalfFill::Body, HalfFill::Empty) => '╹',
        (HalfFill::Wick, HalfFill::Body) => '╽',
        (HalfFill::Empty, HalfFill::Body) => '╻',
        (HalfFill::Wick, HalfFill::Wick) => '│',
        (HalfFill::Wick, HalfFill::Empty) => '╵',
        (HalfFill::Empty, HalfFill::Wick) => '╷',
        (HalfFill::Empty, HalfFill::Empty) => ' ',
    }
}

fn half_fill(
    bar: &Bar,
    body_bottom: f64,
    body_top: f64,
    zone_bottom: f64,
    zone_top: f64,
) -> HalfFill {
    let zone = zone_top - zone_bottom;
    if zone <= 0.0 {
        return HalfFill::Empty;
    }

    let body_cover = overlap(body_bottom, body_top, zone_bottom, zone_top) / zone;
    let wick_cover = overlap(bar.low, bar.high, zone_bottom, zone_top) / zone;

    if body_cover >= 0.5 {
        HalfFill::Body
    } else if wick_cover >= 0.5 {
        HalfFill::Wick
    } else {
        HalfFill::Empty
    }
}

fn overlap(lo: f64, hi: f64, zone_lo: f64, zone_hi: f64) -> f64 {
    (hi.min(zone_hi) - lo.max(zone_lo)).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    use tickwatch_core::CalendarDate;

    fn bar(open: f64, high: f64, low: f64, close: f64) -> Bar {
        Bar {
            date: CalendarDate::parse("2024-01-02").expect("test date"),
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    fn column(lines: &[String]) -> Vec<char> {
        lines
            .iter()
            .map(|line| line.chars().last().expect("candle column"))
            .collect()
    }

    #[test]
    fn empty_series_renders_nothing() {
        assert!(render_candles(&[], DEFAULT_HEIGHT).is_empty());
    }

    #[test]
    fn flat_range_renders_nothing() {
        let bars = vec![bar(10.0, 10.0, 10.0, 10.0)];
        assert!(render_candles(&bars, DEFAULT_HEIGHT).is_empty());
    }

    #[test]
    fn full_range_body_fills_the_column() {
        let bars = vec![bar(10.0, 20.0, 10.0, 20.0)];
        let lines = render_candles(&bars, 4);
        assert_eq!(column(&lines), vec!['┃', '┃', '┃', '┃']);
    }

    #[test]
    fn wick_only_candle_draws_light_strokes() {
        // Doji: open == close, the range is all wick.
        let wide = bar(15.0, 20.0, 10.0, 15.0);
        let anchor = bar(10.0, 20.0, 10.0, 20.0);
        let lines = render_candles(&[anchor, wide], 4);
        let chars: Vec<char> = lines
            .iter()
            .map(|line| line.chars().last().expect("column"))
            .collect();
        assert!(chars.iter().all(|ch| ['│', '╵', '╷', ' '].contains(ch)));
        assert!(chars.contains(&'│'));
    }

    #[test]
    fn body_over_wick_uses_transition_glyphs() {
        // Body in the upper half, wick reaching down.
        let bars = vec![bar(13.75, 20.0, 0.0, 20.0)];
        let lines = render_candles(&bars, 4);
        let chars = column(&lines);
        assert_eq!(chars[0], '┃');
        assert_eq!(chars[1], '╿');
        assert_eq!(chars[2], '│');
        assert_eq!(chars[3], '│');
    }

    #[test]
    fn axis_labels_appear_on_schedule() {
        let bars = vec![bar(10.0, 20.0, 10.0, 20.0)];
        let lines = render_candles(&bars, 8);
        assert_eq!(lines.len(), 8);
        assert!(lines[0].contains('┤'));
        assert!(lines[4].contains('┤'));
        assert!(!lines[1].contains('┤'));
        assert!(lines[0].trim_start().starts_with("20.00"));
    }
}
