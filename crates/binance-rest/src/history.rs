//! Window planning for paginated historical-candle fetches
//!
//! The klines endpoint caps each response at `limit` candles, so a
//! multi-interval range must be split into sequential request windows.
//! The planner here is pure; the fetch loop lives in
//! [`crate::endpoints::market::MarketEndpoints::get_history`].

use chrono::{NaiveDate, NaiveTime};
use std::path::Path;

use crate::error::{RestError, RestResult};
use crate::types::Candle;

const DAY_SECS: i64 = 24 * 3600;

/// Span used when a range endpoint is left unspecified
const DEFAULT_SPAN_SECS: i64 = 30 * DAY_SECS;

/// Resolve an optional `mm/dd/yy` day pair into a `[start, end]` range in
/// UNIX milliseconds
///
/// Neither day given: the 30 days up to `now_secs`. Only one day given: a
/// 30-day window ending (start given) or beginning (end given) at the
/// other side of it. Both given: used directly. Days resolve to UTC
/// midnight.
pub fn resolve_range(
    start_day: Option<&str>,
    end_day: Option<&str>,
    now_secs: i64,
) -> RestResult<(i64, i64)> {
    let (start_secs, end_secs) = match (start_day, end_day) {
        (None, None) => (now_secs - DEFAULT_SPAN_SECS, now_secs),
        (None, Some(end)) => {
            let end = parse_day(end)?;
            (end - DEFAULT_SPAN_SECS, end)
        }
        (Some(start), None) => {
            let start = parse_day(start)?;
            (start, start + DEFAULT_SPAN_SECS)
        }
        (Some(start), Some(end)) => (parse_day(start)?, parse_day(end)?),
    };

    Ok((start_secs * 1000, end_secs * 1000))
}

fn parse_day(day: &str) -> RestResult<i64> {
    let date = NaiveDate::parse_from_str(day, "%m/%d/%y").map_err(|e| {
        RestError::InvalidParameter(format!("invalid day {:?}, expected mm/dd/yy: {}", day, e))
    })?;

    Ok(date.and_time(NaiveTime::MIN).and_utc().timestamp())
}

/// Sequential request windows covering a time range
///
/// Window boundaries are inclusive on both ends and consecutive windows
/// share a boundary, so a candle sitting exactly on an edge appears in
/// both responses. The last window is clamped exactly to the range end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPlan {
    start_ms: i64,
    end_ms: i64,
    stride_ms: i64,
}

impl WindowPlan {
    /// Plan the windows for a range, interval and per-request candle cap
    pub fn new(start_ms: i64, end_ms: i64, interval: &str, limit: u32) -> Self {
        let max_span_ms = interval_bucket_ms(interval) * i64::from(limit.max(1));
        let span_ms = (end_ms - start_ms).max(0);

        // +1 corrects the integer truncation that would otherwise leave a
        // zero-window plan for ranges shorter than one full window
        let windows = span_ms / max_span_ms + 1;
        let stride_ms = span_ms / windows;

        Self {
            start_ms,
            end_ms,
            stride_ms,
        }
    }

    /// Per-window span in milliseconds
    pub fn stride_ms(&self) -> i64 {
        self.stride_ms
    }

    /// Iterate over the `[lo, hi]` window bounds in chronological order
    pub fn windows(&self) -> Windows {
        Windows {
            next_start: self.start_ms,
            end_ms: self.end_ms,
            stride_ms: self.stride_ms,
        }
    }
}

/// Iterator over the windows of a [`WindowPlan`]
#[derive(Debug, Clone)]
pub struct Windows {
    next_start: i64,
    end_ms: i64,
    stride_ms: i64,
}

impl Iterator for Windows {
    type Item = (i64, i64);

    fn next(&mut self) -> Option<(i64, i64)> {
        if self.next_start >= self.end_ms {
            return None;
        }

        let hi = (self.next_start + self.stride_ms).min(self.end_ms);
        let window = (self.next_start, hi);
        self.next_start = hi;
        Some(window)
    }
}

/// Millisecond time bucket covered by one candle of the given interval
///
/// Conservative: each group uses its smallest member, so a full window of
/// `limit` buckets never exceeds the per-request candle cap. Unknown
/// intervals fall back to one minute.
fn interval_bucket_ms(interval: &str) -> i64 {
    const MINUTE_MS: i64 = 60 * 1000;
    const HOUR_MS: i64 = 60 * MINUTE_MS;
    const DAY_MS: i64 = 24 * HOUR_MS;

    match interval {
        "5m" | "15m" | "30m" => 5 * MINUTE_MS,
        "1h" | "2h" | "4h" | "6h" | "8h" | "12h" => HOUR_MS,
        "1d" | "3d" => DAY_MS,
        "1w" | "1M" => 7 * DAY_MS,
        _ => MINUTE_MS,
    }
}

/// Write candles to a CSV file
///
/// Columns: open-time (seconds), close-time (seconds), open, high, low,
/// close, volume. No header row.
pub fn save_history_csv(candles: &[Candle], path: impl AsRef<Path>) -> RestResult<()> {
    let mut writer = csv::Writer::from_path(path)?;

    for candle in candles {
        writer.write_record([
            (candle.open_time / 1000).to_string(),
            (candle.close_time / 1000).to_string(),
            candle.open.clone(),
            candle.high.clone(),
            candle.low.clone(),
            candle.close.clone(),
            candle.volume.clone(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY_MS: i64 = DAY_SECS * 1000;

    // 2021-01-01 00:00:00 UTC
    const JAN_1_21: i64 = 1_609_459_200;
    // 2021-01-31 00:00:00 UTC
    const JAN_31_21: i64 = 1_612_051_200;

    #[test]
    fn test_resolve_range_defaults_to_last_30_days() {
        let now = 1_700_000_000;
        let (start, end) = resolve_range(None, None, now).unwrap();
        assert_eq!(end, now * 1000);
        assert_eq!(end - start, 30 * DAY_MS);
    }

    #[test]
    fn test_resolve_range_from_start_day() {
        let (start, end) = resolve_range(Some("01/01/21"), None, 0).unwrap();
        assert_eq!(start, JAN_1_21 * 1000);
        assert_eq!(end - start, 30 * DAY_MS);
    }

    #[test]
    fn test_resolve_range_from_end_day() {
        let (start, end) = resolve_range(None, Some("01/31/21"), 0).unwrap();
        assert_eq!(end, JAN_31_21 * 1000);
        assert_eq!(end - start, 30 * DAY_MS);
    }

    #[test]
    fn test_resolve_range_with_both_days() {
        let (start, end) = resolve_range(Some("01/01/21"), Some("01/31/21"), 0).unwrap();
        assert_eq!(start, JAN_1_21 * 1000);
        assert_eq!(end, JAN_31_21 * 1000);
        assert_eq!(end - start, 30 * DAY_MS);
    }

    #[test]
    fn test_resolve_range_rejects_malformed_day() {
        let err = resolve_range(Some("2021-01-01"), None, 0).unwrap_err();
        assert!(matches!(err, RestError::InvalidParameter(_)));
    }

    #[test]
    fn test_thirty_daily_candles_fit_one_window() {
        let plan = WindowPlan::new(JAN_1_21 * 1000, JAN_31_21 * 1000, "1d", 500);
        let windows: Vec<_> = plan.windows().collect();

        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0], (JAN_1_21 * 1000, JAN_31_21 * 1000));
    }

    #[test]
    fn test_windows_cover_range_without_gaps() {
        let start = JAN_1_21 * 1000;
        let end = start + 30 * DAY_MS;
        let plan = WindowPlan::new(start, end, "5m", 500);
        let windows: Vec<_> = plan.windows().collect();

        // 5m bucket, 500-candle cap: 30 days need several windows
        assert!(windows.len() > 1);

        assert_eq!(windows.first().unwrap().0, start);
        assert_eq!(windows.last().unwrap().1, end);
        for pair in windows.windows(2) {
            // consecutive windows share their boundary
            assert_eq!(pair[0].1, pair[1].0);
        }
    }

    #[test]
    fn test_window_span_never_exceeds_candle_cap() {
        const MAX_SPAN_5M_500: i64 = 5 * 60 * 1000 * 500;

        for days in [1, 7, 30, 90, 365] {
            let start = JAN_1_21 * 1000;
            let end = start + days * DAY_MS;
            let plan = WindowPlan::new(start, end, "5m", 500);

            for (lo, hi) in plan.windows() {
                assert!(hi - lo <= MAX_SPAN_5M_500);
                assert!(lo < hi);
            }
        }
    }

    #[test]
    fn test_short_range_yields_single_window() {
        // shorter than one bucket: truncation would plan zero windows
        // without the +1 correction
        let start = JAN_1_21 * 1000;
        let end = start + 90 * 1000;
        let plan = WindowPlan::new(start, end, "1m", 500);
        let windows: Vec<_> = plan.windows().collect();

        assert_eq!(windows, vec![(start, end)]);
    }

    #[test]
    fn test_empty_range_yields_no_windows() {
        let plan = WindowPlan::new(JAN_1_21 * 1000, JAN_1_21 * 1000, "1d", 500);
        assert_eq!(plan.windows().count(), 0);
    }

    #[test]
    fn test_interval_groups() {
        assert_eq!(interval_bucket_ms("5m"), interval_bucket_ms("30m"));
        assert_eq!(interval_bucket_ms("1h"), interval_bucket_ms("12h"));
        assert_eq!(interval_bucket_ms("1d"), interval_bucket_ms("3d"));
        assert_eq!(interval_bucket_ms("1w"), interval_bucket_ms("1M"));
        // finest intervals and unknown strings use the 1m bucket
        assert_eq!(interval_bucket_ms("1m"), interval_bucket_ms("unknown"));
        assert!(interval_bucket_ms("1m") < interval_bucket_ms("5m"));
    }

    #[test]
    fn test_save_history_csv_writes_seven_columns() {
        let candles = vec![Candle {
            open_time: 1_609_459_200_000,
            open: "29000.00".to_string(),
            high: "29600.00".to_string(),
            low: "28800.00".to_string(),
            close: "29400.00".to_string(),
            volume: "1234.50".to_string(),
            close_time: 1_609_545_599_000,
            quote_volume: "36000000.00".to_string(),
            trades: 100,
            taker_buy_base_volume: "600.00".to_string(),
            taker_buy_quote_volume: "17500000.00".to_string(),
            ignore: "0".to_string(),
        }];

        let path = std::env::temp_dir().join("binance_rest_history_test.csv");
        save_history_csv(&candles, &path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(
            contents.trim_end(),
            "1609459200,1609545599,29000.00,29600.00,28800.00,29400.00,1234.50"
        );
    }
}
