//! Timestamp reconstruction from separate date and time text.

use chrono::NaiveDateTime;
use polars::prelude::*;
use pq_model::DateLayout;
use tracing::{debug, info, warn};

use crate::error::{MetricsError, Result};
use crate::frame::{TimestampedFrame, str_values};

/// Time part shared by every layout; fractional seconds are optional.
const TIME_PATTERN: &str = "%H:%M:%S%.f";

/// Parses one joined `date time` string with one layout.
pub fn parse_timestamp(text: &str, layout: DateLayout) -> Option<NaiveDateTime> {
    let pattern = format!("{} {TIME_PATTERN}", layout.pattern());
    NaiveDateTime::parse_from_str(text, &pattern).ok()
}

/// Joins trimmed date and time with one space. `None` when either is missing.
fn join(date: Option<&str>, time: Option<&str>) -> Option<String> {
    let date = date?.trim();
    let time = time?.trim();
    if date.is_empty() || time.is_empty() {
        return None;
    }
    Some(format!("{date} {time}"))
}

/// Builds timestamps and drops the rows that do not parse.
///
/// Layouts are tried in order against the whole column. The first layout
/// that parses every present row is accepted; otherwise the layout with the
/// most parsed rows wins, earlier layouts winning ties. Surviving rows are
/// stably sorted by timestamp.
pub fn build_timestamp(
    frame: DataFrame,
    date_field: &str,
    time_field: &str,
    layouts: &[DateLayout],
) -> Result<TimestampedFrame> {
    let dates =
        str_values(&frame, date_field)?.ok_or_else(|| MetricsError::column_not_found(date_field))?;
    let times =
        str_values(&frame, time_field)?.ok_or_else(|| MetricsError::column_not_found(time_field))?;

    let joined: Vec<Option<String>> = dates
        .iter()
        .zip(&times)
        .map(|(d, t)| join(d.as_deref(), t.as_deref()))
        .collect();
    let present = joined.iter().filter(|j| j.is_some()).count();

    let mut best: Option<(DateLayout, Vec<Option<NaiveDateTime>>, usize)> = None;
    for &layout in layouts {
        let parsed: Vec<Option<NaiveDateTime>> = joined
            .iter()
            .map(|text| text.as_deref().and_then(|t| parse_timestamp(t, layout)))
            .collect();
        let count = parsed.iter().filter(|p| p.is_some()).count();
        debug!(layout = %layout, parsed = count, present, "tried date layout");

        let improves = best.as_ref().is_none_or(|(_, _, best_count)| count > *best_count);
        if improves {
            best = Some((layout, parsed, count));
        }
        if count == present && count > 0 {
            break;
        }
    }

    let Some((layout, parsed, count)) = best.filter(|(_, _, count)| *count > 0) else {
        return Err(MetricsError::NoParsableTimestamps {
            rows: frame.height(),
        });
    };

    let mut rows: Vec<(IdxSize, NaiveDateTime)> = parsed
        .into_iter()
        .enumerate()
        .filter_map(|(i, ts)| ts.map(|ts| (i as IdxSize, ts)))
        .collect();
    rows.sort_by_key(|(_, ts)| *ts);

    let dropped_rows = frame.height() - count;
    if dropped_rows > 0 {
        warn!(dropped = dropped_rows, "removed rows with invalid timestamps");
    }

    let (indices, timestamps): (Vec<IdxSize>, Vec<NaiveDateTime>) = rows.into_iter().unzip();
    let data = frame.take(&IdxCa::from_vec("idx".into(), indices))?;
    info!(rows = timestamps.len(), layout = %layout, "created timestamps");

    Ok(TimestampedFrame {
        data,
        timestamps,
        layout,
        dropped_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parses_each_layout_with_optional_fraction() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 1)
            .and_then(|d| d.and_hms_opt(10, 0, 5))
            .unwrap();
        assert_eq!(
            parse_timestamp("01.03.2024 10:00:05", DateLayout::DayMonthYearDots),
            Some(expected)
        );
        assert_eq!(
            parse_timestamp("2024-03-01 10:00:05", DateLayout::YearMonthDayDashes),
            Some(expected)
        );
        assert_eq!(
            parse_timestamp("01/03/2024 10:00:05", DateLayout::DayMonthYearSlashes),
            Some(expected)
        );
        let fractional = parse_timestamp("01.03.2024 10:00:05.250000", DateLayout::DayMonthYearDots)
            .unwrap();
        assert_eq!((fractional - expected).num_milliseconds(), 250);
        assert_eq!(
            parse_timestamp("2024-03-01 10:00:05", DateLayout::DayMonthYearDots),
            None
        );
    }

    #[test]
    fn join_requires_both_parts() {
        assert_eq!(
            join(Some(" 01.03.2024 "), Some("10:00:00 ")),
            Some("01.03.2024 10:00:00".to_string())
        );
        assert_eq!(join(Some("01.03.2024"), None), None);
        assert_eq!(join(Some(""), Some("10:00:00")), None);
    }
}
