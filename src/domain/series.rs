//! Date-indexed scalar series with explicit undefined markers.
//!
//! `SeriesPoint.valid` is the undefined marker: derived operations
//! (percent change, lagged difference, rolling z-score) produce invalid
//! points during warmup instead of dropping rows, so positional lags stay
//! aligned with the source series. Loader-built series are fully valid.

use chrono::{Datelike, NaiveDate};

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    pub points: Vec<SeriesPoint>,
}

/// Last calendar day of the month containing `date`.
pub fn month_end(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(date)
}

impl TimeSeries {
    /// Build a series from raw dated observations. Observations are sorted
    /// by date; the last observation wins on duplicate dates.
    pub fn from_observations(mut observations: Vec<(NaiveDate, f64)>) -> Self {
        observations.sort_by_key(|(date, _)| *date);
        let mut points: Vec<SeriesPoint> = Vec::with_capacity(observations.len());
        for (date, value) in observations {
            if let Some(last) = points.last_mut() {
                if last.date == date {
                    last.value = value;
                    continue;
                }
            }
            points.push(SeriesPoint {
                date,
                valid: true,
                value,
            });
        }
        TimeSeries { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Resample to month-end granularity, keeping the last observation of
    /// each month and stamping it with the calendar month-end date.
    pub fn resample_month_end(&self) -> TimeSeries {
        let mut points: Vec<SeriesPoint> = Vec::new();
        for point in &self.points {
            let stamped = SeriesPoint {
                date: month_end(point.date),
                valid: point.valid,
                value: point.value,
            };
            match points.last_mut() {
                Some(last) if last.date == stamped.date => *last = stamped,
                _ => points.push(stamped),
            }
        }
        TimeSeries { points }
    }

    /// Positional percent change over `periods` observations.
    /// Invalid during warmup, where either endpoint is invalid, or where
    /// the base value is zero.
    pub fn pct_change(&self, periods: usize) -> TimeSeries {
        let points = self
            .points
            .iter()
            .enumerate()
            .map(|(i, point)| {
                if i < periods {
                    return SeriesPoint {
                        date: point.date,
                        valid: false,
                        value: 0.0,
                    };
                }
                let base = &self.points[i - periods];
                let computable = point.valid && base.valid && base.value != 0.0;
                SeriesPoint {
                    date: point.date,
                    valid: computable,
                    value: if computable {
                        point.value / base.value - 1.0
                    } else {
                        0.0
                    },
                }
            })
            .collect();
        TimeSeries { points }
    }

    /// Positional difference over `periods` observations (not calendar lag).
    pub fn diff(&self, periods: usize) -> TimeSeries {
        let points = self
            .points
            .iter()
            .enumerate()
            .map(|(i, point)| {
                if i < periods {
                    return SeriesPoint {
                        date: point.date,
                        valid: false,
                        value: 0.0,
                    };
                }
                let base = &self.points[i - periods];
                let computable = point.valid && base.valid;
                SeriesPoint {
                    date: point.date,
                    valid: computable,
                    value: if computable {
                        point.value - base.value
                    } else {
                        0.0
                    },
                }
            })
            .collect();
        TimeSeries { points }
    }

    /// Rolling z-score over a trailing window of `window` observations,
    /// inclusive of the current one. Population standard deviation.
    /// Invalid until the window is full, where any window member is
    /// invalid, or where the window standard deviation is ~zero.
    pub fn rolling_zscore(&self, window: usize) -> TimeSeries {
        let points = self
            .points
            .iter()
            .enumerate()
            .map(|(i, point)| {
                let invalid = SeriesPoint {
                    date: point.date,
                    valid: false,
                    value: 0.0,
                };
                if window == 0 || i + 1 < window {
                    return invalid;
                }
                let slice = &self.points[i + 1 - window..=i];
                if slice.iter().any(|p| !p.valid) {
                    return invalid;
                }
                let n = window as f64;
                let mean = slice.iter().map(|p| p.value).sum::<f64>() / n;
                let variance = slice
                    .iter()
                    .map(|p| {
                        let d = p.value - mean;
                        d * d
                    })
                    .sum::<f64>()
                    / n;
                let stddev = variance.sqrt();
                if stddev < 1e-12 {
                    return invalid;
                }
                SeriesPoint {
                    date: point.date,
                    valid: true,
                    value: (point.value - mean) / stddev,
                }
            })
            .collect();
        TimeSeries { points }
    }
}
