use super::aggregate::MonthBucket;
use crate::error::InvalidWindowError;
use serde::Serialize;

/// Fixed half-width of the confidence envelope. A visual guide only, not
/// a fitted prediction interval.
const BAND_RATIO: f64 = 0.15;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub bucket: MonthBucket,
    /// The raw metric value at this bucket.
    pub value: f64,
    pub moving_average: f64,
    pub upper: f64,
    pub lower: f64,
}

/// A smoothed metric series with its ±15% envelope.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SmoothedSeries {
    pub points: Vec<TrendPoint>,
}

/// Centered moving average over a series already ordered by bucket
/// ascending (ordering is the caller's contract; this function does not
/// re-sort). Edge buckets average over the smaller window actually
/// available instead of padding with zeros, which would artificially
/// depress the trend at the boundary. A window of 1 returns the series
/// unchanged with a zero-width band.
pub fn smooth(
    series: &[(MonthBucket, f64)],
    window: usize,
) -> Result<SmoothedSeries, InvalidWindowError> {
    if window == 0 {
        return Err(InvalidWindowError { window });
    }
    if series.is_empty() {
        return Ok(SmoothedSeries::default());
    }

    let before = (window - 1) / 2;
    let after = window / 2;
    let points = series
        .iter()
        .enumerate()
        .map(|(i, &(bucket, value))| {
            let start = i.saturating_sub(before);
            let end = (i + after).min(series.len() - 1);
            let slice = &series[start..=end];
            let moving_average =
                slice.iter().map(|(_, v)| v).sum::<f64>() / slice.len() as f64;

            let (upper, lower) = if window == 1 {
                (moving_average, moving_average)
            } else {
                (
                    moving_average * (1.0 + BAND_RATIO),
                    moving_average * (1.0 - BAND_RATIO),
                )
            };

            TrendPoint {
                bucket,
                value,
                moving_average,
                upper,
                lower,
            }
        })
        .collect();

    Ok(SmoothedSeries { points })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> Vec<(MonthBucket, f64)> {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                (
                    MonthBucket {
                        year: 2024,
                        month: i as u32 + 1,
                    },
                    value,
                )
            })
            .collect()
    }

    #[test]
    fn window_three_averages_with_truncated_edges() {
        let smoothed =
            smooth(&series(&[10.0, 20.0, 30.0, 40.0, 50.0]), 3).expect("valid window");
        let mas: Vec<f64> = smoothed
            .points
            .iter()
            .map(|point| point.moving_average)
            .collect();
        assert_eq!(mas, vec![15.0, 20.0, 30.0, 40.0, 45.0]);
        assert!((smoothed.points[2].upper - 34.5).abs() < 1e-9);
        assert!((smoothed.points[2].lower - 25.5).abs() < 1e-9);
    }

    #[test]
    fn window_one_passes_through_with_zero_width_band() {
        let smoothed = smooth(&series(&[7.0, 9.0]), 1).expect("valid window");
        for point in &smoothed.points {
            assert_eq!(point.moving_average, point.value);
            assert_eq!(point.upper, point.value);
            assert_eq!(point.lower, point.value);
        }
    }

    #[test]
    fn zero_window_is_rejected() {
        let err = smooth(&series(&[1.0]), 0).expect_err("window must be positive");
        assert_eq!(err.window, 0);
    }

    #[test]
    fn empty_series_smooths_to_empty() {
        assert_eq!(
            smooth(&[], 3).expect("valid window"),
            SmoothedSeries::default()
        );
    }
}
