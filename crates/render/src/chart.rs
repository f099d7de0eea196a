use model::demand::PredictionPoint;

/// Fraction of each band left as padding, applied inner and outer.
const BAND_PADDING: f64 = 0.3;

/// Vertical bound used when the series is empty, so the axes stay defined.
const EMPTY_SERIES_MAX: f64 = 1.0;

/// One bar of the demand forecast chart, in chart-area pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Human readable time label derived from the point's timestamp.
    pub label: String,
    pub x: f64,
    pub width: f64,
    pub y: f64,
    pub height: f64,
    pub value: i64,
    /// Set on the bar(s) reaching the series maximum, unless every bar is
    /// equal (a flat series has no peak).
    pub is_peak: bool,
}

/// Geometry for a bar chart over one zone's forecast series.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub bars: Vec<Bar>,
    /// Upper bound of the linear vertical axis (a "nice" value).
    pub y_max: f64,
    pub width: f64,
    pub height: f64,
}

impl ChartLayout {
    pub fn bind(series: &[PredictionPoint], width: f64, height: f64) -> Self {
        let max_value = series.iter().map(|point| point.demand).max();
        let y_max = match max_value {
            Some(max) if max > 0 => nice_ceiling(max as f64),
            _ => EMPTY_SERIES_MAX,
        };
        let all_equal = series
            .windows(2)
            .all(|pair| pair[0].demand == pair[1].demand);

        // band layout: step = width / (n + padding), bands inset by the
        // outer padding
        let step = width / (series.len() as f64 + BAND_PADDING);
        let bandwidth = step * (1.0 - BAND_PADDING);

        let bars = series
            .iter()
            .enumerate()
            .map(|(index, point)| {
                let bar_height = (point.demand as f64 / y_max) * height;
                Bar {
                    label: point.timestamp.format("%H:%M").to_string(),
                    x: step * (BAND_PADDING + index as f64),
                    width: bandwidth,
                    y: height - bar_height,
                    height: bar_height,
                    value: point.demand,
                    is_peak: !all_equal && Some(point.demand) == max_value,
                }
            })
            .collect();

        Self {
            bars,
            y_max,
            width,
            height,
        }
    }
}

/// Smallest value of the form {1, 2, 5} * 10^k that is >= `value`.
fn nice_ceiling(value: f64) -> f64 {
    let exponent = value.log10().floor();
    let magnitude = 10f64.powf(exponent);
    let fraction = value / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone as _};
    use model::demand::PredictionPoint;

    use super::*;

    fn series(values: &[i64]) -> Vec<PredictionPoint> {
        values
            .iter()
            .enumerate()
            .map(|(index, value)| PredictionPoint {
                horizon: format!("+{}min", index as i64 * 15),
                demand: *value,
                timestamp: Local
                    .with_ymd_and_hms(2025, 6, 1, 8, index as u32 * 15, 0)
                    .unwrap(),
            })
            .collect()
    }

    #[test]
    fn flat_series_has_no_peak() {
        let layout = ChartLayout::bind(&series(&[10, 10, 10]), 320.0, 240.0);
        assert!(layout.bars.iter().all(|bar| !bar.is_peak));
    }

    #[test]
    fn exactly_the_maximum_bar_is_peaked() {
        let layout = ChartLayout::bind(&series(&[5, 10, 3]), 320.0, 240.0);
        let peaks: Vec<_> =
            layout.bars.iter().filter(|bar| bar.is_peak).collect();
        assert_eq!(peaks.len(), 1);
        assert_eq!(peaks[0].value, 10);
    }

    #[test]
    fn empty_series_degenerates_gracefully() {
        let layout = ChartLayout::bind(&[], 320.0, 240.0);
        assert!(layout.bars.is_empty());
        assert_eq!(layout.y_max, 1.0);
        assert!(layout.y_max.is_finite());
    }

    #[test]
    fn labels_are_zero_padded_24_hour() {
        let layout = ChartLayout::bind(&series(&[1, 2]), 320.0, 240.0);
        assert_eq!(layout.bars[0].label, "08:00");
        assert_eq!(layout.bars[1].label, "08:15");
    }

    #[test]
    fn bar_heights_are_proportional_to_demand() {
        let layout = ChartLayout::bind(&series(&[5, 10]), 320.0, 240.0);
        // y max rounds 10 up to itself
        assert_eq!(layout.y_max, 10.0);
        assert!((layout.bars[0].height * 2.0 - layout.bars[1].height).abs() < 1e-9);
        assert!((layout.bars[1].height - 240.0).abs() < 1e-9);
        assert!((layout.bars[1].y - 0.0).abs() < 1e-9);
    }

    #[test]
    fn bars_do_not_overlap_and_stay_in_range() {
        let layout = ChartLayout::bind(&series(&[1, 2, 3, 4]), 320.0, 240.0);
        for window in layout.bars.windows(2) {
            assert!(window[0].x + window[0].width <= window[1].x + 1e-9);
        }
        let last = layout.bars.last().unwrap();
        assert!(last.x + last.width <= 320.0 + 1e-9);
    }

    #[test]
    fn nice_ceiling_rounds_to_1_2_5_steps() {
        assert_eq!(nice_ceiling(3.0), 5.0);
        assert_eq!(nice_ceiling(7.0), 10.0);
        assert_eq!(nice_ceiling(10.0), 10.0);
        assert_eq!(nice_ceiling(11.0), 20.0);
        assert_eq!(nice_ceiling(42.0), 50.0);
        assert_eq!(nice_ceiling(130.0), 200.0);
    }

    #[test]
    fn single_bar_counts_as_flat() {
        let layout = ChartLayout::bind(&series(&[9]), 320.0, 240.0);
        assert!(!layout.bars[0].is_peak);
    }
}
