use std::fmt;

use model::demand::{max_demand, RecordSet};

/// Color of a zone whose demand is zero.
pub const STOP_LOW: Rgb = Rgb::new(0xfe, 0xe5, 0xd9);
/// Color at half of the maximum demand.
pub const STOP_MID: Rgb = Rgb::new(0xfc, 0xae, 0x91);
/// Color of the zone(s) at maximum demand.
pub const STOP_HIGH: Rgb = Rgb::new(0xde, 0x2d, 0x26);
/// Neutral placeholder for zones absent from the record set. Deliberately a
/// gray outside the red ramp so "no data" never reads as "low demand".
pub const UNKNOWN_COLOR: Rgb = Rgb::new(0xf3, 0xf4, 0xf6);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Three-stop linear ramp over [0, max/2, max]. Built fresh from every
/// record set; never reused once a new response arrives, since the maximum
/// may have changed.
#[derive(Debug, Clone)]
pub struct DemandColorScale {
    max: f64,
}

impl DemandColorScale {
    pub fn new(max: f64) -> Self {
        // an empty or all-zero record set falls back to 1 so the ramp stays
        // well defined
        let max = if max > 0.0 { max } else { 1.0 };
        Self { max }
    }

    pub fn from_records(records: &RecordSet) -> Self {
        Self::new(max_demand(records).unwrap_or(1.0))
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    /// `None` marks a zone absent from the record set; values above the
    /// maximum clamp to the top stop.
    pub fn color(&self, demand: Option<f64>) -> Rgb {
        let value = match demand {
            Some(value) => value.clamp(0.0, self.max),
            None => return UNKNOWN_COLOR,
        };
        let half = self.max / 2.0;
        if value <= half {
            lerp(STOP_LOW, STOP_MID, value / half)
        } else {
            lerp(STOP_MID, STOP_HIGH, (value - half) / (self.max - half))
        }
    }
}

fn lerp(from: Rgb, to: Rgb, t: f64) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let channel = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    Rgb::new(
        channel(from.r, to.r),
        channel(from.g, to.g),
        channel(from.b, to.b),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intensity(color: Rgb) -> i32 {
        // the ramp darkens as demand grows, so lower channel sums mean
        // higher perceived intensity
        255 * 3 - (color.r as i32 + color.g as i32 + color.b as i32)
    }

    #[test]
    fn zero_demand_hits_the_first_stop_exactly() {
        let scale = DemandColorScale::new(120.0);
        assert_eq!(scale.color(Some(0.0)), STOP_LOW);
    }

    #[test]
    fn half_and_full_maximum_hit_the_other_stops() {
        let scale = DemandColorScale::new(120.0);
        assert_eq!(scale.color(Some(60.0)), STOP_MID);
        assert_eq!(scale.color(Some(120.0)), STOP_HIGH);
    }

    #[test]
    fn intensity_is_monotonic_in_demand() {
        let scale = DemandColorScale::new(100.0);
        let mut last = intensity(scale.color(Some(0.0)));
        for step in 1..=100 {
            let current = intensity(scale.color(Some(step as f64)));
            assert!(current >= last, "intensity dropped at demand {step}");
            last = current;
        }
    }

    #[test]
    fn values_above_max_clamp_to_the_top_stop() {
        let scale = DemandColorScale::new(50.0);
        assert_eq!(scale.color(Some(400.0)), STOP_HIGH);
    }

    #[test]
    fn unknown_demand_is_the_neutral_placeholder() {
        let scale = DemandColorScale::new(100.0);
        assert_eq!(scale.color(None), UNKNOWN_COLOR);
        // the placeholder never appears on the ramp itself
        for step in 0..=100 {
            assert_ne!(scale.color(Some(step as f64)), UNKNOWN_COLOR);
        }
    }

    #[test]
    fn empty_record_set_defaults_the_maximum_to_one() {
        let scale = DemandColorScale::from_records(&RecordSet::new());
        assert_eq!(scale.max(), 1.0);
        assert_eq!(scale.color(Some(1.0)), STOP_HIGH);
    }

    #[test]
    fn hex_formatting_is_lowercase() {
        assert_eq!(UNKNOWN_COLOR.to_string(), "#f3f4f6");
        assert_eq!(STOP_HIGH.to_string(), "#de2d26");
    }
}
