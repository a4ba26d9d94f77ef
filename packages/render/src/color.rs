//! Five-bucket color ramp for the district heatmap.
//!
//! Values at or below zero are gray. Positive values fall into one of
//! [`BUCKETS`] equal-width buckets between zero and the ramp maximum; each
//! bucket is a shade of red, white-ish for the first and pure red for the
//! last.

/// Number of color buckets.
pub const BUCKETS: u32 = 5;

/// Color for districts without accidents.
pub const ZERO_COLOR: &str = "#bfbfbf";

/// Color for selected districts, replacing their ramp color.
pub const SELECTED_COLOR: &str = "#1a76ff";

/// The ramp maximum is rounded up to a multiple of this.
pub const RAMP_STEP: f64 = 500.0;

/// A color ramp fixed by its maximum value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorRamp {
    max: f64,
}

impl ColorRamp {
    /// Builds a ramp whose maximum is `max_observed` rounded up to the next
    /// multiple of [`RAMP_STEP`]. A non-positive maximum gives a single
    /// step.
    #[must_use]
    pub fn from_observed(max_observed: f64) -> Self {
        let max = if max_observed.is_finite() && max_observed > 0.0 {
            (max_observed / RAMP_STEP).ceil() * RAMP_STEP
        } else {
            RAMP_STEP
        };
        Self { max }
    }

    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Width of one bucket.
    #[must_use]
    pub fn bucket_width(&self) -> f64 {
        self.max / f64::from(BUCKETS)
    }

    /// Bucket level of a value: `0` for values at or below zero, otherwise
    /// `1..=BUCKETS`. Values above the maximum clamp to the last bucket.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn level(&self, value: f64) -> u32 {
        if value.is_nan() || value <= 0.0 {
            return 0;
        }
        let level = (value / self.bucket_width()).ceil();
        (level as u32).clamp(1, BUCKETS)
    }

    /// Hex color of a value.
    #[must_use]
    pub fn color(&self, value: f64) -> String {
        level_color(self.level(value))
    }

    /// Upper bound and color of each bucket, lowest first.
    #[must_use]
    pub fn boundaries(&self) -> Vec<(f64, String)> {
        (1..=BUCKETS)
            .map(|level| (self.bucket_width() * f64::from(level), level_color(level)))
            .collect()
    }
}

/// Color of a bucket level; level `0` is [`ZERO_COLOR`].
#[must_use]
pub fn level_color(level: u32) -> String {
    if level == 0 {
        return ZERO_COLOR.to_string();
    }
    let level = level.min(BUCKETS);
    // 255 * level / BUCKETS, in integers so every level maps to one exact shade
    let fade = u8::try_from(255 - 255 * level / BUCKETS).unwrap_or(0);
    rgb_hex(255, fade, fade)
}

#[must_use]
pub fn rgb_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maximum_rounds_up_to_500() {
        assert!((ColorRamp::from_observed(1234.0).max() - 1500.0).abs() < f64::EPSILON);
        assert!((ColorRamp::from_observed(1500.0).max() - 1500.0).abs() < f64::EPSILON);
        assert!((ColorRamp::from_observed(0.0).max() - 500.0).abs() < f64::EPSILON);
        assert!((ColorRamp::from_observed(f64::NAN).max() - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn non_positive_values_are_gray() {
        let ramp = ColorRamp::from_observed(1000.0);
        assert_eq!(ramp.color(0.0), ZERO_COLOR);
        assert_eq!(ramp.color(-3.0), ZERO_COLOR);
    }

    #[test]
    fn levels_follow_bucket_width() {
        let ramp = ColorRamp::from_observed(1000.0);
        assert_eq!(ramp.level(1.0), 1);
        assert_eq!(ramp.level(200.0), 1);
        assert_eq!(ramp.level(200.5), 2);
        assert_eq!(ramp.level(1000.0), 5);
        assert_eq!(ramp.level(5000.0), 5);
    }

    #[test]
    fn shades_darken_with_level() {
        assert_eq!(level_color(1), "#ffcccc");
        assert_eq!(level_color(3), "#ff6666");
        assert_eq!(level_color(5), "#ff0000");
    }

    #[test]
    fn same_value_same_color() {
        let a = ColorRamp::from_observed(742.0);
        let b = ColorRamp::from_observed(742.0);
        for value in [0.0, 13.7, 99.9, 250.0, 499.0, 742.0] {
            assert_eq!(a.color(value), b.color(value));
        }
    }

    #[test]
    fn boundaries_cover_the_ramp() {
        let bounds = ColorRamp::from_observed(2500.0).boundaries();
        assert_eq!(bounds.len(), 5);
        assert!((bounds[0].0 - 500.0).abs() < f64::EPSILON);
        assert!((bounds[4].0 - 2500.0).abs() < f64::EPSILON);
        assert_eq!(bounds[4].1, "#ff0000");
    }
}
