//! The two-ramp color scale for matrix cells.

use medusa_core::{MedusaError, Result};

/// Format an RGB triple as a `#rrggbb` hex string.
pub fn color_hex(r: u8, g: u8, b: u8) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// A monotone step function from a non-negative scalar to a color band:
/// white→yellow over `[0, limit_down)` in `steps_down` bands, then
/// yellow→red over `[limit_down, limit_up]` in `steps_up` bands. Values
/// above `limit_up` saturate to the last band; that is deliberate, not an
/// error.
#[derive(Debug, Clone)]
pub struct Palette {
    limit_down: f64,
    steps_down: usize,
    limit_up: f64,
    steps_up: usize,
    colors: Vec<String>,
}

impl Palette {
    /// Build the band table.
    ///
    /// # Errors
    ///
    /// Step counts must be positive and `limit_up` must exceed `limit_down`.
    pub fn build(
        limit_down: f64,
        steps_down: usize,
        limit_up: f64,
        steps_up: usize,
    ) -> Result<Self> {
        if steps_down == 0 || steps_up == 0 {
            return Err(MedusaError::InvalidInput(
                "palette step counts must be positive".into(),
            ));
        }
        if limit_up <= limit_down || limit_down < 0.0 {
            return Err(MedusaError::InvalidInput(format!(
                "palette limits must satisfy 0 <= limit_down < limit_up, got {limit_down} and {limit_up}"
            )));
        }

        let mut colors = Vec::with_capacity(steps_down + steps_up);
        for i in (1..=steps_down).rev() {
            colors.push(color_hex(
                255,
                255,
                (i as f64 / steps_down as f64 * 255.0) as u8,
            ));
        }
        for i in (1..=steps_up).rev() {
            colors.push(color_hex(
                255,
                (i as f64 / steps_up as f64 * 255.0) as u8,
                0,
            ));
        }

        Ok(Self {
            limit_down,
            steps_down,
            limit_up,
            steps_up,
            colors,
        })
    }

    /// The band index a value falls into.
    pub fn band(&self, value: f64) -> usize {
        if value < self.limit_down {
            let raw = (value * self.steps_down as f64 / self.limit_down).floor() as i64;
            raw.clamp(0, self.steps_down as i64 - 1) as usize
        } else {
            let raw = ((value - self.limit_down) * self.steps_up as f64
                / (self.limit_up - self.limit_down))
                .floor() as i64;
            self.steps_down + raw.clamp(0, self.steps_up as i64 - 1) as usize
        }
    }

    /// The color a value maps to.
    pub fn color_for(&self, value: f64) -> &str {
        &self.colors[self.band(value)]
    }

    /// All band colors, low to high.
    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    pub fn limit_down(&self) -> f64 {
        self.limit_down
    }

    pub fn limit_up(&self) -> f64 {
        self.limit_up
    }

    /// Total number of bands.
    pub fn band_count(&self) -> usize {
        self.steps_down + self.steps_up
    }

    pub fn steps_down(&self) -> usize {
        self.steps_down
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> Palette {
        Palette::build(30.0, 10, 60.0, 10).unwrap()
    }

    #[test]
    fn ramps_start_white_and_end_red() {
        let p = palette();
        assert_eq!(p.colors()[0], "#ffffff");
        // First band of the upper ramp is yellow.
        assert_eq!(p.colors()[10], "#ffff00");
        // Last band is near-pure red.
        assert_eq!(p.colors()[19], "#ff1900");
        assert_eq!(p.band_count(), 20);
    }

    #[test]
    fn band_boundaries() {
        let p = palette();
        assert_eq!(p.band(0.0), 0);
        assert_eq!(p.band(2.9), 0);
        assert_eq!(p.band(3.0), 1);
        // Just under the lower limit sits in the last lower band.
        assert_eq!(p.band(29.999), 9);
        // The limit itself starts the upper ramp.
        assert_eq!(p.band(30.0), 10);
        assert_eq!(p.band(59.999), 19);
    }

    #[test]
    fn saturates_above_the_upper_limit() {
        let p = palette();
        assert_eq!(p.color_for(600.0), p.color_for(60.0));
        assert_eq!(p.band(60.0), 19);
        assert_eq!(p.band(f64::MAX), 19);
    }

    #[test]
    fn negative_values_clamp_to_the_first_band() {
        let p = palette();
        assert_eq!(p.band(-5.0), 0);
    }

    #[test]
    fn monotone_non_decreasing() {
        let p = palette();
        let mut last = 0;
        let mut v = 0.0;
        while v < 100.0 {
            let b = p.band(v);
            assert!(b >= last, "band regressed at value {v}");
            last = b;
            v += 0.1;
        }
    }

    #[test]
    fn degenerate_parameters_are_rejected() {
        assert!(Palette::build(30.0, 0, 60.0, 10).is_err());
        assert!(Palette::build(30.0, 10, 60.0, 0).is_err());
        assert!(Palette::build(60.0, 10, 30.0, 10).is_err());
        assert!(Palette::build(30.0, 10, 30.0, 10).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn band_is_monotone(a in 0.0f64..100.0, b in 0.0f64..100.0) {
            let p = Palette::build(0.75, 10, 3.0, 10).unwrap();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(p.band(lo) <= p.band(hi));
        }

        #[test]
        fn band_is_always_in_range(v in -10.0f64..1000.0) {
            let p = Palette::build(0.75, 10, 3.0, 10).unwrap();
            prop_assert!(p.band(v) < p.band_count());
        }
    }
}
