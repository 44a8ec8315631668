//! Scalar to color mapping
//!
//! Curves and scatter points are colored according to where their scalar
//! coordinate sits inside a closed range, either by ramping the opacity
//! of a fixed base color or by sampling a perceptual colormap.

use plotters::style::{Color, RGBAColor, RGBColor};

/// Anchor color of the initial slice
pub const INITIAL_COLOR: RGBColor = RGBColor(0xb7, 0x4f, 0x6f);
/// Base color of the opacity ramp
pub const FADE_COLOR: RGBColor = RGBColor(0x31, 0x85, 0xfc);

/// Scalar to color strategy
#[derive(Clone, Copy)]
pub enum Strategy {
    /// Opacity ramp on a fixed base color, transparent at the low end of
    /// the range and opaque at the high end
    Fade(RGBColor),
    /// Continuous perceptual colormap
    Gradient(colorous::Gradient),
}
impl Strategy {
    /// Opacity ramp on the default base color
    pub fn fade() -> Self {
        Strategy::Fade(FADE_COLOR)
    }
    /// The viridis colormap
    pub fn viridis() -> Self {
        Strategy::Gradient(colorous::VIRIDIS)
    }
}

/// Maps scalar values from a closed range to curve colors
#[derive(Clone)]
pub struct ColorScale {
    min: f64,
    max: f64,
    strategy: Strategy,
}
impl ColorScale {
    pub fn new(min: f64, max: f64, strategy: Strategy) -> Self {
        Self { min, max, strategy }
    }
    /// The range the scale maps from
    pub fn bounds(&self) -> (f64, f64) {
        (self.min, self.max)
    }
    /// Linear position of `value` inside the range, clamped to [0, 1]
    ///
    /// A degenerate range maps every value to 0
    pub fn normalize(&self, value: f64) -> f64 {
        if self.max > self.min {
            ((value - self.min) / (self.max - self.min)).clamp(0., 1.)
        } else {
            0.
        }
    }
    /// The color of `value`
    ///
    /// On a degenerate range the ramp yields the base color fully opaque
    /// and the colormap its low-end sample, so a single-slice series
    /// still renders visibly
    pub fn color(&self, value: f64) -> RGBAColor {
        match &self.strategy {
            Strategy::Fade(base) => {
                if self.max > self.min {
                    base.mix(self.normalize(value))
                } else {
                    base.mix(1.)
                }
            }
            Strategy::Gradient(gradient) => {
                let color = gradient.eval_continuous(self.normalize(value)).as_tuple();
                RGBColor(color.0, color.1, color.2).mix(1.)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opacity_tracks_the_position_in_the_range() {
        let scale = ColorScale::new(0., 10., Strategy::fade());
        assert_eq!(scale.color(0.).alpha(), 0.);
        assert_eq!(scale.color(5.).alpha(), 0.5);
        assert_eq!(scale.color(10.).alpha(), 1.);
        assert_eq!(scale.color(10.).rgb(), FADE_COLOR.rgb());
    }

    #[test]
    fn normalized_position_is_clamped() {
        let scale = ColorScale::new(0., 10., Strategy::viridis());
        assert_eq!(scale.normalize(-1.), 0.);
        assert_eq!(scale.normalize(11.), 1.);
        assert_eq!(scale.normalize(2.5), 0.25);
    }

    #[test]
    fn degenerate_range_still_yields_a_color() {
        let faded = ColorScale::new(1., 1., Strategy::fade());
        assert_eq!(faded.color(1.).alpha(), 1.);
        assert_eq!(faded.color(1.).rgb(), FADE_COLOR.rgb());

        let mapped = ColorScale::new(1., 1., Strategy::viridis());
        let low = colorous::VIRIDIS.eval_continuous(0.).as_tuple();
        assert_eq!(mapped.color(1.).rgb(), (low.0, low.1, low.2));
    }

    #[test]
    fn colormap_endpoints_differ() {
        let scale = ColorScale::new(0., 1., Strategy::viridis());
        assert_ne!(scale.color(0.).rgb(), scale.color(1.).rgb());
    }
}
