//! Text metrics estimation and vertical layout.
//!
//! Backends report only advance width, so vertical extents come from the
//! per-font metric ratios in the catalog: ascent and descent are fixed
//! fractions of the font size. [`TextLayout`] turns an item's anchor
//! position and vertical alignment into a concrete baseline and bounding
//! top, accounting for shadow blur and an optional explicit line height.
//!
//! The arithmetic is anchored at the alphabetic baseline: the declared
//! position is first shifted up by the descent (and line height, if set),
//! then the alignment decides where the ascent box sits relative to that
//! adjusted position.

use vellum_core::font::FontSpec;

/// Where text sits vertically relative to its declared position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VerticalAlign {
    /// The declared position is the top of the text box.
    #[default]
    Top,
    /// The declared position is the vertical center of the text box.
    Middle,
    /// The declared position is the bottom of the text box.
    Bottom,
}

/// Estimated vertical metrics for a font selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetricsEstimate {
    ascent: f32,
    descent: f32,
}

impl TextMetricsEstimate {
    pub fn new(ascent: f32, descent: f32) -> Self {
        Self { ascent, descent }
    }

    /// Derives metrics from a font selection via its catalog ratios.
    pub fn from_font(font: &FontSpec) -> Self {
        Self {
            ascent: font.size() * font.family().ascent_ratio(),
            descent: font.size() * font.family().descent_ratio(),
        }
    }

    /// Returns the estimated ascent in pixels
    pub fn ascent(self) -> f32 {
        self.ascent
    }

    /// Returns the estimated descent in pixels
    pub fn descent(self) -> f32 {
        self.descent
    }

    /// Ascent plus descent.
    pub fn height(self) -> f32 {
        self.ascent + self.descent
    }
}

/// A resolved vertical placement for one text run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextLayout {
    baseline_y: f32,
    bounding_top: f32,
}

impl TextLayout {
    /// Computes the placement for a run anchored at `anchor_y`.
    ///
    /// `shadow_blur` expands the box for `Top` alignment, where blur above
    /// the glyphs would otherwise poke out of the declared position.
    pub fn compute(
        anchor_y: f32,
        metrics: TextMetricsEstimate,
        align: VerticalAlign,
        line_height: Option<f32>,
        shadow_blur: f32,
    ) -> Self {
        let mut adjusted_y = anchor_y - metrics.descent();
        if let Some(line_height) = line_height {
            adjusted_y -= line_height;
        }
        match align {
            VerticalAlign::Top => {
                adjusted_y -= shadow_blur;
                Self {
                    bounding_top: adjusted_y,
                    baseline_y: adjusted_y + metrics.ascent(),
                }
            }
            VerticalAlign::Middle => Self {
                bounding_top: adjusted_y - metrics.ascent() / 2.0,
                baseline_y: adjusted_y + metrics.ascent() / 2.0 - metrics.descent() / 2.0,
            },
            VerticalAlign::Bottom => Self {
                bounding_top: adjusted_y - metrics.ascent(),
                baseline_y: adjusted_y,
            },
        }
    }

    /// Returns the y coordinate of the alphabetic baseline
    pub fn baseline_y(self) -> f32 {
        self.baseline_y
    }

    /// Returns the y coordinate of the top of the text box
    pub fn bounding_top(self) -> f32 {
        self.bounding_top
    }
}
