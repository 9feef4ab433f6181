//! Gradient definitions and linear-gradient axis geometry.
//!
//! A linear gradient is described by an angle in degrees (measured
//! clockwise) plus an optional re-centering offset expressed as a fraction
//! of the painted box's own dimensions. [`axis_from_angle`] maps that
//! description to a concrete line segment, symmetric about the box
//! midpoint, that a backend can feed directly into its linear-gradient
//! primitive.
//!
//! Radial gradients carry their two center/radius pairs verbatim; no
//! geometry is derived for them here.

use crate::{
    color::Color,
    geometry::{Point, Size},
};

/// A fill gradient, either linear (angle-driven) or radial.
#[derive(Debug, Clone, PartialEq)]
pub enum Gradient {
    Linear(LinearGradient),
    Radial(RadialGradient),
}

/// A point expressed as fractional offsets of a box's own dimensions.
///
/// `RelativePoint::new(0.5, 0.25)` means "half the width, a quarter of the
/// height".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RelativePoint {
    x: f32,
    y: f32,
}

impl RelativePoint {
    /// Creates a relative point from fractions (`0.5` = 50%).
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Parses a pair of CSS-style percentage strings such as `"50%"`.
    ///
    /// # Errors
    ///
    /// Returns an error message when either string is not a number with an
    /// optional trailing `%`.
    pub fn from_percent(x: &str, y: &str) -> Result<Self, String> {
        Ok(Self {
            x: parse_percent(x)?,
            y: parse_percent(y)?,
        })
    }

    /// Returns the fractional x offset
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the fractional y offset
    pub fn y(self) -> f32 {
        self.y
    }
}

fn parse_percent(value: &str) -> Result<f32, String> {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix('%').unwrap_or(trimmed);
    match number.parse::<f32>() {
        Ok(parsed) => Ok(parsed / 100.0),
        Err(err) => Err(format!("Invalid percentage '{value}': {err}")),
    }
}

/// An angle-driven linear gradient.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    angle_degrees: f32,
    center: RelativePoint,
    start_color: Color,
    center_color: Option<Color>,
    end_color: Color,
}

impl LinearGradient {
    /// Creates a linear gradient running at the given clockwise angle.
    pub fn new(angle_degrees: f32, start_color: Color, end_color: Color) -> Self {
        Self {
            angle_degrees,
            center: RelativePoint::default(),
            start_color,
            center_color: None,
            end_color,
        }
    }

    /// Re-centers the gradient axis by a fraction of the box dimensions.
    pub fn with_center(mut self, center: RelativePoint) -> Self {
        self.center = center;
        self
    }

    /// Adds a color stop at the axis midpoint.
    pub fn with_center_color(mut self, color: Color) -> Self {
        self.center_color = Some(color);
        self
    }

    /// Returns the clockwise angle in degrees
    pub fn angle_degrees(&self) -> f32 {
        self.angle_degrees
    }

    /// Returns the fractional re-centering offset
    pub fn center(&self) -> RelativePoint {
        self.center
    }

    /// Returns the color at the axis start
    pub fn start_color(&self) -> &Color {
        &self.start_color
    }

    /// Returns the optional midpoint color
    pub fn center_color(&self) -> Option<&Color> {
        self.center_color.as_ref()
    }

    /// Returns the color at the axis end
    pub fn end_color(&self) -> &Color {
        &self.end_color
    }

    /// Resolves the gradient axis for a box of the given size.
    pub fn axis(&self, size: Size) -> GradientAxis {
        axis_from_angle(self.angle_degrees, self.center, size)
    }
}

/// A radial gradient described by two center/radius pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    start_center: Point,
    start_radius: f32,
    end_center: Point,
    end_radius: f32,
    start_color: Color,
    center_color: Option<Color>,
    end_color: Color,
}

impl RadialGradient {
    /// Creates a radial gradient between two circles.
    pub fn new(
        start_center: Point,
        start_radius: f32,
        end_center: Point,
        end_radius: f32,
        start_color: Color,
        end_color: Color,
    ) -> Self {
        Self {
            start_center,
            start_radius,
            end_center,
            end_radius,
            start_color,
            center_color: None,
            end_color,
        }
    }

    /// Adds a color stop halfway between the two circles.
    pub fn with_center_color(mut self, color: Color) -> Self {
        self.center_color = Some(color);
        self
    }

    /// Returns the center of the inner circle
    pub fn start_center(&self) -> Point {
        self.start_center
    }

    /// Returns the radius of the inner circle
    pub fn start_radius(&self) -> f32 {
        self.start_radius
    }

    /// Returns the center of the outer circle
    pub fn end_center(&self) -> Point {
        self.end_center
    }

    /// Returns the radius of the outer circle
    pub fn end_radius(&self) -> f32 {
        self.end_radius
    }

    /// Returns the color at the inner circle
    pub fn start_color(&self) -> &Color {
        &self.start_color
    }

    /// Returns the optional halfway color
    pub fn center_color(&self) -> Option<&Color> {
        self.center_color.as_ref()
    }

    /// Returns the color at the outer circle
    pub fn end_color(&self) -> &Color {
        &self.end_color
    }
}

/// The resolved endpoints of a linear gradient's axis, in box-local
/// coordinates (the box's top-left corner is the origin).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientAxis {
    start: Point,
    end: Point,
}

impl GradientAxis {
    /// Returns the start endpoint of the axis
    pub fn start(self) -> Point {
        self.start
    }

    /// Returns the end endpoint of the axis
    pub fn end(self) -> Point {
        self.end
    }

    /// Moves both endpoints by the given offset, yielding absolute
    /// coordinates for a box anchored at `offset`.
    pub fn translate(self, offset: Point) -> Self {
        Self {
            start: self.start.add_point(offset),
            end: self.end.add_point(offset),
        }
    }
}

/// Computes the linear-gradient axis for a box of the given size.
///
/// The returned segment is symmetric about the box midpoint and points in
/// the requested clockwise direction; the `center` fractions then shift the
/// start endpoint by `width * center.x()` / `height * center.y()` with a
/// quadrant-dependent sign (the end endpoint is left in place).
///
/// The angle is first normalized into `[0, 360)`, so `θ` and `θ + 360k`
/// produce identical segments. Quadrants are half-open: an angle of exactly
/// 90° belongs to the second quadrant.
///
/// Degenerate boxes are legitimate transient layout states: a zero
/// half-width or half-height clamps the critical angle to 90° or 0°
/// respectively instead of dividing by zero, and the result collapses
/// toward the midpoint while staying finite.
pub fn axis_from_angle(angle_degrees: f32, center: RelativePoint, size: Size) -> GradientAxis {
    let width = size.width();
    let height = size.height();
    let half_width = width / 2.0;
    let half_height = height / 2.0;

    // Critical angle at which the axis exits through a corner rather than
    // a side. Quadrants 2/4 measure from the vertical, hence the
    // complement.
    let fov = if half_width == 0.0 {
        90.0
    } else if half_height == 0.0 {
        0.0
    } else {
        (half_height / half_width).atan().to_degrees()
    };
    let alt_fov = 90.0 - fov;

    let normalized = angle_degrees.rem_euclid(360.0);

    let (quadrant, angle_in_quadrant) = if normalized >= 270.0 {
        (4, normalized - 270.0)
    } else if normalized >= 180.0 {
        (3, normalized - 180.0)
    } else if normalized >= 90.0 {
        (2, normalized - 90.0)
    } else {
        (1, normalized)
    };

    // Below the critical angle the adjacent leg of the right triangle is
    // the half-extent the quadrant measures from; above it the legs swap.
    let in_quadrant_13 = quadrant == 1 || quadrant == 3;
    let threshold = if in_quadrant_13 { fov } else { alt_fov };
    let (adjacent, inner_angle) = if angle_in_quadrant < threshold {
        let adjacent = if in_quadrant_13 {
            half_width
        } else {
            half_height
        };
        (adjacent, angle_in_quadrant)
    } else {
        let adjacent = if in_quadrant_13 {
            half_height
        } else {
            half_width
        };
        (adjacent, 90.0 - angle_in_quadrant)
    };

    // A zero adjacent leg can meet an inner angle of 90°, where the
    // tangent blows up; the product is geometrically zero.
    let opposite = if adjacent == 0.0 {
        0.0
    } else {
        inner_angle.to_radians().tan() * adjacent
    };

    let below = angle_in_quadrant < threshold;
    let (mut x0, mut y0, x1, y1) = match quadrant {
        1 => {
            let (x0, y0, x1, y1) = if below {
                (
                    half_width - adjacent,
                    half_height + opposite,
                    half_width + adjacent,
                    half_height - opposite,
                )
            } else {
                (
                    half_width - opposite,
                    half_height + adjacent,
                    half_width + opposite,
                    half_height - adjacent,
                )
            };
            (x0, y0, x1, y1)
        }
        2 => {
            if below {
                (
                    half_width + opposite,
                    half_height + adjacent,
                    half_width - opposite,
                    half_height - adjacent,
                )
            } else {
                (
                    half_width + adjacent,
                    half_height + opposite,
                    half_width - adjacent,
                    half_height - opposite,
                )
            }
        }
        3 => {
            if below {
                (
                    half_width + adjacent,
                    half_height - opposite,
                    half_width - adjacent,
                    half_height + opposite,
                )
            } else {
                (
                    half_width + opposite,
                    half_height - adjacent,
                    half_width - opposite,
                    half_height + adjacent,
                )
            }
        }
        _ => {
            if below {
                (
                    half_width - opposite,
                    half_height - adjacent,
                    half_width + opposite,
                    half_height + adjacent,
                )
            } else {
                (
                    half_width - adjacent,
                    half_height - opposite,
                    half_width + adjacent,
                    half_height + opposite,
                )
            }
        }
    };

    // The re-centering shift applies to the start endpoint only, with the
    // sign following the quadrant pairing: X adds in quadrants 1/4 and
    // subtracts in 2/3, Y subtracts in 1/2 and adds in 3/4.
    let shift_x = width * center.x();
    let shift_y = height * center.y();
    match quadrant {
        1 => {
            x0 += shift_x;
            y0 -= shift_y;
        }
        2 => {
            x0 -= shift_x;
            y0 -= shift_y;
        }
        3 => {
            x0 -= shift_x;
            y0 += shift_y;
        }
        _ => {
            x0 += shift_x;
            y0 += shift_y;
        }
    }

    GradientAxis {
        start: Point::new(x0, y0),
        end: Point::new(x1, y1),
    }
}
