//! Color handling with CSS color string support.
//!
//! Colors flow through the engine as parsed values and reach surface
//! backends as CSS serializations via [`Display`](std::fmt::Display).

use std::{
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::DynamicColor;
use serde::{Deserialize, Deserializer};

/// Wrapper around the `DynamicColor` type from the color crate.
///
/// Parses any CSS color syntax ("#ff0000", "rgb(255, 0, 0)", "red", ...)
/// and serializes back to a CSS string for the drawing backend.
#[derive(Clone, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a CSS color string.
    ///
    /// # Errors
    ///
    /// Returns an error message when the string is not a valid CSS color.
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Color { color }),
            Err(err) => Err(format!("Invalid color '{color_str}': {err}")),
        }
    }

    /// Creates a new color with the specified alpha (transparency) value.
    pub fn with_alpha(self, alpha: f32) -> Self {
        Color {
            color: self.color.with_alpha(alpha),
        }
    }

    /// Returns the alpha component of this color, 0.0 (transparent) to 1.0 (opaque).
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }

    /// A fully transparent color, used to reset backend shadow state.
    pub fn transparent() -> Self {
        Self::default().with_alpha(0.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_new() {
        let red = Color::new("#ff0000");
        assert!(red.is_ok());

        let invalid = Color::new("not-a-color");
        assert!(invalid.is_err());
    }

    #[test]
    fn test_color_named() {
        let blue = Color::new("blue");
        assert!(blue.is_ok());
    }

    #[test]
    fn test_color_default() {
        let color = Color::default();
        assert_eq!(color, Color::new("black").unwrap());
        assert!((color.alpha() - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_color_with_alpha() {
        let color = Color::new("red").unwrap();
        let transparent = color.with_alpha(0.5);
        assert!((transparent.alpha() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_color_transparent() {
        assert!(Color::transparent().alpha().abs() < 0.001);
    }

    #[test]
    fn test_color_equality_and_hash() {
        let a = Color::new("red").unwrap();
        let b = Color::new("red").unwrap();
        assert_eq!(a, b);

        use std::collections::hash_map::DefaultHasher;
        let mut ha = DefaultHasher::new();
        let mut hb = DefaultHasher::new();
        a.hash(&mut ha);
        b.hash(&mut hb);
        assert_eq!(ha.finish(), hb.finish());
    }

    #[test]
    fn test_color_from_str() {
        let color: Color = "rgb(255, 0, 0)".parse().unwrap();
        assert!(color.alpha() > 0.9);
    }
}
