//! Font catalog and font descriptors.
//!
//! Surface backends cannot report exact glyph ascent/descent reliably, so
//! every named font carries empirical ratios of its size that sit above and
//! below the baseline. Roughly 75% of the size is above the baseline and 3%
//! below for most faces; the catalog tabulates the per-font deviations.
//!
//! [`FontFamily`] is the closed catalog; callers needing a face outside it
//! supply their own [`FontDescriptor`] with measured ratios.

use serde::{Deserialize, Serialize};

const DEFAULT_ASCENT_RATIO: f32 = 0.75;
const DEFAULT_DESCENT_RATIO: f32 = 0.03;

/// The closed enumeration of named fonts with tabulated metric ratios.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFamily {
    Arial,
    AveriaGruesa,
    Baloo,
    BebasNeue,
    Butcherman,
    Calibri,
    ComicSans,
    Consolas,
    CourierNew,
    CrashNumberingSerif,
    Creepster,
    DroidSans,
    DroidSerif,
    Eater,
    Flavors,
    FredokaOne,
    Georgia,
    GochiHand,
    Impact,
    MountainsOfChristmas,
    Ramabhadra,
    TimesNewRoman,
    TrebuchetMs,
    Verdana,
}

impl FontFamily {
    /// Every catalog entry, in declaration order.
    pub const ALL: &'static [FontFamily] = &[
        Self::Arial,
        Self::AveriaGruesa,
        Self::Baloo,
        Self::BebasNeue,
        Self::Butcherman,
        Self::Calibri,
        Self::ComicSans,
        Self::Consolas,
        Self::CourierNew,
        Self::CrashNumberingSerif,
        Self::Creepster,
        Self::DroidSans,
        Self::DroidSerif,
        Self::Eater,
        Self::Flavors,
        Self::FredokaOne,
        Self::Georgia,
        Self::GochiHand,
        Self::Impact,
        Self::MountainsOfChristmas,
        Self::Ramabhadra,
        Self::TimesNewRoman,
        Self::TrebuchetMs,
        Self::Verdana,
    ];

    /// Returns the display name the backend's font selector understands.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Arial => "Arial",
            Self::AveriaGruesa => "Averia Gruesa",
            Self::Baloo => "Baloo",
            Self::BebasNeue => "Bebas Neue",
            Self::Butcherman => "Butcherman",
            Self::Calibri => "Calibri",
            Self::ComicSans => "Comic Sans MS",
            Self::Consolas => "Consolas",
            Self::CourierNew => "Courier New",
            Self::CrashNumberingSerif => "Crash Numbering Serif",
            Self::Creepster => "Creepster",
            Self::DroidSans => "Droid Sans",
            Self::DroidSerif => "Droid Serif",
            Self::Eater => "Eater",
            Self::Flavors => "Flavors",
            Self::FredokaOne => "Fredoka One",
            Self::Georgia => "Georgia",
            Self::GochiHand => "Gochi Hand",
            Self::Impact => "Impact",
            Self::MountainsOfChristmas => "Mountains of Christmas",
            Self::Ramabhadra => "Ramabhadra",
            Self::TimesNewRoman => "Times New Roman",
            Self::TrebuchetMs => "Trebuchet MS",
            Self::Verdana => "Verdana",
        }
    }

    /// Empirical fraction of the font size above the baseline.
    pub fn ascent_ratio(self) -> f32 {
        match self {
            Self::Arial | Self::ComicSans | Self::Flavors => 0.78,
            Self::AveriaGruesa | Self::Creepster | Self::FredokaOne | Self::Ramabhadra => 0.76,
            Self::Baloo | Self::Calibri | Self::Consolas => 0.69,
            Self::Butcherman => 0.77,
            Self::CourierNew => 0.65,
            Self::CrashNumberingSerif => 0.74,
            Self::DroidSans | Self::DroidSerif => 0.73,
            Self::Eater => 0.85,
            Self::GochiHand => 0.59,
            Self::Impact | Self::MountainsOfChristmas => 0.83,
            Self::Verdana => 0.77,
            Self::BebasNeue | Self::Georgia | Self::TimesNewRoman | Self::TrebuchetMs => {
                DEFAULT_ASCENT_RATIO
            }
        }
    }

    /// Empirical fraction of the font size below the baseline.
    pub fn descent_ratio(self) -> f32 {
        match self {
            Self::Butcherman => 0.05,
            Self::Eater => 0.04,
            Self::MountainsOfChristmas => 0.06,
            _ => DEFAULT_DESCENT_RATIO,
        }
    }

    /// Looks a catalog entry up by its display name.
    pub fn from_display_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|family| family.display_name() == name)
    }
}

/// An open font descriptor: a face name plus its metric ratios.
///
/// Catalog entries convert into descriptors via `From<FontFamily>`; callers
/// with a face the catalog does not know supply their own measured ratios.
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    name: String,
    ascent_ratio: f32,
    descent_ratio: f32,
}

impl FontDescriptor {
    /// Creates a descriptor with explicit metric ratios.
    pub fn new(name: impl Into<String>, ascent_ratio: f32, descent_ratio: f32) -> Self {
        Self {
            name: name.into(),
            ascent_ratio,
            descent_ratio,
        }
    }

    /// Returns the face name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the ascent ratio
    pub fn ascent_ratio(&self) -> f32 {
        self.ascent_ratio
    }

    /// Returns the descent ratio
    pub fn descent_ratio(&self) -> f32 {
        self.descent_ratio
    }
}

impl From<FontFamily> for FontDescriptor {
    fn from(family: FontFamily) -> Self {
        Self {
            name: family.display_name().to_string(),
            ascent_ratio: family.ascent_ratio(),
            descent_ratio: family.descent_ratio(),
        }
    }
}

/// Font weight/style modifier, rendered as the canvas font-string prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
    Bold,
    BoldItalic,
}

impl FontStyle {
    fn prefix(self) -> &'static str {
        match self {
            Self::Normal => "",
            Self::Italic => "italic ",
            Self::Bold => "bold ",
            Self::BoldItalic => "bold italic ",
        }
    }
}

/// A fully specified font selection: face, size in pixels, style.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    family: FontDescriptor,
    size: f32,
    style: FontStyle,
}

impl FontSpec {
    /// Creates a font spec for the given face at the given pixel size.
    pub fn new(family: impl Into<FontDescriptor>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
            style: FontStyle::default(),
        }
    }

    /// Sets the style modifier.
    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    /// Returns the font descriptor
    pub fn family(&self) -> &FontDescriptor {
        &self.family
    }

    /// Returns the size in pixels
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Returns the style modifier
    pub fn style(&self) -> FontStyle {
        self.style
    }

    /// Renders the canvas-style font string, e.g. `"italic 20px Arial"`.
    pub fn to_font_string(&self) -> String {
        format!(
            "{}{}px {}",
            self.style.prefix(),
            self.size,
            self.family.name()
        )
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_catalog_is_complete() {
        assert_eq!(FontFamily::ALL.len(), 24);
    }

    #[test]
    fn test_catalog_ratios() {
        assert_approx_eq!(f32, FontFamily::Arial.ascent_ratio(), 0.78);
        assert_approx_eq!(f32, FontFamily::Arial.descent_ratio(), 0.03);
        assert_approx_eq!(f32, FontFamily::Eater.ascent_ratio(), 0.85);
        assert_approx_eq!(f32, FontFamily::Eater.descent_ratio(), 0.04);
        assert_approx_eq!(f32, FontFamily::Georgia.ascent_ratio(), 0.75);
        assert_approx_eq!(f32, FontFamily::GochiHand.ascent_ratio(), 0.59);
    }

    #[test]
    fn test_lookup_by_display_name() {
        assert_eq!(
            FontFamily::from_display_name("Comic Sans MS"),
            Some(FontFamily::ComicSans)
        );
        assert_eq!(
            FontFamily::from_display_name("Mountains of Christmas"),
            Some(FontFamily::MountainsOfChristmas)
        );
        assert_eq!(FontFamily::from_display_name("Wingdings"), None);
    }

    #[test]
    fn test_display_names_are_unique() {
        for (i, a) in FontFamily::ALL.iter().enumerate() {
            for b in &FontFamily::ALL[i + 1..] {
                assert_ne!(a.display_name(), b.display_name());
            }
        }
    }

    #[test]
    fn test_descriptor_from_family() {
        let descriptor = FontDescriptor::from(FontFamily::Impact);
        assert_eq!(descriptor.name(), "Impact");
        assert_approx_eq!(f32, descriptor.ascent_ratio(), 0.83);
        assert_approx_eq!(f32, descriptor.descent_ratio(), 0.03);
    }

    #[test]
    fn test_font_string() {
        let spec = FontSpec::new(FontFamily::Arial, 20.0);
        assert_eq!(spec.to_font_string(), "20px Arial");

        let italic = FontSpec::new(FontFamily::Georgia, 14.0).with_style(FontStyle::Italic);
        assert_eq!(italic.to_font_string(), "italic 14px Georgia");

        let custom = FontSpec::new(FontDescriptor::new("Inter", 0.8, 0.05), 12.0)
            .with_style(FontStyle::BoldItalic);
        assert_eq!(custom.to_font_string(), "bold italic 12px Inter");
    }
}
