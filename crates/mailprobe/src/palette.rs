//! Fixed colour palette of the folders/labels dialog.
//!
//! Each entry is a single RGB triple. The swatch descriptor used to pick the
//! colour and the inline style the list renders afterwards are both derived
//! from it, so the selection → expected-style mapping is one-to-one by
//! construction.

use crate::locator::Selector;
use crate::result::{ProbeError, ProbeResult};
use rand::Rng;
use serde::Serialize;
use std::fmt;

/// One selectable colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PaletteColor {
    /// Palette name (`rgb_R_G_B`)
    pub name: &'static str,
    /// Red component
    pub r: u8,
    /// Green component
    pub g: u8,
    /// Blue component
    pub b: u8,
}

impl PaletteColor {
    const fn new(name: &'static str, r: u8, g: u8, b: u8) -> Self {
        Self { name, r, g, b }
    }

    /// Lowercase `#rrggbb` form used by the swatch test ids
    #[must_use]
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Descriptor of the swatch that selects this colour in the dialog
    #[must_use]
    pub fn swatch_selector(&self) -> Selector {
        Selector::test_id(&format!("color-selector:{}", self.hex()))
    }

    /// Inline style a list row carries once it has this colour
    #[must_use]
    pub fn expected_style(&self) -> String {
        format!("color: rgb({}, {}, {});", self.r, self.g, self.b)
    }
}

impl fmt::Display for PaletteColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.hex())
    }
}

/// Every colour the dialog offers, in swatch order
pub const PALETTE: [PaletteColor; 19] = [
    PaletteColor::new("rgb_114_114_167", 114, 114, 167),
    PaletteColor::new("rgb_137_137_172", 137, 137, 172),
    PaletteColor::new("rgb_207_88_88", 207, 88, 88),
    PaletteColor::new("rgb_207_126_126", 207, 126, 126),
    PaletteColor::new("rgb_194_108_199", 194, 108, 199),
    PaletteColor::new("rgb_199_147_202", 199, 147, 202),
    PaletteColor::new("rgb_155_148_209", 155, 148, 209),
    PaletteColor::new("rgb_105_169_209", 105, 169, 209),
    PaletteColor::new("rgb_168_196_213", 168, 196, 213),
    PaletteColor::new("rgb_94_199_183", 94, 199, 183),
    PaletteColor::new("rgb_151_201_193", 151, 201, 193),
    PaletteColor::new("rgb_114_187_117", 114, 187, 117),
    PaletteColor::new("rgb_157_185_159", 157, 185, 159),
    PaletteColor::new("rgb_195_210_97", 195, 210, 97),
    PaletteColor::new("rgb_198_205_151", 198, 205, 151),
    PaletteColor::new("rgb_230_192_76", 230, 192, 76),
    PaletteColor::new("rgb_231_210_146", 231, 210, 146),
    PaletteColor::new("rgb_230_152_76", 230, 152, 76),
    PaletteColor::new("rgb_223_178_134", 223, 178, 134),
];

/// Look a colour up by palette name
pub fn by_name(name: &str) -> ProbeResult<&'static PaletteColor> {
    PALETTE
        .iter()
        .find(|c| c.name == name)
        .ok_or_else(|| ProbeError::UnknownColor {
            name: name.to_string(),
        })
}

/// Colour whose swatch matches `selector`
#[must_use]
pub fn by_swatch(selector: &Selector) -> Option<&'static PaletteColor> {
    PALETTE.iter().find(|c| c.swatch_selector() == *selector)
}

/// Colour whose rendered style is exactly `style`
#[must_use]
pub fn by_style(style: &str) -> Option<&'static PaletteColor> {
    PALETTE.iter().find(|c| c.expected_style() == style)
}

/// Uniform random pick.
///
/// Call once per scenario and thread the result through both the action and
/// the assertion.
pub fn choose<R: Rng + ?Sized>(rng: &mut R) -> &'static PaletteColor {
    &PALETTE[rng.gen_range(0..PALETTE.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_hex_is_lowercase_and_padded() {
        let c = by_name("rgb_94_199_183").unwrap();
        assert_eq!(c.hex(), "#5ec7b7");
    }

    #[test]
    fn test_swatch_and_style_for_first_colour() {
        let c = &PALETTE[0];
        assert_eq!(
            c.swatch_selector(),
            Selector::css("[data-test-id='color-selector:#7272a7']")
        );
        assert_eq!(c.expected_style(), "color: rgb(114, 114, 167);");
    }

    #[test]
    fn test_mapping_is_bijective() {
        let names: HashSet<_> = PALETTE.iter().map(|c| c.name).collect();
        let swatches: HashSet<_> = PALETTE.iter().map(PaletteColor::swatch_selector).collect();
        let styles: HashSet<_> = PALETTE.iter().map(PaletteColor::expected_style).collect();
        assert_eq!(names.len(), PALETTE.len());
        assert_eq!(swatches.len(), PALETTE.len());
        assert_eq!(styles.len(), PALETTE.len());

        for c in &PALETTE {
            assert_eq!(by_swatch(&c.swatch_selector()), Some(c));
            assert_eq!(by_style(&c.expected_style()), Some(c));
        }
    }

    #[test]
    fn test_names_follow_components() {
        for c in &PALETTE {
            assert_eq!(c.name, format!("rgb_{}_{}_{}", c.r, c.g, c.b));
        }
    }

    #[test]
    fn test_unknown_name_is_an_error() {
        let err = by_name("rgb_0_0_0").unwrap_err();
        assert!(matches!(err, ProbeError::UnknownColor { .. }));
    }

    #[test]
    fn test_choose_is_deterministic_for_a_seed() {
        let a = choose(&mut StdRng::seed_from_u64(7));
        let b = choose(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert!(PALETTE.contains(a));
    }
}
