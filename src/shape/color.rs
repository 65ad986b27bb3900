//! Display colors for carrier labels.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Creates a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels as an array, e.g. for chart libraries.
    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = String;

    /// Parses `#rrggbb` (the leading `#` is optional).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(format!("expected a #rrggbb color, got \"{s}\""));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|_| format!("expected a #rrggbb color, got \"{s}\""))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Inclusive channel range for generated fallback colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrightnessBand {
    /// Lowest channel value.
    pub min: u8,
    /// Highest channel value.
    pub max: u8,
}

impl Default for BrightnessBand {
    fn default() -> Self {
        Self { min: 50, max: 250 }
    }
}

impl BrightnessBand {
    /// Returns `true` when every channel of `color` lies inside the band.
    pub fn contains(self, color: Rgb) -> bool {
        color
            .channels()
            .iter()
            .all(|c| (self.min..=self.max).contains(c))
    }
}

/// Colors of the carriers seen in common network datasets.
const KNOWN_CARRIERS: &[(&str, Rgb)] = &[
    ("solar", Rgb::new(0xf9, 0xd0, 0x02)),
    ("wind", Rgb::new(0x23, 0x5e, 0xbc)),
    ("onwind", Rgb::new(0x23, 0x5e, 0xbc)),
    ("wind onshore", Rgb::new(0x23, 0x5e, 0xbc)),
    ("offwind", Rgb::new(0x6d, 0xd5, 0xe8)),
    ("wind offshore", Rgb::new(0x6d, 0xd5, 0xe8)),
    ("gas", Rgb::new(0xd3, 0x5f, 0x5f)),
    ("ocgt", Rgb::new(0xd3, 0x5f, 0x5f)),
    ("ccgt", Rgb::new(0xb2, 0x0d, 0x0d)),
    ("coal", Rgb::new(0x54, 0x54, 0x54)),
    ("hard coal", Rgb::new(0x54, 0x54, 0x54)),
    ("lignite", Rgb::new(0x9e, 0x5a, 0x01)),
    ("brown coal", Rgb::new(0x9e, 0x5a, 0x01)),
    ("nuclear", Rgb::new(0xff, 0x88, 0x88)),
    ("oil", Rgb::new(0xc9, 0xc9, 0xc9)),
    ("hydro", Rgb::new(0x29, 0x8c, 0x81)),
    ("ror", Rgb::new(0x3d, 0xbf, 0xb0)),
    ("run of river", Rgb::new(0x3d, 0xbf, 0xb0)),
    ("storage hydro", Rgb::new(0x29, 0x8c, 0x81)),
    ("phs", Rgb::new(0x51, 0xdb, 0xcc)),
    ("pumped hydro", Rgb::new(0x51, 0xdb, 0xcc)),
    ("biomass", Rgb::new(0x0c, 0x6a, 0x0c)),
    ("waste", Rgb::new(0x8b, 0x6d, 0x3b)),
    ("geothermal", Rgb::new(0xba, 0x91, 0xb1)),
    ("battery", Rgb::new(0xac, 0xe3, 0x7f)),
    ("h2", Rgb::new(0xbf, 0x13, 0xa0)),
    ("hydrogen", Rgb::new(0xbf, 0x13, 0xa0)),
    ("ac", Rgb::new(0x70, 0xaf, 0x1d)),
    ("dc", Rgb::new(0x8a, 0x1c, 0xaf)),
    ("load", Rgb::new(0xdd, 0x27, 0x83)),
];

/// Deterministic carrier → color mapping.
///
/// Known carriers are looked up case-insensitively. Any other label gets a
/// color drawn from an RNG seeded with the label itself, so the same carrier
/// keeps its color across charts and across runs.
#[derive(Debug, Clone)]
pub struct CarrierPalette {
    known: HashMap<String, Rgb>,
    band: BrightnessBand,
}

impl Default for CarrierPalette {
    fn default() -> Self {
        Self::new(BrightnessBand::default())
    }
}

impl CarrierPalette {
    /// Creates the built-in palette with the given fallback band.
    pub fn new(band: BrightnessBand) -> Self {
        let known = KNOWN_CARRIERS
            .iter()
            .map(|(name, color)| ((*name).to_string(), *color))
            .collect();
        Self { known, band }
    }

    /// Adds or replaces the color of a carrier.
    pub fn with_override(mut self, carrier: &str, color: Rgb) -> Self {
        self.known.insert(fold(carrier), color);
        self
    }

    /// The fallback brightness band.
    pub fn band(&self) -> BrightnessBand {
        self.band
    }

    /// Returns the palette entry when the carrier is known.
    pub fn known(&self, carrier: &str) -> Option<Rgb> {
        self.known.get(&fold(carrier)).copied()
    }

    /// Color of a carrier label.
    pub fn color_for(&self, carrier: &str) -> Rgb {
        self.known(carrier)
            .unwrap_or_else(|| fallback_color(&fold(carrier), self.band))
    }
}

fn fold(carrier: &str) -> String {
    carrier.to_lowercase()
}

/// Draws a color from an RNG seeded with the SHA-256 digest of `label`.
fn fallback_color(label: &str, band: BrightnessBand) -> Rgb {
    let seed: [u8; 32] = Sha256::digest(label.as_bytes()).into();
    let mut rng = StdRng::from_seed(seed);
    let (lo, hi) = (band.min.min(band.max), band.max.max(band.min));
    Rgb::new(
        rng.random_range(lo..=hi),
        rng.random_range(lo..=hi),
        rng.random_range(lo..=hi),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_carriers_ignore_case() {
        let palette = CarrierPalette::default();
        assert_eq!(palette.color_for("Solar"), palette.color_for("solar"));
        assert_eq!(palette.color_for("SOLAR"), Rgb::new(0xf9, 0xd0, 0x02));
    }

    #[test]
    fn lookup_is_exact_apart_from_case() {
        let palette = CarrierPalette::default();
        assert!(palette.known(" solar").is_none());
        assert!(palette.known("solar ").is_none());
        assert_ne!(palette.color_for(" solar"), palette.color_for("solar"));
    }

    #[test]
    fn fallback_is_stable_and_case_folded() {
        let palette = CarrierPalette::default();
        let a = palette.color_for("Tidal Stream");
        let b = palette.color_for("tidal stream");
        let c = CarrierPalette::default().color_for("Tidal Stream");
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert!(palette.known("tidal stream").is_none());
    }

    #[test]
    fn fallback_stays_inside_band() {
        let band = BrightnessBand { min: 80, max: 120 };
        let palette = CarrierPalette::new(band);
        for label in ["x", "y", "biogas", "fusion", "sector coupling", ""] {
            assert!(band.contains(palette.color_for(label)), "{label}");
        }
    }

    #[test]
    fn different_labels_usually_differ() {
        let palette = CarrierPalette::default();
        assert_ne!(palette.color_for("alpha"), palette.color_for("beta"));
    }

    #[test]
    fn overrides_win_over_builtin() {
        let palette = CarrierPalette::default().with_override("Gas", Rgb::new(1, 2, 3));
        assert_eq!(palette.color_for("gas"), Rgb::new(1, 2, 3));
    }

    #[test]
    fn hex_round_trip() {
        let color: Rgb = "#0a0B0c".parse().unwrap();
        assert_eq!(color, Rgb::new(10, 11, 12));
        assert_eq!(color.to_string(), "#0a0b0c");
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("zzzzzz".parse::<Rgb>().is_err());
    }
}
