//! Per-veterinarian display colors.
//!
//! Colors are never stored: a staff id maps to a palette slot by
//! `(staff_id - 1) mod palette_len`. Past ten veterinarians two people share
//! a color, which the calendar tolerates.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// A (background, foreground) pair of CSS class tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPair {
    pub background: String,
    pub foreground: String,
}

impl ColorPair {
    pub fn new(background: impl Into<String>, foreground: impl Into<String>) -> Self {
        Self {
            background: background.into(),
            foreground: foreground.into(),
        }
    }
}

const DEFAULT_HUES: &[&str] = &[
    "blue", "purple", "green", "amber", "pink", "cyan", "orange", "indigo", "teal", "rose",
];

/// Ordered, non-empty list of color pairs. Read-only once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pairs: Vec<ColorPair>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            pairs: DEFAULT_HUES
                .iter()
                .map(|hue| ColorPair::new(format!("bg-{hue}-100"), format!("text-{hue}-800")))
                .collect(),
        }
    }
}

impl Palette {
    pub fn new(pairs: Vec<ColorPair>) -> Result<Self> {
        if pairs.is_empty() {
            bail!("palette must contain at least one color pair");
        }
        Ok(Self { pairs })
    }

    /// Parses `bg:fg,bg:fg,...` as used by the `CALENDAR_PALETTE` variable.
    pub fn parse(value: &str) -> Result<Self> {
        let pairs = value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|entry| {
                let (bg, fg) = entry
                    .split_once(':')
                    .with_context(|| format!("palette entry '{entry}' is not 'bg:fg'"))?;
                let (bg, fg) = (bg.trim(), fg.trim());
                if bg.is_empty() || fg.is_empty() {
                    bail!("palette entry '{entry}' has an empty token");
                }
                Ok(ColorPair::new(bg, fg))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(pairs)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn first(&self) -> &ColorPair {
        &self.pairs[0]
    }

    /// Color for a staff id. Total over all integers: ids below 1 wrap
    /// around to the end of the palette.
    pub fn color_for(&self, staff_id: i32) -> &ColorPair {
        let len = self.pairs.len() as i64;
        let index = (i64::from(staff_id) - 1).rem_euclid(len);
        &self.pairs[index as usize]
    }
}

/// How a calendar view colors its appointments.
#[derive(Debug, Clone, Copy)]
pub enum ColorStrategy<'a> {
    /// One pair for everything (a veterinarian looking at their own week).
    Fixed(&'a ColorPair),
    /// Palette slot per staff id (the reception view of every veterinarian).
    PaletteIndexed(&'a Palette),
}

impl<'a> ColorStrategy<'a> {
    pub fn resolve(&self, staff_id: i32) -> &'a ColorPair {
        match *self {
            ColorStrategy::Fixed(pair) => pair,
            ColorStrategy::PaletteIndexed(palette) => palette.color_for(staff_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette_has_ten_pairs() {
        let palette = Palette::default();
        assert_eq!(palette.len(), 10);
        assert_eq!(palette.first(), &ColorPair::new("bg-blue-100", "text-blue-800"));
    }

    #[test]
    fn test_first_staff_gets_first_pair() {
        let palette = Palette::default();
        assert_eq!(palette.color_for(1).background, "bg-blue-100");
        assert_eq!(palette.color_for(2).background, "bg-purple-100");
        assert_eq!(palette.color_for(10).background, "bg-rose-100");
        assert_eq!(palette.color_for(11).background, "bg-blue-100");
    }

    #[test]
    fn test_color_is_deterministic() {
        let palette = Palette::default();
        for id in [1, 7, 42, 1_000] {
            assert_eq!(palette.color_for(id), palette.color_for(id));
        }
    }

    #[test]
    fn test_ids_a_hundred_apart_share_a_pair() {
        let palette = Palette::default();
        for k in 1..=25 {
            assert_eq!(palette.color_for(k), palette.color_for(k + 10 * 10));
        }
    }

    #[test]
    fn test_zero_and_negative_ids_wrap() {
        let palette = Palette::default();
        assert_eq!(palette.color_for(0).background, "bg-rose-100");
        assert_eq!(palette.color_for(-9).background, "bg-blue-100");
    }

    #[test]
    fn test_fixed_strategy_ignores_staff() {
        let pair = ColorPair::new("bg-x", "text-x");
        let strategy = ColorStrategy::Fixed(&pair);
        assert_eq!(strategy.resolve(3), &pair);
        assert_eq!(strategy.resolve(99), &pair);
    }

    #[test]
    fn test_parse_custom_palette() {
        let palette = Palette::parse("bg-a:text-a, bg-b:text-b").unwrap();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.color_for(2), &ColorPair::new("bg-b", "text-b"));
        assert_eq!(palette.color_for(3), &ColorPair::new("bg-a", "text-a"));
    }

    #[test]
    fn test_parse_rejects_bad_entries() {
        assert!(Palette::parse("").is_err());
        assert!(Palette::parse("bg-a").is_err());
        assert!(Palette::parse("bg-a: ").is_err());
    }
}
