// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Base fills derived from entity classification.

use peniko::Color;
use peniko::color::{Srgb, parse_color as parse_css_color};
use tracing::trace;

use crate::config::{ConfigError, OrdinalConfig, PaletteConfig};
use crate::entity::{Classification, ClusterKey};

/// Parses a CSS color string (`#rrggbb`, named colors, `rgb(...)`, ...).
pub fn parse_color(value: &str) -> Result<Color, ConfigError> {
    parse_css_color(value)
        .map(|color| color.to_alpha_color::<Srgb>())
        .map_err(|err| ConfigError::InvalidColor {
            value: value.to_owned(),
            reason: err.to_string(),
        })
}

/// Ordinal mapping from categorical values to colors.
///
/// Behaves like an ordinal scale with an implicit domain: a value not seen
/// before is appended to the domain and gets the next color in the cycle.
#[derive(Clone, Debug)]
pub struct OrdinalPalette {
    name: &'static str,
    domain: Vec<ClusterKey>,
    colors: Vec<Color>,
}

impl OrdinalPalette {
    /// Builds a palette from its configuration.
    pub fn from_config(name: &'static str, config: &OrdinalConfig) -> Result<Self, ConfigError> {
        let colors = config
            .colors
            .iter()
            .map(|c| parse_color(c))
            .collect::<Result<Vec<_>, _>>()?;
        if colors.is_empty() {
            return Err(ConfigError::EmptyPalette { palette: name });
        }
        Ok(Self {
            name,
            domain: config.domain.clone(),
            colors,
        })
    }

    /// Returns the color for `key`, extending the domain if needed.
    pub fn color(&mut self, key: &ClusterKey) -> Color {
        let idx = match self.domain.iter().position(|k| k == key) {
            Some(idx) => idx,
            None => {
                trace!(palette = self.name, %key, "extending palette domain");
                self.domain.push(key.clone());
                self.domain.len() - 1
            }
        };
        self.colors[idx % self.colors.len()]
    }

    /// Returns the current domain, including implicitly added values.
    #[must_use]
    pub fn domain(&self) -> &[ClusterKey] {
        &self.domain
    }
}

/// Resolves a [`Classification`] into its base fill.
#[derive(Clone, Debug)]
pub struct BaseStyle {
    tumor: OrdinalPalette,
    immune: OrdinalPalette,
}

impl BaseStyle {
    /// Builds both palettes.
    pub fn from_config(config: &PaletteConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            tumor: OrdinalPalette::from_config("tumor", &config.tumor)?,
            immune: OrdinalPalette::from_config("immune", &config.immune)?,
        })
    }

    /// Base fill for an entity.
    pub fn fill(&mut self, classification: &Classification) -> Color {
        match classification {
            Classification::Tumor(cluster) => self.tumor.color(cluster),
            Classification::Immune(group) => self.immune.color(group),
        }
    }
}

#[cfg(test)]
mod tests {
    use peniko::Color;

    use super::{BaseStyle, OrdinalPalette, parse_color};
    use crate::config::{OrdinalConfig, PaletteConfig};
    use crate::entity::{Classification, ClusterKey};

    #[test]
    fn parses_hex_colors() {
        let color = parse_color("#8dd3c7").expect("valid hex color");
        assert_eq!(color.to_rgba8(), Color::from_rgb8(0x8d, 0xd3, 0xc7).to_rgba8());
        assert!(parse_color("#zzzzzz").is_err());
    }

    #[test]
    fn known_keys_follow_domain_order_and_cycle() {
        let mut palette = OrdinalPalette::from_config(
            "test",
            &OrdinalConfig {
                domain: vec![ClusterKey::Int(10), ClusterKey::Int(20), ClusterKey::Int(30)],
                colors: vec!["#ff0000".into(), "#00ff00".into()],
            },
        )
        .expect("valid palette");
        let red = Color::from_rgb8(255, 0, 0).to_rgba8();
        let green = Color::from_rgb8(0, 255, 0).to_rgba8();
        assert_eq!(palette.color(&ClusterKey::Int(10)).to_rgba8(), red);
        assert_eq!(palette.color(&ClusterKey::Int(20)).to_rgba8(), green);
        assert_eq!(palette.color(&ClusterKey::Int(30)).to_rgba8(), red);
    }

    #[test]
    fn unknown_keys_extend_the_domain() {
        let mut palette = OrdinalPalette::from_config(
            "test",
            &OrdinalConfig {
                domain: vec![ClusterKey::Int(1)],
                colors: vec!["#000000".into(), "#ffffff".into()],
            },
        )
        .expect("valid palette");
        let first = palette.color(&ClusterKey::Int(99));
        let label = palette.color(&ClusterKey::Label("B cell".into()));
        assert_eq!(
            palette.domain(),
            &[ClusterKey::Int(1), ClusterKey::Int(99), ClusterKey::Label("B cell".into())]
        );
        assert_ne!(first.to_rgba8(), label.to_rgba8());
        // Stable on repeat lookups.
        assert_eq!(palette.color(&ClusterKey::Int(99)).to_rgba8(), first.to_rgba8());
        assert_eq!(palette.domain().len(), 3);
    }

    #[test]
    fn classification_picks_the_matching_palette() {
        let mut style = BaseStyle::from_config(&PaletteConfig::default()).expect("defaults");
        let tumor = style.fill(&Classification::Tumor(ClusterKey::Int(4)));
        let immune = style.fill(&Classification::Immune(ClusterKey::Int(1)));
        assert_eq!(tumor.to_rgba8(), Color::from_rgb8(0x8d, 0xd3, 0xc7).to_rgba8());
        assert_eq!(immune.to_rgba8(), Color::from_rgb8(0xd9, 0xd9, 0xd9).to_rgba8());
    }
}
