// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Widget configuration.
//!
//! Every field has a default matching the stock cell-atlas widget, so hosts
//! only need to spell out what they change:
//!
//! ```rust
//! use understory_linked_views::LinkedViewsConfig;
//!
//! let config = LinkedViewsConfig::from_json_str(r#"{ "scatter": { "radius": 2.0 } }"#).unwrap();
//! assert_eq!(config.scatter.radius, 2.0);
//! assert_eq!(config.scatter.x_domain, [-5.5, 3.5]);
//! ```

use serde::{Deserialize, Deserializer, Serialize};

use crate::entity::{ClusterKey, View};
use crate::style::parse_color;
use crate::surface::{Attr, Modifiers};

/// Errors raised while reading or validating a [`LinkedViewsConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A color string could not be parsed.
    #[error("invalid color {value:?}: {reason}")]
    InvalidColor {
        /// The offending string.
        value: String,
        /// Parser message.
        reason: String,
    },

    /// A palette has no colors to hand out.
    #[error("palette `{palette}` has no colors")]
    EmptyPalette {
        /// Palette name.
        palette: &'static str,
    },

    /// An axis domain is not finite or has zero width.
    #[error("scatter {axis} domain {domain:?} must be finite and non-empty")]
    InvalidDomain {
        /// `"x"` or `"y"`.
        axis: &'static str,
        /// The rejected domain.
        domain: [f64; 2],
    },

    /// A numeric setting is out of range.
    #[error("`{name}` must be finite and non-negative, got {value}")]
    InvalidValue {
        /// Setting name.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// The configuration JSON did not match the expected shape.
    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Complete widget configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkedViewsConfig {
    /// Input field names.
    pub fields: FieldNames,
    /// Base fill palettes.
    pub palette: PaletteConfig,
    /// Map view settings.
    pub map: MapConfig,
    /// Scatter view settings.
    pub scatter: ScatterConfig,
    /// Emphasis values toggled by selection membership.
    pub emphasis: EmphasisConfig,
    /// Modifier keys for hover edits.
    pub hover: HoverBindings,
}

impl LinkedViewsConfig {
    /// Parses and validates a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks colors, palettes, domains and sizes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, palette) in [("tumor", &self.palette.tumor), ("immune", &self.palette.immune)] {
            if palette.colors.is_empty() {
                return Err(ConfigError::EmptyPalette { palette: name });
            }
            for color in &palette.colors {
                parse_color(color)?;
            }
        }
        parse_color(&self.scatter.stroke)?;

        for (axis, domain) in [("x", self.scatter.x_domain), ("y", self.scatter.y_domain)] {
            if !(domain[0].is_finite() && domain[1].is_finite()) || domain[0] == domain[1] {
                return Err(ConfigError::InvalidDomain { axis, domain });
            }
        }

        for (name, value) in [
            ("scatter.radius", self.scatter.radius),
            ("scatter.top_margin", self.scatter.top_margin),
            ("scatter.stroke_width", self.scatter.stroke_width),
            ("map.stroke_width", self.map.stroke_width),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue { name, value });
            }
        }
        Ok(())
    }
}

/// Names of the input fields read from both datasets.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldNames {
    /// Entity identifier, present in both datasets.
    pub id: String,
    /// First embedding axis of the projected table.
    pub x: String,
    /// Second embedding axis of the projected table.
    pub y: String,
    /// Binary flag; `1`/`true` marks a tumor cell.
    pub flag: String,
    /// Cluster read when the flag is set.
    pub tumor_cluster: String,
    /// Group read when the flag is clear.
    pub immune_group: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            id: "cellLabelInImage".into(),
            x: "V1".into(),
            y: "V2".into(),
            flag: "tumorYN".into(),
            tumor_cluster: "tumorCluster".into(),
            immune_group: "immuneGroup".into(),
        }
    }
}

/// Categorical palette: domain values paired with colors by position.
///
/// Colors are reused cyclically when the domain is longer than the color list;
/// values missing from the domain are appended on first use.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdinalConfig {
    /// Known categorical values, in palette order.
    pub domain: Vec<ClusterKey>,
    /// CSS-style color strings.
    pub colors: Vec<String>,
}

/// Palettes for both classifications.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Keyed by tumor cluster.
    pub tumor: OrdinalConfig,
    /// Keyed by immune group.
    pub immune: OrdinalConfig,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        let colors = |list: &[&str]| list.iter().map(|c| (*c).to_owned()).collect();
        let domain = |list: &[i64]| list.iter().copied().map(ClusterKey::Int).collect();
        Self {
            tumor: OrdinalConfig {
                domain: domain(&[4, 7, 10, 17]),
                colors: colors(&[
                    "#8dd3c7", "#ffffb3", "#bebada", "#fb8072", "#80b1d3", "#fdb462", "#b3de69",
                    "#fccde5",
                ]),
            },
            immune: OrdinalConfig {
                domain: domain(&[1, 2, 3, 4, 8, 10, 11, 12]),
                colors: colors(&["#d9d9d9", "#bc80bd", "#ccebc5", "#ffed6f"]),
            },
        }
    }
}

/// Map view settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Outline width applied at initialization.
    pub stroke_width: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self { stroke_width: 0.1 }
    }
}

/// Scatter view settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScatterConfig {
    /// Data domain of the first embedding axis.
    pub x_domain: [f64; 2],
    /// Data domain of the second embedding axis.
    pub y_domain: [f64; 2],
    /// Vertical offset of the scatter panel on the surface.
    pub top_margin: f64,
    /// Point radius in pixels.
    pub radius: f64,
    /// Point outline color.
    pub stroke: String,
    /// Point outline width applied at initialization.
    pub stroke_width: f64,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            x_domain: [-5.5, 3.5],
            y_domain: [-7.0, 7.0],
            top_margin: 10.0,
            radius: 4.0,
            stroke: "#0c0c0c".into(),
            stroke_width: 0.2,
        }
    }
}

/// Emphasis attributes; `None` leaves that attribute untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Emphasis {
    /// Outline width.
    pub stroke_width: Option<f64>,
    /// Fill opacity.
    pub fill_opacity: Option<f64>,
}

impl Emphasis {
    /// Returns the attributes to set for this emphasis.
    #[must_use]
    pub fn attrs(&self) -> Vec<Attr> {
        let mut attrs = Vec::with_capacity(2);
        if let Some(width) = self.stroke_width {
            attrs.push(Attr::StrokeWidth(width));
        }
        if let Some(opacity) = self.fill_opacity {
            attrs.push(Attr::FillOpacity(opacity));
        }
        attrs
    }
}

/// Values for selected and unselected elements of one view.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EmphasisPair {
    /// Applied when the entity is in the merged selection.
    pub selected: Emphasis,
    /// Applied otherwise.
    pub muted: Emphasis,
}

/// Emphasis settings for both views.
///
/// Deserialization layers the given values over each view's defaults: an
/// absent field keeps the default, `null` leaves the attribute untouched.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "EmphasisPatch")]
pub struct EmphasisConfig {
    /// Map view.
    pub map: EmphasisPair,
    /// Scatter view.
    pub scatter: EmphasisPair,
}

impl EmphasisConfig {
    /// Returns the pair used for `view`.
    #[must_use]
    pub fn for_view(&self, view: View) -> &EmphasisPair {
        match view {
            View::Map => &self.map,
            View::Scatter => &self.scatter,
        }
    }
}

impl Default for EmphasisConfig {
    fn default() -> Self {
        Self {
            map: EmphasisPair {
                selected: Emphasis {
                    stroke_width: Some(1.0),
                    fill_opacity: Some(1.0),
                },
                muted: Emphasis {
                    stroke_width: Some(0.1),
                    fill_opacity: Some(0.1),
                },
            },
            scatter: EmphasisPair {
                selected: Emphasis {
                    stroke_width: Some(0.5),
                    fill_opacity: Some(1.0),
                },
                muted: Emphasis {
                    stroke_width: Some(0.0),
                    fill_opacity: Some(0.2),
                },
            },
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct EmphasisPatch {
    map: PairPatch,
    scatter: PairPatch,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct PairPatch {
    selected: FieldsPatch,
    muted: FieldsPatch,
}

#[derive(Default, Deserialize)]
struct FieldsPatch {
    #[serde(default, deserialize_with = "present")]
    stroke_width: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    fill_opacity: Option<Option<f64>>,
}

/// Distinguishes an explicit `null` from an absent field.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<f64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer).map(Some)
}

impl FieldsPatch {
    fn apply(self, base: &mut Emphasis) {
        if let Some(width) = self.stroke_width {
            base.stroke_width = width;
        }
        if let Some(opacity) = self.fill_opacity {
            base.fill_opacity = opacity;
        }
    }
}

impl PairPatch {
    fn apply(self, base: &mut EmphasisPair) {
        self.selected.apply(&mut base.selected);
        self.muted.apply(&mut base.muted);
    }
}

impl From<EmphasisPatch> for EmphasisConfig {
    fn from(patch: EmphasisPatch) -> Self {
        let mut config = Self::default();
        patch.map.apply(&mut config.map);
        patch.scatter.apply(&mut config.scatter);
        config
    }
}

/// Modifier keys that turn a hover into a stored edit.
///
/// When both bindings are held, `add` wins. An empty binding is disabled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverBindings {
    /// Hovering with these keys held adds the entity to the view's source.
    pub add: Modifiers,
    /// Hovering with these keys held removes the entity from the view's source.
    pub remove: Modifiers,
}

impl Default for HoverBindings {
    fn default() -> Self {
        Self {
            add: Modifiers::SHIFT,
            remove: Modifiers::CTRL,
        }
    }
}

impl HoverBindings {
    /// Classifies a hover given the modifiers currently held.
    #[must_use]
    pub fn edit(&self, held: Modifiers) -> HoverEdit {
        if !self.add.is_empty() && held.contains(self.add) {
            HoverEdit::Add
        } else if !self.remove.is_empty() && held.contains(self.remove) {
            HoverEdit::Remove
        } else {
            HoverEdit::Preview
        }
    }
}

/// What a hover does to the stored selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoverEdit {
    /// Only highlight; store nothing.
    Preview,
    /// Add the hovered entity to the view's source.
    Add,
    /// Remove the hovered entity from the view's source.
    Remove,
}
