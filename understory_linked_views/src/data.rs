// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loading the two input datasets.
//!
//! The spatial dataset is a GeoJSON `FeatureCollection` whose features carry
//! the entity id and classification fields in `properties`. The projected
//! dataset is a table, either row-oriented (an array of objects) or
//! column-oriented (an object of equal-length arrays, as data frames are
//! usually serialized). Field names come from [`FieldNames`].

use std::borrow::Cow;

use hashbrown::HashSet;
use kurbo::{Point, Rect};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::FieldNames;
use crate::entity::{
    Classification, ClusterKey, EntityId, Geometry, ProjectedPoint, Ring, SpatialFeature,
};

/// Errors raised while loading input data.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A value had the wrong JSON type.
    #[error("{context}: expected {expected}")]
    Shape {
        /// Where the value was found.
        context: String,
        /// What was expected there.
        expected: &'static str,
    },

    /// A required field is absent.
    #[error("{context}: missing field `{field}`")]
    MissingField {
        /// Where the field was looked up.
        context: String,
        /// Field name.
        field: String,
    },

    /// A field is present but unusable.
    #[error("{context}: field `{field}` is not {expected}")]
    InvalidField {
        /// Where the field was found.
        context: String,
        /// Field name.
        field: String,
        /// What was expected.
        expected: &'static str,
    },

    /// Only `Polygon` and `MultiPolygon` geometries are drawn.
    #[error("{context}: unsupported geometry type `{kind}`")]
    UnsupportedGeometry {
        /// Where the geometry was found.
        context: String,
        /// The GeoJSON `type`.
        kind: String,
    },

    /// The same id appears twice in one dataset.
    #[error("duplicate entity id {id} in {dataset} data")]
    DuplicateId {
        /// Repeated id.
        id: EntityId,
        /// `"spatial"` or `"projected"`.
        dataset: &'static str,
    },

    /// Columns of a column-oriented table differ in length.
    #[error("column `{column}` has {found} rows, expected {expected}")]
    RaggedColumn {
        /// Column name.
        column: String,
        /// Its length.
        found: usize,
        /// Length of the first column.
        expected: usize,
    },

    /// The input is not JSON.
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Both forms of the entity set, immutable once loaded.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    features: Vec<SpatialFeature>,
    points: Vec<ProjectedPoint>,
}

impl Dataset {
    /// Builds a dataset, rejecting duplicate ids within either form.
    pub fn new(
        features: Vec<SpatialFeature>,
        points: Vec<ProjectedPoint>,
    ) -> Result<Self, LoadError> {
        check_unique(features.iter().map(|f| f.id), "spatial")?;
        check_unique(points.iter().map(|p| p.id), "projected")?;
        let dataset = Self { features, points };

        let unmatched = dataset.unmatched_ids();
        if !unmatched.is_empty() {
            warn!(
                count = unmatched.len(),
                first = %unmatched[0],
                "entities present in only one view; they will never highlight across views"
            );
        }
        debug!(
            features = dataset.features.len(),
            points = dataset.points.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Loads both datasets from parsed JSON.
    pub fn from_json(
        spatial: &Value,
        projected: &Value,
        fields: &FieldNames,
    ) -> Result<Self, LoadError> {
        Self::new(
            parse_features(spatial, fields)?,
            parse_points(projected, fields)?,
        )
    }

    /// Loads both datasets from JSON text.
    pub fn from_json_str(
        spatial: &str,
        projected: &str,
        fields: &FieldNames,
    ) -> Result<Self, LoadError> {
        let spatial: Value = serde_json::from_str(spatial)?;
        let projected: Value = serde_json::from_str(projected)?;
        Self::from_json(&spatial, &projected, fields)
    }

    /// Map-view form of every entity.
    #[must_use]
    pub fn features(&self) -> &[SpatialFeature] {
        &self.features
    }

    /// Scatter-view form of every entity.
    #[must_use]
    pub fn points(&self) -> &[ProjectedPoint] {
        &self.points
    }

    /// Bounding box of every feature's geometry.
    #[must_use]
    pub fn map_bounds(&self) -> Option<Rect> {
        self.features
            .iter()
            .filter_map(|f| f.geometry.bounds())
            .reduce(|acc, r| acc.union(r))
    }

    /// Ids present in exactly one of the two forms, sorted.
    #[must_use]
    pub fn unmatched_ids(&self) -> Vec<EntityId> {
        let spatial: HashSet<EntityId> = self.features.iter().map(|f| f.id).collect();
        let projected: HashSet<EntityId> = self.points.iter().map(|p| p.id).collect();
        let mut ids: Vec<EntityId> = spatial.symmetric_difference(&projected).copied().collect();
        ids.sort_unstable();
        ids
    }
}

fn check_unique(
    ids: impl Iterator<Item = EntityId>,
    dataset: &'static str,
) -> Result<(), LoadError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(LoadError::DuplicateId { id, dataset });
        }
    }
    Ok(())
}

fn parse_features(value: &Value, fields: &FieldNames) -> Result<Vec<SpatialFeature>, LoadError> {
    let features = match value {
        Value::Array(features) => features,
        Value::Object(collection) => collection
            .get("features")
            .and_then(Value::as_array)
            .ok_or_else(|| LoadError::Shape {
                context: "spatial data".into(),
                expected: "a FeatureCollection with a `features` array",
            })?,
        _ => {
            return Err(LoadError::Shape {
                context: "spatial data".into(),
                expected: "a FeatureCollection",
            });
        }
    };

    features
        .iter()
        .enumerate()
        .map(|(idx, feature)| -> Result<SpatialFeature, LoadError> {
            let context = format!("feature {idx}");
            let feature = as_object(feature, &context)?;
            let properties = as_object(required(feature, "properties", &context)?, &context)?;
            Ok(SpatialFeature {
                id: entity_id(properties, &fields.id, &context)?,
                geometry: parse_geometry(required(feature, "geometry", &context)?, &context)?,
                classification: classification(properties, fields, &context)?,
            })
        })
        .collect()
}

fn parse_geometry(value: &Value, context: &str) -> Result<Geometry, LoadError> {
    let geometry = as_object(value, context)?;
    let kind = required(geometry, "type", context)?
        .as_str()
        .ok_or_else(|| invalid(context, "type", "a string"))?;
    let coordinates = required(geometry, "coordinates", context)?;
    match kind {
        "Polygon" => Ok(Geometry::Polygon(parse_rings(coordinates, context)?)),
        "MultiPolygon" => {
            let polygons = coordinates
                .as_array()
                .ok_or_else(|| invalid(context, "coordinates", "an array of polygons"))?;
            Ok(Geometry::MultiPolygon(
                polygons
                    .iter()
                    .map(|polygon| parse_rings(polygon, context))
                    .collect::<Result<_, _>>()?,
            ))
        }
        other => Err(LoadError::UnsupportedGeometry {
            context: context.to_owned(),
            kind: other.to_owned(),
        }),
    }
}

fn parse_rings(value: &Value, context: &str) -> Result<Vec<Ring>, LoadError> {
    let rings = value
        .as_array()
        .ok_or_else(|| invalid(context, "coordinates", "an array of rings"))?;
    rings.iter().map(|ring| parse_ring(ring, context)).collect()
}

fn parse_ring(value: &Value, context: &str) -> Result<Ring, LoadError> {
    value
        .as_array()
        .ok_or_else(|| invalid(context, "coordinates", "an array of positions"))?
        .iter()
        .map(|position| parse_position(position, context))
        .collect()
}

fn parse_position(value: &Value, context: &str) -> Result<Point, LoadError> {
    // Extra elements (altitude) are allowed and ignored.
    match value.as_array().map(Vec::as_slice) {
        Some([x, y, ..]) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => Ok(Point::new(x, y)),
            _ => Err(invalid(context, "coordinates", "numeric positions")),
        },
        _ => Err(invalid(context, "coordinates", "positions with two numbers")),
    }
}

fn parse_points(value: &Value, fields: &FieldNames) -> Result<Vec<ProjectedPoint>, LoadError> {
    table_rows(value)?
        .iter()
        .enumerate()
        .map(|(idx, row)| -> Result<ProjectedPoint, LoadError> {
            let context = format!("row {idx}");
            Ok(ProjectedPoint {
                id: entity_id(row, &fields.id, &context)?,
                position: Point::new(
                    number(row, &fields.x, &context)?,
                    number(row, &fields.y, &context)?,
                ),
                classification: classification(row, fields, &context)?,
            })
        })
        .collect()
}

/// Normalizes a row- or column-oriented table into rows.
fn table_rows(value: &Value) -> Result<Vec<Cow<'_, Map<String, Value>>>, LoadError> {
    match value {
        Value::Array(rows) => rows
            .iter()
            .enumerate()
            .map(|(idx, row)| as_object(row, &format!("row {idx}")).map(Cow::Borrowed))
            .collect(),
        Value::Object(columns) => {
            let mut expected = None;
            for (name, column) in columns {
                let len = column
                    .as_array()
                    .ok_or_else(|| invalid("projected data", name, "a column array"))?
                    .len();
                match expected {
                    None => expected = Some(len),
                    Some(expected) if expected != len => {
                        return Err(LoadError::RaggedColumn {
                            column: name.clone(),
                            found: len,
                            expected,
                        });
                    }
                    Some(_) => {}
                }
            }
            let rows = (0..expected.unwrap_or(0))
                .map(|idx| {
                    Cow::Owned(
                        columns
                            .iter()
                            .map(|(name, column)| (name.clone(), column[idx].clone()))
                            .collect(),
                    )
                })
                .collect();
            Ok(rows)
        }
        _ => Err(LoadError::Shape {
            context: "projected data".into(),
            expected: "an array of rows or an object of columns",
        }),
    }
}

fn classification(
    record: &Map<String, Value>,
    fields: &FieldNames,
    context: &str,
) -> Result<Classification, LoadError> {
    // Loose `== 1`: `true`, `1`, `1.0` and `"1"` mark a tumor cell; `null`,
    // `0` and anything else mark an immune cell.
    let tumor = match required(record, &fields.flag, context)? {
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64() == Some(1.0),
        Value::String(s) => s.trim().parse::<f64>().ok() == Some(1.0),
        _ => false,
    };
    if tumor {
        Ok(Classification::Tumor(cluster_key(
            record,
            &fields.tumor_cluster,
            context,
        )?))
    } else {
        Ok(Classification::Immune(cluster_key(
            record,
            &fields.immune_group,
            context,
        )?))
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "the float is checked to be integral and in range first"
)]
fn entity_id(
    record: &Map<String, Value>,
    field: &str,
    context: &str,
) -> Result<EntityId, LoadError> {
    let value = required(record, field, context)?;
    let id = match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            // Integral floats, as emitted by data-frame serializers.
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f < u64::MAX as f64)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    id.map(EntityId)
        .ok_or_else(|| invalid(context, field, "a non-negative integer id"))
}

/// Reads a categorical value; absent and `null` are a category of their own.
fn cluster_key(
    record: &Map<String, Value>,
    field: &str,
    context: &str,
) -> Result<ClusterKey, LoadError> {
    match record.get(field) {
        None | Some(Value::Null) => Ok(ClusterKey::Missing),
        Some(Value::Number(n)) => integral_i64(n)
            .map(ClusterKey::Int)
            .ok_or_else(|| invalid(context, field, "an integer or a label")),
        Some(Value::String(s)) => Ok(s
            .trim()
            .parse()
            .map_or_else(|_| ClusterKey::Label(s.clone()), ClusterKey::Int)),
        Some(_) => Err(invalid(context, field, "an integer or a label")),
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "the float is checked to be integral and in range first"
)]
fn integral_i64(n: &serde_json::Number) -> Option<i64> {
    // i64::MIN is exactly representable; 2^63 (i64::MAX as f64) is not in range.
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

fn number(record: &Map<String, Value>, field: &str, context: &str) -> Result<f64, LoadError> {
    required(record, field, context)?
        .as_f64()
        .ok_or_else(|| invalid(context, field, "a number"))
}

fn required<'a>(
    record: &'a Map<String, Value>,
    field: &str,
    context: &str,
) -> Result<&'a Value, LoadError> {
    record.get(field).ok_or_else(|| LoadError::MissingField {
        context: context.to_owned(),
        field: field.to_owned(),
    })
}

fn as_object<'a>(value: &'a Value, context: &str) -> Result<&'a Map<String, Value>, LoadError> {
    value.as_object().ok_or_else(|| LoadError::Shape {
        context: context.to_owned(),
        expected: "an object",
    })
}

fn invalid(context: &str, field: &str, expected: &'static str) -> LoadError {
    LoadError::InvalidField {
        context: context.to_owned(),
        field: field.to_owned(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Point;
    use serde_json::json;

    use super::{Dataset, LoadError};
    use crate::config::FieldNames;
    use crate::entity::{Classification, ClusterKey, EntityId, Geometry};

    fn spatial() -> serde_json::Value {
        json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "cellLabelInImage": 1, "tumorYN": 1, "tumorCluster": 7 },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
                    }
                },
                {
                    "type": "Feature",
                    "properties": { "cellLabelInImage": 2.0, "tumorYN": 0, "immuneGroup": 3, "tumorCluster": null },
                    "geometry": {
                        "type": "MultiPolygon",
                        "coordinates": [[[[5.0, 5.0, 0.0], [6.0, 5.0, 0.0], [6.0, 6.0, 0.0]]]]
                    }
                }
            ]
        })
    }

    #[test]
    fn loads_feature_collection_and_row_table() {
        let projected = json!([
            { "cellLabelInImage": 1, "V1": -1.5, "V2": 2.0, "tumorYN": 1, "tumorCluster": 7 },
            { "cellLabelInImage": 2, "V1": 0.25, "V2": -3.0, "tumorYN": false, "immuneGroup": 3 }
        ]);
        let data = Dataset::from_json(&spatial(), &projected, &FieldNames::default())
            .expect("valid input");

        assert_eq!(data.features().len(), 2);
        assert_eq!(data.features()[0].classification, Classification::Tumor(ClusterKey::Int(7)));
        assert_eq!(data.features()[1].id, EntityId(2));
        assert_eq!(data.features()[1].classification, Classification::Immune(ClusterKey::Int(3)));
        assert!(matches!(data.features()[1].geometry, Geometry::MultiPolygon(_)));
        assert_eq!(
            data.features()[1].geometry.first_vertex(),
            Some(Point::new(5.0, 5.0))
        );

        assert_eq!(data.points()[0].position, Point::new(-1.5, 2.0));
        assert_eq!(data.points()[1].classification, Classification::Immune(ClusterKey::Int(3)));
        assert!(data.unmatched_ids().is_empty());
    }

    #[test]
    fn loads_column_oriented_table() {
        let projected = json!({
            "cellLabelInImage": [1, 2],
            "V1": [0.5, 1.5],
            "V2": [2.5, 3.5],
            "tumorYN": [1, 0],
            "tumorCluster": [4, null],
            "immuneGroup": [null, 8]
        });
        let data = Dataset::from_json(&spatial(), &projected, &FieldNames::default())
            .expect("valid input");
        assert_eq!(data.points()[1].id, EntityId(2));
        assert_eq!(data.points()[1].position, Point::new(1.5, 3.5));
        assert_eq!(data.points()[1].classification, Classification::Immune(ClusterKey::Int(8)));
    }

    #[test]
    fn custom_field_names_are_honored() {
        let fields = FieldNames {
            id: "cell".into(),
            x: "umap1".into(),
            y: "umap2".into(),
            ..FieldNames::default()
        };
        let projected = json!([{ "cell": "9", "umap1": 1, "umap2": 2, "tumorYN": 0, "immuneGroup": 1 }]);
        let spatial = json!({ "type": "FeatureCollection", "features": [] });
        let data = Dataset::from_json(&spatial, &projected, &fields).expect("valid input");
        assert_eq!(data.points()[0].id, EntityId(9));
        assert_eq!(data.unmatched_ids(), vec![EntityId(9)]);
    }

    #[test]
    fn reports_structural_problems() {
        let fields = FieldNames::default();
        let empty = json!([]);

        let no_id = json!([{ "V1": 1, "V2": 2, "tumorYN": 0, "immuneGroup": 1 }]);
        assert!(matches!(
            Dataset::from_json(&empty, &no_id, &fields),
            Err(LoadError::MissingField { field, .. }) if field == "cellLabelInImage"
        ));

        let bad_id = json!([{ "cellLabelInImage": -3, "V1": 1, "V2": 2, "tumorYN": 0, "immuneGroup": 1 }]);
        assert!(matches!(
            Dataset::from_json(&empty, &bad_id, &fields),
            Err(LoadError::InvalidField { .. })
        ));

        let point = json!({
            "type": "FeatureCollection",
            "features": [{
                "properties": { "cellLabelInImage": 1, "tumorYN": 0, "immuneGroup": 1 },
                "geometry": { "type": "Point", "coordinates": [0, 0] }
            }]
        });
        assert!(matches!(
            Dataset::from_json(&point, &empty, &fields),
            Err(LoadError::UnsupportedGeometry { kind, .. }) if kind == "Point"
        ));

        let ragged = json!({ "cellLabelInImage": [1, 2], "V1": [0.0] });
        assert!(matches!(
            Dataset::from_json(&empty, &ragged, &fields),
            Err(LoadError::RaggedColumn { .. })
        ));

        let duplicate = json!([
            { "cellLabelInImage": 1, "V1": 1, "V2": 2, "tumorYN": 0, "immuneGroup": 1 },
            { "cellLabelInImage": 1, "V1": 3, "V2": 4, "tumorYN": 0, "immuneGroup": 1 }
        ]);
        assert!(matches!(
            Dataset::from_json(&empty, &duplicate, &fields),
            Err(LoadError::DuplicateId { id: EntityId(1), dataset: "projected" })
        ));

        assert!(matches!(
            Dataset::from_json_str("{", "[]", &fields),
            Err(LoadError::Json(_))
        ));
    }

    #[test]
    fn loose_flags_and_categorical_clusters() {
        let projected = json!([
            { "cellLabelInImage": 1, "V1": 0, "V2": 0, "tumorYN": "1", "tumorCluster": "4" },
            { "cellLabelInImage": 2, "V1": 0, "V2": 0, "tumorYN": null, "immuneGroup": "B cell" },
            { "cellLabelInImage": 3, "V1": 0, "V2": 0, "tumorYN": "0", "immuneGroup": 2.0 },
            { "cellLabelInImage": 4, "V1": 0, "V2": 0, "tumorYN": 1.0, "tumorCluster": null },
            { "cellLabelInImage": 5, "V1": 0, "V2": 0, "tumorYN": true }
        ]);
        let data = Dataset::from_json(&json!([]), &projected, &FieldNames::default())
            .expect("valid input");
        let classes: Vec<_> = data
            .points()
            .iter()
            .map(|p| p.classification.clone())
            .collect();
        assert_eq!(
            classes,
            vec![
                Classification::Tumor(ClusterKey::Int(4)),
                Classification::Immune(ClusterKey::Label("B cell".into())),
                Classification::Immune(ClusterKey::Int(2)),
                Classification::Tumor(ClusterKey::Missing),
                Classification::Tumor(ClusterKey::Missing),
            ]
        );
    }

    #[test]
    fn non_scalar_cluster_is_rejected() {
        let projected = json!([
            { "cellLabelInImage": 1, "V1": 0, "V2": 0, "tumorYN": 0, "immuneGroup": [1] }
        ]);
        assert!(matches!(
            Dataset::from_json(&json!([]), &projected, &FieldNames::default()),
            Err(LoadError::InvalidField { field, .. }) if field == "immuneGroup"
        ));
    }

    #[test]
    fn ids_beyond_u64_are_rejected() {
        let projected = json!([
            { "cellLabelInImage": 2f64.powi(64), "V1": 0, "V2": 0, "tumorYN": 0, "immuneGroup": 1 }
        ]);
        assert!(matches!(
            Dataset::from_json(&json!([]), &projected, &FieldNames::default()),
            Err(LoadError::InvalidField { field, .. }) if field == "cellLabelInImage"
        ));

        let largest = json!([
            { "cellLabelInImage": 2f64.powi(53), "V1": 0, "V2": 0, "tumorYN": 0, "immuneGroup": 1 }
        ]);
        let data = Dataset::from_json(&json!([]), &largest, &FieldNames::default())
            .expect("integral float within range");
        assert_eq!(data.points()[0].id, EntityId(1 << 53));
    }

    #[test]
    fn map_bounds_cover_all_features() {
        let data = Dataset::from_json(&spatial(), &json!([]), &FieldNames::default())
            .expect("valid input");
        let bounds = data.map_bounds().expect("features have vertices");
        assert_eq!((bounds.x0, bounds.y0, bounds.x1, bounds.y1), (0.0, 0.0, 6.0, 6.0));
    }
}
