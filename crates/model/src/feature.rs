//! GeoJSON shapes of a trajectory response.
//!
//! Only the parts needed to render a device path are modelled. Line geometries
//! come from the point store already serialized and are carried as
//! [`RawValue`] so they reach the caller byte for byte.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FeatureKind {
    Path,
    Point,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FeatureProperties {
    pub kind: FeatureKind,
    pub device_id: String,
    /// RFC-3339 UTC timestamp, only set on point features.
    pub time: Option<String>,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct Feature {
    #[serde(rename = "type")]
    pub geojson_type: String,
    pub properties: FeatureProperties,
    #[schemars(with = "serde_json::Value")]
    pub geometry: Box<RawValue>,
}

impl Feature {
    pub fn new(properties: FeatureProperties, geometry: Box<RawValue>) -> Self {
        Self {
            geojson_type: "Feature".to_owned(),
            properties,
            geometry,
        }
    }

    pub fn kind(&self) -> FeatureKind {
        self.properties.kind
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub geojson_type: String,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            geojson_type: "FeatureCollection".to_owned(),
            features,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }
}

/// A GeoJSON point. Coordinates are `[longitude, latitude]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    pub geojson_type: String,
    pub coordinates: [f64; 2],
}

impl PointGeometry {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            geojson_type: "Point".to_owned(),
            coordinates: [longitude, latitude],
        }
    }

    pub fn to_raw(&self) -> serde_json::Result<Box<RawValue>> {
        serde_json::value::to_raw_value(self)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn point_geometry_puts_longitude_first() {
        let raw = PointGeometry::new(1.5, 2.5).to_raw().unwrap();
        let value: serde_json::Value = serde_json::from_str(raw.get()).unwrap();
        assert_eq!(value, json!({"type": "Point", "coordinates": [2.5, 1.5]}));
    }

    #[test]
    fn path_properties_omit_time() {
        let properties = FeatureProperties {
            kind: FeatureKind::Path,
            device_id: "d1".to_owned(),
            time: None,
        };
        assert_eq!(
            serde_json::to_value(properties).unwrap(),
            json!({"kind": "path", "device_id": "d1"})
        );
    }

    #[test]
    fn raw_geometry_is_forwarded_verbatim() {
        let line = r#"{"type":"LineString","coordinates":[[2.5,1.5],[3.5,2.5]]}"#;
        let feature = Feature::new(
            FeatureProperties {
                kind: FeatureKind::Path,
                device_id: "d1".to_owned(),
                time: None,
            },
            RawValue::from_string(line.to_owned()).unwrap(),
        );
        let body = serde_json::to_string(&FeatureCollection::new(vec![feature])).unwrap();
        assert!(body.starts_with(r#"{"type":"FeatureCollection","features":[{"type":"Feature""#));
        assert!(body.contains(line));
    }
}
