//! GeoJSON export of joined rows for map renderers.

use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::Map;

use super::joined::JoinedTable;

impl JoinedTable {
    /// Convert rows to a GeoJSON feature collection.
    ///
    /// Each feature carries every metric column as a property. Unmatched rows
    /// are emitted with a null geometry when `include_unmatched` is set and
    /// skipped otherwise.
    pub fn to_feature_collection(&self, include_unmatched: bool) -> FeatureCollection {
        let features = self
            .rows()
            .iter()
            .filter(|row| include_unmatched || row.is_matched())
            .map(|row| {
                let properties: Map<String, serde_json::Value> = self
                    .columns()
                    .iter()
                    .zip(&row.values)
                    .map(|(name, value)| (name.clone(), value.to_json()))
                    .collect();
                Feature {
                    bbox: None,
                    geometry: row
                        .geometry
                        .as_ref()
                        .map(|polygon| Geometry::new(Value::from(polygon))),
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::geometry::{square, GeometryRecord, GeometryTable};
    use crate::join::join;
    use crate::table::{CellValue, MetricsTable};

    fn joined() -> crate::join::JoinedTable {
        let mut metrics = MetricsTable::new(["postcode", "PPI"]);
        metrics
            .push_row(vec![CellValue::Text("CB30DG".into()), CellValue::Number(0.5)])
            .unwrap();
        metrics
            .push_row(vec![CellValue::Text("XX99ZZ".into()), CellValue::Null])
            .unwrap();
        let geo: GeometryTable = vec![GeometryRecord::new("CB30DG", square(0.0, 52.0))]
            .into_iter()
            .collect();
        join(&metrics, &geo, "postcode").unwrap().table
    }

    #[test]
    fn test_matched_only() {
        let fc = joined().to_feature_collection(false);
        assert_eq!(fc.features.len(), 1);

        let feature = &fc.features[0];
        assert!(feature.geometry.is_some());
        assert_eq!(
            feature.property("postcode"),
            Some(&serde_json::json!("CB30DG"))
        );
        assert_eq!(feature.property("PPI"), Some(&serde_json::json!(0.5)));
    }

    #[test]
    fn test_include_unmatched_has_null_geometry() {
        let fc = joined().to_feature_collection(true);
        assert_eq!(fc.features.len(), 2);
        assert!(fc.features[1].geometry.is_none());
        assert_eq!(fc.features[1].property("PPI"), Some(&serde_json::Value::Null));
    }

    #[test]
    fn test_serializes_as_geojson() {
        let text = geojson::GeoJson::from(joined().to_feature_collection(false)).to_string();
        assert!(text.contains("\"FeatureCollection\""));
        assert!(text.contains("\"MultiPolygon\""));
    }
}
