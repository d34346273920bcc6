//! GeoJSON encoding of geometry tables.

use geo_types::{Geometry, MultiPolygon};
use geojson::{Feature, FeatureCollection, GeoJson};
use serde_json::{Map, Value as JsonValue};

use crate::geometry::{GeometryRecord, GeometryTable, POSTCODE_FIELD};

/// Encode a geometry table as a GeoJSON feature collection string.
///
/// Each feature has a `POSTCODE` property and a MultiPolygon geometry. The
/// collection's `name` member records the region.
pub fn encode_geometry(region: &str, table: &GeometryTable) -> String {
    let features = table
        .iter()
        .map(|record| {
            let mut properties = Map::new();
            properties.insert(
                POSTCODE_FIELD.to_string(),
                JsonValue::String(record.postcode.clone()),
            );
            Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(geojson::Value::from(&record.polygon))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    let mut foreign_members = Map::new();
    foreign_members.insert("name".to_string(), JsonValue::String(region.to_string()));

    GeoJson::from(FeatureCollection {
        bbox: None,
        features,
        foreign_members: Some(foreign_members),
    })
    .to_string()
}

/// Decode a geometry table written by [`encode_geometry`] or any GeoJSON
/// feature collection with a `POSTCODE` property and (multi)polygon geometry.
///
/// Repeated postcodes keep their first feature.
pub fn decode_geometry(text: &str) -> Result<GeometryTable, String> {
    let geojson: GeoJson = text.parse().map_err(|e: geojson::Error| e.to_string())?;
    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => return Err("expected a FeatureCollection".to_string()),
    };

    let mut table = GeometryTable::new();
    for (i, feature) in collection.features.into_iter().enumerate() {
        let postcode = match feature.property(POSTCODE_FIELD) {
            Some(JsonValue::String(s)) => s.clone(),
            _ => return Err(format!("feature {} has no {} string", i, POSTCODE_FIELD)),
        };
        let geometry = feature
            .geometry
            .ok_or_else(|| format!("feature {} ({}) has no geometry", i, postcode))?;
        let polygon = match Geometry::<f64>::try_from(geometry.value) {
            Ok(Geometry::MultiPolygon(mp)) => mp,
            Ok(Geometry::Polygon(p)) => MultiPolygon(vec![p]),
            Ok(_) => return Err(format!("feature {} ({}) is not a polygon", i, postcode)),
            Err(e) => return Err(format!("feature {} ({}): {}", i, postcode, e)),
        };
        table.push(GeometryRecord::new(postcode, polygon));
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::square;

    fn table() -> GeometryTable {
        vec![
            GeometryRecord::new("CB30DG", square(0.123456789012345, 52.2)),
            GeometryRecord::new("B1 1AA", square(-1.9, 52.48)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_round_trip_is_exact() {
        let original = table();
        let decoded = decode_geometry(&encode_geometry("EE", &original)).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_encoding_is_self_describing() {
        let text = encode_geometry("EE", &table());
        let value: JsonValue = serde_json::from_str(&text).unwrap();

        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(value["name"], "EE");
        assert_eq!(value["features"][0]["properties"]["POSTCODE"], "CB30DG");
        assert_eq!(value["features"][0]["geometry"]["type"], "MultiPolygon");
    }

    #[test]
    fn test_empty_table_encodes() {
        let text = encode_geometry("EE", &GeometryTable::new());
        assert!(decode_geometry(&text).unwrap().is_empty());
    }

    #[test]
    fn test_accepts_plain_polygon_features() {
        let text = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"POSTCODE":"EH1 1YZ"},
             "geometry":{"type":"Polygon","coordinates":[[[0,0],[0,1],[1,1],[1,0],[0,0]]]}}
        ]}"#;
        let decoded = decode_geometry(text).unwrap();
        assert_eq!(decoded.get("EH1 1YZ").unwrap().polygon, square(0.0, 0.0));
    }

    #[test]
    fn test_rejects_missing_postcode() {
        let text = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{},
             "geometry":{"type":"Polygon","coordinates":[[[0,0],[0,1],[1,1],[0,0]]]}}
        ]}"#;
        assert!(decode_geometry(text).unwrap_err().contains("POSTCODE"));
    }

    #[test]
    fn test_rejects_non_collection() {
        let text = r#"{"type":"Point","coordinates":[0,0]}"#;
        assert!(decode_geometry(text).is_err());
        assert!(decode_geometry("not json").is_err());
    }
}
