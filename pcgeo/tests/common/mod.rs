//! Shared fixtures: real shapefile shards and metrics files on disk.

#![allow(dead_code)]

use std::path::Path;

use pcgeo::geometry::POSTCODE_FIELD;
use pcgeo::postcode::ShardKey;
use shapefile::dbase::{FieldName, FieldValue, Record, TableWriterBuilder};
use shapefile::{Point, Polygon, PolygonRing};

/// Write a shard for `prefix` holding one unit square per postcode.
///
/// Square `i` spans x in `[i, i + 1]`.
pub fn write_shard(root: &Path, prefix: &str, postcodes: &[&str]) {
    let key = ShardKey::from_postcode(&format!("{}1", prefix)).unwrap();
    let path = key.path_in(root);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();

    let builder = TableWriterBuilder::new()
        .add_character_field(FieldName::try_from(POSTCODE_FIELD).unwrap(), 10);
    let mut writer = shapefile::Writer::from_path(&path, builder).unwrap();

    for (i, postcode) in postcodes.iter().enumerate() {
        let x = i as f64;
        let polygon = Polygon::new(PolygonRing::Outer(vec![
            Point::new(x, 0.0),
            Point::new(x, 1.0),
            Point::new(x + 1.0, 1.0),
            Point::new(x + 1.0, 0.0),
            Point::new(x, 0.0),
        ]));
        let mut record = Record::default();
        record.insert(
            POSTCODE_FIELD.to_string(),
            FieldValue::Character(Some(postcode.to_string())),
        );
        writer.write_shape_and_record(&polygon, &record).unwrap();
    }
}

/// Write a CSV metrics file with `Postcode` and `PPI` columns.
pub fn write_metrics_csv(path: &Path, rows: &[(&str, f64)]) {
    let mut writer = csv::Writer::from_path(path).unwrap();
    writer.write_record(["Postcode", "PPI"]).unwrap();
    for (postcode, ppi) in rows {
        writer.write_record([postcode.to_string(), ppi.to_string()]).unwrap();
    }
    writer.flush().unwrap();
}
