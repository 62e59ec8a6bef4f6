//! Open-time failure paths: every error surfaces at `EventReader::open*`.

use std::collections::HashMap;
use std::fs::File;
use std::sync::Arc;

use arrow::array::{Array, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use tempfile::TempDir;

use b2_core::Error;
use b2_events::{EventReader, Projection};

/// Write a small Parquet file with an arbitrary schema and one batch.
fn write_parquet(path: &std::path::Path, schema: Schema, arrays: Vec<Arc<dyn Array>>) {
    let schema = Arc::new(schema);
    let batch = RecordBatch::try_new(schema.clone(), arrays).unwrap();
    let file = File::create(path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
}

#[test]
fn missing_file_is_io_error() {
    let err = EventReader::open("/nonexistent/decays.parquet").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn non_parquet_bytes_fail_at_footer() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("not_parquet.parquet");
    std::fs::write(&path, b"DecayTree, but not really").unwrap();

    let err = EventReader::open(&path).unwrap_err();
    assert!(matches!(err, Error::Container(_)));
}

#[test]
fn foreign_layout_is_missing_column() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("foreign.parquet");
    write_parquet(
        &path,
        Schema::new(vec![Field::new("x", DataType::Float64, false)]),
        vec![Arc::new(Float64Array::from(vec![1.0, 2.0]))],
    );

    let err = EventReader::open(&path).unwrap_err();
    match err {
        Error::Schema(msg) => assert!(msg.contains("missing column"), "{msg}"),
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn foreign_schema_version_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("versioned.parquet");
    let metadata =
        HashMap::from([("b2hhh.schema_version".to_string(), "b2hhh_decay_v999".to_string())]);
    write_parquet(
        &path,
        Schema::new(vec![Field::new("H1_PX", DataType::Float64, false)]).with_metadata(metadata),
        vec![Arc::new(Float64Array::from(vec![1.0]))],
    );

    let err = EventReader::open(&path).unwrap_err();
    match err {
        Error::Schema(msg) => assert!(msg.contains("schema version"), "{msg}"),
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn mistyped_muon_flag_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mistyped.parquet");
    let fields = vec![
        Field::new("H1_PX", DataType::Float64, false),
        Field::new("H1_isMuon", DataType::Float64, false),
        Field::new("H2_isMuon", DataType::Float64, false),
        Field::new("H3_isMuon", DataType::Float64, false),
    ];
    let column = || Arc::new(Float64Array::from(vec![0.0])) as Arc<dyn Array>;
    write_parquet(&path, Schema::new(fields), vec![column(), column(), column(), column()]);

    let err = EventReader::open_with_projection(&path, Projection::PlotOnly).unwrap_err();
    match err {
        Error::Schema(msg) => assert!(msg.contains("expected Int32"), "{msg}"),
        other => panic!("expected schema error, got {other:?}"),
    }
}
