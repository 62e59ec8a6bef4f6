//! Lazy, forward-only record stream over a decay container.
//!
//! [`EventReader::open`] parses the Parquet footer and validates the decay
//! layout up front; every failure there is the single fatal error path of
//! the scan tools. After a successful open, iteration decodes one record
//! batch at a time and yields owned [`Event`] values in file order, exactly
//! once, with no rewind.

use std::fs::File;
use std::path::Path;

use arrow::array::{Array, Float64Array, Int32Array};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::{ParquetRecordBatchReader, ParquetRecordBatchReaderBuilder};
use parquet::arrow::ProjectionMask;

use b2_core::{Error, Event, KaonCandidate, Result};

use crate::schema::{
    column_name, decay_schema, Projection, DECAY_SCHEMA_VERSION, META_KEY_SCHEMA_VERSION,
};

/// Streaming reader over a decay container file.
///
/// The file handle is owned by the reader and released when the reader is
/// dropped, on every exit path. Iteration order is file order; each record
/// is read exactly once.
pub struct EventReader {
    reader: ParquetRecordBatchReader,
    projection: Projection,
    n_events: u64,
    batch: Option<DecodedBatch>,
    row: usize,
}

impl std::fmt::Debug for EventReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventReader")
            .field("projection", &self.projection)
            .field("n_events", &self.n_events)
            .field("row", &self.row)
            .finish_non_exhaustive()
    }
}

impl EventReader {
    /// Open a container, decoding all 21 columns.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_projection(path, Projection::Full)
    }

    /// Open a container, decoding only the projected columns.
    ///
    /// Event fields outside the projection read as zero. Fails if the file
    /// cannot be opened, its footer cannot be parsed, its schema version is
    /// foreign, or any projected column is missing or mistyped.
    pub fn open_with_projection<P: AsRef<Path>>(path: P, projection: Projection) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)
            .map_err(|e| Error::Container(format!("failed to read Parquet footer: {e}")))?;

        let file_schema = builder.schema().clone();
        if let Some(version) = file_schema.metadata().get(META_KEY_SCHEMA_VERSION) {
            if version != DECAY_SCHEMA_VERSION {
                return Err(Error::Schema(format!(
                    "unsupported schema version '{version}', expected '{DECAY_SCHEMA_VERSION}'"
                )));
            }
        }

        let projected = projection.column_names();
        let expected = decay_schema();
        for field in expected.fields() {
            if !projected.iter().any(|n| n == field.name()) {
                continue;
            }
            match file_schema.field_with_name(field.name()) {
                Ok(found) if found.data_type() == field.data_type() => {}
                Ok(found) => {
                    return Err(Error::Schema(format!(
                        "column '{}' has type {:?}, expected {:?}",
                        field.name(),
                        found.data_type(),
                        field.data_type()
                    )));
                }
                Err(_) => {
                    return Err(Error::Schema(format!("missing column '{}'", field.name())));
                }
            }
        }

        let n_events = builder.metadata().file_metadata().num_rows() as u64;

        let mask_indices: Vec<usize> = file_schema
            .fields()
            .iter()
            .enumerate()
            .filter(|(_, f)| projected.iter().any(|n| n == f.name()))
            .map(|(i, _)| i)
            .collect();

        // Flat schema: parquet root order matches the Arrow field order.
        let mask = ProjectionMask::roots(builder.parquet_schema(), mask_indices);
        let reader = builder
            .with_projection(mask)
            .build()
            .map_err(|e| Error::Container(format!("failed to build Parquet reader: {e}")))?;

        tracing::debug!(path = %path.display(), events = n_events, ?projection, "container opened");
        Ok(Self { reader, projection, n_events, batch: None, row: 0 })
    }

    /// Total number of records in the container, from file metadata.
    #[inline]
    pub fn n_events(&self) -> u64 {
        self.n_events
    }

    /// The column subset this reader decodes.
    #[inline]
    pub fn projection(&self) -> Projection {
        self.projection
    }
}

impl Iterator for EventReader {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(batch) = &self.batch {
                if self.row < batch.rows {
                    let event = batch.event_at(self.row);
                    self.row += 1;
                    return Some(Ok(event));
                }
            }
            match self.reader.next() {
                Some(Ok(record_batch)) => match DecodedBatch::decode(&record_batch) {
                    Ok(batch) => {
                        self.batch = Some(batch);
                        self.row = 0;
                    }
                    Err(e) => return Some(Err(e)),
                },
                Some(Err(e)) => {
                    return Some(Err(Error::Container(format!(
                        "failed to decode record batch: {e}"
                    ))));
                }
                None => return None,
            }
        }
    }
}

/// One record batch, downcast to typed candidate columns.
struct DecodedBatch {
    rows: usize,
    slots: [SlotColumns; 3],
}

/// Typed column handles for one candidate slot; `None` means projected out.
struct SlotColumns {
    px: Option<Float64Array>,
    py: Option<Float64Array>,
    pz: Option<Float64Array>,
    prob_k: Option<Float64Array>,
    prob_pi: Option<Float64Array>,
    charge: Option<Int32Array>,
    is_muon: Option<Int32Array>,
}

impl DecodedBatch {
    fn decode(batch: &RecordBatch) -> Result<Self> {
        let slot = |i: usize| -> Result<SlotColumns> {
            Ok(SlotColumns {
                px: f64_column(batch, &column_name(i, "PX"))?,
                py: f64_column(batch, &column_name(i, "PY"))?,
                pz: f64_column(batch, &column_name(i, "PZ"))?,
                prob_k: f64_column(batch, &column_name(i, "ProbK"))?,
                prob_pi: f64_column(batch, &column_name(i, "ProbPi"))?,
                charge: i32_column(batch, &column_name(i, "Charge"))?,
                is_muon: i32_column(batch, &column_name(i, "isMuon"))?,
            })
        };
        Ok(Self { rows: batch.num_rows(), slots: [slot(0)?, slot(1)?, slot(2)?] })
    }

    fn event_at(&self, row: usize) -> Event {
        let candidate = |s: &SlotColumns| KaonCandidate {
            px: s.px.as_ref().map_or(0.0, |a| a.value(row)),
            py: s.py.as_ref().map_or(0.0, |a| a.value(row)),
            pz: s.pz.as_ref().map_or(0.0, |a| a.value(row)),
            prob_k: s.prob_k.as_ref().map_or(0.0, |a| a.value(row)),
            prob_pi: s.prob_pi.as_ref().map_or(0.0, |a| a.value(row)),
            charge: s.charge.as_ref().map_or(0, |a| a.value(row)),
            is_muon: s.is_muon.as_ref().map_or(0, |a| a.value(row)),
        };
        Event::new(
            candidate(&self.slots[0]),
            candidate(&self.slots[1]),
            candidate(&self.slots[2]),
        )
    }
}

fn f64_column(batch: &RecordBatch, name: &str) -> Result<Option<Float64Array>> {
    let Ok(idx) = batch.schema().index_of(name) else {
        return Ok(None);
    };
    let col = batch.column(idx);
    match col.as_any().downcast_ref::<Float64Array>() {
        Some(a) => Ok(Some(a.clone())),
        None => Err(Error::Schema(format!(
            "column '{name}' has type {:?}, expected Float64",
            col.data_type()
        ))),
    }
}

fn i32_column(batch: &RecordBatch, name: &str) -> Result<Option<Int32Array>> {
    let Ok(idx) = batch.schema().index_of(name) else {
        return Ok(None);
    };
    let col = batch.column(idx);
    match col.as_any().downcast_ref::<Int32Array>() {
        Some(a) => Ok(Some(a.clone())),
        None => Err(Error::Schema(format!(
            "column '{name}' has type {:?}, expected Int32",
            col.data_type()
        ))),
    }
}
