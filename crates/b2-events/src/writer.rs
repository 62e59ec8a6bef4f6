//! Decay container writer.
//!
//! Buffers records column-wise and flushes a row group every
//! [`ROW_GROUP_EVENTS`] records. [`EventWriter::close`] finalizes the
//! Parquet footer; a file is not readable without it.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, Float64Array, Int32Array};
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use b2_core::{Error, Event, Result};

use crate::schema::decay_schema;

/// Records buffered per row group.
pub const ROW_GROUP_EVENTS: usize = 64 * 1024;

/// Columnar writer for decay containers.
pub struct EventWriter {
    writer: ArrowWriter<File>,
    schema: SchemaRef,
    buffer: ColumnBuffers,
    written: u64,
}

impl EventWriter {
    /// Create a container at `path`, truncating any existing file.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let schema: SchemaRef = Arc::new(decay_schema());
        let props = WriterProperties::builder().set_compression(Compression::SNAPPY).build();
        let writer = ArrowWriter::try_new(file, schema.clone(), Some(props))
            .map_err(|e| Error::Container(format!("failed to create Parquet writer: {e}")))?;
        tracing::debug!(path = %path.display(), "container created");
        Ok(Self { writer, schema, buffer: ColumnBuffers::default(), written: 0 })
    }

    /// Append one record.
    pub fn write(&mut self, event: &Event) -> Result<()> {
        self.buffer.push(event);
        self.written += 1;
        if self.buffer.len() >= ROW_GROUP_EVENTS {
            self.flush_row_group()?;
        }
        Ok(())
    }

    /// Records appended so far.
    #[inline]
    pub fn events_written(&self) -> u64 {
        self.written
    }

    /// Flush buffered records and finalize the footer.
    pub fn close(mut self) -> Result<()> {
        self.flush_row_group()?;
        self.writer
            .close()
            .map_err(|e| Error::Container(format!("failed to close Parquet writer: {e}")))?;
        Ok(())
    }

    fn flush_row_group(&mut self) -> Result<()> {
        if self.buffer.len() == 0 {
            return Ok(());
        }
        let batch = self.buffer.drain_to_batch(&self.schema)?;
        self.writer
            .write(&batch)
            .map_err(|e| Error::Container(format!("failed to write Parquet row group: {e}")))
    }
}

/// Write every record of `events` to a fresh container at `path`.
///
/// Convenience for the generator and for tests; returns the record count.
pub fn write_events<P, I>(path: P, events: I) -> Result<u64>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = Event>,
{
    let mut writer = EventWriter::create(path)?;
    for event in events {
        writer.write(&event)?;
    }
    let written = writer.events_written();
    writer.close()?;
    Ok(written)
}

/// Column-wise staging buffers, one set per candidate slot.
#[derive(Default)]
struct ColumnBuffers {
    slots: [SlotBuffers; 3],
}

#[derive(Default)]
struct SlotBuffers {
    px: Vec<f64>,
    py: Vec<f64>,
    pz: Vec<f64>,
    prob_k: Vec<f64>,
    prob_pi: Vec<f64>,
    charge: Vec<i32>,
    is_muon: Vec<i32>,
}

impl ColumnBuffers {
    fn push(&mut self, event: &Event) {
        for (slot, candidate) in self.slots.iter_mut().zip(event.candidates.iter()) {
            slot.px.push(candidate.px);
            slot.py.push(candidate.py);
            slot.pz.push(candidate.pz);
            slot.prob_k.push(candidate.prob_k);
            slot.prob_pi.push(candidate.prob_pi);
            slot.charge.push(candidate.charge);
            slot.is_muon.push(candidate.is_muon);
        }
    }

    fn len(&self) -> usize {
        self.slots[0].px.len()
    }

    fn drain_to_batch(&mut self, schema: &SchemaRef) -> Result<RecordBatch> {
        let mut arrays: Vec<Arc<dyn Array>> = Vec::with_capacity(21);
        for slot in self.slots.iter_mut() {
            arrays.push(Arc::new(Float64Array::from(std::mem::take(&mut slot.px))));
            arrays.push(Arc::new(Float64Array::from(std::mem::take(&mut slot.py))));
            arrays.push(Arc::new(Float64Array::from(std::mem::take(&mut slot.pz))));
            arrays.push(Arc::new(Float64Array::from(std::mem::take(&mut slot.prob_k))));
            arrays.push(Arc::new(Float64Array::from(std::mem::take(&mut slot.prob_pi))));
            arrays.push(Arc::new(Int32Array::from(std::mem::take(&mut slot.charge))));
            arrays.push(Arc::new(Int32Array::from(std::mem::take(&mut slot.is_muon))));
        }
        RecordBatch::try_new(schema.clone(), arrays)
            .map_err(|e| Error::Container(format!("failed to build record batch: {e}")))
    }
}
