//! Streaming writer producing `{ "<field>": [ <relation>, ... ] }`.
//!
//! Use [`RelationWriter::write`] to append relations, then
//! [`RelationWriter::close`] to terminate the array and the enclosing object.
//! A writer that is dropped without being closed closes itself and logs any
//! failure.

use crate::errors::{Error, Result};
use crate::relation::Relation;
use log::{debug, error};
use std::io::Write;

#[derive(Debug)]
pub struct RelationWriter<W: Write> {
    inner: W,
    count: u64,
    closed: bool,
}

impl<W: Write> RelationWriter<W> {
    /// Writes the container prologue and opens the array named `field`.
    pub fn new(mut inner: W, field: &str) -> Result<Self> {
        inner.write_all(b"{")?;
        serde_json::to_writer(&mut inner, field).map_err(Error::from_encode)?;
        inner.write_all(b":[")?;
        Ok(RelationWriter {
            inner,
            count: 0,
            closed: false,
        })
    }

    /// Appends one relation to the open array.
    pub fn write(&mut self, relation: &Relation) -> Result<()> {
        if self.closed {
            return Err(Error::WriterClosed);
        }
        if self.count > 0 {
            self.inner.write_all(b",")?;
        }
        serde_json::to_writer(&mut self.inner, relation).map_err(Error::from_encode)?;
        self.count += 1;
        Ok(())
    }

    /// Number of relations written so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Closes the array and the object and flushes the sink. Only the first
    /// call writes anything.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        debug!("Closing relation writer after {} relations", self.count);
        self.inner.write_all(b"]}\n")?;
        self.inner.flush()?;
        Ok(())
    }
}

impl<W: Write> Drop for RelationWriter<W> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            error!("Failed to close relation writer: {}", e);
        }
    }
}
