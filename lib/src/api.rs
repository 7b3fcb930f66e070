//! Drives relations from a reader, through the identifier inversion, into a
//! writer.

use crate::config::Config;
use crate::consts::DEFAULT_FIELD;
use crate::errors::Result;
use crate::options::UnknownFields;
use crate::reader::RelationReader;
use crate::relation::Relation;
use crate::transform::invert_identifier;
use crate::writer::RelationWriter;
use log::{debug, info, warn};
use serde::Serialize;
use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Applies `INV_IDENT_LOG` as `RUST_LOG` so the CLI and embedding programs
/// share one switch.
pub fn init_logging() {
    if let Ok(log_level) = std::env::var("INV_IDENT_LOG") {
        std::env::set_var("RUST_LOG", log_level);
    }
}

/// Shared flag asking a running inversion to stop after the current relation.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Elements consumed from the input array, including dropped ones.
    pub read: u64,
    pub written: u64,
    /// Identifier relations whose subject and object were swapped.
    pub swapped: u64,
    /// Relations dropped because of unknown fields.
    pub dropped: u64,
    pub cancelled: bool,
}

/// One-shot driver wiring a [`RelationReader`] to a [`RelationWriter`].
#[derive(Debug, Clone)]
pub struct Inverter {
    field: String,
    unknown_fields: UnknownFields,
    cancel: CancelToken,
}

impl Default for Inverter {
    fn default() -> Self {
        Inverter {
            field: DEFAULT_FIELD.to_string(),
            unknown_fields: UnknownFields::default(),
            cancel: CancelToken::new(),
        }
    }
}

impl Inverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        Inverter {
            field: config.field.clone(),
            unknown_fields: config.unknown_fields,
            cancel: CancelToken::new(),
        }
    }

    /// Sets the array field name of the output container.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = field.into();
        self
    }

    pub fn unknown_fields(mut self, unknown_fields: UnknownFields) -> Self {
        self.unknown_fields = unknown_fields;
        self
    }

    pub fn cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Reads every relation from `source`, inverts identifier relations and
    /// writes the result to `sink`.
    ///
    /// The output container is closed on every path once it has been opened,
    /// including failures and cancellation. The first error encountered is
    /// returned; a failure to close the writer is only reported when nothing
    /// else failed.
    pub fn run<R: BufRead, W: Write>(&self, source: R, sink: W) -> Result<Stats> {
        let mut reader = RelationReader::with_unknown_fields(source, self.unknown_fields)?;
        let mut writer = RelationWriter::new(sink, &self.field)?;
        let mut stats = Stats::default();

        let result = self.pump(&mut reader, &mut writer, &mut stats);
        let closed = writer.close();
        reader.close();
        result?;
        closed?;

        info!(
            "Inverted relations: read={} written={} swapped={} dropped={}{}",
            stats.read,
            stats.written,
            stats.swapped,
            stats.dropped,
            if stats.cancelled { " (cancelled)" } else { "" }
        );
        Ok(stats)
    }

    fn pump<R: BufRead, W: Write>(
        &self,
        reader: &mut RelationReader<R>,
        writer: &mut RelationWriter<W>,
        stats: &mut Stats,
    ) -> Result<()> {
        let mut relation = Relation::default();
        loop {
            if self.cancel.is_cancelled() {
                warn!("Cancelled after {} relations", stats.read);
                stats.cancelled = true;
                return Ok(());
            }
            match reader.read(&mut relation) {
                Ok(true) => stats.read += 1,
                Ok(false) => return Ok(()),
                Err(e) if e.is_skippable() => {
                    stats.read += 1;
                    stats.dropped += 1;
                    warn!("Dropping relation: {}", e);
                    continue;
                }
                Err(e) => return Err(e),
            }

            let swap = relation.is_identifier();
            let out = invert_identifier(std::mem::take(&mut relation))?;
            if swap {
                debug!("Inverted {}", out);
                stats.swapped += 1;
            }
            writer.write(&out)?;
            stats.written += 1;
        }
    }
}

/// Inverts identifier relations from `source` into `sink` with the default
/// settings: output field `relations`, relations with unknown fields dropped.
pub fn invert<R: BufRead, W: Write>(source: R, sink: W) -> Result<()> {
    Inverter::new().run(source, sink).map(|_| ())
}

/// Opens the configured source and sink and runs the inversion between them.
pub fn run_config(config: &Config, cancel: CancelToken) -> Result<Stats> {
    let source = config.open_source()?;
    let sink = config.open_sink()?;
    debug!("Inverting {} into {}", config.source, config.sink);
    Inverter::from_config(config)
        .cancel_token(cancel)
        .run(source, sink)
}
