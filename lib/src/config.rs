//! Run configuration: where relations come from, where they go and how the
//! output container is named.

use crate::consts::DEFAULT_FIELD;
use crate::errors::{Error, Result};
use crate::options::UnknownFields;
use derive_builder::Builder;
use log::debug;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Source {
    #[default]
    Stdin,
    Path(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Sink {
    #[default]
    Stdout,
    Path(PathBuf),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Source::Stdin => write!(f, "<stdin>"),
            Source::Path(p) => write!(f, "{}", p.display()),
        }
    }
}

impl fmt::Display for Sink {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Sink::Stdout => write!(f, "<stdout>"),
            Sink::Path(p) => write!(f, "{}", p.display()),
        }
    }
}

#[derive(Builder, Debug, Clone, PartialEq, Eq)]
#[builder(setter(into), default)]
pub struct Config {
    pub source: Source,
    pub sink: Sink,
    /// Array field name of the output container.
    pub field: String,
    pub unknown_fields: UnknownFields,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source: Source::Stdin,
            sink: Sink::Stdout,
            field: DEFAULT_FIELD.to_string(),
            unknown_fields: UnknownFields::Drop,
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Opens the configured source for buffered reading. A directory is
    /// reported as [`Error::NotFound`].
    pub fn open_source(&self) -> Result<Box<dyn BufRead>> {
        match &self.source {
            Source::Stdin => Ok(Box::new(io::stdin().lock())),
            Source::Path(path) => {
                if std::fs::metadata(path)?.is_dir() {
                    return Err(Error::NotFound(path.clone()));
                }
                debug!("Reading relations from {}", path.display());
                Ok(Box::new(BufReader::new(File::open(path)?)))
            }
        }
    }

    /// Opens the configured sink, creating or truncating the output file.
    pub fn open_sink(&self) -> Result<Box<dyn Write>> {
        match &self.sink {
            Sink::Stdout => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
            Sink::Path(path) => {
                debug!("Writing relations to {}", path.display());
                Ok(Box::new(BufWriter::new(File::create(path)?)))
            }
        }
    }
}
