//! Streaming reader for `{ "<field>": [ <relation>, ... ] }` documents.
//!
//! The reader validates the framing once in [`RelationReader::new`] and then
//! decodes one array element per call, so memory stays bounded by the size of
//! a single relation no matter how large the array is.
//!
//! ```
//! use inv_ident::RelationReader;
//!
//! let input = br#"{"relations":[{"objectType":"group","objectId":"g1","relation":"member"}]}"#;
//! let mut reader = RelationReader::new(&input[..]).unwrap();
//! let relation = reader.next().unwrap().unwrap();
//! assert_eq!(relation.object_id, "g1");
//! assert!(reader.next().is_none());
//! ```

use crate::errors::{Error, Result};
use crate::options::UnknownFields;
use crate::relation::Relation;
use log::debug;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::io::{self, BufRead};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    First,
    Rest,
    Done,
}

/// Pull-based reader over a relations array.
#[derive(Debug)]
pub struct RelationReader<R> {
    inner: R,
    field: String,
    position: Position,
    index: u64,
    unknown_fields: UnknownFields,
}

impl<R: BufRead> RelationReader<R> {
    /// Opens the container and positions the reader at the first element.
    pub fn new(inner: R) -> Result<Self> {
        Self::with_unknown_fields(inner, UnknownFields::default())
    }

    pub fn with_unknown_fields(mut inner: R, unknown_fields: UnknownFields) -> Result<Self> {
        expect_token(&mut inner, b'{', "input must start with '{'")?;
        if peek_token(&mut inner)? != Some(b'"') {
            return Err(Error::Format(
                "expected a field name holding the relations array".to_string(),
            ));
        }
        let field = {
            let mut de = serde_json::Deserializer::from_reader(&mut inner);
            String::deserialize(&mut de)
                .map_err(|e| Error::Format(format!("invalid field name: {}", e)))?
        };
        expect_token(&mut inner, b':', "expected ':' after the field name")?;
        expect_token(&mut inner, b'[', "expected '[' to open the relations array")?;
        debug!("Reading relations from field \"{}\"", field);
        Ok(RelationReader {
            inner,
            field,
            position: Position::First,
            index: 0,
            unknown_fields,
        })
    }

    /// Name of the top-level field the array was read from.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Decodes the next element into `relation`, replacing every field.
    ///
    /// Returns `Ok(false)` once the array is closed. An
    /// [`Error::UnknownField`] leaves the reader positioned after the
    /// offending element; every other error ends the stream.
    pub fn read(&mut self, relation: &mut Relation) -> Result<bool> {
        match self.read_element() {
            Ok(Some(next)) => {
                *relation = next;
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(e) => {
                if !e.is_skippable() {
                    self.position = Position::Done;
                }
                Err(e)
            }
        }
    }

    /// Stops reading. Later reads report the end of the stream.
    pub fn close(&mut self) {
        if self.position != Position::Done {
            debug!("Closing relation reader after {} elements", self.index);
        }
        self.position = Position::Done;
    }

    fn read_element(&mut self) -> Result<Option<Relation>> {
        match self.position {
            Position::Done => return Ok(None),
            Position::First => {
                if peek_token(&mut self.inner)? == Some(b']') {
                    self.inner.consume(1);
                    self.position = Position::Done;
                    return Ok(None);
                }
            }
            Position::Rest => match peek_token(&mut self.inner)? {
                Some(b']') => {
                    self.inner.consume(1);
                    self.position = Position::Done;
                    return Ok(None);
                }
                Some(b',') => self.inner.consume(1),
                Some(b) => {
                    return Err(Error::Format(format!(
                        "expected ',' or ']' after relation #{}, found '{}'",
                        self.index.saturating_sub(1),
                        b as char
                    )))
                }
                None => return Err(truncated()),
            },
        }

        let map = {
            let mut de = serde_json::Deserializer::from_reader(&mut self.inner);
            Map::<String, Value>::deserialize(&mut de).map_err(Error::from_decode)?
        };
        let index = self.index;
        self.index += 1;
        self.position = Position::Rest;
        Relation::from_map(map, index, self.unknown_fields).map(Some)
    }
}

impl<R: BufRead> Iterator for RelationReader<R> {
    type Item = Result<Relation>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut relation = Relation::default();
        match self.read(&mut relation) {
            Ok(true) => Some(Ok(relation)),
            Ok(false) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

fn truncated() -> Error {
    Error::Io(io::Error::new(
        io::ErrorKind::UnexpectedEof,
        "input ended inside the relations array",
    ))
}

/// Skips JSON whitespace and returns the next byte without consuming it.
fn peek_token<R: BufRead>(r: &mut R) -> Result<Option<u8>> {
    loop {
        let (skip, found) = {
            let buf = match r.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            if buf.is_empty() {
                return Ok(None);
            }
            match buf
                .iter()
                .position(|b| !matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
            {
                Some(i) => (i, Some(buf[i])),
                None => (buf.len(), None),
            }
        };
        r.consume(skip);
        if found.is_some() {
            return Ok(found);
        }
    }
}

fn expect_token<R: BufRead>(r: &mut R, want: u8, msg: &str) -> Result<()> {
    match peek_token(r)? {
        Some(b) if b == want => {
            r.consume(1);
            Ok(())
        }
        _ => Err(Error::Format(msg.to_string())),
    }
}
