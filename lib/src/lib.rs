//! Inverts identifier relations in a streamed relations export.
//!
//! An export is a single JSON object holding one array of relations:
//!
//! ```json
//! {"relations":[{"objectType":"user","objectId":"u1","relation":"identifier",
//!                "subjectType":"identity","subjectId":"i1","subjectRelation":""}]}
//! ```
//!
//! Every `identifier` relation has its object and subject swapped, so the
//! identity becomes the object and the user the subject. All other relations
//! are copied unchanged. Input and output are streamed one relation at a time.
//!
//! ```
//! let input = br#"{"relations":[{"objectType":"user","objectId":"u1","relation":"identifier","subjectType":"identity","subjectId":"i1"}]}"#;
//! let mut output = Vec::new();
//! inv_ident::invert(&input[..], &mut output).unwrap();
//! let v: serde_json::Value = serde_json::from_slice(&output).unwrap();
//! assert_eq!(v["relations"][0]["objectType"], "identity");
//! assert_eq!(v["relations"][0]["subjectId"], "u1");
//! ```

pub mod api;
pub mod config;
pub mod consts;
pub mod errors;
pub mod options;
pub mod reader;
pub mod relation;
pub mod transform;
pub mod writer;

pub use api::{invert, run_config, CancelToken, Inverter, Stats};
pub use config::{Config, Sink, Source};
pub use errors::{Error, Result};
pub use options::UnknownFields;
pub use reader::RelationReader;
pub use relation::Relation;
pub use transform::invert_identifier;
pub use writer::RelationWriter;
