//! json-stitch — incremental reconstruction of JSON documents from streams of
//! path-addressed fragment updates.
//!
//! - [`FragmentRebuilder`] folds one document's ordered updates into a live
//!   `serde_json::Value`.
//! - [`DocumentRegistry`] keeps many documents alive at once, keyed by id,
//!   and locks or discards them as turns complete.
//!
//! # Example
//!
//! ```
//! use json_stitch::{DocumentRegistry, FragmentUpdate};
//! use serde_json::json;
//!
//! let mut registry = DocumentRegistry::new();
//! let id = json_stitch::document_id("msg-1", "call-1");
//!
//! registry.apply(&id, vec![
//!     FragmentUpdate::start_object("root"),
//!     FragmentUpdate::partial_string("root.city", "Par"),
//! ]);
//! assert_eq!(registry.value(&id), Some(&json!({"city": "Par"})));
//!
//! registry.apply(&id, vec![
//!     FragmentUpdate::complete_string("root.city", "\"Paris\""),
//!     FragmentUpdate::json_complete(),
//! ]);
//! assert!(registry.is_complete(&id));
//! assert!(registry.get(&id).is_err());
//!
//! registry.finalize_message("msg-1", None);
//! assert!(!registry.has(&id));
//! ```

pub mod cli;
pub mod error;
pub mod fallback;
pub mod fragment;
pub mod literal;
pub mod options;
pub mod rebuilder;
pub mod registry;

pub use error::{SkipReason, StitchError};
pub use fallback::RawArguments;
pub use fragment::{FragmentKind, FragmentUpdate};
pub use options::{StitchOptions, MAX_INDEX_GAP};
pub use rebuilder::{Diagnostics, FragmentRebuilder, LockReason, RebuilderState};
pub use registry::{document_id, indexed_document_id, DocumentRegistry};
