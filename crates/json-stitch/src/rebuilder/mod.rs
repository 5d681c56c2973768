//! `FragmentRebuilder` — folds an ordered stream of fragment updates into a
//! single JSON value.
//!
//! The value is queryable at every point: containers appear as soon as they
//! are started, strings grow with each `PartialString` chunk. Once the
//! document is locked (by a `JsonComplete` update or [`FragmentRebuilder::lock_for_result`])
//! every further batch is dropped whole.

mod resolve;

use std::collections::HashMap;

use json_stitch_path::validate_fragment_path;
use serde_json::Value;

use crate::error::SkipReason;
use crate::fragment::{FragmentKind, FragmentUpdate};
use crate::literal::{coerce_bool, coerce_number_text, coerce_number_value, decode_string_literal, NumberOutcome};
use crate::options::StitchOptions;

use resolve::{write_at, ContainerKind, Write};

/// Why a document stopped accepting writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockReason {
    /// The producer sent `JsonComplete`: the value is semantically final.
    JsonComplete,
    /// Locked from outside, e.g. a tool result superseded the arguments.
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RebuilderState {
    #[default]
    Building,
    Locked(LockReason),
}

/// Counters for anomalies recovered in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Updates skipped because their path was malformed or did not fit the tree.
    pub skipped_updates: u64,
    /// `CompleteNumber` payloads that coerced to NaN or an infinity (stored as `null`).
    pub non_finite_numbers: u64,
    /// The most recent skip, if any.
    pub last_skip: Option<SkipReason>,
}

#[derive(Debug, Clone, Default)]
pub struct FragmentRebuilder {
    root: Option<Value>,
    /// In-progress strings keyed by the path text they were addressed with.
    partial_buffers: HashMap<String, String>,
    state: RebuilderState,
    options: StitchOptions,
    diagnostics: Diagnostics,
}

impl FragmentRebuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: StitchOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Apply a batch of updates in order.
    ///
    /// A locked rebuilder ignores the whole batch. A `JsonComplete` inside the
    /// batch locks the document and the remaining updates are dropped, so
    /// splitting a stream into batches never changes the result.
    pub fn apply<I>(&mut self, updates: I)
    where
        I: IntoIterator<Item = FragmentUpdate>,
    {
        if self.is_locked() {
            tracing::debug!("dropping fragment batch for locked document");
            return;
        }

        let mut updates = updates.into_iter();
        let mut applied = 0usize;
        for update in updates.by_ref() {
            self.apply_one(update);
            applied += 1;
            if self.is_locked() {
                break;
            }
        }

        let dropped = updates.count();
        if dropped > 0 {
            tracing::debug!(dropped, "dropping updates that followed JsonComplete");
        }
        tracing::trace!(applied, state = ?self.state, "applied fragment batch");
    }

    fn apply_one(&mut self, update: FragmentUpdate) {
        let FragmentUpdate {
            path,
            kind,
            text_value,
            value,
        } = update;

        let write = match kind {
            FragmentKind::JsonComplete => {
                self.state = RebuilderState::Locked(LockReason::JsonComplete);
                return;
            }
            FragmentKind::StartObject => Write::Ensure(ContainerKind::Object),
            FragmentKind::StartArray => Write::Ensure(ContainerKind::Array),
            FragmentKind::PartialString => {
                let buffer = self.partial_buffers.entry(path.clone()).or_default();
                buffer.push_str(text_value.as_deref().unwrap_or_default());
                Write::Set(Value::String(buffer.clone()))
            }
            FragmentKind::CompleteString => {
                let buffered = self.partial_buffers.remove(&path);
                Write::Set(Value::String(complete_string(text_value, buffered, value)))
            }
            FragmentKind::CompleteNumber => {
                let outcome = match (text_value.as_deref(), value.as_ref()) {
                    (Some(text), _) => coerce_number_text(text),
                    (None, Some(value)) => coerce_number_value(value),
                    (None, None) => NumberOutcome::NonFinite,
                };
                if !outcome.is_finite() {
                    self.diagnostics.non_finite_numbers += 1;
                    tracing::warn!(path = %path, text = ?text_value, "non-finite number stored as null");
                }
                Write::Set(outcome.into_value())
            }
            FragmentKind::CompleteBoolean => {
                Write::Set(Value::Bool(coerce_bool(text_value.as_deref(), value.as_ref())))
            }
            FragmentKind::CompleteNull => Write::Set(Value::Null),
            marker => {
                debug_assert!(marker.is_marker());
                return;
            }
        };

        let result = validate_fragment_path(&path, self.options.max_depth)
            .map_err(|source| SkipReason::InvalidPath {
                path: path.clone(),
                source,
            })
            .and_then(|steps| write_at(&mut self.root, &steps, write, &self.options));
        if let Err(reason) = result {
            self.skip(kind, reason);
        }
    }

    fn skip(&mut self, kind: FragmentKind, reason: SkipReason) {
        tracing::debug!(?kind, %reason, "skipping fragment update");
        self.diagnostics.skipped_updates += 1;
        self.diagnostics.last_skip = Some(reason);
    }

    /// The value under construction. `None` until the first write.
    pub fn value(&self) -> Option<&Value> {
        self.root.as_ref()
    }

    pub fn into_value(self) -> Option<Value> {
        self.root
    }

    /// True once the document is complete or locked.
    pub fn is_complete(&self) -> bool {
        self.is_locked()
    }

    pub fn is_locked(&self) -> bool {
        matches!(self.state, RebuilderState::Locked(_))
    }

    pub fn state(&self) -> RebuilderState {
        self.state
    }

    /// Freeze the document without a `JsonComplete` update. Idempotent; an
    /// existing lock keeps its reason.
    pub fn lock_for_result(&mut self) {
        if self.state == RebuilderState::Building {
            self.state = RebuilderState::Locked(LockReason::External);
        }
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn options(&self) -> &StitchOptions {
        &self.options
    }
}

/// Final text of a `CompleteString`: the decoded literal, else the literal
/// verbatim, else the buffered partials, else the decoded payload.
fn complete_string(text: Option<String>, buffered: Option<String>, value: Option<Value>) -> String {
    if let Some(text) = text {
        return decode_string_literal(&text).unwrap_or(text);
    }
    if let Some(buffered) = buffered {
        return buffered;
    }
    match value {
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
        None => String::new(),
    }
}
