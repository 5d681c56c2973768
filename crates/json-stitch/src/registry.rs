//! `DocumentRegistry` — many rebuilders behind string document ids.
//!
//! Write-intent access ([`DocumentRegistry::get`], [`DocumentRegistry::ensure`])
//! fails loudly on a completed document, while [`DocumentRegistry::apply`] and
//! every read-only accessor stay quiet. Producers may keep sending trailing
//! fragments after a document was finalized; those are dropped.
//!
//! Document ids conventionally look like `"{message_id}:{tool_call_id}"` so
//! that [`DocumentRegistry::finalize_message`] can sweep a whole message.

use indexmap::IndexMap;
use serde_json::Value;

use crate::error::StitchError;
use crate::fragment::FragmentUpdate;
use crate::options::StitchOptions;
use crate::rebuilder::FragmentRebuilder;

/// Build a document id from a message id and a tool call id.
pub fn document_id(message_id: &str, tool_call_id: &str) -> String {
    format!("{message_id}:{tool_call_id}")
}

/// Fallback document id for a tool call without a stable id, keyed by its
/// position within the message. Shares the message prefix, so prefix sweeps
/// still cover it.
pub fn indexed_document_id(message_id: &str, index: usize) -> String {
    format!("{message_id}:{index}")
}

#[derive(Debug, Default)]
struct DocumentEntry {
    /// `None` when the document was completed before any fragment arrived.
    rebuilder: Option<FragmentRebuilder>,
    completed: bool,
}

impl DocumentEntry {
    fn is_complete(&self) -> bool {
        self.completed
            || self
                .rebuilder
                .as_ref()
                .is_some_and(FragmentRebuilder::is_complete)
    }
}

#[derive(Debug, Default)]
pub struct DocumentRegistry {
    documents: IndexMap<String, DocumentEntry>,
    options: StitchOptions,
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every rebuilder this registry creates uses `options`.
    pub fn with_options(options: StitchOptions) -> Self {
        Self {
            documents: IndexMap::new(),
            options,
        }
    }

    /// Pure lookup: never creates, never fails.
    pub fn try_get(&self, id: &str) -> Option<&FragmentRebuilder> {
        self.documents.get(id)?.rebuilder.as_ref()
    }

    /// Get or create the rebuilder for `id`.
    ///
    /// # Errors
    ///
    /// [`StitchError::DocumentComplete`] if `id` is complete or locked.
    pub fn get(&mut self, id: &str) -> Result<&mut FragmentRebuilder, StitchError> {
        let options = &self.options;
        let entry = self.documents.entry(id.to_string()).or_default();
        if entry.is_complete() {
            entry.completed = true;
            return Err(StitchError::DocumentComplete(id.to_string()));
        }
        Ok(entry
            .rebuilder
            .get_or_insert_with(|| FragmentRebuilder::with_options(options.clone())))
    }

    /// Alias of [`DocumentRegistry::get`].
    pub fn ensure(&mut self, id: &str) -> Result<&mut FragmentRebuilder, StitchError> {
        self.get(id)
    }

    /// Apply `updates` to `id` and return its current value.
    ///
    /// Updates for a completed document are dropped and the stored value is
    /// returned unchanged.
    pub fn apply<I>(&mut self, id: &str, updates: I) -> Option<&Value>
    where
        I: IntoIterator<Item = FragmentUpdate>,
    {
        if self.is_complete(id) {
            tracing::debug!(document_id = id, "dropping fragments for completed document");
            return self.value(id);
        }

        let options = &self.options;
        let entry = self.documents.entry(id.to_string()).or_default();
        let rebuilder = entry
            .rebuilder
            .get_or_insert_with(|| FragmentRebuilder::with_options(options.clone()));
        rebuilder.apply(updates);
        if rebuilder.is_complete() {
            tracing::debug!(document_id = id, "document completed");
            entry.completed = true;
        }
        entry.rebuilder.as_ref().and_then(FragmentRebuilder::value)
    }

    /// Mark `id` complete and lock its rebuilder. Works before the first
    /// fragment arrives.
    pub fn complete(&mut self, id: &str) {
        let entry = self.documents.entry(id.to_string()).or_default();
        entry.completed = true;
        if let Some(rebuilder) = entry.rebuilder.as_mut() {
            rebuilder.lock_for_result();
        }
    }

    /// Forget `id` entirely, including its completed state. Returns whether
    /// anything was tracked.
    pub fn delete(&mut self, id: &str) -> bool {
        self.documents.shift_remove(id).is_some()
    }

    pub fn clear(&mut self) {
        self.documents.clear();
    }

    /// Read-only value access; works for completed documents.
    pub fn value(&self, id: &str) -> Option<&Value> {
        self.try_get(id)?.value()
    }

    /// Whether a rebuilder exists for `id`, complete or not.
    pub fn has(&self, id: &str) -> bool {
        self.try_get(id).is_some()
    }

    /// Whether `id` is tracked at all, including a completion recorded before
    /// any fragment arrived.
    pub fn contains(&self, id: &str) -> bool {
        self.documents.contains_key(id)
    }

    pub fn is_complete(&self, id: &str) -> bool {
        self.documents.get(id).is_some_and(DocumentEntry::is_complete)
    }

    /// Drop the documents of a finished message.
    ///
    /// With `child_ids`, deletes `"{parent_id}:{child}"` for each child.
    /// Otherwise deletes every tracked id starting with `"{parent_id}:"`.
    /// Returns the number of documents removed.
    pub fn finalize_message(&mut self, parent_id: &str, child_ids: Option<&[&str]>) -> usize {
        let before = self.documents.len();
        match child_ids {
            Some(children) => {
                for child in children {
                    self.documents.shift_remove(&document_id(parent_id, child));
                }
            }
            None => {
                let prefix = format!("{parent_id}:");
                self.documents.retain(|id, _| !id.starts_with(&prefix));
            }
        }
        let removed = before - self.documents.len();
        tracing::debug!(parent_id, removed, "finalized message documents");
        removed
    }

    /// Tracked document ids in first-seen order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn options(&self) -> &StitchOptions {
        &self.options
    }
}
