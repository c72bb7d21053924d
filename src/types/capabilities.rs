//! Adapter capability sets

use serde::{Deserialize, Serialize};

/// Operations an adapter can perform.
///
/// The registry inspects this set to decide which adapters take part in
/// a fallback chain; it never dispatches on the adapter's concrete type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// Chat-style text completion.
    pub completion: bool,
    /// Text embeddings.
    pub embedding: bool,
}

/// A single operation, used when asking whether a set supports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Completion,
    Embedding,
}

impl Capabilities {
    /// Completion only (most chat backends).
    pub fn completion_only() -> Self {
        Self {
            completion: true,
            embedding: false,
        }
    }

    /// Completion and embeddings.
    pub fn full() -> Self {
        Self {
            completion: true,
            embedding: true,
        }
    }

    /// Whether this set includes `capability`.
    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Completion => self.completion,
            Capability::Embedding => self.embedding,
        }
    }
}
