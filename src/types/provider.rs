//! Provider descriptors and status reporting

use serde::{Deserialize, Serialize};

use super::capabilities::Capabilities;

/// Snapshot of an adapter taken when the registry is built.
///
/// Immutable afterwards; live availability is asked of the adapter itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    pub name: String,
    pub capabilities: Capabilities,
    /// Credentials were present at construction.
    pub configured: bool,
}

/// Initialization status of one provider, for observability only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderStatus {
    pub name: String,
    pub initialized: bool,
}

/// A gateway result tagged with whether it was served from the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cached<T> {
    #[serde(flatten)]
    pub value: T,
    pub cached: bool,
}

impl<T> Cached<T> {
    /// Value produced by a provider call.
    pub fn fresh(value: T) -> Self {
        Self {
            value,
            cached: false,
        }
    }

    /// Value read back from the cache.
    pub fn hit(value: T) -> Self {
        Self {
            value,
            cached: true,
        }
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> std::ops::Deref for Cached<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}
