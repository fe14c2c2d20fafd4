//! Do-nothing collaborator that satisfies every capability.
//!
//! Useful for reduced application modes that never exercise a role, and
//! for tests that need a fully populated environment.

use std::sync::Arc;

use crate::collaborator::Collaborator;

/// A named collaborator with no behaviour. Implements every capability trait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoopCollaborator {
    name: String,
}

impl NoopCollaborator {
    /// Create a noop collaborator reporting `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Shorthand for `Arc::new(NoopCollaborator::new(name))`.
    pub fn shared(name: impl Into<String>) -> Arc<Self> {
        Arc::new(Self::new(name))
    }
}

impl Collaborator for NoopCollaborator {
    fn name(&self) -> &str {
        &self.name
    }
}
