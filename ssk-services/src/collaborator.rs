//! Base trait shared by every collaborator the environment references.
//!
//! The environment never drives a collaborator's lifecycle: collaborators
//! arrive fully constructed. The only surface it consumes is a name for
//! logging and a health check.

/// Trait that every collaborator handle implements.
pub trait Collaborator: Send + Sync {
    /// Human-readable name of this collaborator.
    fn name(&self) -> &str;

    /// Health check. Returns true if the collaborator is operational.
    fn is_healthy(&self) -> bool {
        true
    }
}

/// Health report for a single environment slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollaboratorHealth {
    /// Role the collaborator fills in the environment.
    pub role: &'static str,
    /// Name reported by the collaborator itself.
    pub name: String,
    /// Result of the collaborator's health check.
    pub healthy: bool,
}

impl CollaboratorHealth {
    pub(crate) fn check<C: Collaborator + ?Sized>(role: &'static str, collaborator: &C) -> Self {
        Self {
            role,
            name: collaborator.name().to_string(),
            healthy: collaborator.is_healthy(),
        }
    }
}

impl std::fmt::Display for CollaboratorHealth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = if self.healthy { "healthy" } else { "unhealthy" };
        write!(f, "{} ({}): {status}", self.role, self.name)
    }
}
