//! Permission collaborator.
//!
//! Capture needs the record-audio capability before the engine may listen.
//! The two-step check/request flow is modelled as a trait: a synchronous
//! query plus a one-shot asynchronous grant request whose answer arrives
//! from the host's prompt.  The pipeline never re-prompts on its own — a
//! denial after the prompt is terminal for that attempt.

use async_trait::async_trait;

// ---------------------------------------------------------------------------
// Capability
// ---------------------------------------------------------------------------

/// Host capabilities the pipeline can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Microphone access, required for every capture attempt.
    RecordAudio,
}

// ---------------------------------------------------------------------------
// PermissionProvider trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface to the host's permission system.
#[async_trait]
pub trait PermissionProvider: Send + Sync {
    /// Whether `capability` is currently granted, without prompting.
    fn check_granted(&self, capability: Capability) -> bool;

    /// Prompt the user for `capability` and resolve with their answer.
    ///
    /// Called at most once per capture attempt, and only after
    /// [`check_granted`](Self::check_granted) returned `false`.
    async fn request_grant(&self, capability: Capability) -> bool;
}

const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn PermissionProvider>) {}
};

// ---------------------------------------------------------------------------
// StaticPermissions
// ---------------------------------------------------------------------------

/// A provider with a fixed answer — the CLI deployment, where the terminal
/// already has microphone-equivalent access, always grants.
#[derive(Debug, Clone, Copy)]
pub struct StaticPermissions {
    granted: bool,
}

impl StaticPermissions {
    /// Provider that grants every capability.
    pub fn granted() -> Self {
        Self { granted: true }
    }

    /// Provider that denies every capability, both on check and on request.
    pub fn denied() -> Self {
        Self { granted: false }
    }
}

#[async_trait]
impl PermissionProvider for StaticPermissions {
    fn check_granted(&self, _capability: Capability) -> bool {
        self.granted
    }

    async fn request_grant(&self, _capability: Capability) -> bool {
        self.granted
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn granted_provider_grants_check_and_request() {
        let p = StaticPermissions::granted();
        assert!(p.check_granted(Capability::RecordAudio));
        assert!(p.request_grant(Capability::RecordAudio).await);
    }

    #[tokio::test]
    async fn denied_provider_denies_check_and_request() {
        let p = StaticPermissions::denied();
        assert!(!p.check_granted(Capability::RecordAudio));
        assert!(!p.request_grant(Capability::RecordAudio).await);
    }

    #[test]
    fn box_dyn_permission_provider_compiles() {
        let _: Box<dyn PermissionProvider> = Box::new(StaticPermissions::granted());
    }
}
