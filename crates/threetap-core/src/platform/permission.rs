use async_trait::async_trait;

/// Hardware that requires an access grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// Camera.
    Video,
    /// Microphone.
    Audio,
}

/// Current grant state for a [`MediaKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationStatus {
    /// The user has not been asked yet.
    NotDetermined,
    /// Blocked by policy; the user cannot grant it.
    Restricted,
    /// The user refused.
    Denied,
    /// The user granted access.
    Authorized,
}

/// OS permission prompts.
#[async_trait]
pub trait PermissionBackend: Send + Sync {
    /// Read the grant state without prompting.
    fn authorization_status(&self, kind: MediaKind) -> AuthorizationStatus;

    /// Prompt if needed and resolve with the user's answer.
    async fn request_access(&self, kind: MediaKind) -> bool;
}
