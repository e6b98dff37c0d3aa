//! Controlled-client access seam.

use async_trait::async_trait;

/// Access to the client contexts the worker controls.
///
/// Both operations are best-effort: the hosting environment offers no
/// useful failure signal for either, so implementations absorb errors
/// rather than propagate them.
#[async_trait]
pub trait ClientHub: Send + Sync {
    /// Take control of all in-scope clients immediately.
    async fn claim(&self);

    /// Deliver a message to every controlled client.
    async fn broadcast(&self, message: &str);
}
