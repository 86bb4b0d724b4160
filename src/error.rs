//! Error taxonomy for hook dispatch and leaf execution.

use thiserror::Error;

/// Errors produced by the hook engine or by leafs while running a hook.
///
/// The engine never catches a leaf's error: it aborts the remaining branch
/// and propagates to the caller of the hook. A misbehaving leaf therefore
/// breaks the chain for everyone behind it, which keeps ordering and
/// accumulator semantics simple to reason about.
#[derive(Debug, Error)]
pub enum HookError {
    /// The named hook is not part of the hook contract.
    #[error("unknown hook `{0}`")]
    UnknownHook(String),

    /// A wire payload did not match the hook's argument shape.
    #[error("invalid payload for hook `{hook}`")]
    InvalidPayload {
        hook: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A required capability accessor was read on a leaf that never
    /// received a concrete implementation. This is a composition-time
    /// configuration error, not a runtime transient.
    #[error("required `{0}` capability has no concrete implementation")]
    MissingCapability(&'static str),

    /// A hook ran on a leaf that is not currently registered on a bush.
    #[error("leaf used while unregistered")]
    Unregistered,

    /// A leaf-internal failure (audio playback, storage access, ...).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
