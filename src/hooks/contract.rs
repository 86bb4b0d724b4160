//! The hook contract: every overridable hook and its execution strategy.

use crate::error::HookError;

/// How a branch of overriding leafs is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Every override runs for its side effect; there is no result value.
    Broadcast,
    /// Each override receives the previous override's return value as a
    /// trailing accumulator; the last return value is the hook's result.
    /// With no overrides the input is returned unchanged.
    Fold,
}

/// The fixed set of hooks a BotSocket client exposes.
///
/// The contract is closed: leafs declare which of these they override, and
/// the bush dispatches over this table. There is no way to add a hook at
/// runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    /// About to (re)connect to the server.
    PreConnect,
    /// Connection established.
    PostConnect,
    /// About to deliberately disconnect.
    PreDisconnect,
    /// Connection closed.
    PostDisconnect,
    /// The socket errored.
    Errored,
    /// Handshake with the server completed.
    PostHandshake,
    /// The server's handshake payload arrived.
    ProcessServerHandshake,
    /// The server asked the client to render a letter of messages.
    ProcessRenderLetterRequest,
    /// Enrich the outgoing client handshake.
    SupplementClientHandshake,
    /// Enrich an outgoing StaMP query.
    SupplementStampQuery,
    /// Enrich an outgoing StaMP event.
    SupplementStampEvent,
}

impl Hook {
    /// Every hook in the contract, in lifecycle order.
    pub const ALL: [Hook; 11] = [
        Hook::PreConnect,
        Hook::PostConnect,
        Hook::PreDisconnect,
        Hook::PostDisconnect,
        Hook::Errored,
        Hook::PostHandshake,
        Hook::ProcessServerHandshake,
        Hook::ProcessRenderLetterRequest,
        Hook::SupplementClientHandshake,
        Hook::SupplementStampQuery,
        Hook::SupplementStampEvent,
    ];

    /// The hook's wire name, as used by [`Bush::invoke_named`].
    ///
    /// [`Bush::invoke_named`]: crate::hooks::Bush::invoke_named
    pub fn name(self) -> &'static str {
        match self {
            Hook::PreConnect => "preConnect",
            Hook::PostConnect => "postConnect",
            Hook::PreDisconnect => "preDisconnect",
            Hook::PostDisconnect => "postDisconnect",
            Hook::Errored => "errored",
            Hook::PostHandshake => "postHandshake",
            Hook::ProcessServerHandshake => "processServerHandshake",
            Hook::ProcessRenderLetterRequest => "processRenderLetterRequest",
            Hook::SupplementClientHandshake => "supplementClientHandshake",
            Hook::SupplementStampQuery => "supplementStaMPQuery",
            Hook::SupplementStampEvent => "supplementStaMPEvent",
        }
    }

    pub fn strategy(self) -> Strategy {
        match self {
            Hook::SupplementClientHandshake
            | Hook::SupplementStampQuery
            | Hook::SupplementStampEvent => Strategy::Fold,
            _ => Strategy::Broadcast,
        }
    }

    /// Resolves a wire name back to its hook.
    ///
    /// Names outside the contract fail with [`HookError::UnknownHook`],
    /// regardless of what is registered.
    pub fn from_name(name: &str) -> Result<Hook, HookError> {
        Hook::ALL
            .into_iter()
            .find(|hook| hook.name() == name)
            .ok_or_else(|| HookError::UnknownHook(name.to_owned()))
    }
}
