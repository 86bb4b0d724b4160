//! Client-level shared state handed to leafs at registration.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

#[derive(Default)]
struct ClientState {
    user_id: Value,
}

/// Cheaply cloneable handle over the state a BotSocket client shares with
/// its leafs.
///
/// The bush passes a clone to every leaf on registration. Leafs that need
/// client state read and write it through these accessors rather than
/// through an implicit back-reference, so data flow between leafs stays
/// traceable: one leaf can capture the server-assigned user id here and a
/// later leaf can stamp it onto outgoing messages.
#[derive(Clone, Default)]
pub struct ClientHandle {
    state: Arc<Mutex<ClientState>>,
}

impl ClientHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id of the user this client currently represents.
    /// `Value::Null` when no id has been assigned.
    pub fn user_id(&self) -> Value {
        self.state.lock().user_id.clone()
    }

    /// Replaces the current user id. The value is stored as-is; shape
    /// checking is left to the leafs that consume it.
    pub fn set_user_id(&self, user_id: Value) {
        self.state.lock().user_id = user_id;
    }
}
