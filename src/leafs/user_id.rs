//! Leaf that manages the client's user identity.
//!
//! Captures the identity the server assigns during the handshake and
//! stamps it onto everything the client sends afterwards: the client
//! handshake gains a top-level `userId`, queries and events gain
//! `data.senderId`.

use serde_json::Value;

use crate::client::ClientHandle;
use crate::error::HookError;
use crate::hooks::{Hook, Leaf};
use crate::stamp::{supplement, supplement_data, JsonObject, ServerHandshake};

/// Required capability: where the user id lives.
///
/// Both accessors fail with [`HookError::MissingCapability`] unless a
/// concrete store implements them. The id is kept as a raw JSON value so a
/// malformed one can be carried through (and warned about) rather than
/// dropped.
pub trait UserIdStore: Send {
    /// The current user id, `Value::Null` when anonymous.
    fn user_id(&self) -> Result<Value, HookError> {
        Err(HookError::MissingCapability("userId"))
    }

    fn set_user_id(&mut self, user_id: Value) -> Result<(), HookError> {
        let _ = user_id;
        Err(HookError::MissingCapability("userId"))
    }
}

/// Client-state-backed store: the id captured here is visible to the host
/// and to every other leaf holding the same handle.
impl UserIdStore for ClientHandle {
    fn user_id(&self) -> Result<Value, HookError> {
        Ok(ClientHandle::user_id(self))
    }

    fn set_user_id(&mut self, user_id: Value) -> Result<(), HookError> {
        ClientHandle::set_user_id(self, user_id);
        Ok(())
    }
}

/// A store holding the id in memory, for clients without shared state.
#[derive(Default)]
pub struct MemoryUserIdStore(Value);

impl UserIdStore for MemoryUserIdStore {
    fn user_id(&self) -> Result<Value, HookError> {
        Ok(self.0.clone())
    }

    fn set_user_id(&mut self, user_id: Value) -> Result<(), HookError> {
        self.0 = user_id;
        Ok(())
    }
}

/// Leaf that keeps a [`UserIdStore`] in sync with the server-assigned
/// identity and supplements outgoing messages with it.
///
/// Tracks its registration: hooks invoked while the leaf is not registered
/// on a bush fail with [`HookError::Unregistered`] instead of serving a
/// possibly stale identity.
pub struct UserIdLeaf<S: UserIdStore> {
    store: S,
    registered: bool,
}

impl<S: UserIdStore> UserIdLeaf<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            registered: false,
        }
    }

    fn current_user_id(&self) -> Result<Value, HookError> {
        if !self.registered {
            return Err(HookError::Unregistered);
        }
        let user_id = self.store.user_id()?;
        warn_on_user_id_shape(&user_id);
        Ok(user_id)
    }

    fn sender_extra(&self) -> Result<JsonObject, HookError> {
        let user_id = self.current_user_id()?;
        Ok([("senderId".to_owned(), user_id)].into_iter().collect())
    }
}

/// A user id is expected to be a string, or null for anonymous clients.
/// Anything else still flows through (the server will coerce it), but is
/// worth a diagnostic.
fn warn_on_user_id_shape(user_id: &Value) {
    if !user_id.is_null() && !user_id.is_string() {
        tracing::warn!(
            %user_id,
            "userId is not a string; the server will implicitly cast it"
        );
    }
}

impl<S: UserIdStore> Leaf for UserIdLeaf<S> {
    fn overrides(&self) -> &[Hook] {
        &[
            Hook::ProcessServerHandshake,
            Hook::SupplementClientHandshake,
            Hook::SupplementStampQuery,
            Hook::SupplementStampEvent,
        ]
    }

    fn register(&mut self, _client: ClientHandle) {
        self.registered = true;
    }

    fn deregister(&mut self) {
        self.registered = false;
    }

    fn process_server_handshake(&mut self, handshake: &ServerHandshake) -> Result<(), HookError> {
        if !self.registered {
            return Err(HookError::Unregistered);
        }
        self.store.set_user_id(handshake.assigned_user_id())
    }

    fn supplement_client_handshake(
        &mut self,
        handshake: &Value,
        acc: Option<Value>,
    ) -> Result<Value, HookError> {
        let user_id = self.current_user_id()?;
        Ok(supplement(
            handshake,
            acc.as_ref(),
            [("userId".to_owned(), user_id)].into_iter().collect(),
        ))
    }

    fn supplement_stamp_query(
        &mut self,
        query: &Value,
        acc: Option<Value>,
    ) -> Result<Value, HookError> {
        Ok(supplement_data(query, acc.as_ref(), self.sender_extra()?))
    }

    fn supplement_stamp_event(
        &mut self,
        event: &Value,
        acc: Option<Value>,
    ) -> Result<Value, HookError> {
        Ok(supplement_data(event, acc.as_ref(), self.sender_extra()?))
    }
}
