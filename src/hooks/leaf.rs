//! The leaf trait: one pluggable unit of client behavior.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use crate::client::ClientHandle;
use crate::error::HookError;
use crate::hooks::Hook;
use crate::stamp::{RenderLetterData, ServerHandshake};

/// A shared, lockable reference to a leaf.
///
/// Leaf identity is pointer identity: deregistration removes the entries
/// that are the same allocation, compared with `Arc::ptr_eq`.
pub type LeafRef = Arc<Mutex<dyn Leaf>>;

/// Wraps a leaf into the shared form the bush registers.
pub fn shared(leaf: impl Leaf + 'static) -> LeafRef {
    Arc::new(Mutex::new(leaf))
}

/// A pluggable extension unit for a BotSocket client.
///
/// Every hook method has a provided default equal to the contract's
/// neutral behavior: broadcast hooks do nothing, fold hooks return their
/// input unchanged. A concrete leaf overrides only the hooks it cares
/// about and must list exactly those in [`Leaf::overrides`] — the bush
/// reads that declaration once at registration and never calls a hook the
/// leaf did not declare.
///
/// Fold hooks receive the running accumulator as a trailing argument:
/// `None` for the first leaf in the branch, the previous leaf's return
/// value for every later one. How a leaf merges its own contribution with
/// the accumulator is the leaf's business; the stock leafs use the shallow
/// merges in [`crate::stamp`].
///
/// Errors are not caught by the bush: returning `Err` aborts the rest of
/// the branch and propagates to whoever invoked the hook.
#[allow(unused_variables)]
pub trait Leaf: Send {
    /// The hooks this leaf overrides. Read once at registration.
    fn overrides(&self) -> &[Hook];

    /// Called when the leaf is registered on a bush. `client` is a handle
    /// to client-level shared state; leafs that do not need it ignore it.
    fn register(&mut self, client: ClientHandle) {}

    /// Called when the leaf is deregistered. A leaf that held client state
    /// must afterwards either fail its hooks with
    /// [`HookError::Unregistered`] or deliberately no-op; it must never
    /// keep serving stale state by accident.
    fn deregister(&mut self) {}

    fn pre_connect(&mut self, is_reconnection: bool) -> Result<(), HookError> {
        Ok(())
    }

    fn post_connect(&mut self) -> Result<(), HookError> {
        Ok(())
    }

    fn pre_disconnect(&mut self, disconnect_code: u16) -> Result<(), HookError> {
        Ok(())
    }

    fn post_disconnect(&mut self, disconnect_code: u16) -> Result<(), HookError> {
        Ok(())
    }

    fn errored(&mut self, socket_error: &Value) -> Result<(), HookError> {
        Ok(())
    }

    fn post_handshake(&mut self) -> Result<(), HookError> {
        Ok(())
    }

    fn process_server_handshake(&mut self, handshake: &ServerHandshake) -> Result<(), HookError> {
        Ok(())
    }

    fn process_render_letter_request(
        &mut self,
        render: &RenderLetterData,
    ) -> Result<(), HookError> {
        Ok(())
    }

    fn supplement_client_handshake(
        &mut self,
        handshake: &Value,
        acc: Option<Value>,
    ) -> Result<Value, HookError> {
        Ok(acc.unwrap_or_else(|| handshake.clone()))
    }

    fn supplement_stamp_query(
        &mut self,
        query: &Value,
        acc: Option<Value>,
    ) -> Result<Value, HookError> {
        Ok(acc.unwrap_or_else(|| query.clone()))
    }

    fn supplement_stamp_event(
        &mut self,
        event: &Value,
        acc: Option<Value>,
    ) -> Result<Value, HookError> {
        Ok(acc.unwrap_or_else(|| event.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Bare;

    impl Leaf for Bare {
        fn overrides(&self) -> &[Hook] {
            &[]
        }
    }

    #[test]
    fn test_default_broadcast_hooks_are_noops() {
        let mut leaf = Bare;
        leaf.pre_connect(true).unwrap();
        leaf.post_connect().unwrap();
        leaf.pre_disconnect(1000).unwrap();
        leaf.post_disconnect(1000).unwrap();
        leaf.errored(&json!({ "reason": "refused" })).unwrap();
        leaf.post_handshake().unwrap();
        leaf.process_server_handshake(&ServerHandshake::default())
            .unwrap();
        leaf.process_render_letter_request(&RenderLetterData::default())
            .unwrap();
    }

    #[test]
    fn test_default_fold_hooks_are_identity() {
        let mut leaf = Bare;
        let input = json!({ "query": "hi" });

        assert_eq!(leaf.supplement_stamp_query(&input, None).unwrap(), input);

        // With an accumulator present the default passes it through.
        let acc = json!({ "query": "hi", "extra": true });
        assert_eq!(
            leaf.supplement_stamp_query(&input, Some(acc.clone())).unwrap(),
            acc
        );
    }
}
