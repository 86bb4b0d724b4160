//! The bush: leaf registry and hook dispatcher.

use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::client::ClientHandle;
use crate::error::HookError;
use crate::hooks::{Hook, Leaf, LeafRef, Strategy};
use crate::stamp::{RenderLetterData, ServerHandshake};

struct RegisteredLeaf {
    leaf: LeafRef,
    /// Capability declaration captured when the leaf was registered.
    overrides: Vec<Hook>,
}

/// Registry and dispatcher that aggregates leafs behind the same hook
/// surface as a single client.
///
/// Leafs run in registration order. For each hook invocation the bush
/// builds a *branch* — the ordered subsequence of registered leafs that
/// declare an override for that hook — and executes it under the hook's
/// [`Strategy`]. With an empty branch the hook's neutral default applies:
/// broadcast hooks do nothing, fold hooks return their input unchanged.
///
/// Registering the same leaf instance twice is allowed and yields two
/// branch entries; [`Bush::deregister_leaf`] removes every entry with that
/// identity.
///
/// The branch is snapshotted before execution, so deregistering a leaf
/// never affects an invocation already in progress. Registry mutation
/// takes `&mut self`; a multi-threaded host wraps the bush in its own
/// lock.
pub struct Bush {
    client: ClientHandle,
    leafs: Vec<RegisteredLeaf>,
}

impl Default for Bush {
    fn default() -> Self {
        Self::new()
    }
}

impl Bush {
    /// Creates a bush with fresh client state.
    pub fn new() -> Self {
        Self::with_client(ClientHandle::new())
    }

    /// Creates a bush over existing client state, for hosts that also hand
    /// the same handle to collaborators outside the bush.
    pub fn with_client(client: ClientHandle) -> Self {
        Self {
            client,
            leafs: Vec::new(),
        }
    }

    /// The client state this bush passes to leafs on registration.
    pub fn client(&self) -> &ClientHandle {
        &self.client
    }

    /// Number of registered leafs, duplicates included.
    pub fn leaf_count(&self) -> usize {
        self.leafs.len()
    }

    /// Appends a leaf to the registry, so the latest registration runs
    /// last in every branch, and hands it the client handle.
    pub fn register_leaf(&mut self, leaf: LeafRef) {
        let overrides = leaf.lock().overrides().to_vec();
        tracing::debug!(overrides = overrides.len(), "registering leaf");

        leaf.lock().register(self.client.clone());
        self.leafs.push(RegisteredLeaf { leaf, overrides });
    }

    /// Removes every registered entry with the given leaf's identity and
    /// tells the leaf it is no longer registered. Removing a leaf that was
    /// never registered is a no-op apart from the `deregister` call.
    pub fn deregister_leaf(&mut self, leaf: &LeafRef) {
        self.leafs.retain(|entry| !Arc::ptr_eq(&entry.leaf, leaf));
        leaf.lock().deregister();
    }

    // region typed hook surface

    pub fn pre_connect(&self, is_reconnection: bool) -> Result<(), HookError> {
        self.run_broadcast(Hook::PreConnect, |leaf| leaf.pre_connect(is_reconnection))
    }

    pub fn post_connect(&self) -> Result<(), HookError> {
        self.run_broadcast(Hook::PostConnect, |leaf| leaf.post_connect())
    }

    pub fn pre_disconnect(&self, disconnect_code: u16) -> Result<(), HookError> {
        self.run_broadcast(Hook::PreDisconnect, |leaf| {
            leaf.pre_disconnect(disconnect_code)
        })
    }

    pub fn post_disconnect(&self, disconnect_code: u16) -> Result<(), HookError> {
        self.run_broadcast(Hook::PostDisconnect, |leaf| {
            leaf.post_disconnect(disconnect_code)
        })
    }

    pub fn errored(&self, socket_error: &Value) -> Result<(), HookError> {
        self.run_broadcast(Hook::Errored, |leaf| leaf.errored(socket_error))
    }

    pub fn post_handshake(&self) -> Result<(), HookError> {
        self.run_broadcast(Hook::PostHandshake, |leaf| leaf.post_handshake())
    }

    pub fn process_server_handshake(&self, handshake: &ServerHandshake) -> Result<(), HookError> {
        self.run_broadcast(Hook::ProcessServerHandshake, |leaf| {
            leaf.process_server_handshake(handshake)
        })
    }

    pub fn process_render_letter_request(
        &self,
        render: &RenderLetterData,
    ) -> Result<(), HookError> {
        self.run_broadcast(Hook::ProcessRenderLetterRequest, |leaf| {
            leaf.process_render_letter_request(render)
        })
    }

    pub fn supplement_client_handshake(&self, handshake: &Value) -> Result<Value, HookError> {
        self.run_fold(Hook::SupplementClientHandshake, handshake, |leaf, acc| {
            leaf.supplement_client_handshake(handshake, acc)
        })
    }

    pub fn supplement_stamp_query(&self, query: &Value) -> Result<Value, HookError> {
        self.run_fold(Hook::SupplementStampQuery, query, |leaf, acc| {
            leaf.supplement_stamp_query(query, acc)
        })
    }

    pub fn supplement_stamp_event(&self, event: &Value) -> Result<Value, HookError> {
        self.run_fold(Hook::SupplementStampEvent, event, |leaf, acc| {
            leaf.supplement_stamp_event(event, acc)
        })
    }

    // endregion

    /// Generic, wire-facing entry point: invokes the hook named `name`
    /// with an argument payload, as when routing a request field of an
    /// inbound socket message.
    ///
    /// Returns `Some(result)` for fold hooks and `None` for broadcast
    /// hooks, whose return value carries no meaning. Fails with
    /// [`HookError::UnknownHook`] for names outside the contract and
    /// [`HookError::InvalidPayload`] when the payload does not match the
    /// hook's argument shape.
    pub fn invoke_named(&self, name: &str, payload: Value) -> Result<Option<Value>, HookError> {
        let hook = Hook::from_name(name)?;
        match hook {
            Hook::PreConnect => {
                let args: PreConnectArgs = parse_args(hook, payload)?;
                self.pre_connect(args.is_reconnection)?;
                Ok(None)
            }
            Hook::PostConnect => {
                self.post_connect()?;
                Ok(None)
            }
            Hook::PreDisconnect => {
                let args: DisconnectArgs = parse_args(hook, payload)?;
                self.pre_disconnect(args.disconnect_code)?;
                Ok(None)
            }
            Hook::PostDisconnect => {
                let args: DisconnectArgs = parse_args(hook, payload)?;
                self.post_disconnect(args.disconnect_code)?;
                Ok(None)
            }
            Hook::Errored => {
                let args: ErroredArgs = parse_args(hook, payload)?;
                self.errored(&args.socket_error)?;
                Ok(None)
            }
            Hook::PostHandshake => {
                self.post_handshake()?;
                Ok(None)
            }
            Hook::ProcessServerHandshake => {
                let handshake: ServerHandshake = parse_args(hook, payload)?;
                self.process_server_handshake(&handshake)?;
                Ok(None)
            }
            Hook::ProcessRenderLetterRequest => {
                let render: RenderLetterData = parse_args(hook, payload)?;
                self.process_render_letter_request(&render)?;
                Ok(None)
            }
            Hook::SupplementClientHandshake => {
                Ok(Some(self.supplement_client_handshake(&payload)?))
            }
            Hook::SupplementStampQuery => Ok(Some(self.supplement_stamp_query(&payload)?)),
            Hook::SupplementStampEvent => Ok(Some(self.supplement_stamp_event(&payload)?)),
        }
    }

    /// Snapshot of the leafs overriding `hook`, in registration order.
    fn branch(&self, hook: Hook) -> Vec<LeafRef> {
        self.leafs
            .iter()
            .filter(|entry| entry.overrides.contains(&hook))
            .map(|entry| entry.leaf.clone())
            .collect()
    }

    fn run_broadcast<F>(&self, hook: Hook, mut call: F) -> Result<(), HookError>
    where
        F: FnMut(&mut dyn Leaf) -> Result<(), HookError>,
    {
        debug_assert_eq!(hook.strategy(), Strategy::Broadcast);
        let branch = self.branch(hook);
        tracing::debug!(hook = hook.name(), branch = branch.len(), "dispatching");

        for leaf in branch {
            call(&mut *leaf.lock())?;
        }
        Ok(())
    }

    fn run_fold<F>(&self, hook: Hook, input: &Value, mut call: F) -> Result<Value, HookError>
    where
        F: FnMut(&mut dyn Leaf, Option<Value>) -> Result<Value, HookError>,
    {
        debug_assert_eq!(hook.strategy(), Strategy::Fold);
        let branch = self.branch(hook);
        tracing::debug!(hook = hook.name(), branch = branch.len(), "dispatching");

        let mut acc: Option<Value> = None;
        for leaf in branch {
            acc = Some(call(&mut *leaf.lock(), acc.take())?);
        }
        // An empty branch falls back to the contract default: the input
        // passes through unchanged.
        Ok(acc.unwrap_or_else(|| input.clone()))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PreConnectArgs {
    #[serde(default)]
    is_reconnection: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DisconnectArgs {
    disconnect_code: u16,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErroredArgs {
    socket_error: Value,
}

fn parse_args<T: serde::de::DeserializeOwned>(hook: Hook, payload: Value) -> Result<T, HookError> {
    serde_json::from_value(payload).map_err(|source| HookError::InvalidPayload {
        hook: hook.name(),
        source,
    })
}
