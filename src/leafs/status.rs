//! Leaf that reports client status changes to an observer.

use serde_json::Value;

use crate::error::HookError;
use crate::hooks::{Hook, Leaf};

/// A status change in the life of the client connection.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusEvent {
    Connecting { is_reconnection: bool },
    Connected,
    Disconnecting { disconnect_code: u16 },
    Disconnected { disconnect_code: u16 },
    Errored { socket_error: Value },
    HandshakeComplete,
}

impl StatusEvent {
    /// Stable identifier for this kind of event, for sinks that key
    /// messages by name.
    pub fn name(&self) -> &'static str {
        match self {
            StatusEvent::Connecting { .. } => "e:status.connecting",
            StatusEvent::Connected => "e:status.connect",
            StatusEvent::Disconnecting { .. } => "e:status.disconnecting",
            StatusEvent::Disconnected { .. } => "e:status.disconnect",
            StatusEvent::Errored { .. } => "e:status.error",
            StatusEvent::HandshakeComplete => "e:status.handshake",
        }
    }
}

/// Observer for status events. Implemented by whatever wants to present
/// connection status: a status bar, a console, a test probe.
pub trait StatusSink: Send {
    fn status_changed(&mut self, event: StatusEvent);
}

impl<F> StatusSink for F
where
    F: FnMut(StatusEvent) + Send,
{
    fn status_changed(&mut self, event: StatusEvent) {
        self(event)
    }
}

/// Leaf that forwards the client's lifecycle hooks to a [`StatusSink`] as
/// typed [`StatusEvent`]s.
pub struct StatusEventsLeaf {
    sink: Box<dyn StatusSink>,
}

impl StatusEventsLeaf {
    pub fn new(sink: impl StatusSink + 'static) -> Self {
        Self {
            sink: Box::new(sink),
        }
    }
}

impl Leaf for StatusEventsLeaf {
    fn overrides(&self) -> &[Hook] {
        &[
            Hook::PreConnect,
            Hook::PostConnect,
            Hook::PreDisconnect,
            Hook::PostDisconnect,
            Hook::Errored,
            Hook::PostHandshake,
        ]
    }

    fn pre_connect(&mut self, is_reconnection: bool) -> Result<(), HookError> {
        self.sink.status_changed(StatusEvent::Connecting { is_reconnection });
        Ok(())
    }

    fn post_connect(&mut self) -> Result<(), HookError> {
        self.sink.status_changed(StatusEvent::Connected);
        Ok(())
    }

    fn pre_disconnect(&mut self, disconnect_code: u16) -> Result<(), HookError> {
        self.sink
            .status_changed(StatusEvent::Disconnecting { disconnect_code });
        Ok(())
    }

    fn post_disconnect(&mut self, disconnect_code: u16) -> Result<(), HookError> {
        self.sink
            .status_changed(StatusEvent::Disconnected { disconnect_code });
        Ok(())
    }

    fn errored(&mut self, socket_error: &Value) -> Result<(), HookError> {
        self.sink.status_changed(StatusEvent::Errored {
            socket_error: socket_error.clone(),
        });
        Ok(())
    }

    fn post_handshake(&mut self) -> Result<(), HookError> {
        self.sink.status_changed(StatusEvent::HandshakeComplete);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::{shared, Bush};
    use parking_lot::Mutex;
    use serde_json::json;
    use std::sync::Arc;

    fn recording_bush() -> (Bush, Arc<Mutex<Vec<StatusEvent>>>) {
        let events: Arc<Mutex<Vec<StatusEvent>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let mut bush = Bush::new();
        bush.register_leaf(shared(StatusEventsLeaf::new(move |event| {
            sink.lock().push(event)
        })));
        (bush, events)
    }

    #[test]
    fn test_lifecycle_hooks_become_typed_events() {
        let (bush, events) = recording_bush();

        bush.pre_connect(false).unwrap();
        bush.post_connect().unwrap();
        bush.post_handshake().unwrap();
        bush.errored(&json!({ "code": "ECONNRESET" })).unwrap();
        bush.pre_disconnect(1000).unwrap();
        bush.post_disconnect(1000).unwrap();

        let events = events.lock();
        assert_eq!(
            events.as_slice(),
            &[
                StatusEvent::Connecting { is_reconnection: false },
                StatusEvent::Connected,
                StatusEvent::HandshakeComplete,
                StatusEvent::Errored { socket_error: json!({ "code": "ECONNRESET" }) },
                StatusEvent::Disconnecting { disconnect_code: 1000 },
                StatusEvent::Disconnected { disconnect_code: 1000 },
            ]
        );
    }

    #[test]
    fn test_event_names_are_stable() {
        assert_eq!(
            StatusEvent::Connecting { is_reconnection: true }.name(),
            "e:status.connecting"
        );
        assert_eq!(StatusEvent::HandshakeComplete.name(), "e:status.handshake");
    }
}
