// End-to-end composition: a bush carrying all the stock leafs driven
// through a full client lifecycle.

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{json, Value};

use botsocket_client::hooks::{shared, Bush};
use botsocket_client::leafs::{
    FixedTimezone, Mouth, StatusEvent, StatusEventsLeaf, TalkingLeaf, TimezoneLeaf, UserIdLeaf,
};
use botsocket_client::stamp::{RenderLetterData, ServerHandshake};
use botsocket_client::HookError;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

#[derive(Clone, Default)]
struct RecordingMouth(Arc<Mutex<Vec<Value>>>);

impl Mouth for RecordingMouth {
    fn speak(&mut self, message: &Value) -> anyhow::Result<()> {
        self.0.lock().push(message.clone());
        Ok(())
    }

    fn shut_up(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

fn full_bush() -> (Bush, Arc<Mutex<Vec<StatusEvent>>>, RecordingMouth) {
    let events: Arc<Mutex<Vec<StatusEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let mouth = RecordingMouth::default();

    let mut bush = Bush::new();
    let sink = events.clone();
    bush.register_leaf(shared(StatusEventsLeaf::new(move |event| {
        sink.lock().push(event)
    })));
    bush.register_leaf(shared(TalkingLeaf::new(mouth.clone())));
    bush.register_leaf(shared(UserIdLeaf::new(bush.client().clone())));
    bush.register_leaf(shared(TimezoneLeaf::new(FixedTimezone::new(
        "Pacific/Auckland",
    ))));

    (bush, events, mouth)
}

#[test]
fn full_lifecycle_flows_through_every_leaf() {
    init_tracing();
    let (bush, events, mouth) = full_bush();

    // Connect and shake hands; the server assigns an identity.
    bush.pre_connect(false).unwrap();
    bush.post_connect().unwrap();
    let handshake: ServerHandshake =
        serde_json::from_value(json!({ "userId": "u-42", "clientId": "c-7" })).unwrap();
    bush.process_server_handshake(&handshake).unwrap();
    bush.post_handshake().unwrap();

    assert_eq!(bush.client().user_id(), json!("u-42"));

    // An inbound letter gets spoken where it carries speech.
    let render: RenderLetterData = serde_json::from_value(json!({
        "letter": [
            { "type": "text", "text": "silent" },
            { "type": "text", "text": "hello", "speech": "hello" },
        ]
    }))
    .unwrap();
    bush.process_render_letter_request(&render).unwrap();
    assert_eq!(mouth.0.lock().len(), 1);

    // Outgoing messages pick up identity and timezone from the fold.
    let query = bush
        .supplement_stamp_query(&json!({ "query": "hi", "data": { "lang": "en" } }))
        .unwrap();
    assert_eq!(query["data"]["senderId"], "u-42");
    assert_eq!(query["data"]["lang"], "en");
    assert_eq!(query["timezone"], "Pacific/Auckland");

    let client_handshake = bush
        .supplement_client_handshake(&json!({ "sessionId": "s-1" }))
        .unwrap();
    assert_eq!(client_handshake["userId"], "u-42");

    bush.pre_disconnect(1000).unwrap();
    bush.post_disconnect(1000).unwrap();

    let names: Vec<&str> = events.lock().iter().map(StatusEvent::name).collect();
    assert_eq!(
        names,
        [
            "e:status.connecting",
            "e:status.connect",
            "e:status.handshake",
            "e:status.disconnecting",
            "e:status.disconnect",
        ]
    );
}

#[test]
fn deregistered_leaf_drops_out_of_the_fold() {
    init_tracing();
    let mut bush = Bush::new();
    let user_id = shared(UserIdLeaf::new(bush.client().clone()));
    bush.register_leaf(user_id.clone());
    bush.register_leaf(shared(TimezoneLeaf::new(FixedTimezone::new("Etc/UTC"))));
    bush.client().set_user_id(json!("u-1"));

    bush.deregister_leaf(&user_id);

    let query = bush.supplement_stamp_query(&json!({ "query": "hi" })).unwrap();
    assert_eq!(query["timezone"], "Etc/UTC");
    assert!(query.get("data").is_none());
}

#[test]
fn wire_dispatch_covers_the_whole_contract() {
    init_tracing();
    let (bush, _events, _mouth) = full_bush();

    bush.invoke_named("preConnect", json!({ "isReconnection": true }))
        .unwrap();
    bush.invoke_named("postConnect", json!({})).unwrap();
    bush.invoke_named("processServerHandshake", json!({ "clientId": "c-1" }))
        .unwrap();

    let query = bush
        .invoke_named("supplementStaMPQuery", json!({ "query": "hi" }))
        .unwrap()
        .expect("fold hooks return a value");
    assert_eq!(query["data"]["senderId"], "c-1");
    assert_eq!(query["timezone"], "Pacific/Auckland");

    let err = bush.invoke_named("speakFreely", json!({})).unwrap_err();
    assert!(matches!(err, HookError::UnknownHook(_)));
}
