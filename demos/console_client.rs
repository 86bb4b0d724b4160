//! Wires a bush with the stock leafs and drives it through a scripted
//! lifecycle, printing what each collaborator sees.
//!
//! Run with: cargo run --example console_client

use anyhow::Result;
use serde_json::{json, Value};

use botsocket_client::hooks::{shared, Bush};
use botsocket_client::leafs::{
    FixedTimezone, Mouth, StatusEvent, StatusEventsLeaf, TalkingLeaf, TimezoneLeaf, UserIdLeaf,
};
use botsocket_client::stamp::{RenderLetterData, ServerHandshake};

struct ConsoleMouth;

impl Mouth for ConsoleMouth {
    fn speak(&mut self, message: &Value) -> Result<()> {
        println!("[mouth] speaking: {}", message["speech"]);
        Ok(())
    }

    fn shut_up(&mut self) -> Result<()> {
        println!("[mouth] stopped");
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut bush = Bush::new();
    bush.register_leaf(shared(StatusEventsLeaf::new(|event: StatusEvent| {
        println!("[status] {}", event.name())
    })));
    bush.register_leaf(shared(TalkingLeaf::new(ConsoleMouth)));
    bush.register_leaf(shared(UserIdLeaf::new(bush.client().clone())));
    bush.register_leaf(shared(TimezoneLeaf::new(FixedTimezone::new(
        "Pacific/Auckland",
    ))));

    // Connect and let the server assign us an identity.
    bush.pre_connect(false)?;
    bush.post_connect()?;
    let handshake: ServerHandshake =
        serde_json::from_value(json!({ "clientId": "client-1234" }))?;
    bush.process_server_handshake(&handshake)?;
    bush.post_handshake()?;

    // The server sends a letter to render; messages with speech are spoken.
    let render: RenderLetterData = serde_json::from_value(json!({
        "letter": [
            { "type": "text", "text": "Hi there!", "speech": "Hi there!" },
            { "type": "card", "title": "Menu" },
        ]
    }))?;
    bush.process_render_letter_request(&render)?;

    // An outgoing query, enriched by the fold hooks.
    let query = bush.supplement_stamp_query(&json!({
        "query": "what's on today?",
        "data": {}
    }))?;
    println!("[wire] sending query: {query}");

    bush.pre_disconnect(1000)?;
    bush.post_disconnect(1000)?;

    Ok(())
}
