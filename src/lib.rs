//! Composable BotSocket chat client building blocks.
//!
//! A BotSocket client exposes a fixed set of lifecycle hooks: connecting,
//! disconnecting, shaking hands, rendering inbound messages, and enriching
//! outbound messages. Rather than subclassing the client, behavior is added
//! by registering independent *leafs* on a [`Bush`], the hook-composition
//! engine. Each leaf overrides only the hooks it cares about; everything
//! else falls back to the contract's neutral default.
//!
//! On every hook invocation the bush builds a *branch* (the registered
//! leafs that override that hook, in registration order) and executes it
//! under the hook's strategy:
//!
//! - **broadcast** hooks run every override for its side effect;
//! - **fold** hooks thread an accumulator from leaf to leaf, and the last
//!   accumulator becomes the hook's result.
//!
//! # Example
//!
//! ```
//! use botsocket_client::hooks::{shared, Bush};
//! use botsocket_client::leafs::{FixedTimezone, TimezoneLeaf};
//! use serde_json::json;
//!
//! let mut bush = Bush::new();
//! bush.register_leaf(shared(TimezoneLeaf::new(FixedTimezone::new("Pacific/Auckland"))));
//!
//! let query = bush
//!     .supplement_stamp_query(&json!({ "query": "hello" }))
//!     .unwrap();
//! assert_eq!(query["timezone"], "Pacific/Auckland");
//! ```

pub mod client;
pub mod error;
pub mod hooks;
pub mod leafs;
pub mod stamp;

pub use client::ClientHandle;
pub use error::HookError;
pub use hooks::{shared, Bush, Hook, Leaf, LeafRef, Strategy};
