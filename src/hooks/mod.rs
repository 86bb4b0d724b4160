//! Hook-composition engine
//!
//! The client's extension surface is a fixed contract of named hooks
//! ([`Hook`]). A [`Leaf`] overrides a declared subset of them; a [`Bush`]
//! owns an ordered registry of leafs and, per invocation, executes the
//! *branch* of leafs overriding that hook.
//!
//! # Strategies
//!
//! | Strategy | Hooks | Semantics |
//! |----------|-------|-----------|
//! | broadcast | lifecycle + inbound processing | every override runs for its side effect |
//! | fold | `supplement*` | accumulator threaded through the branch; last value wins |
//!
//! Dispatch is fully synchronous: one invocation runs its whole branch to
//! completion before returning, and no hook suspends or blocks mid-branch.
//! Any I/O a leaf needs must be fire-and-forget from the engine's point of
//! view.

mod bush;
mod contract;
mod leaf;

pub use bush::Bush;
pub use contract::{Hook, Strategy};
pub use leaf::{shared, Leaf, LeafRef};
