//! Stock leafs
//!
//! Ready-made extension units for the common client behaviors: reporting
//! connection status, speaking inbound messages, and stamping outgoing
//! messages with user identity and timezone. Each one is independent;
//! register whichever combination a client needs.

mod status;
mod talking;
mod timezone;
mod user_id;

pub use status::{StatusEvent, StatusEventsLeaf, StatusSink};
pub use talking::{Mouth, TalkingLeaf};
pub use timezone::{FixedTimezone, TimezoneLeaf, TimezoneSource};
pub use user_id::{MemoryUserIdStore, UserIdLeaf, UserIdStore};
