//! Leaf that stamps outgoing messages with the client's timezone.

use serde_json::{json, Value};

use crate::error::HookError;
use crate::hooks::{Hook, Leaf};
use crate::stamp::supplement;

/// Required capability: where the client's timezone comes from.
///
/// The accessor has no usable default — a source that does not provide a
/// concrete implementation fails with
/// [`HookError::MissingCapability`] when read. That makes "this leaf must
/// be given a real source to be usable" an explicit, checkable contract
/// instead of silent wrong behavior.
pub trait TimezoneSource: Send {
    /// IANA timezone name for the current user, e.g. `Pacific/Auckland`.
    fn timezone(&self) -> Result<String, HookError> {
        Err(HookError::MissingCapability("timezone"))
    }
}

/// A timezone known up front.
pub struct FixedTimezone(String);

impl FixedTimezone {
    pub fn new(timezone: impl Into<String>) -> Self {
        Self(timezone.into())
    }
}

impl TimezoneSource for FixedTimezone {
    fn timezone(&self) -> Result<String, HookError> {
        Ok(self.0.clone())
    }
}

/// Leaf that merges a top-level `timezone` field into outgoing StaMP
/// queries and events.
///
/// Holds no client state, so it deliberately keeps answering from its
/// source even after deregistration.
pub struct TimezoneLeaf<S: TimezoneSource> {
    source: S,
}

impl<S: TimezoneSource> TimezoneLeaf<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: TimezoneSource> Leaf for TimezoneLeaf<S> {
    fn overrides(&self) -> &[Hook] {
        &[Hook::SupplementStampQuery, Hook::SupplementStampEvent]
    }

    fn supplement_stamp_query(
        &mut self,
        query: &Value,
        acc: Option<Value>,
    ) -> Result<Value, HookError> {
        let timezone = self.source.timezone()?;
        Ok(supplement(
            query,
            acc.as_ref(),
            [("timezone".to_owned(), json!(timezone))].into_iter().collect(),
        ))
    }

    fn supplement_stamp_event(
        &mut self,
        event: &Value,
        acc: Option<Value>,
    ) -> Result<Value, HookError> {
        let timezone = self.source.timezone()?;
        Ok(supplement(
            event,
            acc.as_ref(),
            [("timezone".to_owned(), json!(timezone))].into_iter().collect(),
        ))
    }
}
