//! Leaf that speaks StaMP messages carrying audio.

use anyhow::Result;
use serde_json::Value;

use crate::error::HookError;
use crate::hooks::{Hook, Leaf};
use crate::stamp::RenderLetterData;

/// Audio output collaborator. Playback is fire-and-forget: `speak` returns
/// once playback has been handed off, not once it has finished.
pub trait Mouth: Send {
    fn speak(&mut self, message: &Value) -> Result<()>;

    /// Stops whatever is currently being spoken.
    fn shut_up(&mut self) -> Result<()>;
}

/// Leaf that plays the messages of an inbound letter which carry a
/// `speech` field, skipping everything else.
pub struct TalkingLeaf {
    mouth: Box<dyn Mouth>,
    speech_enabled: bool,
}

impl TalkingLeaf {
    pub fn new(mouth: impl Mouth + 'static) -> Self {
        Self {
            mouth: Box::new(mouth),
            speech_enabled: true,
        }
    }

    pub fn speech_enabled(&self) -> bool {
        self.speech_enabled
    }

    /// Enables or disables speech. Disabling also stops anything
    /// currently being spoken.
    pub fn set_speech_enabled(&mut self, speech_enabled: bool) -> Result<()> {
        self.speech_enabled = speech_enabled;
        if !speech_enabled {
            self.mouth.shut_up()?;
        }
        Ok(())
    }
}

impl Leaf for TalkingLeaf {
    fn overrides(&self) -> &[Hook] {
        &[Hook::ProcessRenderLetterRequest]
    }

    fn process_render_letter_request(
        &mut self,
        render: &RenderLetterData,
    ) -> Result<(), HookError> {
        if !self.speech_enabled {
            return Ok(());
        }

        for message in &render.letter {
            if message.get("speech").is_some() {
                self.mouth.speak(message)?;
            }
        }
        Ok(())
    }
}
