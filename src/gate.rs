//! Change gate deciding when a poll iteration needs a render.
//!
//! The gate is idle unless the frame changed, input was processed, the
//! keymap overlay was toggled or a redraw was requested. The dirty state only
//! lasts for the iteration that triggered it.

use crate::screen::FrameBuffer;

/// What happened during the current iteration besides the frame fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GateInputs {
    /// At least one button was sent to the device.
    pub buttons_processed: bool,
    /// The keymap overlay was shown or hidden.
    pub overlay_toggled: bool,
    /// The caller asked for a full redraw.
    pub redraw_requested: bool,
}

/// Outcome of one gate evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Nothing to draw or record this iteration.
    Skip,
    /// Render now. `frame_changed` tells whether the pixels differ from the
    /// last rendered frame.
    Render { frame_changed: bool },
}

impl GateDecision {
    pub fn should_render(self) -> bool {
        matches!(self, GateDecision::Render { .. })
    }

    /// Whether this iteration belongs in a recording.
    ///
    /// Overlay toggles and redraws only refresh the live display.
    pub fn should_record(self, inputs: &GateInputs) -> bool {
        match self {
            GateDecision::Skip => false,
            GateDecision::Render { frame_changed } => frame_changed || inputs.buttons_processed,
        }
    }
}

/// Remembers the last rendered frame.
#[derive(Debug, Default)]
pub struct ChangeGate {
    last_rendered: Option<FrameBuffer>,
}

impl ChangeGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate the current frame, remembering it when the gate fires.
    pub fn evaluate(&mut self, frame: &FrameBuffer, inputs: GateInputs) -> GateDecision {
        let frame_changed = self.last_rendered.as_ref() != Some(frame);
        let dirty = frame_changed
            || inputs.buttons_processed
            || inputs.overlay_toggled
            || inputs.redraw_requested;

        if !dirty {
            return GateDecision::Skip;
        }
        if frame_changed {
            self.last_rendered = Some(frame.clone());
        }
        GateDecision::Render { frame_changed }
    }

    /// The frame most recently let through.
    pub fn last_rendered(&self) -> Option<&FrameBuffer> {
        self.last_rendered.as_ref()
    }
}
