//! Frame statistics
//!
//! Counters accumulated by [`crate::Renderer::step`]. They make skipped work
//! visible without turning draw-time inconsistencies into errors.

/// Running totals since the renderer was created or last reset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Calls to `step`
    pub frames_stepped: u64,
    /// Targets that were due and drawn
    pub targets_drawn: u64,
    /// Stages that ran to completion
    pub stages_run: u64,
    /// Stages skipped because their scene, camera, viewport or program was gone
    pub stages_skipped: u64,
    /// Objects that produced a draw call
    pub objects_drawn: u64,
    /// Visible objects skipped because their property, mesh or texture was gone
    pub objects_skipped: u64,
}

impl FrameStats {
    /// Zero every counter
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
