//! Process-wide toggle state and its per-frame snapshot.
//!
//! Event handlers mutate [`ModeState`] between frames; the frame loop takes
//! one [`FrameToggles`] snapshot at the top of each frame and passes it down,
//! so no pass can observe a toggle flipping mid-frame.

/// Mutable toggle state, owned by the event loop.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModeState {
    paused: bool,
    bloom: bool,
    flat_shading: bool,
    headlights: bool,
    debug_overlay: bool,
}

/// Immutable per-frame copy of the toggle state.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameToggles {
    /// Simulation time frozen.
    pub paused: bool,
    /// Bloom pass instead of the ambient fallback for the bloom bucket.
    pub bloom: bool,
    /// Cell shading instead of smooth phong in the light passes.
    pub flat_shading: bool,
    /// Headlight pair active.
    pub headlights: bool,
    /// Debug overlay visible.
    pub debug_overlay: bool,
}

impl ModeState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current toggles for one frame.
    pub fn snapshot(&self) -> FrameToggles {
        FrameToggles {
            paused: self.paused,
            bloom: self.bloom,
            flat_shading: self.flat_shading,
            headlights: self.headlights,
            debug_overlay: self.debug_overlay,
        }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn toggle_bloom(&mut self) {
        self.bloom = !self.bloom;
    }

    pub fn toggle_shading(&mut self) {
        self.flat_shading = !self.flat_shading;
    }

    /// Flip the headlight toggle, returning the new state so the caller can
    /// mirror it into the light rig.
    pub fn toggle_headlights(&mut self) -> bool {
        self.headlights = !self.headlights;
        self.headlights
    }

    pub fn toggle_debug_overlay(&mut self) {
        self.debug_overlay = !self.debug_overlay;
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn headlights(&self) -> bool {
        self.headlights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggles_start_off() {
        let snap = ModeState::new().snapshot();
        assert!(!snap.paused);
        assert!(!snap.bloom);
        assert!(!snap.flat_shading);
        assert!(!snap.headlights);
        assert!(!snap.debug_overlay);
    }

    #[test]
    fn test_snapshot_is_decoupled_from_later_mutation() {
        let mut modes = ModeState::new();
        let before = modes.snapshot();
        modes.toggle_bloom();
        modes.toggle_pause();
        assert!(!before.bloom);
        assert!(!before.paused);
        let after = modes.snapshot();
        assert!(after.bloom);
        assert!(after.paused);
    }

    #[test]
    fn test_headlight_toggle_reports_new_state() {
        let mut modes = ModeState::new();
        assert!(modes.toggle_headlights());
        assert!(!modes.toggle_headlights());
    }
}
