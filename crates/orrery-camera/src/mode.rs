//! Camera mode selection.

/// Which camera feeds the view matrix this frame.
///
/// Front and back chase views are mutually exclusive by construction; there
/// is no flag combination that activates both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraMode {
    /// Free orbit camera.
    #[default]
    Orbit,
    /// Fixed view ahead of the vehicle, looking back along the track.
    ChaseFront,
    /// Fixed view behind the vehicle.
    ChaseBack,
}

impl CameraMode {
    /// Hotkey behavior for the front view: activate it, or drop back to
    /// orbit when it is already active.
    pub fn toggle_front(&mut self) {
        *self = match *self {
            CameraMode::ChaseFront => CameraMode::Orbit,
            _ => CameraMode::ChaseFront,
        };
    }

    /// Hotkey behavior for the back view.
    pub fn toggle_back(&mut self) {
        *self = match *self {
            CameraMode::ChaseBack => CameraMode::Orbit,
            _ => CameraMode::ChaseBack,
        };
    }

    /// Whether a chase view is active.
    pub fn is_chase(self) -> bool {
        matches!(self, CameraMode::ChaseFront | CameraMode::ChaseBack)
    }
}
