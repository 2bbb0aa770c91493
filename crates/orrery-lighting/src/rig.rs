//! Role-keyed set of active lights.
//!
//! Lights are keyed by what they are, not by where they sit in a list, so
//! toggling the headlights can never remove the wrong lights. Iteration
//! order is the role order and therefore deterministic.

use std::collections::BTreeMap;

use crate::light::{Light, headlight_pair};

/// Identity of a light in the rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LightRole {
    /// The orbiting sun.
    Sun,
    /// Left headlight of the vehicle.
    HeadlightLeft,
    /// Right headlight of the vehicle.
    HeadlightRight,
}

/// The set of currently active lights.
#[derive(Debug, Default)]
pub struct LightRig {
    lights: BTreeMap<LightRole, Light>,
}

impl LightRig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a light under a role.
    pub fn insert(&mut self, role: LightRole, light: Light) {
        self.lights.insert(role, light);
    }

    /// Add or remove the headlight pair as one operation.
    ///
    /// Both roles always change together, so a toggle round-trip restores
    /// the rig exactly regardless of what else is active.
    pub fn toggle_headlights(&mut self, on: bool) {
        if on {
            let (left, right) = headlight_pair();
            self.lights.insert(LightRole::HeadlightLeft, left);
            self.lights.insert(LightRole::HeadlightRight, right);
        } else {
            self.lights.remove(&LightRole::HeadlightLeft);
            self.lights.remove(&LightRole::HeadlightRight);
        }
    }

    /// Active lights in role order.
    pub fn iter(&self) -> impl Iterator<Item = (LightRole, &Light)> {
        self.lights.iter().map(|(role, light)| (*role, light))
    }

    /// Active lights in role order, mutable.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (LightRole, &mut Light)> {
        self.lights.iter_mut().map(|(role, light)| (*role, light))
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    pub fn contains(&self, role: LightRole) -> bool {
        self.lights.contains_key(&role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::sun_light;

    fn rig_with_sun() -> LightRig {
        let mut rig = LightRig::new();
        rig.insert(LightRole::Sun, sun_light());
        rig
    }

    #[test]
    fn test_empty_rig_is_valid() {
        let rig = LightRig::new();
        assert!(rig.is_empty());
        assert_eq!(rig.iter().count(), 0);
    }

    #[test]
    fn test_headlight_toggle_round_trip_restores_rig() {
        let mut rig = rig_with_sun();
        let before: Vec<_> = rig
            .iter()
            .map(|(role, light)| (role, light.clone()))
            .collect();
        rig.toggle_headlights(true);
        assert_eq!(rig.len(), 3);
        rig.toggle_headlights(false);
        let after: Vec<_> = rig
            .iter()
            .map(|(role, light)| (role, light.clone()))
            .collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_headlights_change_as_a_pair() {
        let mut rig = rig_with_sun();
        rig.toggle_headlights(true);
        assert!(rig.contains(LightRole::HeadlightLeft));
        assert!(rig.contains(LightRole::HeadlightRight));
        rig.toggle_headlights(false);
        assert!(!rig.contains(LightRole::HeadlightLeft));
        assert!(!rig.contains(LightRole::HeadlightRight));
        assert!(rig.contains(LightRole::Sun));
    }

    #[test]
    fn test_iteration_order_is_role_order() {
        let mut rig = LightRig::new();
        // Insert out of order on purpose.
        rig.toggle_headlights(true);
        rig.insert(LightRole::Sun, sun_light());
        let roles: Vec<_> = rig.iter().map(|(role, _)| role).collect();
        assert_eq!(
            roles,
            vec![
                LightRole::Sun,
                LightRole::HeadlightLeft,
                LightRole::HeadlightRight
            ]
        );
    }

    #[test]
    fn test_toggle_off_without_headlights_is_harmless() {
        let mut rig = rig_with_sun();
        rig.toggle_headlights(false);
        assert_eq!(rig.len(), 1);
        assert!(rig.contains(LightRole::Sun));
    }
}
