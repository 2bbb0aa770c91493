//! Hotkey mapping: maps physical keys to viewer actions.
//!
//! [`KeyMap`] owns the binding table and is serializable to RON so the
//! bindings can live in the user config file.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use winit::keyboard::KeyCode;

/// Serde helper for [`KeyCode`], which doesn't implement serde natively.
mod keycode_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use winit::keyboard::KeyCode;

    /// Serialize a [`KeyCode`] as its debug string (e.g., `"KeyP"`).
    pub fn serialize<S: Serializer>(code: &KeyCode, s: S) -> Result<S::Ok, S::Error> {
        format!("{code:?}").serialize(s)
    }

    /// Deserialize a [`KeyCode`] from its debug string.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<KeyCode, D::Error> {
        let name = String::deserialize(d)?;
        string_to_keycode(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown key: {name}")))
    }

    fn string_to_keycode(s: &str) -> Option<KeyCode> {
        // Match the Debug output of KeyCode variants.
        Some(match s {
            "KeyA" => KeyCode::KeyA,
            "KeyB" => KeyCode::KeyB,
            "KeyC" => KeyCode::KeyC,
            "KeyD" => KeyCode::KeyD,
            "KeyE" => KeyCode::KeyE,
            "KeyF" => KeyCode::KeyF,
            "KeyG" => KeyCode::KeyG,
            "KeyH" => KeyCode::KeyH,
            "KeyI" => KeyCode::KeyI,
            "KeyJ" => KeyCode::KeyJ,
            "KeyK" => KeyCode::KeyK,
            "KeyL" => KeyCode::KeyL,
            "KeyM" => KeyCode::KeyM,
            "KeyN" => KeyCode::KeyN,
            "KeyO" => KeyCode::KeyO,
            "KeyP" => KeyCode::KeyP,
            "KeyQ" => KeyCode::KeyQ,
            "KeyR" => KeyCode::KeyR,
            "KeyS" => KeyCode::KeyS,
            "KeyT" => KeyCode::KeyT,
            "KeyU" => KeyCode::KeyU,
            "KeyV" => KeyCode::KeyV,
            "KeyW" => KeyCode::KeyW,
            "KeyX" => KeyCode::KeyX,
            "KeyY" => KeyCode::KeyY,
            "KeyZ" => KeyCode::KeyZ,
            "Space" => KeyCode::Space,
            "Escape" => KeyCode::Escape,
            _ => return None,
        })
    }
}

/// Wrapper binding a single key, with serde support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBinding(#[serde(with = "keycode_serde")] pub KeyCode);

/// Viewer actions that can be bound to keys.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Freeze or resume simulation time.
    TogglePause,
    /// Switch the sun sphere between bloom and plain ambient rendering.
    ToggleBloom,
    /// Switch between smooth phong and banded cell shading.
    ToggleShading,
    /// Add or remove the car headlight pair.
    ToggleHeadlights,
    /// Chase camera looking ahead of the car.
    ChaseFront,
    /// Chase camera looking back at the car.
    ChaseBack,
    /// Raise the car speed one step.
    SpeedUp,
    /// Lower the car speed one step.
    SpeedDown,
    /// Show or hide the debug overlay.
    ToggleDebugOverlay,
}

/// Maps [`Action`]s to key bindings.
///
/// One key per action; lookups go the other way via
/// [`action_for`](Self::action_for). Serializable to RON for the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyMap {
    /// The binding table.
    pub bindings: HashMap<Action, KeyBinding>,
}

impl Default for KeyMap {
    fn default() -> Self {
        let mut bindings = HashMap::new();
        bindings.insert(Action::TogglePause, KeyBinding(KeyCode::KeyP));
        bindings.insert(Action::ToggleBloom, KeyBinding(KeyCode::KeyB));
        bindings.insert(Action::ToggleShading, KeyBinding(KeyCode::KeyS));
        bindings.insert(Action::ToggleHeadlights, KeyBinding(KeyCode::KeyL));
        bindings.insert(Action::ChaseFront, KeyBinding(KeyCode::KeyF));
        bindings.insert(Action::ChaseBack, KeyBinding(KeyCode::KeyX));
        bindings.insert(Action::SpeedUp, KeyBinding(KeyCode::KeyU));
        bindings.insert(Action::SpeedDown, KeyBinding(KeyCode::KeyD));
        bindings.insert(Action::ToggleDebugOverlay, KeyBinding(KeyCode::KeyZ));
        Self { bindings }
    }
}

impl KeyMap {
    /// The action bound to a key, if any.
    #[must_use]
    pub fn action_for(&self, key: KeyCode) -> Option<Action> {
        self.bindings
            .iter()
            .find(|(_, binding)| binding.0 == key)
            .map(|(action, _)| *action)
    }

    /// Rebind an action, replacing its existing key.
    pub fn set_binding(&mut self, action: Action, key: KeyCode) {
        self.bindings.insert(action, KeyBinding(key));
    }

    /// Serialize to RON string.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Deserialize from RON string.
    ///
    /// # Errors
    /// Returns an error if the RON string is malformed.
    pub fn from_ron(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings_cover_all_actions() {
        let map = KeyMap::default();
        assert_eq!(map.action_for(KeyCode::KeyP), Some(Action::TogglePause));
        assert_eq!(map.action_for(KeyCode::KeyB), Some(Action::ToggleBloom));
        assert_eq!(map.action_for(KeyCode::KeyS), Some(Action::ToggleShading));
        assert_eq!(
            map.action_for(KeyCode::KeyL),
            Some(Action::ToggleHeadlights)
        );
        assert_eq!(map.action_for(KeyCode::KeyF), Some(Action::ChaseFront));
        assert_eq!(map.action_for(KeyCode::KeyX), Some(Action::ChaseBack));
        assert_eq!(map.action_for(KeyCode::KeyU), Some(Action::SpeedUp));
        assert_eq!(map.action_for(KeyCode::KeyD), Some(Action::SpeedDown));
        assert_eq!(
            map.action_for(KeyCode::KeyZ),
            Some(Action::ToggleDebugOverlay)
        );
    }

    #[test]
    fn test_unbound_key_resolves_to_nothing() {
        let map = KeyMap::default();
        assert_eq!(map.action_for(KeyCode::KeyQ), None);
    }

    #[test]
    fn test_rebind_replaces_old_key() {
        let mut map = KeyMap::default();
        map.set_binding(Action::TogglePause, KeyCode::Space);
        assert_eq!(map.action_for(KeyCode::Space), Some(Action::TogglePause));
        assert_eq!(map.action_for(KeyCode::KeyP), None);
    }

    #[test]
    fn test_ron_round_trip() {
        let map = KeyMap::default();
        let text = map.to_ron().unwrap();
        let restored = KeyMap::from_ron(&text).unwrap();
        assert_eq!(restored.bindings, map.bindings);
    }
}
