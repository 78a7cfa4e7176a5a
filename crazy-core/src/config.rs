//! Queue and host-loop tuning, loadable from a JSON file.
//!
//! Every field is optional in the file; missing fields take the defaults
//! the action constructors use.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::action::{
    Action, MouseClick, DEFAULT_CLICK_COOLDOWN, DEFAULT_INVOKE_COOLDOWN, DEFAULT_KEYS_COOLDOWN,
};
use crate::errors::Result;
use crate::mapper::MoveSettings;

/// Default host tick rate for `crazy-play`.
pub const DEFAULT_FPS: u32 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    pub move_settings: MoveSettings,
    pub keys_cooldown: f32,
    pub click_cooldown: f32,
    pub invoke_cooldown: f32,
    pub fps: u32,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            move_settings: MoveSettings::default(),
            keys_cooldown: DEFAULT_KEYS_COOLDOWN,
            click_cooldown: DEFAULT_CLICK_COOLDOWN,
            invoke_cooldown: DEFAULT_INVOKE_COOLDOWN,
            fps: DEFAULT_FPS,
        }
    }
}

impl QueueConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Seconds per host tick.
    pub fn tick_interval(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }

    pub fn send_keys(&self, text: impl Into<String>) -> Action {
        Action::send_keys(text).with_cooldown(self.keys_cooldown)
    }

    pub fn click(&self, click: MouseClick) -> Action {
        Action::click(click).with_cooldown(self.click_cooldown)
    }

    pub fn invoke(&self, callback: impl FnMut() + 'static) -> Action {
        Action::invoke(callback).with_cooldown(self.invoke_cooldown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_action_defaults() {
        let c = QueueConfig::default();
        assert_eq!(c.keys_cooldown, 0.2);
        assert_eq!(c.click_cooldown, 0.5);
        assert_eq!(c.invoke_cooldown, 1.0);
        assert_eq!(c.move_settings.tolerance, 5.0);
        assert_eq!(c.move_settings.step_fraction, 0.2);
        assert_eq!(c.fps, 60);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let c: QueueConfig =
            serde_json::from_str(r#"{"click_cooldown": 0.1, "move_settings": {"tolerance": 2.0}}"#)
                .unwrap();
        assert_eq!(c.click_cooldown, 0.1);
        assert_eq!(c.keys_cooldown, 0.2);
        assert_eq!(c.move_settings.tolerance, 2.0);
        assert_eq!(c.move_settings.step_fraction, 0.2);
    }

    #[test]
    fn test_builders_apply_cooldowns() {
        let c = QueueConfig {
            click_cooldown: 0.3,
            ..QueueConfig::default()
        };
        assert_eq!(c.click(MouseClick::ClickUp).cooldown(), 0.3);
    }

    #[test]
    fn test_tick_interval_guards_zero_fps() {
        let c = QueueConfig {
            fps: 0,
            ..QueueConfig::default()
        };
        assert_eq!(c.tick_interval(), 1.0);
    }
}
