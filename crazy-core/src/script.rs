//! JSON action scripts used to seed a queue.
//!
//! A script is an array of steps; each step names one action and may carry
//! its own cooldown:
//!
//! ```json
//! [
//!   {"wait": 5.0},
//!   {"send_keys": "i"},
//!   {"move_to": {"x": 640, "y": 360}},
//!   {"click": "click_down"},
//!   {"move_to": {"x": 900, "y": 200}},
//!   {"click": "click_up", "cooldown": 0.8}
//! ]
//! ```
//!
//! Host callbacks have no script form; use [`Action::invoke`] from code.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::action::{Action, MouseClick};
use crate::config::QueueConfig;
use crate::errors::Result;
use crate::geometry::Vec3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptStep {
    Wait(f32),
    MoveTo(Vec3),
    Click(MouseClick),
    SendKeys(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptEntry {
    #[serde(flatten)]
    pub step: ScriptStep,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Script {
    pub entries: Vec<ScriptEntry>,
}

impl Script {
    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build queue actions, filling unspecified cooldowns from `config`.
    pub fn into_actions(self, config: &QueueConfig) -> Vec<Action> {
        self.entries
            .into_iter()
            .map(|entry| {
                let action = match entry.step {
                    ScriptStep::Wait(secs) => Action::wait(secs),
                    ScriptStep::MoveTo(target) => Action::move_to(target),
                    ScriptStep::Click(click) => config.click(click),
                    ScriptStep::SendKeys(text) => config.send_keys(text),
                };
                match entry.cooldown {
                    Some(secs) => action.with_cooldown(secs),
                    None => action,
                }
            })
            .collect()
    }
}
