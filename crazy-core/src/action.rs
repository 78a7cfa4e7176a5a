//! Timed input actions.
//!
//! An [`Action`] is an [`ActionKind`] plus a cooldown.  The first tick that
//! reaches a non-wait action performs its effect and arms the cooldown; later
//! ticks count the cooldown down and the action completes once it drops
//! strictly below zero.  `Wait` starts out counting down.  `MoveTo` has no
//! cooldown and completes the tick the cursor arrives.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Vec3;
use crate::mapper::ease_step;
use crate::queue::StepContext;

/// Default settle time after typing.
pub const DEFAULT_KEYS_COOLDOWN: f32 = 0.2;
/// Default settle time after a click edge.
pub const DEFAULT_CLICK_COOLDOWN: f32 = 0.5;
/// Default settle time after a host callback.
pub const DEFAULT_INVOKE_COOLDOWN: f32 = 1.0;

/// Left-button gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseClick {
    Click,
    ClickDown,
    ClickUp,
}

impl MouseClick {
    /// `(down, up)` edges to synthesize.
    pub fn edges(self) -> (bool, bool) {
        match self {
            MouseClick::Click => (true, true),
            MouseClick::ClickDown => (true, false),
            MouseClick::ClickUp => (false, true),
        }
    }
}

/// Something with a world position, read each tick a move is in flight.
pub trait WorldTarget {
    fn world_position(&self) -> Vec3;
}

impl WorldTarget for Vec3 {
    fn world_position(&self) -> Vec3 {
        *self
    }
}

impl<F: Fn() -> Vec3> WorldTarget for F {
    fn world_position(&self) -> Vec3 {
        self()
    }
}

pub enum ActionKind {
    /// Do nothing for the given number of seconds.
    Wait(f32),
    /// Glide the cursor onto a world-space target.
    MoveTo(Box<dyn WorldTarget>),
    Click(MouseClick),
    SendKeys(String),
    /// Run host code.
    Invoke(Box<dyn FnMut()>),
}

impl ActionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::Wait(_) => "wait",
            ActionKind::MoveTo(_) => "move_to",
            ActionKind::Click(_) => "click",
            ActionKind::SendKeys(_) => "send_keys",
            ActionKind::Invoke(_) => "invoke",
        }
    }
}

impl fmt::Debug for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Wait(secs) => f.debug_tuple("Wait").field(secs).finish(),
            ActionKind::MoveTo(_) => f.write_str("MoveTo(..)"),
            ActionKind::Click(c) => f.debug_tuple("Click").field(c).finish(),
            ActionKind::SendKeys(text) => f.debug_tuple("SendKeys").field(text).finish(),
            ActionKind::Invoke(_) => f.write_str("Invoke(..)"),
        }
    }
}

#[derive(Debug)]
pub struct Action {
    kind: ActionKind,
    cooldown: f32,
    remaining: f32,
    waiting: bool,
}

impl Action {
    fn new(kind: ActionKind, cooldown: f32) -> Self {
        Self {
            kind,
            cooldown,
            remaining: cooldown,
            waiting: false,
        }
    }

    pub fn wait(seconds: f32) -> Self {
        Self {
            kind: ActionKind::Wait(seconds),
            cooldown: seconds,
            remaining: seconds,
            waiting: true,
        }
    }

    pub fn move_to(target: impl WorldTarget + 'static) -> Self {
        Self::new(ActionKind::MoveTo(Box::new(target)), 0.0)
    }

    pub fn click(click: MouseClick) -> Self {
        Self::new(ActionKind::Click(click), DEFAULT_CLICK_COOLDOWN)
    }

    pub fn send_keys(text: impl Into<String>) -> Self {
        Self::new(ActionKind::SendKeys(text.into()), DEFAULT_KEYS_COOLDOWN)
    }

    pub fn invoke(callback: impl FnMut() + 'static) -> Self {
        Self::new(ActionKind::Invoke(Box::new(callback)), DEFAULT_INVOKE_COOLDOWN)
    }

    /// Override the settle time.  For `Wait` this is the wait itself;
    /// `MoveTo` ignores it.
    pub fn with_cooldown(mut self, seconds: f32) -> Self {
        if let ActionKind::Wait(secs) = &mut self.kind {
            *secs = seconds;
        }
        self.cooldown = seconds;
        self.remaining = seconds;
        self
    }

    pub fn kind(&self) -> &ActionKind {
        &self.kind
    }

    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    /// Seconds left on the countdown, meaningful while [`Action::is_waiting`].
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// True once the effect has run (or for a `Wait`) and the countdown is
    /// in progress.
    pub fn is_waiting(&self) -> bool {
        self.waiting
    }

    /// Service this action for one tick.  Returns `true` when it is done.
    pub(crate) fn tick(&mut self, ctx: &mut StepContext<'_>, delta: f32) -> bool {
        if self.waiting {
            self.remaining -= delta;
            return self.remaining < 0.0;
        }

        match &mut self.kind {
            ActionKind::MoveTo(target) => return move_toward(ctx, target.world_position()),
            ActionKind::Wait(_) => {}
            ActionKind::Click(click) => {
                let (down, up) = click.edges();
                if let Err(e) = ctx.driver.synthesize_click(down, up) {
                    log::warn!("click {click:?} failed: {e}");
                }
            }
            ActionKind::SendKeys(text) => {
                if let Err(e) = ctx.driver.send_keys(text) {
                    log::warn!("send_keys {text:?} failed: {e}");
                }
            }
            ActionKind::Invoke(callback) => callback(),
        }

        log::debug!("{} executed, settling {:.2}s", self.kind.name(), self.cooldown);
        self.waiting = true;
        self.remaining = self.cooldown;
        false
    }
}

/// One eased cursor step toward `world`.  Returns `true` on arrival.
fn move_toward(ctx: &mut StepContext<'_>, world: Vec3) -> bool {
    let cursor = match ctx.driver.cursor_position() {
        Ok(p) => p,
        Err(e) => {
            log::warn!("move_to: cursor query failed: {e}");
            return false;
        }
    };

    let current = ctx.viewport.os_to_local(cursor);
    let target = ctx.camera.world_to_screen(world).truncate();
    let step = ease_step(current, target, &ctx.move_settings);

    if !step.arrived {
        let next = ctx.viewport.local_to_os(step.position);
        if let Err(e) = ctx.driver.set_cursor_position(next) {
            log::warn!("move_to: cursor placement failed: {e}");
        }
    }
    step.arrived
}
