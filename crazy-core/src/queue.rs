//! FIFO of timed input actions, advanced once per host tick.
//!
//! Only the head is ever serviced.  A tick either leaves the head in place
//! (still executing or settling) or pops it; the next head is not touched
//! until the following tick, so no two actions ever fire in the same frame.

use std::collections::VecDeque;

use crate::action::Action;
use crate::mapper::{Camera, MoveSettings, Viewport};
use crate::platform::InputDriver;

/// Everything an action may touch while it runs.
pub struct StepContext<'a> {
    pub driver: &'a mut dyn InputDriver,
    pub camera: &'a dyn Camera,
    pub viewport: Viewport,
    pub move_settings: MoveSettings,
}

impl<'a> StepContext<'a> {
    pub fn new(
        driver: &'a mut dyn InputDriver,
        camera: &'a dyn Camera,
        viewport: Viewport,
    ) -> Self {
        Self {
            driver,
            camera,
            viewport,
            move_settings: MoveSettings::default(),
        }
    }

    pub fn with_move_settings(mut self, settings: MoveSettings) -> Self {
        self.move_settings = settings;
        self
    }
}

/// What a single [`ActionQueue::step`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Queue was empty.
    Idle,
    /// Head is executing or settling and stays at the front.
    Pending,
    /// Head finished and was removed.
    Completed,
}

#[derive(Debug, Default)]
pub struct ActionQueue {
    actions: VecDeque<Action>,
}

impl ActionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every queued action, including one that is mid-cooldown or
    /// mid-move.  The cursor stays wherever it was.
    pub fn clear(&mut self) {
        self.actions.clear();
    }

    /// Swap in a whole new sequence.
    pub fn replace(&mut self, actions: impl IntoIterator<Item = Action>) {
        self.actions = actions.into_iter().collect();
    }

    pub fn append(&mut self, action: Action) {
        self.actions.push_back(action);
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// The action currently being serviced.
    pub fn head(&self) -> Option<&Action> {
        self.actions.front()
    }

    /// Advance the head action by one tick of `delta` seconds.
    pub fn step(&mut self, ctx: &mut StepContext<'_>, delta: f32) -> StepOutcome {
        let Some(head) = self.actions.front_mut() else {
            return StepOutcome::Idle;
        };

        if !head.tick(ctx, delta) {
            return StepOutcome::Pending;
        }

        if let Some(done) = self.actions.pop_front() {
            log::debug!(
                "{} completed, {} action(s) left",
                done.kind().name(),
                self.actions.len()
            );
        }
        StepOutcome::Completed
    }
}

impl FromIterator<Action> for ActionQueue {
    fn from_iter<I: IntoIterator<Item = Action>>(iter: I) -> Self {
        Self {
            actions: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::action::MouseClick;
    use crate::mapper::ScreenCamera;
    use crate::platform::virtual_desktop::{InputEvent, VirtualDesktop};

    fn run(queue: &mut ActionQueue, desktop: &mut VirtualDesktop, delta: f32) -> StepOutcome {
        let camera = ScreenCamera;
        let mut ctx = StepContext::new(desktop, &camera, Viewport::fullscreen(1080));
        queue.step(&mut ctx, delta)
    }

    #[test]
    fn test_empty_queue_is_idle() {
        let mut q = ActionQueue::new();
        let mut d = VirtualDesktop::default();
        assert_eq!(run(&mut q, &mut d, 0.016), StepOutcome::Idle);
        assert!(d.events().is_empty());
    }

    #[test]
    fn test_wait_needs_strictly_negative_countdown() {
        let mut q: ActionQueue = [Action::wait(2.0)].into_iter().collect();
        let mut d = VirtualDesktop::default();
        for _ in 0..4 {
            assert_eq!(run(&mut q, &mut d, 0.5), StepOutcome::Pending);
        }
        assert_eq!(q.len(), 1);
        assert_eq!(run(&mut q, &mut d, 0.5), StepOutcome::Completed);
        assert!(q.is_empty());
    }

    #[test]
    fn test_click_fires_once_then_settles() {
        let mut q = ActionQueue::new();
        q.append(Action::click(MouseClick::Click).with_cooldown(0.25));
        let mut d = VirtualDesktop::default();

        assert_eq!(run(&mut q, &mut d, 0.1), StepOutcome::Pending);
        assert_eq!(d.events().len(), 2);
        assert!(q.head().unwrap().is_waiting());

        // 0.25 -> 0.15 -> 0.05 -> -0.05
        assert_eq!(run(&mut q, &mut d, 0.1), StepOutcome::Pending);
        assert_eq!(run(&mut q, &mut d, 0.1), StepOutcome::Pending);
        assert_eq!(run(&mut q, &mut d, 0.1), StepOutcome::Completed);
        assert_eq!(d.events().len(), 2);
    }

    #[test]
    fn test_next_action_waits_for_next_tick() {
        let mut q: ActionQueue = [
            Action::send_keys("a").with_cooldown(0.0),
            Action::send_keys("b").with_cooldown(0.0),
        ]
        .into_iter()
        .collect();
        let mut d = VirtualDesktop::default();

        assert_eq!(run(&mut q, &mut d, 0.1), StepOutcome::Pending);
        assert_eq!(run(&mut q, &mut d, 0.1), StepOutcome::Completed);
        assert_eq!(d.events(), &[InputEvent::Keys("a".into())]);
        assert_eq!(run(&mut q, &mut d, 0.1), StepOutcome::Pending);
        assert_eq!(
            d.events(),
            &[InputEvent::Keys("a".into()), InputEvent::Keys("b".into())]
        );
    }

    #[test]
    fn test_invoke_runs_callback_once() {
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let mut q = ActionQueue::new();
        q.append(Action::invoke(move || counter.set(counter.get() + 1)).with_cooldown(0.05));
        let mut d = VirtualDesktop::default();

        let mut ticks = 0;
        while run(&mut q, &mut d, 0.1) != StepOutcome::Completed {
            ticks += 1;
            assert!(ticks < 10);
        }
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_clear_then_step_is_noop() {
        let mut q: ActionQueue = [Action::wait(1.0), Action::send_keys("x")].into_iter().collect();
        let mut d = VirtualDesktop::default();
        run(&mut q, &mut d, 0.5);
        q.clear();
        assert_eq!(run(&mut q, &mut d, 0.5), StepOutcome::Idle);
        assert!(d.events().is_empty());
    }

    #[test]
    fn test_replace_discards_cooldown_state() {
        let mut q: ActionQueue = [Action::wait(10.0)].into_iter().collect();
        let mut d = VirtualDesktop::default();
        run(&mut q, &mut d, 1.0);
        q.replace([Action::send_keys("z")]);
        assert_eq!(q.len(), 1);
        assert!(!q.head().unwrap().is_waiting());
        run(&mut q, &mut d, 1.0);
        assert_eq!(d.events(), &[InputEvent::Keys("z".into())]);
    }

    #[test]
    fn test_never_pops_more_than_one_per_step() {
        let mut q: ActionQueue = (0..5).map(|_| Action::wait(0.0)).collect();
        let mut d = VirtualDesktop::default();
        for left in (0..5).rev() {
            assert_eq!(run(&mut q, &mut d, 1.0), StepOutcome::Completed);
            assert_eq!(q.len(), left);
        }
    }
}
