//! `crazy_core` -- Tick-driven input automation for game windows.
//!
//! A host (game loop, CLI player, or a C# engine through `crazy-ffi`) owns an
//! [`queue::ActionQueue`] and calls [`queue::ActionQueue::step`] once per
//! frame.  Each step services the head action only: waits count down,
//! clicks and key presses fire once and then settle for their cooldown, and
//! cursor moves glide a fraction of the remaining distance per frame.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`errors`] | `CrazyInputError` enum via `thiserror` |
//! | [`geometry`] | Plain value types: vectors, OS points, rects |
//! | [`mapper`] | World / screen / OS cursor conversions, cameras, move easing |
//! | [`platform`] | `InputDriver` + `WindowSystem` traits, Win32 and virtual backends |
//! | [`action`] | The `Action` sum type and its per-tick executor |
//! | [`queue`] | `ActionQueue` FIFO stepped once per tick |
//! | [`config`] | `QueueConfig` defaults, loadable from JSON |
//! | [`script`] | JSON action scripts used to seed a queue |
//! | [`files`] | Copy / delete / read helpers for bundled assets |
//! | [`process`] | Blocking external process runner |
//! | [`system_info`] | Cached machine snapshot via `sysinfo` |

pub mod action;
pub mod config;
pub mod errors;
pub mod files;
pub mod geometry;
pub mod mapper;
pub mod platform;
pub mod process;
pub mod queue;
pub mod script;
pub mod system_info;

pub use action::{Action, ActionKind, MouseClick, WorldTarget};
pub use config::QueueConfig;
pub use errors::{CrazyInputError, Result};
pub use queue::{ActionQueue, StepContext, StepOutcome};
