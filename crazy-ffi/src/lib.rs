//! C ABI DLL for crazy-input -- lets a game host own an action queue.
//!
//! The host creates a queue with `crazy_queue_new()`, fills it with the
//! `crazy_queue_push_*` functions (or swaps in a JSON script with
//! `crazy_queue_replace()`) and calls `crazy_queue_step()` once per
//! frame with its frame delta.  Move targets are read through a callback at
//! execution time and are expressed in game-local screen pixels (bottom-left
//! origin), so the host projects world positions with its own camera.
//!
//! All exported functions follow the convention:
//! - Return `i32` status code: `CRAZY_OK=0`, `CRAZY_ERROR=-1`
//! - String outputs allocated by Rust, freed via `crazy_free_string()`
//! - Last error retrievable via `crazy_last_error()`
//!
//! A queue handle must only be used from one thread at a time.

use std::cell::RefCell;
use std::ffi::{c_char, c_void, CStr, CString};
use std::ptr;

use crazy_core::geometry::Vec3;
use crazy_core::mapper::{ScreenCamera, Viewport};
use crazy_core::platform::{create_platform, Platform};
use crazy_core::script::Script;
use crazy_core::{Action, ActionQueue, MouseClick, QueueConfig, StepContext, StepOutcome};

pub const CRAZY_OK: i32 = 0;
pub const CRAZY_ERROR: i32 = -1;

/// `crazy_queue_step` results.
pub const CRAZY_STEP_IDLE: i32 = 0;
pub const CRAZY_STEP_PENDING: i32 = 1;
pub const CRAZY_STEP_COMPLETED: i32 = 2;

/// Screen height assumed when the platform cannot report one.
const FALLBACK_SCREEN_HEIGHT: i32 = 1080;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Game-local screen position returned by a move-target callback.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct CrazyVec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Reads the current target position; called every tick a move is active.
pub type CrazyTargetFn = extern "C" fn(user_data: *mut c_void) -> CrazyVec3;

/// Host callback run by an invoke action.
pub type CrazyInvokeFn = extern "C" fn(user_data: *mut c_void);

/// Opaque queue handle.
pub struct CrazyQueue {
    queue: ActionQueue,
    platform: Box<dyn Platform>,
    viewport: Viewport,
    config: QueueConfig,
}

/// # Safety
///
/// `handle` must be null or a live pointer from `crazy_queue_new()`.
unsafe fn queue_mut<'a>(handle: *mut CrazyQueue) -> Option<&'a mut CrazyQueue> {
    if handle.is_null() {
        set_last_error("queue handle is null");
        return None;
    }
    Some(unsafe { &mut *handle })
}

/// Negative cooldowns select the configured default.
fn cooldown_or(action: Action, cooldown: f32) -> Action {
    if cooldown >= 0.0 {
        action.with_cooldown(cooldown)
    } else {
        action
    }
}

/// # Safety
///
/// `out_json` must be a valid, non-null pointer to a `*mut c_char`.
unsafe fn write_json<T: serde::Serialize>(value: &T, out_json: *mut *mut c_char) -> i32 {
    match serde_json::to_string(value) {
        Ok(json) => match CString::new(json) {
            Ok(cstr) => {
                unsafe { *out_json = cstr.into_raw() };
                CRAZY_OK
            }
            Err(e) => {
                set_last_error(&format!("CString conversion failed: {e}"));
                CRAZY_ERROR
            }
        },
        Err(e) => {
            set_last_error(&format!("JSON serialization failed: {e}"));
            CRAZY_ERROR
        }
    }
}

/// Retrieve the last error message (thread-local).
///
/// Returns a pointer valid until the next crazy_* call on this thread.
/// Returns null if no error has occurred.
#[no_mangle]
pub extern "C" fn crazy_last_error() -> *const c_char {
    LAST_ERROR.with(|e| {
        e.borrow()
            .as_ref()
            .map(|s| s.as_ptr())
            .unwrap_or(ptr::null())
    })
}

/// Free a string previously allocated by a crazy_* function.
///
/// # Safety
///
/// `ptr` must be a pointer returned by a crazy_* function or null.
#[no_mangle]
pub unsafe extern "C" fn crazy_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(unsafe { CString::from_raw(ptr) });
    }
}

// ---------------------------------------------------------------------------
// Queue lifecycle
// ---------------------------------------------------------------------------

/// Create an empty queue driving the real desktop, or an in-memory one when
/// `virtual_desktop` is true.  The viewport starts as the full screen.
#[no_mangle]
pub extern "C" fn crazy_queue_new(virtual_desktop: bool) -> *mut CrazyQueue {
    let platform = create_platform(virtual_desktop);
    let screen_height = match platform.screen_size() {
        Ok((_, h)) => h,
        Err(e) => {
            log::warn!("screen size unavailable, assuming {FALLBACK_SCREEN_HEIGHT}px: {e}");
            FALLBACK_SCREEN_HEIGHT
        }
    };
    Box::into_raw(Box::new(CrazyQueue {
        queue: ActionQueue::new(),
        platform,
        viewport: Viewport::fullscreen(screen_height),
        config: QueueConfig::default(),
    }))
}

/// Destroy a queue.
///
/// # Safety
///
/// `handle` must come from `crazy_queue_new()` and not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn crazy_queue_free(handle: *mut CrazyQueue) {
    if !handle.is_null() {
        drop(unsafe { Box::from_raw(handle) });
    }
}

/// Number of queued actions, or `CRAZY_ERROR` for a null handle.
///
/// # Safety
///
/// `handle` must be null or a live pointer from `crazy_queue_new()`.
#[no_mangle]
pub unsafe extern "C" fn crazy_queue_len(handle: *mut CrazyQueue) -> i32 {
    match unsafe { queue_mut(handle) } {
        Some(q) => q.queue.len().min(i32::MAX as usize) as i32,
        None => CRAZY_ERROR,
    }
}

/// Drop every queued action, including the one in progress.
///
/// # Safety
///
/// `handle` must be null or a live pointer from `crazy_queue_new()`.
#[no_mangle]
pub unsafe extern "C" fn crazy_queue_clear(handle: *mut CrazyQueue) -> i32 {
    let Some(q) = (unsafe { queue_mut(handle) }) else {
        return CRAZY_ERROR;
    };
    q.queue.clear();
    CRAZY_OK
}

/// Replace the whole queue with the actions of a JSON script (the same
/// format `crazy-play` reads).  The queue is left untouched if the script
/// does not parse.
///
/// # Safety
///
/// `handle` must be null or a live pointer from `crazy_queue_new()`.
/// `script_json` must be a valid null-terminated UTF-8 C string.
#[no_mangle]
pub unsafe extern "C" fn crazy_queue_replace(
    handle: *mut CrazyQueue,
    script_json: *const c_char,
) -> i32 {
    if script_json.is_null() {
        set_last_error("script_json is null");
        return CRAZY_ERROR;
    }
    let json = match unsafe { CStr::from_ptr(script_json) }.to_str() {
        Ok(s) => s,
        Err(e) => {
            set_last_error(&format!("Invalid UTF-8: {e}"));
            return CRAZY_ERROR;
        }
    };
    let Some(q) = (unsafe { queue_mut(handle) }) else {
        return CRAZY_ERROR;
    };
    let script = match Script::parse(json) {
        Ok(script) => script,
        Err(e) => {
            set_last_error(&e.to_string());
            return CRAZY_ERROR;
        }
    };
    q.queue.replace(script.into_actions(&q.config));
    CRAZY_OK
}

/// Set where the game's viewport sits: bottom-left corner in screen space
/// (bottom-left origin) and the full screen height.
///
/// # Safety
///
/// `handle` must be null or a live pointer from `crazy_queue_new()`.
#[no_mangle]
pub unsafe extern "C" fn crazy_queue_set_viewport(
    handle: *mut CrazyQueue,
    origin_x: f32,
    origin_y: f32,
    screen_height: i32,
) -> i32 {
    let Some(q) = (unsafe { queue_mut(handle) }) else {
        return CRAZY_ERROR;
    };
    q.viewport = Viewport {
        origin: crazy_core::geometry::Vec2::new(origin_x, origin_y),
        screen_height,
    };
    CRAZY_OK
}

/// Fit the viewport to the first window owned by `pid`.
///
/// # Safety
///
/// `handle` must be null or a live pointer from `crazy_queue_new()`.
#[no_mangle]
pub unsafe extern "C" fn crazy_queue_attach_process(handle: *mut CrazyQueue, pid: u32) -> i32 {
    let Some(q) = (unsafe { queue_mut(handle) }) else {
        return CRAZY_ERROR;
    };
    let Some(window) = q.platform.find_window_for_process(pid) else {
        set_last_error(&format!("no window for process {pid}"));
        return CRAZY_ERROR;
    };
    let fitted = q
        .platform
        .window_rect(window.hwnd)
        .and_then(|rect| Ok((rect, q.platform.screen_size()?.1)));
    match fitted {
        Ok((rect, screen_height)) => {
            q.viewport = Viewport::from_window(rect, screen_height);
            CRAZY_OK
        }
        Err(e) => {
            set_last_error(&e.to_string());
            CRAZY_ERROR
        }
    }
}

// ---------------------------------------------------------------------------
// Enqueue
// ---------------------------------------------------------------------------

/// Queue a pause of `seconds`.
///
/// # Safety
///
/// `handle` must be null or a live pointer from `crazy_queue_new()`.
#[no_mangle]
pub unsafe extern "C" fn crazy_queue_push_wait(handle: *mut CrazyQueue, seconds: f32) -> i32 {
    let Some(q) = (unsafe { queue_mut(handle) }) else {
        return CRAZY_ERROR;
    };
    q.queue.append(Action::wait(seconds));
    CRAZY_OK
}

/// Queue a left-button gesture: `0` click, `1` press, `2` release.
/// A negative `cooldown` uses the default.
///
/// # Safety
///
/// `handle` must be null or a live pointer from `crazy_queue_new()`.
#[no_mangle]
pub unsafe extern "C" fn crazy_queue_push_click(
    handle: *mut CrazyQueue,
    kind: i32,
    cooldown: f32,
) -> i32 {
    let Some(q) = (unsafe { queue_mut(handle) }) else {
        return CRAZY_ERROR;
    };
    let click = match kind {
        0 => MouseClick::Click,
        1 => MouseClick::ClickDown,
        2 => MouseClick::ClickUp,
        other => {
            set_last_error(&format!("unknown click kind {other}"));
            return CRAZY_ERROR;
        }
    };
    let action = q.config.click(click);
    q.queue.append(cooldown_or(action, cooldown));
    CRAZY_OK
}

/// Queue typed text.  A negative `cooldown` uses the default.
///
/// # Safety
///
/// `text` must be a valid null-terminated UTF-8 C string.
#[no_mangle]
pub unsafe extern "C" fn crazy_queue_push_keys(
    handle: *mut CrazyQueue,
    text: *const c_char,
    cooldown: f32,
) -> i32 {
    if text.is_null() {
        set_last_error("text is null");
        return CRAZY_ERROR;
    }
    let text_str = match unsafe { CStr::from_ptr(text) }.to_str() {
        Ok(s) => s,
        Err(e) => {
            set_last_error(&format!("Invalid UTF-8: {e}"));
            return CRAZY_ERROR;
        }
    };
    let Some(q) = (unsafe { queue_mut(handle) }) else {
        return CRAZY_ERROR;
    };
    let action = q.config.send_keys(text_str);
    q.queue.append(cooldown_or(action, cooldown));
    CRAZY_OK
}

/// Queue a host callback.  `user_data` is passed back untouched and must
/// stay valid until the action has run or the queue is cleared.
///
/// # Safety
///
/// `handle` must be null or a live pointer from `crazy_queue_new()`.
#[no_mangle]
pub unsafe extern "C" fn crazy_queue_push_invoke(
    handle: *mut CrazyQueue,
    callback: Option<CrazyInvokeFn>,
    user_data: *mut c_void,
    cooldown: f32,
) -> i32 {
    let Some(callback) = callback else {
        set_last_error("callback is null");
        return CRAZY_ERROR;
    };
    let Some(q) = (unsafe { queue_mut(handle) }) else {
        return CRAZY_ERROR;
    };
    let action = q.config.invoke(move || callback(user_data));
    q.queue.append(cooldown_or(action, cooldown));
    CRAZY_OK
}

/// Queue a cursor move onto whatever `target` reports each tick.
///
/// # Safety
///
/// `handle` must be null or a live pointer from `crazy_queue_new()`.
#[no_mangle]
pub unsafe extern "C" fn crazy_queue_push_move_to(
    handle: *mut CrazyQueue,
    target: Option<CrazyTargetFn>,
    user_data: *mut c_void,
) -> i32 {
    let Some(target) = target else {
        set_last_error("target is null");
        return CRAZY_ERROR;
    };
    let Some(q) = (unsafe { queue_mut(handle) }) else {
        return CRAZY_ERROR;
    };
    q.queue.append(Action::move_to(move || {
        let p = target(user_data);
        Vec3::new(p.x, p.y, p.z)
    }));
    CRAZY_OK
}

// ---------------------------------------------------------------------------
// Tick
// ---------------------------------------------------------------------------

/// Advance the queue by one frame of `delta` seconds.
///
/// Returns `CRAZY_STEP_IDLE`, `CRAZY_STEP_PENDING` or
/// `CRAZY_STEP_COMPLETED`, or `CRAZY_ERROR` for a null handle.
///
/// # Safety
///
/// `handle` must be null or a live pointer from `crazy_queue_new()`.
#[no_mangle]
pub unsafe extern "C" fn crazy_queue_step(handle: *mut CrazyQueue, delta: f32) -> i32 {
    let Some(q) = (unsafe { queue_mut(handle) }) else {
        return CRAZY_ERROR;
    };
    let camera = ScreenCamera;
    let mut ctx = StepContext::new(q.platform.as_input_mut(), &camera, q.viewport)
        .with_move_settings(q.config.move_settings);
    match q.queue.step(&mut ctx, delta) {
        StepOutcome::Idle => CRAZY_STEP_IDLE,
        StepOutcome::Pending => CRAZY_STEP_PENDING,
        StepOutcome::Completed => CRAZY_STEP_COMPLETED,
    }
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

/// Find the first window owned by `pid` as a JSON object
/// (`{"hwnd":..,"title":..,"pid":..}`).
///
/// # Safety
///
/// `out_json` must be a valid pointer to a `*mut c_char`.
/// On success, `*out_json` is set to a heap-allocated JSON C string.
/// Caller must free with `crazy_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn crazy_find_process_window(pid: u32, out_json: *mut *mut c_char) -> i32 {
    if out_json.is_null() {
        set_last_error("out_json is null");
        return CRAZY_ERROR;
    }
    match create_platform(false).find_window_for_process(pid) {
        Some(window) => unsafe { write_json(&window, out_json) },
        None => {
            set_last_error(&format!("no window for process {pid}"));
            CRAZY_ERROR
        }
    }
}

/// Collect the machine snapshot as a JSON string.
///
/// # Safety
///
/// `out_json` must be a valid pointer to a `*mut c_char`.
/// Caller must free the result with `crazy_free_string()`.
#[no_mangle]
pub unsafe extern "C" fn crazy_system_info(out_json: *mut *mut c_char) -> i32 {
    if out_json.is_null() {
        set_last_error("out_json is null");
        return CRAZY_ERROR;
    }
    match crazy_core::system_info::collect_system_info(None) {
        Some(snapshot) => unsafe { write_json(&snapshot, out_json) },
        None => {
            set_last_error("system information unavailable");
            CRAZY_ERROR
        }
    }
}
