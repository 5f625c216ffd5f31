//! Windows low-level keyboard hook implementation.
//!
//! [`install`] spawns a dedicated dispatch thread that installs the
//! `WH_KEYBOARD_LL` hook and runs the blocking Win32 message loop; the hook
//! handle lives and dies on that thread. [`shutdown`] posts `WM_QUIT` to
//! that specific thread and joins it.
//!
//! The hook callback runs synchronously on the dispatch thread for every
//! keyboard event in the system. It must return promptly — a slow or
//! panicking callback gets the hook silently removed by the OS — so the
//! callback does exactly three things: filter out the engine's own injected
//! events, resolve the event through the application layer (one short
//! registry lock), and either withhold the event or forward it with
//! `CallNextHookEx`.
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI calls.
//! All `unsafe` blocks are annotated with `// SAFETY:` comments.

#![cfg(target_os = "windows")]

use std::cell::RefCell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use tracing::{debug, error, warn};
use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, GetMessageW, PostThreadMessageW, SetWindowsHookExW,
    TranslateMessage, UnhookWindowsHookEx, HC_ACTION, KBDLLHOOKSTRUCT, KBDLLHOOKSTRUCT_FLAGS,
    LLKHF_INJECTED, MSG, WH_KEYBOARD_LL, WM_KEYDOWN, WM_KEYUP, WM_QUIT, WM_SYSKEYDOWN,
    WM_SYSKEYUP,
};

use super::HookError;
use crate::application::intercept::{self, InterceptContext, InterceptState};

/// Context consulted by the hook callback. One engine may be live per
/// process at a time; the slot is checked at install, not assumed.
static ACTIVE_CONTEXT: Mutex<Option<Arc<InterceptContext>>> = Mutex::new(None);

thread_local! {
    /// Live modifier/suppression state, owned exclusively by the dispatch
    /// thread. Dies with the thread, which resets it for the next start.
    static INTERCEPT_STATE: RefCell<InterceptState> = RefCell::new(InterceptState::new());
}

/// A live interception session: the dispatch thread and its Win32 identity.
/// The hook handle itself is owned by the dispatch thread.
pub struct DispatchSession {
    thread: Option<JoinHandle<()>>,
    thread_id: u32,
}

impl DispatchSession {
    /// `true` once the dispatch thread has exited (message loop ended or
    /// hook installation never completed).
    pub fn thread_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, |t| t.is_finished())
    }
}

/// Installs the hook and starts the dispatch loop.
///
/// Returns only after the hook handle is live (or installation failed) —
/// the spawned thread reports the outcome back over a channel.
///
/// # Errors
///
/// [`HookError::AlreadyActive`] when another session holds the context
/// slot, [`HookError::ThreadSpawn`] / [`HookError::InstallFailed`] when the
/// dispatch thread or `SetWindowsHookExW` fails.
pub fn install(context: Arc<InterceptContext>) -> Result<DispatchSession, HookError> {
    {
        let mut slot = ACTIVE_CONTEXT.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return Err(HookError::AlreadyActive);
        }
        // Published before the hook goes live so the first callback finds it.
        *slot = Some(context);
    }

    let (ready_tx, ready_rx) = mpsc::channel::<Result<u32, String>>();
    let spawned = thread::Builder::new()
        .name("keyremap-dispatch".to_string())
        .spawn(move || run_dispatch_loop(ready_tx));

    let thread = match spawned {
        Ok(thread) => thread,
        Err(e) => {
            clear_context();
            return Err(HookError::ThreadSpawn(e.to_string()));
        }
    };

    match ready_rx.recv() {
        Ok(Ok(thread_id)) => {
            debug!(thread_id, "keyboard hook installed");
            Ok(DispatchSession {
                thread: Some(thread),
                thread_id,
            })
        }
        Ok(Err(reason)) => {
            let _ = thread.join();
            clear_context();
            Err(HookError::InstallFailed(reason))
        }
        Err(_) => {
            let _ = thread.join();
            clear_context();
            Err(HookError::InstallFailed(
                "dispatch thread exited before reporting".to_string(),
            ))
        }
    }
}

/// Tears down a session: quits the dispatch loop (targeted at that thread,
/// not broadcast), joins the thread, and clears the context slot. The
/// dispatch thread uninstalls the hook on its way out.
pub fn shutdown(mut session: DispatchSession) {
    // SAFETY: posting WM_QUIT to a thread id is always safe; if the thread
    // is already gone the call simply fails.
    unsafe {
        if let Err(e) = PostThreadMessageW(session.thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) {
            debug!("WM_QUIT post failed (dispatch thread likely gone): {e}");
        }
    }

    if let Some(thread) = session.thread.take() {
        if thread.join().is_err() {
            error!("dispatch thread panicked during shutdown");
        }
    }

    clear_context();
}

fn clear_context() {
    *ACTIVE_CONTEXT.lock().unwrap_or_else(PoisonError::into_inner) = None;
}

/// Entry point of the dispatch thread: install the hook, report readiness,
/// pump messages until WM_QUIT, uninstall.
fn run_dispatch_loop(ready: Sender<Result<u32, String>>) {
    // SAFETY: WH_KEYBOARD_LL requires the installing thread to run a
    // message loop, which this thread does below.
    let hook = match unsafe { SetWindowsHookExW(WH_KEYBOARD_LL, Some(keyboard_hook_proc), None, 0) }
    {
        Ok(hook) => hook,
        Err(e) => {
            let _ = ready.send(Err(e.to_string()));
            return;
        }
    };

    // SAFETY: trivially safe; returns the calling thread's id.
    let thread_id = unsafe { GetCurrentThreadId() };
    if ready.send(Ok(thread_id)).is_err() {
        // start() gave up on us; don't leave a system-wide hook behind.
        // SAFETY: hook was installed by this thread just above.
        unsafe {
            let _ = UnhookWindowsHookEx(hook);
        }
        return;
    }

    // Standard Win32 message loop - blocks until WM_QUIT is posted.
    let mut msg = MSG::default();
    // SAFETY: GetMessageW/TranslateMessage/DispatchMessageW with a valid MSG.
    unsafe {
        loop {
            let result = GetMessageW(&mut msg, None, 0, 0);
            // 0 = WM_QUIT, -1 = error; either way the loop is done.
            if result.0 <= 0 {
                break;
            }
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
        let _ = UnhookWindowsHookEx(hook);
    }
    debug!("dispatch loop exited, keyboard hook removed");
}

/// Low-level keyboard hook callback.
///
/// # Safety
///
/// Called by Windows on the dispatch thread with `l_param` pointing to a
/// `KBDLLHOOKSTRUCT` whenever `n_code == HC_ACTION`. Must always return
/// control to the OS; every internal fault degrades to pass-through.
unsafe extern "system" fn keyboard_hook_proc(
    n_code: i32,
    w_param: WPARAM,
    l_param: LPARAM,
) -> LRESULT {
    if n_code != HC_ACTION as i32 {
        // SAFETY: must call CallNextHookEx when n_code < 0.
        return CallNextHookEx(None, n_code, w_param, l_param);
    }

    // SAFETY: l_param points to a KBDLLHOOKSTRUCT when n_code == HC_ACTION.
    let kbs = &*(l_param.0 as *const KBDLLHOOKSTRUCT);

    // Self-injection filter: our own synthesized events pass through
    // untouched, which breaks the feedback loop with the emitter.
    let os_injected = (kbs.flags & LLKHF_INJECTED) != KBDLLHOOKSTRUCT_FLAGS(0);
    if intercept::is_own_injection(os_injected, kbs.dwExtraInfo) {
        return CallNextHookEx(None, n_code, w_param, l_param);
    }

    let is_down = matches!(w_param.0 as u32, WM_KEYDOWN | WM_SYSKEYDOWN);
    let is_up = matches!(w_param.0 as u32, WM_KEYUP | WM_SYSKEYUP);
    if !is_down && !is_up {
        return CallNextHookEx(None, n_code, w_param, l_param);
    }

    let context = ACTIVE_CONTEXT
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    let Some(context) = context else {
        return CallNextHookEx(None, n_code, w_param, l_param);
    };

    let vk = kbs.vkCode as u8;
    // A panic must never cross the FFI boundary, and a fault in resolution
    // must never take the keyboard down with it: log and pass through.
    let handled = catch_unwind(AssertUnwindSafe(|| {
        INTERCEPT_STATE.with(|state| {
            context.handle_event(&mut state.borrow_mut(), vk, is_down)
        })
    }));

    match handled {
        Ok(true) => LRESULT(1),
        Ok(false) => CallNextHookEx(None, n_code, w_param, l_param),
        Err(_) => {
            warn!(vk, "event resolution panicked; passing event through");
            CallNextHookEx(None, n_code, w_param, l_param)
        }
    }
}
