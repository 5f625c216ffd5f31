//! Windows input injection via the SendInput API.
//!
//! Each synthesized event is built the way native keyboard input arrives:
//! virtual key code plus the matching hardware scan code (games commonly
//! read the scan code, not the VK), the extended-key flag for keys whose
//! physical counterparts send an `E0` scan-code prefix, and the injection
//! sentinel in `dwExtraInfo` so the hook can recognize our own output.
//!
//! # Safety
//!
//! This module uses `unsafe` code exclusively for Windows API FFI calls.
//! All `unsafe` blocks are annotated with `// SAFETY:` comments.

#![cfg(target_os = "windows")]

use keyremap_core::keycode;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    MapVirtualKeyW, SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYBD_EVENT_FLAGS,
    KEYEVENTF_EXTENDEDKEY, KEYEVENTF_KEYUP, MAPVK_VK_TO_VSC, VIRTUAL_KEY,
};

use super::{InjectError, InputInjector, INJECTION_SENTINEL};

/// Production [`InputInjector`] backed by `SendInput`.
pub struct SendInputInjector;

impl SendInputInjector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SendInputInjector {
    fn default() -> Self {
        Self::new()
    }
}

impl InputInjector for SendInputInjector {
    fn inject(&self, vk: u8, key_up: bool) -> Result<(), InjectError> {
        let mut flags = KEYBD_EVENT_FLAGS(0);
        if key_up {
            flags |= KEYEVENTF_KEYUP;
        }
        if keycode::is_extended_key(vk) {
            flags |= KEYEVENTF_EXTENDEDKEY;
        }

        // SAFETY: MapVirtualKeyW is a pure translation table lookup.
        let scan_code = unsafe { MapVirtualKeyW(vk as u32, MAPVK_VK_TO_VSC) };

        let input = INPUT {
            r#type: INPUT_KEYBOARD,
            Anonymous: INPUT_0 {
                ki: KEYBDINPUT {
                    wVk: VIRTUAL_KEY(vk as u16),
                    wScan: scan_code as u16,
                    dwFlags: flags,
                    time: 0,
                    dwExtraInfo: INJECTION_SENTINEL,
                },
            },
        };

        // SAFETY: input is a valid INPUT structure on the stack.
        let sent = unsafe { SendInput(&[input], std::mem::size_of::<INPUT>() as i32) };
        if sent == 1 {
            Ok(())
        } else {
            Err(InjectError::SendFailed { vk })
        }
    }
}
