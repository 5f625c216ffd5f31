//! Process elevation probe.
//!
//! Low-level hooks work unelevated, but elevated applications (and many
//! games with anti-cheat) ignore input from unelevated processes. The
//! binary warns at startup when not elevated rather than refusing to run.

/// `true` when the process runs with administrator rights.
#[cfg(target_os = "windows")]
pub fn is_elevated() -> bool {
    use windows::Win32::UI::Shell::IsUserAnAdmin;
    // SAFETY: IsUserAnAdmin takes no arguments and only reads the process token.
    unsafe { IsUserAnAdmin().as_bool() }
}

/// Elevation is a Windows concern; elsewhere report `true` so no spurious
/// warning is logged.
#[cfg(not(target_os = "windows"))]
pub fn is_elevated() -> bool {
    true
}
