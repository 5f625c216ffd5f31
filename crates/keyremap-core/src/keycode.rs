//! Windows Virtual Key (VK) code tables: name→code resolution, code→name
//! rendering, and key classification.
//!
//! Reference: Windows Virtual-Key Codes (winuser.h). VK codes range from
//! 0x01 to 0xFE; pressing the letter A always produces `VK_A = 0x41`
//! regardless of layout, which is exactly the behavior a remapper wants.
//!
//! The name set here is a compatibility surface: it must resolve every name
//! a user may have stored in an existing rules file, including the short
//! aliases (`esc`, `caps`, `pgup`, …) and the raw punctuation forms
//! (`;`, `=`, `/`, …). `VK_NAME_TABLE` is a compile-time 256-entry array
//! indexed by VK code, so the hot render path is an O(1) lookup.

// ── Named VK constants used across the crate ─────────────────────────────────

pub const VK_SHIFT: u8 = 0x10;
pub const VK_CONTROL: u8 = 0x11;
pub const VK_MENU: u8 = 0x12; // Alt
pub const VK_LWIN: u8 = 0x5B;
pub const VK_RWIN: u8 = 0x5C;
pub const VK_LSHIFT: u8 = 0xA0;
pub const VK_RSHIFT: u8 = 0xA1;
pub const VK_LCONTROL: u8 = 0xA2;
pub const VK_RCONTROL: u8 = 0xA3;
pub const VK_LMENU: u8 = 0xA4;
pub const VK_RMENU: u8 = 0xA5;

/// Every VK code classified as a modifier: the generic Ctrl/Shift/Alt codes
/// delivered by chords, their left/right variants, and the Win keys.
pub const MODIFIER_VKS: [u8; 11] = [
    VK_SHIFT, VK_CONTROL, VK_MENU, VK_LWIN, VK_RWIN, VK_LSHIFT, VK_RSHIFT, VK_LCONTROL,
    VK_RCONTROL, VK_LMENU, VK_RMENU,
];

/// Keys that require `KEYEVENTF_EXTENDEDKEY` when synthesized, so injected
/// events carry the same scan-code prefix as the physical keys.
const EXTENDED_VKS: [u8; 15] = [
    0x21, // Page Up
    0x22, // Page Down
    0x23, // End
    0x24, // Home
    0x25, // Left
    0x26, // Up
    0x27, // Right
    0x28, // Down
    0x2C, // Print Screen
    0x2D, // Insert
    0x2E, // Delete
    0x6F, // Numpad Divide
    0x90, // Num Lock
    VK_RCONTROL,
    VK_RMENU,
];

/// Returns `true` if `vk` is a modifier key (Ctrl/Shift/Alt/Win, any variant).
pub fn is_modifier(vk: u8) -> bool {
    MODIFIER_VKS.contains(&vk)
}

/// Returns `true` if `vk` belongs to the extended-key set.
pub fn is_extended_key(vk: u8) -> bool {
    EXTENDED_VKS.contains(&vk)
}

// ── Name resolution ──────────────────────────────────────────────────────────

/// Resolves a single key name (case-insensitive) to its VK code.
///
/// Accepts both full names and their historical aliases (`escape`/`esc`,
/// `capslock`/`caps`, `pageup`/`pgup`, …) as well as literal punctuation
/// (`;`, `=`, `,`, `-`, `.`, `/`, `` ` ``, `[`, `\`, `]`, `'`).
pub fn vk_from_name(name: &str) -> Option<u8> {
    let lower = name.to_ascii_lowercase();
    let vk = match lower.as_str() {
        // Letters
        "a" => 0x41, "b" => 0x42, "c" => 0x43, "d" => 0x44, "e" => 0x45,
        "f" => 0x46, "g" => 0x47, "h" => 0x48, "i" => 0x49, "j" => 0x4A,
        "k" => 0x4B, "l" => 0x4C, "m" => 0x4D, "n" => 0x4E, "o" => 0x4F,
        "p" => 0x50, "q" => 0x51, "r" => 0x52, "s" => 0x53, "t" => 0x54,
        "u" => 0x55, "v" => 0x56, "w" => 0x57, "x" => 0x58, "y" => 0x59,
        "z" => 0x5A,
        // Digit row
        "0" => 0x30, "1" => 0x31, "2" => 0x32, "3" => 0x33, "4" => 0x34,
        "5" => 0x35, "6" => 0x36, "7" => 0x37, "8" => 0x38, "9" => 0x39,
        // Function keys
        "f1" => 0x70, "f2" => 0x71, "f3" => 0x72, "f4" => 0x73,
        "f5" => 0x74, "f6" => 0x75, "f7" => 0x76, "f8" => 0x77,
        "f9" => 0x78, "f10" => 0x79, "f11" => 0x7A, "f12" => 0x7B,
        "f13" => 0x7C, "f14" => 0x7D, "f15" => 0x7E, "f16" => 0x7F,
        "f17" => 0x80, "f18" => 0x81, "f19" => 0x82, "f20" => 0x83,
        "f21" => 0x84, "f22" => 0x85, "f23" => 0x86, "f24" => 0x87,
        // Modifiers
        "shift" => VK_SHIFT, "lshift" => VK_LSHIFT, "rshift" => VK_RSHIFT,
        "ctrl" => VK_CONTROL, "lctrl" => VK_LCONTROL, "rctrl" => VK_RCONTROL,
        "alt" => VK_MENU, "lalt" => VK_LMENU, "ralt" => VK_RMENU,
        "win" | "lwin" => VK_LWIN, "rwin" => VK_RWIN,
        // Special keys
        "escape" | "esc" => 0x1B,
        "tab" => 0x09,
        "capslock" | "caps" => 0x14,
        "space" => 0x20,
        "enter" | "return" => 0x0D,
        "backspace" | "back" => 0x08,
        "delete" | "del" => 0x2E,
        "insert" | "ins" => 0x2D,
        "home" => 0x24,
        "end" => 0x23,
        "pageup" | "pgup" => 0x21,
        "pagedown" | "pgdn" => 0x22,
        "printscreen" | "prtsc" => 0x2C,
        "scrolllock" => 0x91,
        "pause" => 0x13,
        "numlock" => 0x90,
        // Arrow keys
        "up" => 0x26, "down" => 0x28, "left" => 0x25, "right" => 0x27,
        // Numpad
        "num0" => 0x60, "num1" => 0x61, "num2" => 0x62, "num3" => 0x63,
        "num4" => 0x64, "num5" => 0x65, "num6" => 0x66, "num7" => 0x67,
        "num8" => 0x68, "num9" => 0x69,
        "numplus" => 0x6B, "numminus" => 0x6D,
        "nummultiply" => 0x6A, "numdivide" => 0x6F,
        "numdecimal" => 0x6E,
        // Punctuation
        "semicolon" | ";" => 0xBA,   // VK_OEM_1      (; :)
        "equals" | "=" => 0xBB,      // VK_OEM_PLUS   (= +)
        "comma" | "," => 0xBC,       // VK_OEM_COMMA  (, <)
        "minus" | "-" => 0xBD,       // VK_OEM_MINUS  (- _)
        "period" | "." => 0xBE,      // VK_OEM_PERIOD (. >)
        "slash" | "/" => 0xBF,       // VK_OEM_2      (/ ?)
        "grave" | "`" => 0xC0,       // VK_OEM_3      (` ~)
        "lbracket" | "[" => 0xDB,    // VK_OEM_4      ([ {)
        "backslash" | "\\" => 0xDC,  // VK_OEM_5      (\ |)
        "rbracket" | "]" => 0xDD,    // VK_OEM_6      (] })
        "quote" | "'" => 0xDE,       // VK_OEM_7      (' ")
        _ => return None,
    };
    Some(vk)
}

/// Renders a VK code as its primary key name.
///
/// Returns `None` for codes outside the name table; callers fall back to a
/// hex literal when rendering such codes.
pub fn name_from_vk(vk: u8) -> Option<&'static str> {
    VK_NAME_TABLE[vk as usize]
}

/// Primary-name table indexed by VK code (0x00–0xFF).
///
/// Where several names resolve to one code, the full name is stored here and
/// the aliases exist only on the parse side.
const VK_NAME_TABLE: [Option<&'static str>; 256] = {
    let mut t: [Option<&'static str>; 256] = [None; 256];

    // ── Letters (VK_A=0x41 … VK_Z=0x5A) ──────────────────────────────────────
    t[0x41] = Some("a");
    t[0x42] = Some("b");
    t[0x43] = Some("c");
    t[0x44] = Some("d");
    t[0x45] = Some("e");
    t[0x46] = Some("f");
    t[0x47] = Some("g");
    t[0x48] = Some("h");
    t[0x49] = Some("i");
    t[0x4A] = Some("j");
    t[0x4B] = Some("k");
    t[0x4C] = Some("l");
    t[0x4D] = Some("m");
    t[0x4E] = Some("n");
    t[0x4F] = Some("o");
    t[0x50] = Some("p");
    t[0x51] = Some("q");
    t[0x52] = Some("r");
    t[0x53] = Some("s");
    t[0x54] = Some("t");
    t[0x55] = Some("u");
    t[0x56] = Some("v");
    t[0x57] = Some("w");
    t[0x58] = Some("x");
    t[0x59] = Some("y");
    t[0x5A] = Some("z");

    // ── Digit row (VK_0=0x30 … VK_9=0x39) ────────────────────────────────────
    t[0x30] = Some("0");
    t[0x31] = Some("1");
    t[0x32] = Some("2");
    t[0x33] = Some("3");
    t[0x34] = Some("4");
    t[0x35] = Some("5");
    t[0x36] = Some("6");
    t[0x37] = Some("7");
    t[0x38] = Some("8");
    t[0x39] = Some("9");

    // ── Function keys (VK_F1=0x70 … VK_F24=0x87) ─────────────────────────────
    t[0x70] = Some("f1");
    t[0x71] = Some("f2");
    t[0x72] = Some("f3");
    t[0x73] = Some("f4");
    t[0x74] = Some("f5");
    t[0x75] = Some("f6");
    t[0x76] = Some("f7");
    t[0x77] = Some("f8");
    t[0x78] = Some("f9");
    t[0x79] = Some("f10");
    t[0x7A] = Some("f11");
    t[0x7B] = Some("f12");
    t[0x7C] = Some("f13");
    t[0x7D] = Some("f14");
    t[0x7E] = Some("f15");
    t[0x7F] = Some("f16");
    t[0x80] = Some("f17");
    t[0x81] = Some("f18");
    t[0x82] = Some("f19");
    t[0x83] = Some("f20");
    t[0x84] = Some("f21");
    t[0x85] = Some("f22");
    t[0x86] = Some("f23");
    t[0x87] = Some("f24");

    // ── Modifiers ────────────────────────────────────────────────────────────
    t[0x10] = Some("shift");
    t[0x11] = Some("ctrl");
    t[0x12] = Some("alt");
    t[0x5B] = Some("win");
    t[0x5C] = Some("rwin");
    t[0xA0] = Some("lshift");
    t[0xA1] = Some("rshift");
    t[0xA2] = Some("lctrl");
    t[0xA3] = Some("rctrl");
    t[0xA4] = Some("lalt");
    t[0xA5] = Some("ralt");

    // ── Special keys ─────────────────────────────────────────────────────────
    t[0x08] = Some("backspace");
    t[0x09] = Some("tab");
    t[0x0D] = Some("enter");
    t[0x13] = Some("pause");
    t[0x14] = Some("capslock");
    t[0x1B] = Some("escape");
    t[0x20] = Some("space");
    t[0x21] = Some("pageup");
    t[0x22] = Some("pagedown");
    t[0x23] = Some("end");
    t[0x24] = Some("home");
    t[0x2C] = Some("printscreen");
    t[0x2D] = Some("insert");
    t[0x2E] = Some("delete");
    t[0x90] = Some("numlock");
    t[0x91] = Some("scrolllock");

    // ── Arrow keys ───────────────────────────────────────────────────────────
    t[0x25] = Some("left");
    t[0x26] = Some("up");
    t[0x27] = Some("right");
    t[0x28] = Some("down");

    // ── Numpad ───────────────────────────────────────────────────────────────
    t[0x60] = Some("num0");
    t[0x61] = Some("num1");
    t[0x62] = Some("num2");
    t[0x63] = Some("num3");
    t[0x64] = Some("num4");
    t[0x65] = Some("num5");
    t[0x66] = Some("num6");
    t[0x67] = Some("num7");
    t[0x68] = Some("num8");
    t[0x69] = Some("num9");
    t[0x6A] = Some("nummultiply");
    t[0x6B] = Some("numplus");
    t[0x6D] = Some("numminus");
    t[0x6E] = Some("numdecimal");
    t[0x6F] = Some("numdivide");

    // ── Punctuation ──────────────────────────────────────────────────────────
    t[0xBA] = Some("semicolon");
    t[0xBB] = Some("equals");
    t[0xBC] = Some("comma");
    t[0xBD] = Some("minus");
    t[0xBE] = Some("period");
    t[0xBF] = Some("slash");
    t[0xC0] = Some("grave");
    t[0xDB] = Some("lbracket");
    t[0xDC] = Some("backslash");
    t[0xDD] = Some("rbracket");
    t[0xDE] = Some("quote");

    t
};

/// Key names grouped by category, for help output (`--list-keys`).
pub const KEY_NAME_GROUPS: &[(&str, &[&str])] = &[
    (
        "Letters",
        &[
            "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q",
            "r", "s", "t", "u", "v", "w", "x", "y", "z",
        ],
    ),
    ("Numbers", &["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"]),
    (
        "Function Keys",
        &[
            "f1", "f2", "f3", "f4", "f5", "f6", "f7", "f8", "f9", "f10", "f11", "f12", "f13",
            "f14", "f15", "f16", "f17", "f18", "f19", "f20", "f21", "f22", "f23", "f24",
        ],
    ),
    (
        "Modifiers",
        &[
            "shift", "lshift", "rshift", "ctrl", "lctrl", "rctrl", "alt", "lalt", "ralt", "win",
            "lwin", "rwin",
        ],
    ),
    (
        "Navigation",
        &["up", "down", "left", "right", "home", "end", "pageup", "pgup", "pagedown", "pgdn"],
    ),
    (
        "Special",
        &[
            "escape", "esc", "tab", "capslock", "caps", "space", "enter", "return", "backspace",
            "delete", "insert", "printscreen", "scrolllock", "pause", "numlock",
        ],
    ),
    (
        "Numpad",
        &[
            "num0", "num1", "num2", "num3", "num4", "num5", "num6", "num7", "num8", "num9",
            "numplus", "numminus", "nummultiply", "numdivide", "numdecimal",
        ],
    ),
    (
        "Punctuation",
        &[
            "semicolon", "equals", "comma", "minus", "period", "slash", "grave", "lbracket",
            "backslash", "rbracket", "quote",
        ],
    ),
];
