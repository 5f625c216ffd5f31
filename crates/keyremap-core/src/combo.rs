//! Canonical key-combination value type.
//!
//! A [`KeyCombo`] is the key of every rule table: an immutable, canonically
//! ordered sequence of distinct VK codes. Canonical order puts modifiers
//! first (sorted ascending by code) followed by the non-modifier keys in the
//! order the user wrote them, so `"a+ctrl"` and `"ctrl+a"` produce equal
//! combos while `"ctrl+a+b"` and `"ctrl+b+a"` stay distinct.

use std::fmt;

use thiserror::Error;

use crate::keycode;

/// Error type for key-combination text parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    /// A token did not resolve through the key name table.
    #[error("unknown key name: '{0}'")]
    UnknownKeyName(String),

    /// The text contained no key tokens at all.
    #[error("key combination is empty")]
    EmptyCombo,
}

/// An ordered, canonicalized key chord. Equal and hashable by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCombo(Vec<u8>);

impl KeyCombo {
    /// Builds a combo from raw VK codes, canonicalizing the order and
    /// dropping duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`KeyParseError::EmptyCombo`] when `codes` is empty.
    pub fn new(codes: impl IntoIterator<Item = u8>) -> Result<Self, KeyParseError> {
        let collected: Vec<u8> = codes.into_iter().collect();
        if collected.is_empty() {
            return Err(KeyParseError::EmptyCombo);
        }

        let mut modifiers: Vec<u8> = collected
            .iter()
            .copied()
            .filter(|vk| keycode::is_modifier(*vk))
            .collect();
        modifiers.sort_unstable();
        modifiers.dedup();

        let mut canonical = modifiers;
        for vk in collected {
            if !keycode::is_modifier(vk) && !canonical.contains(&vk) {
                canonical.push(vk);
            }
        }
        Ok(Self(canonical))
    }

    /// Builds the single-key combo for `vk`.
    pub fn single(vk: u8) -> Self {
        Self(vec![vk])
    }

    /// Builds the combo for a live key event: the held modifiers plus the
    /// key that just went down or up.
    ///
    /// `modifiers` must already be sorted ascending (the engine keeps them
    /// in a `BTreeSet`). A modifier `vk` merges into the modifier prefix; a
    /// non-modifier `vk` is appended after it.
    pub fn from_event(modifiers: impl IntoIterator<Item = u8>, vk: u8) -> Self {
        let mut codes: Vec<u8> = modifiers.into_iter().collect();
        if keycode::is_modifier(vk) {
            if !codes.contains(&vk) {
                codes.push(vk);
                codes.sort_unstable();
            }
        } else {
            codes.push(vk);
        }
        Self(codes)
    }

    /// Parses text like `"ctrl+shift+a"` into a canonical combo.
    ///
    /// Tokens are case-insensitive, separated by `+`, and trimmed; empty
    /// tokens are skipped so `"ctrl+ a"` and `"ctrl++a"` still parse.
    ///
    /// # Errors
    ///
    /// [`KeyParseError::UnknownKeyName`] carries the first token that failed
    /// to resolve; [`KeyParseError::EmptyCombo`] is returned when no token
    /// survives trimming.
    pub fn parse(text: &str) -> Result<Self, KeyParseError> {
        let mut codes = Vec::new();
        for token in text.trim().split('+') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            match keycode::vk_from_name(token) {
                Some(vk) => codes.push(vk),
                None => return Err(KeyParseError::UnknownKeyName(token.to_string())),
            }
        }
        Self::new(codes)
    }

    /// The canonical VK code sequence.
    pub fn codes(&self) -> &[u8] {
        &self.0
    }

    /// Number of keys in the chord.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for KeyCombo {
    /// Renders the combo as uppercased names joined with `+`, falling back
    /// to a `0xNN` literal for codes outside the name table.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, vk) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("+")?;
            }
            match keycode::name_from_vk(*vk) {
                Some(name) => f.write_str(&name.to_ascii_uppercase())?,
                None => write!(f, "0x{vk:02X}")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_orders_modifiers_before_non_modifiers() {
        let a = KeyCombo::parse("a+ctrl").expect("parse");
        let b = KeyCombo::parse("ctrl+a").expect("parse");
        assert_eq!(a, b);
        assert_eq!(a.codes(), &[0x11, 0x41]);
    }

    #[test]
    fn test_parse_sorts_modifiers_by_numeric_code() {
        // VK_SHIFT (0x10) sorts before VK_CONTROL (0x11) regardless of the
        // order the user wrote them in.
        let combo = KeyCombo::parse("ctrl+shift+f5").expect("parse");
        assert_eq!(combo.codes(), &[0x10, 0x11, 0x74]);
    }

    #[test]
    fn test_parse_preserves_non_modifier_user_order() {
        let ab = KeyCombo::parse("ctrl+a+b").expect("parse");
        let ba = KeyCombo::parse("ctrl+b+a").expect("parse");
        assert_eq!(ab.codes(), &[0x11, 0x41, 0x42]);
        assert_eq!(ba.codes(), &[0x11, 0x42, 0x41]);
        assert_ne!(ab, ba);
    }

    #[test]
    fn test_parse_is_case_insensitive_and_trims_tokens() {
        let a = KeyCombo::parse(" Ctrl + Shift + A ").expect("parse");
        let b = KeyCombo::parse("ctrl+shift+a").expect("parse");
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_skips_empty_tokens() {
        let a = KeyCombo::parse("ctrl++a").expect("parse");
        assert_eq!(a, KeyCombo::parse("ctrl+a").unwrap());
    }

    #[test]
    fn test_parse_deduplicates_codes() {
        let combo = KeyCombo::parse("ctrl+lctrl+ctrl+a+a").expect("parse");
        assert_eq!(combo.codes(), &[0x11, 0xA2, 0x41]);
    }

    #[test]
    fn test_parse_unknown_token_names_the_offender() {
        let err = KeyCombo::parse("ctrl+bogus").unwrap_err();
        assert_eq!(err, KeyParseError::UnknownKeyName("bogus".to_string()));
    }

    #[test]
    fn test_parse_empty_text_is_an_empty_combo_error() {
        assert_eq!(KeyCombo::parse(""), Err(KeyParseError::EmptyCombo));
        assert_eq!(KeyCombo::parse("  +  "), Err(KeyParseError::EmptyCombo));
    }

    #[test]
    fn test_canonicalization_is_idempotent() {
        for text in ["capslock", "ctrl+a", "a+ctrl", "win+shift+f23", "shift+ctrl+alt+x"] {
            let once = KeyCombo::parse(text).expect("parse");
            let twice = KeyCombo::new(once.codes().iter().copied()).expect("re-canonicalize");
            assert_eq!(once, twice, "canonical form of {text:?} must be stable");
        }
    }

    #[test]
    fn test_display_round_trips_for_named_codes() {
        for text in ["capslock", "ctrl+a", "shift+f5", "win+shift+f23", "numdivide", ";"] {
            let combo = KeyCombo::parse(text).expect("parse");
            let rendered = combo.to_string();
            let reparsed = KeyCombo::parse(&rendered).expect("reparse rendered text");
            assert_eq!(combo, reparsed, "round trip failed for {text:?} -> {rendered:?}");
        }
    }

    #[test]
    fn test_display_uppercases_names() {
        let combo = KeyCombo::parse("ctrl+shift+a").expect("parse");
        assert_eq!(combo.to_string(), "SHIFT+CTRL+A");
    }

    #[test]
    fn test_display_falls_back_to_hex_for_unnamed_codes() {
        // 0xE8 is unassigned in the VK table.
        let combo = KeyCombo::new([0xE8u8]).expect("combo");
        assert_eq!(combo.to_string(), "0xE8");
    }

    #[test]
    fn test_from_event_with_non_modifier_appends_after_held_modifiers() {
        let combo = KeyCombo::from_event([0x10u8, 0x11u8], 0x41);
        assert_eq!(combo.codes(), &[0x10, 0x11, 0x41]);
    }

    #[test]
    fn test_from_event_with_modifier_merges_into_sorted_prefix() {
        // Alt (0x12) pressed while Shift (0x10) and RCtrl (0xA3) are held.
        let combo = KeyCombo::from_event([0x10u8, 0xA3u8], 0x12);
        assert_eq!(combo.codes(), &[0x10, 0x12, 0xA3]);
    }

    #[test]
    fn test_from_event_with_already_held_modifier_does_not_duplicate() {
        let combo = KeyCombo::from_event([0x10u8], 0x10);
        assert_eq!(combo.codes(), &[0x10]);
    }

    #[test]
    fn test_single_key_combo() {
        let combo = KeyCombo::single(0x14);
        assert_eq!(combo.codes(), &[0x14]);
        assert_eq!(combo.to_string(), "CAPSLOCK");
    }
}
