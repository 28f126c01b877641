//! Conversions between editor values and the packed values the firmware stores
//!
//! Colours are edited as `#rrggbb` strings and persisted as `0x00RRGGBB`
//! integers. The white channel of GRBW/RGBW strips is never encoded: it is
//! written as zero and truncated away on decode.
//!
//! Directional index lists are edited as four text slots and persisted as a
//! compacted list of non-negative integers.

use image::Rgb;
use tracing::warn;

use crate::error::{LedConfigError, Result};

/// Number of editable slots per directional index list
pub const DIRECTION_SLOTS: usize = 4;

/// Colour substituted for empty or malformed input on encode
pub const DEFAULT_COLOR: u32 = 0x000000;

const RGB_MASK: u32 = 0x00FF_FFFF;

/// Parse a hex colour string ("#00ff88" or "00ff88") into channels
pub fn parse_hex_color(hex: &str) -> Option<Rgb<u8>> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some(Rgb([r, g, b]))
}

/// Pack channels as `0x00RRGGBB`
pub fn rgb_to_int(color: Rgb<u8>) -> u32 {
    (u32::from(color[0]) << 16) | (u32::from(color[1]) << 8) | u32::from(color[2])
}

/// Unpack the lower 24 bits of a packed colour
pub fn int_to_rgb(value: u32) -> Rgb<u8> {
    let value = value & RGB_MASK;
    Rgb([(value >> 16) as u8, (value >> 8) as u8, value as u8])
}

/// Convert a hex colour string to its packed integer form
pub fn color_to_int(hex: &str) -> Result<u32> {
    parse_hex_color(hex)
        .map(rgb_to_int)
        .ok_or_else(|| LedConfigError::InvalidColorFormat(hex.to_string()))
}

/// Encode a colour for persistence, substituting black for empty or bad input
pub fn color_to_int_or_default(hex: &str) -> u32 {
    if hex.trim().is_empty() {
        return DEFAULT_COLOR;
    }

    match color_to_int(hex) {
        Ok(value) => value,
        Err(e) => {
            warn!("{}, using default color", e);
            DEFAULT_COLOR
        }
    }
}

/// Convert a packed colour to `#rrggbb`. Bits above the lower 24 are dropped.
pub fn int_to_color(value: u32) -> String {
    let rgb = int_to_rgb(value);
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

/// Interpretation of a single editable index slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSlot {
    Blank,
    Index(i32),
    Invalid,
}

impl IndexSlot {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return IndexSlot::Blank;
        }

        match text.parse::<i32>() {
            Ok(value) if value >= 0 => IndexSlot::Index(value),
            _ => IndexSlot::Invalid,
        }
    }
}

/// Compact editable slots into the persisted list, keeping slot order and
/// dropping blank, negative and non-numeric entries
pub fn normalize_directional_indices<S: AsRef<str>>(slots: &[S]) -> Vec<i32> {
    slots
        .iter()
        .filter_map(|slot| match IndexSlot::parse(slot.as_ref()) {
            IndexSlot::Index(value) => Some(value),
            IndexSlot::Blank | IndexSlot::Invalid => None,
        })
        .collect()
}

/// Pad a persisted list to exactly four editable slots, truncating extras.
/// Only used to hydrate the editor; blank slots are not recoverable.
pub fn expand_directional_indices(values: &[i32]) -> [String; DIRECTION_SLOTS] {
    let mut slots: [String; DIRECTION_SLOTS] = Default::default();
    for (slot, value) in slots.iter_mut().zip(values) {
        *slot = value.to_string();
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_to_int() {
        assert_eq!(color_to_int("#ff0000").unwrap(), 0xFF0000);
        assert_eq!(color_to_int("00FF00").unwrap(), 0x00FF00);
        assert_eq!(color_to_int("#0000ff").unwrap(), 0x0000FF);
        assert_eq!(color_to_int("#ff8000").unwrap(), 0xFF8000);
    }

    #[test]
    fn test_color_to_int_rejects_malformed() {
        for bad in ["", "#", "#fff", "#gg0000", "#ff00000", "+f0000", "##ff0000"] {
            assert!(
                matches!(color_to_int(bad), Err(LedConfigError::InvalidColorFormat(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_color_default_substitution() {
        assert_eq!(color_to_int_or_default(""), DEFAULT_COLOR);
        assert_eq!(color_to_int_or_default("   "), DEFAULT_COLOR);
        assert_eq!(color_to_int_or_default("not a color"), DEFAULT_COLOR);
        assert_eq!(color_to_int_or_default("#202020"), 0x202020);
    }

    #[test]
    fn test_int_to_color() {
        assert_eq!(int_to_color(0x00FF00), "#00ff00");
        assert_eq!(int_to_color(0), "#000000");
        // White channel and anything above 24 bits is truncated
        assert_eq!(int_to_color(0xAA12_3456), "#123456");
    }

    #[test]
    fn test_color_round_trip_over_24_bits() {
        for x in (0..(1u32 << 24)).step_by(4099).chain([0xFFFFFF]) {
            assert_eq!(color_to_int(&int_to_color(x)).unwrap(), x);
        }
    }

    #[test]
    fn test_rgb_channels() {
        assert_eq!(int_to_rgb(0x102030), Rgb([0x10, 0x20, 0x30]));
        assert_eq!(rgb_to_int(Rgb([0x10, 0x20, 0x30])), 0x102030);
    }

    #[test]
    fn test_normalize_drops_blanks_and_invalid() {
        assert_eq!(normalize_directional_indices(&["3", "", "7", ""]), vec![3, 7]);
        assert_eq!(normalize_directional_indices(&["x", "-2", " 4 ", "0"]), vec![4, 0]);
        assert!(normalize_directional_indices(&["", "", "", ""]).is_empty());
    }

    #[test]
    fn test_normalize_is_referentially_transparent() {
        let slots = ["1", "bad", "", "9"];
        assert_eq!(
            normalize_directional_indices(&slots),
            normalize_directional_indices(&slots)
        );
    }

    #[test]
    fn test_expand_pads_and_truncates() {
        assert_eq!(expand_directional_indices(&[3, 7]), ["3", "7", "", ""]);
        assert_eq!(expand_directional_indices(&[]), ["", "", "", ""]);
        assert_eq!(expand_directional_indices(&[1, 2, 3, 4, 5]), ["1", "2", "3", "4"]);
    }

    #[test]
    fn test_compact_expand_compact_restores_entries() {
        for v in [vec![], vec![5], vec![3, 7], vec![0, 1, 2, 3]] {
            assert_eq!(normalize_directional_indices(&expand_directional_indices(&v)), v);
        }
    }

    #[test]
    fn test_expand_compact_expand_loses_blank_positions() {
        // Blank slots are not recoverable: the compacted list has no positions
        let slots = ["", "3", "", "7"];
        let reexpanded = expand_directional_indices(&normalize_directional_indices(&slots));
        assert_eq!(reexpanded, ["3", "7", "", ""]);
        assert_ne!(reexpanded, slots);
    }

    #[test]
    fn test_index_slot_parse() {
        assert_eq!(IndexSlot::parse(""), IndexSlot::Blank);
        assert_eq!(IndexSlot::parse("12"), IndexSlot::Index(12));
        assert_eq!(IndexSlot::parse("-1"), IndexSlot::Invalid);
        assert_eq!(IndexSlot::parse("1.5"), IndexSlot::Invalid);
    }
}
