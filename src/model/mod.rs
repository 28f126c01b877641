//! LED configuration aggregate and its edit transitions
//!
//! The editor never patches the aggregate in place: each [`LedEdit`] turns
//! the current [`LedConfiguration`] into a new one.

pub mod gradient;
pub mod record;
pub mod validate;

use serde::{Deserialize, Serialize};

use crate::buttons::{first_available_rgb_index, ButtonId, ButtonViews, LedButtonMap};

pub use gradient::{Direction, GridColor, GridGradientPreset, GridPause, GridSpeed};
pub use record::LedOptionsRecord;
pub use validate::{advisories, validate, Advisory};

/// Number of player LEDs
pub const PLAYER_LEDS: usize = 4;

/// Highest value in the LED layout catalog
pub const MAX_LED_LAYOUT: i32 = 38;

/// Pixel channel order of the RGB strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedFormat {
    Grb = 0,
    Rgb = 1,
    Grbw = 2,
    Rgbw = 3,
}

impl LedFormat {
    pub fn from_raw(value: i32) -> Option<Self> {
        match value {
            0 => Some(LedFormat::Grb),
            1 => Some(LedFormat::Rgb),
            2 => Some(LedFormat::Grbw),
            3 => Some(LedFormat::Rgbw),
            _ => None,
        }
    }

    /// Formats with a white channel (always driven at zero)
    pub fn has_white(self) -> bool {
        matches!(self, LedFormat::Grbw | LedFormat::Rgbw)
    }
}

/// Player LED driver
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerLedMode {
    #[default]
    Off = -1,
    Pwm = 0,
    Rgb = 1,
}

impl PlayerLedMode {
    pub fn from_raw(value: i32) -> Option<Self> {
        match value {
            -1 => Some(PlayerLedMode::Off),
            0 => Some(PlayerLedMode::Pwm),
            1 => Some(PlayerLedMode::Rgb),
            _ => None,
        }
    }

    pub fn raw(self) -> i32 {
        self as i32
    }
}

/// Case ambient lighting behaviour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseLedType {
    Off = -1,
    #[default]
    Ambient = 0,
    Linked = 1,
}

impl CaseLedType {
    pub fn from_raw(value: i32) -> Option<Self> {
        match value {
            -1 => Some(CaseLedType::Off),
            0 => Some(CaseLedType::Ambient),
            1 => Some(CaseLedType::Linked),
            _ => None,
        }
    }

    pub fn raw(self) -> i32 {
        self as i32
    }
}

/// Addressable strip settings. Numeric fields hold what the user typed;
/// the validator decides whether they are acceptable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RgbStripConfig {
    /// GPIO data pin, -1 disables the strip
    pub data_pin: i32,
    pub led_format: i32,
    pub led_layout: i32,
    pub leds_per_button: i32,
    pub brightness_maximum: i32,
    pub brightness_steps: i32,
    pub turn_off_when_suspended: bool,
}

impl Default for RgbStripConfig {
    fn default() -> Self {
        Self {
            data_pin: -1,
            led_format: LedFormat::Grb as i32,
            led_layout: 0,
            leds_per_button: 2,
            brightness_maximum: 255,
            brightness_steps: 5,
            turn_off_when_suspended: false,
        }
    }
}

impl RgbStripConfig {
    pub fn format(&self) -> Option<LedFormat> {
        LedFormat::from_raw(self.led_format)
    }
}

/// Player LED settings. Pins and indices are kept across mode switches;
/// only the fields of the active mode are validated and meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerLedConfig {
    pub mode: PlayerLedMode,
    pub pins: [i32; PLAYER_LEDS],
    pub indices: [i32; PLAYER_LEDS],
    pub color: String,
}

impl Default for PlayerLedConfig {
    fn default() -> Self {
        Self {
            mode: PlayerLedMode::Off,
            pins: [-1; PLAYER_LEDS],
            indices: [-1; PLAYER_LEDS],
            color: "#00ff00".to_string(),
        }
    }
}

/// The player LED fields that apply in the current mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PlayerLedFields {
    Off,
    Pwm { pins: [i32; PLAYER_LEDS] },
    Rgb { indices: [i32; PLAYER_LEDS], color: String },
}

impl PlayerLedFields {
    /// Editor labels for the active fields
    pub fn labels(&self) -> Vec<String> {
        match self {
            PlayerLedFields::Off => Vec::new(),
            PlayerLedFields::Pwm { .. } => (1..=PLAYER_LEDS)
                .map(|n| format!("PLED #{} GPIO Pin", n))
                .collect(),
            PlayerLedFields::Rgb { .. } => (1..=PLAYER_LEDS)
                .map(|n| format!("PLED #{} Index", n))
                .collect(),
        }
    }
}

impl PlayerLedConfig {
    pub fn fields(&self) -> PlayerLedFields {
        match self.mode {
            PlayerLedMode::Off => PlayerLedFields::Off,
            PlayerLedMode::Pwm => PlayerLedFields::Pwm { pins: self.pins },
            PlayerLedMode::Rgb => PlayerLedFields::Rgb {
                indices: self.indices,
                color: self.color.clone(),
            },
        }
    }

    /// GPIO pins this configuration drives
    pub fn active_pins(&self) -> Vec<i32> {
        match self.mode {
            PlayerLedMode::Pwm => self.pins.iter().copied().filter(|&p| p >= 0).collect(),
            PlayerLedMode::Off | PlayerLedMode::Rgb => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseLedConfig {
    pub led_type: CaseLedType,
    /// First case LED on the strip, -1 when unset
    pub index: i32,
    pub count: i32,
}

impl Default for CaseLedConfig {
    fn default() -> Self {
        Self {
            led_type: CaseLedType::Ambient,
            index: -1,
            count: 0,
        }
    }
}

/// The whole LED configuration edited in one session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedConfiguration {
    pub strip: RgbStripConfig,
    pub player: PlayerLedConfig,
    pub case: CaseLedConfig,
    pub grid: GridGradientPreset,
    pub button_map: LedButtonMap,
}

/// A single user edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "edit", content = "value", rename_all = "snake_case")]
pub enum LedEdit {
    DataPin(i32),
    LedFormat(i32),
    LedLayout(i32),
    LedsPerButton(i32),
    BrightnessMaximum(i32),
    BrightnessSteps(i32),
    TurnOffWhenSuspended(bool),
    PlayerMode(PlayerLedMode),
    PlayerPin { slot: usize, pin: i32 },
    PlayerIndex { slot: usize, index: i32 },
    PlayerColor(String),
    CaseType(CaseLedType),
    CaseIndex(i32),
    CaseCount(i32),
    GridColor { which: GridColor, hex: String },
    GridSpeed(GridSpeed),
    GridPause(GridPause),
    DirectionSlot { direction: Direction, slot: usize, text: String },
    /// Result of a drag-and-drop between or within the two button lists
    ReorderButtons {
        available: Vec<ButtonId>,
        assigned: Vec<ButtonId>,
    },
    AssignButton { id: ButtonId, position: usize },
    UnassignButton { id: ButtonId },
    MoveAssigned { from: usize, to: usize },
}

impl LedConfiguration {
    /// Apply an edit, returning the updated configuration.
    ///
    /// Slot numbers outside their array leave the configuration unchanged.
    pub fn apply(mut self, edit: LedEdit) -> Self {
        let catalog = &ButtonId::ALL;

        match edit {
            LedEdit::DataPin(pin) => self.strip.data_pin = pin,
            LedEdit::LedFormat(format) => self.strip.led_format = format,
            LedEdit::LedLayout(layout) => self.strip.led_layout = layout,
            LedEdit::LedsPerButton(count) => self.strip.leds_per_button = count,
            LedEdit::BrightnessMaximum(value) => self.strip.brightness_maximum = value,
            LedEdit::BrightnessSteps(value) => self.strip.brightness_steps = value,
            LedEdit::TurnOffWhenSuspended(value) => self.strip.turn_off_when_suspended = value,
            LedEdit::PlayerMode(mode) => self.player.mode = mode,
            LedEdit::PlayerPin { slot, pin } => {
                if let Some(p) = self.player.pins.get_mut(slot) {
                    *p = pin;
                }
            }
            LedEdit::PlayerIndex { slot, index } => {
                if let Some(i) = self.player.indices.get_mut(slot) {
                    *i = index;
                }
            }
            LedEdit::PlayerColor(hex) => self.player.color = hex,
            LedEdit::CaseType(led_type) => self.case.led_type = led_type,
            LedEdit::CaseIndex(index) => self.case.index = index,
            LedEdit::CaseCount(count) => self.case.count = count,
            LedEdit::GridColor { which, hex } => *self.grid.color_mut(which) = hex,
            LedEdit::GridSpeed(speed) => self.grid.speed = speed,
            LedEdit::GridPause(pause) => self.grid.pause = pause,
            LedEdit::DirectionSlot {
                direction,
                slot,
                text,
            } => {
                if let Some(s) = self.grid.slots_mut(direction).get_mut(slot) {
                    *s = text;
                }
            }
            LedEdit::ReorderButtons {
                available,
                assigned,
            } => self.button_map = self.button_map.reorder(&available, &assigned),
            LedEdit::AssignButton { id, position } => {
                self.button_map = self.button_map.assign(id, position, catalog)
            }
            LedEdit::UnassignButton { id } => {
                self.button_map = self.button_map.unassign(id, catalog)
            }
            LedEdit::MoveAssigned { from, to } => {
                self.button_map = self.button_map.move_assigned(from, to, catalog)
            }
        }

        self
    }

    /// Apply edits in order
    pub fn apply_all<I: IntoIterator<Item = LedEdit>>(self, edits: I) -> Self {
        edits.into_iter().fold(self, LedConfiguration::apply)
    }

    pub fn views(&self, catalog: &[ButtonId]) -> ButtonViews {
        self.button_map.derive_views(catalog)
    }

    /// First strip index after the button LEDs; the suggested start for
    /// RGB player LEDs
    pub fn first_available_rgb_index(&self) -> u32 {
        let per_button = u32::try_from(self.strip.leds_per_button).unwrap_or(0);
        first_available_rgb_index(self.button_map.assigned_count(), per_button)
    }

    /// Pins owned by this configuration, excluded from the "claimed
    /// elsewhere" registry
    pub fn own_pins(&self) -> Vec<i32> {
        let mut pins = self.player.active_pins();
        if self.strip.data_pin >= 0 {
            pins.push(self.strip.data_pin);
        }
        pins
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ButtonId::*;

    #[test]
    fn test_defaults() {
        let config = LedConfiguration::default();
        assert_eq!(config.strip.data_pin, -1);
        assert_eq!(config.strip.leds_per_button, 2);
        assert_eq!(config.player.mode, PlayerLedMode::Off);
        assert_eq!(config.case.led_type, CaseLedType::Ambient);
        assert_eq!(config.grid.case_up_indices, ["", "", "", ""]);
        assert_eq!(config.first_available_rgb_index(), 0);
    }

    #[test]
    fn test_apply_returns_new_value() {
        let before = LedConfiguration::default();
        let after = before.clone().apply(LedEdit::DataPin(28));

        assert_eq!(before.strip.data_pin, -1);
        assert_eq!(after.strip.data_pin, 28);
        assert_ne!(before, after);
    }

    #[test]
    fn test_apply_ignores_out_of_range_slots() {
        let config = LedConfiguration::default();
        let after = config.clone().apply_all([
            LedEdit::PlayerPin { slot: 4, pin: 3 },
            LedEdit::DirectionSlot {
                direction: Direction::Up,
                slot: 9,
                text: "1".to_string(),
            },
        ]);
        assert_eq!(after, config);
    }

    #[test]
    fn test_drag_into_assigned_updates_first_index() {
        let config = LedConfiguration::default().apply_all([
            LedEdit::ReorderButtons {
                available: vec![],
                assigned: vec![B1, B2],
            },
            LedEdit::LedsPerButton(2),
        ]);
        assert_eq!(config.first_available_rgb_index(), 4);

        let mut views = config.views(&ButtonId::ALL);
        views.available.retain(|&b| b != B3);
        views.assigned.push(B3);

        let config = config.apply(LedEdit::ReorderButtons {
            available: views.available,
            assigned: views.assigned,
        });

        assert_eq!(config.views(&ButtonId::ALL).assigned, vec![B1, B2, B3]);
        assert_eq!(config.button_map.index_of(B3), Some(2));
        assert_eq!(config.first_available_rgb_index(), 6);
    }

    #[test]
    fn test_leds_per_button_change_recomputes_first_index() {
        let config = LedConfiguration::default().apply_all([
            LedEdit::AssignButton { id: Up, position: 0 },
            LedEdit::AssignButton { id: Down, position: 1 },
            LedEdit::LedsPerButton(3),
        ]);
        assert_eq!(config.first_available_rgb_index(), 6);

        let config = config.apply(LedEdit::LedsPerButton(-4));
        assert_eq!(config.first_available_rgb_index(), 0);
    }

    #[test]
    fn test_player_fields_follow_mode() {
        let mut player = PlayerLedConfig {
            pins: [2, 3, 4, 5],
            indices: [10, 11, 12, 13],
            ..PlayerLedConfig::default()
        };

        assert_eq!(player.fields(), PlayerLedFields::Off);
        assert!(player.fields().labels().is_empty());
        assert!(player.active_pins().is_empty());

        player.mode = PlayerLedMode::Pwm;
        assert_eq!(player.fields(), PlayerLedFields::Pwm { pins: [2, 3, 4, 5] });
        assert_eq!(player.fields().labels()[0], "PLED #1 GPIO Pin");
        assert_eq!(player.active_pins(), vec![2, 3, 4, 5]);

        player.mode = PlayerLedMode::Rgb;
        assert_eq!(player.fields().labels()[3], "PLED #4 Index");
        assert!(player.active_pins().is_empty());
    }

    #[test]
    fn test_edit_deserializes_from_json() {
        let edit: LedEdit =
            serde_json::from_str(r#"{"edit":"player_pin","value":{"slot":1,"pin":7}}"#).unwrap();
        assert_eq!(edit, LedEdit::PlayerPin { slot: 1, pin: 7 });

        let edit: LedEdit = serde_json::from_str(r#"{"edit":"data_pin","value":12}"#).unwrap();
        assert_eq!(edit, LedEdit::DataPin(12));
    }

    #[test]
    fn test_own_pins() {
        let config = LedConfiguration::default().apply_all([
            LedEdit::DataPin(28),
            LedEdit::PlayerMode(PlayerLedMode::Pwm),
            LedEdit::PlayerPin { slot: 0, pin: 14 },
        ]);
        assert_eq!(config.own_pins(), vec![14, 28]);
    }

    #[test]
    fn test_white_channel_is_zero_for_every_format() {
        for raw in 0..4 {
            let format = LedFormat::from_raw(raw).unwrap();
            assert_eq!(format.has_white(), raw >= 2);

            let config = LedConfiguration::default().apply_all([
                LedEdit::LedFormat(raw),
                LedEdit::PlayerColor("#12ab34".to_string()),
            ]);
            let mut record = LedOptionsRecord::encode(&config);
            assert_eq!(record.pled_color, 0x0012_ab34);

            // A white byte written by something else is dropped on load
            record.pled_color |= 0xff00_0000;
            assert_eq!(record.hydrate().player.color, "#12ab34");
        }
    }
}
