//! Persisted LED options record, in the shape the firmware stores it
//!
//! Hydration expands directional index lists to four editable slots and
//! turns packed colours into hex strings. Encoding does the reverse and
//! compacts the index lists.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use super::{
    CaseLedConfig, CaseLedType, Direction, GridGradientPreset, GridPause, GridSpeed,
    LedConfiguration, PlayerLedConfig, PlayerLedMode, RgbStripConfig,
};
use crate::buttons::{ButtonId, LedButtonMap};
use crate::codec::{
    color_to_int_or_default, expand_directional_indices, int_to_color,
    normalize_directional_indices,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LedOptionsRecord {
    pub brightness_maximum: i32,
    pub brightness_steps: i32,
    pub data_pin: i32,
    pub led_format: i32,
    pub led_layout: i32,
    pub leds_per_button: i32,
    pub turn_off_when_suspended: i32,
    pub pled_type: i32,
    pub pled_pin1: i32,
    pub pled_pin2: i32,
    pub pled_pin3: i32,
    pub pled_pin4: i32,
    pub pled_index1: i32,
    pub pled_index2: i32,
    pub pled_index3: i32,
    pub pled_index4: i32,
    pub pled_color: u32,
    #[serde(rename = "caseRGBType")]
    pub case_rgb_type: i32,
    #[serde(rename = "caseRGBIndex")]
    pub case_rgb_index: i32,
    #[serde(rename = "caseRGBCount")]
    pub case_rgb_count: i32,
    /// Button key → LED order index, `null` when unassigned
    pub led_button_map: BTreeMap<String, Option<i32>>,
    pub grid_gradient_color_a: u32,
    pub grid_gradient_color_b: u32,
    pub grid_button_press_color: u32,
    pub grid_gradient_speed: i32,
    pub grid_gradient_pause: i32,
    pub grid_lever_normal_color: u32,
    pub grid_lever_press_color: u32,
    pub grid_case_normal_color: u32,
    pub grid_case_lever_press_color: u32,
    pub grid_case_up_indices: Vec<i32>,
    pub grid_case_down_indices: Vec<i32>,
    pub grid_case_right_indices: Vec<i32>,
    pub grid_case_left_indices: Vec<i32>,
    /// Fields this editor does not manage, written back untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Default for LedOptionsRecord {
    fn default() -> Self {
        Self::encode(&LedConfiguration::default())
    }
}

impl LedOptionsRecord {
    /// Encode a configuration into a fresh record
    pub fn encode(config: &LedConfiguration) -> Self {
        let empty = Self {
            brightness_maximum: 0,
            brightness_steps: 0,
            data_pin: -1,
            led_format: 0,
            led_layout: 0,
            leds_per_button: 0,
            turn_off_when_suspended: 0,
            pled_type: -1,
            pled_pin1: -1,
            pled_pin2: -1,
            pled_pin3: -1,
            pled_pin4: -1,
            pled_index1: -1,
            pled_index2: -1,
            pled_index3: -1,
            pled_index4: -1,
            pled_color: 0,
            case_rgb_type: -1,
            case_rgb_index: -1,
            case_rgb_count: 0,
            led_button_map: BTreeMap::new(),
            grid_gradient_color_a: 0,
            grid_gradient_color_b: 0,
            grid_button_press_color: 0,
            grid_gradient_speed: 0,
            grid_gradient_pause: 0,
            grid_lever_normal_color: 0,
            grid_lever_press_color: 0,
            grid_case_normal_color: 0,
            grid_case_lever_press_color: 0,
            grid_case_up_indices: Vec::new(),
            grid_case_down_indices: Vec::new(),
            grid_case_right_indices: Vec::new(),
            grid_case_left_indices: Vec::new(),
            extra: BTreeMap::new(),
        };
        empty.with_configuration(config)
    }

    /// Overwrite the managed fields with `config`, keeping unknown fields
    pub fn with_configuration(mut self, config: &LedConfiguration) -> Self {
        let strip = &config.strip;
        self.brightness_maximum = strip.brightness_maximum;
        self.brightness_steps = strip.brightness_steps;
        self.data_pin = strip.data_pin;
        self.led_format = strip.led_format;
        self.led_layout = strip.led_layout;
        self.leds_per_button = strip.leds_per_button;
        self.turn_off_when_suspended = i32::from(strip.turn_off_when_suspended);

        let player = &config.player;
        self.pled_type = player.mode.raw();
        [self.pled_pin1, self.pled_pin2, self.pled_pin3, self.pled_pin4] = player.pins;
        [
            self.pled_index1,
            self.pled_index2,
            self.pled_index3,
            self.pled_index4,
        ] = player.indices;
        self.pled_color = color_to_int_or_default(&player.color);

        self.case_rgb_type = config.case.led_type.raw();
        self.case_rgb_index = config.case.index;
        self.case_rgb_count = config.case.count;

        self.led_button_map = ButtonId::ALL
            .iter()
            .map(|&id| {
                let index = config
                    .button_map
                    .index_of(id)
                    .and_then(|i| i32::try_from(i).ok());
                (id.key().to_string(), index)
            })
            .collect();

        let grid = &config.grid;
        self.grid_gradient_color_a = color_to_int_or_default(&grid.color_a);
        self.grid_gradient_color_b = color_to_int_or_default(&grid.color_b);
        self.grid_button_press_color = color_to_int_or_default(&grid.button_press_color);
        self.grid_lever_normal_color = color_to_int_or_default(&grid.lever_normal_color);
        self.grid_lever_press_color = color_to_int_or_default(&grid.lever_press_color);
        self.grid_case_normal_color = color_to_int_or_default(&grid.case_normal_color);
        self.grid_case_lever_press_color = color_to_int_or_default(&grid.case_press_color);
        self.grid_gradient_speed = grid.speed.raw();
        self.grid_gradient_pause = grid.pause.raw();
        self.grid_case_up_indices = normalize_directional_indices(grid.slots(Direction::Up));
        self.grid_case_down_indices = normalize_directional_indices(grid.slots(Direction::Down));
        self.grid_case_right_indices = normalize_directional_indices(grid.slots(Direction::Right));
        self.grid_case_left_indices = normalize_directional_indices(grid.slots(Direction::Left));

        self
    }

    /// Build the editor aggregate from this record
    pub fn hydrate(&self) -> LedConfiguration {
        let strip = RgbStripConfig {
            data_pin: self.data_pin,
            led_format: self.led_format,
            led_layout: self.led_layout,
            leds_per_button: self.leds_per_button,
            brightness_maximum: self.brightness_maximum,
            brightness_steps: self.brightness_steps,
            turn_off_when_suspended: self.turn_off_when_suspended != 0,
        };

        let mode = PlayerLedMode::from_raw(self.pled_type).unwrap_or_else(|| {
            warn!("Unknown player LED type {}, treating as off", self.pled_type);
            PlayerLedMode::Off
        });
        let player = PlayerLedConfig {
            mode,
            pins: [self.pled_pin1, self.pled_pin2, self.pled_pin3, self.pled_pin4],
            indices: [
                self.pled_index1,
                self.pled_index2,
                self.pled_index3,
                self.pled_index4,
            ],
            color: int_to_color(self.pled_color),
        };

        let led_type = CaseLedType::from_raw(self.case_rgb_type).unwrap_or_else(|| {
            warn!("Unknown case LED type {}, treating as off", self.case_rgb_type);
            CaseLedType::Off
        });
        let case = CaseLedConfig {
            led_type,
            index: self.case_rgb_index,
            count: self.case_rgb_count,
        };

        let grid = GridGradientPreset {
            color_a: int_to_color(self.grid_gradient_color_a),
            color_b: int_to_color(self.grid_gradient_color_b),
            button_press_color: int_to_color(self.grid_button_press_color),
            lever_normal_color: int_to_color(self.grid_lever_normal_color),
            lever_press_color: int_to_color(self.grid_lever_press_color),
            case_normal_color: int_to_color(self.grid_case_normal_color),
            case_press_color: int_to_color(self.grid_case_lever_press_color),
            speed: GridSpeed::from_raw(self.grid_gradient_speed),
            pause: GridPause::from_raw(self.grid_gradient_pause),
            case_up_indices: expand_directional_indices(&self.grid_case_up_indices),
            case_down_indices: expand_directional_indices(&self.grid_case_down_indices),
            case_right_indices: expand_directional_indices(&self.grid_case_right_indices),
            case_left_indices: expand_directional_indices(&self.grid_case_left_indices),
        };

        let raw_map = self
            .led_button_map
            .iter()
            .filter_map(|(key, index)| match key.parse::<ButtonId>() {
                Ok(id) => Some((id, *index)),
                Err(e) => {
                    warn!("Dropping LED button map entry: {}", e);
                    None
                }
            });
        let button_map = LedButtonMap::from_raw(raw_map, &ButtonId::ALL);

        LedConfiguration {
            strip,
            player,
            case,
            grid,
            button_map,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{GridColor, LedEdit};
    use serde_json::json;

    fn sample_json() -> serde_json::Value {
        json!({
            "brightnessMaximum": 128,
            "brightnessSteps": 4,
            "dataPin": 28,
            "ledFormat": 1,
            "ledLayout": 3,
            "ledsPerButton": 2,
            "turnOffWhenSuspended": 1,
            "pledType": 1,
            "pledPin1": -1, "pledPin2": -1, "pledPin3": -1, "pledPin4": -1,
            "pledIndex1": 12, "pledIndex2": 13, "pledIndex3": 14, "pledIndex4": 15,
            "pledColor": 0x00ff00,
            "caseRGBType": 1,
            "caseRGBIndex": 16,
            "caseRGBCount": 8,
            "ledButtonMap": { "B1": 1, "B2": 0, "Up": null, "Turbo": 3 },
            "gridGradientColorA": 0x0000ff,
            "gridGradientColorB": 0xff00ff,
            "gridButtonPressColor": 0xffffff,
            "gridGradientSpeed": 2,
            "gridGradientPause": 1,
            "gridLeverNormalColor": 0x202020,
            "gridLeverPressColor": 0x00ffff,
            "gridCaseNormalColor": 0,
            "gridCaseLeverPressColor": 0xff8000,
            "gridCaseUpIndices": [3, 7],
            "gridCaseDownIndices": [],
            "gridCaseRightIndices": [0, 1, 2, 3],
            "gridCaseLeftIndices": [5],
            "animationExtra": 42
        })
    }

    #[test]
    fn test_hydrate() {
        let record: LedOptionsRecord = serde_json::from_value(sample_json()).unwrap();
        let config = record.hydrate();

        assert_eq!(config.strip.data_pin, 28);
        assert!(config.strip.turn_off_when_suspended);
        assert_eq!(config.player.mode, PlayerLedMode::Rgb);
        assert_eq!(config.player.indices, [12, 13, 14, 15]);
        assert_eq!(config.player.color, "#00ff00");
        assert_eq!(config.case.led_type, CaseLedType::Linked);
        assert_eq!(config.grid.speed, GridSpeed::Fast);
        assert_eq!(config.grid.pause, GridPause::OneSecond);
        assert_eq!(config.grid.case_up_indices, ["3", "7", "", ""]);
        assert_eq!(config.grid.case_down_indices, ["", "", "", ""]);
        assert_eq!(config.button_map.index_of(ButtonId::B2), Some(0));
        assert_eq!(config.button_map.index_of(ButtonId::B1), Some(1));
        assert_eq!(config.first_available_rgb_index(), 4);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let record: LedOptionsRecord = serde_json::from_value(json!({ "dataPin": 4 })).unwrap();
        assert_eq!(record.data_pin, 4);
        assert_eq!(record.brightness_maximum, 255);
        assert_eq!(record.grid_lever_normal_color, 0x202020);
    }

    #[test]
    fn test_unknown_enum_values_coerced() {
        let record: LedOptionsRecord = serde_json::from_value(json!({
            "pledType": 7,
            "caseRGBType": 9,
            "gridGradientSpeed": 4,
        }))
        .unwrap();
        let config = record.hydrate();

        assert_eq!(config.player.mode, PlayerLedMode::Off);
        assert_eq!(config.case.led_type, CaseLedType::Off);
        assert_eq!(config.grid.speed, GridSpeed::Normal);
    }

    #[test]
    fn test_encode_compacts_and_packs() {
        let config = LedConfiguration::default().apply_all([
            LedEdit::DirectionSlot {
                direction: Direction::Up,
                slot: 0,
                text: "3".to_string(),
            },
            LedEdit::DirectionSlot {
                direction: Direction::Up,
                slot: 2,
                text: "7".to_string(),
            },
            LedEdit::GridColor {
                which: GridColor::CasePress,
                hex: String::new(),
            },
            LedEdit::AssignButton {
                id: ButtonId::R1,
                position: 0,
            },
        ]);
        let record = LedOptionsRecord::encode(&config);

        assert_eq!(record.grid_case_up_indices, vec![3, 7]);
        assert_eq!(record.grid_case_lever_press_color, 0);
        assert_eq!(record.pled_color, 0x00ff00);
        assert_eq!(record.led_button_map.get("R1"), Some(&Some(0)));
        assert_eq!(record.led_button_map.get("B1"), Some(&None));
        assert_eq!(record.led_button_map.len(), ButtonId::ALL.len());
    }

    #[test]
    fn test_round_trip_keeps_unknown_fields() {
        let record: LedOptionsRecord = serde_json::from_value(sample_json()).unwrap();
        let rewritten = record.clone().with_configuration(&record.hydrate());

        assert_eq!(rewritten.extra.get("animationExtra"), Some(&json!(42)));
        assert_eq!(rewritten.grid_case_up_indices, vec![3, 7]);
        assert_eq!(rewritten.pled_color, record.pled_color);
        assert!(!rewritten.led_button_map.contains_key("Turbo"));

        let value = serde_json::to_value(&rewritten).unwrap();
        assert_eq!(value["caseRGBIndex"], json!(16));
        assert_eq!(value["animationExtra"], json!(42));
    }
}
