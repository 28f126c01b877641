//! Cross-field validation of the LED configuration
//!
//! Runs as one pass over the aggregate and reports every rejected field.
//! Fields that do not apply to the current player LED or case mode are inert.

use serde::Serialize;
use std::ops::RangeInclusive;

use super::{CaseLedType, Direction, GridColor, LedConfiguration, PlayerLedMode, MAX_LED_LAYOUT};
use crate::codec::{parse_hex_color, IndexSlot};
use crate::error::{ValidationErrors, Violation};
use crate::pins::{PinRegistry, MAX_GPIO_PIN};

/// Non-blocking hint shown next to a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Advisory {
    pub field: String,
    pub value: i32,
    /// Suggested lowest value: the first LED after the button LEDs
    pub first_available: u32,
}

fn check_range(
    errors: &mut ValidationErrors,
    field: &str,
    value: i32,
    range: RangeInclusive<i32>,
) {
    if !range.contains(&value) {
        errors.add(
            field,
            Violation::OutOfRange {
                min: i64::from(*range.start()),
                max: i64::from(*range.end()),
            },
        );
    }
}

fn check_color(errors: &mut ValidationErrors, field: &str, text: &str) {
    if !text.trim().is_empty() && parse_hex_color(text).is_none() {
        errors.add(
            field,
            Violation::InvalidColor {
                text: text.to_string(),
            },
        );
    }
}

fn color_field(which: GridColor) -> &'static str {
    match which {
        GridColor::GradientA => "gridGradientColorA",
        GridColor::GradientB => "gridGradientColorB",
        GridColor::ButtonPress => "gridButtonPressColor",
        GridColor::LeverNormal => "gridLeverNormalColor",
        GridColor::LeverPress => "gridLeverPressColor",
        GridColor::CaseNormal => "gridCaseNormalColor",
        GridColor::CasePress => "gridCaseLeverPressColor",
    }
}

fn direction_field(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => "gridCaseUpIndices",
        Direction::Down => "gridCaseDownIndices",
        Direction::Right => "gridCaseRightIndices",
        Direction::Left => "gridCaseLeftIndices",
    }
}

/// Validate the whole configuration against the pin registry
pub fn validate<R: PinRegistry + ?Sized>(
    config: &LedConfiguration,
    pins: &R,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let strip = &config.strip;

    check_range(&mut errors, "dataPin", strip.data_pin, -1..=MAX_GPIO_PIN);
    if strip.data_pin >= 0 && pins.is_claimed(strip.data_pin) {
        errors.add("dataPin", Violation::PinInUse { pin: strip.data_pin });
    }

    check_range(&mut errors, "brightnessMaximum", strip.brightness_maximum, 0..=255);
    check_range(&mut errors, "brightnessSteps", strip.brightness_steps, 1..=10);

    if strip.format().is_none() {
        errors.add(
            "ledFormat",
            Violation::NotInCatalog {
                value: strip.led_format,
            },
        );
    }
    if !(0..=MAX_LED_LAYOUT).contains(&strip.led_layout) {
        errors.add(
            "ledLayout",
            Violation::NotInCatalog {
                value: strip.led_layout,
            },
        );
    }
    if strip.leds_per_button < 1 {
        errors.add("ledsPerButton", Violation::BelowMinimum { min: 1 });
    }

    let player = &config.player;
    match player.mode {
        PlayerLedMode::Off => {}
        PlayerLedMode::Pwm => {
            for (slot, &pin) in player.pins.iter().enumerate() {
                let field = format!("pledPin{}", slot + 1);

                if !(0..=MAX_GPIO_PIN).contains(&pin) {
                    check_range(&mut errors, &field, pin, 0..=MAX_GPIO_PIN);
                } else if pins.is_claimed(pin) {
                    errors.add(field, Violation::PinInUse { pin });
                } else if pin == strip.data_pin {
                    errors.add(
                        field,
                        Violation::PinConflict {
                            pin,
                            other: "dataPin".to_string(),
                        },
                    );
                } else if let Some(earlier) = player.pins[..slot].iter().position(|&p| p == pin) {
                    errors.add(
                        field,
                        Violation::PinConflict {
                            pin,
                            other: format!("pledPin{}", earlier + 1),
                        },
                    );
                }
            }
        }
        PlayerLedMode::Rgb => {
            for (slot, &index) in player.indices.iter().enumerate() {
                if index < 0 {
                    errors.add(
                        format!("pledIndex{}", slot + 1),
                        Violation::BelowMinimum { min: 0 },
                    );
                }
            }
            check_color(&mut errors, "pledColor", &player.color);
        }
    }

    if config.case.led_type != CaseLedType::Off {
        check_range(&mut errors, "caseRGBCount", config.case.count, 0..=100);
        check_range(&mut errors, "caseRGBIndex", config.case.index, -1..=100);
    }

    for which in GridColor::ALL {
        check_color(&mut errors, color_field(which), config.grid.color(which));
    }

    for direction in Direction::ALL {
        for (slot, text) in config.grid.slots(direction).iter().enumerate() {
            if IndexSlot::parse(text) == IndexSlot::Invalid {
                errors.add(
                    format!("{}[{}]", direction_field(direction), slot),
                    Violation::InvalidIndex { text: text.clone() },
                );
            }
        }
    }

    errors.into_result()
}

/// Values that are accepted but probably overlap the button LEDs
pub fn advisories(config: &LedConfiguration) -> Vec<Advisory> {
    let first_available = config.first_available_rgb_index();
    let below = |value: i32| value >= 0 && (value as u32) < first_available;
    let mut hints = Vec::new();

    if config.player.mode == PlayerLedMode::Rgb {
        for (slot, &index) in config.player.indices.iter().enumerate() {
            if below(index) {
                hints.push(Advisory {
                    field: format!("pledIndex{}", slot + 1),
                    value: index,
                    first_available,
                });
            }
        }
    }

    if config.case.led_type != CaseLedType::Off && below(config.case.index) {
        hints.push(Advisory {
            field: "caseRGBIndex".to_string(),
            value: config.case.index,
            first_available,
        });
    }

    hints
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buttons::ButtonId;
    use crate::model::{CaseLedType, LedEdit};
    use crate::pins::UsedPins;

    fn registry(pins: &[i32]) -> UsedPins {
        pins.iter().copied().collect()
    }

    fn errors_for(config: &LedConfiguration, claimed: &[i32]) -> ValidationErrors {
        validate(config, &registry(claimed)).unwrap_err()
    }

    #[test]
    fn test_default_configuration_is_valid() {
        assert!(validate(&LedConfiguration::default(), &registry(&[])).is_ok());
    }

    #[test]
    fn test_claimed_data_pin() {
        let config = LedConfiguration::default().apply(LedEdit::DataPin(5));
        let errors = errors_for(&config, &[5]);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("dataPin"), Some(&Violation::PinInUse { pin: 5 }));
    }

    #[test]
    fn test_disabled_data_pin_skips_registry() {
        let config = LedConfiguration::default();
        assert!(validate(&config, &registry(&[-1, 0])).is_ok());
    }

    #[test]
    fn test_data_pin_range() {
        let config = LedConfiguration::default().apply(LedEdit::DataPin(30));
        let errors = errors_for(&config, &[]);
        assert_eq!(
            errors.get("dataPin"),
            Some(&Violation::OutOfRange { min: -1, max: 29 })
        );
    }

    #[test]
    fn test_strip_bounds() {
        let config = LedConfiguration::default().apply_all([
            LedEdit::BrightnessMaximum(256),
            LedEdit::BrightnessSteps(0),
            LedEdit::LedFormat(4),
            LedEdit::LedLayout(39),
            LedEdit::LedsPerButton(0),
        ]);
        let errors = errors_for(&config, &[]);

        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(
            fields,
            vec![
                "brightnessMaximum",
                "brightnessSteps",
                "ledFormat",
                "ledLayout",
                "ledsPerButton"
            ]
        );
    }

    #[test]
    fn test_player_fields_inert_when_off() {
        let config = LedConfiguration::default().apply_all([
            LedEdit::PlayerMode(PlayerLedMode::Off),
            LedEdit::PlayerPin { slot: 0, pin: -40 },
            LedEdit::PlayerPin { slot: 1, pin: 5 },
            LedEdit::PlayerIndex { slot: 2, index: -3 },
            LedEdit::PlayerColor("garbage".to_string()),
        ]);
        assert!(validate(&config, &registry(&[5])).is_ok());
    }

    #[test]
    fn test_pwm_pins() {
        let config = LedConfiguration::default().apply_all([
            LedEdit::DataPin(10),
            LedEdit::PlayerMode(PlayerLedMode::Pwm),
            LedEdit::PlayerPin { slot: 0, pin: 2 },
            LedEdit::PlayerPin { slot: 1, pin: 10 },
            LedEdit::PlayerPin { slot: 2, pin: 2 },
            LedEdit::PlayerPin { slot: 3, pin: -1 },
        ]);
        let errors = errors_for(&config, &[]);

        assert!(!errors.contains("pledPin1"));
        assert_eq!(
            errors.get("pledPin2"),
            Some(&Violation::PinConflict {
                pin: 10,
                other: "dataPin".to_string()
            })
        );
        assert_eq!(
            errors.get("pledPin3"),
            Some(&Violation::PinConflict {
                pin: 2,
                other: "pledPin1".to_string()
            })
        );
        assert_eq!(
            errors.get("pledPin4"),
            Some(&Violation::OutOfRange { min: 0, max: 29 })
        );
    }

    #[test]
    fn test_pwm_pin_claimed_elsewhere() {
        let config = LedConfiguration::default().apply_all([
            LedEdit::PlayerMode(PlayerLedMode::Pwm),
            LedEdit::PlayerPin { slot: 0, pin: 3 },
            LedEdit::PlayerPin { slot: 1, pin: 4 },
            LedEdit::PlayerPin { slot: 2, pin: 6 },
            LedEdit::PlayerPin { slot: 3, pin: 7 },
        ]);
        let errors = errors_for(&config, &[6]);

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("pledPin3"), Some(&Violation::PinInUse { pin: 6 }));
    }

    #[test]
    fn test_rgb_indices_and_color() {
        let config = LedConfiguration::default().apply_all([
            LedEdit::PlayerMode(PlayerLedMode::Rgb),
            LedEdit::PlayerIndex { slot: 0, index: 4 },
            LedEdit::PlayerIndex { slot: 1, index: 5 },
            LedEdit::PlayerIndex { slot: 2, index: -1 },
            LedEdit::PlayerIndex { slot: 3, index: 7 },
            LedEdit::PlayerColor("#12345".to_string()),
        ]);
        let errors = errors_for(&config, &[]);

        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.get("pledIndex3"),
            Some(&Violation::BelowMinimum { min: 0 })
        );
        assert!(errors.contains("pledColor"));
    }

    #[test]
    fn test_rgb_index_below_button_leds_is_advisory_only() {
        let config = LedConfiguration::default().apply_all([
            LedEdit::AssignButton {
                id: ButtonId::B1,
                position: 0,
            },
            LedEdit::AssignButton {
                id: ButtonId::B2,
                position: 1,
            },
            LedEdit::PlayerMode(PlayerLedMode::Rgb),
            LedEdit::PlayerIndex { slot: 0, index: 1 },
            LedEdit::PlayerIndex { slot: 1, index: 4 },
            LedEdit::PlayerIndex { slot: 2, index: 5 },
            LedEdit::PlayerIndex { slot: 3, index: 6 },
        ]);

        assert!(validate(&config, &registry(&[])).is_ok());
        assert_eq!(
            advisories(&config),
            vec![Advisory {
                field: "pledIndex1".to_string(),
                value: 1,
                first_available: 4,
            }]
        );
    }

    #[test]
    fn test_case_bounds_only_when_enabled() {
        let config = LedConfiguration::default().apply_all([
            LedEdit::CaseType(CaseLedType::Off),
            LedEdit::CaseCount(500),
            LedEdit::CaseIndex(-9),
        ]);
        assert!(validate(&config, &registry(&[])).is_ok());

        let config = config.apply(LedEdit::CaseType(CaseLedType::Linked));
        let errors = errors_for(&config, &[]);
        assert!(errors.contains("caseRGBCount"));
        assert!(errors.contains("caseRGBIndex"));
    }

    #[test]
    fn test_direction_slots() {
        let config = LedConfiguration::default().apply_all([
            LedEdit::DirectionSlot {
                direction: Direction::Left,
                slot: 1,
                text: "abc".to_string(),
            },
            LedEdit::DirectionSlot {
                direction: Direction::Left,
                slot: 2,
                text: "4".to_string(),
            },
        ]);
        let errors = errors_for(&config, &[]);

        assert_eq!(errors.len(), 1);
        assert!(errors.contains("gridCaseLeftIndices[1]"));
    }

    #[test]
    fn test_grid_colors() {
        let config = LedConfiguration::default().apply_all([
            LedEdit::GridColor {
                which: GridColor::LeverPress,
                hex: "#zzzzzz".to_string(),
            },
            LedEdit::GridColor {
                which: GridColor::GradientA,
                hex: String::new(),
            },
        ]);
        let errors = errors_for(&config, &[]);

        assert_eq!(errors.len(), 1);
        assert!(errors.contains("gridLeverPressColor"));
    }
}
