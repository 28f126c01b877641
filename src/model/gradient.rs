//! Grid gradient animation preset

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

use super::CaseLedConfig;
use crate::codec::{normalize_directional_indices, DIRECTION_SLOTS};

/// Size of the firmware frame buffer
pub const FRAME_LEDS: i32 = 100;

/// Gradient sweep speed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridSpeed {
    Slow = 0,
    #[default]
    Normal = 1,
    Fast = 2,
}

impl GridSpeed {
    /// Values outside the catalog fall back to Normal, like the firmware does
    pub fn from_raw(value: i32) -> Self {
        match value {
            0 => GridSpeed::Slow,
            2 => GridSpeed::Fast,
            _ => GridSpeed::Normal,
        }
    }

    pub fn raw(self) -> i32 {
        self as i32
    }

    /// Time between animation frames
    pub fn frame_interval(self) -> Duration {
        match self {
            GridSpeed::Slow => Duration::from_millis(120),
            GridSpeed::Normal => Duration::from_millis(80),
            GridSpeed::Fast => Duration::from_millis(60),
        }
    }
}

/// Pause between gradient sweeps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridPause {
    #[default]
    None = 0,
    OneSecond = 1,
    TwoSeconds = 2,
    ThreeSeconds = 3,
}

impl GridPause {
    /// Values outside the catalog mean no pause
    pub fn from_raw(value: i32) -> Self {
        match value {
            1 => GridPause::OneSecond,
            2 => GridPause::TwoSeconds,
            3 => GridPause::ThreeSeconds,
            _ => GridPause::None,
        }
    }

    pub fn raw(self) -> i32 {
        self as i32
    }

    pub fn duration(self) -> Duration {
        Duration::from_secs(self.raw() as u64)
    }
}

/// Lever direction that lights a set of case LEDs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Right,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Right,
        Direction::Left,
    ];
}

/// The preset's colour fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridColor {
    GradientA,
    GradientB,
    ButtonPress,
    LeverNormal,
    LeverPress,
    CaseNormal,
    CasePress,
}

impl GridColor {
    pub const ALL: [GridColor; 7] = [
        GridColor::GradientA,
        GridColor::GradientB,
        GridColor::ButtonPress,
        GridColor::LeverNormal,
        GridColor::LeverPress,
        GridColor::CaseNormal,
        GridColor::CasePress,
    ];
}

/// Editable slots for one direction
pub type IndexSlots = [String; DIRECTION_SLOTS];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridGradientPreset {
    pub color_a: String,
    pub color_b: String,
    pub button_press_color: String,
    pub lever_normal_color: String,
    pub lever_press_color: String,
    pub case_normal_color: String,
    pub case_press_color: String,
    pub speed: GridSpeed,
    pub pause: GridPause,
    pub case_up_indices: IndexSlots,
    pub case_down_indices: IndexSlots,
    pub case_right_indices: IndexSlots,
    pub case_left_indices: IndexSlots,
}

impl Default for GridGradientPreset {
    fn default() -> Self {
        Self {
            color_a: "#0000ff".to_string(),
            color_b: "#ff00ff".to_string(),
            button_press_color: "#ffffff".to_string(),
            lever_normal_color: "#202020".to_string(),
            lever_press_color: "#00ffff".to_string(),
            case_normal_color: "#000000".to_string(),
            case_press_color: "#ff8000".to_string(),
            speed: GridSpeed::Normal,
            pause: GridPause::None,
            case_up_indices: Default::default(),
            case_down_indices: Default::default(),
            case_right_indices: Default::default(),
            case_left_indices: Default::default(),
        }
    }
}

impl GridGradientPreset {
    pub fn color(&self, which: GridColor) -> &str {
        match which {
            GridColor::GradientA => &self.color_a,
            GridColor::GradientB => &self.color_b,
            GridColor::ButtonPress => &self.button_press_color,
            GridColor::LeverNormal => &self.lever_normal_color,
            GridColor::LeverPress => &self.lever_press_color,
            GridColor::CaseNormal => &self.case_normal_color,
            GridColor::CasePress => &self.case_press_color,
        }
    }

    pub fn color_mut(&mut self, which: GridColor) -> &mut String {
        match which {
            GridColor::GradientA => &mut self.color_a,
            GridColor::GradientB => &mut self.color_b,
            GridColor::ButtonPress => &mut self.button_press_color,
            GridColor::LeverNormal => &mut self.lever_normal_color,
            GridColor::LeverPress => &mut self.lever_press_color,
            GridColor::CaseNormal => &mut self.case_normal_color,
            GridColor::CasePress => &mut self.case_press_color,
        }
    }

    pub fn slots(&self, direction: Direction) -> &IndexSlots {
        match direction {
            Direction::Up => &self.case_up_indices,
            Direction::Down => &self.case_down_indices,
            Direction::Right => &self.case_right_indices,
            Direction::Left => &self.case_left_indices,
        }
    }

    pub fn slots_mut(&mut self, direction: Direction) -> &mut IndexSlots {
        match direction {
            Direction::Up => &mut self.case_up_indices,
            Direction::Down => &mut self.case_down_indices,
            Direction::Right => &mut self.case_right_indices,
            Direction::Left => &mut self.case_left_indices,
        }
    }

    /// Absolute case LED indices lit when `direction` is pressed.
    ///
    /// Offsets are relative to the case start index; targets past the case
    /// LED count or the frame buffer are skipped.
    pub fn case_targets(&self, direction: Direction, case: &CaseLedConfig) -> Vec<u32> {
        if case.index < 0 || case.count <= 0 || case.index >= FRAME_LEDS {
            return Vec::new();
        }

        let start = i64::from(case.index);
        let limit = i64::from(case.count).min(i64::from(FRAME_LEDS) - start);

        normalize_directional_indices(self.slots(direction))
            .into_iter()
            .map(|offset| start + i64::from(offset))
            .filter(|&target| target < start + limit)
            .map(|target| target as u32)
            .collect::<BTreeSet<u32>>()
            .into_iter()
            .collect()
    }
}
