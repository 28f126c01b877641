//! Controller inputs that can carry an RGB LED, and their display labels

pub mod assignment;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use assignment::{first_available_rgb_index, ButtonViews, LedButtonMap};

/// A physical input, independent of how it is labelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ButtonId {
    Up,
    Down,
    Left,
    Right,
    B1,
    B2,
    B3,
    B4,
    L1,
    R1,
    L2,
    R2,
    S1,
    S2,
    L3,
    R3,
    A1,
    A2,
}

impl ButtonId {
    /// All inputs in catalog (declaration) order
    pub const ALL: [ButtonId; 18] = [
        ButtonId::Up,
        ButtonId::Down,
        ButtonId::Left,
        ButtonId::Right,
        ButtonId::B1,
        ButtonId::B2,
        ButtonId::B3,
        ButtonId::B4,
        ButtonId::L1,
        ButtonId::R1,
        ButtonId::L2,
        ButtonId::R2,
        ButtonId::S1,
        ButtonId::S2,
        ButtonId::L3,
        ButtonId::R3,
        ButtonId::A1,
        ButtonId::A2,
    ];

    /// Key used in the persisted button map
    pub fn key(&self) -> &'static str {
        match self {
            ButtonId::Up => "Up",
            ButtonId::Down => "Down",
            ButtonId::Left => "Left",
            ButtonId::Right => "Right",
            ButtonId::B1 => "B1",
            ButtonId::B2 => "B2",
            ButtonId::B3 => "B3",
            ButtonId::B4 => "B4",
            ButtonId::L1 => "L1",
            ButtonId::R1 => "R1",
            ButtonId::L2 => "L2",
            ButtonId::R2 => "R2",
            ButtonId::S1 => "S1",
            ButtonId::S2 => "S2",
            ButtonId::L3 => "L3",
            ButtonId::R3 => "R3",
            ButtonId::A1 => "A1",
            ButtonId::A2 => "A2",
        }
    }
}

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ButtonId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ButtonId::ALL
            .iter()
            .copied()
            .find(|id| id.key() == s)
            .ok_or_else(|| format!("unknown button '{}'", s))
    }
}

/// Naming scheme used when showing buttons to the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelStyle {
    #[default]
    Gp2040,
    Xinput,
    Switch,
    Ps4,
    Arcade,
}

/// A catalog entry: the input and its label in the active style
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonLabel {
    pub id: ButtonId,
    pub label: String,
}

/// Supplies the ordered, labelled universe of inputs
pub trait ButtonCatalog {
    fn buttons(&self) -> Vec<ButtonLabel>;

    fn label_for(&self, id: ButtonId) -> Option<String> {
        self.buttons()
            .into_iter()
            .find(|b| b.id == id)
            .map(|b| b.label)
    }
}

/// Built-in catalog covering every [`ButtonId`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StandardCatalog {
    pub style: LabelStyle,
    /// Swap the Share and Touchpad labels (PS4 style only)
    pub swap_tp_share_labels: bool,
}

impl StandardCatalog {
    pub fn new(style: LabelStyle, swap_tp_share_labels: bool) -> Self {
        Self {
            style,
            swap_tp_share_labels,
        }
    }
}

impl ButtonCatalog for StandardCatalog {
    fn buttons(&self) -> Vec<ButtonLabel> {
        let labels = match self.style {
            LabelStyle::Gp2040 => &GP2040_LABELS,
            LabelStyle::Xinput => &XINPUT_LABELS,
            LabelStyle::Switch => &SWITCH_LABELS,
            LabelStyle::Ps4 => &PS4_LABELS,
            LabelStyle::Arcade => &ARCADE_LABELS,
        };

        ButtonId::ALL
            .iter()
            .zip(labels.iter())
            .map(|(&id, &label)| {
                let label = match (self.style, self.swap_tp_share_labels, id) {
                    (LabelStyle::Ps4, true, ButtonId::S1) => PS4_LABELS[17],
                    (LabelStyle::Ps4, true, ButtonId::A2) => PS4_LABELS[12],
                    _ => label,
                };
                ButtonLabel {
                    id,
                    label: label.to_string(),
                }
            })
            .collect()
    }
}

// Labels follow ButtonId::ALL order
const GP2040_LABELS: [&str; 18] = [
    "Up", "Down", "Left", "Right", "B1", "B2", "B3", "B4", "L1", "R1", "L2", "R2", "S1", "S2",
    "L3", "R3", "A1", "A2",
];

const XINPUT_LABELS: [&str; 18] = [
    "Up", "Down", "Left", "Right", "A", "B", "X", "Y", "LB", "RB", "LT", "RT", "Back", "Start",
    "LS", "RS", "Guide", "(A2)",
];

const SWITCH_LABELS: [&str; 18] = [
    "Up", "Down", "Left", "Right", "B", "A", "Y", "X", "L", "R", "ZL", "ZR", "Minus", "Plus",
    "LS", "RS", "Home", "Capture",
];

const PS4_LABELS: [&str; 18] = [
    "Up", "Down", "Left", "Right", "Cross", "Circle", "Square", "Triangle", "L1", "R1", "L2",
    "R2", "Share", "Options", "L3", "R3", "PS", "Touchpad",
];

const ARCADE_LABELS: [&str; 18] = [
    "Up", "Down", "Left", "Right", "K1", "K2", "P1", "P2", "P4", "P3", "K4", "K3", "Select",
    "Start", "LS", "RS", "Home", "(A2)",
];
