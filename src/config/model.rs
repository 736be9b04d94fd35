//! Typed schema entities built from a layout document.

use serde::Serialize;

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Split a `0xRRGGBB` integer into components. Bits above 24 are dropped.
    pub fn unpack(value: i64) -> Self {
        Self {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    pub fn pack(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub index: i32,
    pub name: String,
    /// Font file, relative to the config directory.
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextSettings {
    pub index: i32,
    pub name: String,
    /// Position in [`super::Config::fonts`].
    pub font: usize,
    pub size: f32,
    pub bold: bool,
    pub color: Color,
    pub color_max: Color,
}

impl TextSettings {
    /// Color to draw with; `is_max` selects the "maxed out" color.
    pub fn color_for(&self, is_max: bool) -> Color {
        if is_max { self.color_max } else { self.color }
    }
}

/// Numeric counter shown over an item.
///
/// The counter rests hidden at `min` until the first increment. Stepping past
/// either bound hides it again and leaves `value` at the out-of-range step
/// (or unchanged if that step would overflow); the next call starts a fresh
/// cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Counter {
    pub min: i32,
    pub max: i32,
    pub increment: i32,
    /// Position in [`super::Config::text_settings`].
    pub text_settings_index: usize,
    pub value: i32,
    pub show: bool,
}

impl Counter {
    pub fn new(min: i32, max: i32, increment: i32, text_settings_index: usize) -> Self {
        Self {
            min,
            max,
            increment,
            text_settings_index,
            value: min,
            show: false,
        }
    }

    pub fn incr(&mut self) {
        if self.show {
            match self.value.checked_add(self.increment) {
                Some(value) => {
                    self.value = value;
                    if value > self.max {
                        self.show = false;
                    }
                }
                // Overflow counts as stepping past the bound
                None => self.show = false,
            }
        } else {
            self.value = self.min;
            self.show = true;
        }
    }

    pub fn decr(&mut self) {
        if self.show {
            match self.value.checked_sub(self.increment) {
                Some(value) => {
                    self.value = value;
                    if value < self.min {
                        self.show = false;
                    }
                }
                None => self.show = false,
            }
        } else {
            self.value = self.max;
            self.show = true;
        }
    }

    pub fn is_max(&self) -> bool {
        self.value == self.max
    }

    /// Whether `value` sits on a step reachable from zero by `increment`.
    pub fn is_aligned(&self) -> bool {
        self.value.checked_rem(self.increment).is_none_or(|rem| rem == 0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventoryItem {
    /// Position of the item inside its inventory.
    pub index: usize,
    pub name: String,
    /// Image per state; never empty.
    pub paths: Vec<String>,
    pub counter: Option<Counter>,
    /// One slot per position; never empty.
    pub positions: Vec<Pos>,
    pub enabled: bool,
    pub scale_content: bool,
    pub is_reward: bool,
    /// Position in [`super::Config::flags`]; rewritten by session restore.
    pub flag_index: Option<usize>,
    pub use_checkmark: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RewardItem {
    pub name: String,
    pub text_settings_index: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Rewards {
    pub items: Vec<RewardItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlagItem {
    /// Texts cycled through by the flag; never empty.
    pub texts: Vec<String>,
    pub pos: Pos,
    pub text_settings_index: usize,
    pub hidden: bool,
}

impl FlagItem {
    pub fn is_last_text(&self, text_index: usize) -> bool {
        text_index + 1 == self.texts.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Inventory {
    pub index: i32,
    pub name: String,
    pub background: String,
    pub song_check_path: Option<String>,
    pub items: Vec<InventoryItem>,
    pub rewards: Rewards,
}

impl Inventory {
    /// Number of slots (item positions) across all items.
    pub fn slot_count(&self) -> usize {
        self.items.iter().map(|item| item.positions.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoModeSettings {
    pub pos: Pos,
    pub hide_if_disabled: bool,
    pub path: String,
    pub light_path: Option<String>,
    /// Set exactly when `light_path` is.
    pub light_pos: Option<Pos>,
}

impl GoModeSettings {
    pub fn has_light(&self) -> bool {
        self.light_path.is_some()
    }
}
