//! Boundary to the rendering layer.
//!
//! The tracker core never draws anything itself. It writes images, texts and
//! visibility into a [`DisplaySink`] and reads back the few signals a session
//! snapshot needs. [`MemorySink`] keeps everything in memory and backs the
//! command-line tool and the tests.

mod memory;

use std::path::Path;

pub use memory::{MemorySink, Widget};

/// Opacity applied to the image of a disabled slot.
pub const HALF_OPACITY: f32 = 0.5;

/// Effect strength of an un-dimmed (enabled) label.
pub const EFFECT_CLEAR: f32 = 0.0;

/// Effect strength of a dimmed (disabled) label.
pub const EFFECT_DIMMED: f32 = 1.0;

/// One rendered label location: an item and one of its positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId {
    pub item: usize,
    pub pos: usize,
}

impl SlotId {
    pub fn new(item: usize, pos: usize) -> Self {
        Self { item, pos }
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "item {} pos {}", self.item, self.pos)
    }
}

/// Addressable widget on the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    GoMode,
    GoModeLight,
    /// Item image of a slot.
    Item(SlotId),
    Counter(SlotId),
    Flag(SlotId),
    /// Secondary image (checkmark) drawn over a slot.
    ExtraImage(SlotId),
    /// Reward text attached to a slot.
    Reward(SlotId),
}

/// Per-slot bookkeeping held by a live item label.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SlotLabel {
    /// Item name shown by the label; snapshots are matched against it.
    pub name: String,
    /// Widget name, tagged with `_pos_<n>` for the position it renders.
    pub object_name: String,
    /// Current image; negative values encode a dimmed first image.
    pub img_index: i32,
    pub reward_index: usize,
    pub flag_text_index: usize,
}

impl SlotLabel {
    pub fn new(name: &str, pos: usize) -> Self {
        Self {
            name: name.to_string(),
            object_name: format!("{name}_pos_{pos}"),
            ..Default::default()
        }
    }

    /// Position this label is tagged with, from its `_pos_<n>` suffix.
    pub fn position_tag(&self) -> Option<usize> {
        let (_, tag) = self.object_name.rsplit_once("_pos_")?;
        tag.parse().ok()
    }
}

/// Rendering capability the core writes into.
///
/// Setters on a handle the display does not have are ignored.
pub trait DisplaySink {
    /// Register a font file with the text renderer. Returns false on failure.
    fn register_font(&mut self, path: &Path) -> bool;

    /// Slots that currently have a live label, in ascending order.
    fn slots(&self) -> Vec<SlotId>;

    fn label(&self, slot: SlotId) -> Option<&SlotLabel>;

    fn label_mut(&mut self, slot: SlotId) -> Option<&mut SlotLabel>;

    /// Whether the widget exists.
    fn has(&self, handle: Handle) -> bool;

    /// Strength of the dimming effect, `None` if no effect is attached.
    fn effect_strength(&self, handle: Handle) -> Option<f32>;

    fn set_effect_strength(&mut self, handle: Handle, strength: f32);

    fn is_visible(&self, handle: Handle) -> bool;

    fn set_visible(&mut self, handle: Handle, visible: bool);

    /// Replace the widget image. Resets its opacity.
    fn set_pixmap(&mut self, handle: Handle, path: &Path);

    fn set_opacity(&mut self, handle: Handle, opacity: f32);

    fn set_text(&mut self, handle: Handle, text: &str);

    /// Apply a text style from the config's text settings.
    fn set_text_style(&mut self, handle: Handle, text_settings_index: usize, is_max: bool);
}
