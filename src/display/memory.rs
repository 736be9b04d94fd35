//! In-memory display used when no renderer is attached.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use super::{DisplaySink, Handle, SlotId, SlotLabel, EFFECT_CLEAR, EFFECT_DIMMED, HALF_OPACITY};
use crate::config::Config;

/// Last state written to one widget.
#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    pub visible: bool,
    pub effect_strength: Option<f32>,
    pub pixmap: Option<PathBuf>,
    pub opacity: f32,
    pub text: String,
    /// `(text_settings_index, is_max)` of the last applied style.
    pub text_style: Option<(usize, bool)>,
}

impl Default for Widget {
    fn default() -> Self {
        Self {
            visible: true,
            effect_strength: None,
            pixmap: None,
            opacity: 1.0,
            text: String::new(),
            text_style: None,
        }
    }
}

/// Display that records every write and answers reads from memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    fonts: Vec<PathBuf>,
    labels: BTreeMap<SlotId, SlotLabel>,
    widgets: HashMap<Handle, Widget>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the widgets a renderer would create for the active inventory
    /// and the go-mode indicator.
    pub fn for_config(config: &Config) -> Self {
        let mut sink = Self::new();

        if let Some(gomode) = &config.gomode_settings {
            sink.insert_widget(
                Handle::GoMode,
                Widget {
                    visible: !gomode.hide_if_disabled,
                    effect_strength: Some(EFFECT_DIMMED),
                    pixmap: Some(config.asset_path(&gomode.path)),
                    ..Default::default()
                },
            );
            if let Some(light_path) = &gomode.light_path {
                sink.insert_widget(
                    Handle::GoModeLight,
                    Widget {
                        visible: false,
                        pixmap: Some(config.asset_path(light_path)),
                        ..Default::default()
                    },
                );
            }
        }

        let Some(inv) = config.active_inventory() else {
            return sink;
        };

        for item in &inv.items {
            for pos in 0..item.positions.len() {
                let slot = SlotId::new(item.index, pos);
                sink.insert_label(slot, SlotLabel::new(&item.name, pos));

                let (strength, opacity) = if item.enabled {
                    (EFFECT_CLEAR, 1.0)
                } else {
                    (EFFECT_DIMMED, HALF_OPACITY)
                };
                sink.insert_widget(
                    Handle::Item(slot),
                    Widget {
                        effect_strength: Some(strength),
                        pixmap: item.paths.first().map(|p| config.asset_path(p)),
                        opacity,
                        ..Default::default()
                    },
                );

                if let Some(counter) = &item.counter {
                    sink.insert_widget(
                        Handle::Counter(slot),
                        Widget {
                            visible: counter.show,
                            text: counter.value.to_string(),
                            text_style: Some((counter.text_settings_index, counter.is_max())),
                            ..Default::default()
                        },
                    );
                }

                if let Some(flag) = item.flag_index.and_then(|i| config.flag(i)) {
                    sink.insert_widget(
                        Handle::Flag(slot),
                        Widget {
                            visible: !flag.hidden,
                            text: flag.texts.first().cloned().unwrap_or_default(),
                            text_style: Some((flag.text_settings_index, false)),
                            ..Default::default()
                        },
                    );
                }

                if item.use_checkmark {
                    if let Some(check) = &inv.song_check_path {
                        sink.insert_widget(
                            Handle::ExtraImage(slot),
                            Widget {
                                visible: false,
                                pixmap: Some(config.asset_path(check)),
                                ..Default::default()
                            },
                        );
                    }
                }

                if item.is_reward {
                    sink.insert_widget(Handle::Reward(slot), Widget::default());
                }
            }
        }

        sink
    }

    pub fn insert_label(&mut self, slot: SlotId, label: SlotLabel) {
        self.labels.insert(slot, label);
    }

    pub fn remove_label(&mut self, slot: SlotId) -> Option<SlotLabel> {
        self.labels.remove(&slot)
    }

    pub fn insert_widget(&mut self, handle: Handle, widget: Widget) {
        self.widgets.insert(handle, widget);
    }

    pub fn widget(&self, handle: Handle) -> Option<&Widget> {
        self.widgets.get(&handle)
    }

    pub fn widget_mut(&mut self, handle: Handle) -> Option<&mut Widget> {
        self.widgets.get_mut(&handle)
    }

    /// Font files registered so far, in registration order.
    pub fn fonts(&self) -> &[PathBuf] {
        &self.fonts
    }
}

impl DisplaySink for MemorySink {
    fn register_font(&mut self, path: &Path) -> bool {
        self.fonts.push(path.to_path_buf());
        true
    }

    fn slots(&self) -> Vec<SlotId> {
        self.labels.keys().copied().collect()
    }

    fn label(&self, slot: SlotId) -> Option<&SlotLabel> {
        self.labels.get(&slot)
    }

    fn label_mut(&mut self, slot: SlotId) -> Option<&mut SlotLabel> {
        self.labels.get_mut(&slot)
    }

    fn has(&self, handle: Handle) -> bool {
        self.widgets.contains_key(&handle)
    }

    fn effect_strength(&self, handle: Handle) -> Option<f32> {
        self.widgets.get(&handle).and_then(|w| w.effect_strength)
    }

    fn set_effect_strength(&mut self, handle: Handle, strength: f32) {
        if let Some(w) = self.widgets.get_mut(&handle) {
            w.effect_strength = Some(strength);
        }
    }

    fn is_visible(&self, handle: Handle) -> bool {
        self.widgets.get(&handle).is_some_and(|w| w.visible)
    }

    fn set_visible(&mut self, handle: Handle, visible: bool) {
        if let Some(w) = self.widgets.get_mut(&handle) {
            w.visible = visible;
        }
    }

    fn set_pixmap(&mut self, handle: Handle, path: &Path) {
        if let Some(w) = self.widgets.get_mut(&handle) {
            w.pixmap = Some(path.to_path_buf());
            w.opacity = 1.0;
        }
    }

    fn set_opacity(&mut self, handle: Handle, opacity: f32) {
        if let Some(w) = self.widgets.get_mut(&handle) {
            w.opacity = opacity;
        }
    }

    fn set_text(&mut self, handle: Handle, text: &str) {
        if let Some(w) = self.widgets.get_mut(&handle) {
            w.text = text.to_string();
        }
    }

    fn set_text_style(&mut self, handle: Handle, text_settings_index: usize, is_max: bool) {
        if let Some(w) = self.widgets.get_mut(&handle) {
            w.text_style = Some((text_settings_index, is_max));
        }
    }
}
