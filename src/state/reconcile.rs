//! Capturing live slots into a snapshot and applying a snapshot back.

use std::path::Path;

use thiserror::Error;

use super::codec::{LabelState, Snapshot};
use crate::config::{resolve_asset, Config, FlagItem, Inventory};
use crate::display::{DisplaySink, Handle, SlotId, EFFECT_CLEAR, EFFECT_DIMMED, HALF_OPACITY};
use crate::error::{Error, Result};

/// Snapshot entry that no longer matches the live layout. Logged and
/// collected; never aborts a restore.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriftWarning {
    #[error("{slot}: no live label for this slot, ignoring it")]
    UnknownSlot { slot: SlotId },

    #[error("{slot}: name mismatch, ignoring the label ('{live}', '{snapshot}')")]
    NameMismatch {
        slot: SlotId,
        live: String,
        snapshot: String,
    },

    #[error("{slot}: counter value {value} doesn't match its increment of {increment}")]
    CounterMisaligned {
        slot: SlotId,
        value: i32,
        increment: i32,
    },

    #[error("{slot}: {field} index {index} is out of range")]
    IndexOutOfRange {
        slot: SlotId,
        field: &'static str,
        index: i64,
    },
}

impl DriftWarning {
    /// Whether the whole slot was left untouched.
    pub fn skips_slot(&self) -> bool {
        matches!(
            self,
            DriftWarning::UnknownSlot { .. } | DriftWarning::NameMismatch { .. }
        )
    }
}

/// Outcome of applying a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Slots that were written.
    pub applied: usize,
    pub warnings: Vec<DriftWarning>,
}

impl RestoreReport {
    fn warn(&mut self, warning: DriftWarning) {
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Slots left untouched because of drift.
    pub fn skipped(&self) -> usize {
        self.warnings.iter().filter(|w| w.skips_slot()).count()
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

fn missing_inventory(index: i32) -> Error {
    Error::schema("Config", format!("active inventory {index} is not declared"))
}

/// Read the mutable state of every live slot of the active inventory.
pub fn capture(config: &Config, sink: &dyn DisplaySink) -> Result<Snapshot> {
    let inv = config
        .active_inventory()
        .ok_or_else(|| missing_inventory(config.active_inv))?;

    let mut snapshot = Snapshot {
        gomode_visibility: sink.effect_strength(Handle::GoMode) == Some(EFFECT_CLEAR),
        gomode_light_visibility: sink.is_visible(Handle::GoModeLight),
        labels: Vec::new(),
    };

    for slot in sink.slots() {
        let (Some(item), Some(label)) = (inv.items.get(slot.item), sink.label(slot)) else {
            tracing::warn!("Live label at {} has no item in inventory {}", slot, inv.index);
            continue;
        };

        snapshot.labels.push(LabelState {
            index: slot.item,
            pos_index: slot.pos,
            name: item.name.clone(),
            img_index: label.img_index,
            counter_value: item.counter.as_ref().map_or(0, |c| c.value),
            counter_show: item.counter.as_ref().is_some_and(|c| c.show),
            enabled: sink.effect_strength(Handle::Item(slot)) == Some(EFFECT_CLEAR),
            reward_index: label.reward_index,
            flag_index: item.flag_index,
            flag_text_index: label.flag_text_index,
            show_flag: sink.is_visible(Handle::Flag(slot)),
            show_extra_img: sink.is_visible(Handle::ExtraImage(slot)),
        });
    }

    Ok(snapshot)
}

/// Apply a snapshot onto the live slots of the active inventory.
///
/// Counter values are written as-is, bypassing [`crate::config::Counter::incr`].
/// Entries whose slot is gone or whose name changed are skipped.
pub fn restore(
    config: &mut Config,
    sink: &mut dyn DisplaySink,
    snapshot: &Snapshot,
) -> Result<RestoreReport> {
    let hide_if_disabled = config
        .gomode_settings
        .as_ref()
        .is_some_and(|g| g.hide_if_disabled);

    let active = config.active_inv;
    let flags = &config.flags;
    let base_dir = &config.base_dir;
    let inv = config
        .inventories
        .get_mut(&active)
        .ok_or_else(|| missing_inventory(active))?;

    apply_gomode(sink, snapshot, hide_if_disabled);

    let mut report = RestoreReport::default();
    for state in &snapshot.labels {
        if restore_slot(state, inv, flags, base_dir, sink, &mut report) {
            report.applied += 1;
        }
    }

    tracing::info!(
        "Restored {} of {} labels ({} warnings)",
        report.applied,
        snapshot.labels.len(),
        report.warnings.len()
    );
    Ok(report)
}

fn apply_gomode(sink: &mut dyn DisplaySink, snapshot: &Snapshot, hide_if_disabled: bool) {
    let visible = snapshot.gomode_visibility;
    if sink.has(Handle::GoMode) {
        let strength = if visible { EFFECT_CLEAR } else { EFFECT_DIMMED };
        sink.set_effect_strength(Handle::GoMode, strength);
        if hide_if_disabled {
            sink.set_visible(Handle::GoMode, visible);
        }
    }
    sink.set_visible(Handle::GoModeLight, snapshot.gomode_light_visibility);
}

/// Returns true if the slot was written.
fn restore_slot(
    state: &LabelState,
    inv: &mut Inventory,
    flags: &[FlagItem],
    base_dir: &Path,
    sink: &mut dyn DisplaySink,
    report: &mut RestoreReport,
) -> bool {
    let slot = SlotId::new(state.index, state.pos_index);

    let Some(item) = inv.items.get_mut(state.index) else {
        report.warn(DriftWarning::UnknownSlot { slot });
        return false;
    };
    if state.pos_index >= item.positions.len() {
        report.warn(DriftWarning::UnknownSlot { slot });
        return false;
    }
    let Some(label) = sink.label(slot) else {
        report.warn(DriftWarning::UnknownSlot { slot });
        return false;
    };
    if label.name != state.name {
        report.warn(DriftWarning::NameMismatch {
            slot,
            live: label.name.clone(),
            snapshot: state.name.clone(),
        });
        return false;
    }
    let position_tag = label.position_tag();

    if let Some(counter) = item.counter.as_mut() {
        counter.value = state.counter_value;
        counter.show = state.counter_show;

        if !counter.is_aligned() {
            report.warn(DriftWarning::CounterMisaligned {
                slot,
                value: counter.value,
                increment: counter.increment,
            });
        }

        let handle = Handle::Counter(slot);
        sink.set_visible(handle, counter.show);
        if counter.show {
            sink.set_text(handle, &counter.value.to_string());
            sink.set_text_style(handle, counter.text_settings_index, counter.is_max());
        }
    }

    // Negative indices keep the first image, dimmed
    let image = Handle::Item(slot);
    let path_index = usize::try_from(state.img_index).unwrap_or(0);
    match item.paths.get(path_index) {
        Some(path) => sink.set_pixmap(image, &resolve_asset(base_dir, Path::new(path))),
        None => report.warn(DriftWarning::IndexOutOfRange {
            slot,
            field: "image",
            index: i64::from(state.img_index),
        }),
    }
    if !state.enabled {
        sink.set_opacity(image, HALF_OPACITY);
    }

    if item.is_reward {
        if let Some(tag) = position_tag.filter(|&tag| tag < item.positions.len()) {
            let handle = Handle::Reward(SlotId::new(state.index, tag));
            if sink.has(handle) {
                match inv.rewards.items.get(state.reward_index) {
                    Some(reward) => {
                        sink.set_text(handle, &reward.name);
                        sink.set_text_style(handle, reward.text_settings_index, false);
                    }
                    None => report.warn(DriftWarning::IndexOutOfRange {
                        slot,
                        field: "reward",
                        index: state.reward_index as i64,
                    }),
                }
            }
        }
    }

    if sink.effect_strength(image).is_some() {
        let strength = if state.enabled { EFFECT_CLEAR } else { EFFECT_DIMMED };
        sink.set_effect_strength(image, strength);
    }

    item.flag_index = state.flag_index;
    let flag_handle = Handle::Flag(slot);
    if let Some(flag_index) = item.flag_index.filter(|_| sink.has(flag_handle)) {
        match flags.get(flag_index) {
            Some(flag) => match flag.texts.get(state.flag_text_index) {
                Some(text) => {
                    let is_max = !item.is_reward && flag.is_last_text(state.flag_text_index);
                    sink.set_text(flag_handle, text);
                    sink.set_text_style(flag_handle, flag.text_settings_index, is_max);
                }
                None => report.warn(DriftWarning::IndexOutOfRange {
                    slot,
                    field: "flag text",
                    index: state.flag_text_index as i64,
                }),
            },
            None => report.warn(DriftWarning::IndexOutOfRange {
                slot,
                field: "flag",
                index: flag_index as i64,
            }),
        }
    }
    sink.set_visible(flag_handle, state.show_flag);
    sink.set_visible(Handle::ExtraImage(slot), state.show_extra_img);

    if let Some(label) = sink.label_mut(slot) {
        label.img_index = state.img_index;
        if item.is_reward {
            label.reward_index = state.reward_index;
        }
        label.flag_text_index = state.flag_text_index;
    }

    true
}
