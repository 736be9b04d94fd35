//! Session snapshot text format.
//!
//! A snapshot file is a fixed warning banner followed by blank-line separated
//! blocks: one `Global Settings:` block and one `Label #NN:` block per slot,
//! each holding tab-indented `key = value` lines. Booleans are written as
//! `True`/`False`, the optional flag index as an integer or `None`.

use std::fmt::Write;

use crate::error::{Error, Result};

/// Banner written at the top of every snapshot and stripped before parsing.
pub const WARNING_TEXT: &str = "\
!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!
!!! WARNING: DO NOT EDIT UNLESS YOU KNOW WHAT YOU ARE DOING !!!
!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!!

";

/// Mutable run-time fields of one slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LabelState {
    /// Item index inside the active inventory.
    pub index: usize,
    /// Position index inside the item's positions.
    pub pos_index: usize,
    /// Item name at capture time, checked again on restore.
    pub name: String,
    pub img_index: i32,
    pub counter_value: i32,
    pub counter_show: bool,
    pub enabled: bool,
    pub reward_index: usize,
    pub flag_index: Option<usize>,
    pub flag_text_index: usize,
    pub show_flag: bool,
    pub show_extra_img: bool,
}

/// Everything a snapshot file stores.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    pub gomode_visibility: bool,
    pub gomode_light_visibility: bool,
    pub labels: Vec<LabelState>,
}

fn bool_literal(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

impl Snapshot {
    /// Render the snapshot file, banner included.
    pub fn to_text(&self) -> String {
        let mut out = String::from(WARNING_TEXT);

        out.push_str("Global Settings:\n");
        let _ = writeln!(out, "\tgomode_visibility = {}", bool_literal(self.gomode_visibility));
        let _ = writeln!(
            out,
            "\tgomode_light_visibility = {}",
            bool_literal(self.gomode_light_visibility)
        );
        out.push('\n');

        for (i, s) in self.labels.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let flag_index = match s.flag_index {
                Some(index) => index.to_string(),
                None => "None".to_string(),
            };
            let _ = writeln!(out, "Label #{:02}:", s.index);
            let _ = writeln!(out, "\tpos_index = {}", s.pos_index);
            let _ = writeln!(out, "\tname = '{}'", s.name);
            let _ = writeln!(out, "\tenabled = {}", bool_literal(s.enabled));
            let _ = writeln!(out, "\timg_index = {}", s.img_index);
            let _ = writeln!(out, "\tcounter_value = {}", s.counter_value);
            let _ = writeln!(out, "\tcounter_show = {}", bool_literal(s.counter_show));
            let _ = writeln!(out, "\treward_index = {}", s.reward_index);
            let _ = writeln!(out, "\tflag_index = {}", flag_index);
            let _ = writeln!(out, "\tflag_text_index = {}", s.flag_text_index);
            let _ = writeln!(out, "\tshow_flag = {}", bool_literal(s.show_flag));
            let _ = writeln!(out, "\tshow_extra_img = {}", bool_literal(s.show_extra_img));
        }

        out
    }

    /// Parse a snapshot file. The banner is optional.
    ///
    /// Missing fields keep their defaults and unknown keys are ignored, so
    /// files written by older layouts still load. Malformed values fail.
    pub fn parse(text: &str) -> Result<Self> {
        let (body, line_offset) = match text.strip_prefix(WARNING_TEXT) {
            Some(body) => (body, WARNING_TEXT.lines().count()),
            None => (text, 0),
        };

        let mut parser = Parser::default();
        for (i, raw) in body.lines().enumerate() {
            parser.line = line_offset + i + 1;
            parser.feed(raw.trim())?;
        }
        parser.flush();

        Ok(parser.snapshot)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum Block {
    #[default]
    None,
    Global,
    Label,
}

#[derive(Default)]
struct Parser {
    snapshot: Snapshot,
    block: Block,
    current: Option<LabelState>,
    line: usize,
}

impl Parser {
    fn feed(&mut self, line: &str) -> Result<()> {
        if line.is_empty() {
            self.flush();
            return Ok(());
        }

        if line.starts_with("Global Settings") {
            self.flush();
            self.block = Block::Global;
            return Ok(());
        }

        if let Some(rest) = line.strip_prefix("Label #") {
            self.flush();
            let index = rest.trim_end_matches(':').trim();
            self.current = Some(LabelState {
                index: self.number(index)?,
                ..Default::default()
            });
            self.block = Block::Label;
            return Ok(());
        }

        let Some((key, value)) = line.split_once(" = ") else {
            return Err(self.error(format!("expected 'key = value', got '{line}'")));
        };
        let (key, value) = (key.trim(), value.trim());

        match self.block {
            Block::Global => match key {
                "gomode_visibility" => self.snapshot.gomode_visibility = self.boolean(value)?,
                "gomode_light_visibility" => {
                    self.snapshot.gomode_light_visibility = self.boolean(value)?
                }
                _ => tracing::warn!("Ignoring unknown global setting '{}' (line {})", key, self.line),
            },
            Block::Label => self.label_field(key, value)?,
            Block::None => {
                tracing::warn!("Ignoring '{}' outside of any block (line {})", key, self.line)
            }
        }
        Ok(())
    }

    fn label_field(&mut self, key: &str, value: &str) -> Result<()> {
        let mut state = self.current.take().unwrap_or_default();
        match key {
            "pos_index" => state.pos_index = self.number(value)?,
            "name" => {
                let unquoted = value
                    .strip_prefix('\'')
                    .and_then(|v| v.strip_suffix('\''))
                    .unwrap_or(value);
                state.name = unquoted.to_string();
            }
            "enabled" => state.enabled = self.boolean(value)?,
            "img_index" => state.img_index = self.number(value)?,
            "counter_value" => state.counter_value = self.number(value)?,
            "counter_show" => state.counter_show = self.boolean(value)?,
            "reward_index" => state.reward_index = self.number(value)?,
            "flag_index" => {
                state.flag_index = match value {
                    "None" => None,
                    v => Some(self.number(v)?),
                }
            }
            "flag_text_index" => state.flag_text_index = self.number(value)?,
            "show_flag" => state.show_flag = self.boolean(value)?,
            "show_extra_img" => state.show_extra_img = self.boolean(value)?,
            _ => tracing::warn!("Ignoring unknown label field '{}' (line {})", key, self.line),
        }
        self.current = Some(state);
        Ok(())
    }

    /// Close the current block, keeping a finished label.
    fn flush(&mut self) {
        if let Some(state) = self.current.take() {
            self.snapshot.labels.push(state);
        }
        self.block = Block::None;
    }

    fn number<T: std::str::FromStr>(&self, value: &str) -> Result<T> {
        value
            .parse()
            .map_err(|_| self.error(format!("'{value}' is not a valid number")))
    }

    fn boolean(&self, value: &str) -> Result<bool> {
        match value {
            "True" => Ok(true),
            "False" => Ok(false),
            other => Err(self.error(format!("'{other}' must be 'True' or 'False'"))),
        }
    }

    fn error(&self, reason: String) -> Error {
        Error::StateParse {
            line: self.line,
            reason,
        }
    }
}
