//! Tracker layout configuration.
//!
//! A layout document declares fonts, text styles, flag texts, an optional
//! go-mode indicator and one or more inventories of items. Loading is
//! all-or-nothing: the document is converted section by section in document
//! order, then validated once, and any failure yields an [`Error::Schema`]
//! without exposing a partial [`Config`].

mod attr;
mod model;


use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

pub use model::{
    Color, Counter, FlagItem, Font, GoModeSettings, Inventory, InventoryItem, Pos, RewardItem,
    Rewards, TextSettings,
};

use crate::display::DisplaySink;
use crate::error::{Error, Result};
use crate::xml::{
    parse_xml, parse_xml_file, ConfigSection, ConfigXml, FlagXml, FontXml, GoModeXml,
    InventoryXml, ItemXml, RewardsXml, TextSettingXml, TrackerXml,
};

/// Default text size when a text setting omits `Size`.
const DEFAULT_TEXT_SIZE: f32 = 10.0;

/// Fallback for unnamed items and inventories.
const UNKNOWN_NAME: &str = "Unknown";

/// Fallback for unnamed rewards.
const UNKNOWN_REWARD: &str = "Unk";

/// Loaded and validated tracker layout.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Inventory shown at startup.
    pub default_inv: i32,
    pub fonts: Vec<Font>,
    pub text_settings: Vec<TextSettings>,
    pub flags: Vec<FlagItem>,
    /// Inventories keyed by declared index. A repeated index replaces the
    /// earlier declaration.
    pub inventories: BTreeMap<i32, Inventory>,
    pub state_path: Option<PathBuf>,
    pub gomode_settings: Option<GoModeSettings>,
    /// Inventory currently on screen.
    pub active_inv: i32,
    /// Directory relative asset paths resolve against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

impl Config {
    /// Load a layout file. Only `.xml` documents are supported.
    pub fn from_file(path: &Path) -> Result<Self> {
        let is_xml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("xml"));
        if !is_xml {
            return Err(Error::UnsupportedFormat(path.to_path_buf()));
        }

        let doc = parse_xml_file(path)?;
        let base_dir = path.parent().unwrap_or(Path::new(".")).to_path_buf();
        let config = Self::from_document(doc, base_dir)?;
        tracing::info!(
            "Loaded config {} ({} inventories, {} fonts)",
            path.display(),
            config.inventories.len(),
            config.fonts.len()
        );
        Ok(config)
    }

    /// Load a layout from an in-memory document.
    pub fn from_xml_str(xml: &str, base_dir: impl Into<PathBuf>) -> Result<Self> {
        let doc = parse_xml(xml)?;
        Self::from_document(doc, base_dir.into())
    }

    /// Convert and validate a parsed document.
    pub fn from_document(doc: TrackerXml, base_dir: PathBuf) -> Result<Self> {
        let ConfigXml {
            default_inventory,
            state_path,
            sections,
        } = doc
            .config
            .ok_or_else(|| Error::schema("Config", "config settings not found"))?;

        let default_inv = attr::int("Config", "DefaultInventory", default_inventory.as_deref(), 0)?;
        let mut config = Config {
            default_inv,
            fonts: Vec::new(),
            text_settings: Vec::new(),
            flags: Vec::new(),
            inventories: BTreeMap::new(),
            state_path: state_path.map(PathBuf::from),
            gomode_settings: None,
            active_inv: default_inv,
            base_dir,
        };

        for section in sections {
            config.load_section(section)?;
        }

        config.validate()?;
        Ok(config)
    }

    fn load_section(&mut self, section: ConfigSection) -> Result<()> {
        match section {
            ConfigSection::Fonts(fonts) => {
                for font in fonts.fonts {
                    let font = load_font(self.fonts.len(), font)?;
                    tracing::debug!("Font {} -> {}", font.name, font.path);
                    self.fonts.push(font);
                }
            }
            ConfigSection::TextSettings(settings) => {
                for setting in settings.settings {
                    let setting = load_text_setting(self.text_settings.len(), setting)?;
                    self.text_settings.push(setting);
                }
            }
            ConfigSection::Flags(flags) => {
                for flag in flags.flags {
                    let flag = load_flag(self.flags.len(), flag)?;
                    self.flags.push(flag);
                }
            }
            ConfigSection::GoMode(gomode) => {
                if self.gomode_settings.is_some() {
                    tracing::warn!("GoMode declared more than once, keeping the last one");
                }
                self.gomode_settings = Some(load_gomode(gomode)?);
            }
            ConfigSection::Inventory(inventory) => {
                let inventory = load_inventory(inventory)?;
                tracing::debug!(
                    "Inventory {} '{}' with {} items",
                    inventory.index,
                    inventory.name,
                    inventory.items.len()
                );
                if let Some(old) = self.inventories.insert(inventory.index, inventory) {
                    tracing::warn!(
                        "Inventory index {} declared twice, replacing '{}'",
                        old.index,
                        old.name
                    );
                }
            }
            ConfigSection::Text => {}
            ConfigSection::Unknown(tag) => {
                return Err(Error::schema(
                    "Config",
                    format!("unknown configuration tag: '{tag}'"),
                ));
            }
        }
        Ok(())
    }

    /// Check the invariants the rest of the tracker relies on.
    pub fn validate(&self) -> Result<()> {
        if self.fonts.is_empty() {
            return Err(Error::schema("Fonts", "you need at least one font"));
        }

        if self.text_settings.is_empty() {
            return Err(Error::schema(
                "TextSettings",
                "you need at least one text setting for counter display",
            ));
        }

        for setting in &self.text_settings {
            if setting.font >= self.fonts.len() {
                return Err(Error::schema(
                    format!("Setting '{}'", setting.name),
                    format!("font index {} does not exist", setting.font),
                ));
            }
        }

        for inv in self.inventories.values() {
            let element = format!("Inventory {}", inv.index);
            if inv.items.is_empty() {
                return Err(Error::schema(element, "there's no inventory items"));
            }
            if inv.background.is_empty() {
                return Err(Error::schema(element, "the background's path is empty"));
            }
        }

        if !self.inventories.contains_key(&self.default_inv) {
            return Err(Error::schema(
                "Config",
                format!("default inventory {} is not declared", self.default_inv),
            ));
        }

        Ok(())
    }

    /// Resolve a document path against the config directory.
    pub fn asset_path(&self, path: impl AsRef<Path>) -> PathBuf {
        resolve_asset(&self.base_dir, path.as_ref())
    }

    /// Register every declared font with the display. Returns how many were
    /// accepted; rejected fonts are logged and skipped.
    pub fn register_fonts(&self, sink: &mut dyn DisplaySink) -> usize {
        let mut registered = 0;
        for font in &self.fonts {
            let path = self.asset_path(&font.path);
            if sink.register_font(&path) {
                registered += 1;
            } else {
                tracing::warn!("Failed to register font '{}' from {}", font.name, path.display());
            }
        }
        registered
    }

    pub fn text_settings(&self, index: usize) -> Option<&TextSettings> {
        self.text_settings.get(index)
    }

    pub fn font_for(&self, settings: &TextSettings) -> Option<&Font> {
        self.fonts.get(settings.font)
    }

    pub fn flag(&self, index: usize) -> Option<&FlagItem> {
        self.flags.get(index)
    }

    pub fn active_inventory(&self) -> Option<&Inventory> {
        self.inventories.get(&self.active_inv)
    }

    pub fn active_inventory_mut(&mut self) -> Option<&mut Inventory> {
        self.inventories.get_mut(&self.active_inv)
    }

    /// Switch the active inventory. Returns false if `index` is not declared.
    pub fn select_inventory(&mut self, index: i32) -> bool {
        if self.inventories.contains_key(&index) {
            self.active_inv = index;
            true
        } else {
            false
        }
    }
}

/// Join a relative document path onto `base_dir`; absolute paths pass through.
pub(crate) fn resolve_asset(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

fn load_font(position: usize, font: FontXml) -> Result<Font> {
    let element = format!("Font #{position}");
    Ok(Font {
        index: attr::int(&element, "Index", font.index.as_deref(), 0)?,
        name: attr::required(&element, "Name", font.name)?,
        path: attr::required(&element, "Source", font.source)?,
    })
}

fn load_text_setting(position: usize, setting: TextSettingXml) -> Result<TextSettings> {
    let element = format!("Setting #{position}");
    Ok(TextSettings {
        index: attr::int(&element, "Index", setting.index.as_deref(), 0)?,
        name: attr::required(&element, "Name", setting.name)?,
        font: attr::int(&element, "FontIndex", setting.font_index.as_deref(), 0)?,
        size: attr::float(&element, "Size", setting.size.as_deref(), DEFAULT_TEXT_SIZE)?,
        bold: attr::boolean(&element, "Bold", setting.bold.as_deref(), false)?,
        color: attr::color(&element, "Color", setting.color.as_deref())?,
        color_max: attr::color(&element, "ColorMax", setting.color_max.as_deref())?,
    })
}

fn load_flag(position: usize, flag: FlagXml) -> Result<FlagItem> {
    let element = format!("Flag #{position}");
    let text = flag
        .text
        .ok_or_else(|| Error::schema(&element, "missing texts for the flag"))?;
    let pos = flag
        .pos
        .ok_or_else(|| Error::schema(&element, "missing position for the flag"))?;

    Ok(FlagItem {
        texts: text.split(';').map(str::to_string).collect(),
        pos: attr::pos(&element, "Pos", &pos)?,
        text_settings_index: attr::int(&element, "TextSettings", flag.text_settings.as_deref(), 0)?,
        hidden: attr::boolean(&element, "Hidden", flag.hidden.as_deref(), true)?,
    })
}

fn load_gomode(gomode: GoModeXml) -> Result<GoModeSettings> {
    const ELEMENT: &str = "GoMode";

    let pos = gomode
        .pos
        .ok_or_else(|| Error::schema(ELEMENT, "go mode position missing"))?;
    let light_pos = gomode
        .light_pos
        .as_deref()
        .map(|raw| attr::pos(ELEMENT, "LightPos", raw))
        .transpose()?;

    if gomode.light_path.is_some() != light_pos.is_some() {
        return Err(Error::schema(
            ELEMENT,
            "LightPath and LightPos must be declared together",
        ));
    }

    Ok(GoModeSettings {
        pos: attr::pos(ELEMENT, "Pos", &pos)?,
        hide_if_disabled: attr::boolean(
            ELEMENT,
            "HideIfDisabled",
            gomode.hide_if_disabled.as_deref(),
            false,
        )?,
        path: attr::required(ELEMENT, "Source", gomode.source)?,
        light_path: gomode.light_path,
        light_pos,
    })
}

fn load_inventory(inventory: InventoryXml) -> Result<Inventory> {
    let index = attr::int("Inventory", "Index", inventory.index.as_deref(), 0)?;
    let element = format!("Inventory {index}");

    let items = inventory
        .items
        .into_iter()
        .enumerate()
        .map(|(i, item)| load_item(i, item))
        .collect::<Result<Vec<_>>>()?;

    Ok(Inventory {
        index,
        name: inventory.name.unwrap_or_else(|| UNKNOWN_NAME.to_string()),
        background: attr::required(&element, "Background", inventory.background)?,
        song_check_path: inventory.checkmark_path,
        items,
        rewards: load_rewards(&element, inventory.rewards)?,
    })
}

fn load_item(index: usize, item: ItemXml) -> Result<InventoryItem> {
    let name = item.name.unwrap_or_else(|| UNKNOWN_NAME.to_string());
    let element = format!("Item '{}'", name.escape_debug());
    // Names are written one per line into session snapshots
    if name.chars().any(char::is_control) {
        return Err(Error::schema(&element, "Name contains a control character"));
    }

    let paths = match (item.source, item.sources) {
        (Some(source), _) => vec![source],
        (None, Some(sources)) => sources
            .entries
            .into_iter()
            .map(|s| s.path)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| Error::schema(&element, "missing path(s)"))?,
        (None, None) => Vec::new(),
    };
    if paths.is_empty() {
        return Err(Error::schema(&element, "missing path(s)"));
    }

    let positions = match (item.pos.as_deref(), item.positions) {
        (Some(raw), _) => vec![attr::pos(&element, "Pos", raw)?],
        (None, Some(positions)) => positions
            .entries
            .iter()
            .map(|p| {
                Ok(Pos::new(
                    attr::int(&element, "X", p.x.as_deref(), 0)?,
                    attr::int(&element, "Y", p.y.as_deref(), 0)?,
                ))
            })
            .collect::<Result<Vec<_>>>()?,
        (None, None) => Vec::new(),
    };
    if positions.is_empty() {
        return Err(Error::schema(&element, "missing positions"));
    }

    let counter = match item.counter {
        Some(c) => Some(Counter::new(
            attr::int(&element, "Min", c.min.as_deref(), 0)?,
            attr::int(&element, "Max", c.max.as_deref(), 0)?,
            attr::int(&element, "Increment", c.increment.as_deref(), 0)?,
            attr::int(&element, "TextSettings", c.text_settings.as_deref(), 0)?,
        )),
        None => None,
    };

    let flag_index = match item.flag_index.as_deref() {
        Some(raw) => Some(attr::int(&element, "FlagIndex", Some(raw), 0)?),
        None => None,
    };

    Ok(InventoryItem {
        index,
        name,
        paths,
        counter,
        positions,
        enabled: attr::boolean(&element, "Enabled", item.enabled.as_deref(), false)?,
        scale_content: attr::boolean(&element, "ScaleContent", item.scale_content.as_deref(), false)?,
        is_reward: attr::boolean(&element, "Reward", item.reward.as_deref(), false)?,
        flag_index,
        use_checkmark: attr::boolean(&element, "UseCheckmark", item.use_checkmark.as_deref(), false)?,
    })
}

fn load_rewards(element: &str, rewards: Option<RewardsXml>) -> Result<Rewards> {
    let Some(rewards) = rewards else {
        return Ok(Rewards::default());
    };

    let items = rewards
        .items
        .into_iter()
        .map(|reward| {
            Ok(RewardItem {
                name: reward.name.unwrap_or_else(|| UNKNOWN_REWARD.to_string()),
                text_settings_index: attr::int(
                    element,
                    "TextSettings",
                    reward.text_settings.as_deref(),
                    0,
                )?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Rewards { items })
}
