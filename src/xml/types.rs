//! XML type definitions for tracker layout files.

use std::fmt;

use serde::de::{Deserializer, EnumAccess, IgnoredAny, VariantAccess, Visitor};
use serde::Deserialize;

/// Root element of a layout file. The root tag name is not checked.
#[derive(Debug, Deserialize, Clone)]
pub struct TrackerXml {
    #[serde(rename = "Config")]
    pub config: Option<ConfigXml>,
}

/// The `<Config>` section holding every declaration.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigXml {
    #[serde(rename = "@DefaultInventory")]
    pub default_inventory: Option<String>,
    #[serde(rename = "@StatePath")]
    pub state_path: Option<String>,

    // Child sections collected via $value to keep document order
    #[serde(rename = "$value", default)]
    pub sections: Vec<ConfigSection>,
}

/// Child sections of `<Config>`.
///
/// Unrecognized tags deserialize into `Unknown` so the loader can reject
/// them by name instead of failing inside serde.
#[derive(Debug, Clone)]
pub enum ConfigSection {
    Fonts(FontsXml),
    TextSettings(TextSettingsXml),
    Flags(FlagsXml),
    GoMode(GoModeXml),
    Inventory(InventoryXml),
    /// Stray text content between sections.
    Text,
    Unknown(String),
}

const SECTION_TAGS: &[&str] = &["Fonts", "TextSettings", "Flags", "GoMode", "Inventory"];

impl<'de> Deserialize<'de> for ConfigSection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SectionVisitor;

        impl<'de> Visitor<'de> for SectionVisitor {
            type Value = ConfigSection;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a configuration section element")
            }

            fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<Self::Value, A::Error> {
                let (tag, variant): (String, _) = data.variant()?;
                let section = match tag.as_str() {
                    "Fonts" => ConfigSection::Fonts(variant.newtype_variant()?),
                    "TextSettings" => ConfigSection::TextSettings(variant.newtype_variant()?),
                    "Flags" => ConfigSection::Flags(variant.newtype_variant()?),
                    "GoMode" => ConfigSection::GoMode(variant.newtype_variant()?),
                    "Inventory" => ConfigSection::Inventory(variant.newtype_variant()?),
                    "$text" => {
                        variant.newtype_variant::<IgnoredAny>()?;
                        ConfigSection::Text
                    }
                    _ => {
                        variant.newtype_variant::<IgnoredAny>()?;
                        ConfigSection::Unknown(tag)
                    }
                };
                Ok(section)
            }
        }

        deserializer.deserialize_enum("ConfigSection", SECTION_TAGS, SectionVisitor)
    }
}

/// `<Fonts>` container; child tag names are not checked.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct FontsXml {
    #[serde(rename = "$value", default)]
    pub fonts: Vec<FontXml>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct FontXml {
    #[serde(rename = "@Index")]
    pub index: Option<String>,
    #[serde(rename = "@Name")]
    pub name: Option<String>,
    #[serde(rename = "@Source")]
    pub source: Option<String>,
}

/// `<TextSettings>` container.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct TextSettingsXml {
    #[serde(rename = "$value", default)]
    pub settings: Vec<TextSettingXml>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct TextSettingXml {
    #[serde(rename = "@Index")]
    pub index: Option<String>,
    #[serde(rename = "@Name")]
    pub name: Option<String>,
    #[serde(rename = "@FontIndex")]
    pub font_index: Option<String>,
    #[serde(rename = "@Size")]
    pub size: Option<String>,
    #[serde(rename = "@Bold")]
    pub bold: Option<String>,
    #[serde(rename = "@Color")]
    pub color: Option<String>,
    #[serde(rename = "@ColorMax")]
    pub color_max: Option<String>,
}

/// `<Flags>` container.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct FlagsXml {
    #[serde(rename = "$value", default)]
    pub flags: Vec<FlagXml>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct FlagXml {
    /// `;`-separated list of texts.
    #[serde(rename = "@Text")]
    pub text: Option<String>,
    /// `x;y` pair.
    #[serde(rename = "@Pos")]
    pub pos: Option<String>,
    #[serde(rename = "@TextSettings")]
    pub text_settings: Option<String>,
    #[serde(rename = "@Hidden")]
    pub hidden: Option<String>,
}

/// `<GoMode>` singleton.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct GoModeXml {
    #[serde(rename = "@Pos")]
    pub pos: Option<String>,
    #[serde(rename = "@Source")]
    pub source: Option<String>,
    #[serde(rename = "@LightPath")]
    pub light_path: Option<String>,
    #[serde(rename = "@LightPos")]
    pub light_pos: Option<String>,
    #[serde(rename = "@HideIfDisabled")]
    pub hide_if_disabled: Option<String>,
}

/// `<Inventory>` section, one per declared inventory.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct InventoryXml {
    #[serde(rename = "@Index")]
    pub index: Option<String>,
    #[serde(rename = "@Name")]
    pub name: Option<String>,
    #[serde(rename = "@Background")]
    pub background: Option<String>,
    #[serde(rename = "@CheckmarkPath")]
    pub checkmark_path: Option<String>,

    #[serde(rename = "Item", default)]
    pub items: Vec<ItemXml>,
    #[serde(rename = "Rewards")]
    pub rewards: Option<RewardsXml>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ItemXml {
    #[serde(rename = "@Name")]
    pub name: Option<String>,
    /// Inline single path; takes precedence over `<Sources>`.
    #[serde(rename = "@Source")]
    pub source: Option<String>,
    /// Inline `x;y` position; takes precedence over `<Positions>`.
    #[serde(rename = "@Pos")]
    pub pos: Option<String>,
    #[serde(rename = "@Enabled")]
    pub enabled: Option<String>,
    #[serde(rename = "@ScaleContent")]
    pub scale_content: Option<String>,
    #[serde(rename = "@Reward")]
    pub reward: Option<String>,
    #[serde(rename = "@FlagIndex")]
    pub flag_index: Option<String>,
    #[serde(rename = "@UseCheckmark")]
    pub use_checkmark: Option<String>,

    #[serde(rename = "Sources")]
    pub sources: Option<SourcesXml>,
    #[serde(rename = "Positions")]
    pub positions: Option<PositionsXml>,
    #[serde(rename = "Counter")]
    pub counter: Option<CounterXml>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SourcesXml {
    #[serde(rename = "$value", default)]
    pub entries: Vec<SourceXml>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SourceXml {
    #[serde(rename = "@Path")]
    pub path: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct PositionsXml {
    #[serde(rename = "$value", default)]
    pub entries: Vec<PositionXml>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct PositionXml {
    #[serde(rename = "@X")]
    pub x: Option<String>,
    #[serde(rename = "@Y")]
    pub y: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct CounterXml {
    #[serde(rename = "@Min")]
    pub min: Option<String>,
    #[serde(rename = "@Max")]
    pub max: Option<String>,
    #[serde(rename = "@Increment")]
    pub increment: Option<String>,
    #[serde(rename = "@TextSettings")]
    pub text_settings: Option<String>,
}

/// `<Rewards>` container inside an inventory.
#[derive(Debug, Deserialize, Default, Clone)]
pub struct RewardsXml {
    #[serde(rename = "Item", default)]
    pub items: Vec<RewardXml>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RewardXml {
    #[serde(rename = "@Name")]
    pub name: Option<String>,
    #[serde(rename = "@TextSettings")]
    pub text_settings: Option<String>,
}
