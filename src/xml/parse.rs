//! XML parsing functions.

use std::path::Path;

use super::types::TrackerXml;
use crate::error::{Error, Result};

/// Parse a tracker layout document from a string.
pub fn parse_xml(xml: &str) -> std::result::Result<TrackerXml, quick_xml::DeError> {
    quick_xml::de::from_str(xml)
}

/// Parse a tracker layout document from disk.
pub fn parse_xml_file(path: &Path) -> Result<TrackerXml> {
    let contents = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(parse_xml(&contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::ConfigSection;

    #[test]
    fn test_parse_sections_in_document_order() {
        let xml = r#"
            <Tracker>
                <Config DefaultInventory="1" StatePath="state.txt">
                    <Fonts>
                        <Font Index="0" Name="Main" Source="fonts/main.ttf"/>
                    </Fonts>
                    <GoMode Pos="10;20" Source="gomode.png"/>
                    <Inventory Index="1" Background="bg.png">
                        <Item Name="Bow" Source="bow.png" Pos="1;2"/>
                    </Inventory>
                </Config>
            </Tracker>
        "#;

        let doc = parse_xml(xml).unwrap();
        let config = doc.config.unwrap();
        assert_eq!(config.default_inventory.as_deref(), Some("1"));
        assert_eq!(config.state_path.as_deref(), Some("state.txt"));
        assert_eq!(config.sections.len(), 3);
        assert!(matches!(config.sections[0], ConfigSection::Fonts(_)));
        assert!(matches!(config.sections[1], ConfigSection::GoMode(_)));
        assert!(matches!(config.sections[2], ConfigSection::Inventory(_)));
    }

    #[test]
    fn test_unknown_section_keeps_its_tag() {
        let xml = r#"<Tracker><Config><Sounds Volume="3"><Sound/></Sounds></Config></Tracker>"#;

        let config = parse_xml(xml).unwrap().config.unwrap();
        match &config.sections[0] {
            ConfigSection::Unknown(tag) => assert_eq!(tag, "Sounds"),
            other => panic!("expected unknown section, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_config_section() {
        let doc = parse_xml("<Tracker><Other/></Tracker>").unwrap();
        assert!(doc.config.is_none());
    }

    #[test]
    fn test_item_nested_sources_and_positions() {
        let xml = r#"
            <Tracker><Config>
                <Inventory Index="0" Background="bg.png">
                    <Item Name="Bottle">
                        <Sources>
                            <Source Path="empty.png"/>
                            <Source Path="full.png"/>
                        </Sources>
                        <Positions>
                            <Position X="4" Y="8"/>
                            <Position X="16" Y="32"/>
                        </Positions>
                        <Counter Min="0" Max="4" Increment="1" TextSettings="0"/>
                    </Item>
                    <Rewards>
                        <Item Name="Forest" TextSettings="1"/>
                    </Rewards>
                </Inventory>
            </Config></Tracker>
        "#;

        let config = parse_xml(xml).unwrap().config.unwrap();
        let ConfigSection::Inventory(inv) = &config.sections[0] else {
            panic!("expected inventory");
        };
        let item = &inv.items[0];
        assert!(item.source.is_none());
        let sources = item.sources.as_ref().unwrap();
        assert_eq!(sources.entries.len(), 2);
        assert_eq!(sources.entries[1].path.as_deref(), Some("full.png"));
        let positions = item.positions.as_ref().unwrap();
        assert_eq!(positions.entries[1].x.as_deref(), Some("16"));
        assert_eq!(item.counter.as_ref().unwrap().max.as_deref(), Some("4"));
        assert_eq!(inv.rewards.as_ref().unwrap().items[0].name.as_deref(), Some("Forest"));
    }
}
