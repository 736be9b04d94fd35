//! Shared test helpers.

use std::path::{Path, PathBuf};

use item_tracker::display::{DisplaySink, SlotId};
use item_tracker::{Config, MemorySink};
use tempfile::TempDir;

/// Layout with a go-mode light, a flag, a counter, a checkmark and rewards.
///
/// Slots: Bow (item 0, one position, two images), Bombs (item 1, two
/// positions, counter 0..30 by 10, flag 0, checkmark), Chest (item 2, reward).
#[allow(dead_code)]
pub const LAYOUT: &str = r#"
<Tracker>
    <Config DefaultInventory="0" StatePath="session">
        <Fonts>
            <Font Index="0" Name="Main" Source="fonts/main.ttf"/>
        </Fonts>
        <TextSettings>
            <Setting Index="0" Name="Counter" FontIndex="0" Size="11" Color="0xFFFFFF" ColorMax="0x00FF00"/>
            <Setting Index="1" Name="Flag" FontIndex="0" Bold="True"/>
        </TextSettings>
        <Flags>
            <Flag Text="Lv1;Lv2;Lv3" Pos="0;-6" TextSettings="1" Hidden="False"/>
        </Flags>
        <GoMode Pos="200;10" Source="gomode.png" LightPath="light.png" LightPos="190;0" HideIfDisabled="True"/>
        <Inventory Index="0" Name="Main" Background="bg.png" CheckmarkPath="check.png">
            <Item Name="Bow" Pos="0;0" Enabled="True">
                <Sources>
                    <Source Path="bow.png"/>
                    <Source Path="bow_silver.png"/>
                </Sources>
            </Item>
            <Item Name="Bombs" Source="bombs.png" FlagIndex="0" UseCheckmark="True">
                <Positions>
                    <Position X="32" Y="0"/>
                    <Position X="64" Y="0"/>
                </Positions>
                <Counter Min="0" Max="30" Increment="10" TextSettings="0"/>
            </Item>
            <Item Name="Chest" Source="chest.png" Pos="96;0" Reward="True"/>
            <Rewards>
                <Item Name="Heart" TextSettings="1"/>
                <Item Name="Rupee" TextSettings="0"/>
            </Rewards>
        </Inventory>
    </Config>
</Tracker>
"#;

/// Smallest layout that loads: one font, one text setting, one item.
#[allow(dead_code)]
pub const MINIMAL_LAYOUT: &str = r#"
<Tracker>
    <Config>
        <Fonts><Font Name="Main" Source="main.ttf"/></Fonts>
        <TextSettings><Setting Name="Plain"/></TextSettings>
        <Inventory Index="0" Background="bg.png">
            <Item Name="Bow" Source="bow.png" Pos="0;0" Enabled="True"/>
        </Inventory>
    </Config>
</Tracker>
"#;

/// Write `xml` as `layout.xml` into a fresh temporary directory.
#[allow(dead_code)]
pub fn write_layout(xml: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("layout.xml");
    std::fs::write(&path, xml).unwrap();
    (dir, path)
}

/// Load `xml` and build the live display for its active inventory.
#[allow(dead_code)]
pub fn session(xml: &str) -> (Config, MemorySink) {
    let config = Config::from_xml_str(xml, "/layout").expect("layout should load");
    let sink = session_sink(&config);
    (config, sink)
}

/// Live display for an already loaded config, fonts registered.
#[allow(dead_code)]
pub fn session_sink(config: &Config) -> MemorySink {
    let mut sink = MemorySink::for_config(config);
    config.register_fonts(&mut sink);
    sink
}

#[allow(dead_code)]
pub fn slot(item: usize, pos: usize) -> SlotId {
    SlotId::new(item, pos)
}

/// Image index of a live label.
#[allow(dead_code)]
pub fn img_index(sink: &MemorySink, slot: SlotId) -> i32 {
    sink.label(slot).expect("live label").img_index
}

#[allow(dead_code)]
pub fn asset(path: &str) -> PathBuf {
    Path::new("/layout").join(path)
}
