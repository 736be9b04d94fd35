mod common;

use common::{asset, img_index, session, session_sink, slot, write_layout, LAYOUT, MINIMAL_LAYOUT};
use item_tracker::display::{DisplaySink, Handle, EFFECT_CLEAR, EFFECT_DIMMED, HALF_OPACITY};
use item_tracker::state::{capture, restore, DriftWarning, LabelState, Snapshot, WARNING_TEXT};
use item_tracker::{Config, Error, StateStore};

#[test]
fn test_minimal_layout_capture() {
    let (config, sink) = session(MINIMAL_LAYOUT);

    let snapshot = capture(&config, &sink).unwrap();
    assert!(!snapshot.gomode_visibility);
    assert!(!snapshot.gomode_light_visibility);
    assert_eq!(snapshot.labels.len(), 1);

    let bow = &snapshot.labels[0];
    assert_eq!(bow.name, "Bow");
    assert!(bow.enabled);
    assert_eq!(bow.img_index, 0);
    assert_eq!(bow.flag_index, None);
    assert!(!bow.show_flag);
    assert!(!bow.show_extra_img);

    let text = snapshot.to_text();
    assert!(text.starts_with(WARNING_TEXT));
    assert_eq!(text.matches("Label #").count(), 1);
    assert!(text.contains("Label #00:\n"));
    assert!(text.contains("\tflag_index = None\n"));
}

#[test]
fn test_capture_reads_every_live_slot() {
    let (config, sink) = session(LAYOUT);
    let snapshot = capture(&config, &sink).unwrap();

    let slots: Vec<(usize, usize)> = snapshot
        .labels
        .iter()
        .map(|l| (l.index, l.pos_index))
        .collect();
    assert_eq!(slots, vec![(0, 0), (1, 0), (1, 1), (2, 0)]);

    let bombs = &snapshot.labels[1];
    assert_eq!(bombs.name, "Bombs");
    assert!(!bombs.enabled);
    assert_eq!(bombs.counter_value, 0);
    assert!(!bombs.counter_show);
    assert_eq!(bombs.flag_index, Some(0));
    assert!(bombs.show_flag);
    assert!(!bombs.show_extra_img);
}

/// Bring the LAYOUT session into a state away from its defaults.
fn play(config: &mut Config, sink: &mut item_tracker::MemorySink) {
    let inv = config.active_inventory_mut().unwrap();
    let counter = inv.items[1].counter.as_mut().unwrap();
    counter.incr();
    counter.incr();

    sink.label_mut(slot(0, 0)).unwrap().img_index = 1;
    sink.set_effect_strength(Handle::Item(slot(1, 1)), EFFECT_CLEAR);
    sink.label_mut(slot(1, 1)).unwrap().flag_text_index = 2;
    sink.set_visible(Handle::ExtraImage(slot(1, 1)), true);
    sink.set_visible(Handle::Flag(slot(1, 0)), false);
    sink.label_mut(slot(2, 0)).unwrap().reward_index = 1;
    sink.set_effect_strength(Handle::GoMode, EFFECT_CLEAR);
    sink.set_visible(Handle::GoModeLight, true);
}

#[test]
fn test_capture_restore_capture_is_identical() {
    let (mut config, mut sink) = session(LAYOUT);
    play(&mut config, &mut sink);
    let text = capture(&config, &sink).unwrap().to_text();

    let (mut fresh_config, mut fresh_sink) = session(LAYOUT);
    let snapshot = Snapshot::parse(&text).unwrap();
    let report = restore(&mut fresh_config, &mut fresh_sink, &snapshot).unwrap();

    assert!(report.is_clean(), "unexpected warnings: {:?}", report.warnings);
    assert_eq!(report.applied, 4);
    assert_eq!(capture(&fresh_config, &fresh_sink).unwrap().to_text(), text);
}

#[test]
fn test_restore_applies_go_mode() {
    let (mut config, mut sink) = session(LAYOUT);
    assert!(!sink.is_visible(Handle::GoMode));

    let mut snapshot = capture(&config, &sink).unwrap();
    snapshot.gomode_visibility = true;
    snapshot.gomode_light_visibility = true;
    restore(&mut config, &mut sink, &snapshot).unwrap();

    assert_eq!(sink.effect_strength(Handle::GoMode), Some(EFFECT_CLEAR));
    assert!(sink.is_visible(Handle::GoMode));
    assert!(sink.is_visible(Handle::GoModeLight));

    snapshot.gomode_visibility = false;
    restore(&mut config, &mut sink, &snapshot).unwrap();
    assert_eq!(sink.effect_strength(Handle::GoMode), Some(EFFECT_DIMMED));
    assert!(!sink.is_visible(Handle::GoMode));
}

#[test]
fn test_name_mismatch_skips_only_that_slot() {
    let (mut config, mut sink) = session(LAYOUT);
    let mut snapshot = capture(&config, &sink).unwrap();
    snapshot.labels[0].name = "Sword".into();
    snapshot.labels[0].img_index = 1;
    snapshot.labels[3].reward_index = 1;

    let report = restore(&mut config, &mut sink, &snapshot).unwrap();

    assert_eq!(report.applied, 3);
    assert_eq!(report.skipped(), 1);
    assert_eq!(
        report.warnings,
        vec![DriftWarning::NameMismatch {
            slot: slot(0, 0),
            live: "Bow".into(),
            snapshot: "Sword".into(),
        }]
    );
    assert_eq!(img_index(&sink, slot(0, 0)), 0);

    let reward = sink.widget(Handle::Reward(slot(2, 0))).unwrap();
    assert_eq!(reward.text, "Rupee");
    assert_eq!(reward.text_style, Some((0, false)));
    assert_eq!(sink.label(slot(2, 0)).unwrap().reward_index, 1);
}

#[test]
fn test_unknown_slots_are_skipped() {
    let (mut config, mut sink) = session(LAYOUT);
    let mut snapshot = capture(&config, &sink).unwrap();
    snapshot.labels.push(LabelState {
        index: 9,
        name: "Ghost".into(),
        ..Default::default()
    });
    snapshot.labels.push(LabelState {
        index: 0,
        pos_index: 3,
        name: "Bow".into(),
        ..Default::default()
    });

    let report = restore(&mut config, &mut sink, &snapshot).unwrap();

    assert_eq!(report.applied, 4);
    assert_eq!(
        report.warnings,
        vec![
            DriftWarning::UnknownSlot { slot: slot(9, 0) },
            DriftWarning::UnknownSlot { slot: slot(0, 3) },
        ]
    );
}

#[test]
fn test_misaligned_counter_warns_and_applies() {
    let (mut config, mut sink) = session(LAYOUT);
    let mut snapshot = capture(&config, &sink).unwrap();
    for label in &mut snapshot.labels[1..=2] {
        label.counter_value = 15;
        label.counter_show = true;
    }

    let report = restore(&mut config, &mut sink, &snapshot).unwrap();

    assert_eq!(report.applied, 4);
    assert_eq!(report.skipped(), 0);
    assert_eq!(
        report.warnings[0],
        DriftWarning::CounterMisaligned {
            slot: slot(1, 0),
            value: 15,
            increment: 10,
        }
    );
    assert_eq!(report.warnings.len(), 2);

    let counter = config.active_inventory().unwrap().items[1].counter.as_ref().unwrap();
    assert_eq!(counter.value, 15);
    assert!(counter.show);

    let widget = sink.widget(Handle::Counter(slot(1, 0))).unwrap();
    assert!(widget.visible);
    assert_eq!(widget.text, "15");
    assert_eq!(widget.text_style, Some((0, false)));
}

#[test]
fn test_counter_at_max_uses_max_style() {
    let (mut config, mut sink) = session(LAYOUT);
    let mut snapshot = capture(&config, &sink).unwrap();
    for label in &mut snapshot.labels[1..=2] {
        label.counter_value = 30;
        label.counter_show = true;
    }

    let report = restore(&mut config, &mut sink, &snapshot).unwrap();
    assert!(report.is_clean());

    let widget = sink.widget(Handle::Counter(slot(1, 1))).unwrap();
    assert_eq!(widget.text, "30");
    assert_eq!(widget.text_style, Some((0, true)));
}

#[test]
fn test_negative_img_index_round_trip() {
    let (mut config, mut sink) = session(LAYOUT);
    let mut snapshot = capture(&config, &sink).unwrap();
    snapshot.labels[0].img_index = -1;
    snapshot.labels[0].enabled = false;

    let report = restore(&mut config, &mut sink, &snapshot).unwrap();
    assert!(report.is_clean());

    let bow = sink.widget(Handle::Item(slot(0, 0))).unwrap();
    assert_eq!(bow.pixmap.as_deref(), Some(asset("bow.png").as_path()));
    assert_eq!(bow.opacity, HALF_OPACITY);
    assert_eq!(bow.effect_strength, Some(EFFECT_DIMMED));
    assert_eq!(img_index(&sink, slot(0, 0)), -1);

    let again = capture(&config, &sink).unwrap();
    assert_eq!(again.labels[0].img_index, -1);
    assert!(!again.labels[0].enabled);
}

#[test]
fn test_enabled_slot_shows_selected_image() {
    let (mut config, mut sink) = session(LAYOUT);
    let mut snapshot = capture(&config, &sink).unwrap();
    snapshot.labels[0].img_index = 1;

    restore(&mut config, &mut sink, &snapshot).unwrap();

    let bow = sink.widget(Handle::Item(slot(0, 0))).unwrap();
    assert_eq!(bow.pixmap.as_deref(), Some(asset("bow_silver.png").as_path()));
    assert_eq!(bow.opacity, 1.0);
    assert_eq!(bow.effect_strength, Some(EFFECT_CLEAR));
}

#[test]
fn test_out_of_range_image_is_reported() {
    let (mut config, mut sink) = session(LAYOUT);
    let mut snapshot = capture(&config, &sink).unwrap();
    snapshot.labels[0].img_index = 5;

    let report = restore(&mut config, &mut sink, &snapshot).unwrap();

    assert_eq!(report.applied, 4);
    assert_eq!(
        report.warnings,
        vec![DriftWarning::IndexOutOfRange {
            slot: slot(0, 0),
            field: "image",
            index: 5,
        }]
    );
    let bow = sink.widget(Handle::Item(slot(0, 0))).unwrap();
    assert_eq!(bow.pixmap.as_deref(), Some(asset("bow.png").as_path()));
}

#[test]
fn test_flag_text_and_style() {
    let (mut config, mut sink) = session(LAYOUT);
    let mut snapshot = capture(&config, &sink).unwrap();
    snapshot.labels[1].flag_text_index = 2;
    snapshot.labels[2].flag_text_index = 1;
    snapshot.labels[2].show_flag = false;

    let report = restore(&mut config, &mut sink, &snapshot).unwrap();
    assert!(report.is_clean());

    let last = sink.widget(Handle::Flag(slot(1, 0))).unwrap();
    assert!(last.visible);
    assert_eq!(last.text, "Lv3");
    assert_eq!(last.text_style, Some((1, true)));

    let middle = sink.widget(Handle::Flag(slot(1, 1))).unwrap();
    assert!(!middle.visible);
    assert_eq!(middle.text, "Lv2");
    assert_eq!(middle.text_style, Some((1, false)));
}

#[test]
fn test_flag_index_is_written_back() {
    let (mut config, mut sink) = session(LAYOUT);
    let mut snapshot = capture(&config, &sink).unwrap();
    snapshot.labels[1].flag_index = None;

    restore(&mut config, &mut sink, &snapshot).unwrap();
    assert_eq!(config.active_inventory().unwrap().items[1].flag_index, Some(0));

    for label in &mut snapshot.labels[1..=2] {
        label.flag_index = None;
    }
    restore(&mut config, &mut sink, &snapshot).unwrap();
    assert_eq!(config.active_inventory().unwrap().items[1].flag_index, None);
}

#[test]
fn test_store_requires_a_path() {
    let (mut config, mut sink) = session(MINIMAL_LAYOUT);
    let mut store = StateStore::new(&mut config, None);

    assert!(store.path().is_none());
    assert!(matches!(store.save(&sink), Err(Error::StatePathUnset)));
    assert!(matches!(store.open(&mut sink), Err(Error::StatePathUnset)));
    assert!(!store.is_saved());
}

#[test]
fn test_store_save_then_open_in_new_session() {
    let (dir, layout) = write_layout(LAYOUT);

    let mut config = Config::from_file(&layout).unwrap();
    let mut sink = session_sink(&config);
    play(&mut config, &mut sink);
    let expected = capture(&config, &sink).unwrap();

    {
        let mut store = StateStore::new(&mut config, None);
        assert_eq!(store.path(), Some(dir.path().join("session.txt").as_path()));

        let saved = store.save(&sink).unwrap();
        assert_eq!(saved, &expected);
        assert!(store.is_saved());
        assert_eq!(store.states().len(), 4);

        store.config_mut();
        assert!(!store.is_saved());
    }

    let text = std::fs::read_to_string(dir.path().join("session.txt")).unwrap();
    assert!(text.starts_with(WARNING_TEXT));
    assert_eq!(text, expected.to_text());

    let mut fresh_config = Config::from_file(&layout).unwrap();
    let mut fresh_sink = session_sink(&fresh_config);
    let mut store = StateStore::new(&mut fresh_config, None);
    let report = store.open(&mut fresh_sink).unwrap();

    assert!(report.is_clean());
    assert!(store.is_saved());
    assert_eq!(capture(store.config(), &fresh_sink).unwrap(), expected);
}

#[test]
fn test_store_explicit_path_overrides_state_path() {
    let (dir, layout) = write_layout(LAYOUT);
    let mut config = Config::from_file(&layout).unwrap();
    let sink = session_sink(&config);

    let explicit = dir.path().join("other");
    let mut store = StateStore::new(&mut config, Some(explicit));
    store.save(&sink).unwrap();

    assert!(dir.path().join("other.txt").exists());
    assert!(!dir.path().join("session.txt").exists());
}

#[test]
fn test_store_open_missing_file() {
    let (dir, layout) = write_layout(LAYOUT);
    let mut config = Config::from_file(&layout).unwrap();
    let mut sink = session_sink(&config);

    let mut store = StateStore::new(&mut config, Some(dir.path().join("absent.txt")));
    assert!(matches!(store.open(&mut sink), Err(Error::Io { .. })));
}

#[test]
fn test_store_open_malformed_file() {
    let (dir, layout) = write_layout(LAYOUT);
    std::fs::write(
        dir.path().join("session.txt"),
        "Global Settings:\n\tgomode_visibility = yes\n",
    )
    .unwrap();

    let mut config = Config::from_file(&layout).unwrap();
    let mut sink = session_sink(&config);
    let mut store = StateStore::new(&mut config, None);

    match store.open(&mut sink) {
        Err(Error::StateParse { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected a parse error, got {other:?}"),
    }
}
