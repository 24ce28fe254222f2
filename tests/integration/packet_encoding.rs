//! Integration tests for request building and packet encoding.

use steelkeys::config::LightingConfig;
use steelkeys::error::SkError;
use steelkeys::layout::Registry;
use steelkeys::protocol::{FRAGMENT_LEN, HEADER_LEN, RequestPlan};

use crate::common::fixtures::DescriptorDir;
use crate::common::init_test_logging;

fn encode(registry: &Registry, layout: &str, json: &str) -> Vec<Vec<u8>> {
    let layout = registry.layout(layout).unwrap();
    let config = LightingConfig::from_json(json).unwrap();
    RequestPlan::from_config(&layout, &config)
        .unwrap()
        .encode(&layout)
        .unwrap()
        .into_iter()
        .map(|packet| packet.to_vec())
        .collect()
}

fn fragment(packet: &[u8], slot: usize) -> &[u8] {
    let start = HEADER_LEN + slot * FRAGMENT_LEN;
    &packet[start..start + FRAGMENT_LEN]
}

#[test]
fn test_group_split_over_two_packets() {
    init_test_logging();
    let descriptors = DescriptorDir::create();
    let registry = Registry::from_dir(descriptors.path()).unwrap();

    let packets = encode(&registry, "tiny", r#"{"letters": {"color": "ff0000"}}"#);

    assert_eq!(packets.len(), 2);
    for packet in &packets {
        // 3 slots of 12 bytes between the header and the 2 byte trailer.
        assert_eq!(packet.len(), HEADER_LEN + 3 * FRAGMENT_LEN + 2);
        assert_eq!(&packet[..HEADER_LEN], &[0x0e, 0x00, 0x2a, 0x00]);
        assert_eq!(&packet[packet.len() - 2..], &[0x08, 0x39]);
    }

    assert_eq!(
        fragment(&packets[0], 0),
        &[0xff, 0, 0, 0, 0, 0, 0x2c, 0x01, 0x00, 0x01, 0x00, 0x04]
    );
    assert_eq!(fragment(&packets[0], 1)[11], 0x05);
    assert!(fragment(&packets[0], 2).iter().all(|b| *b == 0));

    assert_eq!(fragment(&packets[1], 0)[11], 0x06);
    assert!(fragment(&packets[1], 1).iter().all(|b| *b == 0));
}

#[test]
fn test_solo_key_repeats_in_its_own_packet() {
    init_test_logging();
    let descriptors = DescriptorDir::create();
    let registry = Registry::from_dir(descriptors.path()).unwrap();

    let packets = encode(
        &registry,
        "tiny",
        r#"{"enter": {"fx": "reactive", "active": "ffffff", "rest": "000010", "speed": 1000}, "a": {"color": "00ff00"}}"#,
    );

    assert_eq!(packets.len(), 2);
    assert_eq!(packets[0][2], 0x2a);

    let solo = &packets[1];
    assert_eq!(solo[2], 0x0b);
    assert_eq!(solo.len(), HEADER_LEN + 2 * FRAGMENT_LEN + 2);
    let expected = [
        0xff, 0xff, 0xff, 0x00, 0x00, 0x10, 0xe8, 0x03, 0x00, 0x02, 0x00, 0x28,
    ];
    assert_eq!(fragment(solo, 0), &expected);
    assert_eq!(fragment(solo, 1), &expected);
}

#[test]
fn test_layout_effect_overrides() {
    init_test_logging();
    let descriptors = DescriptorDir::create();
    let registry = Registry::from_dir(descriptors.path()).unwrap();

    let packets = encode(
        &registry,
        "wide",
        r#"{"x": {"color": "010203"}, "y": {"fx": "reactive", "active": "ffffff", "rest": "000000", "speed": 2}}"#,
    );

    assert_eq!(packets.len(), 1);
    let packet = &packets[0];
    assert_eq!(packet.len(), HEADER_LEN + 4 * FRAGMENT_LEN + 3);
    assert_eq!(&fragment(packet, 0)[6..10], &[0x01, 0x02, 0x03, 0x04]);
    assert_eq!(&fragment(packet, 1)[6..10], &[0x02, 0x00, 0x05, 0x06]);
}

#[test]
fn test_builtin_disable_covers_every_key() {
    init_test_logging();
    let registry = Registry::builtin().unwrap();
    let layout = registry.layout("msi-perkey").unwrap();
    let plan = RequestPlan::disable(&layout);

    assert_eq!(plan.entry_count(), {
        let solo: usize = layout.keys.values().filter_map(|k| k.solo).sum();
        let regular = layout.keys.values().filter(|k| k.solo.is_none()).count();
        solo + regular
    });

    let packets = plan.encode(&layout).unwrap();
    let len = packets[0].len();
    assert_eq!(len, HEADER_LEN + 42 * FRAGMENT_LEN + 7);
    assert!(packets.iter().all(|p| p.len() == len));

    // Every live fragment is black with the disable descriptor.
    for packet in &packets {
        for slot in 0..42 {
            let frag = fragment(packet, slot);
            if frag[11] != 0 {
                assert_eq!(&frag[..6], &[0; 6]);
                assert_eq!(&frag[6..10], &layout.effects.disable);
            }
        }
    }
}

#[test]
fn test_invalid_color_in_group() {
    init_test_logging();
    let registry = Registry::builtin().unwrap();
    let layout = registry.layout("apex-m800").unwrap();
    let config = LightingConfig::from_json(r##"{"letters": {"color": "#ff0000"}}"##).unwrap();

    let err = RequestPlan::from_config(&layout, &config).unwrap_err();
    assert!(matches!(err, SkError::InvalidColor { ref value } if value == "#ff0000"));
    assert_eq!(err.to_string(), "#ff0000 is not a valid color");
}
