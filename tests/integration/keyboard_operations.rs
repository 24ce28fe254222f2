//! Integration tests for keyboard sessions using the mock transport.

use std::time::Duration;

use steelkeys::config::{ConfigValue, KeyConfig, LightingConfig};
use steelkeys::device::REFRESH_REPORT;
use steelkeys::device::mock::{MockTransport, Report};
use steelkeys::error::SkError;
use steelkeys::keyboard::Keyboard;
use steelkeys::layout::Registry;
use steelkeys::protocol::Rgb;

use crate::common::fixtures::DescriptorDir;
use crate::common::init_test_logging;

fn tiny_keyboard(descriptors: &DescriptorDir) -> Keyboard {
    let registry = Registry::from_dir(descriptors.path()).unwrap();
    Keyboard::load(&registry, "tiny").unwrap()
}

fn refresh() -> Report {
    Report::Output(REFRESH_REPORT.to_vec())
}

#[test]
fn test_consecutive_operations_each_refresh_once() {
    init_test_logging();
    let descriptors = DescriptorDir::create();
    let kb = tiny_keyboard(&descriptors);
    let mock = MockTransport::new();
    let session = kb.attach(&mock).with_delay(Duration::ZERO);

    session.disable().unwrap();
    let after_disable = mock.reports();
    // alphanum: 3 keys over 2 packets; solo enter: 1 packet.
    assert_eq!(after_disable.len(), 4);
    assert_eq!(after_disable[3], refresh());
    mock.clear_reports();

    let config: LightingConfig = kb
        .list_keys()
        .map(|key| {
            let blue = KeyConfig::steady(Rgb::new(0, 0, 0xff));
            (key.to_string(), ConfigValue::Literal(blue))
        })
        .collect();
    session.push_config(&config).unwrap();
    let after_config = mock.reports();
    assert_eq!(after_config.len(), 4);
    assert!(after_config[..3].iter().all(|r| matches!(r, Report::Feature(_))));
    assert_eq!(after_config[0].bytes()[2], 0x2a);
    assert_eq!(after_config[1].bytes()[2], 0x2a);
    assert_eq!(after_config[2].bytes()[2], 0x0b);
    assert_eq!(after_config[3], refresh());
    mock.assert_single_trailing_refresh();
}

#[test]
fn test_listing() {
    init_test_logging();
    let descriptors = DescriptorDir::create();
    let kb = tiny_keyboard(&descriptors);

    assert_eq!(kb.list_keys().collect::<Vec<_>>(), vec!["a", "b", "c", "enter"]);
    assert_eq!(kb.list_groups().collect::<Vec<_>>(), vec!["letters"]);
    assert_eq!(kb.list_presets().collect::<Vec<_>>(), vec!["glow", "blank"]);
}

#[test]
fn test_preset_sent_verbatim() {
    init_test_logging();
    let descriptors = DescriptorDir::create();
    let kb = tiny_keyboard(&descriptors);
    let mock = MockTransport::new();
    let session = kb.attach(&mock).with_delay(Duration::ZERO);

    session.push_preset("glow").unwrap();

    mock.assert_reports(&[
        Report::Feature(vec![0x0e, 0x00, 0x2a, 0x00, 0xff, 0x00, 0x00]),
        Report::Feature(vec![0x0e, 0x00, 0x0b, 0x00, 0x00, 0xff, 0x00]),
        refresh(),
    ]);
}

#[test]
fn test_unknown_preset_touches_nothing() {
    init_test_logging();
    let descriptors = DescriptorDir::create();
    let kb = tiny_keyboard(&descriptors);
    let mock = MockTransport::new();
    let session = kb.attach(&mock).with_delay(Duration::ZERO);

    let err = session.push_preset("rainbow").unwrap_err();
    assert_eq!(err.to_string(), "Preset rainbow not found for model tiny");
    mock.assert_no_reports();
}

#[test]
fn test_transport_error_aborts_sequence() {
    init_test_logging();
    let descriptors = DescriptorDir::create();
    let kb = tiny_keyboard(&descriptors);
    let mock = MockTransport::new();
    mock.inject_error(SkError::Transport("cable pulled".to_string()));
    let session = kb.attach(&mock).with_delay(Duration::ZERO);

    let err = session.disable().unwrap_err();
    assert!(matches!(err, SkError::Transport(ref msg) if msg == "cable pulled"));
    mock.assert_no_reports();
}

#[test]
fn test_short_write_aborts_sequence() {
    init_test_logging();
    let descriptors = DescriptorDir::create();
    let kb = tiny_keyboard(&descriptors);
    let mock = MockTransport::builder().short_write(1).build();
    let session = kb.attach(&mock).with_delay(Duration::ZERO);

    assert!(matches!(session.disable(), Err(SkError::Transport(_))));
    assert_eq!(mock.report_count(), 1);
    assert_eq!(mock.refresh_count(), 0);
}

#[test]
fn test_disconnected_transport() {
    init_test_logging();
    let descriptors = DescriptorDir::create();
    let kb = tiny_keyboard(&descriptors);
    let mock = MockTransport::builder().disconnected().build();
    let session = kb.attach(&mock).with_delay(Duration::ZERO);

    assert!(session.refresh().is_err());
    mock.reconnect();
    session.refresh().unwrap();
    mock.assert_reports(&[refresh()]);
}

#[test]
fn test_delay_is_observed() {
    init_test_logging();
    let descriptors = DescriptorDir::create();
    let kb = tiny_keyboard(&descriptors);
    let mock = MockTransport::new();
    let session = kb.attach(&mock);

    let start = std::time::Instant::now();
    session.push_preset("blank").unwrap();

    // One feature report and the refresh, 10 ms each.
    assert!(start.elapsed() >= Duration::from_millis(20));
    assert_eq!(mock.report_count(), 2);
}

#[test]
fn test_owned_transport_round_trip() {
    init_test_logging();
    let descriptors = DescriptorDir::create();
    let kb = tiny_keyboard(&descriptors);
    let session = kb.attach(MockTransport::new()).with_delay(Duration::ZERO);

    session.refresh().unwrap();
    let mock = session.into_transport();
    mock.assert_single_trailing_refresh();
}
