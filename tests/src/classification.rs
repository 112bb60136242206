use std::net::Ipv4Addr;

use lanmap_common::device::DeviceType;
use lanmap_common::network::host::{HostRecord, UNKNOWN_VENDOR};
use lanmap_core::classifier::classify;

fn record(ip: [u8; 4]) -> HostRecord {
    HostRecord::new(Ipv4Addr::from(ip))
}

fn samples() -> Vec<HostRecord> {
    vec![
        record([192, 168, 1, 1]).with_ports([80]).with_vendor("Samsung"),
        record([192, 168, 1, 50]).with_ports([80, 443, 22]),
        record([192, 168, 1, 60]).with_mac("00:0c:29:aa:bb:cc".parse().unwrap()),
        record([192, 168, 1, 61]).with_vendor(UNKNOWN_VENDOR),
        record([192, 168, 1, 62])
            .with_hostname("front-door-cam")
            .with_vendor("Apple"),
        record([192, 168, 1, 63]).with_hostname("office-printer").with_ports([9100]),
        record([192, 168, 1, 64]).with_vendor("Synology").with_ports([5000, 5001]),
    ]
}

#[test]
fn classification_is_deterministic_regardless_of_call_order() {
    let records = samples();
    let forward: Vec<DeviceType> = records.iter().map(classify).collect();
    let backward: Vec<DeviceType> = records.iter().rev().map(classify).collect();
    let backward: Vec<DeviceType> = backward.into_iter().rev().collect();
    assert_eq!(forward, backward);

    for _ in 0..3 {
        assert_eq!(records.iter().map(classify).collect::<Vec<_>>(), forward);
    }
}

#[test]
fn documented_outcomes() {
    let expected = [
        DeviceType::Router,
        DeviceType::WebServer,
        DeviceType::VirtualMachine,
        DeviceType::Unknown,
        DeviceType::SecurityCamera,
        DeviceType::Printer,
        DeviceType::StorageDevice,
    ];
    let actual: Vec<DeviceType> = samples().iter().map(classify).collect();
    assert_eq!(actual, expected);
}

#[test]
fn unknown_label() {
    assert_eq!(classify(&record([10, 0, 0, 9])).as_str(), "Unknown Device");
}
