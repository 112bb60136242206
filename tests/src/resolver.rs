use std::net::Ipv4Addr;

use lanmap_common::network::range::fallback_ranges;
use lanmap_core::ranges::resolve_ranges;

use crate::fakes::{FakeSystem, interface, range};

#[test]
fn no_interfaces_and_no_gateway_yield_the_four_fallbacks() {
    let ranges = resolve_ranges(None, &FakeSystem::default());
    assert_eq!(
        ranges,
        vec![
            range("192.168.1.0/24"),
            range("192.168.0.0/24"),
            range("10.0.0.0/24"),
            range("172.16.0.0/24"),
        ]
    );
    assert_eq!(ranges, fallback_ranges());
}

#[test]
fn gateway_yields_its_slash_24() {
    let system = FakeSystem {
        interfaces: vec![],
        gateway: Some(Ipv4Addr::new(10, 9, 8, 1)),
    };
    assert_eq!(resolve_ranges(None, &system), vec![range("10.9.8.0/24")]);
}

#[test]
fn interfaces_win_over_gateway_and_are_deduplicated() {
    let system = FakeSystem {
        interfaces: vec![
            interface("eth0", [192, 168, 1, 20], [255, 255, 255, 0]),
            interface("eth0:1", [192, 168, 1, 21], [255, 255, 255, 0]),
            interface("wlan0", [10, 1, 2, 3], [255, 255, 0, 0]),
        ],
        gateway: Some(Ipv4Addr::new(172, 20, 0, 1)),
    };
    let ranges = resolve_ranges(None, &system);
    assert_eq!(ranges.len(), 2);
    assert!(ranges.contains(&range("192.168.1.0/24")));
    assert!(ranges.contains(&range("10.1.0.0/16")));
}

#[test]
fn explicit_range_is_returned_as_is() {
    let system = FakeSystem {
        interfaces: vec![interface("eth0", [192, 168, 1, 20], [255, 255, 255, 0])],
        gateway: None,
    };
    let explicit = range("10.77.0.0/28");
    assert_eq!(resolve_ranges(Some(explicit), &system), vec![explicit]);
}
