use colored::*;
use lanmap_core::system::list_active_interfaces;

use crate::mprint;
use crate::terminal::{colors, format, print};

pub fn interfaces() {
    let interfaces = list_active_interfaces();
    if interfaces.is_empty() {
        print::no_results();
        return;
    }

    for (idx, interface) in interfaces.iter().enumerate() {
        print::tree_head(idx, &interface.name);
        let mut details: Vec<format::Detail> = vec![
            format::ipv4_to_detail(interface.address),
            (
                "Mask".to_string(),
                interface.netmask.to_string().color(colors::IPV4_PREFIX),
            ),
        ];
        if let Ok(range) = interface.range() {
            details.push(("Range".to_string(), format::range_to_value(&range)));
        }
        print::as_tree_one_level(details);
        if idx + 1 != interfaces.len() {
            mprint!();
        }
    }
}
