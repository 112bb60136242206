use colored::*;
use lanmap_common::network::host::HostRecord;
use lanmap_common::network::mac;
use lanmap_core::classifier;

use crate::commands::ClassifyArgs;
use crate::terminal::{colors, format, print};

const KEY_WIDTH: usize = 8;

pub fn classify(args: &ClassifyArgs) {
    let record = build_record(args);
    let device_type = classifier::classify(&record);

    print::aligned_line("IPv4", record.ip.to_string().color(colors::IPV4_ADDR), KEY_WIDTH);
    if let Some(mac) = record.mac {
        print::aligned_line("MAC", mac.to_string().color(colors::MAC_ADDR), KEY_WIDTH);
    }
    print::aligned_line("Vendor", record.vendor.color(colors::VENDOR), KEY_WIDTH);
    if let Some(hostname) = &record.hostname {
        print::aligned_line("Hostname", hostname.color(colors::PRIMARY), KEY_WIDTH);
    }
    print::aligned_line("Ports", format::join_ports(&record.ports).color(colors::PORTS), KEY_WIDTH);
    print::fat_separator();
    print::centerln(&device_type.as_str().color(colors::DEVICE_TYPE).bold().to_string());
}

fn build_record(args: &ClassifyArgs) -> HostRecord {
    let mut record = HostRecord::new(args.ip).with_ports(args.ports.iter().copied());
    record.mac = args.mac;
    record.hostname = args.hostname.clone();

    let vendor = args
        .vendor
        .clone()
        .or_else(|| args.mac.and_then(mac::get_vendor));
    if let Some(vendor) = vendor {
        record.vendor = vendor;
    }
    record
}
