use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::bail;
use colored::*;
use lanmap_common::error::ScanError;
use lanmap_common::network::host::{Device, ScanResult};
use lanmap_common::network::range::NetworkRange;
use lanmap_core::scanner::HostFoundCallback;
use lanmap_core::service::ScanService;
use tracing::{Instrument, info, info_span, warn};

use crate::commands::ScanArgs;
use crate::mprint;
use crate::terminal::format::{self, Detail};
use crate::terminal::{colors, print, spinner};

pub async fn scan(args: &ScanArgs) -> anyhow::Result<()> {
    let cfg = args.to_config()?;

    if !is_root::is_root() {
        warn!("Not running as root: ARP discovery needs raw sockets and will likely find nothing");
    }

    let span = info_span!("scan", indicatif.pb_show = true);
    spinner::attach(&span, "Preparing scan...");

    let start_time: Instant = Instant::now();
    let outcome = {
        let progress = span.clone();
        let on_host_found: HostFoundCallback =
            Arc::new(move |count| spinner::report_discovery_progress(&progress, count));
        let service = ScanService::from_config(&cfg, Some(on_host_found));
        log_ranges(service.coordinator().ranges());
        service.run_scan().instrument(span).await
    };

    match outcome {
        Ok(result) => {
            scan_ends(&result, start_time.elapsed());
            Ok(())
        }
        Err(ScanError::Timeout(deadline)) => {
            print::header("scan timed out");
            bail!(
                "no complete answer from the network within {}s; try a narrower --range or a longer --timeout",
                deadline.as_secs()
            )
        }
        Err(e) => Err(e.into()),
    }
}

fn log_ranges(ranges: &[NetworkRange]) {
    if ranges.is_empty() {
        warn!("No network range to scan");
        return;
    }
    let listed: Vec<String> = ranges.iter().map(ToString::to_string).collect();
    info!("Scanning {}", listed.join(", "));
}

fn scan_ends(result: &ScanResult, total_time: Duration) {
    if result.is_empty() {
        print::header("zero hosts detected");
        print::no_results();
        return;
    }

    print::header("network scan");
    for (idx, device) in result.iter().enumerate() {
        print_device_tree(device, idx);
        if idx + 1 != result.len() {
            mprint!();
        }
    }
    print_summary(result.len(), total_time);
}

fn print_summary(hosts_len: usize, total_time: Duration) {
    let active_hosts: ColoredString = format!("{hosts_len} devices").bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: ColoredString =
        format!("Scan Complete: {active_hosts} identified in {total_time}").color(colors::TEXT_DEFAULT);

    print::fat_separator();
    print::centerln(&output.to_string());
}

fn print_device_tree(device: &Device, idx: usize) {
    let record = &device.record;
    let hostname = record.hostname.as_deref().unwrap_or("No hostname");
    print::tree_head(idx, hostname);

    let mut details: Vec<Detail> = vec![
        format::type_to_detail(device.device_type),
        format::ipv4_to_detail(record.ip),
        format::status_to_detail(record.status),
    ];
    details.extend(format::mac_to_detail(record.mac));
    details.extend(format::vendor_to_detail(&record.vendor));
    details.extend(format::ports_to_detail(&record.ports));

    print::as_tree_one_level(details);
}
