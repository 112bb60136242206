//! # Scan Coordination
//!
//! Drives one scan cycle: every resolved range is swept by the [`Discoverer`] in
//! turn, and each candidate it returns is handed to a fixed-width pool of probe
//! workers. Records flow back over a channel to a single aggregator, which keeps
//! the first record seen for every address and labels it with the classifier.
//!
//! [`ScanCoordinator::scan`] always returns a [`ScanResult`], possibly empty.
//! Deadlines and "scan already running" are the business of
//! [`crate::service::ScanService`].
//!
//! Dropping a scan future aborts its workers.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::sync::Arc;

use anyhow::Context;
use lanmap_common::network::host::{HostRecord, ScanResult};
use lanmap_common::network::range::NetworkRange;
use pnet::util::MacAddr;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::classifier;
use crate::discovery::Discoverer;
use crate::prober::Prober;

/// Called with the running total every time a new host is recorded.
pub type HostFoundCallback = Arc<dyn Fn(usize) + Send + Sync>;

type Job = (Ipv4Addr, Option<MacAddr>);

pub struct ScanCoordinator {
    ranges: Vec<NetworkRange>,
    discoverer: Arc<dyn Discoverer>,
    prober: Arc<dyn Prober>,
    workers: usize,
    on_host_found: Option<HostFoundCallback>,
}

impl ScanCoordinator {
    pub fn new(
        ranges: Vec<NetworkRange>,
        discoverer: Arc<dyn Discoverer>,
        prober: Arc<dyn Prober>,
        workers: usize,
    ) -> Self {
        Self {
            ranges,
            discoverer,
            prober,
            workers: workers.max(1),
            on_host_found: None,
        }
    }

    pub fn with_host_callback(mut self, callback: HostFoundCallback) -> Self {
        self.on_host_found = Some(callback);
        self
    }

    pub fn ranges(&self) -> &[NetworkRange] {
        &self.ranges
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub async fn scan(&self) -> ScanResult {
        match self.collect_records().await {
            Ok(records) => {
                let devices: Vec<_> = records.into_values().map(classifier::label).collect();
                info!("Scan complete: {} devices found", devices.len());
                ScanResult::new(devices)
            }
            Err(e) => {
                error!("Scan error: {e:#}");
                ScanResult::default()
            }
        }
    }

    async fn collect_records(&self) -> anyhow::Result<BTreeMap<Ipv4Addr, HostRecord>> {
        let mut records = BTreeMap::new();

        for &range in &self.ranges {
            info!("Scanning network range: {range}");
            let candidates = self.discoverer.discover(range).await;

            // An address already probed through an earlier range keeps its first record.
            let jobs: Vec<Job> = candidates
                .into_iter()
                .filter(|(ip, _)| !records.contains_key(ip))
                .collect();
            if jobs.is_empty() {
                debug!("No new candidates in {range}");
                continue;
            }

            self.probe_candidates(jobs, &mut records)
                .await
                .with_context(|| format!("probing candidates in {range}"))?;
        }

        Ok(records)
    }

    async fn probe_candidates(
        &self,
        jobs: Vec<Job>,
        records: &mut BTreeMap<Ipv4Addr, HostRecord>,
    ) -> anyhow::Result<()> {
        let width = self.workers.min(jobs.len());
        debug!("Probing {} candidates with {width} workers", jobs.len());

        let (job_tx, job_rx) = mpsc::unbounded_channel();
        for job in jobs {
            job_tx.send(job).context("queueing probe job")?;
        }
        drop(job_tx);

        let queue = Arc::new(Mutex::new(job_rx));
        let (result_tx, mut result_rx) = mpsc::unbounded_channel::<HostRecord>();
        let mut pool = JoinSet::new();

        for _ in 0..width {
            let queue = queue.clone();
            let prober = self.prober.clone();
            let results = result_tx.clone();
            pool.spawn(async move {
                loop {
                    let next = queue.lock().await.recv().await;
                    let Some((ip, mac)) = next else { break };
                    let Some(record) = prober.probe(ip, mac).await else { continue };
                    if results.send(record).is_err() {
                        break;
                    }
                }
            });
        }
        drop(result_tx);

        while let Some(record) = result_rx.recv().await {
            if records.contains_key(&record.ip) {
                continue;
            }
            debug!("Recorded host {}", record.ip);
            records.insert(record.ip, record);
            if let Some(callback) = &self.on_host_found {
                callback(records.len());
            }
        }

        while let Some(joined) = pool.join_next().await {
            joined.context("probe worker stopped unexpectedly")?;
        }
        Ok(())
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
