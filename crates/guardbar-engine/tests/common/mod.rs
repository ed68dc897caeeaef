//! Scriptable in-memory AdGuard Home for engine tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use guardbar_core::{GuardError, ProtectionStatus, RemoteStateClient, Result, Stats};
use guardbar_engine::{EngineConfig, Reconciler};

#[derive(Default)]
pub struct MockAppliance {
    enabled: AtomicBool,
    ignore_writes: AtomicBool,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    read_latency: Mutex<Duration>,
    write_latency: Mutex<Duration>,
    writes: Mutex<Vec<bool>>,
    status_reads: AtomicUsize,
    stats_reads: AtomicUsize,
}

impl MockAppliance {
    pub fn new(enabled: bool) -> Arc<Self> {
        let appliance = Self::default();
        appliance.enabled.store(enabled, Ordering::SeqCst);
        Arc::new(appliance)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    /// Accept writes without changing the protection state
    pub fn ignore_writes(&self, ignore: bool) {
        self.ignore_writes.store(ignore, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_read_latency(&self, latency: Duration) {
        *self.read_latency.lock().unwrap() = latency;
    }

    pub fn set_write_latency(&self, latency: Duration) {
        *self.write_latency.lock().unwrap() = latency;
    }

    pub fn writes(&self) -> Vec<bool> {
        self.writes.lock().unwrap().clone()
    }

    pub fn status_reads(&self) -> usize {
        self.status_reads.load(Ordering::SeqCst)
    }

    pub fn stats_reads(&self) -> usize {
        self.stats_reads.load(Ordering::SeqCst)
    }
}

async fn delay(latency: &Mutex<Duration>) {
    let latency = *latency.lock().unwrap();
    if !latency.is_zero() {
        tokio::time::sleep(latency).await;
    }
}

#[async_trait]
impl RemoteStateClient for MockAppliance {
    async fn fetch_status(&self) -> Result<ProtectionStatus> {
        self.status_reads.fetch_add(1, Ordering::SeqCst);
        // The value is read when the request is served, not when it lands
        let failing = self.fail_reads.load(Ordering::SeqCst);
        let enabled = self.enabled.load(Ordering::SeqCst);
        delay(&self.read_latency).await;
        if failing {
            return Err(GuardError::Timeout(10));
        }
        Ok(ProtectionStatus::new(enabled, true))
    }

    async fn fetch_stats(&self) -> Result<Stats> {
        self.stats_reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(GuardError::Timeout(10));
        }
        Ok(Stats {
            num_dns_queries: 5678,
            num_blocked_filtering: 1234,
            num_replaced_safebrowsing: 12,
            avg_processing_time: 0.042,
        })
    }

    async fn set_protection(&self, enabled: bool) -> Result<()> {
        delay(&self.write_latency).await;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(GuardError::Connection("connection reset by peer".into()));
        }
        self.writes.lock().unwrap().push(enabled);
        if !self.ignore_writes.load(Ordering::SeqCst) {
            self.enabled.store(enabled, Ordering::SeqCst);
        }
        Ok(())
    }
}

/// Engine with polling off so tests drive every refresh explicitly
pub fn engine(appliance: &Arc<MockAppliance>) -> Reconciler {
    engine_with_config(
        appliance,
        EngineConfig {
            polling_enabled: false,
            ..EngineConfig::default()
        },
    )
}

pub fn engine_with_config(appliance: &Arc<MockAppliance>, config: EngineConfig) -> Reconciler {
    Reconciler::new(Arc::clone(appliance) as Arc<dyn RemoteStateClient>, config)
}

/// Let spawned tasks run up to their next suspension point
pub async fn settle() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}
