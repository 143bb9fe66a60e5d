use crate::{
    reminder::process_due_reminders::{ProcessDueRemindersUseCase, ProcessedReminders, UseCaseError},
    shared::usecase::execute,
};
use chime_infra::ChimeContext;
use chrono::{DateTime, Utc};
use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, Mutex, RwLock,
};
use std::time::Duration;
use tokio::{
    sync::mpsc,
    task::{JoinHandle, JoinSet},
    time::{interval, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Counters shared between the scheduler driver and the status endpoint
#[derive(Debug)]
pub struct SchedulerMetrics {
    total_processed: AtomicU64,
    total_failed: AtomicU64,
    check_count: AtomicU64,
    healthy: AtomicBool,
    last_run_at: RwLock<Option<DateTime<Utc>>>,
}

impl Default for SchedulerMetrics {
    fn default() -> Self {
        Self {
            total_processed: AtomicU64::new(0),
            total_failed: AtomicU64::new(0),
            check_count: AtomicU64::new(0),
            healthy: AtomicBool::new(true),
            last_run_at: RwLock::new(None),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerStats {
    pub running: bool,
    pub healthy: bool,
    pub total_processed: u64,
    pub total_failed: u64,
    pub check_count: u64,
    pub last_run_at: Option<DateTime<Utc>>,
}

impl SchedulerMetrics {
    fn record_cycle(&self, res: &ProcessedReminders, at: DateTime<Utc>) {
        self.total_processed
            .fetch_add(res.sent as u64, Ordering::SeqCst);
        self.total_failed.fetch_add(res.failed as u64, Ordering::SeqCst);
        self.healthy.store(true, Ordering::SeqCst);
        self.set_last_run(at);
    }

    fn record_error(&self, failed: usize, at: DateTime<Utc>) {
        self.total_failed.fetch_add(failed as u64, Ordering::SeqCst);
        self.healthy.store(false, Ordering::SeqCst);
        self.set_last_run(at);
    }

    fn set_last_run(&self, at: DateTime<Utc>) {
        let mut last_run_at = match self.last_run_at.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *last_run_at = Some(at);
    }

    pub fn last_run_at(&self) -> Option<DateTime<Utc>> {
        match self.last_run_at.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub fn total_processed(&self) -> u64 {
        self.total_processed.load(Ordering::SeqCst)
    }

    pub fn total_failed(&self) -> u64 {
        self.total_failed.load(Ordering::SeqCst)
    }

    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }
}

struct Driver {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Periodically delivers due reminders.
///
/// At most one driver task exists per scheduler. It starts a cycle right away
/// and then once per `interval`. Cycles run on their own tasks, so a delivery
/// that is backing off never delays the next tick. Stopping waits for the
/// cycles that are still running.
pub struct ReminderScheduler {
    ctx: ChimeContext,
    interval: Duration,
    metrics: Arc<SchedulerMetrics>,
    driver: Mutex<Option<Driver>>,
    test_hook: Mutex<Option<mpsc::Sender<usize>>>,
}

impl ReminderScheduler {
    pub fn new(ctx: ChimeContext) -> Self {
        Self {
            interval: ctx.config.scheduler.interval,
            ctx,
            metrics: Arc::new(SchedulerMetrics::default()),
            driver: Mutex::new(None),
            test_hook: Mutex::new(None),
        }
    }

    /// Every finished cycle reports its sent count on the returned receiver.
    /// Reports are dropped when the receiver lags behind.
    pub fn enable_test_hook(&self, buffer: usize) -> mpsc::Receiver<usize> {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        *self.lock_test_hook() = Some(tx);
        rx
    }

    pub fn start(&self, parent: &CancellationToken) {
        let mut driver = self.lock_driver();
        if let Some(current) = driver.as_ref() {
            if !current.handle.is_finished() {
                info!("Reminder scheduler is already running");
                return;
            }
        }

        let token = parent.child_token();
        let ctx = self.ctx.clone();
        let metrics = self.metrics.clone();
        let hook = self.lock_test_hook().clone();
        let period = self.interval;
        let cycle_token = token.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut cycles = JoinSet::new();
            loop {
                tokio::select! {
                    biased;
                    _ = cycle_token.cancelled() => break,
                    Some(joined) = cycles.join_next(), if !cycles.is_empty() => {
                        if let Err(e) = joined {
                            warn!("Reminder cycle ended abnormally: {}", e);
                        }
                        continue;
                    }
                    _ = ticker.tick() => {}
                }

                let ctx = ctx.clone();
                let metrics = metrics.clone();
                let hook = hook.clone();
                cycles.spawn(async move {
                    if let Ok(res) = run_cycle(&ctx, &metrics).await {
                        if let Some(hook) = &hook {
                            let _ = hook.try_send(res.sent);
                        }
                    }
                });
            }

            while let Some(joined) = cycles.join_next().await {
                if let Err(e) = joined {
                    warn!("Reminder cycle ended abnormally: {}", e);
                }
            }
            info!("Reminder scheduler stopped");
        });

        info!("Reminder scheduler started with an interval of {:?}", period);
        *driver = Some(Driver { token, handle });
    }

    /// Cancels the driver and waits for the running cycles to finish
    pub async fn stop(&self) {
        let driver = self.lock_driver().take();
        if let Some(driver) = driver {
            driver.token.cancel();
            if let Err(e) = driver.handle.await {
                warn!("Reminder scheduler task ended abnormally: {}", e);
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.lock_driver()
            .as_ref()
            .map(|driver| !driver.handle.is_finished())
            .unwrap_or(false)
    }

    /// Runs a single cycle on the caller's task and returns the sent count
    pub async fn run_once(&self) -> Result<usize, UseCaseError> {
        run_cycle(&self.ctx, &self.metrics).await.map(|res| res.sent)
    }

    pub fn metrics(&self) -> Arc<SchedulerMetrics> {
        self.metrics.clone()
    }

    /// Snapshot for health reporting. Every call counts as one check.
    pub fn health_check(&self) -> SchedulerStats {
        let check_count = self.metrics.check_count.fetch_add(1, Ordering::SeqCst) + 1;
        SchedulerStats {
            running: self.is_running(),
            healthy: self.metrics.is_healthy(),
            total_processed: self.metrics.total_processed(),
            total_failed: self.metrics.total_failed(),
            check_count,
            last_run_at: self.metrics.last_run_at(),
        }
    }

    fn lock_driver(&self) -> std::sync::MutexGuard<'_, Option<Driver>> {
        match self.driver.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn lock_test_hook(&self) -> std::sync::MutexGuard<'_, Option<mpsc::Sender<usize>>> {
        match self.test_hook.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

async fn run_cycle(
    ctx: &ChimeContext,
    metrics: &SchedulerMetrics,
) -> Result<ProcessedReminders, UseCaseError> {
    let res = execute(ProcessDueRemindersUseCase {}, ctx).await;
    let now = ctx.sys.now();
    match &res {
        Ok(processed) => metrics.record_cycle(processed, now),
        Err(UseCaseError::NotifierNotConfigured { failed }) => metrics.record_error(*failed, now),
    }
    res
}
