use std::{
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};

// 所有延时和时间戳都经过 Clock，测试里可以替换成手动时钟
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);

    fn now(&self) -> DateTime<Utc>;
}

// 真实时钟
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 虚拟时钟：`sleep` 立即推进时间，只让出一次调度
#[derive(Debug)]
pub struct ManualClock {
    start: DateTime<Utc>,
    elapsed: Mutex<Duration>,
    sleeps: AtomicUsize,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            start,
            elapsed: Mutex::new(Duration::ZERO),
            sleeps: AtomicUsize::new(0),
        }
    }

    pub fn advance(&self, duration: Duration) {
        match self.elapsed.lock() {
            Ok(mut elapsed) => *elapsed += duration,
            Err(poisoned) => *poisoned.into_inner() += duration,
        }
    }

    pub fn elapsed(&self) -> Duration {
        match self.elapsed.lock() {
            Ok(elapsed) => *elapsed,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    // sleep 被调用的次数
    pub fn sleep_count(&self) -> usize {
        self.sleeps.load(Ordering::SeqCst)
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Clock for ManualClock {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.fetch_add(1, Ordering::SeqCst);
        self.advance(duration);
        tokio::task::yield_now().await;
    }

    fn now(&self) -> DateTime<Utc> {
        self.start + TimeDelta::from_std(self.elapsed()).unwrap_or(TimeDelta::zero())
    }
}
