use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use tokio::sync::{oneshot, watch};

use super::task::{UploadStatus, UploadTask};

type ProgressCallback = dyn Fn(u8) + Send + Sync;

#[derive(Debug, Default)]
struct ReporterState {
    last: u8,
    closed: bool,
}

/// 单次上传交给传输层的进度通道
///
/// 进度截断到 0..=100，只有超过上次上报值时才转发，回调看到的序列单调不减。
/// 调用 `finish` 或 `close` 之后不再转发任何进度。
#[derive(Clone)]
pub struct ProgressReporter {
    callback: Arc<ProgressCallback>,
    state: Arc<Mutex<ReporterState>>,
}

impl ProgressReporter {
    pub fn new(callback: impl Fn(u8) + Send + Sync + 'static) -> Self {
        Self {
            callback: Arc::new(callback),
            state: Arc::new(Mutex::new(ReporterState::default())),
        }
    }

    pub fn noop() -> Self {
        Self::new(|_| {})
    }

    pub fn report(&self, percent: u8) {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(poisoned) => poisoned.into_inner(),
        };
        let percent = percent.min(100);
        if state.closed || percent <= state.last {
            return;
        }
        state.last = percent;
        // 持锁回调，保证并发上报时顺序一致
        (self.callback)(percent);
    }

    // 传输成功：补齐 100 并关闭
    pub fn finish(&self) {
        self.report(100);
        self.close();
    }

    pub fn close(&self) {
        match self.state.lock() {
            Ok(mut state) => state.closed = true,
            Err(poisoned) => poisoned.into_inner().closed = true,
        }
    }

    pub fn last(&self) -> u8 {
        match self.state.lock() {
            Ok(state) => state.last,
            Err(poisoned) => poisoned.into_inner().last,
        }
    }

    pub fn is_closed(&self) -> bool {
        match self.state.lock() {
            Ok(state) => state.closed,
            Err(poisoned) => poisoned.into_inner().closed,
        }
    }
}

// --------------------------------------------------------------------

// 终端多进度条，跟随任务列表的快照刷新
pub struct BatchProgress {
    multi_pb: MultiProgress,
    bars: HashMap<String, ProgressBar>,
}

impl BatchProgress {
    pub fn new() -> Self {
        Self {
            multi_pb: MultiProgress::new(),
            bars: HashMap::new(),
        }
    }

    // 共享给终端通知，打印时先挂起进度条
    pub fn multi(&self) -> MultiProgress {
        self.multi_pb.clone()
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .map(|style| style.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
    }

    pub fn render(&mut self, tasks: &[UploadTask]) {
        for task in tasks {
            let pb = self.bars.entry(task.id.clone()).or_insert_with(|| {
                let pb = self.multi_pb.add(ProgressBar::new(100));
                pb.set_style(Self::style());
                pb
            });
            if pb.is_finished() {
                continue;
            }

            pb.set_position(task.progress as u64);
            let message = format!("{} [{}]", task.file.name, task.status);
            match task.status {
                UploadStatus::Completed => pb.finish_with_message(format!("{} ✅", task.file.name)),
                UploadStatus::Error => pb.abandon_with_message(format!(
                    "{} ❌ {}",
                    task.file.name,
                    task.error.as_deref().unwrap_or_default()
                )),
                _ => pb.set_message(message),
            }
        }
    }

    // 跟随快照直到收到停止信号或发送端关闭
    pub async fn follow(
        mut self,
        mut tasks: watch::Receiver<Vec<UploadTask>>,
        mut stop: oneshot::Receiver<()>,
    ) {
        loop {
            tokio::select! {
                changed = tasks.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let snapshot = tasks.borrow_and_update().clone();
                    self.render(&snapshot);
                }
                _ = &mut stop => break,
            }
        }

        let snapshot = tasks.borrow().clone();
        self.render(&snapshot);
    }
}

impl Default for BatchProgress {
    fn default() -> Self {
        Self::new()
    }
}
