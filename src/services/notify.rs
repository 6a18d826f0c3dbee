use std::sync::Mutex;

use indicatif::MultiProgress;
use serde::Serialize;

use crate::common::logger::PrettyLogger;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(kind: NotificationKind, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, title, message)
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Warning, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, title, message)
    }
}

// 通知出口，发送即结束，不需要确认
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}

// 终端输出；有进度条在绘制时先挂起再打印，避免输出交错
#[derive(Default)]
pub struct ConsoleNotifier {
    multi_pb: Option<MultiProgress>,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress(multi_pb: MultiProgress) -> Self {
        Self {
            multi_pb: Some(multi_pb),
        }
    }
}

impl NotificationSink for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match &self.multi_pb {
            Some(multi_pb) => multi_pb.suspend(|| PrettyLogger::notification(&notification)),
            None => PrettyLogger::notification(&notification),
        }
    }
}

// 记录到内存，供嵌入方轮询或测试断言
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    items: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<Notification> {
        self.items
            .lock()
            .map(|items| items.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    pub fn of_kind(&self, kind: NotificationKind) -> Vec<Notification> {
        self.all().into_iter().filter(|n| n.kind == kind).collect()
    }

    pub fn take(&self) -> Vec<Notification> {
        match self.items.lock() {
            Ok(mut items) => std::mem::take(&mut *items),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl NotificationSink for MemoryNotifier {
    fn notify(&self, notification: Notification) {
        match self.items.lock() {
            Ok(mut items) => items.push(notification),
            Err(poisoned) => poisoned.into_inner().push(notification),
        }
    }
}
