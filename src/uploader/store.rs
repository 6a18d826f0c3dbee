use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use super::clock::Clock;
use super::error::StoreError;
use super::task::{UploadStatus, UploadTask};
use crate::common::models::{DocumentId, UploadFile};

/// 上传任务列表的唯一持有者
///
/// 所有修改都经过这里，状态转换在此校验，每次修改都会向订阅方推送新快照。
pub struct TaskStore {
    tasks: watch::Sender<Vec<UploadTask>>,
    clock: Arc<dyn Clock>,
}

impl TaskStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            tasks: watch::Sender::new(Vec::new()),
            clock,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<UploadTask>> {
        self.tasks.subscribe()
    }

    pub fn snapshot(&self) -> Vec<UploadTask> {
        self.tasks.borrow().clone()
    }

    pub fn get(&self, task_id: &str) -> Option<UploadTask> {
        self.tasks.borrow().iter().find(|t| t.id == task_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.borrow().is_empty()
    }

    // 是否还有未结束的任务
    pub fn has_active(&self) -> bool {
        self.tasks.borrow().iter().any(|t| t.status.is_active())
    }

    // 新任务总是从 Uploading 开始
    pub fn insert(&self, file: UploadFile) -> String {
        let task = UploadTask::new(file, self.clock.now());
        let task_id = task.id.clone();
        self.tasks.send_modify(|tasks| tasks.push(task));
        task_id
    }

    // 进度只在上传阶段生效，且只增不减
    pub fn set_progress(&self, task_id: &str, progress: u8) -> Result<(), StoreError> {
        let now = self.clock.now();
        self.mutate(task_id, |task| {
            if task.status != UploadStatus::Uploading {
                return Ok(false);
            }
            let progress = progress.min(100);
            if progress <= task.progress {
                return Ok(false);
            }
            task.progress = progress;
            task.updated_at = now;
            Ok(true)
        })
    }

    pub fn transition(&self, task_id: &str, next: UploadStatus) -> Result<(), StoreError> {
        let now = self.clock.now();
        self.mutate(task_id, |task| {
            if !task.status.can_advance_to(next) {
                return Err(StoreError::InvalidTransition {
                    from: task.status,
                    to: next,
                });
            }
            debug!("任务状态变更: {} {} -> {}", task.id, task.status, next);
            if task.status == UploadStatus::Uploading && next != UploadStatus::Error {
                task.progress = 100;
            }
            task.status = next;
            task.updated_at = now;
            Ok(true)
        })
    }

    pub fn fail(&self, task_id: &str, message: impl Into<String>) -> Result<(), StoreError> {
        let message = message.into();
        let now = self.clock.now();
        self.mutate(task_id, |task| {
            if !task.status.can_advance_to(UploadStatus::Error) {
                return Err(StoreError::InvalidTransition {
                    from: task.status,
                    to: UploadStatus::Error,
                });
            }
            task.status = UploadStatus::Error;
            task.error = Some(message);
            task.updated_at = now;
            Ok(true)
        })
    }

    pub fn set_document_id(&self, task_id: &str, document_id: DocumentId) -> Result<(), StoreError> {
        let now = self.clock.now();
        self.mutate(task_id, |task| {
            if task.document_id.is_some() {
                return Err(StoreError::DocumentIdAlreadySet(task.id.clone()));
            }
            task.document_id = Some(document_id);
            task.updated_at = now;
            Ok(true)
        })
    }

    // 只能移除已结束的任务
    pub fn remove(&self, task_id: &str) -> Result<UploadTask, StoreError> {
        let mut outcome = Err(StoreError::TaskNotFound(task_id.to_string()));
        self.tasks.send_if_modified(|tasks| {
            let Some(index) = tasks.iter().position(|t| t.id == task_id) else {
                return false;
            };
            if tasks[index].status.is_active() {
                outcome = Err(StoreError::TaskActive(task_id.to_string()));
                return false;
            }
            outcome = Ok(tasks.remove(index));
            true
        });
        outcome
    }

    // 清空所有已结束的任务，返回移除数量
    pub fn clear_finished(&self) -> usize {
        let mut removed = 0;
        self.tasks.send_if_modified(|tasks| {
            let before = tasks.len();
            tasks.retain(|t| t.status.is_active());
            removed = before - tasks.len();
            removed > 0
        });
        removed
    }

    fn mutate<F>(&self, task_id: &str, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut UploadTask) -> Result<bool, StoreError>,
    {
        let mut outcome = Err(StoreError::TaskNotFound(task_id.to_string()));
        self.tasks.send_if_modified(|tasks| {
            let Some(task) = tasks.iter_mut().find(|t| t.id == task_id) else {
                return false;
            };
            match f(task) {
                Ok(changed) => {
                    outcome = Ok(());
                    changed
                }
                Err(e) => {
                    outcome = Err(e);
                    false
                }
            }
        });
        outcome
    }
}
