//! 帖子命令处理器
//!
//! 处理器校验命令载荷，根据已有事件推导帖子当前版本，并把新事件追加到
//! 进程内的事件日志中。事件日志仅用于演示，不做持久化。
//!
use crate::commands::{EditMessageCommand, NewPostCommand};
use crate::events::{MessageUpdatedEvent, PostCreatedEvent, PostEvent};
use async_trait::async_trait;
use cqrs_core::{AppError, AppResult, CommandHandler, InMemoryCommandBus};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Default)]
pub struct PostCommandHandlers {
    log: Mutex<Vec<PostEvent>>,
}

impl PostCommandHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// 事件日志快照
    pub async fn events(&self) -> Vec<PostEvent> {
        self.log.lock().await.clone()
    }

    pub async fn events_for(&self, post_id: &str) -> Vec<PostEvent> {
        self.log
            .lock()
            .await
            .iter()
            .filter(|e| e.post_id() == post_id)
            .cloned()
            .collect()
    }
}

fn current_version(log: &[PostEvent], post_id: &str) -> usize {
    log.iter()
        .filter(|e| e.post_id() == post_id)
        .map(PostEvent::version)
        .max()
        .unwrap_or(0)
}

fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

#[async_trait]
impl CommandHandler<NewPostCommand> for PostCommandHandlers {
    async fn handle(&self, cmd: NewPostCommand) -> Result<(), AppError> {
        require_non_empty("author", &cmd.author)?;
        require_non_empty("message", &cmd.message)?;

        let mut log = self.log.lock().await;
        if current_version(&log, &cmd.id) > 0 {
            return Err(AppError::Conflict(format!("post {} already exists", cmd.id)));
        }

        let event = PostCreatedEvent::builder()
            .post_id(cmd.id)
            .version(1)
            .author(cmd.author)
            .message(cmd.message)
            .build();
        tracing::info!(author = event.author(), "post created");
        log.push(PostEvent::Created(event));
        Ok(())
    }
}

#[async_trait]
impl CommandHandler<EditMessageCommand> for PostCommandHandlers {
    async fn handle(&self, cmd: EditMessageCommand) -> Result<(), AppError> {
        require_non_empty("message", &cmd.message)?;

        let mut log = self.log.lock().await;
        let version = current_version(&log, &cmd.id);
        if version == 0 {
            return Err(AppError::AggregateNotFound(cmd.id));
        }

        let event = MessageUpdatedEvent::builder()
            .post_id(cmd.id)
            .version(version + 1)
            .message(cmd.message)
            .build();
        tracing::info!(version = version + 1, "post message updated");
        log.push(PostEvent::MessageUpdated(event));
        Ok(())
    }
}

/// 启动接线：为帖子命令注册处理器（只应调用一次）
///
/// 重复接线以 [`AppError::DuplicateHandler`] 返回。
pub fn wire(bus: &InMemoryCommandBus, handlers: Arc<PostCommandHandlers>) -> AppResult<()> {
    bus.register::<NewPostCommand, _>(handlers.clone())?;
    bus.register::<EditMessageCommand, _>(handlers)?;
    Ok(())
}
