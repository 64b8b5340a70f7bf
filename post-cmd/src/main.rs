mod commands;
mod events;
mod handlers;

use commands::{DeletePostCommand, EditMessageCommand, NewPostCommand};
use cqrs_core::{AppError, CommandBus, InMemoryCommandBus};
use events::PostEvent;
use handlers::PostCommandHandlers;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use ulid::Ulid;

fn report(command: &str, result: Result<(), AppError>) {
    match result {
        Ok(()) => tracing::info!(command, "dispatched"),
        Err(e) => tracing::warn!(command, error = %e, "dispatch failed"),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志，RUST_LOG 未设置时使用默认过滤
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("post_cmd=info,cqrs_core=debug")),
        )
        .init();

    // 启动接线：处理器只注册一次
    let bus = Arc::new(InMemoryCommandBus::with_capacity(2));
    let post_handlers = Arc::new(PostCommandHandlers::new());
    handlers::wire(&bus, post_handlers.clone())?;

    // 重复接线属于配置错误，必须暴露给调用方
    if let Err(e) = handlers::wire(&bus, post_handlers.clone()) {
        tracing::warn!(error = %e, "duplicate wiring rejected");
    }

    let post_id = Ulid::new().to_string();

    // 发帖
    let res = bus
        .dispatch(NewPostCommand {
            id: post_id.clone(),
            author: "alice".into(),
            message: "first post".into(),
        })
        .await;
    report("NewPostCommand", res);

    // 并发修改与一次针对不存在帖子的修改
    let mut edits = tokio::task::JoinSet::new();
    for (id, message) in [
        (post_id.clone(), "edited once"),
        (post_id.clone(), "edited twice"),
        ("unknown".to_string(), "nobody home"),
    ] {
        let bus = bus.clone();
        edits.spawn(async move {
            bus.dispatch(EditMessageCommand {
                id,
                message: message.into(),
            })
            .await
        });
    }
    while let Some(res) = edits.join_next().await {
        report("EditMessageCommand", res?);
    }

    // 空正文 -> 处理器校验失败
    let res = bus
        .dispatch(NewPostCommand {
            id: Ulid::new().to_string(),
            author: "bob".into(),
            message: String::new(),
        })
        .await;
    report("NewPostCommand", res);

    // 未接线的命令 -> UnregisteredHandler
    let res = bus.dispatch(DeletePostCommand { id: post_id.clone() }).await;
    report("DeletePostCommand", res);

    tracing::info!(total = post_handlers.events().await.len(), "event log");
    for event in post_handlers.events_for(&post_id).await {
        match &event {
            PostEvent::Created(e) => tracing::info!(
                event_id = event.event_id(),
                version = event.version(),
                author = e.author(),
                message = e.message(),
                date_posted = %e.date_posted(),
                "{}",
                event.event_type()
            ),
            PostEvent::MessageUpdated(e) => tracing::info!(
                event_id = event.event_id(),
                version = event.version(),
                message = e.message(),
                "{}",
                event.event_type()
            ),
        }
    }
    Ok(())
}
