//! 命令处理后产生的帖子事件
//!
//! 每个事件带有基础字段：事件 ID、所属帖子、聚合版本与事件类型名。
//!
use bon::Builder;
use chrono::{DateTime, Utc};
use ulid::Ulid;

#[derive(Builder, Debug, Clone, PartialEq)]
pub struct PostCreatedEvent {
    #[builder(default = Ulid::new().to_string())]
    id: String,
    post_id: String,
    version: usize,
    author: String,
    message: String,
    #[builder(default = Utc::now())]
    date_posted: DateTime<Utc>,
}

impl PostCreatedEvent {
    pub const TYPE: &'static str = "PostCreatedEvent";

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn date_posted(&self) -> &DateTime<Utc> {
        &self.date_posted
    }
}

#[derive(Builder, Debug, Clone, PartialEq)]
pub struct MessageUpdatedEvent {
    #[builder(default = Ulid::new().to_string())]
    id: String,
    post_id: String,
    version: usize,
    message: String,
}

impl MessageUpdatedEvent {
    pub const TYPE: &'static str = "MessageUpdatedEvent";

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PostEvent {
    Created(PostCreatedEvent),
    MessageUpdated(MessageUpdatedEvent),
}

impl PostEvent {
    pub fn event_id(&self) -> &str {
        match self {
            PostEvent::Created(e) => &e.id,
            PostEvent::MessageUpdated(e) => &e.id,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            PostEvent::Created(_) => PostCreatedEvent::TYPE,
            PostEvent::MessageUpdated(_) => MessageUpdatedEvent::TYPE,
        }
    }

    pub fn post_id(&self) -> &str {
        match self {
            PostEvent::Created(e) => &e.post_id,
            PostEvent::MessageUpdated(e) => &e.post_id,
        }
    }

    pub fn version(&self) -> usize {
        match self {
            PostEvent::Created(e) => e.version,
            PostEvent::MessageUpdated(e) => e.version,
        }
    }
}
