//! 帖子命令侧的具体命令
use cqrs_core::Command;

/// 发布新帖子
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPostCommand {
    pub id: String,
    pub author: String,
    pub message: String,
}

impl Command for NewPostCommand {
    const NAME: &'static str = "NewPostCommand";

    fn aggregate_id(&self) -> &str {
        &self.id
    }
}

/// 修改帖子正文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditMessageCommand {
    pub id: String,
    pub message: String,
}

impl Command for EditMessageCommand {
    const NAME: &'static str = "EditMessageCommand";

    fn aggregate_id(&self) -> &str {
        &self.id
    }
}

/// 删除帖子（本服务未接线，用于演示未注册命令）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePostCommand {
    pub id: String,
}

impl Command for DeletePostCommand {
    const NAME: &'static str = "DeletePostCommand";

    fn aggregate_id(&self) -> &str {
        &self.id
    }
}
