use crate::{command::Command, error::AppError};
use async_trait::async_trait;

/// 命令总线（Command Bus）
///
/// - 负责根据命令的变体标签路由到唯一的处理器；
/// - 处理器的结果原样返回，总线不包装、不吞掉、不重试；
/// - 该 trait 带有泛型方法，通常以具体实现类型注入使用。
#[async_trait]
pub trait CommandBus: Send + Sync {
    /// 分发命令到对应处理器
    ///
    /// 未注册的命令返回 [`AppError::UnregisteredHandler`]。
    async fn dispatch<C>(&self, cmd: C) -> Result<(), AppError>
    where
        C: Command;
}
