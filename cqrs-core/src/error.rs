//! 应用层错误定义
//!
//! - 路由错误（重复注册 / 未注册）为接线缺陷，不可重试；
//! - 处理器自身产生的错误由总线原样返回，不做包装。
//!
use thiserror::Error;

/// 同一命令标签被注册了两次
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("handler already registered: command={command}")]
pub struct DuplicateHandlerError {
    pub command: &'static str,
}

/// 分发的命令没有绑定任何处理器
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("no handler registered: command={command}")]
pub struct UnregisteredHandlerError {
    pub command: &'static str,
}

#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    #[error("validation: {0}")]
    Validation(String),

    #[error("infra: {0}")]
    Infra(String),

    #[error("aggregate not found: {0}")]
    AggregateNotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    UnregisteredHandler(#[from] UnregisteredHandlerError),

    #[error(transparent)]
    DuplicateHandler(#[from] DuplicateHandlerError),

    #[error("type mismatch: expected={expected}, found={found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

/// 统一 Result 类型别名
pub type AppResult<T> = Result<T, AppError>;
