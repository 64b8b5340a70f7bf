use crate::{command::Command, error::AppError};
use async_trait::async_trait;
use std::future::Future;
use std::marker::PhantomData;

#[async_trait]
pub trait CommandHandler<C>: Send + Sync
where
    C: Command,
{
    async fn handle(&self, cmd: C) -> Result<(), AppError>;
}

/// 将 `async fn(C) -> Result<(), AppError>` 形式的函数/闭包适配为 [`CommandHandler`]
pub struct FnHandler<C, F> {
    f: F,
    _cmd: PhantomData<fn(C)>,
}

impl<C, F> FnHandler<C, F> {
    pub fn new(f: F) -> Self {
        Self {
            f,
            _cmd: PhantomData,
        }
    }
}

#[async_trait]
impl<C, F, Fut> CommandHandler<C> for FnHandler<C, F>
where
    C: Command,
    F: Fn(C) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), AppError>> + Send + 'static,
{
    async fn handle(&self, cmd: C) -> Result<(), AppError> {
        (self.f)(cmd).await
    }
}
