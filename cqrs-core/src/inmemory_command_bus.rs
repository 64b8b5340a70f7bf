use crate::{
    command::Command,
    command_bus::CommandBus,
    command_handler::{CommandHandler, FnHandler},
    error::{AppError, DuplicateHandlerError, UnregisteredHandlerError},
};
use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::any::{Any, TypeId, type_name};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::Instrument;

type CmdHandlerFuture = Pin<Box<dyn Future<Output = Result<(), AppError>> + Send>>;

type CmdHandlerFn = Arc<dyn Fn(Box<dyn Any + Send>) -> CmdHandlerFuture + Send + Sync>;

/// 一条处理器绑定：命令标签 -> 类型擦除后的处理函数
#[derive(Clone)]
struct Binding {
    type_id: TypeId,
    type_name: &'static str,
    handler: CmdHandlerFn,
}

/// 基于内存的 CommandBus 实现
/// - 以 `Command::NAME` 作为路由键，每个标签至多绑定一个 Handler
/// - 运行时以类型擦除（Any）方式进行调度
/// - 由调用方显式构造并通过 `Arc` 共享，不提供全局实例
pub struct InMemoryCommandBus {
    handlers: DashMap<&'static str, Binding>,
}

impl Default for InMemoryCommandBus {
    fn default() -> Self {
        Self {
            handlers: DashMap::new(),
        }
    }
}

impl InMemoryCommandBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预分配容量（接线阶段已知命令种类数量时使用）
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            handlers: DashMap::with_capacity(capacity),
        }
    }

    /// 注册命令处理器
    ///
    /// 同一标签重复注册返回 [`DuplicateHandlerError`]，已有绑定保持不变。
    pub fn register<C, H>(&self, handler: Arc<H>) -> Result<(), DuplicateHandlerError>
    where
        C: Command,
        H: CommandHandler<C> + 'static,
    {
        // entry 持有分片写锁，检查与插入在同一临界区内完成
        let Entry::Vacant(slot) = self.handlers.entry(C::NAME) else {
            return Err(DuplicateHandlerError { command: C::NAME });
        };

        let f: CmdHandlerFn = Arc::new(move |boxed_cmd: Box<dyn Any + Send>| -> CmdHandlerFuture {
            let handler = handler.clone();

            Box::pin(async move {
                // 正常情况下这里的 downcast 永远不会失败（dispatch 已校验 TypeId）
                match boxed_cmd.downcast::<C>() {
                    Ok(cmd) => handler.handle(*cmd).await,
                    Err(_) => Err(AppError::TypeMismatch {
                        expected: type_name::<C>(),
                        found: "unknown",
                    }),
                }
            })
        });

        slot.insert(Binding {
            type_id: TypeId::of::<C>(),
            type_name: type_name::<C>(),
            handler: f,
        });

        tracing::debug!(command = C::NAME, "command handler registered");
        Ok(())
    }

    /// 以异步函数/闭包注册命令处理器
    pub fn register_fn<C, F, Fut>(&self, f: F) -> Result<(), DuplicateHandlerError>
    where
        C: Command,
        F: Fn(C) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), AppError>> + Send + 'static,
    {
        self.register::<C, _>(Arc::new(FnHandler::new(f)))
    }

    /// 该命令是否已绑定处理器
    pub fn is_registered<C: Command>(&self) -> bool {
        self.handlers.contains_key(C::NAME)
    }

    /// 获取已注册的命令标签列表（按名称排序的只读视图）
    pub fn registered_commands(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.iter().map(|e| *e.key()).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[async_trait]
impl CommandBus for InMemoryCommandBus {
    async fn dispatch<C>(&self, cmd: C) -> Result<(), AppError>
    where
        C: Command,
    {
        // 先克隆出绑定再释放读锁，处理器执行期间不持有任何锁
        let Some(binding) = self.handlers.get(C::NAME).map(|b| b.clone()) else {
            return Err(UnregisteredHandlerError { command: C::NAME }.into());
        };

        if binding.type_id != TypeId::of::<C>() {
            return Err(AppError::TypeMismatch {
                expected: binding.type_name,
                found: type_name::<C>(),
            });
        }

        let span = tracing::debug_span!(
            "dispatch",
            command = C::NAME,
            aggregate_id = cmd.aggregate_id()
        );

        (binding.handler)(Box::new(cmd)).instrument(span).await
    }
}
