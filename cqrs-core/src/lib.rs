//! CQRS 命令侧分发核心（cqrs-core）
//!
//! - `command`：命令抽象，携带目标聚合 ID 与稳定的变体标签；
//! - `command_handler`：异步命令处理器，及函数/闭包适配器；
//! - `command_bus` / `inmemory_command_bus`：按标签路由到唯一处理器的命令总线；
//! - `error`：路由错误与处理器错误的统一定义。
//!
//! 处理器在启动接线阶段注册一次，之后由任意数量的并发调用方分发命令。
//!
pub mod command;
pub mod command_bus;
pub mod command_handler;
pub mod error;
pub mod inmemory_command_bus;

pub use command::Command;
pub use command_bus::CommandBus;
pub use command_handler::CommandHandler;
pub use error::{AppError, AppResult, DuplicateHandlerError, UnregisteredHandlerError};
pub use inmemory_command_bus::InMemoryCommandBus;
