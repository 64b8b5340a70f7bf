use async_trait::async_trait;
use cqrs_core::{AppError, Command, CommandBus, CommandHandler, InMemoryCommandBus};
use std::sync::Arc;

#[derive(Debug)]
struct CreateUser {
    id: String,
    name: String,
}

impl Command for CreateUser {
    const NAME: &'static str = "CreateUser";

    fn aggregate_id(&self) -> &str {
        &self.id
    }
}

struct CreateUserHandler;

#[async_trait]
impl CommandHandler<CreateUser> for CreateUserHandler {
    async fn handle(&self, cmd: CreateUser) -> Result<(), AppError> {
        println!("CreateUser: id={}, name={}", cmd.id, cmd.name);
        Ok(())
    }
}

#[derive(Debug)]
struct DeleteUser {
    id: String,
}

impl Command for DeleteUser {
    const NAME: &'static str = "DeleteUser";

    fn aggregate_id(&self) -> &str {
        &self.id
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let bus = InMemoryCommandBus::new();
    bus.register::<CreateUser, _>(Arc::new(CreateUserHandler))?;
    bus.register_fn(|cmd: DeleteUser| async move {
        println!("DeleteUser: id={}", cmd.id);
        Ok::<(), AppError>(())
    })?;

    // 重复注册 -> DuplicateHandler 错误，原绑定不变
    if let Err(e) = bus.register::<CreateUser, _>(Arc::new(CreateUserHandler)) {
        eprintln!("rejected as expected: {e}");
    }

    bus.dispatch(CreateUser {
        id: "u-1".into(),
        name: "Alice".into(),
    })
    .await?;
    bus.dispatch(DeleteUser { id: "u-1".into() }).await?;

    // 未注册的命令 -> 返回 UnregisteredHandler 错误
    #[allow(dead_code)]
    #[derive(Debug)]
    struct UpdateUser {
        id: String,
        name: String,
    }

    impl Command for UpdateUser {
        const NAME: &'static str = "UpdateUser";

        fn aggregate_id(&self) -> &str {
            &self.id
        }
    }

    if let Err(AppError::UnregisteredHandler(e)) = bus
        .dispatch(UpdateUser {
            id: "u-7".into(),
            name: "Eve".into(),
        })
        .await
    {
        eprintln!("unregistered as expected for command: {}", e.command);
    }
    Ok(())
}
