use async_trait::async_trait;
use cqrs_core::{
    AppError, Command, CommandBus, CommandHandler, DuplicateHandlerError, InMemoryCommandBus,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinSet;

#[derive(Debug, Clone, PartialEq)]
struct CreatePost {
    id: String,
    author: String,
}
impl Command for CreatePost {
    const NAME: &'static str = "CreatePost";
    fn aggregate_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
struct UpdateMessage {
    id: String,
    message: String,
}
impl Command for UpdateMessage {
    const NAME: &'static str = "UpdateMessage";
    fn aggregate_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
struct DeletePost {
    id: String,
}
impl Command for DeletePost {
    const NAME: &'static str = "DeletePost";
    fn aggregate_id(&self) -> &str {
        &self.id
    }
}

/// 记录每次调用：(处理器名, 聚合 ID)
#[derive(Clone, Default)]
struct CallLog {
    inner: Arc<Mutex<Vec<(&'static str, String)>>>,
}
impl CallLog {
    fn push(&self, handler: &'static str, id: &str) {
        self.inner.lock().unwrap().push((handler, id.to_string()));
    }
    fn calls(&self) -> Vec<(&'static str, String)> {
        self.inner.lock().unwrap().clone()
    }
}

struct PostHandler {
    name: &'static str,
    log: CallLog,
    seen: Arc<Mutex<Vec<CreatePost>>>,
    result: Result<(), AppError>,
}
#[async_trait]
impl CommandHandler<CreatePost> for PostHandler {
    async fn handle(&self, cmd: CreatePost) -> Result<(), AppError> {
        self.log.push(self.name, cmd.aggregate_id());
        self.seen.lock().unwrap().push(cmd);
        self.result.clone()
    }
}

struct MessageHandler {
    log: CallLog,
    result: Result<(), AppError>,
}
#[async_trait]
impl CommandHandler<UpdateMessage> for MessageHandler {
    async fn handle(&self, cmd: UpdateMessage) -> Result<(), AppError> {
        // 模拟 I/O 挂起
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.log.push("HB", cmd.aggregate_id());
        self.result.clone()
    }
}

fn post_handler(
    name: &'static str,
    log: &CallLog,
) -> (Arc<PostHandler>, Arc<Mutex<Vec<CreatePost>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let handler = Arc::new(PostHandler {
        name,
        log: log.clone(),
        seen: seen.clone(),
        result: Ok(()),
    });
    (handler, seen)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn create_update_delete_scenario() {
    let log = CallLog::default();
    let bus = InMemoryCommandBus::new();

    let (ha, seen) = post_handler("HA", &log);
    bus.register::<CreatePost, _>(ha).unwrap();
    bus.register::<UpdateMessage, _>(Arc::new(MessageHandler {
        log: log.clone(),
        result: Ok(()),
    }))
    .unwrap();

    let create = CreatePost {
        id: "p1".into(),
        author: "alice".into(),
    };
    assert_eq!(bus.dispatch(create.clone()).await, Ok(()));
    assert_eq!(log.calls(), vec![("HA", "p1".to_string())]);
    assert_eq!(*seen.lock().unwrap(), vec![create.clone()]);

    let err = bus.dispatch(DeletePost { id: "p1".into() }).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::UnregisteredHandler(ref e) if e.command == "DeletePost"
    ));
    assert_eq!(log.calls().len(), 1);

    let (other, _) = post_handler("HA2", &log);
    assert_eq!(
        bus.register::<CreatePost, _>(other),
        Err(DuplicateHandlerError {
            command: "CreatePost"
        })
    );

    assert_eq!(bus.dispatch(create).await, Ok(()));
    let update = UpdateMessage {
        id: "p1".into(),
        message: "edited".into(),
    };
    assert_eq!(bus.dispatch(update).await, Ok(()));
    assert_eq!(
        log.calls(),
        vec![
            ("HA", "p1".to_string()),
            ("HA", "p1".to_string()),
            ("HB", "p1".to_string()),
        ]
    );
    assert_eq!(bus.registered_commands(), vec!["CreatePost", "UpdateMessage"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn dispatch_result_is_handler_result() {
    let failures = [
        AppError::Validation("author is empty".into()),
        AppError::AggregateNotFound("p404".into()),
        AppError::Infra("store unavailable".into()),
    ];

    for expected in failures {
        let bus = InMemoryCommandBus::new();
        let log = CallLog::default();
        bus.register::<UpdateMessage, _>(Arc::new(MessageHandler {
            log: log.clone(),
            result: Err(expected.clone()),
        }))
        .unwrap();

        let got = bus
            .dispatch(UpdateMessage {
                id: "p1".into(),
                message: "hi".into(),
            })
            .await;
        assert_eq!(got, Err(expected));
        assert_eq!(log.calls().len(), 1);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_variants_are_isolated() {
    let log = CallLog::default();
    let bus = Arc::new(InMemoryCommandBus::new());

    let (ha, seen) = post_handler("HA", &log);
    bus.register::<CreatePost, _>(ha).unwrap();
    bus.register::<UpdateMessage, _>(Arc::new(MessageHandler {
        log: log.clone(),
        result: Err(AppError::Conflict("stale".into())),
    }))
    .unwrap();

    let mut set = JoinSet::new();
    for i in 0..50 {
        let bus = bus.clone();
        set.spawn(async move {
            let id = format!("p{i}");
            let created = bus
                .dispatch(CreatePost {
                    id: id.clone(),
                    author: "alice".into(),
                })
                .await;
            let updated = bus
                .dispatch(UpdateMessage {
                    id,
                    message: "edited".into(),
                })
                .await;
            (created, updated)
        });
    }

    while let Some(res) = set.join_next().await {
        let (created, updated) = res.unwrap();
        assert_eq!(created, Ok(()));
        assert_eq!(updated, Err(AppError::Conflict("stale".into())));
    }

    let calls = log.calls();
    assert_eq!(calls.iter().filter(|(h, _)| *h == "HA").count(), 50);
    assert_eq!(calls.iter().filter(|(h, _)| *h == "HB").count(), 50);
    assert_eq!(seen.lock().unwrap().len(), 50);
    assert!(seen.lock().unwrap().iter().all(|c| c.author == "alice"));
}
