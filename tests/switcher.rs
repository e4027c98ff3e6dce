//! Route-driven mounting through the runtime.

use conduit::program::{
    boxed, Dispatch, Effect, Message, Program, Runtime, Subscription, SubscriptionHandle,
    Subscriptions, Switcher,
};
use conduit::routing::{Location, Route, Router};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

type Log = Arc<Mutex<Vec<String>>>;

#[derive(Debug)]
struct TraceMsg(String);

impl Message for TraceMsg {}

/// Logs its lifecycle. With a gate, init starts a load that finishes when
/// the gate opens.
struct Tracer {
    label: String,
    log: Log,
    gate: Option<Arc<Notify>>,
}

impl Program for Tracer {
    type State = Vec<String>;
    type Msg = TraceMsg;
    type View = String;

    fn init(&self) -> (Self::State, Effect<Self::Msg>) {
        self.log.lock().push(format!("init {}", self.label));
        let effect = match &self.gate {
            Some(gate) => {
                let gate = Arc::clone(gate);
                let label = self.label.clone();
                Effect::future(async move {
                    gate.notified().await;
                    TraceMsg(format!("loaded {label}"))
                })
            }
            None => Effect::none(),
        };
        (Vec::new(), effect)
    }

    fn update(&self, msg: Self::Msg, mut state: Self::State) -> (Self::State, Effect<Self::Msg>) {
        self.log.lock().push(format!("{} got {}", self.label, msg.0));
        state.push(msg.0);
        (state, Effect::none())
    }

    fn subscriptions(&self, _state: &Self::State) -> Subscriptions<Self::Msg> {
        let log = Arc::clone(&self.log);
        let label = self.label.clone();
        Subscriptions::new().with(
            "watch",
            Subscription::new(move |_dispatch: Dispatch<TraceMsg>| {
                log.lock().push(format!("subscribe {label}"));
                SubscriptionHandle::new(move || log.lock().push(format!("cancel {label}")))
            }),
        )
    }

    fn view(&self, state: &Self::State, _dispatch: &Dispatch<Self::Msg>) -> String {
        format!("{}:{}", self.label, state.join(","))
    }

    fn name(&self) -> &'static str {
        "tracer"
    }
}

struct Fixture {
    router: Router,
    log: Log,
    gate: Arc<Notify>,
    runtime: Runtime<Switcher<Route, String>>,
}

/// Home waits on the gate; articles are labelled by slug.
fn fixture(start: &str) -> Fixture {
    let router = Router::new(Location::new(start));
    let log: Log = Arc::default();
    let gate = Arc::new(Notify::new());

    let watch_router = router.clone();
    let select_log = Arc::clone(&log);
    let select_gate = Arc::clone(&gate);
    let switcher = Switcher::new(
        move || watch_router.watch_route(),
        move |route: &Route| {
            let (label, gate) = match route {
                Route::Home => ("home".to_string(), Some(Arc::clone(&select_gate))),
                Route::ArticleView { article_slug } => (format!("article {article_slug}"), None),
                _ => ("other".to_string(), None),
            };
            boxed(Tracer {
                label,
                log: Arc::clone(&select_log),
                gate,
            })
        },
    );

    Fixture {
        router,
        log,
        gate,
        runtime: Runtime::start(switcher),
    }
}

async fn settle<P: Program>(runtime: &mut Runtime<P>) {
    tokio::time::timeout(Duration::from_secs(5), runtime.settle())
        .await
        .expect("runtime did not settle");
}

fn count(log: &Log, entry: &str) -> usize {
    log.lock().iter().filter(|e| *e == entry).count()
}

#[tokio::test]
async fn switching_cancels_old_subscriptions_before_new_init() {
    let mut f = fixture("/article/a");
    settle(&mut f.runtime).await;
    assert_eq!(f.runtime.state().mounted_name(), Some("tracer"));

    f.router.location().set("/login");
    settle(&mut f.runtime).await;

    assert_eq!(
        *f.log.lock(),
        vec!["init article a", "subscribe article a", "cancel article a", "init other", "subscribe other"]
    );
    assert_eq!(f.runtime.view(), "other:");
    let active: Vec<_> = f.runtime.active_subscriptions().collect();
    assert_eq!(active, vec!["page/2/watch", "route"]);
}

#[tokio::test]
async fn same_kind_route_remounts() {
    let mut f = fixture("/article/a");
    settle(&mut f.runtime).await;

    f.router.location().set("/article/b");
    settle(&mut f.runtime).await;

    assert_eq!(count(&f.log, "cancel article a"), 1);
    assert_eq!(count(&f.log, "init article b"), 1);
    assert_eq!(f.runtime.state().generation(), 2);
    assert_eq!(f.runtime.view(), "article b:");
}

#[tokio::test]
async fn results_for_unmounted_pages_are_dropped() {
    let mut f = fixture("/");
    f.runtime.process_queued();
    assert_eq!(count(&f.log, "init home"), 1);
    assert_eq!(f.runtime.in_flight(), 1);

    f.router.location().set("/login");
    f.runtime.process_queued();
    assert_eq!(count(&f.log, "init other"), 1);

    f.gate.notify_one();
    settle(&mut f.runtime).await;

    assert_eq!(count(&f.log, "home got loaded home"), 0);
    assert_eq!(count(&f.log, "other got loaded home"), 0);
    assert_eq!(f.runtime.view(), "other:");
}

#[tokio::test]
async fn results_for_the_mounted_page_arrive() {
    let mut f = fixture("/");
    f.runtime.process_queued();

    f.gate.notify_one();
    settle(&mut f.runtime).await;

    assert_eq!(f.runtime.view(), "home:loaded home");
}

#[tokio::test]
async fn shutdown_cancels_everything_once() {
    let mut f = fixture("/article/a");
    settle(&mut f.runtime).await;

    f.runtime.shutdown();

    assert_eq!(count(&f.log, "cancel article a"), 1);
    assert_eq!(f.router.location().listener_count(), 0);
}
