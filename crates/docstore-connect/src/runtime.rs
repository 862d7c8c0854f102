//! Route runtime driving consumers on a timer.
//!
//! The `RouteRuntime` spawns one tokio task per route. Each task ticks a
//! `tokio::time::interval`, calls the consumer's `poll()`, and forwards
//! every returned message to the route's handler. Tick and handler errors
//! are reported through the error log and the schedule continues; stopping
//! a route cancels the timer without interrupting an in-flight poll.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing;

use crate::error::{ConnectorError, Result};
use crate::message::Message;
use crate::traits::Consumer;

/// Control signals sent from the runtime to a running route task.
#[derive(Debug)]
enum ControlSignal {
    Stop,
}

/// Lifecycle state of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteState {
    /// The route task is ticking its consumer.
    Running,
    /// The consumer finished all its work (single-shot executed).
    Completed,
    /// The route was stopped externally.
    Stopped,
}

impl std::fmt::Display for RouteState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteState::Running => write!(f, "RUNNING"),
            RouteState::Completed => write!(f, "COMPLETED"),
            RouteState::Stopped => write!(f, "STOPPED"),
        }
    }
}

/// An async function invoked with every message a route produces.
pub type MessageHandlerFn = Box<
    dyn Fn(Message) -> Pin<Box<dyn Future<Output = Result<()>> + Send>> + Send + Sync,
>;

/// Handle to a running route task.
struct RouteHandle {
    join_handle: JoinHandle<()>,
    control_tx: mpsc::Sender<ControlSignal>,
    state: Arc<Mutex<RouteState>>,
}

fn set_state(state: &Mutex<RouteState>, value: RouteState) {
    let mut guard = state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = value;
}

fn read_state(state: &Mutex<RouteState>) -> RouteState {
    *state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Runtime managing the lifecycle of routes.
///
/// # Example
///
/// ```ignore
/// use docstore_connect::runtime::RouteRuntime;
///
/// let mut runtime = RouteRuntime::new();
/// runtime.start_route("countries", consumer, interval, handler).await?;
/// runtime.stop("countries").await?;
/// ```
pub struct RouteRuntime {
    routes: HashMap<String, RouteHandle>,
}

impl RouteRuntime {
    /// Create a new empty runtime.
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// Start a route as a background task.
    ///
    /// The consumer is initialized via `start()`, then polled every
    /// `interval`. Messages go to `handler`; a handler or tick error is
    /// logged and the next tick still runs. The route stops on its own
    /// when the consumer reports complete.
    pub async fn start_route(
        &mut self,
        name: &str,
        consumer: Arc<dyn Consumer>,
        interval: Duration,
        handler: MessageHandlerFn,
    ) -> Result<()> {
        if self.routes.contains_key(name) {
            return Err(ConnectorError::RuntimeError(format!(
                "route '{}' is already running",
                name
            )));
        }

        consumer.start().await?;

        let (control_tx, mut control_rx) = mpsc::channel::<ControlSignal>(16);
        let state = Arc::new(Mutex::new(RouteState::Running));
        let task_state = Arc::clone(&state);
        let route_name = name.to_string();

        let join_handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    signal = control_rx.recv() => {
                        // A closed channel means the runtime dropped the
                        // handle; treat it as a stop.
                        if signal.is_some() {
                            tracing::info!(route = %route_name, "stopping route");
                        } else {
                            tracing::warn!(route = %route_name, "control channel closed, stopping route");
                        }
                        if let Err(e) = consumer.stop().await {
                            tracing::error!(route = %route_name, error = %e, "error stopping consumer");
                        }
                        set_state(&task_state, RouteState::Stopped);
                        break;
                    }
                    _ = ticker.tick() => {
                        match consumer.poll().await {
                            Ok(messages) => {
                                for message in messages {
                                    if let Err(e) = handler(message).await {
                                        tracing::error!(
                                            route = %route_name,
                                            error = %e,
                                            "message handler failed"
                                        );
                                    }
                                }
                            }
                            Err(e) => {
                                // Per-tick errors do not cancel the schedule.
                                tracing::error!(route = %route_name, error = %e, "poll tick failed");
                            }
                        }

                        if consumer.is_complete() {
                            tracing::info!(route = %route_name, "consumer completed, stopping route");
                            if let Err(e) = consumer.stop().await {
                                tracing::error!(route = %route_name, error = %e, "error stopping consumer");
                            }
                            set_state(&task_state, RouteState::Completed);
                            break;
                        }
                    }
                }
            }
        });

        self.routes.insert(
            name.to_string(),
            RouteHandle {
                join_handle,
                control_tx,
                state,
            },
        );

        Ok(())
    }

    /// Stop a route and wait for its task to finish.
    pub async fn stop(&mut self, name: &str) -> Result<()> {
        let handle = self.routes.remove(name).ok_or_else(|| {
            ConnectorError::RuntimeError(format!("route '{}' not found", name))
        })?;

        // If the route already completed, its receiver is gone and the
        // send fails; joining is all that is left to do.
        let _ = handle.control_tx.send(ControlSignal::Stop).await;
        let _ = handle.join_handle.await;

        Ok(())
    }

    /// Return the current state of a route, or None if not found.
    pub fn state(&self, name: &str) -> Option<RouteState> {
        self.routes.get(name).map(|h| read_state(&h.state))
    }

    /// Return the names of all managed routes.
    pub fn route_names(&self) -> Vec<&str> {
        self.routes.keys().map(|s| s.as_str()).collect()
    }
}

impl Default for RouteRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Consumer;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Mock consumer that emits one message per poll, with optional
    /// single-shot completion and per-poll failures.
    struct ScriptedConsumer {
        name: String,
        polls: AtomicUsize,
        completed_polls: AtomicUsize,
        poll_delay: Duration,
        complete_after_first: bool,
        fail_on_first: bool,
        stopped: AtomicBool,
    }

    impl ScriptedConsumer {
        fn repeating(name: &str) -> Self {
            Self {
                name: name.to_string(),
                polls: AtomicUsize::new(0),
                completed_polls: AtomicUsize::new(0),
                poll_delay: Duration::ZERO,
                complete_after_first: false,
                fail_on_first: false,
                stopped: AtomicBool::new(false),
            }
        }

        fn single_shot(name: &str) -> Self {
            Self {
                complete_after_first: true,
                ..Self::repeating(name)
            }
        }

        fn flaky(name: &str) -> Self {
            Self {
                fail_on_first: true,
                ..Self::repeating(name)
            }
        }

        fn slow(name: &str, poll_delay: Duration) -> Self {
            Self {
                poll_delay,
                ..Self::repeating(name)
            }
        }
    }

    #[async_trait]
    impl Consumer for ScriptedConsumer {
        async fn start(&self) -> Result<()> {
            Ok(())
        }

        async fn poll(&self) -> Result<Vec<Message>> {
            let n = self.polls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on_first && n == 0 {
                return Err(ConnectorError::RuntimeError("transient".to_string()));
            }
            if !self.poll_delay.is_zero() {
                tokio::time::sleep(self.poll_delay).await;
            }
            self.completed_polls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![Message::new(format!("tick-{}", n))])
        }

        async fn stop(&self) -> Result<()> {
            self.stopped.store(true, Ordering::SeqCst);
            Ok(())
        }

        fn is_complete(&self) -> bool {
            self.complete_after_first && self.polls.load(Ordering::SeqCst) > 0
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    fn collecting_handler() -> (MessageHandlerFn, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handler: MessageHandlerFn = Box::new(move |message| {
            let tx = tx.clone();
            Box::pin(async move {
                tx.send(message)
                    .map_err(|e| ConnectorError::RuntimeError(e.to_string()))
            })
        });
        (handler, rx)
    }

    fn discarding_handler() -> MessageHandlerFn {
        Box::new(|_message| Box::pin(async { Ok(()) }))
    }

    // ---------------------------------------------------------------
    // Basic lifecycle
    // ---------------------------------------------------------------

    #[test]
    fn test_runtime_new_is_empty() {
        let runtime = RouteRuntime::new();
        assert!(runtime.route_names().is_empty());
        assert!(runtime.state("missing").is_none());
    }

    #[tokio::test]
    async fn test_start_and_stop_route() {
        let mut runtime = RouteRuntime::new();
        let consumer = Arc::new(ScriptedConsumer::repeating("r"));

        runtime
            .start_route(
                "r",
                Arc::clone(&consumer) as Arc<dyn Consumer>,
                Duration::from_millis(10),
                discarding_handler(),
            )
            .await
            .unwrap();

        assert_eq!(runtime.state("r"), Some(RouteState::Running));

        runtime.stop("r").await.unwrap();
        assert!(runtime.state("r").is_none());
        assert!(consumer.stopped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_stop_waits_for_in_flight_poll() {
        let mut runtime = RouteRuntime::new();
        let consumer = Arc::new(ScriptedConsumer::slow("slow", Duration::from_millis(150)));
        let (handler, mut rx) = collecting_handler();

        runtime
            .start_route(
                "slow",
                Arc::clone(&consumer) as Arc<dyn Consumer>,
                Duration::from_millis(5),
                handler,
            )
            .await
            .unwrap();

        // Let the first poll get in flight before stopping.
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(consumer.polls.load(Ordering::SeqCst), 1);
        assert_eq!(consumer.completed_polls.load(Ordering::SeqCst), 0);

        runtime.stop("slow").await.unwrap();

        // Every started poll ran to completion and the in-flight one
        // still delivered its message.
        let started = consumer.polls.load(Ordering::SeqCst);
        assert!(started >= 1);
        assert_eq!(consumer.completed_polls.load(Ordering::SeqCst), started);
        let message = rx.recv().await.unwrap();
        assert_eq!(message.body, bytes::Bytes::from("tick-0"));
        assert!(consumer.stopped.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let mut runtime = RouteRuntime::new();
        runtime
            .start_route(
                "dup",
                Arc::new(ScriptedConsumer::repeating("dup")),
                Duration::from_millis(10),
                discarding_handler(),
            )
            .await
            .unwrap();

        let result = runtime
            .start_route(
                "dup",
                Arc::new(ScriptedConsumer::repeating("dup")),
                Duration::from_millis(10),
                discarding_handler(),
            )
            .await;
        assert!(result.is_err());

        runtime.stop("dup").await.unwrap();
    }

    #[tokio::test]
    async fn test_stop_not_found() {
        let mut runtime = RouteRuntime::new();
        assert!(runtime.stop("ghost").await.is_err());
    }

    // ---------------------------------------------------------------
    // Message flow
    // ---------------------------------------------------------------

    #[tokio::test]
    async fn test_messages_reach_handler() {
        let mut runtime = RouteRuntime::new();
        let (handler, mut rx) = collecting_handler();

        runtime
            .start_route(
                "flow",
                Arc::new(ScriptedConsumer::repeating("flow")),
                Duration::from_millis(5),
                handler,
            )
            .await
            .unwrap();

        let first = rx.recv().await.unwrap();
        assert_eq!(first.body, bytes::Bytes::from("tick-0"));
        let second = rx.recv().await.unwrap();
        assert_eq!(second.body, bytes::Bytes::from("tick-1"));

        runtime.stop("flow").await.unwrap();
    }

    #[tokio::test]
    async fn test_single_shot_route_completes() {
        let mut runtime = RouteRuntime::new();
        let consumer = Arc::new(ScriptedConsumer::single_shot("once"));
        let (handler, mut rx) = collecting_handler();

        runtime
            .start_route(
                "once",
                Arc::clone(&consumer) as Arc<dyn Consumer>,
                Duration::from_millis(5),
                handler,
            )
            .await
            .unwrap();

        let message = rx.recv().await.unwrap();
        assert_eq!(message.body, bytes::Bytes::from("tick-0"));

        // The route stops itself after the consumer completes.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(runtime.state("once"), Some(RouteState::Completed));
        assert_eq!(consumer.polls.load(Ordering::SeqCst), 1);
        assert!(consumer.stopped.load(Ordering::SeqCst));

        // No further messages were produced.
        assert!(rx.try_recv().is_err());

        runtime.stop("once").await.unwrap();
    }

    #[tokio::test]
    async fn test_tick_error_does_not_cancel_schedule() {
        let mut runtime = RouteRuntime::new();
        let consumer = Arc::new(ScriptedConsumer::flaky("flaky"));
        let (handler, mut rx) = collecting_handler();

        runtime
            .start_route(
                "flaky",
                Arc::clone(&consumer) as Arc<dyn Consumer>,
                Duration::from_millis(5),
                handler,
            )
            .await
            .unwrap();

        // First tick fails; the second still runs and delivers.
        let message = rx.recv().await.unwrap();
        assert_eq!(message.body, bytes::Bytes::from("tick-1"));
        assert_eq!(runtime.state("flaky"), Some(RouteState::Running));

        runtime.stop("flaky").await.unwrap();
    }

    #[tokio::test]
    async fn test_route_names() {
        let mut runtime = RouteRuntime::new();
        runtime
            .start_route(
                "alpha",
                Arc::new(ScriptedConsumer::repeating("alpha")),
                Duration::from_millis(10),
                discarding_handler(),
            )
            .await
            .unwrap();
        runtime
            .start_route(
                "beta",
                Arc::new(ScriptedConsumer::repeating("beta")),
                Duration::from_millis(10),
                discarding_handler(),
            )
            .await
            .unwrap();

        let mut names = runtime.route_names();
        names.sort();
        assert_eq!(names, vec!["alpha", "beta"]);

        runtime.stop("alpha").await.unwrap();
        runtime.stop("beta").await.unwrap();
    }

    #[test]
    fn test_route_state_display() {
        assert_eq!(format!("{}", RouteState::Running), "RUNNING");
        assert_eq!(format!("{}", RouteState::Completed), "COMPLETED");
        assert_eq!(format!("{}", RouteState::Stopped), "STOPPED");
    }
}
