//! Bounded worker pool backing the async facades.
//!
//! Each submitted call runs on one of at most `size` dedicated blocking
//! threads; further submissions wait in a FIFO queue. A [`TaskHandle`] is
//! both a blocking handle (`wait`) and a `Future`, so callers can use the
//! async facades with or without an async runtime of their own.
//!
//! Dropping the pool is a forcible shutdown: queued tasks never start and
//! their handles resolve to [`ClientError::Shutdown`]. Calls already on the
//! wire are not interrupted. Use [`WorkerPool::shutdown_graceful`] to drain.

use crate::error::{ClientError, SdkError};
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};
use tokio::sync::oneshot;

/// Lifecycle of one submitted task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Running,
    Cancelled,
    Done,
}

impl TaskState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => TaskState::Pending,
            1 => TaskState::Running,
            2 => TaskState::Cancelled,
            _ => TaskState::Done,
        }
    }
}

const PENDING: u8 = 0;
const RUNNING: u8 = 1;
const CANCELLED: u8 = 2;
const DONE: u8 = 3;

type Outcome<T, E> = Result<T, SdkError<E>>;

/// Completion callback for the `_async_with_handler` call shape.
///
/// Runs on the worker thread after the call finishes. The outcome is still
/// delivered through the returned [`TaskHandle`] afterwards.
pub trait AsyncHandler<R, T, E>: Send + 'static {
    fn on_success(&mut self, request: &R, result: &T);
    fn on_error(&mut self, error: &SdkError<E>);
}

/// Adapts a pair of closures into an [`AsyncHandler`].
pub struct FnHandler<S, F> {
    on_success: S,
    on_error: F,
}

pub fn handler_fn<R, T, E, S, F>(on_success: S, on_error: F) -> FnHandler<S, F>
where
    S: FnMut(&R, &T) + Send + 'static,
    F: FnMut(&SdkError<E>) + Send + 'static,
{
    FnHandler { on_success, on_error }
}

impl<R, T, E, S, F> AsyncHandler<R, T, E> for FnHandler<S, F>
where
    S: FnMut(&R, &T) + Send + 'static,
    F: FnMut(&SdkError<E>) + Send + 'static,
{
    fn on_success(&mut self, request: &R, result: &T) {
        (self.on_success)(request, result)
    }

    fn on_error(&mut self, error: &SdkError<E>) {
        (self.on_error)(error)
    }
}

/// Handle to a submitted call.
pub struct TaskHandle<T, E> {
    rx: oneshot::Receiver<Outcome<T, E>>,
    state: Arc<AtomicU8>,
}

impl<T, E> TaskHandle<T, E> {
    /// Prevent the task from starting. Returns false when it has already
    /// started or finished; a running call is never interrupted.
    pub fn cancel(&self) -> bool {
        self.state
            .compare_exchange(PENDING, CANCELLED, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn state(&self) -> TaskState {
        TaskState::from_u8(self.state.load(Ordering::SeqCst))
    }

    pub fn is_cancelled(&self) -> bool {
        self.state() == TaskState::Cancelled
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state(), TaskState::Done | TaskState::Cancelled)
    }

    /// Block the current thread until the call completes.
    ///
    /// Must not be called from inside an async runtime; `.await` the handle
    /// there instead.
    pub fn wait(self) -> Outcome<T, E> {
        if self.is_cancelled() {
            return Err(ClientError::Cancelled.into());
        }
        match self.rx.blocking_recv() {
            Ok(outcome) => outcome,
            Err(_) => Err(ClientError::Shutdown.into()),
        }
    }

    fn resolved(outcome: Outcome<T, E>, state: u8) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(outcome);
        Self {
            rx,
            state: Arc::new(AtomicU8::new(state)),
        }
    }
}

impl<T, E> Future for TaskHandle<T, E> {
    type Output = Outcome<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.state.load(Ordering::SeqCst) == CANCELLED {
            return Poll::Ready(Err(ClientError::Cancelled.into()));
        }
        Pin::new(&mut this.rx)
            .poll(cx)
            .map(|received| received.unwrap_or_else(|_| Err(ClientError::Shutdown.into())))
    }
}

/// Count of submitted tasks that have neither finished nor been discarded.
#[derive(Default)]
struct Outstanding {
    count: Mutex<usize>,
    idle: Condvar,
}

impl Outstanding {
    fn enter(self: &Arc<Self>) -> OutstandingGuard {
        if let Ok(mut count) = self.count.lock() {
            *count += 1;
        }
        OutstandingGuard(Arc::clone(self))
    }

    /// Wait until nothing is outstanding. Returns false on timeout.
    fn wait_idle(&self, timeout: Duration) -> bool {
        let count = match self.count.lock() {
            Ok(count) => count,
            Err(_) => return false,
        };
        match self.idle.wait_timeout_while(count, timeout, |c| *c > 0) {
            Ok((_, result)) => !result.timed_out(),
            Err(_) => false,
        }
    }
}

/// Released when the task closure is dropped, whether it ran or not.
struct OutstandingGuard(Arc<Outstanding>);

impl Drop for OutstandingGuard {
    fn drop(&mut self) {
        if let Ok(mut count) = self.0.count.lock() {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.0.idle.notify_all();
            }
        }
    }
}

/// Fixed-size pool of worker threads.
pub struct WorkerPool {
    runtime: Option<tokio::runtime::Runtime>,
    size: usize,
    shutdown: Arc<AtomicBool>,
    outstanding: Arc<Outstanding>,
}

impl WorkerPool {
    pub fn new(size: usize) -> Result<Self, ClientError> {
        if size == 0 {
            return Err(ClientError::Config("worker pool size must be at least 1".to_string()));
        }
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(size)
            .thread_name("lbsdk-worker")
            .build()
            .map_err(|e| ClientError::Config(format!("unable to start worker pool: {}", e)))?;
        log::debug!("worker pool started with {} workers", size);
        Ok(Self {
            runtime: Some(runtime),
            size,
            shutdown: Arc::new(AtomicBool::new(false)),
            outstanding: Arc::new(Outstanding::default()),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Queue `task` and return a handle to its outcome.
    pub fn submit<T, E, F>(&self, task: F) -> TaskHandle<T, E>
    where
        F: FnOnce() -> Outcome<T, E> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let runtime = match self.runtime {
            Some(ref rt) => rt,
            None => return TaskHandle::resolved(Err(ClientError::Shutdown.into()), DONE),
        };

        let (tx, rx) = oneshot::channel();
        let state = Arc::new(AtomicU8::new(PENDING));
        let task_state = Arc::clone(&state);
        let shutdown = Arc::clone(&self.shutdown);
        let guard = self.outstanding.enter();

        runtime.spawn_blocking(move || {
            let _guard = guard;
            if shutdown.load(Ordering::SeqCst) {
                let _ = tx.send(Err(ClientError::Shutdown.into()));
                return;
            }
            if task_state
                .compare_exchange(PENDING, RUNNING, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
            {
                let _ = tx.send(Err(ClientError::Cancelled.into()));
                return;
            }
            let outcome = task();
            task_state.store(DONE, Ordering::SeqCst);
            // The caller may have dropped the handle; nothing to do then.
            let _ = tx.send(outcome);
        });

        TaskHandle { rx, state }
    }

    /// Like [`submit`](Self::submit), reporting the outcome to `handler`
    /// before it reaches the handle.
    pub fn submit_with_handler<R, T, E, F, H>(&self, request: R, mut handler: H, task: F) -> TaskHandle<T, E>
    where
        R: Send + 'static,
        F: FnOnce() -> Outcome<T, E> + Send + 'static,
        H: AsyncHandler<R, T, E>,
        T: Send + 'static,
        E: Send + 'static,
    {
        self.submit(move || {
            let outcome = task();
            match outcome {
                Ok(ref result) => handler.on_success(&request, result),
                Err(ref err) => handler.on_error(err),
            }
            outcome
        })
    }

    /// Wait up to `timeout` for queued and running tasks to finish, then
    /// shut down. Tasks still queued at the deadline never start.
    ///
    /// The drain blocks the calling thread. It is safe to call from inside
    /// an async runtime, but it stalls that runtime's worker for as long as
    /// the drain takes.
    pub fn shutdown_graceful(mut self, timeout: Duration) {
        log::debug!("worker pool draining (timeout {:?})", timeout);
        let started = Instant::now();
        if !self.outstanding.wait_idle(timeout) {
            log::warn!("worker pool drain timed out after {:?}", timeout);
        }
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(runtime) = self.runtime.take() {
            log::debug!("worker pool drained in {:?}", started.elapsed());
            // Never blocks, so callers inside a runtime do not panic.
            runtime.shutdown_background();
        }
    }

    /// Forcible shutdown; the same as dropping the pool.
    pub fn shutdown_now(self) {
        drop(self)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(runtime) = self.runtime.take() {
            log::debug!("worker pool shutting down");
            runtime.shutdown_background();
        }
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("size", &self.size)
            .field("shutdown", &self.shutdown.load(Ordering::SeqCst))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::mpsc;

    type Kind = ();

    fn ok<T>(v: T) -> Outcome<T, Kind> {
        Ok(v)
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(matches!(WorkerPool::new(0), Err(ClientError::Config(_))));
    }

    #[test]
    fn all_tasks_complete_and_concurrency_is_bounded() {
        let pool = WorkerPool::new(3).unwrap();
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let running = Arc::clone(&running);
                let peak = Arc::clone(&peak);
                pool.submit(move || {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    std::thread::sleep(Duration::from_millis(10));
                    running.fetch_sub(1, Ordering::SeqCst);
                    ok(i)
                })
            })
            .collect();

        let results: Vec<usize> = handles.into_iter().map(|h| h.wait().unwrap()).collect();
        assert_eq!(results, (0..20).collect::<Vec<_>>());
        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert!(peak.load(Ordering::SeqCst) >= 1);
    }

    #[test]
    fn cancel_before_start_prevents_the_call() {
        let pool = WorkerPool::new(1).unwrap();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let calls = Arc::new(AtomicUsize::new(0));

        let blocker = pool.submit(move || {
            let _ = release_rx.recv();
            ok(())
        });
        let counted = Arc::clone(&calls);
        let queued = pool.submit(move || {
            counted.fetch_add(1, Ordering::SeqCst);
            ok(())
        });

        assert!(queued.cancel());
        assert_eq!(queued.state(), TaskState::Cancelled);
        release_tx.send(()).unwrap();
        blocker.wait().unwrap();

        let err = queued.wait().unwrap_err();
        assert_eq!(err.as_client_error(), Some(&ClientError::Cancelled));
        // give the worker time to pick the cancelled task off the queue
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn cancel_after_start_is_refused() {
        let pool = WorkerPool::new(1).unwrap();
        let (started_tx, started_rx) = mpsc::channel::<()>();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let handle = pool.submit(move || {
            let _ = started_tx.send(());
            let _ = release_rx.recv();
            ok("done")
        });
        started_rx.recv().unwrap();
        assert!(!handle.cancel());
        assert_eq!(handle.state(), TaskState::Running);
        release_tx.send(()).unwrap();
        assert_eq!(handle.wait().unwrap(), "done");
    }

    #[test]
    fn handler_sees_request_and_result() {
        let pool = WorkerPool::new(2).unwrap();
        let (tx, rx) = mpsc::channel();
        let handler = handler_fn(
            move |req: &String, res: &usize| {
                let _ = tx.send(format!("{}={}", req, res));
            },
            |_: &SdkError<Kind>| panic!("no error expected"),
        );
        let handle = pool.submit_with_handler("len".to_string(), handler, || ok(3usize));
        assert_eq!(handle.wait().unwrap(), 3);
        assert_eq!(rx.recv().unwrap(), "len=3");
    }

    #[test]
    fn handler_sees_error_and_handle_still_fails() {
        let pool = WorkerPool::new(1).unwrap();
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        let handler = handler_fn(
            |_: &(), _: &()| {},
            move |err: &SdkError<Kind>| {
                assert!(err.is_client_error());
                counter.fetch_add(1, Ordering::SeqCst);
            },
        );
        let handle = pool.submit_with_handler((), handler, || {
            Err::<(), _>(ClientError::parse("bad").into())
        });
        assert!(handle.wait().is_err());
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropping_the_pool_abandons_queued_tasks() {
        let pool = WorkerPool::new(1).unwrap();
        let (started_tx, started_rx) = mpsc::channel::<()>();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let calls = Arc::new(AtomicUsize::new(0));

        let in_flight = pool.submit(move || {
            let _ = started_tx.send(());
            let _ = release_rx.recv();
            ok(1)
        });
        let counted = Arc::clone(&calls);
        let queued = pool.submit(move || {
            counted.fetch_add(1, Ordering::SeqCst);
            ok(2)
        });

        started_rx.recv().unwrap();
        drop(pool);
        release_tx.send(()).unwrap();

        assert_eq!(in_flight.wait().unwrap(), 1);
        let err = queued.wait().unwrap_err();
        assert_eq!(err.as_client_error(), Some(&ClientError::Shutdown));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn graceful_shutdown_drains_the_queue() {
        let pool = WorkerPool::new(2).unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..6)
            .map(|_| {
                let calls = Arc::clone(&calls);
                pool.submit(move || {
                    std::thread::sleep(Duration::from_millis(5));
                    calls.fetch_add(1, Ordering::SeqCst);
                    ok(())
                })
            })
            .collect();
        pool.shutdown_graceful(Duration::from_secs(10));
        assert_eq!(calls.load(Ordering::SeqCst), 6);
        for h in handles {
            assert!(h.wait().is_ok());
        }
    }

    #[tokio::test]
    async fn handles_are_futures() {
        let pool = WorkerPool::new(2).unwrap();
        let a = pool.submit(|| ok(1));
        let b = pool.submit(|| ok(2));
        assert_eq!(a.await.unwrap() + b.await.unwrap(), 3);
    }

    #[tokio::test]
    async fn graceful_shutdown_inside_a_runtime() {
        let pool = WorkerPool::new(2).unwrap();
        assert_eq!(pool.submit(|| ok(7)).await.unwrap(), 7);

        let calls = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..3)
            .map(|_| {
                let calls = Arc::clone(&calls);
                pool.submit(move || {
                    std::thread::sleep(Duration::from_millis(10));
                    calls.fetch_add(1, Ordering::SeqCst);
                    ok(())
                })
            })
            .collect();

        pool.shutdown_graceful(Duration::from_secs(5));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        for h in handles {
            assert!(h.await.is_ok());
        }
    }
}
