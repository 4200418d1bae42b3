//! Trailing-edge debounce that fans one result out to every caller in a burst.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

struct Burst<T> {
    id: u64,
    timer: JoinHandle<()>,
    tx: Arc<watch::Sender<Option<T>>>,
}

struct State<T> {
    next_id: u64,
    pending: Option<Burst<T>>,
}

/// Coalesces calls that arrive within `delay` of each other.
///
/// Each [`Debouncer::call`] replaces the pending work of the current burst
/// with its own future and restarts the timer. When the timer fires the
/// last future runs once and every caller of the burst receives its output.
/// Work that has already started is never cancelled; a call arriving after
/// that point opens a new burst.
pub struct Debouncer<T> {
    delay: Duration,
    state: Arc<Mutex<State<T>>>,
}

impl<T> Debouncer<T>
where
    T: Clone + Send + Sync + 'static,
{
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: Arc::new(Mutex::new(State {
                next_id: 0,
                pending: None,
            })),
        }
    }

    /// Schedules `work` and waits for the burst it joins to resolve.
    ///
    /// Returns `None` only if the scheduled work panicked.
    pub async fn call<F>(&self, work: F) -> Option<T>
    where
        F: Future<Output = T> + Send + 'static,
    {
        let mut rx = {
            let mut state = self.state.lock().await;
            let id = state.next_id;
            state.next_id += 1;

            let tx = match state.pending.take() {
                Some(burst) => {
                    burst.timer.abort();
                    burst.tx
                }
                None => Arc::new(watch::channel(None).0),
            };
            let rx = tx.subscribe();

            let timer = tokio::spawn(fire(
                Arc::clone(&self.state),
                id,
                self.delay,
                Arc::clone(&tx),
                work,
            ));
            state.pending = Some(Burst { id, timer, tx });
            rx
        };

        let value = rx.wait_for(Option::is_some).await.ok()?;
        (*value).clone()
    }
}

async fn fire<T, F>(
    state: Arc<Mutex<State<T>>>,
    id: u64,
    delay: Duration,
    tx: Arc<watch::Sender<Option<T>>>,
    work: F,
) where
    F: Future<Output = T>,
{
    tokio::time::sleep(delay).await;
    {
        let mut state = state.lock().await;
        if state.pending.as_ref().map(|b| b.id) != Some(id) {
            return;
        }
        state.pending = None;
    }
    let value = work.await;
    tx.send_replace(Some(value));
}
