//! Debounced search driver.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use vitrin_core::SearchConfig;

use super::{SearchBackend, SearchState};

/// Drives [`SearchState`] from keystrokes.
///
/// Every call to [`SearchView::input`] starts a new generation. The pending
/// debounce timer is cancelled; a request already in flight runs to
/// completion, but its outcome is applied only if no newer input arrived
/// after it was issued.
#[derive(Clone)]
pub struct SearchView {
    inner: Arc<Inner>,
}

struct Inner {
    backend: Arc<dyn SearchBackend>,
    debounce: Duration,
    control: Mutex<Control>,
    state: watch::Sender<SearchState>,
}

#[derive(Default)]
struct Control {
    generation: u64,
    pending: Option<JoinHandle<()>>,
}

impl SearchView {
    pub fn new(backend: Arc<dyn SearchBackend>, debounce: Duration) -> Self {
        let (state, _) = watch::channel(SearchState::Idle);
        Self {
            inner: Arc::new(Inner {
                backend,
                debounce,
                control: Mutex::new(Control::default()),
                state,
            }),
        }
    }

    /// A view debounced by the configured interval.
    pub fn from_config(backend: Arc<dyn SearchBackend>, config: &SearchConfig) -> Self {
        Self::new(backend, config.debounce())
    }

    /// Feed the current contents of the search box. Must be called from
    /// within a tokio runtime.
    pub fn input(&self, raw: &str) {
        let term = raw.trim().to_string();
        let mut control = self.inner.lock();

        control.generation += 1;
        let generation = control.generation;
        if let Some(pending) = control.pending.take() {
            pending.abort();
        }

        if term.is_empty() {
            self.inner.state.send_replace(SearchState::Success {
                term,
                results: Vec::new(),
            });
            return;
        }

        self.inner
            .state
            .send_replace(SearchState::Debouncing { term: term.clone() });

        let inner = Arc::clone(&self.inner);
        control.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(inner.debounce).await;
            inner.fire(generation, term);
        }));
    }

    /// Current state.
    pub fn state(&self) -> SearchState {
        self.inner.state.borrow().clone()
    }

    /// Receive every state change.
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.inner.state.subscribe()
    }
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, Control> {
        self.control.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fire(self: &Arc<Self>, generation: u64, term: String) {
        {
            let control = self.lock();
            if control.generation != generation {
                return;
            }
            self.state
                .send_replace(SearchState::Loading { term: term.clone() });
        }

        let inner = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = inner.backend.search(&term).await;

            let control = inner.lock();
            if control.generation != generation {
                tracing::debug!(term = %term, generation, "discarding stale search response");
                return;
            }

            let next = match outcome {
                Ok(results) => SearchState::Success { term, results },
                Err(e) => {
                    tracing::warn!(term = %term, error = %e, "search request failed");
                    SearchState::Error {
                        term,
                        message: e.user_message().to_string(),
                    }
                }
            };
            inner.state.send_replace(next);
        });
    }
}
