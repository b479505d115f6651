use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;

use crate::fs::error::{BoxDynError, SharedError};

#[derive(Debug)]
enum State {
    Unfetched,
    Fetching,
    Ready(Bytes),
    Failed(SharedError),
}

enum Step {
    Wait,
    Fetch,
}

/// lazily populated bytes of a single photo.
///
/// the first reader performs the download while any other reader arriving in
/// the meantime waits for that same download. a failed download is handed to
/// the readers that waited on it and the next reader after that starts a new
/// one. once populated the bytes are kept for the life of the process.
#[derive(Debug)]
pub struct Content {
    state: Mutex<State>,
    cond: Condvar,
}

/// puts the slot back to unfetched if the fetch unwinds so waiters are not
/// left blocked on a download that will never finish
struct FetchGuard<'a> {
    content: &'a Content,
    done: bool,
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        if !self.done {
            let mut state = self.content.lock();
            *state = State::Unfetched;
            self.content.cond.notify_all();
        }
    }
}

impl Content {
    pub fn new() -> Self {
        Content {
            state: Mutex::new(State::Unfetched),
            cond: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // every transition leaves the state whole so a poisoned lock is
        // still usable
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    pub fn is_ready(&self) -> bool {
        matches!(&*self.lock(), State::Ready(_))
    }

    pub fn get_or_fetch<F>(&self, fetch: F) -> Result<Bytes, SharedError>
    where
        F: FnOnce() -> Result<Bytes, BoxDynError>
    {
        let mut state = self.lock();
        let mut waited = false;

        loop {
            let step = match &*state {
                State::Ready(bytes) => return Ok(bytes.clone()),
                State::Failed(err) if waited => return Err(err.clone()),
                State::Fetching => Step::Wait,
                State::Unfetched | State::Failed(_) => Step::Fetch,
            };

            match step {
                Step::Wait => {
                    state = self.cond.wait(state).unwrap_or_else(PoisonError::into_inner);
                    waited = true;
                },
                Step::Fetch => {
                    *state = State::Fetching;
                    break;
                }
            }
        }

        drop(state);

        let mut guard = FetchGuard {
            content: self,
            done: false,
        };
        let result = fetch();

        let mut state = self.lock();
        guard.done = true;

        let rtn = match result {
            Ok(bytes) => {
                *state = State::Ready(bytes.clone());
                Ok(bytes)
            },
            Err(err) => {
                let shared = SharedError::new(err);
                *state = State::Failed(shared.clone());
                Err(shared)
            }
        };

        self.cond.notify_all();

        rtn
    }
}

impl Default for Content {
    fn default() -> Self {
        Content::new()
    }
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::time::Duration;

    use super::*;

    #[test]
    fn fetches_once() {
        let content = Content::new();
        let calls = AtomicUsize::new(0);

        assert!(!content.is_ready());

        for _ in 0..3 {
            let bytes = content.get_or_fetch(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(Bytes::from_static(b"photo"))
            }).unwrap();

            assert_eq!(&bytes[..], b"photo");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(content.is_ready());
    }

    #[test]
    fn failure_is_retryable() {
        let content = Content::new();

        let result = content.get_or_fetch(|| Err("connection reset".into()));

        assert!(result.is_err());
        assert!(!content.is_ready());

        let bytes = content.get_or_fetch(|| Ok(Bytes::from_static(b"second"))).unwrap();

        assert_eq!(&bytes[..], b"second");
    }

    #[test]
    fn concurrent_readers_share_one_fetch() {
        let content = Content::new();
        let calls = AtomicUsize::new(0);
        let barrier = Barrier::new(8);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    barrier.wait();

                    let bytes = content.get_or_fetch(|| {
                        calls.fetch_add(1, Ordering::SeqCst);
                        std::thread::sleep(Duration::from_millis(50));
                        Ok(Bytes::from_static(b"shared"))
                    }).unwrap();

                    assert_eq!(&bytes[..], b"shared");
                });
            }
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn waiters_receive_the_failure() {
        let content = Content::new();
        let calls = AtomicUsize::new(0);
        let failures = AtomicUsize::new(0);
        let barrier = Barrier::new(4);

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    barrier.wait();

                    let result = content.get_or_fetch(|| {
                        calls.fetch_add(1, Ordering::SeqCst);
                        std::thread::sleep(Duration::from_millis(50));
                        Err("timed out".into())
                    });

                    if result.is_err() {
                        failures.fetch_add(1, Ordering::SeqCst);
                    }
                });
            }
        });

        // every reader fails and none of them see bytes, but a reader that
        // shows up after a failure is allowed to start its own fetch
        assert_eq!(failures.load(Ordering::SeqCst), 4);
        assert!(calls.load(Ordering::SeqCst) >= 1);
        assert!(!content.is_ready());
    }

    #[test]
    fn panicking_fetch_resets_the_slot() {
        let content = Content::new();

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _ = content.get_or_fetch(|| panic!("fetch blew up"));
        }));

        assert!(outcome.is_err());

        let bytes = content.get_or_fetch(|| Ok(Bytes::from_static(b"after"))).unwrap();

        assert_eq!(&bytes[..], b"after");
    }
}
