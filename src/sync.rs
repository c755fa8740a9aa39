use std::sync::{Mutex, Arc, MutexGuard};

use log::error;

/// State read by a page and written by the futures it starts.
pub type Shared<T> = Arc<Mutex<T>>;

pub trait Shareable<T> {
    fn new_shared(s: T) -> Shared<T>;
}

impl<T> Shareable<T> for T {
    fn new_shared(s: T) -> Shared<T> {
        Arc::new(Mutex::new(s))
    }
}

pub trait StateLock<T> {
    fn state(&self) -> MutexGuard<T>;
}

/// Locks page state. A panic elsewhere leaves the last written value, which is still shown.
impl<T> StateLock<T> for Mutex<T> {
    fn state(&self) -> MutexGuard<T> {
        self.lock().unwrap_or_else(|poisoned| {
            error!("Page state lock poisoned, going on with the last value");
            poisoned.into_inner()
        })
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn poisoned_state_is_still_readable() {
        let shared = Vec::<u32>::new_shared(vec![1]);

        let writer = shared.clone();
        let _ = thread::spawn(move || {
            writer.state().push(2);
            panic!("writer failed");
        }).join();

        assert!(shared.is_poisoned());
        assert_eq!(*shared.state(), vec![1, 2]);
    }
}
