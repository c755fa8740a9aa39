use log::{debug, error, info, warn};

use crate::route::Route;
use super::{Session, SessionStore};

#[derive(Clone, Debug, PartialEq)]
pub enum GuardState {
    Unchecked,
    Absent,
    Present(Session)
}

/// What a protected page should show for the current guard state.
#[derive(Debug, PartialEq)]
pub enum GuardView<'a> {
    Loading,
    Redirect(Route),
    Render(&'a Session)
}

pub struct SessionGuard {
    state: GuardState
}

impl SessionGuard {
    pub fn new() -> SessionGuard {
        SessionGuard {
            state: GuardState::Unchecked
        }
    }

    /// Reads the stored session once, an unreadable store counts as signed out.
    pub fn check(&mut self, store: &dyn SessionStore) -> &GuardState {
        self.state = match store.load() {
            Ok(Some(session)) => {
                debug!("Session found for {}", session);
                GuardState::Present(session)
            },
            Ok(None) => GuardState::Absent,
            Err(e) => {
                warn!("Couldn't read the stored session : {}", e);
                GuardState::Absent
            }
        };

        &self.state
    }

    pub fn view(&self) -> GuardView {
        match &self.state {
            GuardState::Unchecked => GuardView::Loading,
            GuardState::Absent => GuardView::Redirect(Route::Entry),
            GuardState::Present(session) => GuardView::Render(session)
        }
    }

    pub fn into_session(self) -> Option<Session> {
        match self.state {
            GuardState::Present(session) => Some(session),
            _ => None
        }
    }
}

impl Default for SessionGuard {
    fn default() -> SessionGuard {
        SessionGuard::new()
    }
}

pub fn logout(store: &dyn SessionStore) -> Route {
    match store.clear() {
        Ok(_) => info!("Logged out"),
        Err(e) => error!("Couldn't clear the stored session : {}", e)
    }

    Route::Entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemorySessionStore, teacher};

    #[test]
    fn unchecked_guard_shows_loading() {
        assert_eq!(SessionGuard::new().view(), GuardView::Loading);
    }

    #[test]
    fn absent_session_redirects_to_entry() {
        let mut guard = SessionGuard::new();
        guard.check(&MemorySessionStore::new());

        assert_eq!(guard.view(), GuardView::Redirect(Route::Entry));
        assert_eq!(guard.into_session(), None);
    }

    #[test]
    fn present_session_renders() {
        let store = MemorySessionStore::with(teacher());
        let mut guard = SessionGuard::new();
        guard.check(&store);

        assert_eq!(guard.view(), GuardView::Render(&teacher()));
    }

    #[test]
    fn logout_clears_and_next_check_redirects() {
        let store = MemorySessionStore::with(teacher());

        assert_eq!(logout(&store), Route::Entry);

        let mut guard = SessionGuard::new();
        assert_eq!(guard.check(&store), &GuardState::Absent);
    }
}
