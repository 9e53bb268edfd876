//! General per-player state that survives short disconnects.

use std::time::Duration;

use tokio::time::Instant;
use warden_host::Identity;

use crate::{Lifecycle, SessionRecord};

/// Records are kept for ten days after the owner leaves.
const SESSION_MAX_AGE: Duration = Duration::from_secs(10 * 24 * 60 * 60);

/// Reconnecting within this window keeps cross-session state intact.
const RECONNECT_GRACE: Duration = Duration::from_secs(60);

/// A new recipient only replaces the remembered one after this long.
const RECIPIENT_DEBOUNCE: Duration = Duration::from_secs(1);

/// Messaging state: who a player last talked to, so `/reply` works.
#[derive(Debug)]
pub struct UserSession {
    lifecycle: Lifecycle,
    last_recipient: Option<Identity>,
    last_recipient_time: Option<Instant>,
}

impl UserSession {
    pub fn last_recipient(&self) -> Option<&Identity> {
        self.last_recipient.as_ref()
    }

    /// Unconditionally remembers `target` as the reply target.
    pub fn set_last_recipient(&mut self, target: Identity) {
        self.last_recipient = Some(target);
        self.last_recipient_time = Some(Instant::now());
    }

    /// Remembers `target` unless a recipient was set less than a second
    /// ago. Used for incoming messages, so a burst of replies from several
    /// players does not keep flipping the reply target.
    pub fn set_new_last_recipient(&mut self, target: Identity) {
        let now = Instant::now();
        let settled = self
            .last_recipient_time
            .is_none_or(|at| now.saturating_duration_since(at) > RECIPIENT_DEBOUNCE);
        if self.last_recipient.is_none() || settled {
            self.last_recipient = Some(target);
            self.last_recipient_time = Some(now);
        }
    }
}

impl SessionRecord for UserSession {
    const KIND: &'static str = "user";
    const MAX_AGE: Duration = SESSION_MAX_AGE;

    fn create(now: Instant) -> Self {
        Self {
            lifecycle: Lifecycle::new(now),
            last_recipient: None,
            last_recipient_time: None,
        }
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn on_reconnect(&mut self, away: Duration) {
        if away >= RECONNECT_GRACE {
            self.last_recipient = None;
            self.last_recipient_time = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> UserSession {
        UserSession::create(Instant::now())
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_new_last_recipient_debounces() {
        let mut s = session();
        s.set_new_last_recipient(Identity::player("Alex"));
        s.set_new_last_recipient(Identity::player("Steve"));

        assert_eq!(s.last_recipient(), Some(&Identity::player("Alex")));

        tokio::time::advance(Duration::from_millis(1500)).await;
        s.set_new_last_recipient(Identity::player("Steve"));

        assert_eq!(s.last_recipient(), Some(&Identity::player("Steve")));
    }

    #[test]
    fn test_on_reconnect_within_grace_keeps_recipient() {
        let mut s = session();
        s.set_last_recipient(Identity::player("Alex"));

        s.on_reconnect(Duration::from_secs(30));

        assert_eq!(s.last_recipient(), Some(&Identity::player("Alex")));
    }

    #[test]
    fn test_on_reconnect_after_grace_resets_recipient() {
        let mut s = session();
        s.set_last_recipient(Identity::player("Alex"));

        s.on_reconnect(Duration::from_secs(60));

        assert_eq!(s.last_recipient(), None);
    }
}
