//! Route guard for authenticated screens

use crate::session::{AccountStatus, Navigation, SessionClient, SessionState, SessionUser};

#[derive(Debug, Clone, PartialEq)]
pub enum GuardOutcome {
    Allow(SessionUser),
    Redirect(Navigation),
}

/// Decides whether a screen may render for the current session
pub struct AuthGuard;

impl AuthGuard {
    /// Signed-out users go where the session lookup said (sign-in unless the
    /// backend answered 403); restricted accounts go to the forbidden page
    pub fn check(state: &SessionState) -> GuardOutcome {
        match state {
            SessionState::Unauthenticated(nav) => GuardOutcome::Redirect(*nav),
            SessionState::Authenticated(user) if user.status == AccountStatus::Restricted => {
                GuardOutcome::Redirect(Navigation::Forbidden)
            }
            SessionState::Authenticated(user) => GuardOutcome::Allow(user.clone()),
        }
    }

    /// Fetch the session and check it
    pub async fn enforce(client: &SessionClient) -> GuardOutcome {
        Self::check(&client.current_user().await)
    }
}
