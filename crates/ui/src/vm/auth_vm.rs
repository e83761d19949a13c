use dioxus::prelude::*;

use lingo_core::model::{Credential, Progress};
use services::{AuthService, ProgressLedger, SessionContext};

/// The signed-in state shared by every screen.
///
/// Session and ledger keep their single-writer semantics: the state lives in
/// one `Signal<Option<AuthState>>` owned by the root component, and async
/// mutations take it out, await, and put it back.
pub struct AuthState {
    pub session: SessionContext,
    pub ledger: ProgressLedger,
}

impl AuthState {
    #[must_use]
    pub fn new(session: SessionContext, ledger: ProgressLedger) -> Self {
        Self { session, ledger }
    }

    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.session.is_signed_in()
    }

    #[must_use]
    pub fn credential(&self) -> Option<Credential> {
        self.session.credential().cloned()
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        self.ledger.progress()
    }
}

/// Invalidate the credential after a 401 (or an explicit sign-out tap).
///
/// The router's layout notices the signed-out state and sends the user back
/// to the login screen.
pub async fn force_sign_out(mut auth: Signal<Option<AuthState>>, auth_service: &AuthService) {
    let taken = auth.write().take();
    let Some(mut state) = taken else {
        return;
    };
    auth_service
        .sign_out(&mut state.session, &mut state.ledger)
        .await;
    auth.set(Some(state));
}
