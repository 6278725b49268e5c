use crate::domain::{
    CallbackOutcome, RedirectParams, Route, reconcile_provider_session, reconcile_redirect_params,
};
use crate::infra::{ProviderSessionSource, SessionStore};
use tracing::{info, warn};

/// One sign-in callback mount. The first resolution is final; calling again
/// replays the same route without touching the session store.
#[derive(Clone, Debug, Default)]
pub struct CallbackFlow {
    outcome: Option<CallbackOutcome>,
}

impl CallbackFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outcome(&self) -> Option<&CallbackOutcome> {
        self.outcome.as_ref()
    }

    pub fn resolve_redirect(&mut self, store: &mut SessionStore, params: &RedirectParams) -> Route {
        if let Some(outcome) = &self.outcome {
            return outcome.route();
        }
        let outcome = reconcile_redirect_params(params);
        self.finish(store, outcome)
    }

    pub fn resolve_provider(
        &mut self,
        store: &mut SessionStore,
        source: &impl ProviderSessionSource,
    ) -> Route {
        if let Some(outcome) = &self.outcome {
            return outcome.route();
        }
        let outcome = match source.current_session() {
            Ok(response) => reconcile_provider_session(response),
            Err(error) => CallbackOutcome::ErrorRedirect(error.to_string()),
        };
        self.finish(store, outcome)
    }

    fn finish(&mut self, store: &mut SessionStore, outcome: CallbackOutcome) -> Route {
        let outcome = match outcome {
            CallbackOutcome::Authenticated(session) => {
                match store.login(session.identity.clone(), &session.token) {
                    Ok(()) => {
                        info!(username = %session.identity.username, "signed in");
                        CallbackOutcome::Authenticated(session)
                    }
                    Err(error) => {
                        warn!(%error, "failed to store session");
                        CallbackOutcome::ErrorRedirect(error.to_string())
                    }
                }
            }
            CallbackOutcome::ErrorRedirect(reason) => {
                warn!(%reason, "sign-in callback failed");
                CallbackOutcome::ErrorRedirect(reason)
            }
            CallbackOutcome::IncompleteRedirect => {
                warn!("sign-in callback is missing parameters");
                CallbackOutcome::IncompleteRedirect
            }
        };

        let route = outcome.route();
        self.outcome = Some(outcome);
        route
    }
}
