use crate::bootstrap::BootstrapState;
use crate::storage::PersistentStorage;
use crate::store::SessionStore;

/// What the router should do for a requested path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Bootstrap has not settled yet; show a loading indicator.
    Loading,
    /// Render the requested route.
    Render,
    /// Send the visitor to the login page, remembering where they were
    /// headed so login can return them there.
    RedirectToLogin { from: String },
    /// An authenticated visitor hit a login/register page; send them home.
    RedirectHome,
}

/// Which class of route the gate is protecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePolicy {
    /// Routes that require an authenticated session.
    Protected,
    /// Login and register pages, hidden from authenticated visitors.
    AuthPages,
}

/// Route gating over the session store and bootstrap state.
///
/// Decisions depend only on token presence, never on token validity;
/// an expired token is the server's problem to reject.
pub struct RouteGate {
    policy: GatePolicy,
}

impl RouteGate {
    pub fn protected() -> Self {
        Self {
            policy: GatePolicy::Protected,
        }
    }

    pub fn auth_pages() -> Self {
        Self {
            policy: GatePolicy::AuthPages,
        }
    }

    pub fn policy(&self) -> GatePolicy {
        self.policy
    }

    /// Decide what to do with a navigation to `requested_path`.
    ///
    /// No decision other than `Loading` is produced before bootstrap
    /// settles, so a visitor with a valid persisted session is never
    /// bounced to login by a race with the silent refresh.
    pub fn evaluate<S: PersistentStorage>(
        &self,
        store: &SessionStore<S>,
        bootstrap: BootstrapState,
        requested_path: &str,
    ) -> RouteDecision {
        if !bootstrap.is_settled() {
            return RouteDecision::Loading;
        }
        // Cancelled means the owning session is gone; nothing to render
        if bootstrap == BootstrapState::Cancelled {
            return RouteDecision::Loading;
        }

        let authenticated = store.session().is_authenticated();

        match self.policy {
            GatePolicy::Protected => {
                if authenticated {
                    RouteDecision::Render
                } else {
                    RouteDecision::RedirectToLogin {
                        from: requested_path.to_string(),
                    }
                }
            }
            GatePolicy::AuthPages => {
                if authenticated {
                    RouteDecision::RedirectHome
                } else {
                    RouteDecision::Render
                }
            }
        }
    }
}
