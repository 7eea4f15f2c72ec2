//! Route Guard
//!
//! Keeps navigation consistent with the session:
//! - transitions into routes the user may not enter are cancelled and
//!   reported as `AuthEvent::TransitionError`
//! - when the session changes and the current route is no longer
//!   accessible, the user is redirected
//!
//! Redirects always run on a later tick, never inside the transition or
//! event that caused them.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use kernel::error::kind::ErrorKind;
use platform::tick::Scheduler;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::application::authorizer::{AUTHORIZE_ORIGIN, Authorizer};
use crate::application::service::AuthService;
use crate::domain::entity::session::Session;
use crate::domain::event::{AuthEvent, TransitionRejection};
use crate::domain::router::{Router, Transition};

pub struct RouteGuard {
    authorizer: Authorizer,
    router: Arc<dyn Router>,
    scheduler: Arc<dyn Scheduler>,
    redirect_path: String,
    pending_redirects: Arc<AtomicUsize>,
}

impl RouteGuard {
    pub fn new(
        authorizer: Authorizer,
        router: Arc<dyn Router>,
        scheduler: Arc<dyn Scheduler>,
        redirect_path: impl Into<String>,
    ) -> Self {
        Self {
            authorizer,
            router,
            scheduler,
            redirect_path: redirect_path.into(),
            pending_redirects: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Guard wired to a service's session and redirect path
    pub fn for_service<T>(
        service: &AuthService<T>,
        router: Arc<dyn Router>,
        scheduler: Arc<dyn Scheduler>,
    ) -> Self {
        Self::new(
            service.authorizer().clone(),
            router,
            scheduler,
            service.config().redirect_path.clone(),
        )
    }

    /// Register the pre-transition hook on the router
    ///
    /// The router only keeps a weak reference; dropping the last `Arc`
    /// disables the guard.
    pub fn install(self: &Arc<Self>) {
        let guard: Weak<Self> = Arc::downgrade(self);
        self.router
            .on_transition_start(Arc::new(move |transition: &mut Transition| {
                if let Some(guard) = guard.upgrade() {
                    guard.on_transition_start(transition);
                }
            }));
    }

    /// Re-check the current route on every session update
    pub fn spawn(self: &Arc<Self>) -> JoinHandle<()> {
        let mut events = self.authorizer.store().subscribe();
        let guard = Arc::downgrade(self);

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(AuthEvent::Update { .. }) => {}
                    Ok(_) => continue,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Route guard lagged; re-checking once");
                    }
                    Err(RecvError::Closed) => break,
                }
                let Some(guard) = guard.upgrade() else { break };
                guard.on_session_update();
            }
            tracing::debug!("Route guard stopped");
        })
    }

    pub fn on_transition_start(&self, transition: &mut Transition) {
        let session = self.authorizer.store().snapshot();
        let Some(rejection) = self.rejection_for(transition, &session) else {
            return;
        };

        transition.prevent_default();
        tracing::warn!(
            to = %transition.to.name,
            from = %transition.from.name,
            status = rejection.status_code,
            "Route transition denied"
        );

        self.authorizer
            .store()
            .events()
            .publish(AuthEvent::TransitionError(rejection));

        // Denied on bootstrap: there is no previous route to stay on.
        if !transition.from.is_named() {
            self.schedule_redirect();
        }
    }

    /// Decide `transition` against `session`; the rejection describes that
    /// same session.
    pub(crate) fn rejection_for(
        &self,
        transition: &Transition,
        session: &Session,
    ) -> Option<TransitionRejection> {
        if self.authorizer.authorize_session(&transition.to, None, session) {
            return None;
        }

        let is_user_logged_in = session.is_authenticated();
        let kind = if is_user_logged_in {
            ErrorKind::Forbidden
        } else {
            ErrorKind::Unauthorized
        };

        Some(TransitionRejection {
            to: transition.to.clone(),
            to_params: transition.to_params.clone(),
            from: transition.from.clone(),
            from_params: transition.from_params.clone(),
            status_code: kind.status_code(),
            status_text: kind.as_str(),
            is_user_logged_in,
            publisher: AUTHORIZE_ORIGIN,
        })
    }

    pub fn on_session_update(&self) {
        let current = self.router.current();
        let session = self.authorizer.store().snapshot();
        if !self.authorizer.authorize_session(&current, None, &session) {
            tracing::info!(route = %current.name, "Current route no longer accessible");
            self.schedule_redirect();
        }
    }

    /// Redirects scheduled but not yet run
    pub fn pending_redirects(&self) -> usize {
        self.pending_redirects.load(Ordering::SeqCst)
    }

    fn schedule_redirect(&self) {
        let router = self.router.clone();
        let path = self.redirect_path.clone();
        let pending = self.pending_redirects.clone();

        pending.fetch_add(1, Ordering::SeqCst);
        self.scheduler.defer(Box::new(move || {
            pending.fetch_sub(1, Ordering::SeqCst);
            tracing::info!(path = %path, "Redirecting");
            router.go(&path);
        }));
    }
}

impl std::fmt::Debug for RouteGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteGuard")
            .field("redirect_path", &self.redirect_path)
            .field("pending_redirects", &self.pending_redirects())
            .finish_non_exhaustive()
    }
}
