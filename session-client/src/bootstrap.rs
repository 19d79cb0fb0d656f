use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::Weak;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::Serialize;

use crate::errors::BootstrapError;
use crate::errors::RefreshError;
use crate::storage::PersistentStorage;
use crate::store::SessionStore;

/// Default bound on the silent-refresh round trip. A hung request fails
/// closed to `Unauthenticated` instead of leaving the UI loading forever.
pub const DEFAULT_REFRESH_TIMEOUT: Duration = Duration::from_secs(10);

/// Bootstrap state machine.
///
/// `Bootstrapping` exists only while the refresh round trip is in
/// flight; everything the gate renders during that window is a loading
/// indicator. `Cancelled` means the owning session store was torn down
/// mid-flight and the result was discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    Idle,
    Bootstrapping,
    Authenticated,
    Unauthenticated,
    Cancelled,
}

impl BootstrapState {
    /// A settled machine will never change state again on its own.
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            BootstrapState::Authenticated
                | BootstrapState::Unauthenticated
                | BootstrapState::Cancelled
        )
    }
}

/// Network seam for the refresh endpoint.
#[async_trait]
pub trait RefreshApi: Send + Sync + 'static {
    /// Exchange a refresh credential for a fresh access token.
    async fn refresh(&self, refresh_token: &str) -> Result<String, RefreshError>;
}

/// One-shot silent-refresh procedure, run once per application load.
///
/// Holds only a `Weak` handle to the session store: if the owner is torn
/// down while the refresh call is outstanding, the result is dropped on
/// the floor rather than written into a discarded session.
pub struct Bootstrapper<S, A>
where
    S: PersistentStorage,
    A: RefreshApi,
{
    store: Weak<SessionStore<S>>,
    api: Arc<A>,
    timeout: Duration,
    started: AtomicBool,
    state: Mutex<BootstrapState>,
}

impl<S, A> Bootstrapper<S, A>
where
    S: PersistentStorage,
    A: RefreshApi,
{
    pub fn new(store: &Arc<SessionStore<S>>, api: Arc<A>) -> Self {
        Self::with_timeout(store, api, DEFAULT_REFRESH_TIMEOUT)
    }

    pub fn with_timeout(store: &Arc<SessionStore<S>>, api: Arc<A>, timeout: Duration) -> Self {
        Self {
            store: Arc::downgrade(store),
            api,
            timeout,
            started: AtomicBool::new(false),
            state: Mutex::new(BootstrapState::Idle),
        }
    }

    /// Current state, for observers polling while a run is in flight.
    pub fn state(&self) -> BootstrapState {
        *self.state.lock().unwrap()
    }

    fn settle(&self, state: BootstrapState) -> BootstrapState {
        *self.state.lock().unwrap() = state;
        state
    }

    /// Run the bootstrap decision once.
    ///
    /// Exactly one network call is made, and only when the persist flag
    /// is set with no access token in memory. Every failure path settles
    /// `Unauthenticated` (fail closed); the caller redirects to login on
    /// that outcome.
    ///
    /// # Errors
    /// * `AlreadyStarted` - A previous run was started on this instance
    pub async fn run(&self) -> Result<BootstrapState, BootstrapError> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(BootstrapError::AlreadyStarted);
        }

        let Some(store) = self.store.upgrade() else {
            return Ok(self.settle(BootstrapState::Cancelled));
        };

        // Settle directly when no silent refresh is warranted
        if store.access_token().is_some() {
            return Ok(self.settle(BootstrapState::Authenticated));
        }
        if !store.persist() {
            return Ok(self.settle(BootstrapState::Unauthenticated));
        }

        let Some(refresh_token) = store.refresh_token() else {
            tracing::debug!("Persist set but no refresh credential stored");
            return Ok(self.settle(BootstrapState::Unauthenticated));
        };

        self.settle(BootstrapState::Bootstrapping);

        // The strong handle must not be held across the await: the owner
        // deciding to tear down is what cancellation detects.
        drop(store);

        let outcome = tokio::time::timeout(self.timeout, self.api.refresh(&refresh_token)).await;

        let Some(store) = self.store.upgrade() else {
            tracing::debug!("Session store dropped mid-refresh, discarding result");
            return Ok(self.settle(BootstrapState::Cancelled));
        };

        match outcome {
            Ok(Ok(access_token)) => {
                store.set_access_token(access_token);
                Ok(self.settle(BootstrapState::Authenticated))
            }
            Ok(Err(e)) => {
                tracing::warn!("Silent refresh failed: {}", e);
                Ok(self.settle(BootstrapState::Unauthenticated))
            }
            Err(_) => {
                tracing::warn!(timeout_ms = self.timeout.as_millis() as u64, "Silent refresh timed out");
                Ok(self.settle(BootstrapState::Unauthenticated))
            }
        }
    }
}

/// `RefreshApi` over HTTP, posting to the identity service.
pub struct HttpRefreshClient {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct RefreshRequestBody<'a> {
    token: &'a str,
}

#[derive(Debug, Deserialize)]
struct RefreshResponseBody {
    data: RefreshResponseData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshResponseData {
    access_token: String,
}

impl HttpRefreshClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl RefreshApi for HttpRefreshClient {
    async fn refresh(&self, refresh_token: &str) -> Result<String, RefreshError> {
        let response = self
            .client
            .post(format!("{}/auth/refreshToken", self.base_url))
            .json(&RefreshRequestBody {
                token: refresh_token,
            })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RefreshError::Timeout
                } else {
                    RefreshError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RefreshError::Rejected(status.as_u16()));
        }

        let body: RefreshResponseBody = response
            .json()
            .await
            .map_err(|e| RefreshError::MalformedResponse(e.to_string()))?;

        Ok(body.data.access_token)
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;

    use super::*;
    use crate::storage::InMemoryStorage;

    mock! {
        pub TestRefreshApi {}

        #[async_trait]
        impl RefreshApi for TestRefreshApi {
            async fn refresh(&self, refresh_token: &str) -> Result<String, RefreshError>;
        }
    }

    /// Stub that takes long enough for the test to act mid-flight.
    struct SlowRefreshApi {
        delay: Duration,
    }

    #[async_trait]
    impl RefreshApi for SlowRefreshApi {
        async fn refresh(&self, _refresh_token: &str) -> Result<String, RefreshError> {
            tokio::time::sleep(self.delay).await;
            Ok("late-access-token".to_string())
        }
    }

    fn store_with(persist: bool, refresh_token: Option<&str>) -> Arc<SessionStore<InMemoryStorage>> {
        Arc::new(SessionStore::new(InMemoryStorage::with_state(
            persist,
            refresh_token.map(|t| t.to_string()),
        )))
    }

    #[tokio::test]
    async fn test_no_persist_settles_without_network() {
        let store = store_with(false, Some("refresh-credential"));

        let mut api = MockTestRefreshApi::new();
        api.expect_refresh().times(0);

        let bootstrapper = Bootstrapper::new(&store, Arc::new(api));
        let settled = bootstrapper.run().await.unwrap();

        assert_eq!(settled, BootstrapState::Unauthenticated);
        assert!(store.access_token().is_none());
    }

    #[tokio::test]
    async fn test_existing_token_settles_authenticated_without_network() {
        let store = store_with(true, Some("refresh-credential"));
        store.set_access_token("already-present");

        let mut api = MockTestRefreshApi::new();
        api.expect_refresh().times(0);

        let bootstrapper = Bootstrapper::new(&store, Arc::new(api));
        let settled = bootstrapper.run().await.unwrap();

        assert_eq!(settled, BootstrapState::Authenticated);
    }

    #[tokio::test]
    async fn test_persist_with_no_token_refreshes_exactly_once() {
        let store = store_with(true, Some("refresh-credential"));

        let mut api = MockTestRefreshApi::new();
        api.expect_refresh()
            .withf(|token| token == "refresh-credential")
            .times(1)
            .returning(|_| Ok("fresh-access-token".to_string()));

        let bootstrapper = Bootstrapper::new(&store, Arc::new(api));
        let settled = bootstrapper.run().await.unwrap();

        assert_eq!(settled, BootstrapState::Authenticated);
        assert_eq!(store.access_token().as_deref(), Some("fresh-access-token"));
    }

    #[tokio::test]
    async fn test_failed_refresh_fails_closed() {
        let store = store_with(true, Some("refresh-credential"));

        let mut api = MockTestRefreshApi::new();
        api.expect_refresh()
            .times(1)
            .returning(|_| Err(RefreshError::Rejected(403)));

        let bootstrapper = Bootstrapper::new(&store, Arc::new(api));
        let settled = bootstrapper.run().await.unwrap();

        assert_eq!(settled, BootstrapState::Unauthenticated);
        assert!(store.access_token().is_none());
    }

    #[tokio::test]
    async fn test_missing_credential_fails_closed_without_network() {
        let store = store_with(true, None);

        let mut api = MockTestRefreshApi::new();
        api.expect_refresh().times(0);

        let bootstrapper = Bootstrapper::new(&store, Arc::new(api));
        let settled = bootstrapper.run().await.unwrap();

        assert_eq!(settled, BootstrapState::Unauthenticated);
    }

    #[tokio::test]
    async fn test_second_run_is_rejected() {
        let store = store_with(false, None);

        let api = Arc::new(MockTestRefreshApi::new());
        let bootstrapper = Bootstrapper::new(&store, api);

        bootstrapper.run().await.unwrap();
        let second = bootstrapper.run().await;

        assert_eq!(second, Err(BootstrapError::AlreadyStarted));
    }

    #[tokio::test]
    async fn test_timeout_fails_closed() {
        let store = store_with(true, Some("refresh-credential"));

        let api = Arc::new(SlowRefreshApi {
            delay: Duration::from_secs(60),
        });
        let bootstrapper = Bootstrapper::with_timeout(&store, api, Duration::from_millis(20));

        let settled = bootstrapper.run().await.unwrap();

        assert_eq!(settled, BootstrapState::Unauthenticated);
        assert!(store.access_token().is_none());
    }

    #[tokio::test]
    async fn test_owner_torn_down_mid_flight_discards_result() {
        let store = store_with(true, Some("refresh-credential"));

        let api = Arc::new(SlowRefreshApi {
            delay: Duration::from_millis(100),
        });
        let bootstrapper = Arc::new(Bootstrapper::new(&store, api));

        let runner = Arc::clone(&bootstrapper);
        let task = tokio::spawn(async move { runner.run().await });

        // Tear the owner down while the refresh is outstanding
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(bootstrapper.state(), BootstrapState::Bootstrapping);
        drop(store);

        let settled = task.await.unwrap().unwrap();
        assert_eq!(settled, BootstrapState::Cancelled);
    }

    #[tokio::test]
    async fn test_owner_gone_before_run() {
        let store = store_with(false, None);
        let api = Arc::new(MockTestRefreshApi::new());
        let bootstrapper = Bootstrapper::new(&store, api);
        drop(store);

        let settled = bootstrapper.run().await.unwrap();
        assert_eq!(settled, BootstrapState::Cancelled);
    }
}
