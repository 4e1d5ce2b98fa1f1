//! Ownership of the shared reputation client.
//!
//! The underlying service client is suspected of leaking when kept alive
//! indefinitely, so the manager discards it once it is older than the
//! recycle threshold and builds a fresh one. Recycling is purely time based
//! and evaluated lazily on access.
//!
//! At most one client is alive at a time. Callers hold a [`ClientLease`]
//! (a shared read guard) for the duration of their call; replacing the client
//! takes the write side, so a rebuild waits until every in-flight call using
//! the old client has finished.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use marginalia_core::config::ReputationConfig;
use tokio::sync::{RwLock, RwLockReadGuard};
use tokio::time::Instant;
use tracing::{debug, info};

use crate::akismet::AkismetClient;
use crate::client::{ReputationClient, ReputationError};

/// Default age after which the client is rebuilt
pub const DEFAULT_RECYCLE_AFTER: Duration = Duration::from_secs(600);

type ClientFactory =
    Box<dyn Fn() -> Result<Arc<dyn ReputationClient>, ReputationError> + Send + Sync>;

/// Shared access to the current client; the client cannot be replaced while
/// any lease is held
pub type ClientLease<'a> = RwLockReadGuard<'a, ClientHandle>;

/// A live client stamped with its creation time
pub struct ClientHandle {
    client: Arc<dyn ReputationClient>,
    created_at: Instant,
    generation: u64,
}

impl ClientHandle {
    pub fn client(&self) -> &dyn ReputationClient {
        self.client.as_ref()
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    pub fn age(&self) -> Duration {
        Instant::now().saturating_duration_since(self.created_at)
    }

    /// 1 for the first client built by a manager, incremented on each rebuild
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl fmt::Debug for ClientHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientHandle")
            .field("created_at", &self.created_at)
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
struct Slot {
    handle: Option<ClientHandle>,
    generation: u64,
}

impl Slot {
    fn is_fresh(&self, recycle_after: Duration) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| handle.age() <= recycle_after)
    }
}

/// Holds at most one client handle and replaces it once it expires
pub struct ClientManager {
    factory: ClientFactory,
    recycle_after: Duration,
    slot: RwLock<Slot>,
}

impl ClientManager {
    pub fn new<F>(factory: F, recycle_after: Duration) -> Self
    where
        F: Fn() -> Result<Arc<dyn ReputationClient>, ReputationError> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            recycle_after,
            slot: RwLock::new(Slot::default()),
        }
    }

    /// Manager building Akismet clients for the site at `blog`
    pub fn from_config(config: &ReputationConfig, blog: &str) -> Self {
        let config = config.clone();
        let blog = blog.to_string();
        let recycle_after = Duration::from_secs(config.recycle_secs);
        Self::new(
            move || {
                let client = AkismetClient::from_config(&config, &blog)?;
                Ok(Arc::new(client) as Arc<dyn ReputationClient>)
            },
            recycle_after,
        )
    }

    pub fn recycle_after(&self) -> Duration {
        self.recycle_after
    }

    /// Lease the current client, building a new one if none exists or the
    /// stored one is older than the recycle threshold.
    ///
    /// Do not call this again while holding a lease from the same manager: a
    /// pending rebuild waits for that lease to be released.
    pub async fn current(&self) -> Result<ClientLease<'_>, ReputationError> {
        {
            let slot = self.slot.read().await;
            if slot.is_fresh(self.recycle_after) {
                if let Ok(lease) = RwLockReadGuard::try_map(slot, |s| s.handle.as_ref()) {
                    return Ok(lease);
                }
            }
        }

        // Exclusive access: no lease on the old client is outstanding
        let mut slot = self.slot.write().await;
        if !slot.is_fresh(self.recycle_after) {
            if let Some(old) = slot.handle.take() {
                info!(
                    generation = old.generation,
                    age_secs = old.age().as_secs(),
                    "recycling reputation client"
                );
            }

            let client = (self.factory)()?;
            slot.generation += 1;
            slot.handle = Some(ClientHandle {
                client,
                created_at: Instant::now(),
                generation: slot.generation,
            });
            debug!(generation = slot.generation, "reputation client created");
        }

        RwLockReadGuard::try_map(slot.downgrade(), |s| s.handle.as_ref()).map_err(|_| {
            ReputationError::NotConfigured("no reputation client available".into())
        })
    }
}

impl fmt::Debug for ClientManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientManager")
            .field("recycle_after", &self.recycle_after)
            .finish_non_exhaustive()
    }
}
