//! Data-access seam: where match descriptors come from and where results go on save.

use crate::models::{MatchDescriptor, MatchId, MatchUpdate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// Errors returned by a match store.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StoreError {
    /// No match with this id in the store.
    MatchNotFound(MatchId),
    /// The backing service could not be reached or rejected the request.
    Unavailable(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::MatchNotFound(id) => write!(f, "Match {} not found", id),
            StoreError::Unavailable(reason) => write!(f, "Match store unavailable: {}", reason),
        }
    }
}

impl std::error::Error for StoreError {}

/// Read descriptors and write results, keyed by match id.
///
/// Implementations own retries and timeouts, if any; callers get the first failure.
pub trait MatchStore {
    fn fetch_match(
        &self,
        id: MatchId,
    ) -> impl Future<Output = Result<MatchDescriptor, StoreError>> + Send;

    fn update_match(
        &self,
        id: MatchId,
        update: &MatchUpdate,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// A match as held by the in-memory store: descriptor plus last saved result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredMatch {
    #[serde(flatten)]
    pub descriptor: MatchDescriptor,
    pub result: Option<MatchUpdate>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Process-local store used by the web binary and in tests.
#[derive(Debug, Default)]
pub struct InMemoryMatchStore {
    matches: RwLock<HashMap<MatchId, StoredMatch>>,
    offline: AtomicBool,
}

impl InMemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with the given descriptors (e.g. loaded from a fixtures file).
    pub fn with_matches(descriptors: Vec<MatchDescriptor>) -> Self {
        let matches = descriptors
            .into_iter()
            .map(|d| {
                (
                    d.id,
                    StoredMatch {
                        descriptor: d,
                        result: None,
                        updated_at: None,
                    },
                )
            })
            .collect();
        Self {
            matches: RwLock::new(matches),
            offline: AtomicBool::new(false),
        }
    }

    /// Register (or replace) a match descriptor. Clears any saved result.
    pub async fn insert(&self, descriptor: MatchDescriptor) {
        let mut g = self.matches.write().await;
        g.insert(
            descriptor.id,
            StoredMatch {
                descriptor,
                result: None,
                updated_at: None,
            },
        );
    }

    pub async fn get(&self, id: MatchId) -> Option<StoredMatch> {
        self.matches.read().await.get(&id).cloned()
    }

    pub async fn match_count(&self) -> usize {
        self.matches.read().await.len()
    }

    /// Simulate an outage: while offline every call fails with `Unavailable`.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store is offline".to_string()));
        }
        Ok(())
    }
}

impl MatchStore for InMemoryMatchStore {
    async fn fetch_match(&self, id: MatchId) -> Result<MatchDescriptor, StoreError> {
        self.check_online()?;
        self.matches
            .read()
            .await
            .get(&id)
            .map(|m| m.descriptor.clone())
            .ok_or(StoreError::MatchNotFound(id))
    }

    async fn update_match(&self, id: MatchId, update: &MatchUpdate) -> Result<(), StoreError> {
        self.check_online()?;
        let mut g = self.matches.write().await;
        let stored = g.get_mut(&id).ok_or(StoreError::MatchNotFound(id))?;
        stored.result = Some(update.clone());
        stored.updated_at = Some(Utc::now());
        log::debug!("Stored result for match {}", id);
        Ok(())
    }
}
