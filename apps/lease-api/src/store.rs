//! In-memory analysis storage and the per-user access ledger.
//!
//! Both live behind traits so a durable backend can replace the in-memory
//! maps without touching the orchestrator. Records are process-lifetime;
//! no eviction policy is implemented (known capacity limit of the memory
//! backend).

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use lease_types::{AccessGrant, AccessStatus, AnalysisRecord};
use tokio::sync::RwLock;
use tracing::info;

/// Keyed storage for completed analyses.
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    async fn put(&self, record: AnalysisRecord);
    async fn get(&self, analysis_id: &str) -> Option<AnalysisRecord>;
    async fn list_ids(&self) -> Vec<String>;
}

/// Rolling access windows over full reports, one grant per user.
#[async_trait]
pub trait AccessLedger: Send + Sync {
    async fn check_access(&self, user_id: &str) -> AccessStatus;

    /// Record an analysis against a user. Creates the grant (fixing its
    /// expiry) on first call; later calls only append the id, set-style.
    async fn record_analysis(&self, user_id: &str, analysis_id: &str);
}

#[derive(Default)]
pub struct MemoryAnalysisStore {
    records: RwLock<HashMap<String, AnalysisRecord>>,
}

impl MemoryAnalysisStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnalysisStore for MemoryAnalysisStore {
    async fn put(&self, record: AnalysisRecord) {
        let mut records = self.records.write().await;
        info!(
            "Stored analysis with ID: {} for user: {}",
            record.analysis_id, record.user_id
        );
        records.insert(record.analysis_id.clone(), record);
    }

    async fn get(&self, analysis_id: &str) -> Option<AnalysisRecord> {
        self.records.read().await.get(analysis_id).cloned()
    }

    async fn list_ids(&self) -> Vec<String> {
        self.records.read().await.keys().cloned().collect()
    }
}

pub struct MemoryAccessLedger {
    grants: RwLock<HashMap<String, AccessGrant>>,
    access_days: i64,
}

impl MemoryAccessLedger {
    pub fn new(access_days: i64) -> Self {
        Self {
            grants: RwLock::new(HashMap::new()),
            access_days,
        }
    }
}

#[async_trait]
impl AccessLedger for MemoryAccessLedger {
    async fn check_access(&self, user_id: &str) -> AccessStatus {
        let grants = self.grants.read().await;
        let Some(grant) = grants.get(user_id) else {
            return AccessStatus::denied();
        };

        let now = Utc::now();
        if now >= grant.expires_at {
            // Expired grants stay in the map but report inactive; they can
            // never reactivate since expiry is fixed at creation.
            return AccessStatus::denied();
        }

        AccessStatus {
            has_access: true,
            expires_at: Some(grant.expires_at),
            days_remaining: Some((grant.expires_at - now).num_days()),
            analyses_count: Some(grant.analysis_ids.len()),
        }
    }

    async fn record_analysis(&self, user_id: &str, analysis_id: &str) {
        // Single write lock covers grant creation and the append, so two
        // concurrent calls for one user cannot race into two grants or a
        // lost id.
        let mut grants = self.grants.write().await;
        let grant = grants
            .entry(user_id.to_string())
            .or_insert_with(|| AccessGrant {
                user_id: user_id.to_string(),
                analysis_ids: Vec::new(),
                expires_at: Utc::now() + Duration::days(self.access_days),
            });
        if !grant.analysis_ids.iter().any(|id| id == analysis_id) {
            grant.analysis_ids.push(analysis_id.to_string());
        }
    }
}
