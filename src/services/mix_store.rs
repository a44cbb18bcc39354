use crate::error::ServiceError;
use async_trait::async_trait;
use pigment_mix::{compare_by_data_index, Medium, PaintMix};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Trait for saved paint mix storage, keyed by [`PaintMix::id`]
#[async_trait]
pub trait MixStore: Send + Sync {
    /// Store a mix and stamp it with a fresh creation index. Saving a mix
    /// that is already stored replaces it.
    async fn save(&self, mix: PaintMix) -> Result<PaintMix, ServiceError>;

    /// Delete the mix with this id. Returns whether it existed.
    async fn delete(&self, id: &str) -> Result<bool, ServiceError>;

    /// Saved mixes of one medium, most recent first
    async fn list_by_medium(&self, medium: Medium) -> Result<Vec<PaintMix>, ServiceError>;

    /// Delete every mix of one medium. Returns how many were removed.
    async fn delete_all_by_medium(&self, medium: Medium) -> Result<usize, ServiceError>;
}

#[derive(Default)]
struct Records {
    by_id: HashMap<String, PaintMix>,
    last_index: i64,
}

/// In-memory saved mix storage
pub struct InMemoryMixStore {
    records: Arc<RwLock<Records>>,
}

impl InMemoryMixStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Records::default())),
        }
    }
}

impl Default for InMemoryMixStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MixStore for InMemoryMixStore {
    async fn save(&self, mix: PaintMix) -> Result<PaintMix, ServiceError> {
        let mut records = self.records.write().await;
        // Wall-clock millis, bumped past every earlier stamp so indices stay unique
        let now = chrono::Utc::now().timestamp_millis();
        let data_index = now.max(records.last_index + 1);
        records.last_index = data_index;

        let mix = mix.with_data_index(data_index);
        let replaced = records.by_id.insert(mix.id.clone(), mix.clone()).is_some();
        tracing::debug!(id = %mix.id, data_index, medium = %mix.medium, replaced, "Saved paint mix");
        Ok(mix)
    }

    async fn delete(&self, id: &str) -> Result<bool, ServiceError> {
        let mut records = self.records.write().await;
        Ok(records.by_id.remove(id).is_some())
    }

    async fn list_by_medium(&self, medium: Medium) -> Result<Vec<PaintMix>, ServiceError> {
        let records = self.records.read().await;
        let mut list: Vec<PaintMix> = records
            .by_id
            .values()
            .filter(|mix| mix.medium == medium)
            .cloned()
            .collect();
        list.sort_by(compare_by_data_index);
        Ok(list)
    }

    async fn delete_all_by_medium(&self, medium: Medium) -> Result<usize, ServiceError> {
        let mut records = self.records.write().await;
        let before = records.by_id.len();
        records.by_id.retain(|_, mix| mix.medium != medium);
        Ok(before - records.by_id.len())
    }
}
