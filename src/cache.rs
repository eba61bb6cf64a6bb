//! Per-entity cache of extracted table metadata.
//!
//! Entity descriptions are static for a given type, so hosts usually extract
//! once and reuse the result. Each entry is a [`OnceCell`]: concurrent first
//! requests for the same entity type block on a single extraction.

use crate::entity::EntityType;
use crate::extractor::MetadataExtractor;
use crate::meta::TableMetadata;
use once_cell::sync::OnceCell;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

type Slot = Arc<OnceCell<Option<Arc<TableMetadata>>>>;

/// Identity of an entity type: its address
type Key = usize;

fn key(entity: &EntityType) -> Key {
    entity as *const EntityType as usize
}

struct Entry {
    /// Keeps the type alive so its address is not reused while cached
    entity: Arc<EntityType>,
    slot: Slot,
}

/// Cache keyed by entity type identity.
///
/// Distinct types get distinct entries even when they share a name. A
/// cached `None` records that the type is not a persisted entity.
pub struct MetadataCache {
    extractor: Arc<MetadataExtractor>,
    entries: Mutex<HashMap<Key, Entry>>,
}

impl Default for MetadataCache {
    fn default() -> Self {
        Self::new(Arc::new(MetadataExtractor::default()))
    }
}

impl MetadataCache {
    pub fn new(extractor: Arc<MetadataExtractor>) -> Self {
        Self {
            extractor,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<Key, Entry>> {
        // Entries are only inserted or removed under the lock, never left half-written
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached metadata for `entity`, extracting it on first access
    pub fn get_or_extract(&self, entity: &Arc<EntityType>) -> Option<Arc<TableMetadata>> {
        let slot = {
            let mut entries = self.entries();
            if !entries.contains_key(&key(entity)) {
                let same_name = entries
                    .values()
                    .filter(|entry| entry.entity.name() == entity.name())
                    .count();
                if same_name > 0 {
                    log::debug!(
                        "{} distinct types named {} already cached",
                        same_name,
                        entity.name()
                    );
                }
            }
            let entry = entries.entry(key(entity)).or_insert_with(|| Entry {
                entity: Arc::clone(entity),
                slot: Slot::default(),
            });
            Arc::clone(&entry.slot)
        };
        slot.get_or_init(|| {
            log::debug!("Metadata cache miss for {}", entity.name());
            self.extractor.extract_table(entity).map(Arc::new)
        })
        .clone()
    }

    /// Cached result for `entity`; outer `None` when not extracted yet
    pub fn get(&self, entity: &EntityType) -> Option<Option<Arc<TableMetadata>>> {
        let slot = self
            .entries()
            .get(&key(entity))
            .map(|entry| Arc::clone(&entry.slot))?;
        slot.get().cloned()
    }

    /// Drop the cached entry for `entity`, returning whether one existed
    pub fn invalidate(&self, entity: &EntityType) -> bool {
        self.entries().remove(&key(entity)).is_some()
    }

    /// Drop the cached entries of every type named `name`, returning how many
    pub fn invalidate_named(&self, name: &str) -> usize {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| entry.entity.name() != name);
        before - entries.len()
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    /// Number of entity types with a cached result
    pub fn len(&self) -> usize {
        self.entries()
            .values()
            .filter(|entry| entry.slot.get().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
