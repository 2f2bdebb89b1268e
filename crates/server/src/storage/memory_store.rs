use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use bytes::Bytes;
use chrono::{TimeZone, Utc};

use super::{ListedObject, ObjectStorage, StorageError, StoredObject};

/// In-memory bucket for handler and protocol tests.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, StoredObject>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: &str, content_type: Option<&str>, body: Option<&[u8]>) {
        let object = StoredObject {
            content_type: content_type.map(str::to_string),
            content_length: body.map_or(0, |b| b.len() as u64),
            last_modified: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
            metadata: HashMap::from([("uploaded-by".to_string(), "tests".to_string())]),
            body: body.map(Bytes::copy_from_slice),
        };
        self.objects.lock().unwrap().insert(key.to_string(), object);
    }
}

#[async_trait::async_trait]
impl ObjectStorage for MemoryStore {
    async fn get_object(&self, key: &str) -> Result<StoredObject, StorageError> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn list_objects(&self, prefix: &str) -> Result<Vec<ListedObject>, StorageError> {
        Ok(self
            .objects
            .lock()
            .unwrap()
            .keys()
            .filter(|key| key.starts_with(prefix))
            .map(|key| ListedObject { key: key.clone() })
            .collect())
    }
}
