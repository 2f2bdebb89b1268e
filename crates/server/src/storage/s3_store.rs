use std::collections::HashMap;
use std::sync::Arc;

use futures::TryStreamExt;
use object_store::aws::AmazonS3Builder;
use object_store::path::Path as StorePath;
use object_store::{Attribute, ObjectStore};

use super::{ListedObject, ObjectStorage, StorageError, StoredObject};
use crate::config::Config;

pub struct S3Store {
    inner: Arc<dyn ObjectStore>,
}

impl S3Store {
    pub fn new(config: &Config) -> Result<Self, StorageError> {
        let credentials = &config.credentials;
        let mut builder = AmazonS3Builder::new()
            .with_region(&config.region)
            .with_bucket_name(&config.bucket)
            .with_access_key_id(&credentials.access_key_id)
            .with_secret_access_key(&credentials.secret_access_key);

        if let Some(token) = &credentials.session_token {
            builder = builder.with_token(token);
        }
        if let Some(endpoint) = &config.endpoint {
            builder = builder.with_endpoint(endpoint).with_allow_http(true);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        Ok(Self::from_store(Arc::new(store)))
    }

    pub fn from_store(inner: Arc<dyn ObjectStore>) -> Self {
        Self { inner }
    }
}

#[async_trait::async_trait]
impl ObjectStorage for S3Store {
    async fn get_object(&self, key: &str) -> Result<StoredObject, StorageError> {
        let store_path = StorePath::from(key);
        let result = self.inner.get(&store_path).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => StorageError::NotFound(key.to_string()),
            other => StorageError::Backend(other.to_string()),
        })?;

        let meta = result.meta.clone();
        let mut content_type = None;
        let mut metadata = HashMap::new();
        for (attribute, value) in result.attributes.iter() {
            match attribute {
                Attribute::ContentType => content_type = Some(value.to_string()),
                Attribute::Metadata(name) => {
                    metadata.insert(name.to_string(), value.to_string());
                }
                _ => {}
            }
        }

        let body = result
            .bytes()
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        Ok(StoredObject {
            content_type,
            content_length: meta.size as u64,
            last_modified: meta.last_modified,
            metadata,
            body: Some(body),
        })
    }

    async fn list_objects(&self, prefix: &str) -> Result<Vec<ListedObject>, StorageError> {
        let (directory, _) = split_prefix(prefix);
        let directory = directory.map(StorePath::from);

        let metas: Vec<_> = self
            .inner
            .list(directory.as_ref())
            .try_collect()
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        let mut keys: Vec<ListedObject> = metas
            .into_iter()
            .map(|meta| meta.location.to_string())
            .filter(|key| key.starts_with(prefix))
            .map(|key| ListedObject { key })
            .collect();
        keys.sort_by(|a, b| a.key.cmp(&b.key));

        Ok(keys)
    }
}

/// Split a raw S3 prefix into the directory to list and the partial last segment.
///
/// S3 prefixes may end mid-segment (`reports/2024-`), while listing works
/// on whole path segments, so the listing covers the parent directory and
/// keys are filtered by the raw prefix afterwards.
fn split_prefix(prefix: &str) -> (Option<&str>, &str) {
    match prefix.rsplit_once('/') {
        Some((directory, rest)) if !directory.is_empty() => (Some(directory), rest),
        Some((_, rest)) => (None, rest),
        None => (None, prefix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_store::memory::InMemory;
    use object_store::{Attributes, PutOptions, PutPayload};

    async fn store_with(keys: &[&str]) -> (S3Store, Arc<InMemory>) {
        let memory = Arc::new(InMemory::new());
        for key in keys {
            memory
                .put(&StorePath::from(*key), PutPayload::from(key.as_bytes().to_vec()))
                .await
                .unwrap();
        }
        (S3Store::from_store(memory.clone()), memory)
    }

    #[test]
    fn test_split_prefix() {
        assert_eq!(split_prefix(""), (None, ""));
        assert_eq!(split_prefix("slides"), (None, "slides"));
        assert_eq!(split_prefix("course/"), (Some("course"), ""));
        assert_eq!(split_prefix("course/week-1"), (Some("course"), "week-1"));
        assert_eq!(split_prefix("a/b/c"), (Some("a/b"), "c"));
    }

    #[tokio::test]
    async fn test_list_objects_with_partial_segment_prefix() {
        let (store, _) = store_with(&[
            "internet-protocol/first.pptx",
            "internet-protocol/second.pdf",
            "internet-security/notes.txt",
            "readme.txt",
        ])
        .await;

        let keys: Vec<String> = store
            .list_objects("internet-p")
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.key)
            .collect();
        assert_eq!(keys, vec!["internet-protocol/first.pptx", "internet-protocol/second.pdf"]);

        let keys = store.list_objects("internet-protocol/f").await.unwrap();
        assert_eq!(keys, vec![ListedObject { key: "internet-protocol/first.pptx".to_string() }]);

        assert_eq!(store.list_objects("").await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_get_object_reads_attributes() {
        let (store, memory) = store_with(&[]).await;

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, "text/plain".into());
        attributes.insert(Attribute::Metadata("author".into()), "kim".into());
        let options = PutOptions::from(attributes);
        memory
            .put_opts(&StorePath::from("notes.txt"), PutPayload::from_static(b"hello"), options)
            .await
            .unwrap();

        let object = store.get_object("notes.txt").await.unwrap();
        assert_eq!(object.content_type.as_deref(), Some("text/plain"));
        assert_eq!(object.content_length, 5);
        assert_eq!(object.metadata.get("author").map(String::as_str), Some("kim"));
        assert_eq!(object.body.as_deref(), Some(b"hello".as_slice()));
    }

    #[tokio::test]
    async fn test_get_missing_object() {
        let (store, _) = store_with(&[]).await;
        let err = store.get_object("nope.pdf").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(key) if key == "nope.pdf"));
    }
}
