use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value as JsonValue, json};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// A single entry in a "to watch" collection
#[derive(Debug, Clone, PartialEq)]
pub struct WatchItem {
    pub id: String,
    pub title: String,
    pub added_at: DateTime<Utc>,
}

/// The two watch-list collections the guarded insert path can target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchKind {
    Movies,
    Series,
}

impl WatchKind {
    /// Parse the path segment of a guarded request (`movies` or `series`)
    pub fn from_path(segment: &str) -> Option<Self> {
        match segment {
            "movies" => Some(WatchKind::Movies),
            "series" => Some(WatchKind::Series),
            _ => None,
        }
    }

    /// Name of the backing collection in the document store
    pub fn collection(self) -> &'static str {
        match self {
            WatchKind::Movies => "to_watch_movies",
            WatchKind::Series => "to_watch_series",
        }
    }
}

/// Filter options for list queries
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// Case-insensitive substring match against any string value in a record
    pub q: Option<String>,
    /// Exact field equality, one entry per `key=value` query parameter
    pub fields: Vec<(String, String)>,
    pub limit: Option<usize>,
    pub offset: usize,
}

#[derive(Debug)]
struct StoreInner {
    path: PathBuf,
    document: Map<String, JsonValue>,
}

/// Shareable document store for use across async handlers
///
/// The whole document lives behind a single mutex: every read-check-write
/// sequence (notably the duplicate-guarded insert) holds the guard from the
/// lookup through the flush, and mutations are written to disk before the
/// guard is released.
#[derive(Clone, Debug)]
pub struct FileStore {
    inner: Arc<Mutex<StoreInner>>,
}

impl FileStore {
    /// Open the document store at the given path
    ///
    /// Loads the JSON document if the file exists, or starts from an empty
    /// document otherwise. The two watch-list collections are seeded as
    /// empty arrays when absent, and the file is (re)written so the store
    /// exists on disk before the first request.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or written, or if its
    /// contents are not a JSON object.
    pub async fn open(path: &Path) -> Result<Self> {
        let document = match tokio::fs::read(path).await {
            Ok(bytes) => {
                let value: JsonValue = serde_json::from_slice(&bytes).with_context(|| {
                    format!("Failed to parse document store at {}", path.display())
                })?;
                match value {
                    JsonValue::Object(map) => map,
                    _ => anyhow::bail!(
                        "Document store at {} is not a JSON object",
                        path.display()
                    ),
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No document store at {}, creating one", path.display());
                Map::new()
            }
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("Failed to read document store at {}", path.display())
                });
            }
        };

        let mut inner = StoreInner {
            path: path.to_path_buf(),
            document,
        };

        for kind in [WatchKind::Movies, WatchKind::Series] {
            inner
                .document
                .entry(kind.collection().to_string())
                .or_insert_with(|| json!([]));
        }

        flush(&inner).await?;

        tracing::info!(
            "Opened document store at {} ({} collections)",
            path.display(),
            inner.document.len()
        );

        Ok(Self {
            inner: Arc::new(Mutex::new(inner)),
        })
    }

    /// List the records of a collection, applying the given filter
    ///
    /// # Returns
    /// * `Some(records)` - Collection exists, filtered records returned
    /// * `None` - No such collection
    pub async fn list(&self, collection: &str, filter: &ListFilter) -> Option<Vec<JsonValue>> {
        let inner = self.inner.lock().await;
        let records = inner.document.get(collection)?.as_array()?;

        let needle = filter.q.as_ref().map(|q| q.to_lowercase());
        let matches: Vec<JsonValue> = records
            .iter()
            .filter(|record| {
                filter
                    .fields
                    .iter()
                    .all(|(key, value)| field_matches(record.get(key.as_str()), value))
            })
            .filter(|record| match &needle {
                Some(needle) => contains_text(record, needle),
                None => true,
            })
            .skip(filter.offset)
            .take(filter.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Some(matches)
    }

    /// Read a single record by its id
    pub async fn get(&self, collection: &str, id: &str) -> Option<JsonValue> {
        let inner = self.inner.lock().await;
        let records = inner.document.get(collection)?.as_array()?;
        records.iter().find(|record| id_matches(record, id)).cloned()
    }

    /// Append a record to a collection and flush to disk
    ///
    /// Assigns a fresh UUID `id` when the record does not carry one.
    ///
    /// # Returns
    /// * `Ok(Some(record))` - Record as stored
    /// * `Ok(None)` - No such collection
    ///
    /// # Errors
    /// Returns an error if the flush to disk fails.
    pub async fn insert(&self, collection: &str, mut record: JsonValue) -> Result<Option<JsonValue>> {
        let mut inner = self.inner.lock().await;
        let Some(records) = inner
            .document
            .get_mut(collection)
            .and_then(JsonValue::as_array_mut)
        else {
            return Ok(None);
        };

        if let Some(map) = record.as_object_mut() {
            map.entry("id")
                .or_insert_with(|| JsonValue::String(Uuid::new_v4().to_string()));
        }

        records.push(record.clone());
        flush(&inner).await?;

        tracing::debug!("Inserted record into {}", collection);
        Ok(Some(record))
    }

    /// Replace a record, keeping its id, and flush to disk
    ///
    /// # Returns
    /// * `Ok(Some(record))` - Record as stored
    /// * `Ok(None)` - No such collection or record
    pub async fn replace(
        &self,
        collection: &str,
        id: &str,
        mut record: JsonValue,
    ) -> Result<Option<JsonValue>> {
        let mut inner = self.inner.lock().await;
        let Some(records) = inner
            .document
            .get_mut(collection)
            .and_then(JsonValue::as_array_mut)
        else {
            return Ok(None);
        };

        let Some(position) = records.iter().position(|r| id_matches(r, id)) else {
            return Ok(None);
        };

        if let Some(map) = record.as_object_mut() {
            let existing_id = records[position]
                .get("id")
                .cloned()
                .unwrap_or_else(|| JsonValue::String(id.to_string()));
            map.insert("id".to_string(), existing_id);
        }

        records[position] = record.clone();
        flush(&inner).await?;

        tracing::debug!("Replaced record {} in {}", id, collection);
        Ok(Some(record))
    }

    /// Remove a record and flush to disk
    ///
    /// # Returns
    /// * `Ok(Some(record))` - The removed record
    /// * `Ok(None)` - No such collection or record
    pub async fn delete(&self, collection: &str, id: &str) -> Result<Option<JsonValue>> {
        let mut inner = self.inner.lock().await;
        let Some(records) = inner
            .document
            .get_mut(collection)
            .and_then(JsonValue::as_array_mut)
        else {
            return Ok(None);
        };

        let Some(position) = records.iter().position(|r| id_matches(r, id)) else {
            return Ok(None);
        };

        let removed = records.remove(position);
        flush(&inner).await?;

        tracing::debug!("Deleted record {} from {}", id, collection);
        Ok(Some(removed))
    }

    /// Add a title to a watch-list collection unless it is already present
    ///
    /// The duplicate check and the append run under a single lock
    /// acquisition, and the document is flushed before the guard is
    /// released, so two concurrent inserts of the same title cannot both
    /// pass the check.
    ///
    /// # Arguments
    /// * `kind` - Which watch-list collection to target
    /// * `title` - Title to add, compared exactly (case-sensitive)
    ///
    /// # Returns
    /// * `Ok(Some(item))` - Item stored
    /// * `Ok(None)` - An item with this title already exists
    ///
    /// # Errors
    /// Returns an error if the flush to disk fails.
    pub async fn add_watch_item(&self, kind: WatchKind, title: &str) -> Result<Option<WatchItem>> {
        let mut inner = self.inner.lock().await;
        let records = inner
            .document
            .entry(kind.collection().to_string())
            .or_insert_with(|| json!([]))
            .as_array_mut()
            .with_context(|| format!("Collection {} is not an array", kind.collection()))?;

        let exists = records
            .iter()
            .any(|record| record.get("title").and_then(JsonValue::as_str) == Some(title));
        if exists {
            tracing::debug!("Title already present in {}: {}", kind.collection(), title);
            return Ok(None);
        }

        let item = WatchItem {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            added_at: Utc::now(),
        };
        records.push(json!({
            "id": item.id,
            "title": item.title,
            "added_at": item.added_at.to_rfc3339(),
        }));
        flush(&inner).await?;

        tracing::debug!("Added '{}' to {}", title, kind.collection());
        Ok(Some(item))
    }

    /// Verify that the backing file is still reachable
    ///
    /// # Errors
    /// Returns an error if the document store file cannot be stat'ed.
    pub async fn health_check(&self) -> Result<()> {
        let inner = self.inner.lock().await;
        tokio::fs::metadata(&inner.path).await.with_context(|| {
            format!("Document store at {} is not accessible", inner.path.display())
        })?;
        Ok(())
    }
}

/// Write the whole document back to disk, pretty-printed
async fn flush(inner: &StoreInner) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(&inner.document)
        .context("Failed to serialize document store")?;
    tokio::fs::write(&inner.path, bytes)
        .await
        .with_context(|| format!("Failed to write document store to {}", inner.path.display()))?;
    Ok(())
}

/// Compare a record's `id` field against a path segment
///
/// Seeded stores may carry numeric ids, so numbers compare by their
/// canonical string form.
fn id_matches(record: &JsonValue, id: &str) -> bool {
    match record.get("id") {
        Some(JsonValue::String(s)) => s == id,
        Some(JsonValue::Number(n)) => n.to_string() == id,
        _ => false,
    }
}

fn field_matches(value: Option<&JsonValue>, expected: &str) -> bool {
    match value {
        Some(JsonValue::String(s)) => s == expected,
        Some(JsonValue::Number(n)) => n.to_string() == expected,
        Some(JsonValue::Bool(b)) => b.to_string() == expected,
        _ => false,
    }
}

/// Whether any string value in the record contains the (lowercased) needle
fn contains_text(value: &JsonValue, needle: &str) -> bool {
    match value {
        JsonValue::String(s) => s.to_lowercase().contains(needle),
        JsonValue::Array(items) => items.iter().any(|item| contains_text(item, needle)),
        JsonValue::Object(map) => map.values().any(|item| contains_text(item, needle)),
        _ => false,
    }
}
