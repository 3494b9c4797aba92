use crate::errors::AppError;
use crate::models::{ActivityLog, AppData, Notes, TagSet};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, warn};

pub const ACTIVITIES_KEY: &str = "activities";
pub const COMMENTS_KEY: &str = "comments";

/// Key-value store backed by a single JSON object on disk.
#[derive(Debug, Clone)]
pub struct KvStore {
    path: PathBuf,
}

impl KvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        self.read_entries().await.remove(key)
    }

    pub async fn set(&self, key: &str, blob: Value) -> Result<(), AppError> {
        self.set_many([(key, blob)]).await
    }

    /// Writes every pair in a single read-modify-write of the file.
    pub async fn set_many<'a>(
        &self,
        pairs: impl IntoIterator<Item = (&'a str, Value)>,
    ) -> Result<(), AppError> {
        let mut entries = self.read_entries().await;
        for (key, blob) in pairs {
            entries.insert(key.to_string(), blob);
        }
        self.write_entries(&entries).await
    }

    async fn read_entries(&self) -> Map<String, Value> {
        match fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice::<Value>(&bytes) {
                Ok(Value::Object(entries)) => entries,
                Ok(_) => {
                    error!("store file is not a JSON object: {}", self.path.display());
                    Map::new()
                }
                Err(err) => {
                    error!("failed to parse store file: {err}");
                    Map::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(err) => {
                error!("failed to read store file: {err}");
                Map::new()
            }
        }
    }

    async fn write_entries(&self, entries: &Map<String, Value>) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let payload = serde_json::to_vec_pretty(entries).map_err(AppError::internal)?;
        fs::write(&self.path, payload).await?;
        Ok(())
    }
}

pub async fn load_data(store: &KvStore) -> AppData {
    let activities = store
        .get(ACTIVITIES_KEY)
        .await
        .map(parse_activities)
        .unwrap_or_default();
    let comments = store
        .get(COMMENTS_KEY)
        .await
        .map(parse_notes)
        .unwrap_or_default();

    AppData {
        activities,
        comments,
    }
}

pub async fn persist_data(store: &KvStore, data: &AppData) -> Result<(), AppError> {
    let activities = serde_json::to_value(&data.activities).map_err(AppError::internal)?;
    let comments = serde_json::to_value(&data.comments).map_err(AppError::internal)?;
    store
        .set_many([(ACTIVITIES_KEY, activities), (COMMENTS_KEY, comments)])
        .await
}

fn parse_activities(blob: Value) -> ActivityLog {
    let Value::Object(entries) = blob else {
        warn!("ignoring malformed activities blob");
        return ActivityLog::new();
    };

    entries
        .into_iter()
        .filter_map(|(date, tags)| match serde_json::from_value::<TagSet>(tags) {
            Ok(tags) if !tags.is_empty() => Some((date, tags)),
            Ok(_) => None,
            Err(err) => {
                warn!(%date, "dropping malformed activity entry: {err}");
                None
            }
        })
        .collect()
}

fn parse_notes(blob: Value) -> Notes {
    let Value::Object(entries) = blob else {
        warn!("ignoring malformed comments blob");
        return Notes::new();
    };

    entries
        .into_iter()
        .filter_map(|(date, note)| match note {
            Value::String(text) if !text.trim().is_empty() => Some((date, text)),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tag;

    fn temp_store(name: &str) -> KvStore {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!(
            "activity_tracker_{name}_{}_{nanos}/state.json",
            std::process::id()
        ));
        KvStore::new(path)
    }

    #[tokio::test]
    async fn missing_file_loads_empty_data() {
        let store = temp_store("missing");
        assert_eq!(load_data(&store).await, AppData::default());
        assert!(store.get(ACTIVITIES_KEY).await.is_none());
    }

    #[tokio::test]
    async fn persisted_data_round_trips() {
        let store = temp_store("round_trip");
        let mut data = AppData::default();
        data.activities.insert(
            "2026-01-03".to_string(),
            [Tag::Sport, Tag::Work].into_iter().collect(),
        );
        data.comments
            .insert("2026-01-03".to_string(), "gym then office".to_string());

        persist_data(&store, &data).await.unwrap();
        assert_eq!(load_data(&store).await, data);
    }

    #[tokio::test]
    async fn malformed_file_degrades_to_empty_log() {
        let store = temp_store("malformed");
        fs::create_dir_all(store.path().parent().unwrap()).await.unwrap();
        fs::write(store.path(), b"{not json").await.unwrap();

        assert_eq!(load_data(&store).await, AppData::default());
    }

    #[tokio::test]
    async fn bad_entries_are_dropped_individually() {
        let store = temp_store("lenient");
        store
            .set(
                ACTIVITIES_KEY,
                serde_json::json!({
                    "2026-02-01": ["work", "nap"],
                    "2026-02-02": ["nap"],
                    "2026-02-03": "sport"
                }),
            )
            .await
            .unwrap();
        store
            .set(COMMENTS_KEY, serde_json::json!({ "2026-02-01": "ok", "2026-02-02": 3 }))
            .await
            .unwrap();

        let data = load_data(&store).await;
        assert_eq!(data.activities.len(), 1);
        assert_eq!(
            data.activities["2026-02-01"].iter().collect::<Vec<_>>(),
            vec![Tag::Work]
        );
        assert_eq!(data.comments.len(), 1);
    }

    #[tokio::test]
    async fn set_keeps_other_keys() {
        let store = temp_store("other_keys");
        store.set("theme", serde_json::json!("dark")).await.unwrap();
        store
            .set(ACTIVITIES_KEY, serde_json::json!({}))
            .await
            .unwrap();

        assert_eq!(store.get("theme").await, Some(serde_json::json!("dark")));
    }

    #[tokio::test]
    async fn persist_writes_both_keys_at_once() {
        let store = temp_store("both_keys");
        let mut data = AppData::default();
        data.activities
            .insert("2026-04-01".to_string(), [Tag::Goals].into_iter().collect());
        data.comments
            .insert("2026-04-01".to_string(), "plan".to_string());
        persist_data(&store, &data).await.unwrap();

        let raw = fs::read(store.path()).await.unwrap();
        let file: Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(file[ACTIVITIES_KEY], serde_json::json!({ "2026-04-01": ["goals"] }));
        assert_eq!(file[COMMENTS_KEY], serde_json::json!({ "2026-04-01": "plan" }));
    }

    #[tokio::test]
    async fn persist_fails_when_parent_is_a_file() {
        let blocker = temp_store("blocked").path().with_file_name("blocker");
        fs::create_dir_all(blocker.parent().unwrap()).await.unwrap();
        fs::write(&blocker, b"not a directory").await.unwrap();
        let store = KvStore::new(blocker.join("state.json"));

        assert!(persist_data(&store, &AppData::default()).await.is_err());
        assert_eq!(load_data(&store).await, AppData::default());
    }

    #[tokio::test]
    async fn mixed_tag_entries_keep_valid_tags() {
        let store = temp_store("mixed");
        store
            .set(
                ACTIVITIES_KEY,
                serde_json::json!({ "2026-05-01": ["sport", 1, null] }),
            )
            .await
            .unwrap();

        let data = load_data(&store).await;
        assert_eq!(
            data.activities["2026-05-01"].iter().collect::<Vec<_>>(),
            vec![Tag::Sport]
        );
    }
}
