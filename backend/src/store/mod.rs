//! # Document Store
//!
//! A small document store on top of SQLite. Each named collection is a table of
//! JSON documents keyed by a store-internal, monotonically increasing `_id`:
//!
//! ```sql
//! CREATE TABLE <collection> (_id INTEGER PRIMARY KEY AUTOINCREMENT, doc TEXT NOT NULL)
//! ```
//!
//! The backend uses two collections:
//! - `fundraising_data`: holds at most one logical document (the campaign record).
//! - `status_checks`: an append-only log of client status entries.
//!
//! A `Store` owns a single connection shared by all workers behind a mutex. All
//! `Collection` operations run on tokio's blocking pool so that SQLite I/O never
//! stalls the actix workers, and each one takes the lock exactly once, which
//! makes every operation atomic with respect to the others.

pub mod documents;

use crate::error::{ApiError, Result};
use log::{debug, info, warn};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Collection holding the singleton fundraising record.
pub const FUNDRAISING_DATA: &str = "fundraising_data";

/// Collection holding the append-only status log.
pub const STATUS_CHECKS: &str = "status_checks";

const COLLECTIONS: [&str; 2] = [FUNDRAISING_DATA, STATUS_CHECKS];

/// Location value that selects a private in-memory database.
pub const IN_MEMORY: &str = ":memory:";

/// A stored document together with its store-internal identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: i64,
    pub body: Map<String, Value>,
}

/// Outcome of an `update_one` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateResult {
    /// Number of documents selected by the update (0 or 1).
    pub matched: usize,
    /// Number of documents whose content actually changed.
    pub modified: usize,
}

/// Handle to the document store. Cheap to clone; clones share the connection.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
    location: String,
}

impl Store {
    /// Opens (or creates) the database `<db_name>.sqlite` inside `store_url`.
    ///
    /// `store_url` may also be `:memory:`, in which case the database lives only
    /// as long as the store.
    pub fn open(store_url: &str, db_name: &str) -> Result<Self> {
        if store_url == IN_MEMORY {
            return Self::open_in_memory();
        }
        if store_url.contains("://") {
            return Err(ApiError::configuration(format!(
                "store location must be a directory, not a URL: {store_url}"
            )));
        }

        let dir = Path::new(store_url);
        if !dir.exists() {
            std::fs::create_dir_all(dir)
                .map_err(|e| ApiError::configuration(format!("cannot create {store_url}: {e}")))?;
        }
        let path = dir.join(format!("{db_name}.sqlite"));
        let location = path.display().to_string();

        debug!("Opening store at {}", location);
        let conn = Connection::open(&path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        Self::with_connection(conn, location)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn, IN_MEMORY.to_string())
    }

    fn with_connection(conn: Connection, location: String) -> Result<Self> {
        for name in COLLECTIONS {
            conn.execute_batch(&format!(
                "CREATE TABLE IF NOT EXISTS {name} (
                    _id INTEGER PRIMARY KEY AUTOINCREMENT,
                    doc TEXT NOT NULL
                )"
            ))?;
        }
        info!("Store ready at {}", location);
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            location,
        })
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Returns a handle to one of the store's collections.
    pub fn collection(&self, name: &'static str) -> Collection {
        Collection {
            store: self.clone(),
            name,
        }
    }

    /// Runs `f` with exclusive access to the connection on the blocking pool.
    async fn run<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| ApiError::Blocking("store connection lock poisoned".into()))?;
            f(&mut *guard)
        })
        .await?
    }

    /// Releases the connection.
    ///
    /// If other handles are still alive the connection is released when the
    /// last of them is dropped instead.
    pub fn close(self) {
        let location = self.location;
        match Arc::try_unwrap(self.conn) {
            Ok(mutex) => {
                let conn = mutex.into_inner().unwrap_or_else(|e| e.into_inner());
                match conn.close() {
                    Ok(()) => info!("Store connection at {} closed", location),
                    Err((_, e)) => warn!("Failed to close store at {}: {}", location, e),
                }
            }
            Err(_) => debug!("Store at {} still shared; released on last drop", location),
        }
    }
}

/// A named collection of JSON documents.
#[derive(Clone)]
pub struct Collection {
    store: Store,
    name: &'static str,
}

impl Collection {
    /// Returns the first document of the collection, if any.
    pub async fn find_one(&self) -> Result<Option<Document>> {
        let name = self.name;
        self.store
            .run(move |conn| first_document(conn, name))
            .await
    }

    /// Appends a document and returns its store-internal identifier.
    pub async fn insert_one(&self, body: Map<String, Value>) -> Result<i64> {
        let name = self.name;
        self.store
            .run(move |conn| {
                let doc = serde_json::to_string(&body)?;
                conn.execute(
                    &format!("INSERT INTO {name} (doc) VALUES (?1)"),
                    params![doc],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await
    }

    /// Sets the given top-level fields on the first document of the collection.
    ///
    /// Fields not named in `fields` are left untouched. Nothing is inserted
    /// when the collection is empty.
    pub async fn update_one(&self, fields: Map<String, Value>) -> Result<UpdateResult> {
        let name = self.name;
        self.store
            .run(move |conn| {
                let tx = conn.transaction()?;
                let Some(mut current) = first_document(&tx, name)? else {
                    return Ok(UpdateResult {
                        matched: 0,
                        modified: 0,
                    });
                };

                let before = current.body.clone();
                current.body.extend(fields);
                if current.body == before {
                    return Ok(UpdateResult {
                        matched: 1,
                        modified: 0,
                    });
                }

                let doc = serde_json::to_string(&current.body)?;
                let modified = tx.execute(
                    &format!("UPDATE {name} SET doc = ?1 WHERE _id = ?2"),
                    params![doc, current.id],
                )?;
                tx.commit()?;
                Ok(UpdateResult {
                    matched: 1,
                    modified,
                })
            })
            .await
    }

    /// Returns up to `limit` documents in insertion order.
    pub async fn find(&self, limit: usize) -> Result<Vec<Document>> {
        let name = self.name;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.store
            .run(move |conn| {
                let mut stmt =
                    conn.prepare(&format!("SELECT _id, doc FROM {name} ORDER BY _id LIMIT ?1"))?;
                let rows = stmt.query_map(params![limit], |row| {
                    Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
                })?;

                let mut documents = Vec::new();
                for row in rows {
                    let (id, doc) = row?;
                    documents.push(Document {
                        id,
                        body: serde_json::from_str(&doc)?,
                    });
                }
                Ok(documents)
            })
            .await
    }

    pub async fn count(&self) -> Result<u64> {
        let name = self.name;
        self.store
            .run(move |conn| {
                let count: i64 =
                    conn.query_row(&format!("SELECT COUNT(*) FROM {name}"), [], |row| row.get(0))?;
                Ok(u64::try_from(count).unwrap_or_default())
            })
            .await
    }
}

fn first_document(conn: &Connection, name: &str) -> Result<Option<Document>> {
    let row = conn
        .query_row(
            &format!("SELECT _id, doc FROM {name} ORDER BY _id LIMIT 1"),
            [],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)),
        )
        .optional()?;

    match row {
        Some((id, doc)) => Ok(Some(Document {
            id,
            body: serde_json::from_str(&doc)?,
        })),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[actix_web::test]
    async fn insert_then_find_keeps_insertion_order() {
        let store = Store::open_in_memory().unwrap();
        let log = store.collection(STATUS_CHECKS);
        for i in 0..5 {
            log.insert_one(object(json!({ "n": i }))).await.unwrap();
        }

        let docs = log.find(3).await.unwrap();
        assert_eq!(docs.len(), 3);
        let ns: Vec<i64> = docs.iter().map(|d| d.body["n"].as_i64().unwrap()).collect();
        assert_eq!(ns, vec![0, 1, 2]);
        assert_eq!(log.count().await.unwrap(), 5);
    }

    #[actix_web::test]
    async fn find_one_on_empty_collection() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.collection(FUNDRAISING_DATA).find_one().await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn update_one_sets_fields_and_keeps_others() {
        let store = Store::open_in_memory().unwrap();
        let data = store.collection(FUNDRAISING_DATA);
        data.insert_one(object(json!({ "a": 1, "createdAt": "then" })))
            .await
            .unwrap();

        let result = data.update_one(object(json!({ "a": 2, "b": 3 }))).await.unwrap();
        assert_eq!(result, UpdateResult { matched: 1, modified: 1 });

        let doc = data.find_one().await.unwrap().unwrap();
        assert_eq!(Value::Object(doc.body), json!({ "a": 2, "b": 3, "createdAt": "then" }));
    }

    #[actix_web::test]
    async fn update_one_reports_no_change() {
        let store = Store::open_in_memory().unwrap();
        let data = store.collection(FUNDRAISING_DATA);
        data.insert_one(object(json!({ "a": 1 }))).await.unwrap();

        let result = data.update_one(object(json!({ "a": 1 }))).await.unwrap();
        assert_eq!(result, UpdateResult { matched: 1, modified: 0 });
    }

    #[actix_web::test]
    async fn update_one_does_not_upsert() {
        let store = Store::open_in_memory().unwrap();
        let data = store.collection(FUNDRAISING_DATA);

        let result = data.update_one(object(json!({ "a": 1 }))).await.unwrap();
        assert_eq!(result.matched, 0);
        assert_eq!(data.count().await.unwrap(), 0);
    }

    #[test]
    fn url_location_is_refused_without_creating_directories() {
        let url = "mongodb://localhost:27017";
        assert!(matches!(
            Store::open(url, "test"),
            Err(ApiError::Configuration(_))
        ));
        assert!(!Path::new("mongodb:").exists());
    }

    #[actix_web::test]
    async fn file_store_persists_across_reopen() {
        let dir = std::env::temp_dir().join(format!("fundraiser-store-{}", uuid::Uuid::new_v4()));
        let url = dir.display().to_string();

        let store = Store::open(&url, "test").unwrap();
        store
            .collection(STATUS_CHECKS)
            .insert_one(object(json!({ "client_name": "a" })))
            .await
            .unwrap();
        store.close();

        let store = Store::open(&url, "test").unwrap();
        assert_eq!(store.collection(STATUS_CHECKS).count().await.unwrap(), 1);
        store.close();
        let _ = std::fs::remove_dir_all(dir);
    }
}
