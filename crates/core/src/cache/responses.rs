//! Response cache operations.
//!
//! Stores one row per `(source, query)` pair, upserting on conflict. The
//! query string is the fully-assembled request, so two requests differing
//! in any parameter cache as distinct entries. Reads filter on the TTL;
//! a row that fails to decode degrades to a miss rather than an error,
//! since the caller can always re-fetch from the network.

use super::connection::StoreDb;
use super::payload::CachedPayload;
use crate::Error;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;

/// Default time-to-live for cached responses: 3 days.
pub const DEFAULT_TTL_SECONDS: i64 = 3 * 24 * 60 * 60;

/// Cached response row metadata, without the payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedResponseMeta {
    pub source: String,
    pub query: String,
    pub result_type: String,
    pub fetched_at: String,
    pub expires_at: String,
}

impl StoreDb {
    /// Insert or update a cached response.
    ///
    /// The payload is serialized before anything touches the database, so a
    /// serialization failure writes nothing.
    pub async fn put_response(
        &self, source: &str, query: &str, payload: &CachedPayload, ttl_seconds: i64,
    ) -> Result<(), Error> {
        let bytes = payload.encode().inspect_err(|e| {
            tracing::error!(source, query, error = %e, "failed to serialize cache payload");
        })?;
        let result_type = payload.tag().to_string();

        let source = source.to_string();
        let query = query.to_string();
        let fetched_at = Utc::now().to_rfc3339();
        let expires_at = (Utc::now() + Duration::seconds(ttl_seconds)).to_rfc3339();

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO response_cache (source, query, result_type, payload, fetched_at, expires_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    ON CONFLICT(source, query) DO UPDATE SET
                        result_type = excluded.result_type,
                        payload = excluded.payload,
                        fetched_at = excluded.fetched_at,
                        expires_at = excluded.expires_at",
                    params![source, query, result_type, bytes, fetched_at, expires_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Look up a recent response for this exact query on this source.
    ///
    /// Returns `None` when no entry exists, when the entry has expired, or
    /// when the stored payload no longer decodes (logged, treated as a miss).
    pub async fn get_response(&self, source: &str, query: &str) -> Result<Option<CachedPayload>, Error> {
        let source_owned = source.to_string();
        let query_owned = query.to_string();
        let now = Utc::now().to_rfc3339();

        let row: Option<(String, Vec<u8>)> = self
            .conn
            .call(move |conn| -> Result<Option<(String, Vec<u8>)>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT result_type, payload FROM response_cache
                    WHERE source = ?1 AND query = ?2 AND expires_at > ?3",
                )?;

                let result = stmt.query_row(params![source_owned, query_owned, now], |row| {
                    Ok((row.get(0)?, row.get(1)?))
                });

                match result {
                    Ok(row) => Ok(Some(row)),
                    Err(tokio_rusqlite::rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)?;

        let Some((result_type, bytes)) = row else {
            return Ok(None);
        };

        match CachedPayload::decode(&result_type, &bytes) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) => {
                tracing::warn!(source, query, error = %e, "cached payload failed to decode; treating as miss");
                Ok(None)
            }
        }
    }

    /// Delete expired response rows.
    ///
    /// Returns the number of deleted entries.
    pub async fn purge_expired_responses(&self) -> Result<u64, Error> {
        let now = Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM response_cache WHERE expires_at < ?1", params![now])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Retrieve metadata for the most recently fetched responses.
    pub async fn recent_responses(&self, limit: u32) -> Result<Vec<CachedResponseMeta>, Error> {
        self.conn
            .call(move |conn| -> Result<Vec<CachedResponseMeta>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT source, query, result_type, fetched_at, expires_at
                    FROM response_cache ORDER BY fetched_at DESC LIMIT ?1",
                )?;

                let rows = stmt.query_map(params![limit], |row| {
                    Ok(CachedResponseMeta {
                        source: row.get(0)?,
                        query: row.get(1)?,
                        result_type: row.get(2)?,
                        fetched_at: row.get(3)?,
                        expires_at: row.get(4)?,
                    })
                })?;

                let mut out = Vec::new();
                for row in rows {
                    out.push(row?);
                }
                Ok(out)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::RawNode;

    const SOURCE: &str = "PUBLICDATA";

    #[tokio::test]
    async fn test_put_and_get_text_response() {
        let db = StoreDb::open_in_memory().await.unwrap();
        let query = "http://search.example/pdsearch.php?o=grp_dmv_tx&p1=smith";
        let payload = CachedPayload::Text("<pd type=\"search\"/>".to_string());

        db.put_response(SOURCE, query, &payload, 3600).await.unwrap();

        let hit = db.get_response(SOURCE, query).await.unwrap();
        assert_eq!(hit, Some(payload));
    }

    #[tokio::test]
    async fn test_get_missing_response() {
        let db = StoreDb::open_in_memory().await.unwrap();
        let hit = db.get_response(SOURCE, "never-cached").await.unwrap();
        assert!(hit.is_none());
    }

    #[tokio::test]
    async fn test_each_tag_round_trips() {
        let db = StoreDb::open_in_memory().await.unwrap();

        let mut tree = RawNode::new("record");
        tree.attrs.insert("rec".to_string(), "0123".to_string());

        let payloads = [
            CachedPayload::Tree(tree),
            CachedPayload::Json(serde_json::json!({"owner": "SMITH"})),
            CachedPayload::Text("plain".to_string()),
            CachedPayload::Bytes(vec![1, 2, 3]),
        ];

        for (i, payload) in payloads.iter().enumerate() {
            let query = format!("query-{i}");
            db.put_response(SOURCE, &query, payload, 3600).await.unwrap();
            let hit = db.get_response(SOURCE, &query).await.unwrap();
            assert_eq!(hit.as_ref(), Some(payload));
        }
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss() {
        let db = StoreDb::open_in_memory().await.unwrap();
        let payload = CachedPayload::Text("stale".to_string());

        db.put_response(SOURCE, "expiring", &payload, -1).await.unwrap();

        let hit = db.get_response(SOURCE, "expiring").await.unwrap();
        assert!(hit.is_none());
    }

    #[tokio::test]
    async fn test_upsert_replaces_entry() {
        let db = StoreDb::open_in_memory().await.unwrap();
        let query = "same-query";

        db.put_response(SOURCE, query, &CachedPayload::Text("old".to_string()), 3600)
            .await
            .unwrap();
        db.put_response(SOURCE, query, &CachedPayload::Text("new".to_string()), 3600)
            .await
            .unwrap();

        let hit = db.get_response(SOURCE, query).await.unwrap();
        assert_eq!(hit, Some(CachedPayload::Text("new".to_string())));

        let metas = db.recent_responses(10).await.unwrap();
        assert_eq!(metas.len(), 1);
    }

    #[tokio::test]
    async fn test_sources_do_not_collide() {
        let db = StoreDb::open_in_memory().await.unwrap();
        let query = "shared-query";

        db.put_response("PUBLICDATA", query, &CachedPayload::Text("a".to_string()), 3600)
            .await
            .unwrap();
        db.put_response("ZILLOW", query, &CachedPayload::Text("b".to_string()), 3600)
            .await
            .unwrap();

        let hit = db.get_response("ZILLOW", query).await.unwrap();
        assert_eq!(hit, Some(CachedPayload::Text("b".to_string())));
    }

    #[tokio::test]
    async fn test_purge_expired_responses() {
        let db = StoreDb::open_in_memory().await.unwrap();

        db.put_response(SOURCE, "stale", &CachedPayload::Text("x".to_string()), -1)
            .await
            .unwrap();
        db.put_response(SOURCE, "fresh", &CachedPayload::Text("y".to_string()), 3600)
            .await
            .unwrap();

        let deleted = db.purge_expired_responses().await.unwrap();
        assert_eq!(deleted, 1);
        assert!(db.get_response(SOURCE, "fresh").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_corrupt_payload_degrades_to_miss() {
        let db = StoreDb::open_in_memory().await.unwrap();

        db.conn
            .call(|conn| {
                conn.execute(
                    "INSERT INTO response_cache (source, query, result_type, payload, fetched_at, expires_at)
                    VALUES ('PUBLICDATA', 'corrupt', 'TREE', X'00FF', '2026-01-01T00:00:00Z', '2999-01-01T00:00:00Z')",
                    [],
                )
            })
            .await
            .unwrap();

        let hit = db.get_response(SOURCE, "corrupt").await.unwrap();
        assert!(hit.is_none());
    }
}
