//! Case item sets.
//!
//! A case curates which search results matter to a legal matter: per
//! category (optionally qualified by a sub-category, e.g.
//! `"PROPERTY:VEHICLE"`), an included set and an excluded set of record
//! keys. The excluded set is stored under the category name prefixed with
//! `X`. Moving a key between the sets happens in one transaction, so the
//! two sets stay disjoint no matter the operation sequence; annotation
//! only ever reads.

use crate::Error;
use crate::cache::StoreDb;
use chrono::Utc;
use std::collections::HashSet;
use tokio_rusqlite::params;

/// Prefix distinguishing a category's excluded set from its included set.
const EXCLUDED_PREFIX: &str = "X";

/// The included and excluded key sets of one case category.
#[derive(Debug, Clone, Default)]
pub struct CaseItemSets {
    pub included: HashSet<String>,
    pub excluded: HashSet<String>,
}

impl CaseItemSets {
    /// Whether neither set holds any keys.
    pub fn is_empty(&self) -> bool {
        self.included.is_empty() && self.excluded.is_empty()
    }
}

impl StoreDb {
    /// Add a record key to a case category's included set.
    ///
    /// Removes the key from the excluded set in the same transaction.
    pub async fn include_item(&self, case_id: &str, category: &str, key: &str) -> Result<(), Error> {
        self.move_item(case_id, category.to_string(), excluded_category(category), key)
            .await
    }

    /// Add a record key to a case category's excluded set.
    ///
    /// Removes the key from the included set in the same transaction.
    pub async fn exclude_item(&self, case_id: &str, category: &str, key: &str) -> Result<(), Error> {
        self.move_item(case_id, excluded_category(category), category.to_string(), key)
            .await
    }

    /// Remove a record key from both sets of a case category.
    pub async fn remove_item(&self, case_id: &str, category: &str, key: &str) -> Result<(), Error> {
        let case_id = case_id.to_string();
        let category = category.to_string();
        let mirror = excluded_category(&category);
        let key = key.to_string();

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "DELETE FROM case_items
                    WHERE case_id = ?1 AND category IN (?2, ?3) AND item_key = ?4",
                    params![case_id, category, mirror, key],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Read the included and excluded key sets for one case category.
    pub async fn item_sets(&self, case_id: &str, category: &str) -> Result<CaseItemSets, Error> {
        let case_id = case_id.to_string();
        let included_cat = category.to_string();
        let excluded_cat = excluded_category(category);

        self.conn
            .call(move |conn| -> Result<CaseItemSets, Error> {
                let mut stmt = conn.prepare(
                    "SELECT category, item_key FROM case_items
                    WHERE case_id = ?1 AND category IN (?2, ?3)",
                )?;

                let rows = stmt.query_map(params![case_id, included_cat, excluded_cat], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })?;

                let mut sets = CaseItemSets::default();
                for row in rows {
                    let (category, key) = row?;
                    if category == excluded_cat {
                        sets.excluded.insert(key);
                    } else {
                        sets.included.insert(key);
                    }
                }
                Ok(sets)
            })
            .await
            .map_err(Error::from)
    }

    /// Upsert `key` into `target` and delete it from `mirror`, atomically.
    async fn move_item(&self, case_id: &str, target: String, mirror: String, key: &str) -> Result<(), Error> {
        let case_id = case_id.to_string();
        let key = key.to_string();
        let added_at = Utc::now().to_rfc3339();

        self.conn
            .call(move |conn| -> Result<(), Error> {
                let tx = conn.transaction()?;
                tx.execute(
                    "DELETE FROM case_items WHERE case_id = ?1 AND category = ?2 AND item_key = ?3",
                    params![case_id, mirror, key],
                )?;
                tx.execute(
                    "INSERT INTO case_items (case_id, category, item_key, added_at)
                    VALUES (?1, ?2, ?3, ?4)
                    ON CONFLICT(case_id, category, item_key) DO UPDATE SET
                        added_at = excluded.added_at",
                    params![case_id, target, key, added_at],
                )?;
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }
}

fn excluded_category(category: &str) -> String {
    format!("{EXCLUDED_PREFIX}{category}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const CASE: &str = "5d6b2f9c1c9d440000a1b2c3";
    const CATEGORY: &str = "PROPERTY:VEHICLE";
    const KEY: &str = "PUBLICDATA:grp_dmv_tx.20190401.0123456";

    #[tokio::test]
    async fn test_include_then_read() {
        let db = StoreDb::open_in_memory().await.unwrap();
        db.include_item(CASE, CATEGORY, KEY).await.unwrap();

        let sets = db.item_sets(CASE, CATEGORY).await.unwrap();
        assert!(sets.included.contains(KEY));
        assert!(sets.excluded.is_empty());
    }

    #[tokio::test]
    async fn test_move_between_sets_is_exclusive() {
        let db = StoreDb::open_in_memory().await.unwrap();

        db.include_item(CASE, CATEGORY, KEY).await.unwrap();
        db.exclude_item(CASE, CATEGORY, KEY).await.unwrap();
        db.include_item(CASE, CATEGORY, KEY).await.unwrap();
        db.exclude_item(CASE, CATEGORY, KEY).await.unwrap();

        let sets = db.item_sets(CASE, CATEGORY).await.unwrap();
        assert!(!sets.included.contains(KEY));
        assert!(sets.excluded.contains(KEY));
        assert_eq!(sets.included.intersection(&sets.excluded).count(), 0);
    }

    #[tokio::test]
    async fn test_repeat_include_is_idempotent() {
        let db = StoreDb::open_in_memory().await.unwrap();

        db.include_item(CASE, CATEGORY, KEY).await.unwrap();
        db.include_item(CASE, CATEGORY, KEY).await.unwrap();

        let sets = db.item_sets(CASE, CATEGORY).await.unwrap();
        assert_eq!(sets.included.len(), 1);
    }

    #[tokio::test]
    async fn test_remove_clears_both_sets() {
        let db = StoreDb::open_in_memory().await.unwrap();

        db.include_item(CASE, CATEGORY, "key-a").await.unwrap();
        db.exclude_item(CASE, CATEGORY, "key-b").await.unwrap();
        db.remove_item(CASE, CATEGORY, "key-a").await.unwrap();
        db.remove_item(CASE, CATEGORY, "key-b").await.unwrap();

        let sets = db.item_sets(CASE, CATEGORY).await.unwrap();
        assert!(sets.is_empty());
    }

    #[tokio::test]
    async fn test_categories_are_independent() {
        let db = StoreDb::open_in_memory().await.unwrap();

        db.include_item(CASE, "PROPERTY:VEHICLE", KEY).await.unwrap();
        db.exclude_item(CASE, "PROPERTY:REAL", KEY).await.unwrap();

        let vehicles = db.item_sets(CASE, "PROPERTY:VEHICLE").await.unwrap();
        let real = db.item_sets(CASE, "PROPERTY:REAL").await.unwrap();
        assert!(vehicles.included.contains(KEY));
        assert!(real.excluded.contains(KEY));
    }

    #[tokio::test]
    async fn test_cases_are_independent() {
        let db = StoreDb::open_in_memory().await.unwrap();

        db.include_item("case-one", CATEGORY, KEY).await.unwrap();

        let other = db.item_sets("case-two", CATEGORY).await.unwrap();
        assert!(other.is_empty());
    }
}
