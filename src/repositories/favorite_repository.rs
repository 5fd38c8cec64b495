// src/repositories/favorite_repository.rs

use std::sync::Arc;

use rusqlite::{params, Row};
use tokio::sync::watch;

use crate::db::ConnectionPool;
use crate::domain::FavoriteRecord;
use crate::error::AppResult;

/// Persisted favorites set.
///
/// The two query operations back long-lived subscriptions: `subscribe()`
/// yields a receiver that is notified after every write that changed rows,
/// and subscribers re-run the query they care about on each notification.
pub trait FavoriteRepository: Send + Sync {
    /// All favorites, most recently saved first.
    fn query_all(&self) -> AppResult<Vec<FavoriteRecord>>;

    /// The external ids of all favorites.
    fn query_all_ids(&self) -> AppResult<Vec<i64>>;

    /// Insert a favorite; silent no-op if the external id is already present.
    fn insert_ignore(&self, record: &FavoriteRecord) -> AppResult<()>;

    /// Delete by external id; no-op if absent.
    fn delete_by_external_id(&self, external_id: i64) -> AppResult<()>;

    /// Change notification. The carried value is a version counter; only its
    /// movement matters.
    fn subscribe(&self) -> watch::Receiver<u64>;
}

pub struct SqliteFavoriteRepository {
    pool: Arc<ConnectionPool>,
    changes: watch::Sender<u64>,
}

impl SqliteFavoriteRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        let (changes, _) = watch::channel(0);
        Self { pool, changes }
    }

    fn row_to_record(row: &Row) -> Result<FavoriteRecord, rusqlite::Error> {
        Ok(FavoriteRecord {
            local_id: row.get("id")?,
            external_id: row.get("external_id")?,
            poster_path: row.get("poster_path")?,
            release_date: row.get("release_date")?,
            average_rating: row.get("average_rating")?,
            saved_at: row.get("saved_at")?,
        })
    }

    fn bump_version(&self) {
        self.changes.send_modify(|v| *v += 1);
    }
}

impl FavoriteRepository for SqliteFavoriteRepository {
    fn query_all(&self) -> AppResult<Vec<FavoriteRecord>> {
        let conn = self.pool.get()?;

        let mut stmt =
            conn.prepare("SELECT * FROM favorite_movies ORDER BY saved_at DESC, id DESC")?;

        let records: Vec<FavoriteRecord> = stmt
            .query_map([], Self::row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn query_all_ids(&self) -> AppResult<Vec<i64>> {
        let conn = self.pool.get()?;

        let mut stmt =
            conn.prepare("SELECT external_id FROM favorite_movies WHERE external_id IS NOT NULL")?;

        let ids: Vec<i64> = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ids)
    }

    fn insert_ignore(&self, record: &FavoriteRecord) -> AppResult<()> {
        let conn = self.pool.get()?;

        let changed = conn.execute(
            "INSERT OR IGNORE INTO favorite_movies
                (external_id, poster_path, release_date, average_rating, saved_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.external_id,
                record.poster_path,
                record.release_date,
                record.average_rating,
                record.saved_at,
            ],
        )?;

        if changed > 0 {
            self.bump_version();
        }

        Ok(())
    }

    fn delete_by_external_id(&self, external_id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;

        let changed = conn.execute(
            "DELETE FROM favorite_movies WHERE external_id = ?1",
            params![external_id],
        )?;

        if changed > 0 {
            self.bump_version();
        }

        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_in_memory_pool, get_connection, initialize_database};

    fn test_repo() -> SqliteFavoriteRepository {
        let pool = create_in_memory_pool().unwrap();
        {
            let conn = get_connection(&pool).unwrap();
            initialize_database(&conn).unwrap();
        }
        SqliteFavoriteRepository::new(Arc::new(pool))
    }

    fn record(external_id: i64, saved_at: i64) -> FavoriteRecord {
        FavoriteRecord {
            local_id: 0,
            external_id: Some(external_id),
            poster_path: Some(format!("/poster-{}.jpg", external_id)),
            release_date: Some("2020-05-01".to_string()),
            average_rating: Some(7.2),
            saved_at,
        }
    }

    #[test]
    fn test_insert_and_query_round_trip() {
        let repo = test_repo();
        repo.insert_ignore(&record(1, 100)).unwrap();

        let all = repo.query_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].external_id, Some(1));
        assert_eq!(all[0].poster_path.as_deref(), Some("/poster-1.jpg"));
        assert_eq!(all[0].saved_at, 100);
        assert!(all[0].local_id > 0);
    }

    #[test]
    fn test_duplicate_insert_is_a_silent_no_op() {
        let repo = test_repo();
        repo.insert_ignore(&record(1, 100)).unwrap();
        repo.insert_ignore(&record(1, 200)).unwrap();

        let all = repo.query_all().unwrap();
        assert_eq!(all.len(), 1);
        // First write wins; the ignored insert changed nothing
        assert_eq!(all[0].saved_at, 100);
    }

    #[test]
    fn test_query_all_orders_by_save_time_descending() {
        let repo = test_repo();
        repo.insert_ignore(&record(1, 100)).unwrap();
        repo.insert_ignore(&record(2, 300)).unwrap();
        repo.insert_ignore(&record(3, 200)).unwrap();

        let ids: Vec<_> = repo
            .query_all()
            .unwrap()
            .into_iter()
            .map(|r| r.external_id)
            .collect();
        assert_eq!(ids, vec![Some(2), Some(3), Some(1)]);
    }

    #[test]
    fn test_delete_missing_id_leaves_set_unchanged() {
        let repo = test_repo();
        repo.insert_ignore(&record(1, 100)).unwrap();

        repo.delete_by_external_id(999).unwrap();

        assert_eq!(repo.query_all_ids().unwrap(), vec![1]);
    }

    #[test]
    fn test_delete_removes_by_external_id() {
        let repo = test_repo();
        repo.insert_ignore(&record(1, 100)).unwrap();
        repo.insert_ignore(&record(2, 200)).unwrap();

        repo.delete_by_external_id(1).unwrap();

        assert_eq!(repo.query_all_ids().unwrap(), vec![2]);
    }

    #[test]
    fn test_subscribers_are_notified_on_change_only() {
        let repo = test_repo();
        let rx = repo.subscribe();
        assert!(!rx.has_changed().unwrap());

        repo.insert_ignore(&record(1, 100)).unwrap();
        assert!(rx.has_changed().unwrap());

        let rx = repo.subscribe();

        // Duplicate insert and missing delete change no rows: no notification
        repo.insert_ignore(&record(1, 500)).unwrap();
        repo.delete_by_external_id(999).unwrap();
        assert!(!rx.has_changed().unwrap());
    }
}
