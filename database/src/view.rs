use crate::{db::DB, errors::StoreResult};
use rocksdb::SnapshotWithThreadMode;

/// A read-only, point-in-time view of the database.
///
/// All reads through one view observe the same committed state, regardless of
/// writes landing concurrently.
pub struct DbView<'a> {
    snapshot: SnapshotWithThreadMode<'a, DB>,
}

impl<'a> DbView<'a> {
    pub fn new(db: &'a DB) -> Self {
        Self { snapshot: db.snapshot() }
    }

    pub fn has(&self, key: impl AsRef<[u8]>) -> StoreResult<bool> {
        Ok(self.snapshot.get(key)?.is_some())
    }

    pub fn get(&self, key: impl AsRef<[u8]>) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.snapshot.get(key)?)
    }
}

/// Runs `f` over a fresh read-only view which is released once `f` returns
pub fn view<T>(db: &DB, f: impl FnOnce(&DbView<'_>) -> StoreResult<T>) -> StoreResult<T> {
    let view = DbView::new(db);
    f(&view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_temp_db, prelude::ConnBuilder};

    #[test]
    fn test_view_is_isolated_from_later_writes() {
        let (_lifetime, db) = create_temp_db!(ConnBuilder::default().with_files_limit(10)).unwrap();
        db.put(b"a", b"1").unwrap();

        let snapshot = DbView::new(&db);
        db.put(b"b", b"2").unwrap();
        db.delete(b"a").unwrap();

        assert!(snapshot.has(b"a").unwrap());
        assert!(!snapshot.has(b"b").unwrap());
        assert_eq!(snapshot.get(b"a").unwrap(), Some(b"1".to_vec()));
        drop(snapshot);

        let (has_a, has_b) = view(&db, |v| Ok((v.has(b"a")?, v.has(b"b")?))).unwrap();
        assert!(!has_a);
        assert!(has_b);
    }
}
