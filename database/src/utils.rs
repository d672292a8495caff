use crate::prelude::DB;
use std::{sync::Weak, thread::sleep, time::Duration};
use tempfile::TempDir;

/// Keeps a temporary database directory alive and destroys the database once
/// all strong references to it were dropped
pub struct DbLifetime {
    weak_db_ref: Weak<DB>,
    tempdir: Option<TempDir>,
}

impl DbLifetime {
    pub fn new(tempdir: TempDir, weak_db_ref: Weak<DB>) -> Self {
        Self { tempdir: Some(tempdir), weak_db_ref }
    }
}

impl Drop for DbLifetime {
    fn drop(&mut self) {
        for _ in 0..16 {
            if self.weak_db_ref.strong_count() > 0 {
                // Sometimes another thread is shutting down and cleaning resources
                sleep(Duration::from_millis(500));
            } else {
                break;
            }
        }
        assert_eq!(self.weak_db_ref.strong_count(), 0, "DB is expected to have no strong references when lifetime is dropped");
        if let Some(dir) = self.tempdir.take() {
            let options = rocksdb::Options::default();
            DB::destroy(&options, dir.path()).expect("DB is expected to be deletable since there are no references to it");
        }
    }
}

pub fn get_czz_tempdir() -> TempDir {
    let global_tempdir = std::env::temp_dir();
    let czz_tempdir = global_tempdir.join("rusty-czz");
    std::fs::create_dir_all(czz_tempdir.as_path()).expect("the system temp dir is writable");
    tempfile::tempdir_in(czz_tempdir.as_path()).expect("the system temp dir is writable")
}

/// Creates a DB within a temp directory under `<OS SPECIFIC TEMP DIR>/rusty-czz`.
/// Callers must keep the `DbLifetime` guard for as long as they wish the DB to exist.
#[macro_export]
macro_rules! create_temp_db {
    ($conn_builder: expr) => {{
        let db_tempdir = $crate::utils::get_czz_tempdir();
        let db_path = db_tempdir.path().to_owned();
        $conn_builder
            .with_db_path(db_path)
            .build()
            .map(|db| ($crate::utils::DbLifetime::new(db_tempdir, std::sync::Arc::downgrade(&db)), db))
    }};
}
