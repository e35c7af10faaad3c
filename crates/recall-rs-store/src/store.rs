//! Recall store keyed by the current directory.

use crate::codec;
use crate::error::RecallError;
use crate::path;
use crate::record::Recall;
use chrono::Utc;
use log::{debug, info, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Directory under the home directory holding recall state.
pub const STORE_DIR: &str = ".recall";
/// Backing file name inside [`STORE_DIR`].
pub const STORE_FILENAME: &str = "recalls.jsonl";

/// Every known recall plus the one belonging to the invocation directory.
///
/// A store is loaded once per invocation, mutated in memory, and written back
/// in full by [`RecallStore::persist`]. Nothing arbitrates between concurrent
/// invocations: the last one to persist wins.
#[derive(Debug)]
pub struct RecallStore {
    path: PathBuf,
    cwd: String,
    recalls: Vec<Recall>,
    current: Option<usize>,
}

impl RecallStore {
    /// Default backing file, `~/.recall/recalls.jsonl`.
    pub fn default_path() -> Result<PathBuf, RecallError> {
        let home = path::home_dir().ok_or_else(|| {
            RecallError::Resolution("failed to determine home directory".to_string())
        })?;
        Ok(home.join(STORE_DIR).join(STORE_FILENAME))
    }

    /// Load the store for the process working directory.
    pub fn load_current(file: impl Into<PathBuf>) -> Result<Self, RecallError> {
        let cwd = path::current_dir()?;
        Self::load(file, &cwd)
    }

    /// Load the backing file and select the recall for `cwd`.
    pub fn load(file: impl Into<PathBuf>, cwd: &Path) -> Result<Self, RecallError> {
        let file = file.into();
        let cwd = path::record_dir(&path::resolve(cwd)?)?;
        let recalls = codec::read_file(&file)?;
        let store = Self::from_recalls(file, cwd, recalls);
        debug!(
            "loaded recall store (path={}, records={}, cwd_has_recall={})",
            store.path.display(),
            store.recalls.len(),
            store.current.is_some()
        );
        Ok(store)
    }

    /// Build a store from decoded records, keeping the first record per directory.
    fn from_recalls(path: PathBuf, cwd: String, recalls: Vec<Recall>) -> Self {
        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(recalls.len());
        for recall in recalls {
            if seen.contains(&recall.dir) {
                warn!("ignoring duplicate recall (dir={})", recall.dir);
                continue;
            }
            seen.insert(recall.dir.clone());
            unique.push(recall);
        }
        let current = unique.iter().position(|recall| recall.dir == cwd);
        Self {
            path,
            cwd,
            recalls: unique,
            current,
        }
    }

    /// Backing file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record key of the invocation directory.
    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    /// All recalls, in file order.
    pub fn recalls(&self) -> &[Recall] {
        &self.recalls
    }

    /// Recall for the current directory, if one is set.
    pub fn current_recall(&self) -> Option<&Recall> {
        self.current.map(|idx| &self.recalls[idx])
    }

    /// Message for the current directory. `None` when no recall is set.
    pub fn current_message(&self) -> Option<&str> {
        self.current_recall().map(|recall| recall.msg.as_str())
    }

    pub fn has_current_recall(&self) -> bool {
        self.current.is_some()
    }

    /// Set the current directory's message, refreshing its timestamp.
    pub fn set_current_message(&mut self, msg: &str) {
        let msg = msg.trim();
        match self.current {
            Some(idx) => {
                let recall = &mut self.recalls[idx];
                recall.msg = msg.to_string();
                recall.time = Utc::now();
                debug!("overwrote recall (dir={})", self.cwd);
            }
            None => {
                self.recalls.push(Recall::new(self.cwd.clone(), msg));
                self.current = Some(self.recalls.len() - 1);
                debug!("added recall (dir={})", self.cwd);
            }
        }
    }

    /// Remove the current directory's recall, returning it if there was one.
    pub fn delete_current(&mut self) -> Option<Recall> {
        let idx = self.current.take()?;
        let removed = self.recalls.swap_remove(idx);
        debug!("removed recall (dir={})", removed.dir);
        Some(removed)
    }

    /// Write every recall back to the backing file.
    pub fn persist(&self) -> Result<(), RecallError> {
        codec::write_file(&self.path, &self.recalls)?;
        info!(
            "persisted recall store (path={}, records={})",
            self.path.display(),
            self.recalls.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::RecallStore;
    use crate::codec;
    use crate::record::Recall;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use std::path::{Path, PathBuf};
    use tempfile::{TempDir, tempdir};

    struct Fixture {
        _temp: TempDir,
        file: PathBuf,
        root: PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = tempdir().expect("tempdir");
            let root = temp.path().to_path_buf();
            let file = root.join("state").join("recalls.jsonl");
            Self {
                _temp: temp,
                file,
                root,
            }
        }

        fn dir(&self, name: &str) -> PathBuf {
            let dir = self.root.join(name);
            std::fs::create_dir_all(&dir).expect("create dir");
            dir
        }

        fn load(&self, cwd: &Path) -> RecallStore {
            RecallStore::load(&self.file, cwd).expect("load")
        }
    }

    fn key(dir: &Path) -> String {
        dir.to_str().expect("utf8").to_string()
    }

    #[test]
    fn missing_backing_file_loads_empty() {
        let fixture = Fixture::new();
        let store = fixture.load(&fixture.dir("proj"));
        assert_eq!(store.recalls().len(), 0);
        assert_eq!(store.has_current_recall(), false);
        assert_eq!(store.current_message(), None);
    }

    #[test]
    fn set_trims_and_tracks_the_new_recall() {
        let fixture = Fixture::new();
        let mut store = fixture.load(&fixture.dir("proj"));
        store.set_current_message("  finish the migration \n");
        assert_eq!(store.current_message(), Some("finish the migration"));
        assert_eq!(store.has_current_recall(), true);

        store.set_current_message("second thought");
        assert_eq!(store.recalls().len(), 1);
        assert_eq!(store.current_message(), Some("second thought"));
    }

    #[test]
    fn empty_message_is_distinct_from_absence() {
        let fixture = Fixture::new();
        let mut store = fixture.load(&fixture.dir("proj"));
        store.set_current_message("   ");
        assert_eq!(store.current_message(), Some(""));
    }

    #[test]
    fn sets_across_directories_keep_one_recall_each() {
        let fixture = Fixture::new();
        let d1 = fixture.dir("d1");
        let d2 = fixture.dir("d2");

        for (dir, msg) in [(&d1, "a1"), (&d2, "b1"), (&d1, "a2"), (&d2, "b2")] {
            let before = Utc::now();
            let mut store = fixture.load(dir);
            store.set_current_message(msg);
            assert!(store.current_recall().expect("current").time >= before);
            store.persist().expect("persist");
        }

        let store = fixture.load(&d1);
        let mut recalls: Vec<(String, String)> = store
            .recalls()
            .iter()
            .map(|recall| (recall.dir.clone(), recall.msg.clone()))
            .collect();
        recalls.sort();
        assert_eq!(
            recalls,
            vec![
                (key(&d1), "a2".to_string()),
                (key(&d2), "b2".to_string()),
            ]
        );
    }

    #[test]
    fn trailing_slash_record_is_the_current_recall() {
        let fixture = Fixture::new();
        let dir = fixture.dir("proj");
        let seeded = Recall {
            time: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            dir: format!("{}/", key(&dir)),
            msg: "old".to_string(),
        };
        codec::write_file(&fixture.file, &[seeded]).expect("seed");

        let mut store = fixture.load(&dir);
        assert_eq!(store.current_message(), Some("old"));
        store.set_current_message("new");
        store.persist().expect("persist");

        let recalls = codec::read_file(&fixture.file).expect("read");
        assert_eq!(recalls.len(), 1);
        assert_eq!(recalls[0].dir, key(&dir));
        assert_eq!(recalls[0].msg, "new");
    }

    #[test]
    fn overwrite_refreshes_timestamp() {
        let fixture = Fixture::new();
        let dir = fixture.dir("proj");
        let old = Recall {
            time: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            dir: key(&dir),
            msg: "old".to_string(),
        };
        codec::write_file(&fixture.file, &[old.clone()]).expect("seed");

        let mut store = fixture.load(&dir);
        store.set_current_message("new");
        let current = store.current_recall().expect("current");
        assert!(current.time > old.time);
        assert_eq!(current.msg, "new");
    }

    #[test]
    fn set_delete_persist_leaves_no_record() {
        let fixture = Fixture::new();
        let dir = fixture.dir("proj");
        let other = fixture.dir("other");
        codec::write_file(&fixture.file, &[Recall::new(key(&other), "keep me")]).expect("seed");

        let mut store = fixture.load(&dir);
        store.set_current_message("temporary");
        let removed = store.delete_current().expect("removed");
        assert_eq!(removed.msg, "temporary");
        assert_eq!(store.has_current_recall(), false);
        assert_eq!(store.delete_current(), None);
        store.persist().expect("persist");

        let recalls = codec::read_file(&fixture.file).expect("read");
        assert_eq!(recalls.len(), 1);
        assert_eq!(recalls[0].dir, key(&other));
    }

    #[test]
    fn delete_keeps_other_recalls_reachable() {
        let fixture = Fixture::new();
        let dirs: Vec<PathBuf> = ["a", "b", "c"].iter().map(|name| fixture.dir(name)).collect();
        let seeded: Vec<Recall> = dirs
            .iter()
            .map(|dir| Recall::new(key(dir), format!("note for {}", key(dir))))
            .collect();
        codec::write_file(&fixture.file, &seeded).expect("seed");

        let mut store = fixture.load(&dirs[0]);
        store.delete_current().expect("removed");
        store.persist().expect("persist");

        let store = fixture.load(&dirs[2]);
        assert_eq!(
            store.current_message(),
            Some(format!("note for {}", key(&dirs[2])).as_str())
        );
        assert_eq!(store.recalls().len(), 2);
    }

    #[test]
    fn first_duplicate_wins_and_later_ones_are_not_persisted() {
        let fixture = Fixture::new();
        let dir = fixture.dir("proj");
        codec::write_file(
            &fixture.file,
            &[Recall::new(key(&dir), "first"), Recall::new(key(&dir), "second")],
        )
        .expect("seed");

        let store = fixture.load(&dir);
        assert_eq!(store.current_message(), Some("first"));
        assert_eq!(store.recalls().len(), 1);
        store.persist().expect("persist");

        let recalls = codec::read_file(&fixture.file).expect("read");
        assert_eq!(recalls.len(), 1);
        assert_eq!(recalls[0].msg, "first");
    }

    #[test]
    fn stale_recalls_are_collected_on_persist() {
        let fixture = Fixture::new();
        let dir = fixture.dir("proj");
        let doomed = fixture.dir("doomed");
        codec::write_file(
            &fixture.file,
            &[Recall::new(key(&doomed), "gone soon"), Recall::new(key(&dir), "stays")],
        )
        .expect("seed");
        std::fs::remove_dir(&doomed).expect("remove");

        let store = fixture.load(&dir);
        assert_eq!(store.recalls().len(), 1);
        store.persist().expect("persist");

        let raw = std::fs::read_to_string(&fixture.file).expect("raw");
        assert!(!raw.contains("gone soon"));
    }

    #[test]
    fn message_survives_reload_unchanged() {
        let fixture = Fixture::new();
        let dir = fixture.dir("proj");
        let mut store = fixture.load(&dir);
        store.set_current_message("fix f:/tmp/bug.txt later");
        store.persist().expect("persist");

        let reloaded = fixture.load(&dir);
        assert_eq!(reloaded.current_message(), Some("fix f:/tmp/bug.txt later"));
    }

    #[test]
    fn cwd_is_normalized_before_lookup() {
        let fixture = Fixture::new();
        let dir = fixture.dir("proj");
        let mut store = fixture.load(&dir);
        store.set_current_message("hello");
        store.persist().expect("persist");

        let dotted = dir.join("..").join("proj").join(".");
        let reloaded = fixture.load(&dotted);
        assert_eq!(reloaded.cwd(), key(&dir));
        assert_eq!(reloaded.current_message(), Some("hello"));
    }

    #[test]
    fn malformed_file_fails_load() {
        let fixture = Fixture::new();
        std::fs::create_dir_all(fixture.file.parent().expect("parent")).expect("dir");
        std::fs::write(&fixture.file, "{\"time\":\"2024-01-01T00:00:00Z\",\"dir\":\"/\"}\n")
            .expect("write");
        let err = RecallStore::load(&fixture.file, &fixture.dir("proj")).unwrap_err();
        assert!(matches!(
            err,
            crate::RecallError::MalformedRecord { line: 1, .. }
        ));
    }

    #[test]
    fn unreadable_directory_fails_load_instead_of_collecting() {
        let fixture = Fixture::new();
        let dir = fixture.dir("proj");
        let unreachable = Recall::new(format!("/{}", "a".repeat(300)), "kept on disk");
        codec::write_file(&fixture.file, &[Recall::new(key(&dir), "here"), unreachable])
            .expect("seed");
        let before = std::fs::read(&fixture.file).expect("before");

        let err = RecallStore::load(&fixture.file, &dir).unwrap_err();
        assert!(matches!(err, crate::RecallError::Io(_)), "unexpected error: {err:?}");
        assert_eq!(std::fs::read(&fixture.file).expect("after"), before);
    }

    #[test]
    fn persist_without_mutation_is_idempotent() {
        let fixture = Fixture::new();
        let dir = fixture.dir("proj");
        codec::write_file(&fixture.file, &[Recall::new(key(&dir), "same")]).expect("seed");
        let before = std::fs::read(&fixture.file).expect("before");

        fixture.load(&dir).persist().expect("persist");
        let after = std::fs::read(&fixture.file).expect("after");
        assert_eq!(before, after);
    }

    #[test]
    fn default_path_lives_under_home() {
        if let Ok(path) = RecallStore::default_path() {
            assert!(path.ends_with(".recall/recalls.jsonl"));
        }
    }
}
