//! Integration tests for the upload pass
//!
//! These tests run the orchestrator against a real temporary directory and
//! a mocked storage provider, verifying:
//! - Ledger membership suppresses uploads
//! - Successful uploads are appended to the persisted ledger
//! - Failed uploads leave the ledger untouched
//! - Unreadable files and failed ledger saves do not stop the run
//! - Repeated runs are idempotent

use async_trait::async_trait;
use bridge_desktop::TokioFileSystem;
use bridge_traits::{
    error::{BridgeError, Result as BridgeResult},
    storage::{FileSystemAccess, StorageProvider, UploadContent, UploadMetadata},
};
use bytes::Bytes;
use core_upload::{UploadError, UploadOrchestrator, UPLOAD_MIME_TYPE};
use mockall::{mock, predicate};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

// ============================================================================
// Test Fixtures
// ============================================================================

mock! {
    Storage {}

    #[async_trait]
    impl StorageProvider for Storage {
        async fn create_file(
            &self,
            metadata: UploadMetadata,
            content: UploadContent,
        ) -> BridgeResult<String>;
    }
}

struct Fixture {
    _root: TempDir,
    watch_dir: PathBuf,
    ledger_path: PathBuf,
}

impl Fixture {
    fn new(images: &[&str]) -> Self {
        let root = TempDir::new().unwrap();
        let watch_dir = root.path().join("takescreenshots");
        std::fs::create_dir(&watch_dir).unwrap();
        for name in images {
            std::fs::write(watch_dir.join(name), name.as_bytes()).unwrap();
        }
        let ledger_path = root.path().join("uploaded_files.json");

        Self {
            _root: root,
            watch_dir,
            ledger_path,
        }
    }

    fn write_ledger(&self, names: &[&str]) {
        std::fs::write(&self.ledger_path, serde_json_array(names)).unwrap();
    }

    fn ledger(&self) -> Vec<String> {
        let text = std::fs::read_to_string(&self.ledger_path).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    fn orchestrator(&self, storage: MockStorage) -> UploadOrchestrator {
        self.orchestrator_with_fs(Arc::new(TokioFileSystem::new()), storage)
    }

    fn orchestrator_with_fs(
        &self,
        fs: Arc<dyn FileSystemAccess>,
        storage: MockStorage,
    ) -> UploadOrchestrator {
        UploadOrchestrator::new(fs, Arc::new(storage), &self.ledger_path, "folder-123")
    }
}

/// Real file system whose first `failures` renames fail.
struct FlakyRename {
    inner: TokioFileSystem,
    failures: AtomicUsize,
}

impl FlakyRename {
    fn new(failures: usize) -> Self {
        Self {
            inner: TokioFileSystem::new(),
            failures: AtomicUsize::new(failures),
        }
    }
}

#[async_trait]
impl FileSystemAccess for FlakyRename {
    async fn exists(&self, path: &Path) -> BridgeResult<bool> {
        self.inner.exists(path).await
    }

    async fn create_dir_all(&self, path: &Path) -> BridgeResult<()> {
        self.inner.create_dir_all(path).await
    }

    async fn read_file(&self, path: &Path) -> BridgeResult<Bytes> {
        self.inner.read_file(path).await
    }

    async fn write_file(&self, path: &Path, data: Bytes) -> BridgeResult<()> {
        self.inner.write_file(path, data).await
    }

    async fn rename(&self, from: &Path, to: &Path) -> BridgeResult<()> {
        let should_fail = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(BridgeError::OperationFailed("disk full".to_string()));
        }
        self.inner.rename(from, to).await
    }

    async fn list_directory(&self, path: &Path) -> BridgeResult<Vec<PathBuf>> {
        self.inner.list_directory(path).await
    }
}

fn serde_json_array(names: &[&str]) -> String {
    let quoted: Vec<String> = names.iter().map(|n| format!("\"{}\"", n)).collect();
    format!("[{}]", quoted.join(", "))
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_first_upload_creates_ledger() {
    let fixture = Fixture::new(&["x.png"]);

    let mut storage = MockStorage::new();
    storage
        .expect_create_file()
        .times(1)
        .returning(|metadata, content| {
            assert_eq!(metadata.name, "x.png");
            assert_eq!(metadata.parent_ids, vec!["folder-123".to_string()]);
            assert_eq!(content.mime_type, UPLOAD_MIME_TYPE);
            assert_eq!(&content.data[..], b"x.png");
            Ok("id-x".to_string())
        });

    let report = fixture
        .orchestrator(storage)
        .run(&fixture.watch_dir)
        .await
        .unwrap();

    assert!(report.directory_found);
    assert_eq!(report.uploaded, ["x.png"]);
    assert_eq!(fixture.ledger(), ["x.png"]);
}

#[tokio::test]
async fn test_ledger_entries_are_never_uploaded() {
    let fixture = Fixture::new(&["old.png", "new.jpg"]);
    fixture.write_ledger(&["old.png"]);

    let mut storage = MockStorage::new();
    storage
        .expect_create_file()
        .withf(|metadata, _| metadata.name == "old.png")
        .times(0);
    storage
        .expect_create_file()
        .withf(|metadata, _| metadata.name == "new.jpg")
        .times(1)
        .returning(|_, _| Ok("id-new".to_string()));

    let report = fixture
        .orchestrator(storage)
        .run(&fixture.watch_dir)
        .await
        .unwrap();

    assert_eq!(report.skipped_existing, ["old.png"]);
    assert_eq!(report.uploaded, ["new.jpg"]);
    // Previous entries first, then the new upload
    assert_eq!(fixture.ledger(), ["old.png", "new.jpg"]);
}

#[tokio::test]
async fn test_failed_upload_leaves_ledger_unchanged() {
    let fixture = Fixture::new(&["broken.png"]);
    fixture.write_ledger(&["earlier.png"]);
    let before = std::fs::read(&fixture.ledger_path).unwrap();

    let mut storage = MockStorage::new();
    storage
        .expect_create_file()
        .times(1)
        .returning(|_, _| Err(BridgeError::OperationFailed("quota exceeded".to_string())));

    let report = fixture
        .orchestrator(storage)
        .run(&fixture.watch_dir)
        .await
        .unwrap();

    assert!(report.uploaded.is_empty());
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].name, "broken.png");
    assert!(report.failed[0].message.contains("quota exceeded"));
    assert_eq!(std::fs::read(&fixture.ledger_path).unwrap(), before);
}

#[tokio::test]
async fn test_failure_does_not_stop_remaining_files() {
    let fixture = Fixture::new(&["a.png", "b.png"]);

    let mut storage = MockStorage::new();
    storage
        .expect_create_file()
        .withf(|metadata, _| metadata.name == "a.png")
        .times(1)
        .returning(|_, _| Err(BridgeError::OperationFailed("500".to_string())));
    storage
        .expect_create_file()
        .withf(|metadata, _| metadata.name == "b.png")
        .times(1)
        .returning(|_, _| Ok("id-b".to_string()));

    let report = fixture
        .orchestrator(storage)
        .run(&fixture.watch_dir)
        .await
        .unwrap();

    assert_eq!(report.uploaded, ["b.png"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(fixture.ledger(), ["b.png"]);
}

#[tokio::test]
async fn test_second_run_uploads_nothing() {
    let fixture = Fixture::new(&["one.png", "two.gif", "notes.txt"]);

    let mut storage = MockStorage::new();
    storage
        .expect_create_file()
        .times(2)
        .returning(|metadata, _| Ok(format!("id-{}", metadata.name)));
    let first = fixture
        .orchestrator(storage)
        .run(&fixture.watch_dir)
        .await
        .unwrap();
    assert_eq!(first.uploaded.len(), 2);

    let mut storage = MockStorage::new();
    storage.expect_create_file().times(0);
    let second = fixture
        .orchestrator(storage)
        .run(&fixture.watch_dir)
        .await
        .unwrap();

    assert!(second.uploaded.is_empty());
    assert_eq!(second.skipped_existing.len(), 2);
}

#[tokio::test]
async fn test_missing_directory_is_not_an_error() {
    let fixture = Fixture::new(&[]);
    let mut storage = MockStorage::new();
    storage.expect_create_file().times(0);

    let report = fixture
        .orchestrator(storage)
        .run(&fixture.watch_dir.join("absent"))
        .await
        .unwrap();

    assert!(!report.directory_found);
    assert!(!fixture.ledger_path.exists());
}

#[tokio::test]
async fn test_non_image_files_are_ignored() {
    let fixture = Fixture::new(&["a.png", "b.txt", "c.JPG", "d.gif"]);

    let mut storage = MockStorage::new();
    storage
        .expect_create_file()
        .with(
            predicate::function(|metadata: &UploadMetadata| metadata.name != "b.txt"),
            predicate::always(),
        )
        .times(3)
        .returning(|_, _| Ok("id".to_string()));

    let report = fixture
        .orchestrator(storage)
        .run(&fixture.watch_dir)
        .await
        .unwrap();

    let mut uploaded = report.uploaded.clone();
    uploaded.sort();
    assert_eq!(uploaded, ["a.png", "c.JPG", "d.gif"]);
}

#[tokio::test]
async fn test_corrupted_ledger_aborts_before_uploading() {
    let fixture = Fixture::new(&["x.png"]);
    std::fs::write(&fixture.ledger_path, "not json").unwrap();

    let mut storage = MockStorage::new();
    storage.expect_create_file().times(0);

    let result = fixture.orchestrator(storage).run(&fixture.watch_dir).await;

    assert!(matches!(result, Err(UploadError::LedgerCorrupted { .. })));
    assert_eq!(
        std::fs::read_to_string(&fixture.ledger_path).unwrap(),
        "not json"
    );
}

#[tokio::test]
async fn test_empty_directory_leaves_ledger_alone() {
    let fixture = Fixture::new(&["readme.md"]);
    let mut storage = MockStorage::new();
    storage.expect_create_file().times(0);

    let report = fixture
        .orchestrator(storage)
        .run(&fixture.watch_dir)
        .await
        .unwrap();

    assert!(report.directory_found);
    assert!(report.uploaded.is_empty());
    assert!(!Path::new(&fixture.ledger_path).exists());
}

#[tokio::test]
async fn test_unreadable_file_does_not_stop_others() {
    let fixture = Fixture::new(&["ok.png"]);
    std::fs::create_dir(fixture.watch_dir.join("dir.png")).unwrap();

    let mut storage = MockStorage::new();
    storage
        .expect_create_file()
        .withf(|metadata, _| metadata.name == "ok.png")
        .times(1)
        .returning(|_, _| Ok("id-ok".to_string()));

    let report = fixture
        .orchestrator(storage)
        .run(&fixture.watch_dir)
        .await
        .unwrap();

    assert_eq!(report.uploaded, ["ok.png"]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].name, "dir.png");
    assert!(report.failed[0].message.contains("failed to read"));
    assert_eq!(fixture.ledger(), ["ok.png"]);
}

#[tokio::test]
async fn test_ledger_save_failure_does_not_stop_others() {
    let fixture = Fixture::new(&["a.png", "b.png", "c.png"]);

    let mut storage = MockStorage::new();
    storage
        .expect_create_file()
        .times(3)
        .returning(|metadata, _| Ok(format!("id-{}", metadata.name)));

    let report = fixture
        .orchestrator_with_fs(Arc::new(FlakyRename::new(usize::MAX)), storage)
        .run(&fixture.watch_dir)
        .await
        .unwrap();

    assert!(report.uploaded.is_empty());
    let mut failed: Vec<&str> = report.failed.iter().map(|f| f.name.as_str()).collect();
    failed.sort();
    assert_eq!(failed, ["a.png", "b.png", "c.png"]);
    assert!(report.failed.iter().all(|f| f.message.contains("disk full")));
    assert!(!fixture.ledger_path.exists());
}

#[tokio::test]
async fn test_later_save_persists_name_from_failed_save() {
    let fixture = Fixture::new(&["a.png", "b.png"]);

    let mut storage = MockStorage::new();
    storage
        .expect_create_file()
        .times(2)
        .returning(|metadata, _| Ok(format!("id-{}", metadata.name)));

    let report = fixture
        .orchestrator_with_fs(Arc::new(FlakyRename::new(1)), storage)
        .run(&fixture.watch_dir)
        .await
        .unwrap();

    assert_eq!(report.uploaded.len(), 1);
    assert_eq!(report.failed.len(), 1);

    let mut ledger = fixture.ledger();
    ledger.sort();
    assert_eq!(ledger, ["a.png", "b.png"]);
}
