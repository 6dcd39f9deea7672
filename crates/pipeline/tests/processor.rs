//! Pipeline orchestration tests with injected fakes.
//!
//! Every test drives [`JobProcessor::process`] end to end and asserts on
//! the recorded status-store writes, blob-store contents, and backend
//! invocation counts -- no database or network involved.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_matches::assert_matches;

use costumier_core::encoding::{encode_data_url, MAX_IMAGE_BYTES};
use costumier_core::error::CoreError;
use costumier_core::style::PhotomakerStyle;
use costumier_core::types::JobId;
use costumier_db::models::status::JobStatus;
use costumier_photomaker::{
    GeneratedImage, GenerationBackend, GenerationRequest, GenerationResult, PhotomakerError,
};
use costumier_pipeline::{JobProcessor, StatusStore};
use costumier_storage::{BlobStore, StorageError};

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct StatusEvent {
    status: JobStatus,
    message: String,
    result: Option<serde_json::Value>,
}

#[derive(Default)]
struct MemoryStatusStore {
    events: Mutex<Vec<StatusEvent>>,
}

impl MemoryStatusStore {
    fn events(&self) -> Vec<StatusEvent> {
        self.events.lock().unwrap().clone()
    }

    fn last(&self) -> StatusEvent {
        self.events().last().expect("no status writes recorded").clone()
    }
}

#[async_trait::async_trait]
impl StatusStore for MemoryStatusStore {
    async fn update(
        &self,
        _job_id: JobId,
        status: JobStatus,
        message: &str,
        result: Option<&serde_json::Value>,
    ) -> Result<(), CoreError> {
        self.events.lock().unwrap().push(StatusEvent {
            status,
            message: message.to_string(),
            result: result.cloned(),
        });
        Ok(())
    }
}

#[derive(Default)]
struct MemoryBlobStore {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    put_count: AtomicUsize,
}

impl MemoryBlobStore {
    fn puts(&self) -> usize {
        self.put_count.load(Ordering::SeqCst)
    }

    fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(
        &self,
        key: &str,
        _content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StorageError> {
        self.put_count.fetch_add(1, Ordering::SeqCst);
        self.objects.lock().unwrap().insert(key.to_string(), bytes);
        Ok(format!("https://blobs.test/{key}"))
    }

    async fn delete_prefix(&self, prefix: &str) -> Result<(), StorageError> {
        self.objects
            .lock()
            .unwrap()
            .retain(|key, _| !key.starts_with(prefix));
        Ok(())
    }
}

enum BackendMode {
    Succeed,
    Unprocessable,
    RateLimited,
    Hang,
}

struct FakeBackend {
    mode: BackendMode,
    calls: AtomicUsize,
}

impl FakeBackend {
    fn new(mode: BackendMode) -> Self {
        Self {
            mode,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl GenerationBackend for FakeBackend {
    async fn generate(
        &self,
        _request: &GenerationRequest,
    ) -> Result<GenerationResult, PhotomakerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            BackendMode::Succeed => Ok(GenerationResult {
                images: vec![GeneratedImage {
                    url: "https://cdn.test/portrait.png".to_string(),
                    width: Some(1024),
                    height: Some(1024),
                }],
            }),
            BackendMode::Unprocessable => {
                Err(PhotomakerError::Unprocessable("no face detected".to_string()))
            }
            BackendMode::RateLimited => {
                Err(PhotomakerError::RateLimited("too many requests".to_string()))
            }
            BackendMode::Hang => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Err(PhotomakerError::NoOutput)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

struct Harness {
    status: Arc<MemoryStatusStore>,
    blobs: Arc<MemoryBlobStore>,
    backend: Arc<FakeBackend>,
    processor: JobProcessor,
}

fn harness(mode: BackendMode) -> Harness {
    let status = Arc::new(MemoryStatusStore::default());
    let blobs = Arc::new(MemoryBlobStore::default());
    let backend = Arc::new(FakeBackend::new(mode));
    let processor = JobProcessor::new(
        Arc::clone(&status) as Arc<dyn StatusStore>,
        Arc::clone(&blobs) as Arc<dyn BlobStore>,
        Arc::clone(&backend) as Arc<dyn GenerationBackend>,
    );
    Harness {
        status,
        blobs,
        backend,
        processor,
    }
}

fn valid_jpeg_data_url() -> String {
    encode_data_url(&[0xFF, 0xD8, 0xFF, 0xE0, 0x01, 0x02, 0x03], "image/jpeg")
}

fn job_id() -> JobId {
    uuid::Uuid::now_v7()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn valid_job_runs_to_completed_with_result() {
    let h = harness(BackendMode::Succeed);

    let result = h
        .processor
        .process(job_id(), &[valid_jpeg_data_url()], "a wizard img", PhotomakerStyle::Cinematic)
        .await
        .unwrap();

    assert!(!result.images.is_empty());

    let events = h.status.events();
    let statuses: Vec<JobStatus> = events.iter().map(|e| e.status).collect();
    assert_eq!(
        statuses,
        vec![
            JobStatus::Processing,
            JobStatus::Processing,
            JobStatus::Processing,
            JobStatus::Completed,
        ],
    );

    let last = h.status.last();
    assert_eq!(last.message, "Image generated successfully!");
    let written = last.result.expect("completed status must carry the result");
    assert!(!written["images"].as_array().unwrap().is_empty());

    assert_eq!(h.backend.calls(), 1);
}

#[tokio::test]
async fn progress_messages_track_the_stages() {
    let h = harness(BackendMode::Succeed);

    h.processor
        .process(job_id(), &[valid_jpeg_data_url()], "a pilot img", PhotomakerStyle::Photographic)
        .await
        .unwrap();

    let messages: Vec<String> = h.status.events().into_iter().map(|e| e.message).collect();
    assert_eq!(messages[0], "Building archive...");
    assert_eq!(messages[1], "Uploading images...");
    assert_eq!(messages[2], "Generating with AI...");
}

#[tokio::test]
async fn oversized_image_is_rejected_before_any_remote_call() {
    let h = harness(BackendMode::Succeed);
    let oversized = encode_data_url(&vec![0u8; MAX_IMAGE_BYTES + 1], "image/jpeg");

    let err = h
        .processor
        .process(job_id(), &[oversized], "a knight img", PhotomakerStyle::Cinematic)
        .await
        .unwrap_err();

    assert_matches!(err, CoreError::Validation(_));
    assert_eq!(h.backend.calls(), 0, "remote client must not be invoked");
    assert_eq!(h.blobs.puts(), 0, "nothing may be uploaded");

    let last = h.status.last();
    assert_eq!(last.status, JobStatus::Error);
    assert!(!last.message.is_empty());
}

#[tokio::test]
async fn malformed_data_url_is_an_encoding_error() {
    let h = harness(BackendMode::Succeed);

    let err = h
        .processor
        .process(job_id(), &["not a data url".to_string()], "img", PhotomakerStyle::NoStyle)
        .await
        .unwrap_err();

    assert_matches!(err, CoreError::Encoding(_));
    assert_eq!(h.backend.calls(), 0);
    assert_eq!(h.status.last().status, JobStatus::Error);
}

#[tokio::test]
async fn unprocessable_input_gets_the_face_message() {
    let h = harness(BackendMode::Unprocessable);

    let err = h
        .processor
        .process(job_id(), &[valid_jpeg_data_url()], "a queen img", PhotomakerStyle::FantasyArt)
        .await
        .unwrap_err();

    assert_matches!(err, CoreError::RemoteUnprocessable(_));

    let last = h.status.last();
    assert_eq!(last.status, JobStatus::Error);
    assert!(last.message.contains("face"), "message was: {}", last.message);
    assert_ne!(
        last.message,
        CoreError::Internal("x".into()).user_message(),
        "unprocessable must not collapse into the generic failure message",
    );
}

#[tokio::test]
async fn rate_limited_failure_reads_as_transient() {
    let h = harness(BackendMode::RateLimited);

    let err = h
        .processor
        .process(job_id(), &[valid_jpeg_data_url()], "a pirate img", PhotomakerStyle::ComicBook)
        .await
        .unwrap_err();

    assert!(err.is_transient());

    let last = h.status.last();
    assert_eq!(last.status, JobStatus::Error);
    assert!(last.message.contains("try again"), "message was: {}", last.message);
    assert_ne!(
        last.message,
        CoreError::RemoteAuth("x".into()).user_message(),
        "transient message must differ from permanent failure messages",
    );
}

#[tokio::test]
async fn transient_uploads_are_deleted_on_success() {
    let h = harness(BackendMode::Succeed);

    h.processor
        .process(job_id(), &[valid_jpeg_data_url()], "a chef img", PhotomakerStyle::Enhance)
        .await
        .unwrap();

    assert_eq!(h.blobs.puts(), 1);
    assert_eq!(h.blobs.object_count(), 0, "cleanup must remove the archive");
}

#[tokio::test]
async fn transient_uploads_are_deleted_on_error() {
    let h = harness(BackendMode::Unprocessable);

    let _ = h
        .processor
        .process(job_id(), &[valid_jpeg_data_url()], "a clown img", PhotomakerStyle::Lowpoly)
        .await;

    assert_eq!(h.blobs.puts(), 1, "the archive was uploaded before the failure");
    assert_eq!(h.blobs.object_count(), 0, "cleanup must also run on the error path");
}

#[tokio::test]
async fn deadline_expiry_ends_the_job_in_a_timeout_error() {
    let h = harness(BackendMode::Hang);
    let processor = h.processor.with_deadline(Duration::from_millis(50));

    let err = processor
        .process(job_id(), &[valid_jpeg_data_url()], "a ghost img", PhotomakerStyle::Neonpunk)
        .await
        .unwrap_err();

    assert_matches!(err, CoreError::RemoteTimeout(_));

    let last = h.status.last();
    assert_eq!(last.status, JobStatus::Error, "job must not stay in processing");
    assert!(last.message.contains("timed out"), "message was: {}", last.message);
}

#[tokio::test]
async fn multiple_images_are_archived_in_one_upload() {
    let h = harness(BackendMode::Succeed);
    let images = vec![valid_jpeg_data_url(), valid_jpeg_data_url(), valid_jpeg_data_url()];

    h.processor
        .process(job_id(), &images, "a band img", PhotomakerStyle::DigitalArt)
        .await
        .unwrap();

    // Archive-then-upload: one object regardless of image count.
    assert_eq!(h.blobs.puts(), 1);
    assert_eq!(h.backend.calls(), 1);
}
