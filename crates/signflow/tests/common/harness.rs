//! Test harness building the full service graph.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use tokio::sync::broadcast::Receiver;

use signflow::cache::{DistributedCache, MemoryCache, StatusCache};
use signflow::config::app_config::{PARALLEL_WORKERS, SIGNING_MODE, WORKER_TYPE};
use signflow::config::{SignFlowConfig, WorkerSettings};
use signflow::db::{file_repo, job_repo, sign_request_repo, Database};
use signflow::progress::{PollSettings, ProgressService};
use signflow::reporting::SignRequestErrorReporter;
use signflow::request::{SignRequestService, SignerRequest};
use signflow::status::{
    DefaultFileStatusPolicy, SequentialSigningService, StatusService, StatusUpdatePolicy,
};
use signflow::worker::WorkerHealthService;
use signflow::{
    AppConfig, Clock, File, FileStatus, IdentifyMethodInput, ManualClock, NodeType, SignFlowEvent,
    SignFlowEventBroadcaster, SignRequest, SignatureFlow,
};

use super::RecordingRunner;

/// Every service of the crate over shared in-memory state.
pub struct TestHarness {
    pub db: Arc<Database>,
    pub clock: Arc<ManualClock>,
    pub runner: Arc<RecordingRunner>,
    pub raw_cache: Arc<MemoryCache>,
    pub cache: StatusCache,
    pub events: Arc<SignFlowEventBroadcaster>,
    pub status: StatusService,
    pub sign_requests: SignRequestService,
    pub progress: ProgressService,
    pub reporter: SignRequestErrorReporter,
    pub health: WorkerHealthService,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_runner(RecordingRunner::new())
    }

    pub fn with_runner(runner: RecordingRunner) -> Self {
        let db = Arc::new(Database::open_in_memory().expect("Failed to open test database"));
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 6, 1, 8, 0, 0).unwrap(),
        ));
        let runner = Arc::new(runner);
        let config = SignFlowConfig::default();
        let raw_cache = Arc::new(MemoryCache::from_config(&config.cache));
        let cache = StatusCache::from_config(
            raw_cache.clone() as Arc<dyn DistributedCache>,
            &config.cache,
        );
        let events = Arc::new(SignFlowEventBroadcaster::new(64));

        let sequential = Arc::new(SequentialSigningService::new(db.clone(), db.clone()));
        let status = StatusService::new(
            StatusUpdatePolicy::new(sequential),
            Arc::new(DefaultFileStatusPolicy),
            cache.clone(),
        );
        let sign_requests = SignRequestService::new(
            db.clone(),
            db.clone(),
            status.clone(),
            events.clone(),
            clock.clone(),
        );
        let progress = ProgressService::new(
            db.clone(),
            db.clone(),
            cache.clone(),
            PollSettings::from(&config.poll),
        );
        let reporter = SignRequestErrorReporter::new(cache.clone());
        let health = WorkerHealthService::new(
            db.clone(),
            db.clone(),
            runner.clone(),
            clock.clone(),
            &WorkerSettings {
                interpreter: Some("php".to_string()),
                entry_point: "/var/www/app/occ".to_string(),
                ..WorkerSettings::default()
            },
        );

        Self {
            db,
            clock,
            runner,
            raw_cache,
            cache,
            events,
            status,
            sign_requests,
            progress,
            reporter,
            health,
        }
    }

    pub fn insert_file(
        &self,
        name: &str,
        node_type: NodeType,
        flow: SignatureFlow,
        status: FileStatus,
        parent: Option<i64>,
    ) -> File {
        let id = file_repo::insert(
            &self.db,
            &File {
                id: 0,
                uuid: uuid::Uuid::new_v4().to_string(),
                node_id: 500,
                name: name.to_string(),
                parent_file_id: parent,
                node_type,
                status,
                signature_flow: flow,
                created_at: Utc::now(),
            },
        )
        .expect("Failed to insert file");
        file_repo::find_by_id(&self.db, id).unwrap().unwrap()
    }

    pub fn ordered_file(&self) -> File {
        self.insert_file(
            "contract.pdf",
            NodeType::File,
            SignatureFlow::OrderedNumeric,
            FileStatus::AbleToSign,
            None,
        )
    }

    /// Adds a signer identified by email, with the file able to sign.
    pub fn add_signer(&self, file: &File, email: &str, order: u32) -> SignRequest {
        let mut request =
            SignerRequest::new(file.id, vec![IdentifyMethodInput::new("email", email)]);
        request.signing_order = order;
        request.file_status = Some(file.status);
        self.sign_requests
            .create_or_update_sign_request(request)
            .expect("Failed to add signer")
    }

    /// What a signing worker does once a signer's signature is applied.
    pub fn mark_signed(&self, sign_request: &SignRequest) -> SignRequest {
        let mut signed = sign_request.clone();
        signed.signed = Some(self.clock.now());
        signed.status = signflow::SignRequestStatus::Signed;
        let id = signed.id.expect("Sign request was never saved");
        sign_request_repo::update(&self.db, id, &signed).unwrap();
        signed
    }

    pub fn reload(&self, sign_request: &SignRequest) -> SignRequest {
        sign_request_repo::find_by_uuid(&self.db, &sign_request.uuid)
            .unwrap()
            .unwrap()
    }

    pub fn enable_async_local(&self, workers: i64) {
        self.db.set_string(SIGNING_MODE, "async").unwrap();
        self.db.set_string(WORKER_TYPE, "local").unwrap();
        self.db.set_int(PARALLEL_WORKERS, workers).unwrap();
    }

    pub fn enqueue_jobs(&self, class: &str, count: usize) {
        for n in 0..count {
            job_repo::enqueue(
                &self.db,
                class,
                &serde_json::json!({ "n": n }),
                self.clock.now(),
            )
            .unwrap();
        }
    }

    pub fn subscribe(&self) -> Receiver<SignFlowEvent> {
        self.events.subscribe()
    }
}

/// Drains every event currently buffered in `rx`.
pub fn drain(rx: &mut Receiver<SignFlowEvent>) -> Vec<SignFlowEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
