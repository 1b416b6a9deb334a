//! In-memory fakes for the reconciler's collaborator seams.

use std::collections::{BTreeMap, HashMap};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use uevakt_config::{ConfigError, UeConfig};
use uevakt_relation::RelationState;
use uevakt_workload::{
    ConfigVolume, ExecOutput, Supervisor, SupervisorError, VolumeError, WorkloadStatus,
};

use crate::engine::reconciler::ConfigSource;
use crate::engine::reconciler::RelationPort;

/// Serialize a databag the way the platform does: a JSON object of strings.
pub fn databag(entries: &[(&str, &str)]) -> Bytes {
    let bag: BTreeMap<&str, &str> = entries.iter().copied().collect();
    Bytes::from(serde_json::to_vec(&bag).unwrap())
}

pub struct FixedConfig(pub UeConfig);

impl ConfigSource for FixedConfig {
    fn current(&self) -> Result<UeConfig, ConfigError> {
        Ok(self.0.clone())
    }
}

pub struct FakeRelation(pub RelationState);

impl RelationPort for FakeRelation {
    fn state(&self) -> RelationState {
        self.0.clone()
    }
}

pub struct FakeVolume {
    mounted: bool,
    fail_writes: bool,
    files: Mutex<HashMap<String, Vec<u8>>>,
    writes: AtomicUsize,
    write_attempts: AtomicUsize,
}

impl FakeVolume {
    pub fn mounted() -> Self {
        Self {
            mounted: true,
            fail_writes: false,
            files: Mutex::new(HashMap::new()),
            writes: AtomicUsize::new(0),
            write_attempts: AtomicUsize::new(0),
        }
    }

    pub fn unmounted() -> Self {
        Self {
            mounted: false,
            ..Self::mounted()
        }
    }

    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::mounted()
        }
    }

    pub fn seed(&self, name: &str, content: &[u8]) {
        self.files
            .lock()
            .unwrap()
            .insert(name.to_string(), content.to_vec());
    }

    pub fn contents(&self, name: &str) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(name).cloned()
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn write_attempts(&self) -> usize {
        self.write_attempts.load(Ordering::SeqCst)
    }
}

impl ConfigVolume for FakeVolume {
    fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn read(&self, name: &str) -> Result<Option<Vec<u8>>, VolumeError> {
        Ok(self.contents(name))
    }

    fn write_atomic(&self, name: &str, content: &[u8]) -> Result<(), VolumeError> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes {
            return Err(VolumeError::Write {
                path: name.into(),
                source: io::Error::other("disk full"),
            });
        }
        self.seed(name, content);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct FakeSupervisor {
    ready: bool,
    status: Mutex<WorkloadStatus>,
    restarts: AtomicUsize,
    exec_calls: AtomicUsize,
    exec_response: Mutex<Result<ExecOutput, SupervisorError>>,
}

impl FakeSupervisor {
    pub fn ready(status: WorkloadStatus) -> Self {
        Self {
            ready: true,
            status: Mutex::new(status),
            restarts: AtomicUsize::new(0),
            exec_calls: AtomicUsize::new(0),
            exec_response: Mutex::new(Ok(ExecOutput {
                exit_code: 0,
                stdout: String::new(),
                stderr: String::new(),
            })),
        }
    }

    pub fn not_ready() -> Self {
        Self {
            ready: false,
            ..Self::ready(WorkloadStatus::Starting)
        }
    }

    pub fn set_status(&self, status: WorkloadStatus) {
        *self.status.lock().unwrap() = status;
    }

    pub fn set_exec_response(&self, response: Result<ExecOutput, SupervisorError>) {
        *self.exec_response.lock().unwrap() = response;
    }

    pub fn restarts(&self) -> usize {
        self.restarts.load(Ordering::SeqCst)
    }

    pub fn exec_calls(&self) -> usize {
        self.exec_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Supervisor for FakeSupervisor {
    async fn is_ready(&self) -> bool {
        self.ready
    }

    async fn restart(&self) -> Result<(), SupervisorError> {
        self.restarts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn current_status(&self) -> Result<WorkloadStatus, SupervisorError> {
        Ok(*self.status.lock().unwrap())
    }

    async fn exec(&self, _command: &[&str]) -> Result<ExecOutput, SupervisorError> {
        self.exec_calls.fetch_add(1, Ordering::SeqCst);
        match &*self.exec_response.lock().unwrap() {
            Ok(output) => Ok(output.clone()),
            Err(e) => Err(SupervisorError::Exec(e.to_string())),
        }
    }
}
