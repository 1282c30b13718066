//! Service adapter around a single `EnvProblem`.
//!
//! Every RPC takes a worker permit before touching the environment. There is
//! exactly one permit: each replica is bound to one accelerator, so environment
//! calls run one at a time and later calls queue on the semaphore.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use tokio::sync::Semaphore;

use crate::env::EnvProblem;
use crate::observability::metrics;
use crate::service::error::ServiceError;
use crate::service::messages::{
    CloseResponse, EnvInfoResponse, ResetRequest, ResetResponse, StepRequest, StepResponse,
};

/// Number of RPCs allowed to run against the environment at once.
pub const MAX_CONCURRENCY: usize = 1;

/// Cheaply cloneable handle shared by all request handlers.
#[derive(Clone)]
pub struct EnvServicer {
    inner: Arc<Inner>,
}

struct Inner {
    env_name: String,
    replica: u32,
    output_dir: PathBuf,
    problem: Mutex<Option<EnvProblem>>,
    closed: AtomicBool,
    workers: Semaphore,
}

impl EnvServicer {
    pub fn new(problem: EnvProblem, replica: u32, output_dir: PathBuf) -> Self {
        Self {
            inner: Arc::new(Inner {
                env_name: problem.name().to_string(),
                replica,
                output_dir,
                problem: Mutex::new(Some(problem)),
                closed: AtomicBool::new(false),
                workers: Semaphore::new(MAX_CONCURRENCY),
            }),
        }
    }

    pub fn env_name(&self) -> &str {
        &self.inner.env_name
    }

    pub fn replica(&self) -> u32 {
        self.inner.replica
    }

    pub fn output_dir(&self) -> &Path {
        &self.inner.output_dir
    }

    pub fn max_concurrency(&self) -> usize {
        MAX_CONCURRENCY
    }

    /// Worker permits not currently held by an RPC.
    pub fn available_workers(&self) -> usize {
        self.inner.workers.available_permits()
    }

    /// Does not wait for a running RPC.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    pub async fn get_env_info(&self) -> Result<EnvInfoResponse, ServiceError> {
        self.call("GetEnvInfo", |problem| Ok(problem.info())).await
    }

    pub async fn reset(&self, request: ResetRequest) -> Result<ResetResponse, ServiceError> {
        self.call("Reset", |problem| {
            let observations = problem.reset(request.indices.as_deref(), request.seed)?;
            Ok(ResetResponse { observations })
        })
        .await
    }

    pub async fn step(&self, request: StepRequest) -> Result<StepResponse, ServiceError> {
        self.call("Step", |problem| Ok(problem.step(&request.actions)?)).await
    }

    /// Drop the environment. Every later RPC fails with `Closed`.
    pub async fn close(&self) -> Result<CloseResponse, ServiceError> {
        let _permit = self.acquire().await?;
        let closed = self.lock().take().is_some();
        self.inner.closed.store(true, Ordering::Release);
        if closed {
            tracing::info!(env = %self.inner.env_name, replica = self.inner.replica, "Environment closed");
        }
        Ok(CloseResponse { closed: true })
    }

    async fn call<T>(
        &self,
        rpc: &'static str,
        f: impl FnOnce(&mut EnvProblem) -> Result<T, ServiceError>,
    ) -> Result<T, ServiceError> {
        let start = Instant::now();
        let _permit = self.acquire().await?;

        let result = match self.lock().as_mut() {
            Some(problem) => f(problem),
            None => Err(ServiceError::Closed),
        };

        let status = match &result {
            Ok(_) => 200,
            Err(e) => e.status().as_u16(),
        };
        metrics::record_rpc(rpc, status, start);
        tracing::debug!(rpc, status, elapsed_ms = start.elapsed().as_millis() as u64, "RPC handled");
        result
    }

    async fn acquire(&self) -> Result<tokio::sync::SemaphorePermit<'_>, ServiceError> {
        self.inner.workers.acquire().await.map_err(|_| ServiceError::Closed)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<EnvProblem>> {
        self.inner.problem.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
