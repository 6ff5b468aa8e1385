use crate::config::GatewayConfig;
use crate::domain::ports::{BackendProcess, InferenceBackend};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready { attempts: u32 },
    TimedOut { attempts: u32 },
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready { .. })
    }

    pub fn attempts(&self) -> u32 {
        match self {
            Readiness::Ready { attempts } | Readiness::TimedOut { attempts } => *attempts,
        }
    }
}

/// Probes `backend` every `interval` until it answers or `deadline` has passed.
///
/// A probe is only started while the deadline has not elapsed, so a backend that
/// never comes up is probed `deadline / interval` times.
pub async fn wait_until_ready(
    backend: &dyn InferenceBackend,
    interval: Duration,
    deadline: Duration,
) -> Readiness {
    let give_up_at = Instant::now() + deadline;
    let mut attempts = 0;

    while Instant::now() < give_up_at {
        attempts += 1;
        if backend.is_ready().await {
            return Readiness::Ready { attempts };
        }
        tokio::time::sleep(interval).await;
    }

    Readiness::TimedOut { attempts }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    pub launched: bool,
    pub readiness: Readiness,
    pub model_pulled: bool,
}

/// One-shot startup sequence: launch the engine, wait for it, pull the model.
/// None of the steps is fatal.
pub struct Bootstrap {
    backend: Arc<dyn InferenceBackend>,
    process: Arc<dyn BackendProcess>,
    model: String,
    spawn_backend: bool,
    pull_on_startup: bool,
    ready_timeout: Duration,
    poll_interval: Duration,
}

impl Bootstrap {
    pub fn new(
        config: &GatewayConfig,
        backend: Arc<dyn InferenceBackend>,
        process: Arc<dyn BackendProcess>,
    ) -> Self {
        Self {
            backend,
            process,
            model: config.model.clone(),
            spawn_backend: config.spawn_backend,
            pull_on_startup: config.pull_on_startup,
            ready_timeout: config.ready_timeout(),
            poll_interval: POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub async fn run(&self) -> BootstrapReport {
        let launched = if self.spawn_backend {
            match self.process.launch() {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!("Could not launch inference backend: {}", e);
                    false
                }
            }
        } else {
            tracing::info!("Backend launch disabled, expecting it to be running already");
            false
        };

        tracing::info!(
            "Waiting up to {:?} for the inference backend",
            self.ready_timeout
        );
        let readiness =
            wait_until_ready(self.backend.as_ref(), self.poll_interval, self.ready_timeout).await;
        match readiness {
            Readiness::Ready { attempts } => {
                tracing::info!("✅ Inference backend ready after {} probe(s)", attempts)
            }
            Readiness::TimedOut { attempts } => tracing::warn!(
                "Inference backend not ready after {} probe(s), continuing anyway",
                attempts
            ),
        }

        let model_pulled = if self.pull_on_startup {
            tracing::info!("Pulling model {}", self.model);
            match self.process.pull_model(&self.model).await {
                Ok(()) => {
                    tracing::info!("Model {} is available", self.model);
                    true
                }
                Err(e) => {
                    tracing::warn!("Model pull failed: {}", e);
                    false
                }
            }
        } else {
            false
        };

        BootstrapReport {
            launched,
            readiness,
            model_pulled,
        }
    }

    /// Runs the sequence on the runtime without blocking the caller.
    pub fn spawn(self) -> JoinHandle<BootstrapReport> {
        tokio::spawn(async move { self.run().await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::UpstreamGenerateRequest;
    use crate::utils::error::{GatewayError, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// Reports ready from the `ready_on`-th probe onwards.
    struct SlowStartBackend {
        ready_on: u32,
        probes: AtomicU32,
    }

    impl SlowStartBackend {
        fn new(ready_on: u32) -> Arc<Self> {
            Arc::new(Self {
                ready_on,
                probes: AtomicU32::new(0),
            })
        }

        fn probes(&self) -> u32 {
            self.probes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl InferenceBackend for SlowStartBackend {
        async fn is_ready(&self) -> bool {
            let n = self.probes.fetch_add(1, Ordering::SeqCst) + 1;
            n >= self.ready_on
        }

        async fn generate(&self, _request: &UpstreamGenerateRequest) -> Result<serde_json::Value> {
            Ok(serde_json::json!({}))
        }
    }

    #[derive(Default)]
    struct FakeProcess {
        fail: bool,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl BackendProcess for FakeProcess {
        fn launch(&self) -> Result<()> {
            self.calls.lock().unwrap().push("serve".to_string());
            if self.fail {
                return Err(GatewayError::ProcessError {
                    command: "ollama serve".to_string(),
                    message: "not found".to_string(),
                });
            }
            Ok(())
        }

        async fn pull_model(&self, model: &str) -> Result<()> {
            self.calls.lock().unwrap().push(format!("pull {}", model));
            if self.fail {
                return Err(GatewayError::ProcessError {
                    command: format!("ollama pull {}", model),
                    message: "not found".to_string(),
                });
            }
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_polling_stops_at_first_success() {
        let backend = SlowStartBackend::new(7);
        let started = Instant::now();

        let readiness =
            wait_until_ready(&*backend, POLL_INTERVAL, Duration::from_secs(60)).await;

        assert_eq!(readiness, Readiness::Ready { attempts: 7 });
        assert_eq!(backend.probes(), 7);
        assert!(started.elapsed() >= Duration::from_secs(6));
        assert!(started.elapsed() < Duration::from_secs(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_polling_gives_up_at_deadline() {
        let backend = SlowStartBackend::new(u32::MAX);
        let started = Instant::now();

        let readiness =
            wait_until_ready(&*backend, POLL_INTERVAL, Duration::from_secs(60)).await;

        assert!(!readiness.is_ready());
        assert_eq!(readiness.attempts(), 60);
        assert_eq!(backend.probes(), 60);
        assert!(started.elapsed() >= Duration::from_secs(60));
        assert!(started.elapsed() < Duration::from_secs(61));
    }

    #[tokio::test(start_paused = true)]
    async fn test_bootstrap_runs_all_steps_in_order() {
        let backend = SlowStartBackend::new(3);
        let process = Arc::new(FakeProcess::default());
        let config = GatewayConfig::default();

        let report = Bootstrap::new(&config, backend.clone(), process.clone())
            .run()
            .await;

        assert_eq!(
            report,
            BootstrapReport {
                launched: true,
                readiness: Readiness::Ready { attempts: 3 },
                model_pulled: true,
            }
        );
        assert_eq!(
            *process.calls.lock().unwrap(),
            vec!["serve".to_string(), "pull llama3.2:1b".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_bootstrap_failures_are_not_fatal() {
        let backend = SlowStartBackend::new(u32::MAX);
        let process = Arc::new(FakeProcess {
            fail: true,
            ..FakeProcess::default()
        });
        let config = GatewayConfig {
            ready_timeout_secs: 5,
            ..GatewayConfig::default()
        };

        let report = Bootstrap::new(&config, backend, process.clone()).run().await;

        assert!(!report.launched);
        assert_eq!(report.readiness, Readiness::TimedOut { attempts: 5 });
        assert!(!report.model_pulled);
        // the pull is still attempted after a timed-out wait
        assert_eq!(process.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_steps_are_skipped() {
        let process = Arc::new(FakeProcess::default());
        let config = GatewayConfig {
            spawn_backend: false,
            pull_on_startup: false,
            ..GatewayConfig::default()
        };

        let report = Bootstrap::new(&config, SlowStartBackend::new(1), process.clone())
            .spawn()
            .await
            .unwrap();

        assert!(!report.launched);
        assert!(report.readiness.is_ready());
        assert!(process.calls.lock().unwrap().is_empty());
    }
}
