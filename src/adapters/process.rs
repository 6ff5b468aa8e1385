use crate::domain::ports::BackendProcess;
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

/// Drives the `ollama` binary: `serve` in the background, `pull` in the foreground.
#[derive(Debug, Clone)]
pub struct OllamaCli {
    binary: String,
}

impl OllamaCli {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(args);
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::null());
        cmd
    }

    fn describe(&self, args: &[&str]) -> String {
        format!("{} {}", self.binary, args.join(" "))
    }
}

#[async_trait]
impl BackendProcess for OllamaCli {
    fn launch(&self) -> Result<()> {
        let args = ["serve"];
        let child = self
            .command(&args)
            .spawn()
            .map_err(|e| GatewayError::ProcessError {
                command: self.describe(&args),
                message: e.to_string(),
            })?;

        // Dropping the handle leaves the server running; it is never waited on.
        tracing::info!(
            "Launched `{}` (pid {})",
            self.describe(&args),
            child.id().unwrap_or(0)
        );
        Ok(())
    }

    async fn pull_model(&self, model: &str) -> Result<()> {
        let args = ["pull", model];
        let status = self
            .command(&args)
            .status()
            .await
            .map_err(|e| GatewayError::ProcessError {
                command: self.describe(&args),
                message: e.to_string(),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(GatewayError::ProcessError {
                command: self.describe(&args),
                message: format!("exited with {}", status),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_fails_to_launch() {
        let cli = OllamaCli::new("llm-gateway-no-such-binary");
        let err = cli.launch().unwrap_err();
        assert!(matches!(err, GatewayError::ProcessError { .. }));
        assert!(cli.pull_model("llama3.2:1b").await.is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_pull_reports_exit_status() {
        assert!(OllamaCli::new("true").pull_model("llama3.2:1b").await.is_ok());

        let err = OllamaCli::new("false")
            .pull_model("llama3.2:1b")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("false pull llama3.2:1b"));
    }
}
