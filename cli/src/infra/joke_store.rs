//! Infrastructure implementation of the `JokeStore` port.
//!
//! `AwsCliJokeStore<R>` reads items through `aws dynamodb get-item`, using
//! whatever credentials and region the AWS CLI resolves.

use anyhow::{Context, Result};
use serde_json::Value;

use crate::application::ports::{CommandRunner, JokeStore};
use crate::domain::error::JokeError;
use crate::infra::command_runner::{DEFAULT_CMD_TIMEOUT, TokioCommandRunner};

/// `JokeStore` backed by the AWS CLI.
pub struct AwsCliJokeStore<R: CommandRunner> {
    runner: R,
    binary: String,
}

impl<R: CommandRunner> AwsCliJokeStore<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            binary: "aws".to_string(),
        }
    }
}

impl AwsCliJokeStore<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn default_runner() -> Self {
        Self::new(TokioCommandRunner::new(DEFAULT_CMD_TIMEOUT))
    }
}

impl<R: CommandRunner> JokeStore for AwsCliJokeStore<R> {
    async fn get_item(&self, table: &str, key: &Value) -> Result<Option<Value>> {
        let key = key.to_string();
        let output = self
            .runner
            .run(
                &self.binary,
                &[
                    "dynamodb",
                    "get-item",
                    "--table-name",
                    table,
                    "--key",
                    &key,
                    "--output",
                    "json",
                ],
            )
            .await
            .context("aws dynamodb get-item")?;

        if !output.status.success() {
            return Err(JokeError::LookupFailed {
                table: table.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }
        parse_get_item(&output.stdout)
    }
}

/// Extract `Item` from a `get-item` response. An empty body or a body
/// without `Item` means the key is absent.
fn parse_get_item(stdout: &[u8]) -> Result<Option<Value>> {
    let text = String::from_utf8_lossy(stdout);
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    let mut body: Value =
        serde_json::from_str(text).map_err(|e| JokeError::MalformedResponse(e.to_string()))?;
    if !body.is_object() {
        return Err(JokeError::MalformedResponse(text.to_string()).into());
    }
    Ok(body.get_mut("Item").map(Value::take))
}
