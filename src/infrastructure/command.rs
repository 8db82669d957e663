// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! External command execution

use crate::shared::error::IngressError;
use tokio::process::Command;
use tracing::debug;

/// Runs an external CLI and captures its standard output.
#[async_trait::async_trait]
pub trait CommandRunner: Send + Sync {
    /// Returns trimmed stdout. A non-zero exit status is an [`IngressError::Command`].
    async fn output(&self, program: &str, args: &[&str]) -> Result<String, IngressError>;
}

#[derive(Debug, Default, Clone)]
pub struct ShellCommandRunner;

impl ShellCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl CommandRunner for ShellCommandRunner {
    async fn output(&self, program: &str, args: &[&str]) -> Result<String, IngressError> {
        let command_line = command_line(program, args);
        debug!(command = %command_line, "running external command");

        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|e| IngressError::command(&command_line, e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(IngressError::command(
                &command_line,
                format!("{}: {}", output.status, stderr.trim()),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

pub(crate) fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}
