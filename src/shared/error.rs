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

use thiserror::Error;
pub type Result<T> = std::result::Result<T, IngressError>;

#[derive(Error, Debug)]
pub enum IngressError {
    #[error("Kubernetes API error: {0}")]
    KubeError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Resource not found: {resource_type} '{name}' in namespace '{namespace}'")]
    NotFound {
        resource_type: String,
        name: String,
        namespace: String,
    },

    #[error("Access denied listing {resource_type}: {message}")]
    Forbidden {
        resource_type: String,
        message: String,
    },

    #[error("Timeout error: {0}")]
    Timeout(String),

    #[error("Please specify a custom DNS name via --domain when installing on {provider} in batch mode")]
    MissingDomain { provider: String },

    #[error("Command '{command}' failed: {message}")]
    Command { command: String, message: String },

    #[error("failed to discover domain for ingress service {namespace}/{service}: {reason}")]
    DomainDiscoveryFailed {
        namespace: String,
        service: String,
        reason: String,
    },

    #[error("failed to save changes to file {path}: {message}")]
    Persistence { path: String, message: String },

    #[error("no domain could be determined for provider '{0}'")]
    NoDomain(String),

    #[error("DNS registration error: {0}")]
    Registration(String),

    #[error("address cannot be resolved yet: {0}")]
    Unresolved(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<IngressError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl From<kube::Error> for IngressError {
    fn from(err: kube::Error) -> Self {
        IngressError::KubeError(err.to_string())
    }
}

impl IngressError {
    pub fn config_error(context: impl Into<String>) -> Self {
        Self::ConfigError(context.into())
    }

    pub fn not_found(
        resource_type: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    pub fn command(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Command {
            command: command.into(),
            message: message.into(),
        }
    }

    pub fn discovery_failed(
        namespace: impl Into<String>,
        service: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::DomainDiscoveryFailed {
            namespace: namespace.into(),
            service: service.into(),
            reason: reason.into(),
        }
    }

    /// Annotates the error with the step that produced it.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Context { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// The innermost error, skipping any context annotations.
    pub fn root(&self) -> &IngressError {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }
}
