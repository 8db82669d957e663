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

//! The requirements document (`jx-requirements.yml`)
//!
//! Only the fields domain discovery reads or writes are typed; everything else
//! is carried through untouched so saving never drops user settings.

use crate::infrastructure::constants::{
    AUTO_DNS_SUFFIXES, REQUIREMENTS_FILE_NAME, SERVICE_TYPE_NODE_PORT,
};
use crate::shared::error::IngressError;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RequirementsConfig {
    pub cluster: ClusterRequirements,
    pub ingress: IngressRequirements,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClusterRequirements {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub provider: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cluster_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub registry: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IngressRequirements {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub domain: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub service: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub service_type: String,
    #[serde(rename = "externalIP", skip_serializing_if = "String::is_empty")]
    pub external_ip: String,
    pub tls: TlsRequirements,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TlsRequirements {
    pub enabled: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
    pub production: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl IngressRequirements {
    pub fn is_node_port(&self) -> bool {
        self.service_type == SERVICE_TYPE_NODE_PORT
    }

    /// Domains served by a wildcard magic DNS service rather than owned DNS.
    pub fn is_auto_dns_domain(&self) -> bool {
        AUTO_DNS_SUFFIXES
            .iter()
            .any(|suffix| self.domain.ends_with(suffix))
    }
}

impl RequirementsConfig {
    /// Loads the requirements file from `dir` or its nearest ancestor.
    ///
    /// When no file exists a default document is returned together with the
    /// path it would be saved to inside `dir`.
    pub fn load(dir: impl AsRef<Path>) -> Result<(Self, PathBuf), IngressError> {
        let dir = dir.as_ref();
        for candidate in dir.ancestors() {
            let path = candidate.join(REQUIREMENTS_FILE_NAME);
            if path.is_file() {
                let config = Self::from_file(&path)?;
                return Ok((config, path));
            }
        }
        Ok((Self::default(), dir.join(REQUIREMENTS_FILE_NAME)))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, IngressError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            IngressError::config_error(format!(
                "Failed to read requirements file {}: {}",
                path.display(),
                e
            ))
        })?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), IngressError> {
        let path = path.as_ref();
        let persistence = |message: String| IngressError::Persistence {
            path: path.display().to_string(),
            message,
        };

        let content = serde_yaml::to_string(self).map_err(|e| persistence(e.to_string()))?;
        fs::write(path, content).map_err(|e| persistence(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"
autoUpdate:
  enabled: false
cluster:
  provider: gke
  clusterName: dev
  project: my-project
ingress:
  domain: ""
  externalDNS: false
  tls:
    enabled: false
    email: ""
webhook: prow
"#;

    #[test]
    fn test_parse_and_preserve_unknown_fields() {
        let config: RequirementsConfig = serde_yaml::from_str(SAMPLE).unwrap();
        assert_eq!(config.cluster.provider, "gke");
        assert_eq!(config.cluster.cluster_name, "dev");
        assert!(config.ingress.domain.is_empty());
        assert!(config.extra.contains_key("webhook"));
        assert!(config.extra.contains_key("autoUpdate"));
        assert!(config.cluster.extra.contains_key("project"));
        assert!(config.ingress.extra.contains_key("externalDNS"));

        let rendered = serde_yaml::to_string(&config).unwrap();
        assert!(rendered.contains("project: my-project"));
        assert!(rendered.contains("webhook: prow"));
    }

    #[test]
    fn test_node_port_and_auto_dns() {
        let mut ingress = IngressRequirements {
            service_type: "NodePort".to_string(),
            domain: "35.205.151.95.nip.io".to_string(),
            ..Default::default()
        };
        assert!(ingress.is_node_port());
        assert!(ingress.is_auto_dns_domain());

        ingress.domain = "1.2.3.4.xip.io".to_string();
        assert!(ingress.is_auto_dns_domain());

        ingress.domain = "example.com".to_string();
        assert!(!ingress.is_auto_dns_domain());
    }

    #[test]
    fn test_load_searches_parent_directories() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(REQUIREMENTS_FILE_NAME), SAMPLE).unwrap();
        let nested = temp.path().join("env").join("templates");
        fs::create_dir_all(&nested).unwrap();

        let (config, path) = RequirementsConfig::load(&nested).unwrap();
        assert_eq!(path, temp.path().join(REQUIREMENTS_FILE_NAME));
        assert_eq!(config.cluster.provider, "gke");
    }

    #[test]
    fn test_load_missing_file_defaults() {
        let temp = TempDir::new().unwrap();
        let (config, path) = RequirementsConfig::load(temp.path()).unwrap();
        assert_eq!(config, RequirementsConfig::default());
        assert_eq!(path, temp.path().join(REQUIREMENTS_FILE_NAME));
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(REQUIREMENTS_FILE_NAME);
        fs::write(&path, SAMPLE).unwrap();

        let mut config = RequirementsConfig::from_file(&path).unwrap();
        config.ingress.domain = "35.205.151.95.nip.io".to_string();
        config.save(&path).unwrap();

        let reloaded = RequirementsConfig::from_file(&path).unwrap();
        assert_eq!(reloaded.ingress.domain, "35.205.151.95.nip.io");
        assert_eq!(reloaded.cluster.extra, config.cluster.extra);
    }

    #[test]
    fn test_save_to_missing_directory_is_persistence_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing").join(REQUIREMENTS_FILE_NAME);
        let err = RequirementsConfig::default().save(&path).unwrap_err();
        assert!(matches!(err, IngressError::Persistence { .. }));
    }
}
