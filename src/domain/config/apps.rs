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

//! The declared add-on apps (`jx-apps.yml`)

use crate::infrastructure::constants::APPS_FILE_NAME;
use crate::shared::error::IngressError;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub apps: Vec<App>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct App {
    pub name: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl App {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Loads `jx-apps.yml` from `dir`; a missing file means no apps.
    pub fn load(dir: impl AsRef<Path>) -> Result<(Self, PathBuf), IngressError> {
        let path = dir.as_ref().join(APPS_FILE_NAME);
        if !path.is_file() {
            return Ok((Self::default(), path));
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            IngressError::config_error(format!(
                "Failed to read apps file {}: {}",
                path.display(),
                e
            ))
        })?;
        if content.trim().is_empty() {
            return Ok((Self::default(), path));
        }
        let config = serde_yaml::from_str(&content)?;
        Ok((config, path))
    }

    pub fn app_names(&self) -> impl Iterator<Item = &str> {
        self.apps.iter().map(|app| app.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_apps() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(APPS_FILE_NAME),
            "apps:\n- name: jenkins-x/istio\n  version: 1.0.0\n- name: stable/nginx-ingress\n",
        )
        .unwrap();

        let (apps, _) = AppConfig::load(temp.path()).unwrap();
        let names: Vec<&str> = apps.app_names().collect();
        assert_eq!(names, vec!["jenkins-x/istio", "stable/nginx-ingress"]);
        assert!(apps.apps[0].extra.contains_key("version"));
    }

    #[test]
    fn test_missing_apps_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let (apps, path) = AppConfig::load(temp.path()).unwrap();
        assert!(apps.apps.is_empty());
        assert_eq!(path, temp.path().join(APPS_FILE_NAME));
    }
}
