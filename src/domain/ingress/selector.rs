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

use crate::infrastructure::constants::{
    INGRESS_KIND_INGRESS, INGRESS_KIND_ISTIO, ISTIO_APP_SUFFIX, ISTIO_NAMESPACE, ISTIO_SERVICE,
    NGINX_NAMESPACE, NGINX_SERVICE,
};
use std::fmt;

/// Namespace and name of the ingress controller's exposed service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceRef {
    pub namespace: String,
    pub service: String,
}

impl ServiceRef {
    pub fn new(namespace: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            service: service.into(),
        }
    }

    pub fn istio() -> Self {
        Self::new(ISTIO_NAMESPACE, ISTIO_SERVICE)
    }

    pub fn nginx() -> Self {
        Self::new(NGINX_NAMESPACE, NGINX_SERVICE)
    }
}

impl fmt::Display for ServiceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.service)
    }
}

/// The declared `ingress.kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngressKind {
    Istio,
    Ingress,
}

impl IngressKind {
    /// `None` when the kind is blank or not one we recognise.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            INGRESS_KIND_ISTIO => Some(Self::Istio),
            INGRESS_KIND_INGRESS => Some(Self::Ingress),
            _ => None,
        }
    }
}

/// Picks the well-known ingress service for the declared kind, or from the
/// installed apps when no kind is declared.
pub fn default_endpoint<'a>(
    kind: Option<IngressKind>,
    app_names: impl IntoIterator<Item = &'a str>,
) -> ServiceRef {
    match kind {
        Some(IngressKind::Istio) => ServiceRef::istio(),
        Some(IngressKind::Ingress) => ServiceRef::nginx(),
        None => {
            if app_names
                .into_iter()
                .any(|name| name.ends_with(ISTIO_APP_SUFFIX))
            {
                ServiceRef::istio()
            } else {
                ServiceRef::nginx()
            }
        }
    }
}
