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

use crate::shared::error::IngressError;
use k8s_openapi::api::core::v1::{Node, Service};
use kube::{Api, Client};

/// Read-only view of the orchestration API used by domain discovery.
#[async_trait::async_trait]
pub trait IngressKubeClient: Send + Sync {
    /// Fetches a service, mapping HTTP 404 to [`IngressError::NotFound`].
    async fn get_service(&self, namespace: &str, name: &str) -> Result<Service, IngressError>;

    /// Lists cluster nodes, mapping HTTP 403 to [`IngressError::Forbidden`].
    async fn list_nodes(&self) -> Result<Vec<Node>, IngressError>;
}

pub struct IngressKubeClientImpl {
    client: Client,
}

impl IngressKubeClientImpl {
    pub async fn new() -> Result<Self, IngressError> {
        let client = Client::try_default().await.map_err(|e| {
            IngressError::KubeError(format!("Failed to create Kubernetes client: {}", e))
        })?;

        Ok(Self { client })
    }

    pub async fn new_with_config(
        kubeconfig_path: Option<String>,
        context: Option<String>,
    ) -> Result<Self, IngressError> {
        use kube::config::{KubeConfigOptions, Kubeconfig};

        if kubeconfig_path.is_none() && context.is_none() {
            return Self::new().await;
        }

        let kubeconfig = if let Some(path) = kubeconfig_path {
            Kubeconfig::read_from(path)
                .map_err(|e| IngressError::KubeError(format!("Failed to load kubeconfig: {}", e)))?
        } else {
            Kubeconfig::read()
                .map_err(|e| IngressError::KubeError(format!("Failed to load kubeconfig: {}", e)))?
        };

        let config_options = KubeConfigOptions {
            context,
            cluster: None,
            user: None,
        };

        let config = kube::Config::from_custom_kubeconfig(kubeconfig, &config_options)
            .await
            .map_err(|e| {
                IngressError::KubeError(format!("Failed to create Kubernetes config: {}", e))
            })?;

        let client = Client::try_from(config).map_err(|e| {
            IngressError::KubeError(format!("Failed to create Kubernetes client: {}", e))
        })?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl IngressKubeClient for IngressKubeClientImpl {
    async fn get_service(&self, namespace: &str, name: &str) -> Result<Service, IngressError> {
        let api: Api<Service> = Api::namespaced(self.client.clone(), namespace);
        api.get(name).await.map_err(|e| {
            if let kube::Error::Api(ae) = e {
                match ae.code {
                    404 => IngressError::not_found("Service", name, namespace),
                    403 => IngressError::Forbidden {
                        resource_type: "Service".to_string(),
                        message: ae.message,
                    },
                    _ => IngressError::KubeError(ae.message),
                }
            } else {
                IngressError::KubeError(e.to_string())
            }
        })
    }

    async fn list_nodes(&self) -> Result<Vec<Node>, IngressError> {
        let api: Api<Node> = Api::all(self.client.clone());
        let list_params = kube::api::ListParams::default();

        api.list(&list_params)
            .await
            .map(|list| list.items)
            .map_err(|e| match e {
                kube::Error::Api(ae) if ae.code == 403 => IngressError::Forbidden {
                    resource_type: "Node".to_string(),
                    message: ae.message,
                },
                kube::Error::Api(ae) if ae.code == 404 => {
                    IngressError::not_found("Node", "*", "")
                }
                other => IngressError::KubeError(other.to_string()),
            })
    }
}
