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

use crate::domain::config::{AppConfig, RequirementsConfig};
use crate::domain::ingress::locator::{
    has_load_balancer_host, EndpointLocator, LocateRequest, LocatedAddress,
};
use crate::domain::ingress::poll::poll_until;
use crate::domain::ingress::resolver::{Collaborators, DomainResolver, ResolveRequest, ResolverSettings};
use crate::domain::ingress::selector::{default_endpoint, IngressKind, ServiceRef};
use crate::domain::provider::{DiscoveryStrategy, ProviderTag};
use crate::infrastructure::constants::{
    CLUSTER_IP_NONE, DEFAULT_CLUSTER_NAMESPACE, INGRESS_WAIT_INTERVAL, INGRESS_WAIT_TIMEOUT,
    REGISTRY_SERVICE,
};
use crate::infrastructure::kubernetes::IngressKubeClient;
use crate::shared::error::IngressError;
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// How long to wait for the load balancer to be provisioned.
#[derive(Debug, Clone)]
pub struct DiscoverySettings {
    pub wait_timeout: Duration,
    pub wait_interval: Duration,
}

impl Default for DiscoverySettings {
    fn default() -> Self {
        Self {
            wait_timeout: INGRESS_WAIT_TIMEOUT,
            wait_interval: INGRESS_WAIT_INTERVAL,
        }
    }
}

/// Values given on the command line that take precedence over the
/// requirements file.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOverrides {
    pub provider: Option<String>,
    pub ingress_namespace: Option<String>,
    pub ingress_service: Option<String>,
    pub external_ip: Option<String>,
    pub node_port: bool,
    pub domain: Option<String>,
}

/// The outcome of a successful discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredDomain {
    pub domain: String,
    pub provider: ProviderTag,
    pub service: ServiceRef,
    pub address: Option<LocatedAddress>,
    /// Set when the container registry was defaulted from the cluster.
    pub registry: Option<String>,
}

pub struct IngressDomainDiscovery {
    client: Arc<dyn IngressKubeClient>,
    locator: EndpointLocator,
    resolver: DomainResolver,
    settings: DiscoverySettings,
}

impl IngressDomainDiscovery {
    pub fn new(
        collaborators: Collaborators,
        resolver_settings: ResolverSettings,
        settings: DiscoverySettings,
    ) -> Self {
        Self {
            client: collaborators.client.clone(),
            locator: EndpointLocator::new(collaborators.client.clone()),
            resolver: DomainResolver::new(collaborators, resolver_settings),
            settings,
        }
    }

    /// Fills in `ingress.domain` when it is empty.
    ///
    /// Returns `Ok(None)` without touching the cluster if a domain is
    /// already configured.
    pub async fn discover(
        &self,
        requirements: &mut RequirementsConfig,
        apps: &AppConfig,
        overrides: &DiscoveryOverrides,
    ) -> Result<Option<DiscoveredDomain>, IngressError> {
        if !requirements.ingress.domain.is_empty() {
            debug!(domain = %requirements.ingress.domain, "ingress domain already set");
            return Ok(None);
        }

        let provider_name = non_empty(overrides.provider.as_deref())
            .or_else(|| non_empty(Some(requirements.cluster.provider.as_str())))
            .unwrap_or_default();
        if provider_name.is_empty() {
            warn!("No provider configured");
        }
        let provider = ProviderTag::parse(provider_name);
        if provider.is_unknown() && !provider_name.is_empty() {
            warn!(provider = provider_name, "unknown provider, using the generic ingress discovery");
        }

        let service = self.service_ref(requirements, apps, overrides);
        let external_ip = non_empty(overrides.external_ip.as_deref())
            .or_else(|| non_empty(Some(requirements.ingress.external_ip.as_str())))
            .map(str::to_string);
        let node_port = overrides.node_port || requirements.ingress.is_node_port();

        let address = match provider.discovery_strategy() {
            DiscoveryStrategy::LocalHypervisor { .. } => {
                external_ip.as_deref().and_then(LocatedAddress::parse)
            }
            DiscoveryStrategy::ServiceEndpoint => {
                let request = LocateRequest {
                    service: &service,
                    provider: &provider,
                    external_ip: external_ip.as_deref(),
                    node_port,
                };
                Some(self.locate_or_wait(&request).await?)
            }
        };

        let request = ResolveRequest::new(provider.clone())
            .with_address(address.clone())
            .with_domain(overrides.domain.clone())
            .with_node_port(node_port)
            .with_cluster_name(Some(requirements.cluster.cluster_name.clone()));
        let domain = self.resolver.resolve(&request).await.map_err(|e| {
            e.with_context(format!("getting a domain for ingress service {}", service))
        })?;

        requirements.ingress.domain = domain.clone();
        let registry = self.default_registry(requirements, &provider).await;

        Ok(Some(DiscoveredDomain {
            domain,
            provider,
            service,
            address,
            registry,
        }))
    }

    /// Runs [`discover`](Self::discover) and saves the requirements to `path`
    /// when a domain was found.
    pub async fn discover_and_save(
        &self,
        requirements: &mut RequirementsConfig,
        apps: &AppConfig,
        overrides: &DiscoveryOverrides,
        path: &Path,
    ) -> Result<Option<DiscoveredDomain>, IngressError> {
        let discovered = self.discover(requirements, apps, overrides).await?;
        if let Some(found) = &discovered {
            requirements.save(path)?;
            info!(
                "defaulting the domain to {} and modified {}",
                found.domain.cyan(),
                path.display().to_string().cyan()
            );
        }
        Ok(discovered)
    }

    fn service_ref(
        &self,
        requirements: &RequirementsConfig,
        apps: &AppConfig,
        overrides: &DiscoveryOverrides,
    ) -> ServiceRef {
        let ingress = &requirements.ingress;
        let defaults = default_endpoint(IngressKind::parse(&ingress.kind), apps.app_names());

        let namespace = non_empty(overrides.ingress_namespace.as_deref())
            .or_else(|| non_empty(Some(ingress.namespace.as_str())))
            .map(str::to_string)
            .unwrap_or(defaults.namespace);
        let service = non_empty(overrides.ingress_service.as_deref())
            .or_else(|| non_empty(Some(ingress.service.as_str())))
            .map(str::to_string)
            .unwrap_or(defaults.service);

        ServiceRef::new(namespace, service)
    }

    async fn locate_or_wait(
        &self,
        request: &LocateRequest<'_>,
    ) -> Result<LocatedAddress, IngressError> {
        let service = request.service;
        let context = || format!("getting a domain for ingress service {}", service);

        if let Some(address) = self.locator.locate(request).await.map_err(|e| e.with_context(context()))? {
            return Ok(address);
        }

        match self.wait_for_ingress_host(service).await {
            Ok(_) => {}
            Err(IngressError::Timeout(reason)) => {
                warn!("could not find host for ingress service {}", service);
                return Err(IngressError::discovery_failed(
                    &service.namespace,
                    &service.service,
                    reason,
                ));
            }
            Err(e) => return Err(e.with_context(context())),
        }

        self.locator
            .locate(request)
            .await
            .map_err(|e| e.with_context(context()))?
            .ok_or_else(|| {
                IngressError::discovery_failed(
                    &service.namespace,
                    &service.service,
                    "the service has no external address",
                )
            })
    }

    /// Polls the service until its load balancer reports a hostname or IP.
    pub async fn wait_for_ingress_host(&self, service: &ServiceRef) -> Result<bool, IngressError> {
        let notice = format!(
            "waiting for external Host on the ingress service {} in namespace {} ...",
            service.service, service.namespace
        );
        let client = self.client.clone();

        poll_until(
            self.settings.wait_timeout,
            self.settings.wait_interval,
            &notice,
            || {
                let client = client.clone();
                async move {
                    let svc = client
                        .get_service(&service.namespace, &service.service)
                        .await?;
                    Ok(has_load_balancer_host(&svc))
                }
            },
        )
        .await
    }

    // Only for plain kubernetes clusters; failures here never fail discovery.
    async fn default_registry(
        &self,
        requirements: &mut RequirementsConfig,
        provider: &ProviderTag,
    ) -> Option<String> {
        let cluster = &mut requirements.cluster;
        if *provider != ProviderTag::Kubernetes || !cluster.registry.is_empty() {
            return None;
        }
        if cluster.namespace.is_empty() {
            cluster.namespace = DEFAULT_CLUSTER_NAMESPACE.to_string();
        }

        let cluster_ip = match self.client.get_service(&cluster.namespace, REGISTRY_SERVICE).await {
            Ok(svc) => svc.spec.and_then(|spec| spec.cluster_ip),
            Err(e) => {
                warn!(error = %e, namespace = %cluster.namespace, "failed to look up the {} service", REGISTRY_SERVICE);
                None
            }
        };

        match cluster_ip.filter(|ip| !ip.is_empty() && ip != CLUSTER_IP_NONE) {
            Some(ip) => {
                info!("defaulting the container registry to {}", ip.cyan());
                cluster.registry = ip.clone();
                Some(ip)
            }
            None => {
                warn!(
                    "could not find the clusterIP for the service {} in the namespace {} so that we could default the container registry host",
                    REGISTRY_SERVICE, cluster.namespace
                );
                None
            }
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
