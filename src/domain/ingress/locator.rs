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

//! Finds the raw address the ingress controller is reachable on

use crate::domain::ingress::selector::ServiceRef;
use crate::domain::provider::ProviderTag;
use crate::infrastructure::constants::{
    NODE_ADDRESS_EXTERNAL_IP, ON_PREMISE_INGRESS_DOCS, SERVICE_TYPE_NODE_PORT,
};
use crate::infrastructure::kubernetes::IngressKubeClient;
use crate::shared::error::IngressError;
use colored::Colorize;
use k8s_openapi::api::core::v1::{Node, Service};
use std::fmt;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{info, warn};

/// An address as discovered, before any domain policy is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocatedAddress {
    Ip(IpAddr),
    Hostname(String),
    NodePort { host: String, port: i32 },
}

impl LocatedAddress {
    /// Classifies a bare address string as an IP literal or a hostname.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        Some(match value.parse::<IpAddr>() {
            Ok(ip) => Self::Ip(ip),
            Err(_) => Self::Hostname(value.to_string()),
        })
    }

    pub fn is_node_port(&self) -> bool {
        matches!(self, Self::NodePort { .. })
    }
}

impl fmt::Display for LocatedAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ip(ip) => write!(f, "{}", ip),
            Self::Hostname(host) => f.write_str(host),
            Self::NodePort { host, port } => write!(f, "{}:{}", host, port),
        }
    }
}

/// What to look for.
#[derive(Debug, Clone)]
pub struct LocateRequest<'a> {
    pub service: &'a ServiceRef,
    pub provider: &'a ProviderTag,
    pub external_ip: Option<&'a str>,
    pub node_port: bool,
}

pub struct EndpointLocator {
    client: Arc<dyn IngressKubeClient>,
}

impl EndpointLocator {
    pub fn new(client: Arc<dyn IngressKubeClient>) -> Self {
        Self { client }
    }

    /// Reads the service once and derives its external address.
    ///
    /// `Ok(None)` means the address is not known yet (or cannot be seen with
    /// the current permissions); a missing service is an error.
    pub async fn locate(
        &self,
        request: &LocateRequest<'_>,
    ) -> Result<Option<LocatedAddress>, IngressError> {
        let ServiceRef { namespace, service } = request.service;
        info!(
            "Waiting to find the external host name of the ingress controller Service in namespace {} with name {}",
            namespace.cyan(),
            service.cyan()
        );
        if *request.provider == ProviderTag::Kubernetes && request.external_ip.is_none() {
            info!(
                "If you are installing on premise you can specify 'ingress.externalIP' in the requirements file to configure the external ingress host for NodePort based ingress. See: {}",
                ON_PREMISE_INGRESS_DOCS.cyan()
            );
        }

        let svc = self.client.get_service(namespace, service).await?;

        let mut address = request.external_ip.and_then(LocatedAddress::parse);
        if let Some(found) = load_balancer_address(&svc) {
            address = Some(found);
        }

        if request.node_port || is_node_port_service(&svc) {
            let external_ip = match request.external_ip {
                Some(ip) => Some(ip.to_string()),
                None => self.first_external_node_ip().await?,
            };

            if let (Some(host), Some(port)) = (external_ip, last_node_port(&svc)) {
                address = Some(LocatedAddress::NodePort { host, port });
            }
        }

        Ok(address)
    }

    async fn first_external_node_ip(&self) -> Result<Option<String>, IngressError> {
        match self.client.list_nodes().await {
            Ok(nodes) => {
                let found = first_external_ip(&nodes);
                if found.is_none() {
                    warn!("no Node has an ExternalIP address; specify 'ingress.externalIP' to expose NodePort ingress");
                }
                Ok(found)
            }
            Err(e @ IngressError::Forbidden { .. }) | Err(e @ IngressError::NotFound { .. }) => {
                warn!(error = %e, "cannot list Nodes to find an externalIP, probably due to RBAC");
                Ok(None)
            }
            Err(e) => Err(e.with_context(
                "no externalIP specified and failed to find a Node externalIP",
            )),
        }
    }
}

fn is_node_port_service(svc: &Service) -> bool {
    svc.spec
        .as_ref()
        .and_then(|spec| spec.type_.as_deref())
        == Some(SERVICE_TYPE_NODE_PORT)
}

/// Scans load balancer ingress entries: IP beats hostname inside an entry and
/// the last entry with either wins.
pub fn load_balancer_address(svc: &Service) -> Option<LocatedAddress> {
    let ingresses = svc
        .status
        .as_ref()
        .and_then(|status| status.load_balancer.as_ref())
        .and_then(|lb| lb.ingress.as_ref())?;

    let mut address = None;
    for ingress in ingresses {
        if let Some(ip) = ingress.ip.as_deref().filter(|ip| !ip.is_empty()) {
            address = LocatedAddress::parse(ip);
        } else if let Some(host) = ingress.hostname.as_deref().filter(|h| !h.is_empty()) {
            address = LocatedAddress::parse(host);
        }
    }
    address
}

/// True once the load balancer reports any hostname or IP.
pub fn has_load_balancer_host(svc: &Service) -> bool {
    svc.status
        .as_ref()
        .and_then(|status| status.load_balancer.as_ref())
        .and_then(|lb| lb.ingress.as_ref())
        .map(|ingresses| {
            ingresses.iter().any(|ingress| {
                ingress.hostname.as_deref().is_some_and(|h| !h.is_empty())
                    || ingress.ip.as_deref().is_some_and(|ip| !ip.is_empty())
            })
        })
        .unwrap_or(false)
}

// Last non-zero nodePort in port order. A named port match may be the intent.
fn last_node_port(svc: &Service) -> Option<i32> {
    svc.spec
        .as_ref()
        .and_then(|spec| spec.ports.as_ref())
        .and_then(|ports| {
            ports
                .iter()
                .filter_map(|p| p.node_port)
                .filter(|port| *port != 0)
                .last()
        })
}

fn first_external_ip(nodes: &[Node]) -> Option<String> {
    nodes
        .iter()
        .filter_map(|node| node.status.as_ref())
        .filter_map(|status| status.addresses.as_ref())
        .flatten()
        .find(|addr| addr.type_ == NODE_ADDRESS_EXTERNAL_IP && !addr.address.is_empty())
        .map(|addr| addr.address.clone())
}
