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

//! Turns a located address into the ingress domain.
//!
//! Provider policy runs first (AWS alias registration, the IBM default
//! domain); anything that falls through gets a magic DNS domain on the
//! ingress IP, which the user may override interactively.

use crate::domain::ingress::locator::LocatedAddress;
use crate::domain::provider::{DiscoveryStrategy, DomainPolicy, ProviderTag};
use crate::infrastructure::aws::{AwsCliRegistrar, DomainRegistrar};
use crate::infrastructure::command::{command_line, CommandRunner, ShellCommandRunner};
use crate::infrastructure::constants::{
    AWS_HOSTNAME_SUFFIX, DNS_RESOLVE_ATTEMPTS, DNS_RESOLVE_DELAY, ENV_INTERPRET_PIPELINE,
    ENV_KUBERNETES_SERVICE_HOST, IKS_DOMAIN_SUFFIX, IKS_REGION_LABEL, MAGIC_DNS_SUFFIX,
    ROUTE53_REGISTRATION_URL, TOPOLOGY_REGION_LABEL,
};
use crate::infrastructure::dns::{first_public_ip, HostResolver, SystemHostResolver};
use crate::infrastructure::kubernetes::IngressKubeClient;
use crate::infrastructure::prompt::{validate_domain_answer, BatchPrompter, Prompter, StdioPrompter};
use crate::shared::error::IngressError;
use backon::{ConstantBuilder, Retryable};
use colored::Colorize;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

const AWS_ALIAS_QUESTION: &str =
    "Would you like to register a wildcard DNS ALIAS to point at this ELB address? ";
const AWS_ALIAS_HELP: &str = "When using AWS we need to use a wildcard DNS alias to point at the ELB host name so you can access services inside the cluster and in your Environments.";
const RESOLVE_QUESTION: &str =
    "Would you like wait and resolve this address to an IP address and use it for the domain?";
const DOMAIN_HELP: &str =
    "Enter your custom domain that is used to generate Ingress rules, defaults to the magic DNS nip.io";

/// Runtime switches for resolution.
#[derive(Debug, Clone)]
pub struct ResolverSettings {
    pub batch_mode: bool,
    /// Running inside the cluster or an interpreted pipeline.
    pub in_cluster_bootstrap: bool,
    pub dns_attempts: usize,
    pub dns_delay: Duration,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            batch_mode: false,
            in_cluster_bootstrap: false,
            dns_attempts: DNS_RESOLVE_ATTEMPTS,
            dns_delay: DNS_RESOLVE_DELAY,
        }
    }
}

impl ResolverSettings {
    pub fn from_env(batch_mode: bool) -> Self {
        let in_cluster = std::env::var_os(ENV_KUBERNETES_SERVICE_HOST)
            .is_some_and(|host| !host.is_empty());
        let interpret_pipeline = std::env::var(ENV_INTERPRET_PIPELINE)
            .map(|value| value == "true")
            .unwrap_or(false);

        Self {
            batch_mode,
            in_cluster_bootstrap: in_cluster || interpret_pipeline,
            ..Default::default()
        }
    }
}

/// Everything resolution talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub client: Arc<dyn IngressKubeClient>,
    pub runner: Arc<dyn CommandRunner>,
    pub prompter: Arc<dyn Prompter>,
    pub registrar: Arc<dyn DomainRegistrar>,
    pub host_resolver: Arc<dyn HostResolver>,
}

impl Collaborators {
    /// Real shell, DNS and AWS CLI; the terminal only when not in batch mode.
    pub fn system(client: Arc<dyn IngressKubeClient>, batch_mode: bool) -> Self {
        let runner: Arc<dyn CommandRunner> = Arc::new(ShellCommandRunner::new());
        let prompter: Arc<dyn Prompter> = if batch_mode {
            Arc::new(BatchPrompter)
        } else {
            Arc::new(StdioPrompter::new())
        };

        Self {
            client,
            registrar: Arc::new(AwsCliRegistrar::new(runner.clone())),
            runner,
            prompter,
            host_resolver: Arc::new(SystemHostResolver),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolveRequest {
    pub provider: ProviderTag,
    pub address: Option<LocatedAddress>,
    /// Domain given by the user, if any.
    pub domain: Option<String>,
    pub node_port: bool,
    pub cluster_name: Option<String>,
}

impl ResolveRequest {
    pub fn new(provider: ProviderTag) -> Self {
        Self {
            provider,
            address: None,
            domain: None,
            node_port: false,
            cluster_name: None,
        }
    }

    pub fn with_address(mut self, address: Option<LocatedAddress>) -> Self {
        self.address = address;
        self
    }

    pub fn with_domain(mut self, domain: Option<String>) -> Self {
        self.domain = domain.filter(|d| !d.trim().is_empty());
        self
    }

    pub fn with_node_port(mut self, node_port: bool) -> Self {
        self.node_port = node_port;
        self
    }

    pub fn with_cluster_name(mut self, cluster_name: Option<String>) -> Self {
        self.cluster_name = cluster_name.filter(|n| !n.is_empty());
        self
    }
}

pub struct DomainResolver {
    collaborators: Collaborators,
    settings: ResolverSettings,
}

impl DomainResolver {
    pub fn new(collaborators: Collaborators, settings: ResolverSettings) -> Self {
        Self {
            collaborators,
            settings,
        }
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    pub async fn resolve(&self, request: &ResolveRequest) -> Result<String, IngressError> {
        let provider = &request.provider;
        let mut address = request.address.clone();

        if let DiscoveryStrategy::LocalHypervisor { command } = provider.discovery_strategy() {
            if address.is_none() {
                address = Some(self.hypervisor_ip(command).await?);
            }
        }

        let address_text = address.as_ref().map(ToString::to_string).unwrap_or_default();
        let explicit = request.domain.as_deref();

        let chosen = match provider.domain_policy() {
            DomainPolicy::AwsAlias => self.aws_alias(provider, explicit, &address_text).await?,
            DomainPolicy::IbmDefault => {
                self.ibm_default(explicit, request.cluster_name.as_deref(), &address_text)
                    .await
            }
            DomainPolicy::Generic => None,
        };
        if let Some(domain) = chosen {
            return Ok(domain);
        }

        let node_port = request.node_port || address.as_ref().is_some_and(LocatedAddress::is_node_port);
        let (default_domain, address_text) = match address.as_ref() {
            Some(address) if !node_port => self.magic_default(address).await?,
            _ => (address_text.clone(), address_text),
        };

        let domain = self.choose_domain(explicit, default_domain, &address_text)?;
        if domain.is_empty() {
            return Err(IngressError::NoDomain(provider.to_string()));
        }
        Ok(domain)
    }

    async fn hypervisor_ip(&self, command: &str) -> Result<LocatedAddress, IngressError> {
        let output = self.collaborators.runner.output(command, &["ip"]).await?;
        LocatedAddress::parse(&output).ok_or_else(|| {
            IngressError::command(command_line(command, &["ip"]), "returned no address")
        })
    }

    async fn aws_alias(
        &self,
        provider: &ProviderTag,
        explicit: Option<&str>,
        address: &str,
    ) -> Result<Option<String>, IngressError> {
        if let Some(domain) = explicit {
            self.collaborators
                .registrar
                .register_wildcard_alias(domain, address)
                .await?;
            return Ok(Some(domain.to_string()));
        }

        if self.settings.in_cluster_bootstrap {
            debug!("in-cluster bootstrap, skipping the custom DNS name prompt");
            return Ok(None);
        }

        info!("On AWS we recommend using a custom DNS name to access services in your Kubernetes cluster to ensure you can use all of your Availability Zones");
        info!(
            "If you do not have a custom DNS name you can use yet, then you can register a new one here: {}",
            ROUTE53_REGISTRATION_URL.cyan()
        );

        if self.settings.batch_mode {
            return Err(IngressError::MissingDomain {
                provider: provider.to_string(),
            });
        }

        let prompter = &self.collaborators.prompter;
        let help = format!(
            "Enter your custom domain that we can use to setup a Route 53 ALIAS record to point at the ELB host: {}",
            address
        );
        while prompter.confirm(AWS_ALIAS_QUESTION, true, AWS_ALIAS_HELP)? {
            let answer = prompter.ask_domain("Your custom DNS name: ", None, &help)?;
            let custom = answer.trim();
            if !custom.is_empty() {
                self.collaborators
                    .registrar
                    .register_wildcard_alias(custom, address)
                    .await?;
                return Ok(Some(custom.to_string()));
            }
        }
        Ok(None)
    }

    async fn ibm_default(
        &self,
        explicit: Option<&str>,
        cluster_name: Option<&str>,
        address: &str,
    ) -> Option<String> {
        if let Some(domain) = explicit {
            info!(
                "IBM Kubernetes Service will use provided domain. Ensure name is registered with DNS (ex. CIS) and pointing the cluster ingress IP: {}",
                address.cyan()
            );
            return Some(domain.to_string());
        }

        let region = match self.cluster_region().await {
            Ok(region) => region,
            Err(e) => {
                warn!(error = %e, "failed to read the IBM Kubernetes Service region from the nodes");
                None
            }
        };

        match (cluster_name, region) {
            (Some(name), Some(region)) => {
                let domain = format!("{}.{}.{}", name, region, IKS_DOMAIN_SUFFIX);
                info!(
                    "IBM Kubernetes Service will use the default cluster domain: {}",
                    domain.cyan()
                );
                Some(domain)
            }
            (name, region) => {
                warn!(
                    cluster_name = name.unwrap_or_default(),
                    region = region.as_deref().unwrap_or_default(),
                    "cannot build the IBM Kubernetes Service default cluster domain"
                );
                None
            }
        }
    }

    async fn cluster_region(&self) -> Result<Option<String>, IngressError> {
        let nodes = self.collaborators.client.list_nodes().await?;
        Ok(nodes.iter().find_map(|node| {
            let labels = node.metadata.labels.as_ref()?;
            labels
                .get(IKS_REGION_LABEL)
                .or_else(|| labels.get(TOPOLOGY_REGION_LABEL))
                .filter(|region| !region.is_empty())
                .cloned()
        }))
    }

    /// Default domain and the address it points at, after any hostname lookup.
    async fn magic_default(
        &self,
        address: &LocatedAddress,
    ) -> Result<(String, String), IngressError> {
        let ip = match address {
            LocatedAddress::Ip(ip) => Some(*ip),
            LocatedAddress::Hostname(host) => self.resolve_hostname(host).await?,
            LocatedAddress::NodePort { .. } => None,
        };

        match ip {
            Some(ip) => {
                let address = ip.to_string();
                let domain = magic_dns_domain(&address).unwrap_or_else(|| address.clone());
                Ok((domain, address))
            }
            None => {
                let address = address.to_string();
                Ok((address.clone(), address))
            }
        }
    }

    async fn resolve_hostname(&self, host: &str) -> Result<Option<IpAddr>, IngressError> {
        info!(
            "The Ingress address {} is not an IP address. We recommend we try resolve it to a public IP address and use that for the domain to access services externally.",
            host.cyan()
        );

        let resolve = self.settings.batch_mode
            || self.collaborators.prompter.confirm(
                RESOLVE_QUESTION,
                true,
                &format!(
                    "Should we convert {} to an IP address so we can access resources externally",
                    host
                ),
            )?;

        let resolved = if resolve {
            info!("Waiting for {} to be resolvable to an IP address...", host.cyan());
            self.lookup_with_retry(host).await
        } else {
            None
        };

        match resolved {
            Some(ip) => {
                info!("{} resolved to IP {}", host.cyan(), ip.to_string().cyan());
                Ok(Some(ip))
            }
            None => {
                warn!(
                    "Still not managed to resolve address {} into an IP address. Please try figure out the domain by hand",
                    host
                );
                Ok(None)
            }
        }
    }

    async fn lookup_with_retry(&self, host: &str) -> Option<IpAddr> {
        let resolver = self.collaborators.host_resolver.clone();
        let owned = host.to_string();
        let lookup = || {
            let resolver = resolver.clone();
            let host = owned.clone();
            async move {
                let ips = resolver.lookup_ip(&host).await?;
                first_public_ip(&ips).ok_or(IngressError::Unresolved(host))
            }
        };

        let backoff = ConstantBuilder::default()
            .with_delay(self.settings.dns_delay)
            .with_max_times(self.settings.dns_attempts.saturating_sub(1));

        lookup
            .retry(backoff)
            .sleep(tokio::time::sleep)
            .notify(|err: &IngressError, dur: Duration| {
                debug!(error = %err, "lookup of {} failed, retrying in {:?}", host, dur);
            })
            .await
            .ok()
    }

    fn choose_domain(
        &self,
        explicit: Option<&str>,
        default_domain: String,
        address: &str,
    ) -> Result<String, IngressError> {
        if let Some(domain) = explicit {
            if domain != default_domain {
                info!(
                    "You can now configure your wildcard DNS {} to point to {}",
                    domain, address
                );
            }
            return Ok(domain.to_string());
        }

        if self.settings.batch_mode {
            info!(
                "No domain flag provided so using default {} to generate Ingress rules",
                default_domain
            );
            return Ok(default_domain);
        }

        info!(
            "You can now configure a wildcard DNS pointing to the new Load Balancer address {}",
            address.cyan()
        );
        info!(
            "If you don't have a wildcard DNS setup then create a DNS (A) record and point it at: {}, then use the DNS domain in the next input...",
            address.cyan()
        );
        info!("If you do not have a custom domain setup yet, Ingress rules will be set for magic DNS nip.io.");

        let default = Some(default_domain.as_str()).filter(|d| !d.is_empty());
        let answer = self
            .collaborators
            .prompter
            .ask_domain("Domain", default, DOMAIN_HELP)?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Ok(default_domain);
        }
        validate_domain_answer(answer).map_err(IngressError::ValidationError)?;
        Ok(answer.to_string())
    }
}

/// `<address>.nip.io`, except for AWS load balancer host names and IPv6
/// addresses, which nip.io cannot embed.
pub fn magic_dns_domain(address: &str) -> Option<String> {
    if address.is_empty() || address.ends_with(AWS_HOSTNAME_SUFFIX) {
        return None;
    }
    if matches!(address.parse::<IpAddr>(), Ok(IpAddr::V6(_))) {
        warn!(address, "no magic DNS domain for an IPv6 address, using the address itself");
        return None;
    }
    Some(format!("{}.{}", address, MAGIC_DNS_SUFFIX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_dns_domain() {
        assert_eq!(
            magic_dns_domain("35.205.151.95").as_deref(),
            Some("35.205.151.95.nip.io")
        );
        assert_eq!(magic_dns_domain("a1b2.elb.us-east-1.amazonaws.com"), None);
        assert_eq!(magic_dns_domain(""), None);
    }

    #[test]
    fn test_magic_dns_domain_skips_ipv6() {
        assert_eq!(magic_dns_domain("2001:db8::1"), None);
        assert_eq!(magic_dns_domain("::ffff:10.0.0.1"), None);
    }

    #[test]
    fn test_default_settings() {
        let settings = ResolverSettings::default();
        assert!(!settings.batch_mode);
        assert!(!settings.in_cluster_bootstrap);
        assert_eq!(settings.dns_attempts, 5);
        assert_eq!(settings.dns_delay, Duration::from_secs(10));
    }

    #[test]
    fn test_request_drops_blank_values() {
        let request = ResolveRequest::new(ProviderTag::Gke)
            .with_domain(Some("  ".to_string()))
            .with_cluster_name(Some(String::new()));
        assert!(request.domain.is_none());
        assert!(request.cluster_name.is_none());

        let request = ResolveRequest::new(ProviderTag::Gke).with_domain(Some("example.com".into()));
        assert_eq!(request.domain.as_deref(), Some("example.com"));
    }
}
