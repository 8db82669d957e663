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

//! Kubernetes providers and the discovery behavior each one selects

use std::fmt;

/// The substrate a cluster runs on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProviderTag {
    Aks,
    Alibaba,
    Aws,
    Eks,
    Gke,
    Icp,
    Iks,
    Kind,
    Kubernetes,
    Minikube,
    Minishift,
    Oke,
    Openshift,
    Pks,
    Unknown(String),
}

/// Every known provider, in declaration order.
pub const KUBERNETES_PROVIDERS: [ProviderTag; 14] = [
    ProviderTag::Aks,
    ProviderTag::Alibaba,
    ProviderTag::Aws,
    ProviderTag::Eks,
    ProviderTag::Gke,
    ProviderTag::Kind,
    ProviderTag::Kubernetes,
    ProviderTag::Icp,
    ProviderTag::Iks,
    ProviderTag::Oke,
    ProviderTag::Openshift,
    ProviderTag::Minikube,
    ProviderTag::Minishift,
    ProviderTag::Pks,
];

/// How the raw ingress address is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryStrategy {
    /// Ask a single-node hypervisor CLI for its IP (`<command> ip`).
    LocalHypervisor { command: &'static str },
    /// Read the ingress controller service from the cluster API.
    ServiceEndpoint,
}

/// How a located address becomes a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainPolicy {
    /// Custom domain mandatory in batch mode, registered as a Route 53 wildcard.
    AwsAlias,
    /// `<cluster>.<region>.containers.appdomain.cloud` unless a domain is given.
    IbmDefault,
    /// Magic DNS on the ingress IP.
    Generic,
}

impl ProviderTag {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "aks" => Self::Aks,
            "alibaba" => Self::Alibaba,
            "aws" => Self::Aws,
            "eks" => Self::Eks,
            "gke" => Self::Gke,
            "icp" => Self::Icp,
            "iks" => Self::Iks,
            "kind" => Self::Kind,
            "kubernetes" => Self::Kubernetes,
            "minikube" => Self::Minikube,
            "minishift" => Self::Minishift,
            "oke" => Self::Oke,
            "openshift" => Self::Openshift,
            "pks" => Self::Pks,
            _ => Self::Unknown(value.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Aks => "aks",
            Self::Alibaba => "alibaba",
            Self::Aws => "aws",
            Self::Eks => "eks",
            Self::Gke => "gke",
            Self::Icp => "icp",
            Self::Iks => "iks",
            Self::Kind => "kind",
            Self::Kubernetes => "kubernetes",
            Self::Minikube => "minikube",
            Self::Minishift => "minishift",
            Self::Oke => "oke",
            Self::Openshift => "openshift",
            Self::Pks => "pks",
            Self::Unknown(name) => name,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }

    pub fn discovery_strategy(&self) -> DiscoveryStrategy {
        match self {
            Self::Minikube => DiscoveryStrategy::LocalHypervisor {
                command: "minikube",
            },
            Self::Minishift => DiscoveryStrategy::LocalHypervisor {
                command: "minishift",
            },
            Self::Aks
            | Self::Alibaba
            | Self::Aws
            | Self::Eks
            | Self::Gke
            | Self::Icp
            | Self::Iks
            | Self::Kind
            | Self::Kubernetes
            | Self::Oke
            | Self::Openshift
            | Self::Pks
            | Self::Unknown(_) => DiscoveryStrategy::ServiceEndpoint,
        }
    }

    pub fn domain_policy(&self) -> DomainPolicy {
        match self {
            Self::Aws | Self::Eks => DomainPolicy::AwsAlias,
            Self::Iks => DomainPolicy::IbmDefault,
            _ => DomainPolicy::Generic,
        }
    }
}

impl From<&str> for ProviderTag {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl fmt::Display for ProviderTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// All provider ids, sorted and comma separated, for flag help.
pub fn provider_options() -> String {
    let mut values: Vec<&str> = KUBERNETES_PROVIDERS.iter().map(|p| p.as_str()).collect();
    values.sort_unstable();
    values.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_known_providers() {
        for provider in KUBERNETES_PROVIDERS.iter() {
            assert_eq!(&ProviderTag::parse(provider.as_str()), provider);
        }
        assert_eq!(ProviderTag::parse("GKE"), ProviderTag::Gke);
        assert_eq!(ProviderTag::parse(" eks "), ProviderTag::Eks);
    }

    #[test]
    fn test_unknown_provider_is_kept() {
        let provider = ProviderTag::parse("digitalocean");
        assert!(provider.is_unknown());
        assert_eq!(provider.to_string(), "digitalocean");
        assert_eq!(provider.discovery_strategy(), DiscoveryStrategy::ServiceEndpoint);
        assert_eq!(provider.domain_policy(), DomainPolicy::Generic);
    }

    #[test]
    fn test_strategy_selection() {
        assert_eq!(
            ProviderTag::Minikube.discovery_strategy(),
            DiscoveryStrategy::LocalHypervisor {
                command: "minikube"
            }
        );
        assert_eq!(
            ProviderTag::Minishift.discovery_strategy(),
            DiscoveryStrategy::LocalHypervisor {
                command: "minishift"
            }
        );
        assert_eq!(
            ProviderTag::Kubernetes.discovery_strategy(),
            DiscoveryStrategy::ServiceEndpoint
        );
    }

    #[test]
    fn test_domain_policy_selection() {
        assert_eq!(ProviderTag::Aws.domain_policy(), DomainPolicy::AwsAlias);
        assert_eq!(ProviderTag::Eks.domain_policy(), DomainPolicy::AwsAlias);
        assert_eq!(ProviderTag::Iks.domain_policy(), DomainPolicy::IbmDefault);
        assert_eq!(ProviderTag::Gke.domain_policy(), DomainPolicy::Generic);
        assert_eq!(ProviderTag::Minikube.domain_policy(), DomainPolicy::Generic);
    }

    #[test]
    fn test_provider_options_sorted() {
        let options = provider_options();
        assert!(options.starts_with("aks, alibaba, aws, eks, gke"));
        assert!(options.ends_with("openshift, pks"));
    }
}
