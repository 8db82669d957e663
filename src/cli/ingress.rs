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

//! Ingress domain commands

use crate::cli::display::{DomainSummary, TableRenderer};
use crate::domain::config::{AppConfig, RequirementsConfig};
use crate::domain::ingress::{
    verify_ingress, Collaborators, DiscoveryOverrides, DiscoverySettings, IngressDomainDiscovery,
    ResolverSettings,
};
use crate::domain::provider::{provider_options, KUBERNETES_PROVIDERS};
use crate::infrastructure::kubernetes::IngressKubeClientImpl;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

/// Flags shared by every command that talks to the cluster
#[derive(Parser, Debug, Clone, Default)]
pub struct ClusterArgs {
    /// Directory to look for the jx-requirements.yml file (parent directories are searched too)
    #[arg(long, short = 'd', default_value = ".")]
    pub dir: PathBuf,

    #[arg(long, help = format!("Cloud service providing the Kubernetes cluster. Supported providers: {}", provider_options()))]
    pub provider: Option<String>,

    /// The namespace for the Ingress controller
    #[arg(long)]
    pub ingress_namespace: Option<String>,

    /// The name of the Ingress controller Service
    #[arg(long)]
    pub ingress_service: Option<String>,

    /// Never prompt; take defaults and fail when an answer is required
    #[arg(long, short = 'b')]
    pub batch_mode: bool,

    /// Path to kubeconfig file
    /// If not specified, uses default kubeconfig resolution (KUBECONFIG env or ~/.kube/config)
    #[arg(long)]
    pub kubeconfig: Option<String>,

    /// Kubernetes context to use
    /// If not specified, uses current context from kubeconfig
    #[arg(long)]
    pub context: Option<String>,
}

impl ClusterArgs {
    async fn discovery(&self) -> anyhow::Result<IngressDomainDiscovery> {
        let client =
            IngressKubeClientImpl::new_with_config(self.kubeconfig.clone(), self.context.clone())
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create Kubernetes client: {}", e))?;

        Ok(IngressDomainDiscovery::new(
            Collaborators::system(Arc::new(client), self.batch_mode),
            ResolverSettings::from_env(self.batch_mode),
            DiscoverySettings::default(),
        ))
    }

    fn overrides(&self) -> DiscoveryOverrides {
        DiscoveryOverrides {
            provider: self.provider.clone(),
            ingress_namespace: self.ingress_namespace.clone(),
            ingress_service: self.ingress_service.clone(),
            ..Default::default()
        }
    }
}

/// Verify the ingress setup, discovering the domain when none is configured
#[derive(Parser, Debug, Clone)]
pub struct VerifyCommand {
    #[command(flatten)]
    pub cluster: ClusterArgs,
}

impl VerifyCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let discovery = self.cluster.discovery().await?;

        let outcome = verify_ingress(&self.cluster.dir, &self.cluster.overrides(), &discovery)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to verify ingress: {}", e))?;

        let summary =
            DomainSummary::from_requirements(&outcome.requirements, outcome.discovered.as_ref())
                .with_path(outcome.path.display().to_string());
        println!("{}", TableRenderer::new().render_domain_summary(&summary));
        Ok(())
    }
}

/// Resolve the ingress domain and print it
#[derive(Parser, Debug, Clone)]
pub struct DomainCommand {
    #[command(flatten)]
    pub cluster: ClusterArgs,

    /// Use this address instead of looking it up (e.g. a node IP for NodePort ingress)
    #[arg(long)]
    pub external_ip: Option<String>,

    /// The ingress controller is exposed through a NodePort Service
    #[arg(long)]
    pub node_port: bool,

    /// Use this domain instead of generating one
    #[arg(long)]
    pub domain: Option<String>,

    /// Cluster name, used for the IBM Kubernetes Service default domain
    #[arg(long)]
    pub cluster_name: Option<String>,

    /// Write the resolved domain back to jx-requirements.yml
    #[arg(long)]
    pub save: bool,

    /// Print only the domain
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl DomainCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let (mut requirements, path) = RequirementsConfig::load(&self.cluster.dir)
            .map_err(|e| anyhow::anyhow!("Failed to load requirements: {}", e))?;
        let (apps, _) = AppConfig::load(&self.cluster.dir)
            .map_err(|e| anyhow::anyhow!("Failed to load apps: {}", e))?;

        if let Some(name) = self.cluster_name.as_ref().filter(|n| !n.is_empty()) {
            requirements.cluster.cluster_name = name.clone();
        }

        let overrides = DiscoveryOverrides {
            external_ip: self.external_ip.clone(),
            node_port: self.node_port,
            domain: self.domain.clone(),
            ..self.cluster.overrides()
        };

        let discovery = self.cluster.discovery().await?;
        let discovered = if self.save {
            discovery
                .discover_and_save(&mut requirements, &apps, &overrides, &path)
                .await
        } else {
            discovery.discover(&mut requirements, &apps, &overrides).await
        }
        .map_err(|e| anyhow::anyhow!("Failed to discover the Ingress domain: {}", e))?;

        if self.quiet {
            println!("{}", requirements.ingress.domain);
            return Ok(());
        }

        let mut summary = DomainSummary::from_requirements(&requirements, discovered.as_ref());
        if self.save {
            summary = summary.with_path(path.display().to_string());
        }
        println!("{}", TableRenderer::new().render_domain_summary(&summary));
        Ok(())
    }
}

/// List the supported Kubernetes providers
#[derive(Parser, Debug, Clone)]
pub struct ProvidersCommand {}

impl ProvidersCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        println!("{}", TableRenderer::new().render_providers(&KUBERNETES_PROVIDERS));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        domain: DomainCommand,
    }

    #[test]
    fn test_domain_flags() {
        let cli = TestCli::parse_from([
            "test",
            "--provider",
            "gke",
            "--external-ip",
            "1.2.3.4",
            "--node-port",
            "--batch-mode",
            "--ingress-namespace",
            "kube-system",
        ]);
        let cmd = cli.domain;
        assert_eq!(cmd.cluster.provider.as_deref(), Some("gke"));
        assert_eq!(cmd.external_ip.as_deref(), Some("1.2.3.4"));
        assert!(cmd.node_port);
        assert!(cmd.cluster.batch_mode);
        assert_eq!(cmd.cluster.dir, PathBuf::from("."));

        let overrides = cmd.cluster.overrides();
        assert_eq!(overrides.ingress_namespace.as_deref(), Some("kube-system"));
        assert!(overrides.ingress_service.is_none());
    }
}
