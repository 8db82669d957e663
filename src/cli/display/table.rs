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

//! Table rendering for CLI output

use super::{ColorTheme, StatusIcon};
use crate::domain::config::RequirementsConfig;
use crate::domain::ingress::DiscoveredDomain;
use crate::domain::provider::{DiscoveryStrategy, DomainPolicy, ProviderTag};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Color, ContentArrangement, Table};

/// What ended up in the requirements, for the summary table
#[derive(Debug, Clone, Default)]
pub struct DomainSummary {
    pub domain: String,
    pub provider: String,
    pub service: Option<String>,
    pub address: Option<String>,
    pub registry: Option<String>,
    pub tls_enabled: bool,
    pub path: Option<String>,
    /// False when the domain was already configured
    pub discovered: bool,
}

impl DomainSummary {
    pub fn from_requirements(
        requirements: &RequirementsConfig,
        discovered: Option<&DiscoveredDomain>,
    ) -> Self {
        let non_empty = |s: &str| Some(s.to_string()).filter(|s| !s.is_empty());
        Self {
            domain: requirements.ingress.domain.clone(),
            provider: discovered
                .map(|d| d.provider.to_string())
                .unwrap_or_else(|| requirements.cluster.provider.clone()),
            service: discovered.map(|d| d.service.to_string()),
            address: discovered.and_then(|d| d.address.as_ref().map(ToString::to_string)),
            registry: non_empty(&requirements.cluster.registry),
            tls_enabled: requirements.ingress.tls.enabled,
            path: None,
            discovered: discovered.is_some(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    /// Render the ingress domain outcome as a two-column table
    pub fn render_domain_summary(&self, summary: &DomainSummary) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("FIELD").set_alignment(CellAlignment::Left),
                Cell::new("VALUE").set_alignment(CellAlignment::Left),
            ]);

        let domain_icon = StatusIcon::get_domain_icon(&summary.domain);
        let domain_kind = StatusIcon::get_domain_kind(&summary.domain);
        table.add_row(vec![
            Cell::new("Domain"),
            Cell::new(format!("{} {} ({})", domain_icon, summary.domain, domain_kind))
                .fg(self.theme.get_domain_color(&summary.domain)),
        ]);

        let provider = Some(summary.provider.as_str()).filter(|p| !p.is_empty());
        let rows = [
            ("Provider", provider),
            ("Ingress service", summary.service.as_deref()),
            ("Address", summary.address.as_deref()),
            ("Registry", summary.registry.as_deref()),
            ("Requirements", summary.path.as_deref()),
        ];
        for (field, value) in rows {
            table.add_row(vec![
                Cell::new(field),
                Cell::new(value.unwrap_or("-")).fg(self.theme.get_value_color(value)),
            ]);
        }

        table.add_row(vec![
            Cell::new("TLS"),
            Cell::new(format!(
                "{} {}",
                StatusIcon::get_flag_icon(summary.tls_enabled),
                if summary.tls_enabled { "enabled" } else { "disabled" }
            ))
            .fg(if summary.tls_enabled {
                self.theme.success
            } else {
                self.theme.muted
            }),
        ]);

        let mut output = String::new();
        let origin = if summary.discovered {
            "[discovered]"
        } else {
            "[configured]"
        };
        output.push_str(&format!(
            "╭─ Ingress Domain {} ─╮\n",
            origin.bright_black()
        ));
        output.push_str(&table.to_string());
        output.push('\n');
        output.push_str(&format!(
            "Legend: {} Custom  {} Magic DNS  {} Missing\n",
            StatusIcon::SUCCESS.green(),
            StatusIcon::WARNING.yellow(),
            StatusIcon::ERROR.red()
        ));
        output
    }

    /// Render every known provider with its discovery behavior
    pub fn render_providers(&self, providers: &[ProviderTag]) -> String {
        if providers.is_empty() {
            return "No providers found".to_string();
        }

        let mut sorted: Vec<&ProviderTag> = providers.iter().collect();
        sorted.sort_by(|a, b| a.as_str().cmp(b.as_str()));

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("PROVIDER").set_alignment(CellAlignment::Left),
                Cell::new("ADDRESS FROM").set_alignment(CellAlignment::Left),
                Cell::new("DOMAIN").set_alignment(CellAlignment::Left),
            ]);

        for provider in sorted {
            let address_from = match provider.discovery_strategy() {
                DiscoveryStrategy::LocalHypervisor { command } => format!("`{} ip`", command),
                DiscoveryStrategy::ServiceEndpoint => "ingress Service".to_string(),
            };
            let (policy, color) = match provider.domain_policy() {
                DomainPolicy::AwsAlias => ("custom domain + Route 53 alias", Color::Yellow),
                DomainPolicy::IbmDefault => ("cluster default domain", Color::Cyan),
                DomainPolicy::Generic => ("magic DNS (nip.io)", Color::Green),
            };
            table.add_row(vec![
                Cell::new(provider.as_str()),
                Cell::new(address_from),
                Cell::new(policy).fg(color),
            ]);
        }

        let mut output = String::new();
        output.push_str(&format!(
            "╭─ Kubernetes Providers {} ─╮\n",
            format!("[{} providers]", providers.len()).bright_black()
        ));
        output.push_str(&table.to_string());
        output.push('\n');
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::provider::KUBERNETES_PROVIDERS;

    #[test]
    fn test_render_domain_summary() {
        let renderer = TableRenderer::new();
        let summary = DomainSummary {
            domain: "35.205.151.95.nip.io".to_string(),
            provider: "gke".to_string(),
            service: Some("nginx/nginx-ingress-controller".to_string()),
            address: Some("35.205.151.95".to_string()),
            discovered: true,
            ..Default::default()
        }
        .with_path("/tmp/jx-requirements.yml");

        let output = renderer.render_domain_summary(&summary);
        assert!(output.contains("35.205.151.95.nip.io"));
        assert!(output.contains("Magic DNS"));
        assert!(output.contains("nginx/nginx-ingress-controller"));
        assert!(output.contains("/tmp/jx-requirements.yml"));
        assert!(output.contains("disabled"));
    }

    #[test]
    fn test_summary_from_configured_requirements() {
        let mut requirements = RequirementsConfig::default();
        requirements.cluster.provider = "kubernetes".to_string();
        requirements.cluster.registry = "10.0.0.5".to_string();
        requirements.ingress.domain = "apps.example.com".to_string();

        let summary = DomainSummary::from_requirements(&requirements, None);
        assert!(!summary.discovered);
        assert_eq!(summary.registry.as_deref(), Some("10.0.0.5"));
        assert!(summary.address.is_none());

        let output = TableRenderer::new().render_domain_summary(&summary);
        assert!(output.contains("Custom"));
        assert!(output.contains("[configured]"));
    }

    #[test]
    fn test_render_providers() {
        let renderer = TableRenderer::new();
        let output = renderer.render_providers(&KUBERNETES_PROVIDERS);
        assert!(output.contains("minikube"));
        assert!(output.contains("`minishift ip`"));
        assert!(output.contains("Route 53"));
        assert!(output.contains("[14 providers]"));

        assert_eq!(renderer.render_providers(&[]), "No providers found");
    }
}
