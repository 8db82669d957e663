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

//! Route 53 wildcard alias registration through the `aws` CLI

use crate::infrastructure::command::CommandRunner;
use crate::infrastructure::constants::ROUTE53_RECORD_TTL;
use crate::shared::error::IngressError;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Points a wildcard DNS record for a custom domain at the ingress address.
#[async_trait::async_trait]
pub trait DomainRegistrar: Send + Sync {
    async fn register_wildcard_alias(&self, domain: &str, target: &str)
        -> Result<(), IngressError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct HostedZoneList {
    #[serde(default)]
    hosted_zones: Vec<HostedZone>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct HostedZone {
    id: String,
    name: String,
}

pub struct AwsCliRegistrar {
    runner: Arc<dyn CommandRunner>,
}

impl AwsCliRegistrar {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    async fn find_hosted_zone(&self, domain: &str) -> Result<HostedZone, IngressError> {
        let raw = self
            .runner
            .output("aws", &["route53", "list-hosted-zones", "--output", "json"])
            .await?;
        let zones: HostedZoneList = serde_json::from_str(&raw).map_err(|e| {
            IngressError::Registration(format!("cannot parse Route 53 hosted zones: {}", e))
        })?;

        best_matching_zone(&zones.hosted_zones, domain).ok_or_else(|| {
            IngressError::Registration(format!(
                "no Route 53 hosted zone found for domain {}",
                domain
            ))
        })
    }
}

#[async_trait::async_trait]
impl DomainRegistrar for AwsCliRegistrar {
    async fn register_wildcard_alias(
        &self,
        domain: &str,
        target: &str,
    ) -> Result<(), IngressError> {
        let zone = self.find_hosted_zone(domain).await?;
        let change_batch = wildcard_change_batch(domain, target).to_string();

        self.runner
            .output(
                "aws",
                &[
                    "route53",
                    "change-resource-record-sets",
                    "--hosted-zone-id",
                    &zone.id,
                    "--change-batch",
                    &change_batch,
                ],
            )
            .await?;

        info!(
            domain = %domain,
            target = %target,
            zone = %zone.name,
            "registered wildcard DNS record"
        );
        Ok(())
    }
}

/// The hosted zone with the longest name that is a suffix of `domain`.
fn best_matching_zone(zones: &[HostedZone], domain: &str) -> Option<HostedZone> {
    let domain = domain.trim_end_matches('.');
    zones
        .iter()
        .filter(|zone| {
            let name = zone.name.trim_end_matches('.');
            domain == name || domain.ends_with(&format!(".{}", name))
        })
        .max_by_key(|zone| zone.name.trim_end_matches('.').len())
        .cloned()
}

fn wildcard_change_batch(domain: &str, target: &str) -> serde_json::Value {
    json!({
        "Comment": format!("Wildcard ingress record for {}", domain),
        "Changes": [{
            "Action": "UPSERT",
            "ResourceRecordSet": {
                "Name": format!("*.{}", domain.trim_end_matches('.')),
                "Type": "CNAME",
                "TTL": ROUTE53_RECORD_TTL,
                "ResourceRecords": [{ "Value": target }]
            }
        }]
    })
}
