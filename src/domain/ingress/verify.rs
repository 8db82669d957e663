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

//! The ingress verification step: discover the domain if needed, check the
//! TLS settings and save the requirements.

use crate::domain::config::{AppConfig, RequirementsConfig};
use crate::domain::ingress::discovery::{DiscoveredDomain, DiscoveryOverrides, IngressDomainDiscovery};
use crate::domain::provider::ProviderTag;
use crate::shared::error::IngressError;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct VerifyOutcome {
    pub path: PathBuf,
    pub requirements: RequirementsConfig,
    pub discovered: Option<DiscoveredDomain>,
}

pub async fn verify_ingress(
    dir: &Path,
    overrides: &DiscoveryOverrides,
    discovery: &IngressDomainDiscovery,
) -> Result<VerifyOutcome, IngressError> {
    let (mut requirements, path) = RequirementsConfig::load(dir)
        .map_err(|e| e.with_context("failed to load requirements"))?;

    if requirements.cluster.provider.is_empty() {
        warn!("No provider configured");
    }

    let mut discovered = None;
    if requirements.ingress.domain.is_empty() {
        let (apps, _) = AppConfig::load(dir).map_err(|e| e.with_context("failed to load apps"))?;
        discovered = discovery
            .discover_and_save(&mut requirements, &apps, overrides, &path)
            .await
            .map_err(|e| e.with_context("failed to discover the Ingress domain"))?;
    }

    validate_tls(&requirements)?;
    requirements.save(&path)?;

    Ok(VerifyOutcome {
        path,
        requirements,
        discovered,
    })
}

/// TLS needs a real domain and a contact address for certificate notices.
pub fn validate_tls(requirements: &RequirementsConfig) -> Result<(), IngressError> {
    let ingress = &requirements.ingress;
    if !ingress.tls.enabled {
        return Ok(());
    }

    if ProviderTag::parse(&requirements.cluster.provider) != ProviderTag::Gke {
        warn!("Note that TLS support has only been tested on Google Container Engine with external-dns so far. This may not work!");
    }

    if ingress.is_auto_dns_domain() {
        return Err(IngressError::ValidationError(format!(
            "TLS is not supported with automated domains like {}, you will need to use a real domain you own",
            ingress.domain
        )));
    }

    if !is_valid_email(&ingress.tls.email) {
        return Err(IngressError::ValidationError(format!(
            "'{}' is not a valid email address; one is required to enable TLS so you can receive notifications from LetsEncrypt about your certificates",
            ingress.tls.email
        )));
    }
    Ok(())
}

const ATEXT: &str = r"[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]";
const LABEL: &str = r"[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?";

// `user@host`, `<user@host>` or `Name <user@host>` with an atom or quoted name.
static EMAIL: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    let addr = format!(r"{ATEXT}+(?:\.{ATEXT}+)*@{LABEL}(?:\.{LABEL})*");
    Regex::new(&format!(
        r#"^(?:{addr}|(?:"[^"\\]*"|[\w!#$%&'*+/=?^`{{|}}~.\- ]+)?\s*<{addr}>)$"#
    ))
});

/// Accepts `user@host` and `Name <user@host>`.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL
        .as_ref()
        .is_ok_and(|re| re.is_match(value.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::requirements::TlsRequirements;

    fn tls_requirements(provider: &str, domain: &str, email: &str) -> RequirementsConfig {
        let mut config = RequirementsConfig::default();
        config.cluster.provider = provider.to_string();
        config.ingress.domain = domain.to_string();
        config.ingress.tls = TlsRequirements {
            enabled: true,
            email: email.to_string(),
            ..Default::default()
        };
        config
    }

    #[test]
    fn test_tls_disabled_is_always_valid() {
        let mut config = tls_requirements("eks", "1.2.3.4.nip.io", "");
        config.ingress.tls.enabled = false;
        assert!(validate_tls(&config).is_ok());
    }

    #[test]
    fn test_tls_rejects_auto_dns_domain() {
        let config = tls_requirements("gke", "35.205.151.95.nip.io", "ops@example.com");
        let err = validate_tls(&config).unwrap_err();
        assert!(matches!(err, IngressError::ValidationError(_)));
        assert!(err.to_string().contains("35.205.151.95.nip.io"));
    }

    #[test]
    fn test_tls_requires_email() {
        let config = tls_requirements("gke", "example.com", "not-an-email");
        assert!(validate_tls(&config).is_err());

        let config = tls_requirements("gke", "example.com", "ops@example.com");
        assert!(validate_tls(&config).is_ok());
    }

    #[test]
    fn test_email_forms() {
        assert!(is_valid_email("ops@example.com"));
        assert!(is_valid_email("Ops Team <ops@example.com>"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ops@"));
        assert!(!is_valid_email("ops@example..com"));
        assert!(!is_valid_email("ops team@example.com"));
        assert!(!is_valid_email("Ops <ops@example.com"));
    }

    #[test]
    fn test_email_pattern_compiles() {
        assert!(EMAIL.is_ok());
    }

    #[test]
    fn test_email_quoted_names_and_brackets() {
        assert!(is_valid_email("<ops@example.com>"));
        assert!(is_valid_email("\"Ops, Team\" <ops@example.com>"));
        assert!(is_valid_email("first.last+tls@mail.example.com"));
        assert!(is_valid_email("ops@localhost"));
    }

    #[test]
    fn test_email_rejects_malformed() {
        assert!(!is_valid_email("a,b@example.com"));
        assert!(!is_valid_email("ops@exa(mple.com"));
        assert!(!is_valid_email("(ops)@example.com"));
        assert!(!is_valid_email("\"unterminated@example.com"));
        assert!(!is_valid_email("\"Ops <ops@example.com>"));
        assert!(!is_valid_email("Ops, Team <ops@example.com>"));
        assert!(!is_valid_email("ops@-example.com"));
        assert!(!is_valid_email(".ops@example.com"));
        assert!(!is_valid_email("ops@example.com>"));
    }
}
