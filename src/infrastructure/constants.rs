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

use std::time::Duration;

/// Configuration documents
pub const REQUIREMENTS_FILE_NAME: &str = "jx-requirements.yml";
pub const APPS_FILE_NAME: &str = "jx-apps.yml";

/// Magic DNS
pub const MAGIC_DNS_SUFFIX: &str = "nip.io";
pub const AUTO_DNS_SUFFIXES: [&str; 2] = [".nip.io", ".xip.io"];

/// Hostnames already routable from outside, never wrapped in magic DNS
pub const AWS_HOSTNAME_SUFFIX: &str = ".amazonaws.com";

/// IBM Kubernetes Service
pub const IKS_DOMAIN_SUFFIX: &str = "containers.appdomain.cloud";
pub const IKS_REGION_LABEL: &str = "ibm-cloud.kubernetes.io/region";
pub const TOPOLOGY_REGION_LABEL: &str = "topology.kubernetes.io/region";

/// Well-known ingress controller locations
pub const ISTIO_NAMESPACE: &str = "istio-system";
pub const ISTIO_SERVICE: &str = "istio-ingressgateway";
pub const NGINX_NAMESPACE: &str = "nginx";
pub const NGINX_SERVICE: &str = "nginx-ingress-controller";
pub const ISTIO_APP_SUFFIX: &str = "/istio";

/// Ingress kinds
pub const INGRESS_KIND_ISTIO: &str = "istio";
pub const INGRESS_KIND_INGRESS: &str = "ingress";

/// Service and node field values
pub const SERVICE_TYPE_NODE_PORT: &str = "NodePort";
pub const NODE_ADDRESS_EXTERNAL_IP: &str = "ExternalIP";
pub const CLUSTER_IP_NONE: &str = "None";

/// In-cluster container registry
pub const REGISTRY_SERVICE: &str = "docker-registry";
pub const DEFAULT_CLUSTER_NAMESPACE: &str = "jx";

/// Ingress controller readiness wait
pub const INGRESS_WAIT_TIMEOUT: Duration = Duration::from_secs(5 * 60);
pub const INGRESS_WAIT_INTERVAL: Duration = Duration::from_secs(3);

/// Forward DNS resolution of load balancer hostnames
pub const DNS_RESOLVE_ATTEMPTS: usize = 5;
pub const DNS_RESOLVE_DELAY: Duration = Duration::from_secs(10);

/// Route 53 wildcard alias
pub const ROUTE53_RECORD_TTL: u64 = 300;

/// Environment
pub const ENV_KUBERNETES_SERVICE_HOST: &str = "KUBERNETES_SERVICE_HOST";
pub const ENV_INTERPRET_PIPELINE: &str = "JX_INTERPRET_PIPELINE";

/// Documentation links shown in hints
pub const ON_PREMISE_INGRESS_DOCS: &str =
    "https://jenkins-x.io/docs/labs/boot/getting-started/config/#ingress";
pub const ROUTE53_REGISTRATION_URL: &str =
    "https://console.aws.amazon.com/route53/home?#DomainRegistration:";
