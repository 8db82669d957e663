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

//! Forward DNS lookups

use crate::shared::error::IngressError;
use std::net::IpAddr;

#[async_trait::async_trait]
pub trait HostResolver: Send + Sync {
    async fn lookup_ip(&self, host: &str) -> Result<Vec<IpAddr>, IngressError>;
}

/// Resolves through the operating system resolver.
#[derive(Debug, Default, Clone)]
pub struct SystemHostResolver;

#[async_trait::async_trait]
impl HostResolver for SystemHostResolver {
    async fn lookup_ip(&self, host: &str) -> Result<Vec<IpAddr>, IngressError> {
        let addrs = tokio::net::lookup_host((host, 0)).await?;
        Ok(addrs.map(|addr| addr.ip()).collect())
    }
}

/// First address that is not loopback, in resolver order.
pub fn first_public_ip(ips: &[IpAddr]) -> Option<IpAddr> {
    ips.iter().copied().find(|ip| !ip.is_loopback())
}
