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

pub mod discovery;
pub mod locator;
pub mod poll;
pub mod resolver;
pub mod selector;
pub mod verify;

pub use discovery::{DiscoveredDomain, DiscoveryOverrides, DiscoverySettings, IngressDomainDiscovery};
pub use locator::{EndpointLocator, LocateRequest, LocatedAddress};
pub use poll::{poll_until, poll_until_with_notice};
pub use resolver::{Collaborators, DomainResolver, ResolveRequest, ResolverSettings};
pub use selector::{default_endpoint, IngressKind, ServiceRef};
pub use verify::{verify_ingress, VerifyOutcome};
