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

// CLI command definitions

use super::ingress::{DomainCommand, ProvidersCommand, VerifyCommand};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "kube-ingress-domain",
    version,
    about = "Discover the external ingress domain of a Kubernetes cluster",
    long_about = "A standalone CLI tool that finds the ingress controller's external address and turns it into the wildcard domain used to generate Ingress rules"
)]
pub struct CliArgs {
    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Verify the ingress requirements, discovering and saving the domain if missing
    Verify(VerifyCommand),

    /// Resolve the ingress domain and print it
    Domain(DomainCommand),

    /// List supported Kubernetes providers
    Providers(ProvidersCommand),
}
