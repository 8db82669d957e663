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


//! Adapters for everything outside the process: the cluster API, the shell,
//! the terminal, DNS and cloud DNS registration.

pub mod aws;
pub mod command;
pub mod constants;
pub mod dns;
pub mod kubernetes;
pub mod prompt;

pub use aws::{AwsCliRegistrar, DomainRegistrar};
pub use command::{CommandRunner, ShellCommandRunner};
pub use dns::{HostResolver, SystemHostResolver};
pub use kubernetes::{IngressKubeClient, IngressKubeClientImpl};
pub use prompt::{BatchPrompter, Prompter, StdioPrompter};
