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

//! In-memory collaborators shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{
    LoadBalancerIngress, LoadBalancerStatus, Node, NodeAddress, NodeStatus, Service, ServicePort,
    ServiceSpec, ServiceStatus,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube_ingress_domain::infrastructure::{
    CommandRunner, DomainRegistrar, HostResolver, IngressKubeClient, Prompter,
};
use kube_ingress_domain::{Collaborators, IngressError, ResolverSettings};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum ServiceReply {
    Found(Service),
    Missing,
    Forbidden,
}

#[derive(Debug, Clone)]
pub enum NodesReply {
    Found(Vec<Node>),
    Forbidden,
    Failed,
}

/// Serves scripted replies per service; the last reply repeats.
pub struct FakeKubeClient {
    services: Mutex<HashMap<(String, String), VecDeque<ServiceReply>>>,
    nodes: Mutex<NodesReply>,
    requested: Mutex<Vec<String>>,
    pub get_service_calls: AtomicUsize,
    pub list_nodes_calls: AtomicUsize,
}

impl Default for FakeKubeClient {
    fn default() -> Self {
        Self {
            services: Mutex::new(HashMap::new()),
            nodes: Mutex::new(NodesReply::Found(Vec::new())),
            requested: Mutex::new(Vec::new()),
            get_service_calls: AtomicUsize::new(0),
            list_nodes_calls: AtomicUsize::new(0),
        }
    }
}

impl FakeKubeClient {
    pub fn with_service(self, namespace: &str, name: &str, replies: Vec<ServiceReply>) -> Self {
        self.services
            .lock()
            .unwrap()
            .insert((namespace.to_string(), name.to_string()), replies.into());
        self
    }

    pub fn with_nodes(self, reply: NodesReply) -> Self {
        *self.nodes.lock().unwrap() = reply;
        self
    }

    pub fn service_calls(&self) -> usize {
        self.get_service_calls.load(Ordering::SeqCst)
    }

    pub fn node_calls(&self) -> usize {
        self.list_nodes_calls.load(Ordering::SeqCst)
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl IngressKubeClient for FakeKubeClient {
    async fn get_service(&self, namespace: &str, name: &str) -> Result<Service, IngressError> {
        self.get_service_calls.fetch_add(1, Ordering::SeqCst);
        self.requested
            .lock()
            .unwrap()
            .push(format!("{}/{}", namespace, name));

        let reply = {
            let mut services = self.services.lock().unwrap();
            match services.get_mut(&(namespace.to_string(), name.to_string())) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply.unwrap_or(ServiceReply::Missing) {
            ServiceReply::Found(svc) => Ok(svc),
            ServiceReply::Missing => Err(IngressError::not_found("Service", name, namespace)),
            ServiceReply::Forbidden => Err(IngressError::Forbidden {
                resource_type: "Service".to_string(),
                message: "forbidden".to_string(),
            }),
        }
    }

    async fn list_nodes(&self) -> Result<Vec<Node>, IngressError> {
        self.list_nodes_calls.fetch_add(1, Ordering::SeqCst);
        match self.nodes.lock().unwrap().clone() {
            NodesReply::Found(nodes) => Ok(nodes),
            NodesReply::Forbidden => Err(IngressError::Forbidden {
                resource_type: "Node".to_string(),
                message: "nodes is forbidden".to_string(),
            }),
            NodesReply::Failed => Err(IngressError::KubeError("connection refused".to_string())),
        }
    }
}

/// Answers keyed by the full command line.
#[derive(Default)]
pub struct FakeCommandRunner {
    replies: Mutex<HashMap<String, Result<String, String>>>,
    calls: Mutex<Vec<String>>,
}

impl FakeCommandRunner {
    pub fn with_reply(self, command_line: &str, reply: Result<&str, &str>) -> Self {
        self.replies.lock().unwrap().insert(
            command_line.to_string(),
            reply.map(str::to_string).map_err(str::to_string),
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandRunner for FakeCommandRunner {
    async fn output(&self, program: &str, args: &[&str]) -> Result<String, IngressError> {
        let line = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        self.calls.lock().unwrap().push(line.clone());

        match self.replies.lock().unwrap().get(&line).cloned() {
            Some(Ok(out)) => Ok(out.trim().to_string()),
            Some(Err(message)) => Err(IngressError::command(line, message)),
            None => Err(IngressError::command(line, "command not found")),
        }
    }
}

/// Scripted answers; once a queue runs dry the question's default is used.
#[derive(Default)]
pub struct FakePrompter {
    confirms: Mutex<VecDeque<bool>>,
    domains: Mutex<VecDeque<String>>,
    asked: Mutex<Vec<String>>,
}

impl FakePrompter {
    pub fn with_confirms(self, answers: &[bool]) -> Self {
        self.confirms.lock().unwrap().extend(answers.iter().copied());
        self
    }

    pub fn with_domains(self, answers: &[&str]) -> Self {
        self.domains
            .lock()
            .unwrap()
            .extend(answers.iter().map(|a| a.to_string()));
        self
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }
}

impl Prompter for FakePrompter {
    fn confirm(&self, question: &str, default: bool, _help: &str) -> Result<bool, IngressError> {
        self.asked.lock().unwrap().push(question.to_string());
        Ok(self.confirms.lock().unwrap().pop_front().unwrap_or(default))
    }

    fn ask_domain(
        &self,
        message: &str,
        default: Option<&str>,
        _help: &str,
    ) -> Result<String, IngressError> {
        self.asked.lock().unwrap().push(message.to_string());
        Ok(self
            .domains
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| default.unwrap_or_default().to_string()))
    }
}

#[derive(Default)]
pub struct FakeRegistrar {
    registered: Mutex<Vec<(String, String)>>,
}

impl FakeRegistrar {
    pub fn registered(&self) -> Vec<(String, String)> {
        self.registered.lock().unwrap().clone()
    }
}

#[async_trait]
impl DomainRegistrar for FakeRegistrar {
    async fn register_wildcard_alias(&self, domain: &str, target: &str) -> Result<(), IngressError> {
        self.registered
            .lock()
            .unwrap()
            .push((domain.to_string(), target.to_string()));
        Ok(())
    }
}

/// Fails until the scripted lookups are consumed in order.
#[derive(Default)]
pub struct FakeHostResolver {
    answers: Mutex<VecDeque<Vec<IpAddr>>>,
    pub calls: AtomicUsize,
}

impl FakeHostResolver {
    pub fn with_answers(self, answers: Vec<Vec<&str>>) -> Self {
        self.answers.lock().unwrap().extend(
            answers
                .into_iter()
                .map(|ips| ips.into_iter().map(|ip| ip.parse().unwrap()).collect()),
        );
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HostResolver for FakeHostResolver {
    async fn lookup_ip(&self, host: &str) -> Result<Vec<IpAddr>, IngressError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| IngressError::Unresolved(host.to_string()))
    }
}

/// One of each fake, kept around so tests can inspect them afterwards.
#[derive(Clone)]
pub struct Fakes {
    pub client: Arc<FakeKubeClient>,
    pub runner: Arc<FakeCommandRunner>,
    pub prompter: Arc<FakePrompter>,
    pub registrar: Arc<FakeRegistrar>,
    pub resolver: Arc<FakeHostResolver>,
}

impl Fakes {
    pub fn new(client: FakeKubeClient) -> Self {
        Self {
            client: Arc::new(client),
            runner: Arc::new(FakeCommandRunner::default()),
            prompter: Arc::new(FakePrompter::default()),
            registrar: Arc::new(FakeRegistrar::default()),
            resolver: Arc::new(FakeHostResolver::default()),
        }
    }

    pub fn with_runner(mut self, runner: FakeCommandRunner) -> Self {
        self.runner = Arc::new(runner);
        self
    }

    pub fn with_prompter(mut self, prompter: FakePrompter) -> Self {
        self.prompter = Arc::new(prompter);
        self
    }

    pub fn with_resolver(mut self, resolver: FakeHostResolver) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            client: self.client.clone(),
            runner: self.runner.clone(),
            prompter: self.prompter.clone(),
            registrar: self.registrar.clone(),
            host_resolver: self.resolver.clone(),
        }
    }
}

pub fn create_test_settings(batch_mode: bool) -> ResolverSettings {
    ResolverSettings {
        batch_mode,
        in_cluster_bootstrap: false,
        dns_attempts: 5,
        dns_delay: Duration::from_millis(10),
    }
}

pub fn lb_service(ip: Option<&str>, hostname: Option<&str>) -> Service {
    Service {
        status: Some(ServiceStatus {
            load_balancer: Some(LoadBalancerStatus {
                ingress: Some(vec![LoadBalancerIngress {
                    ip: ip.map(str::to_string),
                    hostname: hostname.map(str::to_string),
                    ..Default::default()
                }]),
            }),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn pending_lb_service() -> Service {
    Service {
        spec: Some(ServiceSpec {
            type_: Some("LoadBalancer".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn node_port_service(node_port: i32) -> Service {
    Service {
        spec: Some(ServiceSpec {
            type_: Some("NodePort".to_string()),
            ports: Some(vec![ServicePort {
                name: Some("http".to_string()),
                port: 80,
                node_port: Some(node_port),
                ..Default::default()
            }]),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn cluster_ip_service(cluster_ip: &str) -> Service {
    Service {
        spec: Some(ServiceSpec {
            cluster_ip: Some(cluster_ip.to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

pub fn create_test_node(addresses: &[(&str, &str)], labels: &[(&str, &str)]) -> Node {
    Node {
        metadata: ObjectMeta {
            labels: Some(
                labels
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect::<BTreeMap<_, _>>(),
            ),
            ..Default::default()
        },
        status: Some(NodeStatus {
            addresses: Some(
                addresses
                    .iter()
                    .map(|(kind, address)| NodeAddress {
                        type_: kind.to_string(),
                        address: address.to_string(),
                    })
                    .collect(),
            ),
            ..Default::default()
        }),
        ..Default::default()
    }
}
