//! Workload deployment and metrics through the `kubectl` CLI
//!
//! Every command is pinned with `--context` to the kube context of the
//! cluster it targets, so concurrent workers never share a current context.

use async_trait::async_trait;

use shared::ResourceSample;

use crate::core::parse::{parse_context_name, parse_pod_name, parse_top_output};
use crate::error::{ServiceError, ServiceResult};
use crate::services::command::{CommandRunner, OutputMode};
use crate::traits::{MetricsProvider, WorkloadDeployer};

#[derive(Debug, Clone)]
pub struct KubectlClient {
    runner: CommandRunner,
}

impl KubectlClient {
    pub fn new() -> Self {
        Self::with_runner(CommandRunner::new("kubectl"))
    }

    pub fn with_runner(runner: CommandRunner) -> Self {
        Self { runner }
    }

    /// Kube context name registered for `cluster`
    pub async fn context_for(&self, cluster: &str) -> ServiceResult<String> {
        let output = self
            .runner
            .run(&strings(&["config", "get-contexts", "-o", "name"]), OutputMode::Capture)
            .await?;

        parse_context_name(&output, cluster).ok_or_else(|| ServiceError::ContextNotFound {
            cluster: cluster.to_string(),
        })
    }

    pub fn deploy_args(context: &str, deployment_name: &str, image: &str) -> Vec<String> {
        let mut args = strings(&["--context", context, "create", "deployment", deployment_name]);
        args.push(format!("--image={image}"));
        args
    }

    pub fn list_pods_args(context: &str) -> Vec<String> {
        strings(&["--context", context, "get", "pods", "--no-headers", "--all-namespaces"])
    }

    pub fn top_args(context: &str, runtime_name: &str) -> Vec<String> {
        strings(&["--context", context, "top", "pod", runtime_name])
    }
}

impl Default for KubectlClient {
    fn default() -> Self {
        Self::new()
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[async_trait]
impl WorkloadDeployer for KubectlClient {
    async fn deploy(&self, cluster: &str, deployment_name: &str, image: &str) -> ServiceResult<()> {
        let context = self.context_for(cluster).await?;
        self.runner
            .run(&Self::deploy_args(&context, deployment_name, image), OutputMode::Capture)
            .await
            .map(|_| ())
    }

    async fn resolve_runtime_name(&self, cluster: &str, logical_name: &str) -> ServiceResult<String> {
        let context = self.context_for(cluster).await?;
        let output = self
            .runner
            .run(&Self::list_pods_args(&context), OutputMode::Capture)
            .await?;

        parse_pod_name(&output, logical_name).ok_or_else(|| ServiceError::NotFound {
            name: logical_name.to_string(),
        })
    }
}

#[async_trait]
impl MetricsProvider for KubectlClient {
    async fn sample(&self, cluster: &str, runtime_name: &str) -> ServiceResult<ResourceSample> {
        let context = self.context_for(cluster).await?;
        let output = self
            .runner
            .run(&Self::top_args(&context, runtime_name), OutputMode::Capture)
            .await?;

        parse_top_output(&output)
    }
}
