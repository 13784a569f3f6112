//! Cluster provisioning through the `gcloud` CLI

use async_trait::async_trait;

use crate::error::ServiceResult;
use crate::services::command::{CommandRunner, OutputMode};
use crate::traits::ClusterProvisioner;

/// Creates and deletes single-node GKE clusters
#[derive(Debug, Clone)]
pub struct GcloudProvisioner {
    runner: CommandRunner,
    zone: Option<String>,
    project: Option<String>,
}

impl GcloudProvisioner {
    pub fn new() -> Self {
        Self::with_runner(CommandRunner::new("gcloud"))
    }

    pub fn with_runner(runner: CommandRunner) -> Self {
        Self {
            runner,
            zone: None,
            project: None,
        }
    }

    pub fn with_zone(mut self, zone: Option<String>) -> Self {
        self.zone = zone;
        self
    }

    pub fn with_project(mut self, project: Option<String>) -> Self {
        self.project = project;
        self
    }

    pub fn create_args(&self, name: &str, machine_spec: &str) -> Vec<String> {
        let mut args = vec![
            "container".to_string(),
            "clusters".to_string(),
            "create".to_string(),
            name.to_string(),
            format!("--machine-type={machine_spec}"),
            "--num-nodes=1".to_string(),
            "--quiet".to_string(),
        ];
        self.push_location(&mut args);
        args
    }

    pub fn delete_args(&self, name: &str) -> Vec<String> {
        let mut args = vec![
            "container".to_string(),
            "clusters".to_string(),
            "delete".to_string(),
            name.to_string(),
            "--quiet".to_string(),
        ];
        self.push_location(&mut args);
        args
    }

    fn push_location(&self, args: &mut Vec<String>) {
        if let Some(zone) = &self.zone {
            args.push(format!("--zone={zone}"));
        }
        if let Some(project) = &self.project {
            args.push(format!("--project={project}"));
        }
    }
}

impl Default for GcloudProvisioner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClusterProvisioner for GcloudProvisioner {
    async fn create(&self, name: &str, machine_spec: &str) -> ServiceResult<()> {
        self.runner
            .run(&self.create_args(name, machine_spec), OutputMode::Forward)
            .await
            .map(|_| ())
    }

    async fn delete(&self, name: &str) -> ServiceResult<()> {
        self.runner
            .run(&self.delete_args(name), OutputMode::Forward)
            .await
            .map(|_| ())
    }
}
