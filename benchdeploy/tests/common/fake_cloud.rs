//! In-memory cloud implementing every collaborator trait
//!
//! Behaviour is scripted per machine spec, so a test describes what happens
//! to each candidate shape and then inspects the calls that were made.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use benchdeploy::{ClusterProvisioner, MetricsProvider, ServiceError, ServiceResult, WorkloadDeployer};
use shared::{InstanceConfig, ResourceSample};

/// What happens to one candidate shape
#[derive(Debug, Clone, Default)]
pub struct ShapeScript {
    /// Reported utilisation; `None` makes sampling fail
    pub sample: Option<ResourceSample>,
    pub fail_provision: bool,
    /// Provisioning never completes
    pub hang_provision: bool,
    /// Sampling never completes
    pub hang_sample: bool,
    /// Number of lookups that miss before the pod becomes visible
    pub hidden_resolves: u32,
    pub fail_delete: bool,
    /// Teardown never completes
    pub hang_delete: bool,
}

impl ShapeScript {
    pub fn healthy(sample: ResourceSample) -> Self {
        Self {
            sample: Some(sample),
            ..Self::default()
        }
    }

    pub fn failing_provision() -> Self {
        Self {
            fail_provision: true,
            ..Self::default()
        }
    }

    pub fn failing_sample() -> Self {
        Self::default()
    }

    pub fn hanging_provision() -> Self {
        Self {
            hang_provision: true,
            ..Self::default()
        }
    }
}

/// Calls observed by the fake
#[derive(Debug, Default)]
pub struct CloudLog {
    /// Every create request, in order: (cluster, machine spec)
    pub created: Vec<(String, String)>,
    pub deleted: Vec<String>,
    /// (cluster, deployment, image)
    pub deployed: Vec<(String, String, String)>,
    /// Lookups per cluster since it was last created
    pub resolve_calls: HashMap<String, u32>,
    /// Clusters alive right now
    live: HashMap<String, String>,
}

impl CloudLog {
    pub fn live_clusters(&self) -> HashSet<String> {
        self.live.keys().cloned().collect()
    }
}

#[derive(Default)]
pub struct FakeCloud {
    scripts: HashMap<String, ShapeScript>,
    default_script: ShapeScript,
    log: Mutex<CloudLog>,
}

impl FakeCloud {
    /// Every shape behaves like `default_script` unless scripted otherwise
    pub fn new(default_script: ShapeScript) -> Self {
        Self {
            default_script,
            ..Self::default()
        }
    }

    pub fn with_shape(mut self, config: InstanceConfig, script: ShapeScript) -> Self {
        self.scripts.insert(config.machine_spec(), script);
        self
    }

    pub fn log(&self) -> MutexGuard<'_, CloudLog> {
        self.log.lock().unwrap()
    }

    fn script_for_spec(&self, spec: &str) -> ShapeScript {
        self.scripts.get(spec).cloned().unwrap_or_else(|| self.default_script.clone())
    }

    /// Script of the shape a live cluster was created with
    fn script_for_cluster(&self, cluster: &str) -> ServiceResult<ShapeScript> {
        let spec = self.log().live.get(cluster).cloned().ok_or_else(|| ServiceError::NotFound {
            name: cluster.to_string(),
        })?;
        Ok(self.script_for_spec(&spec))
    }
}

fn failure(program: &str, stderr: &str) -> ServiceError {
    ServiceError::NonZeroExit {
        program: program.to_string(),
        status: "exit status: 1".to_string(),
        stderr: stderr.to_string(),
    }
}

#[async_trait]
impl ClusterProvisioner for FakeCloud {
    async fn create(&self, name: &str, machine_spec: &str) -> ServiceResult<()> {
        let script = self.script_for_spec(machine_spec);
        {
            let mut log = self.log();
            log.created.push((name.to_string(), machine_spec.to_string()));
            if log.live.contains_key(name) {
                return Err(failure("gcloud", "cluster already exists"));
            }
        }

        if script.hang_provision {
            return std::future::pending().await;
        }
        if script.fail_provision {
            return Err(failure("gcloud", "insufficient regional quota"));
        }

        let mut log = self.log();
        log.live.insert(name.to_string(), machine_spec.to_string());
        log.resolve_calls.remove(name);
        Ok(())
    }

    async fn delete(&self, name: &str) -> ServiceResult<()> {
        let spec = {
            let mut log = self.log();
            log.deleted.push(name.to_string());
            log.live.get(name).cloned()
        };

        if let Some(spec) = spec {
            let script = self.script_for_spec(&spec);
            if script.hang_delete {
                return std::future::pending().await;
            }
            if script.fail_delete {
                return Err(failure("gcloud", "operation aborted"));
            }
            self.log().live.remove(name);
        }
        Ok(())
    }
}

#[async_trait]
impl WorkloadDeployer for FakeCloud {
    async fn deploy(&self, cluster: &str, deployment_name: &str, image: &str) -> ServiceResult<()> {
        self.script_for_cluster(cluster)?;
        self.log()
            .deployed
            .push((cluster.to_string(), deployment_name.to_string(), image.to_string()));
        Ok(())
    }

    async fn resolve_runtime_name(&self, cluster: &str, logical_name: &str) -> ServiceResult<String> {
        let script = self.script_for_cluster(cluster)?;
        let calls = {
            let mut log = self.log();
            let calls = log.resolve_calls.entry(cluster.to_string()).or_insert(0);
            *calls += 1;
            *calls
        };

        if calls <= script.hidden_resolves {
            return Err(ServiceError::NotFound {
                name: logical_name.to_string(),
            });
        }
        Ok(format!("{logical_name}-7d9f-x2k4"))
    }
}

#[async_trait]
impl MetricsProvider for FakeCloud {
    async fn sample(&self, cluster: &str, runtime_name: &str) -> ServiceResult<ResourceSample> {
        let script = self.script_for_cluster(cluster)?;
        if script.hang_sample {
            return std::future::pending().await;
        }
        script.sample.ok_or_else(|| ServiceError::Parse {
            what: "metrics report",
            message: format!("no data row for {runtime_name}"),
        })
    }
}
