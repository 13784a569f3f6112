//! Service implementations
//!
//! Real implementations of the collaborator traits. They shell out to the
//! `gcloud` and `kubectl` command-line tools.

pub mod command;
pub mod gcloud;
pub mod kubectl;

pub use command::{CommandRunner, OutputMode};
pub use gcloud::GcloudProvisioner;
pub use kubectl::KubectlClient;
