//! Parsers for the tabular text reports printed by `kubectl`

use regex::Regex;
use std::sync::OnceLock;

use shared::ResourceSample;

use crate::error::{ServiceError, ServiceResult};

fn number_pattern() -> &'static Regex {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    NUMBER.get_or_init(|| Regex::new(r"[0-9]+(?:\.[0-9]+)?").expect("numeric pattern is valid"))
}

/// First numeric run in a column value, with any unit suffix dropped
///
/// `"120m"` → `120.0`, `"45%"` → `45.0`, `"512Mi"` → `512.0`.
pub fn strip_unit(value: &str) -> Option<f64> {
    number_pattern()
        .find(value)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Parse `kubectl top pod` output
///
/// Expects a header line followed by at least one data row of
/// `NAME CPU MEMORY`; the first data row is the one reported.
pub fn parse_top_output(output: &str) -> ServiceResult<ResourceSample> {
    let mut lines = output.lines().filter(|line| !line.trim().is_empty());

    lines
        .next()
        .ok_or_else(|| ServiceError::parse("metrics report", "output is empty"))?;
    let row = lines
        .next()
        .ok_or_else(|| ServiceError::parse("metrics report", "no data row after header"))?;

    let fields: Vec<&str> = row.split_whitespace().collect();
    let (cpu_field, memory_field) = match fields.as_slice() {
        [_, cpu, memory, ..] => (*cpu, *memory),
        _ => {
            return Err(ServiceError::parse(
                "metrics report",
                format!("expected NAME CPU MEMORY columns, got `{row}`"),
            ))
        }
    };

    let cpu = strip_unit(cpu_field)
        .ok_or_else(|| ServiceError::parse("CPU column", format!("`{cpu_field}` is not numeric")))?;
    let memory = strip_unit(memory_field)
        .ok_or_else(|| ServiceError::parse("memory column", format!("`{memory_field}` is not numeric")))?;

    Ok(ResourceSample::new(cpu, memory))
}

/// Find the pod whose name contains `logical_name` in
/// `kubectl get pods --no-headers --all-namespaces` output
///
/// Column 0 is the namespace, column 1 the pod name.
pub fn parse_pod_name(output: &str, logical_name: &str) -> Option<String> {
    output
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .find(|name| name.contains(logical_name))
        .map(str::to_string)
}

/// Find the kube context for `cluster` in `kubectl config get-contexts -o name` output
///
/// GKE names contexts `gke_<project>_<zone>_<cluster>`, so an exact match or a
/// `_<cluster>` suffix identifies it.
pub fn parse_context_name(output: &str, cluster: &str) -> Option<String> {
    let suffix = format!("_{cluster}");
    output
        .lines()
        .map(str::trim)
        .find(|context| *context == cluster || context.ends_with(&suffix))
        .map(str::to_string)
}
