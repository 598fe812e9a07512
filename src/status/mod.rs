//! Run status breakdown
//!
//! Aggregates the status of every process, including members of process
//! groups, into the four percentages shown by the dashboard bar.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Execution status of a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcStatus {
    Succeeded,
    Failed,
    Running,
    Init,
}

/// A process entry of the run tree; fields other than `status` are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcState {
    pub status: ProcStatus,
}

/// Status tree reported by the backend while a pipeline runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStatusTree {
    #[serde(rename = "PROCESSES", default)]
    pub processes: IndexMap<String, ProcState>,

    #[serde(rename = "PROCGROUPS", default)]
    pub procgroups: IndexMap<String, IndexMap<String, ProcState>>,
}

/// Percentage of processes in each status.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusBreakdown {
    pub succeeded: f64,
    pub failed: f64,
    pub running: f64,
    pub init: f64,
}

impl StatusBreakdown {
    /// `[succeeded, failed, running, init]`
    pub fn as_array(&self) -> [f64; 4] {
        [self.succeeded, self.failed, self.running, self.init]
    }
}

/// Compute the status breakdown; an empty tree counts as fully `init`.
pub fn status_percentages(tree: &RunStatusTree) -> StatusBreakdown {
    let mut counts = [0usize; 4];
    let statuses = tree
        .processes
        .values()
        .chain(tree.procgroups.values().flat_map(|group| group.values()));
    for state in statuses {
        let slot = match state.status {
            ProcStatus::Succeeded => 0,
            ProcStatus::Failed => 1,
            ProcStatus::Running => 2,
            ProcStatus::Init => 3,
        };
        counts[slot] += 1;
    }

    let total: usize = counts.iter().sum();
    if total == 0 {
        return StatusBreakdown {
            succeeded: 0.0,
            failed: 0.0,
            running: 0.0,
            init: 100.0,
        };
    }
    let pct = |n: usize| n as f64 / total as f64 * 100.0;
    StatusBreakdown {
        succeeded: pct(counts[0]),
        failed: pct(counts[1]),
        running: pct(counts[2]),
        init: pct(counts[3]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tree(v: serde_json::Value) -> RunStatusTree {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn test_empty_tree_is_all_init() {
        let b = status_percentages(&RunStatusTree::default());
        assert_eq!(b.as_array(), [0.0, 0.0, 0.0, 100.0]);
    }

    #[test]
    fn test_processes_and_groups_counted() {
        let t = tree(json!({
            "PROCESSES": {
                "P1": {"status": "succeeded", "jobs": 3},
                "P2": {"status": "failed"}
            },
            "PROCGROUPS": {
                "G": {
                    "G1": {"status": "running"},
                    "G2": {"status": "succeeded"}
                }
            }
        }));
        let b = status_percentages(&t);
        assert_eq!(b.as_array(), [50.0, 25.0, 25.0, 0.0]);
        assert!((b.as_array().iter().sum::<f64>() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_status_rejected() {
        let err = serde_json::from_value::<RunStatusTree>(json!({
            "PROCESSES": {"P1": {"status": "paused"}}
        }))
        .unwrap_err();
        assert!(err.to_string().contains("paused"));
    }
}
