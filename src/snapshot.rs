//! Process and RAM snapshots served by `/tasks`.
//!
//! An external collector writes two JSON documents (by default the kernel
//! module files `/proc/mem_grupo8` and `/proc/cpu_grupo8`). This module parses
//! them, replaces each task's numeric uid with a user name and reshapes the
//! result into the payload expected by the dashboard frontend.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::identity::{IdentityError, IdentityResolver};

/// Errors raised while building the `/tasks` payload.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid {kind} snapshot JSON: {source}")]
    Parse {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("task {pid} has a non-numeric uid '{value}'")]
    InvalidUid { pid: i64, value: String },

    #[error(transparent)]
    Identity(#[from] IdentityError),
}

/// RAM snapshot as written by the collector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RamSnapshot {
    #[serde(rename = "totalram")]
    pub total_ram: u64,
    #[serde(rename = "ramlibre")]
    pub free_ram: u64,
    #[serde(rename = "ramocupada")]
    pub used_ram: u64,
}

/// One process entry. `user` holds the uid in the snapshot and the
/// resolved name in the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub pid: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "usuario", deserialize_with = "string_or_number")]
    pub user: String,
    #[serde(rename = "estado")]
    pub state: String,
    pub ram: u64,
    #[serde(rename = "padre")]
    pub parent: i64,
}

/// CPU and process-list snapshot as written by the collector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuSnapshot {
    #[serde(rename = "totalcpu")]
    pub total_cpu: u64,
    pub running: u64,
    pub sleeping: u64,
    pub stopped: u64,
    pub zombie: u64,
    pub total: u64,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct General {
    #[serde(rename = "totalram")]
    pub total_ram: u64,
    #[serde(rename = "ramlibre")]
    pub free_ram: u64,
    #[serde(rename = "ramocupada")]
    pub used_ram: u64,
    #[serde(rename = "totalcpu")]
    pub total_cpu: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Counters {
    pub running: u64,
    pub sleeping: u64,
    pub stopped: u64,
    pub zombie: u64,
    pub total: u64,
}

/// Payload of `GET /tasks`. The wrapper arrays always hold one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TasksOverview {
    #[serde(rename = "AllGenerales")]
    pub general: Vec<General>,
    #[serde(rename = "AllTipoProcesos")]
    pub tasks: Vec<Task>,
    #[serde(rename = "AllProcesos")]
    pub counters: Vec<Counters>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

/// Builds the `/tasks` payload from the raw snapshot documents.
///
/// A uid missing from the user database keeps its numeric text.
pub fn build_overview(
    ram_json: &str,
    cpu_json: &str,
    resolver: &dyn IdentityResolver,
) -> Result<TasksOverview, SnapshotError> {
    let cpu: CpuSnapshot = serde_json::from_str(cpu_json)
        .map_err(|source| SnapshotError::Parse { kind: "cpu", source })?;
    let ram: RamSnapshot = serde_json::from_str(ram_json)
        .map_err(|source| SnapshotError::Parse { kind: "ram", source })?;

    let mut tasks = cpu.tasks;
    for task in &mut tasks {
        let uid: u32 = task
            .user
            .trim()
            .parse()
            .map_err(|_| SnapshotError::InvalidUid {
                pid: task.pid,
                value: task.user.clone(),
            })?;

        match resolver.user_name(uid)? {
            Some(name) => task.user = name,
            None => {
                debug!("No user entry for uid {} (pid {})", uid, task.pid);
                task.user = uid.to_string();
            }
        }
    }

    Ok(TasksOverview {
        general: vec![General {
            total_ram: ram.total_ram,
            free_ram: ram.free_ram,
            used_ram: ram.used_ram,
            total_cpu: cpu.total_cpu,
        }],
        tasks,
        counters: vec![Counters {
            running: cpu.running,
            sleeping: cpu.sleeping,
            stopped: cpu.stopped,
            zombie: cpu.zombie,
            total: cpu.total,
        }],
    })
}

/// Reads both snapshot files and builds the `/tasks` payload.
pub async fn load_overview(
    ram_path: &Path,
    cpu_path: &Path,
    resolver: &dyn IdentityResolver,
) -> Result<TasksOverview, SnapshotError> {
    let ram = read_snapshot(ram_path).await?;
    let cpu = read_snapshot(cpu_path).await?;
    build_overview(&ram, &cpu, resolver)
}

async fn read_snapshot(path: &Path) -> Result<String, SnapshotError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SnapshotError::Read {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::StaticIdentityResolver;

    const RAM: &str = r#"{"totalram": 16000, "ramlibre": 6000, "ramocupada": 10000}"#;
    const CPU: &str = r#"{
        "totalcpu": 37, "running": 1, "sleeping": 200, "stopped": 0, "zombie": 2, "total": 203,
        "tasks": [
            {"pid": 1, "nombre": "systemd", "usuario": "0", "estado": "1", "ram": 12, "padre": 0},
            {"pid": 812, "nombre": "bash", "usuario": 1000, "estado": "1", "ram": 4, "padre": 1}
        ]
    }"#;

    fn resolver() -> StaticIdentityResolver {
        StaticIdentityResolver::new()
            .with_user(0, "root")
            .with_user(1000, "alice")
    }

    #[test]
    fn test_build_overview_resolves_users() {
        let overview = build_overview(RAM, CPU, &resolver()).unwrap();

        assert_eq!(overview.tasks.len(), 2);
        assert_eq!(overview.tasks[0].user, "root");
        assert_eq!(overview.tasks[1].user, "alice");
        assert_eq!(overview.general.len(), 1);
        assert_eq!(overview.general[0].total_ram, 16000);
        assert_eq!(overview.general[0].total_cpu, 37);
        assert_eq!(overview.counters.len(), 1);
        assert_eq!(overview.counters[0].zombie, 2);
        assert_eq!(overview.counters[0].total, 203);
    }

    #[test]
    fn test_unknown_uid_keeps_number() {
        let overview = build_overview(RAM, CPU, &StaticIdentityResolver::new()).unwrap();
        assert_eq!(overview.tasks[0].user, "0");
        assert_eq!(overview.tasks[1].user, "1000");
    }

    #[test]
    fn test_non_numeric_uid_fails() {
        let cpu = r#"{"totalcpu": 0, "running": 0, "sleeping": 0, "stopped": 0, "zombie": 0,
            "total": 1, "tasks": [{"pid": 9, "nombre": "x", "usuario": "nobody",
            "estado": "1", "ram": 0, "padre": 1}]}"#;
        let err = build_overview(RAM, cpu, &resolver()).unwrap_err();
        assert!(matches!(err, SnapshotError::InvalidUid { pid: 9, .. }));
    }

    #[test]
    fn test_invalid_json_names_the_snapshot() {
        let err = build_overview("{", CPU, &resolver()).unwrap_err();
        assert!(matches!(err, SnapshotError::Parse { kind: "ram", .. }));

        let err = build_overview(RAM, "[]", &resolver()).unwrap_err();
        assert!(matches!(err, SnapshotError::Parse { kind: "cpu", .. }));
    }

    #[test]
    fn test_wire_field_names() {
        let overview = build_overview(RAM, CPU, &resolver()).unwrap();
        let value = serde_json::to_value(&overview).unwrap();

        assert_eq!(value["AllGenerales"][0]["ramlibre"], 6000);
        assert_eq!(value["AllTipoProcesos"][1]["nombre"], "bash");
        assert_eq!(value["AllTipoProcesos"][1]["usuario"], "alice");
        assert_eq!(value["AllTipoProcesos"][1]["padre"], 1);
        assert_eq!(value["AllProcesos"][0]["sleeping"], 200);
    }

    #[tokio::test]
    async fn test_load_overview_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_overview(&dir.path().join("mem"), &dir.path().join("cpu"), &resolver())
            .await
            .unwrap_err();
        assert!(matches!(err, SnapshotError::Read { .. }));
    }

    #[tokio::test]
    async fn test_load_overview_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let ram_path = dir.path().join("mem");
        let cpu_path = dir.path().join("cpu");
        std::fs::write(&ram_path, RAM).unwrap();
        std::fs::write(&cpu_path, CPU).unwrap();

        let overview = load_overview(&ram_path, &cpu_path, &resolver()).await.unwrap();
        assert_eq!(overview.tasks[0].name, "systemd");
    }
}
