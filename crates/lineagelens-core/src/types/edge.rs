//! Object-level edges and their execution metadata.

use chrono::{NaiveDate, NaiveDateTime};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::serde_utils::{deserialize_option_run_timestamp, serialize_option_run_timestamp};

/// Outcome of the last (or next) run of a task or stored procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Scheduled,
    Running,
    Failed,
}

/// Tool that moved the data along an edge (Fivetran, dbt, Tableau, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExternalTool {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// An orchestrated job that runs as part of an edge (dbt job, Airflow DAG, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub name: String,

    /// Free-text task type, e.g. `dbt Cloud Job` or `Snowflake Task`
    #[serde(rename = "type")]
    pub task_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_option_run_timestamp",
        deserialize_with = "deserialize_option_run_timestamp"
    )]
    #[schemars(with = "Option<String>")]
    pub last_run: Option<NaiveDateTime>,

    pub status: RunStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredProcedure {
    pub name: String,

    /// Qualified schema the procedure lives in, e.g. `ACME_ANALYTICS.PROCS`
    pub schema: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    pub status: RunStatus,
}

/// A directed node-to-node edge describing how data physically moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObjectEdge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Source node id
    pub source: String,

    /// Target node id
    pub target: String,

    /// Free-text classification: SYNC, CREATE VIEW, JOIN, EXPORT, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_tool: Option<ExternalTool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_by: Option<String>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_option_run_timestamp",
        deserialize_with = "deserialize_option_run_timestamp"
    )]
    #[schemars(with = "Option<String>")]
    pub run_on: Option<NaiveDateTime>,

    /// Human-readable run duration, e.g. `3m 24s`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_query: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<Task>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stored_procedures: Vec<StoredProcedure>,
}

impl ObjectEdge {
    /// Create an edge with no execution metadata.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: None,
            source: source.into(),
            target: target.into(),
            query_type: None,
            external_tool: None,
            run_by: None,
            run_on: None,
            duration: None,
            query_id: None,
            row_count: None,
            sql_query: None,
            tasks: Vec::new(),
            stored_procedures: Vec::new(),
        }
    }

    /// Set the query type.
    pub fn with_query_type(mut self, query_type: impl Into<String>) -> Self {
        self.query_type = Some(query_type.into());
        self
    }

    /// Set the edge id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// True when any task or stored procedure on this edge last failed.
    pub fn has_failures(&self) -> bool {
        self.tasks.iter().any(|t| t.status == RunStatus::Failed)
            || self
                .stored_procedures
                .iter()
                .any(|p| p.status == RunStatus::Failed)
    }
}
