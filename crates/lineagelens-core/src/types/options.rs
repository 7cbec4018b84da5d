use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How column-lineage endpoints are checked against node descriptors at build time.
///
/// Queries never filter on this; it only decides how loudly the build reports
/// lineage edges that name a column their node does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColumnCheck {
    /// Skip the check.
    Off,
    /// Report unknown columns as warnings.
    #[default]
    Warn,
    /// Report unknown columns as defects that abort the build.
    Strict,
}

/// Options controlling how a lineage graph is built.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GraphOptions {
    #[serde(default)]
    pub column_check: ColumnCheck,
}

impl GraphOptions {
    pub fn strict() -> Self {
        Self {
            column_check: ColumnCheck::Strict,
        }
    }
}
