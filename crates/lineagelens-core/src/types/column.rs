//! Column-level lineage edges and query results.

use indexmap::{IndexMap, IndexSet};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How a source column becomes a target column.
///
/// Tags outside the known set are kept verbatim in [`TransformType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TransformType {
    Direct,
    Rename,
    Cast,
    Concat,
    JsonExtract,
    DateTrunc,
    CurrencyConvert,
    ArraySize,
    CaseWhen,
    SurrogateKey,
    Sum,
    Avg,
    Min,
    Max,
    Count,
    CountDistinct,
    SumIf,
    SumWindowFunc,
    WindowFunc,
    DateToInt,
    DateDiff,
    ExtractPattern,
    Join,
    Other(String),
}

impl TransformType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Direct => "DIRECT",
            Self::Rename => "RENAME",
            Self::Cast => "CAST",
            Self::Concat => "CONCAT",
            Self::JsonExtract => "JSON_EXTRACT",
            Self::DateTrunc => "DATE_TRUNC",
            Self::CurrencyConvert => "CURRENCY_CONVERT",
            Self::ArraySize => "ARRAY_SIZE",
            Self::CaseWhen => "CASE_WHEN",
            Self::SurrogateKey => "SURROGATE_KEY",
            Self::Sum => "SUM",
            Self::Avg => "AVG",
            Self::Min => "MIN",
            Self::Max => "MAX",
            Self::Count => "COUNT",
            Self::CountDistinct => "COUNT_DISTINCT",
            Self::SumIf => "SUM_IF",
            Self::SumWindowFunc => "SUM_WINDOW_FUNC",
            Self::WindowFunc => "WINDOW_FUNC",
            Self::DateToInt => "DATE_TO_INT",
            Self::DateDiff => "DATEDIFF",
            Self::ExtractPattern => "EXTRACT_PATTERN",
            Self::Join => "JOIN",
            Self::Other(tag) => tag,
        }
    }

    /// True for transforms that fold many source rows into one value.
    pub fn is_aggregation(&self) -> bool {
        matches!(
            self,
            Self::Sum
                | Self::Avg
                | Self::Min
                | Self::Max
                | Self::Count
                | Self::CountDistinct
                | Self::SumIf
                | Self::SumWindowFunc
        )
    }
}

impl From<String> for TransformType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "DIRECT" => Self::Direct,
            "RENAME" => Self::Rename,
            "CAST" => Self::Cast,
            "CONCAT" => Self::Concat,
            "JSON_EXTRACT" => Self::JsonExtract,
            "DATE_TRUNC" => Self::DateTrunc,
            "CURRENCY_CONVERT" => Self::CurrencyConvert,
            "ARRAY_SIZE" => Self::ArraySize,
            "CASE_WHEN" => Self::CaseWhen,
            "SURROGATE_KEY" => Self::SurrogateKey,
            "SUM" => Self::Sum,
            "AVG" => Self::Avg,
            "MIN" => Self::Min,
            "MAX" => Self::Max,
            "COUNT" => Self::Count,
            "COUNT_DISTINCT" => Self::CountDistinct,
            "SUM_IF" => Self::SumIf,
            "SUM_WINDOW_FUNC" => Self::SumWindowFunc,
            "WINDOW_FUNC" => Self::WindowFunc,
            "DATE_TO_INT" => Self::DateToInt,
            "DATEDIFF" => Self::DateDiff,
            "EXTRACT_PATTERN" => Self::ExtractPattern,
            "JOIN" => Self::Join,
            _ => Self::Other(tag),
        }
    }
}

impl From<&str> for TransformType {
    fn from(tag: &str) -> Self {
        Self::from(tag.to_string())
    }
}

impl From<TransformType> for String {
    fn from(transform: TransformType) -> Self {
        match transform {
            TransformType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for TransformType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed column-to-column lineage edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ColumnLineageEdge {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub source_table: String,
    pub source_column: String,
    pub target_table: String,
    pub target_column: String,
    #[schemars(with = "String")]
    pub transform_type: TransformType,
}

impl ColumnLineageEdge {
    pub fn new(
        source: (&str, &str),
        target: (&str, &str),
        transform_type: impl Into<TransformType>,
    ) -> Self {
        Self {
            id: None,
            source_table: source.0.to_string(),
            source_column: source.1.to_string(),
            target_table: target.0.to_string(),
            target_column: target.1.to_string(),
            transform_type: transform_type.into(),
        }
    }
}

/// One directly connected column returned by an upstream/downstream query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ColumnLink {
    /// Node owning the connected column
    pub item_id: String,
    pub column_name: String,
    #[schemars(with = "String")]
    pub transform_type: TransformType,
}

impl ColumnLink {
    pub fn new(
        item_id: impl Into<String>,
        column_name: impl Into<String>,
        transform_type: impl Into<TransformType>,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            column_name: column_name.into(),
            transform_type: transform_type.into(),
        }
    }
}

/// Directly connected columns grouped by node id, in first-encounter order.
pub type RelatedColumns = IndexMap<String, IndexSet<String>>;
