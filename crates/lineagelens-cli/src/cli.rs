//! CLI argument parsing using clap.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use lineagelens_core::ColumnCheck;
use std::path::PathBuf;

/// LineageLens - column-level lineage explorer
#[derive(Parser, Debug)]
#[command(name = "lineagelens")]
#[command(about = "Query a lineage catalog for nodes, edges, and column lineage", long_about = None)]
#[command(version)]
pub struct Args {
    /// Lineage source JSON file (reads from stdin if omitted)
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "LINEAGELENS_GRAPH",
        global = true
    )]
    pub graph: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "table", value_enum, global = true)]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub output: Option<PathBuf>,

    /// Suppress build warnings on stderr
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Compact JSON output (no pretty-printing)
    #[arg(short, long, global = true)]
    pub compact: bool,

    /// How lineage endpoints naming undeclared columns are reported
    #[arg(long, default_value = "warn", value_enum, global = true)]
    pub column_check: ColumnCheckArg,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List nodes, optionally restricted to one depth level
    Nodes {
        /// Depth level relative to the focal node (negative = upstream)
        #[arg(long, allow_negative_numbers = true)]
        depth: Option<i32>,
    },
    /// Show one node with its columns and neighbors
    Node {
        /// Node id
        id: String,
    },
    /// Show execution metadata for an object edge
    Edge {
        /// Source node id
        source: String,
        /// Target node id
        target: String,
    },
    /// List the direct sources of a column
    Upstream {
        /// Node id owning the column
        node: String,
        /// Column name
        column: String,
    },
    /// List the direct targets of a column
    Downstream {
        /// Node id owning the column
        node: String,
        /// Column name
        column: String,
    },
    /// List columns one hop away in either direction
    Related {
        /// Node id owning the column
        node: String,
        /// Column name
        column: String,
    },
    /// Validate the lineage source and report every issue
    Validate,
    /// Print the JSON Schema of the lineage source format
    Schema,
    /// Serve the loaded graph over a read-only REST API
    #[cfg(feature = "serve")]
    Serve {
        /// Port for HTTP server
        #[arg(long, default_value = "3000")]
        port: u16,
    },
}

impl Command {
    /// Subcommand name as typed on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Nodes { .. } => "nodes",
            Self::Node { .. } => "node",
            Self::Edge { .. } => "edge",
            Self::Upstream { .. } => "upstream",
            Self::Downstream { .. } => "downstream",
            Self::Related { .. } => "related",
            Self::Validate => "validate",
            Self::Schema => "schema",
            #[cfg(feature = "serve")]
            Self::Serve { .. } => "serve",
        }
    }

    /// Whether the command can render Mermaid output.
    pub fn supports_mermaid(&self) -> bool {
        matches!(self, Self::Nodes { .. } | Self::Related { .. })
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    Table,
    /// JSON output
    Json,
    /// Mermaid diagram (nodes and related only)
    Mermaid,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Json => "json",
            Self::Mermaid => "mermaid",
        }
    }
}

/// Column check options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColumnCheckArg {
    Off,
    Warn,
    Strict,
}

impl From<ColumnCheckArg> for ColumnCheck {
    fn from(c: ColumnCheckArg) -> Self {
        match c {
            ColumnCheckArg::Off => ColumnCheck::Off,
            ColumnCheckArg::Warn => ColumnCheck::Warn,
            ColumnCheckArg::Strict => ColumnCheck::Strict,
        }
    }
}
