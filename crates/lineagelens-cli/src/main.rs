//! LineageLens CLI - column-level lineage explorer

use lineagelens_cli::cli;
use lineagelens_cli::input;
use lineagelens_cli::output;
#[cfg(feature = "serve")]
use lineagelens_cli::server;

use anyhow::{Context, Result};
use clap::Parser;
use is_terminal::IsTerminal;
use lineagelens_core::{GraphOptions, Issue, LineageGraph, LineageSource, Node, Severity};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use cli::{Args, Command, OutputFormat};
use output::{
    format_column_neighborhood, format_edge, format_json, format_links, format_node,
    format_nodes, format_object_graph, format_related, format_validation, ValidationReport,
};

/// Query found nothing or validation failed.
const EXIT_FAILURE: u8 = 1;
/// Configuration or load error (e.g. unsupported format for the given command).
const EXIT_CONFIG_ERROR: u8 = 66;

/// What a command produced.
enum Outcome {
    /// Rendered output for a non-empty result.
    Found(String),
    /// Rendered output for an empty result (still printed, exits with failure).
    Empty(String),
    /// The requested node or edge does not exist.
    Missing(String),
}

impl Outcome {
    fn listing(rendered: String, is_empty: bool) -> Self {
        if is_empty {
            Self::Empty(rendered)
        } else {
            Self::Found(rendered)
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.format == OutputFormat::Mermaid && !args.command.supports_mermaid() {
        eprintln!(
            "lineagelens: error: '{}' does not support {} output",
            args.command.name(),
            args.format.as_str()
        );
        return ExitCode::from(EXIT_CONFIG_ERROR);
    }

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_FAILURE),
        Err(e) => {
            eprintln!("lineagelens: error: {e:#}");
            ExitCode::from(EXIT_CONFIG_ERROR)
        }
    }
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

/// Run one command. Returns `false` when the command should exit with failure.
fn run(args: &Args) -> Result<bool> {
    let colored = args.output.is_none() && io::stdout().is_terminal();

    let outcome = match &args.command {
        Command::Schema => {
            let schema = schemars::schema_for!(LineageSource);
            Outcome::Found(format_json(&schema, args.compact).context("Failed to render schema")?)
        }
        Command::Validate => return run_validate(args, colored),
        #[cfg(feature = "serve")]
        Command::Serve { port } => return run_serve(args, *port),
        Command::Nodes { depth } => {
            let (_, graph) = load_graph(args)?;
            let nodes: Vec<&Node> = match depth {
                Some(level) => graph.nodes_at_depth(*level),
                None => graph.list_nodes().iter().collect(),
            };
            let rendered = match args.format {
                OutputFormat::Table => format_nodes(&nodes, colored),
                OutputFormat::Json => format_json(&nodes, args.compact)?,
                OutputFormat::Mermaid => format_object_graph(&nodes),
            };
            Outcome::listing(rendered, nodes.is_empty())
        }
        Command::Node { id } => {
            let (_, graph) = load_graph(args)?;
            match graph.get_node(id) {
                None => Outcome::Missing(format!("node '{id}' not found")),
                Some(node) => Outcome::Found(match args.format {
                    OutputFormat::Json => format_json(node, args.compact)?,
                    _ => format_node(
                        node,
                        &graph.upstream_nodes(id),
                        &graph.downstream_nodes(id),
                        colored,
                    ),
                }),
            }
        }
        Command::Edge { source, target } => {
            let (_, graph) = load_graph(args)?;
            match graph.get_object_edge(source, target) {
                None => Outcome::Missing(format!("no object edge from '{source}' to '{target}'")),
                Some(edge) => Outcome::Found(match args.format {
                    OutputFormat::Json => format_json(edge, args.compact)?,
                    _ => format_edge(edge, colored),
                }),
            }
        }
        Command::Upstream { node, column } => {
            let (_, graph) = load_graph(args)?;
            let links = graph.get_upstream_columns(node, column);
            let rendered = match args.format {
                OutputFormat::Json => format_json(&links, args.compact)?,
                _ => format_links(&format!("Upstream of {node}.{column}"), &links, colored),
            };
            Outcome::listing(rendered, links.is_empty())
        }
        Command::Downstream { node, column } => {
            let (_, graph) = load_graph(args)?;
            let links = graph.get_downstream_columns(node, column);
            let rendered = match args.format {
                OutputFormat::Json => format_json(&links, args.compact)?,
                _ => format_links(&format!("Downstream of {node}.{column}"), &links, colored),
            };
            Outcome::listing(rendered, links.is_empty())
        }
        Command::Related { node, column } => {
            let (_, graph) = load_graph(args)?;
            let related = graph.get_related_columns(node, column);
            let rendered = match args.format {
                OutputFormat::Table => format_related(node, column, &related, colored),
                OutputFormat::Json => format_json(&related, args.compact)?,
                OutputFormat::Mermaid => format_column_neighborhood(
                    node,
                    column,
                    &graph.get_upstream_columns(node, column),
                    &graph.get_downstream_columns(node, column),
                ),
            };
            Outcome::listing(rendered, related.is_empty())
        }
    };

    match outcome {
        Outcome::Found(rendered) => {
            write_output(&args.output, &rendered)?;
            Ok(true)
        }
        Outcome::Empty(rendered) => {
            write_output(&args.output, &rendered)?;
            Ok(false)
        }
        Outcome::Missing(message) => {
            eprintln!("lineagelens: {message}");
            Ok(false)
        }
    }
}

/// Build the graph and report every issue, whether or not the build succeeded.
fn run_validate(args: &Args, colored: bool) -> Result<bool> {
    let (name, source) = input::load_source(args.graph.as_deref())?;
    let result = LineageGraph::build(source, &graph_options(args));
    let report = ValidationReport::from_build(name, &result);

    let rendered = match args.format {
        OutputFormat::Json => format_json(&report, args.compact)?,
        _ => format_validation(&report, colored),
    };
    write_output(&args.output, &rendered)?;

    Ok(report.valid)
}

/// Run the read-only REST API over the loaded graph until Ctrl+C.
#[cfg(feature = "serve")]
fn run_serve(args: &Args, port: u16) -> Result<bool> {
    use server::ServerConfig;

    let (source_name, graph) = load_graph(args)?;
    let config = ServerConfig { port, source_name };

    let runtime = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
    runtime.block_on(server::run_server(config, graph))?;

    Ok(true)
}

fn graph_options(args: &Args) -> GraphOptions {
    GraphOptions {
        column_check: args.column_check.into(),
    }
}

/// Load and build the graph, printing non-fatal issues unless quiet or JSON.
fn load_graph(args: &Args) -> Result<(String, LineageGraph)> {
    let (name, source) = input::load_source(args.graph.as_deref())?;
    let graph = LineageGraph::build(source, &graph_options(args))
        .with_context(|| format!("Failed to build lineage graph from {name}"))?;

    if !args.quiet && args.format != OutputFormat::Json {
        print_issues_to_stderr(graph.issues());
    }

    Ok((name, graph))
}

fn write_output(path: &Option<PathBuf>, content: &str) -> Result<()> {
    if let Some(path) = path {
        fs::write(path, content)
            .with_context(|| format!("Failed to write to {}", path.display()))?;
    } else {
        io::stdout()
            .write_all(content.as_bytes())
            .context("Failed to write to stdout")?;
        // Ensure newline at end for terminal output
        if !content.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}

fn print_issues_to_stderr(issues: &[Issue]) {
    for issue in issues {
        let level = match issue.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };

        let location = match (&issue.node_id, &issue.column) {
            (Some(node), Some(column)) => format!(" ({node}.{column})"),
            (Some(node), None) => format!(" ({node})"),
            _ => String::new(),
        };

        eprintln!("lineagelens: {level}:{location} {}", issue.message);
    }
}
