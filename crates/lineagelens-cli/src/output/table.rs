//! Human-readable table output formatting.

use lineagelens_core::{
    AlertKind, Column, ColumnLink, Node, ObjectEdge, RelatedColumns, RunStatus, Severity,
};
use owo_colors::OwoColorize;
use std::fmt::{self, Write};
use tabled::{settings::Style, Table, Tabled};

use super::ValidationReport;

#[derive(Tabled)]
struct NodeRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    obj_type: String,
    #[tabled(rename = "Depth")]
    depth: i32,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Columns")]
    columns: usize,
    #[tabled(rename = "Flags")]
    flags: String,
}

impl From<&Node> for NodeRow {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            obj_type: node.obj_type().to_string(),
            depth: node.depth_level,
            location: node.location.display_name(),
            columns: node.columns().count(),
            flags: node_flags(node),
        }
    }
}

#[derive(Tabled)]
struct ColumnRow {
    #[tabled(rename = "Column")]
    name: String,
    #[tabled(rename = "Type")]
    data_type: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Column> for ColumnRow {
    fn from(column: &Column) -> Self {
        let key = match (column.is_primary_key, column.is_foreign_key) {
            (true, true) => "PK, FK",
            (true, false) => "PK",
            (false, true) => "FK",
            (false, false) => "",
        };
        Self {
            name: column.name.clone(),
            data_type: column.data_type.clone(),
            kind: column
                .kind()
                .map(|kind| format!("{kind:?}").to_lowercase())
                .unwrap_or_default(),
            role: format!("{:?}", column.role).to_lowercase(),
            key: key.to_string(),
            description: column.description.clone().unwrap_or_default(),
        }
    }
}

#[derive(Tabled)]
struct LinkRow {
    #[tabled(rename = "Node")]
    item_id: String,
    #[tabled(rename = "Column")]
    column_name: String,
    #[tabled(rename = "Transform")]
    transform: String,
}

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "Task")]
    name: String,
    #[tabled(rename = "Type")]
    task_type: String,
    #[tabled(rename = "Schedule")]
    schedule: String,
    #[tabled(rename = "Last run")]
    last_run: String,
    #[tabled(rename = "Status")]
    status: String,
}

#[derive(Tabled)]
struct ProcedureRow {
    #[tabled(rename = "Procedure")]
    name: String,
    #[tabled(rename = "Schema")]
    schema: String,
    #[tabled(rename = "Modified")]
    last_modified: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// Format a node listing.
pub fn format_nodes(nodes: &[&Node], colored: bool) -> String {
    render(|out| {
        write_header(out, "Lineage Nodes", colored)?;
        if nodes.is_empty() {
            return writeln!(out, "No nodes found");
        }
        let rows: Vec<NodeRow> = nodes.iter().map(|node| NodeRow::from(*node)).collect();
        writeln!(out, "{}", Table::new(rows).with(Style::rounded()))?;
        writeln!(out, "{} node(s)", nodes.len())
    })
}

/// Format one node with its descriptors and direct neighbors.
pub fn format_node(node: &Node, upstream: &[&Node], downstream: &[&Node], colored: bool) -> String {
    render(|out| {
        write_header(out, &format!("{} ({})", node.name, node.obj_type()), colored)?;
        write_field(out, "ID", &node.id, colored)?;
        write_field(out, "Location", &node.location.display_name(), colored)?;
        write_field(out, "Depth", &node.depth_level.to_string(), colored)?;
        if node.is_focal {
            write_field(out, "Focal", "yes", colored)?;
        }
        if let Some(description) = &node.description {
            write_field(out, "Description", description, colored)?;
        }
        if let Some(owner) = &node.owner {
            write_field(out, "Owner", owner, colored)?;
        }
        if let Some(created_at) = node.created_at {
            write_field(out, "Created", &created_at.to_string(), colored)?;
        }
        if let Some(quality) = node.data_quality {
            write_field(out, "Quality", &format!("{quality:?}"), colored)?;
        }
        if let Some(row_count) = node.row_count {
            write_field(out, "Rows", &row_count.to_string(), colored)?;
        }
        if !node.tags.is_empty() {
            let tags: Vec<_> = node.tags.iter().map(String::as_str).collect();
            write_field(out, "Tags", &tags.join(", "), colored)?;
        }
        for alert in &node.alerts {
            let label = alert_label(alert.kind, colored);
            let message = alert.message.as_deref().unwrap_or("");
            writeln!(out, "  [{label}] {message}")?;
        }
        writeln!(out)?;

        let columns: Vec<ColumnRow> = node.columns().map(ColumnRow::from).collect();
        if !columns.is_empty() {
            writeln!(out, "{}", Table::new(columns).with(Style::rounded()))?;
            writeln!(out)?;
        }

        write_neighbors(out, "Upstream", upstream, colored)?;
        write_neighbors(out, "Downstream", downstream, colored)
    })
}

/// Format the execution metadata of an object edge.
pub fn format_edge(edge: &ObjectEdge, colored: bool) -> String {
    render(|out| {
        write_header(out, &format!("{} → {}", edge.source, edge.target), colored)?;
        if let Some(id) = &edge.id {
            write_field(out, "ID", id, colored)?;
        }
        if let Some(query_type) = &edge.query_type {
            write_field(out, "Query type", query_type, colored)?;
        }
        if let Some(tool) = &edge.external_tool {
            write_field(out, "Tool", &tool.name, colored)?;
        }
        if let Some(run_by) = &edge.run_by {
            write_field(out, "Run by", run_by, colored)?;
        }
        if let Some(run_on) = edge.run_on {
            write_field(out, "Run on", &run_on.to_string(), colored)?;
        }
        if let Some(duration) = &edge.duration {
            write_field(out, "Duration", duration, colored)?;
        }
        if let Some(row_count) = edge.row_count {
            write_field(out, "Rows", &row_count.to_string(), colored)?;
        }
        if let Some(query_id) = &edge.query_id {
            write_field(out, "Query ID", query_id, colored)?;
        }
        writeln!(out)?;

        if !edge.tasks.is_empty() {
            let rows: Vec<TaskRow> = edge
                .tasks
                .iter()
                .map(|task| TaskRow {
                    name: task.name.clone(),
                    task_type: task.task_type.clone(),
                    schedule: task.schedule.clone().unwrap_or_default(),
                    last_run: task.last_run.map(|t| t.to_string()).unwrap_or_default(),
                    status: status_label(task.status, colored),
                })
                .collect();
            writeln!(out, "{}", Table::new(rows).with(Style::rounded()))?;
        }
        if !edge.stored_procedures.is_empty() {
            let rows: Vec<ProcedureRow> = edge
                .stored_procedures
                .iter()
                .map(|procedure| ProcedureRow {
                    name: procedure.name.clone(),
                    schema: procedure.schema.clone(),
                    last_modified: procedure.last_modified.map(|d| d.to_string()).unwrap_or_default(),
                    status: status_label(procedure.status, colored),
                })
                .collect();
            writeln!(out, "{}", Table::new(rows).with(Style::rounded()))?;
        }
        if let Some(sql) = &edge.sql_query {
            writeln!(out)?;
            writeln!(out, "{sql}")?;
        }
        Ok(())
    })
}

/// Format upstream or downstream column links.
pub fn format_links(heading: &str, links: &[ColumnLink], colored: bool) -> String {
    render(|out| {
        write_header(out, heading, colored)?;
        if links.is_empty() {
            return writeln!(out, "No lineage found");
        }
        let rows: Vec<LinkRow> = links
            .iter()
            .map(|link| LinkRow {
                item_id: link.item_id.clone(),
                column_name: link.column_name.clone(),
                transform: link.transform_type.to_string(),
            })
            .collect();
        writeln!(out, "{}", Table::new(rows).with(Style::rounded()))
    })
}

/// Format the one-hop neighborhood of a column grouped by node.
pub fn format_related(node_id: &str, column: &str, related: &RelatedColumns, colored: bool) -> String {
    render(|out| {
        write_header(out, &format!("Related to {node_id}.{column}"), colored)?;
        if related.is_empty() {
            return writeln!(out, "No related columns found");
        }
        for (item_id, columns) in related {
            let columns: Vec<_> = columns.iter().map(String::as_str).collect();
            if colored {
                writeln!(out, "  {}: {}", item_id.cyan(), columns.join(", "))?;
            } else {
                writeln!(out, "  {item_id}: {}", columns.join(", "))?;
            }
        }
        Ok(())
    })
}

/// Format a validation report: summary when the build succeeded, then every issue.
pub fn format_validation(report: &ValidationReport, colored: bool) -> String {
    render(|out| {
        write_header(out, &format!("Validation: {}", report.source), colored)?;

        let verdict = if report.valid { "valid" } else { "invalid" };
        if colored && report.valid {
            writeln!(out, "Result: {}", verdict.green())?;
        } else if colored {
            writeln!(out, "Result: {}", verdict.red())?;
        } else {
            writeln!(out, "Result: {verdict}")?;
        }

        if let Some(summary) = &report.summary {
            let stats = format!(
                "Summary: {} nodes | {} depth levels | {} object edges | {} column edges",
                summary.node_count,
                summary.depth_count,
                summary.object_edge_count,
                summary.column_edge_count
            );
            if colored {
                writeln!(out, "{}", stats.cyan())?;
            } else {
                writeln!(out, "{stats}")?;
            }
            if let Some(focal) = &summary.focal_node {
                writeln!(out, "Focal node: {focal}")?;
            }
        }
        writeln!(out)?;

        if report.issues.is_empty() {
            return writeln!(out, "No issues found");
        }

        writeln!(out, "Issues ({}):", report.issues.len())?;
        for issue in &report.issues {
            let severity = severity_label(issue.severity, colored);
            writeln!(out, "  [{severity}] {issue}")?;
        }
        Ok(())
    })
}

/// Runs a writer against a fresh buffer. Writing into a `String` cannot fail.
fn render(write: impl FnOnce(&mut String) -> fmt::Result) -> String {
    let mut out = String::new();
    let _ = write(&mut out);
    out
}

fn write_header(out: &mut String, title: &str, colored: bool) -> fmt::Result {
    let line = "═".repeat(50);

    if colored {
        writeln!(out, "{}", title.bold())?;
        writeln!(out, "{}", line.dimmed())
    } else {
        writeln!(out, "{title}")?;
        writeln!(out, "{line}")
    }
}

fn write_field(out: &mut String, label: &str, value: &str, colored: bool) -> fmt::Result {
    let label = format!("{label}:");
    if colored {
        writeln!(out, "{:<13}{value}", label.dimmed())
    } else {
        writeln!(out, "{label:<13}{value}")
    }
}

fn write_neighbors(out: &mut String, title: &str, nodes: &[&Node], colored: bool) -> fmt::Result {
    if nodes.is_empty() {
        return Ok(());
    }
    let ids: Vec<_> = nodes.iter().map(|node| node.id.as_str()).collect();
    let arrow = if colored {
        "→".green().to_string()
    } else {
        "→".to_string()
    };
    writeln!(out, "{title} {arrow} {}", ids.join(", "))
}

fn node_flags(node: &Node) -> String {
    let mut flags = Vec::new();
    if node.is_focal {
        flags.push("focal");
    }
    if node.has_alert(AlertKind::Error) {
        flags.push("error");
    }
    if node.has_alert(AlertKind::Warning) {
        flags.push("warning");
    }
    if node.has_alert(AlertKind::UpstreamIssue) {
        flags.push("upstream-issue");
    }
    flags.join(", ")
}

fn alert_label(kind: AlertKind, colored: bool) -> String {
    match (kind, colored) {
        (AlertKind::Error, true) => "ERROR".red().to_string(),
        (AlertKind::Error, false) => "ERROR".to_string(),
        (AlertKind::Warning, true) => "WARN".yellow().to_string(),
        (AlertKind::Warning, false) => "WARN".to_string(),
        (AlertKind::UpstreamIssue, true) => "UPSTREAM".yellow().to_string(),
        (AlertKind::UpstreamIssue, false) => "UPSTREAM".to_string(),
    }
}

fn severity_label(severity: Severity, colored: bool) -> String {
    match (severity, colored) {
        (Severity::Error, true) => "ERROR".red().to_string(),
        (Severity::Error, false) => "ERROR".to_string(),
        (Severity::Warning, true) => "WARN".yellow().to_string(),
        (Severity::Warning, false) => "WARN".to_string(),
        (Severity::Info, true) => "INFO".blue().to_string(),
        (Severity::Info, false) => "INFO".to_string(),
    }
}

fn status_label(status: RunStatus, colored: bool) -> String {
    match (status, colored) {
        (RunStatus::Success, true) => "success".green().to_string(),
        (RunStatus::Scheduled, true) => "scheduled".blue().to_string(),
        (RunStatus::Running, true) => "running".yellow().to_string(),
        (RunStatus::Failed, true) => "failed".red().to_string(),
        (RunStatus::Success, false) => "success".to_string(),
        (RunStatus::Scheduled, false) => "scheduled".to_string(),
        (RunStatus::Running, false) => "running".to_string(),
        (RunStatus::Failed, false) => "failed".to_string(),
    }
}
