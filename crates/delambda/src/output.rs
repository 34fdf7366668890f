//! Listing output: table and JSON rendering

use clap::ValueEnum;
use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use delambda_common::Function;
use serde::Serialize;

/// Output format for `list`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Presentation row for one function
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionRow {
    pub name: String,
    pub runtime: Option<String>,
    pub state: String,
    /// Present only when the function is attached
    pub vpc_id: Option<String>,
    pub subnets: usize,
    pub ipv6: bool,
}

impl From<&Function> for FunctionRow {
    fn from(f: &Function) -> Self {
        let attachment = f.attachment();
        Self {
            name: f.name.clone(),
            runtime: f.runtime.clone(),
            state: f.state.to_string(),
            vpc_id: attachment.map(|a| a.vpc_id.clone().unwrap_or_default()),
            subnets: attachment.map_or(0, |a| a.subnet_ids.len()),
            ipv6: attachment.is_some_and(|a| a.ipv6_allowed_for_dual_stack),
        }
    }
}

impl FunctionRow {
    /// Human readable VPC column
    pub fn vpc_summary(&self) -> String {
        match &self.vpc_id {
            None => "No VPC".to_string(),
            Some(id) if self.ipv6 => format!("{id} (IPv6 enabled)"),
            Some(id) => id.clone(),
        }
    }
}

pub fn rows(functions: &[Function]) -> Vec<FunctionRow> {
    functions.iter().map(FunctionRow::from).collect()
}

pub fn render_table(rows: &[FunctionRow]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Function"),
            Cell::new("Runtime"),
            Cell::new("State"),
            Cell::new("VPC"),
            Cell::new("Subnets"),
        ]);

    for row in rows {
        table.add_row(vec![
            Cell::new(&row.name),
            Cell::new(row.runtime.as_deref().unwrap_or("-")),
            Cell::new(&row.state),
            Cell::new(row.vpc_summary()),
            Cell::new(row.subnets),
        ]);
    }

    table.to_string()
}

pub fn render_json(rows: &[FunctionRow]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(rows)
}

/// Render functions in the requested format
pub fn render(functions: &[Function], format: OutputFormat) -> serde_json::Result<String> {
    let rows = rows(functions);
    match format {
        OutputFormat::Table => Ok(render_table(&rows)),
        OutputFormat::Json => render_json(&rows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delambda_common::NetworkAttachment;
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<Function> {
        vec![
            Function::new("plain").with_runtime("nodejs20.x"),
            Function::new("vpc-fn")
                .with_runtime("python3.12")
                .with_network(NetworkAttachment {
                    vpc_id: Some("vpc-123".to_string()),
                    subnet_ids: vec!["subnet-a".to_string(), "subnet-b".to_string()],
                    security_group_ids: vec!["sg-1".to_string()],
                    ipv6_allowed_for_dual_stack: true,
                }),
            Function::new("image-fn"),
        ]
    }

    #[test]
    fn test_rows() {
        let rows = rows(&sample());
        assert_eq!(rows[0].vpc_summary(), "No VPC");
        assert_eq!(rows[1].vpc_summary(), "vpc-123 (IPv6 enabled)");
        assert_eq!(rows[1].subnets, 2);
        assert_eq!(rows[2].runtime, None);
    }

    #[test]
    fn test_empty_attachment_shows_no_vpc() {
        let f = Function::new("hollow").with_network(NetworkAttachment {
            vpc_id: Some("vpc-1".to_string()),
            ..Default::default()
        });
        let row = FunctionRow::from(&f);
        assert_eq!(row.vpc_id, None);
        assert_eq!(row.vpc_summary(), "No VPC");
    }

    #[test]
    fn test_table_contains_every_function() {
        let table = render(&sample(), OutputFormat::Table).unwrap();
        for name in ["plain", "vpc-fn", "image-fn", "Runtime", "vpc-123"] {
            assert!(table.contains(name), "missing {name} in:\n{table}");
        }
    }

    #[test]
    fn test_json_shape() {
        let json = render(&sample(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(3));
        assert_eq!(value[1]["vpc_id"], "vpc-123");
        assert_eq!(value[1]["ipv6"], true);
        assert_eq!(value[0]["vpc_id"], serde_json::Value::Null);
        assert_eq!(value[2]["runtime"], serde_json::Value::Null);
    }
}
