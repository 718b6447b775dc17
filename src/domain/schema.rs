//! Catalog snapshot used to ground generation.

use serde::Serialize;
use utoipa::ToSchema;

/// One column as reported by `information_schema.columns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SchemaColumn {
    pub table_name: String,
    pub column_name: String,
    /// Postgres data type as reported by the catalog (e.g. `text`, `numeric`).
    pub data_type: String,
}

impl SchemaColumn {
    pub fn new(table: &str, column: &str, data_type: &str) -> Self {
        Self {
            table_name: table.to_string(),
            column_name: column.to_string(),
            data_type: data_type.to_string(),
        }
    }
}

/// Columns of the accessible namespace, ordered by table then declaration order.
///
/// Rendering is a single pass: a new `Table:` header is emitted whenever the
/// table name changes, so the ordering must keep each table's columns contiguous.
#[derive(Debug, Clone, Default)]
pub struct SchemaDescription {
    columns: Vec<SchemaColumn>,
}

impl SchemaDescription {
    pub fn new(columns: Vec<SchemaColumn>) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &[SchemaColumn] {
        &self.columns
    }

    pub fn into_columns(self) -> Vec<SchemaColumn> {
        self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn table_count(&self) -> usize {
        let mut count = 0;
        let mut current: Option<&str> = None;
        for col in &self.columns {
            if current != Some(col.table_name.as_str()) {
                current = Some(col.table_name.as_str());
                count += 1;
            }
        }
        count
    }

    pub fn render(&self) -> String {
        let mut text = String::from("Database Schema:\n\n");
        let mut current: Option<&str> = None;

        for col in &self.columns {
            if current != Some(col.table_name.as_str()) {
                current = Some(col.table_name.as_str());
                text.push_str(&format!("\nTable: {}\n", col.table_name));
            }
            text.push_str(&format!("  - {} ({})\n", col.column_name, col.data_type));
        }

        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_tables() -> SchemaDescription {
        SchemaDescription::new(vec![
            SchemaColumn::new("Customer", "CustomerId", "integer"),
            SchemaColumn::new("Customer", "Name", "text"),
            SchemaColumn::new("Invoice", "Total", "numeric"),
        ])
    }

    #[test]
    fn renders_one_header_per_table() {
        let text = two_tables().render();
        assert_eq!(text.matches("Table:").count(), 2);
        assert_eq!(two_tables().table_count(), 2);
    }

    #[test]
    fn columns_follow_their_own_header_in_order() {
        let text = two_tables().render();
        let customer = text.find("Table: Customer").unwrap();
        let id = text.find("  - CustomerId (integer)").unwrap();
        let name = text.find("  - Name (text)").unwrap();
        let invoice = text.find("Table: Invoice").unwrap();
        let total = text.find("  - Total (numeric)").unwrap();
        assert!(customer < id && id < name && name < invoice && invoice < total);
    }

    #[test]
    fn exact_layout() {
        let text = two_tables().render();
        assert_eq!(
            text,
            "Database Schema:\n\n\nTable: Customer\n  - CustomerId (integer)\n  - Name (text)\n\nTable: Invoice\n  - Total (numeric)\n"
        );
    }

    #[test]
    fn empty_schema_renders_only_the_title() {
        let desc = SchemaDescription::default();
        assert!(desc.is_empty());
        assert_eq!(desc.render(), "Database Schema:\n\n");
    }
}
