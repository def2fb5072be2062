use crate::corpus::Corpus;
use crate::symbol::Symbol;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

pub fn stats_table(stats: &[(&str, String)]) -> String {
    let mut builder = TableBuilder::new();
    for (label, value) in stats {
        builder.add_row(label, value);
    }
    builder.build()
}

/// One member line in an interface or scope listing
#[derive(Tabled)]
pub struct MemberRow {
    #[tabled(rename = "Kind")]
    pub kind: String,
    #[tabled(rename = "Member")]
    pub member: String,
    #[tabled(rename = "Access")]
    pub access: String,
    #[tabled(rename = "Declared in")]
    pub declared_in: String,
}

impl MemberRow {
    pub fn new(corpus: &Corpus, symbol: &Symbol) -> Self {
        let member = match symbol.as_overloads() {
            Some(info) => format!("{} ({} overloads)", symbol.display_name(), info.members.len()),
            None => symbol.short_description(),
        };
        let declared_in = match symbol.source.primary() {
            Some(loc) => loc.to_string(),
            None => corpus.qualified_name(symbol.parent),
        };

        Self {
            kind: symbol.kind().to_string(),
            member,
            access: symbol.access.to_string(),
            declared_in,
        }
    }
}

pub fn member_table(rows: &[MemberRow]) -> String {
    if rows.is_empty() {
        return String::new();
    }
    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tables_render_nothing() {
        assert!(TableBuilder::new().build().is_empty());
        assert!(member_table(&[]).is_empty());
    }

    #[test]
    fn test_stats_table_has_rows() {
        let table = stats_table(&[("Symbols", "12".to_string()), ("Files", "3".to_string())]);
        assert!(table.contains("Symbols"));
        assert!(table.contains("12"));
        assert!(table.contains("Metric"));
    }
}
