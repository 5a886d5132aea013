//! YAML Export functionality

use std::io::Write;

use super::json::ExportDocument;
use super::ExportData;
use crate::error::{BudgetError, BudgetResult};

/// Export as YAML with a short comment header
pub fn export_yaml<W: Write>(data: ExportData<'_>, writer: &mut W) -> BudgetResult<()> {
    let document = ExportDocument::new(data);
    let io_err = |e: std::io::Error| BudgetError::Export(e.to_string());

    writeln!(writer, "# weekly-budget {} export", document.kind).map_err(io_err)?;
    writeln!(writer, "# Generated: {}", document.exported_at).map_err(io_err)?;
    writeln!(writer).map_err(io_err)?;

    serde_yaml::to_writer(writer, &document).map_err(|e| BudgetError::Export(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, WeeklyBudgetComparison};

    #[test]
    fn test_yaml_export() {
        let comparison = WeeklyBudgetComparison {
            week: "2025-W03".parse().unwrap(),
            category: Category::Groceries,
            actual: -480.0,
            target: -500.0,
            variance: 20.0,
            rollover_accumulated: 0.0,
            effective_target: -500.0,
        };

        let mut out = Vec::new();
        export_yaml(ExportData::Comparison(&[comparison]), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("# weekly-budget comparison export"));
        assert!(text.contains("kind: comparison"));
        assert!(text.contains("week: 2025-W03"));
        assert!(text.contains("category: groceries"));
    }
}
