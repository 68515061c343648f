//! Ritstaat CLI - preview, export and check spreadsheet templates

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use ritstaat::prelude::*;
use ritstaat::{export_rows, letters_to_column};
use serde::Deserialize;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ritstaat")]
#[command(
    author,
    version,
    about = "Evaluate and export spreadsheet-template formulas"
)]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace); overrides RUST_LOG
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate the computed columns of every row
    Preview {
        /// Template document (JSON)
        template: PathBuf,

        /// Rows to calculate (JSON array, '-' for stdin)
        rows: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the spreadsheet formulas of the computed columns
    Export {
        /// Template document (JSON)
        template: PathBuf,

        /// First worksheet row to export
        #[arg(short, long, default_value = "2")]
        row: u32,

        /// Number of consecutive rows
        #[arg(short = 'n', long, default_value = "1")]
        count: u32,

        /// Column holding the system variable cells
        #[arg(long, default_value = "O")]
        vars_column: String,

        /// Row of the first system variable cell
        #[arg(long, default_value = "5")]
        vars_row: u32,

        /// Print the export plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Report template problems without evaluating anything
    Check {
        /// Template document (JSON)
        template: PathBuf,
    },
}

/// A template as stored on disk
#[derive(Debug, Deserialize)]
struct TemplateDocument {
    columns: Vec<ColumnDefinition>,
    #[serde(default)]
    system_variables: SystemVariables,
    #[serde(default)]
    options: CalculationOptions,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Preview {
            template,
            rows,
            output,
        } => preview(&template, &rows, output.as_deref()),
        Commands::Export {
            template,
            row,
            count,
            vars_column,
            vars_row,
            json,
        } => export(&template, row, count, &vars_column, vars_row, json),
        Commands::Check { template } => check(&template),
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn preview(template: &Path, rows: &Path, output: Option<&Path>) -> Result<()> {
    let document = load_template(template)?;
    let rows = load_rows(rows)?;

    let calculator = RowCalculator::with_options(
        document.columns,
        document.system_variables,
        document.options,
    );

    let mut results = Vec::with_capacity(rows.len());
    let mut stats = CalculationStats::default();
    for row in &rows {
        let (values, row_stats) = calculator.calculate_with_stats(row);
        results.push(values);
        stats += row_stats;
    }

    info!(
        rows = rows.len(),
        computed = stats.computed,
        "Calculated template"
    );
    if stats.circular_references > 0 || stats.invalid_formulas > 0 || stats.non_finite_coerced > 0 {
        warn!(
            circular_references = stats.circular_references,
            invalid_formulas = stats.invalid_formulas,
            non_finite_coerced = stats.non_finite_coerced,
            "Some values were forced to 0"
        );
    }

    let json = serde_json::to_string_pretty(&results).context("Failed to serialize results")?;
    write_output(output, &json)
}

fn export(
    template: &Path,
    first_row: u32,
    count: u32,
    vars_column: &str,
    vars_row: u32,
    json: bool,
) -> Result<()> {
    let document = load_template(template)?;

    let column = letters_to_column(vars_column)
        .with_context(|| format!("Invalid system variable column '{}'", vars_column))?;
    let refs = SystemVariableRefs::stacked(document.system_variables.names(), column, vars_row);

    let plans = export_rows(
        &document.columns,
        first_row,
        count,
        &refs,
        &document.options.limits,
    );

    let text = if json {
        serde_json::to_string_pretty(&plans).context("Failed to serialize export plan")?
    } else {
        render_export_text(&plans)
    };
    write_output(None, &text)
}

fn render_export_text(plans: &[RowExport]) -> String {
    let mut out = String::new();
    for plan in plans {
        for formula in &plan.formulas {
            out.push_str(&format!("{}\t{}\n", formula.cell, formula.cell_formula()));
        }
    }
    if let Some(plan) = plans.first() {
        for (name, reference) in plan.system_variable_refs.iter() {
            out.push_str(&format!("{}\t{}\n", reference, name));
        }
    }
    out
}

fn check(template: &Path) -> Result<()> {
    let document = load_template(template)?;
    let names: Vec<&str> = document.system_variables.names().collect();

    let issues = check_template(&document.columns, &names, &document.options.limits);
    if issues.is_empty() {
        println!("{}: no problems found", template.display());
        return Ok(());
    }

    for issue in &issues {
        println!("{}", issue);
    }
    bail!("{} problem(s) found in '{}'", issues.len(), template.display())
}

fn load_template(path: &Path) -> Result<TemplateDocument> {
    let text = read_input(path)?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse template '{}'", path.display()))
}

fn load_rows(path: &Path) -> Result<Vec<Row>> {
    let text = read_input(path)?;
    serde_json::from_str(&text).with_context(|| format!("Failed to parse rows '{}'", path.display()))
}

/// Read a file, or stdin for `-`
fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }

    std::fs::read_to_string(path).with_context(|| format!("Failed to read '{}'", path.display()))
}

fn write_output(output: Option<&Path>, text: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            info!(path = %path.display(), "Wrote output");
        }
        None => {
            writeln!(io::stdout().lock(), "{}", text).context("Failed to write to stdout")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    fn temp_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const TEMPLATE: &str = r#"{
        "columns": [
            {"id": "begin_km", "kind": "data"},
            {"id": "eind_km", "kind": "data"},
            {"id": "km", "kind": "berekend", "formula": "=eind_km-begin_km"},
            {"id": "vergoeding", "kind": "computed", "formula": "=km*tarief_per_km"}
        ],
        "system_variables": {"tarief_per_km": 0.25}
    }"#;

    #[test]
    fn test_load_template() {
        let file = temp_file(TEMPLATE);
        let document = load_template(file.path()).unwrap();

        assert_eq!(document.columns.len(), 4);
        assert!(document.columns[2].is_computed());
        assert_eq!(document.system_variables.get("tarief_per_km"), Some(0.25));
        assert_eq!(document.options, CalculationOptions::default());
    }

    #[test]
    fn test_load_template_with_options() {
        let file = temp_file(
            r#"{
                "columns": [{"id": "a", "kind": "data"}],
                "options": {"limits": {"max_formula_length": 80}, "field_map": {"a": "alpha"}}
            }"#,
        );
        let document = load_template(file.path()).unwrap();

        assert_eq!(document.options.limits.max_formula_length, 80);
        assert_eq!(document.options.limits.max_tokens, 200);
        assert_eq!(document.options.field_map.property_for("a"), "alpha");
    }

    #[test]
    fn test_load_rows_and_calculate() {
        let template = load_template(temp_file(TEMPLATE).path()).unwrap();
        let rows = load_rows(
            temp_file(r#"[{"begin_km": 100, "end_km": "180"}, {"begin_km": null}]"#).path(),
        )
        .unwrap();
        assert_eq!(rows.len(), 2);

        let calculator = RowCalculator::with_options(
            template.columns,
            template.system_variables,
            template.options,
        );
        let results = calculator.calculate_rows(&rows);
        assert_eq!(results[0].get("vergoeding"), Some(20.0));
        assert_eq!(results[1].get("vergoeding"), Some(0.0));
    }

    #[test]
    fn test_load_errors() {
        let missing = Path::new("/nonexistent/template.json");
        let err = load_template(missing).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));

        let file = temp_file("{ not json");
        let err = load_template(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse template"));
    }

    #[test]
    fn test_render_export_text() {
        let template = load_template(temp_file(TEMPLATE).path()).unwrap();
        let refs = SystemVariableRefs::stacked(template.system_variables.names(), 15, 5);
        let plans = export_rows(&template.columns, 2, 1, &refs, &FormulaLimits::default());

        assert_eq!(
            render_export_text(&plans),
            "C2\t=B2-A2\nD2\t=C2*$O$5\n$O$5\ttarief_per_km\n"
        );
    }
}
