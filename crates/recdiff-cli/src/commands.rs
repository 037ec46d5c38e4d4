use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use colored::Colorize;
use recdiff_sdk::{DiffConfig, Reconciler, Record, SpliceValue, Value};
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let reconciler = build_reconciler(&cli)?;
    let Cli { command, format, .. } = cli;
    match command {
        Command::Diff(args) => cmd_diff(&reconciler, args, &format),
        Command::Patch(args) => cmd_patch(&reconciler, args),
        Command::Check(args) => cmd_check(&reconciler, args, &format),
    }
}

fn cmd_diff(reconciler: &Reconciler, args: DiffArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let a = read_document(&args.a)?;
    let b = read_document(&args.b)?;
    let records = reconciler.diff(&a, &b)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
        OutputFormat::Text if records.is_empty() => println!("{} No differences.", "✓".green()),
        OutputFormat::Text => {
            for line in render_records(&records) {
                println!("{line}");
            }
        }
    }
    Ok(())
}

fn cmd_patch(reconciler: &Reconciler, args: PatchArgs) -> anyhow::Result<()> {
    let patched = patch_document(reconciler, &args.target, &args.records)?;
    let rendered = serde_json::to_string_pretty(&patched)?;
    match &args.output {
        Some(path) => {
            fs::write(path, rendered + "\n")
                .with_context(|| format!("writing {}", path.display()))?;
            println!("{} Patched {} → {}", "✓".green().bold(), args.target.display(), path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn cmd_check(reconciler: &Reconciler, args: CheckArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let a = read_document(&args.a)?;
    let b = read_document(&args.b)?;
    let report = check_documents(reconciler, &a, &b)?;

    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({"records": report.records, "converged": report.converged})
        ),
        OutputFormat::Text if report.converged => println!(
            "{} {} record(s) turn {} into {}",
            "✓".green().bold(),
            report.records.to_string().bold(),
            args.b.display(),
            args.a.display()
        ),
        OutputFormat::Text => {}
    }

    if !report.converged {
        bail!(
            "patching {} with its diff did not reproduce {}",
            args.b.display(),
            args.a.display()
        );
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load the diff configuration and fold the command-line flags into it.
fn build_reconciler(cli: &Cli) -> anyhow::Result<Reconciler> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => DiffConfig::default(),
    };
    config.ignore_properties.extend(cli.ignore.iter().cloned());
    config.ignore_property_patterns.extend(cli.ignore_regex.iter().cloned());
    config.ignore_property_values.extend(cli.ignore_value.iter().cloned());
    debug!(?config, "diff configuration");
    Ok(Reconciler::from_config(&config)?)
}

fn load_config(path: &Path) -> anyhow::Result<DiffConfig> {
    let source =
        fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    let config = if path.extension().is_some_and(|ext| ext == "json") {
        DiffConfig::from_json_str(&source)
    } else {
        DiffConfig::from_toml_str(&source)
    };
    config.with_context(|| format!("parsing config {}", path.display()))
}

fn read_document(path: &Path) -> anyhow::Result<Value> {
    let source = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let json: serde_json::Value =
        serde_json::from_str(&source).with_context(|| format!("parsing {}", path.display()))?;
    Ok(Value::from(json))
}

fn read_records(path: &Path) -> anyhow::Result<Vec<Record>> {
    let source = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&source).with_context(|| format!("parsing records {}", path.display()))
}

fn patch_document(reconciler: &Reconciler, target: &Path, records: &Path) -> anyhow::Result<Value> {
    let mut document = read_document(target)?;
    let records = read_records(records)?;
    reconciler
        .patch(&mut document, records)
        .with_context(|| format!("patching {}", target.display()))?;
    Ok(document)
}

struct CheckReport {
    records: usize,
    converged: bool,
}

fn check_documents(reconciler: &Reconciler, a: &Value, b: &Value) -> anyhow::Result<CheckReport> {
    let records = reconciler.diff(a, b)?;
    let count = records.len();
    let mut patched = b.clone();
    reconciler.patch(&mut patched, records)?;
    Ok(CheckReport {
        records: count,
        converged: &patched == a,
    })
}

fn render_records(records: &[Record]) -> Vec<String> {
    let mut lines = Vec::new();
    render_into(records, 0, &mut lines);
    lines
}

fn render_into(records: &[Record], depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    for record in records {
        match record {
            Record::Add {
                name,
                descriptor,
                value_records,
            } => {
                lines.push(format!("{indent}{} {} = {}", "+".green(), name.bold(), preview(&descriptor.value)));
                render_into(value_records, depth + 1, lines);
            }
            Record::Update {
                name,
                descriptor,
                value_records,
            } => {
                lines.push(format!("{indent}{} {} = {}", "~".yellow(), name.bold(), preview(&descriptor.value)));
                render_into(value_records, depth + 1, lines);
            }
            Record::Delete { name } => lines.push(format!("{indent}{} {}", "-".red(), name.bold())),
            Record::Splice(splice) => {
                lines.push(format!(
                    "{indent}{} splice at {} delete {}",
                    "@".cyan(),
                    splice.start,
                    splice.delete_count
                ));
                for (offset, value) in splice.add.iter().enumerate() {
                    let index = splice.start + offset;
                    match value {
                        SpliceValue::Value(value) => {
                            lines.push(format!("{indent}  [{index}] = {}", preview(value)))
                        }
                        SpliceValue::Array(nested) => {
                            lines.push(format!("{indent}  [{index}] = []"));
                            render_into(nested, depth + 2, lines);
                        }
                        SpliceValue::Object(nested) => {
                            lines.push(format!("{indent}  [{index}] = {{}}"));
                            render_into(nested, depth + 2, lines);
                        }
                    }
                }
            }
            Record::Construct(_) => lines.push(format!("{indent}{} {record}", "*".magenta())),
        }
    }
}

fn preview(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("<{}>", value.type_name()))
}
