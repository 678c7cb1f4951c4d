use std::io::{self, Write};

use bourse_core::Envelope;
use serde_json::{Map, Value};

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(
    envelope: &Envelope<Value>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_envelope(&mut out, envelope, format, pretty)?;
    out.flush()?;
    Ok(())
}

pub fn write_envelope<W: Write>(
    out: &mut W,
    envelope: &Envelope<Value>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Ndjson => {
            writeln!(out, "{}", serde_json::json!({ "meta": envelope.meta }))?;
            match &envelope.data {
                Value::Array(items) => {
                    for item in items {
                        writeln!(out, "{}", serde_json::to_string(item)?)?;
                    }
                }
                other => writeln!(out, "{}", serde_json::to_string(other)?)?,
            }
        }
        OutputFormat::Table => write_table(out, envelope)?,
    }

    Ok(())
}

fn write_table<W: Write>(out: &mut W, envelope: &Envelope<Value>) -> Result<(), CliError> {
    writeln!(out, "request_id  : {}", envelope.meta.request_id)?;
    writeln!(out, "schema      : {}", envelope.meta.schema_version)?;
    writeln!(out, "generated_at: {}", envelope.meta.generated_at)?;
    writeln!(out, "latency_ms  : {}", envelope.meta.latency_ms)?;

    if !envelope.meta.warnings.is_empty() {
        writeln!(out, "warnings:")?;
        for warning in &envelope.meta.warnings {
            writeln!(out, "  - {warning}")?;
        }
    }

    writeln!(out)?;
    match &envelope.data {
        Value::Array(items) if items.iter().all(Value::is_object) && !items.is_empty() => {
            let rows: Vec<&Map<String, Value>> =
                items.iter().filter_map(Value::as_object).collect();
            write_rows(out, &rows)?;
        }
        Value::Array(items) if items.is_empty() => writeln!(out, "(no rows)")?,
        Value::Array(items) => {
            for item in items {
                writeln!(out, "{}", cell(item))?;
            }
        }
        Value::Object(object) => {
            let width = object.keys().map(String::len).max().unwrap_or(0);
            for (key, value) in object {
                writeln!(out, "{key:<width$}  {}", cell(value))?;
            }
        }
        other => writeln!(out, "{}", cell(other))?,
    }

    Ok(())
}

fn write_rows<W: Write>(out: &mut W, rows: &[&Map<String, Value>]) -> Result<(), CliError> {
    let Some(first) = rows.first() else {
        return Ok(());
    };
    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            headers
                .iter()
                .map(|header| row.get(*header).map(cell).unwrap_or_default())
                .collect()
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            cells
                .iter()
                .map(|row| row[index].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |values: Vec<&str>| {
        values
            .iter()
            .zip(&widths)
            .map(|(value, &width)| format!("{value:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_owned()
    };

    writeln!(out, "{}", line(headers.clone()))?;
    writeln!(
        out,
        "{}",
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("  ")
    )?;
    for row in &cells {
        writeln!(out, "{}", line(row.iter().map(String::as_str).collect()))?;
    }

    Ok(())
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
