mod logfmt;

use serde_json::{Map, Value};
use std::io::Write;
use tabled::{builder::Builder, settings::Style};
use tracing::warn;

use super::outcome::{Outcome, Outcomes};
use super::record::display_value;
use crate::common::result::BulkerResult;
use crate::domain::value_objects::OutputFormat;

const ERROR_FIELD: &str = "error";

/// Renders collected outcomes.
///
/// Entries with neither a result nor an error are left out in every format
/// and entries are always emitted in name order.
#[derive(Debug, Clone)]
pub struct Renderer {
    format: OutputFormat,
    entity: String,
}

impl Renderer {
    /// `entity` labels the name column/key (`repo`, `group`, ...)
    pub fn new(format: OutputFormat, entity: impl Into<String>) -> Self {
        Self {
            format,
            entity: entity.into(),
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn render<W: Write>(&self, outcomes: &Outcomes, out: &mut W) -> BulkerResult<()> {
        let visible: Vec<&Outcome> = outcomes.visible().collect();

        match self.format {
            OutputFormat::Json => self.render_json(&visible, out),
            OutputFormat::Line => self.render_lines(&visible, out),
            OutputFormat::Log => self.render_log(&visible, out),
            OutputFormat::Table => self.render_table(&visible, out),
        }
    }

    /// Result fields of `outcome`, without keys that would shadow the
    /// entity name or the error
    fn payload<'a>(&self, outcome: &'a Outcome) -> Vec<&'a (String, Value)> {
        outcome
            .result
            .iter()
            .flat_map(|r| r.fields())
            .filter(|(key, _)| {
                let reserved = *key == self.entity || key == ERROR_FIELD;
                if reserved {
                    warn!(name = %outcome.name, field = %key, "dropping reserved result field");
                }
                !reserved
            })
            .collect()
    }

    pub fn render_to_string(&self, outcomes: &Outcomes) -> BulkerResult<String> {
        let mut out = Vec::new();
        self.render(outcomes, &mut out)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    fn render_json<W: Write>(&self, visible: &[&Outcome], out: &mut W) -> BulkerResult<()> {
        let rows: Vec<Value> = visible
            .iter()
            .map(|outcome| {
                let mut row = Map::new();
                row.insert(self.entity.clone(), Value::String(outcome.name.clone()));
                for (key, value) in self.payload(outcome) {
                    row.insert(key.clone(), value.clone());
                }
                if let Some(error) = &outcome.error {
                    row.insert(ERROR_FIELD.to_string(), Value::String(error.to_string()));
                }
                Value::Object(row)
            })
            .collect();

        writeln!(out, "{}", serde_json::to_string_pretty(&rows)?)?;
        Ok(())
    }

    fn render_lines<W: Write>(&self, visible: &[&Outcome], out: &mut W) -> BulkerResult<()> {
        for outcome in visible {
            let mut parts: Vec<String> = self
                .payload(outcome)
                .into_iter()
                .map(|(key, value)| format!("{}={}", key, display_value(value)))
                .collect();
            if let Some(error) = &outcome.error {
                parts.push(error.to_string());
            }

            if parts.is_empty() {
                writeln!(out, "{}", outcome.name)?;
            } else {
                writeln!(out, "{}: {}", outcome.name, parts.join(" "))?;
            }
        }
        Ok(())
    }

    fn render_log<W: Write>(&self, visible: &[&Outcome], out: &mut W) -> BulkerResult<()> {
        let entries = visible.iter().map(|outcome| (*outcome, self.payload(outcome)));
        logfmt::render(&self.entity, entries, out)
    }

    fn render_table<W: Write>(&self, visible: &[&Outcome], out: &mut W) -> BulkerResult<()> {
        if visible.is_empty() {
            return Ok(());
        }

        // Columns come from the first entry carrying a result
        let columns: Vec<String> = visible
            .iter()
            .find_map(|o| o.result.as_ref())
            .map(|r| {
                r.keys()
                    .filter(|k| *k != self.entity && *k != ERROR_FIELD)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        let with_error = visible.iter().any(|o| o.is_failure());

        let mut builder = Builder::new();
        let mut header = vec![self.entity.clone()];
        header.extend(columns.iter().cloned());
        if with_error {
            header.push(ERROR_FIELD.to_string());
        }
        builder.push_record(header);

        for outcome in visible {
            let mut row = vec![outcome.name.clone()];
            for column in &columns {
                let cell = outcome
                    .result
                    .as_ref()
                    .and_then(|r| r.get(column))
                    .map(display_value)
                    .unwrap_or_default();
                row.push(cell);
            }
            if with_error {
                row.push(outcome.error.as_ref().map(|e| e.to_string()).unwrap_or_default());
            }
            builder.push_record(row);
        }

        let table = builder.build().with(Style::rounded()).to_string();
        writeln!(out, "{}", table)?;
        Ok(())
    }
}
