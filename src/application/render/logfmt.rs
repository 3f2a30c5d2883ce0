//! Structured-log output.
//!
//! Each outcome becomes one `tracing` event, routed through a `fmt`
//! subscriber installed only for the duration of the render. The subscriber
//! formats events as logfmt (`level=info repo=api key=value ...`) into a
//! buffer that is then copied to the caller's writer.

use serde_json::Value;
use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, MakeWriter};
use tracing_subscriber::registry::LookupSpan;

use crate::application::outcome::Outcome;
use crate::application::record::display_value;
use crate::common::result::BulkerResult;

const REPORT_TARGET: &str = "bulker::report";

const ENTITY_FIELD: &str = "entity";
const NAME_FIELD: &str = "name";
const FIELDS_FIELD: &str = "fields";

/// Emit one event per outcome and write the formatted records to `out`
pub(super) fn render<'a, W, I>(entity: &str, outcomes: I, out: &mut W) -> BulkerResult<()>
where
    W: Write,
    I: IntoIterator<Item = (&'a Outcome, Vec<&'a (String, Value)>)>,
{
    let buffer = ReportBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .event_format(LogfmtFormat)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        for (outcome, fields) in outcomes {
            let fields = RecordFields(&fields);
            match &outcome.error {
                Some(error) => tracing::error!(
                    target: REPORT_TARGET,
                    entity = entity,
                    name = outcome.name.as_str(),
                    fields = %fields,
                    error = %error
                ),
                None => tracing::info!(
                    target: REPORT_TARGET,
                    entity = entity,
                    name = outcome.name.as_str(),
                    fields = %fields
                ),
            }
        }
    });

    out.write_all(&buffer.take())?;
    Ok(())
}

/// Shared sink the scoped subscriber writes into
#[derive(Clone, Default)]
struct ReportBuffer(Arc<Mutex<Vec<u8>>>);

impl ReportBuffer {
    fn take(&self) -> Vec<u8> {
        match self.0.lock() {
            Ok(mut buf) => std::mem::take(&mut *buf),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Write for ReportBuffer {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut buf = self
            .0
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "report buffer poisoned"))?;
        buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for ReportBuffer {
    type Writer = ReportBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Record fields carried as one event field; `tracing` field names are static
struct RecordFields<'a>(&'a [&'a (String, Value)]);

impl fmt::Display for RecordFields<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.0 {
            write!(f, " {}={}", key, quote(&display_value(value)))?;
        }
        Ok(())
    }
}

/// `level=<level>` followed by the event's fields
struct LogfmtFormat;

impl<S, N> FormatEvent<S, N> for LogfmtFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let level = event.metadata().level().to_string().to_lowercase();
        write!(writer, "level={}", level)?;

        let mut visitor = LogfmtVisitor {
            writer: &mut writer,
            entity: String::new(),
            result: Ok(()),
        };
        event.record(&mut visitor);
        visitor.result?;

        writeln!(writer)
    }
}

struct LogfmtVisitor<'a, 'w> {
    writer: &'a mut Writer<'w>,
    entity: String,
    result: fmt::Result,
}

impl Visit for LogfmtVisitor<'_, '_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_text(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_text(field, format!("{:?}", value));
    }
}

impl LogfmtVisitor<'_, '_> {
    fn record_text(&mut self, field: &Field, text: String) {
        if self.result.is_err() {
            return;
        }
        self.result = match field.name() {
            ENTITY_FIELD => {
                self.entity = text;
                Ok(())
            }
            NAME_FIELD => write!(self.writer, " {}={}", self.entity, quote(&text)),
            FIELDS_FIELD => write!(self.writer, "{}", text),
            other => write!(self.writer, " {}={}", other, quote(&text)),
        };
    }
}

fn quote(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '=' || c.is_control());
    if needs_quotes {
        format!("{:?}", value)
    } else {
        value.to_string()
    }
}
