//! Output formatting: JSON records or flattened metric samples.
//!
//! `RecordWriter` is the binary's `MetricsSink`: each record is rendered and
//! written as soon as the collector hands it over.

use std::fmt::Write as _;
use std::io::{self, Write};

use ontwatch_core::{MetricsSink, Record, Sample};

use crate::cli::OutputFormat;

/// Streams records to a writer in the chosen format.
pub struct RecordWriter<W: Write> {
    format: OutputFormat,
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(format: OutputFormat, out: W) -> Self {
        Self {
            format,
            out,
            error: None,
        }
    }

    /// Flush, surfacing the first write error seen since the last flush.
    pub fn flush(&mut self) -> io::Result<()> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.out.flush()
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }

    fn write_record(&mut self, record: &Record) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut self.out, record)?;
                writeln!(self.out)
            }
            OutputFormat::JsonCompact => {
                serde_json::to_writer(&mut self.out, record)?;
                writeln!(self.out)
            }
            OutputFormat::Plain => {
                for sample in record.samples() {
                    writeln!(self.out, "{}", render_sample(&sample))?;
                }
                Ok(())
            }
        }
    }
}

impl<W: Write> MetricsSink for RecordWriter<W> {
    fn emit(&mut self, record: Record) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.write_record(&record) {
            self.error = Some(err);
        }
    }
}

/// Print a status line to stdout.
pub fn print_output(output: &str) {
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Sample lines ─────────────────────────────────────────────────────

/// `name{label="value",...} value`
pub fn render_sample(sample: &Sample) -> String {
    let mut line = String::from(sample.name);
    if !sample.labels.is_empty() {
        line.push('{');
        for (i, (key, value)) in sample.labels.iter().enumerate() {
            if i > 0 {
                line.push(',');
            }
            let _ = write!(line, "{key}=\"{}\"", escape_label(value));
        }
        line.push('}');
    }
    let _ = write!(line, " {}", sample.value);
    line
}

fn escape_label(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            other => escaped.push(other),
        }
    }
    escaped
}
