//! Trace reporter: the engine's only output channel.
//!
//! The engine narrates each suite and each method it is about to run as one line of text into a
//! [`TraceSink`]. Nothing reads those lines back; there is no result object.
//!
//! ## Line format
//!
//! ```text
//! Class [demo::Counter]
//!   Setup [fn init(&mut self)]
//!   Test [fn hit(&mut self)]
//!   Teardown [fn done(&mut self)]
//! ```

use std::io::{self, Write};

use crate::engine::executor::Phase;
use crate::suite::{MethodInfo, SuiteType};

/// Destination for trace lines.
pub trait TraceSink {
    /// Accept one line of trace text (without a trailing newline).
    fn write_line(&mut self, line: &str);
}

/// Collects lines in memory.
impl TraceSink for Vec<String> {
    fn write_line(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

impl<T: TraceSink + ?Sized> TraceSink for &mut T {
    fn write_line(&mut self, line: &str) {
        (**self).write_line(line);
    }
}

impl<T: TraceSink + ?Sized> TraceSink for Box<T> {
    fn write_line(&mut self, line: &str) {
        (**self).write_line(line);
    }
}

/// Forwards lines to `tracing` at INFO level under the `trellis::trace` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn write_line(&mut self, line: &str) {
        tracing::info!(target: "trellis::trace", "{}", line);
    }
}

/// Writes newline-terminated lines to any `io::Write`.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write> TraceSink for WriterSink<W> {
    fn write_line(&mut self, line: &str) {
        // Write errors are logged, never propagated into the run.
        if let Err(e) = writeln!(self.writer, "{}", line) {
            tracing::warn!("dropping trace line: {}", e);
        }
    }
}

/// Format the line announcing a suite.
pub fn suite_line(suite: &SuiteType) -> String {
    format!("Class [{}]", suite.name())
}

/// Format the line announcing a method attempt.
pub fn method_line(phase: Phase, method: &MethodInfo) -> String {
    format!("  {} [{}]", phase, method.signature())
}

/// Narrates engine progress into a sink.
pub struct TraceReporter<'s> {
    sink: &'s mut dyn TraceSink,
}

impl<'s> TraceReporter<'s> {
    pub fn new(sink: &'s mut dyn TraceSink) -> Self {
        Self { sink }
    }

    pub fn on_suite_start(&mut self, suite: &SuiteType) {
        self.sink.write_line(&suite_line(suite));
    }

    pub fn on_method_start(&mut self, phase: Phase, method: &MethodInfo) {
        self.sink.write_line(&method_line(phase, method));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suite::Method;

    #[derive(Default)]
    struct Demo;

    fn demo() -> SuiteType {
        SuiteType::builder::<Demo>("demo::Demo")
            .suite()
            .method(Method::new("init", |_: &mut Demo| Ok(())).setup())
            .build()
    }

    #[test]
    fn test_line_formats() {
        let suite = demo();
        assert_eq!(suite_line(&suite), "Class [demo::Demo]");
        assert_eq!(method_line(Phase::Setup, &suite.methods()[0]), "  Setup [fn init(&mut self)]");
        assert_eq!(method_line(Phase::Teardown, &suite.methods()[0]), "  Teardown [fn init(&mut self)]");
    }

    #[test]
    fn test_reporter_writes_through_sink() {
        let suite = demo();
        let mut lines: Vec<String> = Vec::new();
        {
            let mut reporter = TraceReporter::new(&mut lines);
            reporter.on_suite_start(&suite);
            reporter.on_method_start(Phase::Test, &suite.methods()[0]);
        }
        assert_eq!(lines, vec!["Class [demo::Demo]", "  Test [fn init(&mut self)]"]);
    }

    #[test]
    fn test_writer_sink_terminates_lines() {
        let mut sink = WriterSink::new(Vec::new());
        sink.write_line("Class [a]");
        sink.write_line("  Test [fn b(&mut self)]");
        let text = String::from_utf8(sink.into_inner()).unwrap_or_default();
        assert_eq!(text, "Class [a]\n  Test [fn b(&mut self)]\n");
    }
}
