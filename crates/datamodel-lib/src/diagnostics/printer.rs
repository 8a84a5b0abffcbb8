//! Builder-pattern printer for classification reports.

use std::fmt::Write;

use super::ErrorReport;

/// Renders entries as `error[<category>]: <message>` followed by one
/// `  at <type>` line per stack frame.
pub struct ReportPrinter<'r> {
    report: &'r ErrorReport,
    stack: bool,
}

impl<'r> ReportPrinter<'r> {
    pub fn new(report: &'r ErrorReport) -> Self {
        Self {
            report,
            stack: true,
        }
    }

    /// Whether to print the enclosing-type stack under each entry.
    pub fn stack(mut self, value: bool) -> Self {
        self.stack = value;
        self
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        for (i, entry) in self.report.iter().enumerate() {
            if i > 0 {
                writeln!(w)?;
            }
            writeln!(w, "error[{}]: {}", entry.category(), entry.message)?;
            if !self.stack {
                continue;
            }
            for frame in &entry.stack {
                writeln!(w, "  at {}", frame.name)?;
            }
        }
        Ok(())
    }
}
