mod message;
mod printer;


use datamodel_core::{HostTypeId, TypeRegistry};

pub use message::{ClassifyError, DiagnosticKind, ErrorCategory, StackFrame};
pub use printer::ReportPrinter;

/// The errors collected while classifying one root type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorReport {
    entries: Vec<ClassifyError>,
}

#[must_use = "diagnostic not emitted, call .emit()"]
pub struct ReportBuilder<'a> {
    report: &'a mut ErrorReport,
    entry: ClassifyError,
}

impl ErrorReport {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Start an entry for `ty` with the kind's default message and a
    /// single-frame stack. Call `.message()` and `.stack()` to refine it.
    pub fn report(
        &mut self,
        kind: DiagnosticKind,
        ty: HostTypeId,
        registry: &TypeRegistry,
    ) -> ReportBuilder<'_> {
        let type_name = registry.display(ty);
        ReportBuilder {
            report: self,
            entry: ClassifyError {
                kind,
                ty,
                stack: vec![StackFrame {
                    ty,
                    name: type_name.clone(),
                }],
                type_name,
                message: kind.fallback_message().to_string(),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassifyError> {
        self.entries.iter()
    }

    pub fn first(&self) -> Option<&ClassifyError> {
        self.entries.first()
    }

    pub fn has_unsupported(&self) -> bool {
        self.entries.iter().any(ClassifyError::is_unsupported)
    }

    pub fn has_invalid_declarations(&self) -> bool {
        self.entries.iter().any(|e| !e.is_unsupported())
    }

    pub fn kinds(&self) -> Vec<DiagnosticKind> {
        self.entries.iter().map(|e| e.kind).collect()
    }

    pub fn printer(&self) -> ReportPrinter<'_> {
        ReportPrinter::new(self)
    }

    pub fn render(&self) -> String {
        self.printer().render()
    }

    pub fn extend(&mut self, other: ErrorReport) {
        self.entries.extend(other.entries);
    }

    pub(crate) fn push(&mut self, entry: ClassifyError) {
        self.entries.push(entry);
    }
}

impl<'r> IntoIterator for &'r ErrorReport {
    type Item = &'r ClassifyError;
    type IntoIter = std::slice::Iter<'r, ClassifyError>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<'a> ReportBuilder<'a> {
    /// Provide custom detail for this entry, rendered using the kind's template.
    pub fn message(mut self, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        self.entry.message = self.entry.kind.message(Some(&detail));
        self
    }

    /// Replace the stack. The offending type must come first.
    pub fn stack(mut self, frames: Vec<StackFrame>) -> Self {
        debug_assert!(frames.first().is_none_or(|f| f.ty == self.entry.ty));
        self.entry.stack = frames;
        self
    }

    pub fn emit(self) {
        self.report.push(self.entry);
    }
}
