use datamodel_core::HostTypeId;

/// Why a host type failed classification.
///
/// Each kind belongs to exactly one [`ErrorCategory`]. Kinds are grouped by
/// category, unsupported shapes first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Never expressible, regardless of declarations
    UnsupportedPointer,
    UnsupportedByRef,
    UnsupportedMultiDimensionalArray,
    UnsupportedSequence,
    UnsupportedDynamic,
    UnsupportedHandle,
    UnsupportedOpenGeneric,
    UnsupportedTypeParameter,
    UnsupportedNullable,
    UnsupportedQuotation,
    UnmappedType,

    // Admissible shape, malformed declaration
    MissingMapping,
    UndefinedType,
    BlankMapping,
    DuplicateMapping,
    WriteOnlyMember,
    ConstructorParameterUnmatched,
    ConstructorMemberUnmatched,
    ConstructorTypeMismatch,
    AmbiguousConstructor,
    NoConstructor,
    CycleDetected,
}

/// The two failure kinds a classification can surface. Never conflated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorCategory {
    Unsupported,
    InvalidDeclaration,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Unsupported => write!(f, "unsupported"),
            ErrorCategory::InvalidDeclaration => write!(f, "invalid-declaration"),
        }
    }
}

impl DiagnosticKind {
    pub fn category(&self) -> ErrorCategory {
        if *self < Self::MissingMapping {
            ErrorCategory::Unsupported
        } else {
            ErrorCategory::InvalidDeclaration
        }
    }

    /// Base message for this kind, used when no custom message is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::UnsupportedPointer => "pointer types are not supported",
            Self::UnsupportedByRef => "by-reference types are not supported",
            Self::UnsupportedMultiDimensionalArray => "multi-dimensional arrays are not supported",
            Self::UnsupportedSequence => "sequences without indexed access are not supported",
            Self::UnsupportedDynamic => "late-bound types are not supported",
            Self::UnsupportedHandle => "runtime handles are not supported",
            Self::UnsupportedOpenGeneric => "unbound generic definitions are not supported",
            Self::UnsupportedTypeParameter => {
                "type parameters are only supported in wildcard position"
            }
            Self::UnsupportedNullable => "nullable wrappers require a value type",
            Self::UnsupportedQuotation => "quotations must wrap a function type",
            Self::UnmappedType => "type declares no mappings",

            Self::MissingMapping => "missing mapping declaration",
            Self::UndefinedType => "type is declared but never defined",
            Self::BlankMapping => "mapping name is blank",
            Self::DuplicateMapping => "duplicate mapping name",
            Self::WriteOnlyMember => "member has no readable accessor",
            Self::ConstructorParameterUnmatched => "constructor parameter matches no member",
            Self::ConstructorMemberUnmatched => "read-only member matches no constructor parameter",
            Self::ConstructorTypeMismatch => "constructor parameter type differs from member type",
            Self::AmbiguousConstructor => "more than one constructor declares mappings",
            Self::NoConstructor => "type has no usable constructor",
            Self::CycleDetected => "cycle detected",
        }
    }

    /// Template for custom messages. Contains `{}` placeholder for caller-provided detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::UnmappedType => {
                "`{}` declares no mappings on its members or constructor parameters".to_string()
            }
            Self::UndefinedType => "`{}` is declared but never defined".to_string(),
            Self::MissingMapping => "{} has no mapping declaration".to_string(),
            Self::WriteOnlyMember => "{} has no readable accessor".to_string(),
            Self::CycleDetected => "cycle detected through {}".to_string(),
            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    /// Render the final message.
    ///
    /// - `None` → returns `fallback_message()`
    /// - `Some(detail)` → returns `custom_message()` with `{}` replaced by detail
    pub fn message(&self, detail: Option<&str>) -> String {
        match detail {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

/// One enclosing type on the path from an offending type to the root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StackFrame {
    pub ty: HostTypeId,
    pub name: String,
}

/// A single classification failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassifyError {
    pub kind: DiagnosticKind,
    /// The offending type.
    pub ty: HostTypeId,
    pub type_name: String,
    pub message: String,
    /// Offending type first, root type under classification last.
    pub stack: Vec<StackFrame>,
}

impl ClassifyError {
    pub fn category(&self) -> ErrorCategory {
        self.kind.category()
    }

    pub fn is_unsupported(&self) -> bool {
        self.category() == ErrorCategory::Unsupported
    }
}

impl std::fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(root) = self.stack.last()
            && self.stack.len() > 1
        {
            write!(f, " (in `{}`)", root.name)?;
        }
        Ok(())
    }
}

impl std::error::Error for ClassifyError {}
