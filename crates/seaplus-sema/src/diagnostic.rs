use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SemanticErrorKind {
    UndeclaredVariable,
    RedeclaredVariable,
    TypeMismatch,
    UninitializedVariable,
    InvalidOperation,
    ScopeViolation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Severity {
    Error,
    /// Reported, but does not fail the analysis.
    Warning,
}

/// One semantic finding: what went wrong, about which name, where.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Diagnostic {
    pub kind: SemanticErrorKind,
    pub name: Option<String>,
    pub line: u32,
    pub severity: Severity,
}

impl Diagnostic {
    pub fn error(kind: SemanticErrorKind, name: impl Into<String>, line: u32) -> Self {
        Diagnostic {
            kind,
            name: Some(name.into()),
            line,
            severity: Severity::Error,
        }
    }

    pub fn warning(kind: SemanticErrorKind, name: impl Into<String>, line: u32) -> Self {
        Diagnostic {
            kind,
            name: Some(name.into()),
            line,
            severity: Severity::Warning,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Error => "Semantic Error",
            Severity::Warning => "Semantic Warning",
        };
        write!(f, "{} at line {}: ", label, self.line)?;
        let name = self.name.as_deref().unwrap_or("?");
        match self.kind {
            SemanticErrorKind::UndeclaredVariable => write!(f, "undeclared variable '{}'", name),
            SemanticErrorKind::RedeclaredVariable => {
                write!(f, "variable '{}' already declared in this scope", name)
            }
            SemanticErrorKind::TypeMismatch => write!(f, "type mismatch involving '{}'", name),
            SemanticErrorKind::UninitializedVariable => {
                write!(f, "variable '{}' may be used uninitialized", name)
            }
            SemanticErrorKind::InvalidOperation => write!(f, "invalid operation on '{}'", name),
            SemanticErrorKind::ScopeViolation => {
                write!(f, "'{}' may only be declared at program scope", name)
            }
        }
    }
}

impl std::error::Error for Diagnostic {}
