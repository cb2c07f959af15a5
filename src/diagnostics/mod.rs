use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::span::Span;
use crate::typeck::CheckReport;
use crate::typeck::decl::{DeclKind, ModuleName};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    #[error("duplicate declaration: {kind} `{name}` is already declared")]
    DuplicateDeclaration {
        kind: &'static str,
        name: String,
        span: Span,
        previous: Span,
    },

    #[error("undefined symbol `{name}`")]
    UnknownDeclaration { name: String, span: Span },

    #[error("undefined module `{name}`")]
    UnknownModule { name: String, span: Span },

    #[error("`{name}` is a {kind}, not a module-level trait")]
    NotModuleLevel { name: String, kind: DeclKind, span: Span },

    #[error(transparent)]
    CrossModuleInternalAccess(#[from] CrossModuleAccess),

    #[error("invalid composition: {msg}")]
    InvalidComposition { msg: String, span: Span },

    #[error("trait composition cycle: {cycle}")]
    CompositionCycle { cycle: String, span: Span },

    #[error("module-level trait `{name}` requires the unstable feature `{feature}`")]
    UnstableFeature { feature: String, name: String, span: Span },

    #[error("Manifest error: {msg}")]
    Manifest { msg: String, path: Option<PathBuf>, span: Option<Span> },

    #[error("internal error: {msg}")]
    Internal { msg: String },
}

impl CheckError {
    pub fn manifest(msg: impl Into<String>, span: Option<Span>) -> Self {
        Self::Manifest { msg: msg.into(), path: None, span }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal { msg: msg.into() }
    }

    pub fn unknown(name: impl Into<String>, span: Span) -> Self {
        Self::UnknownDeclaration { name: name.into(), span }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            CheckError::DuplicateDeclaration { span, .. }
            | CheckError::UnknownDeclaration { span, .. }
            | CheckError::UnknownModule { span, .. }
            | CheckError::NotModuleLevel { span, .. }
            | CheckError::InvalidComposition { span, .. }
            | CheckError::CompositionCycle { span, .. }
            | CheckError::UnstableFeature { span, .. } => Some(*span),
            CheckError::CrossModuleInternalAccess(access) => Some(access.span),
            CheckError::Manifest { span, .. } => *span,
            CheckError::Internal { .. } => None,
        }
    }

    /// Point an error raised without source context (e.g. by a bare `lookup`) at `at`.
    pub fn at(mut self, at: Span) -> Self {
        match &mut self {
            CheckError::UnknownDeclaration { span, .. }
            | CheckError::UnknownModule { span, .. }
            | CheckError::NotModuleLevel { span, .. }
            | CheckError::InvalidComposition { span, .. }
            | CheckError::CompositionCycle { span, .. } => {
                if span.is_dummy() {
                    *span = at;
                }
            }
            CheckError::Manifest { span, .. } => {
                if span.is_none() {
                    *span = Some(at);
                }
            }
            _ => {}
        }
        self
    }

    pub fn with_path(self, path: PathBuf) -> Self {
        match self {
            CheckError::Manifest { msg, span, .. } => CheckError::Manifest { msg, path: Some(path), span },
            other => other,
        }
    }
}

/// A call site whose effective module differs from the module of the
/// `internal` member it invokes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("cannot access internal member `{target_name}` of module `{target_module}` from module `{caller_module}`")]
pub struct CrossModuleAccess {
    pub caller_module: ModuleName,
    pub target_module: ModuleName,
    pub target_name: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckWarning {
    /// A module-level trait composes another trait. How attribution flows
    /// through such chains is a language-level open question, so every
    /// occurrence is surfaced.
    TransitiveAttribution {
        module_level_trait: String,
        used_trait: String,
        used_kind: DeclKind,
        module: ModuleName,
        span: Span,
    },
}

impl CheckWarning {
    pub fn span(&self) -> Span {
        match self {
            CheckWarning::TransitiveAttribution { span, .. } => *span,
        }
    }
}

impl fmt::Display for CheckWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckWarning::TransitiveAttribution { module_level_trait, used_trait, used_kind, module, .. } => {
                if *used_kind == DeclKind::ModuleLevelTrait {
                    write!(
                        f,
                        "module-level trait `{module_level_trait}` composes module-level trait `{used_trait}`; `{used_trait}` keeps its own module attribution"
                    )
                } else {
                    write!(
                        f,
                        "module-level trait `{module_level_trait}` composes trait `{used_trait}`; methods of `{used_trait}` are attributed to module `{module}` through `{module_level_trait}`"
                    )
                }
            }
        }
    }
}

/// Render a CheckError with ariadne for nice terminal output.
pub fn render_error(source: &str, filename: &str, err: &CheckError) {
    use ariadne::{Label, Report, ReportKind, Source};

    let Some(span) = err.span().filter(|s| !s.is_dummy()) else {
        match err {
            CheckError::Manifest { msg, path: Some(path), .. } => {
                eprintln!("error[manifest]: {msg}");
                eprintln!("  --> {}", path.display());
            }
            _ => eprintln!("error [{filename}]: {err}"),
        }
        return;
    };

    let kind_str = match err {
        CheckError::CrossModuleInternalAccess(_) => "visibility",
        CheckError::Manifest { .. } => "manifest",
        CheckError::Internal { .. } => "internal",
        _ => "declaration",
    };
    let mut report = Report::build(ReportKind::Error, (), span.start)
        .with_message(format!("{kind_str} error"))
        .with_label(Label::new(span.range()).with_message(err.to_string()));
    if let CheckError::DuplicateDeclaration { previous, .. } = err {
        if !previous.is_dummy() {
            report = report.with_label(Label::new(previous.range()).with_message("previously declared here"));
        }
    }
    if report.finish().eprint(Source::from(source)).is_err() {
        eprintln!("error [{filename}]: {err}");
    }
}

pub fn render_warning(source: &str, warning: &CheckWarning) {
    use ariadne::{Label, Report, ReportKind, Source};

    let span = warning.span();
    if span.is_dummy() {
        eprintln!("warning: {warning}");
        return;
    }
    let written = Report::build(ReportKind::Warning, (), span.start)
        .with_message("trait attribution")
        .with_label(Label::new(span.range()).with_message(warning.to_string()))
        .finish()
        .eprint(Source::from(source));
    if written.is_err() {
        eprintln!("warning: {warning}");
    }
}

/// Render every rejection and warning collected in a check pass.
pub fn render_report(source: &str, filename: &str, report: &CheckReport) {
    for warning in &report.warnings {
        render_warning(source, warning);
    }
    for rejection in &report.rejections {
        render_error(source, filename, &CheckError::from(rejection.clone()));
    }
}
