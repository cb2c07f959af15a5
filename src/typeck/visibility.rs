use serde::Serialize;
use tracing::trace;

use crate::diagnostics::{CheckError, CrossModuleAccess};
use crate::span::Span;
use super::CheckReport;
use super::attribution::attribute;
use super::decl::{DeclId, DeclKind, ModuleName, Visibility};
use super::table::DeclarationTable;

/// A reference, inside the body of `caller`, to the member `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CallSite {
    /// Method or free function whose body contains the call.
    pub caller: DeclId,
    pub target: DeclId,
    /// Class or module-level trait through which an ordinary trait's body
    /// is being checked.
    pub host: Option<DeclId>,
    pub span: Span,
}

impl CallSite {
    pub fn new(caller: DeclId, target: DeclId) -> Self {
        Self { caller, target, host: None, span: Span::dummy() }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn hosted_by(mut self, host: DeclId) -> Self {
        self.host = Some(host);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", content = "reason", rename_all = "snake_case")]
pub enum Verdict {
    Accept,
    Reject(CrossModuleAccess),
}

impl Verdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }
}

/// The module a call site is attributed to for `internal` checks.
///
/// Module-level trait bodies belong to the trait's declaring module.
/// Ordinary trait bodies belong to their host when one is given, else to
/// the trait's own module. Everything else belongs to the module of the
/// enclosing class or function.
pub fn effective_module<'t>(table: &'t DeclarationTable, site: &CallSite) -> Result<&'t ModuleName, CheckError> {
    let enclosing_id = table.enclosing_declaration(site.caller)?;
    let enclosing = table.get(enclosing_id)?;
    match (enclosing.kind, site.host) {
        (DeclKind::ModuleLevelTrait, _) => attribute(table, enclosing_id),
        (DeclKind::Trait, Some(host)) => host_module(table, host, enclosing_id, site.span),
        _ => Ok(&enclosing.module),
    }
}

fn host_module<'t>(
    table: &'t DeclarationTable,
    host: DeclId,
    trait_id: DeclId,
    span: Span,
) -> Result<&'t ModuleName, CheckError> {
    let host_decl = table.get(host)?;
    let trait_decl = table.get(trait_id)?;
    match host_decl.kind {
        DeclKind::Class | DeclKind::ModuleLevelTrait => {}
        kind => {
            return Err(CheckError::InvalidComposition {
                msg: format!(
                    "{kind} `{}` cannot host trait `{}`; only classes and module-level traits can",
                    host_decl.name, trait_decl.name
                ),
                span,
            });
        }
    }
    if !table.composes(host, trait_id) {
        return Err(CheckError::InvalidComposition {
            msg: format!("`{}` does not use trait `{}`", host_decl.name, trait_decl.name),
            span,
        });
    }
    if host_decl.kind == DeclKind::ModuleLevelTrait {
        attribute(table, host)
    } else {
        Ok(&host_decl.module)
    }
}

/// Decide whether `site` may invoke its target.
///
/// Public targets are always accepted. `internal` targets are accepted iff
/// the call site's effective module is the target's owning module.
pub fn check(table: &DeclarationTable, site: &CallSite) -> Result<Verdict, CheckError> {
    let target = table.get(site.target)?;
    if target.visibility == Visibility::Public {
        return Ok(Verdict::Accept);
    }
    let effective = effective_module(table, site)?;
    if *effective == target.module {
        return Ok(Verdict::Accept);
    }
    Ok(Verdict::Reject(CrossModuleAccess {
        caller_module: effective.clone(),
        target_module: target.module.clone(),
        target_name: target.name.clone(),
        span: site.span,
    }))
}

/// Check every site independently. Structural errors abort the pass;
/// rejections are collected into the report.
pub fn check_all<'a>(
    table: &DeclarationTable,
    sites: impl IntoIterator<Item = &'a CallSite>,
) -> Result<CheckReport, CheckError> {
    let mut report = CheckReport::default();
    for site in sites {
        let verdict = check(table, site)?;
        trace!(
            caller = ?site.caller,
            target = ?site.target,
            accepted = verdict.is_accept(),
            "checked call site"
        );
        report.checked += 1;
        if let Verdict::Reject(access) = verdict {
            report.rejections.push(access);
        }
    }
    Ok(report)
}
