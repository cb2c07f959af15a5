pub mod attribution;
pub mod decl;
pub mod table;
pub mod visibility;

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::diagnostics::{CheckError, CheckWarning, CrossModuleAccess};
use decl::{DeclId, DeclKind, ModuleName, Visibility};
use table::DeclarationTable;
use visibility::CallSite;

/// A fully collected program: the frozen declaration table plus every call
/// site found in method and function bodies.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub table: DeclarationTable,
    pub call_sites: Vec<CallSite>,
    /// The `<<__EntryPoint>>` function, if any.
    pub entry_point: Option<DeclId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// Number of call sites checked, after trait instantiation.
    pub checked: usize,
    pub rejections: Vec<CrossModuleAccess>,
    pub warnings: Vec<CheckWarning>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.rejections.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

pub fn check_program(program: &Program) -> Result<CheckReport, CheckError> {
    let sites = instantiate_trait_sites(&program.table, &program.call_sites)?;
    debug!(
        collected = program.call_sites.len(),
        instantiated = sites.len(),
        "instantiated trait call sites"
    );
    let mut report = visibility::check_all(&program.table, &sites)?;
    report.warnings = transitive_attribution_warnings(&program.table)?;
    debug!(
        checked = report.checked,
        rejections = report.rejections.len(),
        warnings = report.warnings.len(),
        "visibility check finished"
    );
    Ok(report)
}

/// Expand call sites inside ordinary trait methods into one site per host.
///
/// An ordinary trait's body is checked in the context of every class or
/// module-level trait that composes it, directly or through other ordinary
/// traits. A trait nobody composes is checked on its own.
pub fn instantiate_trait_sites(table: &DeclarationTable, sites: &[CallSite]) -> Result<Vec<CallSite>, CheckError> {
    let mut out = Vec::with_capacity(sites.len());
    for site in sites {
        let enclosing = table.enclosing_declaration(site.caller)?;
        if site.host.is_some() || table.get(enclosing)?.kind != DeclKind::Trait {
            out.push(*site);
            continue;
        }
        let hosts = hosts_of(table, enclosing)?;
        if hosts.is_empty() {
            out.push(*site);
        } else {
            out.extend(hosts.into_iter().map(|host| site.hosted_by(host)));
        }
    }
    Ok(out)
}

/// Classes and module-level traits that compose `trait_id`. Composition
/// chains through ordinary traits are followed; a module-level trait ends
/// the chain.
pub fn hosts_of(table: &DeclarationTable, trait_id: DeclId) -> Result<BTreeSet<DeclId>, CheckError> {
    let mut hosts = BTreeSet::new();
    let mut pending = vec![trait_id];
    let mut seen = BTreeSet::new();
    while let Some(current) = pending.pop() {
        if !seen.insert(current) {
            continue;
        }
        for composer in table.composers_of(current) {
            match table.get(composer)?.kind {
                DeclKind::Class | DeclKind::ModuleLevelTrait => {
                    hosts.insert(composer);
                }
                DeclKind::Trait => pending.push(composer),
                kind => {
                    return Err(CheckError::internal(format!("{kind} #{} composes a trait", composer.index())));
                }
            }
        }
    }
    Ok(hosts)
}

/// One warning per `use` inside a module-level trait.
fn transitive_attribution_warnings(table: &DeclarationTable) -> Result<Vec<CheckWarning>, CheckError> {
    let mut warnings = Vec::new();
    for (id, decl) in table.iter().filter(|(_, d)| d.is_module_level_trait()) {
        for composition in table.uses_of(id) {
            let used = table.get(composition.used)?;
            warnings.push(CheckWarning::TransitiveAttribution {
                module_level_trait: decl.name.clone(),
                used_trait: used.name.clone(),
                used_kind: used.kind,
                module: decl.module.clone(),
                span: composition.span,
            });
        }
    }
    Ok(warnings)
}

/// One row of the `decls` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclSummary {
    pub id: DeclId,
    pub name: String,
    pub kind: DeclKind,
    pub module: ModuleName,
    pub visibility: Visibility,
    /// Module that `internal` checks use for code in this declaration, when
    /// it is fixed by a module-level trait.
    pub attributed_to: Option<ModuleName>,
    pub uses: Vec<String>,
}

pub fn summarize(table: &DeclarationTable) -> Result<Vec<DeclSummary>, CheckError> {
    let mut rows = Vec::with_capacity(table.len());
    for (id, decl) in table.iter() {
        let enclosing = table.enclosing_declaration(id)?;
        let attributed_to = if table.get(enclosing)?.is_module_level_trait() {
            Some(attribution::attribute(table, enclosing)?.clone())
        } else {
            None
        };
        let uses = table
            .uses_of(id)
            .iter()
            .map(|c| table.qualified_name(c.used))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(DeclSummary {
            id,
            name: table.qualified_name(id)?,
            kind: decl.kind,
            module: decl.module.clone(),
            visibility: decl.visibility,
            attributed_to,
            uses,
        });
    }
    Ok(rows)
}
