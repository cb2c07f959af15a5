use crate::diagnostics::CheckError;
use super::decl::{DeclId, DeclKind, ModuleName};
use super::table::DeclarationTable;

/// The module that owns a module-level trait's methods for visibility
/// purposes: the module the trait is declared in.
///
/// Composition never changes the answer, so it is decided without looking
/// at any composing class. Ordinary traits have no fixed attribution and are
/// rejected with `NotModuleLevel`.
pub fn attribute(table: &DeclarationTable, trait_id: DeclId) -> Result<&ModuleName, CheckError> {
    let decl = table.get(trait_id)?;
    match decl.kind {
        DeclKind::ModuleLevelTrait => Ok(&decl.module),
        kind => Err(CheckError::NotModuleLevel { name: decl.name.clone(), kind, span: decl.span }),
    }
}
