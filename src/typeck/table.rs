use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::trace;

use crate::diagnostics::CheckError;
use crate::span::Span;
use super::decl::{DeclId, DeclKind, Declaration, ModuleName, Visibility};

/// A `use T;` edge from a class or trait to a trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Composition {
    pub used: DeclId,
    pub span: Span,
}

/// Every declaration of a program, with the modules they live in and the
/// trait composition graph.
///
/// Populated once by a collector (see `crate::manifest`), then only read.
#[derive(Debug, Default, Clone)]
pub struct DeclarationTable {
    modules: BTreeMap<ModuleName, Span>,
    decls: Vec<Declaration>,
    top_level: HashMap<String, DeclId>,
    members: HashMap<(DeclId, String), DeclId>,
    /// Member ids per owner, in declaration order.
    member_order: HashMap<DeclId, Vec<DeclId>>,
    uses: HashMap<DeclId, Vec<Composition>>,
}

impl DeclarationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare_module(&mut self, name: ModuleName, span: Span) -> Result<(), CheckError> {
        if let Some(previous) = self.modules.get(&name) {
            return Err(CheckError::DuplicateDeclaration {
                kind: "module",
                name: name.to_string(),
                span,
                previous: *previous,
            });
        }
        trace!(module = %name, "declared module");
        self.modules.insert(name, span);
        Ok(())
    }

    pub fn has_module(&self, name: &ModuleName) -> bool {
        self.modules.contains_key(name)
    }

    pub fn modules(&self) -> impl Iterator<Item = &ModuleName> {
        self.modules.keys()
    }

    /// Register a class, trait or free function in the global scope.
    pub fn register(&mut self, decl: Declaration) -> Result<DeclId, CheckError> {
        if decl.parent.is_some() || decl.kind == DeclKind::Method {
            return Err(CheckError::internal(format!(
                "`{}` must be registered with register_method",
                decl.name
            )));
        }
        if !self.has_module(&decl.module) {
            return Err(CheckError::UnknownModule { name: decl.module.to_string(), span: decl.span });
        }
        if let Some(&previous) = self.top_level.get(&decl.name) {
            return Err(CheckError::DuplicateDeclaration {
                kind: decl.kind.describe(),
                name: decl.name,
                span: decl.span,
                previous: self.decls[previous.index()].span,
            });
        }
        let name = decl.name.clone();
        let id = self.push(decl);
        self.top_level.insert(name, id);
        Ok(id)
    }

    /// Register a method in the scope of `owner`. The method inherits the
    /// owner's module.
    pub fn register_method(
        &mut self,
        owner: DeclId,
        name: impl Into<String>,
        visibility: Visibility,
        span: Span,
    ) -> Result<DeclId, CheckError> {
        let name = name.into();
        let owner_decl = self.get(owner)?;
        if !owner_decl.kind.has_members() {
            return Err(CheckError::internal(format!(
                "{} `{}` cannot declare method `{}`",
                owner_decl.kind, owner_decl.name, name
            )));
        }
        let module = owner_decl.module.clone();
        if let Some(&previous) = self.members.get(&(owner, name.clone())) {
            return Err(CheckError::DuplicateDeclaration {
                kind: "method",
                name: format!("{}::{}", owner_decl.name, name),
                span,
                previous: self.decls[previous.index()].span,
            });
        }
        let id = self.push(Declaration {
            name: name.clone(),
            kind: DeclKind::Method,
            module,
            visibility,
            parent: Some(owner),
            span,
        });
        self.members.insert((owner, name), id);
        self.member_order.entry(owner).or_default().push(id);
        Ok(id)
    }

    fn push(&mut self, decl: Declaration) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        trace!(name = %decl.name, kind = %decl.kind, module = %decl.module, "registered declaration");
        self.decls.push(decl);
        id
    }

    /// Record `composer uses used;`. Repeating an existing edge is a no-op.
    pub fn add_use(&mut self, composer: DeclId, used: DeclId, span: Span) -> Result<(), CheckError> {
        let composer_decl = self.get(composer)?;
        let used_decl = self.get(used)?;
        if !composer_decl.kind.has_members() {
            return Err(CheckError::InvalidComposition {
                msg: format!("{} `{}` cannot use traits", composer_decl.kind, composer_decl.name),
                span,
            });
        }
        if !used_decl.kind.is_trait() {
            return Err(CheckError::InvalidComposition {
                msg: format!("`{}` is a {}, only traits can be used", used_decl.name, used_decl.kind),
                span,
            });
        }
        if self.uses_of(composer).iter().any(|c| c.used == used) {
            return Ok(());
        }
        if let Some(path) = self.composition_path(used, composer) {
            let cycle = std::iter::once(composer)
                .chain(path)
                .map(|id| self.decls[id.index()].name.as_str())
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(CheckError::CompositionCycle { cycle, span });
        }
        self.uses.entry(composer).or_default().push(Composition { used, span });
        Ok(())
    }

    /// Path of uses from `from` to `to` (both inclusive), if `from` reaches `to`.
    ///
    /// Depth-first in `use` order; each declaration is expanded once.
    fn composition_path(&self, from: DeclId, to: DeclId) -> Option<Vec<DeclId>> {
        let mut reached_from: HashMap<DeclId, Option<DeclId>> = HashMap::new();
        let mut pending = vec![(from, None)];
        while let Some((current, parent)) = pending.pop() {
            if reached_from.contains_key(&current) {
                continue;
            }
            reached_from.insert(current, parent);
            if current == to {
                let mut path = vec![current];
                let mut step = parent;
                while let Some(id) = step {
                    path.push(id);
                    step = reached_from.get(&id).copied().flatten();
                }
                path.reverse();
                return Some(path);
            }
            pending.extend(self.uses_of(current).iter().rev().map(|c| (c.used, Some(current))));
        }
        None
    }

    pub fn uses_of(&self, id: DeclId) -> &[Composition] {
        self.uses.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `host` composes `trait_id`, directly or through other traits.
    pub fn composes(&self, host: DeclId, trait_id: DeclId) -> bool {
        host != trait_id && self.composition_path(host, trait_id).is_some()
    }

    /// Every declaration that directly uses `trait_id`, in registration order.
    pub fn composers_of(&self, trait_id: DeclId) -> Vec<DeclId> {
        let mut composers: Vec<DeclId> = self
            .uses
            .iter()
            .filter(|(_, edges)| edges.iter().any(|c| c.used == trait_id))
            .map(|(&composer, _)| composer)
            .collect();
        composers.sort();
        composers
    }

    pub fn get(&self, id: DeclId) -> Result<&Declaration, CheckError> {
        self.decls
            .get(id.index())
            .ok_or_else(|| CheckError::internal(format!("declaration #{} is not in this table", id.0)))
    }

    /// Resolve `X` (top-level) or `X::m` (member of `X`, through its traits).
    pub fn lookup(&self, name: &str) -> Result<DeclId, CheckError> {
        let unknown = || CheckError::unknown(name, Span::dummy());
        match name.split_once("::") {
            None => self.top_level.get(name).copied().ok_or_else(unknown),
            Some((owner, member)) => {
                let owner = self.top_level.get(owner).copied().ok_or_else(unknown)?;
                self.resolve_method(owner, member).ok_or_else(unknown)
            }
        }
    }

    /// Method-resolution surface: own methods first, then used traits
    /// depth-first in `use` order.
    pub fn resolve_method(&self, owner: DeclId, name: &str) -> Option<DeclId> {
        let mut seen = HashSet::new();
        let mut pending = vec![owner];
        while let Some(current) = pending.pop() {
            if !seen.insert(current) {
                continue;
            }
            if let Some(&id) = self.members.get(&(current, name.to_string())) {
                return Some(id);
            }
            pending.extend(self.uses_of(current).iter().rev().map(|c| c.used));
        }
        None
    }

    pub fn methods_of(&self, owner: DeclId) -> &[DeclId] {
        self.member_order.get(&owner).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The class or trait a method belongs to, or the declaration itself.
    pub fn enclosing_declaration(&self, id: DeclId) -> Result<DeclId, CheckError> {
        Ok(self.get(id)?.parent.unwrap_or(id))
    }

    pub fn qualified_name(&self, id: DeclId) -> Result<String, CheckError> {
        let decl = self.get(id)?;
        Ok(match decl.parent {
            Some(parent) => format!("{}::{}", self.get(parent)?.name, decl.name),
            None => decl.name.clone(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (DeclId, &Declaration)> {
        self.decls.iter().enumerate().map(|(i, d)| (DeclId(i as u32), d))
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}
