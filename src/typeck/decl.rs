use std::fmt;

use serde::{Deserialize, Serialize};

use crate::span::Span;

/// Name of the module that units without a `module X;` line belong to.
pub const DEFAULT_MODULE: &str = "default";

/// A flat, named partition of the declaration space.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleName(String);

impl ModuleName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn default_module() -> Self {
        Self(DEFAULT_MODULE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Internal,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => f.pad("public"),
            Visibility::Internal => f.pad("internal"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeclKind {
    Class,
    /// Trait marked `<<__ModuleLevelTrait>>`: its methods stay attributed to
    /// the module it is declared in, wherever it is composed.
    ModuleLevelTrait,
    Trait,
    Method,
    Function,
}

impl DeclKind {
    pub fn is_trait(self) -> bool {
        matches!(self, DeclKind::Trait | DeclKind::ModuleLevelTrait)
    }

    /// Kinds that own a member scope and may compose traits.
    pub fn has_members(self) -> bool {
        matches!(self, DeclKind::Class | DeclKind::Trait | DeclKind::ModuleLevelTrait)
    }

    pub fn describe(self) -> &'static str {
        match self {
            DeclKind::Class => "class",
            DeclKind::ModuleLevelTrait => "module-level trait",
            DeclKind::Trait => "trait",
            DeclKind::Method => "method",
            DeclKind::Function => "function",
        }
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.describe())
    }
}

/// Index of a declaration in its `DeclarationTable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DeclId(pub(crate) u32);

impl DeclId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub name: String,
    pub kind: DeclKind,
    pub module: ModuleName,
    pub visibility: Visibility,
    /// Owning class or trait, for methods.
    pub parent: Option<DeclId>,
    pub span: Span,
}

impl Declaration {
    pub fn class(name: impl Into<String>, module: impl Into<ModuleName>) -> Self {
        Self::top_level(name, DeclKind::Class, module)
    }

    pub fn trait_decl(name: impl Into<String>, module: impl Into<ModuleName>, module_level: bool) -> Self {
        let kind = if module_level { DeclKind::ModuleLevelTrait } else { DeclKind::Trait };
        Self::top_level(name, kind, module)
    }

    pub fn function(name: impl Into<String>, module: impl Into<ModuleName>) -> Self {
        Self::top_level(name, DeclKind::Function, module)
    }

    fn top_level(name: impl Into<String>, kind: DeclKind, module: impl Into<ModuleName>) -> Self {
        Self {
            name: name.into(),
            kind,
            module: module.into(),
            visibility: Visibility::Public,
            parent: None,
            span: Span::dummy(),
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn is_module_level_trait(&self) -> bool {
        self.kind == DeclKind::ModuleLevelTrait
    }
}
