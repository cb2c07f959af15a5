//! Declaration manifests: the TOML description of a multi-file program that
//! the checker consumes in place of parsed source.
//!
//! ```toml
//! modules = ["A", "B"]
//!
//! [[file]]
//! path = "A.php"
//! module = "A"
//! unstable_features = ["module_level_traits"]
//!
//! [[file.trait]]
//! name = "T"
//! module_level = true
//!
//! [[file.trait.method]]
//! name = "getFoo"
//! calls = ["D::foo"]
//! ```

use serde::Deserialize;
use toml::Spanned;
use tracing::{debug, warn};

use crate::diagnostics::CheckError;
use crate::span::Span;
use crate::typeck::Program;
use crate::typeck::decl::{DeclId, Declaration, ModuleName, Visibility};
use crate::typeck::visibility::CallSite;

/// Feature a unit must enable before declaring `<<__ModuleLevelTrait>>` traits.
pub const MODULE_LEVEL_TRAITS: &str = "module_level_traits";

const KNOWN_FEATURES: &[&str] = &[MODULE_LEVEL_TRAITS];

// ---- TOML deserialization types ----

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlManifest {
    #[serde(default)]
    modules: Vec<Spanned<String>>,
    #[serde(default, rename = "file")]
    files: Vec<TomlFile>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlFile {
    path: Option<String>,
    module: Option<Spanned<String>>,
    #[serde(default)]
    unstable_features: Vec<Spanned<String>>,
    #[serde(default, rename = "class")]
    classes: Vec<TomlType>,
    #[serde(default, rename = "trait")]
    traits: Vec<TomlType>,
    #[serde(default, rename = "function")]
    functions: Vec<TomlFunction>,
}

/// A class or trait entry.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlType {
    name: Spanned<String>,
    #[serde(default)]
    visibility: Visibility,
    module_level: Option<Spanned<bool>>,
    #[serde(default)]
    uses: Vec<Spanned<String>>,
    #[serde(default, rename = "method")]
    methods: Vec<TomlFunction>,
}

/// A method or free function entry.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlFunction {
    name: Spanned<String>,
    #[serde(default)]
    visibility: Visibility,
    entry_point: Option<Spanned<bool>>,
    #[serde(default)]
    calls: Vec<Spanned<String>>,
}

fn span_of<T>(spanned: &Spanned<T>) -> Span {
    Span::from(spanned.span())
}

// ---- Validation ----

fn validate_identifier(what: &str, name: &Spanned<String>) -> Result<(), CheckError> {
    // Must match [a-zA-Z_][a-zA-Z0-9_]*
    let value = name.get_ref();
    let valid = value
        .chars()
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_')
        && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid {
        return Err(CheckError::manifest(
            format!("{what} name '{value}' is not a valid identifier"),
            Some(span_of(name)),
        ));
    }
    Ok(())
}

fn file_label(file: &TomlFile, index: usize) -> String {
    file.path.clone().unwrap_or_else(|| format!("file #{}", index + 1))
}

fn enabled_features(file: &TomlFile, label: &str) -> Vec<String> {
    let mut enabled = Vec::new();
    for feature in &file.unstable_features {
        if KNOWN_FEATURES.contains(&feature.get_ref().as_str()) {
            enabled.push(feature.get_ref().clone());
        } else {
            warn!(file = %label, feature = %feature.get_ref(), "ignoring unknown unstable feature");
        }
    }
    enabled
}

// ---- Loading ----

/// Call targets and trait uses are resolved only once every file has been
/// registered, so declarations may reference each other in any order.
#[derive(Default)]
struct Pending<'m> {
    uses: Vec<(DeclId, &'m Spanned<String>)>,
    calls: Vec<(DeclId, &'m Spanned<String>)>,
}

/// Build a `Program` from manifest source text.
pub fn load_program(source: &str) -> Result<Program, CheckError> {
    let manifest: TomlManifest = toml::from_str(source).map_err(|e| {
        CheckError::manifest(format!("invalid syntax: {}", e.message()), e.span().map(Span::from))
    })?;

    let mut program = Program::default();
    program.table.declare_module(ModuleName::default_module(), Span::dummy())?;

    // Pass 0: modules
    for module in &manifest.modules {
        validate_identifier("module", module)?;
        program.table.declare_module(ModuleName::new(module.get_ref().as_str()), span_of(module))?;
    }

    // Pass 1: declarations
    let mut pending = Pending::default();
    for (index, file) in manifest.files.iter().enumerate() {
        register_file(&mut program, file, index, &mut pending)?;
    }

    // Pass 2: trait composition
    for (composer, used) in pending.uses {
        let used_id = program.table.lookup(used.get_ref()).map_err(|e| e.at(span_of(used)))?;
        program.table.add_use(composer, used_id, span_of(used))?;
    }

    // Pass 3: call sites
    for (caller, target) in pending.calls {
        let target_id = program.table.lookup(target.get_ref()).map_err(|e| e.at(span_of(target)))?;
        program.call_sites.push(CallSite::new(caller, target_id).with_span(span_of(target)));
    }

    debug!(
        modules = program.table.modules().count(),
        declarations = program.table.len(),
        call_sites = program.call_sites.len(),
        "loaded manifest"
    );
    Ok(program)
}

fn register_file<'m>(
    program: &mut Program,
    file: &'m TomlFile,
    index: usize,
    pending: &mut Pending<'m>,
) -> Result<(), CheckError> {
    let label = file_label(file, index);
    let module = match &file.module {
        Some(name) => {
            let module = ModuleName::new(name.get_ref().as_str());
            if !program.table.has_module(&module) {
                return Err(CheckError::UnknownModule { name: module.to_string(), span: span_of(name) });
            }
            module
        }
        None => ModuleName::default_module(),
    };
    let features = enabled_features(file, &label);
    debug!(file = %label, module = %module, "registering file");

    for class in &file.classes {
        if let Some(flag) = &class.module_level {
            return Err(CheckError::manifest(
                format!("class '{}' cannot be module-level; only traits can", class.name.get_ref()),
                Some(span_of(flag)),
            ));
        }
        let decl = Declaration::class(class.name.get_ref().as_str(), module.clone());
        register_type(program, decl, class, pending)?;
    }

    for trait_entry in &file.traits {
        let module_level = trait_entry.module_level.as_ref().is_some_and(|flag| *flag.get_ref());
        if module_level && !features.iter().any(|f| f == MODULE_LEVEL_TRAITS) {
            return Err(CheckError::UnstableFeature {
                feature: MODULE_LEVEL_TRAITS.to_string(),
                name: trait_entry.name.get_ref().clone(),
                span: span_of(&trait_entry.name),
            });
        }
        let decl = Declaration::trait_decl(trait_entry.name.get_ref().as_str(), module.clone(), module_level);
        register_type(program, decl, trait_entry, pending)?;
    }

    for function in &file.functions {
        validate_identifier("function", &function.name)?;
        let decl = Declaration::function(function.name.get_ref().as_str(), module.clone())
            .with_visibility(function.visibility)
            .with_span(span_of(&function.name));
        let id = program.table.register(decl)?;
        if function.entry_point.as_ref().is_some_and(|flag| *flag.get_ref()) {
            if let Some(previous) = program.entry_point {
                return Err(CheckError::DuplicateDeclaration {
                    kind: "entry point",
                    name: function.name.get_ref().clone(),
                    span: span_of(&function.name),
                    previous: program.table.get(previous)?.span,
                });
            }
            program.entry_point = Some(id);
        }
        pending.calls.extend(function.calls.iter().map(|call| (id, call)));
    }
    Ok(())
}

fn register_type<'m>(
    program: &mut Program,
    decl: Declaration,
    entry: &'m TomlType,
    pending: &mut Pending<'m>,
) -> Result<(), CheckError> {
    validate_identifier(decl.kind.describe(), &entry.name)?;
    let id = program
        .table
        .register(decl.with_visibility(entry.visibility).with_span(span_of(&entry.name)))?;
    pending.uses.extend(entry.uses.iter().map(|used| (id, used)));

    for method in &entry.methods {
        validate_identifier("method", &method.name)?;
        if let Some(flag) = &method.entry_point {
            return Err(CheckError::manifest(
                format!("method '{}' cannot be an entry point; only free functions can", method.name.get_ref()),
                Some(span_of(flag)),
            ));
        }
        let method_id = program.table.register_method(
            id,
            method.name.get_ref().as_str(),
            method.visibility,
            span_of(&method.name),
        )?;
        pending.calls.extend(method.calls.iter().map(|call| (method_id, call)));
    }
    Ok(())
}
