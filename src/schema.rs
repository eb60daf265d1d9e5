//! In-memory schema model.
//!
//! The model is produced by an external TL front end and handed to us as
//! JSON. Once built it is never mutated; all per-combinator scratch state
//! lives in [`crate::vars`].
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::path_de::from_str_with_path;

/// Name of the built-in natural-number type.
pub const NAT_TYPE_NAME: &str = "#";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeTree {
    Concrete {
        type_name: String,
        #[serde(default)]
        children: Vec<TypeTree>,
    },
    /// Generic placeholder bound to one of the combinator's variables.
    TypeVariable { var_num: usize },
    NatConstant { value: i32 },
}

impl TypeTree {
    pub fn concrete(type_name: impl Into<String>) -> Self {
        TypeTree::Concrete { type_name: type_name.into(), children: Vec::new() }
    }

    pub fn vector_of(item: TypeTree) -> Self {
        TypeTree::Concrete { type_name: "Vector".to_string(), children: vec![item] }
    }

    pub fn contains_type_variable(&self) -> bool {
        match self {
            TypeTree::TypeVariable { .. } => true,
            TypeTree::Concrete { children, .. } => children.iter().any(TypeTree::contains_type_variable),
            TypeTree::NatConstant { .. } => false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgFlags {
    /// `!X` argument: the value of a type-variable typed function call.
    #[serde(default)]
    pub excluded: bool,
    /// Optional/implicit argument whose existence depends on a flag.
    #[serde(default)]
    pub optional_var: bool,
}

impl ArgFlags {
    pub fn is_empty(&self) -> bool {
        !self.excluded && !self.optional_var
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arg {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeTree,
    #[serde(default)]
    pub flags: ArgFlags,
    /// Variable this argument defines, if any.
    #[serde(default)]
    pub var_num: Option<usize>,
    /// Variable whose bit makes this argument conditional, if any.
    #[serde(default)]
    pub exist_var_num: Option<usize>,
}

impl Arg {
    pub fn new(name: impl Into<String>, ty: TypeTree) -> Self {
        Arg {
            name: name.into(),
            ty,
            flags: ArgFlags::default(),
            var_num: None,
            exist_var_num: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarKind {
    Type,
    Nat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarDecl {
    pub name: String,
    pub kind: VarKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combinator {
    pub name: String,
    /// Schema-supplied constructor identifier. Opaque to this crate.
    pub id: i32,
    #[serde(default)]
    pub vars: Vec<VarDecl>,
    #[serde(default)]
    pub args: Vec<Arg>,
    pub result: TypeTree,
}

impl Combinator {
    pub fn new(name: impl Into<String>, id: i32, args: Vec<Arg>, result: TypeTree) -> Self {
        Combinator { name: name.into(), id, vars: Vec::new(), args, result }
    }

    /// Name of the type this combinator produces, when the result is concrete.
    pub fn result_type_name(&self) -> Option<&str> {
        match &self.result {
            TypeTree::Concrete { type_name, .. } => Some(type_name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Type {
    pub name: String,
    pub arity: usize,
    pub constructor_count: usize,
    pub constructors: Vec<Combinator>,
}

impl Type {
    pub fn new(name: impl Into<String>, constructors: Vec<Combinator>) -> Self {
        Type {
            name: name.into(),
            arity: 0,
            constructor_count: constructors.len(),
            constructors,
        }
    }
}

/// On-disk form of a type. `constructor_count` defaults to the number of
/// listed constructors.
#[derive(Debug, Deserialize)]
struct TypeDecl {
    name: String,
    #[serde(default)]
    arity: usize,
    #[serde(default)]
    constructor_count: Option<usize>,
    #[serde(default)]
    constructors: Vec<Combinator>,
}

impl From<TypeDecl> for Type {
    fn from(decl: TypeDecl) -> Self {
        Type {
            constructor_count: decl.constructor_count.unwrap_or(decl.constructors.len()),
            name: decl.name,
            arity: decl.arity,
            constructors: decl.constructors,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SchemaFile {
    #[serde(default)]
    types: Vec<TypeDecl>,
    #[serde(default)]
    functions: Vec<Combinator>,
}

#[derive(Debug, Clone, Default)]
pub struct Schema {
    types: IndexMap<String, Type>,
    functions: Vec<Combinator>,
}

impl Schema {
    pub fn new(types: Vec<Type>, functions: Vec<Combinator>) -> Result<Self, SchemaError> {
        let mut schema = Schema::default();
        schema.extend(types, functions)?;
        Ok(schema)
    }

    /// Parse one JSON fragment. `origin` is only used in error messages.
    pub fn from_json_str(src: &str, origin: &Path) -> Result<Self, SchemaError> {
        let file: SchemaFile = from_str_with_path(src).map_err(|err| SchemaError::Json {
            path: origin.to_path_buf(),
            json_path: err.path,
            message: err.message,
        })?;
        Schema::new(file.types.into_iter().map(Type::from).collect(), file.functions)
    }

    /// Load and merge schema fragments in the given order.
    pub fn load(paths: &[PathBuf]) -> Result<Self, SchemaError> {
        let mut schema = Schema::default();
        for path in paths {
            let src = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
                path: path.clone(),
                source,
            })?;
            let fragment = Schema::from_json_str(&src, path)?;
            tracing::debug!(
                path = %path.display(),
                types = fragment.types.len(),
                functions = fragment.functions.len(),
                "loaded schema fragment"
            );
            schema.extend(fragment.types.into_values().collect(), fragment.functions)?;
        }
        Ok(schema)
    }

    fn extend(&mut self, types: Vec<Type>, functions: Vec<Combinator>) -> Result<(), SchemaError> {
        for ty in types {
            if self.types.contains_key(&ty.name) {
                return Err(SchemaError::DuplicateType(ty.name));
            }
            self.types.insert(ty.name.clone(), ty);
        }
        self.functions.extend(functions);
        Ok(())
    }

    pub fn types(&self) -> impl ExactSizeIterator<Item = &Type> {
        self.types.values()
    }

    pub fn functions(&self) -> &[Combinator] {
        &self.functions
    }

    pub fn type_by_name(&self, name: &str) -> Option<&Type> {
        self.types.get(name)
    }

    /// Find a constructor or function by its combinator name.
    pub fn combinator_by_name(&self, name: &str) -> Option<&Combinator> {
        self.types
            .values()
            .flat_map(|ty| ty.constructors.iter())
            .chain(self.functions.iter())
            .find(|c| c.name == name)
    }
}
