//! The contract between the generic [driver](crate::driver) and a target
//! language.
//!
//! A backend is a set of hooks. The driver calls them in a fixed order for
//! every class it emits:
//!
//! ```text
//! output_begin
//!   class_begin → field_definition* → constructor → get_id
//!     → (store_function_begin → field_store* → store_function_end)* per storer
//!     → class_end
//! output_end
//! ```
//!
//! Every hook returns a [`GenResult`]; the first error aborts the whole run.
pub mod java;

use crate::codegen::Codegen;
use crate::error::GenResult;
use crate::schema::{Arg, Combinator, Schema, Type, TypeTree};
use crate::types::MappedType;
use crate::vars::VarDescription;
use crate::{filter, naming, types, vars};

/// Output unit settings supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenConfig {
    /// Module / package the generated unit declares.
    pub package_name: String,
    /// Name of the outer class that holds every generated class.
    pub root_class_name: String,
}

impl Default for GenConfig {
    fn default() -> Self {
        GenConfig {
            package_name: "org.example.tl".to_string(),
            root_class_name: "Api".to_string(),
        }
    }
}

/// Ways a backend can write a value out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorerKind {
    /// Human-readable debug text appended to a string builder.
    TextBuilder,
}

/// Ways a backend can read a value in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserKind {
    /// Decode code is intentionally not generated.
    NoOp,
}

/// An argument after naming and type mapping.
#[derive(Debug, Clone)]
pub struct Field<'s> {
    pub arg: &'s Arg,
    pub name: String,
    pub type_name: String,
    pub mapped: MappedType<'s>,
}

/// One concrete class about to be emitted.
#[derive(Debug, Clone)]
pub struct ClassSpec<'s> {
    pub combinator: &'s Combinator,
    pub class_name: String,
    pub base_class_name: String,
    /// Whether the class carries a constructor identifier.
    pub tagged: bool,
    pub fields: Vec<Field<'s>>,
}

pub trait Backend: Send + Sync {
    /// Unique backend identifier (e.g. "java").
    fn name(&self) -> &'static str;

    fn language(&self) -> &'static str;

    /// File extension for generated code.
    fn extension(&self) -> &'static str;

    /// Largest result-type arity this backend can express.
    fn max_arity(&self) -> usize;

    /// Class at the top of the hierarchy. It has no superclass.
    fn base_tl_class_name(&self) -> &'static str {
        naming::ROOT_CLASS_NAME
    }

    /// Superclass of every function (request) class.
    fn base_function_class_name(&self) -> &'static str;

    fn is_built_in_type(&self, name: &str) -> bool {
        types::is_built_in(name)
    }

    fn is_type_bare(&self, ty: &Type) -> bool {
        types::is_bare(ty)
    }

    /// `Ok(false)` drops the combinator from the output without a trace.
    fn is_combinator_supported(&self, schema: &Schema, combinator: &Combinator) -> GenResult<bool> {
        filter::baseline_supported(schema, combinator, self.max_arity())
    }

    fn class_name(&self, raw: &str) -> GenResult<String> {
        naming::class_name(raw)
    }

    fn field_name(&self, raw: &str) -> GenResult<String> {
        naming::field_name(raw)
    }

    fn type_name(&self, schema: &Schema, node: &TypeTree) -> GenResult<String>;

    /// Name, type and validate one argument as a field.
    fn field<'s>(&self, schema: &'s Schema, arg: &'s Arg) -> GenResult<Field<'s>>;

    fn prepare_vars(&self, combinator: &Combinator) -> GenResult<Vec<VarDescription>> {
        vars::prepare_vars(combinator)
    }

    fn storers(&self) -> &'static [&'static str];

    fn parsers(&self) -> &'static [&'static str];

    /// `None` means this storer is skipped for the backend.
    fn storer_kind(&self, storer: &str) -> Option<StorerKind>;

    /// `None` means this parser is skipped for the backend.
    fn parser_kind(&self, parser: &str) -> Option<ParserKind>;

    fn output_begin(&self, cg: &mut Codegen, config: &GenConfig) -> GenResult<()>;

    fn output_end(&self, cg: &mut Codegen) -> GenResult<()>;

    /// Open a class. Proxy classes are the abstract ones.
    fn class_begin(&self, cg: &mut Codegen, class_name: &str, base_class_name: &str, is_proxy: bool)
    -> GenResult<()>;

    fn class_end(&self, cg: &mut Codegen) -> GenResult<()>;

    /// Members shared by every class, written into the root class only.
    fn root_members(&self, cg: &mut Codegen) -> GenResult<()>;

    fn field_definition(&self, cg: &mut Codegen, field: &Field<'_>) -> GenResult<()>;

    fn constructor(&self, cg: &mut Codegen, class: &ClassSpec<'_>) -> GenResult<()>;

    fn get_id(&self, cg: &mut Codegen, class: &ClassSpec<'_>) -> GenResult<()>;

    fn store_function_begin(&self, cg: &mut Codegen, kind: StorerKind, storer: &str, class: &ClassSpec<'_>)
    -> GenResult<()>;

    /// Emit one field's share of a store function. Returns the variable list
    /// with whatever the field stored marked.
    fn field_store(
        &self,
        cg: &mut Codegen,
        kind: StorerKind,
        field: &Field<'_>,
        vars: Vec<VarDescription>,
    ) -> GenResult<Vec<VarDescription>>;

    fn store_function_end(&self, cg: &mut Codegen, kind: StorerKind, vars: &[VarDescription]) -> GenResult<()>;
}
