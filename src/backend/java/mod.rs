//! Java backend: one outer class holding a static nested class per schema
//! type and constructor, with a debug `toString` on every object.
mod class;
mod printer;

use super::{Backend, ClassSpec, Field, GenConfig, ParserKind, StorerKind};
use crate::codegen::Codegen;
use crate::error::{GenError, GenResult};
use crate::filter;
use crate::schema::{Arg, Combinator, Schema, TypeTree};
use crate::types::{MappedType, Scalar, classify};
use crate::vars::VarDescription;

/// Base classes are never generic in Java output.
const MAX_ARITY: usize = 0;

const FUNCTION_CLASS_NAME: &str = "Function";

const TEXT_STORER: &str = "StringBuilder";
const INLINED_PARSER: &str = "<inlined>";

pub struct JavaBackend;

pub static JAVA_BACKEND: JavaBackend = JavaBackend;

impl JavaBackend {
    fn java_type_name(&self, mapped: &MappedType<'_>) -> GenResult<String> {
        Ok(match mapped {
            MappedType::Scalar(Scalar::Bool) => "boolean".to_string(),
            MappedType::Scalar(Scalar::Int32) => "int".to_string(),
            MappedType::Scalar(Scalar::Int53 | Scalar::Int64) => "long".to_string(),
            MappedType::Scalar(Scalar::Double) => "double".to_string(),
            MappedType::Scalar(Scalar::String) => "String".to_string(),
            MappedType::Scalar(Scalar::Bytes) => "byte[]".to_string(),
            MappedType::Vector(item) => format!("{}[]", self.java_type_name(item)?),
            MappedType::Class(ty) => self.class_name(&ty.name)?,
        })
    }
}

/// Conditional fields, `!X` arguments and variable-defining arguments have
/// no representation in the generated classes.
fn check_arg_shape(arg: &Arg) -> GenResult<()> {
    if arg.flags.optional_var {
        return Err(GenError::shape("flag-conditional (optional) arguments are not supported"));
    }
    if arg.flags.excluded {
        return Err(GenError::shape("`!X` function-call arguments are not supported"));
    }
    if let Some(var) = arg.exist_var_num {
        return Err(GenError::shape(format!("field existence depends on variable #{var}")));
    }
    if let Some(var) = arg.var_num {
        return Err(GenError::shape(format!("argument defines dependent variable #{var}")));
    }
    Ok(())
}

impl Backend for JavaBackend {
    fn name(&self) -> &'static str {
        "java"
    }

    fn language(&self) -> &'static str {
        "java"
    }

    fn extension(&self) -> &'static str {
        "java"
    }

    fn max_arity(&self) -> usize {
        MAX_ARITY
    }

    fn base_function_class_name(&self) -> &'static str {
        FUNCTION_CLASS_NAME
    }

    fn is_combinator_supported(&self, schema: &Schema, combinator: &Combinator) -> GenResult<bool> {
        if !filter::baseline_supported(schema, combinator, self.max_arity())? {
            return Ok(false);
        }
        // No parametric classes: a type-variable argument rules the whole
        // combinator out.
        Ok(!combinator.args.iter().any(|arg| arg.ty.contains_type_variable()))
    }

    fn type_name(&self, schema: &Schema, node: &TypeTree) -> GenResult<String> {
        self.java_type_name(&classify(schema, node)?)
    }

    fn field<'s>(&self, schema: &'s Schema, arg: &'s Arg) -> GenResult<Field<'s>> {
        check_arg_shape(arg)?;
        let mapped = classify(schema, &arg.ty)?;
        Ok(Field {
            arg,
            name: self.field_name(&arg.name)?,
            type_name: self.java_type_name(&mapped)?,
            mapped,
        })
    }

    fn storers(&self) -> &'static [&'static str] {
        &[TEXT_STORER]
    }

    fn parsers(&self) -> &'static [&'static str] {
        &[INLINED_PARSER]
    }

    fn storer_kind(&self, storer: &str) -> Option<StorerKind> {
        (storer == TEXT_STORER).then_some(StorerKind::TextBuilder)
    }

    fn parser_kind(&self, parser: &str) -> Option<ParserKind> {
        (parser == INLINED_PARSER).then_some(ParserKind::NoOp)
    }

    fn output_begin(&self, cg: &mut Codegen, config: &GenConfig) -> GenResult<()> {
        class::output_begin(cg, config)
    }

    fn output_end(&self, cg: &mut Codegen) -> GenResult<()> {
        cg.close("}");
        Ok(())
    }

    fn class_begin(
        &self,
        cg: &mut Codegen,
        class_name: &str,
        base_class_name: &str,
        is_proxy: bool,
    ) -> GenResult<()> {
        let base = (class_name != self.base_tl_class_name()).then_some(base_class_name);
        class::class_begin(cg, class_name, base, is_proxy)
    }

    fn class_end(&self, cg: &mut Codegen) -> GenResult<()> {
        cg.close("}");
        Ok(())
    }

    fn root_members(&self, cg: &mut Codegen) -> GenResult<()> {
        class::root_members(cg, TEXT_STORER);
        Ok(())
    }

    fn field_definition(&self, cg: &mut Codegen, field: &Field<'_>) -> GenResult<()> {
        cg.line(format!("public {} {};", field.type_name, field.name));
        Ok(())
    }

    fn constructor(&self, cg: &mut Codegen, class: &ClassSpec<'_>) -> GenResult<()> {
        class::constructor(cg, class);
        Ok(())
    }

    fn get_id(&self, cg: &mut Codegen, class: &ClassSpec<'_>) -> GenResult<()> {
        if class.tagged {
            class::constructor_id(cg, class.combinator.id);
        }
        Ok(())
    }

    fn store_function_begin(
        &self,
        cg: &mut Codegen,
        kind: StorerKind,
        storer: &str,
        class: &ClassSpec<'_>,
    ) -> GenResult<()> {
        match kind {
            StorerKind::TextBuilder => printer::begin(cg, storer, &class.class_name),
        }
        Ok(())
    }

    fn field_store(
        &self,
        cg: &mut Codegen,
        kind: StorerKind,
        field: &Field<'_>,
        vars: Vec<VarDescription>,
    ) -> GenResult<Vec<VarDescription>> {
        match kind {
            StorerKind::TextBuilder => printer::field(cg, field, vars),
        }
    }

    fn store_function_end(&self, cg: &mut Codegen, kind: StorerKind, vars: &[VarDescription]) -> GenResult<()> {
        match kind {
            StorerKind::TextBuilder => printer::end(cg, vars),
        }
    }
}
