//! Walks a schema once and drives a [`Backend`] through its hooks.
//!
//! Output is all-or-nothing: the first hook error aborts the run and no
//! partial text is returned.
use rayon::prelude::*;
use tracing::{debug, info, trace};

use crate::backend::{Backend, ClassSpec, GenConfig, ParserKind};
use crate::codegen::Codegen;
use crate::error::{GenError, GenResult, ResultExt};
use crate::schema::{Combinator, Schema, Type};

/// Emitted text for one schema type plus what happened to its constructors.
struct TypeBlock {
    cg: Codegen,
    emitted: usize,
    skipped: usize,
}

/// Generate one complete compilation unit.
pub fn generate(backend: &dyn Backend, schema: &Schema, config: &GenConfig) -> GenResult<String> {
    let span = tracing::info_span!("generate", backend = backend.name());
    let _enter = span.enter();

    let mut cg = Codegen::new();
    backend.output_begin(&mut cg, config).in_context(|| "output header".to_string())?;
    emit_root_classes(backend, &mut cg).in_context(|| "root classes".to_string())?;

    // Types are independent of each other, so their blocks are rendered in
    // parallel and spliced back in schema order.
    let depth = cg.depth();
    let types: Vec<&Type> = schema.types().filter(|t| !backend.is_built_in_type(&t.name)).collect();
    let blocks: Vec<GenResult<TypeBlock>> = types
        .par_iter()
        .map(|ty| {
            emit_type(backend, schema, ty, config, depth).in_context(|| format!("type `{}`", ty.name))
        })
        .collect();

    let (mut emitted, mut skipped) = (0, 0);
    for block in blocks {
        let block = block?;
        emitted += block.emitted;
        skipped += block.skipped;
        cg.splice(block.cg);
    }

    let function_base = backend.base_function_class_name();
    for function in schema.functions() {
        let supported = backend
            .is_combinator_supported(schema, function)
            .in_context(|| format!("function `{}`", function.name))?;
        if !supported {
            debug!(function = %function.name, "skipping unsupported function");
            skipped += 1;
            continue;
        }
        let class_name =
            function_class_name(backend, &function.name, config).in_context(|| format!("function `{}`", function.name))?;
        emit_combinator(backend, schema, &mut cg, function, class_name, function_base, true)
            .in_context(|| format!("function `{}`", function.name))?;
        emitted += 1;
    }

    backend.output_end(&mut cg).in_context(|| "output footer".to_string())?;
    info!(types = types.len(), emitted, skipped, "generated compilation unit");
    Ok(cg.into_string())
}

fn emit_root_classes(backend: &dyn Backend, cg: &mut Codegen) -> GenResult<()> {
    let root = backend.base_tl_class_name();
    backend.class_begin(cg, root, "", true)?;
    backend.root_members(cg)?;
    backend.class_end(cg)?;

    backend.class_begin(cg, backend.base_function_class_name(), root, true)?;
    backend.class_end(cg)
}

/// Java rejects a member class that shares its simple name with any class
/// enclosing it, and a second top-level `Object` or `Function` would
/// replace the root classes.
fn distinct_from(class_name: String, taken: &[&str]) -> GenResult<String> {
    if taken.contains(&class_name.as_str()) {
        return Err(GenError::identifier(format!(
            "class `{class_name}` clashes with an enclosing or root class of the same name"
        )));
    }
    Ok(class_name)
}

pub(crate) fn type_class_name(backend: &dyn Backend, type_name: &str, config: &GenConfig) -> GenResult<String> {
    let taken = [
        config.root_class_name.as_str(),
        backend.base_tl_class_name(),
        backend.base_function_class_name(),
    ];
    distinct_from(backend.class_name(type_name)?, &taken)
}

pub(crate) fn constructor_class_name(
    backend: &dyn Backend,
    constructor_name: &str,
    type_class_name: &str,
    config: &GenConfig,
) -> GenResult<String> {
    distinct_from(
        backend.class_name(constructor_name)?,
        &[config.root_class_name.as_str(), type_class_name],
    )
}

pub(crate) fn function_class_name(backend: &dyn Backend, function_name: &str, config: &GenConfig) -> GenResult<String> {
    let taken = [
        config.root_class_name.as_str(),
        backend.base_tl_class_name(),
        backend.base_function_class_name(),
    ];
    distinct_from(backend.class_name(function_name)?, &taken)
}

fn emit_type(
    backend: &dyn Backend,
    schema: &Schema,
    ty: &Type,
    config: &GenConfig,
    depth: usize,
) -> GenResult<TypeBlock> {
    let mut cg = Codegen::at_depth(depth);
    let class_name = type_class_name(backend, &ty.name, config)?;
    let is_proxy = ty.constructor_count > 1;
    let tagged = !backend.is_type_bare(ty);

    // Every base class extends the root directly.
    backend.class_begin(&mut cg, &class_name, backend.base_tl_class_name(), is_proxy)?;

    let (mut emitted, mut skipped) = (0, 0);
    for constructor in &ty.constructors {
        let context = || format!("constructor `{}`", constructor.name);
        if constructor.result_type_name() != Some(ty.name.as_str()) {
            return Err::<TypeBlock, _>(GenError::shape(format!(
                "constructor result {:?} does not name its owning type",
                constructor.result
            )))
            .in_context(context);
        }
        if !backend.is_combinator_supported(schema, constructor).in_context(context)? {
            debug!(type_name = %ty.name, constructor = %constructor.name, "skipping unsupported constructor");
            skipped += 1;
            continue;
        }
        let nested_name = constructor_class_name(backend, &constructor.name, &class_name, config).in_context(context)?;
        emit_combinator(backend, schema, &mut cg, constructor, nested_name, &class_name, tagged)
            .in_context(context)?;
        emitted += 1;
    }

    backend.class_end(&mut cg)?;
    Ok(TypeBlock { cg, emitted, skipped })
}

fn emit_combinator(
    backend: &dyn Backend,
    schema: &Schema,
    cg: &mut Codegen,
    combinator: &Combinator,
    class_name: String,
    base_class_name: &str,
    tagged: bool,
) -> GenResult<()> {
    let vars = backend.prepare_vars(combinator)?;
    let fields = combinator
        .args
        .iter()
        .map(|arg| backend.field(schema, arg).in_context(|| format!("arg `{}`", arg.name)))
        .collect::<GenResult<Vec<_>>>()?;
    let class = ClassSpec {
        combinator,
        class_name,
        base_class_name: base_class_name.to_string(),
        tagged,
        fields,
    };

    backend.class_begin(cg, &class.class_name, &class.base_class_name, false)?;
    for field in &class.fields {
        backend.field_definition(cg, field)?;
    }
    backend.constructor(cg, &class)?;
    backend.get_id(cg, &class)?;

    for storer in backend.storers() {
        let Some(kind) = backend.storer_kind(storer) else {
            continue;
        };
        backend.store_function_begin(cg, kind, storer, &class)?;
        let mut stored = vars.clone();
        for field in &class.fields {
            stored = backend
                .field_store(cg, kind, field, stored)
                .in_context(|| format!("arg `{}`", field.arg.name))?;
        }
        backend.store_function_end(cg, kind, &stored)?;
    }
    for parser in backend.parsers() {
        match backend.parser_kind(parser) {
            Some(ParserKind::NoOp) => trace!(parser, class = %class.class_name, "no decode code for parser"),
            None => continue,
        }
    }

    backend.class_end(cg)
}
