//! Structural support checks every backend runs before its own policy.
use crate::error::{GenError, GenResult};
use crate::schema::{Combinator, Schema, TypeTree};
use crate::types::{Scalar, is_built_in_complex_type};

/// Declared arity of a result type, for built-ins and schema types alike.
fn declared_arity(schema: &Schema, type_name: &str) -> GenResult<usize> {
    if Scalar::from_name(type_name).is_some() {
        return Ok(0);
    }
    if is_built_in_complex_type(type_name) {
        return Ok(1);
    }
    schema
        .type_by_name(type_name)
        .map(|ty| ty.arity)
        .ok_or_else(|| GenError::UnknownType(type_name.to_string()))
}

/// `Ok(false)` means the combinator is silently left out of the output.
/// Errors are reserved for schemas that are inconsistent, not merely
/// unsupported.
pub fn baseline_supported(schema: &Schema, combinator: &Combinator, max_arity: usize) -> GenResult<bool> {
    let TypeTree::Concrete { type_name, .. } = &combinator.result else {
        return Ok(false);
    };
    if combinator.result.contains_type_variable() {
        return Ok(false);
    }
    if declared_arity(schema, type_name)? > max_arity {
        return Ok(false);
    }

    // `!X` arguments may each consume a distinct type variable once; any other
    // type-variable argument makes the combinator polymorphic.
    let mut consumed = vec![false; combinator.vars.len()];
    for arg in &combinator.args {
        let TypeTree::TypeVariable { var_num } = arg.ty else {
            continue;
        };
        if !arg.flags.excluded {
            return Ok(false);
        }
        match consumed.get_mut(var_num) {
            Some(seen) if !*seen => *seen = true,
            Some(_) => return Ok(false),
            None => {
                return Err(GenError::shape(format!(
                    "arg `{}` refers to undeclared variable #{var_num}",
                    arg.name
                )));
            }
        }
    }
    Ok(true)
}
