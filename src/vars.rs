//! Per-combinator variable bookkeeping.
//!
//! The list is built fresh for each combinator, threaded by value through
//! field and printer emission, and dropped afterwards.
use crate::error::{GenError, GenResult};
use crate::schema::{Combinator, TypeTree, VarKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDescription {
    pub index: usize,
    pub is_type: bool,
    pub is_stored: bool,
    /// Position among the result type's parameters.
    pub parameter_num: Option<usize>,
    /// Index of the `!X` argument that supplies this variable.
    pub function_arg_num: Option<usize>,
}

/// Build the variable list for one combinator.
///
/// Only type-level variables are representable; a numeric variable is a
/// contract violation.
pub fn prepare_vars(combinator: &Combinator) -> GenResult<Vec<VarDescription>> {
    let mut vars: Vec<VarDescription> = combinator
        .vars
        .iter()
        .enumerate()
        .map(|(index, decl)| VarDescription {
            index,
            is_type: decl.kind == VarKind::Type,
            is_stored: false,
            parameter_num: None,
            function_arg_num: None,
        })
        .collect();

    if let TypeTree::Concrete { children, .. } = &combinator.result {
        for (position, child) in children.iter().enumerate() {
            if let TypeTree::TypeVariable { var_num } = child {
                var_mut(&mut vars, *var_num)?.parameter_num = Some(position);
            }
        }
    }
    for (arg_num, arg) in combinator.args.iter().enumerate() {
        if let (true, TypeTree::TypeVariable { var_num }) = (arg.flags.excluded, &arg.ty) {
            var_mut(&mut vars, *var_num)?.function_arg_num = Some(arg_num);
        }
    }

    if let Some(var) = vars.iter().find(|v| !v.is_type) {
        return Err(GenError::shape(format!(
            "variable `{}` is a numeric variable; only type variables are supported",
            combinator.vars[var.index].name
        )));
    }
    Ok(vars)
}

fn var_mut(vars: &mut [VarDescription], var_num: usize) -> GenResult<&mut VarDescription> {
    vars.get_mut(var_num)
        .ok_or_else(|| GenError::shape(format!("reference to undeclared variable #{var_num}")))
}

/// Mark every variable referenced by `tree` as stored.
pub fn mark_stored(mut vars: Vec<VarDescription>, tree: &TypeTree) -> GenResult<Vec<VarDescription>> {
    match tree {
        TypeTree::TypeVariable { var_num } => var_mut(&mut vars, *var_num)?.is_stored = true,
        TypeTree::Concrete { children, .. } => {
            for child in children {
                vars = mark_stored(vars, child)?;
            }
        }
        TypeTree::NatConstant { .. } => {}
    }
    Ok(vars)
}

/// Every variable must have been written by the time a printer is closed.
pub fn ensure_all_stored(vars: &[VarDescription]) -> GenResult<()> {
    match vars.iter().find(|v| !v.is_stored) {
        Some(var) => Err(GenError::shape(format!("type variable #{} is never stored", var.index))),
        None => Ok(()),
    }
}
