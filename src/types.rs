//! Type-tree classification shared by every backend.
//!
//! A backend never looks at raw [`TypeTree`] nodes when naming a field type;
//! it classifies them here first, which also rejects the shapes no backend
//! can express (bare `#`, malformed vectors, arity mismatches).
use crate::error::{GenError, GenResult};
use crate::schema::{NAT_TYPE_NAME, Schema, Type, TypeTree};

pub const VECTOR_TYPE_NAME: &str = "Vector";

/// The closed set of built-in scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scalar {
    Bool,
    Int32,
    Int53,
    Int64,
    Double,
    String,
    Bytes,
}

impl Scalar {
    pub const ALL: [Scalar; 7] = [
        Scalar::Bool,
        Scalar::Int32,
        Scalar::Int53,
        Scalar::Int64,
        Scalar::Double,
        Scalar::String,
        Scalar::Bytes,
    ];

    pub fn from_name(name: &str) -> Option<Scalar> {
        Scalar::ALL.into_iter().find(|s| s.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Scalar::Bool => "Bool",
            Scalar::Int32 => "Int32",
            Scalar::Int53 => "Int53",
            Scalar::Int64 => "Int64",
            Scalar::Double => "Double",
            Scalar::String => "String",
            Scalar::Bytes => "Bytes",
        }
    }
}

pub fn is_built_in_simple_type(name: &str) -> bool {
    Scalar::from_name(name).is_some()
}

pub fn is_built_in_complex_type(name: &str) -> bool {
    name == VECTOR_TYPE_NAME
}

/// Built-in types never get classes of their own.
pub fn is_built_in(name: &str) -> bool {
    is_built_in_simple_type(name) || is_built_in_complex_type(name) || name == NAT_TYPE_NAME
}

/// Bare values are written without a leading constructor identifier.
///
/// Only tag emission depends on this; the class hierarchy never does.
pub fn is_bare(ty: &Type) -> bool {
    ty.constructor_count == 1
        || Scalar::from_name(&ty.name).is_some_and(|s| s != Scalar::Bool)
        || is_built_in_complex_type(&ty.name)
}

/// What a field's type tree means once built-ins are recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappedType<'s> {
    Scalar(Scalar),
    Vector(Box<MappedType<'s>>),
    /// A schema type. Fields always refer to its base class, since a slot
    /// may hold any of the type's constructors.
    Class(&'s Type),
}

/// How the debug printer renders a value of a mapped type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderRule {
    Scalar,
    Bytes,
    /// Vector whose elements are not vectors: one bracket pair.
    List,
    /// Vector of vectors: one bracket pair per nesting level.
    DeepList,
    /// Vector, at any depth, whose innermost elements are `Bytes`. Each
    /// element renders like a `Bytes` field inside the usual brackets.
    BytesList,
    Object,
}

impl MappedType<'_> {
    pub fn render_rule(&self) -> RenderRule {
        match self {
            MappedType::Scalar(Scalar::Bytes) => RenderRule::Bytes,
            MappedType::Scalar(_) => RenderRule::Scalar,
            MappedType::Vector(_) if self.innermost() == &MappedType::Scalar(Scalar::Bytes) => RenderRule::BytesList,
            MappedType::Vector(item) if matches!(**item, MappedType::Vector(_)) => RenderRule::DeepList,
            MappedType::Vector(_) => RenderRule::List,
            MappedType::Class(_) => RenderRule::Object,
        }
    }

    /// The element type under every layer of `Vector`.
    pub fn innermost(&self) -> &Self {
        match self {
            MappedType::Vector(item) => item.innermost(),
            other => other,
        }
    }
}

pub fn classify<'s>(schema: &'s Schema, node: &TypeTree) -> GenResult<MappedType<'s>> {
    match node {
        TypeTree::TypeVariable { var_num } => Err(GenError::shape(format!(
            "type variable #{var_num} cannot be used as a field type"
        ))),
        TypeTree::NatConstant { value } => Err(GenError::feature(format!(
            "integer constant {value} used as a field type"
        ))),
        TypeTree::Concrete { type_name, children } => classify_concrete(schema, type_name, children),
    }
}

fn classify_concrete<'s>(
    schema: &'s Schema,
    type_name: &str,
    children: &[TypeTree],
) -> GenResult<MappedType<'s>> {
    if type_name == NAT_TYPE_NAME {
        return Err(GenError::feature("natural-number type `#` as a field type"));
    }

    if let Some(scalar) = Scalar::from_name(type_name) {
        if !children.is_empty() {
            return Err(GenError::shape(format!(
                "built-in `{type_name}` takes no type arguments, got {}",
                children.len()
            )));
        }
        return Ok(MappedType::Scalar(scalar));
    }

    if is_built_in_complex_type(type_name) {
        return match children {
            [item @ TypeTree::Concrete { .. }] => Ok(MappedType::Vector(Box::new(classify(schema, item)?))),
            [other] => Err(GenError::shape(format!("`Vector` element must be a concrete type, got {other:?}"))),
            _ => Err(GenError::shape(format!(
                "`Vector` takes exactly one type argument, got {}",
                children.len()
            ))),
        };
    }

    let ty = schema
        .type_by_name(type_name)
        .ok_or_else(|| GenError::UnknownType(type_name.to_string()))?;
    if children.len() != ty.arity {
        return Err(GenError::shape(format!(
            "`{type_name}` has arity {} but is referenced with {} arguments",
            ty.arity,
            children.len()
        )));
    }
    if let Some(child) = children.iter().find(|c| !matches!(c, TypeTree::NatConstant { .. })) {
        return Err(GenError::shape(format!(
            "`{type_name}` may only be parameterized by integer constants, got {child:?}"
        )));
    }
    Ok(MappedType::Class(ty))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Combinator;

    fn ctor(name: &str, ty: &str) -> Combinator {
        Combinator::new(name, 0, vec![], TypeTree::concrete(ty))
    }

    fn schema() -> Schema {
        Schema::new(
            vec![
                Type::new("Chat", vec![ctor("chat", "Chat")]),
                Type::new("ChatType", vec![ctor("chatTypePrivate", "ChatType"), ctor("chatTypeGroup", "ChatType")]),
                Type::new("Bool", vec![ctor("boolFalse", "Bool"), ctor("boolTrue", "Bool")]),
                Type { arity: 1, ..Type::new("Tuple", vec![]) },
            ],
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn bareness_follows_constructor_count_and_builtins() {
        let schema = schema();
        assert!(is_bare(schema.type_by_name("Chat").unwrap()));
        assert!(!is_bare(schema.type_by_name("ChatType").unwrap()));
        assert!(!is_bare(schema.type_by_name("Bool").unwrap()));

        for scalar in Scalar::ALL.into_iter().filter(|s| *s != Scalar::Bool) {
            let builtin = Type { constructor_count: 0, ..Type::new(scalar.name(), vec![]) };
            assert!(is_bare(&builtin), "{}", scalar.name());
        }
        let vector = Type { arity: 1, constructor_count: 0, ..Type::new("Vector", vec![]) };
        assert!(is_bare(&vector));
    }

    #[test]
    fn builtins_classify_without_declarations() {
        let schema = Schema::default();
        assert_eq!(classify(&schema, &TypeTree::concrete("Int53")).unwrap(), MappedType::Scalar(Scalar::Int53));
        let nested = TypeTree::vector_of(TypeTree::vector_of(TypeTree::concrete("Int32")));
        let mapped = classify(&schema, &nested).unwrap();
        assert_eq!(
            mapped,
            MappedType::Vector(Box::new(MappedType::Vector(Box::new(MappedType::Scalar(Scalar::Int32)))))
        );
    }

    #[test]
    fn render_rules_distinguish_deep_vectors() {
        let schema = schema();
        let rule = |tree: TypeTree| classify(&schema, &tree).unwrap().render_rule();
        assert_eq!(rule(TypeTree::concrete("Int32")), RenderRule::Scalar);
        assert_eq!(rule(TypeTree::concrete("Bool")), RenderRule::Scalar);
        assert_eq!(rule(TypeTree::concrete("Bytes")), RenderRule::Bytes);
        assert_eq!(rule(TypeTree::vector_of(TypeTree::concrete("Int32"))), RenderRule::List);
        assert_eq!(rule(TypeTree::vector_of(TypeTree::concrete("Chat"))), RenderRule::List);
        assert_eq!(
            rule(TypeTree::vector_of(TypeTree::vector_of(TypeTree::concrete("Int32")))),
            RenderRule::DeepList
        );
        assert_eq!(rule(TypeTree::concrete("ChatType")), RenderRule::Object);
        assert_eq!(rule(TypeTree::vector_of(TypeTree::concrete("Bytes"))), RenderRule::BytesList);
        assert_eq!(
            rule(TypeTree::vector_of(TypeTree::vector_of(TypeTree::concrete("Bytes")))),
            RenderRule::BytesList
        );
    }

    #[test]
    fn user_types_map_to_their_type_not_a_constructor() {
        let schema = schema();
        match classify(&schema, &TypeTree::concrete("ChatType")).unwrap() {
            MappedType::Class(ty) => assert_eq!(ty.name, "ChatType"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn unexpressible_shapes_are_rejected() {
        let schema = schema();
        let err = |tree: TypeTree| classify(&schema, &tree).unwrap_err();

        assert!(matches!(err(TypeTree::TypeVariable { var_num: 0 }), GenError::UnsupportedShape(_)));
        assert!(matches!(err(TypeTree::NatConstant { value: 3 }), GenError::UnsupportedFeatureRequested(_)));
        assert!(matches!(err(TypeTree::concrete("#")), GenError::UnsupportedFeatureRequested(_)));
        assert!(matches!(err(TypeTree::concrete("Vector")), GenError::UnsupportedShape(_)));
        assert!(matches!(
            err(TypeTree::vector_of(TypeTree::TypeVariable { var_num: 0 })),
            GenError::UnsupportedShape(_)
        ));
        assert!(matches!(err(TypeTree::concrete("Tuple")), GenError::UnsupportedShape(_)));
        assert!(matches!(err(TypeTree::concrete("Missing")), GenError::UnknownType(name) if name == "Missing"));

        let with_arg = TypeTree::Concrete {
            type_name: "Int32".into(),
            children: vec![TypeTree::NatConstant { value: 1 }],
        };
        assert!(matches!(err(with_arg), GenError::UnsupportedShape(_)));
    }

    #[test]
    fn nat_parameterized_user_types_are_accepted() {
        let schema = schema();
        let tree = TypeTree::Concrete {
            type_name: "Tuple".into(),
            children: vec![TypeTree::NatConstant { value: 2 }],
        };
        assert!(matches!(classify(&schema, &tree).unwrap(), MappedType::Class(_)));
    }
}
