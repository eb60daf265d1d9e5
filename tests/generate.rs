use std::path::Path;

use tl_classgen::backend::java::JAVA_BACKEND;
use tl_classgen::schema::{Arg, ArgFlags, Combinator, Schema, Type, TypeTree, VarDecl, VarKind};
use tl_classgen::{GenConfig, GenError, generate};

fn ctor(name: &str, id: i32, args: Vec<Arg>, ty: &str) -> Combinator {
    Combinator::new(name, id, args, TypeTree::concrete(ty))
}

fn arg(name: &str, ty: &str) -> Arg {
    Arg::new(name, TypeTree::concrete(ty))
}

fn java(schema: &Schema) -> String {
    generate(&JAVA_BACKEND, schema, &GenConfig::default()).unwrap()
}

/// Text of the class block opened by `header`, up to its closing brace.
fn block<'a>(source: &'a str, header: &str) -> &'a str {
    let start = source.find(header).unwrap_or_else(|| panic!("missing `{header}` in:\n{source}"));
    let indent = source[..start].rsplit('\n').next().unwrap_or("");
    let close = format!("\n{indent}}}\n");
    let end = source[start..].find(&close).unwrap() + close.len();
    &source[start..start + end]
}

fn chat_type_schema() -> Schema {
    Schema::new(
        vec![
            Type::new(
                "ChatType",
                vec![
                    ctor("chatTypePrivate", 1579049844, vec![arg("user_id", "Int53")], "ChatType"),
                    ctor("chatTypeBasicGroup", 973884508, vec![arg("basic_group_id", "Int53")], "ChatType"),
                ],
            ),
            Type::new("ChatPhoto", vec![ctor("chatPhotoInfo", 7, vec![arg("small_file_id", "Int32")], "ChatPhoto")]),
        ],
        vec![],
    )
    .unwrap()
}

#[test]
fn two_constructors_give_an_abstract_base_and_two_subclasses() {
    let out = java(&chat_type_schema());
    let base = block(&out, "public abstract static class ChatType extends Object {");
    assert_eq!(base.matches("extends ChatType {").count(), 2);
    assert!(base.contains("public static class ChatTypePrivate extends ChatType {"));
    assert!(base.contains("public static class ChatTypeBasicGroup extends ChatType {"));
    assert!(base.contains("public static final int CONSTRUCTOR = 1579049844;"));
    assert!(base.contains("public static final int CONSTRUCTOR = 973884508;"));
}

#[test]
fn single_constructor_keeps_a_concrete_base_without_a_tag() {
    let out = java(&chat_type_schema());
    let base = block(&out, "public static class ChatPhoto extends Object {");
    assert_eq!(base.matches("extends ChatPhoto {").count(), 1);
    assert!(base.contains("public static class ChatPhotoInfo extends ChatPhoto {"));
    assert!(!base.contains("CONSTRUCTOR"));
    assert!(!base.contains("getConstructor"));
}

#[test]
fn type_variable_constructors_are_left_out() {
    let boxed = Combinator {
        vars: vec![VarDecl { name: "X".into(), kind: VarKind::Type }],
        ..ctor("boxedValue", 3, vec![Arg::new("value", TypeTree::TypeVariable { var_num: 0 })], "Holder")
    };
    let plain = ctor("holderEmpty", 4, vec![], "Holder");
    let schema = Schema::new(
        vec![
            Type::new("Holder", vec![boxed, plain]),
            Type::new("ChatPhoto", vec![ctor("chatPhotoInfo", 7, vec![], "ChatPhoto")]),
        ],
        vec![],
    )
    .unwrap();

    let out = java(&schema);
    assert!(!out.contains("BoxedValue"));
    assert!(out.contains("public static class HolderEmpty extends Holder {"));
    assert!(out.contains("public static class ChatPhotoInfo extends ChatPhoto {"));
}

#[test]
fn printer_has_one_line_per_field_in_declaration_order() {
    let args = vec![arg("chat_id", "Int53"), arg("title", "String"), arg("is_pinned", "Bool")];
    let schema = Schema::new(vec![Type::new("Chat", vec![ctor("chatInfo", 1, args, "Chat")])], vec![]).unwrap();
    let out = java(&schema);

    let labels: Vec<&str> = out
        .lines()
        .filter_map(|line| line.trim().strip_prefix("appendLine(s, shift).append(\""))
        .filter_map(|rest| rest.split_once(" = \")").map(|(name, _)| name))
        .collect();
    assert_eq!(labels, ["chatId", "title", "isPinned"]);
}

#[test]
fn functions_extend_the_function_base_and_are_always_tagged() {
    let schema = Schema::new(
        vec![Type::new("Ok", vec![ctor("okEmpty", 1, vec![], "Ok")])],
        vec![
            ctor("close", -1187782273, vec![], "Ok"),
            Combinator::new("getIds", 9, vec![], TypeTree::vector_of(TypeTree::concrete("Int53"))),
        ],
    )
    .unwrap();
    let out = java(&schema);

    let close = block(&out, "public static class Close extends Function {");
    assert!(close.contains("public static final int CONSTRUCTOR = -1187782273;"));
    // Generic results cannot be expressed, so the function is skipped.
    assert!(!out.contains("GetIds"));
    // `Ok` is bare, yet the function returning it is still tagged.
    assert!(!block(&out, "public static class Ok extends Object {").contains("CONSTRUCTOR"));
}

#[test]
fn optional_fields_abort_without_output() {
    let flagged = Arg { flags: ArgFlags { optional_var: true, ..ArgFlags::default() }, ..arg("caption", "String") };
    let schema = Schema::new(vec![Type::new("Photo", vec![ctor("photoInfo", 1, vec![flagged], "Photo")])], vec![]).unwrap();

    let err = generate(&JAVA_BACKEND, &schema, &GenConfig::default()).unwrap_err();
    assert!(matches!(err.root_cause(), GenError::UnsupportedShape(_)));
    let report = format!("{err}");
    assert!(report.contains("Photo"), "{report}");
}

#[test]
fn numeric_variables_abort() {
    let c = Combinator {
        vars: vec![VarDecl { name: "n".into(), kind: VarKind::Nat }],
        ..ctor("sizedListInfo", 1, vec![], "SizedList")
    };
    let schema = Schema::new(vec![Type::new("SizedList", vec![c])], vec![]).unwrap();
    let err = generate(&JAVA_BACKEND, &schema, &GenConfig::default()).unwrap_err();
    assert!(matches!(err.root_cause(), GenError::UnsupportedShape(msg) if msg.contains("`n`")));
}

#[test]
fn unknown_field_types_abort() {
    let schema = Schema::new(
        vec![Type::new("Chat", vec![ctor("chatInfo", 1, vec![arg("photo", "Missing")], "Chat")])],
        vec![],
    )
    .unwrap();
    let err = generate(&JAVA_BACKEND, &schema, &GenConfig::default()).unwrap_err();
    assert!(matches!(err.root_cause(), GenError::UnknownType(name) if name == "Missing"));
}

#[test]
fn nested_class_may_not_share_an_enclosing_name() {
    let schema = Schema::new(vec![Type::new("Ok", vec![ctor("ok", 1, vec![], "Ok")])], vec![]).unwrap();
    let err = generate(&JAVA_BACKEND, &schema, &GenConfig::default()).unwrap_err();
    assert!(matches!(err.root_cause(), GenError::IdentifierViolation(_)));

    let schema = Schema::new(vec![Type::new("Api", vec![ctor("apiInfo", 1, vec![], "Api")])], vec![]).unwrap();
    let err = generate(&JAVA_BACKEND, &schema, &GenConfig::default()).unwrap_err();
    assert!(matches!(err.root_cause(), GenError::IdentifierViolation(_)));
}

#[test]
fn schema_classes_may_not_replace_the_root_classes() {
    let schema = Schema::new(vec![Type::new("object", vec![ctor("objectInfo", 1, vec![], "object")])], vec![]).unwrap();
    let err = generate(&JAVA_BACKEND, &schema, &GenConfig::default()).unwrap_err();
    assert!(matches!(err.root_cause(), GenError::IdentifierViolation(_)));

    let schema = Schema::new(
        vec![Type::new("Ok", vec![ctor("okEmpty", 1, vec![], "Ok")])],
        vec![ctor("function", 2, vec![], "Ok")],
    )
    .unwrap();
    let err = generate(&JAVA_BACKEND, &schema, &GenConfig::default()).unwrap_err();
    assert!(matches!(err.root_cause(), GenError::IdentifierViolation(_)));
}

#[test]
fn output_is_deterministic() {
    let types = (0..64)
        .map(|i| {
            let name = format!("Kind{i}");
            let first = ctor(&format!("kind{i}First"), i, vec![arg("value", "Int32")], &name);
            let second = ctor(&format!("kind{i}Second"), -i, vec![], &name);
            Type::new(name, vec![first, second])
        })
        .collect();
    let schema = Schema::new(types, vec![]).unwrap();

    let first = java(&schema);
    assert_eq!(first, java(&schema));
    let order: Vec<usize> = (0..64).map(|i| first.find(&format!("class Kind{i} ")).unwrap()).collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn fixture_schema_matches_expected_source() {
    let schema = Schema::from_json_str(include_str!("../fixtures/chat.json"), Path::new("chat.json")).unwrap();
    let config = GenConfig { package_name: "org.example.tl".into(), root_class_name: "Api".into() };
    let out = generate(&JAVA_BACKEND, &schema, &config).unwrap();
    assert_eq!(out, include_str!("../fixtures/chat.java"));
}
