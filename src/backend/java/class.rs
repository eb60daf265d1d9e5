use crate::backend::{ClassSpec, GenConfig};
use crate::codegen::Codegen;
use crate::error::{GenError, GenResult};

fn is_java_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub(super) fn output_begin(cg: &mut Codegen, config: &GenConfig) -> GenResult<()> {
    if !config.package_name.split('.').all(is_java_identifier) {
        return Err(GenError::identifier(format!(
            "`{}` is not a valid package name",
            config.package_name
        )));
    }
    if !is_java_identifier(&config.root_class_name) {
        return Err(GenError::identifier(format!(
            "`{}` is not a valid root class name",
            config.root_class_name
        )));
    }

    cg.line(format!("package {};", config.package_name));
    cg.blank();
    cg.line("import java.util.Arrays;");
    cg.blank();
    cg.open(format!("public class {} {{", config.root_class_name));
    cg.line("private static final char[] HEX_CHARACTERS = \"0123456789ABCDEF\".toCharArray();");
    Ok(())
}

pub(super) fn class_begin(
    cg: &mut Codegen,
    class_name: &str,
    base_class_name: Option<&str>,
    is_proxy: bool,
) -> GenResult<()> {
    let modifier = if is_proxy { "abstract " } else { "" };
    let extends = match base_class_name {
        Some("") => return Err(GenError::shape(format!("class `{class_name}` has an empty superclass name"))),
        Some(base) => format!(" extends {base}"),
        None => String::new(),
    };
    cg.blank();
    cg.open(format!("public {modifier}static class {class_name}{extends} {{"));
    Ok(())
}

/// Defaults for classes without a tag or printer of their own: bare
/// constructors report identifier 0 and concrete base classes print as
/// `<Name> {}`.
pub(super) fn root_members(cg: &mut Codegen, storer: &str) {
    cg.open("public int getConstructor() {");
    cg.line("return 0;");
    cg.close("}");

    cg.blank();
    cg.open("public String toString() {");
    cg.line(format!("{storer} s = new {storer}();"));
    cg.line("toStringBuilder(0, s);");
    cg.line("return s.toString();");
    cg.close("}");

    cg.blank();
    cg.open(format!("protected {storer} appendLine({storer} s, int shift) {{"));
    cg.line("s.append('\\n');");
    cg.open("for (int i = 0; i < shift; i++) {");
    cg.line("s.append(' ');");
    cg.close("}");
    cg.line("return s;");
    cg.close("}");

    cg.blank();
    cg.open(format!("protected void toStringBuilder(int shift, {storer} s) {{"));
    cg.line("s.append(getClass().getSimpleName()).append(\" {}\");");
    cg.close("}");
}

pub(super) fn constructor(cg: &mut Codegen, class: &ClassSpec<'_>) {
    let params = class
        .fields
        .iter()
        .map(|f| format!("{} {}", f.type_name, f.name))
        .collect::<Vec<_>>()
        .join(", ");
    cg.blank();
    cg.open(format!("public {}({params}) {{", class.class_name));
    for f in &class.fields {
        cg.line(format!("this.{0} = {0};", f.name));
    }
    cg.close("}");
}

pub(super) fn constructor_id(cg: &mut Codegen, id: i32) {
    cg.blank();
    cg.line(format!("public static final int CONSTRUCTOR = {id};"));
    cg.blank();
    cg.line("@Override");
    cg.open("public int getConstructor() {");
    cg.line(format!("return {id};"));
    cg.close("}");
}
