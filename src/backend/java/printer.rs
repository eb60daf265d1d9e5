//! `toStringBuilder` generation.
//!
//! The generated method threads an explicit `shift` column through nested
//! objects: it grows by 2 on entering a class body and shrinks by 2 on the
//! way out, and every field line starts at `shift`.
use crate::backend::Field;
use crate::codegen::Codegen;
use crate::error::GenResult;
use crate::types::{MappedType, RenderRule};
use crate::vars::{self, VarDescription};

pub(super) fn begin(cg: &mut Codegen, storer: &str, class_name: &str) {
    cg.blank();
    cg.line("@Override");
    cg.open(format!("protected void toStringBuilder(int shift, {storer} s) {{"));
    cg.line(format!("s.append(\"{class_name}\").append(\" {{\");"));
    cg.line("shift += 2;");
}

pub(super) fn field(cg: &mut Codegen, field: &Field<'_>, vars: Vec<VarDescription>) -> GenResult<Vec<VarDescription>> {
    let name = &field.name;
    let label = format!("appendLine(s, shift).append(\"{name} = \")");
    match field.mapped.render_rule() {
        RenderRule::Scalar => cg.line(format!("{label}.append(this.{name});")),
        RenderRule::Bytes => {
            cg.line(format!("{label}.append(\"bytes {{ \");"));
            hex_digits(cg, &format!("this.{name}"));
        }
        RenderRule::List => cg.line(format!("{label}.append(Arrays.toString(this.{name}));")),
        RenderRule::DeepList => cg.line(format!("{label}.append(Arrays.deepToString(this.{name}));")),
        RenderRule::BytesList => {
            cg.line(format!("{label};"));
            bytes_elements(cg, &field.mapped, format!("this.{name}"), 0);
        }
        RenderRule::Object => {
            cg.line(format!("{label};"));
            cg.open(format!("if (this.{name} != null) {{"));
            cg.line(format!("this.{name}.toStringBuilder(shift, s);"));
            cg.reopen("} else {");
            cg.line("s.append(\"null\");");
            cg.close("}");
        }
    }
    vars::mark_stored(vars, &field.arg.ty)
}

/// Hex pairs of the `byte[]` at `array`, then the closing brace.
fn hex_digits(cg: &mut Codegen, array: &str) {
    cg.open(format!("for (byte k : {array}) {{"));
    cg.line("int b = (int) k & 255;");
    cg.line("s.append(HEX_CHARACTERS[b >> 4]).append(HEX_CHARACTERS[b & 15]).append(' ');");
    cg.close("}");
    cg.line("s.append('}');");
}

/// `Arrays.toString` layout, with `byte[]` leaves rendered as `bytes { .. }`.
fn bytes_elements(cg: &mut Codegen, mapped: &MappedType<'_>, array: String, level: usize) {
    let MappedType::Vector(item) = mapped else {
        cg.line("s.append(\"bytes { \");");
        hex_digits(cg, &array);
        return;
    };
    let i = format!("i{level}");
    cg.line("s.append('[');");
    cg.open(format!("for (int {i} = 0; {i} < {array}.length; {i}++) {{"));
    cg.open(format!("if ({i} > 0) {{"));
    cg.line("s.append(\", \");");
    cg.close("}");
    bytes_elements(cg, item, format!("{array}[{i}]"), level + 1);
    cg.close("}");
    cg.line("s.append(']');");
}

pub(super) fn end(cg: &mut Codegen, vars: &[VarDescription]) -> GenResult<()> {
    vars::ensure_all_stored(vars)?;
    cg.line("shift -= 2;");
    cg.line("appendLine(s, shift).append(\"}\");");
    cg.close("}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Backend;
    use crate::backend::java::JAVA_BACKEND;
    use crate::error::GenError;
    use crate::schema::{Arg, Combinator, Schema, Type, TypeTree, VarDecl, VarKind};

    fn schema() -> Schema {
        let photo = Combinator::new("chatPhoto", 1, vec![], TypeTree::concrete("ChatPhoto"));
        Schema::new(vec![Type::new("ChatPhoto", vec![photo])], vec![]).unwrap()
    }

    #[test]
    fn every_render_rule_has_its_own_statement() {
        let schema = schema();
        let args = [
            Arg::new("id", TypeTree::concrete("Int32")),
            Arg::new("data", TypeTree::concrete("Bytes")),
            Arg::new("ids", TypeTree::vector_of(TypeTree::concrete("Int32"))),
            Arg::new("grid", TypeTree::vector_of(TypeTree::vector_of(TypeTree::concrete("Int32")))),
            Arg::new("photo", TypeTree::concrete("ChatPhoto")),
        ];

        let mut cg = Codegen::new();
        begin(&mut cg, "StringBuilder", "Sample");
        let mut vars = Vec::new();
        for arg in &args {
            let f = JAVA_BACKEND.field(&schema, arg).unwrap();
            vars = field(&mut cg, &f, vars).unwrap();
        }
        end(&mut cg, &vars).unwrap();

        insta::assert_snapshot!(cg.into_string().trim_start_matches('\n'), @r#"
        @Override
        protected void toStringBuilder(int shift, StringBuilder s) {
            s.append("Sample").append(" {");
            shift += 2;
            appendLine(s, shift).append("id = ").append(this.id);
            appendLine(s, shift).append("data = ").append("bytes { ");
            for (byte k : this.data) {
                int b = (int) k & 255;
                s.append(HEX_CHARACTERS[b >> 4]).append(HEX_CHARACTERS[b & 15]).append(' ');
            }
            s.append('}');
            appendLine(s, shift).append("ids = ").append(Arrays.toString(this.ids));
            appendLine(s, shift).append("grid = ").append(Arrays.deepToString(this.grid));
            appendLine(s, shift).append("photo = ");
            if (this.photo != null) {
                this.photo.toStringBuilder(shift, s);
            } else {
                s.append("null");
            }
            shift -= 2;
            appendLine(s, shift).append("}");
        }
        "#);
    }

    #[test]
    fn plain_vectors_never_take_the_deep_path() {
        let schema = schema();
        let arg = Arg::new("ids", TypeTree::vector_of(TypeTree::concrete("Int64")));
        let mut cg = Codegen::new();
        field(&mut cg, &JAVA_BACKEND.field(&schema, &arg).unwrap(), Vec::new()).unwrap();
        let out = cg.into_string();
        assert!(out.contains("Arrays.toString(this.ids)"));
        assert!(!out.contains("deepToString"));
    }

    #[test]
    fn byte_vectors_render_each_element_as_bytes() {
        let schema = schema();
        let arg = Arg::new("blobs", TypeTree::vector_of(TypeTree::vector_of(TypeTree::concrete("Bytes"))));
        let mut cg = Codegen::new();
        field(&mut cg, &JAVA_BACKEND.field(&schema, &arg).unwrap(), Vec::new()).unwrap();

        insta::assert_snapshot!(cg.into_string(), @r#"
        appendLine(s, shift).append("blobs = ");
        s.append('[');
        for (int i0 = 0; i0 < this.blobs.length; i0++) {
            if (i0 > 0) {
                s.append(", ");
            }
            s.append('[');
            for (int i1 = 0; i1 < this.blobs[i0].length; i1++) {
                if (i1 > 0) {
                    s.append(", ");
                }
                s.append("bytes { ");
                for (byte k : this.blobs[i0][i1]) {
                    int b = (int) k & 255;
                    s.append(HEX_CHARACTERS[b >> 4]).append(HEX_CHARACTERS[b & 15]).append(' ');
                }
                s.append('}');
            }
            s.append(']');
        }
        s.append(']');
        "#);
    }

    #[test]
    fn unstored_variables_abort_the_printer() {
        let c = Combinator {
            vars: vec![VarDecl { name: "X".into(), kind: VarKind::Type }],
            ..Combinator::new("c", 1, vec![], TypeTree::concrete("R"))
        };
        let vars = JAVA_BACKEND.prepare_vars(&c).unwrap();
        let mut cg = Codegen::new();
        begin(&mut cg, "StringBuilder", "C");
        assert!(matches!(end(&mut cg, &vars), Err(GenError::UnsupportedShape(_))));
    }
}
