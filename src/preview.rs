//! Render schema values to the debug text the generated printers produce.
//!
//! Uses the same [`RenderRule`] classification as the emitters, so a value
//! previewed here prints exactly as the corresponding generated object would
//! from `toString()`.
use serde_json::Value as Json;

use crate::backend::{Backend, Field, GenConfig};
use crate::driver;
use crate::error::{GenError, GenResult, ResultExt};
use crate::schema::{Combinator, Schema};
use crate::types::{MappedType, RenderRule, Scalar};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    Vector(Vec<Value>),
    /// A polymorphic slot. `None` is an empty slot, not an owned object.
    Object(Option<Box<Instance>>),
}

/// A constructed object: constructor name plus field values in declaration
/// order.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub constructor: String,
    pub fields: Vec<Value>,
}

impl Instance {
    pub fn new(constructor: impl Into<String>, fields: Vec<Value>) -> Self {
        Instance { constructor: constructor.into(), fields }
    }
}

struct Previewer<'a> {
    schema: &'a Schema,
    backend: &'a dyn Backend,
    config: &'a GenConfig,
}

/// Render `instance` as its generated `toString()` would.
pub fn render(schema: &Schema, backend: &dyn Backend, config: &GenConfig, instance: &Instance) -> GenResult<String> {
    let mut out = String::new();
    Previewer { schema, backend, config }.object(&mut out, 0, instance)?;
    Ok(out)
}

/// Build an [`Instance`] from JSON such as
/// `{"@type": "chatPhoto", "id": 5, "sizes": [...]}`.
///
/// Field keys are the schema's argument names. Bytes are arrays of numbers.
pub fn instance_from_json(
    schema: &Schema,
    backend: &dyn Backend,
    config: &GenConfig,
    json: &Json,
) -> GenResult<Instance> {
    Previewer { schema, backend, config }.instance_from_json(json)
}

fn append_line(out: &mut String, shift: usize) {
    out.push('\n');
    out.extend(std::iter::repeat_n(' ', shift));
}

/// `Double.toString` formatting.
fn java_double(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let magnitude = value.abs();
    if magnitude == 0.0 || (1e-3..1e7).contains(&magnitude) {
        let text = value.to_string();
        return if text.contains('.') { text } else { format!("{text}.0") };
    }
    let text = format!("{value:E}");
    match text.split_once('E') {
        Some((mantissa, exp)) if !mantissa.contains('.') => format!("{mantissa}.0E{exp}"),
        _ => text,
    }
}

fn mismatch(expected: &str, value: &Value) -> GenError {
    GenError::shape(format!("expected {expected} value, got {value:?}"))
}

impl<'a> Previewer<'a> {
    /// A combinator the backend emits, together with its class name.
    fn combinator(&self, name: &str) -> GenResult<(&'a Combinator, String)> {
        let combinator = self
            .schema
            .combinator_by_name(name)
            .ok_or_else(|| GenError::shape(format!("unknown constructor `{name}`")))?;
        if !self.backend.is_combinator_supported(self.schema, combinator)? {
            return Err(GenError::shape(format!(
                "`{name}` is not emitted by the {} backend",
                self.backend.name()
            )));
        }
        Ok((combinator, self.class_name(combinator)?))
    }

    fn class_name(&self, combinator: &Combinator) -> GenResult<String> {
        if self.schema.functions().iter().any(|f| std::ptr::eq(f, combinator)) {
            return driver::function_class_name(self.backend, &combinator.name, self.config);
        }
        let type_name = combinator
            .result_type_name()
            .ok_or_else(|| GenError::shape(format!("`{}` has no concrete result type", combinator.name)))?;
        let type_class = driver::type_class_name(self.backend, type_name, self.config)?;
        driver::constructor_class_name(self.backend, &combinator.name, &type_class, self.config)
    }

    fn fields(&self, combinator: &'a Combinator) -> GenResult<Vec<Field<'a>>> {
        combinator
            .args
            .iter()
            .map(|arg| self.backend.field(self.schema, arg))
            .collect()
    }

    fn object(&self, out: &mut String, mut shift: usize, instance: &Instance) -> GenResult<()> {
        let (combinator, class_name) = self.combinator(&instance.constructor)?;
        let fields = self.fields(combinator)?;
        if fields.len() != instance.fields.len() {
            return Err(GenError::shape(format!(
                "`{}` has {} fields, got {} values",
                combinator.name,
                fields.len(),
                instance.fields.len()
            )));
        }

        out.push_str(&class_name);
        out.push_str(" {");
        shift += 2;
        for (field, value) in fields.iter().zip(&instance.fields) {
            append_line(out, shift);
            out.push_str(&field.name);
            out.push_str(" = ");
            self.value(out, shift, &field.mapped, value)
                .in_context(|| format!("field `{}` of `{}`", field.name, combinator.name))?;
        }
        shift -= 2;
        append_line(out, shift);
        out.push('}');
        Ok(())
    }

    fn value(&self, out: &mut String, shift: usize, mapped: &MappedType<'_>, value: &Value) -> GenResult<()> {
        match (mapped.render_rule(), mapped) {
            (RenderRule::Scalar, MappedType::Scalar(scalar)) => out.push_str(&scalar_text(*scalar, value)?),
            (RenderRule::Bytes, _) => {
                let Value::Bytes(bytes) = value else {
                    return Err(mismatch("Bytes", value));
                };
                out.push_str("bytes { ");
                for b in bytes {
                    out.push_str(&format!("{b:02X} "));
                }
                out.push('}');
            }
            (RenderRule::List, MappedType::Vector(item)) => out.push_str(&self.list(item, value)?),
            (RenderRule::DeepList | RenderRule::BytesList, MappedType::Vector(item)) => {
                out.push_str(&self.deep_list(item, value)?)
            }
            (RenderRule::Object, MappedType::Class(ty)) => match value {
                Value::Object(None) => out.push_str("null"),
                Value::Object(Some(instance)) => {
                    let (combinator, _) = self.combinator(&instance.constructor)?;
                    if combinator.result_type_name() != Some(ty.name.as_str()) {
                        return Err(GenError::shape(format!(
                            "`{}` does not construct `{}`",
                            instance.constructor, ty.name
                        )));
                    }
                    self.object(out, shift, instance)?;
                }
                other => return Err(mismatch(&ty.name, other)),
            },
            (rule, mapped) => {
                return Err(GenError::shape(format!("render rule {rule:?} does not fit {mapped:?}")));
            }
        }
        Ok(())
    }

    /// `Arrays.toString`: each element on its own, as `String.valueOf` would
    /// render it, i.e. objects start over at shift 0.
    fn list(&self, item: &MappedType<'_>, value: &Value) -> GenResult<String> {
        let Value::Vector(items) = value else {
            return Err(mismatch("Vector", value));
        };
        let rendered = items
            .iter()
            .map(|v| {
                let mut text = String::new();
                self.value(&mut text, 0, item, v)?;
                Ok(text)
            })
            .collect::<GenResult<Vec<_>>>()?;
        Ok(format!("[{}]", rendered.join(", ")))
    }

    /// `Arrays.deepToString`: one bracket pair per nesting level. Also the
    /// element loop the printer writes for vectors of `Bytes`, whose leaves
    /// go through the `Bytes` rule.
    fn deep_list(&self, item: &MappedType<'_>, value: &Value) -> GenResult<String> {
        match item {
            MappedType::Vector(inner) => {
                let Value::Vector(rows) = value else {
                    return Err(mismatch("Vector", value));
                };
                let rendered = rows
                    .iter()
                    .map(|row| self.deep_list(inner, row))
                    .collect::<GenResult<Vec<_>>>()?;
                Ok(format!("[{}]", rendered.join(", ")))
            }
            _ => self.list(item, value),
        }
    }

    fn instance_from_json(&self, json: &Json) -> GenResult<Instance> {
        let object = json
            .as_object()
            .ok_or_else(|| GenError::shape(format!("expected a JSON object, got {json}")))?;
        let name = object
            .get("@type")
            .and_then(Json::as_str)
            .ok_or_else(|| GenError::shape("object is missing its `@type`"))?;
        let (combinator, _) = self.combinator(name)?;
        let fields = self
            .fields(combinator)?
            .iter()
            .map(|field| {
                let raw = object.get(&field.arg.name).unwrap_or(&Json::Null);
                self.value_from_json(&field.mapped, raw)
                    .in_context(|| format!("field `{}` of `{name}`", field.arg.name))
            })
            .collect::<GenResult<Vec<_>>>()?;
        Ok(Instance::new(name, fields))
    }

    fn value_from_json(&self, mapped: &MappedType<'_>, json: &Json) -> GenResult<Value> {
        let wrong = || GenError::shape(format!("{json} does not fit {mapped:?}"));
        Ok(match mapped {
            MappedType::Scalar(Scalar::Bool) => Value::Bool(json.as_bool().ok_or_else(wrong)?),
            MappedType::Scalar(Scalar::Int32 | Scalar::Int53 | Scalar::Int64) => {
                // Large integers are commonly sent as strings.
                let int = json.as_i64().or_else(|| json.as_str().and_then(|s| s.parse().ok()));
                Value::Int(int.ok_or_else(wrong)?)
            }
            MappedType::Scalar(Scalar::Double) => Value::Double(json.as_f64().ok_or_else(wrong)?),
            MappedType::Scalar(Scalar::String) => Value::String(json.as_str().ok_or_else(wrong)?.to_string()),
            MappedType::Scalar(Scalar::Bytes) => {
                let items = json.as_array().ok_or_else(wrong)?;
                let bytes = items
                    .iter()
                    .map(|b| b.as_u64().and_then(|b| u8::try_from(b).ok()).ok_or_else(wrong))
                    .collect::<GenResult<Vec<u8>>>()?;
                Value::Bytes(bytes)
            }
            MappedType::Vector(item) => Value::Vector(
                json.as_array()
                    .ok_or_else(wrong)?
                    .iter()
                    .map(|v| self.value_from_json(item, v))
                    .collect::<GenResult<Vec<_>>>()?,
            ),
            MappedType::Class(_) if json.is_null() => Value::Object(None),
            MappedType::Class(_) => Value::Object(Some(Box::new(self.instance_from_json(json)?))),
        })
    }
}

fn scalar_text(scalar: Scalar, value: &Value) -> GenResult<String> {
    match (scalar, value) {
        (Scalar::Bool, Value::Bool(b)) => Ok(b.to_string()),
        (Scalar::Int32, Value::Int(i)) => i32::try_from(*i)
            .map(|i| i.to_string())
            .map_err(|_| GenError::shape(format!("{i} does not fit in Int32"))),
        (Scalar::Int53 | Scalar::Int64, Value::Int(i)) => Ok(i.to_string()),
        (Scalar::Double, Value::Double(d)) => Ok(java_double(*d)),
        (Scalar::String, Value::String(s)) => Ok(s.clone()),
        (scalar, value) => Err(mismatch(scalar.name(), value)),
    }
}
