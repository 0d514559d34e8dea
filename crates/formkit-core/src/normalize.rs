//! Value normalization engine.
//!
//! Repairs stored value shapes against the schema's declared multiplicity,
//! supplies bind-time defaults, and coerces submitted values to canonical
//! types before they reach the host's submit handler.

use serde_json::Value;

use crate::types::{Field, Schema, ValueMap};

/// Zero value for a field, shaped by its type and multiplicity.
pub fn get_default_value(field: &Field) -> Value {
    field.field_type.behavior().default_value(field)
}

/// Repair the shape of every schema field present in `values`.
///
/// Keys absent from `values` stay absent and keys without a field
/// definition are copied unchanged. Applying this twice equals applying
/// it once.
pub fn normalize_initial_values(values: &ValueMap, schema: &Schema) -> ValueMap {
    let mut normalized = values.clone();

    for field in schema.effective_fields() {
        if let Some(slot) = normalized.get_mut(&field.name) {
            let current = std::mem::take(slot);
            *slot = field.field_type.behavior().normalize(field, current);
        }
    }

    normalized
}

/// Coerce submitted values to their canonical types.
///
/// Total: unknown keys, `null`s and unparseable numbers pass through as-is.
pub fn transform_form_values(data: &ValueMap, schema: &Schema) -> ValueMap {
    let fields = schema.effective_fields();

    data.iter()
        .map(|(key, value)| {
            let out = if value.is_null() {
                Value::Null
            } else {
                match fields.iter().find(|f| &f.name == key) {
                    Some(field) => field.field_type.behavior().transform(value.clone()),
                    None => value.clone(),
                }
            };
            (key.clone(), out)
        })
        .collect()
}

/// Normalized values with bind-time defaults filled in for every field the
/// input does not mention.
pub fn initial_form_values(values: Option<&ValueMap>, schema: &Schema) -> ValueMap {
    let mut out = values
        .map(|v| normalize_initial_values(v, schema))
        .unwrap_or_default();
    for field in schema.effective_fields() {
        if !out.contains_key(&field.name) {
            out.insert(field.name.clone(), get_default_value(field));
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Shape helpers shared by the behaviour table
// ---------------------------------------------------------------------------

/// Collapse a list to its first element, descending through nested lists.
/// An empty list becomes `empty`.
pub(crate) fn collapse_to_single(value: Value, empty: Value) -> Value {
    let mut current = value;
    loop {
        match current {
            Value::Array(items) => match items.into_iter().next() {
                Some(first) => current = first,
                None => return empty,
            },
            other => return other,
        }
    }
}

/// Numeric coercion for `number` fields. Empty or whitespace-only text
/// becomes `null`; booleans become `1`/`0`; text that does not parse to a
/// finite number is returned unchanged.
pub(crate) fn coerce_number(value: Value) -> Value {
    match value {
        Value::String(ref s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Value::Null;
            }
            match parse_finite(trimmed) {
                Some(n) => n,
                None => value,
            }
        }
        Value::Bool(b) => Value::from(u8::from(b)),
        other => other,
    }
}

fn parse_finite(text: &str) -> Option<Value> {
    if let Ok(i) = text.parse::<i64>() {
        return Some(Value::from(i));
    }
    let f = text.parse::<f64>().ok().filter(|f| f.is_finite())?;
    if f.fract() == 0.0 && f.abs() < 9.0e15 {
        return Some(Value::from(f as i64));
    }
    serde_json::Number::from_f64(f).map(Value::Number)
}

/// Truthiness in the host's sense: `false`, `0`, `""` and `null` are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Display text for a raw value.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 9.0e15 => {
                format!("{}", f as i64)
            }
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(value_to_text)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// `null` or empty text: the read-only view shows a dash for these.
pub(crate) fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldType, Section};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn map(v: Value) -> ValueMap {
        v.as_object().cloned().unwrap()
    }

    fn tags_schema() -> Schema {
        Schema::new("intake", "Intake").with_fields(vec![
            Field::new(FieldType::Select, "tags", "Tags").multiple(),
            Field::new(FieldType::Select, "owner", "Owner"),
            Field::new(FieldType::File, "docs", "Documents").multiple(),
            Field::new(FieldType::File, "avatar", "Avatar"),
            Field::new(FieldType::Number, "age", "Age"),
            Field::new(FieldType::Checkbox, "agree", "Agree"),
            Field::new(FieldType::Text, "note", "Note"),
        ])
    }

    #[test]
    fn wraps_scalar_for_multiple_select() {
        let out = normalize_initial_values(&map(json!({"tags": "red"})), &tags_schema());
        assert_eq!(out["tags"], json!(["red"]));
    }

    #[test]
    fn takes_first_for_single_select() {
        let out = normalize_initial_values(&map(json!({"owner": ["u1", "u2"]})), &tags_schema());
        assert_eq!(out["owner"], json!("u1"));
    }

    #[test]
    fn empty_values_for_choices() {
        let out = normalize_initial_values(
            &map(json!({"tags": "", "owner": []})),
            &tags_schema(),
        );
        assert_eq!(out["tags"], json!([]));
        assert_eq!(out["owner"], json!(""));

        let out = normalize_initial_values(&map(json!({"tags": null})), &tags_schema());
        assert_eq!(out["tags"], json!([]));
    }

    #[test]
    fn file_shapes() {
        let stored = json!({"fileName": "a.pdf", "fileUrl": "/f/a.pdf"});
        let out = normalize_initial_values(
            &map(json!({"docs": stored, "avatar": [stored, stored]})),
            &tags_schema(),
        );
        assert_eq!(out["docs"], json!([stored]));
        assert_eq!(out["avatar"], stored);

        let out = normalize_initial_values(
            &map(json!({"docs": null, "avatar": []})),
            &tags_schema(),
        );
        assert_eq!(out["docs"], json!([]));
        assert_eq!(out["avatar"], Value::Null);
    }

    #[test]
    fn absent_and_unknown_keys_untouched() {
        let out = normalize_initial_values(&map(json!({"extra": [1, 2]})), &tags_schema());
        assert_eq!(out, map(json!({"extra": [1, 2]})));
    }

    #[test]
    fn other_types_pass_through() {
        let input = map(json!({"note": ["x"], "age": "12"}));
        assert_eq!(normalize_initial_values(&input, &tags_schema()), input);
    }

    #[test]
    fn normalization_is_idempotent() {
        let schema = tags_schema();
        let inputs = [
            json!({"tags": "red", "owner": ["u1", "u2"]}),
            json!({"tags": [], "owner": [[["deep"]]], "docs": 7, "avatar": [[]]}),
            json!({"tags": null, "owner": [], "docs": [], "avatar": null}),
            json!({"tags": 0, "owner": false, "note": null}),
        ];
        for input in inputs {
            let once = normalize_initial_values(&map(input), &schema);
            let twice = normalize_initial_values(&once, &schema);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn sections_take_precedence_over_flat_fields() {
        let schema = Schema::new("s", "S")
            .with_fields(vec![Field::new(FieldType::Select, "tags", "Tags").multiple()])
            .with_sections(vec![Section {
                id: "main".into(),
                title: "Main".into(),
                description: None,
                fields: vec![Field::new(FieldType::Select, "tags", "Tags")],
            }]);
        let out = normalize_initial_values(&map(json!({"tags": ["a", "b"]})), &schema);
        assert_eq!(out["tags"], json!("a"));
    }

    #[test]
    fn defaults_match_shape() {
        let cases = [
            (Field::new(FieldType::Checkbox, "a", "A"), json!(false)),
            (Field::new(FieldType::Toggle, "a", "A"), json!(false)),
            (Field::new(FieldType::Datepicker, "a", "A"), Value::Null),
            (Field::new(FieldType::File, "a", "A"), Value::Null),
            (Field::new(FieldType::File, "a", "A").multiple(), json!([])),
            (Field::new(FieldType::Select, "a", "A"), json!("")),
            (Field::new(FieldType::ApiReference, "a", "A").multiple(), json!([])),
            (Field::new(FieldType::FormReference, "a", "A"), json!("")),
            (Field::new(FieldType::Number, "a", "A"), json!("")),
            (Field::new(FieldType::Richtext, "a", "A"), json!("")),
        ];
        for (field, expected) in cases {
            assert_eq!(get_default_value(&field), expected, "{}", field.field_type);
        }
    }

    #[test]
    fn default_shape_survives_normalization() {
        for ty in FieldType::ALL {
            for multiple in [false, true] {
                let mut field = Field::new(ty, "f", "F");
                field.allow_multiple = multiple;
                let schema = Schema::new("s", "S").with_fields(vec![field.clone()]);
                let mut values = ValueMap::new();
                values.insert("f".into(), get_default_value(&field));
                assert_eq!(normalize_initial_values(&values, &schema), values);
            }
        }
    }

    #[test]
    fn transform_numbers() {
        let out = transform_form_values(
            &map(json!({"age": "42", "agree": "yes", "note": "hi", "zzz": "7"})),
            &tags_schema(),
        );
        assert_eq!(out["age"], json!(42));
        assert_eq!(out["agree"], json!(true));
        assert_eq!(out["note"], json!("hi"));
        assert_eq!(out["zzz"], json!("7"));
    }

    #[test]
    fn transform_is_total() {
        let schema = tags_schema();
        assert_eq!(transform_form_values(&map(json!({"age": "abc"})), &schema)["age"], json!("abc"));
        assert_eq!(transform_form_values(&map(json!({"age": ""})), &schema)["age"], Value::Null);
        assert_eq!(transform_form_values(&map(json!({"age": "1.5"})), &schema)["age"], json!(1.5));
        assert_eq!(transform_form_values(&map(json!({"age": "NaN"})), &schema)["age"], json!("NaN"));
        assert_eq!(transform_form_values(&map(json!({"age": 3})), &schema)["age"], json!(3));
        assert_eq!(transform_form_values(&map(json!({"agree": null})), &schema)["agree"], Value::Null);
        assert_eq!(transform_form_values(&map(json!({"agree": 0})), &schema)["agree"], json!(false));
    }

    #[test]
    fn number_coercion_of_blank_text_and_flags() {
        let schema = tags_schema();
        let out = transform_form_values(
            &map(json!({"age": "   ", "agree": true})),
            &schema,
        );
        assert_eq!(out["age"], Value::Null);
        assert_eq!(transform_form_values(&map(json!({"age": true})), &schema)["age"], json!(1));
        assert_eq!(transform_form_values(&map(json!({"age": false})), &schema)["age"], json!(0));
        assert_eq!(transform_form_values(&map(json!({"age": " 7 "})), &schema)["age"], json!(7));
        assert_eq!(
            transform_form_values(&map(json!({"age": ["1"]})), &schema)["age"],
            json!(["1"])
        );
    }

    #[test]
    fn initial_values_fill_defaults() {
        let out = initial_form_values(Some(&map(json!({"tags": "red"}))), &tags_schema());
        assert_eq!(out["tags"], json!(["red"]));
        assert_eq!(out["owner"], json!(""));
        assert_eq!(out["agree"], json!(false));
        assert_eq!(out["avatar"], Value::Null);
    }

    #[test]
    fn text_of_values() {
        assert_eq!(value_to_text(&json!(2.0)), "2");
        assert_eq!(value_to_text(&json!(2.5)), "2.5");
        assert_eq!(value_to_text(&json!(["a", 1])), "a,1");
    }
}
