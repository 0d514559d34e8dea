use formkit_core::{
    defaults_to_json, normalize_to_json, transform_to_json, validate_schema_to_json, view_to_json,
};
use serde_json::{json, Value};

fn assert_success(json: &str) -> Value {
    let v: Value = serde_json::from_str(json).expect("valid JSON");
    assert_eq!(v["success"], true, "expected success=true, got: {json}");
    v
}

fn assert_failure(json: &str) -> Value {
    let v: Value = serde_json::from_str(json).expect("valid JSON");
    assert_eq!(v["success"], false, "expected success=false, got: {json}");
    v
}

fn contact_schema() -> String {
    json!({
        "name": "contact",
        "title": "Contact",
        "fields": [
            {"type": "text", "name": "name", "label": "Name", "required": true},
            {"type": "number", "name": "age", "label": "Age"},
            {"type": "select", "name": "tags", "label": "Tags", "allowMultiple": true,
             "options": [{"label": "VIP", "value": "vip"}, "new"]},
            {"type": "toggle", "name": "active", "label": "Active"},
            {"type": "file", "name": "cv", "label": "CV"}
        ]
    })
    .to_string()
}

// ---------------------------------------------------------------------------
// normalize_to_json
// ---------------------------------------------------------------------------

#[test]
fn ffi_normalize_repairs_shapes() {
    let values = json!({"tags": "vip", "cv": [{"fileName": "a.pdf", "fileUrl": "/a"}]});
    let result = normalize_to_json(&values.to_string(), &contact_schema());
    let v = assert_success(&result);

    assert_eq!(v["data"]["tags"], json!(["vip"]));
    assert_eq!(v["data"]["cv"]["fileName"], "a.pdf");
    // absent keys stay absent
    assert!(v["data"].get("age").is_none());
}

#[test]
fn ffi_normalize_rejects_non_object_values() {
    let result = normalize_to_json("[1, 2]", &contact_schema());
    let v = assert_failure(&result);
    assert!(v["error"].as_str().unwrap().contains("Invalid values JSON"));
}

#[test]
fn ffi_normalize_rejects_bad_schema() {
    let result = normalize_to_json("{}", r#"{"name": "x"}"#);
    let v = assert_failure(&result);
    assert!(v["error"].as_str().unwrap().contains("Invalid schema JSON"));
    assert!(v.get("data").is_none());
}

// ---------------------------------------------------------------------------
// transform_to_json
// ---------------------------------------------------------------------------

#[test]
fn ffi_transform_coerces_submit_payload() {
    let values = json!({"age": "42", "active": 1, "extra": "kept"});
    let result = transform_to_json(&values.to_string(), &contact_schema());
    let v = assert_success(&result);

    assert_eq!(v["data"]["age"], json!(42));
    assert_eq!(v["data"]["active"], json!(true));
    assert_eq!(v["data"]["extra"], "kept");
}

#[test]
fn ffi_transform_empty_number_is_null() {
    let result = transform_to_json(r#"{"age": ""}"#, &contact_schema());
    let v = assert_success(&result);
    assert_eq!(v["data"]["age"], Value::Null);
}

// ---------------------------------------------------------------------------
// defaults_to_json
// ---------------------------------------------------------------------------

#[test]
fn ffi_defaults_cover_every_field() {
    let result = defaults_to_json(&contact_schema());
    let v = assert_success(&result);
    assert_eq!(
        v["data"],
        json!({"name": "", "age": "", "tags": [], "active": false, "cv": null})
    );
}

// ---------------------------------------------------------------------------
// validate_schema_to_json
// ---------------------------------------------------------------------------

#[test]
fn ffi_validate_clean_schema() {
    let result = validate_schema_to_json(&contact_schema());
    let v = assert_success(&result);
    assert_eq!(v["data"]["errors"].as_array().unwrap().len(), 0);
    assert_eq!(v["data"]["warnings"].as_array().unwrap().len(), 0);
}

#[test]
fn ffi_validate_reports_codes() {
    let schema = json!({
        "name": "Bad Name",
        "title": "Bad",
        "fields": [
            {"type": "text", "name": "a", "label": "A"},
            {"type": "text", "name": "a", "label": "A again"}
        ]
    });
    let result = validate_schema_to_json(&schema.to_string());
    let v = assert_success(&result);

    let codes: Vec<&str> = v["data"]["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["code"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["FK-E002", "FK-E001"]);
    assert_eq!(v["data"]["errors"][1]["severity"], "error");
    assert_eq!(v["data"]["errors"][1]["path"], "fields[1]");
}

// ---------------------------------------------------------------------------
// view_to_json
// ---------------------------------------------------------------------------

#[test]
fn ffi_view_renders_display_text() {
    let values = json!({"name": "Ada", "tags": ["vip", "new"], "active": true});
    let result = view_to_json(&values.to_string(), &contact_schema(), "{}");
    let v = assert_success(&result);

    let entries = v["data"].as_array().unwrap();
    assert_eq!(entries.len(), 5);
    assert_eq!(entries[0]["display"], "Ada");
    assert_eq!(entries[1]["display"], "—");
    assert_eq!(entries[2]["display"], "VIP, new");
    assert_eq!(entries[3]["display"], "Yes");
    assert_eq!(entries[4]["type"], "file");
    assert_eq!(entries[4]["fullWidth"], false);
}

#[test]
fn ffi_view_uses_reference_options() {
    let schema = json!({
        "name": "task",
        "title": "Task",
        "fields": [{"type": "apiReference", "name": "owner", "label": "Owner",
                    "apiEndpoint": "/users", "apiLabelField": "name"}]
    });
    let options = json!({"referenceOptions": {"owner": [{"label": "Alice", "value": "u1"}]}});
    let result = view_to_json(
        r#"{"owner": "u1"}"#,
        &schema.to_string(),
        &options.to_string(),
    );
    let v = assert_success(&result);
    assert_eq!(v["data"][0]["display"], "Alice");
}

#[test]
fn ffi_view_rejects_bad_options() {
    let result = view_to_json("{}", &contact_schema(), "not json");
    let v = assert_failure(&result);
    assert!(v["error"].as_str().unwrap().contains("Invalid options JSON"));
}
