//! Response envelope adapters
//!
//! The CRM API wraps payloads inconsistently: `{"contacts": [...]}` on one
//! endpoint, a bare array on another, `{"customField": {...}}` or a bare
//! object on a third. Each function below knows the keys its endpoint may
//! use and tries them in a fixed order, falling back to an empty collection
//! (or the raw body for single records).

use serde_json::Value;

/// First array found under `keys`, else the body itself if it is an array
fn collection(body: &Value, keys: &[&str]) -> Vec<Value> {
    keys.iter()
        .find_map(|key| body.get(*key).and_then(Value::as_array))
        .or_else(|| body.as_array())
        .cloned()
        .unwrap_or_default()
}

pub fn contacts(body: &Value) -> Vec<Value> {
    collection(body, &["contacts"])
}

pub fn notes(body: &Value) -> Vec<Value> {
    collection(body, &["notes"])
}

pub fn opportunities(body: &Value) -> Vec<Value> {
    collection(body, &["opportunities"])
}

/// Calendar endpoints answer with `events`, older ones with `appointments`
pub fn appointments(body: &Value) -> Vec<Value> {
    collection(body, &["events", "appointments"])
}

pub fn conversations(body: &Value) -> Vec<Value> {
    collection(body, &["conversations"])
}

/// Messages may be nested one level deeper: `{"messages": {"messages": [...]}}`
pub fn messages(body: &Value) -> Vec<Value> {
    if let Some(list) = body.get("messages").and_then(Value::as_array) {
        return list.clone();
    }
    if let Some(list) = body
        .get("messages")
        .and_then(|m| m.get("messages"))
        .and_then(Value::as_array)
    {
        return list.clone();
    }
    collection(body, &[])
}

pub fn pipelines(body: &Value) -> Vec<Value> {
    collection(body, &["pipelines"])
}

/// Stages of a single pipeline record
pub fn stages(pipeline: &Value) -> Vec<Value> {
    pipeline
        .get("stages")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

pub fn custom_fields(body: &Value) -> Vec<Value> {
    collection(body, &["customFields"])
}

/// Single custom field: `customField` wrapper, else the body itself
pub fn custom_field(body: &Value) -> Value {
    body.get("customField")
        .filter(|v| v.is_object())
        .cloned()
        .unwrap_or_else(|| body.clone())
}

/// ID of a created opportunity: `opportunity.id`, else top-level `id`
pub fn opportunity_id(body: &Value) -> Option<String> {
    nested_id(body, "opportunity")
}

/// ID of a created custom field: `customField.id`, else top-level `id`
pub fn custom_field_id(body: &Value) -> Option<String> {
    nested_id(body, "customField")
}

fn nested_id(body: &Value, wrapper: &str) -> Option<String> {
    body.get(wrapper)
        .and_then(|w| w.get("id"))
        .or_else(|| body.get("id"))
        .and_then(id_string)
}

/// Top-level `id` of a record
pub fn id_of(record: &Value) -> Option<String> {
    record.get("id").and_then(id_string)
}

/// IDs are strings on this API, but tolerate numbers
fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First element whose `field` equals `value` exactly
pub fn find_by_field<'a>(items: &'a [Value], field: &str, value: &str) -> Option<&'a Value> {
    items
        .iter()
        .find(|item| item.get(field).and_then(id_string).as_deref() == Some(value))
}

/// First element whose `id` equals `id` exactly
pub fn find_by_id<'a>(items: &'a [Value], id: &str) -> Option<&'a Value> {
    find_by_field(items, "id", id)
}

/// The conversation belonging to `contact_id`. Results that carry no
/// `contactId` at all were already filtered by the search, so the first one
/// is taken.
pub fn conversation_for<'a>(conversations: &'a [Value], contact_id: &str) -> Option<&'a Value> {
    find_by_field(conversations, "contactId", contact_id).or_else(|| {
        if conversations.iter().any(|c| c.get("contactId").is_some()) {
            None
        } else {
            conversations.first()
        }
    })
}
