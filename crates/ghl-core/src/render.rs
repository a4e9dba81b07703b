//! Presentation of reports as display text
//!
//! Each rendering is a short human summary followed by the full JSON
//! payload, so the caller always sees everything the API returned.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::report::Report;

const EMAIL_PREVIEW_CHARS: usize = 100;

impl Report {
    /// Render the summary plus the pretty-printed payload
    pub fn render(&self) -> String {
        match self {
            Report::Contacts { contacts, raw } => format!(
                "Found {} contacts:\n{}\n\nFull data:\n{}",
                contacts.len(),
                join(contacts, "\n\n", contact_line),
                pretty(raw)
            ),
            Report::Contact { raw } => format!("Contact details:\n{}", pretty(raw)),
            Report::ContactCreated { raw } => {
                format!("Contact created successfully.\n{}", pretty(raw))
            }
            Report::NoteCreated { raw } => format!("Note created successfully.\n{}", pretty(raw)),
            Report::Notes { notes, raw } => {
                format!("Retrieved {} notes:\n{}", notes.len(), pretty(raw))
            }
            Report::TaskCreated { raw } => format!("Task created successfully.\n{}", pretty(raw)),
            Report::Opportunities { opportunities, raw } => format!(
                "Found {} opportunities:\n\n{}\nFull details:\n{}",
                opportunities.len(),
                join(opportunities, "\n", opportunity_block),
                pretty(raw)
            ),
            Report::Opportunity { raw } => format!("Opportunity details:\n{}", pretty(raw)),
            Report::OpportunityCreated {
                name,
                monetary_value,
                id,
                raw,
            } => format!(
                "Opportunity created successfully.\nName: {}\nValue: ${}\nID: {}\n\n{}",
                name,
                monetary_value.unwrap_or(0.0),
                id.as_deref().unwrap_or("unknown"),
                pretty(raw)
            ),
            Report::StageMoved {
                opportunity_id,
                pipeline_stage_id,
                raw,
            } => format!(
                "Opportunity moved to new stage.\nID: {}\nNew stage: {}\n\n{}",
                opportunity_id,
                pipeline_stage_id,
                pretty(raw)
            ),
            Report::OpportunityAssigned {
                opportunity_id,
                assigned_to,
                raw,
            } => format!(
                "Opportunity assigned.\nID: {}\nAssigned to: {}\n\n{}",
                opportunity_id,
                assigned_to,
                pretty(raw)
            ),
            Report::StatusUpdated {
                opportunity_id,
                status,
                raw,
            } => format!(
                "Opportunity status updated.\nID: {}\nNew status: {}\n\n{}",
                opportunity_id,
                status,
                pretty(raw)
            ),
            Report::Appointments { appointments, raw } => format!(
                "Found {} appointments:\n\n{}\nFull details:\n{}",
                appointments.len(),
                join(appointments, "\n", appointment_block),
                pretty(raw)
            ),
            Report::SmsSent {
                contact_id,
                message,
                raw,
            } => format!(
                "SMS sent.\nMessage: \"{}\"\nTo contact: {}\n\n{}",
                message,
                contact_id,
                pretty(raw)
            ),
            Report::EmailSent {
                contact_id,
                subject,
                message,
                raw,
            } => format!(
                "Email sent.\nSubject: \"{}\"\nMessage: \"{}\"\nTo contact: {}\n\n{}",
                subject,
                preview(message, EMAIL_PREVIEW_CHARS),
                contact_id,
                pretty(raw)
            ),
            Report::ConversationHistory {
                contact_id,
                conversation_id,
                messages,
                raw,
            } => format!(
                "Found {} messages in conversation {} for contact {}:\n\n{}\nFull details:\n{}",
                messages.len(),
                conversation_id,
                contact_id,
                join(messages, "\n", message_block),
                pretty(raw)
            ),
            Report::PipelineStages { pipeline, stages } => {
                let blocks: Vec<String> = stages
                    .iter()
                    .enumerate()
                    .map(|(i, stage)| {
                        format!("{}. {}\nID: {}\n", i + 1, text(stage, "name"), text(stage, "id"))
                    })
                    .collect();
                format!(
                    "Pipeline \"{}\" has {} stages:\n\n{}\nFull pipeline details:\n{}",
                    text(pipeline, "name"),
                    stages.len(),
                    blocks.join("\n"),
                    pretty(pipeline)
                )
            }
            Report::Pipeline { pipeline } => format!("Pipeline information:\n{}", pretty(pipeline)),
            Report::Pipelines { pipelines, raw } => format!(
                "Found {} pipelines:\n\n{}\nFull details:\n{}",
                pipelines.len(),
                join(pipelines, "\n", pipeline_block),
                pretty(raw)
            ),
            Report::CustomFields { fields, raw } => format!(
                "Found {} custom fields:\n\n{}\nFull response:\n{}",
                fields.len(),
                join(fields, "\n", custom_field_block),
                pretty(raw)
            ),
            Report::CustomField {
                field,
                location_id,
                raw,
            } => format!(
                "Custom field details:\nName: {}\nField ID: {}\nType: {}\nRequired: {}\nLocation ID: {}\n{}\nFull response:\n{}",
                text_or(field, "name", "Unnamed"),
                text(field, "id"),
                field_type(field),
                yes_no(field.get("isRequired").and_then(Value::as_bool).unwrap_or(false)),
                location_id,
                optional_field_lines(field),
                pretty(raw)
            ),
            Report::CustomFieldCreated {
                request,
                id,
                location_id,
                raw,
            } => format!(
                "Custom field created successfully.\n\nName: {}\nType: {}\nRequired: {}\nField ID: {}\nLocation ID: {}\n{}\nFull response:\n{}",
                text(request, "name"),
                text(request, "fieldType"),
                yes_no(request.get("isRequired").and_then(Value::as_bool).unwrap_or(false)),
                id.as_deref().unwrap_or("unknown"),
                location_id,
                optional_field_lines(request),
                pretty(raw)
            ),
        }
    }
}

fn contact_line(contact: &Value) -> String {
    format!(
        "{} {} ({})\nID: {}",
        text(contact, "firstName"),
        text(contact, "lastName"),
        text_or(contact, "email", "No email"),
        text(contact, "id")
    )
}

fn opportunity_block(opp: &Value) -> String {
    format!(
        "{}\nValue: ${}\nStatus: {}\nContact: {}\nID: {}\n",
        text(opp, "name"),
        text_or(opp, "monetaryValue", "0"),
        text(opp, "status"),
        text(opp, "contactId"),
        text(opp, "id")
    )
}

fn appointment_block(apt: &Value) -> String {
    format!(
        "{}\nContact: {}\nStart: {}\nStatus: {}\nID: {}\n",
        text_or(apt, "title", "Untitled"),
        text(apt, "contactId"),
        apt.get("startTime")
            .map(timestamp)
            .unwrap_or_else(|| "No time".to_string()),
        text(apt, "appointmentStatus"),
        text(apt, "id")
    )
}

fn message_block(msg: &Value) -> String {
    let content = scalar(msg, "body")
        .or_else(|| scalar(msg, "message"))
        .unwrap_or_else(|| "No content".to_string());
    format!(
        "[{}] {}: {}\n{}\n",
        text_or(msg, "direction", "unknown"),
        text(msg, "messageType"),
        content,
        msg.get("dateAdded")
            .map(timestamp)
            .unwrap_or_else(|| "No time".to_string())
    )
}

fn pipeline_block(pipeline: &Value) -> String {
    let stage_count = pipeline
        .get("stages")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    format!(
        "{}\nID: {}\nStages: {}\n",
        text(pipeline, "name"),
        text(pipeline, "id"),
        stage_count
    )
}

fn custom_field_block(field: &Value) -> String {
    format!(
        "Name: {}\nField ID: {}\nType: {}\n{}",
        text_or(field, "name", "Unnamed"),
        text(field, "id"),
        field_type(field),
        optional_field_lines(field)
    )
}

fn field_type(field: &Value) -> String {
    scalar(field, "fieldType")
        .or_else(|| scalar(field, "type"))
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Placeholder, default value and options, each only when present
fn optional_field_lines(field: &Value) -> String {
    let mut lines = String::new();
    if let Some(placeholder) = scalar(field, "placeholder") {
        lines.push_str(&format!("Placeholder: {}\n", placeholder));
    }
    if let Some(default) = scalar(field, "defaultValue") {
        lines.push_str(&format!("Default: {}\n", default));
    }
    if let Some(options) = field.get("options").and_then(Value::as_array) {
        if !options.is_empty() {
            let names: Vec<String> = options.iter().map(option_label).collect();
            lines.push_str(&format!("Options: {}\n", names.join(", ")));
        }
    }
    lines
}

fn option_label(option: &Value) -> String {
    match option {
        Value::String(s) => s.clone(),
        other => scalar(other, "label")
            .or_else(|| scalar(other, "key"))
            .unwrap_or_else(|| other.to_string()),
    }
}

fn join(items: &[Value], separator: &str, block: fn(&Value) -> String) -> String {
    items.iter().map(block).collect::<Vec<_>>().join(separator)
}

/// Non-empty string or number under `key`
fn scalar(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text(value: &Value, key: &str) -> String {
    scalar(value, key).unwrap_or_default()
}

fn text_or(value: &Value, key: &str, fallback: &str) -> String {
    scalar(value, key).unwrap_or_else(|| fallback.to_string())
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

/// RFC 3339 strings and epoch milliseconds become `YYYY-MM-DD HH:MM UTC`;
/// anything else is shown as-is.
fn timestamp(value: &Value) -> String {
    let parsed: Option<DateTime<Utc>> = match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    };
    match (parsed, value) {
        (Some(dt), _) => dt.format("%Y-%m-%d %H:%M UTC").to_string(),
        (None, Value::String(s)) => s.clone(),
        (None, other) => other.to_string(),
    }
}

/// First `max` characters, with an ellipsis when truncated
fn preview(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn contacts_summary_lists_names_and_ids() {
        let raw = json!({"contacts": [{"id": "1", "firstName": "A", "lastName": "B"}]});
        let report = Report::Contacts {
            contacts: vec![raw["contacts"][0].clone()],
            raw: raw.clone(),
        };
        let text = report.render();
        assert!(text.starts_with("Found 1 contacts:\nA B (No email)\nID: 1"));
        assert!(text.contains("Full data:\n{"));
    }

    #[test]
    fn pipeline_stages_rendering() {
        let pipeline = json!({
            "id": "p1",
            "name": "Sales",
            "stages": [{"id": "s1", "name": "Lead"}]
        });
        let report = Report::PipelineStages {
            stages: vec![json!({"id": "s1", "name": "Lead"})],
            pipeline,
        };
        insta::assert_snapshot!(report.render(), @r#"
Pipeline "Sales" has 1 stages:

1. Lead
ID: s1

Full pipeline details:
{
  "id": "p1",
  "name": "Sales",
  "stages": [
    {
      "id": "s1",
      "name": "Lead"
    }
  ]
}
"#);
    }

    #[test]
    fn custom_field_lines_skip_absent_values() {
        let field = json!({"id": "f1", "name": "Size", "fieldType": "DROPDOWN", "options": ["S", "M"]});
        let block = custom_field_block(&field);
        assert_eq!(block, "Name: Size\nField ID: f1\nType: DROPDOWN\nOptions: S, M\n");

        let bare = json!({"id": "f2", "type": "TEXT", "placeholder": ""});
        assert_eq!(custom_field_block(&bare), "Name: Unnamed\nField ID: f2\nType: TEXT\n");
    }

    #[test]
    fn object_options_use_their_label() {
        assert_eq!(option_label(&json!({"key": "s", "label": "Small"})), "Small");
        assert_eq!(option_label(&json!({"key": "m"})), "m");
        assert_eq!(option_label(&json!("L")), "L");
    }

    #[test]
    fn timestamps_are_normalised_to_utc() {
        assert_eq!(
            timestamp(&json!("2024-03-01T09:30:00+02:00")),
            "2024-03-01 07:30 UTC"
        );
        assert_eq!(timestamp(&json!(0)), "1970-01-01 00:00 UTC");
        assert_eq!(timestamp(&json!("next tuesday")), "next tuesday");
    }

    #[test]
    fn email_preview_truncates_on_char_boundary() {
        let long = "é".repeat(150);
        let shown = preview(&long, 100);
        assert_eq!(shown.chars().count(), 103);
        assert!(shown.ends_with("..."));
        assert_eq!(preview("short", 100), "short");
    }

    #[test]
    fn message_block_falls_back_between_content_keys() {
        let msg = json!({"direction": "inbound", "messageType": "TYPE_SMS", "message": "hello"});
        let block = message_block(&msg);
        assert!(block.starts_with("[inbound] TYPE_SMS: hello\n"));
        assert!(block.contains("No time"));
    }

    #[test]
    fn created_opportunity_defaults_value_to_zero() {
        let report = Report::OpportunityCreated {
            name: "Deal".into(),
            monetary_value: None,
            id: Some("o1".into()),
            raw: json!({"opportunity": {"id": "o1"}}),
        };
        let text = report.render();
        assert!(text.contains("Name: Deal\nValue: $0\nID: o1"));
    }
}
