//! Typed arguments for every operation
//!
//! Raw argument objects are decoded into one struct per operation and
//! checked before any handler runs, so a missing `contactId` is caught
//! here rather than surfacing as a malformed URL later.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::registry::OperationKind;
use crate::{Error, Result};

/// Decoded arguments that can check their own required fields
trait Arguments: DeserializeOwned {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Fail with `MissingArgument` when a required string is absent or blank
fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::MissingArgument(field.to_string()));
    }
    Ok(())
}

fn default_limit() -> u32 {
    20
}

fn default_history_limit() -> u32 {
    50
}

/// Accept any JSON number for a limit. Zero, negatives and `null` fall back
/// to `default`; fractions are truncated.
fn positive_or<'de, D>(deserializer: D, default: u32) -> std::result::Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<f64>::deserialize(deserializer)? {
        Some(n) if n >= 1.0 => n.min(f64::from(u32::MAX)) as u32,
        _ => default,
    })
}

fn limit<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    positive_or(deserializer, default_limit())
}

fn history_limit<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    positive_or(deserializer, default_history_limit())
}

fn default_status() -> String {
    "open".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchContactsArgs {
    pub query: Option<String>,
    #[serde(default = "default_limit", deserialize_with = "limit")]
    pub limit: u32,
}

impl Arguments for SearchContactsArgs {}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactIdArgs {
    #[serde(default)]
    pub contact_id: String,
}

impl Arguments for ContactIdArgs {
    fn validate(&self) -> Result<()> {
        require("contactId", &self.contact_id)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactArgs {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    /// Any other fields, forwarded to the API as given
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Arguments for CreateContactArgs {}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteArgs {
    #[serde(default)]
    pub contact_id: String,
    #[serde(default)]
    pub body: String,
}

impl Arguments for CreateNoteArgs {
    fn validate(&self) -> Result<()> {
        require("contactId", &self.contact_id)?;
        require("body", &self.body)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskArgs {
    #[serde(default)]
    pub contact_id: String,
    #[serde(default)]
    pub title: String,
    pub body: Option<String>,
    pub due_date: Option<String>,
}

impl Arguments for CreateTaskArgs {
    fn validate(&self) -> Result<()> {
        require("contactId", &self.contact_id)?;
        require("title", &self.title)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOpportunitiesArgs {
    pub pipeline_id: Option<String>,
    pub stage_id: Option<String>,
    pub assigned_to: Option<String>,
    pub status: Option<String>,
    #[serde(default = "default_limit", deserialize_with = "limit")]
    pub limit: u32,
}

impl Arguments for SearchOpportunitiesArgs {}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityIdArgs {
    #[serde(default)]
    pub opportunity_id: String,
}

impl Arguments for OpportunityIdArgs {
    fn validate(&self) -> Result<()> {
        require("opportunityId", &self.opportunity_id)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOpportunityArgs {
    #[serde(default)]
    pub contact_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pipeline_id: String,
    #[serde(default)]
    pub pipeline_stage_id: String,
    pub monetary_value: Option<f64>,
    pub assigned_to: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    /// Any other fields, forwarded to the API as given
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Arguments for CreateOpportunityArgs {
    fn validate(&self) -> Result<()> {
        require("contactId", &self.contact_id)?;
        require("name", &self.name)?;
        require("pipelineId", &self.pipeline_id)?;
        require("pipelineStageId", &self.pipeline_stage_id)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveOpportunityStageArgs {
    #[serde(default)]
    pub opportunity_id: String,
    #[serde(default)]
    pub pipeline_stage_id: String,
}

impl Arguments for MoveOpportunityStageArgs {
    fn validate(&self) -> Result<()> {
        require("opportunityId", &self.opportunity_id)?;
        require("pipelineStageId", &self.pipeline_stage_id)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignOpportunityArgs {
    #[serde(default)]
    pub opportunity_id: String,
    #[serde(default)]
    pub assigned_to: String,
}

impl Arguments for AssignOpportunityArgs {
    fn validate(&self) -> Result<()> {
        require("opportunityId", &self.opportunity_id)?;
        require("assignedTo", &self.assigned_to)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOpportunityStatusArgs {
    #[serde(default)]
    pub opportunity_id: String,
    #[serde(default)]
    pub status: String,
}

impl Arguments for UpdateOpportunityStatusArgs {
    fn validate(&self) -> Result<()> {
        require("opportunityId", &self.opportunity_id)?;
        require("status", &self.status)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAppointmentsArgs {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub contact_id: Option<String>,
    pub calendar_id: Option<String>,
    #[serde(default = "default_limit", deserialize_with = "limit")]
    pub limit: u32,
}

impl Arguments for ListAppointmentsArgs {}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendSmsArgs {
    #[serde(default)]
    pub contact_id: String,
    #[serde(default)]
    pub message: String,
}

impl Arguments for SendSmsArgs {
    fn validate(&self) -> Result<()> {
        require("contactId", &self.contact_id)?;
        require("message", &self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailArgs {
    #[serde(default)]
    pub contact_id: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

impl Arguments for SendEmailArgs {
    fn validate(&self) -> Result<()> {
        require("contactId", &self.contact_id)?;
        require("subject", &self.subject)?;
        require("message", &self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationHistoryArgs {
    #[serde(default)]
    pub contact_id: String,
    #[serde(default = "default_history_limit", deserialize_with = "history_limit")]
    pub limit: u32,
}

impl Arguments for ConversationHistoryArgs {
    fn validate(&self) -> Result<()> {
        require("contactId", &self.contact_id)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStagesArgs {
    #[serde(default)]
    pub pipeline_id: String,
}

impl Arguments for PipelineStagesArgs {
    fn validate(&self) -> Result<()> {
        require("pipelineId", &self.pipeline_id)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineInfoArgs {
    pub pipeline_id: Option<String>,
}

impl Arguments for PipelineInfoArgs {}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NoArgs {}

impl Arguments for NoArgs {}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldIdArgs {
    #[serde(default)]
    pub custom_field_id: String,
}

impl Arguments for CustomFieldIdArgs {
    fn validate(&self) -> Result<()> {
        require("customFieldId", &self.custom_field_id)
    }
}

/// Data type of a custom field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CustomFieldType {
    #[default]
    Text,
    Textarea,
    Number,
    Email,
    Phone,
    Date,
    Datetime,
    Time,
    Dropdown,
    Radio,
    Checkbox,
    Url,
    Currency,
}

impl CustomFieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomFieldType::Text => "TEXT",
            CustomFieldType::Textarea => "TEXTAREA",
            CustomFieldType::Number => "NUMBER",
            CustomFieldType::Email => "EMAIL",
            CustomFieldType::Phone => "PHONE",
            CustomFieldType::Date => "DATE",
            CustomFieldType::Datetime => "DATETIME",
            CustomFieldType::Time => "TIME",
            CustomFieldType::Dropdown => "DROPDOWN",
            CustomFieldType::Radio => "RADIO",
            CustomFieldType::Checkbox => "CHECKBOX",
            CustomFieldType::Url => "URL",
            CustomFieldType::Currency => "CURRENCY",
        }
    }

    /// Whether the API takes a list of options for this type
    pub fn accepts_options(&self) -> bool {
        matches!(
            self,
            CustomFieldType::Dropdown | CustomFieldType::Radio | CustomFieldType::Checkbox
        )
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomFieldArgs {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub field_type: CustomFieldType,
    #[serde(default)]
    pub is_required: bool,
    pub default_value: Option<String>,
    pub placeholder: Option<String>,
    pub options: Option<Vec<String>>,
}

impl Arguments for CreateCustomFieldArgs {
    fn validate(&self) -> Result<()> {
        require("name", &self.name)
    }
}

/// A parsed, validated invocation
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    SearchContacts(SearchContactsArgs),
    GetContact(ContactIdArgs),
    CreateContact(CreateContactArgs),
    CreateNote(CreateNoteArgs),
    GetContactNotes(ContactIdArgs),
    CreateTask(CreateTaskArgs),
    SearchOpportunities(SearchOpportunitiesArgs),
    GetOpportunity(OpportunityIdArgs),
    CreateOpportunity(CreateOpportunityArgs),
    MoveOpportunityStage(MoveOpportunityStageArgs),
    AssignOpportunity(AssignOpportunityArgs),
    UpdateOpportunityStatus(UpdateOpportunityStatusArgs),
    ListCalendarAppointments(ListAppointmentsArgs),
    SendSms(SendSmsArgs),
    SendEmail(SendEmailArgs),
    GetConversationHistory(ConversationHistoryArgs),
    GetPipelineStages(PipelineStagesArgs),
    GetPipelineInfo(PipelineInfoArgs),
    ListCustomFields,
    GetCustomField(CustomFieldIdArgs),
    CreateCustomField(CreateCustomFieldArgs),
}

impl Operation {
    /// Decode and validate arguments for the named operation.
    ///
    /// An unknown name is rejected before the arguments are looked at.
    /// `null` arguments are treated as an empty object.
    pub fn parse(name: &str, arguments: Value) -> Result<Self> {
        let kind = OperationKind::from_name(name)
            .ok_or_else(|| Error::UnknownOperation(name.to_string()))?;

        let arguments = match arguments {
            Value::Null => Value::Object(Map::new()),
            Value::Object(_) => arguments,
            other => {
                return Err(Error::InvalidArguments(format!(
                    "arguments must be an object, got {}",
                    json_type(&other)
                )));
            }
        };

        let operation = match kind {
            OperationKind::SearchContacts => Operation::SearchContacts(decode(arguments)?),
            OperationKind::GetContact => Operation::GetContact(decode(arguments)?),
            OperationKind::CreateContact => Operation::CreateContact(decode(arguments)?),
            OperationKind::CreateNote => Operation::CreateNote(decode(arguments)?),
            OperationKind::GetContactNotes => Operation::GetContactNotes(decode(arguments)?),
            OperationKind::CreateTask => Operation::CreateTask(decode(arguments)?),
            OperationKind::SearchOpportunities => {
                Operation::SearchOpportunities(decode(arguments)?)
            }
            OperationKind::GetOpportunity => Operation::GetOpportunity(decode(arguments)?),
            OperationKind::CreateOpportunity => Operation::CreateOpportunity(decode(arguments)?),
            OperationKind::MoveOpportunityStage => {
                Operation::MoveOpportunityStage(decode(arguments)?)
            }
            OperationKind::AssignOpportunity => Operation::AssignOpportunity(decode(arguments)?),
            OperationKind::UpdateOpportunityStatus => {
                Operation::UpdateOpportunityStatus(decode(arguments)?)
            }
            OperationKind::ListCalendarAppointments => {
                Operation::ListCalendarAppointments(decode(arguments)?)
            }
            OperationKind::SendSms => Operation::SendSms(decode(arguments)?),
            OperationKind::SendEmail => Operation::SendEmail(decode(arguments)?),
            OperationKind::GetConversationHistory => {
                Operation::GetConversationHistory(decode(arguments)?)
            }
            OperationKind::GetPipelineStages => Operation::GetPipelineStages(decode(arguments)?),
            OperationKind::GetPipelineInfo => Operation::GetPipelineInfo(decode(arguments)?),
            OperationKind::ListCustomFields => {
                decode::<NoArgs>(arguments)?;
                Operation::ListCustomFields
            }
            OperationKind::GetCustomField => Operation::GetCustomField(decode(arguments)?),
            OperationKind::CreateCustomField => Operation::CreateCustomField(decode(arguments)?),
        };

        Ok(operation)
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::SearchContacts(_) => OperationKind::SearchContacts,
            Operation::GetContact(_) => OperationKind::GetContact,
            Operation::CreateContact(_) => OperationKind::CreateContact,
            Operation::CreateNote(_) => OperationKind::CreateNote,
            Operation::GetContactNotes(_) => OperationKind::GetContactNotes,
            Operation::CreateTask(_) => OperationKind::CreateTask,
            Operation::SearchOpportunities(_) => OperationKind::SearchOpportunities,
            Operation::GetOpportunity(_) => OperationKind::GetOpportunity,
            Operation::CreateOpportunity(_) => OperationKind::CreateOpportunity,
            Operation::MoveOpportunityStage(_) => OperationKind::MoveOpportunityStage,
            Operation::AssignOpportunity(_) => OperationKind::AssignOpportunity,
            Operation::UpdateOpportunityStatus(_) => OperationKind::UpdateOpportunityStatus,
            Operation::ListCalendarAppointments(_) => OperationKind::ListCalendarAppointments,
            Operation::SendSms(_) => OperationKind::SendSms,
            Operation::SendEmail(_) => OperationKind::SendEmail,
            Operation::GetConversationHistory(_) => OperationKind::GetConversationHistory,
            Operation::GetPipelineStages(_) => OperationKind::GetPipelineStages,
            Operation::GetPipelineInfo(_) => OperationKind::GetPipelineInfo,
            Operation::ListCustomFields => OperationKind::ListCustomFields,
            Operation::GetCustomField(_) => OperationKind::GetCustomField,
            Operation::CreateCustomField(_) => OperationKind::CreateCustomField,
        }
    }
}

fn decode<T: Arguments>(arguments: Value) -> Result<T> {
    let args: T =
        serde_json::from_value(arguments).map_err(|e| Error::InvalidArguments(e.to_string()))?;
    args.validate()?;
    Ok(args)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn applies_documented_defaults() {
        let op = Operation::parse("search_contacts", json!({})).unwrap();
        assert_eq!(
            op,
            Operation::SearchContacts(SearchContactsArgs {
                query: None,
                limit: 20
            })
        );

        let op = Operation::parse("get_conversation_history", json!({"contactId": "c1"})).unwrap();
        match op {
            Operation::GetConversationHistory(args) => assert_eq!(args.limit, 50),
            other => panic!("unexpected operation: {:?}", other),
        }
    }

    #[rstest]
    #[case("search_contacts", json!({"limit": 10}), 10)]
    #[case("search_contacts", json!({"limit": 10.0}), 10)]
    #[case("search_contacts", json!({"limit": 7.9}), 7)]
    #[case("search_contacts", json!({"limit": 0}), 20)]
    #[case("search_contacts", json!({"limit": -3}), 20)]
    #[case("search_contacts", json!({"limit": null}), 20)]
    #[case("search_opportunities", json!({"limit": 0}), 20)]
    #[case("list_calendar_appointments", json!({"limit": 5.0}), 5)]
    #[case("get_conversation_history", json!({"contactId": "c1", "limit": 0}), 50)]
    #[case("get_conversation_history", json!({"contactId": "c1", "limit": 25.0}), 25)]
    fn limit_accepts_any_number(#[case] name: &str, #[case] args: Value, #[case] expected: u32) {
        let limit = match Operation::parse(name, args).unwrap() {
            Operation::SearchContacts(args) => args.limit,
            Operation::SearchOpportunities(args) => args.limit,
            Operation::ListCalendarAppointments(args) => args.limit,
            Operation::GetConversationHistory(args) => args.limit,
            other => panic!("unexpected operation: {:?}", other),
        };
        assert_eq!(limit, expected);
    }

    #[test]
    fn create_contact_keeps_unlisted_fields() {
        let op = Operation::parse(
            "create_contact",
            json!({"firstName": "Ada", "tags": ["vip"], "source": "web"}),
        )
        .unwrap();
        match op {
            Operation::CreateContact(args) => {
                assert_eq!(args.first_name.as_deref(), Some("Ada"));
                assert_eq!(args.extra.len(), 2);
                assert_eq!(args.extra["tags"], json!(["vip"]));
                assert_eq!(args.extra["source"], "web");
            }
            other => panic!("unexpected operation: {:?}", other),
        }
    }

    #[test]
    fn create_opportunity_defaults_status_to_open() {
        let op = Operation::parse(
            "create_opportunity",
            json!({
                "contactId": "c1",
                "name": "Deal",
                "pipelineId": "p1",
                "pipelineStageId": "s1"
            }),
        )
        .unwrap();
        match op {
            Operation::CreateOpportunity(args) => {
                assert_eq!(args.status, "open");
                assert_eq!(args.monetary_value, None);
            }
            other => panic!("unexpected operation: {:?}", other),
        }
    }

    #[rstest]
    #[case("create_note", json!({"body": "hi"}), "contactId")]
    #[case("create_note", json!({"contactId": "c1"}), "body")]
    #[case("create_note", json!({"contactId": "  ", "body": "hi"}), "contactId")]
    #[case("create_task", json!({"contactId": "c1"}), "title")]
    #[case("get_contact", json!({}), "contactId")]
    #[case("send_email", json!({"contactId": "c1", "message": "m"}), "subject")]
    #[case("move_opportunity_stage", json!({"opportunityId": "o1"}), "pipelineStageId")]
    #[case("create_opportunity", json!({"contactId": "c1", "name": "n", "pipelineId": "p"}), "pipelineStageId")]
    #[case("get_custom_field", json!({"customFieldId": ""}), "customFieldId")]
    #[case("create_custom_field", json!({"fieldType": "TEXT"}), "name")]
    fn rejects_missing_required_field(
        #[case] name: &str,
        #[case] args: Value,
        #[case] field: &str,
    ) {
        match Operation::parse(name, args) {
            Err(Error::MissingArgument(missing)) => assert_eq!(missing, field),
            other => panic!("expected missing {}, got {:?}", field, other),
        }
    }

    #[test]
    fn unknown_name_wins_over_bad_arguments() {
        let err = Operation::parse("delete_everything", json!("not an object")).unwrap_err();
        assert!(matches!(err, Error::UnknownOperation(name) if name == "delete_everything"));
    }

    #[test]
    fn null_arguments_are_empty_object() {
        let op = Operation::parse("list_custom_fields", Value::Null).unwrap();
        assert_eq!(op, Operation::ListCustomFields);

        let err = Operation::parse("get_contact", Value::Null).unwrap_err();
        assert!(matches!(err, Error::MissingArgument(_)));
    }

    #[test]
    fn non_object_arguments_are_invalid() {
        let err = Operation::parse("search_contacts", json!([1, 2])).unwrap_err();
        assert!(matches!(err, Error::InvalidArguments(msg) if msg.contains("array")));
    }

    #[test]
    fn wrong_value_type_is_invalid() {
        let err = Operation::parse("search_contacts", json!({"limit": "many"})).unwrap_err();
        assert!(matches!(err, Error::InvalidArguments(_)));
    }

    #[test]
    fn custom_field_type_defaults_to_text() {
        let op = Operation::parse("create_custom_field", json!({"name": "Shoe size"})).unwrap();
        match op {
            Operation::CreateCustomField(args) => {
                assert_eq!(args.field_type, CustomFieldType::Text);
                assert!(!args.is_required);
            }
            other => panic!("unexpected operation: {:?}", other),
        }
    }

    #[test]
    fn unsupported_custom_field_type_is_invalid() {
        let err = Operation::parse(
            "create_custom_field",
            json!({"name": "x", "fieldType": "HOLOGRAM"}),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArguments(_)));
    }

    #[test]
    fn custom_field_type_names_match_registry_enum() {
        use crate::registry::CUSTOM_FIELD_TYPES;
        for name in CUSTOM_FIELD_TYPES {
            let parsed: CustomFieldType = serde_json::from_value(json!(name)).unwrap();
            assert_eq!(parsed.as_str(), *name);
        }
    }

    #[test]
    fn only_choice_types_accept_options() {
        assert!(CustomFieldType::Dropdown.accepts_options());
        assert!(CustomFieldType::Radio.accepts_options());
        assert!(CustomFieldType::Checkbox.accepts_options());
        assert!(!CustomFieldType::Text.accepts_options());
        assert!(!CustomFieldType::Number.accepts_options());
    }

    #[test]
    fn every_kind_parses_to_itself() {
        for kind in OperationKind::ALL {
            let result = Operation::parse(kind.as_str(), json!({}));
            match result {
                Ok(op) => assert_eq!(op.kind(), kind),
                Err(Error::MissingArgument(_)) => {}
                Err(other) => panic!("{} failed unexpectedly: {:?}", kind, other),
            }
        }
    }
}
