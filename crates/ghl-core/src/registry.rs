//! Static catalog of operations
//!
//! The registry is declarative: it describes argument shapes for callers
//! but enforces nothing. Validation happens when arguments are parsed into
//! an [`Operation`](crate::Operation).
//!
//! # Operations
//!
//! ## Contacts
//! - `search_contacts`, `get_contact`, `create_contact`
//! - `create_note`, `get_contact_notes`, `create_task`
//!
//! ## Opportunities
//! - `search_opportunities`, `get_opportunity`, `create_opportunity`
//! - `move_opportunity_stage`, `assign_opportunity`, `update_opportunity_status`
//!
//! ## Calendar
//! - `list_calendar_appointments`
//!
//! ## Messaging
//! - `send_sms`, `send_email`, `get_conversation_history`
//!
//! ## Pipelines
//! - `get_pipeline_stages`, `get_pipeline_info`
//!
//! ## Custom Fields
//! - `list_custom_fields`, `get_custom_field`, `create_custom_field`

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value, json};

use crate::Error;

/// Identifies one operation. Every kind has exactly one descriptor and one
/// dispatcher branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    SearchContacts,
    GetContact,
    CreateContact,
    CreateNote,
    GetContactNotes,
    CreateTask,
    SearchOpportunities,
    GetOpportunity,
    CreateOpportunity,
    MoveOpportunityStage,
    AssignOpportunity,
    UpdateOpportunityStatus,
    ListCalendarAppointments,
    SendSms,
    SendEmail,
    GetConversationHistory,
    GetPipelineStages,
    GetPipelineInfo,
    ListCustomFields,
    GetCustomField,
    CreateCustomField,
}

impl OperationKind {
    /// All kinds, in listing order
    pub const ALL: [OperationKind; 21] = [
        OperationKind::SearchContacts,
        OperationKind::GetContact,
        OperationKind::CreateContact,
        OperationKind::CreateNote,
        OperationKind::GetContactNotes,
        OperationKind::CreateTask,
        OperationKind::SearchOpportunities,
        OperationKind::GetOpportunity,
        OperationKind::CreateOpportunity,
        OperationKind::MoveOpportunityStage,
        OperationKind::AssignOpportunity,
        OperationKind::UpdateOpportunityStatus,
        OperationKind::ListCalendarAppointments,
        OperationKind::SendSms,
        OperationKind::SendEmail,
        OperationKind::GetConversationHistory,
        OperationKind::GetPipelineStages,
        OperationKind::GetPipelineInfo,
        OperationKind::ListCustomFields,
        OperationKind::GetCustomField,
        OperationKind::CreateCustomField,
    ];

    /// Wire name of the operation
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::SearchContacts => "search_contacts",
            OperationKind::GetContact => "get_contact",
            OperationKind::CreateContact => "create_contact",
            OperationKind::CreateNote => "create_note",
            OperationKind::GetContactNotes => "get_contact_notes",
            OperationKind::CreateTask => "create_task",
            OperationKind::SearchOpportunities => "search_opportunities",
            OperationKind::GetOpportunity => "get_opportunity",
            OperationKind::CreateOpportunity => "create_opportunity",
            OperationKind::MoveOpportunityStage => "move_opportunity_stage",
            OperationKind::AssignOpportunity => "assign_opportunity",
            OperationKind::UpdateOpportunityStatus => "update_opportunity_status",
            OperationKind::ListCalendarAppointments => "list_calendar_appointments",
            OperationKind::SendSms => "send_sms",
            OperationKind::SendEmail => "send_email",
            OperationKind::GetConversationHistory => "get_conversation_history",
            OperationKind::GetPipelineStages => "get_pipeline_stages",
            OperationKind::GetPipelineInfo => "get_pipeline_info",
            OperationKind::ListCustomFields => "list_custom_fields",
            OperationKind::GetCustomField => "get_custom_field",
            OperationKind::CreateCustomField => "create_custom_field",
        }
    }

    /// Look up a kind by wire name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| Error::UnknownOperation(s.to_string()))
    }
}

/// Semantic type of an argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    Boolean,
    StringArray,
}

/// Documented default for an optional argument
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Number(i64),
    Text(&'static str),
    Flag(bool),
}

impl DefaultValue {
    fn to_json(self) -> Value {
        match self {
            DefaultValue::Number(n) => json!(n),
            DefaultValue::Text(s) => json!(s),
            DefaultValue::Flag(b) => json!(b),
        }
    }
}

/// Shape of a single argument
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSchema {
    pub name: &'static str,
    pub field_type: FieldType,
    pub description: &'static str,
    pub required: bool,
    pub default: Option<DefaultValue>,
    pub enum_values: Option<&'static [&'static str]>,
}

impl FieldSchema {
    const fn new(name: &'static str, field_type: FieldType, description: &'static str) -> Self {
        Self {
            name,
            field_type,
            description,
            required: false,
            default: None,
            enum_values: None,
        }
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    const fn default(mut self, value: DefaultValue) -> Self {
        self.default = Some(value);
        self
    }

    const fn one_of(mut self, values: &'static [&'static str]) -> Self {
        self.enum_values = Some(values);
        self
    }

    fn to_json(&self) -> Value {
        let mut prop = Map::new();
        match self.field_type {
            FieldType::String => {
                prop.insert("type".into(), json!("string"));
            }
            FieldType::Number => {
                prop.insert("type".into(), json!("number"));
            }
            FieldType::Boolean => {
                prop.insert("type".into(), json!("boolean"));
            }
            FieldType::StringArray => {
                prop.insert("type".into(), json!("array"));
                prop.insert("items".into(), json!({ "type": "string" }));
            }
        }
        prop.insert("description".into(), json!(self.description));
        if let Some(values) = self.enum_values {
            prop.insert("enum".into(), json!(values));
        }
        if let Some(default) = self.default {
            prop.insert("default".into(), default.to_json());
        }
        Value::Object(prop)
    }
}

/// Immutable description of one operation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperationDescriptor {
    pub kind: OperationKind,
    pub name: &'static str,
    pub description: &'static str,
    pub fields: &'static [FieldSchema],
}

impl OperationDescriptor {
    /// Names of the required fields, in declaration order
    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().filter(|f| f.required).map(|f| f.name)
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// JSON-Schema object describing the arguments
    pub fn input_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|f| (f.name.to_string(), f.to_json()))
            .collect();

        let mut schema = Map::new();
        schema.insert("type".into(), json!("object"));
        schema.insert("properties".into(), Value::Object(properties));

        let required: Vec<&str> = self.required_fields().collect();
        if !required.is_empty() {
            schema.insert("required".into(), json!(required));
        }
        Value::Object(schema)
    }
}

/// Custom field types accepted by the API
pub const CUSTOM_FIELD_TYPES: &[&str] = &[
    "TEXT", "TEXTAREA", "NUMBER", "EMAIL", "PHONE", "DATE", "DATETIME", "TIME", "DROPDOWN",
    "RADIO", "CHECKBOX", "URL", "CURRENCY",
];

use DefaultValue::{Flag, Number, Text};
use FieldType::{Boolean, StringArray};

const fn string(name: &'static str, description: &'static str) -> FieldSchema {
    FieldSchema::new(name, FieldType::String, description)
}

const fn number(name: &'static str, description: &'static str) -> FieldSchema {
    FieldSchema::new(name, FieldType::Number, description)
}

const CONTACT_ID: FieldSchema = string("contactId", "Contact ID").required();
const OPPORTUNITY_ID: FieldSchema = string("opportunityId", "Opportunity ID").required();

static OPERATIONS: [OperationDescriptor; 21] = [
    // Contacts
    OperationDescriptor {
        kind: OperationKind::SearchContacts,
        name: "search_contacts",
        description: "Search for contacts in Go High Level",
        fields: &[
            string("query", "Search query - name, email, phone"),
            number("limit", "Number of results (1-100)").default(Number(20)),
        ],
    },
    OperationDescriptor {
        kind: OperationKind::GetContact,
        name: "get_contact",
        description: "Get a specific contact by ID",
        fields: &[CONTACT_ID],
    },
    OperationDescriptor {
        kind: OperationKind::CreateContact,
        name: "create_contact",
        description: "Create a new contact",
        fields: &[
            string("firstName", "First name"),
            string("lastName", "Last name"),
            string("email", "Email address"),
            string("phone", "Phone number"),
            string("companyName", "Company name"),
        ],
    },
    OperationDescriptor {
        kind: OperationKind::CreateNote,
        name: "create_note",
        description: "Create a note for a contact",
        fields: &[CONTACT_ID, string("body", "Note content").required()],
    },
    OperationDescriptor {
        kind: OperationKind::GetContactNotes,
        name: "get_contact_notes",
        description: "Get all notes for a contact",
        fields: &[CONTACT_ID],
    },
    OperationDescriptor {
        kind: OperationKind::CreateTask,
        name: "create_task",
        description: "Create a task for a contact",
        fields: &[
            CONTACT_ID,
            string("title", "Task title").required(),
            string("body", "Task description"),
            string("dueDate", "Due date (ISO format)"),
        ],
    },
    // Opportunities
    OperationDescriptor {
        kind: OperationKind::SearchOpportunities,
        name: "search_opportunities",
        description: "Search for opportunities in Go High Level",
        fields: &[
            string("pipelineId", "Filter by pipeline ID"),
            string("stageId", "Filter by stage ID"),
            string("assignedTo", "Filter by assigned user ID"),
            string("status", "Filter by status (open, won, lost, abandoned)"),
            number("limit", "Number of results").default(Number(20)),
        ],
    },
    OperationDescriptor {
        kind: OperationKind::GetOpportunity,
        name: "get_opportunity",
        description: "Get a specific opportunity by ID",
        fields: &[OPPORTUNITY_ID],
    },
    OperationDescriptor {
        kind: OperationKind::CreateOpportunity,
        name: "create_opportunity",
        description: "Create a new opportunity",
        fields: &[
            CONTACT_ID,
            string("name", "Opportunity name").required(),
            string("pipelineId", "Pipeline ID").required(),
            string("pipelineStageId", "Pipeline stage ID").required(),
            number("monetaryValue", "Monetary value"),
            string("assignedTo", "User ID to assign to"),
            string("status", "Status (open, won, lost, abandoned)").default(Text("open")),
        ],
    },
    OperationDescriptor {
        kind: OperationKind::MoveOpportunityStage,
        name: "move_opportunity_stage",
        description: "Move opportunity to a different pipeline stage",
        fields: &[
            OPPORTUNITY_ID,
            string("pipelineStageId", "New pipeline stage ID").required(),
        ],
    },
    OperationDescriptor {
        kind: OperationKind::AssignOpportunity,
        name: "assign_opportunity",
        description: "Assign opportunity to a specific user",
        fields: &[
            OPPORTUNITY_ID,
            string("assignedTo", "User ID to assign to").required(),
        ],
    },
    OperationDescriptor {
        kind: OperationKind::UpdateOpportunityStatus,
        name: "update_opportunity_status",
        description: "Update opportunity status",
        fields: &[
            OPPORTUNITY_ID,
            string("status", "New status (open, won, lost, abandoned)").required(),
        ],
    },
    // Calendar
    OperationDescriptor {
        kind: OperationKind::ListCalendarAppointments,
        name: "list_calendar_appointments",
        description: "List calendar appointments",
        fields: &[
            string("startDate", "Start date (YYYY-MM-DD)"),
            string("endDate", "End date (YYYY-MM-DD)"),
            string("contactId", "Filter by contact"),
            string("calendarId", "Filter by calendar"),
            number("limit", "Number of results").default(Number(20)),
        ],
    },
    // Messaging
    OperationDescriptor {
        kind: OperationKind::SendSms,
        name: "send_sms",
        description: "Send an SMS message to a contact",
        fields: &[CONTACT_ID, string("message", "SMS content").required()],
    },
    OperationDescriptor {
        kind: OperationKind::SendEmail,
        name: "send_email",
        description: "Send an email message to a contact",
        fields: &[
            CONTACT_ID,
            string("subject", "Email subject").required(),
            string("message", "Email content").required(),
        ],
    },
    OperationDescriptor {
        kind: OperationKind::GetConversationHistory,
        name: "get_conversation_history",
        description: "Get conversation history for a contact",
        fields: &[
            CONTACT_ID,
            number("limit", "Number of messages").default(Number(50)),
        ],
    },
    // Pipelines
    OperationDescriptor {
        kind: OperationKind::GetPipelineStages,
        name: "get_pipeline_stages",
        description: "List pipeline stages for opportunities",
        fields: &[string("pipelineId", "Pipeline ID").required()],
    },
    OperationDescriptor {
        kind: OperationKind::GetPipelineInfo,
        name: "get_pipeline_info",
        description: "Get detailed pipeline information",
        fields: &[string("pipelineId", "Pipeline ID (optional)")],
    },
    // Custom Fields
    OperationDescriptor {
        kind: OperationKind::ListCustomFields,
        name: "list_custom_fields",
        description: "List all custom fields in Go High Level location",
        fields: &[],
    },
    OperationDescriptor {
        kind: OperationKind::GetCustomField,
        name: "get_custom_field",
        description: "Get a specific custom field by ID",
        fields: &[string("customFieldId", "Custom field ID").required()],
    },
    OperationDescriptor {
        kind: OperationKind::CreateCustomField,
        name: "create_custom_field",
        description: "Create a custom field in Go High Level",
        fields: &[
            string("name", "Name of the custom field").required(),
            string("fieldType", "Type of the field")
                .one_of(CUSTOM_FIELD_TYPES)
                .default(Text("TEXT")),
            FieldSchema::new("isRequired", Boolean, "Whether the field is required")
                .default(Flag(false)),
            string("defaultValue", "Default value for the field"),
            string("placeholder", "Placeholder text for the field"),
            FieldSchema::new(
                "options",
                StringArray,
                "Options for DROPDOWN, RADIO, or CHECKBOX fields",
            ),
        ],
    },
];

/// All operation descriptors, in stable order
pub fn list() -> &'static [OperationDescriptor] {
    &OPERATIONS
}

/// Find a descriptor by wire name
pub fn find(name: &str) -> Option<&'static OperationDescriptor> {
    OPERATIONS.iter().find(|d| d.name == name)
}

/// Descriptor for a kind
pub fn descriptor(kind: OperationKind) -> &'static OperationDescriptor {
    // OPERATIONS is laid out in OperationKind::ALL order
    &OPERATIONS[kind as usize]
}
