//! Structured outcome of a successful operation
//!
//! Handlers return a [`Report`] holding the decoded response (and whatever
//! was extracted from it). Turning it into display text is left to
//! [`Report::render`](crate::render).

use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    Contacts {
        contacts: Vec<Value>,
        raw: Value,
    },
    Contact {
        raw: Value,
    },
    ContactCreated {
        raw: Value,
    },
    NoteCreated {
        raw: Value,
    },
    Notes {
        notes: Vec<Value>,
        raw: Value,
    },
    TaskCreated {
        raw: Value,
    },
    Opportunities {
        opportunities: Vec<Value>,
        raw: Value,
    },
    Opportunity {
        raw: Value,
    },
    OpportunityCreated {
        name: String,
        monetary_value: Option<f64>,
        id: Option<String>,
        raw: Value,
    },
    StageMoved {
        opportunity_id: String,
        pipeline_stage_id: String,
        raw: Value,
    },
    OpportunityAssigned {
        opportunity_id: String,
        assigned_to: String,
        raw: Value,
    },
    StatusUpdated {
        opportunity_id: String,
        status: String,
        raw: Value,
    },
    Appointments {
        appointments: Vec<Value>,
        raw: Value,
    },
    SmsSent {
        contact_id: String,
        message: String,
        raw: Value,
    },
    EmailSent {
        contact_id: String,
        subject: String,
        message: String,
        raw: Value,
    },
    ConversationHistory {
        contact_id: String,
        conversation_id: String,
        messages: Vec<Value>,
        raw: Value,
    },
    /// Stages of the one pipeline matching the requested ID
    PipelineStages {
        pipeline: Value,
        stages: Vec<Value>,
    },
    Pipeline {
        pipeline: Value,
    },
    Pipelines {
        pipelines: Vec<Value>,
        raw: Value,
    },
    CustomFields {
        fields: Vec<Value>,
        raw: Value,
    },
    CustomField {
        field: Value,
        location_id: String,
        raw: Value,
    },
    /// `request` is the body that was sent, after option filtering
    CustomFieldCreated {
        request: Value,
        id: Option<String>,
        location_id: String,
        raw: Value,
    },
}

impl Report {
    /// The JSON that is appended verbatim to the rendered summary
    pub fn payload(&self) -> &Value {
        match self {
            Report::PipelineStages { pipeline, .. } | Report::Pipeline { pipeline } => pipeline,
            Report::Contacts { raw, .. }
            | Report::Contact { raw }
            | Report::ContactCreated { raw }
            | Report::NoteCreated { raw }
            | Report::Notes { raw, .. }
            | Report::TaskCreated { raw }
            | Report::Opportunities { raw, .. }
            | Report::Opportunity { raw }
            | Report::OpportunityCreated { raw, .. }
            | Report::StageMoved { raw, .. }
            | Report::OpportunityAssigned { raw, .. }
            | Report::StatusUpdated { raw, .. }
            | Report::Appointments { raw, .. }
            | Report::SmsSent { raw, .. }
            | Report::EmailSent { raw, .. }
            | Report::ConversationHistory { raw, .. }
            | Report::Pipelines { raw, .. }
            | Report::CustomFields { raw, .. }
            | Report::CustomField { raw, .. }
            | Report::CustomFieldCreated { raw, .. } => raw,
        }
    }
}
