//! Operation dispatcher
//!
//! Turns `(name, arguments)` into one or two API requests and a [`Report`].
//! [`Dispatcher::invoke`] is the outer boundary: every error, from a
//! missing argument to a refused connection, becomes an
//! [`InvocationResult::Failure`] there.
//!
//! Tenant scoping: reads carry `locationId` in the query string, writes
//! carry it in the JSON body. Location-scoped paths
//! (`/locations/{locationId}/...`) carry it in the path only.

use std::sync::Arc;

use serde_json::{Map, Value, json};
use urlencoding::encode;

use crate::client::{ApiRequest, HttpTransport, Transport};
use crate::config::Config;
use crate::envelope;
use crate::operation::{
    AssignOpportunityArgs, ContactIdArgs, ConversationHistoryArgs, CreateContactArgs,
    CreateCustomFieldArgs, CreateNoteArgs, CreateOpportunityArgs, CreateTaskArgs,
    CustomFieldIdArgs, ListAppointmentsArgs, MoveOpportunityStageArgs, Operation,
    OpportunityIdArgs, PipelineInfoArgs, PipelineStagesArgs, SearchContactsArgs,
    SearchOpportunitiesArgs, SendEmailArgs, SendSmsArgs, UpdateOpportunityStatusArgs,
};
use crate::report::Report;
use crate::{Error, Result};

/// Outcome of an invocation as seen by the protocol layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationResult {
    Success { text: String },
    Failure { text: String },
}

impl InvocationResult {
    /// Failure text always starts with `Error: `
    pub fn failure(err: &Error) -> Self {
        InvocationResult::Failure {
            text: format!("Error: {}", err),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, InvocationResult::Failure { .. })
    }

    pub fn text(&self) -> &str {
        match self {
            InvocationResult::Success { text } | InvocationResult::Failure { text } => text,
        }
    }
}

/// Stateless dispatcher. Cheap to share behind an `Arc`; concurrent
/// invocations do not interact.
pub struct Dispatcher {
    location_id: String,
    transport: Arc<dyn Transport>,
}

impl Dispatcher {
    pub fn new(location_id: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            location_id: location_id.into(),
            transport,
        }
    }

    /// Dispatcher backed by the real HTTP transport
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(config.location_id.clone(), Arc::new(transport)))
    }

    /// Run an operation and render the outcome. Never fails.
    pub async fn invoke(&self, name: &str, arguments: Value) -> InvocationResult {
        match self.execute(name, arguments).await {
            Ok(report) => InvocationResult::Success {
                text: report.render(),
            },
            Err(err) => {
                tracing::warn!(operation = %name, kind = err.kind(), error = %err, "Operation failed");
                InvocationResult::failure(&err)
            }
        }
    }

    /// Run an operation and return the structured report
    pub async fn execute(&self, name: &str, arguments: Value) -> Result<Report> {
        tracing::info!(operation = %name, "Invoking operation");
        let operation = Operation::parse(name, arguments)?;
        self.run(operation).await
    }

    async fn run(&self, operation: Operation) -> Result<Report> {
        match operation {
            // Contacts
            Operation::SearchContacts(args) => self.search_contacts(args).await,
            Operation::GetContact(args) => self.get_contact(args).await,
            Operation::CreateContact(args) => self.create_contact(args).await,
            Operation::CreateNote(args) => self.create_note(args).await,
            Operation::GetContactNotes(args) => self.get_contact_notes(args).await,
            Operation::CreateTask(args) => self.create_task(args).await,

            // Opportunities
            Operation::SearchOpportunities(args) => self.search_opportunities(args).await,
            Operation::GetOpportunity(args) => self.get_opportunity(args).await,
            Operation::CreateOpportunity(args) => self.create_opportunity(args).await,
            Operation::MoveOpportunityStage(args) => self.move_opportunity_stage(args).await,
            Operation::AssignOpportunity(args) => self.assign_opportunity(args).await,
            Operation::UpdateOpportunityStatus(args) => self.update_opportunity_status(args).await,

            // Calendar
            Operation::ListCalendarAppointments(args) => self.list_appointments(args).await,

            // Messaging
            Operation::SendSms(args) => self.send_sms(args).await,
            Operation::SendEmail(args) => self.send_email(args).await,
            Operation::GetConversationHistory(args) => self.conversation_history(args).await,

            // Pipelines
            Operation::GetPipelineStages(args) => self.pipeline_stages(args).await,
            Operation::GetPipelineInfo(args) => self.pipeline_info(args).await,

            // Custom fields
            Operation::ListCustomFields => self.list_custom_fields().await,
            Operation::GetCustomField(args) => self.get_custom_field(args).await,
            Operation::CreateCustomField(args) => self.create_custom_field(args).await,
        }
    }

    // ========================================================================
    // Request plumbing
    // ========================================================================

    /// GET with the tenant as the first query pair
    fn read(&self, path: impl Into<String>) -> ApiRequest {
        ApiRequest::get(path).query("locationId", &self.location_id)
    }

    /// Add the tenant to a JSON body
    fn scoped(&self, mut body: Map<String, Value>) -> Value {
        body.insert("locationId".into(), json!(self.location_id));
        Value::Object(body)
    }

    /// Send one request; non-2xx becomes `Error::Remote` with the body untouched
    async fn call(&self, request: ApiRequest) -> Result<Value> {
        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(Error::Remote {
                status: response.status,
                body: response.body,
            });
        }
        Ok(decode_body(&response.body))
    }

    // ========================================================================
    // Contacts
    // ========================================================================

    async fn search_contacts(&self, args: SearchContactsArgs) -> Result<Report> {
        let request = self
            .read("/contacts")
            .query("limit", args.limit)
            .query_opt("query", args.query.as_deref());
        let raw = self.call(request).await?;
        Ok(Report::Contacts {
            contacts: envelope::contacts(&raw),
            raw,
        })
    }

    async fn get_contact(&self, args: ContactIdArgs) -> Result<Report> {
        let path = format!("/contacts/{}", encode(&args.contact_id));
        let raw = self.call(self.read(path)).await?;
        Ok(Report::Contact { raw })
    }

    async fn create_contact(&self, args: CreateContactArgs) -> Result<Report> {
        let mut body = args.extra;
        insert_opt(&mut body, "firstName", args.first_name);
        insert_opt(&mut body, "lastName", args.last_name);
        insert_opt(&mut body, "email", args.email);
        insert_opt(&mut body, "phone", args.phone);
        insert_opt(&mut body, "companyName", args.company_name);

        let request = ApiRequest::post("/contacts").json(self.scoped(body));
        let raw = self.call(request).await?;
        Ok(Report::ContactCreated { raw })
    }

    async fn create_note(&self, args: CreateNoteArgs) -> Result<Report> {
        let path = format!("/contacts/{}/notes", encode(&args.contact_id));
        let mut body = Map::new();
        body.insert("body".into(), json!(args.body));
        body.insert("contactId".into(), json!(args.contact_id));

        let raw = self.call(ApiRequest::post(path).json(self.scoped(body))).await?;
        Ok(Report::NoteCreated { raw })
    }

    async fn get_contact_notes(&self, args: ContactIdArgs) -> Result<Report> {
        let path = format!("/contacts/{}/notes", encode(&args.contact_id));
        let raw = self.call(self.read(path)).await?;
        Ok(Report::Notes {
            notes: envelope::notes(&raw),
            raw,
        })
    }

    async fn create_task(&self, args: CreateTaskArgs) -> Result<Report> {
        let path = format!("/contacts/{}/tasks", encode(&args.contact_id));
        let mut body = Map::new();
        body.insert("title".into(), json!(args.title));
        insert_opt(&mut body, "body", args.body);
        body.insert("contactId".into(), json!(args.contact_id));
        insert_opt(&mut body, "dueDate", args.due_date);

        let raw = self.call(ApiRequest::post(path).json(self.scoped(body))).await?;
        Ok(Report::TaskCreated { raw })
    }

    // ========================================================================
    // Opportunities
    // ========================================================================

    async fn search_opportunities(&self, args: SearchOpportunitiesArgs) -> Result<Report> {
        let request = self
            .read("/opportunities/search")
            .query("limit", args.limit)
            .query_opt("pipelineId", args.pipeline_id.as_deref())
            .query_opt("stageId", args.stage_id.as_deref())
            .query_opt("assignedTo", args.assigned_to.as_deref())
            .query_opt("status", args.status.as_deref());
        let raw = self.call(request).await?;
        Ok(Report::Opportunities {
            opportunities: envelope::opportunities(&raw),
            raw,
        })
    }

    async fn get_opportunity(&self, args: OpportunityIdArgs) -> Result<Report> {
        let path = format!("/opportunities/{}", encode(&args.opportunity_id));
        let raw = self.call(self.read(path)).await?;
        Ok(Report::Opportunity { raw })
    }

    async fn create_opportunity(&self, args: CreateOpportunityArgs) -> Result<Report> {
        let mut body = args.extra;
        body.insert("contactId".into(), json!(args.contact_id));
        body.insert("name".into(), json!(args.name));
        body.insert("pipelineId".into(), json!(args.pipeline_id));
        body.insert("pipelineStageId".into(), json!(args.pipeline_stage_id));
        if let Some(value) = args.monetary_value {
            body.insert("monetaryValue".into(), json!(value));
        }
        insert_opt(&mut body, "assignedTo", args.assigned_to);
        body.insert("status".into(), json!(args.status));

        let request = ApiRequest::post("/opportunities").json(self.scoped(body));
        let raw = self.call(request).await?;
        Ok(Report::OpportunityCreated {
            name: args.name,
            monetary_value: args.monetary_value,
            id: envelope::opportunity_id(&raw),
            raw,
        })
    }

    async fn move_opportunity_stage(&self, args: MoveOpportunityStageArgs) -> Result<Report> {
        let path = format!("/opportunities/{}", encode(&args.opportunity_id));
        let mut body = Map::new();
        body.insert("pipelineStageId".into(), json!(args.pipeline_stage_id));

        let raw = self.call(ApiRequest::put(path).json(self.scoped(body))).await?;
        Ok(Report::StageMoved {
            opportunity_id: args.opportunity_id,
            pipeline_stage_id: args.pipeline_stage_id,
            raw,
        })
    }

    async fn assign_opportunity(&self, args: AssignOpportunityArgs) -> Result<Report> {
        let path = format!("/opportunities/{}", encode(&args.opportunity_id));
        let mut body = Map::new();
        body.insert("assignedTo".into(), json!(args.assigned_to));

        let raw = self.call(ApiRequest::put(path).json(self.scoped(body))).await?;
        Ok(Report::OpportunityAssigned {
            opportunity_id: args.opportunity_id,
            assigned_to: args.assigned_to,
            raw,
        })
    }

    async fn update_opportunity_status(&self, args: UpdateOpportunityStatusArgs) -> Result<Report> {
        let path = format!("/opportunities/{}/status", encode(&args.opportunity_id));
        let mut body = Map::new();
        body.insert("status".into(), json!(args.status));

        let raw = self.call(ApiRequest::put(path).json(self.scoped(body))).await?;
        Ok(Report::StatusUpdated {
            opportunity_id: args.opportunity_id,
            status: args.status,
            raw,
        })
    }

    // ========================================================================
    // Calendar
    // ========================================================================

    async fn list_appointments(&self, args: ListAppointmentsArgs) -> Result<Report> {
        let request = self
            .read("/calendars/events/appointments")
            .query("limit", args.limit)
            .query_opt("startDate", args.start_date.as_deref())
            .query_opt("endDate", args.end_date.as_deref())
            .query_opt("contactId", args.contact_id.as_deref())
            .query_opt("calendarId", args.calendar_id.as_deref());
        let raw = self.call(request).await?;
        Ok(Report::Appointments {
            appointments: envelope::appointments(&raw),
            raw,
        })
    }

    // ========================================================================
    // Messaging
    // ========================================================================

    async fn send_sms(&self, args: SendSmsArgs) -> Result<Report> {
        let mut body = Map::new();
        body.insert("type".into(), json!("SMS"));
        body.insert("message".into(), json!(args.message));
        body.insert("contactId".into(), json!(args.contact_id));

        let request = ApiRequest::post("/conversations/messages").json(self.scoped(body));
        let raw = self.call(request).await?;
        Ok(Report::SmsSent {
            contact_id: args.contact_id,
            message: args.message,
            raw,
        })
    }

    async fn send_email(&self, args: SendEmailArgs) -> Result<Report> {
        let mut body = Map::new();
        body.insert("type".into(), json!("Email"));
        body.insert("subject".into(), json!(args.subject));
        body.insert("message".into(), json!(args.message));
        body.insert("contactId".into(), json!(args.contact_id));

        let request = ApiRequest::post("/conversations/messages").json(self.scoped(body));
        let raw = self.call(request).await?;
        Ok(Report::EmailSent {
            contact_id: args.contact_id,
            subject: args.subject,
            message: args.message,
            raw,
        })
    }

    /// Find the contact's conversation, then fetch its messages
    async fn conversation_history(&self, args: ConversationHistoryArgs) -> Result<Report> {
        let search = self
            .read("/conversations/search")
            .query("contactId", &args.contact_id)
            .query("limit", args.limit);
        let found = self.call(search).await?;

        let conversations = envelope::conversations(&found);
        let conversation_id = envelope::conversation_for(&conversations, &args.contact_id)
            .and_then(envelope::id_of)
            .ok_or_else(|| Error::NotFound {
                entity: "Conversation for contact",
                id: args.contact_id.clone(),
            })?;

        let path = format!("/conversations/{}", encode(&conversation_id));
        let raw = self.call(self.read(path)).await?;
        Ok(Report::ConversationHistory {
            contact_id: args.contact_id,
            conversation_id,
            messages: envelope::messages(&raw),
            raw,
        })
    }

    // ========================================================================
    // Pipelines
    // ========================================================================

    async fn fetch_pipelines(&self) -> Result<Value> {
        self.call(self.read("/opportunities/pipelines")).await
    }

    async fn pipeline_stages(&self, args: PipelineStagesArgs) -> Result<Report> {
        let raw = self.fetch_pipelines().await?;
        let pipeline = find_pipeline(&raw, &args.pipeline_id)?;
        Ok(Report::PipelineStages {
            stages: envelope::stages(&pipeline),
            pipeline,
        })
    }

    async fn pipeline_info(&self, args: PipelineInfoArgs) -> Result<Report> {
        let raw = self.fetch_pipelines().await?;
        match args.pipeline_id.as_deref().filter(|id| !id.trim().is_empty()) {
            Some(id) => Ok(Report::Pipeline {
                pipeline: find_pipeline(&raw, id)?,
            }),
            None => Ok(Report::Pipelines {
                pipelines: envelope::pipelines(&raw),
                raw,
            }),
        }
    }

    // ========================================================================
    // Custom fields
    // ========================================================================

    fn custom_fields_path(&self) -> String {
        format!("/locations/{}/customFields", encode(&self.location_id))
    }

    async fn list_custom_fields(&self) -> Result<Report> {
        let raw = self.call(ApiRequest::get(self.custom_fields_path())).await?;
        Ok(Report::CustomFields {
            fields: envelope::custom_fields(&raw),
            raw,
        })
    }

    async fn get_custom_field(&self, args: CustomFieldIdArgs) -> Result<Report> {
        let path = format!(
            "{}/{}",
            self.custom_fields_path(),
            encode(&args.custom_field_id)
        );
        let raw = self.call(ApiRequest::get(path)).await?;
        Ok(Report::CustomField {
            field: envelope::custom_field(&raw),
            location_id: self.location_id.clone(),
            raw,
        })
    }

    async fn create_custom_field(&self, args: CreateCustomFieldArgs) -> Result<Report> {
        let request = custom_field_body(args);
        let raw = self
            .call(ApiRequest::post(self.custom_fields_path()).json(request.clone()))
            .await?;
        Ok(Report::CustomFieldCreated {
            id: envelope::custom_field_id(&raw),
            location_id: self.location_id.clone(),
            request,
            raw,
        })
    }
}

/// Body for custom field creation. `options` is only forwarded for choice
/// types and dropped silently otherwise.
fn custom_field_body(args: CreateCustomFieldArgs) -> Value {
    let mut body = Map::new();
    body.insert("name".into(), json!(args.name));
    body.insert("fieldType".into(), json!(args.field_type.as_str()));
    body.insert("isRequired".into(), json!(args.is_required));
    insert_opt(
        &mut body,
        "defaultValue",
        args.default_value.filter(|v| !v.is_empty()),
    );
    insert_opt(
        &mut body,
        "placeholder",
        args.placeholder.filter(|v| !v.is_empty()),
    );
    if args.field_type.accepts_options() {
        if let Some(options) = args.options {
            body.insert("options".into(), json!(options));
        }
    }
    Value::Object(body)
}

fn find_pipeline(raw: &Value, pipeline_id: &str) -> Result<Value> {
    let pipelines = envelope::pipelines(raw);
    envelope::find_by_id(&pipelines, pipeline_id)
        .cloned()
        .ok_or_else(|| Error::NotFound {
            entity: "Pipeline",
            id: pipeline_id.to_string(),
        })
}

fn insert_opt(body: &mut Map<String, Value>, key: &str, value: Option<String>) {
    if let Some(v) = value {
        body.insert(key.to_string(), Value::String(v));
    }
}

/// Empty body is `null`; a body that is not JSON is kept as a string
fn decode_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}
