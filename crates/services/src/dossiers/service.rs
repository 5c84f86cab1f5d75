//! Dossier lifecycle: numbered creation, updates, soft delete with audit,
//! assignment, and the per-dossier sub-resources (notes, events, chat
//! messages, documents).

use chrono::{Datelike, Utc};
use lexcase_core::audit::{self, redact_sensitive_fields};
use lexcase_core::error::CoreError;
use lexcase_core::numbering::DossierType;
use lexcase_core::status::{DocumentStatus, DossierStatus, EventStatus, RecordStatus, TaskStatus};
use lexcase_core::types::{DbId, Timestamp};
use lexcase_db::models::audit::CreateAuditEntry;
use lexcase_db::models::comment::{Comment, CreateComment};
use lexcase_db::models::document::{CreateDocument, Document};
use lexcase_db::models::dossier::{CreateDossier, Dossier, DossierFilter, UpdateDossier};
use lexcase_db::models::event::{CalendarEvent, CreateEvent, UpdateEvent};
use lexcase_db::models::message::{ChatMessage, CreateMessage};
use lexcase_db::models::note::{CreateNote, Note};
use lexcase_db::models::task::{CreateTask, Task};
use lexcase_db::repositories::{
    AuditRepo, ClientRepo, CommentRepo, DocumentRepo, DossierRepo, EventRepo, MessageRepo,
    NoteRepo, TaskRepo, UserRepo,
};
use lexcase_db::DbPool;
use serde::Deserialize;
use validator::Validate;

use crate::error::ServiceResult;
use crate::pagination::{Page, PageParams};

/// Payload for creating a dossier. The `numero_unique` is never part of the
/// input; it is generated inside the creation transaction.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDossierInput {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    pub dossier_type: DossierType,
    pub description: Option<String>,
    pub client_id: DbId,
    pub responsable_id: Option<DbId>,
    pub status: Option<DossierStatus>,
}

/// Payload for creating a calendar event under a dossier.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEventInput {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    pub description: Option<String>,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
}

/// Payload for creating a task under a dossier.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTaskInput {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    pub description: Option<String>,
    pub assignee_id: Option<DbId>,
    pub due_at: Option<Timestamp>,
}

/// Payload for uploading a document record under a dossier.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDocumentInput {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "url must not be empty"))]
    pub url: String,
    pub mime_type: String,
    pub size_bytes: i64,
}

fn not_found(entity: &'static str, id: DbId) -> CoreError {
    CoreError::NotFound { entity, id }
}

/// Dossier lifecycle service.
#[derive(Clone)]
pub struct DossierService {
    pool: DbPool,
}

impl DossierService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Fetch a dossier or fail with NotFound. Soft-deleted dossiers are
    /// filtered out here, so they behave exactly like absent ones.
    async fn require_live(&self, id: DbId) -> ServiceResult<Dossier> {
        let dossier = DossierRepo::find_live_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| not_found("dossier", id))?;
        Ok(dossier)
    }

    /// Validate that the referenced client exists and is active.
    async fn require_active_client(&self, client_id: DbId) -> ServiceResult<()> {
        ClientRepo::find_active_by_id(&self.pool, client_id)
            .await?
            .ok_or_else(|| not_found("client", client_id))?;
        Ok(())
    }

    /// Validate that the referenced staff member exists and is active.
    async fn require_active_user(&self, user_id: DbId) -> ServiceResult<()> {
        UserRepo::find_active_by_id(&self.pool, user_id)
            .await?
            .ok_or_else(|| not_found("user", user_id))?;
        Ok(())
    }

    /// Create a dossier with a freshly generated `numero_unique` scoped to
    /// (type, current year).
    pub async fn create(&self, input: CreateDossierInput) -> ServiceResult<Dossier> {
        // 1. Validate the payload and referenced entities.
        input.validate()?;
        self.require_active_client(input.client_id).await?;
        if let Some(responsable_id) = input.responsable_id {
            self.require_active_user(responsable_id).await?;
        }

        // 2. Generate the number and insert, under the per-scope lock.
        let year = Utc::now().year();
        let status = input.status.unwrap_or(DossierStatus::Ouvert);
        let dossier = DossierRepo::create_numbered(
            &self.pool,
            &CreateDossier {
                title: input.title,
                dossier_type: input.dossier_type.as_str().to_string(),
                description: input.description,
                status: status.as_str().to_string(),
                client_id: input.client_id,
                responsable_id: input.responsable_id,
            },
            input.dossier_type,
            year,
        )
        .await?;

        tracing::info!(
            dossier_id = dossier.id,
            numero = %dossier.numero_unique,
            "Dossier created"
        );
        Ok(dossier)
    }

    /// List dossiers with filters and pagination, most recent first.
    pub async fn find_all(
        &self,
        filter: DossierFilter,
        page: PageParams,
    ) -> ServiceResult<Page<Dossier>> {
        let (limit, offset) = page.resolve();
        let total_count = DossierRepo::count(&self.pool, &filter).await?;
        let data = DossierRepo::list(&self.pool, &filter, limit, offset).await?;
        Ok(Page {
            total_count,
            limit,
            offset,
            data,
        })
    }

    /// Fetch a single dossier by id.
    pub async fn find_one(&self, id: DbId) -> ServiceResult<Dossier> {
        self.require_live(id).await
    }

    /// Update mutable dossier fields. Re-validates any changed references
    /// the same way creation does.
    pub async fn update(&self, id: DbId, input: UpdateDossier) -> ServiceResult<Dossier> {
        self.require_live(id).await?;

        if let Some(client_id) = input.client_id {
            self.require_active_client(client_id).await?;
        }
        if let Some(responsable_id) = input.responsable_id {
            self.require_active_user(responsable_id).await?;
        }

        let dossier = DossierRepo::update(&self.pool, id, &input)
            .await?
            .ok_or_else(|| not_found("dossier", id))?;
        Ok(dossier)
    }

    /// Write a new dossier status. Transitions are permissive; any live
    /// status may move to any other.
    pub async fn update_status(&self, id: DbId, status: DossierStatus) -> ServiceResult<Dossier> {
        let before = self.require_live(id).await?;

        let dossier = DossierRepo::update_status(&self.pool, id, status.as_str())
            .await?
            .ok_or_else(|| not_found("dossier", id))?;

        tracing::info!(
            dossier_id = id,
            from = %before.status,
            to = %dossier.status,
            "Dossier status changed"
        );
        Ok(dossier)
    }

    /// Soft-delete a dossier and record an audit entry with redacted
    /// before/after snapshots. An audit write failure is logged, never
    /// allowed to undo the deletion.
    pub async fn soft_delete(
        &self,
        id: DbId,
        acting_user_id: Option<DbId>,
    ) -> ServiceResult<Dossier> {
        let before = self.require_live(id).await?;

        let deleted = DossierRepo::update_status(&self.pool, id, DossierStatus::Supprime.as_str())
            .await?
            .ok_or_else(|| not_found("dossier", id))?;

        let entry = CreateAuditEntry {
            user_id: acting_user_id,
            action: audit::actions::SUPPRESSION.to_string(),
            entity_type: audit::entity_types::DOSSIER.to_string(),
            entity_id: id,
            old_value: serde_json::to_value(&before)
                .ok()
                .map(|v| redact_sensitive_fields(&v)),
            new_value: Some(serde_json::json!({
                "status": DossierStatus::Supprime.as_str()
            })),
        };
        if let Err(e) = AuditRepo::create(&self.pool, &entry).await {
            tracing::error!(dossier_id = id, error = %e, "Audit write failed for dossier deletion");
        }

        tracing::info!(dossier_id = id, numero = %deleted.numero_unique, "Dossier soft-deleted");
        Ok(deleted)
    }

    /// Assign or reassign the responsible staff member.
    pub async fn assign(&self, id: DbId, responsable_id: DbId) -> ServiceResult<Dossier> {
        self.require_live(id).await?;
        self.require_active_user(responsable_id).await?;

        let dossier = DossierRepo::set_responsable(&self.pool, id, responsable_id)
            .await?
            .ok_or_else(|| not_found("dossier", id))?;

        tracing::info!(dossier_id = id, responsable_id, "Dossier assigned");
        Ok(dossier)
    }

    // --- Notes ---

    /// List active notes for a dossier, newest first.
    pub async fn list_notes(
        &self,
        dossier_id: DbId,
        page: PageParams,
    ) -> ServiceResult<Page<Note>> {
        self.require_live(dossier_id).await?;
        let (limit, offset) = page.resolve();
        let total_count = NoteRepo::count_for_dossier(&self.pool, dossier_id).await?;
        let data = NoteRepo::list_for_dossier(&self.pool, dossier_id, limit, offset).await?;
        Ok(Page {
            total_count,
            limit,
            offset,
            data,
        })
    }

    /// Add a note to a dossier. The note inherits the dossier's client.
    pub async fn add_note(
        &self,
        dossier_id: DbId,
        author_id: DbId,
        content: String,
    ) -> ServiceResult<Note> {
        if content.trim().is_empty() {
            return Err(CoreError::Validation("content must not be empty".to_string()).into());
        }
        let dossier = self.require_live(dossier_id).await?;

        let note = NoteRepo::create(
            &self.pool,
            &CreateNote {
                dossier_id,
                client_id: dossier.client_id,
                author_id,
                content,
            },
        )
        .await?;
        Ok(note)
    }

    /// Fetch a live note and verify it belongs to the given dossier.
    ///
    /// A note attached to a different dossier is reported as absent rather
    /// than revealing its existence.
    async fn require_note(&self, dossier_id: DbId, note_id: DbId) -> ServiceResult<Note> {
        let note = NoteRepo::find_by_id(&self.pool, note_id)
            .await?
            .filter(|n| n.status == RecordStatus::Actif.as_str() && n.dossier_id == dossier_id)
            .ok_or_else(|| not_found("note", note_id))?;
        Ok(note)
    }

    /// Replace a note's content.
    pub async fn update_note(
        &self,
        dossier_id: DbId,
        note_id: DbId,
        content: String,
    ) -> ServiceResult<Note> {
        if content.trim().is_empty() {
            return Err(CoreError::Validation("content must not be empty".to_string()).into());
        }
        self.require_live(dossier_id).await?;
        self.require_note(dossier_id, note_id).await?;

        let note = NoteRepo::update_content(&self.pool, note_id, &content)
            .await?
            .ok_or_else(|| not_found("note", note_id))?;
        Ok(note)
    }

    /// Soft-delete a note.
    pub async fn delete_note(&self, dossier_id: DbId, note_id: DbId) -> ServiceResult<Note> {
        self.require_live(dossier_id).await?;
        self.require_note(dossier_id, note_id).await?;

        let note = NoteRepo::soft_delete(&self.pool, note_id)
            .await?
            .ok_or_else(|| not_found("note", note_id))?;
        Ok(note)
    }

    // --- Calendar events ---

    /// List live events for a dossier in chronological order.
    pub async fn list_events(&self, dossier_id: DbId) -> ServiceResult<Vec<CalendarEvent>> {
        self.require_live(dossier_id).await?;
        let events = EventRepo::list_for_dossier(&self.pool, dossier_id).await?;
        Ok(events)
    }

    /// Create a calendar event under a dossier.
    pub async fn create_event(
        &self,
        dossier_id: DbId,
        created_by: DbId,
        input: CreateEventInput,
    ) -> ServiceResult<CalendarEvent> {
        input.validate()?;
        if input.ends_at <= input.starts_at {
            return Err(
                CoreError::Validation("ends_at must be after starts_at".to_string()).into(),
            );
        }
        self.require_live(dossier_id).await?;

        let event = EventRepo::create(
            &self.pool,
            &CreateEvent {
                dossier_id,
                created_by,
                title: input.title,
                description: input.description,
                starts_at: input.starts_at,
                ends_at: input.ends_at,
            },
        )
        .await?;
        Ok(event)
    }

    async fn require_event(
        &self,
        dossier_id: DbId,
        event_id: DbId,
    ) -> ServiceResult<CalendarEvent> {
        let event = EventRepo::find_by_id(&self.pool, event_id)
            .await?
            .filter(|e| e.status != EventStatus::Supprime.as_str() && e.dossier_id == dossier_id)
            .ok_or_else(|| not_found("event", event_id))?;
        Ok(event)
    }

    /// Update a calendar event. Only non-`None` fields are applied.
    pub async fn update_event(
        &self,
        dossier_id: DbId,
        event_id: DbId,
        input: UpdateEvent,
    ) -> ServiceResult<CalendarEvent> {
        if let Some(status) = input.status.as_deref() {
            if EventStatus::parse(status).is_none() {
                return Err(
                    CoreError::Validation(format!("Unknown event status: {status}")).into(),
                );
            }
        }
        self.require_live(dossier_id).await?;
        let existing = self.require_event(dossier_id, event_id).await?;

        // When only one bound moves, check it against the other stored bound.
        let starts_at = input.starts_at.unwrap_or(existing.starts_at);
        let ends_at = input.ends_at.unwrap_or(existing.ends_at);
        if ends_at <= starts_at {
            return Err(
                CoreError::Validation("ends_at must be after starts_at".to_string()).into(),
            );
        }

        let event = EventRepo::update(&self.pool, event_id, &input)
            .await?
            .ok_or_else(|| not_found("event", event_id))?;
        Ok(event)
    }

    /// Soft-delete a calendar event.
    pub async fn delete_event(
        &self,
        dossier_id: DbId,
        event_id: DbId,
    ) -> ServiceResult<CalendarEvent> {
        self.require_live(dossier_id).await?;
        self.require_event(dossier_id, event_id).await?;

        let event = EventRepo::soft_delete(&self.pool, event_id)
            .await?
            .ok_or_else(|| not_found("event", event_id))?;
        Ok(event)
    }

    // --- Chat messages ---

    /// List live messages for a dossier, oldest first.
    pub async fn list_messages(
        &self,
        dossier_id: DbId,
        page: PageParams,
    ) -> ServiceResult<Page<ChatMessage>> {
        self.require_live(dossier_id).await?;
        let (limit, offset) = page.resolve();
        let total_count = MessageRepo::count_for_dossier(&self.pool, dossier_id).await?;
        let data = MessageRepo::list_for_dossier(&self.pool, dossier_id, limit, offset).await?;
        Ok(Page {
            total_count,
            limit,
            offset,
            data,
        })
    }

    /// Post a chat message on a dossier.
    pub async fn post_message(
        &self,
        dossier_id: DbId,
        sender_id: DbId,
        content: String,
    ) -> ServiceResult<ChatMessage> {
        if content.trim().is_empty() {
            return Err(CoreError::Validation("content must not be empty".to_string()).into());
        }
        self.require_live(dossier_id).await?;

        let message = MessageRepo::create(
            &self.pool,
            &CreateMessage {
                dossier_id,
                sender_id,
                content,
            },
        )
        .await?;
        Ok(message)
    }

    /// Soft-delete a chat message. A message on another dossier is reported
    /// as absent.
    pub async fn delete_message(&self, dossier_id: DbId, message_id: DbId) -> ServiceResult<()> {
        self.require_live(dossier_id).await?;

        let deleted = MessageRepo::soft_delete(&self.pool, dossier_id, message_id).await?;
        if !deleted {
            return Err(not_found("message", message_id).into());
        }
        Ok(())
    }

    // --- Documents ---

    /// List active document records for a dossier.
    pub async fn list_documents(&self, dossier_id: DbId) -> ServiceResult<Vec<Document>> {
        self.require_live(dossier_id).await?;
        let documents = DocumentRepo::list_for_dossier(&self.pool, dossier_id).await?;
        Ok(documents)
    }

    /// Register a document under a dossier. The version is assigned per
    /// (dossier, name) inside the insert.
    pub async fn add_document(
        &self,
        dossier_id: DbId,
        uploaded_by: DbId,
        input: CreateDocumentInput,
    ) -> ServiceResult<Document> {
        input.validate()?;
        self.require_live(dossier_id).await?;

        let document = DocumentRepo::create(
            &self.pool,
            &CreateDocument {
                dossier_id,
                uploaded_by,
                name: input.name,
                url: input.url,
                mime_type: input.mime_type,
                size_bytes: input.size_bytes,
            },
        )
        .await?;
        Ok(document)
    }

    /// Change a document's status (archive or soft-delete).
    pub async fn set_document_status(
        &self,
        dossier_id: DbId,
        document_id: DbId,
        status: DocumentStatus,
    ) -> ServiceResult<Document> {
        self.require_live(dossier_id).await?;

        DocumentRepo::find_by_id(&self.pool, document_id)
            .await?
            .filter(|d| d.dossier_id == dossier_id)
            .ok_or_else(|| not_found("document", document_id))?;

        let document = DocumentRepo::update_status(&self.pool, document_id, status.as_str())
            .await?
            .ok_or_else(|| not_found("document", document_id))?;
        Ok(document)
    }

    // --- Document comments ---

    /// Fetch a document on the given dossier, excluding SUPPRIME rows.
    /// ARCHIVE documents stay reachable so their discussion remains
    /// readable.
    async fn require_document(
        &self,
        dossier_id: DbId,
        document_id: DbId,
    ) -> ServiceResult<Document> {
        let document = DocumentRepo::find_by_id(&self.pool, document_id)
            .await?
            .filter(|d| {
                d.dossier_id == dossier_id && d.status != DocumentStatus::Supprime.as_str()
            })
            .ok_or_else(|| not_found("document", document_id))?;
        Ok(document)
    }

    /// List active comments on a document, newest first.
    pub async fn list_document_comments(
        &self,
        dossier_id: DbId,
        document_id: DbId,
    ) -> ServiceResult<Vec<Comment>> {
        self.require_live(dossier_id).await?;
        self.require_document(dossier_id, document_id).await?;

        let comments = CommentRepo::list_for_document(&self.pool, document_id).await?;
        Ok(comments)
    }

    /// Add a comment to a document.
    pub async fn add_document_comment(
        &self,
        dossier_id: DbId,
        document_id: DbId,
        author_id: DbId,
        content: String,
    ) -> ServiceResult<Comment> {
        if content.trim().is_empty() {
            return Err(CoreError::Validation("content must not be empty".to_string()).into());
        }
        self.require_live(dossier_id).await?;
        self.require_document(dossier_id, document_id).await?;

        let comment = CommentRepo::create(
            &self.pool,
            &CreateComment {
                document_id,
                author_id,
                content,
            },
        )
        .await?;
        Ok(comment)
    }

    /// Fetch a live comment and verify it belongs to the given document.
    async fn require_comment(
        &self,
        document_id: DbId,
        comment_id: DbId,
    ) -> ServiceResult<Comment> {
        let comment = CommentRepo::find_by_id(&self.pool, comment_id)
            .await?
            .filter(|c| c.status == RecordStatus::Actif.as_str() && c.document_id == document_id)
            .ok_or_else(|| not_found("comment", comment_id))?;
        Ok(comment)
    }

    /// Replace a comment's content.
    pub async fn update_document_comment(
        &self,
        dossier_id: DbId,
        document_id: DbId,
        comment_id: DbId,
        content: String,
    ) -> ServiceResult<Comment> {
        if content.trim().is_empty() {
            return Err(CoreError::Validation("content must not be empty".to_string()).into());
        }
        self.require_live(dossier_id).await?;
        self.require_document(dossier_id, document_id).await?;
        self.require_comment(document_id, comment_id).await?;

        let comment = CommentRepo::update_content(&self.pool, comment_id, &content)
            .await?
            .ok_or_else(|| not_found("comment", comment_id))?;
        Ok(comment)
    }

    /// Soft-delete a comment.
    pub async fn delete_document_comment(
        &self,
        dossier_id: DbId,
        document_id: DbId,
        comment_id: DbId,
    ) -> ServiceResult<Comment> {
        self.require_live(dossier_id).await?;
        self.require_document(dossier_id, document_id).await?;
        self.require_comment(document_id, comment_id).await?;

        let comment = CommentRepo::soft_delete(&self.pool, comment_id)
            .await?
            .ok_or_else(|| not_found("comment", comment_id))?;
        Ok(comment)
    }

    // --- Tasks ---

    /// List non-deleted tasks for a dossier, newest first.
    pub async fn list_tasks(&self, dossier_id: DbId) -> ServiceResult<Vec<Task>> {
        self.require_live(dossier_id).await?;
        let tasks = TaskRepo::list_for_dossier(&self.pool, dossier_id).await?;
        Ok(tasks)
    }

    /// Create a task under a dossier. The assignee, when given, must be an
    /// active staff member.
    pub async fn add_task(
        &self,
        dossier_id: DbId,
        created_by: DbId,
        input: CreateTaskInput,
    ) -> ServiceResult<Task> {
        input.validate()?;
        self.require_live(dossier_id).await?;
        if let Some(assignee_id) = input.assignee_id {
            self.require_active_user(assignee_id).await?;
        }

        let task = TaskRepo::create(
            &self.pool,
            &CreateTask {
                dossier_id,
                created_by,
                assignee_id: input.assignee_id,
                title: input.title,
                description: input.description,
                due_at: input.due_at,
            },
        )
        .await?;
        Ok(task)
    }

    /// Change a task's status. SUPPRIME acts as the soft delete.
    pub async fn update_task_status(
        &self,
        dossier_id: DbId,
        task_id: DbId,
        status: TaskStatus,
    ) -> ServiceResult<Task> {
        self.require_live(dossier_id).await?;

        TaskRepo::find_by_id(&self.pool, task_id)
            .await?
            .filter(|t| t.dossier_id == dossier_id && t.status != TaskStatus::Supprime.as_str())
            .ok_or_else(|| not_found("task", task_id))?;

        let task = TaskRepo::update_status(&self.pool, task_id, status.as_str())
            .await?
            .ok_or_else(|| not_found("task", task_id))?;
        Ok(task)
    }

    /// Read the audit trail of a dossier, newest first.
    pub async fn audit_trail(
        &self,
        dossier_id: DbId,
    ) -> ServiceResult<Vec<lexcase_db::models::audit::AuditEntry>> {
        let entries =
            AuditRepo::list_for_entity(&self.pool, audit::entity_types::DOSSIER, dossier_id)
                .await?;
        Ok(entries)
    }
}
