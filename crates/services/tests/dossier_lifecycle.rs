//! Integration tests for the dossier lifecycle and its sub-resources.

use assert_matches::assert_matches;
use chrono::{Datelike, Duration, Utc};
use lexcase_core::audit;
use lexcase_core::error::CoreError;
use lexcase_core::numbering::DossierType;
use lexcase_core::status::{DocumentStatus, DossierStatus, TaskStatus};
use lexcase_core::types::DbId;
use lexcase_db::models::dossier::UpdateDossier;
use lexcase_db::models::event::UpdateEvent;
use lexcase_db::repositories::{ClientRepo, UserRepo};
use lexcase_services::dossiers::service::{
    CreateDocumentInput, CreateDossierInput, CreateEventInput, CreateTaskInput,
};
use lexcase_services::error::ServiceError;
use lexcase_services::pagination::PageParams;
use lexcase_services::DossierService;
use sqlx::PgPool;

/// Insert a minimal ACTIF client and return its id.
async fn seed_client(pool: &PgPool, email: &str) -> DbId {
    let row: (DbId,) = sqlx::query_as(
        "INSERT INTO clients (first_name, last_name, email)
         VALUES ('Alice', 'Martin', $1)
         RETURNING id",
    )
    .bind(email)
    .fetch_one(pool)
    .await
    .expect("client insert should succeed");
    row.0
}

/// Insert an ACTIF staff member and return their id. The password hash is
/// never verified in these tests.
async fn seed_user(pool: &PgPool, email: &str) -> DbId {
    let row: (DbId,) = sqlx::query_as(
        "INSERT INTO users (first_name, last_name, email, password_hash, role)
         VALUES ('Jean', 'Dupont', $1, 'not-a-real-hash', 'AVOCAT')
         RETURNING id",
    )
    .bind(email)
    .fetch_one(pool)
    .await
    .expect("user insert should succeed");
    row.0
}

fn dossier_input(client_id: DbId, dossier_type: DossierType) -> CreateDossierInput {
    CreateDossierInput {
        title: "Succession Martin".to_string(),
        dossier_type,
        description: None,
        client_id,
        responsable_id: None,
        status: None,
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_assigns_scoped_numero(pool: PgPool) {
    let service = DossierService::new(pool.clone());
    let client_id = seed_client(&pool, "alice@exemple.fr").await;
    let year = Utc::now().year();

    let first = service
        .create(dossier_input(client_id, DossierType::Contentieux))
        .await
        .unwrap();
    assert_eq!(first.numero_unique, format!("CO{year}0001"));
    assert_eq!(first.status, "OUVERT");

    let second = service
        .create(dossier_input(client_id, DossierType::Contentieux))
        .await
        .unwrap();
    assert_eq!(second.numero_unique, format!("CO{year}0002"));

    // A different type runs its own counter.
    let contrat = service
        .create(dossier_input(client_id, DossierType::Contrat))
        .await
        .unwrap();
    assert_eq!(contrat.numero_unique, format!("CT{year}0001"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_rejects_unknown_or_inactive_references(pool: PgPool) {
    let service = DossierService::new(pool.clone());
    let client_id = seed_client(&pool, "alice@exemple.fr").await;

    let err = service
        .create(dossier_input(9999, DossierType::Contentieux))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Core(CoreError::NotFound { .. }));

    // An inactive responsable is rejected the same way.
    let user_id = seed_user(&pool, "jean@juridix.fr").await;
    UserRepo::update_status(&pool, user_id, "INACTIF")
        .await
        .unwrap();
    let mut input = dossier_input(client_id, DossierType::Contentieux);
    input.responsable_id = Some(user_id);
    let err = service.create(input).await.unwrap_err();
    assert_matches!(err, ServiceError::Core(CoreError::NotFound { .. }));

    // A deactivated client is invisible to creation.
    ClientRepo::deactivate(&pool, client_id).await.unwrap();
    let err = service
        .create(dossier_input(client_id, DossierType::Contentieux))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Core(CoreError::NotFound { .. }));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_soft_delete_hides_the_dossier_and_writes_audit(pool: PgPool) {
    let service = DossierService::new(pool.clone());
    let client_id = seed_client(&pool, "alice@exemple.fr").await;
    let actor_id = seed_user(&pool, "jean@juridix.fr").await;

    let dossier = service
        .create(dossier_input(client_id, DossierType::Immobilier))
        .await
        .unwrap();

    service
        .update_status(dossier.id, DossierStatus::EnCours)
        .await
        .unwrap();

    let deleted = service.soft_delete(dossier.id, Some(actor_id)).await.unwrap();
    assert_eq!(deleted.status, "SUPPRIME");

    // Every subsequent operation sees the dossier as absent.
    let err = service.find_one(dossier.id).await.unwrap_err();
    assert_matches!(err, ServiceError::Core(CoreError::NotFound { .. }));
    let err = service
        .update_status(dossier.id, DossierStatus::Ouvert)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Core(CoreError::NotFound { .. }));
    let err = service.soft_delete(dossier.id, Some(actor_id)).await.unwrap_err();
    assert_matches!(err, ServiceError::Core(CoreError::NotFound { .. }));

    // The deletion left an audit entry with a before snapshot.
    let trail = service.audit_trail(dossier.id).await.unwrap();
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].action, audit::actions::SUPPRESSION);
    assert_eq!(trail[0].user_id, Some(actor_id));
    assert!(trail[0].old_value.is_some());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_revalidates_references(pool: PgPool) {
    let service = DossierService::new(pool.clone());
    let client_id = seed_client(&pool, "alice@exemple.fr").await;
    let other_client = seed_client(&pool, "bob@exemple.fr").await;
    ClientRepo::deactivate(&pool, other_client).await.unwrap();

    let dossier = service
        .create(dossier_input(client_id, DossierType::SinistreMateriel))
        .await
        .unwrap();

    let err = service
        .update(
            dossier.id,
            UpdateDossier {
                client_id: Some(other_client),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Core(CoreError::NotFound { .. }));

    // The business key survives any update.
    let updated = service
        .update(
            dossier.id,
            UpdateDossier {
                title: Some("Succession Martin (appel)".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Succession Martin (appel)");
    assert_eq!(updated.numero_unique, dossier.numero_unique);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_assign_requires_an_active_user(pool: PgPool) {
    let service = DossierService::new(pool.clone());
    let client_id = seed_client(&pool, "alice@exemple.fr").await;
    let avocat = seed_user(&pool, "jean@juridix.fr").await;
    let inactive = seed_user(&pool, "parti@juridix.fr").await;
    UserRepo::update_status(&pool, inactive, "INACTIF")
        .await
        .unwrap();

    let dossier = service
        .create(dossier_input(client_id, DossierType::Autre))
        .await
        .unwrap();

    let err = service.assign(dossier.id, inactive).await.unwrap_err();
    assert_matches!(err, ServiceError::Core(CoreError::NotFound { .. }));

    let assigned = service.assign(dossier.id, avocat).await.unwrap();
    assert_eq!(assigned.responsable_id, Some(avocat));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_notes_are_scoped_to_their_dossier(pool: PgPool) {
    let service = DossierService::new(pool.clone());
    let client_id = seed_client(&pool, "alice@exemple.fr").await;
    let author_id = seed_user(&pool, "jean@juridix.fr").await;

    let first = service
        .create(dossier_input(client_id, DossierType::Contentieux))
        .await
        .unwrap();
    let second = service
        .create(dossier_input(client_id, DossierType::Contrat))
        .await
        .unwrap();

    let note = service
        .add_note(first.id, author_id, "Audience fixée au 12 mars".to_string())
        .await
        .unwrap();
    assert_eq!(note.client_id, client_id);

    // The note is not reachable through another dossier.
    let err = service
        .update_note(second.id, note.id, "hijack".to_string())
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Core(CoreError::NotFound { .. }));

    let updated = service
        .update_note(first.id, note.id, "Audience reportée".to_string())
        .await
        .unwrap();
    assert_eq!(updated.content, "Audience reportée");

    service.delete_note(first.id, note.id).await.unwrap();
    let err = service.delete_note(first.id, note.id).await.unwrap_err();
    assert_matches!(err, ServiceError::Core(CoreError::NotFound { .. }));

    let page = service
        .list_notes(first.id, PageParams::default())
        .await
        .unwrap();
    assert_eq!(page.total_count, 0);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_event_bounds_are_validated(pool: PgPool) {
    let service = DossierService::new(pool.clone());
    let client_id = seed_client(&pool, "alice@exemple.fr").await;
    let creator_id = seed_user(&pool, "jean@juridix.fr").await;

    let dossier = service
        .create(dossier_input(client_id, DossierType::Sport))
        .await
        .unwrap();

    let starts_at = Utc::now() + Duration::days(7);
    let backwards = CreateEventInput {
        title: "Audience".to_string(),
        description: None,
        starts_at,
        ends_at: starts_at - Duration::hours(1),
    };
    let err = service
        .create_event(dossier.id, creator_id, backwards)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Core(CoreError::Validation(_)));

    let event = service
        .create_event(
            dossier.id,
            creator_id,
            CreateEventInput {
                title: "Audience".to_string(),
                description: None,
                starts_at,
                ends_at: starts_at + Duration::hours(2),
            },
        )
        .await
        .unwrap();
    assert_eq!(event.status, "PREVU");

    // Moving one bound is checked against the other stored bound.
    let err = service
        .update_event(
            dossier.id,
            event.id,
            UpdateEvent {
                ends_at: Some(starts_at - Duration::hours(1)),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Core(CoreError::Validation(_)));

    let err = service
        .update_event(
            dossier.id,
            event.id,
            UpdateEvent {
                status: Some("BIZARRE".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Core(CoreError::Validation(_)));

    let done = service
        .update_event(
            dossier.id,
            event.id,
            UpdateEvent {
                status: Some("TERMINE".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(done.status, "TERMINE");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_messages_and_documents(pool: PgPool) {
    let service = DossierService::new(pool.clone());
    let client_id = seed_client(&pool, "alice@exemple.fr").await;
    let user_id = seed_user(&pool, "jean@juridix.fr").await;

    let dossier = service
        .create(dossier_input(client_id, DossierType::SinistreCorporel))
        .await
        .unwrap();

    let err = service
        .post_message(dossier.id, user_id, "   ".to_string())
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Core(CoreError::Validation(_)));

    service
        .post_message(dossier.id, user_id, "Pièces reçues du greffe".to_string())
        .await
        .unwrap();
    let page = service
        .list_messages(dossier.id, PageParams::default())
        .await
        .unwrap();
    assert_eq!(page.total_count, 1);

    // Re-uploading under the same name bumps the version.
    let doc_input = CreateDocumentInput {
        name: "conclusions.pdf".to_string(),
        url: "s3://bucket/conclusions.pdf".to_string(),
        mime_type: "application/pdf".to_string(),
        size_bytes: 1024,
    };
    let v1 = service
        .add_document(dossier.id, user_id, doc_input.clone())
        .await
        .unwrap();
    let v2 = service
        .add_document(dossier.id, user_id, doc_input)
        .await
        .unwrap();
    assert_eq!(v1.version, 1);
    assert_eq!(v2.version, 2);

    service
        .set_document_status(dossier.id, v1.id, DocumentStatus::Archive)
        .await
        .unwrap();
    let remaining = service.list_documents(dossier.id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, v2.id);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_message_deletion_is_scoped_to_the_dossier(pool: PgPool) {
    let service = DossierService::new(pool.clone());
    let client_id = seed_client(&pool, "alice@exemple.fr").await;
    let user_id = seed_user(&pool, "jean@juridix.fr").await;

    let first = service
        .create(dossier_input(client_id, DossierType::Contentieux))
        .await
        .unwrap();
    let second = service
        .create(dossier_input(client_id, DossierType::Contrat))
        .await
        .unwrap();

    let message = service
        .post_message(first.id, user_id, "Pièces reçues du greffe".to_string())
        .await
        .unwrap();

    // The message is not deletable through another dossier.
    let err = service.delete_message(second.id, message.id).await.unwrap_err();
    assert_matches!(err, ServiceError::Core(CoreError::NotFound { .. }));

    service.delete_message(first.id, message.id).await.unwrap();
    let page = service
        .list_messages(first.id, PageParams::default())
        .await
        .unwrap();
    assert_eq!(page.total_count, 0);

    // A second deletion sees the message as already gone.
    let err = service.delete_message(first.id, message.id).await.unwrap_err();
    assert_matches!(err, ServiceError::Core(CoreError::NotFound { .. }));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_document_comment_lifecycle(pool: PgPool) {
    let service = DossierService::new(pool.clone());
    let client_id = seed_client(&pool, "alice@exemple.fr").await;
    let author_id = seed_user(&pool, "jean@juridix.fr").await;

    let dossier = service
        .create(dossier_input(client_id, DossierType::Immobilier))
        .await
        .unwrap();
    let document = service
        .add_document(
            dossier.id,
            author_id,
            CreateDocumentInput {
                name: "bail.pdf".to_string(),
                url: "s3://bucket/bail.pdf".to_string(),
                mime_type: "application/pdf".to_string(),
                size_bytes: 2048,
            },
        )
        .await
        .unwrap();

    let err = service
        .add_document_comment(dossier.id, document.id, author_id, "  ".to_string())
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Core(CoreError::Validation(_)));

    let comment = service
        .add_document_comment(
            dossier.id,
            document.id,
            author_id,
            "Clause 4 à revoir".to_string(),
        )
        .await
        .unwrap();

    let updated = service
        .update_document_comment(
            dossier.id,
            document.id,
            comment.id,
            "Clause 4 corrigée".to_string(),
        )
        .await
        .unwrap();
    assert_eq!(updated.content, "Clause 4 corrigée");

    let comments = service
        .list_document_comments(dossier.id, document.id)
        .await
        .unwrap();
    assert_eq!(comments.len(), 1);

    service
        .delete_document_comment(dossier.id, document.id, comment.id)
        .await
        .unwrap();
    let err = service
        .delete_document_comment(dossier.id, document.id, comment.id)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Core(CoreError::NotFound { .. }));
    let comments = service
        .list_document_comments(dossier.id, document.id)
        .await
        .unwrap();
    assert!(comments.is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_comments_are_scoped_to_their_document(pool: PgPool) {
    let service = DossierService::new(pool.clone());
    let client_id = seed_client(&pool, "alice@exemple.fr").await;
    let author_id = seed_user(&pool, "jean@juridix.fr").await;

    let dossier = service
        .create(dossier_input(client_id, DossierType::Contrat))
        .await
        .unwrap();
    let doc_input = |name: &str| CreateDocumentInput {
        name: name.to_string(),
        url: format!("s3://bucket/{name}"),
        mime_type: "application/pdf".to_string(),
        size_bytes: 512,
    };
    let first = service
        .add_document(dossier.id, author_id, doc_input("contrat.pdf"))
        .await
        .unwrap();
    let second = service
        .add_document(dossier.id, author_id, doc_input("avenant.pdf"))
        .await
        .unwrap();

    let comment = service
        .add_document_comment(dossier.id, first.id, author_id, "Signé".to_string())
        .await
        .unwrap();

    // The comment is not reachable through another document.
    let err = service
        .update_document_comment(dossier.id, second.id, comment.id, "hijack".to_string())
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Core(CoreError::NotFound { .. }));

    // A soft-deleted document takes its comments out of reach.
    service
        .set_document_status(dossier.id, first.id, DocumentStatus::Supprime)
        .await
        .unwrap();
    let err = service
        .list_document_comments(dossier.id, first.id)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Core(CoreError::NotFound { .. }));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_task_workflow(pool: PgPool) {
    let service = DossierService::new(pool.clone());
    let client_id = seed_client(&pool, "alice@exemple.fr").await;
    let creator_id = seed_user(&pool, "jean@juridix.fr").await;
    let inactive = seed_user(&pool, "parti@juridix.fr").await;
    UserRepo::update_status(&pool, inactive, "INACTIF")
        .await
        .unwrap();

    let dossier = service
        .create(dossier_input(client_id, DossierType::Contentieux))
        .await
        .unwrap();
    let other = service
        .create(dossier_input(client_id, DossierType::Autre))
        .await
        .unwrap();

    // An inactive assignee is rejected.
    let err = service
        .add_task(
            dossier.id,
            creator_id,
            CreateTaskInput {
                title: "Relancer le greffe".to_string(),
                description: None,
                assignee_id: Some(inactive),
                due_at: None,
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Core(CoreError::NotFound { .. }));

    let task = service
        .add_task(
            dossier.id,
            creator_id,
            CreateTaskInput {
                title: "Relancer le greffe".to_string(),
                description: Some("Avant la prochaine audience".to_string()),
                assignee_id: Some(creator_id),
                due_at: Some(Utc::now() + Duration::days(3)),
            },
        )
        .await
        .unwrap();
    assert_eq!(task.status, "A_FAIRE");

    // The task is not reachable through another dossier.
    let err = service
        .update_task_status(other.id, task.id, TaskStatus::EnCours)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Core(CoreError::NotFound { .. }));

    let done = service
        .update_task_status(dossier.id, task.id, TaskStatus::Terminee)
        .await
        .unwrap();
    assert_eq!(done.status, "TERMINEE");
    assert_eq!(service.list_tasks(dossier.id).await.unwrap().len(), 1);

    // SUPPRIME acts as the soft delete.
    service
        .update_task_status(dossier.id, task.id, TaskStatus::Supprime)
        .await
        .unwrap();
    assert!(service.list_tasks(dossier.id).await.unwrap().is_empty());
    let err = service
        .update_task_status(dossier.id, task.id, TaskStatus::EnCours)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Core(CoreError::NotFound { .. }));
}
