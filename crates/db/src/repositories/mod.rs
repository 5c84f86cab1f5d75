mod audit_repo;
mod client_repo;
mod comment_repo;
mod document_repo;
mod dossier_repo;
mod event_repo;
mod message_repo;
mod note_repo;
mod task_repo;
mod user_repo;

pub use audit_repo::AuditRepo;
pub use client_repo::ClientRepo;
pub use comment_repo::CommentRepo;
pub use document_repo::DocumentRepo;
pub use dossier_repo::DossierRepo;
pub use event_repo::EventRepo;
pub use message_repo::MessageRepo;
pub use note_repo::NoteRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;
