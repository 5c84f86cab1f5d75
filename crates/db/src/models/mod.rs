pub mod audit;
pub mod client;
pub mod comment;
pub mod document;
pub mod dossier;
pub mod event;
pub mod message;
pub mod note;
pub mod task;
pub mod user;
