pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService};
pub use auth_service_impl::SeaOrmAuthService;

pub mod note_service;
pub mod note_service_impl;
pub use note_service::{NoteError, NoteService, SaveNoteRequest};
pub use note_service_impl::SeaOrmNoteService;
