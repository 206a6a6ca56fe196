mod ai;
mod auth;
mod documents;
mod system;

pub use ai::{ask_handler, feedback_handler};
pub use auth::{
    login_handler, me_handler, password_reset_confirm_handler, password_reset_request_handler,
    signup_handler,
};
pub use documents::{
    chat_history_handler, delete_collection_handler, list_collections_handler, search_handler,
    upload_handler,
};
pub use system::{health_handler, root_handler};
