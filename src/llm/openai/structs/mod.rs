pub mod api_error;
pub mod chat_completion_request;
pub mod chat_completion_response;
pub mod chat_message;
