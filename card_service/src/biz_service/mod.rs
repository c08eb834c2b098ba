pub mod card_application_service;
pub mod edit_session;
