pub mod auth_dto;
pub mod card_application;
pub mod editable_field;
pub mod form_values;
pub mod payload;
