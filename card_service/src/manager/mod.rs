pub mod application_state;
pub mod comment_classifier;
pub mod form_prefill;
pub mod payload_builder;
pub mod upload_gate;
