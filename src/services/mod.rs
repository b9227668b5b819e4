pub mod enrichment;
pub mod gemini_service;
pub mod json_repair;
pub mod normalizer;
pub mod photo_service;
pub mod prompt_builder;
pub mod trip_pipeline;
pub mod validator;
