pub mod chat;
pub mod context;
pub mod profile;
pub mod training_plan;
