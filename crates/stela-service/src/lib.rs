//! # stela-service
//!
//! The model version lifecycle core: upload pipeline, activation
//! coordinator, deletion guard, and the facade consumed by the external
//! CRUD layer. Services operate against the trait seams from
//! `stela-core`/`stela-entity` and never see SQL or provider specifics.

pub mod context;
pub mod locks;
pub mod model;

pub use context::RequestContext;
pub use model::service::ModelLifecycleService;
