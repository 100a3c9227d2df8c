//! Model version lifecycle services.

pub mod activation;
pub mod deletion;
pub mod service;
pub mod upload;

pub use activation::ActivationService;
pub use deletion::DeletionService;
pub use service::ModelLifecycleService;
pub use upload::{UploadParams, UploadService};
