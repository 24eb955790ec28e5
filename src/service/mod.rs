pub mod hash_service;
pub mod internal_auth_service;
pub mod ir_service;
pub mod metrics_service;
pub mod slot_service;
pub mod validation_service;
