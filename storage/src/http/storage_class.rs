//! Storage class names accepted by the service.

pub const STANDARD: &str = "STANDARD";
pub const MULTI_REGIONAL: &str = "MULTI_REGIONAL";
pub const REGIONAL: &str = "REGIONAL";
pub const NEARLINE: &str = "NEARLINE";
pub const COLDLINE: &str = "COLDLINE";
pub const DURABLE_REDUCED_AVAILABILITY: &str = "DURABLE_REDUCED_AVAILABILITY";
