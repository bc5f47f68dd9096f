pub mod formatter;
pub mod status;
pub mod validation;
pub mod vision;
