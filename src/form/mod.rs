pub mod email;
pub mod fields;
pub mod service;
pub mod validate;
