pub mod analyze;
pub mod delete;
pub mod init;
pub mod practice;
pub mod validate;
