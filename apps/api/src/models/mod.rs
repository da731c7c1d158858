pub mod resolution;
pub mod template;
pub mod trainee;
