pub mod exercise;
pub mod profile;
pub mod program;
