pub mod admin;
pub mod parent;
pub mod teacher;
pub mod vacancy;
