pub mod admin_service;
pub mod notification_service;
pub mod parent_service;
pub mod teacher_service;
pub mod vacancy_service;
