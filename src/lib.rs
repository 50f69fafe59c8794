pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    admin_service::AdminService, notification_service::NotificationService,
    parent_service::ParentService, teacher_service::TeacherService,
    vacancy_service::VacancyService,
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub vacancy_service: VacancyService,
    pub teacher_service: TeacherService,
    pub parent_service: ParentService,
    pub admin_service: AdminService,
    pub notification_service: NotificationService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let config = crate::config::get_config();

        let vacancy_service = VacancyService::new(pool.clone(), config.vacancy_capacity);
        let parent_service = ParentService::new(pool.clone(), config.rejection_limit);
        let teacher_service = TeacherService::new(pool.clone(), parent_service.clone());
        let admin_service = AdminService::new(pool.clone());
        let notification_service = NotificationService::new();

        Self {
            pool,
            vacancy_service,
            teacher_service,
            parent_service,
            admin_service,
            notification_service,
        }
    }
}
