use axum::{
    extract::DefaultBodyLimit,
    handler::Handler,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, patch, post, put},
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;
use tuition_backend::{
    config::{get_config, init_config},
    database::pool::create_pool,
    middleware::{auth, cors, rate_limit},
    routes, utils, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    let pool = create_pool().await?;
    sqlx::migrate!("./migrations").run(&pool).await?;

    let app_state = AppState::new(pool);

    if let (Some(email), Some(password)) = (
        config.initial_admin_email.as_deref(),
        config.initial_admin_password.as_deref(),
    ) {
        let password_hash = utils::crypto::hash_password(password)
            .map_err(|e| anyhow::anyhow!("failed to hash initial admin password: {}", e))?;
        app_state
            .admin_service
            .ensure_admin(email, &password_hash)
            .await?;
    }

    let base_routes = Router::new()
        .route("/health", get(routes::health::health))
        .route("/ws", get(routes::ws::observer_socket));

    let public_api = Router::new()
        .route("/api/teacher-apply/signup", post(routes::teacher::signup))
        .route("/api/teacher-apply/login", post(routes::teacher::login))
        .route(
            "/api/teacher-apply/check-registration",
            get(routes::teacher::check_registration),
        )
        .route(
            "/api/teacher-apply/available-vacancies",
            get(routes::teacher::available_vacancies),
        )
        .route("/api/admin/login", post(routes::admin::login))
        .route(
            "/api/parents/submit",
            post(routes::parent::submit_application),
        )
        .layer(from_fn_with_state(
            rate_limit::new_rps_state(config.public_rps),
            rate_limit::rps_middleware,
        ));

    let teacher_api = Router::new()
        .route("/api/teacher-apply/profile", get(routes::teacher::profile))
        .route(
            "/api/teacher-apply/my-applications",
            get(routes::teacher::my_applications),
        )
        .layer(from_fn(auth::require_teacher))
        .layer(from_fn_with_state(
            rate_limit::new_rps_state(config.public_rps),
            rate_limit::rps_middleware,
        ));

    // The vacancy family mixes public reads, teacher-side applies and admin
    // mutations on the same paths, so authorization is attached per handler.
    let vacancy_api = Router::new()
        .route(
            "/api/vacancies",
            get(routes::vacancy::list_vacancies)
                .post(routes::vacancy::create_vacancy.layer(from_fn(auth::require_admin))),
        )
        .route(
            "/api/vacancies/featured",
            get(routes::vacancy::list_featured_vacancies),
        )
        .route(
            "/api/vacancies/:id",
            get(routes::vacancy::get_vacancy)
                .put(routes::vacancy::update_vacancy.layer(from_fn(auth::require_admin)))
                .delete(routes::vacancy::delete_vacancy.layer(from_fn(auth::require_admin))),
        )
        .route(
            "/api/vacancies/:id/status",
            patch(routes::vacancy::update_vacancy_status.layer(from_fn(auth::require_admin))),
        )
        .route(
            "/api/vacancies/:id/applicants",
            get(routes::vacancy::list_applicants.layer(from_fn(auth::require_admin))),
        )
        .route(
            "/api/vacancies/:id/apply",
            post(routes::vacancy::apply_for_vacancy.layer(from_fn(auth::require_teacher))),
        )
        .route(
            "/api/vacancies/:id/applications/:application_id/status",
            put(routes::vacancy::update_application_status.layer(from_fn(auth::require_admin))),
        )
        .layer(from_fn_with_state(
            rate_limit::new_rps_state(config.public_rps),
            rate_limit::rps_middleware,
        ));

    let admin_api = Router::new()
        .route("/api/admin/stats", get(routes::admin::dashboard_stats))
        .route(
            "/api/admin/applications",
            get(routes::admin::list_applications),
        )
        .route(
            "/api/teacher-apply/all",
            get(routes::teacher::list_teachers),
        )
        .route(
            "/api/teacher-apply/status/:status",
            get(routes::teacher::list_teachers_by_status),
        )
        .route(
            "/api/teacher-apply/:id/status",
            put(routes::teacher::update_teacher_status),
        )
        .route(
            "/api/teacher-apply/accept/:teacher_id/:vacancy_id",
            put(routes::teacher::accept_application),
        )
        .route(
            "/api/teacher-apply/reject/:teacher_id/:vacancy_id",
            put(routes::teacher::reject_application),
        )
        .route(
            "/api/teacher-apply/vacancy-status/:parent_id",
            put(routes::teacher::update_parent_vacancy_status),
        )
        .route("/api/parents/all", get(routes::parent::list_applications))
        .route(
            "/api/parents/delete/:id",
            delete(routes::parent::delete_application),
        )
        .route(
            "/api/parents/:id/status",
            put(routes::parent::update_status),
        )
        .route(
            "/api/parents/:id/reject",
            put(routes::parent::record_rejection),
        )
        .layer(from_fn(auth::require_admin))
        .layer(from_fn_with_state(
            rate_limit::new_rps_state(config.admin_rps),
            rate_limit::rps_middleware,
        ));

    let app = base_routes
        .merge(public_api)
        .merge(teacher_api)
        .merge(vacancy_api)
        .merge(admin_api)
        .with_state(app_state)
        .layer(cors::permissive_cors())
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(2 * 1024 * 1024));

    let addr: SocketAddr = config.server_address.parse()?;
    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
