/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskboard_api::{app::{build_router, AppState}, config::Config};
/// use taskboard_shared::{db::pool::{create_pool, DatabaseConfig}, store::PgStore};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig::from_url(&config.database.url)).await?;
/// let state = AppState::new(Arc::new(PgStore::new(pool)), config);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, build_router(state)).await?;
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use taskboard_shared::{
    services::{
        membership::MembershipManager, projects::ProjectService, tasks::TaskLifecycle,
        users::UserService,
    },
    store::Store,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned into every handler through Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Storage backend
    pub store: Arc<dyn Store>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub fn tasks(&self) -> TaskLifecycle<'_> {
        TaskLifecycle::new(self.store.as_ref())
    }

    pub fn projects(&self) -> ProjectService<'_> {
        ProjectService::new(self.store.as_ref())
    }

    pub fn membership(&self) -> MembershipManager<'_> {
        MembershipManager::new(self.store.as_ref())
    }

    pub fn users(&self) -> UserService<'_> {
        UserService::new(self.store.as_ref(), self.config.auth.password_scheme)
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET    /health
/// ├── /auth
/// │   ├── POST   /login
/// │   ├── POST   /register
/// │   └── GET    /register/check/:login
/// ├── /projects
/// │   ├── GET    /?ids=1,2,3
/// │   ├── POST   /new
/// │   ├── GET    /:id/tasks
/// │   └── DELETE /:id
/// ├── /tasks
/// │   ├── POST   /new
/// │   ├── GET    /:id
/// │   ├── DELETE /:id
/// │   ├── POST   /:id/updateStatus
/// │   └── POST   /:id/assign?empl_id=
/// └── /profile
///     ├── GET    /:id
///     ├── POST   /:id/updateAvatar
///     ├── POST   /:id/addProject?project_id=
///     └── DELETE /:id/removeProject?project_id=
/// ```
///
/// Requests pass through tracing first, then CORS.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let auth_routes = Router::new()
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/register/check/:login", get(routes::auth::check_login));

    let project_routes = Router::new()
        .route("/projects", get(routes::projects::project_names))
        .route("/projects/", get(routes::projects::project_names))
        .route("/projects/new", post(routes::projects::create_project))
        .route("/projects/:id/tasks", get(routes::projects::project_tasks))
        .route("/projects/:id", delete(routes::projects::delete_project));

    let task_routes = Router::new()
        .route("/tasks/new", post(routes::tasks::create_task))
        .route(
            "/tasks/:id",
            get(routes::tasks::get_task).delete(routes::tasks::delete_task),
        )
        .route("/tasks/:id/updateStatus", post(routes::tasks::update_status))
        .route("/tasks/:id/assign", post(routes::tasks::assign_task))
        .route("/tasks/:id/assign/", post(routes::tasks::assign_task));

    let profile_routes = Router::new()
        .route("/profile/:id", get(routes::profile::get_profile))
        .route("/profile/:id/updateAvatar", post(routes::profile::update_avatar))
        .route("/profile/:id/addProject", post(routes::profile::add_project))
        .route("/profile/:id/removeProject", delete(routes::profile::remove_project));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .merge(auth_routes)
        .merge(project_routes)
        .merge(task_routes)
        .merge(profile_routes)
        .layer(cors_layer(&state.config))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

/// Any origin when none are configured, otherwise the configured list
fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if config.api.cors_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    layer
        .allow_origin(origins)
        .max_age(std::time::Duration::from_secs(3600))
}
