use crate::api::handlers::{auth, health, todos, users};
use crate::auth::middleware::auth_middleware;
use crate::types::{
    CreateTodoRequest, LoginRequest, LoginResponse, PaginationMeta, RegisterRequest,
    TodoListResponse, TodoResponse, UpdatePasswordRequest, UpdateProfileRequest,
    UpdateTodoRequest, UserResponse,
};
use crate::AppState;
use axum::{
    middleware,
    routing::{get, patch, post, put},
    Json, Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// OpenAPI document for every route below.
#[derive(OpenApi)]
#[openapi(
    info(title = "todo-server", description = "Multi-user todo API"),
    paths(
        auth::register,
        auth::login,
        users::get_me,
        users::update_me,
        users::update_password,
        todos::create_todo,
        todos::list_todos,
        todos::get_todo,
        todos::update_todo,
        todos::complete_todo,
        todos::delete_todo,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        LoginResponse,
        UpdateProfileRequest,
        UpdatePasswordRequest,
        CreateTodoRequest,
        UpdateTodoRequest,
        UserResponse,
        TodoResponse,
        TodoListResponse,
        PaginationMeta,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "users", description = "The caller's profile"),
        (name = "todos", description = "The caller's todos")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Builds the full application router.
///
/// Everything under `protected_routes` passes through [`auth_middleware`]
/// before any handler or repository code runs.
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        // Public routes (no auth required)
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login));

    let protected_routes = Router::new()
        // Profile
        .route("/users/me", get(users::get_me).put(users::update_me))
        .route("/users/me/password", put(users::update_password))
        // Todos
        .route("/todos", post(todos::create_todo).get(todos::list_todos))
        .route(
            "/todos/{id}",
            get(todos::get_todo)
                .put(todos::update_todo)
                .delete(todos::delete_todo),
        )
        .route("/todos/{id}/complete", patch(todos::complete_todo))
        .layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            auth_middleware,
        ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(health::index))
        .route("/health", get(health::health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api", public_routes.merge(protected_routes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
