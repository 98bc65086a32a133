//! Todo CRUD handlers.
//!
//! Ownership is enforced in [`TodoService`](crate::services::TodoService);
//! handlers only validate input and shape responses.

use crate::{
    api::validation,
    auth::middleware::AuthUser,
    types::{
        CreateTodoRequest, DataResponse, ListTodosQuery, Result, TodoListResponse, TodoResponse,
        UpdateTodoRequest,
    },
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

/// Create a todo owned by the caller.
#[utoipa::path(
    post,
    path = "/api/todos",
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "Todo created", body = DataResponse<TodoResponse>),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "todos",
    security(("bearer" = []))
)]
pub async fn create_todo(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Json(payload): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<DataResponse<TodoResponse>>)> {
    validation::title(&payload.title)?;

    let todo = state
        .todos
        .create(&identity, &payload.title, &payload.description)
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(todo.into()))))
}

/// List the caller's todos, newest first.
#[utoipa::path(
    get,
    path = "/api/todos",
    params(ListTodosQuery),
    responses(
        (status = 200, description = "One page of todos", body = TodoListResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "todos",
    security(("bearer" = []))
)]
pub async fn list_todos(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Query(query): Query<ListTodosQuery>,
) -> Result<Json<TodoListResponse>> {
    let page = state.todos.list(&identity, query).await?;
    Ok(Json(page.into()))
}

/// Get a single todo.
#[utoipa::path(
    get,
    path = "/api/todos/{id}",
    params(("id" = String, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Todo", body = DataResponse<TodoResponse>),
        (status = 400, description = "Invalid todo ID"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Todo belongs to another user"),
        (status = 404, description = "Todo not found")
    ),
    tag = "todos",
    security(("bearer" = []))
)]
pub async fn get_todo(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<TodoResponse>>> {
    let id = validation::todo_id(&id)?;
    let todo = state.todos.get(&identity, &id).await?;
    Ok(Json(DataResponse::new(todo.into())))
}

/// Replace a todo's title, description and completion state.
#[utoipa::path(
    put,
    path = "/api/todos/{id}",
    params(("id" = String, Path, description = "Todo ID")),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "Todo updated", body = DataResponse<TodoResponse>),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Todo belongs to another user"),
        (status = 404, description = "Todo not found")
    ),
    tag = "todos",
    security(("bearer" = []))
)]
pub async fn update_todo(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateTodoRequest>,
) -> Result<Json<DataResponse<TodoResponse>>> {
    let id = validation::todo_id(&id)?;
    validation::title(&payload.title)?;

    let todo = state
        .todos
        .update(
            &identity,
            &id,
            &payload.title,
            &payload.description,
            payload.completed,
        )
        .await?;

    Ok(Json(DataResponse::new(todo.into())))
}

/// Mark a todo as completed.
#[utoipa::path(
    patch,
    path = "/api/todos/{id}/complete",
    params(("id" = String, Path, description = "Todo ID")),
    responses(
        (status = 200, description = "Todo completed", body = DataResponse<TodoResponse>),
        (status = 400, description = "Invalid todo ID"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Todo belongs to another user"),
        (status = 404, description = "Todo not found")
    ),
    tag = "todos",
    security(("bearer" = []))
)]
pub async fn complete_todo(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<TodoResponse>>> {
    let id = validation::todo_id(&id)?;
    let todo = state.todos.complete(&identity, &id).await?;
    Ok(Json(DataResponse::new(todo.into())))
}

/// Delete a todo.
#[utoipa::path(
    delete,
    path = "/api/todos/{id}",
    params(("id" = String, Path, description = "Todo ID")),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 400, description = "Invalid todo ID"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Todo belongs to another user"),
        (status = 404, description = "Todo not found")
    ),
    tag = "todos",
    security(("bearer" = []))
)]
pub async fn delete_todo(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = validation::todo_id(&id)?;
    state.todos.delete(&identity, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
