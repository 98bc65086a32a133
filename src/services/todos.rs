//! Todo use cases.
//!
//! Every operation on an existing todo follows the same order: load it,
//! report `NotFound` if absent, ask the ownership guard, and only then read
//! or mutate. A denied caller never reaches a write.

use crate::auth::guard::{authorize, ensure_owner};
use crate::db::TodoRepository;
use crate::types::{AppError, Identity, ListTodosQuery, Page, Result, Todo, TodoFilter};
use std::sync::Arc;
use uuid::Uuid;

pub struct TodoService {
    todos: Arc<dyn TodoRepository>,
}

fn not_found() -> AppError {
    AppError::NotFound("Todo not found".to_string())
}

/// Falls back to the default when a page parameter is absent, unparseable
/// or below 1.
fn page_param(value: Option<&str>, default: u32) -> u32 {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v >= 1)
        .unwrap_or(default)
}

/// Accepts the usual boolean spellings; anything else means "no filter".
fn flag_param(value: Option<&str>) -> Option<bool> {
    match value?.trim() {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

impl TodoService {
    pub fn new(todos: Arc<dyn TodoRepository>) -> Self {
        Self { todos }
    }

    pub async fn create(&self, identity: &Identity, title: &str, description: &str) -> Result<Todo> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::InvalidInput("Title is required".to_string()));
        }

        let todo = Todo::new(
            Uuid::new_v4().to_string(),
            identity.subject_id.clone(),
            title.to_string(),
            description.to_string(),
        );
        self.todos.create_todo(&todo).await?;

        tracing::debug!(todo_id = %todo.id, user_id = %todo.user_id, "created todo");
        Ok(todo)
    }

    /// The caller's todos only, newest first.
    pub async fn list(&self, identity: &Identity, query: ListTodosQuery) -> Result<Page<Todo>> {
        let filter = TodoFilter {
            user_id: identity.subject_id.clone(),
            completed: flag_param(query.completed.as_deref()),
            search: query.search.filter(|s| !s.trim().is_empty()),
            page: page_param(query.page.as_deref(), TodoFilter::DEFAULT_PAGE),
            page_size: page_param(query.page_size.as_deref(), TodoFilter::DEFAULT_PAGE_SIZE),
        };

        let items = self.todos.list_todos(&filter).await?;
        let total = self.todos.count_todos(&filter).await?;

        Ok(Page {
            items,
            total,
            page: filter.page,
            page_size: filter.page_size,
        })
    }

    async fn load_owned(&self, identity: &Identity, id: &str, action: &str) -> Result<Todo> {
        let todo = self.todos.get_todo(id).await?.ok_or_else(not_found)?;
        ensure_owner(identity, &todo, action)?;
        Ok(todo)
    }

    pub async fn get(&self, identity: &Identity, id: &str) -> Result<Todo> {
        self.load_owned(identity, id, "access this todo").await
    }

    pub async fn update(
        &self,
        identity: &Identity,
        id: &str,
        title: &str,
        description: &str,
        completed: bool,
    ) -> Result<Todo> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::InvalidInput("Title is required".to_string()));
        }

        let mut todo = self.load_owned(identity, id, "update this todo").await?;
        todo.update(title.to_string(), description.to_string(), completed);
        self.todos.update_todo(&todo).await?;

        Ok(todo)
    }

    pub async fn complete(&self, identity: &Identity, id: &str) -> Result<Todo> {
        let mut todo = self.load_owned(identity, id, "complete this todo").await?;
        todo.mark_completed();
        self.todos.update_todo(&todo).await?;

        Ok(todo)
    }

    pub async fn delete(&self, identity: &Identity, id: &str) -> Result<()> {
        let owner = self.todos.fetch_owner(id).await?.ok_or_else(not_found)?;

        if !authorize(identity, &owner).is_allowed() {
            tracing::debug!(subject = %identity.subject_id, todo_id = id, "delete denied");
            return Err(AppError::Forbidden(
                "Not authorized to delete this todo".to_string(),
            ));
        }

        self.todos.delete_todo(id).await?;
        tracing::debug!(todo_id = id, "deleted todo");
        Ok(())
    }
}
