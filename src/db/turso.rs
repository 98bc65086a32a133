use super::traits::{TodoRepository, UserRepository};
use crate::types::{AppError, Result, Todo, TodoFilter, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{params::Params, Builder, Connection, Database, Row, Value};

/// libsql-backed store for users and todos.
///
/// Holds a single shared connection: for `:memory:` databases every new
/// connection would open a separate, empty database.
pub struct TursoClient {
    _db: Database,
    conn: Connection,
}

impl TursoClient {
    /// Connects to a remote Turso database.
    pub async fn new_remote(url: String, auth_token: String) -> Result<Self> {
        let db = Builder::new_remote(url, auth_token)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Turso: {}", e)))?;

        Self::from_database(db).await
    }

    /// Opens (or creates) a local SQLite file.
    pub async fn new_local(path: &str) -> Result<Self> {
        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database {}: {}", path, e)))?;

        Self::from_database(db).await
    }

    /// Ephemeral in-memory database.
    pub async fn new_memory() -> Result<Self> {
        Self::new_local(":memory:").await
    }

    async fn from_database(db: Database) -> Result<Self> {
        let conn = db
            .connect()
            .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))?;

        let client = Self { _db: db, conn };
        client.initialize_schema().await?;

        Ok(client)
    }

    pub fn connection(&self) -> Result<Connection> {
        Ok(self.conn.clone())
    }

    async fn initialize_schema(&self) -> Result<()> {
        let conn = self.connection()?;

        // Users table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT UNIQUE NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create users table: {}", e)))?;

        // Todos table
        conn.execute(
            "CREATE TABLE IF NOT EXISTS todos (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                completed INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id)
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create todos table: {}", e)))?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_todos_user_id ON todos(user_id)",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create todos index: {}", e)))?;

        Ok(())
    }

    async fn first_row(&self, sql: &str, params: Params) -> Result<Option<Row>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(sql, params)
            .await
            .map_err(|e| AppError::Database(format!("Failed to query: {}", e)))?;

        rows.next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

fn db_err(e: libsql::Error) -> AppError {
    AppError::Database(e.to_string())
}

fn timestamp(millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| AppError::Database(format!("Invalid timestamp: {}", millis)))
}

fn user_from_row(row: &Row) -> Result<User> {
    Ok(User {
        id: row.get(0).map_err(db_err)?,
        username: row.get(1).map_err(db_err)?,
        email: row.get(2).map_err(db_err)?,
        password_hash: row.get(3).map_err(db_err)?,
        created_at: timestamp(row.get(4).map_err(db_err)?)?,
        updated_at: timestamp(row.get(5).map_err(db_err)?)?,
    })
}

fn todo_from_row(row: &Row) -> Result<Todo> {
    Ok(Todo {
        id: row.get(0).map_err(db_err)?,
        user_id: row.get(1).map_err(db_err)?,
        title: row.get(2).map_err(db_err)?,
        description: row.get(3).map_err(db_err)?,
        completed: row.get::<i64>(4).map_err(db_err)? != 0,
        created_at: timestamp(row.get(5).map_err(db_err)?)?,
        updated_at: timestamp(row.get(6).map_err(db_err)?)?,
    })
}

/// Unique-index violations surface as conflicts rather than 500s.
fn write_err(context: &str, e: libsql::Error) -> AppError {
    let message = e.to_string();
    if message.contains("UNIQUE constraint failed") {
        AppError::Conflict(format!("{}: already exists", context))
    } else {
        AppError::Database(format!("Failed to {}: {}", context, message))
    }
}

/// WHERE clause and positional arguments shared by list and count.
fn filter_clause(filter: &TodoFilter) -> (String, Vec<Value>) {
    let mut clause = String::from("user_id = ?");
    let mut args = vec![Value::Text(filter.user_id.clone())];

    if let Some(completed) = filter.completed {
        clause.push_str(" AND completed = ?");
        args.push(Value::Integer(i64::from(completed)));
    }

    // LIKE folds ASCII case only; other characters must match exactly.
    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search);
        clause.push_str(" AND (title LIKE ? OR description LIKE ?)");
        args.push(Value::Text(pattern.clone()));
        args.push(Value::Text(pattern));
    }

    (clause, args)
}

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at, updated_at";
const TODO_COLUMNS: &str = "id, user_id, title, description, completed, created_at, updated_at";

#[async_trait]
impl UserRepository for TursoClient {
    async fn create_user(&self, user: &User) -> Result<()> {
        let conn = self.connection()?;

        conn.execute(
            "INSERT INTO users (id, username, email, password_hash, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            (
                user.id.as_str(),
                user.username.as_str(),
                user.email.as_str(),
                user.password_hash.as_str(),
                user.created_at.timestamp_millis(),
                user.updated_at.timestamp_millis(),
            ),
        )
        .await
        .map_err(|e| write_err("create user", e))?;

        Ok(())
    }

    async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
        self.first_row(&sql, Params::Positional(vec![Value::Text(id.to_string())]))
            .await?
            .map(|row| user_from_row(&row))
            .transpose()
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS);
        self.first_row(&sql, Params::Positional(vec![Value::Text(email.to_string())]))
            .await?
            .map(|row| user_from_row(&row))
            .transpose()
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool> {
        let row = self
            .first_row(
                "SELECT 1 FROM users WHERE username = ? LIMIT 1",
                Params::Positional(vec![Value::Text(username.to_string())]),
            )
            .await?;
        Ok(row.is_some())
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        let row = self
            .first_row(
                "SELECT 1 FROM users WHERE email = ? LIMIT 1",
                Params::Positional(vec![Value::Text(email.to_string())]),
            )
            .await?;
        Ok(row.is_some())
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        let conn = self.connection()?;

        conn.execute(
            "UPDATE users SET username = ?, email = ?, password_hash = ?, updated_at = ?
             WHERE id = ?",
            (
                user.username.as_str(),
                user.email.as_str(),
                user.password_hash.as_str(),
                user.updated_at.timestamp_millis(),
                user.id.as_str(),
            ),
        )
        .await
        .map_err(|e| write_err("update user", e))?;

        Ok(())
    }
}

#[async_trait]
impl TodoRepository for TursoClient {
    async fn create_todo(&self, todo: &Todo) -> Result<()> {
        let conn = self.connection()?;

        conn.execute(
            "INSERT INTO todos (id, user_id, title, description, completed, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            (
                todo.id.as_str(),
                todo.user_id.as_str(),
                todo.title.as_str(),
                todo.description.as_str(),
                i64::from(todo.completed),
                todo.created_at.timestamp_millis(),
                todo.updated_at.timestamp_millis(),
            ),
        )
        .await
        .map_err(|e| write_err("create todo", e))?;

        Ok(())
    }

    async fn get_todo(&self, id: &str) -> Result<Option<Todo>> {
        let sql = format!("SELECT {} FROM todos WHERE id = ?", TODO_COLUMNS);
        self.first_row(&sql, Params::Positional(vec![Value::Text(id.to_string())]))
            .await?
            .map(|row| todo_from_row(&row))
            .transpose()
    }

    async fn fetch_owner(&self, id: &str) -> Result<Option<String>> {
        self.first_row(
            "SELECT user_id FROM todos WHERE id = ?",
            Params::Positional(vec![Value::Text(id.to_string())]),
        )
        .await?
        .map(|row| row.get::<String>(0).map_err(db_err))
        .transpose()
    }

    async fn list_todos(&self, filter: &TodoFilter) -> Result<Vec<Todo>> {
        let conn = self.connection()?;
        let (clause, mut args) = filter_clause(filter);
        args.push(Value::Integer(i64::from(filter.page_size)));
        args.push(Value::Integer(filter.offset()));

        let sql = format!(
            "SELECT {} FROM todos WHERE {} ORDER BY created_at DESC, rowid DESC LIMIT ? OFFSET ?",
            TODO_COLUMNS, clause
        );

        let mut rows = conn
            .query(&sql, Params::Positional(args))
            .await
            .map_err(|e| AppError::Database(format!("Failed to query todos: {}", e)))?;

        let mut todos = Vec::new();
        while let Some(row) = rows.next().await.map_err(db_err)? {
            todos.push(todo_from_row(&row)?);
        }

        Ok(todos)
    }

    async fn count_todos(&self, filter: &TodoFilter) -> Result<i64> {
        let (clause, args) = filter_clause(filter);
        let sql = format!("SELECT COUNT(*) FROM todos WHERE {}", clause);

        match self.first_row(&sql, Params::Positional(args)).await? {
            Some(row) => row.get::<i64>(0).map_err(db_err),
            None => Ok(0),
        }
    }

    async fn update_todo(&self, todo: &Todo) -> Result<()> {
        let conn = self.connection()?;

        conn.execute(
            "UPDATE todos SET title = ?, description = ?, completed = ?, updated_at = ?
             WHERE id = ?",
            (
                todo.title.as_str(),
                todo.description.as_str(),
                i64::from(todo.completed),
                todo.updated_at.timestamp_millis(),
                todo.id.as_str(),
            ),
        )
        .await
        .map_err(|e| write_err("update todo", e))?;

        Ok(())
    }

    async fn delete_todo(&self, id: &str) -> Result<()> {
        let conn = self.connection()?;

        conn.execute("DELETE FROM todos WHERE id = ?", [id])
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete todo: {}", e)))?;

        Ok(())
    }
}
