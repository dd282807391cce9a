//! Tutorial repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over canonical `tutorials` storage.
//! - Keep SQL details inside core persistence boundary.
//!
//! # Invariants
//! - Write paths validate input before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - List order is creation order (oldest first).

use crate::db::DbError;
use crate::model::tutorial::{
    NewTutorial, Tutorial, TutorialId, TutorialPatch, TutorialValidationError,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const TUTORIAL_SELECT_SQL: &str = "SELECT
    id,
    title,
    description,
    published,
    created_at,
    updated_at
FROM tutorials";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for tutorial persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(TutorialValidationError),
    Db(DbError),
    NotFound(TutorialId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "tutorial not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted tutorial data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<TutorialValidationError> for RepoError {
    fn from(value: TutorialValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing tutorials.
#[derive(Debug, Clone, Default)]
pub struct TutorialListQuery {
    /// Case-insensitive literal substring filter on `title`. Blank means none.
    pub title: Option<String>,
    pub published: Option<bool>,
    pub limit: Option<u32>,
    pub offset: u32,
}

impl TutorialListQuery {
    pub fn by_title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn published() -> Self {
        Self {
            published: Some(true),
            ..Self::default()
        }
    }
}

/// Repository interface for tutorial CRUD operations.
pub trait TutorialRepository {
    fn create_tutorial(&self, tutorial: &NewTutorial) -> RepoResult<TutorialId>;
    fn get_tutorial(&self, id: TutorialId) -> RepoResult<Option<Tutorial>>;
    fn list_tutorials(&self, query: &TutorialListQuery) -> RepoResult<Vec<Tutorial>>;
    fn update_tutorial(&self, id: TutorialId, patch: &TutorialPatch) -> RepoResult<()>;
    fn delete_tutorial(&self, id: TutorialId) -> RepoResult<()>;
    fn delete_all_tutorials(&self) -> RepoResult<u64>;
}

/// SQLite-backed tutorial repository.
pub struct SqliteTutorialRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTutorialRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl TutorialRepository for SqliteTutorialRepository<'_> {
    fn create_tutorial(&self, tutorial: &NewTutorial) -> RepoResult<TutorialId> {
        tutorial.validate()?;

        self.conn.execute(
            "INSERT INTO tutorials (
                id,
                title,
                description,
                published
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                tutorial.id.to_string(),
                tutorial.title.as_str(),
                tutorial.description.as_str(),
                bool_to_int(tutorial.published),
            ],
        )?;

        Ok(tutorial.id)
    }

    fn get_tutorial(&self, id: TutorialId) -> RepoResult<Option<Tutorial>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TUTORIAL_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_tutorial_row(row)?));
        }

        Ok(None)
    }

    fn list_tutorials(&self, query: &TutorialListQuery) -> RepoResult<Vec<Tutorial>> {
        let mut sql = format!("{TUTORIAL_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(pattern) = query.title.as_deref().and_then(title_filter_pattern) {
            sql.push_str(" AND title REGEXP ?");
            bind_values.push(Value::Text(pattern));
        }

        if let Some(published) = query.published {
            sql.push_str(" AND published = ?");
            bind_values.push(Value::Integer(bool_to_int(published)));
        }

        sql.push_str(" ORDER BY created_at ASC, rowid ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if query.offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(i64::from(query.offset)));
            }
        } else if query.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(i64::from(query.offset)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut tutorials = Vec::new();

        while let Some(row) = rows.next()? {
            tutorials.push(parse_tutorial_row(row)?);
        }

        Ok(tutorials)
    }

    fn update_tutorial(&self, id: TutorialId, patch: &TutorialPatch) -> RepoResult<()> {
        patch.validate()?;

        // COALESCE keeps the stored value for every field the patch omits.
        let changed = self.conn.execute(
            "UPDATE tutorials
             SET
                title = COALESCE(?1, title),
                description = COALESCE(?2, description),
                published = COALESCE(?3, published),
                updated_at = MAX(created_at, CAST(strftime('%s', 'now') AS INTEGER) * 1000)
             WHERE id = ?4;",
            params![
                patch.title.as_deref(),
                patch.description.as_deref(),
                patch.published.map(bool_to_int),
                id.to_string(),
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_tutorial(&self, id: TutorialId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tutorials WHERE id = ?1;", [id.to_string()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn delete_all_tutorials(&self) -> RepoResult<u64> {
        let deleted = self.conn.execute("DELETE FROM tutorials;", [])?;
        Ok(deleted as u64)
    }
}

/// Builds the `REGEXP` pattern for a title filter.
///
/// Returns `None` for blank input. Otherwise the text is escaped as sent,
/// surrounding whitespace included, so it always matches literally.
fn title_filter_pattern(title: &str) -> Option<String> {
    if title.trim().is_empty() {
        return None;
    }
    Some(format!("(?i){}", regex::escape(title)))
}

fn parse_tutorial_row(row: &Row<'_>) -> RepoResult<Tutorial> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{id_text}` in tutorials.id"))
    })?;

    let published = match row.get::<_, i64>("published")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid published value `{other}` in tutorials.published"
            )));
        }
    };

    Ok(Tutorial {
        id,
        title: row.get("title")?,
        description: row.get("description")?,
        published,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
