//! Application-defined SQL functions.
//!
//! # Invariants
//! - `regexp(pattern, text)` backs the `text REGEXP pattern` operator.
//! - Compiled patterns are cached per statement via SQLite auxiliary data.

use regex::Regex;
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;
use std::sync::Arc;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub(crate) fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "regexp",
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let regex: Arc<Regex> = ctx.get_or_create_aux(0, |pattern| -> Result<_, BoxError> {
                Ok(Regex::new(pattern.as_str()?)?)
            })?;
            let text = ctx
                .get_raw(1)
                .as_str()
                .map_err(|err| rusqlite::Error::UserFunctionError(err.into()))?;
            Ok(regex.is_match(text))
        },
    )
}
