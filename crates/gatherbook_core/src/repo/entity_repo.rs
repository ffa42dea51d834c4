//! Entity store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Own create/update/enumerate access to member, gathering and
//!   organization records.
//! - Resolve exact display strings to stable ids for the facade.
//!
//! # Invariants
//! - Creation applies no uniqueness check on display names; duplicates are
//!   legal and returned together by exact-match lookup.
//! - Enumeration order is creation order (`rowid ASC`).
//! - Gathering updates leave omitted fields untouched.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::entity::{
    validate_display_name, EntityId, EntityKind, EntityValidationError, Gathering, Member,
    Organization,
};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for storage and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(EntityValidationError),
    Db(DbError),
    NotFound { kind: EntityKind, uuid: EntityId },
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { kind, uuid } => write!(f, "{kind} not found: {uuid}"),
            Self::InvalidData(message) => write!(f, "invalid stored entity data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{column}` in table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EntityValidationError> for RepoError {
    fn from(value: EntityValidationError) -> Self {
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

/// Repository interface for the entity store.
pub trait EntityRepository {
    /// Creates one member and returns its stable id.
    fn create_member(&self, member: &Member) -> RepoResult<EntityId>;
    /// Creates one gathering and returns its stable id.
    fn create_gathering(&self, gathering: &Gathering) -> RepoResult<EntityId>;
    /// Creates one organization and returns its stable id.
    fn create_organization(&self, organization: &Organization) -> RepoResult<EntityId>;
    /// Updates a gathering in place; `None` fields are left unchanged.
    fn update_gathering(
        &self,
        id: EntityId,
        new_title: Option<&str>,
        new_date: Option<&str>,
    ) -> RepoResult<()>;
    /// Gets one gathering by stable id.
    fn get_gathering(&self, id: EntityId) -> RepoResult<Option<Gathering>>;
    /// Resolves an exact display string to the ids carrying it, in creation
    /// order. Duplicate display names all come back; callers decide what a
    /// multi-id result means.
    fn ids_by_display_name(&self, kind: EntityKind, text: &str) -> RepoResult<Vec<EntityId>>;
    /// Enumerates all display names of one kind in creation order.
    fn display_names(&self, kind: EntityKind) -> RepoResult<Vec<String>>;
}

/// SQLite-backed entity store.
pub struct SqliteEntityRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEntityRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_entity_tables_ready(conn)?;
        Ok(Self { conn })
    }
}

impl EntityRepository for SqliteEntityRepository<'_> {
    fn create_member(&self, member: &Member) -> RepoResult<EntityId> {
        member.validate()?;

        self.conn.execute(
            "INSERT INTO members (uuid, name, email) VALUES (?1, ?2, ?3);",
            params![
                member.uuid.to_string(),
                member.name.as_str(),
                member.email.as_str(),
            ],
        )?;

        Ok(member.uuid)
    }

    fn create_gathering(&self, gathering: &Gathering) -> RepoResult<EntityId> {
        gathering.validate()?;

        self.conn.execute(
            "INSERT INTO gatherings (uuid, title, location, event_date)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                gathering.uuid.to_string(),
                gathering.title.as_str(),
                gathering.location.as_str(),
                gathering.date.as_str(),
            ],
        )?;

        Ok(gathering.uuid)
    }

    fn create_organization(&self, organization: &Organization) -> RepoResult<EntityId> {
        organization.validate()?;

        self.conn.execute(
            "INSERT INTO organizations (uuid, title) VALUES (?1, ?2);",
            params![
                organization.uuid.to_string(),
                organization.title.as_str(),
            ],
        )?;

        Ok(organization.uuid)
    }

    fn update_gathering(
        &self,
        id: EntityId,
        new_title: Option<&str>,
        new_date: Option<&str>,
    ) -> RepoResult<()> {
        if let Some(title) = new_title {
            validate_display_name(EntityKind::Gathering, title)?;
        }

        let changed = self.conn.execute(
            "UPDATE gatherings
             SET
                title = COALESCE(?2, title),
                event_date = COALESCE(?3, event_date)
             WHERE uuid = ?1;",
            params![id.to_string(), new_title, new_date],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: EntityKind::Gathering,
                uuid: id,
            });
        }

        Ok(())
    }

    fn get_gathering(&self, id: EntityId) -> RepoResult<Option<Gathering>> {
        let mut stmt = self.conn.prepare(
            "SELECT uuid, title, location, event_date
             FROM gatherings
             WHERE uuid = ?1;",
        )?;

        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_gathering_row(row)?));
        }

        Ok(None)
    }

    fn ids_by_display_name(&self, kind: EntityKind, text: &str) -> RepoResult<Vec<EntityId>> {
        let (table, column) = kind_table(kind);
        let mut stmt = self.conn.prepare(&format!(
            "SELECT uuid FROM {table} WHERE {column} = ?1 ORDER BY rowid ASC;"
        ))?;

        let mut rows = stmt.query([text])?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            let uuid_text: String = row.get(0)?;
            ids.push(parse_uuid(table, &uuid_text)?);
        }

        Ok(ids)
    }

    fn display_names(&self, kind: EntityKind) -> RepoResult<Vec<String>> {
        let (table, column) = kind_table(kind);
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {column} FROM {table} ORDER BY rowid ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut names = Vec::new();
        while let Some(row) = rows.next()? {
            names.push(row.get::<_, String>(0)?);
        }

        Ok(names)
    }
}

fn kind_table(kind: EntityKind) -> (&'static str, &'static str) {
    match kind {
        EntityKind::Member => ("members", "name"),
        EntityKind::Gathering => ("gatherings", "title"),
        EntityKind::Organization => ("organizations", "title"),
    }
}

pub(crate) fn parse_member_row(row: &Row<'_>) -> RepoResult<Member> {
    let uuid_text: String = row.get("uuid")?;
    Ok(Member {
        uuid: parse_uuid("members", &uuid_text)?,
        name: row.get("name")?,
        email: row.get("email")?,
    })
}

pub(crate) fn parse_gathering_row(row: &Row<'_>) -> RepoResult<Gathering> {
    let uuid_text: String = row.get("uuid")?;
    Ok(Gathering {
        uuid: parse_uuid("gatherings", &uuid_text)?,
        title: row.get("title")?,
        location: row.get("location")?,
        date: row.get("event_date")?,
    })
}

fn parse_uuid(table: &str, value: &str) -> RepoResult<EntityId> {
    Uuid::parse_str(value).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{value}` in {table}.uuid"))
    })
}

fn ensure_entity_tables_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for (table, columns) in [
        ("members", &["uuid", "name", "email"][..]),
        ("gatherings", &["uuid", "title", "location", "event_date"][..]),
        ("organizations", &["uuid", "title"][..]),
    ] {
        ensure_table_with_columns(conn, table, columns)?;
    }

    Ok(())
}

pub(crate) fn ensure_table_with_columns(
    conn: &Connection,
    table: &'static str,
    columns: &[&'static str],
) -> RepoResult<()> {
    if !table_exists(conn, table)? {
        return Err(RepoError::MissingRequiredTable(table));
    }

    for column in columns {
        if !table_has_column(conn, table, column)? {
            return Err(RepoError::MissingRequiredColumn { table, column });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
