//! Relationship index contracts and SQLite implementation.
//!
//! # Responsibility
//! - Maintain the attendance (member-gathering) and affiliation
//!   (gathering-organization) link sets.
//! - Answer membership queries in link-insertion order.
//!
//! # Invariants
//! - Linking is idempotent; re-linking an existing pair is a no-op.
//! - Every link references entities that exist in the entity store; unknown
//!   ids fail with `NotFound` before any row is written.
//! - This layer only ever receives stable ids. Resolving display text is the
//!   facade's job.

use crate::model::entity::{EntityId, EntityKind, Gathering, Member};
use crate::repo::entity_repo::{
    ensure_table_with_columns, parse_gathering_row, parse_member_row, RepoError, RepoResult,
    SqliteEntityRepository,
};
use rusqlite::{params, Connection};

/// Repository interface for the relationship index.
pub trait LinkRepository {
    /// Records that a member attends a gathering. Idempotent.
    fn link_attendance(&self, member_id: EntityId, gathering_id: EntityId) -> RepoResult<()>;
    /// Records that a gathering belongs to an organization. Idempotent.
    fn link_affiliation(
        &self,
        gathering_id: EntityId,
        organization_id: EntityId,
    ) -> RepoResult<()>;
    /// Lists members linked to a gathering, in link-insertion order.
    fn members_of(&self, gathering_id: EntityId) -> RepoResult<Vec<Member>>;
    /// Lists gatherings linked to an organization, in link-insertion order.
    fn gatherings_of(&self, organization_id: EntityId) -> RepoResult<Vec<Gathering>>;
}

/// SQLite-backed relationship index.
pub struct SqliteLinkRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLinkRepository<'conn> {
    /// Constructs an index from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let _ = SqliteEntityRepository::try_new(conn)?;
        ensure_link_tables_ready(conn)?;
        Ok(Self { conn })
    }
}

impl LinkRepository for SqliteLinkRepository<'_> {
    fn link_attendance(&self, member_id: EntityId, gathering_id: EntityId) -> RepoResult<()> {
        ensure_entity_exists(self.conn, EntityKind::Member, member_id)?;
        ensure_entity_exists(self.conn, EntityKind::Gathering, gathering_id)?;

        // UNIQUE (member_uuid, gathering_uuid) turns re-links into no-ops.
        self.conn.execute(
            "INSERT OR IGNORE INTO attendance (member_uuid, gathering_uuid)
             VALUES (?1, ?2);",
            params![member_id.to_string(), gathering_id.to_string()],
        )?;

        Ok(())
    }

    fn link_affiliation(
        &self,
        gathering_id: EntityId,
        organization_id: EntityId,
    ) -> RepoResult<()> {
        ensure_entity_exists(self.conn, EntityKind::Gathering, gathering_id)?;
        ensure_entity_exists(self.conn, EntityKind::Organization, organization_id)?;

        self.conn.execute(
            "INSERT OR IGNORE INTO affiliation (gathering_uuid, organization_uuid)
             VALUES (?1, ?2);",
            params![gathering_id.to_string(), organization_id.to_string()],
        )?;

        Ok(())
    }

    fn members_of(&self, gathering_id: EntityId) -> RepoResult<Vec<Member>> {
        ensure_entity_exists(self.conn, EntityKind::Gathering, gathering_id)?;

        let mut stmt = self.conn.prepare(
            "SELECT m.uuid AS uuid, m.name AS name, m.email AS email
             FROM attendance a
             INNER JOIN members m ON m.uuid = a.member_uuid
             WHERE a.gathering_uuid = ?1
             ORDER BY a.id ASC;",
        )?;

        let mut rows = stmt.query([gathering_id.to_string()])?;
        let mut members = Vec::new();
        while let Some(row) = rows.next()? {
            members.push(parse_member_row(row)?);
        }

        Ok(members)
    }

    fn gatherings_of(&self, organization_id: EntityId) -> RepoResult<Vec<Gathering>> {
        ensure_entity_exists(self.conn, EntityKind::Organization, organization_id)?;

        let mut stmt = self.conn.prepare(
            "SELECT g.uuid AS uuid, g.title AS title, g.location AS location,
                    g.event_date AS event_date
             FROM affiliation a
             INNER JOIN gatherings g ON g.uuid = a.gathering_uuid
             WHERE a.organization_uuid = ?1
             ORDER BY a.id ASC;",
        )?;

        let mut rows = stmt.query([organization_id.to_string()])?;
        let mut gatherings = Vec::new();
        while let Some(row) = rows.next()? {
            gatherings.push(parse_gathering_row(row)?);
        }

        Ok(gatherings)
    }
}

fn ensure_entity_exists(conn: &Connection, kind: EntityKind, id: EntityId) -> RepoResult<()> {
    let table = match kind {
        EntityKind::Member => "members",
        EntityKind::Gathering => "gatherings",
        EntityKind::Organization => "organizations",
    };

    let exists: i64 = conn.query_row(
        &format!(
            "SELECT EXISTS(
                SELECT 1 FROM {table} WHERE uuid = ?1
            );"
        ),
        [id.to_string()],
        |row| row.get(0),
    )?;

    if exists != 1 {
        return Err(RepoError::NotFound { kind, uuid: id });
    }

    Ok(())
}

fn ensure_link_tables_ready(conn: &Connection) -> RepoResult<()> {
    for (table, columns) in [
        ("attendance", &["id", "member_uuid", "gathering_uuid"][..]),
        (
            "affiliation",
            &["id", "gathering_uuid", "organization_uuid"][..],
        ),
    ] {
        ensure_table_with_columns(conn, table, columns)?;
    }

    Ok(())
}
