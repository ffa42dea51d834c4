//! Gathering manager facade.
//!
//! # Responsibility
//! - Translate user-facing display strings into stable entity ids.
//! - Compose entity store, relationship index and name search into the
//!   operation surface consumed by presentation layers.
//!
//! # Invariants
//! - Callers only ever see plain strings, ids and lists, never row handles.
//! - A display string resolving to more than one entity is reported as
//!   ambiguous, never silently picked.
//! - Every failure is recoverable by retrying with different input.

use crate::db::{open_store, DbError};
use crate::model::entity::{
    EntityId, EntityKind, EntityValidationError, Gathering, Member, Organization,
};
use crate::repo::entity_repo::{EntityRepository, RepoError, SqliteEntityRepository};
use crate::repo::link_repo::{LinkRepository, SqliteLinkRepository};
use crate::search::names::search_names;
use log::{debug, info, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ManagerResult<T> = Result<T, ManagerError>;

/// Facade-level error surfaced to presentation layers.
#[derive(Debug)]
pub enum ManagerError {
    /// A required display field is empty or whitespace-only.
    InvalidArgument {
        kind: EntityKind,
        field: &'static str,
    },
    /// The display string matched no stored entity of that kind.
    NotFound { kind: EntityKind, text: String },
    /// The display string matched more than one stored entity.
    AmbiguousReference {
        kind: EntityKind,
        text: String,
        matches: usize,
    },
    /// Storage-layer failure.
    Repo(RepoError),
}

impl Display for ManagerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument { kind, field } => {
                write!(f, "{kind} {field} must not be blank")
            }
            Self::NotFound { kind, text } => write!(f, "no {kind} named `{text}`"),
            Self::AmbiguousReference {
                kind,
                text,
                matches,
            } => write!(
                f,
                "`{text}` matches {matches} {kind}s; narrow the search and pick one"
            ),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ManagerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ManagerError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(EntityValidationError::BlankDisplayName(kind)) => {
                Self::InvalidArgument {
                    kind,
                    field: kind.display_field(),
                }
            }
            other => Self::Repo(other),
        }
    }
}

impl From<DbError> for ManagerError {
    fn from(value: DbError) -> Self {
        Self::Repo(RepoError::Db(value))
    }
}

/// The single entry point consumed by presentation layers.
///
/// One instance owns one in-memory data set; the set is empty at
/// construction and discarded when the instance is dropped.
#[derive(Debug)]
pub struct GatheringManager {
    conn: Connection,
}

impl GatheringManager {
    /// Opens a fresh, empty in-memory data set.
    pub fn new() -> ManagerResult<Self> {
        let conn = open_store()?;
        Ok(Self { conn })
    }

    /// Wraps an already-migrated connection. Harness entry point.
    pub fn with_connection(conn: Connection) -> ManagerResult<Self> {
        let _ = SqliteEntityRepository::try_new(&conn)?;
        Ok(Self { conn })
    }

    /// Registers a member. Duplicate names are legal; disambiguation happens
    /// later through search selection.
    pub fn add_member(&self, name: &str, email: &str) -> ManagerResult<EntityId> {
        let repo = SqliteEntityRepository::try_new(&self.conn)?;
        let id = repo.create_member(&Member::new(name, email))?;
        info!("event=member_added module=service uuid={id}");
        Ok(id)
    }

    /// Registers a gathering.
    pub fn add_gathering(&self, title: &str, location: &str, date: &str) -> ManagerResult<EntityId> {
        let repo = SqliteEntityRepository::try_new(&self.conn)?;
        let id = repo.create_gathering(&Gathering::new(title, location, date))?;
        info!("event=gathering_added module=service uuid={id}");
        Ok(id)
    }

    /// Registers an organization.
    pub fn add_organization(&self, title: &str) -> ManagerResult<EntityId> {
        let repo = SqliteEntityRepository::try_new(&self.conn)?;
        let id = repo.create_organization(&Organization::new(title))?;
        info!("event=organization_added module=service uuid={id}");
        Ok(id)
    }

    /// Links a member to a gathering, resolving both display strings first.
    /// Re-linking an existing pair is a no-op.
    pub fn add_member_to_gathering(&self, name: &str, gathering_title: &str) -> ManagerResult<()> {
        let entities = SqliteEntityRepository::try_new(&self.conn)?;
        let member_id = self.resolve(&entities, EntityKind::Member, name)?;
        let gathering_id = self.resolve(&entities, EntityKind::Gathering, gathering_title)?;

        let links = SqliteLinkRepository::try_new(&self.conn)?;
        links.link_attendance(member_id, gathering_id)?;
        info!(
            "event=attendance_linked module=service member={member_id} gathering={gathering_id}"
        );
        Ok(())
    }

    /// Links a gathering to an organization, resolving both display strings
    /// first. Re-linking an existing pair is a no-op.
    pub fn add_gathering_to_organization(
        &self,
        gathering_title: &str,
        organization_title: &str,
    ) -> ManagerResult<()> {
        let entities = SqliteEntityRepository::try_new(&self.conn)?;
        let gathering_id = self.resolve(&entities, EntityKind::Gathering, gathering_title)?;
        let organization_id =
            self.resolve(&entities, EntityKind::Organization, organization_title)?;

        let links = SqliteLinkRepository::try_new(&self.conn)?;
        links.link_affiliation(gathering_id, organization_id)?;
        info!(
            "event=affiliation_linked module=service gathering={gathering_id} organization={organization_id}"
        );
        Ok(())
    }

    /// Updates a gathering's title and/or date. Omitted fields are left
    /// unchanged; supplying neither is a legal no-op. Links are keyed on the
    /// stable id, so renames never touch them.
    pub fn modify_gathering(
        &self,
        title: &str,
        new_title: Option<&str>,
        new_date: Option<&str>,
    ) -> ManagerResult<()> {
        let entities = SqliteEntityRepository::try_new(&self.conn)?;
        let id = self.resolve(&entities, EntityKind::Gathering, title)?;

        if new_title.is_none() && new_date.is_none() {
            debug!("event=gathering_modified module=service uuid={id} status=noop");
            return Ok(());
        }

        entities.update_gathering(id, new_title, new_date)?;
        info!(
            "event=gathering_modified module=service uuid={id} title_changed={} date_changed={}",
            new_title.is_some(),
            new_date.is_some()
        );
        Ok(())
    }

    /// Lists `"name (email)"` descriptors for a gathering's members, in
    /// link-insertion order. A gathering with no members yields an empty
    /// list, not an error.
    pub fn get_members(&self, gathering_title: &str) -> ManagerResult<Vec<String>> {
        let entities = SqliteEntityRepository::try_new(&self.conn)?;
        let gathering_id = self.resolve(&entities, EntityKind::Gathering, gathering_title)?;

        let links = SqliteLinkRepository::try_new(&self.conn)?;
        let members = links.members_of(gathering_id)?;
        Ok(members.iter().map(Member::contact_label).collect())
    }

    /// Substring search over member names.
    pub fn find_member_names(&self, query: &str) -> ManagerResult<Vec<String>> {
        self.find_names(EntityKind::Member, query)
    }

    /// Substring search over gathering titles.
    pub fn find_gathering_names(&self, query: &str) -> ManagerResult<Vec<String>> {
        self.find_names(EntityKind::Gathering, query)
    }

    /// Substring search over organization titles.
    pub fn find_organization_names(&self, query: &str) -> ManagerResult<Vec<String>> {
        self.find_names(EntityKind::Organization, query)
    }

    fn find_names(&self, kind: EntityKind, query: &str) -> ManagerResult<Vec<String>> {
        let repo = SqliteEntityRepository::try_new(&self.conn)?;
        let names = search_names(&repo, kind, query)?;
        debug!(
            "event=name_search module=service kind={kind} hits={}",
            names.len()
        );
        Ok(names)
    }

    /// Resolves an exact display string to exactly one stable id.
    ///
    /// Resolution is the commit surface: it is case-sensitive and exact,
    /// while the search surface is the place for fuzzy discovery.
    fn resolve(
        &self,
        repo: &SqliteEntityRepository<'_>,
        kind: EntityKind,
        text: &str,
    ) -> ManagerResult<EntityId> {
        let ids = repo.ids_by_display_name(kind, text)?;
        match ids.as_slice() {
            [] => {
                debug!("event=resolve module=service kind={kind} status=not_found");
                Err(ManagerError::NotFound {
                    kind,
                    text: text.to_string(),
                })
            }
            [id] => Ok(*id),
            several => {
                warn!(
                    "event=resolve module=service kind={kind} status=ambiguous matches={}",
                    several.len()
                );
                Err(ManagerError::AmbiguousReference {
                    kind,
                    text: text.to_string(),
                    matches: several.len(),
                })
            }
        }
    }
}
