//! Member, gathering and organization records.
//!
//! # Responsibility
//! - Define the three entity kinds and their constructors.
//! - Enforce the display-name contract shared by all write paths.
//!
//! # Invariants
//! - `uuid` is stable and never reused for another entity.
//! - Display names are not unique; two members may share a name, and the
//!   lookup layer must surface that ambiguity instead of resolving it.
//! - `email`, `location` and `date` are opaque strings accepted verbatim.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every stored entity.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type EntityId = Uuid;

/// Entity kind selector used by lookup, search and error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A registered person with a contact string.
    Member,
    /// An event members attend; title and date are mutable.
    Gathering,
    /// A group that gatherings can be affiliated with.
    Organization,
}

impl EntityKind {
    /// Stable lower-case form used in log lines and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Gathering => "gathering",
            Self::Organization => "organization",
        }
    }

    /// Name of the identifying display field for this kind.
    pub fn display_field(self) -> &'static str {
        match self {
            Self::Member => "name",
            Self::Gathering | Self::Organization => "title",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation error for entity display fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityValidationError {
    /// The identifying display field is empty or whitespace-only.
    BlankDisplayName(EntityKind),
}

impl Display for EntityValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankDisplayName(kind) => {
                write!(f, "{} {} must not be blank", kind, kind.display_field())
            }
        }
    }
}

impl Error for EntityValidationError {}

/// Checks the shared display-name contract for one field value.
pub fn validate_display_name(kind: EntityKind, value: &str) -> Result<(), EntityValidationError> {
    if value.trim().is_empty() {
        return Err(EntityValidationError::BlankDisplayName(kind));
    }
    Ok(())
}

/// A registered member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Stable global ID used by attendance links.
    pub uuid: EntityId,
    /// Display name. Not unique across members.
    pub name: String,
    /// Opaque contact string; no format validation is applied.
    pub email: String,
}

impl Member {
    /// Creates a member with a generated stable ID.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name, email)
    }

    /// Creates a member with a caller-provided stable ID.
    pub fn with_id(uuid: EntityId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            uuid,
            name: name.into(),
            email: email.into(),
        }
    }

    /// Checks the display-name contract before persistence.
    pub fn validate(&self) -> Result<(), EntityValidationError> {
        validate_display_name(EntityKind::Member, &self.name)
    }

    /// Human-readable descriptor handed to presentation layers.
    pub fn contact_label(&self) -> String {
        format!("{} ({})", self.name, self.email)
    }
}

/// A gathering members can attend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gathering {
    /// Stable global ID used by attendance and affiliation links.
    pub uuid: EntityId,
    /// Display title. Mutable; links are unaffected by renames.
    pub title: String,
    /// Opaque location string, e.g. a zip code.
    pub location: String,
    /// Opaque free-form date/time text. Mutable.
    pub date: String,
}

impl Gathering {
    /// Creates a gathering with a generated stable ID.
    pub fn new(
        title: impl Into<String>,
        location: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self::with_id(Uuid::new_v4(), title, location, date)
    }

    /// Creates a gathering with a caller-provided stable ID.
    pub fn with_id(
        uuid: EntityId,
        title: impl Into<String>,
        location: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            uuid,
            title: title.into(),
            location: location.into(),
            date: date.into(),
        }
    }

    /// Checks the display-name contract before persistence.
    pub fn validate(&self) -> Result<(), EntityValidationError> {
        validate_display_name(EntityKind::Gathering, &self.title)
    }
}

/// An organization gatherings can be affiliated with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Stable global ID used by affiliation links.
    pub uuid: EntityId,
    /// Display title.
    pub title: String,
}

impl Organization {
    /// Creates an organization with a generated stable ID.
    pub fn new(title: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), title)
    }

    /// Creates an organization with a caller-provided stable ID.
    pub fn with_id(uuid: EntityId, title: impl Into<String>) -> Self {
        Self {
            uuid,
            title: title.into(),
        }
    }

    /// Checks the display-name contract before persistence.
    pub fn validate(&self) -> Result<(), EntityValidationError> {
        validate_display_name(EntityKind::Organization, &self.title)
    }
}
