//! Domain library for the member registry.
//!
//! Holds the member types, the ports (traits) the service depends on, and the
//! error type. Durable storage and any request layer live outside this crate;
//! the only adapter shipped here is the in-memory store used by tests and the
//! demo CLI.

use std::fmt::{self, Debug, Formatter};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};

/// Canonical key of a member. Opaque, non-blank.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    pub fn new<S: Into<String>>(s: S) -> Result<Self, MemberError> {
        let val = s.into();
        if val.trim().is_empty() {
            return Err(MemberError::InvalidInput("member id is blank".into()));
        }
        Ok(Self(val))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored member record.
#[derive(Clone, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub email: String,
    pub full_name: String,
    /// Kept exactly as supplied; hashing belongs to the caller.
    pub password: String,
    pub experience_months: i32,
    /// Assigned by the service at registration. `None` never passes validation.
    pub registration_date: Option<SystemTime>,
}

// Hand-written so the password never reaches a log line.
impl Debug for Member {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("password", &"<redacted>")
            .field("experience_months", &self.experience_months)
            .field("registration_date", &self.registration_date)
            .finish()
    }
}

/// Input data for registering a new member.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct NewRegistration {
    pub email: String,
    pub full_name: String,
    pub password: String,
    #[serde(default)]
    pub experience_months: i32,
}

impl Debug for NewRegistration {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewRegistration")
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("experience_months", &self.experience_months)
            .finish_non_exhaustive()
    }
}

/// Partial update of an existing member.
///
/// A field is applied only when it is `Some` and not blank after trimming;
/// everything else keeps the stored value. Applied values are stored as
/// given, untrimmed, and a new email is compared to the current one exactly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemberPatch {
    pub id: MemberId,
    pub full_name: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
}

impl MemberPatch {
    pub fn new(id: MemberId) -> Self {
        Self {
            id,
            full_name: None,
            password: None,
            email: None,
        }
    }
}

/// Password-free projection of a member handed back to callers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MemberSummary {
    pub id: MemberId,
    pub email: String,
    pub full_name: String,
    pub experience_months: i32,
    /// RFC 3339, UTC, seconds precision.
    pub registration_date: Option<String>,
}

impl From<&Member> for MemberSummary {
    fn from(m: &Member) -> Self {
        Self {
            id: m.id.clone(),
            email: m.email.clone(),
            full_name: m.full_name.clone(),
            experience_months: m.experience_months,
            registration_date: m.registration_date.map(time::system_time_to_rfc3339),
        }
    }
}

impl From<Member> for MemberSummary {
    fn from(m: Member) -> Self {
        Self::from(&m)
    }
}

/// Result of a successful login. Owned by the caller for the length of one
/// interaction; the service keeps no copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    member: Member,
    authenticated_at: SystemTime,
}

impl Session {
    pub fn new(member: Member, authenticated_at: SystemTime) -> Self {
        Self {
            member,
            authenticated_at,
        }
    }

    pub fn member(&self) -> &Member {
        &self.member
    }

    pub fn authenticated_at(&self) -> SystemTime {
        self.authenticated_at
    }

    pub fn into_member(self) -> Member {
        self.member
    }
}

/// Time source abstraction to make code testable.
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

/// Source of fresh member ids.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> MemberId;
}

/// Persistence port for members.
pub trait MemberStore: Send + Sync {
    /// Persist a new member and return the stored record.
    fn create(&self, member: Member) -> Result<Member, MemberError>;
    /// All members, in the store's own order.
    fn find_all(&self) -> Result<Vec<Member>, MemberError>;
    fn find_by_id(&self, id: &MemberId) -> Result<Option<Member>, MemberError>;
    fn find_by_email(&self, email: &str) -> Result<Option<Member>, MemberError>;
    /// `true` when some member already holds `email`.
    fn email_exists(&self, email: &str) -> Result<bool, MemberError>;
    /// Returns the member whose credentials match, if any.
    fn login_credential_check(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Member>, MemberError>;
    /// Replace the record with the same id. `false` if there was none.
    fn update(&self, member: &Member) -> Result<bool, MemberError>;
    /// `false` if there was nothing to delete.
    fn delete(&self, id: &MemberId) -> Result<bool, MemberError>;
}

/// Errors surfaced by the member service and its store.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MemberError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("store error: {0}")]
    Store(String),
}

/// Return a short about/version line for the binary to print.
pub fn about() -> String {
    let pkg = env!("CARGO_PKG_NAME");
    let ver = env!("CARGO_PKG_VERSION");
    format!("{} v{} - member registry domain", pkg, ver)
}

pub mod adapters;
pub mod id;
pub mod service;
pub mod time;
pub mod validate;
