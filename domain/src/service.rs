use tracing::{debug, info, warn};

use crate::validate::{is_present, validate_member};
use crate::{
    Clock, IdGenerator, Member, MemberError, MemberId, MemberPatch, MemberStore, MemberSummary,
    NewRegistration, Session,
};

/// Application service for registering, authenticating, reading, editing and
/// removing members.
///
/// Generic over store, id generator, and clock so tests can pin ids and time.
/// The service itself is stateless: a login hands back a [`Session`] that the
/// caller threads through whatever it does next.
pub struct MemberService<S: MemberStore, G: IdGenerator, C: Clock> {
    store: S,
    ids: G,
    clock: C,
}

impl<S: MemberStore, G: IdGenerator, C: Clock> MemberService<S, G, C> {
    pub fn new(store: S, ids: G, clock: C) -> Self {
        Self { store, ids, clock }
    }

    /// Register a new member.
    ///
    /// Fails with `InvalidInput` when the assembled record does not validate
    /// and with `Conflict` when the email is taken. Neither failure writes.
    pub fn register(&self, input: NewRegistration) -> Result<MemberSummary, MemberError> {
        let candidate = Member {
            id: self.ids.next_id(),
            email: input.email,
            full_name: input.full_name,
            password: input.password,
            experience_months: input.experience_months,
            registration_date: Some(self.clock.now()),
        };
        info!(member_id = %candidate.id, email = %candidate.email, "member registration started");

        if !self.validate(Some(&candidate)) {
            warn!(email = %candidate.email, "registration rejected: invalid input");
            return Err(MemberError::InvalidInput("user input was invalid".into()));
        }
        if !self.is_email_available(&candidate.email)? {
            warn!(email = %candidate.email, "registration rejected: email taken");
            return Err(MemberError::Conflict(
                "email is already registered, please try logging in".into(),
            ));
        }

        let created = self.store.create(candidate)?;
        info!(member_id = %created.id, "member registered");
        Ok(MemberSummary::from(&created))
    }

    /// Check credentials against the store. `Ok(None)` when they do not match.
    pub fn login(&self, email: &str, password: &str) -> Result<Option<Session>, MemberError> {
        match self.store.login_credential_check(email, password)? {
            Some(member) => {
                info!(member_id = %member.id, "member logged in");
                Ok(Some(Session::new(member, self.clock.now())))
            }
            None => {
                debug!(email, "login rejected");
                Ok(None)
            }
        }
    }

    /// Every member as a summary, in store order.
    pub fn list_all(&self) -> Result<Vec<MemberSummary>, MemberError> {
        let members = self.store.find_all()?;
        Ok(members.iter().map(MemberSummary::from).collect())
    }

    /// Summary of the member holding `email`; `NotFound` if nobody does.
    pub fn find_by_email(&self, email: &str) -> Result<MemberSummary, MemberError> {
        match self.store.find_by_email(email)? {
            Some(member) => Ok(MemberSummary::from(&member)),
            None => Err(MemberError::NotFound(format!(
                "no member found for email {}",
                email
            ))),
        }
    }

    /// Summary of the member with `id`; `NotFound` if there is none.
    pub fn find_by_id(&self, id: &MemberId) -> Result<MemberSummary, MemberError> {
        match self.store.find_by_id(id)? {
            Some(member) => Ok(MemberSummary::from(&member)),
            None => Err(not_found(id)),
        }
    }

    /// See [`validate_member`].
    pub fn validate(&self, candidate: Option<&Member>) -> bool {
        validate_member(candidate)
    }

    /// `true` when no member holds `email` yet.
    pub fn is_email_available(&self, email: &str) -> Result<bool, MemberError> {
        Ok(!self.store.email_exists(email)?)
    }

    /// Delete by id. `Ok(false)` when nothing was removed.
    pub fn remove(&self, id: &MemberId) -> Result<bool, MemberError> {
        let removed = self.store.delete(id)?;
        if removed {
            info!(member_id = %id, "member removed");
        }
        Ok(removed)
    }

    /// Resolve `email` to a member and delete it by id.
    pub fn remove_by_email(&self, email: &str) -> Result<bool, MemberError> {
        match self.store.find_by_email(email)? {
            Some(member) => self.remove(&member.id),
            None => Ok(false),
        }
    }

    /// Apply a partial update to an existing member.
    ///
    /// Only present, non-blank fields overwrite the stored values. A new
    /// email must not belong to anyone else; on conflict nothing is written.
    pub fn update(&self, patch: MemberPatch) -> Result<bool, MemberError> {
        let mut member = self
            .store
            .find_by_id(&patch.id)?
            .ok_or_else(|| not_found(&patch.id))?;

        if is_present(patch.full_name.as_deref()) {
            member.full_name = patch.full_name.unwrap_or_default();
        }
        if is_present(patch.password.as_deref()) {
            member.password = patch.password.unwrap_or_default();
        }
        if is_present(patch.email.as_deref()) {
            let email = patch.email.unwrap_or_default();
            if email != member.email && !self.is_email_available(&email)? {
                warn!(member_id = %member.id, email = %email, "update rejected: email taken");
                return Err(MemberError::Conflict(
                    "the provided email is already registered".into(),
                ));
            }
            member.email = email;
        }

        let updated = self.store.update(&member)?;
        debug!(member_id = %member.id, updated, "member update applied");
        Ok(updated)
    }
}

fn not_found(id: &MemberId) -> MemberError {
    MemberError::NotFound(format!("no member found for id {}", id))
}
