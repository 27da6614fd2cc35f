use std::sync::{Mutex, MutexGuard};

use crate::{Member, MemberError, MemberId, MemberStore};

/// Simple in-memory member store. Keeps insertion order; a single mutex
/// guards the whole list.
pub struct InMemoryMemberStore {
    inner: Mutex<Vec<Member>>,
}

impl InMemoryMemberStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Member>>, MemberError> {
        self.inner
            .lock()
            .map_err(|_| MemberError::Store("mutex poisoned".into()))
    }
}

impl Default for InMemoryMemberStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemberStore for InMemoryMemberStore {
    fn create(&self, member: Member) -> Result<Member, MemberError> {
        let mut members = self.lock()?;
        if members.iter().any(|m| m.id == member.id) {
            return Err(MemberError::Conflict(format!(
                "member id {} already exists",
                member.id
            )));
        }
        if members.iter().any(|m| m.email == member.email) {
            return Err(MemberError::Conflict(format!(
                "email {} already exists",
                member.email
            )));
        }
        members.push(member.clone());
        Ok(member)
    }

    fn find_all(&self) -> Result<Vec<Member>, MemberError> {
        Ok(self.lock()?.clone())
    }

    fn find_by_id(&self, id: &MemberId) -> Result<Option<Member>, MemberError> {
        Ok(self.lock()?.iter().find(|m| &m.id == id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Member>, MemberError> {
        Ok(self.lock()?.iter().find(|m| m.email == email).cloned())
    }

    fn email_exists(&self, email: &str) -> Result<bool, MemberError> {
        Ok(self.lock()?.iter().any(|m| m.email == email))
    }

    fn login_credential_check(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Member>, MemberError> {
        Ok(self
            .lock()?
            .iter()
            .find(|m| m.email == email && m.password == password)
            .cloned())
    }

    fn update(&self, member: &Member) -> Result<bool, MemberError> {
        let mut members = self.lock()?;
        match members.iter_mut().find(|m| m.id == member.id) {
            Some(slot) => {
                *slot = member.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&self, id: &MemberId) -> Result<bool, MemberError> {
        let mut members = self.lock()?;
        let before = members.len();
        members.retain(|m| &m.id != id);
        Ok(members.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::SystemTime;

    fn mk_member(id: &str, email: &str) -> Member {
        Member {
            id: MemberId::new(id).unwrap(),
            email: email.to_string(),
            full_name: "Some One".to_string(),
            password: "pw".to_string(),
            experience_months: 1,
            registration_date: Some(SystemTime::UNIX_EPOCH),
        }
    }

    #[test]
    fn create_then_find() {
        let store = InMemoryMemberStore::new();
        store.create(mk_member("1", "a@x.com")).unwrap();
        let got = store.find_by_id(&MemberId::new("1").unwrap()).unwrap().unwrap();
        assert_eq!(got.email, "a@x.com");
        assert!(store.find_by_email("a@x.com").unwrap().is_some());
        assert!(store.find_by_email("b@x.com").unwrap().is_none());
    }

    #[test]
    fn create_rejects_duplicate_id_and_email() {
        let store = InMemoryMemberStore::new();
        store.create(mk_member("1", "a@x.com")).unwrap();
        let err = store.create(mk_member("1", "b@x.com")).unwrap_err();
        assert!(matches!(err, MemberError::Conflict(_)));
        let err = store.create(mk_member("2", "a@x.com")).unwrap_err();
        assert!(matches!(err, MemberError::Conflict(_)));
        assert_eq!(store.find_all().unwrap().len(), 1);
    }

    #[test]
    fn find_all_keeps_insertion_order() {
        let store = InMemoryMemberStore::new();
        for (id, email) in [("z", "z@x.com"), ("a", "a@x.com"), ("m", "m@x.com")] {
            store.create(mk_member(id, email)).unwrap();
        }
        let ids: Vec<_> = store
            .find_all()
            .unwrap()
            .into_iter()
            .map(|m| m.id.as_str().to_string())
            .collect();
        assert_eq!(ids, ["z", "a", "m"]);
    }

    #[test]
    fn credential_check_requires_both_fields() {
        let store = InMemoryMemberStore::new();
        store.create(mk_member("1", "a@x.com")).unwrap();
        assert!(store.login_credential_check("a@x.com", "pw").unwrap().is_some());
        assert!(store.login_credential_check("a@x.com", "nope").unwrap().is_none());
        assert!(store.login_credential_check("b@x.com", "pw").unwrap().is_none());
    }

    #[test]
    fn update_and_delete_report_missing() {
        let store = InMemoryMemberStore::new();
        let mut m = mk_member("1", "a@x.com");
        assert!(!store.update(&m).unwrap());
        store.create(m.clone()).unwrap();
        m.full_name = "Renamed".into();
        assert!(store.update(&m).unwrap());
        assert_eq!(
            store.find_by_id(&m.id).unwrap().unwrap().full_name,
            "Renamed"
        );

        assert!(store.delete(&m.id).unwrap());
        assert!(!store.delete(&m.id).unwrap());
        assert!(!store.email_exists("a@x.com").unwrap());
    }

    #[test]
    fn poisoned_lock_maps_to_store_error() {
        let store = Arc::new(InMemoryMemberStore::new());
        let held = Arc::clone(&store);
        let joined = thread::spawn(move || {
            let _guard = held.inner.lock().unwrap();
            panic!("panic while holding the member list");
        })
        .join();
        assert!(joined.is_err());

        assert_eq!(
            store.find_all().unwrap_err(),
            MemberError::Store("mutex poisoned".into())
        );
        assert!(matches!(
            store.create(mk_member("1", "a@x.com")),
            Err(MemberError::Store(_))
        ));
    }
}
