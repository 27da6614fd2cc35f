//! Preloading the in-memory store from a JSON file of registrations.
//!
//! Each entry goes through `MemberService::register`, so seeded members obey
//! the same validation and uniqueness rules as interactive ones.

use std::fs;
use std::path::{Path, PathBuf};

use domain::service::MemberService;
use domain::{Clock, IdGenerator, MemberError, MemberStore, NewRegistration};
use tracing::{info, warn};

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read seed file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed seed file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("seeding aborted: {0}")]
    Store(MemberError),
}

/// Outcome of a seeding run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub registered: usize,
    pub skipped: usize,
}

/// Read a JSON array of registrations.
pub fn load_registrations(path: &Path) -> Result<Vec<NewRegistration>, SeedError> {
    let raw = fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| SeedError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Register every entry. Invalid or duplicate entries are logged and
/// skipped; store failures abort.
pub fn apply<S, G, C>(
    svc: &MemberService<S, G, C>,
    registrations: Vec<NewRegistration>,
) -> Result<SeedReport, SeedError>
where
    S: MemberStore,
    G: IdGenerator,
    C: Clock,
{
    let mut report = SeedReport::default();
    for (index, reg) in registrations.into_iter().enumerate() {
        let email = reg.email.clone();
        match svc.register(reg) {
            Ok(_) => report.registered += 1,
            Err(e @ (MemberError::InvalidInput(_) | MemberError::Conflict(_))) => {
                warn!(index, email = %email, error = %e, "skipping seed entry");
                report.skipped += 1;
            }
            Err(e) => return Err(SeedError::Store(e)),
        }
    }
    info!(
        registered = report.registered,
        skipped = report.skipped,
        "seed applied"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::adapters::memory_store::InMemoryMemberStore;
    use domain::id::SequentialIdGenerator;
    use domain::time::SystemClock;
    use domain::{Member, MemberId};
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store that is unreachable for every call.
    #[derive(Default)]
    struct UnreachableStore {
        calls: AtomicUsize,
    }

    impl UnreachableStore {
        fn fail<T>(&self) -> Result<T, MemberError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(MemberError::Store("connection refused".into()))
        }
    }

    impl MemberStore for &UnreachableStore {
        fn create(&self, _member: Member) -> Result<Member, MemberError> {
            self.fail()
        }
        fn find_all(&self) -> Result<Vec<Member>, MemberError> {
            self.fail()
        }
        fn find_by_id(&self, _id: &MemberId) -> Result<Option<Member>, MemberError> {
            self.fail()
        }
        fn find_by_email(&self, _email: &str) -> Result<Option<Member>, MemberError> {
            self.fail()
        }
        fn email_exists(&self, _email: &str) -> Result<bool, MemberError> {
            self.fail()
        }
        fn login_credential_check(
            &self,
            _email: &str,
            _password: &str,
        ) -> Result<Option<Member>, MemberError> {
            self.fail()
        }
        fn update(&self, _member: &Member) -> Result<bool, MemberError> {
            self.fail()
        }
        fn delete(&self, _id: &MemberId) -> Result<bool, MemberError> {
            self.fail()
        }
    }

    fn write_seed(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_and_applies_skipping_bad_entries() {
        let file = write_seed(
            r#"[
                {"email": "a@x.com", "full_name": "A", "password": "p", "experience_months": 2},
                {"email": "a@x.com", "full_name": "Dup", "password": "p"},
                {"email": "b@x.com", "full_name": " ", "password": "p"},
                {"email": "c@x.com", "full_name": "C", "password": "p", "experience_months": -4},
                {"email": "d@x.com", "full_name": "D", "password": "p"}
            ]"#,
        );
        let regs = load_registrations(file.path()).unwrap();
        assert_eq!(regs.len(), 5);

        let svc = MemberService::new(
            InMemoryMemberStore::new(),
            SequentialIdGenerator::new("m-", 0),
            SystemClock,
        );
        let report = apply(&svc, regs).unwrap();
        assert_eq!(
            report,
            SeedReport {
                registered: 2,
                skipped: 3
            }
        );

        let ids: Vec<_> = svc
            .list_all()
            .unwrap()
            .into_iter()
            .map(|s| s.id.as_str().to_string())
            .collect();
        assert_eq!(ids, ["m-1", "m-5"]);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let file = write_seed(r#"{"email": "not-an-array"}"#);
        let err = load_registrations(file.path()).unwrap_err();
        assert!(matches!(err, SeedError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_registrations(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, SeedError::Io { .. }));
    }

    #[test]
    fn store_failure_aborts_seeding() {
        let store = UnreachableStore::default();
        let svc = MemberService::new(&store, SequentialIdGenerator::new("m-", 0), SystemClock);
        let regs = vec![
            NewRegistration {
                email: "a@x.com".into(),
                full_name: "A".into(),
                password: "p".into(),
                experience_months: 1,
            },
            NewRegistration {
                email: "b@x.com".into(),
                full_name: "B".into(),
                password: "p".into(),
                experience_months: 1,
            },
        ];

        let err = apply(&svc, regs).unwrap_err();
        assert!(matches!(err, SeedError::Store(MemberError::Store(_))));
        // the first failure stops the run
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }
}
