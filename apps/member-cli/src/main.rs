//! member-cli — demo command-line front end for the member registry.
//!
//! Every invocation builds a `MemberService` over the in-memory store,
//! optionally seeds it from `MEMBER_SEED_FILE`, runs one command and prints
//! the result as JSON on stdout. Logs go to stderr.
//!
//! Run:
//! ```bash
//! MEMBER_SEED_FILE=./members.json MEMBER_ID_STRATEGY=sequential \
//!   cargo run -p member-cli -- find --email a@x.com
//! ```
//!
//! Configuration: See `config.rs` for all environment variables.

mod config;
mod seed;

use std::process;

use clap::{Parser, Subcommand};
use domain::adapters::memory_store::InMemoryMemberStore;
use domain::id::{SequentialIdGenerator, UuidIdGenerator};
use domain::service::MemberService;
use domain::time::{system_time_to_rfc3339, SystemClock};
use domain::{IdGenerator, MemberError, MemberId, MemberPatch, MemberSummary, NewRegistration};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::{Config, IdStrategy, LogFormat};
use crate::seed::SeedError;

#[derive(Parser)]
#[command(name = "member-cli")]
#[command(version, about = "Register, look up, edit and remove members", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register a new member
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        password: String,
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        experience_months: i32,
    },
    /// Check credentials and print the authenticated member
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// List every member
    List,
    /// Look a member up by email
    Find {
        #[arg(long)]
        email: String,
    },
    /// Look a member up by id
    FindId { id: String },
    /// Change name, password or email; omitted or blank flags keep the stored value
    Update {
        id: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
    /// Remove a member by id
    Remove { id: String },
    /// Remove the member holding an email
    RemoveByEmail {
        #[arg(long)]
        email: String,
    },
    /// Report whether an email is still free
    EmailAvailable {
        #[arg(long)]
        email: String,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Seed(#[from] SeedError),
    #[error(transparent)]
    Member(#[from] MemberError),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

// Id strategy selected at startup.
enum AnyIdGenerator {
    Uuid(UuidIdGenerator),
    Sequential(SequentialIdGenerator),
}

impl IdGenerator for AnyIdGenerator {
    fn next_id(&self) -> MemberId {
        match self {
            AnyIdGenerator::Uuid(g) => g.next_id(),
            AnyIdGenerator::Sequential(g) => g.next_id(),
        }
    }
}

type Service = MemberService<InMemoryMemberStore, AnyIdGenerator, SystemClock>;

#[derive(Serialize)]
struct LoginOutput {
    member: MemberSummary,
    authenticated_at: String,
}

fn main() {
    let cli = Cli::parse();

    // Load and validate config before touching the store (fail fast on misconfiguration)
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };
    init_tracing(&cfg);
    info!("{}", domain::about());

    if let Err(e) = run(&cfg, cli.command) {
        error!(error = %e, "command failed");
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn init_tracing(cfg: &Config) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    match cfg.log_format {
        LogFormat::Json => {
            registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_timer(fmt::time::SystemTime)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        LogFormat::Pretty => {
            registry
                .with(
                    fmt::layer()
                        .pretty()
                        .with_target(true)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    }
}

fn build_service(cfg: &Config) -> Result<Service, CliError> {
    let ids = match cfg.id_strategy {
        IdStrategy::Uuid => AnyIdGenerator::Uuid(UuidIdGenerator),
        IdStrategy::Sequential => {
            AnyIdGenerator::Sequential(SequentialIdGenerator::new(cfg.id_prefix.clone(), 0))
        }
    };
    let svc = MemberService::new(InMemoryMemberStore::new(), ids, SystemClock);

    cfg.warn_ephemeral_store();
    if let Some(path) = &cfg.seed_file {
        let registrations = seed::load_registrations(path)?;
        seed::apply(&svc, registrations)?;
    }
    Ok(svc)
}

fn run(cfg: &Config, command: Command) -> Result<(), CliError> {
    let svc = build_service(cfg)?;

    match command {
        Command::Register {
            email,
            full_name,
            password,
            experience_months,
        } => {
            let summary = svc.register(NewRegistration {
                email,
                full_name,
                password,
                experience_months,
            })?;
            print_json(&summary)
        }
        Command::Login { email, password } => {
            let session = svc
                .login(&email, &password)?
                .ok_or(CliError::InvalidCredentials)?;
            print_json(&LoginOutput {
                member: MemberSummary::from(session.member()),
                authenticated_at: system_time_to_rfc3339(session.authenticated_at()),
            })
        }
        Command::List => print_json(&svc.list_all()?),
        Command::Find { email } => print_json(&svc.find_by_email(&email)?),
        Command::FindId { id } => print_json(&svc.find_by_id(&MemberId::new(id)?)?),
        Command::Update {
            id,
            email,
            full_name,
            password,
        } => {
            let patch = MemberPatch {
                id: MemberId::new(id)?,
                full_name,
                password,
                email,
            };
            let updated = svc.update(patch)?;
            print_json(&serde_json::json!({ "updated": updated }))
        }
        Command::Remove { id } => {
            let removed = svc.remove(&MemberId::new(id)?)?;
            print_json(&serde_json::json!({ "removed": removed }))
        }
        Command::RemoveByEmail { email } => {
            let removed = svc.remove_by_email(&email)?;
            print_json(&serde_json::json!({ "removed": removed }))
        }
        Command::EmailAvailable { email } => {
            let available = svc.is_email_available(&email)?;
            print_json(&serde_json::json!({ "email": email, "available": available }))
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
