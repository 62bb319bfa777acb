//! Operator CLI over the corkboard core.
//!
//! # Responsibility
//! - Provide a smoke probe (`ping`) that verifies core linkage.
//! - Offer a few commands for poking at a local database without an API.
//!
//! Configuration comes from `CORKBOARD_*` variables, optionally via `.env`.

use corkboard_core::db::open_db;
use corkboard_core::{
    core_version, init_logging_from_config, ping, Argon2Hasher, CoreConfig, NewNote, Note,
    NoteService, SqliteNoteRepository, SqliteUserRepository, UserService,
};
use std::error::Error;
use std::process::ExitCode;

const USAGE: &str = "usage:
  corkboard ping
  corkboard register <username> <email> <password>
  corkboard notes <username> <password>
  corkboard add <username> <password> <content> [tag...]
  corkboard tags";

type CliResult = Result<(), Box<dyn Error>>;

fn main() -> ExitCode {
    // A missing .env file is the normal case.
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> CliResult {
    let Some((command, rest)) = args.split_first() else {
        println!("{USAGE}");
        return Ok(());
    };

    if command == "ping" {
        println!("corkboard_core ping={}", ping());
        println!("corkboard_core version={}", core_version());
        return Ok(());
    }

    let config = CoreConfig::from_env()?;
    init_logging_from_config(&config)?;
    let mut conn = open_db(&config.db_path)?;

    match (command.as_str(), rest) {
        ("register", [username, email, password]) => {
            let users = UserService::new(SqliteUserRepository::try_new(&conn)?, Argon2Hasher);
            let user = users.register(username, email, password)?;
            println!("registered user id={} username={}", user.id, user.username);
        }
        ("notes", [username, password]) => {
            let owner = {
                let users = UserService::new(SqliteUserRepository::try_new(&conn)?, Argon2Hasher);
                users.authenticate(username, password)?.id
            };
            let repo = SqliteNoteRepository::try_new(&mut conn)?.with_defaults(config.note_defaults);
            let notes = NoteService::new(repo);
            for note in notes.list_notes(owner)? {
                println!("{}", describe(&note));
            }
        }
        ("add", [username, password, content, tags @ ..]) => {
            let owner = {
                let users = UserService::new(SqliteUserRepository::try_new(&conn)?, Argon2Hasher);
                users.authenticate(username, password)?.id
            };
            let repo = SqliteNoteRepository::try_new(&mut conn)?.with_defaults(config.note_defaults);
            let mut notes = NoteService::new(repo);
            let created =
                notes.create_note(owner, &NewNote::with_content(content.as_str()).tagged(tags))?;
            println!("{}", describe(&created));
        }
        ("tags", []) => {
            let notes = NoteService::new(SqliteNoteRepository::try_new(&mut conn)?);
            for tag in notes.list_tags()? {
                println!("{}\t{}", tag.id, tag.name);
            }
        }
        _ => println!("{USAGE}"),
    }

    Ok(())
}

fn describe(note: &Note) -> String {
    format!(
        "#{} at ({}, {}) {}x{} tags=[{}] {}",
        note.id,
        note.x,
        note.y,
        note.width,
        note.height,
        note.tag_names().join(","),
        note.content.as_deref().unwrap_or("")
    )
}
