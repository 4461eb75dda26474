// SPDX-License-Identifier: AGPL-3.0-or-later
//! Interactive session
//!
//! A small REPL over one session: the cursor sticks around between
//! commands, and the `log` command replays this session's activity from
//! an in-memory sink.

use std::path::PathBuf;
use std::sync::Arc;

use console::style;

use drive_core::{ActivityLog, DriveError, DriveResult};
use drive_store::{catalog, DriveConfig, MemoryActivityLog, Session};

use crate::commands;

const HELP: &str = "\
Commands:
  ls [QUERY]        list the current folder, optionally filtered
  cd NAME           enter a folder
  up                go back to the parent folder
  pwd               show the current location
  mkdir NAME        create a folder here
  put SRC [NAME]    upload a local file here
  get NAME DEST     download a file to a local path
  rm NAME           delete a file or folder (folders recursively)
  open NAME         preview a file
  quota             show storage usage
  log               show this session's activity
  help              show this help
  exit              leave the shell";

pub async fn run(config: &DriveConfig, user: Option<&str>) -> DriveResult<()> {
    let activity = Arc::new(MemoryActivityLog::new());
    let mut session = commands::open_session_with(config, user, activity.clone()).await?;

    println!(
        "MiniDrive shell - {} ({} quota). Type 'help' for commands.",
        session.username(),
        bytesize::ByteSize(session.ops().quota().max_bytes())
    );

    loop {
        let prompt = format!("{}:{}", session.username(), session.tree().location());
        let line: String = dialoguer::Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| DriveError::Io(std::io::Error::other(e)))?;

        match dispatch(&mut session, &activity, line.trim()).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => eprintln!("{}", style(format!("Error: {e}")).red()),
        }
    }
    Ok(())
}

/// Run one shell line; `Ok(false)` ends the loop.
async fn dispatch(
    session: &mut Session,
    activity: &Arc<MemoryActivityLog>,
    line: &str,
) -> DriveResult<bool> {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return Ok(true);
    };
    let args: Vec<&str> = parts.collect();

    match command {
        "ls" => {
            let entries = match args.first() {
                Some(query) => catalog::filter(session.tree(), query).await?,
                None => catalog::list(session.tree()).await?,
            };
            commands::print_entries(&entries, true);
        }
        "cd" => {
            let Some(name) = args.first() else {
                println!("usage: cd NAME");
                return Ok(true);
            };
            session.tree_mut().enter(name).await?;
            let _ = activity.append(&format!("Opened folder: {name}")).await;
        }
        "up" | ".." => {
            if session.tree_mut().up() {
                let _ = activity.append("Went back").await;
            } else {
                println!("Already at the root");
            }
        }
        "pwd" => println!("{}", session.tree().location()),
        "mkdir" => {
            let Some(name) = args.first() else {
                println!("usage: mkdir NAME");
                return Ok(true);
            };
            session.ops().create_folder(session.tree(), name).await?;
            println!("Created {name}");
        }
        "put" => {
            let Some(src) = args.first() else {
                println!("usage: put SRC [NAME]");
                return Ok(true);
            };
            let source = PathBuf::from(src);
            let name = match args.get(1) {
                Some(name) => name.to_string(),
                None => source
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(String::from)
                    .ok_or_else(|| DriveError::InvalidName(source.display().to_string()))?,
            };
            let copied = session.ops().upload(session.tree(), &source, &name).await?;
            println!("Uploaded {name} ({})", bytesize::ByteSize(copied));
        }
        "get" => {
            let (Some(name), Some(dest)) = (args.first(), args.get(1)) else {
                println!("usage: get NAME DEST");
                return Ok(true);
            };
            let dest = PathBuf::from(dest);
            session.ops().download(session.tree(), name, &dest).await?;
            println!("Downloaded {name} -> {}", dest.display());
        }
        "rm" => {
            let Some(name) = args.first() else {
                println!("usage: rm NAME");
                return Ok(true);
            };
            let removed = session.ops().delete(session.tree(), name).await?;
            println!("Deleted {name} ({removed} entries)");
        }
        "open" => {
            let Some(name) = args.first() else {
                println!("usage: open NAME");
                return Ok(true);
            };
            commands::render_preview(session, name).await?;
        }
        "quota" => commands::print_quota(session).await?,
        "log" => {
            let lines = activity.lines().await;
            if lines.is_empty() {
                println!("(no activity yet)");
            }
            for line in lines {
                println!("{line}");
            }
        }
        "help" => println!("{HELP}"),
        "exit" | "quit" => return Ok(false),
        other => println!("Unknown command: {other} (try help)"),
    }
    Ok(true)
}
