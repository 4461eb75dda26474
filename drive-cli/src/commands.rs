// SPDX-License-Identifier: AGPL-3.0-or-later
//! CLI command implementations

use std::path::Path;
use std::sync::Arc;

use bytesize::ByteSize;
use console::style;
use tabled::{Table, Tabled};

use drive_core::{ActivityLog, DriveError, DriveResult, Entry};
use drive_store::{
    catalog, CredentialFile, DriveConfig, Preview, Session, StorageTree, TracingActivityLog,
};

/// Open a session for `user`, prompting for a password when a credential
/// file is configured.
pub(crate) async fn open_session(config: &DriveConfig, user: Option<&str>) -> DriveResult<Session> {
    open_session_with(config, user, Arc::new(TracingActivityLog)).await
}

pub(crate) async fn open_session_with(
    config: &DriveConfig,
    user: Option<&str>,
    activity: Arc<dyn ActivityLog>,
) -> DriveResult<Session> {
    let username = user.ok_or_else(|| {
        DriveError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "no user given (try --user)",
        ))
    })?;

    match &config.auth.credentials_file {
        Some(path) => {
            let auth = CredentialFile::new(path);
            let password = prompt_password(&format!("Password for {username}"))?;
            match Session::login(config, &auth, username, &password, activity).await? {
                Some(session) => Ok(session),
                None => Err(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "login failed",
                )
                .into()),
            }
        }
        None => Session::open(config, username, activity).await,
    }
}

fn prompt_password(prompt: &str) -> DriveResult<String> {
    dialoguer::Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| DriveError::Io(std::io::Error::other(e)))
}

/// Walk the cursor down to the parent of `path`, returning the final
/// segment for the operation itself.
pub(crate) async fn walk_to_parent<'a>(
    tree: &mut StorageTree,
    path: &'a str,
) -> DriveResult<&'a str> {
    let segments: Vec<&str> = path
        .split(['/', '\\'])
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    let Some((last, parents)) = segments.split_last() else {
        return Err(DriveError::InvalidName(path.to_string()));
    };
    for parent in parents {
        tree.enter(parent).await?;
    }
    Ok(last)
}

#[derive(Tabled)]
struct LsRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Modified")]
    modified: String,
}

fn ls_row(entry: &Entry) -> LsRow {
    let kind = if entry.is_folder() {
        style("Folder").cyan().to_string()
    } else {
        "File".to_string()
    };
    let size = if entry.is_folder() {
        "-".to_string()
    } else {
        ByteSize(entry.size_bytes).to_string()
    };
    let modified = entry
        .modified
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    LsRow {
        name: entry.name.clone(),
        kind,
        size,
        modified,
    }
}

pub(crate) fn print_entries(entries: &[Entry], long: bool) {
    if entries.is_empty() {
        println!("(empty folder)");
        return;
    }
    if long {
        let rows: Vec<LsRow> = entries.iter().map(ls_row).collect();
        println!("{}", Table::new(rows));
    } else {
        for entry in entries {
            if entry.is_folder() {
                println!("{}", style(format!("{}/", entry.name)).cyan());
            } else {
                println!("{}", entry.name);
            }
        }
    }
}

/// List folder contents
pub async fn ls(
    config: &DriveConfig,
    user: Option<&str>,
    path: &str,
    filter: Option<&str>,
    long: bool,
    verbose: bool,
) -> DriveResult<()> {
    let mut session = open_session(config, user).await?;
    session.tree_mut().enter_path(path).await?;

    if verbose {
        eprintln!("Listing: {}", session.tree().location());
    }

    let entries = match filter {
        Some(query) => catalog::filter(session.tree(), query).await?,
        None => catalog::list(session.tree()).await?,
    };
    print_entries(&entries, long);
    Ok(())
}

/// Create a folder
pub async fn mkdir(config: &DriveConfig, user: Option<&str>, path: &str) -> DriveResult<()> {
    let mut session = open_session(config, user).await?;
    let name = walk_to_parent(session.tree_mut(), path).await?;
    session.ops().create_folder(session.tree(), name).await?;
    println!("Created {path}");
    Ok(())
}

/// Upload a local file
pub async fn put(
    config: &DriveConfig,
    user: Option<&str>,
    source: &Path,
    folder: Option<&str>,
    dest_name: Option<&str>,
) -> DriveResult<()> {
    let mut session = open_session(config, user).await?;
    if let Some(folder) = folder {
        session.tree_mut().enter_path(folder).await?;
    }

    let name = match dest_name {
        Some(name) => name.to_string(),
        None => source
            .file_name()
            .and_then(|n| n.to_str())
            .map(String::from)
            .ok_or_else(|| DriveError::InvalidName(source.display().to_string()))?,
    };

    let copied = session.ops().upload(session.tree(), source, &name).await?;
    println!("Uploaded {name} ({})", ByteSize(copied));
    Ok(())
}

/// Download a stored file
pub async fn get(
    config: &DriveConfig,
    user: Option<&str>,
    name: &str,
    dest: &Path,
) -> DriveResult<()> {
    let mut session = open_session(config, user).await?;
    let last = walk_to_parent(session.tree_mut(), name).await?;
    let copied = session.ops().download(session.tree(), last, dest).await?;
    println!("Downloaded {last} -> {} ({})", dest.display(), ByteSize(copied));
    Ok(())
}

/// Delete a file or folder
pub async fn rm(config: &DriveConfig, user: Option<&str>, path: &str) -> DriveResult<()> {
    let mut session = open_session(config, user).await?;
    let last = walk_to_parent(session.tree_mut(), path).await?;
    let removed = session.ops().delete(session.tree(), last).await?;
    println!("Deleted {path} ({removed} entries)");
    Ok(())
}

/// Preview a file
pub async fn open(config: &DriveConfig, user: Option<&str>, path: &str) -> DriveResult<()> {
    let mut session = open_session(config, user).await?;
    let last = walk_to_parent(session.tree_mut(), path).await?;
    render_preview(&session, last).await
}

/// Render a preview and log the open on success.
pub(crate) async fn render_preview(session: &Session, name: &str) -> DriveResult<()> {
    match session.preview().preview(session.tree(), name).await? {
        Preview::Text { content, truncated } => {
            println!("{content}");
            if truncated {
                eprintln!("{}", style("... output truncated").dim());
            }
        }
        Preview::Image { png, width, height } => {
            let out = std::env::temp_dir().join(format!("minidrive-{name}.png"));
            tokio::fs::write(&out, &png).await?;
            println!(
                "Image preview {width}x{height} written to {}",
                out.display()
            );
        }
        Preview::External => {
            println!("Opened with the system default application");
        }
    }
    // Best effort, like every activity line.
    let _ = session
        .activity()
        .append(&format!("Opened file: {name}"))
        .await;
    Ok(())
}

/// Show quota usage
pub async fn quota(config: &DriveConfig, user: Option<&str>) -> DriveResult<()> {
    let session = open_session(config, user).await?;
    print_quota(&session).await
}

pub(crate) async fn print_quota(session: &Session) -> DriveResult<()> {
    let tracker = session.ops().quota();
    let used = tracker.used_bytes(session.tree().root()).await?;
    let percent = tracker.percent_used(session.tree().root()).await?;

    let filled = usize::from(percent / 5);
    let bar = format!(
        "{}{}",
        style("#".repeat(filled)).blue(),
        style("-".repeat(20 - filled)).dim()
    );
    println!(
        "[{bar}] {} of {} used ({percent}%)",
        ByteSize(used),
        ByteSize(tracker.max_bytes())
    );
    Ok(())
}

/// Register a user in the credential file
pub async fn adduser(config: &DriveConfig, username: &str) -> DriveResult<()> {
    let Some(path) = &config.auth.credentials_file else {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no credentials_file configured",
        )
        .into());
    };

    let password = dialoguer::Password::new()
        .with_prompt(format!("Password for {username}"))
        .with_confirmation("Confirm password", "Passwords do not match")
        .interact()
        .map_err(|e| DriveError::Io(std::io::Error::other(e)))?;

    CredentialFile::new(path).add_user(username, &password).await?;
    println!("Registered {username}");
    Ok(())
}
