//! src/controller/command_parser.rs
//! ============================================================================
//! # Command Parser: headless shell lines into actions
//!
//! One line, one command. The first word picks the command, the rest of the
//! line is its argument. `search` and `mkdir` take the raw remainder so names
//! and queries may contain spaces; blank folder names still reach the engine,
//! which owns that validation.

use compact_str::CompactString;

use crate::controller::actions::Action;
use crate::error::AppError;
use crate::model::entry::EntryId;
use crate::model::view_mode::ViewMode;
use crate::upload::descriptor::FileDescriptor;

pub const HELP_TEXT: &str = "\
commands:
  ls                                  show the current listing
  search <text>                       filter by name (no text clears)
  select <id>                         toggle selection of an entry
  clear                               clear the selection
  view grid|list                      switch view mode
  mkdir <name>                        create a folder
  upload <file> <bytes> [mime], ...   upload one batch of files
  star|unstar <id>                    set or clear the starred flag
  share|unshare <id>                  set or clear the shared flag
  json                                dump the current snapshot as JSON
  help                                show this text
  quit                                leave";

/// A parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Forward to the event loop.
    Action(Action),

    /// Print the latest snapshot as JSON.
    Json,

    Help,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, AppError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let (cmd, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((cmd, rest)) => (cmd, rest.trim()),
        None => (trimmed, ""),
    };

    let action = match cmd.to_ascii_lowercase().as_str() {
        "ls" | "refresh" => Action::Refresh,
        "search" | "find" => Action::Search(CompactString::new(rest)),
        "select" => Action::ToggleSelection(required_id(cmd, rest)?),
        "clear" => Action::ClearSelection,
        "view" => Action::SetViewMode(rest.parse::<ViewMode>()?),
        "mkdir" => Action::CreateFolder(rest.to_string()),
        "upload" => Action::StartUpload(parse_upload_batch(rest)?),
        "star" => Action::SetStarred {
            id: required_id(cmd, rest)?,
            starred: true,
        },
        "unstar" => Action::SetStarred {
            id: required_id(cmd, rest)?,
            starred: false,
        },
        "share" => Action::SetShared {
            id: required_id(cmd, rest)?,
            shared: true,
        },
        "unshare" => Action::SetShared {
            id: required_id(cmd, rest)?,
            shared: false,
        },
        "json" => return Ok(Some(ShellCommand::Json)),
        "help" | "?" => return Ok(Some(ShellCommand::Help)),
        "quit" | "q" | "exit" => Action::Quit,
        _ => {
            return Err(AppError::invalid_input(
                "command",
                format!("unknown command '{cmd}', try 'help'"),
            ));
        }
    };

    Ok(Some(ShellCommand::Action(action)))
}

fn required_id(cmd: &str, rest: &str) -> Result<EntryId, AppError> {
    match rest.split_whitespace().next() {
        Some(id) => Ok(EntryId::from(id)),
        None => Err(AppError::invalid_input(
            "id",
            format!("'{cmd}' needs an entry id"),
        )),
    }
}

/// `name bytes [mime]` groups separated by commas. An empty argument is an
/// empty batch, which the engine ignores.
fn parse_upload_batch(rest: &str) -> Result<Vec<FileDescriptor>, AppError> {
    rest.split(',')
        .map(str::trim)
        .filter(|group| !group.is_empty())
        .map(parse_descriptor)
        .collect()
}

fn parse_descriptor(group: &str) -> Result<FileDescriptor, AppError> {
    let mut parts = group.split_whitespace();
    let (Some(name), Some(bytes)) = (parts.next(), parts.next()) else {
        return Err(AppError::invalid_input(
            "upload",
            format!("expected '<file> <bytes> [mime]', got '{group}'"),
        ));
    };
    let mime = parts.next();
    if parts.next().is_some() {
        return Err(AppError::invalid_input(
            "upload",
            format!("too many fields in '{group}'"),
        ));
    }

    let byte_length = bytes.parse::<u64>().map_err(|e| {
        AppError::invalid_input("bytes", format!("'{bytes}' is not a byte count: {e}"))
    })?;

    Ok(FileDescriptor::new(name, byte_length, mime))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(line: &str) -> Action {
        match parse_command(line) {
            Ok(Some(ShellCommand::Action(action))) => action,
            other => panic!("expected action for {line:?}, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        assert_eq!(parse_command("").unwrap(), None);
        assert_eq!(parse_command("   \t").unwrap(), None);
    }

    #[test]
    fn test_search_keeps_spaces_and_allows_empty() {
        assert_eq!(
            action("search  foto vacaciones "),
            Action::Search("foto vacaciones".into())
        );
        assert_eq!(action("search"), Action::Search("".into()));
    }

    #[test]
    fn test_mkdir_passes_blank_names_through() {
        assert_eq!(action("mkdir Q3 Reports"), Action::CreateFolder("Q3 Reports".into()));
        assert_eq!(action("mkdir"), Action::CreateFolder(String::new()));
    }

    #[test]
    fn test_flag_commands() {
        assert_eq!(
            action("STAR 6"),
            Action::SetStarred {
                id: EntryId::from("6"),
                starred: true
            }
        );
        assert_eq!(
            action("unshare 2"),
            Action::SetShared {
                id: EntryId::from("2"),
                shared: false
            }
        );
        assert!(matches!(
            parse_command("select"),
            Err(AppError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_view_mode_argument() {
        assert_eq!(action("view list"), Action::SetViewMode(ViewMode::List));
        assert!(parse_command("view tiles").is_err());
    }

    #[test]
    fn test_upload_batch() {
        let Action::StartUpload(files) =
            action("upload d1.png 3984588 image/png, notes.txt 120")
        else {
            panic!("expected upload");
        };

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].filename, "d1.png");
        assert_eq!(files[0].byte_length, 3_984_588);
        assert_eq!(files[0].mime_type.as_deref(), Some("image/png"));
        assert_eq!(files[1].mime_type, None);

        assert_eq!(action("upload"), Action::StartUpload(Vec::new()));
    }

    #[test]
    fn test_upload_rejects_bad_groups() {
        assert!(parse_command("upload d1.png").is_err());
        assert!(parse_command("upload d1.png lots").is_err());
        assert!(parse_command("upload a 1 text/plain extra").is_err());
    }

    #[test]
    fn test_shell_only_commands() {
        assert_eq!(parse_command("json").unwrap(), Some(ShellCommand::Json));
        assert_eq!(parse_command("help").unwrap(), Some(ShellCommand::Help));
        assert_eq!(action("exit"), Action::Quit);
        assert!(matches!(
            parse_command("rm -rf"),
            Err(AppError::InvalidInput { field, .. }) if field == "command"
        ));
    }
}
