//! External editor used to write recall messages interactively.

use anyhow::{Context, bail};
use log::{debug, info, warn};
use recall_rs_config::EditorConfig;
use std::fs;
use std::path::Path;
use std::process::Command;

/// Prefix of the per-invocation scratch files created next to the recall file.
pub const SCRATCH_PREFIX: &str = "EDITMSG-";
/// Editor used when neither config nor environment names one.
const DEFAULT_EDITOR: &str = "vi";

/// A parsed editor command line. The scratch file is passed as the last argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    program: String,
    args: Vec<String>,
}

impl Editor {
    /// Parse a shell-style command line such as `code --wait`.
    pub fn parse(command: &str) -> anyhow::Result<Self> {
        let mut words = shell_words::split(command)
            .with_context(|| format!("failed to parse editor command `{command}`"))?;
        if words.is_empty() {
            bail!("editor command is empty");
        }
        let program = words.remove(0);
        Ok(Self {
            program,
            args: words,
        })
    }

    /// Pick the editor from config, then `$VISUAL`, then `$EDITOR`.
    pub fn from_config(config: &EditorConfig) -> anyhow::Result<Self> {
        let command = resolve_command(
            config.command.as_deref(),
            std::env::var("VISUAL").ok(),
            std::env::var("EDITOR").ok(),
        );
        debug!("resolved editor command: {command}");
        Self::parse(&command)
    }

    /// Program name or path.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Let the user edit `initial` in a fresh scratch file under `scratch_dir`.
    ///
    /// Every call gets its own file, removed afterwards. A non-zero editor exit is an
    /// error and the edited contents are discarded.
    pub fn edit(&self, scratch_dir: &Path, initial: &str) -> anyhow::Result<String> {
        fs::create_dir_all(scratch_dir)
            .with_context(|| format!("failed to create {}", scratch_dir.display()))?;
        let scratch = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempfile_in(scratch_dir)
            .with_context(|| {
                format!("failed to create scratch file in {}", scratch_dir.display())
            })?
            .into_temp_path();
        fs::write(&*scratch, initial)
            .with_context(|| format!("failed to write scratch file {}", scratch.display()))?;

        info!(
            "launching editor (program={}, scratch={})",
            self.program,
            scratch.display()
        );
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(scratch.as_os_str())
            .status()
            .with_context(|| format!("failed to launch editor `{}`", self.program))?;
        if !status.success() {
            bail!("editor `{}` exited with {status}", self.program);
        }
        let edited = fs::read_to_string(&*scratch)
            .with_context(|| format!("failed to read scratch file {}", scratch.display()))?;

        let path = scratch.to_path_buf();
        if let Err(err) = scratch.close() {
            warn!(
                "failed to remove scratch file (path={}): {err}",
                path.display()
            );
        }
        Ok(edited)
    }
}

/// First non-blank candidate wins; falls back to `vi`.
fn resolve_command(
    configured: Option<&str>,
    visual: Option<String>,
    editor: Option<String>,
) -> String {
    configured
        .map(str::to_string)
        .into_iter()
        .chain(visual)
        .chain(editor)
        .find(|command| !command.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
}

#[cfg(test)]
mod tests {
    use super::{Editor, SCRATCH_PREFIX, resolve_command};
    use pretty_assertions::assert_eq;
    use std::path::Path;
    use tempfile::tempdir;

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).expect("read dir").count()
    }

    #[test]
    fn parse_splits_shell_words() {
        let editor = Editor::parse("code --wait 'my profile'").expect("parse");
        assert_eq!(editor.program(), "code");
        assert_eq!(editor.args, vec!["--wait".to_string(), "my profile".to_string()]);
    }

    #[test]
    fn parse_rejects_empty_and_unbalanced_commands() {
        assert!(Editor::parse("   ").is_err());
        assert!(Editor::parse("vim 'unterminated").is_err());
    }

    #[test]
    fn command_resolution_order() {
        assert_eq!(
            resolve_command(Some("nano"), Some("code -w".into()), Some("vim".into())),
            "nano"
        );
        assert_eq!(
            resolve_command(None, Some("code -w".into()), Some("vim".into())),
            "code -w"
        );
        assert_eq!(resolve_command(None, Some(" ".into()), Some("vim".into())), "vim");
        assert_eq!(resolve_command(None, None, None), "vi");
    }

    #[test]
    fn edit_prefills_and_returns_contents() {
        let temp = tempdir().expect("tempdir");
        let scratch_dir = temp.path().join("state");
        let editor = Editor::parse(r#"sh -c 'printf " and more" >> "$1"' editor"#).expect("parse");

        let edited = editor.edit(&scratch_dir, "existing").expect("edit");
        assert_eq!(edited, "existing and more");
        assert_eq!(entries(&scratch_dir), 0);
    }

    #[test]
    fn each_edit_gets_its_own_scratch_file() {
        let temp = tempdir().expect("tempdir");
        let editor = Editor::parse(r#"sh -c 'printf "%s" "$1" > "$1"' editor"#).expect("parse");

        let first = editor.edit(temp.path(), "").expect("first");
        let second = editor.edit(temp.path(), "").expect("second");
        assert_ne!(first, second);
        for scratch in [&first, &second] {
            let scratch = Path::new(scratch);
            assert_eq!(scratch.parent(), Some(temp.path()));
            let name = scratch.file_name().and_then(|name| name.to_str()).expect("name");
            assert!(name.starts_with(SCRATCH_PREFIX), "unexpected scratch name: {name}");
        }
        assert_eq!(entries(temp.path()), 0);
    }

    #[test]
    fn failing_editor_is_an_error() {
        let temp = tempdir().expect("tempdir");
        let editor = Editor::parse("sh -c 'exit 3' editor").expect("parse");

        let err = editor.edit(temp.path(), "draft").unwrap_err();
        assert!(format!("{err}").contains("exited with"));
        assert_eq!(entries(temp.path()), 0);
    }

    #[test]
    fn missing_editor_binary_is_an_error() {
        let temp = tempdir().expect("tempdir");
        let editor = Editor::parse("definitely-not-an-editor-binary").expect("parse");
        let err = editor.edit(temp.path(), "").unwrap_err();
        assert!(format!("{err}").contains("failed to launch editor"));
    }
}
