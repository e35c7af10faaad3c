//! Display formatting for recall messages.
//!
//! Messages may reference files as `f:<path>`. For display the marker is
//! dropped and, when enabled, the path becomes an OSC 8 terminal hyperlink to
//! the resolved absolute file. The stored message is never modified.

use chrono::{DateTime, Local, Utc};
use recall_rs_store::path;
use regex::{Captures, Regex};
use std::path::Path;

/// `f:` followed by an absolute or relative path without whitespace.
const PATH_TOKEN: &str = r"\bf:(/?[^/\s]+(?:/[^/\s]*)*)";

/// Render a stored message for the terminal.
///
/// Relative paths are resolved against `base`, the recall's directory.
pub fn format_message(msg: &str, base: &Path, hyperlinks: bool) -> String {
    let Ok(regex) = Regex::new(PATH_TOKEN) else {
        return msg.to_string();
    };
    regex
        .replace_all(msg, |caps: &Captures<'_>| {
            let raw = caps.get(1).map_or("", |m| m.as_str());
            if hyperlinks {
                hyperlink(raw, base)
            } else {
                raw.to_string()
            }
        })
        .into_owned()
}

/// Wrap `raw` in an OSC 8 escape linking to its absolute location.
pub fn hyperlink(raw: &str, base: &Path) -> String {
    let target = path::resolve_against(base, &path::expand_home(raw));
    format!(
        "\x1b]8;;file://{}\x1b\\{raw}\x1b]8;;\x1b\\",
        target.display()
    )
}

/// Local time in the classic `ctime` layout, e.g. `Mon Jan  2 15:04:05 2006`.
pub fn format_time(time: DateTime<Utc>) -> String {
    time.with_timezone(&Local)
        .format("%a %b %e %H:%M:%S %Y")
        .to_string()
}
