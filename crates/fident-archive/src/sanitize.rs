use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

use encoding_rs::Encoding;

use crate::error::{Error, Result};

/// Replacement for characters that cannot appear in a file name.
pub const PLACEHOLDER: char = '_';

const ILLEGAL: &[char] = &['<', '>', ':', '"', '|', '?', '*'];

/// Result of sanitizing an archive entry name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SanitizedPath {
    pub original: String,
    pub relative: PathBuf,
    /// `..`, a root or a drive prefix was dropped from the name.
    pub stripped_traversal: bool,
}

/// Decode a raw entry name.
///
/// Valid UTF-8 is taken as is; anything else is read in `codepage`. Malformed
/// input in the codepage is an error rather than a lossy replacement.
pub fn decode_name<'a>(raw: &'a [u8], codepage: &'static Encoding) -> Result<Cow<'a, str>> {
    if let Ok(name) = std::str::from_utf8(raw) {
        return Ok(Cow::Borrowed(name));
    }
    codepage
        .decode_without_bom_handling_and_without_replacement(raw)
        .ok_or_else(|| Error::DecodeFailure {
            encoding: codepage.name(),
            raw: raw.to_vec(),
        })
}

/// Rewrite an entry name into a safe relative path.
///
/// Both `/` and `\` separate components. Empty, `.` and `..` components are
/// dropped along with a leading drive prefix, illegal characters become
/// [`PLACEHOLDER`], and trailing spaces and dots are trimmed.
pub fn sanitize_name(name: &str) -> Result<SanitizedPath> {
    let mut relative = PathBuf::new();
    let mut stripped_traversal = name.starts_with(['/', '\\']);

    for (index, part) in name.split(['/', '\\']).enumerate() {
        match part {
            "" | "." => {}
            ".." => stripped_traversal = true,
            _ if index == 0 && is_drive_prefix(part) => stripped_traversal = true,
            _ => {
                let cleaned = clean_component(part);
                if !cleaned.is_empty() {
                    relative.push(cleaned);
                }
            }
        }
    }

    if relative.as_os_str().is_empty() {
        return Err(Error::PathTraversalRejected {
            entry: name.to_string(),
        });
    }

    Ok(SanitizedPath {
        original: name.to_string(),
        relative,
        stripped_traversal,
    })
}

/// Join a sanitized relative path onto `root`, refusing anything that
/// normalizes outside of it.
pub fn resolve(root: &Path, sanitized: &SanitizedPath) -> Result<PathBuf> {
    let root = normalize_path(root);
    let resolved = normalize_path(&root.join(&sanitized.relative));

    if resolved == root || !resolved.starts_with(&root) {
        return Err(Error::PathTraversalRejected {
            entry: sanitized.original.clone(),
        });
    }
    Ok(resolved)
}

fn is_drive_prefix(part: &str) -> bool {
    let bytes = part.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

fn clean_component(part: &str) -> String {
    let replaced: String = part
        .chars()
        .map(|c| {
            if ILLEGAL.contains(&c) || c.is_control() {
                PLACEHOLDER
            } else {
                c
            }
        })
        .collect();
    let trimmed = replaced.trim_end_matches([' ', '.']);
    match trimmed {
        "" | "." | ".." => String::new(),
        _ => trimmed.to_string(),
    }
}

/// Lexically resolve `.` and `..` components.
fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::ParentDir => {
                result.pop();
            }
            Component::Normal(part) => result.push(part),
            Component::RootDir => result.push(component.as_os_str()),
            Component::Prefix(prefix) => result.push(prefix.as_os_str()),
            Component::CurDir => {}
        }
    }

    result
}
