use std::io;

use console::{Term, style};
use fident_archive::{Extraction, Notification};

const TITLE: &str = "Extraction error";

/// Lines for one failed archive; the detail line only when verbose.
pub fn lines(notification: &Notification, verbose: bool) -> Vec<String> {
    let mut lines = vec![format!("{} {notification}", style(TITLE).red().bold())];
    if verbose {
        lines.push(format!("  {}", style(&notification.detail).dim()));
    }
    lines
}

pub fn show(term: &Term, notifications: &[Notification], verbose: bool) -> io::Result<()> {
    for notification in notifications {
        for line in lines(notification, verbose) {
            term.write_line(&line)?;
        }
    }
    Ok(())
}

/// Warn about entries left out of otherwise successful extractions.
pub fn show_skipped(term: &Term, extractions: &[Extraction]) -> io::Result<()> {
    for extraction in extractions {
        for skipped in &extraction.skipped {
            term.write_line(&format!(
                "{} {} in '{}': {}",
                style("skipped").yellow(),
                skipped.name,
                extraction.source.display(),
                skipped.reason
            ))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use fident_archive::{ArchiveFormat, Error};

    use super::*;

    fn notification() -> Notification {
        let err = Error::Cancelled;
        Notification::from_error(PathBuf::from("/drop/a.7z"), ArchiveFormat::SevenZ, &err)
    }

    #[test]
    fn message_line_names_archive() {
        console::set_colors_enabled(false);
        let lines = lines(&notification(), false);
        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0],
            "Extraction error Failed to extract 7z file 'a.7z', please decompress it manually"
        );
    }

    #[test]
    fn verbose_adds_detail() {
        console::set_colors_enabled(false);
        let lines = lines(&notification(), true);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "  extraction cancelled");
    }
}
