use std::io;
use std::path::Path;

use sevenz_rust::{Password, SevenZReader};

use super::SessionWriter;
use crate::data::entry::{ArchiveEntry, EntryName};
use crate::error::{Error, Result};

/// Entry content is only readable while the decoder sits on that entry.
pub struct SevenZHandler;

impl SevenZHandler {
    pub(crate) fn extract(&self, archive: &Path, writer: &mut SessionWriter<'_>) -> Result<()> {
        std::fs::metadata(archive)?;

        let mut reader = SevenZReader::open(archive, Password::empty())
            .map_err(|e| Error::corrupt(archive, e))?;

        let mut failure = None;
        let walked = reader.for_each_entries(|entry, content| {
            let entry = if entry.is_directory {
                ArchiveEntry::directory(EntryName::Text(entry.name.clone()))
            } else {
                ArchiveEntry::file(EntryName::Text(entry.name.clone()), entry.size)
            };

            match materialize(writer, &entry, content) {
                Ok(()) => Ok(true),
                Err(err) => {
                    failure = Some(err);
                    Ok(false)
                }
            }
        });

        if let Some(err) = failure {
            return Err(err);
        }
        walked.map_err(|e| Error::corrupt(archive, e))
    }
}

fn materialize(
    writer: &mut SessionWriter<'_>,
    entry: &ArchiveEntry,
    content: &mut dyn io::Read,
) -> Result<()> {
    writer.check_cancelled()?;

    match writer.place(entry)? {
        Some(placement) if entry.is_directory => writer.create_dir(&placement),
        Some(placement) => writer.write_file(placement, content),
        None => {
            io::copy(content, &mut io::sink()).map_err(|e| Error::corrupt(writer.archive(), e))?;
            Ok(())
        }
    }
}
