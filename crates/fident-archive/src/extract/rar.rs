use std::path::Path;

use unrar::Archive;

use super::SessionWriter;
use crate::data::entry::{ArchiveEntry, EntryName};
use crate::error::{Error, Result};

/// Sequential header walk over the unrar decoder.
pub struct RarHandler;

impl RarHandler {
    pub(crate) fn extract(&self, archive: &Path, writer: &mut SessionWriter<'_>) -> Result<()> {
        std::fs::metadata(archive)?;
        let corrupt = |e: unrar::error::UnrarError| Error::corrupt(archive, e);

        let mut cursor = Archive::new(archive)
            .open_for_processing()
            .map_err(corrupt)?;

        while let Some(header) = cursor.read_header().map_err(corrupt)? {
            writer.check_cancelled()?;

            let info = header.entry();
            let name = EntryName::Text(info.filename.to_string_lossy().into_owned());
            if info.is_encrypted() {
                return Err(Error::corrupt(
                    archive,
                    format!("entry '{}' is encrypted", name.display_lossy()),
                ));
            }
            let entry = if info.is_directory() {
                ArchiveEntry::directory(name)
            } else {
                ArchiveEntry::file(name, info.unpacked_size)
            };

            cursor = match writer.place(&entry)? {
                Some(placement) if entry.is_directory => {
                    writer.create_dir(&placement)?;
                    header.skip().map_err(corrupt)?
                }
                Some(placement) => {
                    writer.prepare_file(&placement)?;
                    let next = header.extract_to(&placement.target).map_err(corrupt)?;
                    let size = std::fs::metadata(&placement.target)
                        .map_err(|e| Error::corrupt(archive, e))?
                        .len();
                    writer.record_file(placement, size);
                    next
                }
                None => header.skip().map_err(corrupt)?,
            };
        }
        Ok(())
    }
}
