use std::fs::File;
use std::path::Path;

use ::zip::ZipArchive;

use super::SessionWriter;
use crate::data::entry::{ArchiveEntry, EntryName};
use crate::error::{Error, Result};

/// Central-directory order; names are raw bytes so legacy codepages survive.
pub struct ZipHandler;

impl ZipHandler {
    pub(crate) fn extract(&self, archive: &Path, writer: &mut SessionWriter<'_>) -> Result<()> {
        let file = File::open(archive)?;
        let mut zip = ZipArchive::new(file).map_err(|e| Error::corrupt(archive, e))?;

        for index in 0..zip.len() {
            writer.check_cancelled()?;

            let mut file = zip
                .by_index(index)
                .map_err(|e| Error::corrupt(archive, e))?;
            let name = EntryName::Bytes(file.name_raw().to_vec());
            let entry = if file.is_dir() {
                ArchiveEntry::directory(name)
            } else {
                ArchiveEntry::file(name, file.size())
            };

            let Some(placement) = writer.place(&entry)? else {
                continue;
            };
            if entry.is_directory {
                writer.create_dir(&placement)?;
            } else {
                writer.write_file(placement, &mut file)?;
            }
        }
        Ok(())
    }
}
