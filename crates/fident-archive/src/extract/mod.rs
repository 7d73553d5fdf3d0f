use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::data::entry::ArchiveEntry;
use crate::data::report::{ExtractedFile, Extraction, SkippedEntry};
use crate::error::{Error, Result};
use crate::format::ArchiveFormat;
use crate::options::ExtractOptions;
use crate::sanitize::{resolve, sanitize_name};
use crate::session::TempSession;

mod rar;
mod sevenz;
mod zip;

pub use self::rar::RarHandler;
pub use self::sevenz::SevenZHandler;
pub use self::zip::ZipHandler;

const COPY_BUFFER: usize = 8192;

pub enum FormatHandler {
    Zip(ZipHandler),
    Rar(RarHandler),
    SevenZ(SevenZHandler),
}

impl FormatHandler {
    pub fn for_path(path: &Path) -> Result<Self> {
        match ArchiveFormat::from_path(path) {
            ArchiveFormat::Zip => Ok(Self::Zip(ZipHandler)),
            ArchiveFormat::Rar => Ok(Self::Rar(RarHandler)),
            ArchiveFormat::SevenZ => Ok(Self::SevenZ(SevenZHandler)),
            ArchiveFormat::Unrecognized => Err(Error::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    pub fn format(&self) -> ArchiveFormat {
        match self {
            Self::Zip(_) => ArchiveFormat::Zip,
            Self::Rar(_) => ArchiveFormat::Rar,
            Self::SevenZ(_) => ArchiveFormat::SevenZ,
        }
    }

    /// Unpack `archive` into a fresh session, in archive order.
    pub fn extract(
        &self,
        archive: &Path,
        options: &ExtractOptions,
        cancel: &CancellationToken,
    ) -> Result<Extraction> {
        let format = self.format();
        let mut writer = SessionWriter::new(archive, format, options, cancel);

        match self {
            Self::Zip(handler) => handler.extract(archive, &mut writer)?,
            Self::Rar(handler) => handler.extract(archive, &mut writer)?,
            Self::SevenZ(handler) => handler.extract(archive, &mut writer)?,
        }

        let extraction = writer.finish();
        info!(
            archive = %archive.display(),
            %format,
            files = extraction.files.len(),
            skipped = extraction.skipped.len(),
            bytes = extraction.total_bytes(),
            root = ?extraction.session_root(),
            "archive extracted"
        );
        Ok(extraction)
    }
}

/// Route one dropped file to its handler, or pass it through unchanged.
pub fn dispatch(
    path: &Path,
    options: &ExtractOptions,
    cancel: &CancellationToken,
) -> Result<Extraction> {
    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }

    match FormatHandler::for_path(path) {
        Ok(handler) => handler.extract(path, options, cancel),
        Err(Error::UnsupportedFormat { .. }) => passthrough(path),
        Err(err) => Err(err),
    }
}

fn passthrough(path: &Path) -> Result<Extraction> {
    let absolute = std::path::absolute(path)?;
    let size = std::fs::metadata(&absolute)?.len();
    let relative_name = absolute
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| absolute.clone());

    debug!(path = %absolute.display(), size, "passing file through");
    let file = ExtractedFile {
        path: absolute,
        size,
        archive: None,
        relative_name,
    };
    Ok(Extraction::passthrough(path.to_path_buf(), file))
}

/// Where a sanitized entry lands inside the session.
#[derive(Debug)]
pub(crate) struct Placement {
    pub relative: PathBuf,
    pub target: PathBuf,
}

/// Materializes entries of one archive into its session directory.
///
/// The session is allocated on the first placed entry. Entries whose name
/// cannot be decoded or sanitized are skipped and recorded. A file whose
/// sanitized target was already claimed gets a numbered name (`a (1).txt`)
/// so earlier files are never overwritten.
pub(crate) struct SessionWriter<'a> {
    archive: &'a Path,
    format: ArchiveFormat,
    options: &'a ExtractOptions,
    cancel: &'a CancellationToken,
    session: Option<TempSession>,
    claimed: HashSet<PathBuf>,
    files: Vec<ExtractedFile>,
    skipped: Vec<SkippedEntry>,
}

impl<'a> SessionWriter<'a> {
    pub fn new(
        archive: &'a Path,
        format: ArchiveFormat,
        options: &'a ExtractOptions,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            archive,
            format,
            options,
            cancel,
            session: None,
            claimed: HashSet::new(),
            files: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn archive(&self) -> &Path {
        self.archive
    }

    pub fn check_cancelled(&self) -> Result<()> {
        if self.cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        Ok(())
    }

    fn root(&mut self) -> Result<&Path> {
        let session = match self.session.take() {
            Some(session) => session,
            None => TempSession::allocate(
                self.format.session_tag(),
                self.options.temp_root.as_deref(),
            )?,
        };
        Ok(self.session.insert(session).root())
    }

    /// Decode and sanitize the entry name, then resolve it under the session
    /// root. Returns `None` when the entry is skipped.
    pub fn place(&mut self, entry: &ArchiveEntry) -> Result<Option<Placement>> {
        match self.try_place(entry) {
            Ok(placement) => Ok(Some(placement)),
            Err(err) if err.is_entry_local() => {
                let name = entry.name.display_lossy().into_owned();
                warn!(
                    archive = %self.archive.display(),
                    entry = %name,
                    error = %err,
                    "skipping entry"
                );
                self.skipped.push(SkippedEntry::new(name, &err));
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    fn try_place(&mut self, entry: &ArchiveEntry) -> Result<Placement> {
        let name = entry.name.decode(self.options.codepage)?;
        let sanitized = sanitize_name(&name)?;
        if sanitized.stripped_traversal {
            warn!(
                archive = %self.archive.display(),
                entry = %sanitized.original,
                relative = %sanitized.relative.display(),
                "stripped traversal from entry name"
            );
        }
        let target = resolve(self.root()?, &sanitized)?;
        let placement = Placement {
            relative: sanitized.relative,
            target,
        };
        if entry.is_directory {
            return Ok(placement);
        }
        Ok(self.claim(placement))
    }

    fn claim(&mut self, placement: Placement) -> Placement {
        if self.claimed.insert(placement.target.clone()) {
            return placement;
        }

        let stem = placement
            .target
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = placement
            .target
            .extension()
            .map(|e| e.to_string_lossy().into_owned());
        let mut n = 1u32;
        loop {
            let file_name = match &ext {
                Some(ext) => format!("{stem} ({n}).{ext}"),
                None => format!("{stem} ({n})"),
            };
            let target = placement.target.with_file_name(&file_name);
            if self.claimed.insert(target.clone()) {
                let relative = placement.relative.with_file_name(&file_name);
                warn!(
                    archive = %self.archive.display(),
                    entry = %placement.relative.display(),
                    renamed = %relative.display(),
                    "entry name collides with an earlier file"
                );
                return Placement { relative, target };
            }
            n += 1;
        }
    }

    pub fn create_dir(&mut self, placement: &Placement) -> Result<()> {
        debug!(dir = %placement.relative.display(), "creating directory");
        create_dir_all(&placement.target)
    }

    /// Create the parent directories of a file placement.
    pub fn prepare_file(&mut self, placement: &Placement) -> Result<()> {
        match placement.target.parent() {
            Some(parent) => create_dir_all(parent),
            None => Ok(()),
        }
    }

    /// Stream `content` into the placement's target and record the file.
    pub fn write_file(&mut self, placement: Placement, content: &mut dyn Read) -> Result<()> {
        self.prepare_file(&placement)?;

        let mut out = File::create(&placement.target).map_err(|source| Error::IoWriteFailure {
            path: placement.target.clone(),
            source,
        })?;

        let mut buffer = [0u8; COPY_BUFFER];
        let mut written = 0u64;
        loop {
            self.check_cancelled()?;
            let n = match content.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => return Err(Error::corrupt(self.archive, err)),
            };
            out.write_all(&buffer[..n])
                .map_err(|source| Error::IoWriteFailure {
                    path: placement.target.clone(),
                    source,
                })?;
            written += n as u64;
        }

        self.record_file(placement, written);
        Ok(())
    }

    /// Record a file some decoder has already written to its placement.
    pub fn record_file(&mut self, placement: Placement, size: u64) {
        debug!(file = %placement.relative.display(), size, "extracted entry");
        self.files.push(ExtractedFile {
            path: placement.target,
            size,
            archive: Some(self.archive.to_path_buf()),
            relative_name: placement.relative,
        });
    }

    pub fn finish(self) -> Extraction {
        Extraction::new(
            self.archive.to_path_buf(),
            self.format,
            self.files,
            self.skipped,
            self.session,
        )
    }
}

fn create_dir_all(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|source| Error::IoWriteFailure {
        path: path.to_path_buf(),
        source,
    })
}
