#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use fident_archive::ExtractOptions;
use sevenz_rust::{SevenZArchiveEntry, SevenZWriter};

/// Options that keep every session inside `scratch`.
pub fn options_in(scratch: &Path) -> ExtractOptions {
    ExtractOptions::default().temp_root(scratch.join("sessions"))
}

/// Session directories currently present under [`options_in`]'s root.
pub fn sessions_in(scratch: &Path) -> Vec<PathBuf> {
    match std::fs::read_dir(scratch.join("sessions")) {
        Ok(dir) => dir.map(|e| e.unwrap().path()).collect(),
        Err(_) => Vec::new(),
    }
}

pub enum Entry {
    File { name: Vec<u8>, data: Vec<u8> },
    Dir { name: Vec<u8> },
}

impl Entry {
    pub fn file(name: &str, data: &str) -> Self {
        Self::File {
            name: name.as_bytes().to_vec(),
            data: data.as_bytes().to_vec(),
        }
    }

    pub fn raw_file(name: &[u8], data: &str) -> Self {
        Self::File {
            name: name.to_vec(),
            data: data.as_bytes().to_vec(),
        }
    }

    pub fn dir(name: &str) -> Self {
        Self::Dir {
            name: name.as_bytes().to_vec(),
        }
    }

    fn name(&self) -> &[u8] {
        match self {
            Self::File { name, .. } | Self::Dir { name } => name,
        }
    }

    fn data(&self) -> &[u8] {
        match self {
            Self::File { data, .. } => data,
            Self::Dir { .. } => &[],
        }
    }

    fn is_dir(&self) -> bool {
        matches!(self, Self::Dir { .. })
    }
}

pub fn write(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// Build a stored ZIP by hand so entry names go to disk byte for byte.
///
/// Names are written without the UTF-8 flag unless `utf8` is set.
pub fn zip_bytes(entries: &[Entry], utf8: bool) -> Vec<u8> {
    const DOS_DATE: u16 = 0x5821;
    let flags: u16 = if utf8 { 0x0800 } else { 0 };

    let mut out = Vec::new();
    let mut central = Vec::new();

    for entry in entries {
        let name = entry.name();
        let data = entry.data();
        let crc = crc32fast::hash(data);
        let offset = out.len() as u32;

        out.extend_from_slice(&0x0403_4b50u32.to_le_bytes());
        out.extend_from_slice(&20u16.to_le_bytes());
        out.extend_from_slice(&flags.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(&DOS_DATE.to_le_bytes());
        out.extend_from_slice(&crc.to_le_bytes());
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(&(data.len() as u32).to_le_bytes());
        out.extend_from_slice(&(name.len() as u16).to_le_bytes());
        out.extend_from_slice(&0u16.to_le_bytes());
        out.extend_from_slice(name);
        out.extend_from_slice(data);

        let external: u32 = if entry.is_dir() { 0x10 } else { 0x20 };
        central.extend_from_slice(&0x0201_4b50u32.to_le_bytes());
        central.extend_from_slice(&20u16.to_le_bytes());
        central.extend_from_slice(&20u16.to_le_bytes());
        central.extend_from_slice(&flags.to_le_bytes());
        central.extend_from_slice(&0u16.to_le_bytes());
        central.extend_from_slice(&0u16.to_le_bytes());
        central.extend_from_slice(&DOS_DATE.to_le_bytes());
        central.extend_from_slice(&crc.to_le_bytes());
        central.extend_from_slice(&(data.len() as u32).to_le_bytes());
        central.extend_from_slice(&(data.len() as u32).to_le_bytes());
        central.extend_from_slice(&(name.len() as u16).to_le_bytes());
        central.extend_from_slice(&0u16.to_le_bytes());
        central.extend_from_slice(&0u16.to_le_bytes());
        central.extend_from_slice(&0u16.to_le_bytes());
        central.extend_from_slice(&0u16.to_le_bytes());
        central.extend_from_slice(&external.to_le_bytes());
        central.extend_from_slice(&offset.to_le_bytes());
        central.extend_from_slice(name);
    }

    let central_offset = out.len() as u32;
    out.extend_from_slice(&central);

    out.extend_from_slice(&0x0605_4b50u32.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    out.extend_from_slice(&(entries.len() as u16).to_le_bytes());
    out.extend_from_slice(&(central.len() as u32).to_le_bytes());
    out.extend_from_slice(&central_offset.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out
}

/// ZIP built with the `zip` writer, deflated.
pub fn zip_with_writer(path: &Path, entries: &[Entry]) {
    let file = std::fs::File::create(path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();

    for entry in entries {
        let name = String::from_utf8(entry.name().to_vec()).unwrap();
        if entry.is_dir() {
            writer.add_directory(name, options).unwrap();
        } else {
            writer.start_file(name, options).unwrap();
            writer.write_all(entry.data()).unwrap();
        }
    }
    writer.finish().unwrap();
}

/// Build a RAR 4 archive with stored entries. Names use `\` separators.
pub fn rar4_bytes(entries: &[Entry]) -> Vec<u8> {
    const MARKER: [u8; 7] = [0x52, 0x61, 0x72, 0x21, 0x1a, 0x07, 0x00];
    const HOST_WIN32: u8 = 2;
    const DOS_TIME: u32 = 0x5821_0000;
    const STORE: u8 = 0x30;

    let mut out = MARKER.to_vec();

    // Main header: type, flags, size, reserved.
    let mut main = vec![0x73];
    main.extend_from_slice(&0u16.to_le_bytes());
    main.extend_from_slice(&13u16.to_le_bytes());
    main.extend_from_slice(&[0; 6]);
    push_rar_block(&mut out, &main);

    for entry in entries {
        let name: Vec<u8> = entry
            .name()
            .iter()
            .map(|&b| if b == b'/' { b'\\' } else { b })
            .collect();
        let data = entry.data();
        let (flags, attr, crc) = if entry.is_dir() {
            (0x80e0u16, 0x10u32, 0u32)
        } else {
            (0x8000u16, 0x20u32, crc32fast::hash(data))
        };

        let mut header = vec![0x74];
        header.extend_from_slice(&flags.to_le_bytes());
        header.extend_from_slice(&((32 + name.len()) as u16).to_le_bytes());
        header.extend_from_slice(&(data.len() as u32).to_le_bytes());
        header.extend_from_slice(&(data.len() as u32).to_le_bytes());
        header.push(HOST_WIN32);
        header.extend_from_slice(&crc.to_le_bytes());
        header.extend_from_slice(&DOS_TIME.to_le_bytes());
        header.push(20);
        header.push(STORE);
        header.extend_from_slice(&(name.len() as u16).to_le_bytes());
        header.extend_from_slice(&attr.to_le_bytes());
        header.extend_from_slice(&name);
        push_rar_block(&mut out, &header);
        out.extend_from_slice(data);
    }

    let mut end = vec![0x7b];
    end.extend_from_slice(&0x4000u16.to_le_bytes());
    end.extend_from_slice(&7u16.to_le_bytes());
    push_rar_block(&mut out, &end);
    out
}

fn push_rar_block(out: &mut Vec<u8>, body: &[u8]) {
    let crc = (crc32fast::hash(body) & 0xffff) as u16;
    out.extend_from_slice(&crc.to_le_bytes());
    out.extend_from_slice(body);
}

pub fn sevenz_archive(path: &Path, entries: &[Entry]) {
    let mut writer = SevenZWriter::create(path).unwrap();
    for entry in entries {
        let mut archive_entry = SevenZArchiveEntry::new();
        archive_entry.name = String::from_utf8(entry.name().to_vec()).unwrap();
        if entry.is_dir() {
            archive_entry.is_directory = true;
            archive_entry.has_stream = false;
            writer
                .push_archive_entry::<Cursor<Vec<u8>>>(archive_entry, None)
                .unwrap();
        } else {
            archive_entry.has_stream = !entry.data().is_empty();
            writer
                .push_archive_entry(archive_entry, Some(Cursor::new(entry.data().to_vec())))
                .unwrap();
        }
    }
    writer.finish().unwrap();
}
