//! Turns the `--rom-path` argument into a [`RomSet`].
//!
//! Accepted forms are a ZIP archive, a single ROM image, a folder holding
//! `{rom_name}.zip`, or a folder of loose images.

use coco3_machines::rom_loader::{RomLoadError, RomSet};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

#[derive(Debug, PartialEq, Eq)]
enum RomSource {
    Archive(PathBuf),
    Image(PathBuf),
    Folder(PathBuf),
}

fn is_zip(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

fn resolve(rom_name: &str, path: &Path) -> io::Result<RomSource> {
    if path.is_file() {
        return Ok(if is_zip(path) {
            RomSource::Archive(path.to_path_buf())
        } else {
            RomSource::Image(path.to_path_buf())
        });
    }
    if path.is_dir() {
        let bundled = path.join(format!("{rom_name}.zip"));
        return Ok(if bundled.is_file() {
            RomSource::Archive(bundled)
        } else {
            RomSource::Folder(path.to_path_buf())
        });
    }
    Err(io::Error::new(
        io::ErrorKind::NotFound,
        format!("ROM path not found: {}", path.display()),
    ))
}

pub fn load_rom_set(rom_name: &str, path: &Path) -> Result<RomSet, RomLoadError> {
    let source = resolve(rom_name, path)?;
    log::info!("loading ROMs from {source:?}");
    match source {
        RomSource::Archive(zip) => read_archive(&zip),
        RomSource::Folder(dir) => RomSet::from_directory(&dir),
        RomSource::Image(file) => {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok(RomSet::from_entries([(name, std::fs::read(&file)?)]))
        }
    }
}

fn invalid_zip(err: zip::result::ZipError) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, format!("invalid ZIP: {err}"))
}

fn read_archive(path: &Path) -> Result<RomSet, RomLoadError> {
    let mut archive = zip::ZipArchive::new(BufReader::new(File::open(path)?)).map_err(invalid_zip)?;

    let mut entries = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(invalid_zip)?;
        if entry.is_dir() {
            continue;
        }
        let mut data = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut data)?;
        entries.push((entry.name().to_string(), data));
    }
    Ok(RomSet::from_entries(entries))
}
