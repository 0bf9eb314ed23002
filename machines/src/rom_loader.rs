//! ROM image sets and validation.
//!
//! A [`RomSet`] is a bag of named files read from a directory or archive.
//! A [`RomImage`] describes one image the machine wants out of that bag:
//! the filenames it is distributed under, the sizes it may have and the
//! CRC32s of known good dumps. Names are matched case-insensitively because
//! CoCo dumps travel as both `coco3.rom` and `COCO3.ROM`.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

/// CRC-32 lookup table, reflected polynomial 0xEDB88320 (ZIP/PNG variant).
const CRC32_TABLE: [u32; 256] = {
    let mut table = [0u32; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut bit = 0;
        while bit < 8 {
            c = if c & 1 != 0 { 0xEDB8_8320 ^ (c >> 1) } else { c >> 1 };
            bit += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
};

pub fn crc32(data: &[u8]) -> u32 {
    !data.iter().fold(!0u32, |crc, &byte| {
        CRC32_TABLE[((crc ^ byte as u32) & 0xFF) as usize] ^ (crc >> 8)
    })
}

#[derive(Debug, Error)]
pub enum RomLoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// None of the image's filenames is present in the set.
    #[error("missing {image} ROM (looked for {})", .names.join(", "))]
    MissingFile {
        image: &'static str,
        names: &'static [&'static str],
    },

    #[error("ROM {file}: {actual} bytes is not a valid size (expected {})", format_sizes(.allowed))]
    SizeMismatch {
        file: String,
        actual: usize,
        allowed: &'static [usize],
    },

    /// CRC32 matches none of the known dumps.
    #[error("ROM {file}: CRC32 0x{actual:08X} matches no known dump")]
    ChecksumMismatch { file: String, actual: u32 },
}

fn format_sizes(sizes: &[usize]) -> String {
    sizes
        .iter()
        .map(|s| format!("{s}"))
        .collect::<Vec<_>>()
        .join(" or ")
}

// ---------------------------------------------------------------------------
// RomSet
// ---------------------------------------------------------------------------

/// ROM files keyed by lowercased filename.
#[derive(Debug, Default)]
pub struct RomSet {
    files: HashMap<String, Vec<u8>>,
}

impl RomSet {
    /// Read every regular file in `path` (non-recursive).
    pub fn from_directory(path: &Path) -> Result<Self, RomLoadError> {
        let mut set = Self::default();
        for entry in std::fs::read_dir(path)? {
            let file_path = entry?.path();
            if !file_path.is_file() {
                continue;
            }
            if let Some(name) = file_path.file_name() {
                let data = std::fs::read(&file_path)?;
                set.insert(&name.to_string_lossy(), data);
            }
        }
        Ok(set)
    }

    /// Build a set from (filename, data) pairs, as read from an archive.
    /// Any directory prefix in the name is dropped.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, Vec<u8>)>) -> Self {
        let mut set = Self::default();
        for (name, data) in entries {
            set.insert(&name, data);
        }
        set
    }

    pub fn from_slices(entries: &[(&str, &[u8])]) -> Self {
        Self::from_entries(
            entries
                .iter()
                .map(|(name, data)| (name.to_string(), data.to_vec())),
        )
    }

    fn insert(&mut self, name: &str, data: Vec<u8>) {
        let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
        self.files.insert(base.to_ascii_lowercase(), data);
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.files
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn file_names(&self) -> Vec<&str> {
        self.files.keys().map(String::as_str).collect()
    }
}

// ---------------------------------------------------------------------------
// RomImage
// ---------------------------------------------------------------------------

/// One ROM image a machine expects, with every name it is known by.
pub struct RomImage {
    /// Short description used in error messages.
    pub label: &'static str,
    /// Candidate filenames, tried in order.
    pub names: &'static [&'static str],
    pub sizes: &'static [usize],
    /// CRC32s of known good dumps. Empty accepts any content.
    pub crc32: &'static [u32],
}

impl RomImage {
    /// Find, size-check and (when `verify` is set) checksum the image.
    pub fn load(&self, rom_set: &RomSet, verify: bool) -> Result<Vec<u8>, RomLoadError> {
        self.load_optional(rom_set, verify)?
            .ok_or(RomLoadError::MissingFile {
                image: self.label,
                names: self.names,
            })
    }

    /// Like [`load`](Self::load), but an absent image is `Ok(None)`. A
    /// present image that fails validation is still an error.
    pub fn load_optional(
        &self,
        rom_set: &RomSet,
        verify: bool,
    ) -> Result<Option<Vec<u8>>, RomLoadError> {
        let Some((name, data)) = self
            .names
            .iter()
            .find_map(|name| rom_set.get(name).map(|data| (*name, data)))
        else {
            return Ok(None);
        };

        if !self.sizes.contains(&data.len()) {
            return Err(RomLoadError::SizeMismatch {
                file: name.to_string(),
                actual: data.len(),
                allowed: self.sizes,
            });
        }

        if verify && !self.crc32.is_empty() {
            let actual = crc32(data);
            if !self.crc32.contains(&actual) {
                return Err(RomLoadError::ChecksumMismatch {
                    file: name.to_string(),
                    actual,
                });
            }
        }

        log::debug!("{} ROM: {name} ({} bytes)", self.label, data.len());
        Ok(Some(data.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static BASIC: RomImage = RomImage {
        label: "test BASIC",
        names: &["basic.rom", "basic3.rom"],
        sizes: &[4, 8],
        crc32: &[],
    };

    #[test]
    fn crc32_check_value() {
        assert_eq!(crc32(&[]), 0);
        assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
        assert_eq!(crc32(&[0x00]), 0xD202_EF8D);
    }

    #[test]
    fn lookup_ignores_case_and_archive_folders() {
        let rom_set = RomSet::from_entries(vec![
            ("COCO3.ROM".to_string(), vec![0x12, 0x34]),
            ("roms/Disk11.rom".to_string(), vec![0x56]),
        ]);
        assert_eq!(rom_set.get("coco3.rom"), Some(&[0x12, 0x34][..]));
        assert_eq!(rom_set.get("DISK11.ROM"), Some(&[0x56][..]));
        assert_eq!(rom_set.len(), 2);
    }

    #[test]
    fn image_found_under_alternate_name() {
        let rom_set = RomSet::from_slices(&[("BASIC3.ROM", &[1, 2, 3, 4])]);
        assert_eq!(BASIC.load(&rom_set, true).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn first_listed_name_wins() {
        let rom_set = RomSet::from_slices(&[("basic3.rom", &[9; 4]), ("basic.rom", &[1; 4])]);
        assert_eq!(BASIC.load(&rom_set, true).unwrap(), vec![1; 4]);
    }

    #[test]
    fn missing_image_names_every_candidate() {
        let err = BASIC.load(&RomSet::default(), true).unwrap_err();
        assert!(matches!(err, RomLoadError::MissingFile { .. }));
        assert_eq!(
            err.to_string(),
            "missing test BASIC ROM (looked for basic.rom, basic3.rom)"
        );
    }

    #[test]
    fn optional_image_absent_is_none() {
        assert!(
            BASIC
                .load_optional(&RomSet::default(), true)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn wrong_size_rejected_even_when_optional() {
        let rom_set = RomSet::from_slices(&[("basic.rom", &[0; 5])]);
        let err = BASIC.load_optional(&rom_set, false).unwrap_err();
        assert_eq!(
            err.to_string(),
            "ROM basic.rom: 5 bytes is not a valid size (expected 4 or 8)"
        );
    }

    #[test]
    fn checksum_checked_only_when_verifying() {
        static STRICT: RomImage = RomImage {
            label: "strict",
            names: &["s.rom"],
            sizes: &[4],
            crc32: &[0xDEAD_BEEF, 0x2144_DF1C],
        };
        // crc32 of four zero bytes
        let good = RomSet::from_slices(&[("s.rom", &[0; 4])]);
        assert!(STRICT.load(&good, true).is_ok());

        let bad = RomSet::from_slices(&[("s.rom", &[1; 4])]);
        let err = STRICT.load(&bad, true).unwrap_err();
        assert!(matches!(err, RomLoadError::ChecksumMismatch { ref file, .. } if file == "s.rom"));
        assert_eq!(STRICT.load(&bad, false).unwrap(), vec![1; 4]);
    }

    #[test]
    fn from_directory_reads_loose_files() {
        let dir = std::env::temp_dir().join("coco3_rom_loader_test");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(dir.join("nested")).unwrap();
        std::fs::write(dir.join("Basic.rom"), [0xAA, 0xBB, 0xCC, 0xDD]).unwrap();

        let rom_set = RomSet::from_directory(&dir).unwrap();
        assert_eq!(rom_set.file_names(), vec!["basic.rom"]);
        assert_eq!(BASIC.load(&rom_set, true).unwrap(), vec![0xAA, 0xBB, 0xCC, 0xDD]);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
