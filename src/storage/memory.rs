//! メモリ上の作業領域（テスト用）

use super::{numbered_name, sanitize_file_name, Area, StoredFile, WorkingStorage};
use crate::error::{FinderError, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: BTreeMap<PathBuf, Vec<u8>>,
    acquired: bool,
    clears: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// clear が呼ばれた回数
    pub fn clear_count(&self) -> usize {
        self.clears
    }

    fn virtual_path(area: Area, name: &str) -> PathBuf {
        PathBuf::from("memory").join(area.dir_name()).join(name)
    }
}

impl WorkingStorage for MemoryStorage {
    fn acquire(&mut self) -> Result<()> {
        self.acquired = true;
        Ok(())
    }

    fn write(&mut self, area: Area, file_name: &str, bytes: &[u8]) -> Result<StoredFile> {
        self.acquire()?;

        let base = sanitize_file_name(file_name);
        let mut location = Self::virtual_path(area, &base);
        let mut n = 1;
        while self.files.contains_key(&location) {
            location = Self::virtual_path(area, &numbered_name(&base, n));
            n += 1;
        }

        self.files.insert(location.clone(), bytes.to_vec());
        Ok(StoredFile {
            area,
            file_name: file_name.to_string(),
            location,
        })
    }

    fn read(&self, file: &StoredFile) -> Result<Vec<u8>> {
        self.files
            .get(&file.location)
            .cloned()
            .ok_or_else(|| FinderError::Storage(format!("{} は存在しません", file.location.display())))
    }

    fn clear(&mut self) -> Result<()> {
        self.files.clear();
        self.clears += 1;
        self.acquire()
    }

    fn count(&self, area: Area) -> usize {
        let prefix = PathBuf::from("memory").join(area.dir_name());
        self.files.keys().filter(|p| p.starts_with(&prefix)).count()
    }
}
