//! ファイルシステム上の作業領域
//!
//! 一時ディレクトリ（tempfile）の下に photos/ と reference/ を作る。
//! Drop で丸ごと削除される。

use super::{numbered_name, sanitize_file_name, Area, StoredFile, WorkingStorage};
use crate::error::{FinderError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const DIR_PREFIX: &str = "pack-finder-";

#[derive(Debug, Default)]
pub struct FsStorage {
    /// 一時ディレクトリの親（None ならシステムの一時ディレクトリ）
    parent: Option<PathBuf>,
    dir: Option<TempDir>,
    counts: HashMap<Area, usize>,
}

impl FsStorage {
    pub fn new(parent: Option<PathBuf>) -> Self {
        Self {
            parent,
            dir: None,
            counts: HashMap::new(),
        }
    }

    /// 用意済みの作業領域を作成して返す
    pub fn acquired(parent: Option<PathBuf>) -> Result<Self> {
        let mut storage = Self::new(parent);
        storage.acquire()?;
        Ok(storage)
    }

    fn area_dir(&self, area: Area) -> Result<PathBuf> {
        let dir = self
            .dir
            .as_ref()
            .ok_or_else(|| FinderError::Storage("作業領域が未作成です".into()))?;
        Ok(dir.path().join(area.dir_name()))
    }

    fn create_dir(&self) -> Result<TempDir> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(DIR_PREFIX);

        let dir = match &self.parent {
            Some(parent) => {
                std::fs::create_dir_all(parent)?;
                builder.tempdir_in(parent)?
            }
            None => builder.tempdir()?,
        };

        for area in [Area::Photos, Area::Reference] {
            std::fs::create_dir_all(dir.path().join(area.dir_name()))?;
        }
        Ok(dir)
    }
}

impl WorkingStorage for FsStorage {
    fn acquire(&mut self) -> Result<()> {
        if self.dir.is_none() {
            let dir = self.create_dir()?;
            tracing::debug!(root = %dir.path().display(), "作業領域を作成");
            self.dir = Some(dir);
        }
        Ok(())
    }

    fn write(&mut self, area: Area, file_name: &str, bytes: &[u8]) -> Result<StoredFile> {
        self.acquire()?;
        let area_dir = self.area_dir(area)?;

        let base = sanitize_file_name(file_name);
        let mut target = area_dir.join(&base);
        let mut n = 1;
        while target.exists() {
            target = area_dir.join(numbered_name(&base, n));
            n += 1;
        }

        std::fs::write(&target, bytes)?;
        *self.counts.entry(area).or_default() += 1;
        tracing::debug!(area = %area, path = %target.display(), size = bytes.len(), "保存");

        Ok(StoredFile {
            area,
            file_name: file_name.to_string(),
            location: target,
        })
    }

    fn read(&self, file: &StoredFile) -> Result<Vec<u8>> {
        Ok(std::fs::read(&file.location)?)
    }

    fn clear(&mut self) -> Result<()> {
        if let Some(dir) = self.dir.take() {
            let path = dir.path().to_path_buf();
            // 削除に失敗しても新しい領域を作って続行する
            if let Err(e) = dir.close() {
                tracing::warn!(path = %path.display(), error = %e, "作業領域の削除に失敗");
            }
        }
        self.counts.clear();
        self.acquire()
    }

    fn count(&self, area: Area) -> usize {
        self.counts.get(&area).copied().unwrap_or(0)
    }

    fn root(&self) -> Option<&Path> {
        self.dir.as_ref().map(|d| d.path())
    }
}

/// 作業ディレクトリ配下に残った作業領域を削除（前回のセッションの残り）
///
/// 削除したディレクトリ数を返す。
pub fn remove_stale(parent: &Path) -> Result<usize> {
    if !parent.exists() {
        return Ok(0);
    }

    let mut removed = 0;
    for entry in std::fs::read_dir(parent)?.flatten() {
        let path = entry.path();
        let is_session_dir = path.is_dir()
            && entry
                .file_name()
                .to_string_lossy()
                .starts_with(DIR_PREFIX);

        if is_session_dir {
            // 削除できないものは警告して残りを続行する
            match std::fs::remove_dir_all(&path) {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "作業領域の削除に失敗"),
            }
        }
    }
    Ok(removed)
}
