//! アップロード対象の収集
//!
//! オペレーターが指定したパス（ファイルまたはフォルダ）を Upload に変換する。
//! フォルダは直下の PNG/JPEG のみ、ファイル名順。

use crate::error::{FinderError, Result};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// アップロードされた1ファイル
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    source: UploadSource,
}

#[derive(Debug, Clone)]
enum UploadSource {
    File(PathBuf),
    Memory(Vec<u8>),
}

impl Upload {
    pub fn from_path(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());

        Self {
            file_name,
            source: UploadSource::File(path.to_path_buf()),
        }
    }

    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            source: UploadSource::Memory(bytes),
        }
    }

    /// 内容を読み込む（ファイルの場合はここで初めて読む）
    pub fn read(&self) -> Result<Cow<'_, [u8]>> {
        match &self.source {
            UploadSource::File(path) => Ok(Cow::Owned(std::fs::read(path)?)),
            UploadSource::Memory(bytes) => Ok(Cow::Borrowed(bytes)),
        }
    }
}

fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| is_image_extension(&ext.to_string_lossy()))
        .unwrap_or(false)
}

fn is_image_extension(ext: &str) -> bool {
    IMAGE_EXTENSIONS
        .iter()
        .any(|known| known.eq_ignore_ascii_case(ext))
}

/// フォルダ直下の画像をファイル名順に収集
pub fn scan_folder(folder: &Path) -> Result<Vec<Upload>> {
    if !folder.exists() {
        return Err(FinderError::FolderNotFound(folder.display().to_string()));
    }

    let mut paths: Vec<PathBuf> = WalkDir::new(folder)
        .max_depth(1)  // 直下のみ（再帰しない）
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && is_image_path(p))
        .collect();

    // ファイル名でソート
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(paths.iter().map(|p| Upload::from_path(p)).collect())
}

/// 指定パス群から画像アップロードを収集（指定順を保つ）
pub fn collect_images(paths: &[PathBuf]) -> Result<Vec<Upload>> {
    let mut uploads = Vec::new();

    for path in paths {
        if path.is_dir() {
            uploads.extend(scan_folder(path)?);
        } else if path.is_file() {
            if is_image_path(path) {
                uploads.push(Upload::from_path(path));
            } else {
                tracing::warn!(path = %path.display(), "画像ではないためスキップ");
            }
        } else {
            return Err(FinderError::FileNotFound(path.display().to_string()));
        }
    }

    Ok(uploads)
}

/// 名前リスト（テキストファイル）のアップロード
pub fn name_list(path: &Path) -> Result<Upload> {
    if !path.is_file() {
        return Err(FinderError::FileNotFound(path.display().to_string()));
    }
    Ok(Upload::from_path(path))
}
