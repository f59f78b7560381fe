//! 照合リストの読み込み
//!
//! - 名前リスト: テキストファイル1つ、1行1名
//! - 参照画像: 画像ファイル複数、作業領域に保存してファイル名をラベルにする
//!
//! 2つのモードは1回の検索で排他。1件の失敗はスキップして残りを読み込む。

use crate::error::{FailureStage, FinderError, ItemFailure, Result};
use crate::scanner::Upload;
use crate::storage::{Area, WorkingStorage};
use pack_finder_common::{image_label, parse_name_list, ReferenceEntry};

/// 照合リストの入力
#[derive(Debug, Clone)]
pub enum CorpusSource {
    NameList(Upload),
    ImageSet(Vec<Upload>),
}

impl CorpusSource {
    /// アップロードが空でないか（名前リストはファイルがあれば可）
    pub fn is_present(&self) -> bool {
        match self {
            CorpusSource::NameList(_) => true,
            CorpusSource::ImageSet(uploads) => !uploads.is_empty(),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            CorpusSource::NameList(upload) => format!("名前リスト {}", upload.file_name),
            CorpusSource::ImageSet(uploads) => format!("参照画像 {}枚", uploads.len()),
        }
    }
}

/// 読み込み結果
#[derive(Debug, Default)]
pub struct LoadedCorpus {
    /// 入力順のエントリ（重複はそのまま）
    pub entries: Vec<ReferenceEntry>,
    pub failures: Vec<ItemFailure>,
}

/// 照合リストを読み込む
pub fn load(source: &CorpusSource, storage: &mut dyn WorkingStorage) -> LoadedCorpus {
    match source {
        CorpusSource::NameList(upload) => load_name_list(upload),
        CorpusSource::ImageSet(uploads) => load_image_set(uploads, storage),
    }
}

fn load_name_list(upload: &Upload) -> LoadedCorpus {
    let mut loaded = LoadedCorpus::default();

    let bytes = match upload.read() {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(file = %upload.file_name, error = %e, "名前リストを読めません");
            loaded.failures.push(ItemFailure::new(&upload.file_name, FailureStage::CorpusLoad, &e));
            return loaded;
        }
    };

    let list = parse_name_list(&bytes);
    for line in list.rejected_lines {
        let source_id = format!("{}:{}", upload.file_name, line);
        let error = FinderError::CorpusLoad("UTF-8として読めない行です".into());
        tracing::warn!(line = %source_id, "名前リストの行をスキップ");
        loaded.failures.push(ItemFailure::new(source_id, FailureStage::CorpusLoad, &error));
    }

    loaded.entries = list
        .names
        .into_iter()
        .map(|name| ReferenceEntry::Name { name })
        .collect();
    loaded
}

fn load_image_set(uploads: &[Upload], storage: &mut dyn WorkingStorage) -> LoadedCorpus {
    let mut loaded = LoadedCorpus::default();

    for upload in uploads {
        match store_reference_image(upload, storage) {
            Ok(entry) => loaded.entries.push(entry),
            Err(e) => {
                tracing::warn!(file = %upload.file_name, error = %e, "参照画像をスキップ");
                loaded.failures.push(ItemFailure::new(&upload.file_name, FailureStage::CorpusLoad, &e));
            }
        }
    }

    loaded
}

fn store_reference_image(upload: &Upload, storage: &mut dyn WorkingStorage) -> Result<ReferenceEntry> {
    let label = image_label(&upload.file_name).ok_or_else(|| {
        FinderError::CorpusLoad(format!("ファイル名からラベルを作れません: {}", upload.file_name))
    })?;

    let bytes = upload.read()?;
    let stored = storage.write(Area::Reference, &upload.file_name, &bytes)?;

    Ok(ReferenceEntry::Image {
        label,
        file_name: upload.file_name.clone(),
        location: stored.location,
    })
}
