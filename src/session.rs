//! 検索セッション
//!
//! オペレーター1人の作業単位。写真と照合リストのアップロード、検索の実行、
//! 作業領域のクリアを受け付ける。処理はすべて逐次で、写真 i の結果は
//! 写真 i+1 の処理開始前に通知される。

use crate::corpus::{self, CorpusSource};
use crate::error::{FinderError, ItemFailure, Result};
use crate::extractor;
use crate::ocr::{EngineInfo, TextRecognizer};
use crate::scanner::Upload;
use crate::storage::WorkingStorage;
use pack_finder_common::{
    match_extraction, ExtractionResult, MatchResult, ReferenceEntry, SearchSummary,
};

/// 検索の進行通知
pub trait SearchObserver {
    fn extraction_started(&mut self, _total: usize) {}

    /// 写真1枚の抽出完了（index は0始まり）
    fn extracted(&mut self, _index: usize, _total: usize, _result: &ExtractionResult) {}

    fn item_failed(&mut self, _failure: &ItemFailure) {}

    fn corpus_loaded(&mut self, _entries: &[ReferenceEntry]) {}

    fn matched(&mut self, _result: &MatchResult) {}
}

/// 何もしない通知先
pub struct NoopObserver;

impl SearchObserver for NoopObserver {}

/// 1回の検索結果
#[derive(Debug, Default)]
pub struct SearchOutcome {
    /// アップロード順の抽出結果
    pub extractions: Vec<ExtractionResult>,
    pub corpus: Vec<ReferenceEntry>,
    /// extractions と同じ順序
    pub matches: Vec<MatchResult>,
    pub failures: Vec<ItemFailure>,
}

impl SearchOutcome {
    pub fn summary(&self) -> SearchSummary<'_> {
        SearchSummary {
            extractions: &self.extractions,
            corpus_size: self.corpus.len(),
            matches: &self.matches,
        }
    }
}

pub struct Session<S, R> {
    storage: S,
    recognizer: R,
    engine: EngineInfo,
    photos: Vec<Upload>,
    corpus: Option<CorpusSource>,
}

impl<S: WorkingStorage, R: TextRecognizer> Session<S, R> {
    /// セッションを開始する
    ///
    /// OCRエンジンが使えなければ MissingOcrDependency で失敗する。
    pub fn new(mut storage: S, recognizer: R) -> Result<Self> {
        let engine = recognizer.ensure_available()?;
        storage.acquire()?;
        tracing::info!(version = %engine.version, "セッション開始");

        Ok(Self {
            storage,
            recognizer,
            engine,
            photos: Vec::new(),
            corpus: None,
        })
    }

    pub fn engine(&self) -> &EngineInfo {
        &self.engine
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn photos(&self) -> &[Upload] {
        &self.photos
    }

    pub fn corpus(&self) -> Option<&CorpusSource> {
        self.corpus.as_ref()
    }

    /// 読み取る写真を設定（前回のアップロードは置き換える）
    pub fn upload_photos(&mut self, uploads: Vec<Upload>) {
        tracing::debug!(count = uploads.len(), "写真アップロード");
        self.photos = uploads;
    }

    /// 照合リストを名前リストに設定（参照画像モードは解除）
    pub fn upload_name_list(&mut self, upload: Upload) {
        tracing::debug!(file = %upload.file_name, "名前リストアップロード");
        self.corpus = Some(CorpusSource::NameList(upload));
    }

    /// 照合リストを参照画像に設定（名前リストモードは解除）
    pub fn upload_reference_images(&mut self, uploads: Vec<Upload>) {
        tracing::debug!(count = uploads.len(), "参照画像アップロード");
        self.corpus = Some(CorpusSource::ImageSet(uploads));
    }

    /// 検索を実行
    ///
    /// 写真か照合リストが無ければ MissingInputs（何も処理しない）。
    /// 読み込んだ照合リストが空なら、抽出結果の通知後に EmptyCorpus。
    pub fn run_search(&mut self, observer: &mut dyn SearchObserver) -> Result<SearchOutcome> {
        let Self {
            storage,
            recognizer,
            photos,
            corpus: corpus_source,
            ..
        } = self;

        let source = match corpus_source {
            Some(source) if source.is_present() && !photos.is_empty() => source,
            _ => return Err(FinderError::MissingInputs),
        };

        let mut outcome = SearchOutcome::default();

        // 1. 抽出（アップロード順、1枚ずつ）
        let total = photos.len();
        observer.extraction_started(total);
        for (index, upload) in photos.iter().enumerate() {
            let (result, failure) = extractor::extract(upload, &mut *storage, &*recognizer);
            if let Some(failure) = failure {
                observer.item_failed(&failure);
                outcome.failures.push(failure);
            }
            observer.extracted(index, total, &result);
            outcome.extractions.push(result);
        }

        // 2. 照合リスト読み込み
        let loaded = corpus::load(source, &mut *storage);
        for failure in &loaded.failures {
            observer.item_failed(failure);
        }
        outcome.failures.extend(loaded.failures);

        if loaded.entries.is_empty() {
            return Err(FinderError::EmptyCorpus);
        }
        observer.corpus_loaded(&loaded.entries);
        outcome.corpus = loaded.entries;

        // 3. 照合
        for extraction in &outcome.extractions {
            let matched = match_extraction(extraction, &outcome.corpus);
            observer.matched(&matched);
            outcome.matches.push(matched);
        }

        tracing::info!(
            photos = outcome.extractions.len(),
            corpus = outcome.corpus.len(),
            failures = outcome.failures.len(),
            "検索完了"
        );
        Ok(outcome)
    }

    /// 作業領域をクリア（以前の保存先パスはすべて無効になる）
    ///
    /// 失敗してもセッションは続行する。領域の再作成は次の保存時にやり直す。
    pub fn clear_storage(&mut self) {
        match self.storage.clear() {
            Ok(()) => tracing::info!("作業領域をクリア"),
            Err(e) => tracing::warn!(error = %e, "作業領域の再作成に失敗（次の保存時に再試行）"),
        }
    }
}
