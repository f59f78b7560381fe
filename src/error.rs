use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinderError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像デコードエラー: {0}")]
    ImageDecode(String),

    #[error("OCR実行エラー: {0}")]
    OcrFailed(String),

    #[error("OCRエンジンが利用できません: {0}。tesseract をインストールするか `pack-finder config --set-tesseract PATH` で指定してください")]
    MissingOcrDependency(String),

    #[error("照合リスト読み込みエラー: {0}")]
    CorpusLoad(String),

    #[error("写真と照合リスト（テキストまたは参照画像）の両方をアップロードしてから検索してください")]
    MissingInputs,

    #[error("照合リストに名前がありません")]
    EmptyCorpus,

    #[error("作業領域エラー: {0}")]
    Storage(String),

    #[error("入力エラー: {0}")]
    Prompt(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] pack_finder_common::Error),
}

pub type Result<T> = std::result::Result<T, FinderError>;

/// 処理段階
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureStage {
    /// 写真の読み取り（デコード・OCR）
    Extraction,
    /// 照合リストの読み込み
    CorpusLoad,
}

/// 1件単位の失敗（バッチは止めない）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub source_id: String,
    pub stage: FailureStage,
    pub message: String,
}

impl ItemFailure {
    pub fn new(source_id: impl Into<String>, stage: FailureStage, error: &FinderError) -> Self {
        Self {
            source_id: source_id.into(),
            stage,
            message: error.to_string(),
        }
    }
}

impl std::fmt::Display for ItemFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.source_id, self.message)
    }
}
