use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pack-finder")]
#[command(about = "パッケージ写真のOCR読み取りと参照リスト照合ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 写真と照合リストを指定して1回検索する
    Run {
        /// 写真（ファイルまたはフォルダ）
        #[arg(required = true)]
        photos: Vec<PathBuf>,

        /// 名前リスト（テキストファイル、1行1名）
        #[arg(short, long, conflicts_with = "images")]
        names: Option<PathBuf>,

        /// 参照画像（ファイルまたはフォルダ）
        #[arg(short, long, num_args = 1..)]
        images: Vec<PathBuf>,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,

        /// 作業領域の親ディレクトリ
        #[arg(long)]
        work_dir: Option<PathBuf>,
    },

    /// 対話式セッションを開始
    Session {
        /// 作業領域の親ディレクトリ
        #[arg(long)]
        work_dir: Option<PathBuf>,
    },

    /// OCRエンジンの確認
    Check,

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// OCR言語を設定（例: por, eng）
        #[arg(long)]
        set_language: Option<String>,

        /// tesseract コマンドのパスを設定
        #[arg(long)]
        set_tesseract: Option<String>,

        /// 作業領域の親ディレクトリを設定
        #[arg(long)]
        set_work_dir: Option<PathBuf>,
    },

    /// 残っている作業領域を削除
    Clear {
        /// 対象ディレクトリ（省略時は設定値またはシステムの一時ディレクトリ）
        #[arg(long)]
        work_dir: Option<PathBuf>,
    },
}
