//! Tesseract CLI連携モジュール
//!
//! `tesseract <画像> stdout -l <言語>` を実行して標準出力を読む。

use super::{EngineInfo, TextRecognizer};
use crate::error::{FinderError, Result};
use crate::storage::StoredFile;
use std::process::{Command, Output};

#[derive(Debug, Clone)]
pub struct TesseractCli {
    command: String,
    language: String,
}

impl TesseractCli {
    pub fn new(command: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            language: language.into(),
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    fn run(&self, args: &[&str]) -> std::io::Result<Output> {
        tracing::debug!(command = %self.command, ?args, "tesseract 実行");
        Command::new(&self.command).args(args).output()
    }
}

impl TextRecognizer for TesseractCli {
    fn recognize(&self, image: &StoredFile) -> Result<String> {
        let path = image.location.to_string_lossy().into_owned();
        let output = self
            .run(&[path.as_str(), "stdout", "-l", self.language.as_str()])
            .map_err(|e| FinderError::OcrFailed(format!("tesseract 実行エラー: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FinderError::OcrFailed(format!(
                "tesseract failed (code {:?}): {}",
                output.status.code(),
                stderr.trim()
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).to_string();
        tracing::debug!(file = %image.file_name, chars = text.chars().count(), "OCR完了");
        Ok(text)
    }

    fn ensure_available(&self) -> Result<EngineInfo> {
        let output = self
            .run(&["--version"])
            .map_err(|e| FinderError::MissingOcrDependency(format!("{} ({})", self.command, e)))?;

        if !output.status.success() {
            return Err(FinderError::MissingOcrDependency(format!(
                "{} --version が失敗しました (code {:?})",
                self.command,
                output.status.code()
            )));
        }

        // 古い版は stderr にバージョンを出す
        let version = parse_version(&String::from_utf8_lossy(&output.stdout))
            .or_else(|| parse_version(&String::from_utf8_lossy(&output.stderr)))
            .unwrap_or_default();

        let output = self
            .run(&["--list-langs"])
            .map_err(|e| FinderError::MissingOcrDependency(format!("{} ({})", self.command, e)))?;
        // 3.x 系は一覧を stderr に出す
        let mut languages = parse_languages(&String::from_utf8_lossy(&output.stdout));
        if languages.is_empty() {
            languages = parse_languages(&String::from_utf8_lossy(&output.stderr));
        }

        if !languages.iter().any(|l| l == &self.language) {
            return Err(FinderError::MissingOcrDependency(format!(
                "言語データ '{}' がインストールされていません（利用可能: {}）",
                self.language,
                languages.join(", ")
            )));
        }

        Ok(EngineInfo { version, languages })
    }
}

fn parse_version(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

/// `--list-langs` の出力から言語コードを取り出す（先頭の見出し行は除く）
fn parse_languages(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("List of available languages"))
        .map(str::to_string)
        .collect()
}
