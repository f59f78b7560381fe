use crate::error::{FinderError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const TESSERACT_ENV: &str = "PACK_FINDER_TESSERACT";
const LANGUAGE_ENV: &str = "PACK_FINDER_LANG";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OCR言語（tesseract の言語コード）
    pub language: String,
    pub tesseract_command: String,
    /// 作業領域の親ディレクトリ（None ならシステムの一時ディレクトリ）
    pub work_dir: Option<PathBuf>,
    /// 読み込み後にプレビューする名前の数
    pub preview_count: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "por".into(),
            tesseract_command: "tesseract".into(),
            work_dir: None,
            preview_count: 10,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| FinderError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("pack-finder").join("config.json"))
    }

    /// OCRコマンド（環境変数を優先）
    pub fn tesseract_command(&self) -> String {
        std::env::var(TESSERACT_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.tesseract_command.clone())
    }

    /// OCR言語（環境変数を優先）
    pub fn language(&self) -> String {
        std::env::var(LANGUAGE_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.language.clone())
    }

    pub fn set_language(&mut self, language: String) -> Result<()> {
        let language = language.trim();
        if language.is_empty() {
            return Err(FinderError::Config("言語コードが空です".into()));
        }
        self.language = language.to_string();
        self.save()
    }

    pub fn set_tesseract_command(&mut self, command: String) -> Result<()> {
        if command.trim().is_empty() {
            return Err(FinderError::Config("OCRコマンドが空です".into()));
        }
        self.tesseract_command = command;
        self.save()
    }

    pub fn set_work_dir(&mut self, dir: PathBuf) -> Result<()> {
        self.work_dir = Some(dir);
        self.save()
    }
}
