//! 対話式セッション
//!
//! メニューから アップロード / 検索 / クリア を繰り返す。
//! 作業領域はセッション中保持し、終了時に削除される。

use crate::console;
use crate::error::{FinderError, Result};
use crate::ocr::TextRecognizer;
use crate::scanner;
use crate::session::Session;
use crate::storage::{Area, WorkingStorage};
use dialoguer::{Input, Select};
use std::path::PathBuf;

/// メニュー操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    UploadPhotos,
    UploadNameList,
    UploadReferenceImages,
    RunSearch,
    ClearStorage,
    Status,
    Quit,
}

impl MenuAction {
    pub const ALL: [MenuAction; 7] = [
        MenuAction::UploadPhotos,
        MenuAction::UploadNameList,
        MenuAction::UploadReferenceImages,
        MenuAction::RunSearch,
        MenuAction::ClearStorage,
        MenuAction::Status,
        MenuAction::Quit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::UploadPhotos => "📸 写真をアップロード",
            MenuAction::UploadNameList => "🗂️ 名前リスト(.txt)をアップロード",
            MenuAction::UploadReferenceImages => "🖼️ 参照画像をアップロード",
            MenuAction::RunSearch => "🔍 検索を実行",
            MenuAction::ClearStorage => "🗑️ 作業領域をクリア",
            MenuAction::Status => "ℹ️ 状態を表示",
            MenuAction::Quit => "終了",
        }
    }
}

/// `;` 区切りのパス入力を分解（前後の空白と引用符は除く）
pub fn parse_path_list(input: &str) -> Vec<PathBuf> {
    input
        .split(';')
        .map(|p| p.trim().trim_matches(|c| c == '"' || c == '\''))
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .collect()
}

fn prompt_paths(prompt: &str) -> Result<Vec<PathBuf>> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(|e| FinderError::Prompt(e.to_string()))?;
    Ok(parse_path_list(&input))
}

fn select_action() -> Result<MenuAction> {
    let labels: Vec<&str> = MenuAction::ALL.iter().map(MenuAction::label).collect();
    let index = Select::new()
        .with_prompt("操作を選択")
        .items(&labels)
        .default(0)
        .interact()
        .map_err(|e| FinderError::Prompt(e.to_string()))?;
    Ok(MenuAction::ALL[index])
}

/// 対話式セッションを実行
pub fn run_interactive<S: WorkingStorage, R: TextRecognizer>(
    session: &mut Session<S, R>,
    preview_count: usize,
) -> Result<()> {
    println!("🔍 pack-finder - 対話セッション");
    println!("パスは ; 区切りで複数指定できます（フォルダは直下の画像）\n");

    loop {
        let action = select_action()?;

        // 1件の操作の失敗ではセッションを終了しない
        if let Err(e) = handle_action(session, action, preview_count) {
            match e {
                FinderError::Prompt(_) => return Err(e),
                other => println!("❌ {}", other),
            }
        }

        if action == MenuAction::Quit {
            println!("作業領域を削除して終了します");
            return Ok(());
        }
        println!();
    }
}

fn handle_action<S: WorkingStorage, R: TextRecognizer>(
    session: &mut Session<S, R>,
    action: MenuAction,
    preview_count: usize,
) -> Result<()> {
    match action {
        MenuAction::UploadPhotos => {
            let uploads = scanner::collect_images(&prompt_paths("写真のパス")?)?;
            println!("✔ {}枚の写真をアップロード", uploads.len());
            session.upload_photos(uploads);
        }
        MenuAction::UploadNameList => {
            let paths = prompt_paths("名前リストのパス")?;
            match paths.as_slice() {
                [path] => {
                    let upload = scanner::name_list(path)?;
                    println!("✔ 名前リスト {} をアップロード", upload.file_name);
                    session.upload_name_list(upload);
                }
                _ => println!("⚠ 名前リストは1ファイルだけ指定してください"),
            }
        }
        MenuAction::UploadReferenceImages => {
            let uploads = scanner::collect_images(&prompt_paths("参照画像のパス")?)?;
            println!("✔ {}枚の参照画像をアップロード", uploads.len());
            session.upload_reference_images(uploads);
        }
        MenuAction::RunSearch => {
            console::run_and_report(session, preview_count, false)?;
        }
        MenuAction::ClearStorage => {
            session.clear_storage();
            println!("✔ 作業領域をクリアしました");
        }
        MenuAction::Status => print_status(session),
        MenuAction::Quit => {}
    }
    Ok(())
}

fn print_status<S: WorkingStorage, R: TextRecognizer>(session: &Session<S, R>) {
    println!("状態:");
    println!("  OCR: {}", session.engine().version);
    println!("  写真: {}枚", session.photos().len());
    println!(
        "  照合リスト: {}",
        session
            .corpus()
            .map(|c| c.describe())
            .unwrap_or_else(|| "未アップロード".into())
    );

    let storage = session.storage();
    if let Some(root) = storage.root() {
        println!("  作業領域: {}", root.display());
    }
    println!(
        "  保存済み: 写真 {}件 / 参照画像 {}件",
        storage.count(Area::Photos),
        storage.count(Area::Reference)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_path_list() {
        let paths = parse_path_list(r#" fotos/a.jpg ; "C:\Fotos\caixa 1.png";; 'b.png' "#);
        assert_eq!(
            paths,
            vec![
                PathBuf::from("fotos/a.jpg"),
                PathBuf::from(r"C:\Fotos\caixa 1.png"),
                PathBuf::from("b.png"),
            ]
        );
        assert!(parse_path_list("   ").is_empty());
    }

    #[test]
    fn test_menu_covers_all_actions() {
        assert_eq!(MenuAction::ALL.len(), 7);
        assert_eq!(MenuAction::ALL[6], MenuAction::Quit);
        assert!(MenuAction::ALL.iter().all(|a| !a.label().is_empty()));
    }
}
