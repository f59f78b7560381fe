use anyhow::Context;
use clap::Parser;
use pack_finder::{cli, config, console, interactive, ocr, scanner, session, storage};
use cli::{Cli, Commands};
use config::Config;
use ocr::{TesseractCli, TextRecognizer};
use session::Session;
use std::path::PathBuf;
use storage::FsStorage;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG があれば優先
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load().context("設定ファイルを読み込めません")?;

    match cli.command {
        Commands::Run { photos, names, images, json, work_dir } => {
            if !json {
                println!("🔍 pack-finder - 写真から名前を検索\n");
            }

            let mut session = start_session(&config, work_dir)?;

            session.upload_photos(scanner::collect_images(&photos)?);
            if let Some(path) = names {
                session.upload_name_list(scanner::name_list(&path)?);
            } else if !images.is_empty() {
                session.upload_reference_images(scanner::collect_images(&images)?);
            }

            let completed = console::run_and_report(&mut session, config.preview_count, json)?;
            if completed && !json {
                println!("\n✅ 検索完了");
            }
        }

        Commands::Session { work_dir } => {
            let mut session = start_session(&config, work_dir)?;
            interactive::run_interactive(&mut session, config.preview_count)?;
        }

        Commands::Check => {
            let engine = tesseract(&config);
            let info = engine.ensure_available()?;
            println!("✔ {}", info.version);
            println!("  言語: {} (使用: {})", info.languages.join(", "), engine.language());
        }

        Commands::Config { show, set_language, set_tesseract, set_work_dir } => {
            let mut config = config;

            if let Some(language) = set_language {
                config.set_language(language)?;
                println!("✔ OCR言語を設定しました");
            }

            if let Some(command) = set_tesseract {
                config.set_tesseract_command(command)?;
                println!("✔ tesseract コマンドを設定しました");
            }

            if let Some(dir) = set_work_dir {
                config.set_work_dir(dir)?;
                println!("✔ 作業領域を設定しました");
            }

            if show {
                println!("設定:");
                println!("  OCR言語: {}", config.language());
                println!("  tesseract: {}", config.tesseract_command());
                println!(
                    "  作業領域: {}",
                    config
                        .work_dir
                        .as_ref()
                        .map(|d| d.display().to_string())
                        .unwrap_or_else(|| "システムの一時ディレクトリ".into())
                );
                println!("  プレビュー件数: {}", config.preview_count);
            }
        }

        Commands::Clear { work_dir } => {
            let parent = work_dir
                .or_else(|| config.work_dir.clone())
                .unwrap_or_else(std::env::temp_dir);
            let removed = storage::remove_stale(&parent)
                .with_context(|| format!("作業領域を削除できません: {}", parent.display()))?;
            println!("✔ 作業領域をクリアしました ({}件)", removed);
        }
    }

    Ok(())
}

fn tesseract(config: &Config) -> TesseractCli {
    TesseractCli::new(config.tesseract_command(), config.language())
}

fn start_session(
    config: &Config,
    work_dir: Option<PathBuf>,
) -> anyhow::Result<Session<FsStorage, TesseractCli>> {
    let parent = work_dir.or_else(|| config.work_dir.clone());
    let session = Session::new(FsStorage::new(parent), tesseract(config))?;
    Ok(session)
}
