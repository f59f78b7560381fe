//! 端末への進捗・結果表示

use crate::error::{FinderError, ItemFailure, Result};
use crate::ocr::TextRecognizer;
use crate::session::{NoopObserver, SearchObserver, Session};
use crate::storage::WorkingStorage;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use pack_finder_common::{
    corpus_preview, extraction_line, match_line, ExtractionResult, MatchResult, ReferenceEntry,
};

/// 検索の進捗を端末に表示する
pub struct ConsoleObserver {
    bar: Option<ProgressBar>,
    preview_count: usize,
}

impl ConsoleObserver {
    pub fn new(preview_count: usize) -> Self {
        Self {
            bar: None,
            preview_count,
        }
    }

    fn line(&self, message: String) {
        match &self.bar {
            Some(bar) => bar.println(message),
            None => println!("{}", message),
        }
    }
}

impl SearchObserver for ConsoleObserver {
    fn extraction_started(&mut self, total: usize) {
        println!("\n📄 写真から読み取った名前:");

        let bar = ProgressBar::new(total as u64);
        let style = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style.progress_chars("##-"));
        self.bar = Some(bar);
    }

    fn extracted(&mut self, index: usize, total: usize, result: &ExtractionResult) {
        self.line(format!("📦 {}", extraction_line(result)));

        if let Some(bar) = &self.bar {
            bar.inc(1);
            if index + 1 == total {
                bar.finish_and_clear();
            }
        }
        if index + 1 == total {
            self.bar = None;
        }
    }

    fn item_failed(&mut self, failure: &ItemFailure) {
        self.line(format!("❌ 処理エラー {}", failure));
    }

    fn corpus_loaded(&mut self, entries: &[ReferenceEntry]) {
        println!("\n📋 照合リストを読み込みました");
        println!("📊 {}件: {}", entries.len(), corpus_preview(entries, self.preview_count));
        println!("\n🖼️ 照合結果:");
    }

    fn matched(&mut self, result: &MatchResult) {
        if result.is_empty() {
            println!("⚠ {}", match_line(result));
        } else {
            println!("✅ {}", match_line(result));
        }
    }
}

/// 検索を実行して結果を表示
///
/// 入力不足・空の照合リストは警告を表示して Ok(false) を返す。
pub fn run_and_report<S: WorkingStorage, R: TextRecognizer>(
    session: &mut Session<S, R>,
    preview_count: usize,
    json: bool,
) -> Result<bool> {
    run_and_report_to(session, preview_count, json, &mut io::stdout())
}

/// 出力先を指定して検索を実行
///
/// JSONモードでは `out` にJSONサマリーだけを書き、警告は標準エラーに出す。
pub fn run_and_report_to<S: WorkingStorage, R: TextRecognizer>(
    session: &mut Session<S, R>,
    preview_count: usize,
    json: bool,
    out: &mut dyn Write,
) -> Result<bool> {
    let outcome = if json {
        session.run_search(&mut NoopObserver)
    } else {
        session.run_search(&mut ConsoleObserver::new(preview_count))
    };

    match outcome {
        Ok(outcome) => {
            if json {
                writeln!(out, "{}", outcome.summary().to_json()?)?;
            } else if !outcome.failures.is_empty() {
                writeln!(out, "\n⚠ {}件の処理エラーがありました", outcome.failures.len())?;
            }
            Ok(true)
        }
        Err(e @ FinderError::MissingInputs) => {
            warn_stopped(out, json, "⚠", &e)?;
            Ok(false)
        }
        Err(e @ FinderError::EmptyCorpus) => {
            warn_stopped(out, json, "❌", &e)?;
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

fn warn_stopped(out: &mut dyn Write, json: bool, mark: &str, error: &FinderError) -> Result<()> {
    if json {
        tracing::warn!(error = %error, "検索を中止");
        eprintln!("{} {}", mark, error);
    } else {
        writeln!(out, "{} {}", mark, error)?;
    }
    Ok(())
}
