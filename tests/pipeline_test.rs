//! 検索パイプラインのテスト
//!
//! OCRは偽のエンジン、作業領域はメモリ上で検証する

use image::{DynamicImage, ImageFormat, RgbImage};
use pack_finder::error::{FailureStage, FinderError, Result};
use pack_finder::ocr::TextRecognizer;
use pack_finder::scanner::Upload;
use pack_finder::session::{NoopObserver, SearchObserver, Session};
use pack_finder::storage::{Area, MemoryStorage, StoredFile, WorkingStorage};
use pack_finder_common::{
    ExtractedName, ExtractionResult, MatchResult, ReferenceEntry, NAME_NOT_DETECTED,
};
use std::collections::{BTreeSet, HashMap};
use std::io::Cursor;

/// ファイル名ごとに決まったテキストを返すOCR
struct ScriptedOcr(HashMap<String, String>);

impl ScriptedOcr {
    fn new(pairs: &[(&str, &str)]) -> Self {
        Self(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

impl TextRecognizer for ScriptedOcr {
    fn recognize(&self, image: &StoredFile) -> Result<String> {
        Ok(self.0.get(&image.file_name).cloned().unwrap_or_default())
    }
}

/// 通知の順序を記録
#[derive(Default)]
struct Recorder {
    events: Vec<String>,
}

impl SearchObserver for Recorder {
    fn extracted(&mut self, index: usize, _total: usize, result: &ExtractionResult) {
        self.events.push(format!("extracted {} {}", index, result.source_id));
    }

    fn corpus_loaded(&mut self, entries: &[ReferenceEntry]) {
        self.events.push(format!("corpus {}", entries.len()));
    }

    fn matched(&mut self, result: &MatchResult) {
        self.events.push(format!("matched {}", result.source_id));
    }
}

fn png(name: &str) -> Upload {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::new(8, 8))
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    Upload::from_bytes(name, bytes)
}

fn name_list(lines: &str) -> Upload {
    Upload::from_bytes("nomes.txt", lines.as_bytes().to_vec())
}

fn session(ocr: ScriptedOcr) -> Session<MemoryStorage, ScriptedOcr> {
    Session::new(MemoryStorage::new(), ocr).unwrap()
}

#[test]
fn test_name_list_search() {
    let mut session = session(ScriptedOcr::new(&[
        ("a.png", "EMS\ndipirona 500mg\n"),
        ("b.png", "DORFLEX\nRelaxante"),
    ]));
    session.upload_photos(vec![png("a.png"), png("b.png")]);
    session.upload_name_list(name_list("Dipirona Sódica 500mg\nDorflex\nNeosaldina\n"));

    let outcome = session.run_search(&mut NoopObserver).unwrap();

    assert_eq!(outcome.extractions.len(), 2);
    assert_eq!(
        outcome.extractions[0].extracted_name,
        ExtractedName::Name("dipirona 500mg".into())
    );
    assert_eq!(outcome.corpus.len(), 3);
    assert_eq!(outcome.matches[0].labels(), vec!["Dipirona Sódica 500mg"]);
    assert_eq!(outcome.matches[1].labels(), vec!["Dorflex"]);
    assert!(outcome.failures.is_empty());
}

#[test]
fn test_no_photos_is_missing_inputs() {
    let mut session = session(ScriptedOcr::new(&[]));
    session.upload_name_list(name_list("Dorflex\n"));

    let mut recorder = Recorder::default();
    let result = session.run_search(&mut recorder);

    assert!(matches!(result, Err(FinderError::MissingInputs)));
    assert!(recorder.events.is_empty());
    assert_eq!(session.storage().count(Area::Photos), 0);
}

#[test]
fn test_one_broken_photo_does_not_abort_batch() {
    let mut session = session(ScriptedOcr::new(&[
        ("1.png", "Dorflex"),
        ("3.png", "Neosaldina"),
        ("4.png", "Buscopan Composto"),
    ]));
    session.upload_photos(vec![
        png("1.png"),
        Upload::from_bytes("2.jpg", b"\xff\xd8 truncated".to_vec()),
        png("3.png"),
        png("4.png"),
    ]);
    session.upload_name_list(name_list("Dorflex\nNeosaldina\nBuscopan\n"));

    let outcome = session.run_search(&mut NoopObserver).unwrap();

    assert_eq!(outcome.extractions.len(), 4);
    let errors: Vec<&ExtractionResult> = outcome
        .extractions
        .iter()
        .filter(|r| r.extracted_name == ExtractedName::ProcessingError)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].source_id, "2.jpg");

    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].stage, FailureStage::Extraction);

    let matched: Vec<usize> = outcome.matches.iter().map(|m| m.matches.len()).collect();
    assert_eq!(matched, vec![1, 0, 1, 1]);
}

#[test]
fn test_short_text_and_sentinel_in_corpus() {
    let mut session = session(ScriptedOcr::new(&[("xyz.png", "xyz")]));
    session.upload_photos(vec![png("xyz.png")]);
    session.upload_name_list(name_list(&format!("{}\nxyz\n", NAME_NOT_DETECTED)));

    let outcome = session.run_search(&mut NoopObserver).unwrap();
    assert_eq!(outcome.extractions[0].extracted_name, ExtractedName::NotDetected);
    assert!(outcome.matches[0].is_empty());
}

#[test]
fn test_results_reported_in_upload_order() {
    let mut session = session(ScriptedOcr::new(&[
        ("c.png", "Neosaldina"),
        ("a.png", "Dorflex"),
        ("b.png", "Paracetamol"),
    ]));
    session.upload_photos(vec![png("c.png"), png("a.png"), png("b.png")]);
    session.upload_name_list(name_list("Dorflex\n"));

    let mut recorder = Recorder::default();
    session.run_search(&mut recorder).unwrap();

    assert_eq!(
        recorder.events,
        vec![
            "extracted 0 c.png",
            "extracted 1 a.png",
            "extracted 2 b.png",
            "corpus 1",
            "matched c.png",
            "matched a.png",
            "matched b.png",
        ]
    );
}

#[test]
fn test_reference_image_search() {
    let mut session = session(ScriptedOcr::new(&[("foto.png", "Caixa DORFLEX 36 comprimidos")]));
    session.upload_photos(vec![png("foto.png")]);
    session.upload_reference_images(vec![
        Upload::from_bytes("dorflex.png", b"ref".to_vec()),
        Upload::from_bytes("ab.png", b"ref".to_vec()),
        Upload::from_bytes("neosaldina.jpg", b"ref".to_vec()),
    ]);

    let outcome = session.run_search(&mut NoopObserver).unwrap();

    let labels: BTreeSet<&str> = outcome.matches[0].labels().into_iter().collect();
    assert_eq!(labels, BTreeSet::from(["dorflex"]));
    assert_eq!(session.storage().count(Area::Reference), 3);
    assert_eq!(session.storage().count(Area::Photos), 1);
}

#[test]
fn test_blank_name_list_is_empty_corpus() {
    let mut session = session(ScriptedOcr::new(&[("a.png", "Dorflex")]));
    session.upload_photos(vec![png("a.png")]);
    session.upload_name_list(name_list("\n   \n"));

    let mut recorder = Recorder::default();
    let result = session.run_search(&mut recorder);

    assert!(matches!(result, Err(FinderError::EmptyCorpus)));
    // 抽出結果は通知済み
    assert_eq!(recorder.events, vec!["extracted 0 a.png"]);
}

#[test]
fn test_search_is_repeatable() {
    let mut session = session(ScriptedOcr::new(&[("a.png", "Dipirona Sódica")]));
    session.upload_photos(vec![png("a.png")]);
    session.upload_name_list(name_list("Dipirona\nDipirona\nDorflex\n"));

    let first = session.run_search(&mut NoopObserver).unwrap();
    let second = session.run_search(&mut NoopObserver).unwrap();

    assert_eq!(first.matches, second.matches);
    assert_eq!(first.matches[0].labels(), vec!["Dipirona"]);
    // 写真は実行ごとに追記保存される
    assert_eq!(session.storage().count(Area::Photos), 2);

    session.clear_storage();
    assert_eq!(session.storage().count(Area::Photos), 0);
}
