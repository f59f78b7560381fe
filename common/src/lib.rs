//! Pack Finder Common Library
//!
//! CLIと対話セッションで共有される型と照合ロジック（I/Oなし）

pub mod types;
pub mod error;
pub mod extract;
pub mod matcher;
pub mod corpus;
pub mod report;

pub use types::{
    ExtractedName, ExtractionResult, MatchResult, ReferenceEntry,
    NAME_NOT_DETECTED, PROCESSING_ERROR,
};
pub use error::{Error, Result};
pub use extract::pick_candidate_name;
pub use matcher::{find_matches, is_match, match_extraction};
pub use corpus::{image_label, parse_name_list, NameList};
pub use report::{corpus_preview, extraction_line, match_line, SearchSummary};
