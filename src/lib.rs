pub mod cli;
pub mod config;
pub mod console;
pub mod corpus;
pub mod error;
pub mod extractor;
pub mod interactive;
pub mod ocr;
pub mod scanner;
pub mod session;
pub mod storage;
