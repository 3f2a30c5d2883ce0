//! アプリケーション層
//!
//! 実行コンテキスト、並列ランナー、結果の集約と出力、
//! 各コマンドの操作を提供する。
pub mod config;
pub mod context;
pub mod operations;
pub mod outcome;
pub mod record;
pub mod render;
pub mod runner;

pub use config::{AppConfig, ConfigOverrides};
pub use context::{ContextBuilder, ExecutionContext};
pub use outcome::{Outcome, Outcomes, RunSummary};
pub use record::Record;
pub use render::Renderer;
pub use runner::{Operation, OperationResult, Runner};
