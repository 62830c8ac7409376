//! App - アプリケーション層
//!
//! # 主要コンポーネント
//! - **DispatcherBuilder**: handler の登録と起動時検証
//! - **TaskDispatcher**: task 識別子 → handler の実行
//! - **DispatcherConfig**: handler set の設定（TOML）

pub mod builder;
pub mod config;
pub mod dispatcher;

pub use self::builder::{BuildError, DispatcherBuilder};
pub use self::config::{ConfigError, DispatcherConfig};
pub use self::dispatcher::TaskDispatcher;
