//! Impls - ports の実装（開発用・テスト用）
//!
//! # 含まれる実装
//! - **NamedRegistry**: 名前で引く拡張レジストリ（action handler / 送信サービス）
//! - **memory**: 呼び出しを Journal に記録する in-memory コラボレータ
//!
//! 本番用のストア・キャッシュ・通知の実装はホストアプリケーション側が持ちます。

pub mod memory;
pub mod registry;

pub use self::registry::NamedRegistry;
