//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]
#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use crate::backend::{
    Resolver,
    StaticBackend,
    StoreBackend,
};
use crate::store::MemoryStore;
use crate::types::{
    StoreOptions,
    Tree,
};

/// メモリストアの上に StoreBackend を作成し、翻訳を保存する
///
/// # Arguments
/// * `locale` - 言語コード（例: "en", "ja"）
/// * `json` - ネストした翻訳データ
///
/// # Returns
/// ストアとバックエンドの組
pub(crate) fn store_backend(
    locale: &str,
    json: serde_json::Value,
) -> (Arc<MemoryStore>, Arc<StoreBackend>) {
    let store = Arc::new(MemoryStore::new());
    let backend = Arc::new(StoreBackend::new(store.clone()));
    backend.store_translations(locale, &Tree::from(json), StoreOptions::default()).unwrap();
    (store, backend)
}

/// 翻訳を保存した StaticBackend を作成する
pub(crate) fn static_backend(locale: &str, json: serde_json::Value) -> Arc<StaticBackend> {
    Arc::new(StaticBackend::new().with_translations(locale, &Tree::from(json)).unwrap())
}
