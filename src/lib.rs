//! i18n-store-backend
//!
//! 永続ストアに保存された翻訳を解決し、見つからないキーを翻訳待ちのスタブとして記録する i18n バックエンド

pub mod backend;
pub mod config;
pub mod error;
pub mod interpolate;
pub mod key;
pub mod plural;
pub mod store;
pub mod translator;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use backend::{
    Chain,
    StaticBackend,
    StoreBackend,
};
pub use error::{
    I18nError,
    StoreError,
};
pub use translator::I18n;
pub use types::{
    Lookup,
    Namespace,
    Options,
    StoreOptions,
    Translated,
    Tree,
    Value,
};
