//! 設定管理を行うモジュール

use std::path::PathBuf;
use std::sync::Arc;

use super::{
    ConfigError,
    I18nSettings,
    loader,
};
use crate::error::StoreError;
use crate::store::{
    JsonFileStore,
    MemoryStore,
    TranslationStore,
};

/// 設定管理を行う
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: I18nSettings,

    /// ワークスペースのルートパス
    workspace_root: Option<PathBuf>,

    /// 読み込んだ設定ファイルのあるディレクトリ
    config_dir: Option<PathBuf>,
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: I18nSettings::default(), workspace_root: None, config_dir: None }
    }

    /// 設定を読み込む
    ///
    /// # Arguments
    /// * `workspace_root` - ワークスペースのルートパス
    ///
    /// # Returns
    /// - `Ok(())`: 設定の読み込みとバリデーション成功
    /// - `Err(ConfigError)`: エラー
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self, workspace_root: Option<PathBuf>) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings for workspace: {:?}", workspace_root);

        // ワークスペースの設定を読み込み
        let loaded = match &workspace_root {
            Some(root) => loader::load_from_workspace(root)?,
            None => None,
        };
        let (settings, config_dir) = match loaded {
            Some(loaded) => {
                tracing::debug!("Loaded workspace settings: {:?}", loaded.settings);
                (loaded.settings, Some(loaded.base_dir))
            }
            None => (I18nSettings::default(), None),
        };

        // バリデーション
        settings.validate().map_err(ConfigError::ValidationErrors)?;

        // 設定を保存
        self.current_settings = settings;
        self.workspace_root = workspace_root;
        self.config_dir = config_dir;
        tracing::debug!("Settings loaded successfully: {:?}", self.current_settings);

        Ok(())
    }

    /// 設定を更新する
    pub fn update_settings(&mut self, new_settings: I18nSettings) -> Result<(), ConfigError> {
        tracing::debug!("Updating settings...");

        // バリデーション
        new_settings.validate().map_err(ConfigError::ValidationErrors)?;

        // 設定を更新
        self.current_settings = new_settings;
        tracing::debug!("Settings updated successfully");

        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &I18nSettings {
        &self.current_settings
    }

    /// ワークスペースルートを取得
    #[must_use]
    pub const fn workspace_root(&self) -> Option<&PathBuf> {
        self.workspace_root.as_ref()
    }

    /// 翻訳ストアのファイルパスを取得
    ///
    /// 相対パスは設定ファイルのディレクトリ (なければワークスペースルート) からの相対として解決する
    #[must_use]
    pub fn store_path(&self) -> Option<PathBuf> {
        let path = PathBuf::from(self.current_settings.store.path.as_ref()?);
        match self.config_dir.as_ref().or(self.workspace_root.as_ref()) {
            Some(base) if path.is_relative() => Some(base.join(path)),
            _ => Some(path),
        }
    }

    /// 設定に従って翻訳ストアを開く
    ///
    /// `store.path` が未設定の場合はメモリ上のストア
    ///
    /// # Errors
    /// - ストアファイルの読み込みエラー
    /// - JSON パースエラー
    pub fn open_store(&self) -> Result<Arc<dyn TranslationStore>, StoreError> {
        match self.store_path() {
            Some(path) => Ok(Arc::new(JsonFileStore::open(path)?)),
            None => {
                tracing::debug!("No store path configured, using in-memory store");
                Ok(Arc::new(MemoryStore::new()))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;
    use crate::config::CONFIG_FILE_NAME;
    use crate::store::TranslationRecord;

    /// new: デフォルト値で作成される
    #[rstest]
    fn test_new_creates_default_settings() {
        let manager = ConfigManager::new();

        assert_eq!(manager.get_settings().default_separator, ".");
        assert!(manager.workspace_root().is_none());
    }

    /// load_settings: workspace_root が None の場合
    #[rstest]
    fn test_load_settings_without_workspace() {
        let mut manager = ConfigManager::new();

        let result = manager.load_settings(None);

        assert!(result.is_ok());
        assert_eq!(manager.get_settings().default_locale, "en");
        assert!(manager.workspace_root().is_none());
    }

    /// load_settings: 設定ファイルがある場合
    #[rstest]
    fn test_load_settings_with_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_content = r#"{"defaultLocale": "ja", "memoize": false}"#;
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), config_content).unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(Some(temp_dir.path().to_path_buf()));

        assert!(result.is_ok());
        assert_eq!(manager.get_settings().default_locale, "ja");
        assert!(!manager.get_settings().memoize);
        assert!(manager.workspace_root().is_some());
    }

    /// load_settings: 設定ファイルがない場合はデフォルト値
    #[rstest]
    fn test_load_settings_without_config_file() {
        let temp_dir = TempDir::new().unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(Some(temp_dir.path().to_path_buf()));

        assert!(result.is_ok());
        assert_eq!(manager.get_settings().default_separator, ".");
    }

    /// load_settings: 無効な設定ファイルはエラー
    #[rstest]
    fn test_load_settings_with_invalid_config_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), r#"{"defaultSeparator": ""}"#).unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_settings(Some(temp_dir.path().to_path_buf()));

        assert!(matches!(result, Err(ConfigError::ValidationErrors(_))));
    }

    /// update_settings: 有効な設定で更新成功
    #[rstest]
    fn test_update_settings_valid() {
        let mut manager = ConfigManager::new();
        let mut new_settings = I18nSettings::default();
        new_settings.default_separator = "|".to_string();

        let result = manager.update_settings(new_settings);

        assert!(result.is_ok());
        assert_eq!(manager.get_settings().separator(), '|');
    }

    /// update_settings: 無効な設定でエラー
    #[rstest]
    fn test_update_settings_invalid() {
        let mut manager = ConfigManager::new();
        let mut new_settings = I18nSettings::default();
        new_settings.default_separator = String::new(); // 空文字は無効

        let result = manager.update_settings(new_settings);

        assert!(result.is_err());
    }

    /// store_path: 親ディレクトリの設定ファイルからの相対として解決する
    #[rstest]
    fn test_store_path_is_relative_to_config_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), r#"{"store": {"path": "records.json"}}"#)
            .unwrap();
        let workspace = temp_dir.path().join("packages/web");
        fs::create_dir_all(&workspace).unwrap();

        let mut manager = ConfigManager::new();
        manager.load_settings(Some(workspace.clone())).unwrap();

        assert_eq!(manager.workspace_root(), Some(&workspace));
        assert_eq!(manager.store_path(), Some(temp_dir.path().join("records.json")));
    }

    /// open_store: ワークスペース相対のストアファイルを開く
    #[rstest]
    fn test_open_store_relative_to_workspace() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), r#"{"store": {"path": "records.json"}}"#)
            .unwrap();
        let mut manager = ConfigManager::new();
        manager.load_settings(Some(temp_dir.path().to_path_buf())).unwrap();

        let store = manager.open_store().unwrap();
        store.insert(TranslationRecord::new("en", "foo", None)).unwrap();

        assert_eq!(manager.store_path(), Some(temp_dir.path().join("records.json")));
        assert!(temp_dir.path().join("records.json").exists());
    }

    /// open_store: パス未設定の場合はメモリ上のストア
    #[rstest]
    fn test_open_store_without_path_is_in_memory() {
        let manager = ConfigManager::new();

        let store = manager.open_store().unwrap();

        assert!(manager.store_path().is_none());
        assert!(store.list_locales().unwrap().is_empty());
    }
}
