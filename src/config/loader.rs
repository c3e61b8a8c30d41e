//! 設定ファイルの探索と読み込み

use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    I18nSettings,
};

/// ワークスペース設定ファイル名
pub const CONFIG_FILE_NAME: &str = ".i18n-store.json";

/// 読み込んだ設定と、その設定ファイルのあるディレクトリ
#[derive(Debug, Clone)]
pub(super) struct LoadedSettings {
    /// 設定ファイルの内容
    pub(super) settings: I18nSettings,
    /// `store.path` の相対パスの基準
    pub(super) base_dir: PathBuf,
}

/// `start_dir` から親ディレクトリへ向かって設定ファイルを探す
///
/// `.git` を含むディレクトリ (リポジトリのルート) より上は探さない
pub(super) fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .find_map(|dir| {
            let candidate = dir.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                return Some(Some(candidate));
            }
            dir.join(".git").exists().then_some(None)
        })
        .flatten()
}

/// ワークスペースから設定を読み込む
///
/// # Returns
/// - `Ok(Some(loaded))`: 設定ファイルが見つかり、読み込みに成功
/// - `Ok(None)`: 設定ファイルが見つからない
///
/// # Errors
/// - ファイル読み込みエラー
/// - JSON パースエラー
pub(super) fn load_from_workspace(
    workspace_root: &Path,
) -> Result<Option<LoadedSettings>, ConfigError> {
    let Some(config_path) = find_config_file(workspace_root) else {
        tracing::debug!("No {} found from {:?}", CONFIG_FILE_NAME, workspace_root);
        return Ok(None);
    };

    tracing::debug!("Loading configuration from: {:?}", config_path);
    let settings: I18nSettings = serde_json::from_str(&std::fs::read_to_string(&config_path)?)?;
    let base_dir =
        config_path.parent().map_or_else(|| workspace_root.to_path_buf(), Path::to_path_buf);

    Ok(Some(LoadedSettings { settings, base_dir }))
}
