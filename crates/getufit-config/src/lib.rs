pub mod config;
pub mod manager;

pub use config::{
    Config, ConfigError, ConfigResult, LogLevel, LoggingConfig, ServicesConfig, StorageConfig,
};
pub use manager::ConfigManager;

use std::path::PathBuf;

/// 获取 GetUFit 配置目录路径
pub fn getufit_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".getufit"))
}

/// 获取默认配置文件路径
pub fn default_config_path() -> Option<PathBuf> {
    getufit_dir().map(|dir| dir.join("config.json"))
}

/// 获取默认日志文件路径
pub fn default_log_path() -> Option<PathBuf> {
    getufit_dir().map(|dir| dir.join("logs").join("getufit.log"))
}

/// 初始化 GetUFit 目录结构
pub async fn init_getufit_dirs() -> ConfigResult<()> {
    if let Some(base) = getufit_dir() {
        tokio::fs::create_dir_all(&base).await?;
        tokio::fs::create_dir_all(base.join("logs")).await?;
    }
    Ok(())
}

/// 展开路径中的 ~ 为用户主目录
pub fn expand_tilde(path: &str) -> Option<PathBuf> {
    if path.starts_with("~/") {
        dirs::home_dir().map(|home| home.join(&path[2..]))
    } else {
        Some(PathBuf::from(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_getufit_dir() {
        let dir = getufit_dir();
        assert!(dir.is_some());
        assert!(dir.unwrap().to_string_lossy().contains(".getufit"));
    }

    #[test]
    fn test_expand_tilde() {
        let expanded = expand_tilde("~/.getufit/config.json");
        assert!(expanded.is_some());
        assert!(!expanded.unwrap().to_string_lossy().starts_with("~"));
    }
}
