use crate::errors::{AppError, Result};
use ::config::Config;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "card-config.toml";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    pub server: Option<ServerConfig>,
    pub sys: Option<SysConfig>,
    pub session: Option<SessionConfig>,
}

impl AppConfig {
    /// 读取配置文件，再叠加 APP_ 前缀的环境变量
    pub fn new(file: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(::config::File::with_name(file).required(false))
            .add_source(::config::Environment::with_prefix("APP").separator("_"))
            .build()?;
        let cfg = config.try_deserialize::<AppConfig>()?;
        Ok(cfg)
    }

    pub fn init(file: &str) -> Result<Arc<Self>> {
        let instance = Arc::new(Self::new(file)?);
        INSTANCE
            .set(instance.clone())
            .map_err(|_| AppError::Config("AppConfig already initialized".to_string()))?;
        Ok(instance)
    }

    pub fn get_server(&self) -> ServerConfig {
        self.server.clone().unwrap_or_default()
    }
    pub fn get_sys(&self) -> SysConfig {
        self.sys.clone().unwrap_or_default()
    }
    pub fn get_session(&self) -> SessionConfig {
        self.session.clone().unwrap_or_default()
    }

    /// 获取单例
    pub fn get() -> Arc<Self> {
        INSTANCE.get().expect("AppConfig is not initialized").clone()
    }
}
static INSTANCE: OnceCell<Arc<AppConfig>> = OnceCell::new();

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    //后端接口根地址
    #[serde(default = "default_base_url")]
    pub base_url: String,
    //请求超时（秒）
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ServerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { base_url: default_base_url(), timeout_secs: default_timeout_secs() }
    }
}

fn default_base_url() -> String {
    "http://localhost:3001/api".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Deserialize, Clone)]
pub struct SysConfig {
    //全局日志级别
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for SysConfig {
    fn default() -> Self {
        Self { log_level: default_log_level() }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct SessionConfig {
    /// 登录后保存的 bearer token，缺省表示未登录
    pub token: Option<String>,
}
