use std::io;
use crate::models::job::{ConversionOptions, RunSummary};

// 應用配置結構體，封裝所有參數
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub inputs: Vec<String>,
    pub output: String,
    pub include: Vec<String>,
    pub no_progress: bool,
    pub options: ConversionOptions,
}

// 配置來源的 Port
pub trait ConfigPort {
    fn get_config(&self) -> io::Result<AppConfig>;
}

// 轉換執行的 Port
pub trait ConversionPort {
    fn execute(&self, config: AppConfig) -> io::Result<RunSummary>;
}
