use std::path::PathBuf;
use std::time::Duration;
use chrono::{DateTime, Local};
use crate::error::{BatchError, Result};
use crate::models::conversion::{ConversionError, ConversionRecord};

pub const DEFAULT_TOOL: &str = "convert";
pub const DEFAULT_FORMAT: &str = "png";
pub const DEFAULT_PREFIX: &str = "page";
/// ImageMagick 在暫存目錄留下的檔名片段
pub const TEMP_ARTIFACT_PATTERN: &str = "magick-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogVerbosity {
    #[default]
    ErrorsOnly,
    Info,
}

/// 每次提交的轉換設定，未指定的欄位使用預設值
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOptions {
    pub format: String,
    pub prefix: String,
    pub suffix: String,
    pub save_folder: Option<String>,
    pub temp_path: Option<PathBuf>,
    pub auto_cleanup_temp: bool,
    pub log_verbosity: LogVerbosity,
    pub tool: String,
    pub jobs: usize,
    pub timeout: Option<Duration>,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        ConversionOptions {
            format: DEFAULT_FORMAT.to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            suffix: String::new(),
            save_folder: None,
            temp_path: None,
            auto_cleanup_temp: false,
            log_verbosity: LogVerbosity::ErrorsOnly,
            tool: DEFAULT_TOOL.to_string(),
            jobs: 1,
            timeout: None,
        }
    }
}

impl ConversionOptions {
    pub fn validate(&self) -> Result<()> {
        if self.jobs == 0 {
            return Err(BatchError::InvalidOption("jobs 必須至少為 1".to_string()));
        }
        if self.timeout == Some(Duration::ZERO) {
            return Err(BatchError::InvalidOption("timeout 必須大於 0".to_string()));
        }
        if self.tool.trim().is_empty() {
            return Err(BatchError::InvalidOption("未指定轉換工具".to_string()));
        }
        Ok(())
    }
}

/// 一次提交的批次：輸入清單、輸出位置與設定
#[derive(Debug, Clone)]
pub struct ConversionJob {
    pub inputs: Vec<PathBuf>,
    pub destination: PathBuf,
    pub options: ConversionOptions,
}

impl ConversionJob {
    /// 建立批次前先檢查輸入與輸出位置，任何處理都不會在驗證失敗時開始
    pub fn new(inputs: Vec<PathBuf>, destination: PathBuf, options: ConversionOptions) -> Result<Self> {
        if inputs.is_empty() {
            return Err(BatchError::NoInputs);
        }
        if destination.as_os_str().is_empty() {
            return Err(BatchError::NoDestination);
        }
        options.validate()?;
        Ok(ConversionJob { inputs, destination, options })
    }

    pub fn total(&self) -> usize {
        self.inputs.len()
    }
}

/// 批次結束後的統計
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub cancelled: bool,
    pub records: Vec<ConversionRecord>,
    pub errors: Vec<ConversionError>,
    pub started_at: DateTime<Local>,
    pub finished_at: DateTime<Local>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failed == 0 && !self.cancelled
    }

    /// 因取消而未嘗試的項目數
    pub fn skipped(&self) -> usize {
        self.total - self.records.len()
    }
}
