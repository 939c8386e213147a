use std::io;
use std::path::Path;
use std::time::Duration;
use crate::models::conversion::{ConversionCommand, InvokeError};

/// ensure 的結果：目錄原本就存在或剛建立
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirOutcome {
    AlreadyPresent,
    Created,
}

// Directory 服務接口，負責準備輸出目錄
pub trait DirectoryServiceTrait: Send + Sync {
    /// 確保目錄存在，可重複呼叫
    /// # 參數
    /// - dir: 目標目錄，缺少的上層目錄會一併建立
    /// # 回傳
    /// - 目錄已存在或建立成功時返回對應結果，建立失敗時返回 IO 錯誤
    fn ensure(&self, dir: &Path) -> io::Result<DirOutcome>;
}

// Converter 服務接口，包裝外部影像轉換工具
pub trait ConverterServiceTrait: Send + Sync {
    /// 執行一次轉換指令並等待子行程結束
    /// # 參數
    /// - command: 工具名稱與參數
    /// - timeout: 單次執行的時間上限，None 表示不限制
    /// # 回傳
    /// - 成功時返回工具的標準輸出，失敗時返回診斷資訊
    fn run(&self, command: &ConversionCommand, timeout: Option<Duration>) -> Result<String, InvokeError>;
}

// Cleanup 服務接口，負責清理暫存目錄
pub trait CleanupServiceTrait: Send + Sync {
    /// 刪除暫存目錄中名稱包含 pattern 的項目，錯誤只記錄不回傳
    fn sweep(&self, temp_path: &Path, pattern: &str) -> SweepReport;
}

/// 清理結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub deleted: Vec<String>,
    pub failed: Vec<String>,
    pub listing_failed: bool,
}
