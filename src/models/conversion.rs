use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// 外部轉換工具單次執行失敗的原因
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvokeError {
    #[error("無法啟動 {tool}：{message}")]
    Spawn { tool: String, message: String },
    #[error("{tool} 結束碼 {code:?}：{stderr}")]
    ExitStatus {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("{tool} 執行超過 {limit:?}，已強制終止")]
    Timeout { tool: String, limit: Duration },
}

/// 單一輸入檔案的轉換結果，建立後不再變動
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRecord {
    pub original: PathBuf,
    pub target: PathBuf,
    pub success: bool,
}

/// 失敗項目的診斷資訊，於批次結束時彙總輸出
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionError {
    pub target: PathBuf,
    pub error: InvokeError,
}

/// 交給外部工具的一次轉換指令
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionCommand {
    pub tool: String,
    pub args: Vec<OsString>,
}

impl ConversionCommand {
    /// 輸出路徑樣板永遠是最後一個參數
    pub fn output_template(&self) -> Option<&OsStr> {
        self.args.last().map(OsString::as_os_str)
    }

    /// 僅供日誌使用，非 UTF-8 字元會被替換
    pub fn display(&self) -> String {
        let mut line = self.tool.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }
}
