use std::io;
use thiserror::Error;

/// 提交批次時可能回傳給呼叫端的錯誤
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("需要至少一個 TIFF 輸入檔案")]
    NoInputs,
    #[error("必須指定輸出目錄")]
    NoDestination,
    #[error("已有批次轉換正在執行，請等待完成後再提交")]
    JobInFlight,
    #[error("無效的設定：{0}")]
    InvalidOption(String),
}

pub type Result<T> = std::result::Result<T, BatchError>;

impl From<BatchError> for io::Error {
    fn from(err: BatchError) -> Self {
        match err {
            BatchError::JobInFlight => io::Error::new(io::ErrorKind::WouldBlock, err.to_string()),
            other => io::Error::new(io::ErrorKind::InvalidInput, other.to_string()),
        }
    }
}
