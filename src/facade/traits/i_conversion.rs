use std::path::PathBuf;
use crate::error::Result;
use crate::models::conversion::{ConversionError, ConversionRecord};
use crate::models::job::{ConversionOptions, RunSummary};

// 進度與完成通知的觀察者接口
pub trait ConversionObserver: Send + Sync {
    /// 每個項目嘗試完畢後呼叫；平行模式下紀錄依完成順序排列
    fn on_progress(&self, _records: &[ConversionRecord], _total: usize) {}

    /// 每個批次只呼叫一次，紀錄依輸入順序排列
    fn on_complete(&self, _errors: &[ConversionError], _records: &[ConversionRecord], _total: usize) {}
}

/// 不做任何事的觀察者
pub struct NoopObserver;

impl ConversionObserver for NoopObserver {}

/// 以閉包實作的觀察者
pub struct CallbackObserver<P, C>
where
    P: Fn(&[ConversionRecord], usize) + Send + Sync,
    C: Fn(&[ConversionError], &[ConversionRecord], usize) + Send + Sync,
{
    progress: P,
    complete: C,
}

impl<P, C> CallbackObserver<P, C>
where
    P: Fn(&[ConversionRecord], usize) + Send + Sync,
    C: Fn(&[ConversionError], &[ConversionRecord], usize) + Send + Sync,
{
    pub fn new(progress: P, complete: C) -> Self {
        CallbackObserver { progress, complete }
    }
}

impl<P, C> ConversionObserver for CallbackObserver<P, C>
where
    P: Fn(&[ConversionRecord], usize) + Send + Sync,
    C: Fn(&[ConversionError], &[ConversionRecord], usize) + Send + Sync,
{
    fn on_progress(&self, records: &[ConversionRecord], total: usize) {
        (self.progress)(records, total)
    }

    fn on_complete(&self, errors: &[ConversionError], records: &[ConversionRecord], total: usize) {
        (self.complete)(errors, records, total)
    }
}

// Facade 接口，負責協調整個批次轉換流程
pub trait ConversionFacadeTrait: Send + Sync {
    /// 提交一批 TIFF 檔案進行轉換，處理完畢（或取消）後才返回
    /// # 參數
    /// - inputs: 依序處理的輸入檔案
    /// - destination: 輸出根目錄
    /// - options: 轉換設定
    /// - observer: 接收進度與完成通知
    /// # 回傳
    /// - 成功時返回批次統計，驗證失敗或已有批次執行時返回錯誤
    fn submit(
        &self,
        inputs: Vec<PathBuf>,
        destination: PathBuf,
        options: ConversionOptions,
        observer: &dyn ConversionObserver,
    ) -> Result<RunSummary>;
}
