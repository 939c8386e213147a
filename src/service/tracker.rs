use std::path::PathBuf;
use crate::models::conversion::{ConversionError, ConversionRecord, InvokeError};

/// 可供計數的紀錄欄位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordField {
    Success,
}

/// 計算欄位等於指定值的紀錄數量
pub fn count(records: &[ConversionRecord], field: RecordField, value: bool) -> usize {
    records
        .iter()
        .filter(|record| match field {
            RecordField::Success => record.success == value,
        })
        .count()
}

/// 單次批次的轉換紀錄，只能追加
#[derive(Debug, Default)]
pub struct ResultTracker {
    records: Vec<ConversionRecord>,
    errors: Vec<ConversionError>,
}

impl ResultTracker {
    pub fn with_capacity(total: usize) -> Self {
        ResultTracker {
            records: Vec::with_capacity(total),
            errors: Vec::new(),
        }
    }

    pub fn append_record(&mut self, record: ConversionRecord) {
        self.records.push(record);
    }

    pub fn append_error(&mut self, error: ConversionError) {
        self.errors.push(error);
    }

    /// 依單次轉換結果同時寫入紀錄與錯誤
    pub fn record_outcome(&mut self, original: PathBuf, target: PathBuf, outcome: Result<(), InvokeError>) {
        let success = outcome.is_ok();
        if let Err(error) = outcome {
            self.append_error(ConversionError { target: target.clone(), error });
        }
        self.append_record(ConversionRecord { original, target, success });
    }

    pub fn records(&self) -> &[ConversionRecord] {
        &self.records
    }

    pub fn errors(&self) -> &[ConversionError] {
        &self.errors
    }

    pub fn succeeded(&self) -> usize {
        count(&self.records, RecordField::Success, true)
    }

    pub fn failed(&self) -> usize {
        count(&self.records, RecordField::Success, false)
    }

    pub fn into_parts(self) -> (Vec<ConversionRecord>, Vec<ConversionError>) {
        (self.records, self.errors)
    }
}
