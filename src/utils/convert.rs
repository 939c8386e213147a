use std::io;
use std::path::PathBuf;
use log::info;
use crate::config::ports::{AppConfig, ConversionPort};
use crate::facade::conversion_facade::ConversionFacade;
use crate::facade::traits::i_conversion::ConversionFacadeTrait;
use crate::models::job::RunSummary;
use crate::utils::file::collect_inputs;
use crate::utils::utils::{create_progress_bar, create_regex_set};

// 轉換執行適配器：展開輸入、建立協調者並以進度條回報
pub struct ConversionAdapter;

impl ConversionPort for ConversionAdapter {
    fn execute(&self, config: AppConfig) -> io::Result<RunSummary> {
        let include_set = create_regex_set(&config.include);
        let inputs = collect_inputs(&config.inputs, &include_set)?;
        info!("共收集 {} 個 TIFF 檔案，輸出目錄：{}", inputs.len(), config.output);

        let facade = ConversionFacade::with_defaults();
        let progress = create_progress_bar(inputs.len() as u64, config.no_progress);
        let summary = facade.submit(inputs, PathBuf::from(&config.output), config.options, &progress)?;
        Ok(summary)
    }
}
