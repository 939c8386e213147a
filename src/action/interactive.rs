use dialoguer::{Confirm, Input, Select};
use std::io;
use std::path::Path;

use crate::config::ports::{AppConfig, ConfigPort, ConversionPort};
use crate::models::job::{ConversionOptions, RunSummary};
use crate::service::config_service::{ConfigService, DefaultConfigAdapter};
use crate::utils::convert::ConversionAdapter;
use crate::utils::utils::{setup_logging, verbosity_for};

const FORMATS: [&str; 4] = ["png", "jpg", "gif", "webp"];

pub fn process_interactive_mode() -> io::Result<RunSummary> {
    println!("=== 歡迎使用互動模式 ===");
    let use_default_config = get_default_config_option()?;
    let inputs = get_input_paths()?;
    let output = get_output_path()?;

    let config_port: Box<dyn ConfigPort> = if use_default_config {
        setup_logging("error")?;
        println!("使用預設配置：PNG，檔名 page<頁碼>.png，逐一轉換");
        Box::new(DefaultConfigAdapter::new(inputs, output))
    } else {
        Box::new(InteractiveConfigAdapter::new(inputs, output))
    };

    let config = ConfigService::new(config_port).get_config()?;
    ConversionAdapter.execute(config)
}

pub fn get_default_config_option() -> io::Result<bool> {
    Confirm::new()
        .with_prompt("是否使用預設配置？（PNG、page 前綴，僅需指定輸入和輸出路徑）")
        .default(true)
        .interact()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("預設配置選擇失敗: {}", e)))
}

pub fn get_input_paths() -> io::Result<Vec<String>> {
    let raw: String = Input::new()
        .with_prompt("請輸入 TIFF 檔案或目錄路徑，多個以逗號分隔（例如：./scan.tif,./faxes）")
        .validate_with(|input: &String| -> Result<(), String> {
            match split_list(input).into_iter().find(|p| !Path::new(p).exists()) {
                Some(missing) => Err(format!("路徑 '{}' 不存在", missing)),
                None if split_list(input).is_empty() => Err("至少需要一個輸入路徑".to_string()),
                None => Ok(()),
            }
        })
        .interact_text()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    Ok(split_list(&raw))
}

pub fn get_output_path() -> io::Result<String> {
    Input::new()
        .with_prompt("輸入輸出目錄（例如：./output，預設為 output）")
        .default("output".to_string())
        .interact_text()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
}

pub fn get_format() -> io::Result<String> {
    let index = Select::new()
        .with_prompt("選擇輸出格式（使用方向鍵選擇，按 Enter 確認）")
        .items(&FORMATS)
        .default(0)
        .interact()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("輸出格式選擇失敗: {}", e)))?;
    Ok(FORMATS[index].to_string())
}

pub fn get_naming() -> io::Result<(String, String, Option<String>)> {
    let prefix = Input::new()
        .with_prompt("檔名前綴（預設為 page）")
        .default("page".to_string())
        .interact_text()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("前綴輸入失敗: {}", e)))?;
    let suffix = Input::new()
        .with_prompt("檔名後綴（預設為空）")
        .default(String::new())
        .allow_empty(true)
        .interact_text()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("後綴輸入失敗: {}", e)))?;
    let save_folder: String = Input::new()
        .with_prompt("共用輸出子目錄（留空則每個檔案各自一個目錄）")
        .default(String::new())
        .allow_empty(true)
        .interact_text()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("子目錄輸入失敗: {}", e)))?;
    Ok((prefix, suffix, Some(save_folder).filter(|f| !f.is_empty())))
}

pub fn get_temp_options() -> io::Result<(Option<String>, bool)> {
    let temp_path: String = Input::new()
        .with_prompt("ImageMagick 暫存目錄（留空使用系統預設）")
        .default(String::new())
        .allow_empty(true)
        .interact_text()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("暫存目錄輸入失敗: {}", e)))?;
    if temp_path.is_empty() {
        return Ok((None, false));
    }
    let auto_clean = Confirm::new()
        .with_prompt("轉換完成後是否清理暫存目錄中的 magick- 檔案？")
        .default(false)
        .interact()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("清理選項輸入失敗: {}", e)))?;
    Ok((Some(temp_path), auto_clean))
}

pub fn get_log_level_option() -> io::Result<String> {
    let levels = ["error", "warn", "info"];
    let index = Select::new()
        .with_prompt("選擇日誌等級")
        .items(&levels)
        .default(0)
        .interact()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("日誌等級選擇失敗: {}", e)))?;
    Ok(levels[index].to_string())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// 交互配置適配器
pub struct InteractiveConfigAdapter {
    inputs: Vec<String>,
    output: String,
}

impl InteractiveConfigAdapter {
    pub fn new(inputs: Vec<String>, output: String) -> Self {
        InteractiveConfigAdapter { inputs, output }
    }
}

impl ConfigPort for InteractiveConfigAdapter {
    fn get_config(&self) -> io::Result<AppConfig> {
        let format = get_format()?;
        let (prefix, suffix, save_folder) = get_naming()?;
        let (temp_path, auto_cleanup_temp) = get_temp_options()?;
        let log_level = get_log_level_option()?;

        setup_logging(&log_level)?;

        Ok(AppConfig {
            inputs: self.inputs.clone(),
            output: self.output.clone(),
            include: vec!["*.tif".to_string(), "*.tiff".to_string()],
            no_progress: false,
            options: ConversionOptions {
                format,
                prefix,
                suffix,
                save_folder,
                temp_path: temp_path.map(Into::into),
                auto_cleanup_temp,
                log_verbosity: verbosity_for(&log_level),
                ..ConversionOptions::default()
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_separated_paths_are_trimmed() {
        assert_eq!(split_list(" a.tif, ,b dir ,"), vec!["a.tif", "b dir"]);
        assert!(split_list("  ").is_empty());
    }
}
