use std::io;
use crate::config::ports::{AppConfig, ConfigPort};
use crate::models::job::ConversionOptions;

// 配置服務，負責選擇適當的配置適配器
pub struct ConfigService {
    config_port: Box<dyn ConfigPort>,
}

impl ConfigService {
    pub fn new(config_port: Box<dyn ConfigPort>) -> Self {
        ConfigService { config_port }
    }

    pub fn get_config(&self) -> io::Result<AppConfig> {
        self.config_port.get_config()
    }
}

// 預設配置適配器：PNG、page 前綴、逐一轉換
pub struct DefaultConfigAdapter {
    inputs: Vec<String>,
    output: String,
}

impl DefaultConfigAdapter {
    pub fn new(inputs: Vec<String>, output: String) -> Self {
        DefaultConfigAdapter { inputs, output }
    }
}

impl ConfigPort for DefaultConfigAdapter {
    fn get_config(&self) -> io::Result<AppConfig> {
        Ok(AppConfig {
            inputs: self.inputs.clone(),
            output: self.output.clone(),
            include: vec!["*.tif".to_string(), "*.tiff".to_string()],
            no_progress: false,
            options: ConversionOptions::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_adapter_uses_default_options() {
        let service = ConfigService::new(Box::new(DefaultConfigAdapter::new(
            vec!["scans".to_string()],
            "out".to_string(),
        )));
        let config = service.get_config().unwrap();
        assert_eq!(config.inputs, vec!["scans"]);
        assert_eq!(config.output, "out");
        assert_eq!(config.options, ConversionOptions::default());
    }
}
