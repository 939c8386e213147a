use std::io;
use std::time::Duration;
use clap::Parser;
use crate::config::config::{Cli, validate_cli_args};
use crate::action::interactive::process_interactive_mode;
use crate::config::ports::{AppConfig, ConfigPort, ConversionPort};
use crate::models::job::{ConversionOptions, RunSummary};
use crate::service::config_service::ConfigService;
use crate::utils::convert::ConversionAdapter;
use crate::utils::utils::{setup_logging, verbosity_for};

pub fn process_args(args: Vec<String>) -> io::Result<RunSummary> {
    if args.len() == 1 {
        process_interactive_mode()
    } else {
        process_cli_mode()
    }
}

pub fn process_cli_mode() -> io::Result<RunSummary> {
    let cli = Cli::parse();
    setup_logging(&cli.log_level)?;

    let config_service = ConfigService::new(Box::new(CliConfigAdapter::new(cli.clone())));
    let config = config_service.get_config()?;

    if cli.show_config {
        println!("實際使用的配置：{:#?}", config);
    }

    ConversionAdapter.execute(config)
}

// CLI 配置適配器
pub struct CliConfigAdapter {
    cli: Cli,
}

impl CliConfigAdapter {
    pub fn new(cli: Cli) -> Self {
        CliConfigAdapter { cli }
    }
}

impl ConfigPort for CliConfigAdapter {
    fn get_config(&self) -> io::Result<AppConfig> {
        validate_cli_args(&self.cli)?;
        let cli = &self.cli;

        Ok(AppConfig {
            inputs: cli.inputs.clone(),
            output: cli.output.clone(),
            include: cli.include.clone(),
            no_progress: cli.no_progress,
            options: ConversionOptions {
                format: cli.format.clone(),
                prefix: cli.prefix.clone(),
                suffix: cli.suffix.clone(),
                save_folder: cli.save_folder.clone().filter(|f| !f.is_empty()),
                temp_path: cli.temp_path.as_ref().map(Into::into),
                auto_cleanup_temp: cli.auto_clean_temp,
                log_verbosity: verbosity_for(&cli.log_level),
                tool: cli.tool.clone(),
                jobs: cli.jobs,
                timeout: cli.timeout.map(Duration::from_secs),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use crate::models::job::LogVerbosity;

    #[test]
    fn cli_flags_map_onto_conversion_options() {
        let tmp = tempfile::tempdir().unwrap();
        let input = tmp.path().to_string_lossy().to_string();
        let cli = Cli::try_parse_from([
            "tiff_to_image",
            input.as_str(),
            "-o",
            "/out",
            "--format",
            "jpg",
            "--suffix",
            "_scan",
            "--save-folder",
            "pages",
            "--temp-path",
            "/tmp/im",
            "--auto-clean-temp",
            "--jobs",
            "4",
            "--timeout",
            "30",
            "--log-level",
            "info",
        ])
        .unwrap();

        let config = CliConfigAdapter::new(cli).get_config().unwrap();

        assert_eq!(config.output, "/out");
        let options = config.options;
        assert_eq!(options.format, "jpg");
        assert_eq!(options.prefix, "page");
        assert_eq!(options.suffix, "_scan");
        assert_eq!(options.save_folder.as_deref(), Some("pages"));
        assert_eq!(options.temp_path, Some(PathBuf::from("/tmp/im")));
        assert!(options.auto_cleanup_temp);
        assert_eq!(options.jobs, 4);
        assert_eq!(options.timeout, Some(Duration::from_secs(30)));
        assert_eq!(options.log_verbosity, LogVerbosity::Info);
    }
}
