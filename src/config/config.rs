use clap::Parser;
use std::io;
use std::path::Path;

#[derive(Parser, Clone, Debug)]
#[command(
    name = "tiff_to_image",
    about = "將多頁 TIFF 轉換為逐頁影像（PNG/JPG 等）",
    long_about = "呼叫 ImageMagick 的 convert 將每個多頁 TIFF 拆成逐頁影像，每個輸入檔案輸出到各自的目錄（或 --save-folder 指定的共用目錄），檔名為 <prefix><頁碼><suffix>.<format>，頁碼從 1 開始。\n輸入可以是檔案或目錄，目錄會依 --include 模式遞迴收集。\n不帶任何參數執行時進入互動模式。"
)]
pub struct Cli {
    #[arg(required = true)]
    pub inputs: Vec<String>,
    #[arg(short, long, default_value = "output")]
    pub output: String,
    #[arg(long, default_value = "png", value_parser = ["png", "jpg", "jpeg", "gif", "bmp", "tiff", "webp"])]
    pub format: String,
    #[arg(long, default_value = "page")]
    pub prefix: String,
    #[arg(long, default_value = "")]
    pub suffix: String,
    #[arg(long)]
    pub save_folder: Option<String>,
    #[arg(long)]
    pub temp_path: Option<String>,
    #[arg(long, default_value_t = false)]
    pub auto_clean_temp: bool,
    #[arg(long, default_value = "convert")]
    pub tool: String,
    #[arg(short, long, default_value_t = 1)]
    pub jobs: usize,
    /// 單次轉換的逾時秒數
    #[arg(long)]
    pub timeout: Option<u64>,
    #[arg(long, default_value = "*.tif,*.tiff", value_delimiter = ',')]
    pub include: Vec<String>,
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
    #[arg(long, default_value = "error", value_parser = ["error", "warn", "info", "debug"])]
    pub log_level: String,
    #[arg(long, default_value_t = false)]
    pub show_config: bool,
}

pub fn validate_input_path(input: &str) -> io::Result<&Path> {
    let path = Path::new(input);
    if !path.exists() {
        log::error!("輸入路徑不存在：{}", input);
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("輸入路徑 '{}' 不存在", input)
        ));
    }
    Ok(path)
}

pub fn is_valid_pattern(pattern: &str) -> bool {
    let invalid_chars = ['/', '\\', ':', '"', '<', '>', '|'];
    !pattern.is_empty() && !pattern.contains(&invalid_chars[..])
}

pub fn validate_file_patterns(include: &[String]) -> io::Result<()> {
    for pattern in include {
        if !is_valid_pattern(pattern) {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, format!("無效的包含模式: {}", pattern)));
        }
    }
    Ok(())
}

pub fn validate_cli_args(cli: &Cli) -> io::Result<()> {
    for input in &cli.inputs {
        validate_input_path(input)?;
    }
    validate_file_patterns(&cli.include)?;
    if cli.output.trim().is_empty() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "必須指定輸出目錄"));
    }
    if cli.jobs == 0 {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "--jobs 必須至少為 1"));
    }
    if cli.timeout == Some(0) {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "--timeout 必須大於 0"));
    }
    if cli.auto_clean_temp && cli.temp_path.is_none() {
        log::warn!("未指定 --temp-path，--auto-clean-temp 不會生效");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("tiff_to_image").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_are_applied() {
        let cli = parse(&["a.tif"]);
        assert_eq!(cli.output, "output");
        assert_eq!(cli.format, "png");
        assert_eq!(cli.prefix, "page");
        assert_eq!(cli.suffix, "");
        assert_eq!(cli.jobs, 1);
        assert_eq!(cli.include, vec!["*.tif", "*.tiff"]);
        assert_eq!(cli.log_level, "error");
        assert!(!cli.auto_clean_temp);
    }

    #[test]
    fn unsupported_format_is_rejected_by_parser() {
        let result = Cli::try_parse_from(["tiff_to_image", "a.tif", "--format", "svg"]);
        assert!(result.is_err());
    }

    #[test]
    fn patterns_with_path_separators_are_invalid() {
        assert!(is_valid_pattern("*.tif"));
        assert!(!is_valid_pattern("dir/*.tif"));
        assert!(!is_valid_pattern(""));
    }

    #[test]
    fn missing_input_fails_validation() {
        let cli = parse(&["/definitely/missing.tif"]);
        assert_eq!(validate_cli_args(&cli).unwrap_err().kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn zero_jobs_fails_validation() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let path = tmp.path().to_string_lossy().to_string();
        let cli = parse(&[path.as_str(), "--jobs", "0"]);
        assert_eq!(validate_cli_args(&cli).unwrap_err().kind(), io::ErrorKind::InvalidInput);
    }
}
