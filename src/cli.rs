use clap::Parser;
use std::path::PathBuf;

/// Metrika 文档上传工具
#[derive(Parser, Debug)]
#[command(name = "metrika-upload")]
#[command(version)]
#[command(author = "rpeng252@gmail.com")]
#[command(about = "上传文档到 Metrika 并触发自动分析", long_about = None)]
pub struct Cli {
    /// 要上传的文件，可重复指定
    #[arg(long = "file", short = 'f', value_name = "PATH", required = true)]
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub files: Vec<PathBuf>,

    /// 上传者ID (缺省时读取会话文件中的 userId)
    #[arg(long, value_name = "ID")]
    pub uploader_id: Option<String>,

    /// 关联的项目ID
    #[arg(long, value_name = "ID")]
    pub project_id: Option<String>,

    /// 关闭上传后的自动分析
    #[arg(long)]
    pub no_analyze: bool,

    /// 后端地址，覆盖 METRIKA_API_URL
    #[arg(long, value_name = "URL")]
    #[arg(value_hint = clap::ValueHint::Url)]
    pub api_url: Option<String>,

    /// 会话文件，覆盖 METRIKA_SESSION_FILE
    #[arg(long, value_name = "FILE")]
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub session_file: Option<PathBuf>,

    /// 模拟上传的随机种子
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// 输出调试日志
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
