//! Netflix Checker 管理控制台入口
//!
//! Usage:
//! - 默认启动: `netflix-console`
//! - 指定端口: `netflix-console --port 9811`
//! - 指定后端: `netflix-console --backend http://10.0.0.2:8080`
//! - 指定 token 文件: `netflix-console --token-file /path/to/token`

use netflix_console::RuntimeConfig;
use tracing_subscriber::EnvFilter;

/// 解析命令行参数
fn parse_args() -> RuntimeConfig {
    let args: Vec<String> = std::env::args().collect();
    let mut config = RuntimeConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" if i + 1 < args.len() => {
                config.port_override = args[i + 1].parse().ok();
                i += 2;
            }
            "--backend" if i + 1 < args.len() => {
                config.backend_override = Some(args[i + 1].clone());
                i += 2;
            }
            "--token-file" if i + 1 < args.len() => {
                config.token_file_override = Some(args[i + 1].clone().into());
                i += 2;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                i += 1;
            }
        }
    }

    config
}

fn print_help() {
    println!("Netflix Checker 管理控制台");
    println!();
    println!("USAGE:");
    println!("    netflix-console [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --port <PORT>          Override the local listening port");
    println!("    --backend <URL>        Override the checker backend URL");
    println!("    --token-file <PATH>    Override the auth token file path");
    println!("    -h, --help             Print help information");
    println!();
    println!("ENVIRONMENT:");
    println!("    NETFLIX_CONSOLE_BACKEND_URL    Checker backend URL");
    println!("    NETFLIX_CONSOLE_PORT           Local listening port");
    println!("    NETFLIX_CONSOLE_TOKEN_FILE     Auth token file path");
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = parse_args();

    let rt = tokio::runtime::Runtime::new().expect("Failed to create runtime");
    rt.block_on(async {
        netflix_console::init_and_run(config).await;
    });
}
