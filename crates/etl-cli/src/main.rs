//! 마켓 데이터 ETL CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 종목 레코드 추출 (1개월 일봉 + 정적 정보)
//! etl extract AAPL --period 1mo
//!
//! # 파일 변환 후 적재
//! etl transform --input raw.json --output clean.json
//! etl load --input clean.json --batch-id nightly
//!
//! # 추출 → 변환 → 적재 일괄 실행 (네트워크 없이)
//! etl --offline run --tickers AAPL,MSFT --period 1mo
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use etl_cli::commands::{
    load::load_file,
    run::{run_pipeline, RunConfig},
    transform::{transform_file, write_json},
    Context,
};
use etl_core::{init_logging, AppConfig, LogConfig};

#[derive(Parser)]
#[command(name = "etl")]
#[command(about = "Market data ETL CLI - Yahoo Finance 추출, 변환, 적재", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 (기본: ETL_CONFIG 또는 config/default.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Yahoo Finance 대신 샘플 데이터 사용
    #[arg(long, global = true, default_value = "false")]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 종목 레코드 추출 (일봉 + 정적 정보)
    Extract {
        /// 종목 심볼 (예: AAPL)
        ticker: String,

        /// 조회 기간 (1mo, 1y 등)
        #[arg(short, long)]
        period: Option<String>,
    },

    /// 종목 정적 정보 조회
    Info {
        /// 종목 심볼
        ticker: String,
    },

    /// 일봉 조회
    History {
        /// 종목 심볼
        ticker: String,

        /// 조회 기간 (1mo, 1y 등)
        #[arg(short, long)]
        period: Option<String>,
    },

    /// JSON 배열 파일 변환
    Transform {
        /// 입력 파일 (객체의 JSON 배열)
        #[arg(short, long)]
        input: PathBuf,

        /// 배치 ID (기본: 새 UUID)
        #[arg(long)]
        batch_id: Option<String>,

        /// 출력 파일 (지정하지 않으면 stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// JSON 파일을 배치로 적재
    Load {
        /// 입력 파일 (.json)
        #[arg(short, long)]
        input: PathBuf,

        /// 배치 ID (기본: 새 UUID)
        #[arg(long)]
        batch_id: Option<String>,
    },

    /// 저장된 배치 목록
    Batches,

    /// 저장된 배치 조회
    Show {
        /// 배치 ID
        batch_id: String,
    },

    /// 추출 → 변환 → 적재 일괄 실행
    Run {
        /// 쉼표로 구분된 종목 목록 (예: AAPL,MSFT)
        #[arg(short, long)]
        tickers: String,

        /// 조회 기간 (1mo, 1y 등)
        #[arg(short, long)]
        period: Option<String>,

        /// 배치 ID (기본: 새 UUID)
        #[arg(long)]
        batch_id: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::load_default()?,
    };
    // 결과는 stdout, 로그는 stderr
    init_logging(LogConfig::from_settings(&config.logging).with_stderr(true))
        .map_err(|e| anyhow!("failed to initialize logging: {}", e))?;

    match cli.command {
        Commands::Extract { ticker, period } => {
            let ctx = Context::from_config(&config, cli.offline)?;
            let records = ctx.extractor.extract(&ticker, period.as_deref()).await?;
            write_json(&records, None)?;
        }

        Commands::Info { ticker } => {
            let ctx = Context::from_config(&config, cli.offline)?;
            let info = ctx.extractor.info(&ticker).await?;
            write_json(&info, None)?;
        }

        Commands::History { ticker, period } => {
            let ctx = Context::from_config(&config, cli.offline)?;
            let history = ctx.extractor.history(&ticker, period.as_deref()).await?;
            write_json(&history, None)?;
        }

        Commands::Transform {
            input,
            batch_id,
            output,
        } => {
            let (result, stats) = transform_file(&input, batch_id)?;
            info!(
                batch_id = %result.batch_id,
                rows = stats.output_rows,
                errors = stats.error_count,
                "Transform finished"
            );
            for message in &result.errors {
                eprintln!("{}", message);
            }
            write_json(&result, output.as_deref())?;
        }

        Commands::Load { input, batch_id } => {
            let ctx = Context::from_config(&config, cli.offline)?;
            let receipt = load_file(&ctx, &input, batch_id).await?;
            write_json(&receipt, None)?;
        }

        Commands::Batches => {
            let ctx = Context::from_config(&config, cli.offline)?;
            for batch_id in ctx.store.list().await? {
                println!("{}", batch_id);
            }
        }

        Commands::Show { batch_id } => {
            let ctx = Context::from_config(&config, cli.offline)?;
            let rows = ctx.store.retrieve(&batch_id).await?;
            write_json(&rows, None)?;
        }

        Commands::Run {
            tickers,
            period,
            batch_id,
        } => {
            let ctx = Context::from_config(&config, cli.offline)?;
            let run = RunConfig {
                tickers,
                period,
                batch_id,
                show_progress: true,
            };

            match run_pipeline(&ctx, run).await {
                Ok(summary) => {
                    for failure in &summary.failures {
                        eprintln!("skipped {}: {}", failure.ticker, failure.error);
                    }
                    println!("\n배치 적재 완료: {} 행", summary.receipt.rows_loaded);
                    println!("배치 ID: {}", summary.batch_id);
                    println!("저장 위치: {}", summary.receipt.file_path);
                    if !summary.errors.is_empty() {
                        println!("검증 오류: {}건", summary.errors.len());
                    }
                }
                Err(e) => {
                    error!("Pipeline run failed: {}", e);
                    return Err(e);
                }
            }
        }
    }

    Ok(())
}
