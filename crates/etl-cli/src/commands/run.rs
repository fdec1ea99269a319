//! 추출 → 변환 → 적재 일괄 실행.
//!
//! 종목별 추출 실패는 요약에 기록되고 실행을 중단하지 않습니다.
//! 성공한 종목이 하나도 없으면 에러입니다.

use std::time::Duration;

use anyhow::{bail, Result};
use etl_core::{
    batch_span, resolve_batch_id, transform_with_stats, Record, StoreReceipt, TransformStats,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tracing::{info, warn, Instrument};

use super::Context;

/// 일괄 실행 설정.
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// 쉼표로 구분된 종목 목록
    pub tickers: String,
    pub period: Option<String>,
    pub batch_id: Option<String>,
    /// 진행 표시 여부
    pub show_progress: bool,
}

/// 추출에 실패한 종목.
#[derive(Debug, Clone, Serialize)]
pub struct TickerFailure {
    pub ticker: String,
    pub error: String,
}

/// 일괄 실행 결과 요약.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub batch_id: String,
    pub extracted_tickers: Vec<String>,
    pub failures: Vec<TickerFailure>,
    pub stats: TransformStats,
    pub errors: Vec<String>,
    pub receipt: StoreReceipt,
}

fn progress_bar(show: bool) -> Result<ProgressBar> {
    if !show {
        return Ok(ProgressBar::hidden());
    }
    let pb = ProgressBar::new(3);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:20.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

/// 파이프라인을 실행합니다.
pub async fn run_pipeline(ctx: &Context, config: RunConfig) -> Result<RunSummary> {
    let batch_id = resolve_batch_id(config.batch_id);
    let span = batch_span!("pipeline_run", batch_id);

    async {
        let pb = progress_bar(config.show_progress)?;

        pb.set_message(format!("extracting {}", config.tickers));
        let extraction = ctx
            .extractor
            .extract_many(&config.tickers, config.period.as_deref(), Some(batch_id.clone()))
            .await;
        pb.inc(1);

        let failures: Vec<TickerFailure> = extraction
            .failures()
            .into_iter()
            .map(|(ticker, error)| {
                warn!(ticker, error, "Ticker skipped");
                TickerFailure {
                    ticker: ticker.to_string(),
                    error: error.to_string(),
                }
            })
            .collect();
        let extracted_tickers: Vec<String> = extraction
            .data
            .iter()
            .filter(|(_, outcome)| !outcome.is_failed())
            .map(|(ticker, _)| ticker.clone())
            .collect();

        if extracted_tickers.is_empty() {
            pb.abandon_with_message("no ticker extracted");
            bail!("No ticker could be extracted from '{}'", config.tickers);
        }

        pb.set_message("transforming");
        let rows = extraction
            .successful_records()
            .into_iter()
            .map(Record::into_row)
            .collect();
        let (result, stats) = transform_with_stats(Some(batch_id.clone()), rows);
        pb.inc(1);

        pb.set_message("loading");
        let receipt = ctx.store.store(&batch_id, &result.data).await?;
        pb.inc(1);
        pb.finish_with_message(format!("stored {} rows", receipt.rows_loaded));

        info!(
            tickers = extracted_tickers.len(),
            failed = failures.len(),
            rows = receipt.rows_loaded,
            errors = result.errors.len(),
            "Pipeline run finished"
        );

        Ok::<_, anyhow::Error>(RunSummary {
            batch_id: batch_id.clone(),
            extracted_tickers,
            failures,
            stats,
            errors: result.errors,
            receipt,
        })
    }
    .instrument(span)
    .await
}
