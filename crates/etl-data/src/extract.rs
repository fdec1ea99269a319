//! 레코드 조립 및 추출 서비스.
//!
//! 종목별 일봉과 정적 정보를 가져와 일자당 하나의 평탄한 레코드로 만듭니다.

use std::collections::BTreeMap;
use std::sync::Arc;

use etl_core::{resolve_batch_id, HistoryBar, HistoryRecord, Record, TickerInfo};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::error::{DataError, Result};
use crate::provider::MarketDataSource;

/// 기본 조회 기간.
pub const DEFAULT_PERIOD: &str = "1mo";

/// 일봉마다 레코드 하나를 만들고 정적 정보를 복사합니다.
///
/// `Ticker`는 요청된 심볼 그대로 기록됩니다.
pub fn assemble_records(ticker: &str, info: &TickerInfo, bars: &[HistoryBar]) -> Vec<Record> {
    bars.iter()
        .map(|bar| {
            let mut record = Record::from(bar);
            record.apply_info(info);
            record.ticker = Some(ticker.to_string());
            record
        })
        .collect()
}

/// 다중 종목 추출의 종목별 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TickerOutcome {
    Records(Vec<Record>),
    Failed { error: String },
}

impl TickerOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, TickerOutcome::Failed { .. })
    }
}

/// 다중 종목 추출 결과.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManyExtraction {
    pub batch_id: String,
    pub data: BTreeMap<String, TickerOutcome>,
}

impl ManyExtraction {
    /// 성공한 종목의 레코드를 종목 순서대로 모읍니다.
    pub fn successful_records(&self) -> Vec<Record> {
        self.data
            .values()
            .filter_map(|outcome| match outcome {
                TickerOutcome::Records(records) => Some(records.clone()),
                TickerOutcome::Failed { .. } => None,
            })
            .flatten()
            .collect()
    }

    /// 실패한 종목과 오류 메시지.
    pub fn failures(&self) -> Vec<(&str, &str)> {
        self.data
            .iter()
            .filter_map(|(ticker, outcome)| match outcome {
                TickerOutcome::Failed { error } => Some((ticker.as_str(), error.as_str())),
                TickerOutcome::Records(_) => None,
            })
            .collect()
    }
}

/// 쉼표로 구분된 종목 목록을 나눕니다. 공백은 제거하고 빈 항목은 버립니다.
pub fn split_tickers(tickers: &str) -> Vec<String> {
    tickers
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// 추출 서비스.
#[derive(Clone)]
pub struct Extractor {
    source: Arc<dyn MarketDataSource>,
    default_period: String,
}

impl Extractor {
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self {
            source,
            default_period: DEFAULT_PERIOD.to_string(),
        }
    }

    pub fn with_default_period(mut self, period: impl Into<String>) -> Self {
        self.default_period = period.into();
        self
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    fn period<'a>(&'a self, period: Option<&'a str>) -> &'a str {
        period
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(&self.default_period)
    }

    /// 종목의 일봉과 정적 정보를 합친 레코드를 반환합니다.
    ///
    /// 일봉이 없으면 `DataError::NoData`.
    #[instrument(skip(self))]
    pub async fn extract(&self, ticker: &str, period: Option<&str>) -> Result<Vec<Record>> {
        let period = self.period(period);
        let (bars, info) = tokio::try_join!(
            self.source.fetch_history(ticker, period),
            self.source.fetch_info(ticker)
        )
        .inspect_err(|e| record_failure(ticker, e))?;

        if bars.is_empty() {
            return Err(DataError::NoData(format!(
                "No data found for ticker '{}'. It may be invalid or delisted.",
                ticker
            )));
        }

        let records = assemble_records(ticker, &info, &bars);
        info!(ticker, period, records = records.len(), "Ticker extracted");
        Ok(records)
    }

    /// 종목 정적 정보만 반환합니다.
    #[instrument(skip(self))]
    pub async fn info(&self, ticker: &str) -> Result<TickerInfo> {
        self.source
            .fetch_info(ticker)
            .await
            .inspect_err(|e| record_failure(ticker, e))
    }

    /// 일봉만 반환합니다.
    #[instrument(skip(self))]
    pub async fn history(&self, ticker: &str, period: Option<&str>) -> Result<Vec<HistoryRecord>> {
        let period = self.period(period);
        let bars = self
            .source
            .fetch_history(ticker, period)
            .await
            .inspect_err(|e| record_failure(ticker, e))?;
        Ok(bars.iter().map(HistoryRecord::from).collect())
    }

    /// 여러 종목을 동시에 추출합니다. 종목별 실패는 결과에 포함되고
    /// 전체 요청을 중단하지 않습니다.
    #[instrument(skip(self))]
    pub async fn extract_many(
        &self,
        tickers: &str,
        period: Option<&str>,
        batch_id: Option<String>,
    ) -> ManyExtraction {
        let batch_id = resolve_batch_id(batch_id);
        let tickers = split_tickers(tickers);

        let batch = batch_id.as_str();
        let outcomes = join_all(tickers.iter().map(|ticker| async move {
            let outcome = match self.extract(ticker, period).await {
                Ok(records) => TickerOutcome::Records(records),
                Err(e) => {
                    warn!(batch_id = batch, ticker = %ticker, error = %e, "Ticker extraction failed");
                    TickerOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            };
            (ticker.clone(), outcome)
        }))
        .await;

        let data: BTreeMap<String, TickerOutcome> = outcomes.into_iter().collect();
        let failed = data.values().filter(|o| o.is_failed()).count();
        info!(
            batch_id = %batch_id,
            tickers = data.len(),
            failed,
            "Multi-ticker extraction finished"
        );

        ManyExtraction { batch_id, data }
    }
}

fn record_failure(ticker: &str, err: &DataError) {
    if !matches!(err, DataError::NoData(_)) {
        metrics::counter!("etl_fetch_failures_total").increment(1);
        warn!(ticker, error = %err, "Fetch failed");
    }
}
