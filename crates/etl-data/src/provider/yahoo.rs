//! Yahoo Finance 시세 소스.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use etl_core::{HistoryBar, TickerInfo};
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use super::MarketDataSource;
use crate::error::{DataError, Result};
use crate::retry::fetch_error;

/// 일봉 간격.
const DAILY_INTERVAL: &str = "1d";

/// Yahoo Finance 소스.
///
/// `get_ticker_info`가 `&mut self`를 요구하므로 커넥터를 Mutex로 감쌉니다.
pub struct YahooSource {
    connector: Mutex<yahoo_finance_api::YahooConnector>,
}

impl YahooSource {
    /// 새 YahooSource 생성.
    pub fn new() -> Result<Self> {
        let connector = yahoo_finance_api::YahooConnector::new()
            .map_err(|e| DataError::Config(format!("Yahoo Finance connector setup failed: {}", e)))?;
        Ok(Self {
            connector: Mutex::new(connector),
        })
    }
}

fn timestamp_to_date(timestamp: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(timestamp, 0).map(|dt| dt.date_naive())
}

#[async_trait]
impl MarketDataSource for YahooSource {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    #[instrument(skip(self))]
    async fn fetch_info(&self, ticker: &str) -> Result<TickerInfo> {
        let summary = {
            let mut connector = self.connector.lock().await;
            connector
                .get_ticker_info(ticker)
                .await
                .map_err(|e| fetch_error("info", ticker, e))?
        };

        let quote_summary = summary
            .quote_summary
            .ok_or_else(|| fetch_error("info", ticker, "empty quote summary"))?;
        let data = quote_summary
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| fetch_error("info", ticker, "quote summary has no result"))?;

        let profile = data.asset_profile.as_ref();
        let detail = data.summary_detail.as_ref();

        let info = TickerInfo {
            industry: profile.and_then(|p| p.industry.clone()),
            sector: profile.and_then(|p| p.sector.clone()),
            full_time_employees: profile
                .and_then(|p| p.full_time_employees)
                .map(|v| v as i64),
            // 시가총액과 평균 거래량은 정수로 옵니다
            market_cap: detail.and_then(|d| d.market_cap).map(|v| v as f64),
            previous_close: detail.and_then(|d| d.previous_close),
            average_volume: detail.and_then(|d| d.average_volume).map(|v| v as f64),
            currency: detail.and_then(|d| d.currency.clone()),
            dividend_rate: detail.and_then(|d| d.dividend_rate),
            dividend_yield: detail.and_then(|d| d.dividend_yield),
            trailing_pe: detail.and_then(|d| d.trailing_pe),
            forward_pe: detail.and_then(|d| d.forward_pe),
            ticker: ticker.to_string(),
        };

        debug!(ticker, sector = ?info.sector, "Ticker info fetched");
        Ok(info)
    }

    #[instrument(skip(self))]
    async fn fetch_history(&self, ticker: &str, period: &str) -> Result<Vec<HistoryBar>> {
        let response = {
            let connector = self.connector.lock().await;
            connector
                .get_quote_range(ticker, DAILY_INTERVAL, period)
                .await
                .map_err(|e| fetch_error("history", ticker, e))?
        };

        let quotes = response
            .quotes()
            .map_err(|e| DataError::Parse(format!("Quote parse error ({}): {}", ticker, e)))?;

        // 배당이 없는 종목은 빈 목록
        let dividends: HashMap<NaiveDate, f64> = match response.dividends() {
            Ok(list) => list
                .iter()
                .filter_map(|d| timestamp_to_date(d.date as i64).map(|date| (date, d.amount)))
                .collect(),
            Err(e) => {
                debug!(ticker, error = %e, "No dividend data");
                HashMap::new()
            }
        };

        let mut bars: Vec<HistoryBar> = quotes
            .iter()
            .filter_map(|q| {
                let date = timestamp_to_date(q.timestamp as i64)?;
                Some(HistoryBar {
                    date,
                    open: q.open,
                    high: q.high,
                    low: q.low,
                    close: q.close,
                    volume: q.volume as i64,
                    dividend: dividends.get(&date).copied().unwrap_or(0.0),
                })
            })
            .collect();
        bars.sort_by_key(|b| b.date);

        debug!(ticker, period, bars = bars.len(), "History fetched");
        Ok(bars)
    }
}
