//! 메모리 기반 시세 소스 (테스트, 오프라인 실행용).

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use etl_core::{HistoryBar, TickerInfo};

use super::MarketDataSource;
use crate::error::{DataError, Result};

/// 고정 데이터를 반환하는 소스.
///
/// 등록되지 않은 종목은 빈 시세와 빈 정보를 반환합니다.
#[derive(Default)]
pub struct StaticSource {
    tickers: HashMap<String, (TickerInfo, Vec<HistoryBar>)>,
    /// 종목별 남은 실패 횟수
    failures: Mutex<HashMap<String, u32>>,
    calls: Mutex<HashMap<String, u32>>,
}

const SAMPLE_DATES: [(i32, u32, u32); 5] = [
    (2024, 1, 2),
    (2024, 1, 3),
    (2024, 1, 4),
    (2024, 1, 5),
    (2024, 1, 8),
];

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// 종목 데이터를 등록합니다.
    pub fn with_ticker(mut self, info: TickerInfo, bars: Vec<HistoryBar>) -> Self {
        self.tickers.insert(info.ticker.clone(), (info, bars));
        self
    }

    /// 종목마다 5거래일치 결정적 샘플 데이터를 생성합니다.
    pub fn sample(tickers: &[&str]) -> Self {
        tickers.iter().fold(Self::new(), |source, ticker| {
            let (info, bars) = sample_data(ticker);
            source.with_ticker(info, bars)
        })
    }

    /// 다음 `times`번의 호출이 일시적 오류로 실패하게 합니다.
    pub fn failing_times(self, ticker: &str, times: u32) -> Self {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(ticker.to_string(), times);
        self
    }

    /// 종목에 대한 누적 호출 횟수.
    pub fn calls(&self, ticker: &str) -> u32 {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(ticker)
            .copied()
            .unwrap_or(0)
    }

    fn record_call(&self, ticker: &str) -> Result<()> {
        *self
            .calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .entry(ticker.to_string())
            .or_insert(0) += 1;

        let mut failures = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        match failures.get_mut(ticker) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                Err(DataError::Fetch(format!(
                    "simulated provider failure for {}",
                    ticker
                )))
            }
            _ => Ok(()),
        }
    }
}

fn sample_data(ticker: &str) -> (TickerInfo, Vec<HistoryBar>) {
    let seed: u32 = ticker.bytes().map(u32::from).sum();
    let base = 50.0 + f64::from(seed % 200);

    let info = TickerInfo {
        industry: Some("Consumer Electronics".to_string()),
        sector: Some("Technology".to_string()),
        full_time_employees: Some(1_000 + i64::from(seed) * 10),
        market_cap: Some(base * 1.0e9),
        previous_close: Some(base),
        average_volume: Some(f64::from(seed) * 10_000.0),
        currency: Some("USD".to_string()),
        dividend_rate: Some(0.96),
        dividend_yield: Some(0.0052),
        trailing_pe: Some(28.5),
        forward_pe: Some(26.1),
        ticker: ticker.to_string(),
    };

    let bars = SAMPLE_DATES
        .iter()
        .enumerate()
        .filter_map(|(i, &(y, m, d))| {
            let date = NaiveDate::from_ymd_opt(y, m, d)?;
            let open = base + i as f64;
            Some(HistoryBar {
                date,
                open,
                high: open + 2.0,
                low: open - 1.0,
                close: open + 0.5,
                volume: 1_000_000 + i as i64 * 50_000,
                dividend: if i == 2 { 0.24 } else { 0.0 },
            })
        })
        .collect();

    (info, bars)
}

#[async_trait]
impl MarketDataSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_info(&self, ticker: &str) -> Result<TickerInfo> {
        self.record_call(ticker)?;
        Ok(self
            .tickers
            .get(ticker)
            .map(|(info, _)| info.clone())
            .unwrap_or_else(|| TickerInfo::new(ticker)))
    }

    async fn fetch_history(&self, ticker: &str, _period: &str) -> Result<Vec<HistoryBar>> {
        self.record_call(ticker)?;
        Ok(self
            .tickers
            .get(ticker)
            .map(|(_, bars)| bars.clone())
            .unwrap_or_default())
    }
}
