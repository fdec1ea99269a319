//! 레코드 스키마 및 타입.
//!
//! 이 모듈은 파이프라인을 흐르는 레코드 관련 타입을 정의합니다:
//! - `Row` - 변환 엔진이 다루는 범용 키-값 행
//! - `FieldKind` / `RECORD_SCHEMA` - 고정 레코드 스키마
//! - `Record` - 스키마의 타입 있는 표현
//! - `TickerInfo` - 종목 정적 정보
//! - `HistoryBar` / `HistoryRecord` - 일별 시세

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 범용 키-값 행. 키 순서는 삽입 순서를 유지합니다.
pub type Row = Map<String, Value>;

/// 스키마 필드의 값 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// 실수형
    Float,
    /// 정수형
    Integer,
    /// 문자열
    Text,
}

impl FieldKind {
    /// 숫자형 필드인지 확인합니다.
    pub fn is_numeric(self) -> bool {
        matches!(self, FieldKind::Float | FieldKind::Integer)
    }

    /// 결측값을 채울 기본값.
    pub fn fill_value(self) -> Value {
        match self {
            FieldKind::Float => Value::from(0.0),
            FieldKind::Integer => Value::from(0),
            FieldKind::Text => Value::String(String::new()),
        }
    }
}

/// 고정 레코드 스키마 (와이어 이름, 종류).
pub const RECORD_SCHEMA: [(&str, FieldKind); 19] = [
    ("Date", FieldKind::Text),
    ("Open", FieldKind::Float),
    ("High", FieldKind::Float),
    ("Low", FieldKind::Float),
    ("Close", FieldKind::Float),
    ("Volume", FieldKind::Integer),
    ("Dividend", FieldKind::Float),
    ("industry", FieldKind::Text),
    ("sector", FieldKind::Text),
    ("fullTimeEmployees", FieldKind::Integer),
    ("marketCap", FieldKind::Float),
    ("previousClose", FieldKind::Float),
    ("averageVolume", FieldKind::Float),
    ("currency", FieldKind::Text),
    ("dividendRate", FieldKind::Float),
    ("dividendYield", FieldKind::Float),
    ("trailingPE", FieldKind::Float),
    ("forwardPE", FieldKind::Float),
    ("Ticker", FieldKind::Text),
];

/// 필드 이름으로 스키마상의 종류를 찾습니다. 스키마 밖의 키는 `None`.
pub fn field_kind(name: &str) -> Option<FieldKind> {
    RECORD_SCHEMA
        .iter()
        .find(|(field, _)| *field == name)
        .map(|(_, kind)| *kind)
}

/// 시계열 한 행과 종목 정적 정보를 합친 레코드.
///
/// 모든 필드는 선택 사항입니다. 직렬화 시 `None`은 `null`로 기록됩니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    #[serde(rename = "Date")]
    pub date: Option<String>,
    #[serde(rename = "Open")]
    pub open: Option<f64>,
    #[serde(rename = "High")]
    pub high: Option<f64>,
    #[serde(rename = "Low")]
    pub low: Option<f64>,
    #[serde(rename = "Close")]
    pub close: Option<f64>,
    #[serde(rename = "Volume")]
    pub volume: Option<i64>,
    #[serde(rename = "Dividend")]
    pub dividend: Option<f64>,
    pub industry: Option<String>,
    pub sector: Option<String>,
    #[serde(rename = "fullTimeEmployees")]
    pub full_time_employees: Option<i64>,
    #[serde(rename = "marketCap")]
    pub market_cap: Option<f64>,
    #[serde(rename = "previousClose")]
    pub previous_close: Option<f64>,
    #[serde(rename = "averageVolume")]
    pub average_volume: Option<f64>,
    pub currency: Option<String>,
    #[serde(rename = "dividendRate")]
    pub dividend_rate: Option<f64>,
    #[serde(rename = "dividendYield")]
    pub dividend_yield: Option<f64>,
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<f64>,
    #[serde(rename = "forwardPE")]
    pub forward_pe: Option<f64>,
    #[serde(rename = "Ticker")]
    pub ticker: Option<String>,
}

impl Record {
    /// 스키마의 모든 필드를 포함한 행으로 변환합니다.
    pub fn into_row(self) -> Row {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Row::new(),
        }
    }

    /// 정적 종목 정보를 이 레코드에 복사합니다.
    pub fn apply_info(&mut self, info: &TickerInfo) {
        self.industry = info.industry.clone();
        self.sector = info.sector.clone();
        self.full_time_employees = info.full_time_employees;
        self.market_cap = info.market_cap;
        self.previous_close = info.previous_close;
        self.average_volume = info.average_volume;
        self.currency = info.currency.clone();
        self.dividend_rate = info.dividend_rate;
        self.dividend_yield = info.dividend_yield;
        self.trailing_pe = info.trailing_pe;
        self.forward_pe = info.forward_pe;
        self.ticker = Some(info.ticker.clone());
    }
}

/// 종목 정적 정보 (`/info` 응답).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickerInfo {
    pub industry: Option<String>,
    pub sector: Option<String>,
    #[serde(rename = "fullTimeEmployees")]
    pub full_time_employees: Option<i64>,
    #[serde(rename = "marketCap")]
    pub market_cap: Option<f64>,
    #[serde(rename = "previousClose")]
    pub previous_close: Option<f64>,
    #[serde(rename = "averageVolume")]
    pub average_volume: Option<f64>,
    pub currency: Option<String>,
    #[serde(rename = "dividendRate")]
    pub dividend_rate: Option<f64>,
    #[serde(rename = "dividendYield")]
    pub dividend_yield: Option<f64>,
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<f64>,
    #[serde(rename = "forwardPE")]
    pub forward_pe: Option<f64>,
    /// 요청된 심볼 (입력 그대로)
    #[serde(rename = "Ticker")]
    pub ticker: String,
}

impl TickerInfo {
    /// 심볼만 채워진 빈 정보를 생성합니다.
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            ..Default::default()
        }
    }
}

/// 일별 시세 한 건.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryBar {
    /// 거래일
    pub date: NaiveDate,
    /// 시가
    pub open: f64,
    /// 고가
    pub high: f64,
    /// 저가
    pub low: f64,
    /// 종가
    pub close: f64,
    /// 거래량
    pub volume: i64,
    /// 배당금 (없으면 0)
    pub dividend: f64,
}

/// `HistoryBar`의 와이어 표현 (`/history` 응답).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Open")]
    pub open: f64,
    #[serde(rename = "High")]
    pub high: f64,
    #[serde(rename = "Low")]
    pub low: f64,
    #[serde(rename = "Close")]
    pub close: f64,
    #[serde(rename = "Volume")]
    pub volume: i64,
    #[serde(rename = "Dividend", default)]
    pub dividend: f64,
}

impl From<&HistoryBar> for HistoryRecord {
    fn from(bar: &HistoryBar) -> Self {
        Self {
            date: bar.date.format("%Y-%m-%d").to_string(),
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            dividend: bar.dividend,
        }
    }
}

impl From<&HistoryBar> for Record {
    fn from(bar: &HistoryBar) -> Self {
        Self {
            date: Some(bar.date.format("%Y-%m-%d").to_string()),
            open: Some(bar.open),
            high: Some(bar.high),
            low: Some(bar.low),
            close: Some(bar.close),
            volume: Some(bar.volume),
            dividend: Some(bar.dividend),
            ..Default::default()
        }
    }
}
