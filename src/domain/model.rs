use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::{form_urlencoded, Url};

/// 日期參數：已格式化的字串，或結構化的日曆日期
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateInput {
    /// 呼叫端保證為 `DD/MM/YYYY`，不做任何轉換
    Literal(String),
    Structured(NaiveDate),
}

impl DateInput {
    pub fn ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(DateInput::Structured)
    }

    /// `DD/MM/YYYY`；字串輸入原樣回傳
    pub fn normalize(&self) -> String {
        match self {
            DateInput::Literal(text) => text.clone(),
            DateInput::Structured(date) => {
                format!("{:02}/{:02}/{}", date.day(), date.month(), date.year())
            }
        }
    }
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        DateInput::Literal(value.to_string())
    }
}

impl From<String> for DateInput {
    fn from(value: String) -> Self {
        DateInput::Literal(value)
    }
}

impl From<NaiveDate> for DateInput {
    fn from(value: NaiveDate) -> Self {
        DateInput::Structured(value)
    }
}

impl From<CellValue> for DateInput {
    fn from(value: CellValue) -> Self {
        match value {
            CellValue::Date(date) => DateInput::Structured(date),
            other => DateInput::Literal(other.to_string()),
        }
    }
}

/// A single spreadsheet argument as the host hands it over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Bool(bool),
    Date(NaiveDate),
    Empty,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // f64 的 Display 不會輸出多餘的 ".0"，例如 1000.0 -> "1000"
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(text) => f.write_str(text),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Date(date) => f.write_str(&DateInput::Structured(*date).normalize()),
            CellValue::Empty => Ok(()),
        }
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Number(f64::from(value))
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(value: NaiveDate) -> Self {
        CellValue::Date(value)
    }
}

/// 依序排列的查詢參數；值在套用到 URL 時逐一編碼
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: &'static str, value: impl Into<String>) -> &mut Self {
        self.pairs.push((name, value.into()));
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.pairs.iter().map(|(key, value)| (*key, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn apply_to(&self, url: &mut Url) {
        if self.pairs.is_empty() {
            return;
        }
        let query = self
            .pairs
            .iter()
            .map(|(name, value)| format!("{}={}", name, encode_component(value)))
            .collect::<Vec<_>>()
            .join("&");
        url.set_query(Some(&query));
    }
}

/// 字面上的 `+` 已編成 `%2B`，剩下的 `+` 都代表空白
fn encode_component(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvestmentType {
    Cdb,
    CdbPre,
    Lca,
    Lci,
}

impl InvestmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvestmentType::Cdb => "cdb",
            InvestmentType::CdbPre => "cdb-pre",
            InvestmentType::Lca => "lca",
            InvestmentType::Lci => "lci",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Indicator {
    Bitcoin,
    Dolar,
    Poupanca,
    PoupancaAntiga,
    Cdi,
    Ipca,
    Igpm,
    Selic,
}

impl Indicator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Indicator::Bitcoin => "bitcoin",
            Indicator::Dolar => "dolar",
            Indicator::Poupanca => "poupanca",
            Indicator::PoupancaAntiga => "poupanca-antiga",
            Indicator::Cdi => "cdi",
            Indicator::Ipca => "ipca",
            Indicator::Igpm => "igpm",
            Indicator::Selic => "selic",
        }
    }
}

/// 試算表公式名稱
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionName {
    TesouroDireto,
    TesouroDiretoHist,
    FixedIncome(InvestmentType),
    Indicator(Indicator),
    Fundamentals,
}

impl FunctionName {
    pub const ALL: [FunctionName; 15] = [
        FunctionName::TesouroDireto,
        FunctionName::TesouroDiretoHist,
        FunctionName::FixedIncome(InvestmentType::Cdb),
        FunctionName::FixedIncome(InvestmentType::CdbPre),
        FunctionName::FixedIncome(InvestmentType::Lca),
        FunctionName::FixedIncome(InvestmentType::Lci),
        FunctionName::Indicator(Indicator::Bitcoin),
        FunctionName::Indicator(Indicator::Dolar),
        FunctionName::Indicator(Indicator::Poupanca),
        FunctionName::Indicator(Indicator::PoupancaAntiga),
        FunctionName::Indicator(Indicator::Cdi),
        FunctionName::Indicator(Indicator::Ipca),
        FunctionName::Indicator(Indicator::Igpm),
        FunctionName::Indicator(Indicator::Selic),
        FunctionName::Fundamentals,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FunctionName::TesouroDireto => "TESOURODIRETO",
            FunctionName::TesouroDiretoHist => "TESOURODIRETOHIST",
            FunctionName::FixedIncome(InvestmentType::Cdb) => "CDB",
            FunctionName::FixedIncome(InvestmentType::CdbPre) => "CDBPRE",
            FunctionName::FixedIncome(InvestmentType::Lca) => "LCA",
            FunctionName::FixedIncome(InvestmentType::Lci) => "LCI",
            FunctionName::Indicator(Indicator::Bitcoin) => "BITCOIN",
            FunctionName::Indicator(Indicator::Dolar) => "DOLAR",
            FunctionName::Indicator(Indicator::Poupanca) => "POUPANCA",
            FunctionName::Indicator(Indicator::PoupancaAntiga) => "POUPANCAANTIGA",
            FunctionName::Indicator(Indicator::Cdi) => "CDI",
            FunctionName::Indicator(Indicator::Ipca) => "IPCA",
            FunctionName::Indicator(Indicator::Igpm) => "IGPM",
            FunctionName::Indicator(Indicator::Selic) => "SELIC",
            FunctionName::Fundamentals => "FUN",
        }
    }

    /// Case-insensitive lookup of a formula name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|function| function.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn params(&self) -> &'static [&'static str] {
        match self {
            FunctionName::TesouroDireto => &["titulo", "campo"],
            FunctionName::TesouroDiretoHist => &["titulo", "campo", "data_inicio", "data_final"],
            FunctionName::FixedIncome(_) => {
                &["investimento_inicial", "rentabilidade", "data_inicial"]
            }
            FunctionName::Indicator(_) => &["campo"],
            FunctionName::Fundamentals => &["ticker", "campo"],
        }
    }

    pub fn arity(&self) -> usize {
        self.params().len()
    }

    pub fn description(&self) -> &'static str {
        match self {
            FunctionName::TesouroDireto => "Current Tesouro Direto bond data",
            FunctionName::TesouroDiretoHist => "Tesouro Direto bond data over a date range",
            FunctionName::FixedIncome(InvestmentType::Cdb) => {
                "Current value of a post-fixed CDB (rate as % of CDI)"
            }
            FunctionName::FixedIncome(InvestmentType::CdbPre) => {
                "Current value of a pre-fixed CDB (annual rate)"
            }
            FunctionName::FixedIncome(InvestmentType::Lca) => {
                "Current value of an LCA (rate as % of CDI)"
            }
            FunctionName::FixedIncome(InvestmentType::Lci) => {
                "Current value of an LCI (rate as % of CDI)"
            }
            FunctionName::Indicator(Indicator::Bitcoin) => "Bitcoin quote",
            FunctionName::Indicator(Indicator::Dolar) => "US dollar exchange rate",
            FunctionName::Indicator(Indicator::Poupanca) => "Savings account yield",
            FunctionName::Indicator(Indicator::PoupancaAntiga) => {
                "Savings account yield (pre-2012 rule)"
            }
            FunctionName::Indicator(Indicator::Cdi) => "CDI interbank rate",
            FunctionName::Indicator(Indicator::Ipca) => "IPCA inflation index",
            FunctionName::Indicator(Indicator::Igpm) => "IGP-M inflation index",
            FunctionName::Indicator(Indicator::Selic) => "SELIC policy rate",
            FunctionName::Fundamentals => "Stock fundamentals from B3",
        }
    }
}

impl fmt::Display for FunctionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
