use crate::domain::model::{CellValue, DateInput, Indicator, InvestmentType, QueryParams};
use crate::domain::ports::{ConfigProvider, IdentityResolver, Transport};
use crate::utils::error::{GranaError, Result};
use serde_json::Value;
use url::Url;

pub const DEFAULT_API_BASE_URL: &str = "https://app.grana.io/api";
pub const DEFAULT_STOCKS_BASE_URL: &str = "https://pafuncio.herokuapp.com/stocks";

const TREASURY_PATH: &str = "tesouro";
const FIXED_INCOME_PATH: &str = "fixed_income";
const INDICATOR_PATH: &str = "indicators";

/// 兩個遠端服務的根網址
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    api: Url,
    stocks: Url,
}

impl Endpoints {
    pub fn new(api_base_url: &str, stocks_base_url: &str) -> Result<Self> {
        Ok(Self {
            api: parse_base(api_base_url)?,
            stocks: parse_base(stocks_base_url)?,
        })
    }

    pub fn production() -> Result<Self> {
        Self::new(DEFAULT_API_BASE_URL, DEFAULT_STOCKS_BASE_URL)
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Self::new(config.api_base_url(), config.stocks_base_url())
    }

    pub fn api(&self) -> &Url {
        &self.api
    }

    pub fn stocks(&self) -> &Url {
        &self.stocks
    }
}

fn parse_base(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)?;
    if url.cannot_be_a_base() {
        return Err(GranaError::InvalidBaseUrl {
            url: raw.to_string(),
        });
    }
    Ok(url)
}

/// 日期正規化：字串原樣保留，結構化日期轉成 `DD/MM/YYYY`
pub fn normalize_date(date: &DateInput) -> String {
    date.normalize()
}

/// Appends `segment` to the base path and applies `params` as the query string.
pub fn endpoint_url(base: &Url, segment: &str, params: &QueryParams) -> Result<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| GranaError::InvalidBaseUrl {
            url: base.to_string(),
        })?
        .pop_if_empty()
        .push(segment);
    params.apply_to(&mut url);
    Ok(url)
}

/// 解析回應並取出 `data`；缺少 `data` 時回傳 null 而非錯誤
pub fn unwrap_envelope(body: &str) -> Result<Value> {
    let parsed: Value = serde_json::from_str(body)?;
    match parsed {
        Value::Object(mut map) => match map.remove("data") {
            Some(data) => Ok(data),
            None => {
                tracing::warn!("Response envelope has no `data` field");
                Ok(Value::Null)
            }
        },
        other => {
            tracing::warn!("Response body is not a JSON object: {}", other);
            Ok(Value::Null)
        }
    }
}

fn redact_identity(url: &Url) -> String {
    if !url.query_pairs().any(|(key, _)| key == "email") {
        return url.to_string();
    }
    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(key, value)| {
            let value = if key == "email" {
                "***".to_string()
            } else {
                value.into_owned()
            };
            (key.into_owned(), value)
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

/// 組出查詢網址、呼叫傳輸層並拆開 JSON 回應
pub struct RequestBuilder<T, I> {
    transport: T,
    identity: I,
    endpoints: Endpoints,
}

impl<T: Transport, I: IdentityResolver> RequestBuilder<T, I> {
    pub fn new(transport: T, identity: I, endpoints: Endpoints) -> Self {
        Self {
            transport,
            identity,
            endpoints,
        }
    }

    /// 身分解析失敗時以錯誤訊息代替 e-mail，請求照常送出
    pub fn caller_identity(&self) -> String {
        match self.identity.resolve() {
            Ok(email) => email,
            Err(err) => {
                tracing::warn!("Could not resolve caller identity: {}", err);
                err.to_string()
            }
        }
    }

    fn identified_params(&self) -> QueryParams {
        let mut params = QueryParams::new();
        params.push("email", self.caller_identity());
        params
    }

    pub fn treasury_url(
        &self,
        bond: &str,
        field: &str,
        range: Option<(&DateInput, &DateInput)>,
    ) -> Result<Url> {
        let mut params = self.identified_params();
        params.push("bond", bond).push("field", field);
        if let Some((initial_date, final_date)) = range {
            params
                .push("initial_date", normalize_date(initial_date))
                .push("final_date", normalize_date(final_date));
        }
        endpoint_url(&self.endpoints.api, TREASURY_PATH, &params)
    }

    pub fn fixed_income_url(
        &self,
        investment_type: InvestmentType,
        initial_investment: &CellValue,
        rate: &CellValue,
        initial_date: &DateInput,
    ) -> Result<Url> {
        let mut params = self.identified_params();
        params
            .push("investment_type", investment_type.as_str())
            .push("initial_date", normalize_date(initial_date))
            .push("rate", rate.to_string())
            .push("initial_investment", initial_investment.to_string());
        endpoint_url(&self.endpoints.api, FIXED_INCOME_PATH, &params)
    }

    pub fn indicator_url(&self, indicator: Indicator, field: &str) -> Result<Url> {
        let mut params = self.identified_params();
        params.push("indicator", indicator.as_str()).push("field", field);
        endpoint_url(&self.endpoints.api, INDICATOR_PATH, &params)
    }

    /// 股票服務不需要 e-mail
    pub fn stock_url(&self, ticker: &str, field: &str) -> Result<Url> {
        let mut params = QueryParams::new();
        params.push("field", field);
        endpoint_url(&self.endpoints.stocks, ticker, &params)
    }

    pub fn treasury(&self, bond: &str, field: &str) -> Result<Value> {
        self.get(self.treasury_url(bond, field, None)?)
    }

    pub fn treasury_history(
        &self,
        bond: &str,
        field: &str,
        initial_date: &DateInput,
        final_date: &DateInput,
    ) -> Result<Value> {
        self.get(self.treasury_url(bond, field, Some((initial_date, final_date)))?)
    }

    pub fn fixed_income(
        &self,
        investment_type: InvestmentType,
        initial_investment: &CellValue,
        rate: &CellValue,
        initial_date: &DateInput,
    ) -> Result<Value> {
        self.get(self.fixed_income_url(investment_type, initial_investment, rate, initial_date)?)
    }

    pub fn indicator(&self, indicator: Indicator, field: &str) -> Result<Value> {
        self.get(self.indicator_url(indicator, field)?)
    }

    pub fn stock(&self, ticker: &str, field: &str) -> Result<Value> {
        self.get(self.stock_url(ticker, field)?)
    }

    /// 單次 GET，不重試
    fn get(&self, url: Url) -> Result<Value> {
        tracing::debug!("GET {}", redact_identity(&url));
        let body = self.transport.fetch(&url)?;
        tracing::debug!("Received {} bytes", body.len());
        unwrap_envelope(&body)
    }
}
