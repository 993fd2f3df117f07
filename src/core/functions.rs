use crate::core::request_builder::RequestBuilder;
use crate::domain::model::{CellValue, DateInput, FunctionName, Indicator, InvestmentType};
use crate::domain::ports::{IdentityResolver, Transport};
use crate::utils::error::{GranaError, Result};
use serde_json::Value;

/// 試算表函式入口；每個函式都只是把參數轉交給 [`RequestBuilder`]
pub struct GranaFunctions<T, I> {
    builder: RequestBuilder<T, I>,
}

impl<T: Transport, I: IdentityResolver> GranaFunctions<T, I> {
    pub fn new(builder: RequestBuilder<T, I>) -> Self {
        Self { builder }
    }

    /// `TESOURODIRETO(titulo, campo)`
    pub fn tesouro_direto(&self, titulo: &str, campo: &str) -> Result<Value> {
        self.builder.treasury(titulo, campo)
    }

    /// `TESOURODIRETOHIST(titulo, campo, data_inicio, data_final)`
    pub fn tesouro_direto_hist(
        &self,
        titulo: &str,
        campo: &str,
        data_inicio: impl Into<DateInput>,
        data_final: impl Into<DateInput>,
    ) -> Result<Value> {
        self.builder
            .treasury_history(titulo, campo, &data_inicio.into(), &data_final.into())
    }

    /// `CDB(investimento_inicial, rentabilidade, data_inicial)`, rate as a share of CDI.
    pub fn cdb(
        &self,
        investimento_inicial: impl Into<CellValue>,
        rentabilidade: impl Into<CellValue>,
        data_inicial: impl Into<DateInput>,
    ) -> Result<Value> {
        self.fixed_income(InvestmentType::Cdb, investimento_inicial, rentabilidade, data_inicial)
    }

    /// `CDBPRE(...)`, rate is the contracted annual rate.
    pub fn cdb_pre(
        &self,
        investimento_inicial: impl Into<CellValue>,
        rentabilidade: impl Into<CellValue>,
        data_inicial: impl Into<DateInput>,
    ) -> Result<Value> {
        self.fixed_income(InvestmentType::CdbPre, investimento_inicial, rentabilidade, data_inicial)
    }

    pub fn lca(
        &self,
        investimento_inicial: impl Into<CellValue>,
        rentabilidade: impl Into<CellValue>,
        data_inicial: impl Into<DateInput>,
    ) -> Result<Value> {
        self.fixed_income(InvestmentType::Lca, investimento_inicial, rentabilidade, data_inicial)
    }

    pub fn lci(
        &self,
        investimento_inicial: impl Into<CellValue>,
        rentabilidade: impl Into<CellValue>,
        data_inicial: impl Into<DateInput>,
    ) -> Result<Value> {
        self.fixed_income(InvestmentType::Lci, investimento_inicial, rentabilidade, data_inicial)
    }

    fn fixed_income(
        &self,
        investment_type: InvestmentType,
        investimento_inicial: impl Into<CellValue>,
        rentabilidade: impl Into<CellValue>,
        data_inicial: impl Into<DateInput>,
    ) -> Result<Value> {
        self.builder.fixed_income(
            investment_type,
            &investimento_inicial.into(),
            &rentabilidade.into(),
            &data_inicial.into(),
        )
    }

    pub fn bitcoin(&self, campo: &str) -> Result<Value> {
        self.builder.indicator(Indicator::Bitcoin, campo)
    }

    pub fn dolar(&self, campo: &str) -> Result<Value> {
        self.builder.indicator(Indicator::Dolar, campo)
    }

    pub fn poupanca(&self, campo: &str) -> Result<Value> {
        self.builder.indicator(Indicator::Poupanca, campo)
    }

    pub fn poupanca_antiga(&self, campo: &str) -> Result<Value> {
        self.builder.indicator(Indicator::PoupancaAntiga, campo)
    }

    pub fn cdi(&self, campo: &str) -> Result<Value> {
        self.builder.indicator(Indicator::Cdi, campo)
    }

    pub fn ipca(&self, campo: &str) -> Result<Value> {
        self.builder.indicator(Indicator::Ipca, campo)
    }

    pub fn igpm(&self, campo: &str) -> Result<Value> {
        self.builder.indicator(Indicator::Igpm, campo)
    }

    pub fn selic(&self, campo: &str) -> Result<Value> {
        self.builder.indicator(Indicator::Selic, campo)
    }

    /// `FUN(ticker, campo)`: fundamentals of a B3 listed company.
    pub fn fundamentals(&self, ticker: &str, campo: &str) -> Result<Value> {
        self.builder.stock(ticker, campo)
    }

    /// 依公式名稱呼叫；參數個數不符時不送出請求
    pub fn call(&self, name: &str, args: &[CellValue]) -> Result<Value> {
        let function = FunctionName::from_name(name).ok_or_else(|| GranaError::UnknownFunction {
            name: name.to_string(),
        })?;
        self.invoke(function, args)
    }

    pub fn invoke(&self, function: FunctionName, args: &[CellValue]) -> Result<Value> {
        if args.len() != function.arity() {
            return Err(GranaError::ArgumentCount {
                function: function.name(),
                expected: function.arity(),
                actual: args.len(),
            });
        }
        tracing::debug!("Evaluating {} with {} argument(s)", function, args.len());

        match function {
            FunctionName::TesouroDireto => {
                self.tesouro_direto(&args[0].to_string(), &args[1].to_string())
            }
            FunctionName::TesouroDiretoHist => self.tesouro_direto_hist(
                &args[0].to_string(),
                &args[1].to_string(),
                args[2].clone(),
                args[3].clone(),
            ),
            FunctionName::FixedIncome(investment_type) => self.fixed_income(
                investment_type,
                args[0].clone(),
                args[1].clone(),
                args[2].clone(),
            ),
            FunctionName::Indicator(indicator) => {
                self.builder.indicator(indicator, &args[0].to_string())
            }
            FunctionName::Fundamentals => {
                self.fundamentals(&args[0].to_string(), &args[1].to_string())
            }
        }
    }
}
