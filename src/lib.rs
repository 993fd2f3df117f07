pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{ConfiguredIdentity, EnvIdentity, ReqwestTransport, StaticIdentity};
pub use config::{Settings, TomlConfig};
pub use crate::core::{
    formula::{parse_formula, FormulaCall},
    functions::GranaFunctions,
    render::OutputFormat,
    request_builder::{normalize_date, Endpoints, RequestBuilder},
};
pub use domain::model::{CellValue, DateInput, FunctionName, Indicator, InvestmentType};
pub use domain::ports::{ConfigProvider, IdentityError, IdentityResolver, Transport};
pub use utils::error::{GranaError, Result};
