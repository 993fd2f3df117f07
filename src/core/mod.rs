pub mod formula;
pub mod functions;
pub mod render;
pub mod request_builder;

pub use crate::domain::model::{CellValue, DateInput, FunctionName, Indicator, InvestmentType};
pub use crate::domain::ports::{ConfigProvider, IdentityResolver, Transport};
pub use crate::utils::error::Result;
