use anyhow::Result;
use grana_functions::core::render::{self, OutputFormat};
use grana_functions::utils::validation::Validate;
use grana_functions::{CellValue, DateInput, GranaError, Settings};
use httpmock::prelude::*;
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

fn settings_for(server: &MockServer) -> Settings {
    Settings {
        api_base_url: server.url("/api"),
        stocks_base_url: server.url("/stocks"),
        timeout_seconds: Some(5),
        email: Some("owner@example.com".to_string()),
        ..Settings::default()
    }
}

#[test]
fn test_cdb_end_to_end() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/fixed_income")
            .query_param("email", "owner@example.com")
            .query_param("investment_type", "cdb")
            .query_param("initial_investment", "1000")
            .query_param("rate", "115%")
            .query_param("initial_date", "01/01/2017");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({"data": 1234.56}));
    });

    let functions = settings_for(&server).functions()?;
    let value = functions.cdb(1000, "115%", "01/01/2017")?;

    api_mock.assert();
    assert_eq!(value, json!(1234.56));
    Ok(())
}

#[test]
fn test_treasury_history_series_renders_as_rows() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/tesouro")
            .query_param("bond", "Tesouro Prefixado 2023")
            .query_param("field", "preco_venda")
            .query_param("initial_date", "01/01/2017")
            .query_param("final_date", "03/01/2017");
        then.status(200).json_body(json!({
            "data": [["01/01/2017", 650.12], ["02/01/2017", 650.9], ["03/01/2017", 651.33]]
        }));
    });

    let functions = settings_for(&server).functions()?;
    let value = functions.tesouro_direto_hist(
        "Tesouro Prefixado 2023",
        "preco_venda",
        DateInput::ymd(2017, 1, 1).unwrap(),
        "03/01/2017",
    )?;
    api_mock.assert();

    let mut output = Vec::new();
    render::write_value(&value, OutputFormat::Tsv, &mut output)?;
    assert_eq!(
        String::from_utf8(output)?,
        "01/01/2017\t650.12\n02/01/2017\t650.9\n03/01/2017\t651.33\n"
    );
    Ok(())
}

#[test]
fn test_stock_fundamentals_by_formula_name() -> Result<()> {
    let server = MockServer::start();
    let stock_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/stocks/ABEV3")
            .query_param("field", "P/L");
        then.status(200).json_body(json!({"data": "22,41"}));
    });

    let functions = settings_for(&server).functions()?;
    let value = functions.call("fun", &[CellValue::from("ABEV3"), CellValue::from("P/L")])?;

    stock_mock.assert();
    assert_eq!(value, json!("22,41"));
    Ok(())
}

#[test]
fn test_error_page_is_a_json_error() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/indicators");
        then.status(503)
            .header("Content-Type", "text/html")
            .body("<html><body>Application Error</body></html>");
    });

    let functions = settings_for(&server).functions()?;
    let result = functions.selic("valor");

    api_mock.assert();
    assert!(matches!(result, Err(GranaError::JsonError(_))));
    Ok(())
}

#[test]
fn test_status_code_is_not_checked() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/indicators")
            .query_param("indicator", "cdi");
        then.status(500).json_body(json!({"data": "11,15%"}));
    });

    let functions = settings_for(&server).functions()?;
    let value = functions.cdi("anual")?;

    api_mock.assert();
    assert_eq!(value, json!("11,15%"));
    Ok(())
}

#[test]
fn test_missing_data_field_is_null() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/api/tesouro");
        then.status(200)
            .json_body(json!({"message": "bond not found"}));
    });

    let functions = settings_for(&server).functions()?;
    let value = functions.tesouro_direto("Tesouro Inexistente", "preco_venda")?;

    api_mock.assert();
    assert!(value.is_null());
    Ok(())
}

#[test]
fn test_unresolved_identity_still_sends_request() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/indicators")
            .query_param(
                "email",
                "environment variable GRANA_IT_EMAIL_NEVER_SET is not set",
            )
            .query_param("indicator", "ipca");
        then.status(200).json_body(json!({"data": 0.42}));
    });

    let settings = Settings {
        email: None,
        email_env: "GRANA_IT_EMAIL_NEVER_SET".to_string(),
        ..settings_for(&server)
    };
    let value = settings.functions()?.ipca("mensal")?;

    api_mock.assert();
    assert_eq!(value, json!(0.42));
    Ok(())
}

#[test]
fn test_connection_failure_propagates() -> Result<()> {
    let settings = Settings {
        api_base_url: "http://127.0.0.1:1/api".to_string(),
        timeout_seconds: Some(5),
        ..Settings::default()
    };

    let result = settings.functions()?.bitcoin("valor");
    assert!(matches!(result, Err(GranaError::HttpError(_))));
    Ok(())
}

#[test]
fn test_settings_from_config_file() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/indicators")
            .query_param("email", "file@example.com")
            .query_param("indicator", "dolar")
            .query_param("field", "compra");
        then.status(200).json_body(json!({"data": 5.12}));
    });

    let mut config_file = NamedTempFile::new()?;
    write!(
        config_file,
        "[api]\nbase_url = \"{}\"\n\n[identity]\nemail = \"file@example.com\"\n",
        server.url("/api")
    )?;

    let settings = Settings::load(Some(config_file.path()))?;
    let value = settings.functions()?.dolar("compra")?;

    api_mock.assert();
    assert_eq!(value, json!(5.12));
    Ok(())
}

#[test]
fn test_formula_text_end_to_end() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/fixed_income")
            .query_param("investment_type", "lci")
            .query_param("initial_investment", "2000")
            .query_param("rate", "97%")
            .query_param("initial_date", "05/03/2018");
        then.status(200).json_body(json!({"data": 2311.07}));
    });

    let functions = settings_for(&server).functions()?;
    let call = grana_functions::parse_formula(r#"=LCI(2000; "97%"; DATE(2018; 3; 5))"#)?;
    let value = functions.call(&call.name, &call.args)?;

    api_mock.assert();
    assert_eq!(value, json!(2311.07));
    Ok(())
}

#[test]
fn test_example_config_loads_and_validates() -> Result<()> {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("grana.toml.example");
    let settings = Settings::load(Some(&path))?;

    settings.validate()?;
    assert_eq!(settings.email, None);
    assert_eq!(settings.email_env, "GRANA_EMAIL");
    Ok(())
}

#[test]
fn test_unresolved_email_placeholder_still_sends_request() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/indicators")
            .query_param(
                "email",
                "environment variable GRANA_IT_PLACEHOLDER_NEVER_SET is not set",
            )
            .query_param("indicator", "selic");
        then.status(200).json_body(json!({"data": "13,75%"}));
    });

    let mut config_file = NamedTempFile::new()?;
    write!(
        config_file,
        "[api]\nbase_url = \"{}\"\n\n[identity]\nemail = \"${{GRANA_IT_PLACEHOLDER_NEVER_SET}}\"\nemail_env = \"GRANA_IT_PLACEHOLDER_NEVER_SET\"\n",
        server.url("/api")
    )?;

    let settings = Settings::load(Some(config_file.path()))?;
    settings.validate()?;
    let value = settings.functions()?.selic("anual")?;

    api_mock.assert();
    assert_eq!(value, json!("13,75%"));
    Ok(())
}

#[test]
fn test_pt_br_formula_with_decimal_commas() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/fixed_income")
            .query_param("investment_type", "lca")
            .query_param("initial_investment", "5000")
            .query_param("rate", "94,5%")
            .query_param("initial_date", "01/01/2017");
        then.status(200).json_body(json!({"data": 6021.4}));
    });

    let functions = settings_for(&server).functions()?;
    let call = grana_functions::parse_formula("=LCA(5000,00; 94,5%; DATE(2017;1;1))")?;
    let value = functions.call(&call.name, &call.args)?;

    api_mock.assert();
    assert_eq!(value, json!(6021.4));
    Ok(())
}
