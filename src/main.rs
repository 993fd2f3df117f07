use anyhow::Context;
use clap::Parser;
use grana_functions::config::cli::Command;
use grana_functions::core::render;
use grana_functions::utils::{logger, validation::Validate};
use grana_functions::{parse_formula, CliConfig, FunctionName, GranaError, Settings};
use std::io::Write;

fn main() {
    let cli = CliConfig::parse();

    let settings = match load_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            let exit_code = e
                .downcast_ref::<GranaError>()
                .map(GranaError::exit_code)
                .unwrap_or(3);
            std::process::exit(exit_code);
        }
    };

    // 初始化日誌
    logger::init_cli_logger(settings.log_level.as_deref(), cli.verbose, settings.json_logs);
    if cli.verbose {
        tracing::debug!("Command: {:?}", cli.command);
        tracing::debug!("Settings: {:?}", settings.redacted());
    }

    let exit_code = match &cli.command {
        Command::List => {
            print_functions();
            0
        }
        Command::Eval { formulas } => match evaluate_all(&cli, &settings, formulas) {
            Ok(code) => code,
            Err(e) => {
                tracing::error!("❌ {:#}", e);
                eprintln!("❌ {:#}", e);
                1
            }
        },
    };

    std::process::exit(exit_code);
}

fn load_settings(cli: &CliConfig) -> anyhow::Result<Settings> {
    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply_overrides(&mut settings);

    // 驗證配置
    settings.validate().context("Configuration validation failed")?;
    Ok(settings)
}

/// 每個公式獨立求值；一個失敗不影響其他公式
fn evaluate_all(cli: &CliConfig, settings: &Settings, formulas: &[String]) -> anyhow::Result<i32> {
    let functions = settings.functions().context("Failed to build HTTP client")?;
    let stdout = std::io::stdout();
    let mut exit_code = 0;

    for formula in formulas {
        let result = parse_formula(formula).and_then(|call| functions.call(&call.name, &call.args));

        match result {
            Ok(value) => {
                let mut out = stdout.lock();
                render::write_value(&value, cli.format, &mut out)
                    .with_context(|| format!("Failed to write result of {}", formula))?;
                out.flush()?;
            }
            Err(e) => {
                tracing::error!("❌ {} failed: {}", formula, e);
                eprintln!("❌ {}: {}", formula, e.user_friendly_message());
                eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
                exit_code = exit_code.max(e.exit_code());
            }
        }
    }

    Ok(exit_code)
}

fn print_functions() {
    for function in FunctionName::ALL {
        let signature = format!("{}({})", function.name(), function.params().join("; "));
        println!("{:<70} {}", signature, function.description());
    }
}
