use clap::Parser;
use cnpj_lookup::config::Command;
use cnpj_lookup::core::presenter;
use cnpj_lookup::utils::error::ErrorSeverity;
use cnpj_lookup::utils::{logger, ui, validation::Validate};
use cnpj_lookup::{
    format_cnpj, CliConfig, LocalStorage, LookupConfig, LookupError, RegistryClient,
    SearchSession, SearchState,
};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    // 驗證配置
    let config = match cli.validate().and_then(|_| cli.resolve()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            ui::print_error(&e.user_friendly_message());
            std::process::exit(1);
        }
    };

    match &cli.command {
        Command::Format { input } => println!("{}", format_cnpj(input)),
        Command::Lookup { cnpj, print } => {
            let client = build_client(&config);
            if let Err(e) = lookup(&client, cnpj, print.is_some(), &config).await {
                report_and_exit(&e);
            }
        }
        Command::Interactive { .. } => {
            let client = build_client(&config);
            interactive(&client, &config).await?;
        }
    }

    Ok(())
}

fn build_client(config: &LookupConfig) -> RegistryClient {
    match RegistryClient::from_config(config) {
        Ok(client) => {
            tracing::debug!("Registry transport: {:?}", client.transport());
            client
        }
        Err(e) => report_and_exit(&e),
    }
}

async fn lookup(
    client: &RegistryClient,
    cnpj: &str,
    print: bool,
    config: &LookupConfig,
) -> Result<(), LookupError> {
    tracing::info!("🔍 Looking up {}", format_cnpj(cnpj));
    let record = client.fetch_record(cnpj).await?;
    let view = presenter::present(&record);
    ui::print_view(&view);

    if print {
        let storage = LocalStorage::new(config.print_dir());
        let file_name = presenter::print_card(&view, &storage).await?;
        ui::print_success(&format!(
            "Cartão salvo em {}",
            storage.full_path(&file_name).display()
        ));
    }
    Ok(())
}

fn report_and_exit(e: &LookupError) -> ! {
    tracing::error!(
        "❌ Lookup failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    ui::print_error(&e.user_friendly_message());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

async fn interactive(client: &RegistryClient, config: &LookupConfig) -> anyhow::Result<()> {
    let storage = LocalStorage::new(config.print_dir());
    let mut session = SearchSession::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    ui::print_prompt(session.input());
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            ":sair" | ":q" => break,
            ":nova" => session.new_search(),
            ":imprimir" => match session.record() {
                Some(record) => {
                    let view = presenter::present(record);
                    match presenter::print_card(&view, &storage).await {
                        Ok(file_name) => ui::print_success(&format!(
                            "Cartão salvo em {}",
                            storage.full_path(&file_name).display()
                        )),
                        Err(e) => ui::print_error(&e.user_friendly_message()),
                    }
                }
                None => ui::print_error("Nenhum resultado para imprimir."),
            },
            typed => {
                if !session.type_input(typed).is_empty() {
                    ui::print_loading(session.input());
                }
                match session.submit(client).await {
                    Ok(SearchState::Result) => {
                        if let Some(record) = session.record() {
                            ui::print_view(&presenter::present(record));
                        }
                    }
                    Ok(SearchState::Errored) => {
                        ui::print_error(session.error().unwrap_or_default());
                    }
                    Ok(_) => {}
                    Err(e) => ui::print_error(&e.user_friendly_message()),
                }
            }
        }
        ui::print_prompt(session.input());
    }

    Ok(())
}
