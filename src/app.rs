use std::sync::{Arc, Mutex};

use actix_web::web;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::domain::app_config::AppConfig;
use crate::infrastructure::config::ConfigService;
use crate::infrastructure::remote_clients::{
    token_source, GoogleSheetsClient, WebhookWorkflowClient,
};
use crate::interfaces::cli::{run_secrets, Cli, Command};
use crate::interfaces::http::{add_log, start_server, HttpState};

pub fn run() -> std::io::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let config_service = ConfigService::new();
    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let config = config_service.load().map_err(to_io)?;
            serve(config)
        }
        Command::Secrets { action } => {
            let message =
                run_secrets(&config_service, action, std::io::stdin().lock()).map_err(to_io)?;
            println!("{}", message);
            Ok(())
        }
    }
}

fn serve(config: AppConfig) -> std::io::Result<()> {
    let logs = Arc::new(Mutex::new(Vec::new()));
    let tokens = token_source(&config.sheets).map_err(to_io)?;
    let sheets = GoogleSheetsClient::new(config.sheets.clone(), tokens);
    let workflow = WebhookWorkflowClient::new(config.workflow.clone());
    let state = web::Data::new(HttpState::new(
        Arc::new(sheets),
        Arc::new(workflow),
        &config.workflow,
        logs.clone(),
    ));

    actix_web::rt::System::new().block_on(async move {
        let server = start_server(state, &config.server)?;
        add_log(
            &logs,
            "INFO",
            "System",
            &format!(
                "HTTP server started on {}:{}",
                config.server.host, config.server.port
            ),
        );
        tracing::info!(host = %config.server.host, port = config.server.port, "dealvox listening");
        server.await
    })
}

fn to_io(err: crate::domain::error::AppError) -> std::io::Error {
    std::io::Error::other(err.to_string())
}
