use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use clap::Parser;
use restyle::app::build_services;
use restyle::config::Config;
use restyle::http;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "restyle")]
#[command(about = "Serve the image style-transfer API")]
struct CliArgs {
    /// Address to bind; overrides HOST.
    #[arg(long)]
    host: Option<String>,

    /// Port to bind; overrides PORT.
    #[arg(long)]
    port: Option<u16>,
}

#[actix_web::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "restyle=info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    let state = web::Data::new(build_services(&config)?.into_state());

    info!("Starting restyle on {}:{}", config.host, config.port);
    HttpServer::new(move || App::new().app_data(state.clone()).configure(http::configure))
        .bind((config.host.as_str(), config.port))
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?
        .run()
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::CliArgs;
    use clap::Parser;

    #[test]
    fn test_cli_overrides_are_optional() {
        let args = CliArgs::try_parse_from(["restyle"]).unwrap();
        assert!(args.host.is_none());
        assert!(args.port.is_none());
    }

    #[test]
    fn test_cli_parses_host_and_port() {
        let args =
            CliArgs::try_parse_from(["restyle", "--host", "127.0.0.1", "--port", "8080"]).unwrap();
        assert_eq!(args.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(args.port, Some(8080));
    }

    #[test]
    fn test_cli_rejects_bad_port() {
        assert!(CliArgs::try_parse_from(["restyle", "--port", "not-a-port"]).is_err());
    }
}
