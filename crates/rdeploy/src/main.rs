mod error;
mod logging;
mod paths;
mod settings;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use rdeploy_core::{ClientVersion, DEFAULT_CHANNEL, DeploymentResolver, ReqwestTransport};

use crate::error::AppError;
use crate::settings::AppSettings;

/// Look up the build a release channel currently publishes.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Channel to look up (defaults to the configured channel)
    #[arg(short, long)]
    channel: Option<String>,

    /// Also fetch the approximate release time
    #[arg(short, long)]
    extra: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging for this run
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let (settings, settings_error) = match AppSettings::load() {
        Ok(settings) => (settings, None),
        Err(error) => (AppSettings::default(), Some(error)),
    };

    logging::init_logging(
        cli.verbose || settings.debug_logging,
        settings.max_log_size_bytes,
    );
    if let Some(error) = settings_error {
        log::warn!("Using default settings: {error}");
    }

    match run(&cli, &settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::debug!("{error:?}");
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, settings: &AppSettings) -> Result<(), AppError> {
    let transport = ReqwestTransport::new(settings.http_timeout(), settings.connect_timeout())
        .map_err(AppError::HttpClient)?;
    let resolver = DeploymentResolver::new(Arc::new(transport), settings.resolver_config());
    let channel = cli
        .channel
        .clone()
        .unwrap_or_else(|| resolver.fallback_channel().to_string());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(AppError::Runtime)?;

    runtime.block_on(async {
        let client_version = resolver
            .get_info(&channel, cli.extra)
            .await
            .map_err(|source| AppError::lookup(&channel, source))?;

        if cli.json {
            println!("{}", serde_json::to_string_pretty(&client_version)?);
            return Ok(());
        }

        let manifest_url = if cli.extra {
            resolver
                .location(&client_version.manifest_resource(), Some(channel.as_str()))
                .await
                .ok()
        } else {
            None
        };

        print!("{}", render(&channel, &client_version, manifest_url.as_deref()));
        Ok::<(), AppError>(())
    })
}

fn render(channel: &str, client_version: &ClientVersion, manifest_url: Option<&str>) -> String {
    let mut out = format!(
        "channel:  {channel}\nversion:  {}\nbuild:    {}\n",
        client_version.version, client_version.version_guid
    );

    if client_version.is_behind_default_channel {
        out.push_str(&format!("status:   behind {DEFAULT_CHANNEL}\n"));
    }
    if let Some(timestamp) = client_version.timestamp {
        out.push_str(&format!(
            "released: {}\n",
            timestamp.format("%Y-%m-%d %H:%M:%S %:z")
        ));
    }
    if let Some(manifest_url) = manifest_url {
        out.push_str(&format!("manifest: {manifest_url}\n"));
    }

    out
}
