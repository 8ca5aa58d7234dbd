use std::path::PathBuf;

use anyhow::Context;
use chameleon_config::ResponderConfig;
use chameleon_responder::ResponderServer;
use tokio::sync::broadcast;

pub fn register(command: clap::Command) -> clap::Command {
    command.subcommand(
        clap::Command::new("serve")
            .about("runs the chameleon responder until interrupted")
            .arg(
                clap::Arg::new("config")
                    .long("config")
                    .help("TOML file to load settings from, defaults apply when absent")
                    .action(clap::ArgAction::Set)
                    .value_parser(clap::value_parser!(PathBuf)),
            )
            .arg(
                clap::Arg::new("addr")
                    .long("addr")
                    .action(clap::ArgAction::Set)
                    .value_parser(clap::value_parser!(String)),
            )
            .arg(
                clap::Arg::new("port")
                    .long("port")
                    .action(clap::ArgAction::Set)
                    .value_parser(clap::value_parser!(u16)),
            )
            .arg(
                clap::Arg::new("log_level")
                    .long("log-level")
                    .action(clap::ArgAction::Set)
                    .value_parser(clap::value_parser!(String)),
            ),
    )
}

pub async fn run(args: &clap::ArgMatches) -> anyhow::Result<()> {
    let config = load_config(args)?;

    let level = chameleon_trace::subscriber::parse_level(&config.logging.level)?;
    chameleon_trace::subscriber::setup(level)?;

    chameleon_trace::info!("Starting chameleon responder");

    let dispatcher = chameleon_responder::dispatcher_from_config(&config)?;
    let server = ResponderServer::bind(&config.server.bind_addr(), dispatcher).await?;

    let (cancel_sender, cancel_receiver) = broadcast::channel::<()>(1);

    ctrlc::set_handler(move || {
        if cancel_sender.send(()).is_err() {
            chameleon_trace::warn!("Responder already stopped");
        }
    })
    .context("failed to install Ctrl-C handler")?;

    server
        .spawn(cancel_receiver)
        .await
        .context("responder task panicked")?
        .map_err(|err| anyhow::anyhow!(err))?;

    chameleon_trace::info!("Chameleon responder stopped");
    Ok(())
}

/// Loads the config file when one is given, then applies flag overrides.
fn load_config(args: &clap::ArgMatches) -> anyhow::Result<ResponderConfig> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => ResponderConfig::load(path.clone())
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ResponderConfig::default(),
    };

    if let Some(addr) = args.get_one::<String>("addr") {
        config.server.addr.clone_from(addr);
    }
    if let Some(port) = args.get_one::<u16>("port") {
        config.server.port = *port;
    }
    if let Some(level) = args.get_one::<String>("log_level") {
        config.logging.level.clone_from(level);
    }

    Ok(config)
}
