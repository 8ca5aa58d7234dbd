mod serve;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commander = serve::register(
        clap::Command::new("chameleon")
            .about("HTTP service double: status codes, JSON echo and seeded fixtures")
            .arg_required_else_help(true),
    );

    let matches = commander.get_matches();
    if let Some(("serve", arguments)) = matches.subcommand() {
        serve::run(arguments).await?;
    }

    Ok(())
}
