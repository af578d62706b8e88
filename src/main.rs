mod args;
mod logging;
mod output;

fn main() {
    if let Err(err) = real_main() {
        output::print_error(&err);
        std::process::exit(1);
    }
}

fn real_main() -> anyhow::Result<()> {
    use clap::Parser as _;

    let cli = args::Cli::parse();
    logging::init(cli.log_file()?.as_deref())?;

    // An interrupted run is still a clean exit.
    looper_infra::app::run(&cli.options())?;
    Ok(())
}
