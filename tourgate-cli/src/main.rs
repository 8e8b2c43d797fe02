//! Entry point for the `tourgate` binary.
#![forbid(unsafe_code)]

fn main() -> eyre::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    tourgate_cli::run()?;
    Ok(())
}
