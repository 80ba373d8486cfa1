use clap::Parser;
use color_eyre::Result;
use std::path::PathBuf;
use studydesk::{Config, Profile, SqliteStorage, cli::Cli, logging};

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    // Installed before the config is read so loading it is logged
    let log_filter = logging::init();

    let cli = Cli::parse();

    // Determine profile: --dev flag enables dev mode, otherwise use prod
    let profile = if cli.dev { Profile::Dev } else { Profile::Prod };

    let config = match cli.config.as_deref() {
        Some(path) => Config::load_from_path(&PathBuf::from(path), profile)?,
        None => Config::load_with_profile(profile)?,
    };
    log_filter.apply_config(&config.log_filter)?;

    let db_path = config.get_database_path();
    tracing::debug!(path = %db_path.display(), ?profile, "opening storage");
    let storage = SqliteStorage::new(
        db_path
            .to_str()
            .ok_or_else(|| color_eyre::eyre::eyre!("Database path contains invalid UTF-8"))?,
    )?;

    studydesk::cli::run(cli.command, &storage, &config)?;

    Ok(())
}
