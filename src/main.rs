mod console;
mod menu;

use anyhow::Context;
use console::Console;
use hospital_core::config::data_dir_from_env_value;
use hospital_core::{DirPolicy, Hospital, StorageConfig};
use menu::Menu;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Entry point of the interactive hospital console.
///
/// Opens every table under the data directory, then hands the terminal to the menu loop until
/// the operator confirms exit, at which point every table is saved.
///
/// # Environment Variables
/// - `HOSPITAL_DATA_DIR`: directory holding the table files (default: "data")
/// - `RUST_LOG`: log filter; logs go to stderr (default: "hospital_core=warn")
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hospital_core=warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let data_dir = data_dir_from_env_value(std::env::var("HOSPITAL_DATA_DIR").ok());
    let cfg = StorageConfig::new(data_dir, DirPolicy::CreateIfMissing)?;
    tracing::info!("++ Starting hospital console on {}", cfg.data_dir().display());

    let mut hospital = Hospital::open(cfg).context("failed to open hospital tables")?;

    let console = Console::new(std::io::stdin().lock(), std::io::stdout());
    Menu::new(&mut hospital, console)
        .run()
        .context("console I/O failed")?;

    Ok(())
}
