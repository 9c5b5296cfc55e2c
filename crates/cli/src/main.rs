use clap::{Parser, Subcommand};
use hospital_core::{DirPolicy, Hospital, StorageConfig, TableKind};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hospital")]
#[command(about = "Hospital records maintenance CLI")]
struct Cli {
    /// Directory holding the table files
    #[arg(long, default_value = hospital_core::constants::DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List every row of a table
    List {
        /// Table name (e.g. "patients" or "pacientes")
        table: TableKind,
    },
    /// Show one row
    Show {
        /// Table name
        table: TableKind,
        /// Row ID
        id: String,
    },
    /// Remove every row with the given ID
    Remove {
        /// Table name
        table: TableKind,
        /// Row ID
        id: String,
    },
    /// Change a staff member's status
    SetStaffStatus {
        /// Staff ID
        id: String,
        /// New status (any text)
        status: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("hospital_core=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'hospital --help' for commands");
        return Ok(());
    };

    let cfg = StorageConfig::new(cli.data_dir, DirPolicy::CreateIfMissing)?;
    let mut hospital = Hospital::open(cfg)?;

    match command {
        Commands::List { table } => {
            let store = hospital.store(table);
            if store.is_empty() {
                println!("No rows in {table}.");
            } else {
                println!("{}", store.columns().join(","));
                for row in store.rows() {
                    let values: Vec<&str> = row.iter().map(|(_, v)| v).collect();
                    println!("{}", values.join(","));
                }
            }
        }
        Commands::Show { table, id } => match hospital.find(table, &id) {
            Some(row) => print!("{row}"),
            None => eprintln!("No row with ID {id} in {table}"),
        },
        Commands::Remove { table, id } => match hospital.remove(table, &id) {
            Ok(removed) => println!("Removed {removed} row(s) with ID {id} from {table}"),
            Err(e) => eprintln!("Error removing row: {}", e),
        },
        Commands::SetStaffStatus { id, status } => {
            match hospital.set_staff_status(&id, &status) {
                Ok(staff) => println!("Staff member {} is now {}", staff.id, staff.status()),
                Err(e) => eprintln!("Error changing status: {}", e),
            }
        }
    }

    Ok(())
}
