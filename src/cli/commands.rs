pub(crate) use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "paisa-ledger",
    author,
    version,
    about = "A ledger engine for the Happy Paisa virtual currency",
    long_about = None,
    after_help = "OUTPUT:\n    Final wallet state is printed to stdout in CSV format.\n    Use shell redirection to save to a file:\n\n    paisa-ledger operations.csv > wallets.csv"
)]
pub struct Args {
    /// Path to the input operations CSV file
    #[arg(
        index = 1,
        value_name = "FILE",
        help = "Input CSV file with columns: op, user, to_user, amount, note, reference"
    )]
    pub input_file: PathBuf,
}
