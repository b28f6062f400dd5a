use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser, Debug)]
#[command(name = "taxcomp")]
#[command(about = "Compare Indian income tax under the Old and New regimes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute tax under both regimes and recommend one
    Compare(cmd::compare::CompareCommand),
    /// Check profiles for errors and clamped values
    Validate(cmd::validate::ValidateCommand),
    /// Show slab, rebate, surcharge and deduction tables
    Rules(cmd::rules::RulesCommand),
    /// Print the expected profile input format
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Compare(cmd) => cmd.exec(),
        Command::Validate(cmd) => cmd.exec(),
        Command::Rules(cmd) => cmd.exec(),
        Command::Schema(cmd) => cmd.exec(),
    }
}
