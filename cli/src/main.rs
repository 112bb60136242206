mod commands;
mod terminal;

use commands::{CommandLine, Commands, classify, interfaces, ranges, scan};
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init(commands.verbose);

    match commands.command {
        Commands::Scan(args) => {
            print::header("starting scanner");
            scan::scan(&args).await
        }
        Commands::Ranges { range } => {
            print::header("network ranges");
            ranges::ranges(range.as_deref())
        }
        Commands::Interfaces => {
            print::header("active interfaces");
            interfaces::interfaces();
            Ok(())
        }
        Commands::Classify(args) => {
            print::header("classification");
            classify::classify(&args);
            Ok(())
        }
    }
}
