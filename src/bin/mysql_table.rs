use clap::Parser;
use prework_toolkit::core::table::{render, DisplayOptions};
use prework_toolkit::utils::{logger, validation::Validate};
use prework_toolkit::{EnvFile, MysqlArgs, MysqlSource, Table, ToolkitError};

async fn read(args: &MysqlArgs) -> Result<Table, ToolkitError> {
    args.validate()?;

    let env = EnvFile::load(&args.env_file)?;
    let database_url = args.resolve_database_url(&env);

    let mut source = MysqlSource::connect(&database_url).await?;
    let table = source.read_table(&args.table).await?;
    source.close().await?;
    Ok(table)
}

#[tokio::main]
async fn main() {
    let args = MysqlArgs::parse();
    logger::init_cli_logger(args.verbose);

    match read(&args).await {
        Ok(table) => {
            println!("Data read from MySQL.");
            let opts = DisplayOptions {
                max_rows: args.max_rows,
                max_columns: args.max_columns,
            };
            println!("{}", render(&table, opts));
        }
        Err(e) => {
            tracing::error!("❌ Reading table {} failed: {}", args.table, e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(e.severity().exit_code());
        }
    }
}
