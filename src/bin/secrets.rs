use anyhow::Context;
use clap::Parser;
use prework_toolkit::config::secrets::{mask, Secrets, DATABASE_PASSWORD, SECRET_KEY};
use prework_toolkit::utils::logger;
use prework_toolkit::{EnvFile, SecretsArgs};

fn report(name: &str, value: Option<&str>) {
    match value {
        Some(v) => println!("{:<20} {}", name, mask(v)),
        None => println!("{:<20} (not set)", name),
    }
}

fn main() -> anyhow::Result<()> {
    let args = SecretsArgs::parse();
    logger::init_cli_logger(args.verbose);

    let env = EnvFile::load(&args.env_file)
        .with_context(|| format!("failed to read env file '{}'", args.env_file))?;
    if !env.found() {
        tracing::warn!("Env file {} not found; using the process environment only", env.path().display());
    }

    let secrets = Secrets::from_env_file(&env);
    report(SECRET_KEY, secrets.secret_key.as_deref());
    report(DATABASE_PASSWORD, secrets.database_password.as_deref());

    for key in &args.keys {
        report(key, env.get(key).as_deref());
    }

    Ok(())
}
