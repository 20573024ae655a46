mod args;
mod config;
mod main_lib;

use clap::Parser;

use args::Args;
use config::Config;
use main_lib::{build_runtime, http_lookup, init_tracing, load_page, render_mounts, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = Config::from_env();
    init_tracing(&config.log_format);

    let document = load_page(&args)?;
    let runtime = build_runtime(&config, document.clone(), http_lookup(&config));
    run(&args, &document, &runtime).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&document.snapshot())?);
    } else {
        print!("{}", render_mounts(&document));
    }
    Ok(())
}
