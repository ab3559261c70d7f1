use clap::Parser;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "page-verify")]
#[command(about = "Headless page render verification")]
#[command(version)]
struct Cli {
    /// Config file to run (omit for the built-in map-view verification)
    config: Option<PathBuf>,

    /// Run with a visible browser window (overrides config)
    #[arg(long)]
    headed: bool,

    /// Override the target URL
    #[arg(long)]
    url: Option<String>,

    /// Override the artifact path
    #[arg(long, value_name = "PATH")]
    out: Option<String>,

    /// Parameter value as KEY=VALUE (repeatable)
    #[arg(short = 'P', long = "param", value_name = "KEY=VALUE")]
    params: Vec<String>,

    /// Increase log detail (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Parse and summarize the config, then exit
    #[arg(long)]
    check: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Log errors only
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> page_verify::Result<()> {
    let cli = Cli::parse();

    let level = match (cli.quiet, cli.verbose) {
        (true, _) => Level::ERROR,
        (_, 0) => Level::WARN,
        (_, 1) => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .compact()
        .init();

    let params = page_verify::Params::from_args(&cli.params)?;

    let mut config = match cli.config {
        Some(ref path) => page_verify::VerifyConfig::load_with_params(path, &params)?,
        None => page_verify::VerifyConfig::builtin_with_params(&params)?,
    };

    // Apply CLI overrides
    if cli.headed {
        config.browser.headless = false;
    }
    if let Some(url) = cli.url {
        config.target.url = url;
    }
    if let Some(out) = cli.out {
        config.artifact = Some(page_verify::ArtifactConfig { path: out });
    }

    if cli.check {
        print_summary(&config);
        return Ok(());
    }

    if !cli.json {
        println!("Verifying: {}", config.name);
    }

    let mut runner = page_verify::Runner::new(&config.browser).await?;
    let result = runner.run(&config).await?;
    runner.close().await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        match (result.success, &result.artifact, &result.error) {
            (true, Some(artifact), _) => {
                println!("✓ Verified, artifact at {}", artifact.display())
            }
            (true, None, _) => println!("✓ Verified"),
            (false, _, Some(error)) => println!("✗ Not verified: {}", error),
            (false, _, None) => println!("✗ Not verified"),
        }
        print!(
            "  {}/{} checks in {}ms",
            result.checks_passed,
            config.checks.len(),
            result.duration_ms
        );
        if result.retries > 0 {
            print!(", {} retries", result.retries);
        }
        println!();
    }

    if !result.success {
        std::process::exit(1);
    }

    Ok(())
}

/// `--check` output: the parsed surface of a valid config.
fn print_summary(config: &page_verify::VerifyConfig) {
    println!("{}: config OK", config.name);
    println!("  target    {}", config.target.url);
    for check in &config.checks {
        println!("  check     {}", check.name());
    }
    if let Some(ref artifact) = config.artifact {
        println!("  artifact  {}", artifact.path);
    }
    for (name, def) in &config.params {
        let kind = if def.required { "required" } else { "optional" };
        match def.description {
            Some(ref desc) => println!("  param     {} ({}): {}", name, kind, desc),
            None => println!("  param     {} ({})", name, kind),
        }
    }
    if let Some(retry) = config.on_failure.as_ref().and_then(|f| f.retry.as_ref()) {
        println!("  retry     {} attempts, {}ms apart", retry.attempts, retry.delay_ms);
    }
}
