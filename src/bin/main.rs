use clap::Parser;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "practice-form")]
#[command(about = "Fill, submit and verify the DemoQA practice form")]
#[command(version)]
struct Cli {
    /// Scenario file to run
    scenario: PathBuf,

    /// Run in headless mode (overrides scenario)
    #[arg(long)]
    headless: bool,

    /// Set a parameter (can be used multiple times)
    #[arg(short = 'P', long = "param", value_name = "KEY=VALUE")]
    params: Vec<String>,

    /// Verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Validate the scenario without opening a browser
    #[arg(long)]
    check: bool,

    /// Quiet mode (only errors)
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> practice_form::Result<()> {
    let cli = Cli::parse();

    let level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    let params = practice_form::Params::from_args(&cli.params)?;
    let mut config = practice_form::Config::load_with_params(&cli.scenario, &params)?;

    if cli.check {
        println!("Scenario valid: {}", config.name);
        println!("  Target: {}", practice_form::BASE_URL);
        println!("  Expected rows: {}", config.expect.len());
        if !config.params.is_empty() {
            println!("  Parameters: {}", config.params.len());
            for (name, def) in &config.params {
                let req = if def.required { " (required)" } else { "" };
                let desc = def.description.as_deref().unwrap_or("");
                println!("    - {}{}: {}", name, req, desc);
            }
        }
        if let Some(ref picture) = config.form.picture {
            println!("  Picture: {}", config.assets_dir.join(picture).display());
        }
        return Ok(());
    }

    if cli.headless {
        config.browser.headless = true;
    }

    println!("Running: {}", config.name);

    let runner = practice_form::Runner::new(&config.browser).await?;
    let result = runner.run(&config).await?;

    println!();
    if result.success {
        println!("✓ Success");
    } else {
        println!("✗ Failed");
        if let Some(ref error) = result.error {
            println!("  Error: {}", error);
        }
    }
    println!("  Steps: {}", result.steps_executed);
    println!("  Duration: {}ms", result.duration_ms);

    runner.close().await?;

    if !result.success {
        std::process::exit(1);
    }

    Ok(())
}
