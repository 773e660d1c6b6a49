// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use caselaw_tools::{cases_per_tool, corpus, Cli, Command, Config, Corpus, ToolView, TOP_COURTS};

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from(&cli.data);
    info!("caselaw-tools v{}", caselaw_tools::VERSION);

    let corpus = corpus::shared(&config).with_context(|| {
        format!(
            "Failed to load corpus from {}",
            config.metadata_path.display()
        )
    })?;

    match cli.command.unwrap_or(Command::View) {
        Command::View => run_ui_mode(corpus)?,
        Command::Summary { tool } => run_summary(corpus, tool.as_deref())?,
    }

    Ok(())
}

// Logs go to stderr so they never mix with the summary or the TUI
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "caselaw_tools=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run_summary(corpus: &Corpus, tool: Option<&str>) -> Result<()> {
    println!("Digital Forensic Tools");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("✓ {}", corpus.stats.summary());

    println!("\n{:<30} {:>15}", "Tool", "Number of cases");
    for (name, count) in cases_per_tool(&corpus.cases) {
        println!("{:<30} {:>15}", name, count);
    }

    let Some(tool) = tool else {
        return Ok(());
    };

    let view = ToolView::new(&corpus.cases, tool)?;

    println!("\nNumber of cases per year ({})", view.tool);
    for (year, count) in view.cases_per_year() {
        println!("  {}  {:>4}  {}", year, count, "█".repeat(count));
    }

    println!("\nMost common courts");
    for (court, count) in view.top_courts(TOP_COURTS) {
        println!("  {:>4}  {}", count, display_court(court));
    }

    if let Some(entities) = &corpus.entities {
        if let Some(people) = entities.people(tool) {
            println!("\nMost mentioned people");
            for (name, count) in people.most_common(TOP_COURTS) {
                println!("  {:>4}  {}", count, name);
            }
        }
        if let Some(orgs) = entities.orgs(tool) {
            println!("\nMost mentioned organizations");
            for (name, count) in orgs.most_common(TOP_COURTS) {
                println!("  {:>4}  {}", count, name);
            }
        }
    }

    Ok(())
}

fn display_court(court: &str) -> &str {
    if court.trim().is_empty() {
        "(unknown court)"
    } else {
        court
    }
}

#[cfg(feature = "tui")]
fn run_ui_mode(corpus: &Corpus) -> Result<()> {
    if corpus.cases.is_empty() {
        eprintln!("❌ No cases left after filtering, nothing to show.");
        std::process::exit(1);
    }

    let mut app = ui::App::new(corpus)?;
    ui::run_ui(&mut app)?;

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_corpus: &Corpus) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or print a report: caselaw-tools summary --tool <NAME>");
    std::process::exit(1);
}
