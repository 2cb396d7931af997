use anyhow::Result;
use clap::Parser;
use colored::*;

use sync_client::api_client::{login, ApiClient};
use sync_client::output::print_test_summary;
use sync_client::scenarios;
use sync_client::sse_client::Connection;

#[derive(Parser)]
#[command(name = "sync-test-client")]
#[command(about = "Event-stream sync integration testing tool")]
struct Cli {
    /// Base URL of the backend (e.g., http://localhost:4000)
    #[arg(long)]
    base_url: String,

    /// Account email to test with
    #[arg(long, default_value = "demo@daylist.dev")]
    email: String,

    /// Account password
    #[arg(long, default_value = "password")]
    password: String,

    /// Test scenario to run
    #[arg(long, value_enum)]
    scenario: ScenarioChoice,

    /// Enable verbose output
    #[arg(long, short)]
    verbose: bool,
}

#[derive(clap::ValueEnum, Clone)]
enum ScenarioChoice {
    /// Two tabs connect and receive distinct client ids
    ConnectionTest,
    /// A mutation reaches the peer tab but is not echoed to its origin
    EchoSuppression,
    /// A reorder converges the peer tab's cache without a refetch
    ReorderFanout,
    /// Run all scenarios
    All,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    }

    println!("{}", "=== SETUP PHASE ===".bright_white().bold());

    println!("{} Authenticating...", "→".blue());
    let http = reqwest::Client::new();
    let user = login(&http, &cli.base_url, &cli.email, &cli.password).await?;
    println!("{} Authenticated (user ID: {})", "✓".green(), user.user_id);

    // Two streams for the same user model the two-tab scenario.
    println!("{} Establishing event streams...", "→".blue());
    let mut tab_a = Connection::establish(
        &cli.base_url,
        &user.token,
        None,
        "Tab A (origin)".to_string(),
    )
    .await?;
    let mut tab_b =
        Connection::establish(&cli.base_url, &user.token, None, "Tab B (peer)".to_string())
            .await?;
    println!("{} Both tabs connected", "✓".green());

    // Mutations issued through tab A's identity.
    let api_a = ApiClient::new(http.clone(), cli.base_url.clone(), user.token.clone())
        .with_client_id(tab_a.client_id());

    println!("{} Creating a scratch section...", "→".blue());
    let section = api_a.create_section("Sync test section").await?;
    let section_id = section["id"].as_str().unwrap_or_default().to_owned();
    println!("{} Section created (ID: {})", "✓".green(), section_id);

    // Drain tab streams of the section create event before the tests run.
    let _ = tab_a
        .wait_for_event("section", std::time::Duration::from_millis(500))
        .await;
    let _ = tab_b
        .wait_for_event("section", std::time::Duration::from_secs(5))
        .await;

    println!("\n{}", "=== TEST PHASE ===".bright_white().bold());

    let mut results = Vec::new();

    match cli.scenario {
        ScenarioChoice::ConnectionTest => {
            results.push(scenarios::test_connection(&tab_a, &tab_b).await?);
        }
        ScenarioChoice::EchoSuppression => {
            results
                .push(scenarios::test_echo_suppression(&api_a, &section_id, &mut tab_a, &mut tab_b).await?);
        }
        ScenarioChoice::ReorderFanout => {
            results.push(scenarios::test_reorder_fanout(&api_a, &section_id, &mut tab_b).await?);
        }
        ScenarioChoice::All => {
            results.push(scenarios::test_connection(&tab_a, &tab_b).await?);
            results
                .push(scenarios::test_echo_suppression(&api_a, &section_id, &mut tab_a, &mut tab_b).await?);
            results.push(scenarios::test_reorder_fanout(&api_a, &section_id, &mut tab_b).await?);
        }
    }

    println!("\n{}", "=== RESULTS ===".bright_white().bold());
    print_test_summary(&results);

    let all_passed = results.iter().all(|r| r.passed);

    if all_passed {
        println!("\n{}", "All tests passed! ✓".bright_green().bold());
    } else {
        println!("\n{}", "Some tests failed! ✗".bright_red().bold());
    }

    std::process::exit(if all_passed { 0 } else { 1 });
}
