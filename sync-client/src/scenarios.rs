use anyhow::Result;
use colored::*;
use std::time::{Duration, Instant};

use crate::api_client::ApiClient;
use crate::cache::EntityCache;
use crate::output::{print_event, TestResult};
use crate::sse_client::Connection;

const EVENT_TIMEOUT: Duration = Duration::from_secs(5);
const SILENCE_WINDOW: Duration = Duration::from_secs(2);

/// Both tabs of the same user hold distinct client ids after the handshake.
pub async fn test_connection(tab_a: &Connection, tab_b: &Connection) -> Result<TestResult> {
    let start = Instant::now();

    println!("\n{}", "=== TEST: Connection ===".bright_cyan().bold());
    println!(
        "{} Tab A client id: {}",
        "→".blue(),
        tab_a.client_id().dimmed()
    );
    println!(
        "{} Tab B client id: {}",
        "→".blue(),
        tab_b.client_id().dimmed()
    );

    let passed = !tab_a.client_id().is_empty() && tab_a.client_id() != tab_b.client_id();

    Ok(TestResult {
        scenario: "connection".to_string(),
        passed,
        message: (!passed).then(|| "Expected two distinct, non-empty client ids".to_string()),
        duration: start.elapsed(),
    })
}

/// A create issued by tab A reaches tab B but is never echoed back to A.
pub async fn test_echo_suppression(
    api_a: &ApiClient,
    section_id: &str,
    tab_a: &mut Connection,
    tab_b: &mut Connection,
) -> Result<TestResult> {
    let start = Instant::now();

    println!(
        "\n{}",
        "=== TEST: Echo Suppression ===".bright_cyan().bold()
    );

    println!("{} Tab A creating a task...", "→".blue());
    let task = api_a
        .create_task(section_id, "Refill the bird feeder", 0)
        .await?;
    let task_id = task["id"].as_str().unwrap_or_default().to_owned();
    println!("{} Task created (ID: {})", "✓".green(), task_id);

    println!("{} Waiting for Tab B to receive the change...", "→".blue());
    let event = match tab_b.wait_for_event("task", EVENT_TIMEOUT).await {
        Ok(event) => event,
        Err(e) => {
            return Ok(TestResult {
                scenario: "echo_suppression".to_string(),
                passed: false,
                message: Some(format!("Tab B never received the event: {e}")),
                duration: start.elapsed(),
            })
        }
    };
    print_event(&tab_b.user_label, &event);

    println!(
        "{} Verifying Tab A receives nothing for its own mutation...",
        "→".blue()
    );
    if let Err(e) = tab_a.expect_silence("task", SILENCE_WINDOW).await {
        return Ok(TestResult {
            scenario: "echo_suppression".to_string(),
            passed: false,
            message: Some(e.to_string()),
            duration: start.elapsed(),
        });
    }
    println!("{} No echo observed on the originating tab", "✓".green());

    Ok(TestResult {
        scenario: "echo_suppression".to_string(),
        passed: true,
        message: None,
        duration: start.elapsed(),
    })
}

/// A reorder issued by tab A converges tab B's cache to the new ordering
/// without a refetch.
pub async fn test_reorder_fanout(
    api_a: &ApiClient,
    section_id: &str,
    tab_b: &mut Connection,
) -> Result<TestResult> {
    let start = Instant::now();

    println!("\n{}", "=== TEST: Reorder Fan-out ===".bright_cyan().bold());

    println!("{} Tab A creating two tasks...", "→".blue());
    let first = api_a.create_task(section_id, "Stretch", 0).await?;
    let second = api_a.create_task(section_id, "Journal", 1).await?;

    // Tab B mirrors the board through the create events.
    let mut cache = EntityCache::new();
    for _ in 0..2 {
        let event = tab_b.wait_for_event("task", EVENT_TIMEOUT).await?;
        cache.apply(&event);
    }

    let first_id = first["id"].as_str().unwrap_or_default().to_owned();
    let second_id = second["id"].as_str().unwrap_or_default().to_owned();

    println!("{} Tab A swapping the two ranks...", "→".blue());
    api_a
        .reorder_tasks(&[(first_id.clone(), 1), (second_id.clone(), 0)])
        .await?;

    println!("{} Waiting for Tab B's reorder event...", "→".blue());
    let event = tab_b.wait_for_event("task", EVENT_TIMEOUT).await?;
    print_event(&tab_b.user_label, &event);
    cache.apply(&event);

    let section_uuid = section_id.parse().ok();
    let observed: Vec<String> = cache
        .tasks_in_section(section_uuid)
        .iter()
        .map(|t| t.id.to_string())
        .collect();
    let expected = vec![second_id, first_id];

    let passed = observed == expected;
    if passed {
        println!("{} Tab B's cache converged to the new order", "✓".green());
    } else {
        println!("{} Cache order mismatch", "✗".red());
    }

    Ok(TestResult {
        scenario: "reorder_fanout".to_string(),
        passed,
        message: (!passed).then(|| format!("Expected {expected:?}, observed {observed:?}")),
        duration: start.elapsed(),
    })
}
