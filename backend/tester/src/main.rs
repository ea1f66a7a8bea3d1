use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use ledger::{LEADERBOARD_SIZE, Ledger, ScoreRecord};
use reqwest::Client;
use serde_json::{Value, json};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Proxy or store base address
    #[arg(long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Post each score in order
    Submit {
        #[arg(required = true, allow_negative_numbers = true)]
        scores: Vec<i64>,
    },

    /// Print the current top scores
    Leaderboard,

    /// Check the service is up
    Health,

    /// Rank a local score file without any server
    Inspect {
        file: PathBuf,

        #[arg(long, default_value_t = LEADERBOARD_SIZE)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let base = args.url.trim_end_matches('/');
    let client = Client::new();

    match args.command {
        Command::Submit { scores } => submit(&client, base, &scores).await,
        Command::Leaderboard => {
            let scores = client
                .get(format!("{base}/api/scores"))
                .send()
                .await?
                .error_for_status()?
                .json::<Vec<ScoreRecord>>()
                .await?;

            print_leaderboard(&scores);
            Ok(())
        }
        Command::Health => {
            let response = client.get(format!("{base}/health")).send().await?;
            println!("{}: {}", response.status(), response.text().await?);
            Ok(())
        }
        Command::Inspect { file, limit } => {
            if !file.exists() {
                bail!("{} does not exist", file.display());
            }

            print_leaderboard(&Ledger::new(file).top(limit));
            Ok(())
        }
    }
}

async fn submit(client: &Client, base: &str, scores: &[i64]) -> anyhow::Result<()> {
    let pb = ProgressBar::new(scores.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )?
        .progress_chars("=> "),
    );

    let mut saved = 0;
    let mut failed = 0;

    for &score in scores {
        pb.set_message(format!("Saving {score}"));

        let response = client
            .post(format!("{base}/api/scores"))
            .json(&json!({ "score": score }))
            .send()
            .await
            .with_context(|| format!("Failed to reach {base}"))?;

        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if status.is_success() {
            saved += 1;
        } else {
            failed += 1;
            pb.println(format!("Score {score} rejected ({status}): {}", error_message(&body)));
        }

        pb.inc(1);
    }

    pb.finish_with_message("Done");

    println!("Saved: {saved}");
    println!("Failed: {failed}");

    Ok(())
}

fn error_message(body: &Value) -> &str {
    body.get("error")
        .and_then(Value::as_str)
        .unwrap_or("no error message")
}

fn print_leaderboard(scores: &[ScoreRecord]) {
    if scores.is_empty() {
        println!("No scores yet");
        return;
    }

    for (index, record) in scores.iter().enumerate() {
        println!("{}", leaderboard_line(index, record));
    }
}

fn leaderboard_line(index: usize, record: &ScoreRecord) -> String {
    format!(
        "{}. Score: {} ({}, {})",
        index + 1,
        record.score,
        record.timestamp,
        record.ip
    )
}
