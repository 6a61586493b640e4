use std::ops::Range;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::api::{self, ChatClient, Outcome};
use crate::auth::ensure_api_key;
use crate::palette::Palette;
use crate::questions::load_questions;
use crate::utils::pluralize;

const BANNER_TEXT: &str = "HYPERCHAT";
const BANNER_WIDTH: usize = 80;
const DELAY_RANGE_MS: Range<u64> = 60_000..120_000;

/// One run's worth of knobs, resolved by the CLI. The API base and the
/// delay range only vary under test.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub questions_path: PathBuf,
    pub config_path: PathBuf,
    pub api_base: String,
    pub delay_ms: Range<u64>,
    pub seed: Option<u64>,
}

impl RunConfig {
    pub fn new(questions_path: PathBuf, config_path: PathBuf) -> Self {
        Self {
            questions_path,
            config_path,
            api_base: api::API_BASE.to_string(),
            delay_ms: DELAY_RANGE_MS,
            seed: None,
        }
    }
}

/// Asks every question in the file once, in random order, pausing a
/// random interval between consecutive questions. Request failures are
/// printed and skipped; only a missing credential or an unusable
/// question file aborts the run.
pub async fn run(config: &RunConfig) -> Result<()> {
    for line in render_banner(BANNER_TEXT, BANNER_WIDTH).lines() {
        println!("{}", Palette::paint(Palette::ACCENT, line));
    }
    println!();

    let api_key = ensure_api_key(&config.config_path)?;
    let client = ChatClient::with_base_url(api_key, config.api_base.clone());

    let questions = load_questions(&config.questions_path)?;
    println!(
        "{}",
        Palette::paint(
            Palette::INFO,
            format!("Loaded {}.", pluralize("question", questions.len()))
        )
    );

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let order = plan_order(questions, &mut rng);
    let total = order.len();

    for (idx, question) in order.iter().enumerate() {
        println!("\n{}", Palette::dim("-".repeat(BANNER_WIDTH)));
        println!(
            "{}",
            Palette::paint(
                Palette::WARNING,
                format!("[{}/{}] Asking: {}", idx + 1, total, question)
            )
        );

        match client.ask(question).await {
            Outcome::Success { content } => {
                println!("{} {}", Palette::paint(Palette::SUCCESS, "Answer:"), content);
            }
            Outcome::Failure { message } => {
                eprintln!(
                    "{}",
                    Palette::paint(Palette::DANGER, format!("API error: {}", message))
                );
            }
        }

        if idx + 1 < total {
            let delay = pick_delay(&mut rng, &config.delay_ms);
            println!(
                "{}",
                Palette::dim(format!("Waiting {:.1} seconds...", delay.as_secs_f64()))
            );
            tokio::time::sleep(delay).await;
        }
    }

    println!(
        "\n{}",
        Palette::paint(
            Palette::SUCCESS,
            format!("Completed all {}!", pluralize("question", total))
        )
    );

    Ok(())
}

/// Shuffles a working copy of the question list. Consuming a full
/// shuffle in order is the same without-replacement draw as removing a
/// random element per iteration, but deterministic under a seeded rng.
fn plan_order(questions: Vec<String>, rng: &mut impl Rng) -> Vec<String> {
    let mut order = questions;
    order.shuffle(rng);
    order
}

fn pick_delay(rng: &mut impl Rng, range_ms: &Range<u64>) -> Duration {
    Duration::from_millis(rng.random_range(range_ms.clone()))
}

fn render_banner(text: &str, width: usize) -> String {
    let inner = width.saturating_sub(2);
    let left_pad = inner.saturating_sub(text.len()) / 2;
    let right_pad = inner.saturating_sub(left_pad + text.len());

    let border = format!("+{}+", "-".repeat(inner));
    let empty = format!("|{}|", " ".repeat(inner));
    let text_line = format!(
        "|{}{}{}|",
        " ".repeat(left_pad),
        text,
        " ".repeat(right_pad)
    );

    let mut banner = String::new();
    for line in [&border, &empty, &text_line, &empty, &border] {
        banner.push_str(line);
        banner.push('\n');
    }
    banner
}
