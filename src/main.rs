use std::error::Error;

use answer_engine::AnswerEngine;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file, when present.
    let _ = dotenvy::dotenv();

    let filter = answer_engine::telemetry::env_filter_with_level("info", Level::DEBUG);

    tracing_subscriber::registry()
        .with(filter)
        .with(answer_engine::telemetry::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let question = args
        .next()
        .unwrap_or_else(|| "How do I reset my password?".to_string());
    let category = args.next().unwrap_or_else(|| "General".to_string());

    let engine = AnswerEngine::from_env()?;
    let result = engine.generate(&question, &category, &[]).await?;

    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
