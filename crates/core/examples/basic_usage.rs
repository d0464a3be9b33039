//! Basic usage of the docmatch engine
//!
//! Run with `RUST_LOG=docmatch_core=debug` to see the matching phases.

use std::sync::Arc;

use docmatch_core::{
    compare, AlgorithmRegistry, Category, CompareOptions, DiffEngine, MatchingAlgorithm,
    PendingAlgorithm,
};
use tracing_subscriber::EnvFilter;

const LINE: &str = "----------------------------------------";

const LEFT: &str = "The contract starts in May.\n\nPayment is due within 30 days. Late fees apply.\n\nSigned by both parties.";
const RIGHT: &str = "The contract starts in June.\n\nPayment is due within 45 days. Late fees apply.\n\nAn appendix lists the deliverables.\n\nSigned by both parties.";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("docmatch_core=info")),
        )
        .init();

    println!("=== Docmatch Examples ===\n");

    example_paragraphs()?;
    example_sentences()?;
    example_registry()?;

    Ok(())
}

fn example_paragraphs() -> Result<(), Box<dyn std::error::Error>> {
    println!("Example 1: Paragraph matching");
    println!("{}", LINE);

    let options = CompareOptions::new().with_fuzziness(0.8);
    let result = compare(LEFT, RIGHT, Some(options))?;

    println!("{}", result.summary());
    for entry in &result.diff {
        println!("  {}", entry.description());
    }
    println!();
    Ok(())
}

fn example_sentences() -> Result<(), Box<dyn std::error::Error>> {
    println!("Example 2: Sentence matching with word detail");
    println!("{}", LINE);

    let engine = DiffEngine::default();
    let options = CompareOptions::new().with_fuzziness(1.0);
    let result = engine.compare("sentence", "levenshtein", LEFT, RIGHT, &options)?;

    for pair in &result.extensions.word_diff {
        let edits: Vec<String> = pair
            .changes
            .iter()
            .filter(|c| c.is_change())
            .map(|c| format!("{:?} '{}'", c.kind, c.text))
            .collect();
        if !edits.is_empty() {
            println!("  {} -> {}: {}", pair.left_index, pair.right_index, edits.join(", "));
        }
    }
    println!();
    Ok(())
}

fn example_registry() -> Result<(), Box<dyn std::error::Error>> {
    println!("Example 3: Registry listing");
    println!("{}", LINE);

    let mut registry = AlgorithmRegistry::with_defaults();
    registry.register(
        "paragraph",
        Arc::new(PendingAlgorithm::named("semantic", "Semantic", Category::Paragraph, 10)),
    )?;

    for algorithm in registry.get_all("paragraph") {
        let metadata = algorithm.metadata();
        println!("  {}. {} ({})", metadata.order, metadata.display_name, metadata.name);
    }

    let engine = DiffEngine::new(registry);
    if let Err(e) = engine.compare("paragraph", "semantic", LEFT, RIGHT, &CompareOptions::default()) {
        println!("  semantic: {} [{}]", e, e.code());
    }
    Ok(())
}
