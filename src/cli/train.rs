//! Repeated pipeline runs for prompt iteration
//!
//! Runs the full pipeline `n` times against the sample inputs and reports
//! per-iteration timing plus a success tally. Useful when tuning prompts
//! or checking quota behavior under sustained load.

use std::time::Instant;

use tracing::{error, info};

pub async fn run(iterations: u32) -> anyhow::Result<()> {
    if iterations == 0 {
        anyhow::bail!("iterations must be at least 1");
    }

    println!("Running {} training iteration(s)...\n", iterations);

    let mut succeeded = 0u32;
    let started = Instant::now();

    for i in 1..=iterations {
        let request = super::sample_request();
        let iter_started = Instant::now();

        match super::run_pipeline(request).await {
            Ok(posting) => {
                succeeded += 1;
                info!(
                    iteration = i,
                    elapsed_secs = iter_started.elapsed().as_secs_f64(),
                    "iteration complete"
                );
                println!(
                    "  [{}/{}] ok in {:.1}s -> {}",
                    i,
                    iterations,
                    iter_started.elapsed().as_secs_f64(),
                    posting.metadata.markdown_path.display()
                );
            }
            Err(e) => {
                error!(iteration = i, error = %e, "iteration failed");
                println!("  [{}/{}] failed: {}", i, iterations, e);
            }
        }
    }

    println!(
        "\n{}/{} iterations succeeded in {:.1}s total",
        succeeded,
        iterations,
        started.elapsed().as_secs_f64()
    );

    if succeeded == 0 {
        anyhow::bail!("all training iterations failed");
    }
    Ok(())
}
