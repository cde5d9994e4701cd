//! Example: look up every OS / utility combination against the live page
//!
//! Run with: cargo run -p studio-lookup --example lookup_all
//!
//! Useful for spotting markup changes on the download page: every row
//! should print a version, URL and checksum.

use std::time::Instant;
use studio_lookup::{ExtractionRequest, ExtractionResult, TargetOs, Tool, Utility};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("Android Studio download lookup");
    println!("==============================\n");

    let tool = Tool::default();
    let mut passed = 0;
    let mut failed = 0;

    for utility in Utility::ALL {
        for os in TargetOs::ALL {
            println!("{} {}", os, utility);
            let started = Instant::now();

            match tool.execute(ExtractionRequest::new(os, utility)).await {
                Ok(result) => {
                    print_result_summary(&result);
                    println!("   ✓ PASS ({} ms)\n", started.elapsed().as_millis());
                    passed += 1;
                }
                Err(e) => {
                    println!("   Error: {}", e);
                    println!("   ✗ FAIL\n");
                    failed += 1;
                }
            }
        }
    }

    println!("==============================");
    println!("Results: {} passed, {} failed", passed, failed);

    if failed > 0 {
        std::process::exit(1);
    }
}

fn print_result_summary(result: &ExtractionResult) {
    println!("   Version: {}", result.version);
    println!("   URL: {}", result.url);
    println!("   File: {}", result.filename);
    println!("   SHA-256: {}", result.checksum_or_unavailable());
}
