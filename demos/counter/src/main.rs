//! Counter demo binary
//!
//! Mounts the counter app, fires a few events and prints each commit.

use counter::{app, bootstrap_counter};
use simple_provider_runtime::Root;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "counter=debug,simple_provider_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Counter Demo: Simple Provider ===\n");

    let counter = bootstrap_counter();
    let mut root = Root::mount(app(&counter))?;
    println!("After mount (one increment dispatched on mount):\n{}", root.text());

    for event in ["increment", "increment", "decrement", "set", "reset"] {
        println!("\n>>> Firing: {event}");
        let passes = root.fire(event)?;
        tracing::info!(event, passes, "Event handled");
        println!("{}", root.text());
    }

    println!("\nRender passes: {}", root.render_count());
    root.unmount();
    Ok(())
}
