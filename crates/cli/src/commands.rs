//! CLI subcommands.
//!
//! Each command builds a ring in-process, drives its public operations, and
//! formats the results; all of the interesting behavior lives in `corelib`.

use anyhow::ensure;
use clap::{Subcommand, ValueEnum};
use corelib::{analyze_performance, HashRing};
use tracing::info;

/// Output format for the analyze report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Walk through ring construction, key distribution, and a membership
    /// change.
    Demo {
        /// Number of synthetic keys to place.
        #[arg(long, default_value_t = 10_000)]
        keys: usize,
    },

    /// Sticky-session load balancer routing example.
    Balance,

    /// Cache key routing example.
    Cache,

    /// Database sharding example.
    Shard,

    /// Compare key movement against naive modulo placement.
    Compare {
        /// Number of keys to place.
        #[arg(long, default_value_t = 100)]
        keys: usize,

        /// Number of servers before the membership change.
        #[arg(long, default_value_t = 3)]
        servers: usize,
    },

    /// Measure distribution quality and lookup latency.
    Analyze {
        /// Number of keys to resolve.
        #[arg(long, default_value_t = 10_000)]
        keys: usize,

        /// Number of servers in the ring.
        #[arg(long, default_value_t = 3)]
        servers: usize,

        /// Output format.
        #[arg(long, value_enum, default_value = "text")]
        format: Format,
    },
}

impl Command {
    /// Run the command against a fresh ring with `vnodes` virtual nodes per
    /// server.
    pub fn run(&self, vnodes: usize) -> anyhow::Result<()> {
        ensure!(vnodes > 0, "--vnodes must be positive");

        match self {
            Command::Demo { keys } => run_demo(vnodes, *keys),
            Command::Balance => run_balance(vnodes),
            Command::Cache => run_cache(vnodes),
            Command::Shard => run_shard(vnodes),
            Command::Compare { keys, servers } => run_compare(vnodes, *keys, *servers),
            Command::Analyze {
                keys,
                servers,
                format,
            } => run_analyze(vnodes, *keys, *servers, *format),
        }
    }
}

fn run_demo(vnodes: usize, num_keys: usize) -> anyhow::Result<()> {
    println!("=== Consistent Hash Ring Demo ===");

    let ring = HashRing::new(vnodes);

    println!("Adding servers...");
    for server in ["server-A", "server-B", "server-C"] {
        ring.add_server(server)?;
        println!("  added {server}");
    }

    println!("\nPlacing {num_keys} sample keys...");
    let keys: Vec<String> = (0..num_keys).map(|i| format!("user-{i}")).collect();

    let report = analyze_performance(&ring, &keys);
    println!("\nKey distribution across servers:");
    for (server, count) in &report.distribution {
        let percentage = if keys.is_empty() {
            0.0
        } else {
            *count as f64 * 100.0 / keys.len() as f64
        };
        println!("  {server}: {count} keys ({percentage:.2}%)");
    }
    println!(
        "\nDistribution quality (CV): {:.2}% - {}",
        report.distribution_cv,
        report.verdict()
    );

    println!("\nExample key mappings:");
    for key in ["user-42", "user-1337", "user-9999", "session-abc123"] {
        println!("  {key} -> {}", ring.get_server(key)?);
    }

    println!("\n--- Adding a new server (server-D) ---");
    let mut before = Vec::with_capacity(keys.len());
    for key in &keys {
        before.push(ring.get_server(key)?);
    }

    ring.add_server("server-D")?;

    let mut moved = 0;
    for (key, old) in keys.iter().zip(&before) {
        if &ring.get_server(key)? != old {
            moved += 1;
        }
    }
    let percentage = if keys.is_empty() {
        0.0
    } else {
        moved as f64 * 100.0 / keys.len() as f64
    };
    println!(
        "Keys moved: {moved} of {} ({percentage:.1}%) - close to 1/{} of all keys",
        keys.len(),
        ring.len()
    );

    Ok(())
}

fn run_balance(vnodes: usize) -> anyhow::Result<()> {
    println!("=== Load Balancer Example ===\n");

    let ring = HashRing::new(vnodes);
    for backend in ["backend-1:8080", "backend-2:8080", "backend-3:8080"] {
        ring.add_server(backend)?;
    }

    println!("Request routing (by session ID):");
    let sessions = [
        "session-abc123",
        "session-def456",
        "session-ghi789",
        "session-jkl012",
        "session-mno345",
    ];
    for session in sessions {
        println!("  {session} -> {}", ring.get_server(session)?);
    }

    // Sticky sessions: the same session always reaches the same backend.
    println!("\nVerifying sticky sessions (session-abc123):");
    for attempt in 1..=3 {
        println!("  request {attempt} -> {}", ring.get_server("session-abc123")?);
    }

    Ok(())
}

fn run_cache(vnodes: usize) -> anyhow::Result<()> {
    println!("=== Cache Distribution Example ===\n");

    let ring = HashRing::new(vnodes);
    for server in ["cache-1", "cache-2", "cache-3"] {
        ring.add_server(server)?;
    }

    println!("Cache key routing:");
    let cache_keys = [
        "user:1234:profile",
        "user:5678:preferences",
        "session:abc123",
        "product:9999",
        "cart:user-42",
    ];
    for key in cache_keys {
        println!("  {key} -> {}", ring.get_server(key)?);
    }

    println!("\nVerifying consistency:");
    for attempt in 1..=3 {
        println!(
            "  attempt {attempt}: user:1234:profile -> {}",
            ring.get_server("user:1234:profile")?
        );
    }

    Ok(())
}

fn run_shard(vnodes: usize) -> anyhow::Result<()> {
    println!("=== Database Sharding Example ===\n");

    let ring = HashRing::new(vnodes);
    for shard in ["db-shard-1", "db-shard-2", "db-shard-3", "db-shard-4"] {
        ring.add_server(shard)?;
    }

    println!("User data routing:");
    for user_id in 1..=10 {
        let key = format!("user:{user_id}");
        println!("  user {user_id} -> {}", ring.get_server(&key)?);
    }

    println!("\nAdding a new shard (db-shard-5)...");
    let keys: Vec<String> = (1..=100).map(|id| format!("user:{id}")).collect();
    let mut before = Vec::with_capacity(keys.len());
    for key in &keys {
        before.push(ring.get_server(key)?);
    }

    ring.add_server("db-shard-5")?;

    let mut moved = 0;
    for (key, old) in keys.iter().zip(&before) {
        if &ring.get_server(key)? != old {
            moved += 1;
        }
    }
    println!("Users to migrate: {moved} of {}", keys.len());

    Ok(())
}

fn run_compare(vnodes: usize, num_keys: usize, servers: usize) -> anyhow::Result<()> {
    ensure!(servers > 0, "--servers must be positive");

    println!("=== Consistent Hash vs Modulo Comparison ===\n");

    // Naive modulo placement: key index modulo the server count. Growing the
    // pool reshuffles almost everything.
    let modulo_moved = (0..num_keys)
        .filter(|i| i % servers != i % (servers + 1))
        .count();

    let ring = HashRing::new(vnodes);
    for i in 0..servers {
        ring.add_server(format!("server-{i}"))?;
    }

    let keys: Vec<String> = (0..num_keys).map(|i| format!("key-{i}")).collect();
    let mut before = Vec::with_capacity(keys.len());
    for key in &keys {
        before.push(ring.get_server(key)?);
    }

    ring.add_server(format!("server-{servers}"))?;

    let mut ring_moved = 0;
    for (key, old) in keys.iter().zip(&before) {
        if &ring.get_server(key)? != old {
            ring_moved += 1;
        }
    }

    let as_percentage = |moved: usize| {
        if num_keys == 0 {
            0.0
        } else {
            moved as f64 * 100.0 / num_keys as f64
        }
    };
    println!("Adding server {} to a pool of {servers}:", servers + 1);
    println!(
        "  modulo hashing moved     {modulo_moved} of {num_keys} keys ({:.1}%)",
        as_percentage(modulo_moved)
    );
    println!(
        "  consistent hashing moved {ring_moved} of {num_keys} keys ({:.1}%)",
        as_percentage(ring_moved)
    );

    Ok(())
}

fn run_analyze(
    vnodes: usize,
    num_keys: usize,
    servers: usize,
    format: Format,
) -> anyhow::Result<()> {
    ensure!(servers > 0, "--servers must be positive");

    let ring = HashRing::new(vnodes);
    for i in 1..=servers {
        ring.add_server(format!("server-{i}"))?;
    }

    let keys: Vec<String> = (1..=num_keys).map(|i| format!("user-{i}")).collect();
    info!(keys = keys.len(), servers, vnodes, "analyzing distribution");

    let report = analyze_performance(&ring, &keys);
    match format {
        Format::Text => print!("{report}"),
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}
