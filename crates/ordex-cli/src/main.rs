use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ordex_core::{BPTree, IndexConfig, DEFAULT_BRANCHING_FACTOR};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEMO_KEYS: [f64; 4] = [0.0, 0.5, 0.2, 0.8];

#[derive(Parser)]
#[command(name = "ordex")]
#[command(about = "ordex B+ tree index command-line interface")]
struct Cli {
    /// Log filter used when RUST_LOG is not set, e.g. "debug" or "ordex_core=trace".
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Insert random picks from a fixed key set and print the tree after each insert.
    Demo {
        #[arg(short, long, default_value_t = DEFAULT_BRANCHING_FACTOR)]
        branching_factor: usize,

        #[arg(short, long, default_value_t = 500)]
        inserts: usize,

        #[arg(short, long)]
        seed: Option<u64>,

        /// Only print the final range search.
        #[arg(short, long)]
        quiet: bool,
    },

    /// Interactive index with float keys and string values.
    Repl {
        #[arg(short, long, default_value_t = DEFAULT_BRANCHING_FACTOR)]
        branching_factor: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level)?;

    match cli.command {
        Commands::Demo {
            branching_factor,
            inserts,
            seed,
            quiet,
        } => run_demo(branching_factor, inserts, seed, quiet),
        Commands::Repl { branching_factor } => run_repl(branching_factor),
    }
}

fn init_logging(default_filter: &str) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)
            .with_context(|| format!("Invalid log filter: {}", default_filter))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn run_demo(branching_factor: usize, inserts: usize, seed: Option<u64>, quiet: bool) -> Result<()> {
    let config = IndexConfig::new(branching_factor);
    let mut tree = BPTree::with_config(config).context("Failed to create index")?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!(branching_factor, inserts, ?seed, "starting demo");

    for _ in 0..inserts {
        let key = DEMO_KEYS[rng.gen_range(0..DEMO_KEYS.len())];
        tree.insert(key, key)?;

        if !quiet {
            print!("{:?}", key);
            println!("\n\nTree structure:\n{}", tree);
        }
    }

    info!(size = tree.size(), height = tree.height(), "demo finished");
    println!("Filtered values: {:?}", tree.range_search(&0.2, ">="));
    Ok(())
}

fn run_repl(branching_factor: usize) -> Result<()> {
    let mut tree: BPTree<f64, String> =
        BPTree::new(branching_factor).context("Failed to create index")?;

    let mut rl = DefaultEditor::new()?;

    println!("ordex REPL (branching factor {})", branching_factor);
    println!("Commands: insert <key> <value>, get <key>, range <key> <<=|==|>=>, size, height, dump, quit");
    println!();

    loop {
        let readline = rl.readline("ordex> ");

        match readline {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                rl.add_history_entry(line)?;

                if line == "quit" || line == "exit" {
                    break;
                }

                match handle_command(&mut tree, line) {
                    Ok(output) => println!("{}", output),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("Interrupted");
                break;
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                break;
            }
        }
    }

    println!("Goodbye");
    Ok(())
}

fn parse_key(s: &str) -> Result<f64> {
    s.parse::<f64>().with_context(|| format!("Invalid key: {}", s))
}

fn handle_command(tree: &mut BPTree<f64, String>, line: &str) -> Result<String> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    if parts.is_empty() {
        return Ok(String::new());
    }

    let output = match parts[0] {
        "insert" | "put" => {
            if parts.len() < 3 {
                anyhow::bail!("Usage: insert <key> <value>");
            }

            let key = parse_key(parts[1])?;
            let value = parts[2..].join(" ");
            tree.insert(key, value)?;
            "OK".to_string()
        }

        "get" => {
            if parts.len() != 2 {
                anyhow::bail!("Usage: get <key>");
            }

            let key = parse_key(parts[1])?;
            match tree.get(&key) {
                Some(value) => value.clone(),
                None => "(nil)".to_string(),
            }
        }

        "range" => {
            if parts.len() != 3 {
                anyhow::bail!("Usage: range <key> <<=|==|>=>");
            }

            let key = parse_key(parts[1])?;
            let values = tree.range_search(&key, parts[2]);
            format!("{} values: {:?}", values.len(), values)
        }

        "size" => tree.size().to_string(),

        "height" => tree.height().to_string(),

        "dump" => tree.debug_string().trim_end().to_string(),

        _ => {
            anyhow::bail!("Unknown command: {}", parts[0]);
        }
    };

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> BPTree<f64, String> {
        BPTree::new(4).unwrap()
    }

    #[test]
    fn test_insert_and_get() {
        let mut tree = tree();
        assert_eq!(handle_command(&mut tree, "insert 1.5 hello world").unwrap(), "OK");
        assert_eq!(handle_command(&mut tree, "get 1.5").unwrap(), "hello world");
        assert_eq!(handle_command(&mut tree, "get 2").unwrap(), "(nil)");
        assert_eq!(handle_command(&mut tree, "size").unwrap(), "1");
    }

    #[test]
    fn test_range() {
        let mut tree = tree();
        for line in ["insert 1 b", "insert 2 a", "insert 3 c"] {
            handle_command(&mut tree, line).unwrap();
        }

        assert_eq!(
            handle_command(&mut tree, "range 2 >=").unwrap(),
            r#"2 values: ["a", "c"]"#
        );
        assert_eq!(handle_command(&mut tree, "range 2 <").unwrap(), "0 values: []");
    }

    #[test]
    fn test_dump() {
        let mut tree = tree();
        for k in ["0.0", "0.5", "0.2", "0.8"] {
            handle_command(&mut tree, &format!("insert {} v", k)).unwrap();
        }

        assert_eq!(
            handle_command(&mut tree, "dump").unwrap(),
            "{[0.5]}\n{[0.0, 0.2], [0.5, 0.8]}"
        );
        assert_eq!(handle_command(&mut tree, "height").unwrap(), "2");
    }

    #[test]
    fn test_errors() {
        let mut tree = tree();
        assert!(handle_command(&mut tree, "insert abc v").is_err());
        assert!(handle_command(&mut tree, "insert NaN v").is_err());
        assert!(handle_command(&mut tree, "get").is_err());
        assert!(handle_command(&mut tree, "delete 1").is_err());
        assert_eq!(handle_command(&mut tree, "size").unwrap(), "0");
    }
}
