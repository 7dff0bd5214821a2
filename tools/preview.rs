/// Preview — generate cards from the terminal.
///
/// Usage: preview [--tables <path>] [--seed <n>] [--count <n>] [--debug] [--shell]
///
/// Shell commands:
///   next          — generate one card
///   bulk <n>      — generate n cards with shape stats
///   seed <n>      — rebuild the engine with a new seed
///   help          — list commands
///   quit          — exit

use card_forge::core::pipeline::{CardEngine, DisplaySink};
use card_forge::schema::descriptor::{Descriptor, Kind};
use rustc_hash::{FxHashMap, FxHashSet};
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

/// Prints cards as plain text, or with `{:#?}` when `debug` is set.
struct StdoutSink {
    debug: bool,
}

impl DisplaySink for StdoutSink {
    fn display(&mut self, descriptor: &Descriptor) {
        if self.debug {
            println!("{:#?}", descriptor);
            return;
        }
        println!("{}: {}", descriptor.heading(), descriptor.name);
        if let Some(stats) = &descriptor.item {
            if !descriptor.is_passive() {
                println!("  CD: {}", stats.cooldown_label());
            }
            println!("  Size: {}", stats.size.label());
            println!("  Rarity: {}", stats.rarity.label());
            if stats.multicast > 0 {
                println!("  Multicast x{}", stats.multicast);
            }
        }
        println!("  {}", descriptor.description);
        println!();
    }
}

struct Options {
    tables: Option<String>,
    seed: u64,
    count: usize,
    debug: bool,
    shell: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let options = parse_args(&args);

    let mut engine = build_engine(options.tables.as_deref(), options.seed);
    let mut sink = StdoutSink {
        debug: options.debug,
    };

    if options.shell {
        run_shell(engine, options.tables.as_deref(), &mut sink);
    } else {
        for _ in 0..options.count {
            engine.generate_into(&mut sink);
        }
    }
}

fn parse_args(args: &[String]) -> Options {
    let mut options = Options {
        tables: None,
        seed: 42,
        count: 5,
        debug: false,
        shell: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            "--tables" if i + 1 < args.len() => {
                i += 1;
                options.tables = Some(args[i].clone());
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                options.seed = args[i].parse().unwrap_or(42);
            }
            "--count" if i + 1 < args.len() => {
                i += 1;
                options.count = args[i].parse().unwrap_or(5);
            }
            "--debug" => options.debug = true,
            "--shell" => options.shell = true,
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }
    options
}

fn build_engine(tables: Option<&str>, seed: u64) -> CardEngine {
    let mut builder = CardEngine::builder().seed(seed);
    if let Some(path) = tables {
        builder = builder.tables_file(path);
    }
    match builder.build() {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_shell(mut engine: CardEngine, tables: Option<&str>, sink: &mut StdoutSink) {
    println!("Type 'help' for commands.\n");
    let stdin = io::stdin();

    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let parts: Vec<&str> = line.split_whitespace().collect();

        match parts.as_slice() {
            [] => continue,
            ["quit"] | ["exit"] => {
                println!("Goodbye.");
                break;
            }
            ["help"] => print_commands(),
            ["next"] => engine.generate_into(sink),
            ["seed", n] => match n.parse::<u64>() {
                Ok(seed) => {
                    engine = build_engine(tables, seed);
                    println!("Seed set to {}", seed);
                }
                Err(_) => println!("Invalid seed: {}", n),
            },
            ["bulk", n] => match n.parse::<usize>() {
                Ok(count) => bulk(&mut engine, count),
                Err(_) => println!("Invalid count: {}", n),
            },
            _ => println!("Unknown command. Type 'help' for commands."),
        }
    }
}

fn bulk(engine: &mut CardEngine, count: usize) {
    let cards = engine.generate_batch(count);
    let mut shapes: FxHashMap<String, usize> = FxHashMap::default();
    let mut names = FxHashSet::default();
    for card in &cards {
        *shapes.entry(card.heading()).or_default() += 1;
        names.insert(card.name.as_str());
    }

    let mut shapes: Vec<_> = shapes.into_iter().collect();
    shapes.sort();
    println!("\n=== Bulk Generation: {} cards ===\n", cards.len());
    for (heading, n) in shapes {
        println!("  {:<16} {:>6}", heading, n);
    }
    let items = cards.iter().filter(|c| c.kind == Kind::Item).count();
    println!("  items: {}, skills: {}", items, cards.len() - items);
    println!("  distinct names: {}\n", names.len());
}

fn print_usage() {
    println!("Usage: preview [--tables <path>] [--seed <n>] [--count <n>] [--debug] [--shell]");
}

fn print_commands() {
    println!("  next          generate one card");
    println!("  bulk <n>      generate n cards with shape stats");
    println!("  seed <n>      rebuild the engine with a new seed");
    println!("  help          list commands");
    println!("  quit          exit");
}
