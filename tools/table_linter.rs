/// Table Linter — validates a content table file and flags weak spots.
///
/// Usage: table_linter [<tables.ron>]
///
/// Without a path the bundled tables are linted.

use card_forge::core::grammar::{Template, TemplateSegment};
use card_forge::core::highlight::KeywordMatcher;
use card_forge::core::pipeline::CardEngine;
use card_forge::schema::tables::ContentTables;
use rustc_hash::FxHashSet;
use std::process;
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Pools smaller than this make names repeat quickly.
const MIN_POOL_WORDS: usize = 3;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("Usage: table_linter [<tables.ron>]");
        process::exit(0);
    }

    let mut builder = CardEngine::builder();
    if let Some(path) = args.get(1) {
        builder = builder.tables_file(path);
    }
    let engine = match builder.build() {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };

    let tables = engine.tables();
    println!(
        "Loaded {} tags, {} effects, {} values, {} triggers, {} keywords",
        tables.tags.len(),
        tables.effects.len(),
        tables.values.len(),
        tables.triggers.len(),
        tables.keywords.len()
    );

    let (errors, warnings) = lint_tables(tables, engine.matcher());

    println!("\n=== Table Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        warn!("{}", warning);
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if !errors.is_empty() {
        process::exit(1);
    }
}

fn lint_tables(tables: &ContentTables, matcher: &KeywordMatcher) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    duplicate_ids("tags", tables.tags.iter().map(|t| t.id.as_str()), &mut errors);
    duplicate_ids("effects", tables.effects.iter().map(|e| e.id.as_str()), &mut errors);
    duplicate_ids("values", tables.values.iter().map(|v| v.id.as_str()), &mut errors);
    duplicate_ids("triggers", tables.triggers.iter().map(|t| t.id.as_str()), &mut errors);

    // Braces that survive parsing are never filled in.
    for effect in &tables.effects {
        stray_braces("effect", &effect.id, &effect.text, &mut warnings);
    }
    for trigger in &tables.triggers {
        for text in [
            &trigger.own,
            &trigger.opponent,
            &trigger.own_first_n,
            &trigger.opponent_first_n,
        ] {
            stray_braces("trigger", &trigger.id, text, &mut warnings);
        }
    }

    let effect_text: Vec<String> = tables
        .effects
        .iter()
        .map(|e| e.text.to_lowercase())
        .collect();
    for theme in &tables.naming.themes {
        if !effect_text.iter().any(|text| text.contains(theme.key.as_str())) {
            warnings.push(format!(
                "Theme '{}' never matches an effect; only passives can select it",
                theme.key
            ));
        }
    }

    let naming = &tables.naming;
    let mut pools: Vec<(String, &Vec<String>)> = vec![
        ("default_theme".to_string(), &naming.default_theme),
        ("speed.fast".to_string(), &naming.speed.fast),
        ("speed.balanced".to_string(), &naming.speed.balanced),
        ("speed.heavy".to_string(), &naming.speed.heavy),
        ("flavor_words".to_string(), &naming.flavor_words),
        ("frame_nouns".to_string(), &naming.frame_nouns),
        ("skill.speed".to_string(), &naming.skill.speed),
        ("skill.power".to_string(), &naming.skill.power),
        ("skill.quirky".to_string(), &naming.skill.quirky),
        ("skill.elemental".to_string(), &naming.skill.elemental),
        ("skill.actions".to_string(), &naming.skill.actions),
    ];
    for theme in &naming.themes {
        pools.push((format!("themes.{}", theme.key), &theme.words));
    }
    for (rarity, words) in &naming.rarity_prefixes {
        pools.push((format!("rarity_prefixes.{}", rarity.label()), words));
    }
    for (size, words) in &naming.size_nouns {
        pools.push((format!("size_nouns.{}", size.label()), words));
    }
    pools.sort_by(|a, b| a.0.cmp(&b.0));

    for (name, words) in &pools {
        if words.len() < MIN_POOL_WORDS {
            warnings.push(format!(
                "Pool '{}' has only {} words (minimum {} recommended)",
                name,
                words.len(),
                MIN_POOL_WORDS
            ));
        }
        for phrase in words.iter() {
            if let Some(word) = phrase.split_whitespace().find(|w| matcher.is_keyword(w)) {
                warnings.push(format!(
                    "Pool '{}' word '{}' contains keyword '{}'",
                    name, phrase, word
                ));
            }
        }
    }

    (errors, warnings)
}

fn duplicate_ids<'a>(
    table: &str,
    ids: impl Iterator<Item = &'a str>,
    errors: &mut Vec<String>,
) {
    let mut seen = FxHashSet::default();
    for id in ids {
        if !seen.insert(id) {
            errors.push(format!("Table '{}' has duplicate id '{}'", table, id));
        }
    }
}

fn stray_braces(table: &str, id: &str, text: &str, warnings: &mut Vec<String>) {
    let template = Template::parse(text);
    for segment in &template.segments {
        if let TemplateSegment::Literal(literal) = segment {
            if literal.contains('{') || literal.contains('}') {
                warnings.push(format!(
                    "{} '{}' has text that will not be filled: {:?}",
                    table, id, literal
                ));
            }
        }
    }
}
