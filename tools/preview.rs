//! Preview: interactive shell for trying out a persona vocabulary.
//!
//! Usage: preview --vocab <path> [--seed <n>]
//!
//! Commands:
//!   say <concept> [k=v ...]   : articulate a concept with parameters
//!   bulk <n> <concept> [k=v]  : articulate n times with variety stats
//!   seed <n>                  : reseed the persona
//!   concepts                  : list known concepts
//!   reset                     : forget cycle history
//!   help                      : list commands
//!   quit                      : exit

use persona_engine::core::persona::Persona;
use persona_engine::schema::params::Params;
use std::collections::{HashMap, HashSet};
use std::io::{self, BufRead, Write};
use std::path::Path;

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let mut vocab_path = None;
    let mut seed: u64 = 42;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--vocab" if i + 1 < args.len() => {
                i += 1;
                vocab_path = Some(args[i].clone());
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = args[i].parse().unwrap_or(42);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let Some(vocab_path) = vocab_path else {
        eprintln!("Missing --vocab <path>");
        print_usage();
        std::process::exit(1);
    };

    let mut persona = match build_persona(&vocab_path, seed) {
        Ok(persona) => persona,
        Err(e) => {
            eprintln!("ERROR loading vocabulary {}: {}", vocab_path, e);
            std::process::exit(1);
        }
    };

    println!("Loaded {} concepts", persona.vocabulary().len());
    println!("Seed: {}", seed);
    println!("Type 'help' for commands.\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("preview> ");
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let cmd = parts[0].to_lowercase();

        match cmd.as_str() {
            "quit" | "exit" | "q" => {
                println!("Goodbye.");
                break;
            }
            "help" | "h" | "?" => {
                print_help();
            }
            "concepts" => {
                for concept in persona.vocabulary().concepts() {
                    println!("  {}", concept);
                }
            }
            "reset" => {
                persona.reset_cycles();
                println!("Cycle history cleared.");
            }
            "say" => {
                if parts.len() < 2 {
                    println!("Usage: say <concept> [key=value ...]");
                    continue;
                }
                let params = match parse_params(&parts[2..]) {
                    Some(params) => params,
                    None => continue,
                };
                let text = persona.articulate_with(parts[1], params);
                println!("{}", text);
            }
            "seed" => {
                if parts.len() < 2 {
                    println!("Usage: seed <n>");
                    continue;
                }
                match parts[1].parse::<u64>() {
                    Ok(s) => {
                        persona.reseed(s);
                        println!("Seed set to {}", s);
                    }
                    Err(_) => {
                        println!("Invalid seed: {}", parts[1]);
                    }
                }
            }
            "bulk" => {
                if parts.len() < 3 {
                    println!("Usage: bulk <n> <concept> [key=value ...]");
                    continue;
                }
                let count: usize = match parts[1].parse() {
                    Ok(n) if n > 0 => n,
                    _ => {
                        println!("Invalid count: {}", parts[1]);
                        continue;
                    }
                };
                let params = match parse_params(&parts[3..]) {
                    Some(params) => params,
                    None => continue,
                };

                let outputs = persona.articulate_variants(parts[2], &params, count);
                print_bulk_stats(&outputs);
            }
            _ => {
                println!("Unknown command: '{}'. Type 'help' for available commands.", cmd);
            }
        }
    }
}

fn build_persona(vocab_path: &str, seed: u64) -> Result<Persona, persona_engine::core::persona::PersonaError> {
    let builder = Persona::builder().name("preview").seed(seed);
    let path = Path::new(vocab_path);
    if path.is_dir() {
        builder.vocabulary_dir(path).build()
    } else {
        builder.vocabulary_file(path).build()
    }
}

fn parse_params(assignments: &[&str]) -> Option<Params> {
    let mut params = Params::new();
    for assignment in assignments {
        match Params::parse_assignment(assignment) {
            Ok((key, value)) => params.insert(key, value),
            Err(e) => {
                println!("ERROR: {}", e);
                return None;
            }
        }
    }
    Some(params)
}

fn print_bulk_stats(outputs: &[String]) {
    println!("\n=== Bulk Generation: {} articulations ===\n", outputs.len());

    let unique: HashSet<&String> = outputs.iter().collect();
    println!("Unique outputs: {} / {}", unique.len(), outputs.len());

    let empty = outputs.iter().filter(|o| o.is_empty()).count();
    println!("Empty outputs: {}", empty);

    let avg_len: f64 = if outputs.is_empty() {
        0.0
    } else {
        outputs.iter().map(|o| o.len() as f64).sum::<f64>() / outputs.len() as f64
    };
    println!("Average length: {:.0} chars", avg_len);

    // Most frequent outputs (top 5)
    let mut counts: HashMap<&String, u32> = HashMap::new();
    for output in outputs {
        *counts.entry(output).or_insert(0) += 1;
    }
    let mut freq: Vec<(&String, u32)> = counts.into_iter().collect();
    freq.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    println!("\nTop 5 outputs:");
    for (output, count) in freq.iter().take(5) {
        println!("  {:>4}  {:?}", count, output);
    }
    println!();
}

fn print_usage() {
    println!("Preview: interactive shell for trying out a persona vocabulary.");
    println!();
    println!("Usage: preview --vocab <path> [--seed <n>]");
    println!();
    println!("  --vocab <path>  Path to a RON vocabulary file or directory");
    println!("  --seed <n>      Initial RNG seed (default: 42)");
}

fn print_help() {
    println!("Commands:");
    println!("  say <concept> [k=v ...]     Articulate a concept with parameters");
    println!("  bulk <n> <concept> [k=v]    Articulate n times with variety statistics");
    println!("  seed <n>                    Reseed the persona");
    println!("  concepts                    List known concepts");
    println!("  reset                       Forget cycle history");
    println!("  help                        Show this help");
    println!("  quit                        Exit");
    println!();
    println!("Parameter values: true/false, numbers, anything else is text.");
}
