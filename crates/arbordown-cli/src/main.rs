use anyhow::Result;
use arbordown_config::Config;
use arbordown_engine::{Options, Tree, parse_document, render_commonmark, render_html};
use std::io::Read;
use std::{env, fs, process};
use tracing_subscriber::EnvFilter;

fn usage(program: &str) {
    eprintln!(
        "Usage: {program} [--smart] [--hardbreaks] [--nobreaks] [--safe] [--commonmark] [--verbose] <file.md | ->"
    );
    eprintln!("Reads markdown and writes HTML (or commonmark) to stdout.");
    eprintln!(
        "Option flags default from {} when none are given.",
        Config::config_path().display()
    );
}

fn config_options(config: &Config) -> Options {
    let mut options = Options::DEFAULT;
    if config.smart {
        options |= Options::SMART;
    }
    if config.hardbreaks {
        options |= Options::HARDBREAKS;
    }
    if config.nobreaks {
        options |= Options::NOBREAKS;
    }
    if config.safe {
        options |= Options::SAFE;
    }
    options
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut options = Options::DEFAULT;
    let mut any_option_flag = false;
    let mut commonmark = false;
    let mut verbose = false;
    let mut input: Option<String> = None;

    for arg in &args[1..] {
        match arg.as_str() {
            "--smart" => {
                options |= Options::SMART;
                any_option_flag = true;
            }
            "--hardbreaks" => {
                options |= Options::HARDBREAKS;
                any_option_flag = true;
            }
            "--nobreaks" => {
                options |= Options::NOBREAKS;
                any_option_flag = true;
            }
            "--safe" => {
                options |= Options::SAFE;
                any_option_flag = true;
            }
            "--commonmark" => commonmark = true,
            "--verbose" => verbose = true,
            "--help" | "-h" => {
                usage(&args[0]);
                return Ok(());
            }
            other if other.starts_with('-') && other != "-" => {
                eprintln!("Error: unknown flag '{other}'");
                usage(&args[0]);
                process::exit(1);
            }
            other => {
                if input.is_some() {
                    eprintln!("Error: more than one input given");
                    usage(&args[0]);
                    process::exit(1);
                }
                input = Some(other.to_string());
            }
        }
    }

    // Initialize logging
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // No explicit option flags - fall back to the config file
    if !any_option_flag {
        match Config::load() {
            Ok(Some(config)) => options = config_options(&config),
            Ok(None) => {}
            Err(e) => {
                eprintln!("Warning: ignoring config file: {e}");
            }
        }
    }

    let Some(input) = input else {
        usage(&args[0]);
        process::exit(1);
    };

    let text = if input == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        match fs::read_to_string(&input) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("Error: cannot read '{input}': {e}");
                process::exit(1);
            }
        }
    };

    let mut tree = Tree::new();
    let root = parse_document(&mut tree, &text, options)?;
    let output = if commonmark {
        render_commonmark(&tree, root, options)?
    } else {
        render_html(&tree, root, options)?
    };
    print!("{output}");

    Ok(())
}
