use blastramp::{Config, ConfigBuilder, Library, forward_library};
use std::{env, process::exit};
use tracing_subscriber::EnvFilter;

struct Opts {
    /// Configuration after environment and flag overrides.
    config: Config,

    /// List routines the library does not export.
    show_missing: bool,

    /// The library to probe.
    library: String,
}

fn main() {
    setup_logging();

    let args: Vec<String> = env::args().collect();
    let Some(opts) = parse_opts(&args) else {
        eprintln!(
            "usage: blastramp [--deepbindless|--deepbind] [--no-f2c] [--cross-check] \
             [--no-clear] [--missing] <library>"
        );
        exit(1);
    };

    let library = match Library::open(&opts.library, !opts.config.deepbindless) {
        Ok(library) => library,
        Err(e) => {
            eprintln!("error: {}", e);
            exit(1);
        }
    };

    let info = match forward_library(&library, &opts.config) {
        Ok(info) => info,
        Err(e) => {
            eprintln!("error: {}: {}", library.path(), e);
            exit(1);
        }
    };

    println!("library:   {}", library.path());
    println!("suffix:    {:?}", info.suffix);
    println!("interface: {}", info.interface);
    match info.f2c {
        Some(convention) => println!("f2c:       {}", convention),
        None => println!("f2c:       n/a"),
    }
    println!(
        "bound:     {} of {}",
        info.report.bound,
        info.report.bound + info.report.missing.len()
    );
    if opts.show_missing {
        for name in &info.report.missing {
            println!("missing:   {}", name);
        }
    }
}

fn parse_opts(args: &[String]) -> Option<Opts> {
    let mut config = ConfigBuilder::from_env();
    let mut show_missing = false;
    let mut library = None;
    let mut i = 1; // Skip program name
    while i < args.len() {
        match args[i].as_str() {
            "--deepbindless" => config = config.deepbindless(true),
            "--deepbind" => config = config.deepbindless(false),
            "--no-f2c" => config = config.f2c_autodetect(false),
            "--cross-check" => config = config.cross_check(true),
            "--no-clear" => config = config.clear(false),
            "--missing" => show_missing = true,
            "--" => {
                library = args.get(i + 1).cloned();
                break;
            }
            arg if arg.starts_with("--") => {
                eprintln!("unknown option: {}", arg);
                return None;
            }
            arg => {
                library = Some(arg.to_string());
                break;
            }
        }
        i += 1;
    }
    Some(Opts {
        config: config.build(),
        show_missing,
        library: library?,
    })
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}
