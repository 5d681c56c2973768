use std::io::{self, Write};
use std::process;

use json_stitch::cli::{parse_args, replay, CliError, USAGE};
use tracing_subscriber::EnvFilter;

fn main() {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{USAGE}");
            process::exit(1);
        }
    };
    if args.help {
        println!("{USAGE}");
        return;
    }

    let default_level = if args.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let stdin = io::stdin();
    let mut out = io::BufWriter::new(io::stdout().lock());
    let result = replay(stdin.lock(), &mut out, &args)
        .and_then(|_| out.flush().map_err(CliError::from));
    if let Err(e) = result {
        eprintln!("{e}");
        process::exit(1);
    }
}
