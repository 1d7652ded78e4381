use std::env;
use std::io;
use std::process;

use anyhow::{bail, Context, Result};

// Usage: echo <input_text> | patnfa -E <pattern>
fn main() -> Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    if args.next().as_deref() != Some("-E") {
        bail!("expected first argument to be '-E'");
    }
    let pattern = args.next().context("expected a pattern after '-E'")?;

    let mut input_line = String::new();
    io::stdin()
        .read_line(&mut input_line)
        .context("failed to read input line")?;
    let input = input_line.trim_end_matches('\n');

    let nfa = patnfa::compile(&pattern)?;
    if patnfa::search(&nfa, input)? {
        process::exit(0)
    } else {
        process::exit(1)
    }
}
