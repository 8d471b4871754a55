use std::io;

use framecov_rs::cli;

fn main() -> io::Result<()> {
    let config = cli::parse_args();
    cli::run(&config)
}
