use std::{env, process};

use expense_core::{cli, init};

fn main() {
    init();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Error: failed to start runtime: {err}");
            process::exit(1);
        }
    };
    let code = runtime.block_on(cli::run_cli(env::args().skip(1)));
    process::exit(code);
}
