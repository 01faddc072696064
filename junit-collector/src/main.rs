// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use clap::Parser;
use color_eyre::Result;
use junit_collector::dispatch::CollectorApp;

fn main() -> Result<()> {
    color_eyre::install()?;

    let app = CollectorApp::parse();
    app.init_output();

    match app.exec() {
        Ok(()) => Ok(()),
        Err(error) => {
            error.display_to_stderr();
            std::process::exit(error.process_exit_code())
        }
    }
}
