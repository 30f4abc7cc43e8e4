#![deny(missing_docs)]

//! # openapi-combine CLI
//!
//! Combines a directory of OpenAPI YAML fragments into one document:
//! every fragment is bundled (all `$ref`s inlined) and deep-merged, with
//! the main document merged last so its values win.

use clap::Parser;
use combine_core::{combine, CombineOptions};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::report::{status_line, Status};

mod report;

/// Combine a directory of OpenAPI YAML fragments into a single document.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Cli {
    /// Directory containing the OpenAPI YAML fragments.
    openapi_dir: PathBuf,

    /// Where to put the generated file.
    #[clap(short, long, default_value = "./combine.yaml")]
    output: PathBuf,

    /// Main file, last openapi file in the merge list
    /// (defaults to <OPENAPI_DIR>/main.yaml).
    #[clap(short, long)]
    main: Option<PathBuf>,

    /// Remove the top-level components section from the combined document.
    #[clap(long = "no-components")]
    no_components: bool,
}

impl Cli {
    fn into_options(self) -> CombineOptions {
        let main_file = self
            .main
            .unwrap_or_else(|| self.openapi_dir.join("main.yaml"));
        CombineOptions {
            openapi_dir: self.openapi_dir,
            main_file,
            output: self.output,
            keep_components: !self.no_components,
        }
    }
}

fn main() -> ExitCode {
    let options = Cli::parse().into_options();

    match combine(&options) {
        Ok(()) => {
            println!(
                "{}",
                status_line(
                    Status::Success,
                    &format!("Check out your shiny new API at {}.", options.output.display()),
                )
            );
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("{}", status_line(Status::Failure, &error.to_string()));
            ExitCode::FAILURE
        }
    }
}
