// SPDX-License-Identifier: MIT

//! The `cli` module defines the [`clap`] command line interface.

use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, Command};
use clap_complete::Shell;

pub const APP_NAME: &str = "gitignorer";

const DEFAULT_CONFIG_PATH: &str = "gitignorer/config.toml";

pub const COMPLETIONS_SUBCMD: &str = "completions";
pub const LIST_SUBCMD: &str = "list";
pub const UPDATE_SUBCMD: &str = "update";
pub const CREATE_SUBCMD: &str = "create";
pub const CREATE_TEMPLATE_SUBCMD: &str = "create-template";
pub const USE_TEMPLATE_SUBCMD: &str = "use-template";

lazy_static! {
    static ref CFG_FILE_PATH_BUF: PathBuf = {
        let mut default_config_file_path = dirs_next::config_dir().unwrap_or_default();
        default_config_file_path.push(DEFAULT_CONFIG_PATH);
        default_config_file_path
    };
    static ref CFG_FILE: &'static str = CFG_FILE_PATH_BUF.to_str().unwrap_or(DEFAULT_CONFIG_PATH);
}

/// Rejects empty or whitespace-only name lists; the list itself is kept verbatim.
fn non_blank(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        Err("expected a comma-separated list of names".to_owned())
    } else {
        Ok(value.to_owned())
    }
}

fn names_arg() -> Arg {
    Arg::new("names")
        .help("Case sensitive, comma-separated list of languages/globals, e.g. Python,Java,Emacs")
        .value_name("NAMES")
        .required(true)
        .value_parser(non_blank)
}

fn output_arg() -> Arg {
    Arg::new("output")
        .help("Specify output FILE [default: from config, .gitignore]")
        .short('o')
        .long("output")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
}

fn template_arg(help: &'static str) -> Arg {
    Arg::new("template")
        .help(help)
        .value_name("TEMPLATE")
        .required(true)
        .value_parser(non_blank)
}

/// Builds a [`clap::Command`].
pub fn build_cli() -> Command {
    Command::new(APP_NAME)
        .arg_required_else_help(true)
        .version(crate_version!())
        .about("Assembles .gitignore files from cached gitignore templates")
        .arg(
            Arg::new("config")
                .help("Load configuration from FILE")
                .short('c')
                .long("config")
                .value_name("FILE")
                .default_value(*CFG_FILE)
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("data_dir")
                .help("Override the directory holding the downloaded gitignores & templates")
                .short('d')
                .long("data-dir")
                .value_name("DIR")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("verbosity")
                .help("Set the level of verbosity: -v or -vv")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new(UPDATE_SUBCMD)
                .about("Download the gitignore templates archive & extract it locally"),
        )
        .subcommand(
            Command::new(LIST_SUBCMD)
                .about("List the available languages, globals & stored templates"),
        )
        .subcommand(
            Command::new(CREATE_SUBCMD)
                .arg_required_else_help(true)
                .about("Create a gitignore file from a list of languages/globals")
                .arg(names_arg())
                .arg(output_arg()),
        )
        .subcommand(
            Command::new(CREATE_TEMPLATE_SUBCMD)
                .arg_required_else_help(true)
                .about("Store a list of languages/globals as a reusable template")
                .arg(names_arg())
                .arg(template_arg("Name to store the template under")),
        )
        .subcommand(
            Command::new(USE_TEMPLATE_SUBCMD)
                .arg_required_else_help(true)
                .about("Create a gitignore file from a stored template")
                .arg(template_arg("Name of the stored template"))
                .arg(output_arg()),
        )
        .subcommand(
            Command::new(COMPLETIONS_SUBCMD)
                .arg_required_else_help(true)
                .about("Generate tab completion scripts")
                .arg(
                    Arg::new("shell")
                        .help("Specify shell to generate completion script for")
                        .value_name("SHELL")
                        .required(true)
                        .value_parser(value_parser!(Shell)),
                ),
        )
}
