// SPDX-License-Identifier: MIT

//! The `runtime` module defines elements necessary for the configuration of [`RuntimeConfig`]
//! (contains the runtime options).

use crate::config::cli::{build_cli, APP_NAME};

use super::{configs::Config, state::State};

use std::error::Error as StdErr;
use std::ffi::OsString;
use std::path::PathBuf;

use clap::ArgMatches;
use clap_complete::Shell;

/// `struct` containing runtime options gathered from the config file and command arguments.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    /// Config read from file.
    pub config: Config,

    /// State of the cached templates as read from file.
    pub state: State,

    /// Exclusive operation specified by user.
    pub operation: Operation,
}

/// `enum` containing exclusive operations that can be performed.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Operation {
    /// Download & extract the template archive.
    UpdateTemplates,
    /// List fragments & stored templates.
    ListAvailableTemplates,
    /// Assemble a gitignore file.
    CreateGitignore {
        /// Comma-separated fragment names, verbatim.
        names: String,
        /// Destination overriding the configured one.
        output: Option<PathBuf>,
    },
    /// Assemble & store a template.
    CreateTemplate { names: String, template: String },
    /// Copy a stored template to a gitignore file.
    UseTemplate {
        template: String,
        output: Option<PathBuf>,
    },
    /// Generate shell completion scripts.
    GenerateCompletions(Shell),
    /// Option for unknown operations.
    #[default]
    Else,
}

/// Method implementations for [`RuntimeConfig`].
impl RuntimeConfig {
    /// Load options from the process arguments, config file & state file.
    pub fn load() -> Result<RuntimeConfig, Box<dyn StdErr>> {
        Self::load_from(std::env::args_os())
    }

    /// Load options from `args`, the config file & state file.
    pub fn load_from<I, T>(args: I) -> Result<RuntimeConfig, Box<dyn StdErr>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        use super::logger::setup_logger;

        let matches = build_cli().get_matches_from(args);
        setup_logger(matches.get_count("verbosity"))?;
        debug!("parsed command flags");

        let mut runtime_config = Self::from_matches(&matches)?;
        runtime_config.state = State::load(&runtime_config.config.paths.data_dir)?;

        debug!(
            "loaded command arguments & config file, options: {:#?}",
            runtime_config
        );

        Ok(runtime_config)
    }

    /// Builds a [`RuntimeConfig`] (without state) from parsed arguments.
    fn from_matches(matches: &ArgMatches) -> Result<RuntimeConfig, Box<dyn StdErr>> {
        let mut config = Config::default();

        if let Some(config_path) = matches.get_one::<PathBuf>("config") {
            config = config.load(config_path).unwrap_or_else(|err| {
                error!("config load error, using the default: {}", err);
                Config::default()
            });
        }
        if let Some(data_dir) = matches.get_one::<PathBuf>("data_dir") {
            config.paths.data_dir = data_dir.to_owned();
        }

        Ok(RuntimeConfig {
            config,
            state: State::default(),
            operation: configure_operation(matches),
        })
    }

    /// Generates completions for shells defined in [`clap_complete::Shell`].
    pub fn generate_completions(&self, shell: Shell) -> Result<(), Box<dyn StdErr>> {
        use clap_complete::generate;
        use std::io;

        generate(shell, &mut build_cli(), APP_NAME, &mut io::stdout());

        Ok(())
    }
}

/// Maps the subcommand selected by the user to an [`Operation`].
///
/// This function checks for the presence of [`clap::Command`]s & [`clap::Arg`]s as provided in
/// the [`clap::ArgMatches`] struct.
fn configure_operation(matches: &ArgMatches) -> Operation {
    use crate::config::cli::{
        COMPLETIONS_SUBCMD, CREATE_SUBCMD, CREATE_TEMPLATE_SUBCMD, LIST_SUBCMD, UPDATE_SUBCMD,
        USE_TEMPLATE_SUBCMD,
    };

    let string_arg = |sub_matches: &ArgMatches, id: &str| {
        sub_matches
            .get_one::<String>(id)
            .cloned()
            .unwrap_or_default()
    };

    match matches.subcommand() {
        Some((UPDATE_SUBCMD, _)) => Operation::UpdateTemplates,
        Some((LIST_SUBCMD, _)) => Operation::ListAvailableTemplates,
        Some((CREATE_SUBCMD, sub_matches)) => Operation::CreateGitignore {
            names: string_arg(sub_matches, "names"),
            output: sub_matches.get_one::<PathBuf>("output").cloned(),
        },
        Some((CREATE_TEMPLATE_SUBCMD, sub_matches)) => Operation::CreateTemplate {
            names: string_arg(sub_matches, "names"),
            template: string_arg(sub_matches, "template"),
        },
        Some((USE_TEMPLATE_SUBCMD, sub_matches)) => Operation::UseTemplate {
            template: string_arg(sub_matches, "template"),
            output: sub_matches.get_one::<PathBuf>("output").cloned(),
        },
        Some((COMPLETIONS_SUBCMD, sub_matches)) => Operation::GenerateCompletions(
            sub_matches
                .get_one::<Shell>("shell")
                .copied()
                .unwrap_or(Shell::Zsh),
        ),
        _ => Operation::Else,
    }
}
