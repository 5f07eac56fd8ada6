// SPDX-License-Identifier: MIT

//! The `app` module dispatches the operation selected by the user.

use crate::archive::{update_templates, HttpSource};
use crate::assembler::{assemble, persist, use_template};
use crate::config::configs::Config;
use crate::config::runtime::{Operation, RuntimeConfig};
use crate::errors::{Error, ErrorKind};
use crate::listing::{available, render};
use crate::resolver::{resolve, split_names};

use std::error::Error as StdErr;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Runs the operation held by `app_conf`.
pub fn run(mut app_conf: RuntimeConfig) -> Result<(), Box<dyn StdErr>> {
    match app_conf.operation.clone() {
        Operation::UpdateTemplates => update(&mut app_conf)?,
        Operation::ListAvailableTemplates => {
            print!("{}", render(&available(&app_conf.config.paths)?));
        }
        Operation::CreateGitignore { names, output } => {
            warn_if_stale(&app_conf);

            let output = output.unwrap_or_else(|| app_conf.config.output.gitignore_file.clone());
            create_gitignore(&app_conf.config, &names, &output)?;
            info!("Saved as: {}", output.display());
        }
        Operation::CreateTemplate { names, template } => {
            warn_if_stale(&app_conf);

            let path = create_template(&app_conf.config, &names, &template)?;
            info!("Template {} saved as: {}", template, path.display());
        }
        Operation::UseTemplate { template, output } => {
            let output = output.unwrap_or_else(|| app_conf.config.output.gitignore_file.clone());
            use_stored_template(&app_conf.config, &template, &output)?;
            info!("Saved as: {}", output.display());
        }
        Operation::GenerateCompletions(shell) => app_conf.generate_completions(shell)?,
        Operation::Else => return Err(Box::new(Error::from("no operation selected".to_owned()))),
    }

    Ok(())
}

/// Downloads & extracts the configured archive, then records the update time.
fn update(app_conf: &mut RuntimeConfig) -> Result<(), Box<dyn StdErr>> {
    info!("Updating gitignore files");

    let source = HttpSource::new(app_conf.config.archive.url.as_str());
    let gitignores_dir = update_templates(&source, &app_conf.config.paths.data_dir)?;
    debug!("gitignores extracted to: {}", gitignores_dir.display());

    app_conf.state.last_update = Some(SystemTime::now());
    app_conf.state.save_file()?;

    info!("Updating done!");

    Ok(())
}

/// Resolves & assembles `names`, failing when none of them exist.
fn assemble_names(config: &Config, names: &str) -> Result<Vec<u8>, Error> {
    let paths = &config.paths;
    if !paths.gitignores_dir().is_dir() {
        return Err(Error::from(ErrorKind::MissingCache));
    }

    let resolved = resolve(&split_names(names), &paths.gitignores_dir(), &paths.global_dir());
    if resolved.iter().all(|entry| entry.path().is_none()) {
        return Err(Error::from(ErrorKind::MissingTemplates).context(names.to_owned()));
    }

    assemble(&resolved)
}

/// Writes the assembled `names` to `output`.
pub fn create_gitignore(config: &Config, names: &str, output: &Path) -> Result<(), Error> {
    let data = assemble_names(config, names)?;

    persist(&data, output, config.output.gitignore_mode)
}

/// Stores the assembled `names` as the template `template`, returning its path.
pub fn create_template(config: &Config, names: &str, template: &str) -> Result<PathBuf, Error> {
    let path = config.paths.template_file(template)?;
    let data = assemble_names(config, names)?;

    persist(&data, &path, config.output.template_mode)?;

    Ok(path)
}

/// Copies the stored template `template` to `output`.
pub fn use_stored_template(config: &Config, template: &str, output: &Path) -> Result<(), Error> {
    let path = config.paths.template_file(template)?;

    use_template(&path, output, config.output.gitignore_mode)
}

fn warn_if_stale(app_conf: &RuntimeConfig) {
    let stale_after_days = app_conf.config.archive.stale_after_days;

    if app_conf.state.is_stale(&SystemTime::now(), stale_after_days) {
        warn!(
            "gitignore files weren't updated in the last {} days, consider running update",
            stale_after_days
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::configs::PathsConfig;
    use std::fs;
    use tempfile::TempDir;

    fn config_with_fragments() -> (TempDir, Config) {
        let root = TempDir::new().unwrap();
        let mut config = Config::default();
        config.paths = PathsConfig {
            data_dir: root.path().join("data"),
        };
        fs::create_dir_all(config.paths.global_dir()).unwrap();
        fs::write(
            config.paths.gitignores_dir().join("Java.gitignore"),
            "*.class\n",
        )
        .unwrap();
        fs::write(config.paths.global_dir().join("Emacs.gitignore"), "*~\n").unwrap();

        (root, config)
    }

    #[test]
    fn template_round_trip() {
        let (root, config) = config_with_fragments();
        let direct = root.path().join("direct.gitignore");
        let from_template = root.path().join("from_template.gitignore");

        create_gitignore(&config, "Java,Emacs", &direct).unwrap();
        let template = create_template(&config, "Java,Emacs", "JavaEmacs").unwrap();
        use_template(&template, &from_template, 0o644).unwrap();

        assert_eq!(
            template,
            config.paths.data_dir.join("Templates/JavaEmacs.Template.gitignore")
        );
        assert_eq!(fs::read(&direct).unwrap(), fs::read(&from_template).unwrap());
    }

    #[test]
    fn nothing_found_writes_nothing() {
        let (root, config) = config_with_fragments();
        let output = root.path().join(".gitignore");

        let err = create_gitignore(&config, "Foo,Bar", &output).unwrap_err();

        assert_eq!(err.kind(), &ErrorKind::MissingTemplates);
        assert!(!output.exists());
    }

    #[test]
    fn template_names_stay_in_templates_dir() {
        let (root, config) = config_with_fragments();

        for name in ["../../escaped", "..", ".", "a/b", "a\\b", ""] {
            let err = create_template(&config, "Java", name).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidTemplateName, "{:?}", name);
        }

        assert!(!root.path().join("escaped.Template.gitignore").exists());
        assert!(!config.paths.templates_dir().exists());
    }

    #[test]
    fn use_template_rejects_escaping_names() {
        let (root, config) = config_with_fragments();
        fs::write(root.path().join("escaped.Template.gitignore"), "outside").unwrap();
        let output = root.path().join(".gitignore");

        let err = use_stored_template(&config, "../../escaped", &output).unwrap_err();

        assert_eq!(err.kind(), &ErrorKind::InvalidTemplateName);
        assert!(!output.exists());
    }

    #[test]
    fn missing_cache_is_reported() {
        let root = TempDir::new().unwrap();
        let mut config = Config::default();
        config.paths = PathsConfig {
            data_dir: root.path().join("empty"),
        };

        let err = create_gitignore(&config, "Java", &root.path().join("out")).unwrap_err();

        assert_eq!(err.kind(), &ErrorKind::MissingCache);
    }
}
