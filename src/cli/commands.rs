//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;

/// Load settings for the current directory and run the parsed command.
pub fn execute(cli: &Cli) -> CliResult<()> {
    if let Commands::Completion { shell } = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let cwd = std::env::current_dir()
        .map_err(|e| InfraError::io("resolve current directory", e))?;
    let mut settings = Settings::load(Some(&cwd))?;
    if let Some(dir) = &cli.data_dir {
        settings.data_dir = dir.clone();
    }
    debug!("settings: {:?}", settings);

    execute_with(cli, &ServiceContainer::new(settings))
}

/// Run the parsed command against an already wired container.
pub fn execute_with(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    match &cli.command {
        Commands::Show { file, plain } => show(container, file.as_deref(), *plain),
        Commands::Mrca {
            first,
            second,
            file,
        } => mrca(container, file.as_deref(), first, second),
        Commands::Ancestors { name, file } => ancestors(container, file.as_deref(), name),
        Commands::List { dir } => list(container, dir.as_deref()),
        Commands::Config { command } => config(container, command),
        Commands::Completion { .. } => Ok(()),
    }
}

/// The given tree file, or one picked interactively from the data directory.
#[instrument(level = "debug", skip(container))]
pub fn resolve_tree_file(container: &ServiceContainer, file: Option<&Path>) -> CliResult<PathBuf> {
    if let Some(file) = file {
        return Ok(file.to_path_buf());
    }

    let settings = &container.settings;
    let dir = container.family.resolve_data_dir(&settings.data_dir);
    let items = container
        .family
        .selection_items(&dir, &settings.extensions)?;

    let selected = container
        .selector
        .select_one(&items, "Tree file> ")
        .map_err(|message| InfraError::Selector { message })?;

    match selected {
        Some(item) => Ok(PathBuf::from(item.value)),
        None => Err(CliError::Cancelled),
    }
}

fn show(container: &ServiceContainer, file: Option<&Path>, plain: bool) -> CliResult<()> {
    let path = resolve_tree_file(container, file)?;
    let tree = container.family.load(&path)?;

    if plain {
        output::info(&tree);
    } else {
        output::header(&format!("Family Tree: {}", path.display()));
        output::info(&tree.arena().to_tree_string());
    }
    Ok(())
}

fn mrca(
    container: &ServiceContainer,
    file: Option<&Path>,
    first: &str,
    second: &str,
) -> CliResult<()> {
    let path = resolve_tree_file(container, file)?;
    let answer = container
        .family
        .most_recent_common_ancestor(&path, first, second)?;

    output::info(&format!(
        "Most recent common ancestor of {} and {} is {}",
        answer.first, answer.second, answer.ancestor
    ));
    Ok(())
}

fn ancestors(container: &ServiceContainer, file: Option<&Path>, name: &str) -> CliResult<()> {
    let path = resolve_tree_file(container, file)?;
    let chain = container.family.ancestors(&path, name)?;

    if chain.is_empty() {
        output::warning(&format!("{name} is the root and has no ancestors"));
        return Ok(());
    }
    output::header(&format!("Ancestors of {name}"));
    for ancestor in chain {
        output::detail(&ancestor);
    }
    Ok(())
}

fn list(container: &ServiceContainer, dir: Option<&Path>) -> CliResult<()> {
    let settings = &container.settings;
    let dir = match dir {
        Some(dir) => dir.to_path_buf(),
        None => container.family.resolve_data_dir(&settings.data_dir),
    };

    let files = container
        .family
        .list_tree_files(&dir, &settings.extensions)?;
    if files.is_empty() {
        output::warning(&format!("no tree files in {}", dir.display()));
    }
    for file in files {
        output::info(&file.display());
    }
    Ok(())
}

fn config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&container.settings.to_toml()?),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::warning("no global config directory on this platform"),
            }
            let cwd = std::env::current_dir()
                .map_err(|e| InfraError::io("resolve current directory", e))?;
            output::action("local", &local_config_path(&cwd).display());
        }
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}
