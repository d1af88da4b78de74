//! expo-tools CLI - Create, build and diagnose Expo apps

mod logging;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use expo_core::commands::{BUILD_AND_DEPLOY, CREATE_NEW_APP, RUN_DOCTOR};
use expo_core::expo::{Artifact, BuildType, DeployTarget, Platform};
use expo_core::interaction::keys;
use expo_core::{
    CliclackPrompter, CommandOutcome, CommandRegistry, PresetAnswers, PresetPrompter, Prompter,
    Session, ShellExecutor, TerminalSink, ToolsConfig,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "expo-tools")]
#[command(about = "CLI for creating, building and diagnosing Expo apps")]
#[command(version)]
pub struct Args {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(ClapArgs, Debug)]
pub struct GlobalArgs {
    /// Project root commands run in (defaults to the current directory)
    #[arg(short, long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Configuration file (defaults to expo-tools.yaml in the workspace)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Auto-confirm all prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Never prompt; unanswered prompts cancel the command
    #[arg(long = "non-interactive", global = true)]
    pub non_interactive: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new Expo app from the template
    Create(CreateArgs),
    /// Build the project and optionally deploy a web build
    Build(BuildArgs),
    /// Run `expo doctor` in the project
    Doctor,
    /// List the available commands
    List,
}

#[derive(ClapArgs, Debug, Default)]
pub struct CreateArgs {
    /// Application name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Where to create the app
    #[arg(short, long, value_parser = ["new-folder", "current-folder"])]
    pub location: Option<String>,

    /// Install dependencies after scaffolding
    #[arg(long, conflicts_with = "skip_install")]
    pub install: bool,

    /// Do not install dependencies
    #[arg(long = "skip-install")]
    pub skip_install: bool,

    /// Replace an existing folder with the same name
    #[arg(long)]
    pub overwrite: bool,

    /// Open the project folder when done
    #[arg(long)]
    pub open: bool,

    /// Local directory to use for templates instead of fetching from remote (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,
}

#[derive(ClapArgs, Debug)]
pub struct BuildArgs {
    #[arg(short, long, value_enum)]
    pub platform: Option<Platform>,

    #[arg(short, long = "build-type", value_enum)]
    pub build_type: Option<BuildType>,

    /// iOS: archive | simulator, Android: apk | app-bundle
    #[arg(short, long, value_enum)]
    pub artifact: Option<Artifact>,

    /// Deploy a successful web build to this target
    #[arg(short, long, value_enum)]
    pub deploy: Option<DeployTarget>,
}

impl CreateArgs {
    fn presets(&self, presets: &mut PresetAnswers) {
        if let Some(name) = &self.name {
            presets.insert(keys::APP_NAME, name.as_str());
        }
        if let Some(location) = &self.location {
            presets.insert(keys::LOCATION, location.as_str());
        }
        if self.install {
            presets.insert(keys::INSTALL_DEPENDENCIES, "yes");
        }
        if self.skip_install {
            presets.insert(keys::INSTALL_DEPENDENCIES, "no");
        }
        if self.overwrite {
            presets.insert(keys::OVERWRITE, "yes");
        }
        if self.open {
            presets.insert(keys::OPEN_PROJECT, "yes");
        }
    }
}

impl BuildArgs {
    fn presets(&self, presets: &mut PresetAnswers) {
        if let Some(platform) = self.platform {
            presets.insert(keys::PLATFORM, platform.as_str());
        }
        if let Some(build_type) = self.build_type {
            presets.insert(keys::BUILD_TYPE, build_type.as_str());
        }
        if let Some(artifact) = self.artifact {
            presets.insert(keys::ARTIFACT, artifact.as_str());
        }
        if let Some(target) = self.deploy {
            presets.insert(keys::DEPLOY, "yes");
            presets.insert(keys::DEPLOY_TARGET, target.as_str());
        }
    }
}

fn restore_cursor() {
    let _ = console::Term::stderr().show_cursor();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully. Exits without unwinding, so pending
    // `EphemeralWorkspace` cleanup is skipped.
    ctrlc::set_handler(move || {
        restore_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    logging::init_logging(args.global.verbose, args.global.quiet)?;

    let registry = CommandRegistry::<ShellExecutor>::with_builtin_commands();
    let command = args
        .command
        .unwrap_or_else(|| Command::Create(CreateArgs::default()));

    let mut presets = PresetAnswers::new().assume_yes(args.global.yes);
    let mut template_dir = None;
    let id = match &command {
        Command::Create(create) => {
            create.presets(&mut presets);
            template_dir = create.template_dir.clone();
            CREATE_NEW_APP
        }
        Command::Build(build) => {
            build.presets(&mut presets);
            BUILD_AND_DEPLOY
        }
        Command::Doctor => RUN_DOCTOR,
        Command::List => {
            for command in registry.commands() {
                println!("{:<28} {}", command.id, command.title);
            }
            return Ok(ExitCode::SUCCESS);
        }
    };

    let workspace = match args.global.workspace {
        Some(dir) => std::path::absolute(&dir)
            .with_context(|| format!("Failed to resolve workspace {}", dir.display()))?,
        None => std::env::current_dir().context("Failed to read the current directory")?,
    };

    let mut config = ToolsConfig::load(Some(&workspace), args.global.config.as_deref())?;
    if let Some(dir) = template_dir {
        config.use_local_templates(dir);
    }
    tracing::debug!(?config, workspace = %workspace.display(), "configuration loaded");

    let prompter: Box<dyn Prompter> = if args.global.non_interactive {
        Box::new(PresetPrompter::new(presets))
    } else {
        Box::new(CliclackPrompter::new(presets))
    };

    let mut session = Session::new(
        ShellExecutor::new(config.max_output_bytes),
        prompter,
        Box::new(TerminalSink::new()),
        config,
        Some(workspace),
    );

    let outcome = registry.dispatch(id, &mut session).await;

    // Ensure cursor is visible on normal exit
    restore_cursor();

    match outcome? {
        CommandOutcome::Failed => Ok(ExitCode::FAILURE),
        CommandOutcome::Completed | CommandOutcome::Cancelled => Ok(ExitCode::SUCCESS),
    }
}
