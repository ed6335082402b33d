use std::io;
use std::path::PathBuf;

use clap::builder::Styles;
use clap::builder::styling::AnsiColor::{BrightBlue, White, Yellow};
use clap::{Parser, ValueEnum};
use clap_complete::Generator;
use clap_complete::shells::{Bash, Elvish, Fish, PowerShell, Zsh};
use clap_complete_nushell::Nushell;

/// Styling for [`clap`]'s CLI interface.
const STYLES: Styles = Styles::styled()
    .usage(Yellow.on_default().bold())
    .literal(BrightBlue.on_default().bold())
    .placeholder(White.on_default().bold())
    .header(Yellow.on_default().bold());

#[derive(Parser, Debug)]
#[command(version, author, about, styles(STYLES))]
pub struct Options {
    #[command(subcommand)]
    pub subcommand: Subcommand,
}

#[derive(clap::Subcommand, Debug)]
pub enum Subcommand {
    /// Find a configuration file and print it, minimized.
    #[command(arg_required_else_help = true)]
    Resolve {
        /// A link to the config file, to its page on GitHub, or to the
        /// repository it lives in.
        input: String,

        /// Write the result to this file instead of printing it.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Edit a configuration interactively.
    #[clap(visible_alias("open"))]
    Edit {
        /// Where to load the configuration from. Starts from a fresh template
        /// if not provided.
        input: Option<String>,

        /// Where to export the result. Defaults to the `export_file` setting.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the template new configurations start from.
    Template,

    /// Manage renoform's own settings in the current directory.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Generate shell completions for this tool.
    Completions {
        /// Which shell to generate completions for.
        #[arg(short, long, value_enum)]
        shell: Shell,
    },
}

#[derive(clap::Subcommand, Debug)]
pub enum SettingsAction {
    /// Show the settings in effect.
    Show,

    /// Write the default settings to a file in the current directory.
    Init {
        /// Replace an existing settings file.
        #[arg(short, long)]
        overwrite: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
#[expect(clippy::enum_variant_names, reason = "powershell for fuck's sake")]
pub enum Shell {
    Bash,
    Elvish,
    Fish,
    PowerShell,
    Zsh,
    Nushell,
}

impl Generator for Shell {
    fn file_name(&self, name: &str) -> String {
        match self {
            Self::Bash => Bash.file_name(name),
            Self::Elvish => Elvish.file_name(name),
            Self::Fish => Fish.file_name(name),
            Self::PowerShell => PowerShell.file_name(name),
            Self::Zsh => Zsh.file_name(name),
            Self::Nushell => Nushell.file_name(name),
        }
    }

    fn generate(&self, cmd: &clap::Command, buf: &mut dyn io::Write) {
        match self {
            Self::Bash => Bash.generate(cmd, buf),
            Self::Elvish => Elvish.generate(cmd, buf),
            Self::Fish => Fish.generate(cmd, buf),
            Self::PowerShell => PowerShell.generate(cmd, buf),
            Self::Zsh => Zsh.generate(cmd, buf),
            Self::Nushell => Nushell.generate(cmd, buf),
        }
    }
}
