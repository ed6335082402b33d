mod cli;
mod session;

use std::path::Path;
use std::{fs, io};

use clap::{CommandFactory, Parser};
use color_eyre::Section;
use color_eyre::eyre::Report;
use renoform_document::default_template;
use renoform_form::{ConfigForm, FormError};
use renoform_resolver::persist::{PersistError, PersistedEntity};
use renoform_resolver::settings::Settings;
use renoform_resolver::{ResolveError, Resolver};
use tracing::instrument;

use crate::cli::{Options, SettingsAction, Subcommand};
use crate::session::{Session, write_export};

fn main() -> Result<(), Report> {
    let options = Options::parse();
    color_eyre::install()?;
    install_tracing()?;

    let status = run_with_options(options);
    if let Err(mut report) = status {
        if let Some(error) = report.downcast_ref::<ResolveError>() {
            match error {
                ResolveError::EmptyInput => {
                    report = report.with_suggestion(|| {
                        "Pass a link to a config file, or to the GitHub repository it lives in."
                    });
                }
                ResolveError::Transport { .. } => {
                    report = report
                        .with_suggestion(|| "Check the link and your network connection.");
                }
                ResolveError::Parse { .. } => {
                    report = report.with_note(|| {
                        "Comments and trailing commas are fine, but the file has to hold a single object."
                    });
                }
                ResolveError::NotFound { .. } => {
                    report = report
                        .with_note(|| "Only the branches and paths from the settings are searched.")
                        .with_suggestion(|| {
                            format!(
                                "Link to the config file directly, or add its location to `config_paths` in {}.",
                                Settings::FILE_PATH
                            )
                        });
                }
            }
        }

        if let Some(error) = report.downcast_ref::<PersistError>() {
            match error {
                PersistError::Io { .. } => {
                    report = report
                        .with_note(|| "Renoform encountered an I/O error.")
                        .with_suggestion(|| {
                            "Ensure you're in the right directory and have enough permissions."
                        });
                }
                PersistError::SerdeYml(_) => {
                    report = report
                        .with_note(|| format!("{} is not valid YAML.", Settings::FILE_PATH))
                        .with_suggestion(|| {
                            "Fix it by hand, or replace it with `renoform settings init --overwrite`."
                        });
                }
            }
        }

        if report.downcast_ref::<FormError>().is_some() {
            report = report.with_suggestion(|| {
                format!("Consider reporting this at {}", env!("CARGO_PKG_HOMEPAGE"))
            });
        }

        return Err(report);
    }

    Ok(())
}

#[instrument(name = "action_handling")]
fn run_with_options(options: Options) -> Result<(), Report> {
    match options.subcommand {
        Subcommand::Resolve { input, output } => {
            let settings = Settings::read_from_or_default(".")?;
            let document = Resolver::from_settings(&settings).resolve(&input)?;
            let json = ConfigForm::new(&document).export_json();
            match output {
                Some(path) => write_export(&path, &json),
                None => {
                    print!("{json}");
                    Ok(())
                }
            }
        }

        Subcommand::Edit { input, output } => {
            let settings = Settings::read_from_or_default(".")?;
            let resolver = Resolver::from_settings(&settings);
            let document = match input {
                Some(input) => resolver.resolve(&input)?,
                None => default_template(),
            };
            let output = output.unwrap_or(settings.export_file);
            Session::new(resolver, &document, output).run()
        }

        Subcommand::Template => {
            print!("{}", ConfigForm::new(&default_template()).export_json());
            Ok(())
        }

        Subcommand::Settings { action } => match action {
            SettingsAction::Show => {
                let settings = Settings::read_from_or_default(".")?;
                print!("{}", serde_yml::to_string(&settings)?);
                Ok(())
            }
            SettingsAction::Init { overwrite } => init_settings(overwrite),
        },

        Subcommand::Completions { shell } => {
            let mut command = Options::command();
            let bin_name = env!("CARGO_CRATE_NAME");
            let mut stdout = io::stdout();
            clap_complete::generate(shell, &mut command, bin_name, &mut stdout);
            Ok(())
        }
    }
}

#[instrument]
fn init_settings(overwrite: bool) -> Result<(), Report> {
    let path = Path::new(Settings::FILE_PATH);
    if !overwrite && fs::exists(path)? {
        return Err(eyre::eyre!("{} already exists", path.display()))
            .with_suggestion(|| "Pass --overwrite to replace it with the defaults.");
    }
    let path = Settings::default().write_to(".")?;
    tracing::info!(?path, "Wrote the default settings");
    Ok(())
}

fn install_tracing() -> Result<(), Report> {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, fmt};
    let format_layer = fmt::layer().pretty().without_time().with_writer(io::stderr);
    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(format_layer)
        .with(ErrorLayer::default())
        .try_init()?;
    Ok(())
}
