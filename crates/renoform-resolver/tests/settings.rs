use std::path::PathBuf;

use renoform_resolver::persist::{PersistError, PersistedEntity};
use renoform_resolver::settings::Settings;
use rstest::{fixture, rstest};
use tempdir::TempDir;

const TEMPDIR_PREFIX: &str = "renoform-settings-test";

#[fixture]
fn dir() -> TempDir {
    TempDir::new(TEMPDIR_PREFIX).unwrap()
}

#[rstest]
fn missing_file_means_defaults(dir: TempDir) -> Result<(), PersistError> {
    let settings = Settings::read_from_or_default(dir.path())?;
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.branches, ["main", "master"]);
    assert_eq!(settings.config_paths.len(), 4);
    assert_eq!(settings.export_file, PathBuf::from("renovate.json"));
    Ok(())
}

#[rstest]
fn persistence(dir: TempDir) -> Result<(), PersistError> {
    let settings = Settings {
        branches: vec!["trunk".into()],
        ..Settings::default()
    };
    let path = settings.write_to(dir.path())?;
    assert!(path.ends_with(Settings::FILE_PATH));
    assert_eq!(Settings::read_from(dir.path())?, settings);
    Ok(())
}

#[rstest]
fn partial_files_fill_in_defaults(dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::write(dir.path().join(Settings::FILE_PATH), "export_file: out/renovate.json\n")?;
    let settings = Settings::read_from_or_default(dir.path())?;
    assert_eq!(settings.export_file, PathBuf::from("out/renovate.json"));
    assert_eq!(settings.branches, Settings::default().branches);
    Ok(())
}

#[rstest]
fn reading_a_missing_file_strictly_fails(dir: TempDir) {
    assert!(matches!(
        Settings::read_from(dir.path()),
        Err(PersistError::Io { path: Some(_), .. })
    ));
}
