//! Device configuration export/import handlers.

use std::path::{Path, PathBuf};

use bytes::Bytes;

use roomctl_core::Console;

use crate::cli::{DeviceConfigArgs, DeviceConfigCommand, GlobalOpts};
use crate::error::CliError;

/// Where an export lands: `--out` as a file, inside `--out` if it is a
/// directory, or the server-provided name in the working directory.
fn export_target(out: Option<PathBuf>, filename: &str) -> PathBuf {
    match out {
        Some(dir) if dir.is_dir() => dir.join(filename),
        Some(path) => path,
        None => PathBuf::from(filename),
    }
}

fn upload_name(path: &Path) -> Result<String, CliError> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_owned)
        .ok_or_else(|| CliError::Validation {
            field: "file".into(),
            reason: format!("'{}' has no file name", path.display()),
        })
}

pub async fn handle(
    console: &Console,
    args: DeviceConfigArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DeviceConfigCommand::Export { device, out } => {
            let export = console.room_detail().export(device).await?;
            let target = export_target(out, &export.filename);
            std::fs::write(&target, &export.data)?;
            if !global.quiet {
                eprintln!("Wrote {} bytes to {}", export.data.len(), target.display());
            }
            Ok(())
        }

        DeviceConfigCommand::Import { room, file, device } => {
            let name = upload_name(&file)?;
            let data = Bytes::from(std::fs::read(&file)?);

            let view = console.room_detail();
            view.open(room).await?;
            view.import(&name, data, device).await?;
            Ok(())
        }

        DeviceConfigCommand::Set {
            config_id,
            key,
            value,
        } => {
            console
                .update_config_parameter(config_id, &key, &value)
                .await?;
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn export_lands_in_directory_or_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let name = "config_device_3_2024-05-01T12:00:00.000Z.json";

        assert_eq!(
            export_target(Some(dir.path().to_path_buf()), name),
            dir.path().join(name)
        );
        let file = dir.path().join("lab.json");
        assert_eq!(export_target(Some(file.clone()), name), file);
        assert_eq!(export_target(None, name), PathBuf::from(name));
    }

    #[test]
    fn upload_name_is_the_base_name() {
        assert_eq!(
            upload_name(Path::new("/tmp/configs/lab.json")).unwrap(),
            "lab.json"
        );
        assert!(upload_name(Path::new("/")).is_err());
    }
}
