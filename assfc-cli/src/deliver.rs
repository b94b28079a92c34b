//! Hand the collected fonts over: copy them to a folder or mux them into an
//! `.mks` file next to the script.

use std::collections::BTreeSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{anyhow, bail, Context, Result};
use log::{debug, info};

pub const FONT_MIME_TYPE: &str = "application/x-truetype-font";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Folder(PathBuf),
    Matroska(PathBuf),
}

impl Delivery {
    pub fn for_output(path: &Path) -> Self {
        let is_mks = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("mks"));
        if is_mks {
            Delivery::Matroska(path.to_path_buf())
        } else {
            Delivery::Folder(path.to_path_buf())
        }
    }
}

/// Distinct font files in first-seen order.
pub fn unique_files<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Vec<PathBuf> {
    let mut seen = BTreeSet::new();
    paths
        .into_iter()
        .filter(|p| seen.insert(p.to_path_buf()))
        .map(Path::to_path_buf)
        .collect()
}

pub fn copy_fonts_to_folder(folder: &Path, fonts: &[PathBuf]) -> Result<()> {
    info!("copying fonts to {}", folder.display());
    if !folder.exists() {
        fs::create_dir_all(folder)
            .with_context(|| format!("creating output folder {}", folder.display()))?;
    }
    if !folder.is_dir() {
        bail!("a file with the same name already exists at {}", folder.display());
    }

    for font in fonts {
        let name = font
            .file_name()
            .ok_or_else(|| anyhow!("font path has no file name: {}", font.display()))?;
        let dest = folder.join(name);
        fs::copy(font, &dest)
            .with_context(|| format!("copying {} to {}", font.display(), dest.display()))?;
        debug!("copied {}", font.display());
    }
    Ok(())
}

/// Arguments for `mkvmerge`, without the program itself.
pub fn mkvmerge_args(output: &Path, script: &Path, fonts: &[PathBuf]) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-o".into(), output.into(), script.into()];
    for font in fonts {
        args.push("--attachment-mime-type".into());
        args.push(FONT_MIME_TYPE.into());
        args.push("--attachment-name".into());
        args.push(font.file_name().unwrap_or(font.as_os_str()).into());
        args.push("--attach-file".into());
        args.push(font.into());
    }
    args
}

pub fn create_mks_file(mkvmerge: &Path, output: &Path, script: &Path, fonts: &[PathBuf]) -> Result<()> {
    let args = mkvmerge_args(output, script, fonts);
    debug!("mks creation command: {} {:?}", mkvmerge.display(), args);

    let status = Command::new(mkvmerge)
        .args(&args)
        .status()
        .with_context(|| format!("running {}", mkvmerge.display()))?;
    if !status.success() {
        bail!("{} failed with {status}", mkvmerge.display());
    }
    info!("wrote {}", output.display());
    Ok(())
}

pub fn deliver(
    delivery: &Delivery,
    mkvmerge: &Path,
    script: &Path,
    fonts: &[PathBuf],
) -> Result<()> {
    match delivery {
        Delivery::Folder(folder) => copy_fonts_to_folder(folder, fonts),
        Delivery::Matroska(output) => create_mks_file(mkvmerge, output, script, fonts),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn output_kind_follows_extension() {
        assert_eq!(
            Delivery::for_output(Path::new("out/ep1.MKS")),
            Delivery::Matroska(PathBuf::from("out/ep1.MKS"))
        );
        assert_eq!(
            Delivery::for_output(Path::new("out/fonts")),
            Delivery::Folder(PathBuf::from("out/fonts"))
        );
    }

    #[test]
    fn duplicates_are_dropped_in_order() {
        let a = PathBuf::from("/f/a.ttf");
        let b = PathBuf::from("/f/b.ttc");
        let files = unique_files([b.as_path(), a.as_path(), b.as_path()]);
        assert_eq!(files, vec![b, a]);
    }

    #[test]
    fn mkvmerge_arguments() {
        let args = mkvmerge_args(
            Path::new("/out/ep.mks"),
            Path::new("/in/ep.ass"),
            &[PathBuf::from("/fonts/A.ttf")],
        );
        let args: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            vec![
                "-o",
                "/out/ep.mks",
                "/in/ep.ass",
                "--attachment-mime-type",
                "application/x-truetype-font",
                "--attachment-name",
                "A.ttf",
                "--attach-file",
                "/fonts/A.ttf",
            ]
        );
    }

    #[test]
    fn copies_into_new_folder() {
        let tmp = tempdir().expect("tempdir");
        let font = tmp.path().join("a.ttf");
        fs::write(&font, b"font").expect("write");
        let out = tmp.path().join("out/fonts");

        copy_fonts_to_folder(&out, &[font]).expect("copy");
        assert_eq!(fs::read(out.join("a.ttf")).expect("read"), b"font");
    }

    #[test]
    fn existing_file_blocks_folder() {
        let tmp = tempdir().expect("tempdir");
        let out = tmp.path().join("taken");
        fs::write(&out, b"").expect("write");
        assert!(copy_fonts_to_folder(&out, &[]).is_err());
    }

    #[test]
    fn missing_mkvmerge_is_an_error() {
        let tmp = tempdir().expect("tempdir");
        let result = create_mks_file(
            Path::new("/nonexistent/bin/mkvmerge"),
            &tmp.path().join("x.mks"),
            &tmp.path().join("x.ass"),
            &[],
        );
        assert!(result.is_err());
    }
}
