//! Directory conversion: discover vector documents, bake each one, isolate
//! per-file failures. Nothing here is required by the core transcoder; it
//! is the convenience layer the CLI drives.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::convert;
use crate::error::BakeResult;
use crate::transcode::{self, BakeOptions};

const RECOGNIZED_EXTENSIONS: &[&str] = &["svg", "svgz"];

/// Derives the generated type name for an input file.
pub trait NamingStrategy {
    fn type_name(&self, path: &Path) -> String;
}

/// PascalCase from the file stem: `edit-copy.svg` becomes `EditCopy`.
/// Names that would start with a digit get an `Icon` prefix.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultNamingStrategy;

impl NamingStrategy for DefaultNamingStrategy {
    fn type_name(&self, path: &Path) -> String {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut name = String::new();
        let mut upper_next = true;
        for c in stem.chars() {
            if c.is_ascii_alphanumeric() {
                if upper_next {
                    name.extend(c.to_uppercase());
                } else {
                    name.push(c);
                }
                upper_next = false;
            } else {
                upper_next = true;
            }
        }

        if name.is_empty() {
            return "Icon".to_owned();
        }
        if name.starts_with(|c: char| c.is_ascii_digit()) {
            return format!("Icon{name}");
        }
        name
    }
}

/// Batch configuration shared by every file in one run.
#[derive(Clone, Debug)]
pub struct BatchOptions {
    /// Namespace recorded in every generated header.
    pub namespace: Option<String>,
    /// Emit the resizable skeleton for every icon.
    pub resizable: bool,
    /// Procedure size bound handed to the chunker.
    pub chunk_threshold_bytes: usize,
    /// Output directory; defaults to the input directory.
    pub out_dir: Option<PathBuf>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            namespace: None,
            resizable: false,
            chunk_threshold_bytes: transcode::DEFAULT_CHUNK_THRESHOLD_BYTES,
            out_dir: None,
        }
    }
}

/// One successfully converted input.
#[derive(Clone, Debug, Serialize)]
pub struct ConvertedFile {
    pub input: PathBuf,
    pub output: PathBuf,
    pub type_name: String,
}

/// One input that failed; the rest of the batch is unaffected.
#[derive(Clone, Debug, Serialize)]
pub struct FailedFile {
    pub input: PathBuf,
    pub error: String,
}

/// Outcome of a whole directory run.
#[derive(Clone, Debug, Default, Serialize)]
pub struct BatchReport {
    pub converted: Vec<ConvertedFile>,
    pub failed: Vec<FailedFile>,
}

/// Convert every recognized vector document in `dir`.
///
/// Inputs are processed in sorted order for deterministic reports. A
/// failing input is logged and recorded, never fatal to the batch.
pub fn convert_dir(
    dir: &Path,
    naming: &dyn NamingStrategy,
    opts: &BatchOptions,
) -> BakeResult<BatchReport> {
    let mut inputs: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_recognized(path))
        .collect();
    inputs.sort();

    let mut report = BatchReport::default();
    for input in inputs {
        let type_name = naming.type_name(&input);
        match convert_file(&input, &type_name, opts) {
            Ok(output) => {
                tracing::info!(input = %input.display(), output = %output.display(), "baked");
                report.converted.push(ConvertedFile {
                    input,
                    output,
                    type_name,
                });
            }
            Err(error) => {
                tracing::warn!(input = %input.display(), %error, "skipping input");
                report.failed.push(FailedFile {
                    input,
                    error: error.to_string(),
                });
            }
        }
    }
    Ok(report)
}

/// Convert a single file, returning the path of the generated source.
pub fn convert_file(input: &Path, type_name: &str, opts: &BatchOptions) -> BakeResult<PathBuf> {
    let data = fs::read(input)?;
    let scene = convert::scene_from_svg(&data)?;

    let mut bake = BakeOptions::new(type_name)
        .resizable(opts.resizable)
        .chunk_threshold_bytes(opts.chunk_threshold_bytes);
    if let Some(namespace) = &opts.namespace {
        bake = bake.namespace(namespace.clone());
    }
    let text = transcode::transcode_to_string(&scene, &bake)?;

    let out_dir = match &opts.out_dir {
        Some(dir) => dir.clone(),
        None => input.parent().unwrap_or_else(|| Path::new(".")).to_path_buf(),
    };
    fs::create_dir_all(&out_dir)?;
    let output = out_dir.join(format!("{}.rs", snake_case(type_name)));
    fs::write(&output, text)?;
    Ok(output)
}

fn is_recognized(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_ascii_lowercase();
            RECOGNIZED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_naming() {
        let naming = DefaultNamingStrategy;
        assert_eq!(naming.type_name(Path::new("edit-copy.svg")), "EditCopy");
        assert_eq!(naming.type_name(Path::new("a/b/go_home.svgz")), "GoHome");
        assert_eq!(naming.type_name(Path::new("weird  name.svg")), "WeirdName");
        assert_eq!(naming.type_name(Path::new("2cool.svg")), "Icon2cool");
        assert_eq!(naming.type_name(Path::new("---.svg")), "Icon");
    }

    #[test]
    fn snake_case_inverts_pascal_case() {
        assert_eq!(snake_case("EditCopy"), "edit_copy");
        assert_eq!(snake_case("Icon2cool"), "icon2cool");
    }

    #[test]
    fn recognized_extensions() {
        assert!(is_recognized(Path::new("a.svg")));
        assert!(is_recognized(Path::new("a.SVG")));
        assert!(is_recognized(Path::new("a.svgz")));
        assert!(!is_recognized(Path::new("a.png")));
        assert!(!is_recognized(Path::new("svg")));
    }

    #[test]
    fn batch_isolates_per_file_failures() {
        let dir = PathBuf::from("target").join("batch_isolation_test");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();

        fs::write(
            dir.join("ok.svg"),
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4">
                <rect x="0" y="0" width="4" height="4" fill="#ff0000"/>
            </svg>"##,
        )
        .unwrap();
        fs::write(dir.join("broken.svg"), "definitely not svg").unwrap();
        fs::write(dir.join("ignored.txt"), "not an input").unwrap();

        let report = convert_dir(&dir, &DefaultNamingStrategy, &BatchOptions::default()).unwrap();
        assert_eq!(report.converted.len(), 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.converted[0].type_name, "Ok");
        assert!(dir.join("ok.rs").exists());
        assert!(report.failed[0].input.ends_with("broken.svg"));
    }

    #[test]
    fn out_dir_redirects_generated_files() {
        let dir = PathBuf::from("target").join("batch_outdir_test");
        let out = dir.join("generated");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("dot.svg"),
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="4" height="4">
                <rect x="1" y="1" width="2" height="2" fill="#000000"/>
            </svg>"##,
        )
        .unwrap();

        let opts = BatchOptions {
            out_dir: Some(out.clone()),
            ..BatchOptions::default()
        };
        let report = convert_dir(&dir, &DefaultNamingStrategy, &opts).unwrap();
        assert_eq!(report.converted.len(), 1);
        assert!(out.join("dot.rs").exists());
    }
}
