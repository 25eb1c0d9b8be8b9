//! Command line front end: fisheye correction for single images and folders.

use clap::{Args, Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use defish_core::{Background, FrameFormat, LensParameters, Projection};
use defish_io::convert_file;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

const SUPPORTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

#[derive(Parser)]
#[command(name = "defish")]
#[command(about = "Correct fisheye distortion by re-projecting onto a perspective view")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a single image.
    Convert(ConvertArgs),

    /// Convert every supported image in a folder.
    Batch(BatchArgs),

    /// Print the resolved parameter set as JSON.
    Params(ParamsArgs),
}

#[derive(Debug, Clone, Args)]
struct ConvertArgs {
    /// Path to the input image.
    #[arg(long, short)]
    input: PathBuf,

    /// Path to write the corrected image; format follows the extension.
    #[arg(long, short)]
    output: PathBuf,

    #[command(flatten)]
    params: ParamArgs,
}

#[derive(Debug, Clone, Args)]
struct BatchArgs {
    /// Folder with input images (png, jpg, jpeg).
    #[arg(long, short)]
    input: PathBuf,

    /// Folder for converted images, created if missing. Each output keeps
    /// its source file name.
    #[arg(long, short)]
    output: PathBuf,

    #[command(flatten)]
    params: ParamArgs,
}

#[derive(Debug, Clone, Args)]
struct ParamsArgs {
    #[command(flatten)]
    params: ParamArgs,
}

#[derive(Debug, Clone, Args)]
struct ParamArgs {
    /// JSON file with lens parameters; missing fields take defaults.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Source lens field of view in degrees.
    #[arg(long)]
    fov: Option<f64>,

    /// Output perspective field of view in degrees.
    #[arg(long)]
    pfov: Option<f64>,

    /// Optical center x override in pixels; negative means unset.
    #[arg(long)]
    xcenter: Option<i32>,

    /// Optical center y override in pixels; negative means unset.
    #[arg(long)]
    ycenter: Option<i32>,

    /// Lens circle radius override in pixels; negative means unset.
    #[arg(long)]
    radius: Option<i32>,

    /// Rotate the output counterclockwise by this many degrees.
    #[arg(long)]
    angle: Option<f64>,

    /// Add a uniform border of this many pixels.
    #[arg(long)]
    pad: Option<u32>,

    /// Lens projection model.
    #[arg(long, value_enum)]
    dtype: Option<DtypeArg>,

    /// Keep the full square or mask to the lens circle.
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Fill policy for samples outside the source frame.
    #[arg(long, value_enum)]
    background: Option<BackgroundArg>,
}

impl ParamArgs {
    /// Parameter file first, then individual flags on top.
    fn resolve(&self) -> CliResult<LensParameters> {
        let mut params = match &self.params {
            Some(path) => {
                let data = fs::read_to_string(path).map_err(|e| -> CliError {
                    format!("failed to read {}: {}", path.display(), e).into()
                })?;
                serde_json::from_str(&data).map_err(|e| -> CliError {
                    format!("invalid parameter file {}: {}", path.display(), e).into()
                })?
            }
            None => LensParameters::default(),
        };

        if let Some(v) = self.fov {
            params.fov = v;
        }
        if let Some(v) = self.pfov {
            params.pfov = v;
        }
        if let Some(v) = self.xcenter {
            params.xcenter = Some(v);
        }
        if let Some(v) = self.ycenter {
            params.ycenter = Some(v);
        }
        if let Some(v) = self.radius {
            params.radius = Some(v);
        }
        if let Some(v) = self.angle {
            params.angle = v;
        }
        if let Some(v) = self.pad {
            params.pad = v;
        }
        if let Some(v) = self.dtype {
            params.dtype = v.to_core();
        }
        if let Some(v) = self.format {
            params.format = v.to_core();
        }
        if let Some(v) = self.background {
            params.background = v.to_core();
        }

        params.validate()?;
        Ok(params)
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DtypeArg {
    Linear,
    Equalarea,
    Orthographic,
    Stereographic,
}

impl DtypeArg {
    fn to_core(self) -> Projection {
        match self {
            Self::Linear => Projection::Linear,
            Self::Equalarea => Projection::EqualArea,
            Self::Orthographic => Projection::Orthographic,
            Self::Stereographic => Projection::Stereographic,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Fullframe,
    Circular,
}

impl FormatArg {
    fn to_core(self) -> FrameFormat {
        match self {
            Self::Fullframe => FrameFormat::FullFrame,
            Self::Circular => FrameFormat::Circular,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BackgroundArg {
    Zero,
    Clamp,
}

impl BackgroundArg {
    fn to_core(self) -> Background {
        match self {
            Self::Zero => Background::Zero,
            Self::Clamp => Background::Clamp,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = try_main() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn try_main() -> CliResult<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Convert(args) => run_convert(&args),
        Commands::Batch(args) => run_batch(&args),
        Commands::Params(args) => run_params(&args),
    }
}

fn run_params(args: &ParamsArgs) -> CliResult<()> {
    let params = args.params.resolve()?;
    println!("{}", serde_json::to_string_pretty(&params)?);
    Ok(())
}

fn run_convert(args: &ConvertArgs) -> CliResult<()> {
    let params = args.params.resolve()?;
    tracing::info!("Converting {}", args.input.display());
    convert_file(&args.input, &args.output, &params)?;
    tracing::info!("Written {}", args.output.display());
    Ok(())
}

fn run_batch(args: &BatchArgs) -> CliResult<()> {
    let params = args.params.resolve()?;
    let files = list_supported_images(&args.input)?;
    if files.is_empty() {
        tracing::warn!("No supported images in {}", args.input.display());
        return Ok(());
    }

    fs::create_dir_all(&args.output).map_err(|e| -> CliError {
        format!("failed to create {}: {}", args.output.display(), e).into()
    })?;
    tracing::info!(
        "Converting {} images from {} into {}",
        files.len(),
        args.input.display(),
        args.output.display()
    );

    let failures: Vec<(PathBuf, defish_io::IoError)> = files
        .par_iter()
        .filter_map(|src| {
            let name = src.file_name().expect("listed files have names");
            match convert_file(src, args.output.join(name), &params) {
                Ok(()) => {
                    tracing::info!("Converted {}", src.display());
                    None
                }
                Err(e) => Some((src.clone(), e)),
            }
        })
        .collect();

    for (path, err) in &failures {
        tracing::error!("{}: {}", path.display(), err);
    }
    tracing::info!(
        "Converted {} of {} images",
        files.len() - failures.len(),
        files.len()
    );

    if failures.is_empty() {
        Ok(())
    } else {
        Err(format!("{} of {} conversions failed", failures.len(), files.len()).into())
    }
}

/// Supported images in `dir`, sorted for a stable conversion order.
fn list_supported_images(dir: &Path) -> CliResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .map_err(|e| -> CliError { format!("failed to read {}: {}", dir.display(), e).into() })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_supported_image(path))
        .collect();
    files.sort();
    Ok(files)
}

fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|s| ext.eq_ignore_ascii_case(s))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn no_flags() -> ParamArgs {
        ParamArgs {
            params: None,
            fov: None,
            pfov: None,
            xcenter: None,
            ycenter: None,
            radius: None,
            angle: None,
            pad: None,
            dtype: None,
            format: None,
            background: None,
        }
    }

    #[test]
    fn extension_filter_accepts_the_three_formats() {
        assert!(is_supported_image(Path::new("a.png")));
        assert!(is_supported_image(Path::new("a.JPG")));
        assert!(is_supported_image(Path::new("dir/a.jpeg")));
        assert!(!is_supported_image(Path::new("a.tiff")));
        assert!(!is_supported_image(Path::new("a.png.txt")));
        assert!(!is_supported_image(Path::new("noextension")));
    }

    #[test]
    fn resolve_without_inputs_gives_defaults() {
        let params = no_flags().resolve().unwrap();
        assert_eq!(params, LensParameters::default());
    }

    #[test]
    fn flags_override_the_parameter_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"fov": 150.0, "pfov": 100.0, "dtype": "linear"}}"#).unwrap();

        let args = ParamArgs {
            params: Some(file.path().to_path_buf()),
            pfov: Some(90.0),
            dtype: Some(DtypeArg::Stereographic),
            ..no_flags()
        };
        let params = args.resolve().unwrap();
        assert_eq!(params.fov, 150.0);
        assert_eq!(params.pfov, 90.0);
        assert_eq!(params.dtype, Projection::Stereographic);
    }

    #[test]
    fn resolve_rejects_invalid_values() {
        let args = ParamArgs {
            fov: Some(0.0),
            ..no_flags()
        };
        let err = args.resolve().unwrap_err();
        assert!(err.to_string().contains("field of view"));
    }

    #[test]
    fn resolve_rejects_unknown_projection_in_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"dtype": "cubic"}}"#).unwrap();

        let args = ParamArgs {
            params: Some(file.path().to_path_buf()),
            ..no_flags()
        };
        let err = args.resolve().unwrap_err();
        assert!(err.to_string().contains("invalid parameter file"));
    }

    #[test]
    fn negative_override_flags_stay_unset_sentinels() {
        let args = ParamArgs {
            xcenter: Some(-1),
            ..no_flags()
        };
        let params = args.resolve().unwrap();
        assert_eq!(params.xcenter, Some(-1));
        assert_eq!(params.effective_xcenter(), None);
    }

    fn write_png(path: &Path) {
        let img = ndarray::Array3::from_shape_fn((20, 20, 3), |(y, x, c)| (y + x + c) as u8);
        defish_io::save_image(path, img.view()).unwrap();
    }

    #[test]
    fn batch_converts_every_supported_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        let output = dir.path().join("out");
        fs::create_dir(&input).unwrap();

        write_png(&input.join("a.png"));
        write_png(&input.join("b.jpg"));
        fs::write(input.join("notes.txt"), "skip me").unwrap();

        let args = BatchArgs {
            input,
            output: output.clone(),
            params: no_flags(),
        };
        run_batch(&args).unwrap();

        assert!(output.join("a.png").exists());
        assert!(output.join("b.jpg").exists());
        assert!(!output.join("notes.txt").exists());
    }

    #[test]
    fn batch_of_empty_folder_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out");
        let args = BatchArgs {
            input: dir.path().to_path_buf(),
            output: output.clone(),
            params: no_flags(),
        };
        run_batch(&args).unwrap();
        assert!(!output.exists());
    }

    #[test]
    fn batch_reports_failed_conversions() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        let output = dir.path().join("out");
        fs::create_dir(&input).unwrap();

        write_png(&input.join("good.png"));
        fs::write(input.join("broken.png"), b"not a png").unwrap();

        let args = BatchArgs {
            input,
            output: output.clone(),
            params: no_flags(),
        };
        let err = run_batch(&args).unwrap_err();
        assert!(err.to_string().contains("1 of 2 conversions failed"));
        assert!(output.join("good.png").exists());
        assert!(!output.join("broken.png").exists());
    }
}
