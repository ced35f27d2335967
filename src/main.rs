mod args;

use args::{apply_overrides, Args, Command, OutputEncoding};
use clap::Parser;
use log::{error, info};
use pcdview::{encode_pcd, Aabb, LoadOptions, Loaded, Loader, PcdError};
use serde::Serialize;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::process::ExitCode;

#[derive(Debug, Serialize)]
struct Summary<'a> {
    file: &'a Path,
    point_count: usize,
    bounds: Aabb,
    /// Camera target and framing size for a viewer.
    center: [f32; 3],
    extent: [f32; 3],
    has_colors: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    placeholder_for: Option<String>,
}

impl<'a> Summary<'a> {
    fn new(file: &'a Path, loaded: &Loaded) -> Self {
        let cloud = loaded.cloud();
        let bounds = *cloud.bounds();
        Self {
            file,
            point_count: cloud.len(),
            bounds,
            center: bounds.center(),
            extent: bounds.extent(),
            has_colors: cloud.has_colors(),
            placeholder_for: loaded.error().map(|e| format!("{}: {}", e.kind(), e)),
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.rust_log)
        .init();

    let result = match args.command {
        Command::Info {
            file,
            config,
            max_points,
            no_downsample,
            fallback,
            json,
        } => {
            let base = match config {
                Some(path) => LoadOptions::from_file(path).map_err(Box::<dyn Error>::from),
                None => Ok(LoadOptions::default()),
            };
            base.and_then(|base| {
                let options = apply_overrides(base, max_points, no_downsample, fallback);
                info_command(&file, options, json)
            })
        }
        Command::Convert {
            input,
            output,
            encoding,
        } => convert_command(&input, &output, encoding),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<PcdError>() {
                Some(pcd) => error!("{}: {}", pcd.kind(), pcd),
                None => error!("{}", err),
            }
            ExitCode::FAILURE
        }
    }
}

fn info_command(file: &Path, options: LoadOptions, json: bool) -> Result<(), Box<dyn Error>> {
    let loader = Loader::new(options)?;
    let loaded = loader.load_file(file)?;

    let summary = Summary::new(file, &loaded);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("file:    {}", summary.file.display());
    println!("points:  {}", summary.point_count);
    println!(
        "bounds:  min {:?} max {:?}",
        summary.bounds.min, summary.bounds.max
    );
    println!(
        "frame:   center {:?} extent {:?}",
        summary.center, summary.extent
    );
    println!("colors:  {}", if summary.has_colors { "yes" } else { "no" });
    if let Loaded::Placeholder { error, .. } = &loaded {
        println!("note:    placeholder shown, decode failed with {}", error.kind());
    }
    Ok(())
}

fn convert_command(
    input: &Path,
    output: &Path,
    encoding: OutputEncoding,
) -> Result<(), Box<dyn Error>> {
    let loader = Loader::new(LoadOptions {
        max_points: None,
        ..LoadOptions::default()
    })?;
    let cloud = loader.decode(&fs::read(input).map_err(PcdError::from)?)?;
    let bytes = encode_pcd(cloud.points(), encoding.into())?;
    fs::write(output, bytes)?;
    info!(
        "wrote {} points to {} ({:?})",
        cloud.len(),
        output.display(),
        encoding
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pcdview::{decode, PointCloud};

    #[test]
    fn summary_frames_the_placeholder() {
        let loaded = Loaded::Placeholder {
            cloud: PointCloud::placeholder(),
            error: PcdError::EmptyResult,
        };
        let summary = Summary::new(Path::new("broken.pcd"), &loaded);
        assert_eq!(summary.point_count, 5);
        assert_eq!(summary.center, [0.0, 0.0, 1.5]);
        assert_eq!(summary.extent, [4.0, 4.0, 3.0]);
        assert_eq!(summary.placeholder_for.as_deref(), Some("EmptyResult: no point records could be decoded"));
    }

    #[test]
    fn summary_serializes_framing() {
        let cloud = decode(b"FIELDS x y z\nPOINTS 2\nDATA ascii\n0 0 0\n2 4 6\n").unwrap();
        let loaded = Loaded::Decoded(cloud);
        let json = serde_json::to_value(Summary::new(Path::new("a.pcd"), &loaded)).unwrap();
        assert_eq!(json["center"], serde_json::json!([1.0, 2.0, 3.0]));
        assert_eq!(json["extent"], serde_json::json!([2.0, 4.0, 6.0]));
        assert!(json.get("placeholder_for").is_none());
    }
}
