use crate::corpus::CacheArtifact;
use crate::invoke::{ToolError, ToolInvoker};
use std::ffi::OsString;
use std::path::PathBuf;

/// Images commonly present across shared caches, tried in order when the
/// caller supplies no list of its own.
pub const DEFAULT_IMAGES: [&str; 5] = [
    "/System/Library/PrivateFrameworks/PreferencesUI.framework/PreferencesUI",
    "/System/Library/PrivateFrameworks/RunningBoard.framework/RunningBoard",
    "/System/iOSSupport/System/Library/PrivateFrameworks/WeatherUI.framework/Versions/A/WeatherUI",
    "/System/Library/PrivateFrameworks/DigitalAccess.framework/DigitalAccess",
    "/System/Library/PrivateFrameworks/AccountSettings.framework/AccountSettings",
];

#[derive(Debug, Clone)]
pub struct ProbeOptions {
    pub executable: PathBuf,
    pub output_dir: PathBuf,
    /// Candidate image install paths, tried in the given order.
    pub images: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Extracted { image: String },
    NoSuitableImage,
}

/// Try each candidate image against the cache until one extracts. A
/// not-found diagnostic moves on to the next candidate; the first candidate
/// the extractor accepts is reported in a labeled block and ends the probe.
pub fn probe_cache(
    invoker: &dyn ToolInvoker,
    options: &ProbeOptions,
    cache: &CacheArtifact,
) -> Result<ProbeOutcome, ToolError> {
    let label = cache.label();
    for image in &options.images {
        let base = image.rsplit('/').next().unwrap_or(image.as_str());
        let output_path = options.output_dir.join(format!("{label}_{base}"));
        let args = vec![
            OsString::from("-V"),
            OsString::from("-e"),
            OsString::from(image),
            OsString::from("-o"),
            output_path.into_os_string(),
            cache.path.as_os_str().to_os_string(),
        ];

        let run = invoker.run_captured(&options.executable, &args)?;
        if run
            .combined
            .contains(&format!("Unable to find image '{image}'"))
        {
            continue;
        }

        println!("------: {label} :------");
        print!("{}", run.combined);
        println!("------------\n");
        return Ok(ProbeOutcome::Extracted {
            image: image.clone(),
        });
    }

    eprintln!("Unable to find suitable image for {label}.\n");
    Ok(ProbeOutcome::NoSuitableImage)
}
