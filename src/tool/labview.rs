//! Resolution of the LabVIEW install that g-cli should drive.

use anyhow::Context;
use std::path::PathBuf;

/// Per-version override: `labviewPath_<year>` points at the LabVIEW
/// executable to use instead of the default install location.
pub const LABVIEW_PATH_ENV_PREFIX: &str = "labviewPath";

/// The LabVIEW executable for a given year version.
///
/// The `labviewPath_<year>` environment variable wins; otherwise the default
/// install path under the platform program-files directory is assumed.
/// Having neither is fatal, there is no further fallback.
pub fn labview_path_from_year(year: &str) -> anyhow::Result<PathBuf> {
    let env_key = format!("{LABVIEW_PATH_ENV_PREFIX}_{year}");
    if let Ok(path) = std::env::var(&env_key) {
        return Ok(PathBuf::from(path));
    }

    let program_files = std::env::var("ProgramFiles").with_context(|| {
        format!("neither {env_key} nor ProgramFiles is set; cannot locate LabVIEW {year}")
    })?;

    Ok(PathBuf::from(program_files)
        .join("National Instruments")
        .join(format!("LabVIEW {year}"))
        .join("LabVIEW.exe"))
}
