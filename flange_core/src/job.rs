//! # Job Files
//!
//! A job file describes one flange input plus what to do with it: a sizing
//! request, a manual geometry to verify, or both. TOML and JSON are accepted;
//! [`Job::load`] picks the parser from the file extension.
//!
//! ## TOML Example
//!
//! ```toml
//! [input]
//! label = "N1 cover"
//! nominal_size = 100
//! design_pressure_bar = 16.0
//! design_temp_c = 150.0
//! material = "P265GH"
//! corrosion_allowance_mm = 1.0
//!
//! [sizing]
//! pressure_class = 16
//! preference = "min_bolts"
//! fastener = { standard = "EN", grade_id = "8.8" }
//!
//! [manual]
//! pressure_class = 16
//!
//! [manual.geometry]
//! bolt_circle_mm = 180.0
//! bolt_count = 8
//! bolt_size = "M16"
//! outer_diameter_mm = 220.0
//! thickness_mm = 24.0
//! fastener = { standard = "EN", grade_id = "8.8" }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::{
    size_flange, verify_manual_geometry, FlangeInput, ManualCheckResult, ManualGeometry, SizingOutcome,
    SizingPreference,
};
use crate::errors::{CalcError, CalcResult};
use crate::materials::FastenerSelection;

/// Sizing search parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingRequest {
    pub pressure_class: u32,
    pub fastener: FastenerSelection,
    #[serde(default)]
    pub preference: SizingPreference,
}

/// Manual verification parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualRequest {
    pub pressure_class: u32,
    pub geometry: ManualGeometry,
}

/// One job: input plus the requested calculations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub input: FlangeInput,
    #[serde(default)]
    pub sizing: Option<SizingRequest>,
    #[serde(default)]
    pub manual: Option<ManualRequest>,
}

impl Job {
    /// Parse a TOML job
    pub fn from_toml_str(source: &str) -> CalcResult<Self> {
        let job: Job = toml::from_str(source).map_err(|e| CalcError::config_error("job (TOML)", e.to_string()))?;
        job.validate()?;
        Ok(job)
    }

    /// Parse a JSON job
    pub fn from_json_str(source: &str) -> CalcResult<Self> {
        let job: Job = serde_json::from_str(source).map_err(|e| CalcError::config_error("job (JSON)", e.to_string()))?;
        job.validate()?;
        Ok(job)
    }

    /// Read a job file; `.json` is parsed as JSON, anything else as TOML
    pub fn load(path: &Path) -> CalcResult<Self> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| CalcError::config_error(path.display().to_string(), e.to_string()))?;
        debug!(path = %path.display(), bytes = source.len(), "job file read");

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed = if is_json {
            Self::from_json_str(&source)
        } else {
            Self::from_toml_str(&source)
        };

        parsed.map_err(|e| match e {
            CalcError::ConfigError { reason, .. } => CalcError::config_error(path.display().to_string(), reason),
            other => other,
        })
    }

    /// Validate the input and that at least one calculation is requested
    pub fn validate(&self) -> CalcResult<()> {
        self.input.validate()?;
        if self.sizing.is_none() && self.manual.is_none() {
            return Err(CalcError::missing_field("sizing or manual"));
        }
        Ok(())
    }

    /// Run the sizing request, if any
    pub fn run_sizing(&self) -> Option<CalcResult<SizingOutcome>> {
        self.sizing
            .as_ref()
            .map(|req| size_flange(&self.input, req.pressure_class, &req.fastener, req.preference))
    }

    /// Run the manual verification, if any
    pub fn run_manual(&self) -> Option<ManualCheckResult> {
        self.manual
            .as_ref()
            .map(|req| verify_manual_geometry(&self.input, &req.geometry, req.pressure_class))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::FastenerStandard;

    const TOML_JOB: &str = r#"
[input]
label = "N1 cover"
nominal_size = 100
design_pressure_bar = 16.0
design_temp_c = 150.0
material = "P265GH"
corrosion_allowance_mm = 1.0

[input.gasket]
facing = "RF"
thickness_mm = 3.0
material = "graphite"

[sizing]
pressure_class = 16
preference = "min_bolts"
fastener = { standard = "EN", grade_id = "8.8" }

[manual]
pressure_class = 16

[manual.geometry]
bolt_circle_mm = 180.0
bolt_count = 8
bolt_size = "M16"
outer_diameter_mm = 220.0
thickness_mm = 30.0
fastener = { standard = "EN", grade_id = "8.8" }
"#;

    #[test]
    fn test_toml_job() {
        let job = Job::from_toml_str(TOML_JOB).unwrap();
        assert_eq!(job.input.label, "N1 cover");
        assert_eq!(job.input.gasket.material, "graphite");
        let sizing = job.sizing.as_ref().unwrap();
        assert_eq!(sizing.preference, SizingPreference::MinBolts);
        assert_eq!(sizing.fastener.standard, FastenerStandard::En);

        let outcome = job.run_sizing().unwrap().unwrap();
        assert!(outcome.sized().is_some());
        assert!(job.run_manual().unwrap().pass);
    }

    #[test]
    fn test_json_job_round_trip() {
        let job = Job::from_toml_str(TOML_JOB).unwrap();
        let json = serde_json::to_string(&job).unwrap();
        assert_eq!(Job::from_json_str(&json).unwrap(), job);
    }

    #[test]
    fn test_job_needs_a_request() {
        let source = r#"
[input]
nominal_size = 100
design_pressure_bar = 16.0
design_temp_c = 20.0
material = "P265GH"
"#;
        let err = Job::from_toml_str(source).unwrap_err();
        assert_eq!(err, CalcError::missing_field("sizing or manual"));
    }

    #[test]
    fn test_malformed_job_is_config_error() {
        let err = Job::from_toml_str("[input]\nnominal_size = \"big\"").unwrap_err();
        assert!(matches!(err, CalcError::ConfigError { .. }));

        let err = Job::from_json_str("{").unwrap_err();
        assert!(matches!(err, CalcError::ConfigError { .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = Job::load(Path::new("/nonexistent/job.toml")).unwrap_err();
        match err {
            CalcError::ConfigError { source_name, .. } => assert!(source_name.contains("job.toml")),
            other => panic!("unexpected error {:?}", other),
        }
    }
}
