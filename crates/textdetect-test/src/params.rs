//! Regression test parameters and operations

use crate::error::{TestError, TestResult};
use crate::{golden_dir, regout_dir};
use std::fs;
use std::path::Path;
use textdetect_core::{Box, Pix};

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Generate golden files
    Generate,
    /// Compare with golden files (default)
    #[default]
    Compare,
    /// Display mode - run without comparison
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("REGTEST_MODE").unwrap_or_default())
    }

    fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "generate" => Self::Generate,
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// Tracks the test name, the running check index, the mode and every
/// failure seen so far. Checks never panic; call [`RegParams::cleanup`] at
/// the end and assert on its result.
pub struct RegParams {
    /// Name of the test (e.g., "textdetect")
    pub test_name: String,
    /// Current check index (incremented before each check)
    index: usize,
    /// Test mode (generate, compare, or display)
    pub mode: RegTestMode,
    success: bool,
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// The mode comes from the `REGTEST_MODE` environment variable.
    pub fn new(test_name: &str) -> Self {
        Self::with_mode(test_name, RegTestMode::from_env())
    }

    /// Create regression test parameters with an explicit mode
    pub fn with_mode(test_name: &str, mode: RegTestMode) -> Self {
        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current check index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn fail(&mut self, msg: String) {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
    }

    /// Compare two floating-point values
    ///
    /// Returns `true` if `|expected - actual| <= delta`.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();
        if diff > delta {
            self.fail(format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            ));
            false
        } else {
            true
        }
    }

    /// Compare two Pix images for exact equality
    pub fn compare_pix(&mut self, pix1: &Pix, pix2: &Pix) -> bool {
        self.index += 1;

        if !pix1.sizes_equal(pix2) || pix1.depth() != pix2.depth() {
            self.fail(format!(
                "Failure in {}_reg: pix comparison for index {} - dimension mismatch",
                self.test_name, self.index
            ));
            return false;
        }

        for y in 0..pix1.height() {
            for x in 0..pix1.width() {
                if pix1.get_pixel(x, y) != pix2.get_pixel(x, y) {
                    self.fail(format!(
                        "Failure in {}_reg: pix comparison for index {} - pixel mismatch at ({}, {})",
                        self.test_name, self.index, x, y
                    ));
                    return false;
                }
            }
        }

        true
    }

    /// Compare two box lists for exact equality, in order
    pub fn compare_boxes(&mut self, expected: &[Box], actual: &[Box]) -> bool {
        self.index += 1;
        if expected != actual {
            self.fail(format!(
                "Failure in {}_reg: box comparison for index {}\n\
                 expected = {:?}\n\
                 actual = {:?}",
                self.test_name, self.index, expected, actual
            ));
            false
        } else {
            true
        }
    }

    /// Write a Pix as PNG under the regout directory and check it against
    /// its golden file.
    ///
    /// In generate mode the golden file is (re)written. In compare mode a
    /// missing or differing golden file is a failure. Display mode only
    /// writes the local file.
    pub fn write_pix_and_check(&mut self, pix: &Pix) -> TestResult<()> {
        self.index += 1;

        fs::create_dir_all(regout_dir())?;
        let local_path = format!("{}/{}.{:02}.png", regout_dir(), self.test_name, self.index);
        textdetect_io::write_image(pix, &local_path).map_err(|e| TestError::ImageWrite {
            path: local_path.clone(),
            message: e.to_string(),
        })?;

        self.check_file(&local_path)
    }

    fn check_file(&mut self, local_path: &str) -> TestResult<()> {
        let golden_path = format!(
            "{}/{}_golden.{:02}.png",
            golden_dir(),
            self.test_name,
            self.index
        );

        match self.mode {
            RegTestMode::Generate => {
                fs::create_dir_all(golden_dir())?;
                fs::copy(local_path, &golden_path)?;
                eprintln!("Generated: {}", golden_path);
            }
            RegTestMode::Compare => {
                if !Path::new(&golden_path).exists() {
                    self.fail(format!(
                        "Failure in {}_reg, index {}: golden file {} is missing",
                        self.test_name, self.index, golden_path
                    ));
                    return Ok(());
                }
                if !same_image_files(local_path, &golden_path) {
                    self.fail(format!(
                        "Failure in {}_reg, index {}: comparing {} with {}",
                        self.test_name, self.index, local_path, golden_path
                    ));
                }
            }
            RegTestMode::Display => {}
        }

        Ok(())
    }

    /// Clean up and report results
    ///
    /// Returns `true` if all checks passed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all checks have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

/// Decode both PNGs and compare them pixel by pixel.
fn same_image_files(path1: &str, path2: &str) -> bool {
    match (
        textdetect_io::read_image(path1),
        textdetect_io::read_image(path2),
    ) {
        (Ok(pix1), Ok(pix2)) => {
            pix1.sizes_equal(&pix2) && pix1.depth() == pix2.depth() && pix1.data() == pix2.data()
        }
        _ => false,
    }
}
