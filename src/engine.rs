//! Boundary to the external Voronoi engine.
//!
//! The engine reads a qhull point file and writes `qvoronoi o` output. Only
//! the text contract matters to the rest of the crate; [`QvoronoiProcess`] is
//! one way to satisfy it and any `Fn(&str) -> Result<String>` is another.

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::{GeometryError, Result};
use crate::points::PointSet;

/// Anything that turns a qhull point file into `qvoronoi o` output.
pub trait DiagramEngine {
    fn voronoi(&self, point_file: &str) -> Result<String>;
}

impl<F> DiagramEngine for F
where
    F: Fn(&str) -> Result<String>,
{
    fn voronoi(&self, point_file: &str) -> Result<String> {
        self(point_file)
    }
}

/// Write points in qhull's input format.
///
/// Two header lines (dimension, point count) followed by one point per line,
/// each coordinate printed like C's `%15.5e `.
pub fn write_point_file<W: Write>(points: &PointSet, mut out: W) -> std::io::Result<()> {
    writeln!(out, "{}", points.dim())?;
    writeln!(out, "{}", points.len())?;
    for p in points.iter() {
        for &v in p {
            write!(out, "{:>15} ", c_exponent(v))?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Render the point file into a string.
#[must_use]
pub fn point_file(points: &PointSet) -> String {
    let mut buf = Vec::with_capacity(16 * points.as_flat().len() + 16);
    // Writing into a Vec cannot fail.
    let _ = write_point_file(points, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

/// `%.5e` with a signed, at least two digit exponent (`1.50000e+02`).
fn c_exponent(v: f64) -> String {
    let s = format!("{v:.5e}");
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = exp.strip_prefix('-').map_or(("+", exp), |d| ("-", d));
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => s,
    }
}

/// Runs the `qvoronoi` executable, feeding the point file on stdin.
#[derive(Clone, Debug)]
pub struct QvoronoiProcess {
    program: PathBuf,
    options: Vec<String>,
}

impl Default for QvoronoiProcess {
    fn default() -> Self {
        Self {
            program: PathBuf::from("qvoronoi"),
            options: vec!["o".to_owned()],
        }
    }
}

impl QvoronoiProcess {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific `qvoronoi` binary instead of the one on `PATH`.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Append a qhull option such as `Qbb` or `Qz`. The `o` output option is
    /// always present.
    #[must_use]
    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.options.push(option.into());
        self
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }
}

impl DiagramEngine for QvoronoiProcess {
    fn voronoi(&self, point_file: &str) -> Result<String> {
        tracing::info!(program = %self.program.display(), options = ?self.options, "running qvoronoi");
        let mut child = Command::new(&self.program)
            .args(&self.options)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // qhull reads all input before producing output. A rejected input can
        // close the pipe early; the exit status and stderr then say why.
        let written = child
            .stdin
            .take()
            .map(|mut stdin| stdin.write_all(point_file.as_bytes()));
        let output = child.wait_with_output()?;

        if !output.status.success() {
            return Err(GeometryError::Engine {
                reason: format!(
                    "{} exited with {}: {}",
                    self.program.display(),
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            });
        }
        if let Some(Err(e)) = written {
            return Err(e.into());
        }
        String::from_utf8(output.stdout).map_err(|e| GeometryError::Engine {
            reason: format!("output is not UTF-8: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_c_exponent() {
        assert_eq!(c_exponent(1.0), "1.00000e+00");
        assert_eq!(c_exponent(-150.0), "-1.50000e+02");
        assert_eq!(c_exponent(0.00025), "2.50000e-04");
        assert_eq!(c_exponent(0.0), "0.00000e+00");
        assert_eq!(c_exponent(1e120), "1.00000e+120");
    }

    #[test]
    fn test_point_file_layout() {
        let points = PointSet::from_rows([[0.0, 1.0], [-2.5, 30.0]]).unwrap();
        let text = point_file(&points);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "2");
        assert_eq!(lines[1], "2");
        assert_eq!(lines[2], "    0.00000e+00     1.00000e+00 ");
        assert_eq!(lines[3], "   -2.50000e+00     3.00000e+01 ");
    }

    #[test]
    fn test_closure_engine() {
        let engine = |input: &str| -> Result<String> { Ok(input.to_uppercase()) };
        assert_eq!(engine.voronoi("abc").unwrap(), "ABC");
    }

    #[test]
    fn test_missing_program_is_io_error() {
        let engine = QvoronoiProcess::new().with_program("/nonexistent/qvoronoi-binary");
        assert!(matches!(engine.voronoi("2\n0\n"), Err(GeometryError::Io(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_early_exit_reports_engine_error() {
        // `sh o` fails without reading stdin, so the write hits a closed pipe.
        let engine = QvoronoiProcess::new().with_program("sh");
        let input = "0.0 0.0\n".repeat(200_000);
        match engine.voronoi(&input) {
            Err(GeometryError::Engine { reason }) => assert!(reason.contains("sh")),
            other => panic!("expected engine error, got {other:?}"),
        }
    }

    #[test]
    fn test_options_keep_output_flag() {
        let engine = QvoronoiProcess::new().with_option("Qbb");
        assert_eq!(engine.options(), &["o".to_owned(), "Qbb".to_owned()]);
    }
}
