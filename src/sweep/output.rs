// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! CSV persistence and scatter plot of sweep results.

use std::fs;
use std::path::{Path, PathBuf};

use plotters::prelude::*;
use tracing::info;

use super::types::ResultTable;
use crate::error::{Error, Result};

/// File name of the result table.
pub const CSV_FILE_NAME: &str = "epsilon_log.csv";

/// File name of the scatter plot.
pub const PLOT_FILE_NAME: &str = "grid_sweep.png";

const PLOT_SIZE: (u32, u32) = (1000, 700);

/// Mode of the written CSV: owner read/write, everyone else read.
#[cfg(unix)]
const CSV_MODE: u32 = 0o644;

/// Paths written by [`persist_and_plot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepArtifacts {
    pub csv_path: PathBuf,
    pub plot_path: PathBuf,
}

/// Write the table as CSV to `path`.
///
/// Rows go to a temporary file next to `path` which then replaces it, so a
/// reader never sees a half-written table. On unix the file ends up with
/// mode 0644 rather than the temporary file's owner-only mode.
pub fn write_csv(table: &ResultTable, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;

    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(&mut tmp);
        writer.write_record(ResultTable::COLUMNS)?;
        for row in table.rows() {
            writer.serialize(row)?;
        }
        writer.flush()?;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(CSV_MODE))?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;

    Ok(())
}

fn plot_error<E: std::fmt::Display>(e: E) -> Error {
    Error::Plot(e.to_string())
}

/// Render the per-ring scatter plot of `eps_log` against `kappa2`.
pub fn render_plot(table: &ResultTable, path: &Path) -> Result<()> {
    let rows = table.rows();
    let x_max = rows
        .iter()
        .map(|r| r.pump_strength_khz)
        .fold(0.0f64, f64::max);
    let y_max = rows
        .iter()
        .map(|r| r.logical_error_rate)
        .fold(0.0f64, f64::max);
    let x_max = if x_max > 0.0 { x_max * 1.1 } else { 1.0 };
    let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

    let root = BitMapBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Logical error rate vs cat pump strength", ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0f64..x_max, 0.0f64..y_max)
        .map_err(plot_error)?;

    chart
        .configure_mesh()
        .x_desc("kappa2 (kHz)")
        .y_desc("eps_log")
        .draw()
        .map_err(plot_error)?;

    for (i, (ring_count, points)) in table.series_by_ring().into_iter().enumerate() {
        let color = Palette99::pick(i).mix(0.9);
        chart
            .draw_series(
                points
                    .into_iter()
                    .map(move |(x, y)| Circle::new((x, y), 5, color.filled())),
            )
            .map_err(plot_error)?
            .label(format!("N_r={}", ring_count))
            .legend(move |(x, y)| Circle::new((x + 10, y), 5, color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_error)?;

    root.present().map_err(plot_error)?;
    Ok(())
}

/// Create `output_dir` if needed, then write the CSV and the plot.
pub fn persist_and_plot(table: &ResultTable, output_dir: &Path) -> Result<SweepArtifacts> {
    fs::create_dir_all(output_dir)?;

    let csv_path = output_dir.join(CSV_FILE_NAME);
    write_csv(table, &csv_path)?;
    info!(path = %csv_path.display(), rows = table.len(), "Wrote result table");

    let plot_path = output_dir.join(PLOT_FILE_NAME);
    render_plot(table, &plot_path)?;
    info!(path = %plot_path.display(), "Wrote scatter plot");

    Ok(SweepArtifacts {
        csv_path,
        plot_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::types::ResultRow;

    fn table() -> ResultTable {
        let mut table = ResultTable::new();
        for n in [3u32, 5] {
            for k in [50.0, 150.0] {
                table
                    .push(ResultRow {
                        ring_count: n,
                        pump_strength_khz: k,
                        logical_error_rate: 0.5 / k,
                    })
                    .unwrap();
            }
        }
        table
    }

    #[test]
    fn test_csv_header_exact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CSV_FILE_NAME);
        write_csv(&table(), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().next().unwrap(), "N_r,kappa2_kHz,eps_log");
        assert_eq!(content.lines().count(), 5);
    }

    #[test]
    fn test_csv_header_written_for_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CSV_FILE_NAME);
        write_csv(&ResultTable::new(), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim_end(), "N_r,kappa2_kHz,eps_log");
    }

    #[test]
    fn test_csv_rows_read_back_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CSV_FILE_NAME);
        let original = table();
        write_csv(&original, &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let rows: Vec<ResultRow> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(rows, original.rows());
    }

    #[test]
    fn test_csv_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CSV_FILE_NAME);
        fs::write(&path, "stale contents that are longer than the new table\n".repeat(20))
            .unwrap();
        write_csv(&ResultTable::new(), &path).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap().trim_end(),
            "N_r,kappa2_kHz,eps_log"
        );
        // No temporary files are left behind
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_csv_readable_by_group_and_others() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CSV_FILE_NAME);
        write_csv(&table(), &path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644, "mode = {:o}", mode);
    }

    #[test]
    fn test_persist_and_plot_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("results");
        let artifacts = persist_and_plot(&table(), &out).unwrap();

        assert_eq!(artifacts.csv_path, out.join(CSV_FILE_NAME));
        assert_eq!(artifacts.plot_path, out.join(PLOT_FILE_NAME));
        let png = fs::read(&artifacts.plot_path).unwrap();
        assert!(png.starts_with(b"\x89PNG"));
    }

    #[test]
    fn test_csv_into_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join(CSV_FILE_NAME);
        assert!(matches!(write_csv(&table(), &path), Err(Error::Io(_))));
    }
}
