//! Plain-text field exports written during post-processing.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use ld_results::{Grid, ScalarField};

/// Writes one `x_mm,y_mm,z_mm,<quantity>` row per sample. Without a grid the
/// coordinate columns hold sample indices instead.
pub fn write_field_csv(
    path: &Path,
    quantity: &str,
    field: &ScalarField,
    grid: Option<&Grid>,
) -> io::Result<()> {
    if let Some(grid) = grid
        && !field.matches(grid)
    {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "{quantity} field shape {:?} does not match grid {:?}",
                field.shape(),
                grid.shape()
            ),
        ));
    }

    let mut out = BufWriter::new(File::create(path)?);
    match grid {
        Some(_) => writeln!(out, "x_mm,y_mm,z_mm,{quantity}")?,
        None => writeln!(out, "i,j,k,{quantity}")?,
    }

    let (nz, ny, nx) = match field.shape() {
        [nz, ny, nx] => (*nz, *ny, *nx),
        [ny, nx] => (1, *ny, *nx),
        _ => (0, 0, 0),
    };
    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                let Some(v) = field.at(i, j, k) else { continue };
                match grid {
                    Some(g) => writeln!(out, "{},{},{},{v}", g.x(i), g.y(j), g.z(k))?,
                    None => writeln!(out, "{i},{j},{k},{v}")?,
                }
            }
        }
    }
    out.flush()
}
