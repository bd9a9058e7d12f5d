//! Regular sampling grids and dense scalar fields over them.
//!
//! Storage is row-major with x fastest: `index = (k * ny + j) * nx + i`.
//! A 2-D field has shape `[ny, nx]`, a 3-D field `[nz, ny, nx]` where layer
//! `k = 0` is the irradiated surface.

use ld_core::{LdError, LdResult, max_of, min_of};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "GridRecord")]
pub struct Grid {
    pub nx: usize,
    pub ny: usize,
    #[serde(default = "one")]
    pub nz: usize,
    pub x_range_mm: [f64; 2],
    pub y_range_mm: [f64; 2],
    /// Total sampled depth below the surface, only meaningful when `nz > 1`.
    #[serde(default)]
    pub depth_mm: f64,
}

fn one() -> usize {
    1
}

/// Wire form of [`Grid`]; decoding goes through [`Grid::validate`].
#[derive(Deserialize)]
struct GridRecord {
    nx: usize,
    ny: usize,
    #[serde(default = "one")]
    nz: usize,
    x_range_mm: [f64; 2],
    y_range_mm: [f64; 2],
    #[serde(default)]
    depth_mm: f64,
}

impl TryFrom<GridRecord> for Grid {
    type Error = LdError;

    fn try_from(r: GridRecord) -> LdResult<Self> {
        let grid = Grid {
            nx: r.nx,
            ny: r.ny,
            nz: r.nz,
            x_range_mm: r.x_range_mm,
            y_range_mm: r.y_range_mm,
            depth_mm: r.depth_mm,
        };
        grid.validate()?;
        Ok(grid)
    }
}

fn check_range(range: [f64; 2], what: &'static str) -> LdResult<()> {
    if !range[0].is_finite() || !range[1].is_finite() {
        return Err(LdError::NonFinite {
            what,
            value: if range[0].is_finite() { range[1] } else { range[0] },
        });
    }
    if range[1] <= range[0] {
        return Err(LdError::InvalidArg { what });
    }
    Ok(())
}

impl Grid {
    pub fn new_2d(nx: usize, ny: usize, x_range_mm: [f64; 2], y_range_mm: [f64; 2]) -> LdResult<Self> {
        if nx < 2 || ny < 2 {
            return Err(LdError::InvalidArg {
                what: "grid needs at least 2 samples per axis",
            });
        }
        check_range(x_range_mm, "grid x range")?;
        check_range(y_range_mm, "grid y range")?;
        Ok(Self {
            nx,
            ny,
            nz: 1,
            x_range_mm,
            y_range_mm,
            depth_mm: 0.0,
        })
    }

    /// Extends a surface grid with `nz` layers spanning `depth_mm`.
    pub fn with_layers(mut self, nz: usize, depth_mm: f64) -> LdResult<Self> {
        if nz < 2 {
            return Err(LdError::InvalidArg {
                what: "layered grid needs at least 2 layers",
            });
        }
        if !depth_mm.is_finite() || depth_mm <= 0.0 {
            return Err(LdError::InvalidArg { what: "grid depth" });
        }
        self.nz = nz;
        self.depth_mm = depth_mm;
        Ok(self)
    }

    /// Re-checks what the constructors enforce. Fields are public, so a grid
    /// built by hand or read from disk may violate them.
    pub fn validate(&self) -> LdResult<()> {
        if self.nx < 2 || self.ny < 2 {
            return Err(LdError::InvalidArg {
                what: "grid needs at least 2 samples per axis",
            });
        }
        if self.nz == 0 {
            return Err(LdError::InvalidArg {
                what: "grid needs at least 1 layer",
            });
        }
        check_range(self.x_range_mm, "grid x range")?;
        check_range(self.y_range_mm, "grid y range")?;
        if self.is_3d() && (!self.depth_mm.is_finite() || self.depth_mm <= 0.0) {
            return Err(LdError::InvalidArg { what: "grid depth" });
        }
        Ok(())
    }

    pub fn is_3d(&self) -> bool {
        self.nz > 1
    }

    pub fn shape(&self) -> Vec<usize> {
        if self.is_3d() {
            vec![self.nz, self.ny, self.nx]
        } else {
            vec![self.ny, self.nx]
        }
    }

    pub fn len(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dx(&self) -> f64 {
        (self.x_range_mm[1] - self.x_range_mm[0]) / (self.nx - 1) as f64
    }

    pub fn dy(&self) -> f64 {
        (self.y_range_mm[1] - self.y_range_mm[0]) / (self.ny - 1) as f64
    }

    pub fn x(&self, i: usize) -> f64 {
        self.x_range_mm[0] + self.dx() * i as f64
    }

    pub fn y(&self, j: usize) -> f64 {
        self.y_range_mm[0] + self.dy() * j as f64
    }

    /// Depth of layer `k` below the surface, mm.
    pub fn z(&self, k: usize) -> f64 {
        k as f64 * self.cell_depth_mm()
    }

    pub fn cell_area_mm2(&self) -> f64 {
        self.dx() * self.dy()
    }

    pub fn cell_depth_mm(&self) -> f64 {
        if self.is_3d() {
            self.depth_mm / (self.nz - 1) as f64
        } else {
            0.0
        }
    }

    /// Samples `f(x, y, z)` at every grid point.
    pub fn sample<F>(&self, mut f: F) -> ScalarField
    where
        F: FnMut(f64, f64, f64) -> f64,
    {
        let mut values = Vec::with_capacity(self.len());
        for k in 0..self.nz {
            let z = self.z(k);
            for j in 0..self.ny {
                let y = self.y(j);
                for i in 0..self.nx {
                    values.push(f(self.x(i), y, z));
                }
            }
        }
        ScalarField {
            shape: self.shape(),
            values,
        }
    }

    /// Nearest sample to a surface point.
    pub fn nearest(&self, x_mm: f64, y_mm: f64) -> (usize, usize) {
        let snap = |v: f64, lo: f64, d: f64, n: usize| -> usize {
            let idx = ((v - lo) / d).round();
            idx.clamp(0.0, (n - 1) as f64) as usize
        };
        (
            snap(x_mm, self.x_range_mm[0], self.dx(), self.nx),
            snap(y_mm, self.y_range_mm[0], self.dy(), self.ny),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScalarField {
    shape: Vec<usize>,
    values: Vec<f64>,
}

impl ScalarField {
    pub fn new(shape: Vec<usize>, values: Vec<f64>) -> LdResult<Self> {
        if shape.len() != 2 && shape.len() != 3 {
            return Err(LdError::InvalidArg {
                what: "field must be 2-D or 3-D",
            });
        }
        let expected: usize = shape.iter().product();
        if expected != values.len() {
            return Err(LdError::ShapeMismatch {
                what: "scalar field",
                expected,
                actual: values.len(),
            });
        }
        Ok(Self { shape, values })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_3d(&self) -> bool {
        self.shape.len() == 3
    }

    pub fn max(&self) -> Option<f64> {
        max_of(&self.values)
    }

    pub fn min(&self) -> Option<f64> {
        min_of(&self.values)
    }

    pub fn max_abs(&self) -> Option<f64> {
        self.values.iter().map(|v| v.abs()).reduce(f64::max)
    }

    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }

    pub fn map<F>(&self, f: F) -> ScalarField
    where
        F: Fn(f64) -> f64,
    {
        ScalarField {
            shape: self.shape.clone(),
            values: self.values.iter().map(|v| f(*v)).collect(),
        }
    }

    pub fn count_where<P>(&self, pred: P) -> usize
    where
        P: Fn(f64) -> bool,
    {
        self.values.iter().filter(|v| pred(**v)).count()
    }

    /// Value at surface sample `(i, j)` of layer `k`.
    pub fn at(&self, i: usize, j: usize, k: usize) -> Option<f64> {
        let (nz, ny, nx) = self.dims();
        if i >= nx || j >= ny || k >= nz {
            return None;
        }
        self.values.get((k * ny + j) * nx + i).copied()
    }

    /// Horizontal slices, surface first. A 2-D field has exactly one.
    pub fn layers(&self) -> std::slice::Chunks<'_, f64> {
        let (_, ny, nx) = self.dims();
        self.values.chunks((nx * ny).max(1))
    }

    fn dims(&self) -> (usize, usize, usize) {
        match self.shape.as_slice() {
            [nz, ny, nx] => (*nz, *ny, *nx),
            [ny, nx] => (1, *ny, *nx),
            _ => (0, 0, 0),
        }
    }

    /// Whether this field can live on `grid`.
    pub fn matches(&self, grid: &Grid) -> bool {
        self.shape == grid.shape()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_grid() -> Grid {
        Grid::new_2d(11, 11, [0.0, 10.0], [0.0, 10.0]).unwrap()
    }

    #[test]
    fn coordinates_span_the_range() {
        let g = unit_grid();
        assert_eq!(g.x(0), 0.0);
        assert_eq!(g.x(10), 10.0);
        assert_eq!(g.y(5), 5.0);
        assert_eq!(g.cell_area_mm2(), 1.0);
        assert_eq!(g.cell_depth_mm(), 0.0);
    }

    #[test]
    fn sample_is_row_major_x_fastest() {
        let g = unit_grid();
        let f = g.sample(|x, y, _| x + 100.0 * y);
        assert_eq!(f.shape(), &[11, 11]);
        assert_eq!(f.at(3, 2, 0), Some(203.0));
        assert_eq!(f.values()[2 * 11 + 3], 203.0);
    }

    #[test]
    fn layered_grid_samples_depth() {
        let g = unit_grid().with_layers(5, 2.0).unwrap();
        assert_eq!(g.shape(), vec![5, 11, 11]);
        assert_eq!(g.cell_depth_mm(), 0.5);
        let f = g.sample(|_, _, z| z);
        assert_eq!(f.layers().count(), 5);
        assert_eq!(f.at(0, 0, 4), Some(2.0));
    }

    #[test]
    fn degenerate_grids_are_rejected() {
        assert!(Grid::new_2d(1, 10, [0.0, 1.0], [0.0, 1.0]).is_err());
        assert!(Grid::new_2d(10, 10, [1.0, 1.0], [0.0, 1.0]).is_err());
        assert!(Grid::new_2d(10, 10, [0.0, f64::NAN], [0.0, 1.0]).is_err());
    }

    #[test]
    fn decoding_rejects_degenerate_grids() {
        let ok = serde_json::to_string(&unit_grid()).unwrap();
        let back: Grid = serde_json::from_str(&ok).unwrap();
        assert_eq!(back, unit_grid());

        let zero_nx = r#"{"nx":0,"ny":11,"x_range_mm":[0,10],"y_range_mm":[0,10]}"#;
        assert!(serde_json::from_str::<Grid>(zero_nx).is_err());
        let flat_depth = r#"{"nx":3,"ny":3,"nz":4,"x_range_mm":[0,1],"y_range_mm":[0,1]}"#;
        assert!(serde_json::from_str::<Grid>(flat_depth).is_err());
    }

    #[test]
    fn hand_built_grid_fails_validation() {
        let mut g = unit_grid();
        g.validate().unwrap();
        g.ny = 1;
        assert!(g.validate().is_err());
    }

    #[test]
    fn field_shape_must_match_values() {
        let err = ScalarField::new(vec![2, 3], vec![0.0; 5]).unwrap_err();
        assert!(matches!(err, LdError::ShapeMismatch { expected: 6, actual: 5, .. }));
    }

    #[test]
    fn extrema_and_counts() {
        let f = ScalarField::new(vec![2, 2], vec![1.0, -4.0, 3.0, 2.0]).unwrap();
        assert_eq!(f.max(), Some(3.0));
        assert_eq!(f.min(), Some(-4.0));
        assert_eq!(f.max_abs(), Some(4.0));
        assert_eq!(f.count_where(|v| v > 1.5), 2);
        assert!(f.is_finite());
    }

    #[test]
    fn nearest_snaps_to_grid() {
        let g = unit_grid();
        assert_eq!(g.nearest(5.2, 4.6), (5, 5));
        assert_eq!(g.nearest(-3.0, 42.0), (0, 10));
    }
}
