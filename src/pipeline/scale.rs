//! Matrix materialization and standardization.

use ndarray::Array2;

use crate::artifacts::StandardScaler;
use crate::table::Frame;
use crate::Error;

/// Materialize the frame as a purely numeric matrix, one row per record.
///
/// This is the second coercion pass: missing markers and anything still
/// unparseable collapse to 0.0. After this point the data is model
/// territory and carries no missing-value information.
pub fn to_matrix(frame: &Frame) -> Array2<f32> {
    let mut matrix = Array2::zeros((frame.n_rows(), frame.n_cols()));
    for col in 0..frame.n_cols() {
        for (row, cell) in frame.cells(col).iter().enumerate() {
            matrix[[row, col]] = cell.unwrap_or_zero();
        }
    }
    matrix
}

/// Materialize and standardize the assembled frame.
pub fn scale(frame: &Frame, scaler: &StandardScaler) -> Result<Array2<f32>, Error> {
    scaler.transform(&to_matrix(frame))
}
