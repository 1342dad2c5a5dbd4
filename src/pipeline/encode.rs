//! Categorical encoding of the machining process column.

use crate::artifacts::ProcessEncoder;
use crate::table::{Cell, Frame};
use crate::Error;

use super::PROCESS_COLUMN;

/// Replace the process column with the encoder's class indices, in place.
///
/// Returns whether encoding ran. An upload without the process column is a
/// degraded path, not an error: a warning is logged and the column-less
/// frame flows forward. A process value outside the fitted vocabulary fails
/// the request.
pub fn encode_process(frame: &mut Frame, encoder: &ProcessEncoder) -> Result<bool, Error> {
    let index = match frame.position(PROCESS_COLUMN) {
        Some(index) => index,
        None => {
            log::warn!(
                "'{}' column not found in upload, predicting without it",
                PROCESS_COLUMN
            );
            return Ok(false);
        }
    };

    let encoded = frame
        .cells(index)
        .iter()
        .map(|cell| match cell {
            Cell::Text(value) => encoder.encode(value).map(Cell::Num),
            Cell::Missing => Err(Error::UnknownCategory(format!(
                "missing {} value",
                PROCESS_COLUMN
            ))),
            Cell::Num(value) => Err(Error::UnknownCategory(format!(
                "numeric {} value: {}",
                PROCESS_COLUMN, value
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    for (slot, cell) in frame.cells_mut(index).iter_mut().zip(encoded) {
        *slot = cell;
    }
    Ok(true)
}
