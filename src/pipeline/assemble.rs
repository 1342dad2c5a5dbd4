//! Feature assembly: append the operator inputs as columns.

use crate::table::Frame;
use crate::UserInputs;

use super::{CLAMP_PRESSURE_COLUMN, FEED_RATE_COLUMN};

/// Write the operator's feed rate and clamp pressure into every row. The
/// values are canonical: same-named columns that survived normalization are
/// overwritten, otherwise the columns are appended at the end.
pub fn assemble(frame: &mut Frame, inputs: &UserInputs) {
    frame.set_scalar(FEED_RATE_COLUMN, inputs.feed_rate);
    frame.set_scalar(CLAMP_PRESSURE_COLUMN, inputs.clamp_pressure);
}
