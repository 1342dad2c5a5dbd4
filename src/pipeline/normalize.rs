//! Schema normalization: drop label columns, first numeric coercion.

use crate::table::Frame;

use super::PROCESS_COLUMN;

/// Columns stripped from every upload before feature assembly: the three
/// prediction targets, plus inputs that are canonical from the operator
/// rather than the upload.
pub const EXCLUDED_COLUMNS: [&str; 6] = [
    "tool_condition",
    "machining_finalized",
    "passed_visual_inspection",
    "material",
    "feedrate",
    "clamp_pressure",
];

/// Drop excluded columns and coerce everything except the process column to
/// numeric. Unparseable cells become missing markers, not errors; the 0-fill
/// happens later, just before scaling.
pub fn normalize(frame: &mut Frame) {
    for name in EXCLUDED_COLUMNS {
        frame.drop_column(name);
    }

    for index in 0..frame.n_cols() {
        if frame.names()[index] == PROCESS_COLUMN {
            continue;
        }
        for cell in frame.cells_mut(index) {
            *cell = cell.coerce_numeric();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    #[test]
    fn test_excluded_columns_are_dropped() {
        let mut frame = Frame::from_csv_str(
            "x1,tool_condition,machining_finalized,passed_visual_inspection,material,feedrate,clamp_pressure\n\
             1,worn,yes,yes,wax,6,4\n",
        )
        .unwrap();
        normalize(&mut frame);
        assert_eq!(frame.names(), &["x1"]);
    }

    #[test]
    fn test_absent_excluded_columns_are_ignored() {
        let mut frame = Frame::from_csv_str("x1,x2\n1,2\n").unwrap();
        normalize(&mut frame);
        assert_eq!(frame.names(), &["x1", "x2"]);
    }

    #[test]
    fn test_numeric_coercion_marks_missing() {
        let mut frame = Frame::from_csv_str("x1,x2\n1.5,N/A\n2,3\n").unwrap();
        normalize(&mut frame);
        assert_eq!(frame.cells(0), &[Cell::Num(1.5), Cell::Num(2.0)]);
        assert_eq!(frame.cells(1), &[Cell::Missing, Cell::Num(3.0)]);
    }

    #[test]
    fn test_process_column_is_not_coerced() {
        let mut frame = Frame::from_csv_str("Machining_Process,x1\nLayer1,7\n").unwrap();
        normalize(&mut frame);
        assert_eq!(frame.cells(0)[0], Cell::Text("Layer1".to_string()));
        assert_eq!(frame.cells(1)[0], Cell::Num(7.0));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let mut frame = Frame::from_csv_str("Feedrate,x1\n6,1\n").unwrap();
        normalize(&mut frame);
        // "Feedrate" is not "feedrate"; it survives as a numeric column.
        assert_eq!(frame.names(), &["Feedrate", "x1"]);
    }
}
