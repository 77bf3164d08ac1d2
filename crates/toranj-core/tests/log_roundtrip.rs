//! Sweep log → parser round trip
//!
//! Cells written by the sweep runner must come back out of the results parser
//! unchanged, including across informational lines and failed cells.

use toranj_core::results::{parse_log, ParseOptions};
use toranj_core::sweep::{
    BinaryFamily, MeasurementCell, SweepLog, HEADER, PARAM_VALUES_PREFIX, THREAD_SEQUENCE_PREFIX,
};

fn synthetic_cells() -> Vec<MeasurementCell> {
    let mut cells = Vec::new();
    for (b, binary) in ["stream_chapel", "cpp_stream"].iter().enumerate() {
        for threads in [1u32, 2, 4] {
            for param in [100u64, 1000, 10000] {
                let mut cell = MeasurementCell::new(*binary, BinaryFamily::ProblemSize, threads, param);
                for rep in 0..3 {
                    let time = (param as f64) * 1e-6 / threads as f64 + (b + rep) as f64 * 1e-3;
                    cell.record(time, None);
                }
                cells.push(cell);
            }
        }
    }
    cells
}

#[test]
fn parser_reproduces_logged_cells() {
    let cells = synthetic_cells();
    let mut log = SweepLog::in_memory();
    log.append(format!("{} 1 2 4", THREAD_SEQUENCE_PREFIX)).unwrap();
    log.append(format!("{} 100 1000 10000", PARAM_VALUES_PREFIX)).unwrap();
    log.append(HEADER).unwrap();
    for cell in &cells {
        log.append(cell.to_log_line()).unwrap();
    }

    let table = parse_log(&log.text(), ParseOptions::default()).unwrap();

    assert_eq!(table.len(), cells.len());
    for (row, cell) in table.rows.iter().zip(&cells) {
        assert_eq!(row.key(), (cell.binary.as_str(), cell.threads, cell.param));
        assert_eq!(Some(row.average_time), cell.mean_time());
        assert_eq!(Some(row.stat2), cell.std_dev_time());
    }
}

#[test]
fn failed_cells_are_not_read_back_as_zero() {
    let mut ok = MeasurementCell::new("heat_cpp", BinaryFamily::ProblemSize, 1, 10);
    ok.record(0.5, None);
    let failed = MeasurementCell::new("heat_cpp", BinaryFamily::ProblemSize, 2, 10);

    let text = format!("{}\n{}\n", ok.to_log_line(), failed.to_log_line());
    let table = parse_log(&text, ParseOptions::default()).unwrap();

    assert_eq!(table.len(), 1);
    assert_eq!(table.rows[0].threads, 1);
}

#[test]
fn throughput_cells_round_trip_when_enabled() {
    let mut cell = MeasurementCell::new("gups_cpp", BinaryFamily::Throughput, 4, 8);
    cell.record(0.75, Some(0.0125));
    cell.record(0.25, Some(0.0375));
    let text = cell.to_log_line();

    let skipped = parse_log(&text, ParseOptions::default()).unwrap();
    assert!(skipped.is_empty());

    let table = parse_log(
        &text,
        ParseOptions {
            include_throughput: true,
        },
    )
    .unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(table.rows[0].throughput, cell.mean_throughput());
    assert_eq!(Some(table.rows[0].average_time), cell.mean_time());
}
