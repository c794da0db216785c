//! Observation file parsing: fixed-column RINEX convention.
use log::{debug, warn};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use crate::prelude::{Constellation, Epoch, TimeScale, Vector3, SV};

/// Observation file header: metadata lines kept verbatim for
/// traceability, plus the advertised approximate receiver position.
#[derive(Debug, Default, Clone)]
pub struct ObservationHeader {
    /// Header lines, in file order, up to and including "END OF HEADER"
    pub lines: Vec<String>,
    /// "APPROX POSITION XYZ" content [m ECEF], when advertised
    pub approx_position: Option<Vector3<f64>>,
}

/// One observation epoch. The per satellite vectors are parallel:
/// index i refers to the same satellite across all of them.
#[derive(Debug, Default, Clone)]
pub struct ObservationRecord {
    /// Receiver timestamp
    pub epoch: Epoch,
    /// Epoch status flag
    pub status_flag: u8,
    /// Satellite count announced by the epoch line. GPS vehicles only
    /// are retained, so the vectors below may be shorter than this.
    pub sum_sat: usize,
    /// Satellite identifiers
    pub sv: Vec<SV>,
    /// Code pseudorange, L1 [m]
    pub pseudorange_c1c: Vec<f64>,
    /// Code pseudorange, L2 [m]
    pub pseudorange_c2p: Vec<f64>,
    /// Carrier phase, L1 [cycles]
    pub phase_l1c: Vec<f64>,
    /// Carrier phase, L2 [cycles]
    pub phase_l2p: Vec<f64>,
}

/// Parsed observation file: header plus epochs in file order.
/// Immutable once constructed.
#[derive(Debug, Default, Clone)]
pub struct ObservationData {
    pub header: ObservationHeader,
    pub records: Vec<ObservationRecord>,
}

/// Fixed-column field extraction: offsets are absolute in the line,
/// independent of surrounding whitespace. Short or truncated lines
/// yield an empty field.
fn field(line: &str, offset: usize, width: usize) -> &str {
    let end = (offset + width).min(line.len());
    line.get(offset..end).unwrap_or("")
}

/// Lenient fixed-column float: malformed content decays to 0.0
fn field_f64(line: &str, offset: usize, width: usize) -> f64 {
    field(line, offset, width).trim().parse().unwrap_or(0.0)
}

/// Lenient fixed-column integer: malformed content decays to 0
fn field_int(line: &str, offset: usize, width: usize) -> i32 {
    field(line, offset, width).trim().parse().unwrap_or(0)
}

impl ObservationData {
    /// Parses an observation file. A path whose (case insensitive)
    /// suffix is not "o" is not an observation file: this yields empty
    /// data, not an error. So does an unreadable file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let is_observation = path
            .to_str()
            .map(|s| s.to_lowercase().ends_with('o'))
            .unwrap_or(false);
        if !is_observation {
            debug!("{} : not an observation file", path.display());
            return Self::default();
        }
        match File::open(path) {
            Ok(file) => Self::from_reader(BufReader::new(file)),
            Err(e) => {
                warn!("{} : {}", path.display(), e);
                Self::default()
            },
        }
    }

    /// Parses observation content from any readable stream.
    /// Parsing is lenient by design: malformed numeric fields decay to
    /// zero and a truncated stream yields a shorter record sequence.
    /// This never fails.
    pub fn from_reader<R: BufRead>(reader: R) -> Self {
        let mut data = Self::default();
        let mut lines = reader.lines();

        // header phase: verbatim accumulation
        while let Some(Ok(line)) = lines.next() {
            data.header.lines.push(line.clone());
            if field(&line, 60, 13) == "END OF HEADER" {
                break;
            }
            if field(&line, 60, 19) == "APPROX POSITION XYZ" {
                data.header.approx_position = Some(Vector3::new(
                    field_f64(&line, 1, 13),
                    field_f64(&line, 15, 13),
                    field_f64(&line, 29, 13),
                ));
            }
        }

        // record phase
        'records: while let Some(Ok(line)) = lines.next() {
            if line.is_empty() {
                break;
            }

            let mut record = ObservationRecord {
                epoch: parse_epoch(&line),
                status_flag: field_int(&line, 29, 3).max(0) as u8,
                sum_sat: field_int(&line, 32, 3).max(0) as usize,
                ..Default::default()
            };

            for _ in 0..record.sum_sat {
                let line = match lines.next() {
                    Some(Ok(line)) => line,
                    _ => {
                        // truncated mid epoch: keep what we have
                        data.records.push(record);
                        break 'records;
                    },
                };
                let id = field(&line, 0, 3).trim();
                if id.is_empty() {
                    continue;
                }
                let sv = match SV::from_str(id) {
                    Ok(sv) if sv.constellation == Constellation::GPS => sv,
                    // other constellations: line consumed (stream stays
                    // aligned) but measurements dropped
                    _ => continue,
                };
                record.sv.push(sv);
                record.pseudorange_c1c.push(field_f64(&line, 3, 14));
                record.pseudorange_c2p.push(field_f64(&line, 19, 14));
                record.phase_l1c.push(field_f64(&line, 51, 14));
                record.phase_l2p.push(field_f64(&line, 67, 14));
            }

            data.records.push(record);
        }

        debug!(
            "parsed {} header lines, {} records",
            data.header.lines.len(),
            data.records.len()
        );
        data
    }
}

/// Epoch line timestamp, sub-second precision preserved.
/// Unparsable date fields decay to the default Epoch (leniency).
fn parse_epoch(line: &str) -> Epoch {
    let year = field_int(line, 1, 5);
    let month = field_int(line, 6, 3) as u8;
    let day = field_int(line, 9, 3) as u8;
    let hour = field_int(line, 12, 3) as u8;
    let minute = field_int(line, 15, 3) as u8;
    let second = field_f64(line, 18, 11);
    let nanos = ((second - second.floor()) * 1.0E9).round() as u32;
    Epoch::maybe_from_gregorian(
        year,
        month,
        day,
        hour,
        minute,
        second.floor() as u8,
        nanos,
        TimeScale::GPST,
    )
    .unwrap_or_default()
}
