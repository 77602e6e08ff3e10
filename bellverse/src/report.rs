//! Console rendering of experiment results.

use std::fmt::{self, Write as _};

use amplimer::BasisLabel;

use crate::harness::ExperimentRecord;
use crate::trial::TrialResult;

/// One console line: `Init:<label> 0s=<n0> 1s=<n1> agree=<na>`, every field left-aligned
/// in a column of four. Single-qubit results print `agree=-`.
///
/// ```
/// use amplimer::BasisLabel;
/// use bellverse::{ReportLine, TrialResult};
///
/// let result = TrialResult { zeros: 12, ones: 988, agreements: Some(1000) };
/// let line = ReportLine::new(BasisLabel::Zero, result);
/// assert_eq!(line.to_string(), "Init:Zero 0s=12   1s=988  agree=1000");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReportLine {
    label: BasisLabel,
    result: TrialResult,
}

impl ReportLine {
    #[must_use]
    pub fn new(label: BasisLabel, result: TrialResult) -> Self {
        ReportLine { label, result }
    }
}

impl fmt::Display for ReportLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let agreements = self
            .result
            .agreements
            .map_or_else(|| "-".to_owned(), |agreements| agreements.to_string());
        write!(
            f,
            "Init:{:<4} 0s={:<4} 1s={:<4} agree={:<4}",
            self.label.to_string(),
            self.result.zeros,
            self.result.ones,
            agreements
        )
    }
}

/// Render records as a report, with a header line before each run of records that share
/// an experiment.
#[must_use]
pub fn render(records: &[ExperimentRecord]) -> String {
    let mut report = String::new();
    let mut current = None;
    for record in records {
        if current != Some(record.experiment) {
            if current.is_some() {
                report.push('\n');
            }
            current = Some(record.experiment);
            let _ = writeln!(report, "{}: {}", record.experiment, record.experiment.description());
        }
        let _ = writeln!(report, "{}", ReportLine::new(record.label, record.result));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Experiment;

    #[test]
    fn single_qubit_lines_show_no_agreement() {
        let result = TrialResult { zeros: 1000, ones: 0, agreements: None };
        assert_eq!(
            ReportLine::new(BasisLabel::One, result).to_string(),
            "Init:One  0s=1000 1s=0    agree=-   "
        );
    }

    #[test]
    fn wide_counts_are_not_truncated() {
        let result = TrialResult { zeros: 50_312, ones: 49_688, agreements: Some(0) };
        assert_eq!(
            ReportLine::new(BasisLabel::Zero, result).to_string(),
            "Init:Zero 0s=50312 1s=49688 agree=0   "
        );
    }

    #[test]
    fn render_groups_lines_under_experiment_headers() {
        let record = |experiment, label, zeros, ones, agreements| ExperimentRecord {
            experiment,
            label,
            result: TrialResult { zeros, ones, agreements },
        };
        let records = [
            record(Experiment::XGate, BasisLabel::Zero, 0, 4, None),
            record(Experiment::XGate, BasisLabel::One, 4, 0, None),
            record(Experiment::BellTest, BasisLabel::Zero, 2, 2, Some(4)),
        ];
        let expected = [
            "XGate: X flips the qubit every time",
            "Init:Zero 0s=0    1s=4    agree=-   ",
            "Init:One  0s=4    1s=0    agree=-   ",
            "",
            "BellTest: H then CX entangles two qubits that always agree",
            "Init:Zero 0s=2    1s=2    agree=4   ",
            "",
        ]
        .join("\n");
        assert_eq!(render(&records), expected);
    }

    #[test]
    fn empty_report_is_empty() {
        assert_eq!(render(&[]), "");
    }
}
