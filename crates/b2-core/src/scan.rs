//! Sequential read-filter-reduce scan over a decay record stream.
//!
//! The scan walks the stream exactly once in file order: every record is
//! counted, muon-tagged records are skipped, and the remaining records'
//! candidate fields are folded into one double-precision sum. A progress
//! line is written after every 100,000th record.

use std::io::Write;

use crate::error::Result;
use crate::event::Event;

/// Number of records between progress lines.
pub const PROGRESS_INTERVAL: u64 = 100_000;

/// Accumulation rule applied to records that pass the muon filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanMode {
    /// Sum px, py, pz, prob_k, prob_pi and charge of all three candidates.
    #[default]
    Full,
    /// Sum only H1's px, for reduced-read plotting runs.
    PlotOnly,
}

/// Aggregate of one scan run.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct ScanSummary {
    /// Total records observed.
    pub events: u64,
    /// Records excluded by the muon filter.
    pub skipped: u64,
    /// Accumulated sum over the non-skipped records.
    pub sum: f64,
}

impl ScanSummary {
    /// Write the final report line:
    /// `finished (<events> events), result: <sum>, skipped: <skipped>`.
    pub fn write_report<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(
            out,
            "finished ({} events), result: {:.6}, skipped: {}",
            self.events, self.sum, self.skipped
        )
    }
}

/// Scan a record stream to exhaustion.
///
/// Records are consumed exactly once, in order. For each record the scan
/// increments the event count, emits a progress line on every
/// [`PROGRESS_INTERVAL`]th record, and either skips the record (any muon
/// tag set, in both modes) or folds it into the sum per `mode`.
///
/// An `Err` item from the stream aborts the scan and propagates.
pub fn scan_events<I, W>(events: I, mode: ScanMode, progress: &mut W) -> Result<ScanSummary>
where
    I: IntoIterator<Item = Result<Event>>,
    W: Write,
{
    let mut count: u64 = 0;
    let mut skipped: u64 = 0;
    let mut sum = 0.0f64;

    for event in events {
        let event = event?;
        count += 1;
        if count % PROGRESS_INTERVAL == 0 {
            writeln!(progress, "Processed {} k events", count / 1000)?;
        }

        if event.has_muon() {
            skipped += 1;
            continue;
        }

        sum += match mode {
            ScanMode::Full => event.kinematic_sum(),
            ScanMode::PlotOnly => event.h1().px,
        };
    }

    tracing::debug!(events = count, skipped, "scan drained");
    Ok(ScanSummary { events: count, skipped, sum })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::event::KaonCandidate;
    use approx::assert_relative_eq;

    fn plain_event(px: f64) -> Event {
        let slot = KaonCandidate {
            px,
            py: 1.0,
            pz: 2.0,
            prob_k: 0.1,
            prob_pi: 0.2,
            charge: 1,
            ..Default::default()
        };
        Event::new(slot, slot, slot)
    }

    fn muon_event() -> Event {
        let mut event = plain_event(7.0);
        event.candidates[1].is_muon = 1;
        event
    }

    fn scan_ok(events: Vec<Event>, mode: ScanMode) -> (ScanSummary, String) {
        let mut progress = Vec::new();
        let summary =
            scan_events(events.into_iter().map(Ok), mode, &mut progress).unwrap();
        (summary, String::from_utf8(progress).unwrap())
    }

    #[test]
    fn empty_stream_reports_zeros() {
        let (summary, progress) = scan_ok(vec![], ScanMode::Full);
        assert_eq!(summary, ScanSummary { events: 0, skipped: 0, sum: 0.0 });
        assert!(progress.is_empty());

        let mut report = Vec::new();
        summary.write_report(&mut report).unwrap();
        assert_eq!(
            String::from_utf8(report).unwrap(),
            "finished (0 events), result: 0.000000, skipped: 0\n"
        );
    }

    #[test]
    fn muon_records_are_skipped_not_summed() {
        let (summary, _) = scan_ok(vec![muon_event(); 4], ScanMode::Full);
        assert_eq!(summary.events, 4);
        assert_eq!(summary.skipped, 4);
        assert_eq!(summary.sum, 0.0);
    }

    #[test]
    fn single_muon_tag_excludes_whole_record() {
        // H2 tagged alone: the record is skipped no matter what H1/H3 hold.
        let mut event = plain_event(1e6);
        event.candidates[1].is_muon = 1;
        let (summary, _) = scan_ok(vec![event, plain_event(1.0)], ScanMode::Full);
        assert_eq!(summary.events, 2);
        assert_eq!(summary.skipped, 1);
        assert_relative_eq!(summary.sum, plain_event(1.0).kinematic_sum());
    }

    #[test]
    fn plot_only_sums_h1_px_alone() {
        let mut event = plain_event(5.0);
        event.candidates[1].px = 123.0;
        event.candidates[2].px = 456.0;
        let (summary, _) = scan_ok(vec![event], ScanMode::PlotOnly);
        assert_relative_eq!(summary.sum, 5.0);
    }

    #[test]
    fn progress_fires_exactly_on_interval() {
        let (_, progress) = scan_ok(vec![plain_event(0.0); 99_999], ScanMode::Full);
        assert!(progress.is_empty());

        let (_, progress) = scan_ok(vec![plain_event(0.0); 100_000], ScanMode::Full);
        assert_eq!(progress, "Processed 100 k events\n");

        let (_, progress) = scan_ok(vec![plain_event(0.0); 100_001], ScanMode::Full);
        assert_eq!(progress, "Processed 100 k events\n");
    }

    #[test]
    fn progress_counts_skipped_records_too() {
        let mut events = vec![muon_event(); 50_000];
        events.extend(vec![plain_event(1.0); 150_000]);
        let (summary, progress) = scan_ok(events, ScanMode::Full);
        assert_eq!(summary.events, 200_000);
        assert_eq!(summary.skipped, 50_000);
        assert_eq!(progress, "Processed 100 k events\nProcessed 200 k events\n");
    }

    #[test]
    fn stream_error_propagates() {
        let events: Vec<crate::Result<Event>> = vec![
            Ok(plain_event(1.0)),
            Err(Error::Container("truncated page".into())),
            Ok(plain_event(2.0)),
        ];
        let mut progress: Vec<u8> = Vec::new();
        let err = scan_events(events, ScanMode::Full, &mut progress).unwrap_err();
        assert!(matches!(err, Error::Container(_)));
    }

    #[test]
    fn report_uses_fixed_six_digit_sum() {
        let summary = ScanSummary { events: 2, skipped: 1, sum: 12.5 };
        let mut report = Vec::new();
        summary.write_report(&mut report).unwrap();
        assert_eq!(
            String::from_utf8(report).unwrap(),
            "finished (2 events), result: 12.500000, skipped: 1\n"
        );
    }
}
