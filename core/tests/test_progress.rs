// Progress events, phase names, throttling, and per-run timing.

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::time::Duration;

    use pixelvault_core::progress::{Phase, PhaseTimes, ProgressEvent, ProgressReporter};

    #[test]
    fn phase_wire_names() {
        let names: Vec<&str> = Phase::EXPORT.iter().map(Phase::as_str).collect();
        assert_eq!(names, ["stringify", "encrypt", "pack", "encodePNG", "writeFile"]);
        let names: Vec<String> = Phase::IMPORT.iter().map(|p| p.to_string()).collect();
        assert_eq!(names, ["readFile", "decodePNG", "unpack", "decrypt", "parseJSON"]);
        assert_eq!(serde_json::to_string(&Phase::Done).unwrap(), "\"done\"");
    }

    #[test]
    fn event_percent_and_clamping() {
        let e = ProgressEvent::new(Phase::Pack, 25, 100);
        assert_eq!(e.percent, 25.0);
        assert!(!e.is_complete());

        let e = ProgressEvent::new(Phase::Pack, 150, 100);
        assert_eq!(e.processed_bytes, 100);
        assert_eq!(e.percent, 100.0);

        let e = ProgressEvent::new(Phase::Stringify, 0, 0);
        assert_eq!(e.percent, 100.0);
        assert!(e.is_complete());
    }

    #[test]
    fn event_serializes_camel_case() {
        let e = ProgressEvent::new(Phase::EncodePng, 1, 2);
        let v: serde_json::Value = serde_json::to_value(&e).unwrap();
        assert_eq!(v["phase"], "encodePNG");
        assert_eq!(v["processedBytes"], 1);
        assert_eq!(v["totalBytes"], 2);
        assert_eq!(v["percent"], 50.0);
    }

    #[test]
    fn completion_is_emitted_once_per_phase() {
        let events = RefCell::new(Vec::new());
        let mut r = ProgressReporter::new(|e: &ProgressEvent| events.borrow_mut().push(e.clone()))
            .with_min_interval(Duration::ZERO);
        r.report(Phase::Unpack, 5, 10);
        r.complete(Phase::Unpack, 10);
        r.complete(Phase::Unpack, 10);
        r.report(Phase::Unpack, 3, 10);
        assert!(r.is_phase_complete(Phase::Unpack));
        drop(r);

        let events = events.into_inner();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].percent, 100.0);
    }

    #[test]
    fn done_report_finishes_the_run() {
        let phases = RefCell::new(Vec::new());
        let mut r = ProgressReporter::new(|e: &ProgressEvent| phases.borrow_mut().push(e.phase))
            .with_min_interval(Duration::ZERO);
        r.complete(Phase::Decrypt, 4);
        r.report(Phase::Done, 4, 4);
        assert!(!r.is_phase_complete(Phase::Decrypt));
        assert!(r.phase_times().contains(Phase::Decrypt));
        drop(r);
        assert_eq!(phases.into_inner(), vec![Phase::Decrypt, Phase::Done]);
    }

    #[test]
    fn default_interval_throttles() {
        let r = ProgressReporter::silent();
        assert_eq!(r.min_interval(), Duration::from_millis(16));
    }

    #[test]
    fn phase_times_accumulate() {
        let mut t = PhaseTimes::default();
        assert!(t.is_empty());
        t.add(Phase::Encrypt, Duration::from_millis(3));
        t.add(Phase::Encrypt, Duration::from_millis(2));
        t.add(Phase::Pack, Duration::from_millis(1));
        assert_eq!(t.get(Phase::Encrypt), Duration::from_millis(5));
        assert_eq!(t.get(Phase::Unpack), Duration::ZERO);
        assert_eq!(t.total(), Duration::from_millis(6));
        assert!((t.get_ms(Phase::Pack) - 1.0).abs() < 1e-9);
        assert_eq!((&t).into_iter().count(), 2);
    }
}
