// Event reporters (EventSink adapters writing to stdout)

use fooddelivery_core::domain::{
    AddedEvent, BrokerEvent, ConsumerKind, KindCounts, RemovedEvent, RequestKind, SummaryEvent,
};
use fooddelivery_core::port::EventSink;
use std::io::Write;
use std::sync::Mutex;
use tracing::warn;

/// `2 PIZ + 1 SAN = 3`
fn counts_line(counts: &KindCounts) -> String {
    let parts: Vec<String> = RequestKind::ALL
        .iter()
        .map(|kind| format!("{} {}", counts[*kind], kind.short_name()))
        .collect();
    format!("{} = {}", parts.join(" + "), counts.total())
}

pub fn format_added(event: &AddedEvent) -> String {
    format!(
        "Broker: {}. Added {}. Produced: {} in {:.3} s.",
        counts_line(&event.in_queue),
        event.kind,
        counts_line(&event.produced),
        event.elapsed_secs
    )
}

pub fn format_removed(event: &RemovedEvent) -> String {
    format!(
        "Broker: {}. {} consumed {}.  {} totals: {} consumed in {:.3} s.",
        counts_line(&event.in_queue),
        event.consumer,
        event.kind,
        event.consumer,
        counts_line(&event.consumed),
        event.elapsed_secs
    )
}

pub fn format_summary(event: &SummaryEvent) -> String {
    let mut out = String::from("\nREQUEST REPORT\n----------------------------------------\n");
    for kind in RequestKind::ALL {
        out.push_str(&format!(
            "{} producer generated {} requests\n",
            kind, event.produced[kind]
        ));
    }
    for consumer in ConsumerKind::ALL {
        out.push_str(&format!(
            "{} consumed {} total\n",
            consumer,
            counts_line(&event.consumed[consumer])
        ));
    }
    out.push_str(&format!("Elapsed time {:.3} s", event.elapsed_secs));
    out
}

/// Writes one line per event in the classic broker report format
pub struct ConsoleReporter<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> ConsoleReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    fn write_line(&self, line: &str) {
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
            warn!(error = %e, "Failed to write report line");
        }
    }

    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> EventSink for ConsoleReporter<W> {
    fn emit(&self, event: &BrokerEvent) {
        let line = match event {
            BrokerEvent::Added(added) => format_added(added),
            BrokerEvent::Removed(removed) => format_removed(removed),
            BrokerEvent::Summary(summary) => format_summary(summary),
        };
        self.write_line(&line);
    }
}

/// Writes each event as a single JSON object line
pub struct JsonReporter<W: Write + Send> {
    inner: ConsoleReporter<W>,
}

impl<W: Write + Send> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            inner: ConsoleReporter::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.inner.into_inner()
    }
}

impl<W: Write + Send> EventSink for JsonReporter<W> {
    fn emit(&self, event: &BrokerEvent) {
        match event.to_json_line() {
            Ok(line) => self.inner.write_line(&line),
            Err(e) => warn!(error = %e, "Failed to encode event"),
        }
    }
}
