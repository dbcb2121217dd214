//! End-to-end report assembly over realistic report documents.
//!
//! Each test decodes a JSON document shaped like the report service's
//! output and checks the full message sequence produced for a fixed `now`.

#![allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::panic)]

use chrono::NaiveDateTime;
use moonbot_core::{LedgerWindow, OreVariantTable, ReportContext, build_report};
use moonbot_types::{
    ExtractionId, MessageKind, OreTypeId, ReportField, ReportId, ReportMessage, decode_document,
    parse_timestamp,
};
use rust_decimal_macros::dec;
use serde_json::{Value, json};

fn ts(raw: &str) -> NaiveDateTime {
    parse_timestamp("test", raw).unwrap()
}

fn ctx() -> ReportContext {
    ReportContext {
        table: OreVariantTable::builtin().unwrap(),
        window: LedgerWindow::default(),
    }
}

fn content(type_id: u32, group_id: u32, name: &str, rate: &str) -> Value {
    json!({
        "typeID": type_id,
        "groupID": group_id,
        "typeName": name,
        "volume": 10,
        "pivot": { "moon_id": 40_000_001, "type_id": type_id, "rate": rate }
    })
}

fn record(id: u64, start: &str, arrival: &str, ores: Vec<Value>) -> Value {
    json!({
        "id": id,
        "moon_id": 40_000_000 + id,
        "extraction_start_time": start,
        "chunk_arrival_time": arrival,
        "natural_decay_time": arrival,
        "moon": {
            "moon_id": 40_000_000 + id,
            "name": format!("Perimeter II - Moon {id}"),
            "moon_report": { "content": ores }
        },
        "structure": null,
        "observer": null
    })
}

fn run(doc: &Value, now: &str) -> Vec<ReportMessage> {
    let records = decode_document(&serde_json::to_vec(doc).unwrap()).unwrap();
    build_report(ReportId::new(), &records, &ctx(), ts(now))
}

fn kinds(messages: &[ReportMessage]) -> Vec<MessageKind> {
    messages.iter().map(|m| m.kind).collect()
}

#[test]
fn mixed_document_produces_full_sequence() {
    let mut active = record(
        1,
        "2021-08-18 01:28:18",
        "2021-08-19 01:28:18",
        vec![content(45_490, 1884, "Zeolites", "0.5")],
    );
    active["structure"] = json!({
        "structure_id": 1_035_466_617_946_i64,
        "info": { "structure_id": 1_035_466_617_946_i64, "name": "Perimeter - Moon Drill" }
    });
    active["observer"] = json!({
        "observer_id": 1_035_466_617_946_i64,
        "entries": [
            { "type_id": 46_280, "quantity": 4_000, "last_updated": "2021-08-19" },
            { "type_id": 45_490, "quantity": 8_000, "last_updated": "2021-08-19" }
        ]
    });

    let upcoming = record(
        2,
        "2021-08-20 00:00:00",
        "2021-08-27 00:00:00",
        vec![
            content(45_490, 1884, "Zeolites", "0.4"),
            content(45_513, 1923, "Ytterbite", "0.2"),
            content(45_502, 1922, "Carnotite", "0.3"),
        ],
    );

    let messages = run(&json!([upcoming, active]), "2021-08-19 18:00:00");
    assert_eq!(
        kinds(&messages),
        vec![
            MessageKind::Running,
            MessageKind::Active,
            MessageKind::Upcoming,
            MessageKind::Complete
        ]
    );
    assert!(messages.iter().all(|m| m.report_id == messages[0].report_id));
    assert_eq!(messages[3].footer.as_deref(), Some("MoonBot by Crypta Electrica"));

    let ReportField::Active(field) = &messages[1].fields[0] else {
        panic!("expected active field");
    };
    assert_eq!(field.extraction_id, ExtractionId(1));
    assert_eq!(field.label, "Perimeter - Moon Drill");
    assert_eq!(field.theoretical_volume, 480_000);
    assert!(!field.implausible_timing);
    assert_eq!(field.ores.len(), 1);
    assert_eq!(field.ores[0].type_id, OreTypeId(45_490));
    assert_eq!(field.ores[0].mined_units, 12_000);
    assert_eq!(field.ores[0].remaining, dec!(360000));
    assert_eq!(field.ores[0].remaining_pct, Some(dec!(75)));

    let ReportField::Upcoming(field) = &messages[2].fields[0] else {
        panic!("expected upcoming field");
    };
    assert_eq!(field.label, "Perimeter II - Moon 2");
    assert_eq!(field.chunk_arrival, ts("2021-08-27 00:00:00"));
    assert_eq!(field.ores, vec!["Ytterbite", "Carnotite", "Zeolites"]);
}

#[test]
fn only_upcoming_omits_active_message() {
    let doc = json!([record(
        1,
        "2021-08-20 00:00:00",
        "2021-08-27 00:00:00",
        vec![content(45_490, 1884, "Zeolites", "1")],
    )]);
    let messages = run(&doc, "2021-08-21 00:00:00");
    assert_eq!(
        kinds(&messages),
        vec![MessageKind::Running, MessageKind::Upcoming, MessageKind::Complete]
    );
}

#[test]
fn empty_document_still_brackets_report() {
    let messages = run(&json!([]), "2021-08-21 00:00:00");
    assert_eq!(kinds(&messages), vec![MessageKind::Running, MessageKind::Complete]);
}

#[test]
fn upcoming_fields_are_ordered_by_arrival() {
    let doc = json!([
        record(1, "2021-08-01 00:00:00", "2021-08-30 00:00:00", vec![]),
        record(2, "2021-08-01 00:00:00", "2021-08-25 00:00:00", vec![]),
        record(3, "2021-08-01 00:00:00", "2021-08-28 00:00:00", vec![]),
    ]);
    let messages = run(&doc, "2021-08-21 00:00:00");
    let ids: Vec<u64> = messages[1]
        .fields
        .iter()
        .map(|f| match f {
            ReportField::Upcoming(u) => u.extraction_id.into_inner(),
            ReportField::Active(a) => a.extraction_id.into_inner(),
        })
        .collect();
    assert_eq!(ids, vec![2, 3, 1]);
}

#[test]
fn records_with_bad_timestamps_are_skipped() {
    let mut broken = record(1, "2021-08-01 00:00:00", "2021-08-25 00:00:00", vec![]);
    broken["chunk_arrival_time"] = json!("25/08/2021");
    let good = record(2, "2021-08-01 00:00:00", "2021-08-25 00:00:00", vec![]);

    let messages = run(&json!([broken, good]), "2021-08-21 00:00:00");
    assert_eq!(messages[1].kind, MessageKind::Upcoming);
    assert_eq!(messages[1].fields.len(), 1);
}

#[test]
fn same_now_gives_same_report_body() {
    let doc = json!([record(
        1,
        "2021-08-18 01:28:18",
        "2021-08-19 01:28:18",
        vec![content(45_490, 1884, "Zeolites", "0.5"), content(45_506, 1922, "Cinnabar", "0.25")],
    )]);
    let records = decode_document(&serde_json::to_vec(&doc).unwrap()).unwrap();
    let id = ReportId::new();
    let now = ts("2021-08-19 02:00:00");
    assert_eq!(
        build_report(id, &records, &ctx(), now),
        build_report(id, &records, &ctx(), now)
    );
}

#[test]
fn null_rate_and_ledger_timestamp_skip_only_their_rows() {
    let mut active = record(
        1,
        "2021-08-18 01:28:18",
        "2021-08-19 01:28:18",
        vec![
            content(45_490, 1884, "Zeolites", "0.5"),
            content(45_506, 1922, "Cinnabar", "0.25"),
        ],
    );
    active["moon"]["moon_report"]["content"][1]["pivot"]["rate"] = Value::Null;
    active["observer"] = json!({
        "observer_id": 1_035_466_617_946_i64,
        "entries": [
            { "type_id": 45_490, "quantity": 8_000, "last_updated": "2021-08-19" },
            { "type_id": 45_490, "quantity": 4_000, "last_updated": null }
        ]
    });

    let messages = run(&json!([active]), "2021-08-19 18:00:00");
    assert_eq!(
        kinds(&messages),
        vec![MessageKind::Running, MessageKind::Active, MessageKind::Complete]
    );

    let ReportField::Active(field) = &messages[1].fields[0] else {
        panic!("expected active field");
    };
    assert!(!field.reconcile_failed);
    assert_eq!(field.theoretical_volume, 480_000);
    assert_eq!(field.ores.len(), 1);
    assert_eq!(field.ores[0].type_id, OreTypeId(45_490));
    assert_eq!(field.ores[0].mined_units, 8_000);
    assert_eq!(field.ores[0].remaining, dec!(400000));
}

#[test]
fn unreconcilable_active_extraction_stays_listed() {
    let mut active = record(
        1,
        "2021-08-18 01:28:18",
        "2021-08-19 01:28:18",
        vec![content(45_490, 1884, "Zeolites", "0.5")],
    );
    active["moon"]["moon_report"]["content"][0]["volume"] = json!("100000000000000000000");
    active["observer"] = json!({
        "observer_id": 1_035_466_617_946_i64,
        "entries": [
            { "type_id": 45_490, "quantity": u64::MAX, "last_updated": "2021-08-19" }
        ]
    });
    let healthy = record(
        2,
        "2021-08-18 01:28:18",
        "2021-08-19 02:28:18",
        vec![content(45_490, 1884, "Zeolites", "0.5")],
    );

    let messages = run(&json!([active, healthy]), "2021-08-19 18:00:00");
    assert_eq!(messages[1].kind, MessageKind::Active);
    assert_eq!(messages[1].fields.len(), 2);

    let ReportField::Active(failed) = &messages[1].fields[0] else {
        panic!("expected active field");
    };
    assert_eq!(failed.extraction_id, ExtractionId(1));
    assert!(failed.reconcile_failed);
    assert!(failed.ores.is_empty());
    assert_eq!(failed.label, "Perimeter II - Moon 1");
    assert_eq!(failed.theoretical_volume, 480_000);

    let ReportField::Active(ok) = &messages[1].fields[1] else {
        panic!("expected active field");
    };
    assert!(!ok.reconcile_failed);
    assert_eq!(ok.ores.len(), 1);
}
