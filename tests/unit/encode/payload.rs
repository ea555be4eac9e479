use std::path::PathBuf;

use super::*;
use crate::schedule::model::{Appearance, Frame};

fn schedule(times: &[(f64, Option<Appearance>)]) -> FrameSchedule {
    let frames = times
        .iter()
        .enumerate()
        .map(|(n, &(t, appearance))| Frame {
            image_path: PathBuf::from(format!("/f{n}.png")),
            normalized_time: t,
            appearance,
        })
        .collect();
    FrameSchedule::new(frames).unwrap()
}

#[test]
fn payload_indexes_follow_schedule_positions() {
    let s = schedule(&[(0.75, Some(Appearance::Dark)), (0.25, None)]);
    let p = MetadataPayload::from_schedule(&s, s.appearance_index());
    assert_eq!(
        p.ti,
        vec![TimeEntry { i: 0, t: 0.25 }, TimeEntry { i: 1, t: 0.75 }]
    );
    assert_eq!(
        p.ap,
        Some(AppearanceEntry {
            d: Some(1),
            l: None
        })
    );
}

#[test]
fn ap_is_omitted_without_tags() {
    let s = schedule(&[(0.1, None), (0.2, None)]);
    let p = MetadataPayload::from_schedule(&s, s.appearance_index());
    assert_eq!(p.ap, None);

    let plist = plist::Value::from_reader(std::io::Cursor::new(p.to_binary_plist().unwrap()))
        .unwrap();
    let dict = plist.as_dictionary().unwrap();
    assert!(dict.get("ap").is_none());
    assert!(dict.get("ti").is_some());
}

#[test]
fn times_are_rounded_to_six_decimals() {
    assert_eq!(round_time(1.0 / 3.0), 0.333333);
    assert_eq!(round_time(2.0 / 3.0), 0.666667);
    assert_eq!(round_time(0.25), 0.25);
}

#[test]
fn rounding_uses_the_exact_binary_value() {
    // Seconds whose day fraction lies just below a 6-digit half step.
    assert_eq!(round_time(81.0 / 86_400.0), 0.000937);
    assert_eq!(round_time(243.0 / 86_400.0), 0.002812);
    // 675 s is exactly 0.0078125; ties go to even.
    assert_eq!(round_time(675.0 / 86_400.0), 0.007812);
    assert_eq!(round_time(1.0), 1.0);
    assert_eq!(round_time(0.0), 0.0);
}

#[test]
fn binary_plist_round_trips_types() {
    let t0 = 7.0 * 3600.0 / 86_400.0;
    let t1 = (19.0 * 3600.0 + 45.0 * 60.0 + 30.0) / 86_400.0;
    let s = schedule(&[
        (t0, Some(Appearance::Light)),
        (t1, Some(Appearance::Dark)),
    ]);
    let p = MetadataPayload::from_schedule(&s, s.appearance_index());
    let bytes = p.to_binary_plist().unwrap();
    assert!(bytes.starts_with(b"bplist00"));

    let back = MetadataPayload::from_plist_bytes(&bytes).unwrap();
    assert_eq!(back, p);
    assert_eq!(back.ti[1].t, round_time(t1));

    // Integers stay integers and reals stay reals for generic decoders.
    let value = plist::Value::from_reader(std::io::Cursor::new(bytes)).unwrap();
    let ti = value
        .as_dictionary()
        .and_then(|d| d.get("ti"))
        .and_then(plist::Value::as_array)
        .unwrap();
    let first = ti[0].as_dictionary().unwrap();
    assert_eq!(
        first.get("i").and_then(plist::Value::as_unsigned_integer),
        Some(0)
    );
    assert_eq!(
        first.get("t").and_then(plist::Value::as_real),
        Some(round_time(t0))
    );
    let ap = value
        .as_dictionary()
        .and_then(|d| d.get("ap"))
        .and_then(plist::Value::as_dictionary)
        .unwrap();
    assert_eq!(ap.get("l").and_then(plist::Value::as_unsigned_integer), Some(0));
    assert_eq!(ap.get("d").and_then(plist::Value::as_unsigned_integer), Some(1));
}

#[test]
fn garbage_is_not_a_plist() {
    assert!(matches!(
        MetadataPayload::from_plist_bytes(b"not a plist"),
        Err(DynwallError::Metadata(_))
    ));
}
