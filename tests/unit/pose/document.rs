use super::*;
use crate::foundation::core::DVec3;
use serde_json::json;

fn record(idx: usize) -> Value {
    json!({
        "rotation": [0.0, 0.0, 0.0, 1.0],
        "location": [idx as f64, 2.0, 3.0],
        "fovy": 50.0,
        "imagefile": format!("img_{idx}.png"),
        "timestamp": format!("2023-09-14T10:21:{:02}.000+02:00", idx % 60),
    })
}

fn doc_with(records: Vec<Value>) -> Value {
    json!({ "images": records })
}

#[test]
fn counts_only_complete_records() {
    let mut records: Vec<Value> = (0..5).map(record).collect();
    records[1].as_object_mut().unwrap().remove("imagefile");
    records[3].as_object_mut().unwrap().remove("rotation");
    let seq = parse(&doc_with(records), 1).unwrap();
    assert_eq!(seq.len(), 3);
    let files: Vec<&str> = seq.iter().map(|s| s.image_file.as_str()).collect();
    assert_eq!(files, ["img_0.png", "img_2.png", "img_4.png"]);
}

#[test]
fn stride_selects_every_kth_sample() {
    let mut records: Vec<Value> = (0..11).map(record).collect();
    records[4].as_object_mut().unwrap().remove("location");
    let doc = doc_with(records);

    let all = parse(&doc, 1).unwrap();
    for k in 1..=4 {
        let sub = parse(&doc, k).unwrap();
        let expected: Vec<&CameraSample> = all.iter().step_by(k).collect();
        let got: Vec<&CameraSample> = sub.iter().collect();
        assert_eq!(got, expected, "stride {k}");
    }
}

#[test]
fn zero_stride_is_rejected() {
    let err = parse(&doc_with(vec![record(0)]), 0).unwrap_err();
    assert!(matches!(err, LightFieldError::Validation(_)));
}

#[test]
fn frames_key_is_accepted_and_images_wins() {
    let doc = json!({ "frames": [record(0), record(1)] });
    assert_eq!(parse(&doc, 1).unwrap().len(), 2);

    let doc = json!({ "images": [record(0)], "frames": [record(0), record(1)] });
    assert_eq!(parse(&doc, 1).unwrap().len(), 1);
}

#[test]
fn missing_record_array_is_malformed() {
    for doc in [json!({ "poses": [] }), json!([1, 2]), json!({ "images": 3 })] {
        let err = parse(&doc, 1).unwrap_err();
        assert!(
            matches!(err, LightFieldError::MalformedPoseDocument(_)),
            "{err}"
        );
    }
}

#[test]
fn location_is_remapped_to_y_up() {
    let seq = parse(&doc_with(vec![record(1)]), 1).unwrap();
    assert_eq!(seq.get(0).unwrap().position, DVec3::new(1.0, -3.0, 2.0));
}

#[test]
fn quaternion_rotation_is_normalized() {
    let mut r = record(0);
    r["rotation"] = json!([0.0, 0.0, 0.0, 2.0]);
    let seq = parse(&doc_with(vec![r]), 1).unwrap();
    let q = seq.get(0).unwrap().orientation;
    assert!((q.length() - 1.0).abs() < 1e-12);
    assert!(q.abs_diff_eq(DQuat::IDENTITY, 1e-12));
}

#[test]
fn euler_rotation_applies_corrections() {
    let mut r = record(0);
    r["rotation"] = json!([0.0, -180.0, 90.0]);
    let seq = parse(&doc_with(vec![r]), 1).unwrap();
    let q = seq.get(0).unwrap().orientation;
    // Corrections cancel the input exactly.
    assert!(q.dot(DQuat::IDENTITY).abs() > 1.0 - 1e-12);
}

#[test]
fn bad_rotation_lengths_fail() {
    for rot in [json!([1.0, 2.0]), json!([1.0, 2.0, 3.0, 4.0, 5.0]), json!([])] {
        let mut r = record(0);
        r["rotation"] = rot;
        let err = parse(&doc_with(vec![r]), 1).unwrap_err();
        assert!(
            matches!(err, LightFieldError::InvalidRotationFormat { record: 0, .. }),
            "{err}"
        );
    }

    let mut r = record(0);
    r["rotation"] = json!([0.0, 0.0, 0.0, 0.0]);
    assert!(matches!(
        parse(&doc_with(vec![r]), 1).unwrap_err(),
        LightFieldError::InvalidRotationFormat { .. }
    ));
}

#[test]
fn fovy_list_is_unwrapped() {
    let mut r = record(0);
    r["fovy"] = json!([42.5]);
    let seq = parse(&doc_with(vec![r]), 1).unwrap();
    assert_eq!(seq.get(0).unwrap().fovy_deg, 42.5);
}

#[test]
fn fovy_shapes_that_fail() {
    for fovy in [
        None,
        Some(json!("50")),
        Some(json!([50.0, 60.0])),
        Some(json!([])),
        Some(json!(-5.0)),
    ] {
        let mut r = record(0);
        let obj = r.as_object_mut().unwrap();
        match fovy {
            Some(v) => {
                obj.insert("fovy".to_string(), v);
            }
            None => {
                obj.remove("fovy");
            }
        }
        let err = parse(&doc_with(vec![r]), 1).unwrap_err();
        assert!(
            matches!(err, LightFieldError::MissingOrInvalidFov { record: 0 }),
            "{err}"
        );
    }
}

#[test]
fn bad_timestamp_fails_with_value() {
    let mut r = record(0);
    r["timestamp"] = json!("not a time");
    match parse(&doc_with(vec![record(1), r]), 1).unwrap_err() {
        LightFieldError::InvalidTimestamp { record, value } => {
            assert_eq!(record, 1);
            assert_eq!(value, "not a time");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn multibyte_timestamp_tail_fails_the_load() {
    let mut r = record(0);
    r["timestamp"] = json!("12:00€");
    assert!(matches!(
        parse(&doc_with(vec![r]), 1).unwrap_err(),
        LightFieldError::InvalidTimestamp { record: 0, .. }
    ));
}

#[test]
fn lens_defaults_and_overrides() {
    let seq = parse(&doc_with(vec![record(0)]), 1).unwrap();
    let s = seq.get(0).unwrap();
    assert_eq!((s.aspect, s.near, s.far), (1.0, 0.5, 100.0));

    let mut r = record(0);
    r["aspect"] = json!(1.5);
    r["far"] = json!(250.0);
    let seq = parse(&doc_with(vec![r]), 1).unwrap();
    let s = seq.get(0).unwrap();
    assert_eq!((s.aspect, s.near, s.far), (1.5, 0.5, 250.0));
}

#[test]
fn unknown_fields_are_ignored() {
    let mut r = record(0);
    r["exposure"] = json!({ "iso": 100 });
    assert_eq!(parse(&doc_with(vec![r]), 1).unwrap().len(), 1);
}

#[test]
fn invalid_json_text_is_malformed() {
    let err = parse_str("{ images: ", 1).unwrap_err();
    assert!(matches!(err, LightFieldError::MalformedPoseDocument(_)));
}
