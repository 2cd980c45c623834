use std::{fs::File, io::BufReader, path::Path};

use serde_json::{Map, Value};

use crate::{
    foundation::core::DQuat,
    foundation::error::{LightFieldError, LightFieldResult},
    foundation::math::{quat_from_pose_euler_deg, remap_z_up_to_y_up},
    pose::sequence::{CameraSample, CameraSequence, DEFAULT_ASPECT, DEFAULT_FAR, DEFAULT_NEAR},
    pose::timestamp::parse_timestamp,
};

/// Keys that hold the camera record array, in priority order.
pub const RECORD_ARRAY_KEYS: [&str; 2] = ["images", "frames"];

const REQUIRED_FIELDS: [&str; 3] = ["rotation", "location", "imagefile"];

/// Rotation as written in a pose record, before canonicalization.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Rotation {
    /// Unit quaternion `(x, y, z, w)`.
    Quaternion([f64; 4]),
    /// Euler angles in degrees, axis order X-Y-Z, before document corrections.
    Euler([f64; 3]),
}

impl Rotation {
    /// Classify a rotation array by its component count.
    pub fn from_components(record: usize, c: &[f64]) -> LightFieldResult<Self> {
        match *c {
            [x, y, z, w] => Ok(Self::Quaternion([x, y, z, w])),
            [a, b, g] => Ok(Self::Euler([a, b, g])),
            _ => Err(LightFieldError::InvalidRotationFormat {
                record,
                len: c.len(),
            }),
        }
    }

    /// Canonical unit quaternion.
    pub fn to_quat(self, record: usize) -> LightFieldResult<DQuat> {
        match self {
            Self::Quaternion([x, y, z, w]) => {
                let q = DQuat::from_xyzw(x, y, z, w);
                let len = q.length();
                if !len.is_finite() || len <= f64::EPSILON {
                    return Err(LightFieldError::InvalidRotationFormat { record, len: 4 });
                }
                Ok(q / len)
            }
            Self::Euler(angles) => Ok(quat_from_pose_euler_deg(angles)),
        }
    }
}

/// Parse a pose document into a camera sequence, keeping every `stride`-th complete record.
///
/// Records lacking `rotation`, `location` or `imagefile` are dropped before subsampling;
/// any structural problem in a selected record fails the whole load.
#[tracing::instrument(skip(source))]
pub fn parse(source: &Value, stride: usize) -> LightFieldResult<CameraSequence> {
    if stride == 0 {
        return Err(LightFieldError::validation("stride must be >= 1"));
    }

    let doc = source
        .as_object()
        .ok_or_else(|| LightFieldError::malformed("top level must be an object"))?;
    let (key, records) = record_array(doc)?;

    let complete = records
        .iter()
        .enumerate()
        .filter(|(i, rec)| {
            let keep = has_required_fields(rec);
            if !keep {
                tracing::debug!(record = i, "skipping pose record without required fields");
            }
            keep
        })
        .step_by(stride);

    let mut samples = Vec::new();
    for (i, rec) in complete {
        samples.push(parse_record(i, rec)?);
    }

    tracing::info!(
        key,
        records = records.len(),
        samples = samples.len(),
        "parsed pose document"
    );
    Ok(CameraSequence::new(samples))
}

/// Parse a pose document from JSON text.
pub fn parse_str(json: &str, stride: usize) -> LightFieldResult<CameraSequence> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| LightFieldError::malformed(format!("invalid JSON: {e}")))?;
    parse(&value, stride)
}

/// Parse a pose document from a JSON reader.
pub fn parse_reader(
    reader: impl std::io::Read,
    stride: usize,
) -> LightFieldResult<CameraSequence> {
    let value: Value = serde_json::from_reader(reader)
        .map_err(|e| LightFieldError::malformed(format!("invalid JSON: {e}")))?;
    parse(&value, stride)
}

/// Parse a pose document from a JSON file.
pub fn parse_file(path: &Path, stride: usize) -> LightFieldResult<CameraSequence> {
    let f = File::open(path)
        .map_err(|e| LightFieldError::io(format!("open pose file '{}': {e}", path.display())))?;
    parse_reader(BufReader::new(f), stride)
}

fn record_array(doc: &Map<String, Value>) -> LightFieldResult<(&'static str, &[Value])> {
    for key in RECORD_ARRAY_KEYS {
        if let Some(v) = doc.get(key) {
            let arr = v
                .as_array()
                .ok_or_else(|| LightFieldError::malformed(format!("'{key}' must be an array")))?;
            return Ok((key, arr.as_slice()));
        }
    }
    Err(LightFieldError::malformed(
        "document has neither an 'images' nor a 'frames' array",
    ))
}

fn has_required_fields(rec: &Value) -> bool {
    rec.as_object()
        .is_some_and(|o| REQUIRED_FIELDS.iter().all(|k| o.contains_key(*k)))
}

fn parse_record(i: usize, rec: &Value) -> LightFieldResult<CameraSample> {
    let obj = rec
        .as_object()
        .ok_or_else(|| LightFieldError::malformed(format!("record {i} is not an object")))?;

    static NULL: Value = Value::Null;
    let field = |key: &str| obj.get(key).unwrap_or(&NULL);

    let rotation = numbers(field("rotation"))
        .ok_or(LightFieldError::InvalidRotationFormat {
            record: i,
            len: field("rotation").as_array().map_or(0, Vec::len),
        })
        .and_then(|c| Rotation::from_components(i, &c))?;
    let orientation = rotation.to_quat(i)?;

    let location = numbers(field("location"))
        .and_then(|c| <[f64; 3]>::try_from(c).ok())
        .ok_or_else(|| {
            LightFieldError::malformed(format!("record {i}: 'location' must be 3 numbers"))
        })?;

    let image_file = field("imagefile")
        .as_str()
        .ok_or_else(|| {
            LightFieldError::malformed(format!("record {i}: 'imagefile' must be a string"))
        })?
        .to_string();

    let fovy_deg = normalize_fovy(i, obj.get("fovy"))?;

    let raw_ts = obj.get("timestamp").and_then(Value::as_str);
    let timestamp = raw_ts
        .and_then(parse_timestamp)
        .ok_or_else(|| LightFieldError::InvalidTimestamp {
            record: i,
            value: raw_ts.unwrap_or_default().to_string(),
        })?;

    Ok(CameraSample {
        fovy_deg,
        aspect: optional_number(i, obj, "aspect")?.unwrap_or(DEFAULT_ASPECT),
        near: optional_number(i, obj, "near")?.unwrap_or(DEFAULT_NEAR),
        far: optional_number(i, obj, "far")?.unwrap_or(DEFAULT_FAR),
        position: remap_z_up_to_y_up(location),
        orientation,
        image_file,
        timestamp,
    })
}

/// Unwrap `fovy` given as a number or a single-element list.
pub fn normalize_fovy(record: usize, raw: Option<&Value>) -> LightFieldResult<f64> {
    let value = match raw {
        Some(Value::Array(items)) if items.len() == 1 => items[0].as_f64(),
        Some(v) => v.as_f64(),
        None => None,
    };
    value
        .filter(|v| v.is_finite() && *v > 0.0)
        .ok_or(LightFieldError::MissingOrInvalidFov { record })
}

fn numbers(v: &Value) -> Option<Vec<f64>> {
    v.as_array()?.iter().map(Value::as_f64).collect()
}

fn optional_number(
    record: usize,
    obj: &Map<String, Value>,
    key: &str,
) -> LightFieldResult<Option<f64>> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v.as_f64().map(Some).ok_or_else(|| {
            LightFieldError::malformed(format!("record {record}: '{key}' must be a number"))
        }),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pose/document.rs"]
mod tests;
