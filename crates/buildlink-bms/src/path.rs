//! Source path decoding.
//!
//! A BMS source path looks like `/B1_F2_R3/ventilation/zone/Temp`. The first
//! segment is the room specification (`building_floor_room`), the last segment
//! is the sensor type.

use buildlink_core::DecodeError;

/// Placeholder id for a hierarchy level missing from the room specification.
pub const UNDEFINED: &str = "undefined";

const SEPARATOR: char = '/';
const ROOM_SPEC_DELIMITER: char = '_';

/// Address of a sensor within the building hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedPath {
    pub building_id: String,
    pub floor_id: String,
    pub room_id: String,
    pub sensor_type: String,
}

/// Decode a source path.
///
/// Empty segments are kept as empty ids. Only a missing separator or an empty
/// room specification is rejected.
pub fn decode(path: &str) -> Result<DecodedPath, DecodeError> {
    let trimmed = path.strip_prefix(SEPARATOR).unwrap_or(path);

    let Some((room_spec, rest)) = trimmed.split_once(SEPARATOR) else {
        return Err(DecodeError::InvalidPath(path.to_string()));
    };
    if room_spec.is_empty() {
        return Err(DecodeError::InvalidPath(path.to_string()));
    }

    let parts: Vec<&str> = room_spec.splitn(3, ROOM_SPEC_DELIMITER).collect();
    let (building_id, floor_id, room_id) = match parts.as_slice() {
        [building] => (*building, UNDEFINED, UNDEFINED),
        [building, room] => (*building, UNDEFINED, *room),
        [building, floor, room] => (*building, *floor, *room),
        // Unreachable: splitn(3) always yields one to three parts
        _ => return Err(DecodeError::InvalidPath(path.to_string())),
    };

    // rsplit always yields at least one item
    let sensor_type = rest.rsplit(SEPARATOR).next().unwrap_or(rest);

    Ok(DecodedPath {
        building_id: building_id.to_string(),
        floor_id: floor_id.to_string(),
        room_id: room_id.to_string(),
        sensor_type: sensor_type.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuple(d: &DecodedPath) -> (&str, &str, &str, &str) {
        (&d.building_id, &d.floor_id, &d.room_id, &d.sensor_type)
    }

    #[test]
    fn test_full_room_specification() {
        let d = decode("B1_F2_R3/x/y/Temp").unwrap();
        assert_eq!(tuple(&d), ("B1", "F2", "R3", "Temp"));
    }

    #[test]
    fn test_building_only() {
        let d = decode("B1/x/Temp").unwrap();
        assert_eq!(tuple(&d), ("B1", UNDEFINED, UNDEFINED, "Temp"));
    }

    #[test]
    fn test_building_and_room() {
        let d = decode("/B1_R7/Temp").unwrap();
        assert_eq!(tuple(&d), ("B1", UNDEFINED, "R7", "Temp"));
    }

    #[test]
    fn test_extra_underscores_stay_in_room() {
        let d = decode("/B1_F2_R3_east_wing/co2/CO2").unwrap();
        assert_eq!(tuple(&d), ("B1", "F2", "R3_east_wing", "CO2"));
    }

    #[test]
    fn test_leading_separator_stripped_once() {
        let d = decode("/B1_F1_R1/sensors/Temp").unwrap();
        assert_eq!(d.building_id, "B1");

        // A second leading slash leaves an empty room specification
        assert!(matches!(decode("//B1/Temp"), Err(DecodeError::InvalidPath(_))));
    }

    #[test]
    fn test_no_separator() {
        assert_eq!(
            decode("noseparator"),
            Err(DecodeError::InvalidPath("noseparator".to_string()))
        );
        assert!(matches!(decode("/noseparator"), Err(DecodeError::InvalidPath(_))));
        assert!(matches!(decode(""), Err(DecodeError::InvalidPath(_))));
    }

    #[test]
    fn test_empty_segments_are_valid() {
        let d = decode("B1__/x/").unwrap();
        assert_eq!(tuple(&d), ("B1", "", "", ""));

        let d = decode("B1_F1_R1/").unwrap();
        assert_eq!(d.sensor_type, "");
    }

    #[test]
    fn test_sensor_type_without_nesting() {
        let d = decode("B1_F1_R1/Temp").unwrap();
        assert_eq!(d.sensor_type, "Temp");
    }
}
