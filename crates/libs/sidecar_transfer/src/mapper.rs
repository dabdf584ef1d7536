use crate::structs::{SidecarRecord, TagSet};

const DATE_TIME_ORIGINAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Maps a sidecar record onto the tags embedded in the media file.
///
/// Geo values are passed through untouched, zeros and negatives included.
#[must_use]
pub fn map_tags(record: &SidecarRecord) -> TagSet {
    TagSet {
        title: record.title.clone(),
        description: record.description.clone(),
        date_time_original: record
            .photo_taken_time
            .taken_at
            .format(DATE_TIME_ORIGINAL_FORMAT)
            .to_string(),
        gps_latitude: record.geo_data.latitude,
        gps_longitude: record.geo_data.longitude,
        gps_altitude: record.geo_data.altitude,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sidecar::parse_sidecar;
    use crate::structs::{GeoData, PhotoTakenTime};
    use std::path::Path;

    fn record(seconds: u64, geo_data: GeoData) -> SidecarRecord {
        SidecarRecord {
            title: "Beach".to_string(),
            description: String::new(),
            photo_taken_time: PhotoTakenTime::from_seconds(seconds, "").expect("valid seconds"),
            geo_data,
            creation_time: None,
            geo_data_exif: None,
            image_views: None,
            url: None,
            origin_device_type: None,
        }
    }

    #[test]
    fn maps_beach_example() -> crate::error::Result<()> {
        let sidecar = r#"{"title":"Beach","description":"","photoTakenTime":{"timestamp":"1700000000"},"geoData":{"latitude":10.0,"longitude":20.0,"altitude":5.0}}"#;
        let record = parse_sidecar(Path::new("beach.jpg.json"), sidecar.as_bytes())?;

        let tags = map_tags(&record);

        assert_eq!(
            tags,
            TagSet {
                title: "Beach".to_string(),
                description: String::new(),
                date_time_original: "2023-11-14T22:13:20".to_string(),
                gps_latitude: 10.0,
                gps_longitude: 20.0,
                gps_altitude: 5.0,
            }
        );
        Ok(())
    }

    #[test]
    fn epoch_has_no_fraction_or_zone() {
        let tags = map_tags(&record(0, GeoData::default()));
        assert_eq!(tags.date_time_original, "1970-01-01T00:00:00");
    }

    #[test]
    fn negative_coordinates_pass_through() {
        let geo = GeoData {
            latitude: -33.8688,
            longitude: -151.2093,
            altitude: -12.0,
            ..GeoData::default()
        };
        let tags = map_tags(&record(1_600_000_000, geo));

        assert!((tags.gps_latitude - geo.latitude).abs() < f64::EPSILON);
        assert!((tags.gps_longitude - geo.longitude).abs() < f64::EPSILON);
        assert!((tags.gps_altitude - geo.altitude).abs() < f64::EPSILON);
    }

    #[test]
    fn mapping_is_deterministic() {
        let record = record(1_234_567_890, GeoData::default());
        assert_eq!(map_tags(&record), map_tags(&record));
        assert_eq!(map_tags(&record).date_time_original, "2009-02-13T23:31:30");
    }
}
