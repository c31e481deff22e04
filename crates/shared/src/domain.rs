use std::fmt;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(ReportId);

/// The nine fixed photo categories of the survey checklist. Variant order is
/// the order buckets appear on the form; `column_name` values double as the
/// record-store column names and as the storage path prefix for uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageBucket {
    Overview,
    BrokenTiles,
    RidgeCapping,
    Valleys,
    Flashings,
    Gutters,
    Sarking,
    Defects,
    Completion,
}

impl ImageBucket {
    pub const COUNT: usize = 9;

    pub const ALL: [ImageBucket; Self::COUNT] = [
        ImageBucket::Overview,
        ImageBucket::BrokenTiles,
        ImageBucket::RidgeCapping,
        ImageBucket::Valleys,
        ImageBucket::Flashings,
        ImageBucket::Gutters,
        ImageBucket::Sarking,
        ImageBucket::Defects,
        ImageBucket::Completion,
    ];

    pub fn column_name(self) -> &'static str {
        match self {
            ImageBucket::Overview => "overviewPhotos",
            ImageBucket::BrokenTiles => "brokenTilesPhoto",
            ImageBucket::RidgeCapping => "ridgeCappingPhotos",
            ImageBucket::Valleys => "valleysPhotos",
            ImageBucket::Flashings => "flashingsPhotos",
            ImageBucket::Gutters => "guttersPhotos",
            ImageBucket::Sarking => "sarkingPhotos",
            ImageBucket::Defects => "defectPhotos",
            ImageBucket::Completion => "completionPhotos",
        }
    }

    pub fn from_column_name(name: &str) -> Option<ImageBucket> {
        Self::ALL
            .into_iter()
            .find(|bucket| bucket.column_name() == name)
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ImageBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// A locally selected photo awaiting upload. The pipeline treats the bytes as
/// an opaque blob; no resizing or re-encoding happens here.
#[derive(Debug, Clone)]
pub struct LocalImage {
    pub filename: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl LocalImage {
    pub fn new(filename: impl Into<String>, mime_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            mime_type,
            bytes,
        }
    }
}

/// The scalar answers of the survey form. Every field is a string column in
/// the record store; empty string means "unset" but is still persisted so a
/// submitted report always carries the full declared column set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InspectionFields {
    // Job and site details
    pub inspection_date: String,
    pub inspection_time: String,
    pub client_name: String,
    pub client_phone: String,
    pub client_email: String,
    pub site_address: String,
    pub suburb: String,
    pub postcode: String,
    pub inspector_name: String,
    pub job_number: String,
    pub reference_number: String,
    // Property
    pub property_type: String,
    pub storeys: String,
    pub roof_access: String,
    pub weather_conditions: String,
    pub year_built: String,
    // Roof construction
    pub cladding_type: String,
    pub tile_profile: String,
    pub tile_colour: String,
    pub roof_pitch: String,
    pub roof_area: String,
    pub frame_type: String,
    pub batten_type: String,
    pub sarking_installed: String,
    pub insulation_present: String,
    // Overall condition
    pub overall_condition: String,
    pub broken_tiles_count: String,
    pub cracked_tiles_count: String,
    pub slipped_tiles_count: String,
    pub previous_repairs: String,
    pub previous_repairs_detail: String,
    pub leaks_reported: String,
    pub leaks_detail: String,
    // Component condition
    pub ridge_capping_condition: String,
    pub bedding_condition: String,
    pub pointing_condition: String,
    pub valleys_condition: String,
    pub flashings_condition: String,
    pub gutters_condition: String,
    pub downpipes_condition: String,
    pub skylights_condition: String,
    pub vents_condition: String,
    pub chimney_condition: String,
    // Growth and debris
    pub moss_present: String,
    pub lichen_present: String,
    pub debris_present: String,
    pub gutter_blockage: String,
    // Restoration suitability
    pub restoration_suitable: String,
    pub paint_system: String,
    pub coats_required: String,
    // Recommendations
    pub recommended_works: String,
    pub urgent_works: String,
    pub estimated_cost: String,
    pub follow_up_required: String,
    pub follow_up_date: String,
    // Notes
    pub general_notes: String,
    pub internal_notes: String,
    pub customer_comments: String,
}

impl InspectionFields {
    /// A fresh form: date and time preset to the given moment, everything
    /// else empty.
    pub fn fresh(now: DateTime<Local>) -> Self {
        Self {
            inspection_date: now.format("%Y-%m-%d").to_string(),
            inspection_time: now.format("%H:%M").to_string(),
            ..Self::default()
        }
    }

    pub fn set(&mut self, key: FieldKey, value: impl Into<String>) {
        let value = value.into();
        match key {
            FieldKey::InspectionDate => self.inspection_date = value,
            FieldKey::InspectionTime => self.inspection_time = value,
            FieldKey::ClientName => self.client_name = value,
            FieldKey::ClientPhone => self.client_phone = value,
            FieldKey::ClientEmail => self.client_email = value,
            FieldKey::SiteAddress => self.site_address = value,
            FieldKey::Suburb => self.suburb = value,
            FieldKey::Postcode => self.postcode = value,
            FieldKey::InspectorName => self.inspector_name = value,
            FieldKey::JobNumber => self.job_number = value,
            FieldKey::ReferenceNumber => self.reference_number = value,
            FieldKey::PropertyType => self.property_type = value,
            FieldKey::Storeys => self.storeys = value,
            FieldKey::RoofAccess => self.roof_access = value,
            FieldKey::WeatherConditions => self.weather_conditions = value,
            FieldKey::YearBuilt => self.year_built = value,
            FieldKey::CladdingType => self.cladding_type = value,
            FieldKey::TileProfile => self.tile_profile = value,
            FieldKey::TileColour => self.tile_colour = value,
            FieldKey::RoofPitch => self.roof_pitch = value,
            FieldKey::RoofArea => self.roof_area = value,
            FieldKey::FrameType => self.frame_type = value,
            FieldKey::BattenType => self.batten_type = value,
            FieldKey::SarkingInstalled => self.sarking_installed = value,
            FieldKey::InsulationPresent => self.insulation_present = value,
            FieldKey::OverallCondition => self.overall_condition = value,
            FieldKey::BrokenTilesCount => self.broken_tiles_count = value,
            FieldKey::CrackedTilesCount => self.cracked_tiles_count = value,
            FieldKey::SlippedTilesCount => self.slipped_tiles_count = value,
            FieldKey::PreviousRepairs => self.previous_repairs = value,
            FieldKey::PreviousRepairsDetail => self.previous_repairs_detail = value,
            FieldKey::LeaksReported => self.leaks_reported = value,
            FieldKey::LeaksDetail => self.leaks_detail = value,
            FieldKey::RidgeCappingCondition => self.ridge_capping_condition = value,
            FieldKey::BeddingCondition => self.bedding_condition = value,
            FieldKey::PointingCondition => self.pointing_condition = value,
            FieldKey::ValleysCondition => self.valleys_condition = value,
            FieldKey::FlashingsCondition => self.flashings_condition = value,
            FieldKey::GuttersCondition => self.gutters_condition = value,
            FieldKey::DownpipesCondition => self.downpipes_condition = value,
            FieldKey::SkylightsCondition => self.skylights_condition = value,
            FieldKey::VentsCondition => self.vents_condition = value,
            FieldKey::ChimneyCondition => self.chimney_condition = value,
            FieldKey::MossPresent => self.moss_present = value,
            FieldKey::LichenPresent => self.lichen_present = value,
            FieldKey::DebrisPresent => self.debris_present = value,
            FieldKey::GutterBlockage => self.gutter_blockage = value,
            FieldKey::RestorationSuitable => self.restoration_suitable = value,
            FieldKey::PaintSystem => self.paint_system = value,
            FieldKey::CoatsRequired => self.coats_required = value,
            FieldKey::RecommendedWorks => self.recommended_works = value,
            FieldKey::UrgentWorks => self.urgent_works = value,
            FieldKey::EstimatedCost => self.estimated_cost = value,
            FieldKey::FollowUpRequired => self.follow_up_required = value,
            FieldKey::FollowUpDate => self.follow_up_date = value,
            FieldKey::GeneralNotes => self.general_notes = value,
            FieldKey::InternalNotes => self.internal_notes = value,
            FieldKey::CustomerComments => self.customer_comments = value,
        }
    }
}

/// Statically checked handle for every scalar field of the form, so callers
/// cannot address a column the record store does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKey {
    InspectionDate,
    InspectionTime,
    ClientName,
    ClientPhone,
    ClientEmail,
    SiteAddress,
    Suburb,
    Postcode,
    InspectorName,
    JobNumber,
    ReferenceNumber,
    PropertyType,
    Storeys,
    RoofAccess,
    WeatherConditions,
    YearBuilt,
    CladdingType,
    TileProfile,
    TileColour,
    RoofPitch,
    RoofArea,
    FrameType,
    BattenType,
    SarkingInstalled,
    InsulationPresent,
    OverallCondition,
    BrokenTilesCount,
    CrackedTilesCount,
    SlippedTilesCount,
    PreviousRepairs,
    PreviousRepairsDetail,
    LeaksReported,
    LeaksDetail,
    RidgeCappingCondition,
    BeddingCondition,
    PointingCondition,
    ValleysCondition,
    FlashingsCondition,
    GuttersCondition,
    DownpipesCondition,
    SkylightsCondition,
    VentsCondition,
    ChimneyCondition,
    MossPresent,
    LichenPresent,
    DebrisPresent,
    GutterBlockage,
    RestorationSuitable,
    PaintSystem,
    CoatsRequired,
    RecommendedWorks,
    UrgentWorks,
    EstimatedCost,
    FollowUpRequired,
    FollowUpDate,
    GeneralNotes,
    InternalNotes,
    CustomerComments,
}

/// Public URLs of uploaded photos, one optional list per bucket. A bucket
/// that held no files stays `None` and contributes no key to the record, so
/// an absent column is distinguishable from an empty upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageRefs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview_photos: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broken_tiles_photo: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ridge_capping_photos: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valleys_photos: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flashings_photos: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gutters_photos: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sarking_photos: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defect_photos: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion_photos: Option<Vec<String>>,
}

impl ImageRefs {
    pub fn set(&mut self, bucket: ImageBucket, urls: Vec<String>) {
        *self.slot_mut(bucket) = Some(urls);
    }

    pub fn get(&self, bucket: ImageBucket) -> Option<&[String]> {
        match bucket {
            ImageBucket::Overview => self.overview_photos.as_deref(),
            ImageBucket::BrokenTiles => self.broken_tiles_photo.as_deref(),
            ImageBucket::RidgeCapping => self.ridge_capping_photos.as_deref(),
            ImageBucket::Valleys => self.valleys_photos.as_deref(),
            ImageBucket::Flashings => self.flashings_photos.as_deref(),
            ImageBucket::Gutters => self.gutters_photos.as_deref(),
            ImageBucket::Sarking => self.sarking_photos.as_deref(),
            ImageBucket::Defects => self.defect_photos.as_deref(),
            ImageBucket::Completion => self.completion_photos.as_deref(),
        }
    }

    fn slot_mut(&mut self, bucket: ImageBucket) -> &mut Option<Vec<String>> {
        match bucket {
            ImageBucket::Overview => &mut self.overview_photos,
            ImageBucket::BrokenTiles => &mut self.broken_tiles_photo,
            ImageBucket::RidgeCapping => &mut self.ridge_capping_photos,
            ImageBucket::Valleys => &mut self.valleys_photos,
            ImageBucket::Flashings => &mut self.flashings_photos,
            ImageBucket::Gutters => &mut self.gutters_photos,
            ImageBucket::Sarking => &mut self.sarking_photos,
            ImageBucket::Defects => &mut self.defect_photos,
            ImageBucket::Completion => &mut self.completion_photos,
        }
    }
}

/// The single row persisted per successful submission: every scalar answer
/// plus the resolved photo URLs for buckets that had files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionReport {
    #[serde(flatten)]
    pub fields: InspectionFields,
    #[serde(flatten)]
    pub images: ImageRefs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_fields_preset_date_and_time_only() {
        let now = "2026-08-23T14:05:00+10:00"
            .parse::<DateTime<chrono::FixedOffset>>()
            .expect("timestamp")
            .with_timezone(&Local);
        let fields = InspectionFields::fresh(now);

        assert_eq!(fields.inspection_date.len(), 10);
        assert_eq!(fields.inspection_date.matches('-').count(), 2);
        assert_eq!(fields.inspection_time.len(), 5);
        assert_eq!(fields.inspection_time.matches(':').count(), 1);
        assert!(fields.client_name.is_empty());
        assert!(fields.general_notes.is_empty());
    }

    #[test]
    fn set_field_routes_to_named_column() {
        let mut fields = InspectionFields::default();
        fields.set(FieldKey::ClientName, "A. Smith");
        fields.set(FieldKey::CladdingType, "Metal");

        assert_eq!(fields.client_name, "A. Smith");
        assert_eq!(fields.cladding_type, "Metal");
    }

    #[test]
    fn bucket_column_names_are_distinct() {
        let mut names: Vec<_> = ImageBucket::ALL
            .into_iter()
            .map(ImageBucket::column_name)
            .collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ImageBucket::COUNT);
    }

    #[test]
    fn bucket_round_trips_through_column_name() {
        for bucket in ImageBucket::ALL {
            assert_eq!(ImageBucket::from_column_name(bucket.column_name()), Some(bucket));
        }
        assert_eq!(ImageBucket::from_column_name("roofPhotos"), None);
    }

    #[test]
    fn empty_buckets_contribute_no_record_keys() {
        let report = InspectionReport::default();
        let value = serde_json::to_value(&report).expect("serialize");
        let object = value.as_object().expect("object");

        for bucket in ImageBucket::ALL {
            assert!(
                !object.contains_key(bucket.column_name()),
                "unexpected key {}",
                bucket.column_name()
            );
        }
        assert!(object.contains_key("clientName"));
    }

    #[test]
    fn populated_bucket_serializes_under_its_column_name() {
        let mut report = InspectionReport::default();
        report.images.set(
            ImageBucket::BrokenTiles,
            vec!["https://cdn.example/a.jpg".to_string()],
        );
        let value = serde_json::to_value(&report).expect("serialize");

        assert_eq!(
            value["brokenTilesPhoto"],
            serde_json::json!(["https://cdn.example/a.jpg"])
        );
    }
}
