//! Declared column set of the inspection-report collection.
//!
//! The record store validates inserted rows against its own schema; this
//! module pins the same set on our side so drift between the typed report and
//! the store surfaces in a unit test instead of as a runtime insert rejection.

/// Every column of the report collection: the scalar form fields followed by
/// the nine image-reference columns.
pub const REPORT_COLUMNS: &[&str] = &[
    "inspectionDate",
    "inspectionTime",
    "clientName",
    "clientPhone",
    "clientEmail",
    "siteAddress",
    "suburb",
    "postcode",
    "inspectorName",
    "jobNumber",
    "referenceNumber",
    "propertyType",
    "storeys",
    "roofAccess",
    "weatherConditions",
    "yearBuilt",
    "claddingType",
    "tileProfile",
    "tileColour",
    "roofPitch",
    "roofArea",
    "frameType",
    "battenType",
    "sarkingInstalled",
    "insulationPresent",
    "overallCondition",
    "brokenTilesCount",
    "crackedTilesCount",
    "slippedTilesCount",
    "previousRepairs",
    "previousRepairsDetail",
    "leaksReported",
    "leaksDetail",
    "ridgeCappingCondition",
    "beddingCondition",
    "pointingCondition",
    "valleysCondition",
    "flashingsCondition",
    "guttersCondition",
    "downpipesCondition",
    "skylightsCondition",
    "ventsCondition",
    "chimneyCondition",
    "mossPresent",
    "lichenPresent",
    "debrisPresent",
    "gutterBlockage",
    "restorationSuitable",
    "paintSystem",
    "coatsRequired",
    "recommendedWorks",
    "urgentWorks",
    "estimatedCost",
    "followUpRequired",
    "followUpDate",
    "generalNotes",
    "internalNotes",
    "customerComments",
    "overviewPhotos",
    "brokenTilesPhoto",
    "ridgeCappingPhotos",
    "valleysPhotos",
    "flashingsPhotos",
    "guttersPhotos",
    "sarkingPhotos",
    "defectPhotos",
    "completionPhotos",
];

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::domain::{ImageBucket, InspectionReport};

    #[test]
    fn fully_populated_report_matches_declared_columns_exactly() {
        let mut report = InspectionReport::default();
        for bucket in ImageBucket::ALL {
            report.images.set(bucket, Vec::new());
        }

        let value = serde_json::to_value(&report).expect("serialize");
        let serialized: BTreeSet<&str> = value
            .as_object()
            .expect("object")
            .keys()
            .map(String::as_str)
            .collect();
        let declared: BTreeSet<&str> = REPORT_COLUMNS.iter().copied().collect();

        assert_eq!(serialized, declared);
        assert_eq!(REPORT_COLUMNS.len(), declared.len(), "duplicate declared column");
    }

    #[test]
    fn every_bucket_column_is_declared() {
        for bucket in ImageBucket::ALL {
            assert!(
                REPORT_COLUMNS.contains(&bucket.column_name()),
                "bucket column {} missing from declared schema",
                bucket.column_name()
            );
        }
    }
}
