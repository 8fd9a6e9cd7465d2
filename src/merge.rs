//! The two relational merges.
//!
//! Both are hash-lookup inner joins that never drop a row silently: every
//! merge hands back a [`MergeReport`], and in strict mode a nonzero
//! unmatched count is promoted to [`AtlasError::Unmatched`].

use ahash::AHashMap;
use tracing::{debug, warn};

use crate::codes::{is_overseas_department, is_overseas_region, normalize_department_code};
use crate::error::AtlasError;
use crate::records::{Department, ReferendumArea, ReferendumRow, Region, RegionDepartment};

/// What happened to the left side of a merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub kept: usize,
    pub dropped_overseas: usize,
    pub unmatched: usize,
}

fn check_unmatched(
    report: MergeReport,
    strict: bool,
    what: &'static str,
) -> Result<MergeReport, AtlasError> {
    if report.unmatched > 0 {
        if strict {
            return Err(AtlasError::Unmatched {
                count: report.unmatched,
                what,
            });
        }
        warn!(count = report.unmatched, "dropped {what}");
    }
    Ok(report)
}

/// One output row per department, carrying its region's code and name.
///
/// Department codes come out normalized; input order is preserved.
pub fn merge_regions_and_departments(
    regions: &[Region],
    departments: &[Department],
    strict: bool,
) -> Result<(Vec<RegionDepartment>, MergeReport), AtlasError> {
    let by_code: AHashMap<&str, &Region> = regions
        .iter()
        .map(|region| (region.code.trim(), region))
        .collect();

    let mut rows = Vec::with_capacity(departments.len());
    let mut report = MergeReport::default();

    for department in departments {
        match by_code.get(department.region_code.trim()) {
            Some(region) => {
                rows.push(RegionDepartment {
                    region_code: region.code.trim().to_string(),
                    region_name: region.name.clone(),
                    department_code: normalize_department_code(&department.code),
                    department_name: department.name.clone(),
                });
                report.kept += 1;
            }
            None => {
                debug!(
                    department = %department.code,
                    region_code = %department.region_code,
                    "department references unknown region"
                );
                report.unmatched += 1;
            }
        }
    }

    let report = check_unmatched(report, strict, "departments had no matching region")?;
    Ok((rows, report))
}

/// Attaches region code and name to every metropolitan referendum row.
///
/// Overseas/abroad rows are excluded on both sides before the join: 'Z'
/// department codes in the referendum, non-numeric region codes in the
/// reference table. The join key is the normalized department code.
pub fn merge_referendum_and_areas(
    referendum: &[ReferendumRow],
    areas: &[RegionDepartment],
    strict: bool,
) -> Result<(Vec<ReferendumArea>, MergeReport), AtlasError> {
    let mut by_department: AHashMap<&str, &RegionDepartment> =
        AHashMap::with_capacity(areas.len());
    for area in areas {
        if is_overseas_region(&area.region_code) {
            debug!(region = %area.region_code, department = %area.department_code,
                "excluding overseas reference row");
            continue;
        }
        by_department.insert(area.department_code.as_str(), area);
    }

    let mut rows = Vec::with_capacity(referendum.len());
    let mut report = MergeReport::default();

    for row in referendum {
        if is_overseas_department(&row.department_code) {
            report.dropped_overseas += 1;
            continue;
        }
        let code = normalize_department_code(&row.department_code);
        match by_department.get(code.as_str()) {
            Some(area) => {
                rows.push(ReferendumArea {
                    region_code: area.region_code.clone(),
                    region_name: area.region_name.clone(),
                    department_code: code,
                    department_name: row.department_name.clone(),
                    town_code: row.town_code.clone(),
                    town_name: row.town_name.clone(),
                    counts: row.counts(),
                });
                report.kept += 1;
            }
            None => report.unmatched += 1,
        }
    }

    let report = check_unmatched(
        report,
        strict,
        "referendum rows had no matching department",
    )?;
    Ok((rows, report))
}
