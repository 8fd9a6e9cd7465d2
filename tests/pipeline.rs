//! End-to-end pipeline tests over synthetic fixtures on disk.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use rand::Rng;
use tempfile::TempDir;

use referendum_atlas::aggregate::compute_results_by_region;
use referendum_atlas::error::AtlasError;
use referendum_atlas::load::{
    load_departments, load_referendum, load_region_shapes, load_regions,
};
use referendum_atlas::merge::{merge_referendum_and_areas, merge_regions_and_departments};
use referendum_atlas::records::{ReferendumArea, RegionResult};
use referendum_atlas::render::{render_choropleth, write_results_csv};

const REGIONS_CSV: &str = "\
id,code,name,slug
1,84,Auvergne-Rhone-Alpes,auvergne-rhone-alpes
2,53,Bretagne,bretagne
3,COM,Collectivites-d-Outre-Mer,com
";

const DEPARTMENTS_CSV: &str = "\
id,region_code,code,name
1,84,01,Ain
2,84,07,Ardeche
3,53,35,Ille-et-Vilaine
4,53,29,Finistere
5,COM,975,Saint-Pierre-et-Miquelon
";

const GEOJSON: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": {"code": "84", "nom": "Auvergne-Rhone-Alpes"},
      "geometry": {"type": "Polygon",
        "coordinates": [[[4.0, 45.0], [6.0, 45.0], [5.0, 46.5], [4.0, 45.0]]]}
    },
    {
      "type": "Feature",
      "properties": {"code": "53", "nom": "Bretagne"},
      "geometry": {"type": "MultiPolygon",
        "coordinates": [[[[-4.5, 48.0], [-3.0, 48.0], [-3.7, 48.8], [-4.5, 48.0]]]]}
    }
  ]
}"#;

fn write_file(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = File::create(&path).unwrap();
    file.write_all(body.as_bytes()).unwrap();
    path
}

fn referendum_header() -> String {
    "Department code;Department name;Town code;Town name;Registered;Abstentions;Null;Choice A;Choice B\n"
        .to_string()
}

/// Runs load + both merges over fixture files, returning the joined rows.
fn run_to_areas(dir: &TempDir, referendum_csv: &str, strict: bool) -> Vec<ReferendumArea> {
    let regions = load_regions(&write_file(dir, "regions.csv", REGIONS_CSV)).unwrap();
    let departments =
        load_departments(&write_file(dir, "departments.csv", DEPARTMENTS_CSV)).unwrap();
    let referendum =
        load_referendum(&write_file(dir, "referendum.csv", referendum_csv)).unwrap();

    let (region_departments, _) =
        merge_regions_and_departments(&regions, &departments, strict).unwrap();
    let (areas, _) = merge_referendum_and_areas(&referendum, &region_departments, strict).unwrap();
    areas
}

#[test]
fn end_to_end_totals_match_filtered_input() {
    let dir = tempfile::tempdir().unwrap();
    let mut body = referendum_header();
    // bare department codes, the reference table is zero-padded
    body.push_str("1;Ain;004;Ambronay;1500;400;50;600;450\n");
    body.push_str("1;Ain;007;Amberieu;2000;500;100;800;600\n");
    body.push_str("7;Ardeche;001;Annonay;1000;200;30;500;270\n");
    body.push_str("35;Ille-et-Vilaine;238;Rennes;5000;1000;200;2200;1600\n");
    body.push_str("29;Finistere;019;Brest;3000;600;100;1300;1000\n");
    body.push_str("ZA;Guadeloupe;001;Basse-Terre;900;300;40;300;260\n");

    let areas = run_to_areas(&dir, &body, true);
    assert_eq!(areas.len(), 5); // the ZA row is gone

    let results = compute_results_by_region(&areas);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].region_code, "53");
    assert_eq!(results[1].region_code, "84");

    // conservation over the filtered input
    let input_choice_a: u64 = areas.iter().map(|a| a.counts.choice_a).sum();
    let output_choice_a: u64 = results.iter().map(|r| r.counts.choice_a).sum();
    assert_eq!(input_choice_a, output_choice_a);
    assert_eq!(output_choice_a, 600 + 800 + 500 + 2200 + 1300);

    let ara = &results[1];
    assert_eq!(ara.region_name, "Auvergne-Rhone-Alpes");
    assert_eq!(ara.counts.registered, 1500 + 2000 + 1000);
    assert_eq!(ara.counts.choice_b, 450 + 600 + 270);
}

#[test]
fn bare_code_reaches_its_padded_department() {
    let dir = tempfile::tempdir().unwrap();
    let mut body = referendum_header();
    body.push_str("1;Ain;004;Ambronay;100;10;5;50;35\n");

    let areas = run_to_areas(&dir, &body, true);
    assert_eq!(areas.len(), 1);
    assert_eq!(areas[0].department_code, "01");
    assert_eq!(areas[0].region_code, "84");
}

#[test]
fn randomized_fixture_conserves_every_count_column() {
    let dir = tempfile::tempdir().unwrap();
    let mut rng = rand::rng();

    let metropolitan = ["1", "7", "35", "29"];
    let mut body = referendum_header();
    let mut expected = [0u64; 5]; // registered, abstentions, null, a, b
    for town in 0..200 {
        let code = metropolitan[rng.random_range(0..metropolitan.len())];
        let counts: [u64; 5] = [
            rng.random_range(500..5000),
            rng.random_range(0..500),
            rng.random_range(0..100),
            rng.random_range(0..2000),
            rng.random_range(0..2000),
        ];
        for (slot, value) in expected.iter_mut().zip(counts) {
            *slot += value;
        }
        body.push_str(&format!(
            "{code};Dep;{town:03};Town {town};{};{};{};{};{}\n",
            counts[0], counts[1], counts[2], counts[3], counts[4]
        ));
    }
    // overseas noise that must not show up in any total
    for town in 0..20 {
        body.push_str(&format!("ZZ;Abroad;{town:03};Consulat {town};100;10;5;40;45\n"));
    }

    let areas = run_to_areas(&dir, &body, true);
    assert_eq!(areas.len(), 200);

    let results = compute_results_by_region(&areas);
    let totals = results.iter().fold([0u64; 5], |mut acc, r| {
        acc[0] += r.counts.registered;
        acc[1] += r.counts.abstentions;
        acc[2] += r.counts.null_votes;
        acc[3] += r.counts.choice_a;
        acc[4] += r.counts.choice_b;
        acc
    });
    assert_eq!(totals, expected);

    for result in &results {
        if let Some(ratio) = result.counts.ratio() {
            assert!((0.0..=1.0).contains(&ratio));
        }
    }
}

#[test]
fn strict_mode_rejects_unknown_departments() {
    let dir = tempfile::tempdir().unwrap();
    let mut body = referendum_header();
    body.push_str("1;Ain;004;Ambronay;100;10;5;50;35\n");
    body.push_str("99;Mystere;001;Nulle-Part;100;10;5;50;35\n");

    let regions = load_regions(&write_file(&dir, "regions.csv", REGIONS_CSV)).unwrap();
    let departments =
        load_departments(&write_file(&dir, "departments.csv", DEPARTMENTS_CSV)).unwrap();
    let referendum =
        load_referendum(&write_file(&dir, "referendum.csv", &body)).unwrap();

    let (region_departments, _) =
        merge_regions_and_departments(&regions, &departments, true).unwrap();

    let err = merge_referendum_and_areas(&referendum, &region_departments, true).unwrap_err();
    assert!(matches!(err, AtlasError::Unmatched { count: 1, .. }));

    // lenient mode keeps going with the matched row only
    let (areas, report) =
        merge_referendum_and_areas(&referendum, &region_departments, false).unwrap();
    assert_eq!(areas.len(), 1);
    assert_eq!(report.unmatched, 1);
}

#[test]
fn map_and_table_outputs_are_written() {
    let dir = tempfile::tempdir().unwrap();
    let mut body = referendum_header();
    body.push_str("1;Ain;004;Ambronay;1000;100;50;500;350\n");
    body.push_str("35;Ille-et-Vilaine;238;Rennes;5000;1000;200;2200;1600\n");

    let areas = run_to_areas(&dir, &body, true);
    let results: Vec<RegionResult> = compute_results_by_region(&areas);

    let shapes = load_region_shapes(&write_file(&dir, "regions.geojson", GEOJSON)).unwrap();
    assert_eq!(shapes.len(), 2);

    let svg = render_choropleth(&shapes, &results);
    assert!(svg.contains("data-code=\"84\""));
    assert!(svg.contains("data-code=\"53\""));

    let svg_path = dir.path().join("map.svg");
    std::fs::write(&svg_path, &svg).unwrap();
    let table_path = dir.path().join("results.csv");
    write_results_csv(&table_path, &results).unwrap();

    let table = std::fs::read_to_string(&table_path).unwrap();
    assert!(table.starts_with("code_reg,name_reg,"));
    // one line per region plus the header
    assert_eq!(table.lines().count(), results.len() + 1);
}
