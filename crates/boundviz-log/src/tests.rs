
use crate::SectionParser;
use crate::ir::{InstanceOutcome, SkipReason};
use crate::parser::Mode;

#[test]
fn test_parse_empty_log() {
    let report = SectionParser::new().parse("");
    assert!(report.instances.is_empty());
    assert!(report.unterminated.is_none());
    assert!(report.is_empty());
}

#[test]
fn test_parser_default() {
    let report = SectionParser::default().parse("some unrelated solver chatter\n");
    assert!(report.instances.is_empty());
    assert_eq!(report.lines, 1);
}

#[test]
fn test_settings_default_when_no_parameter_file() {
    let log = "Root bounds\niter\tpb\tdb\n0\t1\t0\nPricing Summary:\nAddedVarDetails:\n\
        Root node:\n";
    let report = SectionParser::new().parse(log);
    let input = report.finalized().next().unwrap();
    assert_eq!(input.settings, "default");
}

#[test]
fn test_unterminated_variable_section_produces_nothing() {
    let log = r#"
Root bounds
iter	pb	db
0	10	5
Pricing Summary:
AddedVarDetails:
VAR: name	node	time	rootredcostcall	rootlpsolval	solval
VAR: <a>	1	0.0	0	1	0
"#;
    let report = SectionParser::new().parse(log);
    assert!(report.instances.is_empty());
    assert_eq!(report.unterminated, Some(Mode::InVariableDetails));
}

#[test]
fn test_bounds_without_variable_section_are_never_finalized() {
    let log = "Root bounds\niter\tpb\tdb\n0\t10\t5\nPricing Summary:\n";
    let report = SectionParser::new().parse(log);
    assert!(report.instances.is_empty());
    assert_eq!(report.unterminated, None);
}

#[test]
fn test_empty_bounds_are_skipped_with_status() {
    let log = r#"
Original Program statistics:
SCIP Status        : solving was interrupted [time limit reached]
  Problem name     : /data/hard.mps
Master Program statistics:
Root bounds
iter	pb	db
Pricing Summary:
AddedVarDetails:
Root node:	Added Vars 0
"#;
    let report = SectionParser::new().parse(log);
    assert_eq!(
        report.instances,
        vec![InstanceOutcome::Skipped {
            instance: Some("hard".into()),
            settings: "default".into(),
            reason: SkipReason::EmptyBoundsTable,
            solver_status: Some("solving was interrupted [time limit reached]".into()),
        }]
    );
}

#[test]
fn test_malformed_row_fails_only_its_instance() {
    let log = r#"
@01 first
Root bounds
iter	pb	db
0	10	oops
Pricing Summary:
AddedVarDetails:
Root node:
@01 second
Root bounds
iter	pb	db
0	10	5
Pricing Summary:
AddedVarDetails:
Root node:
"#;
    let report = SectionParser::new().parse(log);
    assert_eq!(report.instances.len(), 2);
    assert!(matches!(report.instances[0], InstanceOutcome::Failed { .. }));
    assert!(matches!(report.instances[1], InstanceOutcome::Finalized(_)));
}

#[test]
fn test_problem_name_outside_original_block_ignored() {
    let log = r#"
  Problem name     : /data/wrong.mps
Original Program statistics:
  Problem name     : /data/right.mps.gz
Presolved Problem  :
  Problem name     : /data/presolved.mps
Root bounds
iter	pb	db
0	1	0
Pricing Summary:
AddedVarDetails:
Root node:
"#;
    let report = SectionParser::new().parse(log);
    assert_eq!(report.instances[0].instance(), Some("right"));
}

#[test]
fn test_blank_problem_name_falls_back_to_read_problem() {
    let log = r#"
read problem </data/set/cap41.lp.gz>
Original Program statistics:
  Problem name     : BLANK
Master Program statistics:
Root bounds
iter	pb	db
0	1	0
Pricing Summary:
AddedVarDetails:
Root node:
"#;
    let report = SectionParser::new().parse(log);
    assert_eq!(report.instances[0].instance(), Some("cap41"));
}

#[test]
fn test_missing_instance_name_stays_unset() {
    let log = "Root bounds\niter\tpb\tdb\n0\t1\t0\nPricing Summary:\nAddedVarDetails:\n\
        Root node:\n";
    let report = SectionParser::new().parse(log);
    assert_eq!(report.instances[0].instance(), None);
}

#[test]
fn test_marker_lines_inside_bounds_section_are_data() {
    // Only the markers ahead of the root-bounds rules win inside the section.
    let log = r#"
Root bounds
iter	pb	db
0	10	5
AddedVarDetails:
"#;
    let mut parser = SectionParser::new();
    for line in log.lines() {
        parser.feed_line(line);
    }
    assert_eq!(parser.mode(), Mode::InRootBounds);
}

#[test]
fn test_blank_lines_in_sections_ignored() {
    let log = "Root bounds\niter\tpb\tdb\n\n0\t10\t5\n   \nPricing Summary:\n\
        AddedVarDetails:\n\
        VAR: name\tnode\ttime\trootredcostcall\trootlpsolval\tsolval\n\nRoot node:\n";
    let report = SectionParser::new().parse(log);
    let input = report.finalized().next().unwrap();
    assert_eq!(input.table.len(), 1);
}

#[test]
fn test_json_export_carries_schema_version() {
    let log = "Root bounds\niter\tpb\tdb\n0\t1\t-1e+20\nPricing Summary:\n\
        AddedVarDetails:\nRoot node:\n";
    let json = SectionParser::new().parse(log).to_json_pretty().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["schema_version"], crate::SCHEMA_VERSION);
    assert_eq!(value["instances"][0]["status"], "finalized");
    assert_eq!(value["instances"][0]["lp_max"], 0);
}
