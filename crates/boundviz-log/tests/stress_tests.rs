use boundviz_log::{JoinKey, ParserConfig, SectionParser};
use std::fmt::Write;

#[test]
fn test_large_root_statistics() {
    const ITERATIONS: usize = 20_000;
    const VARS_PER_ITERATION: usize = 3;

    let mut log = String::from("Root bounds\niter\tpb\tdb\ttime\n");
    for i in 0..ITERATIONS {
        let db = if i < 10 { -1e20 } else { i as f64 };
        writeln!(log, "{i}\t{}\t{db}\t{}", 2 * ITERATIONS, i / 100).unwrap();
    }
    log.push_str("Pricing Summary:\nAddedVarDetails:\n");
    log.push_str("VAR: name\tnode\ttime\trootredcostcall\trootlpsolval\tsolval\n");
    for i in 0..ITERATIONS {
        for k in 0..VARS_PER_ITERATION {
            let lp = if k == 0 { 1.0 } else { 0.0 };
            writeln!(log, "VAR: <v_{i}_{k}>\t1\t0.0\t{i}\t{lp}\t0").unwrap();
        }
    }
    log.push_str("Root node:\n");

    let report = SectionParser::new().parse(&log);
    let input = report.finalized().next().unwrap();
    assert_eq!(input.table.len(), ITERATIONS);
    assert!(input.table.continuous_var_count.iter().all(|&c| c == 1));
    assert_eq!(input.lp_max, 1);
    assert_eq!(input.ip_max, 0);
    assert_eq!(input.table.dual_bounds().iter().filter(|v| v.is_none()).count(), 10);
}

#[test]
fn test_large_iteration_join() {
    const ITERATIONS: usize = 50_000;
    const VARS_PER_ITERATION: usize = 4;
    const FIRST_ITER: usize = 1_000;

    let mut log = String::from("Root bounds\niter\tpb\tdb\n");
    for i in 0..ITERATIONS {
        writeln!(log, "{}\t100\t{i}", FIRST_ITER + i).unwrap();
    }
    log.push_str("Pricing Summary:\nAddedVarDetails:\n");
    log.push_str("VAR: name\tnode\ttime\trootredcostcall\trootlpsolval\tsolval\n");
    for i in 0..ITERATIONS {
        for k in 0..VARS_PER_ITERATION {
            let ip = if k == 0 { 1.0 } else { 0.0 };
            writeln!(log, "VAR: <v_{i}_{k}>\t1\t0.0\t{}\t1\t{ip}", FIRST_ITER + i).unwrap();
        }
    }
    log.push_str("Root node:\n");

    let config = ParserConfig {
        join: JoinKey::Iteration,
        ..ParserConfig::default()
    };
    let report = SectionParser::with_config(config).parse(&log);
    let input = report.finalized().next().unwrap();
    assert_eq!(input.table.len(), ITERATIONS);
    assert!(input.table.continuous_var_count.iter().all(|&c| c == VARS_PER_ITERATION as u32));
    assert!(input.table.integral_var_count.iter().all(|&c| c == 1));
}

#[test]
fn test_garbage_does_not_panic() {
    let noise = "Root bounds\niter\tpb\tdb\n\u{0}\u{7f}\t\t\n@01\nAddedVarDetails:\n\
        VAR: name\tnode\ttime\n\nVAR:\nRoot node:\nRoot node:\n";
    let report = SectionParser::new().parse(&noise.repeat(50));
    assert!(report.lines > 0);
}
