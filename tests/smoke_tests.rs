use motioner_cli::config::config::HitsConfig;
use motioner_cli::smoke::{self, ProbeOutcome, SmokeReport};
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn default_phrases_match_the_classic_probes() {
    let phrases = smoke::default_phrases();
    assert_eq!(phrases.len(), 4);
    assert_eq!(phrases[0], "asdf");
    assert!(phrases.contains(&"mer pengar till .*".to_string()));
    assert!(phrases.contains(&"asdf,qwer,zxcv parti:(m,s) år:(1995-2000)".to_string()));
}

#[test]
fn sweep_plan_probes_every_endpoint_in_order() {
    let phrases = vec!["a".to_string(), "b".to_string()];
    let plan = smoke::sweep_plan(&phrases, &HitsConfig::default());

    // 3 probes per phrase plus the 3 phrase-less endpoints
    assert_eq!(plan.len(), 9);

    assert_eq!(plan[0].path(), "/motioner");
    assert_eq!(plan[0].phrase(), Some("a"));
    assert_eq!(plan[1].path(), "/motioner/timeline/search");
    assert_eq!(plan[2].path(), "/motioner/hits");
    assert_eq!(plan[3].path(), "/motioner");
    assert_eq!(plan[3].phrase(), Some("b"));

    assert_eq!(plan[6].path(), "/motioner/timeline/total");
    assert_eq!(plan[7].path(), "/queries/latest");
    assert_eq!(plan[8].path(), "/queries/top");
}

#[test]
fn hits_probe_uses_configured_defaults() {
    let hits = HitsConfig {
        start_date: 1995,
        end_date: 2000,
        from_index: 40,
        query_mode: Some("phrase".to_string()),
    };
    let plan = smoke::sweep_plan(&["asdf".to_string()], &hits);

    let query = plan[2].query();
    assert!(query.contains(&("startDate".to_string(), "1995".to_string())));
    assert!(query.contains(&("endDate".to_string(), "2000".to_string())));
    assert!(query.contains(&("fromIndex".to_string(), "40".to_string())));
    assert!(query.contains(&("queryMode".to_string(), "phrase".to_string())));
}

#[test]
fn phrase_files_skip_comments_and_blanks() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "# probes for the budget debate").unwrap();
    writeln!(file).unwrap();
    writeln!(file, "mer pengar till .*").unwrap();
    writeln!(file, "  parti:(m,s)  ").unwrap();
    writeln!(file, "# trailing comment").unwrap();
    file.flush().unwrap();

    let phrases = smoke::load_phrases(file.path()).unwrap();
    assert_eq!(phrases, vec!["mer pengar till .*", "parti:(m,s)"]);
}

#[test]
fn missing_phrase_file_is_an_error() {
    assert!(smoke::load_phrases(std::path::Path::new("/no/such/file")).is_err());
}

#[test]
fn report_counts_failures_without_aborting() {
    let mut report = SmokeReport::default();
    report.push(ProbeOutcome {
        request: "GET /motioner?searchPhrase=asdf".to_string(),
        phrase: Some("asdf".to_string()),
        success: true,
        duration_ms: 12,
        error: None,
    });
    report.push(ProbeOutcome {
        request: "GET /queries/top".to_string(),
        phrase: None,
        success: false,
        duration_ms: 3,
        error: Some("server returned 500: boom".to_string()),
    });
    report.push(ProbeOutcome {
        request: "GET /queries/latest".to_string(),
        phrase: None,
        success: true,
        duration_ms: 5,
        error: None,
    });

    assert_eq!(report.passed(), 2);
    assert_eq!(report.failed(), 1);
    assert!(!report.is_success());
}
