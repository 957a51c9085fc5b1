use motioner_cli::api_client::{ApiError, Endpoint, HitsRequest};

#[test]
fn search_uses_camel_case_parameter() {
    let endpoint = Endpoint::search("mer pengar till .*");
    assert_eq!(endpoint.path(), "/motioner");
    assert_eq!(
        endpoint.query(),
        &[("searchPhrase".to_string(), "mer pengar till .*".to_string())]
    );
}

#[test]
fn timeline_total_has_no_query() {
    let endpoint = Endpoint::timeline_total();
    assert_eq!(endpoint.path(), "/motioner/timeline/total");
    assert!(endpoint.query().is_empty());
    assert_eq!(endpoint.phrase(), None);
}

#[test]
fn timeline_search_carries_the_phrase() {
    let endpoint = Endpoint::timeline_search("asdf,qwer,zxcv parti:(m,s) år:(1995-2000)");
    assert_eq!(endpoint.path(), "/motioner/timeline/search");
    assert_eq!(
        endpoint.phrase(),
        Some("asdf,qwer,zxcv parti:(m,s) år:(1995-2000)")
    );
}

#[test]
fn hits_includes_paging_parameters() {
    let endpoint = Endpoint::hits(&HitsRequest {
        search_phrase: "mer .* till författare:(anders borg)".to_string(),
        start_date: 1995,
        end_date: 2000,
        from_index: 20,
        query_mode: None,
    });

    assert_eq!(endpoint.path(), "/motioner/hits");
    assert_eq!(
        endpoint.query(),
        &[
            (
                "searchPhrase".to_string(),
                "mer .* till författare:(anders borg)".to_string()
            ),
            ("startDate".to_string(), "1995".to_string()),
            ("endDate".to_string(), "2000".to_string()),
            ("fromIndex".to_string(), "20".to_string()),
        ]
    );
}

#[test]
fn hits_appends_query_mode_when_set() {
    let endpoint = Endpoint::hits(&HitsRequest {
        search_phrase: "asdf".to_string(),
        start_date: 1971,
        end_date: 2018,
        from_index: 0,
        query_mode: Some("phrase".to_string()),
    });

    let last = endpoint.query().last().unwrap();
    assert_eq!(last, &("queryMode".to_string(), "phrase".to_string()));
}

#[test]
fn queries_endpoints() {
    assert_eq!(Endpoint::latest_queries().path(), "/queries/latest");
    assert_eq!(Endpoint::top_queries().path(), "/queries/top");
}

#[test]
fn http_errors_report_status_and_body_in_one_message() {
    let err = ApiError::Http {
        status: 503,
        body: "search backend unavailable".to_string(),
    };

    let message = err.to_string();
    assert!(message.contains("503"));
    assert!(message.contains("search backend unavailable"));
}

#[test]
fn describe_formats_a_request_line() {
    assert_eq!(
        Endpoint::timeline_total().describe(),
        "GET /motioner/timeline/total"
    );
    assert_eq!(
        Endpoint::search("asdf").describe(),
        "GET /motioner?searchPhrase=asdf"
    );
}
