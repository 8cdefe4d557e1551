mod common;

use common::{campaign, client_config, logged_in_client, CAMPAIGNS_PATH, PROGRAMS_PATH};
use rsys::services::export::{CAMPAIGNS_FILE, PROGRAMS_FILE, THROTTLE_LIMITS_FILE};
use rsys::{CampaignPage, CampaignType, ExportOptions, ExportService, ProgramPage};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_export_against_api() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/api/ratelimit"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"resourceName": "listCampaigns", "limit": 1000}
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(CAMPAIGNS_PATH))
        .and(query_param("type", "email"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "campaigns": [campaign(1, "Welcome"), campaign(2, "Winback")],
            "links": []
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(PROGRAMS_PATH))
        .and(query_param("status", "RUNNING"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "programs": [{"id": 7, "name": "Nurture", "status": "RUNNING"}],
            "links": []
        })))
        .mount(&mock_server)
        .await;

    let client = logged_in_client(&mock_server, client_config(&mock_server)).await;
    let service = ExportService::new(Arc::new(client));

    let dir = tempfile::tempdir().unwrap();
    let options = ExportOptions {
        campaign_type: CampaignType::Email,
        program_status: Some("RUNNING".to_string()),
    };
    let summary = service.export_all(dir.path(), &options).await.unwrap();

    assert_eq!(summary.campaigns, 2);
    assert_eq!(summary.programs, 1);
    assert_eq!(
        summary.files,
        vec![
            dir.path().join(THROTTLE_LIMITS_FILE),
            dir.path().join(CAMPAIGNS_FILE),
            dir.path().join(PROGRAMS_FILE),
        ]
    );

    let campaigns: CampaignPage =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join(CAMPAIGNS_FILE)).unwrap())
            .unwrap();
    assert_eq!(campaigns.campaigns[1].name, "Winback");

    let programs: ProgramPage =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join(PROGRAMS_FILE)).unwrap())
            .unwrap();
    assert_eq!(programs.programs[0].status.as_deref(), Some("RUNNING"));

    let limits: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(dir.path().join(THROTTLE_LIMITS_FILE)).unwrap(),
    )
    .unwrap();
    assert_eq!(limits[0]["resourceName"], "listCampaigns");
}
