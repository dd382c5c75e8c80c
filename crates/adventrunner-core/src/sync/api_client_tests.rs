//! Tests for the api_client module, against a mock HTTP server.

#[cfg(test)]
mod tests {
    use super::super::api_client::ApiClient;
    use super::super::auth::RequestConfig;
    use crate::calendar::{DoorState, UserData};
    use crate::error::CoreError;

    fn auth() -> RequestConfig {
        RequestConfig::from_token("test-token")
    }

    /// A small but complete server record in the backend's wire shape.
    fn user_record_json() -> &'static str {
        r#"{
            "version": "2",
            "calendars": {
                "2023": {
                    "version": "2",
                    "settings": {
                        "distanceFactor": 1.0,
                        "sharedLinkId": {"Case": "None", "Fields": []}
                    },
                    "doors": [
                        {"day": 1, "distance": 5.0, "state": {"case": "Open"}},
                        {"day": 2, "distance": 5.0, "state": {"case": "Closed"}}
                    ],
                    "owner": {"name": "runner"},
                    "verifiedDistance": {"Case": "Some", "Fields": [42.5]}
                }
            },
            "owner": {"name": "runner"},
            "displayName": {"Case": "None", "Fields": []},
            "latestPeriod": 2023
        }"#
    }

    #[tokio::test]
    async fn fetch_user_data_sends_bearer_and_decodes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/calendars")
            .match_header("authorization", "Bearer test-token")
            .with_status(200)
            .with_body(user_record_json())
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let data = client.fetch_user_data(&auth()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(data.latest_period, 2023);
        let calendar = &data.calendars[&2023];
        assert_eq!(calendar.doors[0].state, DoorState::Open);
        assert_eq!(*calendar.verified_distance.value(), 42.5);
    }

    #[tokio::test]
    async fn store_user_data_puts_full_record() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/api/calendars")
            .match_header("authorization", "Bearer test-token")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "latestPeriod": 0,
                "displayName": {"Case": "None", "Fields": []}
            })))
            .with_status(200)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        client
            .store_user_data(&auth(), &UserData::empty())
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unpublish_targets_link_id_path() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/sharedCalendars/xyz")
            .with_status(200)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        client.unpublish_calendar(&auth(), "xyz").await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn shared_calendar_200_decodes_snapshot() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/sharedCalendars/abc")
            .with_status(200)
            .with_body(
                r#"{
                    "calendar": {
                        "version": "2",
                        "settings": {"distanceFactor": 1.0},
                        "doors": [],
                        "owner": {"name": "runner"}
                    },
                    "period": 2023,
                    "displayName": {"Case": "Some", "Fields": ["Runner"]}
                }"#,
            )
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let snapshot = client.fetch_shared_calendar("abc").await.unwrap().unwrap();
        assert_eq!(snapshot.period, 2023);
        assert_eq!(snapshot.display_name.value(), "Runner");
        // fields omitted by the wire format read as the empty case
        assert!(snapshot.calendar.settings.shared_link_id.is_none());
        assert!(snapshot.calendar.verified_distance.is_none());
    }

    #[tokio::test]
    async fn shared_calendar_404_is_not_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/sharedCalendars/gone")
            .with_status(404)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let snapshot = client.fetch_shared_calendar("gone").await.unwrap();
        assert!(snapshot.is_none());
    }

    #[tokio::test]
    async fn shared_calendar_500_is_a_hard_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/sharedCalendars/abc")
            .with_status(500)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let err = client.fetch_shared_calendar("abc").await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::UnexpectedStatus { status: 500, .. }
        ));
    }

    #[tokio::test]
    async fn rejected_credentials_map_to_auth_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/calendars")
            .with_status(401)
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let err = client.fetch_user_data(&auth()).await.unwrap_err();
        assert!(matches!(err, CoreError::Auth(_)));
    }

    #[tokio::test]
    async fn garbage_body_maps_to_json_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/calendars")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = ApiClient::new(&server.url()).unwrap();
        let err = client.fetch_user_data(&auth()).await.unwrap_err();
        assert!(matches!(err, CoreError::Json(_)));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            ApiClient::new("not a url"),
            Err(CoreError::InvalidInput(_))
        ));
    }
}
