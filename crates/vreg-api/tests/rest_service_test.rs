#![allow(clippy::unwrap_used)]
// Integration tests for `RestService` using wiremock.

use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use vreg_api::{
    AppError, ClientError, Driver, DriverService, DriverUpdate, EntityService, Error, ErrorInfo,
    ErrorKind, ListQuery, LogType, RegistryClient, Vehicle, VehicleLogCreate, VehicleLogFilter,
    VehicleLogService, VehicleLogUpdate, VehicleService, VehicleUpdate,
};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, RegistryClient) {
    let server = MockServer::start().await;
    let client = RegistryClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    (server, client)
}

fn vehicle_json(number: &str) -> serde_json::Value {
    json!({ "number": number, "brand": "Toyota", "model": "Hilux" })
}

fn log_json(id: u64) -> serde_json::Value {
    json!({
        "id": id,
        "vehicle": vehicle_json("HND-1024"),
        "driver": { "licenseId": "0801-1990", "firstName": "Ana", "surname": "Lopez" },
        "logType": "exit",
        "timestamp": "2024-06-15T18:05:00Z",
        "mileageInKilometers": 15301.0
    })
}

// ── Vehicles ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_vehicles_without_params() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/vehicles"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([vehicle_json("A-1"), vehicle_json("B-2")])),
        )
        .mount(&server)
        .await;

    let service = VehicleService::new(client);
    let vehicles = service.list(&ListQuery::new()).await.unwrap();

    assert_eq!(vehicles.len(), 2);
    assert_eq!(vehicles[0].number, "A-1");
    assert_eq!(vehicles[1].number, "B-2");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_list_vehicles_with_pagination() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/vehicles"))
        .and(query_param("limit", "100"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([vehicle_json("A-1")])))
        .mount(&server)
        .await;

    let service = VehicleService::new(client);
    let vehicles = service.list(&ListQuery::paged(100, 1)).await.unwrap();

    assert_eq!(vehicles.len(), 1);
}

#[tokio::test]
async fn test_get_vehicle() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/vehicles/HND-1024"))
        .respond_with(ResponseTemplate::new(200).set_body_json(vehicle_json("HND-1024")))
        .mount(&server)
        .await;

    let service = VehicleService::new(client);
    let vehicle = service.get_by_id(&"HND-1024".to_owned()).await.unwrap();

    assert_eq!(
        vehicle,
        Vehicle {
            number: "HND-1024".into(),
            brand: "Toyota".into(),
            model: "Hilux".into(),
        }
    );
}

#[tokio::test]
async fn test_update_vehicle_excludes_key_from_body() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/vehicles/HND-1024"))
        .and(body_json(json!({ "brand": "Nissan", "model": null })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "number": "HND-1024", "brand": "Nissan", "model": ""
        })))
        .mount(&server)
        .await;

    let service = VehicleService::new(client);
    let updated = service
        .update(
            &"HND-1024".to_owned(),
            &VehicleUpdate {
                brand: "Nissan".into(),
                model: "  ".into(),
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.brand, "Nissan");
}

#[tokio::test]
async fn test_delete_vehicle() {
    let (server, client) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/vehicles/HND-1024"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let service = VehicleService::new(client);
    service.delete(&"HND-1024".to_owned()).await.unwrap();
}

// ── Drivers ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_driver_omits_blank_fields() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/drivers"))
        .and(body_json(json!({
            "licenseId": "0801-1990",
            "firstName": "Ana",
            "surname": "Lopez"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "licenseId": "0801-1990",
            "firstName": "Ana",
            "surname": "Lopez"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = DriverService::new(client);
    let created = service
        .create(&Driver {
            license_id: "0801-1990".into(),
            first_name: "Ana".into(),
            second_name: Some(String::new()),
            surname: "Lopez".into(),
            second_surname: None,
        })
        .await
        .unwrap();

    assert_eq!(created.full_name(), "Ana Lopez");
}

#[tokio::test]
async fn test_update_driver_sends_null_for_cleared_names() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/drivers/0801-1990"))
        .and(body_json(json!({
            "firstName": "Ana",
            "secondName": null,
            "surname": "Lopez",
            "secondSurname": null
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "licenseId": "0801-1990",
            "firstName": "Ana",
            "surname": "Lopez"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = DriverService::new(client);
    service
        .update(
            &"0801-1990".to_owned(),
            &DriverUpdate {
                first_name: "Ana".into(),
                second_name: Some(" ".into()),
                surname: "Lopez".into(),
                second_surname: None,
            },
        )
        .await
        .unwrap();
}

// ── Vehicle logs ────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_logs_with_filter() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/logs"))
        .and(query_param("vehicle-number", "HND-1024"))
        .and(query_param("driver-license-id", "0801-1990"))
        .and(query_param("date", "2024-06-15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([log_json(1), log_json(2)])))
        .mount(&server)
        .await;

    let service = VehicleLogService::new(client);
    let filter = VehicleLogFilter {
        vehicle_number: Some("HND-1024".into()),
        driver_license_id: Some("0801-1990".into()),
        date: NaiveDate::from_ymd_opt(2024, 6, 15),
    };
    let logs = service
        .list(&ListQuery::new().with_filter(filter))
        .await
        .unwrap();

    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].log_type, LogType::Exit);
    assert_eq!(logs[1].timestamp.to_rfc3339(), "2024-06-15T18:05:00+00:00");
}

#[tokio::test]
async fn test_list_logs_skips_empty_filter_values() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let service = VehicleLogService::new(client);
    let filter = VehicleLogFilter {
        vehicle_number: Some(String::new()),
        ..VehicleLogFilter::default()
    };
    service
        .list(&ListQuery::new().with_filter(filter))
        .await
        .unwrap();

    let requests: Vec<Request> = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_create_and_update_log() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/logs"))
        .and(body_json(json!({
            "vehicleNumber": "HND-1024",
            "driverLicenseId": "0801-1990",
            "logType": "exit",
            "mileageInKilometers": 15301.0
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(log_json(9)))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/logs/9"))
        .and(body_json(json!({ "logType": "entry", "mileageInKilometers": 15400.0 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(log_json(9)))
        .mount(&server)
        .await;

    let service = VehicleLogService::new(client);
    let created = service
        .create(&VehicleLogCreate {
            vehicle_number: "HND-1024".into(),
            driver_license_id: "0801-1990".into(),
            log_type: LogType::Exit,
            mileage_in_kilometers: 15301.0,
        })
        .await
        .unwrap();
    assert_eq!(created.id, 9);

    service
        .update(
            &9,
            &VehicleLogUpdate {
                log_type: LogType::Entry,
                mileage_in_kilometers: 15400.0,
            },
        )
        .await
        .unwrap();
}

// ── Error classification ────────────────────────────────────────────

#[tokio::test]
async fn test_app_error_is_classified() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/vehicles"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "type": "DuplicateError",
            "info": { "message": "Vehicle already exists", "target": { "number": "A-1" } }
        })))
        .mount(&server)
        .await;

    let service = VehicleService::new(client);
    let err = service
        .create(&Vehicle {
            number: "A-1".into(),
            brand: "Kia".into(),
            model: "Rio".into(),
        })
        .await
        .unwrap_err();

    assert_eq!(
        err.app_error(),
        Some(&AppError {
            kind: ErrorKind::DuplicateError,
            info: ErrorInfo::Text(
                "Vehicle already exists: {\n    \"number\": \"A-1\"\n}.".into()
            ),
        })
    );
}

#[tokio::test]
async fn test_unreadable_error_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/drivers"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let service = DriverService::new(client);
    let err = service.list(&ListQuery::new()).await.unwrap_err();

    assert!(
        matches!(
            err,
            Error::Client(ClientError { ref message, info: None })
                if message == "Fail to read response error with status 502."
        ),
        "unexpected error: {err:?}"
    );
}

#[tokio::test]
async fn test_not_found_on_get() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/logs/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "type": "NotFoundError",
            "info": "Vehicle log not found"
        })))
        .mount(&server)
        .await;

    let service = VehicleLogService::new(client);
    let err = service.get_by_id(&404).await.unwrap_err();

    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_malformed_success_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/vehicles/X"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "unexpected": true })))
        .mount(&server)
        .await;

    let service = VehicleService::new(client);
    let err = service.get_by_id(&"X".to_owned()).await.unwrap_err();

    assert!(matches!(err, Error::Deserialization { .. }));
}
