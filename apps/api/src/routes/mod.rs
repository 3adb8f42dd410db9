pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::scheduling::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Reception: every veterinarian
        .route(
            "/api/v1/reception/calendar",
            get(handlers::handle_reception_calendar),
        )
        .route(
            "/api/v1/reception/staff",
            get(handlers::handle_reception_staff),
        )
        .route(
            "/api/v1/reception/appointments",
            post(handlers::handle_reception_create_appointment),
        )
        .route(
            "/api/v1/reception/appointments/upcoming",
            get(handlers::handle_reception_upcoming_appointments),
        )
        .route(
            "/api/v1/reception/appointments/today",
            get(handlers::handle_reception_today),
        )
        .route(
            "/api/v1/reception/appointments/:id",
            get(handlers::handle_reception_get_appointment)
                .put(handlers::handle_reception_update_appointment)
                .delete(handlers::handle_reception_delete_appointment),
        )
        .route(
            "/api/v1/reception/reminders",
            post(handlers::handle_reception_create_reminder),
        )
        .route(
            "/api/v1/reception/reminders/upcoming",
            get(handlers::handle_reception_upcoming_reminders),
        )
        .route(
            "/api/v1/reception/reminders/next",
            get(handlers::handle_reception_next_reminders),
        )
        .route(
            "/api/v1/reception/reminders/:id",
            get(handlers::handle_reception_get_reminder)
                .put(handlers::handle_reception_update_reminder)
                .delete(handlers::handle_reception_delete_reminder),
        )
        .route(
            "/api/v1/reception/owners",
            post(handlers::handle_reception_create_owner),
        )
        .route(
            "/api/v1/reception/pets",
            post(handlers::handle_reception_create_pet),
        )
        // Veterinarian: own records only
        .route(
            "/api/v1/veterinarians/:vet_id/calendar",
            get(handlers::handle_vet_calendar),
        )
        .route(
            "/api/v1/veterinarians/:vet_id/appointments",
            post(handlers::handle_vet_create_appointment),
        )
        .route(
            "/api/v1/veterinarians/:vet_id/appointments/upcoming",
            get(handlers::handle_vet_upcoming_appointments),
        )
        .route(
            "/api/v1/veterinarians/:vet_id/appointments/today",
            get(handlers::handle_vet_today),
        )
        .route(
            "/api/v1/veterinarians/:vet_id/appointments/:id",
            get(handlers::handle_vet_get_appointment)
                .put(handlers::handle_vet_update_appointment)
                .delete(handlers::handle_vet_delete_appointment),
        )
        .route(
            "/api/v1/veterinarians/:vet_id/reminders",
            post(handlers::handle_vet_create_reminder),
        )
        .route(
            "/api/v1/veterinarians/:vet_id/reminders/upcoming",
            get(handlers::handle_vet_upcoming_reminders),
        )
        .route(
            "/api/v1/veterinarians/:vet_id/reminders/next",
            get(handlers::handle_vet_next_reminders),
        )
        .route(
            "/api/v1/veterinarians/:vet_id/reminders/:id",
            get(handlers::handle_vet_get_reminder)
                .put(handlers::handle_vet_update_reminder)
                .delete(handlers::handle_vet_delete_reminder),
        )
        .route(
            "/api/v1/veterinarians/:vet_id/owners",
            post(handlers::handle_vet_create_owner),
        )
        .route(
            "/api/v1/veterinarians/:vet_id/pets",
            post(handlers::handle_vet_create_pet),
        )
        // Form lookups
        .route(
            "/api/v1/lookups/veterinarians",
            get(handlers::handle_lookup_veterinarians),
        )
        .route(
            "/api/v1/lookups/appointment-types",
            get(handlers::handle_lookup_appointment_types),
        )
        .route(
            "/api/v1/lookups/appointment-choices",
            get(handlers::handle_lookup_appointment_choices),
        )
        .route(
            "/api/v1/lookups/owners",
            get(handlers::handle_lookup_owners),
        )
        .route("/api/v1/lookups/pets", get(handlers::handle_lookup_pets))
        .route(
            "/api/v1/lookups/species",
            get(handlers::handle_lookup_species),
        )
        .route(
            "/api/v1/lookups/allergies",
            get(handlers::handle_lookup_allergies),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{NaiveDate, NaiveDateTime};
    use serde_json::{json, Value};
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::calendar::{LocaleLabeler, Palette};
    use crate::clock::FixedClock;
    use crate::errors::AppError;
    use crate::models::appointment::AppointmentRecord;
    use crate::models::lookup::StaffLoadRow;
    use crate::models::reminder::ReminderRecord;
    use crate::scheduling::fetcher::RecordFetcher;
    use crate::scheduling::scope::StaffScope;

    #[derive(Default)]
    struct StubFetcher {
        appointments: Vec<AppointmentRecord>,
        /// Each reminder with the veterinarian owning its appointment.
        reminders: Vec<(i32, ReminderRecord)>,
        staff: Vec<StaffLoadRow>,
        fail: bool,
        seen_scopes: Mutex<Vec<StaffScope>>,
    }

    #[async_trait]
    impl RecordFetcher for StubFetcher {
        async fn appointments_in_range(
            &self,
            start: NaiveDateTime,
            end: NaiveDateTime,
            scope: StaffScope,
        ) -> Result<Vec<AppointmentRecord>, AppError> {
            self.seen_scopes.lock().unwrap().push(scope);
            if self.fail {
                return Err(AppError::Database(sqlx::Error::PoolTimedOut));
            }
            Ok(self
                .appointments
                .iter()
                .filter(|a| a.scheduled_at >= start && a.scheduled_at < end)
                .filter(|a| scope.permits(a.staff_id))
                .cloned()
                .collect())
        }

        async fn reminders_in_range(
            &self,
            start: NaiveDateTime,
            end: NaiveDateTime,
            scope: StaffScope,
        ) -> Result<Vec<ReminderRecord>, AppError> {
            self.seen_scopes.lock().unwrap().push(scope);
            Ok(self
                .reminders
                .iter()
                .filter(|(_, r)| r.remind_at >= start && r.remind_at < end)
                .filter(|(staff_id, _)| scope.permits(*staff_id))
                .map(|(_, r)| r.clone())
                .collect())
        }

        async fn staff_load(
            &self,
            _start: NaiveDateTime,
            _end: NaiveDateTime,
        ) -> Result<Vec<StaffLoadRow>, AppError> {
            Ok(self.staff.clone())
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn appointment(id: i32, staff_id: i32, scheduled_at: NaiveDateTime) -> AppointmentRecord {
        AppointmentRecord {
            id,
            staff_id,
            staff_name: format!("Dr. {staff_id}"),
            pet_id: id,
            pet_name: "Firulais".to_string(),
            owner_name: "Ana López".to_string(),
            appointment_type_id: 1,
            type_name: "Consulta".to_string(),
            scheduled_at,
            base_price_cents: 35_000,
            additional_price_cents: 5_000,
            total_price_cents: 40_000,
            notes: None,
        }
    }

    fn reminder(id: i32, remind_at: NaiveDateTime) -> ReminderRecord {
        ReminderRecord {
            id,
            appointment_id: 1,
            remind_at,
            subject: "Vacuna".to_string(),
            message: "Traer cartilla".to_string(),
            owner_name: "Ana López".to_string(),
            pet_name: "Firulais".to_string(),
            owner_phone: Some("555-0100".to_string()),
            owner_email: None,
        }
    }

    fn app(fetcher: Arc<StubFetcher>, today: NaiveDate) -> Router {
        let db = PgPoolOptions::new()
            .connect_lazy("postgres://vetclinic@localhost/vetclinic_test")
            .unwrap();
        let state = AppState {
            db,
            fetcher,
            palette: Arc::new(Palette::default()),
            labels: Arc::new(LocaleLabeler::default()),
            clock: Arc::new(FixedClock(today.and_hms_opt(9, 15, 0).unwrap())),
        };
        build_router(state)
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(app(Arc::default(), today()), get_req("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_reception_calendar_groups_week_with_palette_colors() {
        let fetcher = Arc::new(StubFetcher {
            appointments: vec![
                appointment(1, 1, at(2024, 3, 4, 9)),
                appointment(2, 2, at(2024, 3, 4, 10)),
                appointment(3, 1, at(2024, 3, 9, 12)),
                appointment(4, 1, at(2024, 3, 12, 9)),
            ],
            ..Default::default()
        });
        let (status, body) = send(
            app(fetcher.clone(), today()),
            get_req("/api/v1/reception/calendar?date=2024-03-10"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["week_start"], "2024-03-04");
        assert_eq!(body["week_end"], "2024-03-10");
        let days = body["days"].as_array().unwrap();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0]["appointments"].as_array().unwrap().len(), 2);
        assert_eq!(days[0]["appointments"][0]["colors"]["background"], "bg-blue-100");
        assert_eq!(days[0]["appointments"][1]["colors"]["background"], "bg-purple-100");
        assert_eq!(days[0]["appointments"][0]["pet_name"], "Firulais");
        assert_eq!(days[5]["business_hours"], json!([9, 10, 11, 12, 13]));
        assert_eq!(days[6]["is_today"], true);
        assert_eq!(days[6]["is_business_day"], false);

        assert_eq!(fetcher.seen_scopes.lock().unwrap()[0], StaffScope::All);
    }

    #[tokio::test]
    async fn test_vet_calendar_is_scoped_and_single_colored() {
        let fetcher = Arc::new(StubFetcher {
            appointments: vec![
                appointment(1, 1, at(2024, 3, 5, 9)),
                appointment(2, 3, at(2024, 3, 5, 10)),
            ],
            ..Default::default()
        });
        let (status, body) = send(
            app(fetcher.clone(), today()),
            get_req("/api/v1/veterinarians/3/calendar?date=2024-03-05"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let tuesday = body["days"][1]["appointments"].as_array().unwrap();
        assert_eq!(tuesday.len(), 1);
        assert_eq!(tuesday[0]["id"], 2);
        assert_eq!(tuesday[0]["colors"]["background"], "bg-blue-100");
        assert_eq!(
            fetcher.seen_scopes.lock().unwrap()[0],
            StaffScope::Veterinarian(3)
        );
    }

    #[tokio::test]
    async fn test_calendar_defaults_to_current_week() {
        let (status, body) = send(
            app(Arc::default(), today()),
            get_req("/api/v1/reception/calendar"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["week_start"], "2024-03-04");
    }

    #[tokio::test]
    async fn test_calendar_rejects_malformed_date() {
        let (status, _) = send(
            app(Arc::default(), today()),
            get_req("/api/v1/reception/calendar?date=next-tuesday"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upcoming_reminders_window() {
        let fetcher = Arc::new(StubFetcher {
            reminders: vec![
                (1, reminder(1, at(2024, 3, 10, 18))),
                (2, reminder(2, at(2024, 3, 13, 8))),
                (1, reminder(3, at(2024, 3, 17, 8))),
            ],
            ..Default::default()
        });
        let (status, body) = send(
            app(fetcher, today()),
            get_req("/api/v1/reception/reminders/upcoming"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let days = body["days"].as_array().unwrap();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0]["date"], "2024-03-10");
        assert_eq!(days[6]["date"], "2024-03-16");
        assert_eq!(days[0]["is_today"], true);
        assert_eq!(days[0]["weekday_name"], "Domingo");
        assert_eq!(days[0]["items"][0]["subject"], "Vacuna");
        assert_eq!(days[3]["items"][0]["id"], 2);
        let total: usize = days
            .iter()
            .map(|d| d["items"].as_array().unwrap().len())
            .sum();
        assert_eq!(total, 2);
    }

    #[tokio::test]
    async fn test_vet_upcoming_appointments_only_own() {
        let fetcher = Arc::new(StubFetcher {
            appointments: vec![
                appointment(1, 1, at(2024, 3, 11, 9)),
                appointment(2, 2, at(2024, 3, 11, 10)),
            ],
            ..Default::default()
        });
        let (status, body) = send(
            app(fetcher, today()),
            get_req("/api/v1/veterinarians/2/appointments/upcoming"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let monday = body["days"][1]["items"].as_array().unwrap();
        assert_eq!(monday.len(), 1);
        assert_eq!(monday[0]["staff_id"], 2);
        assert_eq!(monday[0]["total_price_cents"], 40_000);
    }

    #[tokio::test]
    async fn test_today_uses_single_day_range() {
        let fetcher = Arc::new(StubFetcher {
            appointments: vec![
                appointment(1, 1, at(2024, 3, 10, 11)),
                appointment(2, 1, at(2024, 3, 11, 9)),
            ],
            ..Default::default()
        });
        let (status, body) = send(
            app(fetcher, today()),
            get_req("/api/v1/reception/appointments/today"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["id"], 1);
    }

    #[tokio::test]
    async fn test_staff_roster_colors() {
        let fetcher = Arc::new(StubFetcher {
            staff: vec![
                StaffLoadRow {
                    id: 2,
                    name: "Dra. Beltrán".to_string(),
                    appointment_count: 4,
                },
                StaffLoadRow {
                    id: 11,
                    name: "Dr. Zavala".to_string(),
                    appointment_count: 0,
                },
            ],
            ..Default::default()
        });
        let (status, body) = send(
            app(fetcher, today()),
            get_req("/api/v1/reception/staff?date=2024-03-06"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["week_start"], "2024-03-04");
        assert_eq!(body["staff"][0]["colors"]["background"], "bg-purple-100");
        assert_eq!(body["staff"][0]["appointment_count"], 4);
        assert_eq!(body["staff"][1]["colors"]["background"], "bg-blue-100");
    }

    #[tokio::test]
    async fn test_fetch_failure_is_a_server_error() {
        let fetcher = Arc::new(StubFetcher {
            fail: true,
            ..Default::default()
        });
        let (status, body) = send(
            app(fetcher, today()),
            get_req("/api/v1/reception/calendar"),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "DATABASE_ERROR");
    }

    #[tokio::test]
    async fn test_next_reminders_limit_out_of_range() {
        let (status, body) = send(
            app(Arc::default(), today()),
            get_req("/api/v1/reception/reminders/next?limit=0"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_create_reminder_requires_subject() {
        let (status, body) = send(
            app(Arc::default(), today()),
            post_json(
                "/api/v1/veterinarians/1/reminders",
                json!({
                    "appointment_id": 5,
                    "remind_at": "2024-03-11T09:00:00",
                    "subject": "",
                    "message": "Traer cartilla"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("subject"));
    }

    #[tokio::test]
    async fn test_reception_create_appointment_needs_veterinarian() {
        let (status, body) = send(
            app(Arc::default(), today()),
            post_json(
                "/api/v1/reception/appointments",
                json!({
                    "pet_id": 1,
                    "appointment_type_id": 1,
                    "scheduled_at": "2024-03-11T09:00:00"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("veterinarian_id"));
    }

    #[tokio::test]
    async fn test_negative_surcharge_rejected() {
        let (status, _) = send(
            app(Arc::default(), today()),
            post_json(
                "/api/v1/veterinarians/1/appointments",
                json!({
                    "pet_id": 1,
                    "appointment_type_id": 1,
                    "scheduled_at": "2024-03-11T09:00:00",
                    "additional_price_cents": -1
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_vet_reminder_agenda_only_own() {
        let fetcher = Arc::new(StubFetcher {
            reminders: vec![
                (1, reminder(1, at(2024, 3, 11, 9))),
                (2, reminder(2, at(2024, 3, 11, 10))),
                (2, reminder(3, at(2024, 3, 14, 12))),
            ],
            ..Default::default()
        });
        let (status, body) = send(
            app(fetcher.clone(), today()),
            get_req("/api/v1/veterinarians/2/reminders/upcoming"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let ids: Vec<i64> = body["days"]
            .as_array()
            .unwrap()
            .iter()
            .flat_map(|d| d["items"].as_array().unwrap().iter())
            .map(|r| r["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(
            *fetcher.seen_scopes.lock().unwrap(),
            vec![StaffScope::Veterinarian(2)]
        );
    }

    #[tokio::test]
    async fn test_reception_reminder_agenda_sees_everyone() {
        let fetcher = Arc::new(StubFetcher {
            reminders: vec![
                (1, reminder(1, at(2024, 3, 11, 9))),
                (2, reminder(2, at(2024, 3, 11, 10))),
            ],
            ..Default::default()
        });
        let (status, body) = send(
            app(fetcher.clone(), today()),
            get_req("/api/v1/reception/reminders/upcoming"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["days"][1]["items"].as_array().unwrap().len(), 2);
        assert_eq!(*fetcher.seen_scopes.lock().unwrap(), vec![StaffScope::All]);
    }

    #[tokio::test]
    async fn test_calendar_rejects_dates_at_the_edge_of_the_calendar() {
        for uri in [
            "/api/v1/reception/calendar?date=%2B262142-12-31",
            "/api/v1/reception/calendar?date=-262143-01-01",
            "/api/v1/reception/staff?date=%2B262142-12-31",
            "/api/v1/veterinarians/1/calendar?date=-262143-01-01",
            "/api/v1/reception/calendar?date=%2B10000-01-01",
        ] {
            let fetcher = Arc::new(StubFetcher::default());
            let (status, body) = send(app(fetcher.clone(), today()), get_req(uri)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR", "{uri}");
            assert!(fetcher.seen_scopes.lock().unwrap().is_empty(), "{uri}");
        }
    }

    #[tokio::test]
    async fn test_calendar_accepts_last_supported_week() {
        let (status, body) = send(
            app(Arc::default(), today()),
            get_req("/api/v1/reception/calendar?date=9999-12-31"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["week_start"], "9999-12-27");
        assert_eq!(body["next_week"], "+10000-01-03");
    }

    #[tokio::test]
    async fn test_appointment_outside_calendar_years_rejected() {
        let (status, body) = send(
            app(Arc::default(), today()),
            post_json(
                "/api/v1/veterinarians/1/appointments",
                json!({
                    "pet_id": 1,
                    "appointment_type_id": 1,
                    "scheduled_at": "0000-03-11T09:00:00"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("scheduled_at"));
    }

    #[tokio::test]
    async fn test_create_owner_requires_name() {
        for uri in ["/api/v1/reception/owners", "/api/v1/veterinarians/4/owners"] {
            let (status, body) = send(
                app(Arc::default(), today()),
                post_json(uri, json!({ "name": " ", "phone": "555-0100" })),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert!(body["error"]["message"].as_str().unwrap().contains("name"));
        }
    }

    #[tokio::test]
    async fn test_create_owner_rejects_malformed_email() {
        let (status, body) = send(
            app(Arc::default(), today()),
            post_json(
                "/api/v1/reception/owners",
                json!({ "name": "Ana López", "email": "ana.example.mx" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"].as_str().unwrap().contains("email"));
    }

    #[tokio::test]
    async fn test_create_pet_rejects_impossible_age() {
        for uri in ["/api/v1/reception/pets", "/api/v1/veterinarians/4/pets"] {
            let (status, body) = send(
                app(Arc::default(), today()),
                post_json(
                    uri,
                    json!({
                        "owner_id": 1,
                        "species_id": 1,
                        "name": "Firulais",
                        "age_years": -2,
                        "allergy_ids": [1]
                    }),
                ),
            )
            .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert!(body["error"]["message"]
                .as_str()
                .unwrap()
                .contains("age_years"));
        }
    }

    #[tokio::test]
    async fn test_create_pet_requires_owner() {
        let (status, _) = send(
            app(Arc::default(), today()),
            post_json(
                "/api/v1/reception/pets",
                json!({ "species_id": 1, "name": "Firulais" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
