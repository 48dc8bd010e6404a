//! Integration tests for the booking API

mod test_utils;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use chrono::{Datelike, Timelike};
    use serde_json::json;
    use tower::util::ServiceExt;

    use crate::test_utils::{
        CONTACT_EMAIL, TestCalendar, body_to_json, json_request, test_app_with,
    };

    fn booking(date: &str, time: &str) -> serde_json::Value {
        json!({
            "name": "Ada Lovelace",
            "email": "ada@example.com",
            "company": "Analytical Engines",
            "message": "Notes on the engine",
            "selectedDate": date,
            "selectedTime": time,
        })
    }

    /// A date already past this year is booked next year
    #[tokio::test]
    async fn it_books_past_dates_next_year() {
        let calendar = Arc::new(TestCalendar::configured());
        let app = test_app_with(Arc::clone(&calendar));

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/booking",
                booking("Thursday, February 19", "11:00 AM"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_to_json(response.into_body()).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["eventId"], "evt_1");
        assert_eq!(body["meetLink"], "https://meet.google.com/abc-defg-hij");
        assert!(body["htmlLink"].is_string());

        let inserted = calendar.inserted();
        assert_eq!(inserted.len(), 1);
        let event = &inserted[0];
        assert_eq!(event.start.year(), 2027);
        assert_eq!(event.start.month(), 2);
        assert_eq!(event.start.day(), 19);
        assert_eq!(event.start.hour(), 11);
        assert_eq!((event.end - event.start).num_minutes(), 60);
        assert_eq!(event.attendees[0].email, "ada@example.com");
    }

    /// A date still ahead this year stays in this year
    #[tokio::test]
    async fn it_books_upcoming_dates_this_year() {
        let calendar = Arc::new(TestCalendar::configured());
        let app = test_app_with(Arc::clone(&calendar));

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/booking",
                booking("Friday, November 20", "2:00 PM"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let event = &calendar.inserted()[0];
        assert_eq!(event.start.year(), 2026);
        assert_eq!(event.start.hour(), 14);
    }

    #[tokio::test]
    async fn it_rejects_missing_fields_without_calling_the_calendar() {
        let calendar = Arc::new(TestCalendar::configured());
        let app = test_app_with(Arc::clone(&calendar));

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/booking",
                json!({ "name": "Ada", "selectedDate": "Thursday, February 19" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_to_json(response.into_body()).await;
        assert!(body["error"].as_str().unwrap().contains("Missing required fields"));
        assert!(calendar.inserted().is_empty());
    }

    #[tokio::test]
    async fn it_rejects_a_malformed_time() {
        let calendar = Arc::new(TestCalendar::configured());
        let app = test_app_with(Arc::clone(&calendar));

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/booking",
                booking("Thursday, February 19", "25:00"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(calendar.inserted().is_empty());
    }

    /// Calendar outages fail the booking and return nothing that looks
    /// like a confirmation
    #[tokio::test]
    async fn it_fails_closed_when_the_calendar_is_down() {
        let app = test_app_with(Arc::new(TestCalendar::unreachable()));

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/booking",
                booking("Thursday, February 19", "11:00 AM"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_to_json(response.into_body()).await;
        assert!(body.get("eventId").is_none());
        assert!(body.get("success").is_none());
        let error = body["error"].as_str().unwrap();
        assert!(error.contains(CONTACT_EMAIL));
        assert!(!error.contains("connection refused"));
    }

    #[tokio::test]
    async fn it_reports_a_missing_calendar_as_a_server_error() {
        let app = test_app_with(Arc::new(TestCalendar::default()));

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/booking",
                booking("Thursday, February 19", "11:00 AM"),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_to_json(response.into_body()).await;
        assert!(body["error"].as_str().unwrap().contains(CONTACT_EMAIL));
    }

    /// Resubmitting with the same token replays the first confirmation
    #[tokio::test]
    async fn it_replays_a_repeated_request_token() {
        let calendar = Arc::new(TestCalendar::configured());
        let app = test_app_with(Arc::clone(&calendar));

        let mut request = booking("Thursday, February 19", "11:00 AM");
        request["requestToken"] = json!("tok-123");

        let first = app
            .clone()
            .oneshot(json_request("POST", "/api/booking", request.clone()))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        let first = body_to_json(first.into_body()).await;

        let second = app
            .oneshot(json_request("POST", "/api/booking", request))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::OK);
        let second = body_to_json(second.into_body()).await;

        assert_eq!(first["eventId"], second["eventId"]);
        assert_eq!(calendar.inserted().len(), 1);
    }

    /// Without a token every submission is a new booking
    #[tokio::test]
    async fn it_does_not_deduplicate_without_a_token() {
        let calendar = Arc::new(TestCalendar::configured());
        let app = test_app_with(Arc::clone(&calendar));

        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(json_request(
                    "POST",
                    "/api/booking",
                    booking("Thursday, February 19", "11:00 AM"),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
        assert_eq!(calendar.inserted().len(), 2);
    }
}
