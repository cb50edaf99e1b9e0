use actix_web::{HttpResponse, Responder};
use common::requests::RootMessage;

/// `GET /api/`
pub async fn process() -> impl Responder {
    HttpResponse::Ok().json(RootMessage {
        message: "Hello World".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use actix_web::test;
    use common::requests::RootMessage;

    use crate::services::testing::seeded_state;

    #[actix_web::test]
    async fn greets() {
        let app = test_app!(seeded_state(None).await);
        let req = test::TestRequest::get().uri("/api/").to_request();
        let body: RootMessage = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.message, "Hello World");
    }
}
