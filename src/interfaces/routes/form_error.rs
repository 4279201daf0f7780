use actix_web::{HttpResponse, ResponseError, error::UrlencodedError, http::StatusCode, web};
use serde_json::json;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::FormConfig::default().error_handler(|err, _req| FormError::from(err).into()));
}

/// Maps form-deserialization failures onto the endpoint's JSON body shape.
#[derive(Debug)]
pub struct FormError {
    message: String,
    status: StatusCode,
}

impl std::fmt::Display for FormError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for FormError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        HttpResponse::build(self.status).json(json!({
            "success": false,
            "message": self.message
        }))
    }
}

impl From<UrlencodedError> for FormError {
    fn from(err: UrlencodedError) -> Self {
        FormError {
            message: format!("Malformed form body: {}", err),
            status: StatusCode::BAD_REQUEST,
        }
    }
}
