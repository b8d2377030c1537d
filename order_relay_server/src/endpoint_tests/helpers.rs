use actix_http::Request;
use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web::ServiceConfig, App};
use log::debug;

use crate::middleware::SHARED_SECRET_HEADER;

/// Issues a GET request against an app set up by `configure`. Requests rejected by a middleware come back as `Err`
/// with the rejection message.
pub async fn get_request<F>(secret: &str, path: &str, configure: F) -> Result<(StatusCode, String), String>
where F: FnOnce(&mut ServiceConfig) {
    let mut req = TestRequest::get().uri(path);
    if !secret.is_empty() {
        req = req.insert_header((SHARED_SECRET_HEADER, secret));
    }
    send(req.to_request(), configure).await
}

pub async fn post_request<F>(
    headers: &[(&str, &str)],
    path: &str,
    body: &[u8],
    configure: F,
) -> Result<(StatusCode, String), String>
where
    F: FnOnce(&mut ServiceConfig),
{
    let mut req = TestRequest::post().uri(path).set_payload(body.to_vec());
    for (name, value) in headers {
        req = req.insert_header((*name, *value));
    }
    send(req.to_request(), configure).await
}

async fn send<F>(req: Request, configure: F) -> Result<(StatusCode, String), String>
where F: FnOnce(&mut ServiceConfig) {
    let app = App::new().configure(configure);
    let service = test::init_service(app).await;
    debug!("Making request");
    let (_, res) = test::try_call_service(&service, req).await.map_err(|e| e.to_string())?.into_parts();
    let status = res.status();
    let body = String::from_utf8_lossy(&res.into_body().try_into_bytes().unwrap()).into_owned();
    Ok((status, body))
}
