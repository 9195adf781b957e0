use std::time::Duration;

use lambda_http::http::{header::CONTENT_TYPE, StatusCode};
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use tracing::warn;
use wfh::{Config, Deliverer, Reply, Wfh, JSON_CONTENT_TYPE};

// The invocation waits for delivery, so keep it well inside Slack's 3s window.
const DELIVERY_TIMEOUT: Duration = Duration::from_secs(2);

struct App {
    wfh: Wfh,
    deliverer: Deliverer,
}

async fn function_handler(app: &App, event: Request) -> Result<Response<Body>, Error> {
    let body = match std::str::from_utf8(event.body()) {
        Ok(body) => body,
        Err(error) => {
            warn!(%error, "request body is not UTF-8");
            return status_response(StatusCode::BAD_REQUEST);
        }
    };

    let reply = match app.wfh.respond(body) {
        Ok(reply) => reply,
        Err(error) => {
            warn!(%error, "rejected slash command");
            let status = StatusCode::from_u16(error.status_code())?;
            return status_response(status);
        }
    };

    match reply.callback_url(app.wfh.config().response_mode) {
        Some(url) => {
            app.deliverer.deliver_and_log(url, reply.body.clone()).await;
            Ok(Response::builder().status(StatusCode::OK).body(Body::Empty)?)
        }
        None => inline_response(reply),
    }
}

fn inline_response(reply: Reply) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
        .header("X-Content-Type-Options", "nosniff")
        .body(Body::from(reply.body))?)
}

fn status_response(status: StatusCode) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain")
        .body(Body::from(status.canonical_reason().unwrap_or_default()))?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .without_time()
        .init();

    let config = Config::from_env(DELIVERY_TIMEOUT)?;
    let deliverer = Deliverer::new(config.delivery_timeout)?;
    let app = App {
        wfh: Wfh::new(config),
        deliverer,
    };

    let app = &app;
    run(service_fn(move |event: Request| async move {
        function_handler(app, event).await
    }))
    .await
}
