//! The per-call state machine.
//!
//! `BUILD_URL → MERGE_HEADERS → CONSTRUCT_REQUEST → REQUEST_MIDDLEWARE →
//! NETWORK_CALL → RESPONSE_MIDDLEWARE → NORMALIZE_RESULT`
//!
//! Everything before the request pass is synchronous. The only suspension
//! points are the middleware passes and the network call.

use std::sync::Arc;

use http::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::{Instrument, debug, debug_span, trace, warn};

use crate::{
    CallOptions, ClientConfig, Error, Exchange, FetchResult, HeaderPatch, Method,
    MiddlewareOptions, Outcome, Params, ParseAs, PathTemplate, Payload, Phase, Request, Response,
    Result, build_url, from_json, merge_headers, normalize_base_url,
};

/// Runs one call from path template to normalized result.
pub(crate) async fn dispatch(
    config: &ClientConfig,
    method: Method,
    path: &str,
    options: CallOptions,
) -> Result<FetchResult> {
    let span = debug_span!("fetch", %method, path);
    run(config, method, path, options).instrument(span).await
}

async fn run(
    config: &ClientConfig,
    method: Method,
    path: &str,
    options: CallOptions,
) -> Result<FetchResult> {
    let CallOptions {
        params,
        body,
        query_serializer,
        body_serializer,
        parse_as,
        fetch,
        headers,
        base_url,
        extensions,
    } = options;

    let base_url: Arc<str> = base_url.map_or_else(
        || config.shared_base_url(),
        |url| Arc::from(normalize_base_url(&url)),
    );
    let fetch = fetch.unwrap_or_else(|| config.fetch().clone());
    let query_serializer =
        query_serializer.unwrap_or_else(|| Arc::clone(config.query_serializer()));
    let body_serializer = body_serializer.unwrap_or_else(|| Arc::clone(config.body_serializer()));
    let path_template = PathTemplate::new(path);
    let params = Arc::new(params);

    // BUILD_URL
    let url = build_url(
        path,
        &base_url,
        params.path_params(),
        params.query_params(),
        query_serializer.as_ref(),
    );
    trace!(%url, "url built");
    let unmatched = unmatched_placeholders(&path_template, &params);
    if !unmatched.is_empty() {
        debug!(?unmatched, "path placeholders left unexpanded");
    }
    let url = url::Url::parse(&url)?;

    // MERGE_HEADERS
    let body = match body {
        None | Some(Value::Null) => None,
        Some(body) => Some(body_serializer.serialize(&body)?),
    };
    let defaults = body
        .as_ref()
        .and_then(|_| body_serializer.content_type())
        .map(|content_type| HeaderPatch::new().set(CONTENT_TYPE.as_str(), content_type.as_str()));
    let merged = merge_headers([
        defaults.as_ref(),
        Some(config.headers()),
        Some(&headers),
        Some(params.header_params()),
    ])?;

    // CONSTRUCT_REQUEST
    let mut pass_through = config.extensions().clone();
    pass_through.extend(extensions);
    let mut builder = Request::builder(method, url)
        .headers(merged)
        .extensions(pass_through);
    if let Some(body) = body {
        builder = builder.body(body);
    }
    let mut request = builder.build();

    let options = MiddlewareOptions::new(
        base_url,
        fetch.clone(),
        parse_as,
        query_serializer,
        body_serializer,
    );

    // REQUEST_MIDDLEWARE
    for middleware in config.middleware() {
        let current = request.with_route(path_template.clone(), Arc::clone(&params));
        let outcome = middleware.on_request(&current, &options).await?;
        request = match outcome {
            Outcome::NoChange => current,
            Outcome::Replace(Exchange::Request(replacement)) => {
                debug!(middleware = middleware.name(), "request replaced");
                replacement
            }
            Outcome::Replace(Exchange::Response(_)) => {
                return Err(Error::middleware_contract(middleware.name(), Phase::Request));
            }
        };
    }
    let request = request.with_route(path_template, params);

    // NETWORK_CALL
    debug!(url = %request.url(), "sending request");
    let mut response = fetch.fetch(request.clone()).await?;
    debug!(status = response.status(), "response received");

    // RESPONSE_MIDDLEWARE
    for middleware in config.middleware().iter().rev() {
        let outcome = middleware.on_response(&request, &response, &options).await?;
        match outcome {
            Outcome::NoChange => {}
            Outcome::Replace(Exchange::Response(replacement)) => {
                debug!(middleware = middleware.name(), "response replaced");
                response = replacement;
            }
            Outcome::Replace(Exchange::Request(_)) => {
                return Err(Error::middleware_contract(
                    middleware.name(),
                    Phase::Response,
                ));
            }
        }
    }

    normalize(response, parse_as).await
}

/// Turns a response into exactly one of `data` or `error`.
///
/// Bodies are always read from a clone, so `response` stays readable for the
/// caller. In stream mode a successful body is handed over unread.
pub(crate) async fn normalize(response: Response, parse_as: ParseAs) -> Result<FetchResult> {
    if response.is_empty_content() {
        trace!(status = response.status(), "empty content");
        let result = if response.is_success() {
            FetchResult::Data {
                data: Payload::Empty,
                response,
            }
        } else {
            FetchResult::Error {
                error: Payload::Empty,
                response,
            }
        };
        return Ok(result);
    }

    if response.is_success() {
        let data = parse_as.read(response.clone()).await?;
        if parse_as == ParseAs::Json && !matches!(data, Payload::Json(_)) {
            warn!(status = response.status(), "success body is not JSON, read as text");
        }
        return Ok(FetchResult::Data { data, response });
    }

    let bytes = response.clone().bytes().await?;
    let error = match from_json::<Value>(&bytes) {
        Ok(value) => Payload::Json(value),
        Err(_) => Payload::Text(String::from_utf8_lossy(&bytes).into_owned()),
    };
    Ok(FetchResult::Error { error, response })
}

/// Placeholders of `template` that no path parameter fills.
fn unmatched_placeholders<'a>(template: &'a PathTemplate, params: &Params) -> Vec<&'a str> {
    template
        .placeholders()
        .into_iter()
        .filter(|name| !params.path_params().contains_key(*name))
        .collect()
}

#[cfg(test)]
mod tests {
    use http::HeaderMap;
    use http::header::{CONTENT_LENGTH, HeaderValue};
    use serde_json::json;

    use super::*;

    fn response(status: u16, body: &'static str) -> Response {
        Response::new(status, HeaderMap::new(), body)
    }

    #[tokio::test]
    async fn no_content_short_circuits() {
        let result = normalize(response(204, ""), ParseAs::Json).await.expect("normalize");
        assert!(result.data().is_some_and(Payload::is_empty));

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("0"));
        let result = normalize(Response::new(500, headers, ""), ParseAs::Json)
            .await
            .expect("normalize");
        assert!(result.error().is_some_and(Payload::is_empty));
    }

    #[tokio::test]
    async fn success_reads_with_parse_mode() {
        let result = normalize(response(200, "plain"), ParseAs::Text).await.expect("normalize");
        assert_eq!(result.data().and_then(Payload::as_text), Some("plain"));

        let result = normalize(response(200, "[1,2]"), ParseAs::Json).await.expect("normalize");
        assert_eq!(result.data().and_then(Payload::as_json), Some(&json!([1, 2])));
    }

    #[tokio::test]
    async fn failure_prefers_json_then_text() {
        let result = normalize(response(404, r#"{"message":"not found"}"#), ParseAs::Text)
            .await
            .expect("normalize");
        assert_eq!(
            result.error().and_then(Payload::as_json),
            Some(&json!({"message": "not found"}))
        );

        let result = normalize(response(502, "Bad Gateway"), ParseAs::Json)
            .await
            .expect("normalize");
        assert_eq!(result.error().and_then(Payload::as_text), Some("Bad Gateway"));
    }

    #[tokio::test]
    async fn response_body_stays_unread() {
        let result = normalize(response(200, r#"{"id":1}"#), ParseAs::Json)
            .await
            .expect("normalize");
        let (_, response) = result.into_parts();
        assert_eq!(response.text().await.expect("text"), r#"{"id":1}"#);
    }

    #[tokio::test]
    async fn stream_mode_does_not_wait_for_the_body() {
        let never_ends: crate::BodyStream = Box::pin(futures_util::stream::pending());
        let response = Response::streaming(200, HeaderMap::new(), never_ends);

        let result = normalize(response, ParseAs::Stream).await.expect("normalize");
        assert!(matches!(result.data(), Some(Payload::Stream(_))));
    }

    #[test]
    fn unmatched_placeholders_are_listed() {
        let template = PathTemplate::new("/owners/{ownerId}/pets/{petId}");
        let params = Params::new().path("ownerId", 1);

        assert_eq!(unmatched_placeholders(&template, &params), ["petId"]);
        assert!(unmatched_placeholders(&template, &params.path("petId", 2)).is_empty());
    }
}
