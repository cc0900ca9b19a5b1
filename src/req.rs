use actix_web::dev::RequestHead;
use actix_web::http::header::{
    HeaderMap, HeaderName, CONNECTION, CONTENT_LENGTH, TE, TRANSFER_ENCODING,
};
use actix_web::http::Uri;
use actix_web::HttpResponseBuilder;
use awc::{Client, ClientRequest};
use url::Url;

// Headers scoped to a single connection; never forwarded in either direction.
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// How the inbound request body is framed; the upstream hop keeps the same framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFraming {
    Empty,
    Sized(u64),
    Chunked,
}

fn header_has_token(headers: &HeaderMap, name: HeaderName, token: &str) -> bool {
    headers
        .get_all(name)
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|t| t.trim().eq_ignore_ascii_case(token))
}

/// `Transfer-Encoding: chunked` wins over `Content-Length`, as in HTTP/1.1 message parsing.
pub fn request_framing(headers: &HeaderMap) -> BodyFraming {
    if header_has_token(headers, TRANSFER_ENCODING, "chunked") {
        return BodyFraming::Chunked;
    }
    match headers.get(CONTENT_LENGTH) {
        Some(value) => value
            .to_str()
            .ok()
            .and_then(|len| len.trim().parse().ok())
            .map_or(BodyFraming::Chunked, BodyFraming::Sized),
        None => BodyFraming::Empty,
    }
}

pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(&name.as_str())
}

/// Header names listed in `Connection`, which are hop-by-hop for this message only.
pub fn connection_tokens(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(CONNECTION)
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(|token| token.trim().to_ascii_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

fn should_forward(name: &HeaderName, tokens: &[String]) -> bool {
    !is_hop_by_hop(name) && !tokens.iter().any(|token| token == name.as_str())
}

fn join_paths(base: &str, path: &str) -> String {
    match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", base, &path[1..]),
        (false, false) => format!("{}/{}", base, path),
        _ => format!("{}{}", base, path),
    }
}

/// Rebase the inbound request URI onto an upstream base URL.
pub fn create_forward_url(base: &Url, original_uri: &Uri) -> Url {
    let mut new_url = base.clone();
    new_url.set_path(&join_paths(base.path(), original_uri.path()));

    let base_query = base.query().filter(|q| !q.is_empty());
    let request_query = original_uri.query().filter(|q| !q.is_empty());
    let query = match (base_query, request_query) {
        (Some(b), Some(r)) => Some(format!("{}&{}", b, r)),
        (Some(q), None) | (None, Some(q)) => Some(q.to_string()),
        (None, None) => None,
    };
    new_url.set_query(query.as_deref());
    new_url
}

pub fn create_forwarded_req(client: &Client, head: &RequestHead, new_url: &Url) -> ClientRequest {
    let tokens = connection_tokens(head.headers());
    let mut forwarded_req = client
        .request(head.method.clone(), new_url.as_str())
        .no_decompress();

    for (name, value) in head.headers().iter() {
        if should_forward(name, &tokens) {
            forwarded_req = forwarded_req.append_header((name.clone(), value.clone()));
        }
    }

    // `te` is hop-by-hop, but `te: trailers` is passed on.
    if header_has_token(head.headers(), TE, "trailers") {
        forwarded_req = forwarded_req.insert_header((TE, "trailers"));
    }

    if let Some(addr) = head.peer_addr {
        let prior: Vec<&str> = head
            .headers()
            .get_all(X_FORWARDED_FOR)
            .filter_map(|value| value.to_str().ok())
            .collect();
        let forwarded_for = if prior.is_empty() {
            addr.ip().to_string()
        } else {
            format!("{}, {}", prior.join(", "), addr.ip())
        };
        forwarded_req = forwarded_req.insert_header((X_FORWARDED_FOR, forwarded_for));
    }

    forwarded_req
}

/// Copy the upstream's end-to-end response headers onto the reply to the caller.
pub fn copy_response_headers(client_resp: &mut HttpResponseBuilder, headers: &HeaderMap) {
    let tokens = connection_tokens(headers);
    for (name, value) in headers.iter().filter(|(name, _)| should_forward(name, &tokens)) {
        client_resp.append_header((name.clone(), value.clone()));
    }
}
