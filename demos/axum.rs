/* demos/axum.rs */

use axum::{Router, extract::ConnectInfo, response::Json, routing::get};
use request_ip::{ClientIp, ClientIpLayer, DEFAULT_HEADERS, Options};
use serde_json::json;
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .init();

    let app = create_app();
    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();

    println!("Server starting on http://localhost:3000");
    println!("Test endpoints:");
    println!("  • GET /ip            - resolved client IP (default headers)");
    println!("  • GET /custom        - only honours x-custom-ip");
    println!("  • GET /debug         - resolution details");
    println!();
    println!("Test with headers:");
    println!("  curl -H 'X-Client-IP: 203.0.113.42' http://localhost:3000/ip");
    println!("  curl -H 'X-Forwarded-For: 198.51.100.1, 192.168.1.1' http://localhost:3000/ip");
    println!("  curl -H 'X-Custom-IP: 192.0.2.100' http://localhost:3000/custom");
    println!();

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}

fn create_app() -> Router {
    let default_router = Router::new()
        .route("/ip", get(ip_handler))
        .route("/debug", get(debug_handler))
        .layer(ClientIpLayer::new());

    let custom = Options::new().with_headers(["x-custom-ip"]);
    let custom_router = Router::new()
        .route("/", get(ip_handler))
        .layer(ClientIpLayer::with_options(&custom));

    default_router.nest("/custom", custom_router)
}

async fn ip_handler(client_ip: Option<ClientIp>) -> Json<serde_json::Value> {
    match client_ip {
        Some(ip) => Json(json!({ "client_ip": ip.ip() })),
        None => Json(json!({ "error": "Could not determine client IP" })),
    }
}

async fn debug_handler(
    client_ip: Option<ClientIp>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: axum::http::HeaderMap,
) -> Json<serde_json::Value> {
    let forwarding = DEFAULT_HEADERS
        .iter()
        .filter_map(|name| {
            headers
                .get(*name)
                .and_then(|v| v.to_str().ok())
                .map(|v| (name.to_string(), v.to_string()))
        })
        .collect::<std::collections::HashMap<String, String>>();

    Json(json!({
        "client_ip": client_ip.map(ClientIp::into_inner),
        "peer_address": addr.to_string(),
        "forwarding_headers": forwarding,
        "source": if forwarding.values().any(|v| !v.is_empty()) { "header" } else { "peer" },
    }))
}
