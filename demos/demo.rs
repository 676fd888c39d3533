/* demos/demo.rs */

use request_ip::{Connection, DEFAULT_HEADERS, Options, SimpleRequest, Socket, resolve, try_resolve};

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    println!("=== Client IP Resolution Examples ===\n");

    // Example 1: Default header priority
    example_1_header_priority();

    // Example 2: Values come back verbatim
    example_2_verbatim();

    // Example 3: Empty headers are skipped
    example_3_empty_header();

    // Example 4: Custom header list
    example_4_custom_headers();

    // Example 5: Peer address fallback
    example_5_peer_fallback();

    // Example 6: Nothing to resolve
    example_6_unresolved();

    println!("=== All examples completed! ===");
}

fn show(label: &str, ip: Option<String>) {
    match ip {
        Some(ip) => println!("{label}: {ip}"),
        None => println!("{label}: no IP found"),
    }
}

fn example_1_header_priority() {
    println!("Example 1: Default header priority");
    println!("Default headers: {}", DEFAULT_HEADERS.join(", "));

    let request = SimpleRequest::new()
        .with_header("x-real-ip", "203.0.113.100")
        .with_header("x-client-ip", "198.51.100.200")
        .with_header("x-forwarded-for", "192.0.2.50");

    show("Resolved (x-client-ip has highest priority)", resolve(&request, None));
    println!();
}

fn example_2_verbatim() {
    println!("Example 2: Forwarding chains are not split");

    let request = SimpleRequest::new().with_header("X-Forwarded-For", "203.0.113.1, 192.168.1.10");
    show("Resolved", resolve(&request, None));
    println!();
}

fn example_3_empty_header() {
    println!("Example 3: Empty header values are skipped");

    let request = SimpleRequest::new()
        .with_header("x-client-ip", "")
        .with_header("fowarded", "203.0.113.7");
    show("Resolved", resolve(&request, None));
    println!();
}

fn example_4_custom_headers() {
    println!("Example 4: Custom header list replaces the defaults");

    let request = SimpleRequest::new()
        .with_header("x-client-ip", "192.168.1.50")
        .with_header("cf-connecting-ip", "203.0.113.200")
        .with_socket_address("10.0.0.1");

    let only_cloudflare = Options::new().with_headers(["cf-connecting-ip"]);
    show("Custom list", resolve(&request, Some(&only_cloudflare)));

    let no_headers = Options::new().with_headers(Vec::<String>::new());
    show("No headers", resolve(&request, Some(&no_headers)));

    let extended = Options::new().with_headers(
        ["cf-connecting-ip"]
            .into_iter()
            .chain(DEFAULT_HEADERS.iter().copied()),
    );
    show("Extended defaults", resolve(&request, Some(&extended)));
    println!();
}

fn example_5_peer_fallback() {
    println!("Example 5: Peer address fallback");

    let request = SimpleRequest::new().with_connection(Connection {
        remote_address: None,
        socket: Some(Socket {
            remote_address: Some("192.0.2.123".to_string()),
        }),
    });
    show("Nested connection socket", resolve(&request, None));

    let request = SimpleRequest::new().with_info_address("::1");
    show("Request info", resolve(&request, None));
    println!();
}

fn example_6_unresolved() {
    println!("Example 6: Nothing to resolve");

    match try_resolve(&SimpleRequest::new(), None) {
        Ok(ip) => println!("Resolved: {ip}"),
        Err(e) => println!("Error: {e}"),
    }
    println!();
}
