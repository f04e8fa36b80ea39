use tokio::net::TcpListener;

/// Standalone fixture server, handy for driving the demo binary locally:
/// `API_URL=http://127.0.0.1:3000 API_KEY=test-api-key parkingcloud smoke`
#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let api_key = std::env::var("MOCK_API_KEY").unwrap_or_else(|_| "test-api-key".to_string());
    let listener = TcpListener::bind("127.0.0.1:3000").await?;
    println!("mock parking cloud listening on {}", listener.local_addr()?);
    mock_server::run(listener, &api_key).await
}
