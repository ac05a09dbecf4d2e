//! Helpers shared by unit tests.

use axum::{Router, http::StatusCode};
use tokio::net::TcpListener;

/// Start a local server that answers every request with `status` and `body`.
///
/// Returns the server's base URL (`http://127.0.0.1:<port>`).
pub async fn serve_fixed(status: StatusCode, body: &'static str) -> String {
    let app = Router::new().fallback(move || async move { (status, body) });
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}
