//! Turmoil host and client plumbing.
//!
//! The simulated server runs the production [`serve_connection`] loop on
//! turmoil sockets. The driver is created by the test and handed in, so the
//! test can inspect the list after `sim.run()` returns.

use std::net::{IpAddr, Ipv4Addr};

use chainlist_server::{ApiClient, ConnectionLimits, SharedDriver, serve_connection};
use turmoil::{
    Sim,
    net::{TcpListener, TcpStream},
};

/// Hostname of the simulated server.
pub const SERVER_HOST: &str = "server";

/// Port the simulated server listens on.
pub const SERVER_PORT: u16 = 5000;

/// Result type expected by turmoil hosts and clients.
pub type SimResult = Result<(), Box<dyn std::error::Error>>;

/// Register the server host on a simulation.
///
/// If turmoil restarts the host, the same driver (and list) is reused.
pub fn host_server(sim: &mut Sim<'_>, driver: SharedDriver, limits: ConnectionLimits) {
    sim.host(SERVER_HOST, move || run_server(SharedDriver::clone(&driver), limits));
}

/// Connect an API client to the simulated server.
pub async fn connect() -> Result<ApiClient<TcpStream>, Box<dyn std::error::Error>> {
    let stream = TcpStream::connect((SERVER_HOST, SERVER_PORT)).await?;
    Ok(ApiClient::new(stream, format!("{SERVER_HOST}:{SERVER_PORT}")))
}

async fn run_server(driver: SharedDriver, limits: ConnectionLimits) -> SimResult {
    let listener = TcpListener::bind((IpAddr::from(Ipv4Addr::UNSPECIFIED), SERVER_PORT)).await?;

    loop {
        let (stream, peer) = listener.accept().await?;
        let driver = SharedDriver::clone(&driver);

        tokio::spawn(async move {
            if let Err(e) = serve_connection(stream, driver, limits).await {
                tracing::debug!("Simulated connection {} error: {}", peer, e);
            }
        });
    }
}
