//! shunt-rs standalone server
//!
//! Runs the traffic-splitting interceptor as its own process: requests to
//! the intercepted path are routed per configuration, with the legacy seat
//! proxying to `Routing.LegacyService` when the decision is route-old.

use shunt_rs::config::hot_reload::ConfigManager;
use shunt_rs::config::settings::{config_path, load_routing_config_from};
use shunt_rs::logs::logger::configure_logger;
use shunt_rs::middleware::interceptor::RequestInterceptor;
use shunt_rs::routes::{config_reload, health, legacy};
use shunt_rs::services::forwarder::Forwarder;

use actix_web::{middleware::Logger, web, App, HttpServer};
use log::{error, info, warn};
use std::sync::Arc;
use tokio::signal;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    configure_logger();

    let config_path = config_path();
    let initial = match load_routing_config_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load routing configuration: {}", e);
            std::process::exit(1);
        }
    };
    if !initial.is_valid {
        warn!("Routing configuration is invalid; all requests will go to the legacy handler");
    }

    let manager = Arc::new(ConfigManager::new(initial, config_path));
    manager.clone().start_watching();
    let forwarder = Arc::new(Forwarder::new());

    let host = std::env::var("SHUNT_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("SHUNT_PORT")
        .unwrap_or_else(|_| "5900".to_string())
        .parse::<u16>()
        .unwrap_or(5900);

    info!("Starting shunt-rs v{} on {}:{}", env!("CARGO_PKG_VERSION"), host, port);

    let server = {
        let manager = manager.clone();
        let forwarder = forwarder.clone();
        HttpServer::new(move || {
            App::new()
                .app_data(web::Data::new(manager.clone()))
                .app_data(web::Data::new(forwarder.clone()))
                .wrap(RequestInterceptor::new(manager.clone(), forwarder.clone()))
                .wrap(Logger::new(r#"%a "%r" %s %b %T"#))
                .configure(health::configure_health)
                .configure(config_reload::configure_config_reload)
                .configure(legacy::configure_legacy)
        })
        .bind((host.as_str(), port))?
        .run()
    };

    tokio::select! {
        result = server => {
            match result {
                Ok(_) => info!("Server stopped gracefully"),
                Err(e) => error!("Server error: {}", e),
            }
        }
        _ = signal::ctrl_c() => {
            info!("Received shutdown signal, stopping server...");
        }
    }

    Ok(())
}
