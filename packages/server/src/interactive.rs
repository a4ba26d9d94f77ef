//! Interactive mode for the server.
//!
//! Prompts the user for the data directory, bind address and port before
//! starting the server.

use std::path::PathBuf;

use dialoguer::{Confirm, Input};

use crate::config::DashboardConfig;

/// Runs the server in interactive mode, prompting for configuration.
///
/// Asks the user for a data directory, a bind address and a port, sets the
/// corresponding environment variables (`BIND_ADDR`, `PORT`), and delegates
/// to [`super::run_server`].
///
/// # Errors
///
/// Returns an `std::io::Result` error if the underlying server fails to
/// start.
#[allow(clippy::future_not_send)]
pub async fn run(mut config: DashboardConfig) -> std::io::Result<()> {
    println!("Accident Map Server");
    println!();

    let current_dir = config
        .data
        .accidents
        .parent()
        .map_or_else(|| "data".to_string(), |dir| dir.display().to_string());

    let data_dir: String = Input::new()
        .with_prompt("Data directory")
        .default(current_dir.clone())
        .interact_text()
        .unwrap_or_else(|_| current_dir.clone());

    if data_dir != current_dir {
        config.use_data_dir(&PathBuf::from(&data_dir));
    }

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default("127.0.0.1".to_string())
        .interact_text()
        .unwrap_or_else(|_| "127.0.0.1".to_string());

    let port_str: String = Input::new()
        .with_prompt("Port")
        .default("8080".to_string())
        .validate_with(|input: &String| {
            input
                .parse::<u16>()
                .map(|_| ())
                .map_err(|_| "Port must be a number between 0 and 65535")
        })
        .interact_text()
        .unwrap_or_else(|_| "8080".to_string());

    // SAFETY: We are single-threaded at this point (before server starts) and
    // these variables are only read once during server initialisation.
    unsafe {
        std::env::set_var("BIND_ADDR", &bind_addr);
        std::env::set_var("PORT", &port_str);
    }

    if !Confirm::new()
        .with_prompt(format!(
            "Start server on {bind_addr}:{port_str} with data from {data_dir}?"
        ))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server(config).await
}
