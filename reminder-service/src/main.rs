//! Reminder Service entry point.
//!
//! Performs one reminder run against the file store and exits, so it can
//! be scheduled from cron.

use reminder_service::config::ReminderConfig;
use reminder_service::startup::Application;

use subtrack_core::observability::init_tracing;

fn main() -> std::io::Result<()> {
    // Load configuration
    let config = ReminderConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::other(format!("Configuration error: {}", e))
    })?;

    // Initialize tracing
    init_tracing(&config.service_name, &config.common.log_level);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        data_dir = %config.common.data_dir,
        horizon_days = config.horizon_days,
        seed_demo_data = config.seed_demo_data,
        "Starting reminder-service"
    );

    let mut app = Application::build(config).map_err(|e| {
        tracing::error!(error = %e, "Failed to build application");
        std::io::Error::other(format!("Application build error: {}", e))
    })?;

    let now = chrono::Local::now();
    let summary = app.run(&now).map_err(|e| {
        tracing::error!(error = %e, kind = e.kind(), "Reminder run failed");
        std::io::Error::other(format!("Reminder run error: {}", e))
    })?;

    if summary.upcoming.is_empty() {
        println!("No reminders in the next window.");
    } else {
        println!("Upcoming reminders:");
        for line in &summary.upcoming {
            println!(
                "  {} (H-{}) fires {} [{}]",
                line.name, line.lead_days, line.trigger_date, line.badge
            );
        }
    }
    println!();
    println!("{}", summary.report.message());

    Ok(())
}
