mod catalog;
mod display;
mod error;
mod ledger;
mod schedule;
mod store;
mod web;

use chrono::Local;

use ledger::AppointmentLedger;
use store::JsonStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    let data_dir = std::env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());
    let store = JsonStore::new(&data_dir);

    // Check if we should run in web mode
    if args.len() > 1 && args[1] == "web" {
        let port = args
            .get(2)
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);
        let catalog_url = std::env::var("CATALOG_URL").ok();

        println!("Starting web server on port {}...", port);
        match catalog_url {
            Some(ref url) => println!("Catalog source: {}", url),
            None => println!("Catalog source: bundled data/doctors.csv"),
        }
        println!("Access the site at http://localhost:{}", port);

        web::start_server(port, catalog_url, store).await?;
        return Ok(());
    }

    // Drop all stored bookings and start fresh
    if args.len() > 1 && args[1] == "reset" {
        store.delete(store::APPOINTMENTS_KEY)?;
        println!("Cleared stored appointments");
        return Ok(());
    }

    // CLI mode: load the catalog, print each doctor's week, export to files
    let records = if let Ok(url) = std::env::var("CATALOG_URL") {
        println!("Fetching doctors from {}...", url);
        catalog::fetch_doctors(&url).await?
    } else {
        let csv_path = args.get(1).map(String::as_str).unwrap_or("data/doctors.csv");
        println!("Loading doctors from {}...", csv_path);
        catalog::load_doctors_csv(csv_path)?
    };

    let doctors = catalog::group_doctors(&records);
    println!(
        "Loaded {} doctors ({} schedule rows)",
        doctors.len(),
        records.len()
    );

    let ledger = AppointmentLedger::load(store);
    let today = Local::now().date_naive();

    println!("\n\n=== Weekly Availability ===");
    for doctor in &doctors {
        let days = schedule::project_week(doctor, ledger.appointments(), today)?;
        display::print_week_schedule(doctor, &days);
        let booked = ledger.appointments_for(&doctor.name).len();
        if booked > 0 {
            println!("{} booking(s) on file", booked);
        }
    }

    display::print_appointments(&ledger.upcoming(), &ledger.past());

    // Write each doctor's week to a file
    println!("\n=== Writing Schedules to Files ===");
    for doctor in &doctors {
        let days = schedule::project_week(doctor, ledger.appointments(), today)?;
        let filename = format!("schedule_{}.txt", doctor.name.replace(' ', "_"));
        display::write_week_to_file(doctor, &days, &filename)?;
        println!("  - {}", filename);
    }

    Ok(())
}
