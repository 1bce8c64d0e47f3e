use std::fs::File;
use std::io::Write;

use crate::catalog::Doctor;
use crate::ledger::Appointment;
use crate::schedule::DayAvailability;

/// Formats a doctor heading with their timezone label
pub fn format_doctor_label(name: &str, timezone: &str) -> String {
    if timezone.is_empty() {
        name.to_string()
    } else {
        format!("{} ({})", name, timezone)
    }
}

/// Prints a doctor's 7-day schedule in a readable format
pub fn print_week_schedule(doctor: &Doctor, days: &[DayAvailability]) {
    println!(
        "\n=== {} ===",
        format_doctor_label(&doctor.name, &doctor.timezone)
    );

    for day in days {
        if day.is_unavailable() {
            println!("{} ({}) -> unavailable", day.date, day.day_of_week);
            continue;
        }

        let open = day.slots.iter().filter(|s| s.is_available).count();
        println!(
            "{} ({}) -> {} slots, {} open",
            day.date,
            day.day_of_week,
            day.slots.len(),
            open
        );
        for slot in &day.slots {
            let marker = if slot.is_booked { " [BOOKED]" } else { "" };
            println!("  {} - {}{}", slot.start_time, slot.end_time, marker);
        }
    }
}

/// Prints the booked appointments split into upcoming and past
pub fn print_appointments(upcoming: &[Appointment], past: &[Appointment]) {
    println!("\n=== Appointments ===");

    if upcoming.is_empty() {
        println!("No upcoming appointments");
    } else {
        println!("Upcoming ({}):", upcoming.len());
        for apt in upcoming {
            println!(
                "  {} {} - {} with {} (ID: {})",
                apt.date, apt.start_time, apt.end_time, apt.doctor_name, apt.id
            );
        }
    }

    if !past.is_empty() {
        println!("Past ({}):", past.len());
        for apt in past {
            println!(
                "  {} {} - {} with {}",
                apt.date, apt.start_time, apt.end_time, apt.doctor_name
            );
        }
    }
}

/// Writes a doctor's 7-day schedule to a file, one slot per line
pub fn write_week_to_file(
    doctor: &Doctor,
    days: &[DayAvailability],
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(filename)?;

    writeln!(
        file,
        "** {} **",
        format_doctor_label(&doctor.name, &doctor.timezone)
    )?;

    for day in days {
        if day.is_unavailable() {
            writeln!(file, "{} {} [UNAVAILABLE]", day.date, day.day_of_week)?;
            continue;
        }
        writeln!(file, "{} {}", day.date, day.day_of_week)?;
        for slot in &day.slots {
            let marker = if slot.is_booked { "[BOOKED]" } else { "[OPEN]" };
            writeln!(file, "  {} - {} {}", slot.start_time, slot.end_time, marker)?;
        }
    }

    Ok(())
}
