/// Command-line interface for the appointment book.
///
/// `slotbook demo` replays the reference day; `slotbook` (or `slotbook
/// interactive`) opens a menu over stdin for booking and registry edits.
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

use slotbook::{
    BookOutcome, CancelOutcome, PatientRegistry, Result, Scheduler, SchedulerConfig, SlotError,
    SlotTime,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file with `bucket_count` and `catalog` overrides
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long = "log-level", default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the reference booking scenario and print its outcomes
    Demo,
    /// Menu-driven session over stdin (default)
    Interactive,
}

fn book_message(time: SlotTime, result: std::result::Result<BookOutcome, SlotError>) -> String {
    match result {
        Ok(BookOutcome::Booked) => format!("Time slot {} booked successfully.", time),
        Ok(BookOutcome::AlreadyBooked) => format!("Time slot {} is already booked.", time),
        Err(e) => e.to_string(),
    }
}

fn cancel_message(
    time: SlotTime,
    result: std::result::Result<CancelOutcome, SlotError>,
) -> String {
    match result {
        Ok(CancelOutcome::Cancelled) => format!("Time slot {} canceled successfully.", time),
        Ok(CancelOutcome::NotBooked) => format!("Time slot {} is not booked.", time),
        Err(e) => e.to_string(),
    }
}

fn print_patients(registry: &PatientRegistry) {
    println!("Patient Records:");
    for patient in registry.iter() {
        println!("{}", patient);
    }
}

fn report_add(registry: &mut PatientRegistry, name: &str, time: SlotTime) {
    match registry.add(name, time) {
        Ok(patient) => println!(
            "Patient {} added with appointment at {}.",
            patient.name, patient.appointment_time
        ),
        Err(e) => println!("{}", e),
    }
}

fn report_remove(registry: &mut PatientRegistry, name: &str) {
    match registry.remove(name) {
        Ok(patient) => println!("Patient {} removed successfully.", patient.name),
        Err(e) => println!("{}", e),
    }
}

/// The reference day: the two components are driven independently, so the
/// registry ends up with two patients on one slot.
fn run_demo(scheduler: &mut Scheduler) -> Result<()> {
    let ten: SlotTime = "10:00".parse()?;

    println!("{}", book_message(ten, scheduler.slots_mut().book(ten)));
    report_add(scheduler.registry_mut(), "Aditya", ten);

    println!("{}", book_message(ten, scheduler.slots_mut().book(ten)));
    report_add(scheduler.registry_mut(), "Mukul", ten);

    print_patients(scheduler.registry());

    println!("{}", cancel_message(ten, scheduler.slots_mut().cancel(ten)));
    report_remove(scheduler.registry_mut(), "Aditya");

    print_patients(scheduler.registry());
    Ok(())
}

struct SlotbookCli {
    scheduler: Scheduler,
    running: bool,
}

impl SlotbookCli {
    fn new(scheduler: Scheduler) -> Self {
        SlotbookCli {
            scheduler,
            running: true,
        }
    }

    fn print_header(&self) {
        println!("\n{}", "=".repeat(60));
        println!("       APPOINTMENT BOOK");
        println!("{}", "=".repeat(60));
    }

    fn print_menu(&self) {
        println!("\n--- Main Menu ---");
        println!("1. View time slots");
        println!("2. Book time slot");
        println!("3. Cancel time slot");
        println!("4. Add patient");
        println!("5. Remove patient");
        println!("6. View patient records");
        println!("7. Book slot for patient");
        println!("8. Cancel patient's appointment");
        println!("9. Exit");
        println!("{}", "-".repeat(20));
    }

    /// Read one trimmed line. `None` on end of input.
    fn get_input(&self, prompt: &str) -> Option<String> {
        print!("{}: ", prompt);
        if let Err(e) = io::stdout().flush() {
            warn!(error = %e, "failed to flush stdout");
        }

        let mut input = String::new();
        match io::stdin().lock().read_line(&mut input) {
            Ok(0) => None,
            Ok(_) => Some(input.trim().to_string()),
            Err(e) => {
                error!(error = %e, "failed to read stdin");
                None
            }
        }
    }

    fn get_time_input(&self, prompt: &str) -> Option<SlotTime> {
        loop {
            let input = self.get_input(prompt)?;
            match input.parse::<SlotTime>() {
                Ok(time) => return Some(time),
                Err(e) => println!("{}", e),
            }
        }
    }

    fn view_slots(&self) {
        let slots = self.scheduler.slots();
        if slots.is_empty() {
            println!("\nNo time slots");
            return;
        }

        println!("\n--- Time Slots ({} total) ---", slots.len());
        for slot in slots {
            let state = if slot.is_booked { "booked" } else { "free" };
            println!("  {} {}", slot.time, state);
        }
    }

    fn book_slot(&mut self) {
        if let Some(time) = self.get_time_input("Time (HH:MM)") {
            let result = self.scheduler.slots_mut().book(time);
            println!("{}", book_message(time, result));
        }
    }

    fn cancel_slot(&mut self) {
        if let Some(time) = self.get_time_input("Time (HH:MM)") {
            let result = self.scheduler.slots_mut().cancel(time);
            println!("{}", cancel_message(time, result));
        }
    }

    fn add_patient(&mut self) {
        let Some(name) = self.get_input("Patient name") else {
            return;
        };
        if let Some(time) = self.get_time_input("Appointment time (HH:MM)") {
            report_add(self.scheduler.registry_mut(), &name, time);
        }
    }

    fn remove_patient(&mut self) {
        if let Some(name) = self.get_input("Patient name") {
            report_remove(self.scheduler.registry_mut(), &name);
        }
    }

    fn book_for_patient(&mut self) {
        let Some(name) = self.get_input("Patient name") else {
            return;
        };
        let Some(time) = self.get_time_input("Appointment time (HH:MM)") else {
            return;
        };

        match self.scheduler.book_for_patient(&name, time) {
            Ok(patient) => println!(
                "Patient {} booked at {}.",
                patient.name, patient.appointment_time
            ),
            Err(e) => {
                println!("{}", e);
                if let Some(next) = self.scheduler.next_free_slot(time) {
                    println!("Next free slot: {}", next);
                }
            }
        }
    }

    fn cancel_for_patient(&mut self) {
        if let Some(name) = self.get_input("Patient name") {
            match self.scheduler.cancel_for_patient(&name) {
                Ok(patient) => println!(
                    "Appointment for {} at {} cancelled.",
                    patient.name, patient.appointment_time
                ),
                Err(e) => println!("{}", e),
            }
        }
    }

    fn run(&mut self) {
        self.print_header();

        while self.running {
            self.print_menu();

            let Some(choice) = self.get_input("Enter choice") else {
                break;
            };

            match choice.as_str() {
                "1" => self.view_slots(),
                "2" => self.book_slot(),
                "3" => self.cancel_slot(),
                "4" => self.add_patient(),
                "5" => self.remove_patient(),
                "6" => print_patients(self.scheduler.registry()),
                "7" => self.book_for_patient(),
                "8" => self.cancel_for_patient(),
                "9" => {
                    self.running = false;
                    println!("\nGoodbye!");
                }
                _ => println!("Invalid choice"),
            }
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = match &args.config {
        Some(path) => SchedulerConfig::from_file(path)?,
        None => SchedulerConfig::default(),
    };
    let mut scheduler = Scheduler::from_config(&config)?;

    match args.command.unwrap_or(Command::Interactive) {
        Command::Demo => run_demo(&mut scheduler)?,
        Command::Interactive => SlotbookCli::new(scheduler).run(),
    }

    Ok(())
}
