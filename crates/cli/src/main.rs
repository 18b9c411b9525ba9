mod client;

use api_shared::{CandidatesRes, CensusRes, Mission, MissionState, Patient, TriageReq, Vitals};
use clap::{Parser, Subcommand};

use client::ResqClient;

#[derive(Parser)]
#[command(name = "resq")]
#[command(about = "ResQ ambulance dispatch CLI")]
struct Cli {
    /// ResQ server base URL
    #[arg(long, global = true, env = "RESQ_SERVER", default_value = "http://127.0.0.1:3000")]
    server: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current mission
    Status,
    /// Show the hospital bed census
    Census,
    /// Look up a patient record by scanned ID
    Lookup {
        /// Patient identifier, e.g. P-101
        patient_id: String,
    },
    /// Transmit updated vitals for the active mission
    Vitals {
        /// Blood pressure, e.g. 120/80
        #[arg(long)]
        bp: String,
        /// Heart rate in beats per minute
        #[arg(long)]
        hr: u16,
        /// Oxygen saturation, percent
        #[arg(long)]
        spo2: u8,
    },
    /// Complete patient handover and reset the mission
    Handover,
    /// EMS unit actions
    #[command(subcommand)]
    Ems(EmsCommands),
    /// Medical Command actions
    #[command(subcommand)]
    Command(CommandCommands),
}

#[derive(Subcommand)]
enum EmsCommands {
    /// Run triage on clinical notes
    Triage {
        /// Free-text crew notes
        #[arg(long)]
        notes: String,
        /// Scanned patient ID (optional)
        #[arg(long)]
        patient_id: Option<String>,
    },
    /// List hospitals able to take the triaged patient
    Candidates,
    /// Request admission at a hospital
    Request {
        /// Hospital name as shown by `candidates`
        hospital: String,
    },
    /// Acknowledge a diversion
    Acknowledge,
}

#[derive(Subcommand)]
enum CommandCommands {
    /// Authorise the pending admission
    Authorize,
    /// Divert the pending unit
    Divert,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = ResqClient::new(&cli.server);

    match cli.command {
        Some(Commands::Status) => {
            let snapshot = client.mission().await?;
            print_mission(&snapshot.mission);
            if !snapshot.declined_hospitals.is_empty() {
                println!("Declined: {}", snapshot.declined_hospitals.join(", "));
            }
        }
        Some(Commands::Census) => print_census(&client.census().await?),
        Some(Commands::Lookup { patient_id }) => print_patient(&client.lookup(&patient_id).await?),
        Some(Commands::Vitals { bp, hr, spo2 }) => {
            let vitals = Vitals {
                blood_pressure: bp,
                heart_rate: hr,
                spo2,
            };
            print_mission(&client.vitals(&vitals).await?);
        }
        Some(Commands::Handover) => print_mission(&client.handover().await?),
        Some(Commands::Ems(cmd)) => match cmd {
            EmsCommands::Triage { notes, patient_id } => {
                let report = client
                    .triage(&TriageReq {
                        clinical_notes: notes,
                        patient_id,
                    })
                    .await?;
                print_patient(&report.patient);
                println!(
                    "Severity {}/10 -> {} ({})",
                    report.assessment.severity,
                    report.assessment.ward_need,
                    report.assessed_at.format("%H:%M:%S")
                );
                println!("{}", report.assessment.reason);
            }
            EmsCommands::Candidates => print_candidates(&client.candidates().await?),
            EmsCommands::Request { hospital } => {
                print_mission(&client.request_admission(&hospital).await?)
            }
            EmsCommands::Acknowledge => print_mission(&client.acknowledge().await?),
        },
        Some(Commands::Command(cmd)) => match cmd {
            CommandCommands::Authorize => print_mission(&client.authorize().await?),
            CommandCommands::Divert => print_mission(&client.divert().await?),
        },
        None => {
            println!("Use 'resq --help' for commands");
        }
    }

    Ok(())
}

fn print_mission(mission: &Mission) {
    println!("Mission: {}", mission.status);
    if let Some(hospital) = &mission.target_hospital {
        println!("Destination: {hospital}");
    }
    if let Some(patient) = &mission.patient {
        println!("Patient: {} ({})", patient.name, patient.age);
    }
    if let Some(assessment) = &mission.assessment {
        println!(
            "Severity {}/10, {} required",
            assessment.severity, assessment.ward_need
        );
    }
    if mission.status == MissionState::Active {
        println!(
            "Vitals: BP {}, HR {}, SpO2 {}%",
            mission.vitals.blood_pressure, mission.vitals.heart_rate, mission.vitals.spo2
        );
        println!("Telemetry: {}", mission.telemetry_alert);
    }
    if mission.status == MissionState::Declined {
        println!("Diversion: admission refused, acknowledge and choose another hospital");
    }
}

fn print_census(census: &CensusRes) {
    for h in &census.hospitals {
        println!(
            "{:<24} {:<16} {:>5.1} km  ICU {:>2}  OP {:>2}",
            h.name, h.specialty, h.distance_km, h.icu_beds, h.op_beds
        );
    }
    println!(
        "Total ICU {}, OP {}, inbound {}",
        census.total_icu_beds, census.total_op_beds, census.active_inbound
    );
}

fn print_patient(patient: &Patient) {
    println!("Name: {}, Age: {}", patient.name, patient.age);
    let field = |v: &Option<String>| v.clone().unwrap_or_else(|| "Unknown".into());
    println!(
        "Blood group: {}, History: {}, Allergies: {}",
        field(&patient.blood_group),
        field(&patient.history),
        field(&patient.allergies)
    );
}

fn print_candidates(list: &CandidatesRes) {
    if list.no_capacity {
        println!("NO {} CAPACITY IN NETWORK", list.ward);
        return;
    }
    for c in &list.candidates {
        let mark = if c.refused { "  [REFUSED]" } else { "" };
        println!(
            "{:<24} {:>5.1} km  {} beds {}{}",
            c.hospital.name, c.hospital.distance_km, list.ward, c.available_beds, mark
        );
    }
}
