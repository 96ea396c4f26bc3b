//! Writes a synthetic EV registration export for trying out the dashboard.
//!
//! Usage:
//!   cargo run --bin generate_sample -- --rows 5000 --output sample_ev_data.csv

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

#[derive(Parser)]
#[command(name = "generate_sample")]
#[command(about = "Generate a synthetic electric vehicle registration CSV")]
struct Args {
    /// Number of vehicles to write
    #[arg(short, long, default_value_t = 2000)]
    rows: usize,

    /// Output file
    #[arg(short, long, default_value = "sample_ev_data.csv")]
    output: PathBuf,

    /// Seed for the generator; the same seed always gives the same file
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

const HEADER: [&str; 17] = [
    "VIN (1-10)",
    "County",
    "City",
    "State",
    "Postal Code",
    "Model Year",
    "Make",
    "Model",
    "Electric Vehicle Type",
    "Clean Alternative Fuel Vehicle (CAFV) Eligibility",
    "Electric Range",
    "Base MSRP",
    "Legislative District",
    "DOL Vehicle ID",
    "Vehicle Location",
    "Electric Utility",
    "2020 Census Tract",
];

const BEV: &str = "Battery Electric Vehicle (BEV)";
const PHEV: &str = "Plug-in Hybrid Electric Vehicle (PHEV)";

/// (make, model, type, typical range in miles, weight)
const MODELS: [(&str, &str, &str, u32, u32); 12] = [
    ("TESLA", "MODEL Y", BEV, 291, 30),
    ("TESLA", "MODEL 3", BEV, 266, 25),
    ("NISSAN", "LEAF", BEV, 150, 10),
    ("CHEVROLET", "BOLT EV", BEV, 259, 8),
    ("KIA", "NIRO", PHEV, 26, 5),
    ("FORD", "MUSTANG MACH-E", BEV, 230, 5),
    ("BMW", "X5", PHEV, 30, 4),
    ("TOYOTA", "PRIUS PRIME", PHEV, 25, 5),
    ("VOLKSWAGEN", "ID.4", BEV, 250, 4),
    ("JEEP", "WRANGLER", PHEV, 21, 3),
    ("RIVIAN", "R1S", BEV, 316, 2),
    ("HYUNDAI", "IONIQ 5", BEV, 220, 3),
];

/// (county, city, postal code, legislative district, utility)
const PLACES: [(&str, &str, &str, &str, &str); 6] = [
    ("King", "Seattle", "98122", "43", "CITY OF SEATTLE - (WA)|CITY OF TACOMA - (WA)"),
    ("King", "Bellevue", "98004", "48", "PUGET SOUND ENERGY INC||CITY OF TACOMA - (WA)"),
    ("Pierce", "Tacoma", "98402", "27", "BONNEVILLE POWER ADMINISTRATION||CITY OF TACOMA - (WA)"),
    ("Snohomish", "Everett", "98201", "38", "PUGET SOUND ENERGY INC"),
    ("Thurston", "Olympia", "98501", "22", "PUGET SOUND ENERGY INC"),
    ("Spokane", "Spokane", "99201", "3", "MODERN ELECTRIC WATER COMPANY"),
];

/// splitmix64; small, deterministic and good enough for sample data.
struct Rng(u64);

impl Rng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn chance(&mut self, percent: u64) -> bool {
        self.below(100) < percent
    }
}

fn pick_model(rng: &mut Rng) -> &'static (&'static str, &'static str, &'static str, u32, u32) {
    let total: u32 = MODELS.iter().map(|m| m.4).sum();
    let mut roll = rng.below(total as u64) as u32;
    for m in &MODELS {
        if roll < m.4 {
            return m;
        }
        roll -= m.4;
    }
    &MODELS[0]
}

fn vin(rng: &mut Rng) -> String {
    const ALPHABET: &[u8] = b"0123456789ABCDEFGHJKLMNPRSTUVWXYZ";
    (0..10)
        .map(|_| ALPHABET[rng.below(ALPHABET.len() as u64) as usize] as char)
        .collect()
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = Rng(args.seed);

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    writer.write_record(HEADER).context("writing header")?;

    for i in 0..args.rows {
        let (make, model, kind, typical_range, _) = *pick_model(&mut rng);
        let (county, city, postal, district, utility) =
            PLACES[rng.below(PLACES.len() as u64) as usize];
        let year = 2012 + rng.below(13);

        // Newer registrations often have no range on file, as in the real export.
        let range = if year >= 2021 && rng.chance(40) {
            "0".to_string()
        } else if rng.chance(3) {
            String::new()
        } else {
            (typical_range as u64 + rng.below(20)).saturating_sub(10).to_string()
        };
        let eligibility = match range.parse::<u32>() {
            Ok(r) if r >= 30 => "Clean Alternative Fuel Vehicle Eligible",
            Ok(0) | Err(_) => "Eligibility unknown as battery range has not been researched",
            Ok(_) => "Not eligible due to low battery range",
        };
        let kind = if rng.chance(1) { "" } else { kind };
        let msrp = if rng.chance(90) {
            "0".to_string()
        } else {
            (30_000 + rng.below(60) * 1_000).to_string()
        };
        let dol_id = (100_000_000 + i as u64 * 7 + rng.below(7)).to_string();
        let location = format!(
            "POINT (-122.{:04} 47.{:04})",
            rng.below(10_000),
            rng.below(10_000)
        );
        let tract = format!("530{:08}", rng.below(100_000_000));
        let vin_code = vin(&mut rng);
        let year = year.to_string();

        writer
            .write_record([
                vin_code.as_str(),
                county,
                city,
                "WA",
                postal,
                year.as_str(),
                make,
                model,
                kind,
                eligibility,
                range.as_str(),
                msrp.as_str(),
                district,
                dol_id.as_str(),
                location.as_str(),
                utility,
                tract.as_str(),
            ])
            .with_context(|| format!("writing row {i}"))?;
    }
    writer.flush().context("flushing output")?;

    println!("Wrote {} vehicles to {}", args.rows, args.output.display());
    Ok(())
}
