//! # Seed Data Generator
//!
//! Populates the database with demo warung stock and a few regulars, so the
//! ledger can be exercised without a frontend.
//!
//! ## Usage
//! ```bash
//! cargo run -p warung-db --bin seed
//!
//! # Specify database path
//! cargo run -p warung-db --bin seed -- --db ./data/warung.db
//! ```

use chrono::Utc;
use std::env;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;
use warung_core::{Customer, Product};
use warung_db::{Database, DbConfig};

/// (name, sale price, cost price, stock) in whole rupiah.
const PRODUCTS: &[(&str, i64, i64, i64)] = &[
    ("Indomie Goreng", 3_500, 2_800, 120),
    ("Indomie Soto", 3_500, 2_800, 96),
    ("Teh Botol Sosro 350ml", 5_000, 3_900, 48),
    ("Aqua 600ml", 4_000, 3_000, 72),
    ("Kopi Kapal Api Sachet", 2_000, 1_500, 200),
    ("Gula Pasir 1kg", 16_000, 14_000, 30),
    ("Minyak Goreng 1L", 20_000, 17_500, 24),
    ("Beras Premium 5kg", 78_000, 71_000, 12),
    ("Telur Ayam 1kg", 28_000, 25_000, 20),
    ("Sabun Lifebuoy", 4_500, 3_600, 40),
    ("Shampo Sachet", 1_000, 700, 150),
    ("Rokok Surya 12", 32_000, 29_500, 36),
    ("Kerupuk Udang", 8_000, 6_000, 25),
    ("Kecap Manis 135ml", 9_500, 7_800, 18),
    ("Saus Sambal 135ml", 9_000, 7_400, 18),
    ("Susu Kental Manis", 12_000, 10_200, 30),
    ("Biskuit Roma Kelapa", 7_500, 6_100, 28),
    ("Tepung Terigu 1kg", 12_500, 10_800, 22),
    ("Garam 250g", 3_000, 2_200, 35),
    ("Mie Sedaap Goreng", 3_300, 2_600, 110),
];

/// (name, phone, address) - the regulars who buy on credit.
const CUSTOMERS: &[(&str, Option<&str>, Option<&str>)] = &[
    ("Bu Sari", Some("0812-3456-7890"), Some("Jl. Mawar no. 3")),
    ("Pak Adi", Some("0813-1111-2222"), None),
    ("Bu Rina", None, Some("Blok C no. 4")),
    ("Mas Joko", Some("0857-9999-0000"), None),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,warung=debug,sqlx=warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./warung_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Warung POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./warung_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Warung POS Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.catalog().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!();
    println!("Seeding catalog...");

    let now = Utc::now();
    for (name, sale_price, cost_price, stock_qty) in PRODUCTS {
        db.catalog()
            .upsert(&Product {
                id: Uuid::new_v4().to_string(),
                name: (*name).to_string(),
                sale_price: *sale_price,
                cost_price: *cost_price,
                stock_qty: *stock_qty,
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .await?;
    }
    println!("  {} products", PRODUCTS.len());

    println!("Seeding customers...");
    for (name, phone, address) in CUSTOMERS {
        db.customers()
            .insert(&Customer {
                id: Uuid::new_v4().to_string(),
                name: (*name).to_string(),
                phone: phone.map(str::to_string),
                address: address.map(str::to_string),
                created_at: now,
            })
            .await?;
    }
    println!("  {} customers", CUSTOMERS.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
